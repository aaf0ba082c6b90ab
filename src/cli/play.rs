use std::error::Error;

pub fn handle_play(preset: Option<&str>) -> Result<(), Box<dyn Error>> {
    #[cfg(feature = "player")]
    {
        crate::player::run(preset)
    }

    #[cfg(not(feature = "player"))]
    {
        let _ = preset;
        use owo_colors::OwoColorize;
        println!("{} {}", "🎵".cyan(), "Clip Pad".bold());
        println!();
        println!(
            "{} The terminal player requires the 'player' feature to be enabled.",
            "Note:".yellow()
        );
        println!();
        println!("To enable it, install with:");
        println!("  {}", "cargo install livepad --features player".cyan());
        println!();
        println!("Or if building from source:");
        println!("  {}", "cargo build --release --features player".cyan());

        Ok(())
    }
}
