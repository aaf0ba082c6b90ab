use livepad::config::Config;
use livepad::constants::{MUSIC_DIR, PRESETS_DIR};
use std::error::Error;
use std::fs;

pub fn handle_init(work_dir: Option<&str>) -> Result<(), Box<dyn Error>> {
    // Check if already initialized
    if Config::exists()? {
        return Err(
            "livepad is already initialized. Use 'lap config set work_dir <path>' to change the work directory."
                .into(),
        );
    }

    let mut config = Config::new();
    if let Some(dir) = work_dir {
        config.work_dir = dir.to_string();
    }

    let work_path = config.work_dir_path();
    if !work_path.exists() {
        println!("Creating work directory: {}", work_path.display());
        fs::create_dir_all(&work_path)?;
    } else if !work_path.is_dir() {
        return Err(format!("{} exists but is not a directory", work_path.display()).into());
    }

    // The layout the player and importer expect
    fs::create_dir_all(work_path.join(MUSIC_DIR))?;
    fs::create_dir_all(work_path.join(PRESETS_DIR))?;

    config.save()?;

    println!("livepad initialized successfully!");
    println!("Work directory: {}", work_path.display());
    println!(
        "Configuration saved to: {}",
        Config::config_path()?.display()
    );

    Ok(())
}
