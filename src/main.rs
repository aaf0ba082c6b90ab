//! livepad - Terminal-based clip pad for live audio playback.
//!
//! This application provides two main functionalities:
//!
//! 1. **Library Management**: Importing audio files into a work directory,
//!    tagging them, and grouping them into named presets stored as plain
//!    JSON files.
//!
//! 2. **Clip Pad Player** (optional feature): A terminal player that binds
//!    each clip to a keyboard key, laid out like the letter rows of a
//!    QWERTY keyboard. Clips carry a playable window and a play mode, so a
//!    pad can fire a trimmed one-shot or loop a section indefinitely.
//!
//! The tool is designed for performers who cue backing tracks, stings, and
//! ambience from a keyboard and want a fast, scriptable workflow around a
//! plain-file library.

use clap::{CommandFactory, Parser, Subcommand, builder::PossibleValuesParser};
use clap_complete::{Generator, Shell, generate};
use livepad::constants::RECENT_PRESET;
use std::error::Error;
use std::io;

mod cli;

#[cfg(feature = "player")]
mod player;

#[derive(Parser)]
#[command(name = "lap")]
#[command(about = "Terminal clip pad and audio library for live playback")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize livepad configuration and work directory
    Init {
        /// Work directory to create (defaults to ~/Documents/livepad)
        #[arg(long)]
        work_dir: Option<String>,
    },
    /// Show current configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Import audio files into the library
    Import {
        /// Audio files to import (wav or flac)
        #[arg(required = true)]
        files: Vec<String>,
        /// Tag to apply to every imported clip (repeatable)
        #[arg(short, long)]
        tag: Vec<String>,
        /// Play mode for the imported clips (defaults from config)
        #[arg(short, long, value_parser = PossibleValuesParser::new(["once", "loop"]))]
        mode: Option<String>,
        /// Preset to add the clips to
        #[arg(short, long, default_value = RECENT_PRESET)]
        preset: String,
        /// Skip interactive prompts
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// List the clips in a preset
    Clips {
        /// Preset to list
        #[arg(default_value = RECENT_PRESET)]
        preset: String,
    },
    /// Summarize tags across a preset
    Tags {
        /// Preset to summarize
        #[arg(default_value = RECENT_PRESET)]
        preset: String,
    },
    /// Add or remove tags on a clip
    Tag {
        /// Clip name as shown by 'lap clips'
        clip: String,
        /// Tag to add (repeatable)
        #[arg(short, long)]
        add: Vec<String>,
        /// Tag to remove (repeatable)
        #[arg(short, long)]
        remove: Vec<String>,
        /// Preset holding the clip
        #[arg(short, long, default_value = RECENT_PRESET)]
        preset: String,
    },
    /// Manage saved presets
    Presets {
        #[command(subcommand)]
        action: PresetAction,
    },
    /// Open the terminal clip pad player
    Play {
        /// Preset to load (defaults to the autosaved one)
        preset: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// View current configuration
    View,
    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_parser = PossibleValuesParser::new([
            "work_dir",
            "default_play_mode",
            "autoload_recent",
            "normalize_clip_names",
        ]))]
        key: String,
        /// Configuration value
        value: String,
    },
    /// Edit configuration file in your editor
    Edit,
}

#[derive(Subcommand)]
enum PresetAction {
    /// List presets with clip counts
    List,
    /// Delete a preset
    Delete {
        /// Preset name
        name: String,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { work_dir } => {
            cli::init::handle_init(work_dir.as_deref())?;
        }
        Commands::Config { action } => match action {
            ConfigAction::View => {
                cli::config::handle_config_view()?;
            }
            ConfigAction::Set { key, value } => {
                cli::config::handle_config_set(&key, &value)?;
            }
            ConfigAction::Edit => {
                cli::config::handle_config_edit()?;
            }
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
        }
        Commands::Import {
            files,
            tag,
            mode,
            preset,
            yes,
        } => {
            cli::import::handle_import(&files, &tag, mode.as_deref(), &preset, yes)?;
        }
        Commands::Clips { preset } => {
            cli::clips::handle_clips(&preset)?;
        }
        Commands::Tags { preset } => {
            cli::tags::handle_tags(&preset)?;
        }
        Commands::Tag {
            clip,
            add,
            remove,
            preset,
        } => {
            cli::tag::handle_tag(&clip, &add, &remove, &preset)?;
        }
        Commands::Presets { action } => match action {
            PresetAction::List => {
                cli::presets::handle_presets_list()?;
            }
            PresetAction::Delete { name, yes } => {
                cli::presets::handle_presets_delete(&name, yes)?;
            }
        },
        Commands::Play { preset } => {
            cli::play::handle_play(preset.as_deref())?;
        }
    }

    Ok(())
}
