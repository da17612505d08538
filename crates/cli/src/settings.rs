//! `cargos settings` - show and edit the user settings file.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use cargos_config::Settings;

use crate::exit_codes::{EXIT_ERROR, EXIT_USAGE};
use crate::CliError;

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Print the current settings as JSON
    Show,

    /// Change one setting
    #[command(after_help = "\
Keys:
  catalog.path              catalog JSON/TOML file
  templates.autorizacion    AUTORIZACION template (.docx), empty to disable
  templates.cargo           CARGO template (.docx), empty to disable
  output.directory          where documents are written
  output.combinePerStore    true | false

Examples:
  cargos settings set catalog.path ~/cargos/catalog.json
  cargos settings set output.combinePerStore false")]
    Set {
        key: String,
        value: String,
    },

    /// Print the settings file location
    Path,
}

/// Settings from `path` when given, else from the user config directory.
pub fn load(path: Option<&Path>) -> (Settings, PathBuf) {
    match path {
        Some(path) => (Settings::load_from(path), path.to_path_buf()),
        None => (Settings::load(), Settings::config_path()),
    }
}

pub fn cmd_settings(cmd: SettingsCommands, path: Option<&Path>) -> Result<(), CliError> {
    let (mut settings, location) = load(path);
    match cmd {
        SettingsCommands::Show => {
            let json = serde_json::to_string_pretty(&settings).map_err(|e| CliError {
                code: EXIT_ERROR,
                message: format!("JSON serialization error: {e}"),
                hint: None,
            })?;
            println!("{json}");
        }
        SettingsCommands::Set { key, value } => {
            settings.set(&key, &value).map_err(|message| CliError {
                code: EXIT_USAGE,
                message,
                hint: Some("run `cargos settings set --help` for the list of keys".to_string()),
            })?;
            settings.save_to(&location).map_err(|e| CliError {
                code: EXIT_ERROR,
                message: format!("cannot write {}: {e}", location.display()),
                hint: None,
            })?;
            eprintln!("{key} updated in {}", location.display());
        }
        SettingsCommands::Path => println!("{}", location.display()),
    }
    Ok(())
}
