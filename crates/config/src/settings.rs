// Application settings
// Loaded from ~/.config/cargos/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Catalog
    #[serde(rename = "catalog.path")]
    pub catalog_path: Option<String>,

    // Templates
    #[serde(rename = "templates.autorizacion")]
    pub autorizacion_template: Option<String>,

    #[serde(rename = "templates.cargo")]
    pub cargo_template: Option<String>,

    // Output
    #[serde(rename = "output.directory")]
    pub output_directory: String,

    #[serde(rename = "output.combinePerStore")]
    pub combine_per_store: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_path: None,
            autorizacion_template: None,
            cargo_template: None,
            output_directory: "output".into(),
            combine_per_store: true,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cargos");
        config_dir.join("settings.json")
    }

    /// Load settings from the default location, creating the file on first use
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            create_default_file(&path);
            return Self::default();
        }
        Self::load_from(&path)
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("error parsing {}: {e}; using default settings", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("error reading {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Parse settings JSON, ignoring lines that start with `//`
    pub fn parse(contents: &str) -> Result<Self, String> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned).map_err(|e| e.to_string())
    }

    /// Save current settings to the default location
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Set one setting by its dotted key. An empty value clears optional paths.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let optional = |v: &str| {
            let v = v.trim();
            (!v.is_empty()).then(|| v.to_string())
        };
        match key {
            "catalog.path" => self.catalog_path = optional(value),
            "templates.autorizacion" => self.autorizacion_template = optional(value),
            "templates.cargo" => self.cargo_template = optional(value),
            "output.directory" => {
                if value.trim().is_empty() {
                    return Err("output.directory cannot be empty".into());
                }
                self.output_directory = value.trim().to_string();
            }
            "output.combinePerStore" => {
                self.combine_per_store = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("output.combinePerStore expects true or false, got '{value}'"))?;
            }
            other => return Err(format!("unknown setting '{other}'")),
        }
        Ok(())
    }

    /// Get the config file path for display
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}

/// Create default settings file with comments
fn create_default_file(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            log::warn!("error creating config directory: {e}");
            return;
        }
    }

    let default_config = r#"{
    // Occupation catalog (.json or .toml)
    "catalog.path": null,

    // Word templates; a document kind is generated only when its template is set
    "templates.autorizacion": null,
    "templates.cargo": null,

    // Output
    "output.directory": "output",
    "output.combinePerStore": true
}
"#;

    if let Err(e) = fs::write(path, default_config) {
        log::warn!("error writing default settings.json: {e}");
    }
}
