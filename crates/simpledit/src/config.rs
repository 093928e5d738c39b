use anyhow::{Context, Result};
use directories::ProjectDirs;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Every section and field is optional in the file; anything missing
/// takes its default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: Theme,
    pub editor: EditorConfig,
}

/// Colours are `#RRGGBB` strings or ratatui colour names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub menu_foreground: Option<String>,
    pub menu_background: Option<String>,
    pub status_foreground: Option<String>,
    pub status_background: Option<String>,
    pub selection_background: Option<String>,
    pub accent_color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub tab_size: usize,
    pub use_spaces: bool,
    pub line_numbers: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            menu_foreground: Some(String::from("#000000")),
            menu_background: Some(String::from("#C0C0C0")),
            status_foreground: Some(String::from("#FFFFFF")),
            status_background: Some(String::from("#005F87")),
            selection_background: Some(String::from("#264F78")),
            accent_color: Some(String::from("#FFD166")),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_size: 4,
            use_spaces: true,
            line_numbers: false,
        }
    }
}

impl Theme {
    /// Parse a configured colour, falling back when unset or invalid.
    pub fn color(value: &Option<String>, fallback: Color) -> Color {
        value
            .as_deref()
            .and_then(|s| s.parse::<Color>().ok())
            .unwrap_or(fallback)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let Some(config_path) = Self::config_path() else {
            log::warn!("No config directory available, using defaults");
            return Ok(Self::default());
        };

        if !config_path.exists() {
            log::info!("Config file does not exist, creating default");
            return Ok(Self::create_default());
        }

        let content = fs::read_to_string(&config_path).with_context(|| {
            format!("Failed to read config file: {}", config_path.display())
        })?;

        if content.trim().is_empty() {
            log::warn!("Config file is empty, creating new one");
            return Ok(Self::create_default());
        }

        match serde_json::from_str::<Self>(&content) {
            Ok(mut config) => {
                config.validate();
                log::info!("Successfully loaded config from: {}", config_path.display());
                Ok(config)
            }
            Err(json_err) => {
                log::error!("Failed to parse config file: {}", json_err);

                let backup_path = config_path.with_extension("bak");
                match fs::copy(&config_path, &backup_path) {
                    Ok(_) => log::info!("Backed up broken config to: {}", backup_path.display()),
                    Err(e) => log::warn!("Failed to backup broken config: {}", e),
                }

                Ok(Self::create_default())
            }
        }
    }

    fn create_default() -> Self {
        let config = Self::default();
        if let Err(e) = config.save() {
            log::warn!("Failed to write default config: {:#}", e);
        }
        config
    }

    pub fn save(&self) -> Result<()> {
        let Some(config_path) = Self::config_path() else {
            return Ok(());
        };

        let mut config_to_save = self.clone();
        config_to_save.validate();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content =
            serde_json::to_string_pretty(&config_to_save).context("Failed to serialize config")?;
        fs::write(&config_path, content).with_context(|| {
            format!("Failed to write config file: {}", config_path.display())
        })?;

        log::info!("Successfully saved config to: {}", config_path.display());
        Ok(())
    }

    /// Replace out-of-range values with defaults.
    pub fn validate(&mut self) {
        if self.editor.tab_size == 0 || self.editor.tab_size > 16 {
            log::warn!("Invalid tab size: {}, using default", self.editor.tab_size);
            self.editor.tab_size = 4;
        }

        let theme = &mut self.theme;
        for value in [
            &mut theme.menu_foreground,
            &mut theme.menu_background,
            &mut theme.status_foreground,
            &mut theme.status_background,
            &mut theme.selection_background,
            &mut theme.accent_color,
        ] {
            if value.as_deref().is_some_and(|s| s.parse::<Color>().is_err()) {
                log::warn!("Invalid colour {:?} in theme, ignoring", value);
                *value = None;
            }
        }
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("SIMPLEDIT_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("SIMPLEDIT_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("config.json"));
        }

        ProjectDirs::from("com", "simpledit", "simpledit")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }
}
