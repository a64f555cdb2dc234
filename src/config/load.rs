use std::{env, path::PathBuf};

use super::schema::Settings;
use crate::naming::is_illegal;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment
/// variables (prefix `PCP__`), and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("PCP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Reject settings that would produce invalid or unsortable names.
    pub fn validate(&self) -> Result<(), String> {
        let naming = &self.naming;
        if naming.separator.is_empty() {
            return Err("naming.separator must not be empty".to_string());
        }
        if naming.separator.chars().any(is_illegal) {
            return Err(format!(
                "naming.separator {:?} contains a character illegal in file names",
                naming.separator
            ));
        }
        if naming.replacement.chars().any(is_illegal) {
            return Err(format!(
                "naming.replacement {:?} contains a character illegal in file names",
                naming.replacement
            ));
        }
        if naming.max_name_len < 16 {
            return Err("naming.max_name_len must be >= 16".to_string());
        }
        if naming.album_num.is_some_and(|n| n > 99) {
            return Err("naming.album_num must be within 0..=99".to_string());
        }
        if self
            .library
            .extensions
            .iter()
            .all(|e| e.trim().trim_start_matches('.').is_empty())
        {
            return Err("library.extensions must list at least one extension".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `PCP_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("PCP_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/pcp/config.toml`
/// or `~/.config/pcp/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("pcp").join("config.toml"))
}
