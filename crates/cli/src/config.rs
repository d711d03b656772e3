//! Configuration file loading and environment variable handling.
//!
//! Precedence: CLI args > Environment vars > Config file > Defaults

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use datemark_core::ShorthandTable;
use serde::Deserialize;

/// Default config file content for `--config-init`.
pub const DEFAULT_CONFIG: &str = r#"# Datemark configuration
# See: dmark --help for all options

# Disable colored output
no_color = false

# Highlight dates inline in tee mode (-T)
highlight = false

# Prefer future dates when an expression is ambiguous ("fri" = the coming Friday)
forward_date = true

# Extra shorthands, expanded before date parsing. Tokens are single words.
# Entries here override the built-in ones (tod, tom, yes, mon..sun).
[shorthands]
# eod = "today"
# nxt = "next week"
"#;

/// Configuration loaded from file and environment.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub no_color: Option<bool>,
    pub highlight: Option<bool>,
    pub forward_date: Option<bool>,
    pub shorthands: BTreeMap<String, String>,
}

impl Config {
    /// Get the config file path.
    ///
    /// - Linux: `~/.config/dmark/config.toml`
    /// - macOS: `~/Library/Application Support/dmark/config.toml`
    /// - Windows: `%APPDATA%\dmark\config.toml`
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dmark").join("config.toml"))
    }

    /// Load config from file. Returns default if file doesn't exist.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };

        let Ok(contents) = fs::read_to_string(&path) else {
            tracing::debug!(path = %path.display(), "no config file");
            return Self::default();
        };

        toml::from_str(&contents).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Read value from environment variable.
    fn env_var<T: std::str::FromStr>(name: &str) -> Option<T> {
        std::env::var(name).ok()?.parse().ok()
    }

    /// Get no_color with precedence: env > config > default.
    ///
    /// Respects the `NO_COLOR` standard (https://no-color.org/).
    pub fn no_color(&self) -> bool {
        // NO_COLOR is a standard - presence means disable color
        if std::env::var("NO_COLOR").is_ok() {
            return true;
        }
        if std::env::var("DMARK_NO_COLOR").is_ok() {
            return true;
        }
        self.no_color.unwrap_or(false)
    }

    /// Get highlight with precedence: env > config > default.
    pub fn highlight(&self) -> bool {
        Self::env_var("DMARK_HIGHLIGHT")
            .or(self.highlight)
            .unwrap_or(false)
    }

    /// Get forward_date with precedence: env > config > default.
    pub fn forward_date(&self) -> bool {
        Self::env_var("DMARK_FORWARD_DATE")
            .or(self.forward_date)
            .unwrap_or(true)
    }

    /// Built-in shorthands extended with the `[shorthands]` table.
    pub fn shorthand_table(&self) -> Result<ShorthandTable, String> {
        let builtin = ShorthandTable::builtin();
        if self.shorthands.is_empty() {
            return Ok(builtin.clone());
        }
        builtin
            .extend(
                self.shorthands
                    .iter()
                    .map(|(token, expansion)| (token.as_str(), expansion.as_str())),
            )
            .map_err(|e| format!("Config: {}", e))
    }
}

/// Create a default config file at the standard location.
pub fn init_config() -> Result<PathBuf, String> {
    let path = Config::path().ok_or("Cannot determine config directory")?;

    if path.exists() {
        return Err(format!("Config file already exists: {}", path.display()));
    }

    // Create parent directory
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("Failed to create directory: {}", e))?;
    }

    fs::write(&path, DEFAULT_CONFIG).map_err(|e| format!("Failed to write config: {}", e))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid_toml() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).expect("DEFAULT_CONFIG should parse");
        assert_eq!(config.no_color, Some(false));
        assert_eq!(config.highlight, Some(false));
        assert_eq!(config.forward_date, Some(true));
        assert!(config.shorthands.is_empty());
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
forward_date = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.forward_date, Some(false));
        assert_eq!(config.highlight, None);
        assert_eq!(config.no_color, None);
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.shorthands.is_empty());
        assert_eq!(config.shorthand_table().unwrap().len(), 10);
    }

    #[test]
    fn test_custom_shorthands() {
        let toml = r#"
[shorthands]
eod = "today"
fri = "friday afternoon"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let table = config.shorthand_table().unwrap();
        assert_eq!(table.len(), 11);
        assert_eq!(table.lookup("eod"), Some("today"));
        assert_eq!(table.lookup("fri"), Some("friday afternoon"));
    }

    #[test]
    fn test_invalid_shorthand_is_reported() {
        let toml = r#"
[shorthands]
"next wk" = "next week"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.shorthand_table().unwrap_err();
        assert!(err.contains("next wk"), "{err}");
    }
}
