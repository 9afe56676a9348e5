use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    config::ConfigError,
    storage::{StorageKeys, DEFAULT_KEY_PREFIX},
};

const DATA_DIR: &str = "data";

/// Settings recognised by `config set`.
pub const FIELDS: &[&str] = &[
    "currency",
    "locale",
    "key_prefix",
    "data_dir",
    "recent_limit",
    "ui_color_enabled",
    "log_filter",
];

/// Stores user-configurable shell preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_key_prefix")]
    pub key_prefix: String,
    /// Directory for the collection files. Defaults to `<base>/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "Config::default_recent_limit")]
    pub recent_limit: usize,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: Self::default_currency(),
            locale: Self::default_locale(),
            key_prefix: Self::default_key_prefix(),
            data_dir: None,
            recent_limit: Self::default_recent_limit(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            log_filter: None,
        }
    }
}

impl Config {
    pub fn default_currency() -> String {
        "USD".into()
    }

    pub fn default_locale() -> String {
        "en-US".into()
    }

    pub fn default_key_prefix() -> String {
        DEFAULT_KEY_PREFIX.into()
    }

    pub fn default_recent_limit() -> usize {
        10
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        match &self.data_dir {
            Some(path) => path.clone(),
            None => base.join(DATA_DIR),
        }
    }

    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::with_prefix(&self.key_prefix)
    }

    /// Applies a textual `value` to `field`. Empty values clear optional settings.
    pub fn set(&mut self, field: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match field {
            "currency" => {
                if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(invalid(field, "expected a three-letter ISO code"));
                }
                self.currency = value.to_ascii_uppercase();
            }
            "locale" => {
                if value.is_empty() {
                    return Err(invalid(field, "locale cannot be empty"));
                }
                self.locale = value.to_string();
            }
            "key_prefix" => {
                if value.is_empty() || value.contains(char::is_whitespace) {
                    return Err(invalid(field, "prefix must be a single non-empty word"));
                }
                self.key_prefix = value.to_string();
            }
            "data_dir" => {
                self.data_dir = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "recent_limit" => {
                let limit: usize = value
                    .parse()
                    .map_err(|_| invalid(field, "expected a whole number"))?;
                if limit == 0 {
                    return Err(invalid(field, "limit must be at least 1"));
                }
                self.recent_limit = limit;
            }
            "ui_color_enabled" => {
                self.ui_color_enabled = parse_bool(value).ok_or_else(|| {
                    invalid(field, "expected on/off, true/false or yes/no")
                })?;
            }
            "log_filter" => {
                self.log_filter = (!value.is_empty()).then(|| value.to_string());
            }
            other => return Err(ConfigError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    /// Every setting as `(name, rendered value)`, in [`FIELDS`] order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let optional = |value: Option<String>| value.unwrap_or_else(|| "(default)".into());
        vec![
            ("currency", self.currency.clone()),
            ("locale", self.locale.clone()),
            ("key_prefix", self.key_prefix.clone()),
            (
                "data_dir",
                optional(self.data_dir.as_ref().map(|p| p.display().to_string())),
            ),
            ("recent_limit", self.recent_limit.to_string()),
            ("ui_color_enabled", self.ui_color_enabled.to_string()),
            ("log_filter", optional(self.log_filter.clone())),
        ]
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = serde_json::from_str(r#"{"currency":"EUR"}"#).unwrap();
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.recent_limit, 10);
        assert_eq!(config.storage_keys(), StorageKeys::default());
    }

    #[test]
    fn set_validates_values() {
        let mut config = Config::default();
        config.set("currency", "brl").unwrap();
        config.set("ui_color_enabled", "off").unwrap();
        config.set("data_dir", "/tmp/sq").unwrap();
        assert_eq!(config.currency, "BRL");
        assert!(!config.ui_color_enabled);
        assert_eq!(
            config.resolve_data_dir(Path::new("/base")),
            PathBuf::from("/tmp/sq")
        );

        config.set("data_dir", "").unwrap();
        assert_eq!(
            config.resolve_data_dir(Path::new("/base")),
            PathBuf::from("/base/data")
        );

        assert!(matches!(
            config.set("recent_limit", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("theme", "dark"),
            Err(ConfigError::UnknownField(_))
        ));
    }

    #[test]
    fn entries_follow_field_order() {
        let names: Vec<&str> = Config::default()
            .entries()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, FIELDS);
    }
}
