use std::env;
use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::toast::DEFAULT_TOAST_TTL_MS;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub toast: ToastSettings,
    #[serde(default)]
    pub feedback: FeedbackSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    /// Durable backend: "memory" or "file"
    #[serde(default = "default_store_backend")]
    pub backend: String,
    /// Name of the durable key-value slot
    #[serde(default = "default_store_slot")]
    pub slot: String,
    /// Base directory for the file backend
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToastSettings {
    /// Lifetime of non-urgent toasts in milliseconds
    #[serde(default = "default_toast_ttl_ms")]
    pub ttl_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackSettings {
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub haptics_enabled: bool,
    #[serde(default = "default_true")]
    pub os_alerts_enabled: bool,
}

fn default_store_backend() -> String {
    "memory".to_string()
}

fn default_store_slot() -> String {
    "notifications".to_string()
}

fn default_toast_ttl_ms() -> u64 {
    DEFAULT_TOAST_TTL_MS
}

fn default_true() -> bool {
    true
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            slot: default_store_slot(),
            path: None,
        }
    }
}

impl Default for ToastSettings {
    fn default() -> Self {
        Self {
            ttl_ms: default_toast_ttl_ms(),
        }
    }
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            haptics_enabled: true,
            os_alerts_enabled: true,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("store.backend", "memory")?
            .set_default("store.slot", "notifications")?
            .set_default("toast.ttl_ms", DEFAULT_TOAST_TTL_MS)?
            .set_default("feedback.sound_enabled", true)?
            .set_default("feedback.haptics_enabled", true)?
            .set_default("feedback.os_alerts_enabled", true)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables (SNC_STORE__BACKEND etc.)
            .add_source(
                Environment::with_prefix("SNC")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.store.backend, "memory");
        assert_eq!(settings.store.slot, "notifications");
        assert!(settings.store.path.is_none());
        assert_eq!(settings.toast.ttl_ms, DEFAULT_TOAST_TTL_MS);
        assert!(settings.feedback.sound_enabled);
        assert!(settings.feedback.haptics_enabled);
        assert!(settings.feedback.os_alerts_enabled);
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"store": {"backend": "file", "path": "/tmp/snc"}}"#).unwrap();
        assert_eq!(settings.store.backend, "file");
        assert_eq!(settings.store.path, Some(PathBuf::from("/tmp/snc")));
        assert_eq!(settings.store.slot, "notifications");
        assert_eq!(settings.toast.ttl_ms, DEFAULT_TOAST_TTL_MS);
    }
}
