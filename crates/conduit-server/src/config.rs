//! Proxy configuration loaded from `conduit.toml`.

use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct ProxyConfig {
    pub proxy: ProxySection,
    #[serde(default)]
    pub translation: TranslationSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize)]
pub struct ProxySection {
    pub address: String,
    pub port: u16,
    pub backend_address: String,
    pub backend_port: u16,
}

#[derive(Debug, Deserialize)]
pub struct TranslationSection {
    #[serde(default)]
    pub extended_world_height: bool,
    #[serde(default = "default_true")]
    pub add_non_native_items: bool,
    #[serde(default)]
    pub debug_mode: bool,
    #[serde(default = "default_locale")]
    pub default_locale: String,
}

fn default_true() -> bool {
    true
}

fn default_locale() -> String {
    "en_us".into()
}

impl Default for TranslationSection {
    fn default() -> Self {
        Self {
            extended_world_height: false,
            add_non_native_items: true,
            debug_mode: false,
            default_locale: default_locale(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    pub level: String,
}

impl ProxyConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("cannot read {}: {e}", path.as_ref().display()))?;
        toml::from_str(&raw).map_err(|e| format!("invalid config: {e}"))
    }
}
