use std::env;
use std::path::PathBuf;

use crate::data::DEFAULT_DATA_DIR;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_STATIC_DIR: &str = "frontend/dist";

/// Runtime settings for the CLI and the HTTP server, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `HOTAC_BIND`
    pub bind_addr: String,
    /// `HOTAC_DATA_DIR`
    pub data_dir: PathBuf,
    /// `HOTAC_STATIC_DIR`
    pub static_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; empty values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = AppConfig::default();
        Self {
            bind_addr: get("HOTAC_BIND").unwrap_or(defaults.bind_addr),
            data_dir: get("HOTAC_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            static_dir: get("HOTAC_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn lookup_overrides_and_blank_values() {
        let vars: HashMap<&str, &str> = HashMap::from([("HOTAC_BIND", "0.0.0.0:8080"), ("HOTAC_DATA_DIR", "  ")]);
        let config = AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.static_dir, PathBuf::from(DEFAULT_STATIC_DIR));
    }
}
