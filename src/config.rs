//! Init sequence configuration
//!
//! Stored as TOML, by default at `~/.config/tjreg/init.toml`. A missing
//! file means defaults. Only the tunable part of the 560B setup lives here;
//! protocol constants are fixed in `tigerjet-transport`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::tj560b::ALARM_DTMF_THRESHOLD;

/// One extra register write applied after the built-in init steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterWrite {
    pub address: u8,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitConfig {
    /// DTMF decoder threshold written to 0x35 (low) / 0x36 (high)
    pub dtmf_threshold: u16,
    pub extra_writes: Vec<RegisterWrite>,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            dtmf_threshold: ALARM_DTMF_THRESHOLD,
            extra_writes: Vec::new(),
        }
    }
}

impl InitConfig {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tjreg")
            .join("init.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: InitConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = InitConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, InitConfig::default());
        assert_eq!(config.dtmf_threshold, 0x0050);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: InitConfig = toml::from_str(
            r#"
            [[extra_writes]]
            address = 0x20
            value = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.dtmf_threshold, ALARM_DTMF_THRESHOLD);
        assert_eq!(
            config.extra_writes,
            vec![RegisterWrite {
                address: 0x20,
                value: 1
            }]
        );
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("init.toml");
        let config = InitConfig {
            dtmf_threshold: 0x0120,
            extra_writes: vec![RegisterWrite {
                address: 0x4F,
                value: 0x03,
            }],
        };
        config.save(&path).unwrap();
        assert_eq!(InitConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_out_of_range_register_rejected() {
        let result: Result<InitConfig, _> = toml::from_str(
            r#"
            [[extra_writes]]
            address = 256
            value = 0
            "#,
        );
        assert!(result.is_err());
    }
}
