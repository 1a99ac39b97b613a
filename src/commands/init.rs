//! Init sequence command handlers.

use anyhow::Context;
use std::path::PathBuf;
use tracing::info;

use tjreg::{initialize, InitConfig};

use super::{with_device, CommandResult, DeviceOptions};

fn load_config(path: Option<PathBuf>) -> anyhow::Result<(InitConfig, PathBuf)> {
    let path = path.unwrap_or_else(InitConfig::default_path);
    info!("Loading config from {:?}", path);
    let config = InitConfig::load(&path)
        .with_context(|| format!("loading config {}", path.display()))?;
    Ok((config, path))
}

/// Run the 560B init sequence
pub fn init(opts: &DeviceOptions, config: Option<PathBuf>) -> CommandResult {
    let (config, _) = load_config(config)?;
    with_device(opts, |dev| {
        initialize(dev, &config)?;
        println!(
            "TigerJet initialised (DTMF threshold 0x{:03X}, {} extra write(s))",
            config.dtmf_threshold,
            config.extra_writes.len()
        );
        Ok(())
    })
}

/// Print the effective config, optionally saving it
pub fn show_config(config: Option<PathBuf>, save: bool) -> CommandResult {
    let (config, path) = load_config(config)?;
    print!("{}", toml::to_string_pretty(&config)?);
    if save {
        config
            .save(&path)
            .with_context(|| format!("saving config {}", path.display()))?;
        eprintln!("Saved to {}", path.display());
    }
    Ok(())
}
