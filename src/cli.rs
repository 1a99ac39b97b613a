// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tjreg")]
#[command(author, version, about = "TigerJet USB telephone interface register tool")]
#[command(propagate_version = true)]
pub struct Cli {
    /// hiddev node of the TigerJet
    #[arg(short, long, global = true, default_value = "/dev/usb/hiddev0")]
    pub device: PathBuf,

    /// Trace every hiddev ioctl issued
    #[arg(long, global = true)]
    pub monitor: bool,

    /// Use an in-memory simulated TigerJet instead of a real device
    #[arg(long, global = true)]
    pub simulate: bool,

    /// Log level (error, warn, info, debug, trace); RUST_LOG overrides
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Identify the device (vendor/product ID)
    #[command(visible_aliases = ["id", "i"])]
    Info {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read one register
    #[command(visible_alias = "r")]
    Read {
        /// Register address (0x4e or 78)
        #[arg(value_parser = parse_u8)]
        address: u8,
    },

    /// Write one register
    #[command(visible_alias = "w")]
    Write {
        /// Register address (0x4e or 78)
        #[arg(value_parser = parse_u8)]
        address: u8,
        /// Value to write (0x40 or 64)
        #[arg(value_parser = parse_u8)]
        value: u8,
    },

    /// Read a range of registers
    Dump {
        /// First register
        #[arg(long, default_value = "0x00", value_parser = parse_u8)]
        start: u8,
        /// Last register (inclusive)
        #[arg(long, default_value = "0xff", value_parser = parse_u8)]
        end: u8,
    },

    /// Prepare a TigerJet 560B for alarm reception
    Init {
        /// Config file (default: ~/.config/tjreg/init.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show the effective init config as TOML
    Config {
        /// Config file (default: ~/.config/tjreg/init.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write the effective config back to the file
        #[arg(long)]
        save: bool,
    },
}

/// Parse a byte given as hex (`0x4e`) or decimal (`78`)
pub fn parse_u8(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("'{s}' is not a byte value (0-255 or 0x00-0xff): {e}"))
}
