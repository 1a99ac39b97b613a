//! TigerJet register tool CLI
//!
//! Reads, writes and initialises TigerJet USB telephone interface
//! registers through Linux hiddev.

use clap::Parser;

mod cli;
use cli::{Cli, Commands};

mod commands;
use commands::DeviceOptions;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let mut filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    if cli.monitor {
        filter = filter.add_directive("tigerjet_transport::monitor=trace".parse()?);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let opts = DeviceOptions {
        path: cli.device,
        monitor: cli.monitor,
        simulate: cli.simulate,
    };

    match cli.command {
        // Default: show device info
        None => commands::register::info(&opts, false),
        Some(Commands::Info { json }) => commands::register::info(&opts, json),
        Some(Commands::Read { address }) => commands::register::read(&opts, address),
        Some(Commands::Write { address, value }) => {
            commands::register::write(&opts, address, value)
        }
        Some(Commands::Dump { start, end }) => commands::register::dump(&opts, start, end),
        Some(Commands::Init { config }) => commands::init::init(&opts, config),
        Some(Commands::Config { config, save }) => commands::init::show_config(config, save),
    }
}
