// TigerJet register tool - shared library
// Init sequence and configuration used by the tjreg CLI

pub mod config;
pub mod tj560b;

pub use config::{InitConfig, RegisterWrite};
pub use tj560b::initialize;
