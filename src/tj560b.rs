//! TigerJet 560B setup for alarm panel reception
//!
//! Out of the box the 560B neither reports DTMF digits nor hook state over
//! HID, and its DTMF decoder threshold (0x199) is too high to pick up the
//! tones some panels (DSC PC9155) send. `initialize` fixes both.

use anyhow::Context;
use tigerjet_transport::{read_register, write_register, HiddevBackend};
use tracing::{debug, info};

use crate::config::InitConfig;

/// Known 560B register addresses
pub mod reg {
    /// DTMF decoder threshold, low byte
    pub const DTMF_THRESHOLD_LO: u8 = 0x35;
    /// DTMF decoder threshold, high byte
    pub const DTMF_THRESHOLD_HI: u8 = 0x36;
    /// HID input report enables
    pub const REPORT_ENABLE: u8 = 0x4E;
}

/// REPORT_ENABLE bit turning on DTMF and hook-status input reports
pub const REPORT_DTMF_HOOK: u8 = 0x40;

/// Chip default DTMF threshold
pub const DEFAULT_DTMF_THRESHOLD: u16 = 0x0199;

/// Threshold that reliably decodes alarm panel DTMF
pub const ALARM_DTMF_THRESHOLD: u16 = 0x0050;

/// Prepare a 560B for alarm reception
///
/// Each step is a separate register transaction; the first failure stops
/// the sequence and is reported with the step that failed.
pub fn initialize<B: HiddevBackend + ?Sized>(
    backend: &B,
    config: &InitConfig,
) -> anyhow::Result<()> {
    let enables = read_register(backend, reg::REPORT_ENABLE)
        .context("reading report enable register")?;
    debug!("Report enables: 0x{:02X}", enables);

    write_register(backend, reg::REPORT_ENABLE, enables | REPORT_DTMF_HOOK)
        .context("enabling DTMF and hook status reports")?;

    let [lo, hi] = config.dtmf_threshold.to_le_bytes();
    write_register(backend, reg::DTMF_THRESHOLD_LO, lo)
        .context("writing DTMF threshold low byte")?;
    write_register(backend, reg::DTMF_THRESHOLD_HI, hi)
        .context("writing DTMF threshold high byte")?;
    info!(
        "DTMF threshold set to 0x{:03X} (default 0x{:03X})",
        config.dtmf_threshold, DEFAULT_DTMF_THRESHOLD
    );

    for w in &config.extra_writes {
        write_register(backend, w.address, w.value).with_context(|| {
            format!("writing 0x{:02X} to register 0x{:02X}", w.value, w.address)
        })?;
        debug!("Register 0x{:02X} = 0x{:02X}", w.address, w.value);
    }

    info!("TigerJet initialised");
    Ok(())
}
