//! Command handlers for the CLI application.
//!
//! - `register`: info, read, write, dump
//! - `init`: 560B init sequence and its config

pub mod init;
pub mod register;

use std::path::PathBuf;

use tigerjet_transport::sim::SimulatedTigerJet;
use tigerjet_transport::{HiddevBackend, Monitor, RegisterError};

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

/// Product ID reported by `--simulate`
const SIMULATED_PRODUCT_ID: u16 = 0x0560;

const PERMISSION_HINT: &str =
    "→ run as root, or add a udev rule granting your user access to usb/hiddev*";

/// Where commands get their device from
pub struct DeviceOptions {
    pub path: PathBuf,
    pub monitor: bool,
    pub simulate: bool,
}

/// Open the device and run a closure with it.
///
/// The hiddev node is opened here and closed when the closure returns; the
/// register layer only ever borrows the descriptor.
pub fn with_device<F>(opts: &DeviceOptions, f: F) -> CommandResult
where
    F: FnOnce(&dyn HiddevBackend) -> CommandResult,
{
    if opts.simulate {
        let sim = SimulatedTigerJet::new(SIMULATED_PRODUCT_ID);
        return run(&sim, opts.monitor, f);
    }
    open_and_run(opts, f)
}

#[cfg(target_os = "linux")]
fn open_and_run<F>(opts: &DeviceOptions, f: F) -> CommandResult
where
    F: FnOnce(&dyn HiddevBackend) -> CommandResult,
{
    use anyhow::Context;
    use std::io::ErrorKind;
    use std::os::fd::AsFd;
    use tigerjet_transport::Hiddev;

    let file = match std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(&opts.path)
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            anyhow::bail!("cannot open {}: {e}\n  {PERMISSION_HINT}", opts.path.display());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("cannot open {}", opts.path.display()));
        }
    };
    tracing::debug!("Opened {}", opts.path.display());

    let hiddev = Hiddev::new(file.as_fd());
    run(hiddev, opts.monitor, f)
}

#[cfg(not(target_os = "linux"))]
fn open_and_run<F>(_opts: &DeviceOptions, _f: F) -> CommandResult
where
    F: FnOnce(&dyn HiddevBackend) -> CommandResult,
{
    anyhow::bail!("hiddev devices are only available on Linux; use --simulate")
}

fn run<B, F>(backend: B, monitor: bool, f: F) -> CommandResult
where
    B: HiddevBackend,
    F: FnOnce(&dyn HiddevBackend) -> CommandResult,
{
    let result = if monitor {
        f(&Monitor::new(backend))
    } else {
        f(&backend)
    };
    result.map_err(with_permission_hint)
}

/// Some nodes open fine but refuse the ioctls themselves
fn with_permission_hint(err: anyhow::Error) -> anyhow::Error {
    let denied = err
        .chain()
        .filter_map(|e| e.downcast_ref::<RegisterError>())
        .any(RegisterError::is_permission_denied);
    if denied {
        err.context(format!("hiddev access denied\n  {PERMISSION_HINT}"))
    } else {
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use tigerjet_transport::sim::Stage;
    use tigerjet_transport::{read_register, Errno};

    fn read_4e(dev: &dyn HiddevBackend) -> CommandResult {
        read_register(dev, 0x4E).context("reading register 0x4E")?;
        Ok(())
    }

    #[test]
    fn test_denied_ioctl_gets_hint() {
        let sim = SimulatedTigerJet::new(SIMULATED_PRODUCT_ID);
        sim.fail_at(Stage::SetUsages, Errno::EACCES);

        let err = run(&sim, false, read_4e).unwrap_err();
        assert!(format!("{err:#}").contains("udev rule"));
        assert_eq!(
            err.downcast_ref::<RegisterError>(),
            Some(&RegisterError::Submit(Errno::EACCES))
        );
    }

    #[test]
    fn test_denied_identity_query_gets_hint() {
        let sim = SimulatedTigerJet::new(SIMULATED_PRODUCT_ID);
        sim.fail_at(Stage::DeviceInfo, Errno::EPERM);

        let err = run(&sim, true, read_4e).unwrap_err();
        assert!(format!("{err:#}").contains("udev rule"));
    }

    #[test]
    fn test_other_failures_have_no_hint() {
        let sim = SimulatedTigerJet::new(SIMULATED_PRODUCT_ID);
        sim.fail_at(Stage::GetReport, Errno::EIO);

        let err = run(&sim, false, read_4e).unwrap_err();
        assert!(!format!("{err:#}").contains("udev rule"));
        assert_eq!(
            err.downcast_ref::<RegisterError>(),
            Some(&RegisterError::Readback(Errno::EIO))
        );
    }
}
