//! Register access for TigerJet USB HID telephone line interfaces
//!
//! TigerJet chips (the 560B and friends, common in alarm receivers) expose
//! their internal registers through a vendor feature report. This crate
//! encodes single register reads and writes into that report and drives
//! them through the Linux hiddev interface (`/dev/usb/hiddevN`).
//!
//! The OS side is abstracted as [`HiddevBackend`]:
//!
//! - [`Hiddev`] - real ioctls on a caller-owned file descriptor (Linux)
//! - [`Monitor`] - wraps another backend and traces every call
//! - [`sim::SimulatedTigerJet`] - in-memory device for tests and dry runs
//!
//! Transactions are synchronous and hold no state between calls. A handle
//! must not be used by two transactions at once; callers serialize access.

pub mod error;
pub mod monitor;
pub mod protocol;
pub mod register;
pub mod sim;
pub mod types;

#[cfg(target_os = "linux")]
pub mod hiddev;

pub use error::{IdentityMismatch, RegisterError};
pub use monitor::Monitor;
pub use protocol::{ReportFrame, ReportRef, Request, UsageRef, SETTLE_DELAY, VENDOR_ID};
pub use register::{identify, is_tigerjet, read_register, transact, write_register};
pub use types::{DeviceInfo, Identity};

#[cfg(target_os = "linux")]
pub use hiddev::Hiddev;

use std::time::Duration;

pub use nix::errno::Errno;

/// The hiddev operations a register transaction needs
///
/// One method per ioctl. Implementations report the kernel's errno
/// unchanged; mapping to a protocol stage happens in [`register`].
pub trait HiddevBackend {
    /// HIDIOCGDEVINFO
    fn device_info(&self) -> Result<DeviceInfo, Errno>;

    /// HIDIOCSUSAGES with `num_values = values.len()`
    fn set_usages(&self, usage: UsageRef, values: &[i32]) -> Result<(), Errno>;

    /// HIDIOCSREPORT
    fn set_report(&self, report: ReportRef) -> Result<(), Errno>;

    /// HIDIOCGREPORT
    fn get_report(&self, report: ReportRef) -> Result<(), Errno>;

    /// HIDIOCGUSAGES with `num_values = values.len()`, filling `values`
    fn get_usages(&self, usage: UsageRef, values: &mut [i32]) -> Result<(), Errno>;

    /// Wait for the device to settle after a committed report
    fn settle(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

impl<B: HiddevBackend + ?Sized> HiddevBackend for &B {
    fn device_info(&self) -> Result<DeviceInfo, Errno> {
        (**self).device_info()
    }

    fn set_usages(&self, usage: UsageRef, values: &[i32]) -> Result<(), Errno> {
        (**self).set_usages(usage, values)
    }

    fn set_report(&self, report: ReportRef) -> Result<(), Errno> {
        (**self).set_report(report)
    }

    fn get_report(&self, report: ReportRef) -> Result<(), Errno> {
        (**self).get_report(report)
    }

    fn get_usages(&self, usage: UsageRef, values: &mut [i32]) -> Result<(), Errno> {
        (**self).get_usages(usage, values)
    }

    fn settle(&self, delay: Duration) {
        (**self).settle(delay)
    }
}
