//! Backend wrapper that traces every hiddev call
//!
//! Wrap any backend to see the raw ioctl sequence a transaction produces:
//!
//! ```text
//! DEVINFO  -> 06e6:1234
//! SUSAGES  [2, 0, 78, 0]
//! SREPORT  type=3 id=256
//! ...
//! ```

use std::time::Duration;

use nix::errno::Errno;
use tracing::{debug, trace, warn};

use crate::types::DeviceInfo;
use crate::{HiddevBackend, ReportRef, UsageRef};

/// Backend wrapper logging each hiddev call and its result
///
/// Successful calls are logged at `debug`, failures at `warn`. Results are
/// passed through unchanged, so a monitored backend behaves exactly like
/// the one it wraps.
pub struct Monitor<B> {
    inner: B,
}

impl<B: HiddevBackend> Monitor<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    pub fn into_inner(self) -> B {
        self.inner
    }
}

fn log_result<T>(op: &str, result: &Result<T, Errno>) {
    if let Err(e) = result {
        warn!("{op:<8} failed: {e}");
    }
}

impl<B: HiddevBackend> HiddevBackend for Monitor<B> {
    fn device_info(&self) -> Result<DeviceInfo, Errno> {
        let result = self.inner.device_info();
        if let Ok(info) = &result {
            debug!(
                "DEVINFO  -> {:04x}:{:04x} bus {} dev {} if {}",
                info.vendor, info.product, info.busnum, info.devnum, info.ifnum
            );
        }
        log_result("DEVINFO", &result);
        result
    }

    fn set_usages(&self, usage: UsageRef, values: &[i32]) -> Result<(), Errno> {
        debug!(
            "SUSAGES  {:?} field={} usage={}",
            values, usage.field_index, usage.usage_index
        );
        let result = self.inner.set_usages(usage, values);
        log_result("SUSAGES", &result);
        result
    }

    fn set_report(&self, report: ReportRef) -> Result<(), Errno> {
        debug!("SREPORT  type={} id={}", report.report_type, report.report_id);
        let result = self.inner.set_report(report);
        log_result("SREPORT", &result);
        result
    }

    fn get_report(&self, report: ReportRef) -> Result<(), Errno> {
        debug!("GREPORT  type={} id={}", report.report_type, report.report_id);
        let result = self.inner.get_report(report);
        log_result("GREPORT", &result);
        result
    }

    fn get_usages(&self, usage: UsageRef, values: &mut [i32]) -> Result<(), Errno> {
        let result = self.inner.get_usages(usage, values);
        if result.is_ok() {
            debug!(
                "GUSAGES  -> {:?} field={} usage={}",
                values, usage.field_index, usage.usage_index
            );
        }
        log_result("GUSAGES", &result);
        result
    }

    fn settle(&self, delay: Duration) {
        trace!("SETTLE   {:?}", delay);
        self.inner.settle(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::{read_register, write_register};
    use crate::sim::SimulatedTigerJet;

    #[test]
    fn test_monitor_is_transparent() {
        let monitor = Monitor::new(SimulatedTigerJet::new(0x0001));
        write_register(&monitor, 0x20, 0xAB).unwrap();
        assert_eq!(read_register(&monitor, 0x20).unwrap(), 0xAB);
        assert_eq!(monitor.inner().register(0x20), 0xAB);
        assert_eq!(monitor.into_inner().calls().len(), 4 + 6);
    }
}
