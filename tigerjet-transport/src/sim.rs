//! In-memory TigerJet for tests and dry runs
//!
//! Models the register file behind the feature report closely enough to
//! exercise the full transaction: a committed write frame stores its value,
//! a committed read frame latches an address, and the next GET_REPORT
//! loads that register into usage slot 0. Every backend call is logged, and
//! any stage can be made to fail with a chosen errno.

use std::time::Duration;

use nix::errno::Errno;
use parking_lot::Mutex;

use crate::protocol::{ReportFrame, Request, REGISTER_REPORT, REGISTER_USAGE, VENDOR_ID};
use crate::types::DeviceInfo;
use crate::{HiddevBackend, ReportRef, UsageRef};

/// Backend operation kinds, in protocol order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    DeviceInfo,
    SetUsages,
    SetReport,
    Settle,
    GetReport,
    GetUsages,
}

/// One recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    DeviceInfo,
    SetUsages { usage: UsageRef, values: Vec<i32> },
    SetReport(ReportRef),
    Settle(Duration),
    GetReport(ReportRef),
    GetUsages { usage: UsageRef, count: usize },
}

impl Call {
    pub fn stage(&self) -> Stage {
        match self {
            Call::DeviceInfo => Stage::DeviceInfo,
            Call::SetUsages { .. } => Stage::SetUsages,
            Call::SetReport(_) => Stage::SetReport,
            Call::Settle(_) => Stage::Settle,
            Call::GetReport(_) => Stage::GetReport,
            Call::GetUsages { .. } => Stage::GetUsages,
        }
    }

    /// Report operations are everything that touches the device beyond
    /// the identity query
    pub fn is_report_op(&self) -> bool {
        !matches!(self, Call::DeviceInfo | Call::Settle(_))
    }
}

struct SimState {
    info: DeviceInfo,
    registers: [u8; 256],
    /// Values from the last HIDIOCSUSAGES, applied on HIDIOCSREPORT
    pending: Vec<i32>,
    /// Address staged by a committed read frame
    latched_read: Option<u8>,
    /// Usage slot 0 as of the last HIDIOCGREPORT
    report_value: i32,
    failure: Option<(Stage, Errno)>,
    calls: Vec<Call>,
}

/// Simulated TigerJet behind a hiddev node
pub struct SimulatedTigerJet {
    state: Mutex<SimState>,
}

impl SimulatedTigerJet {
    /// TigerJet with the given product ID and all registers zeroed
    pub fn new(product: u16) -> Self {
        Self::with_vendor(VENDOR_ID, product)
    }

    /// Device reporting an arbitrary vendor ID
    pub fn with_vendor(vendor: u16, product: u16) -> Self {
        Self {
            state: Mutex::new(SimState {
                info: DeviceInfo {
                    vendor,
                    product,
                    ..Default::default()
                },
                registers: [0; 256],
                pending: Vec::new(),
                latched_read: None,
                report_value: 0,
                failure: None,
                calls: Vec::new(),
            }),
        }
    }

    /// Make every subsequent call at `stage` fail with `errno`.
    ///
    /// # Panics
    ///
    /// On `Stage::Settle`: settling has no error path, so a failure there
    /// could never be observed.
    pub fn fail_at(&self, stage: Stage, errno: Errno) {
        assert_ne!(stage, Stage::Settle, "settle cannot fail");
        self.state.lock().failure = Some((stage, errno));
    }

    pub fn clear_failure(&self) {
        self.state.lock().failure = None;
    }

    /// Recorded calls, oldest first
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Number of report operations issued so far
    pub fn report_ops(&self) -> usize {
        self.state.lock().calls.iter().filter(|c| c.is_report_op()).count()
    }

    /// Register content, bypassing the protocol
    pub fn register(&self, address: u8) -> u8 {
        self.state.lock().registers[usize::from(address)]
    }

    /// Preload a register, bypassing the protocol
    pub fn set_register(&self, address: u8, value: u8) {
        self.state.lock().registers[usize::from(address)] = value;
    }

    fn enter(&self, call: Call) -> Result<parking_lot::MutexGuard<'_, SimState>, Errno> {
        let stage = call.stage();
        let mut state = self.state.lock();
        state.calls.push(call);
        let failure = state.failure;
        match failure {
            Some((failing, errno)) if failing == stage => Err(errno),
            _ => Ok(state),
        }
    }
}

impl HiddevBackend for SimulatedTigerJet {
    fn device_info(&self) -> Result<DeviceInfo, Errno> {
        let state = self.enter(Call::DeviceInfo)?;
        Ok(state.info)
    }

    fn set_usages(&self, usage: UsageRef, values: &[i32]) -> Result<(), Errno> {
        let mut state = self.enter(Call::SetUsages {
            usage,
            values: values.to_vec(),
        })?;
        if usage != REGISTER_USAGE {
            return Err(Errno::EINVAL);
        }
        state.pending = values.to_vec();
        Ok(())
    }

    fn set_report(&self, report: ReportRef) -> Result<(), Errno> {
        let mut state = self.enter(Call::SetReport(report))?;
        if report != REGISTER_REPORT {
            return Err(Errno::EINVAL);
        }
        let pending = std::mem::take(&mut state.pending);
        match ReportFrame::parse(&pending) {
            Some(Request::Write { address, value }) => {
                state.registers[usize::from(address)] = value;
                state.latched_read = None;
            }
            Some(Request::Read { address }) => state.latched_read = Some(address),
            None => return Err(Errno::EINVAL),
        }
        Ok(())
    }

    fn get_report(&self, report: ReportRef) -> Result<(), Errno> {
        let mut state = self.enter(Call::GetReport(report))?;
        if report != REGISTER_REPORT {
            return Err(Errno::EINVAL);
        }
        let value = match state.latched_read {
            Some(address) => i32::from(state.registers[usize::from(address)]),
            None => 0,
        };
        state.report_value = value;
        Ok(())
    }

    fn get_usages(&self, usage: UsageRef, values: &mut [i32]) -> Result<(), Errno> {
        let state = self.enter(Call::GetUsages {
            usage,
            count: values.len(),
        })?;
        if usage != REGISTER_USAGE {
            return Err(Errno::EINVAL);
        }
        values.fill(0);
        if let Some(first) = values.first_mut() {
            *first = state.report_value;
        }
        Ok(())
    }

    /// Recorded but not slept; the model has nothing to settle
    fn settle(&self, delay: Duration) {
        self.state.lock().calls.push(Call::Settle(delay));
    }
}
