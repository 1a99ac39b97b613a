//! Protocol constants and frame encoding for TigerJet register access
//!
//! A register operation is a single feature report carrying a five-slot
//! usage vector:
//!
//! ```text
//! [OPCODE, write_address, read_address, data_length, data]
//! ```
//!
//! Writes submit all five slots with `data_length = 1`. Reads submit the
//! first four with `data_length = 0`; the device answers with the register
//! content in slot 0 of the next feature report.

use crate::error::RegisterError;

/// TigerJet Network vendor ID
pub const VENDOR_ID: u16 = 0x06E6;

/// Register access opcode, always slot 0 of the frame
pub const OPCODE: i32 = 2;

/// Number of usage slots in a register frame
pub const FRAME_SLOTS: usize = 5;

/// HID report types as used by hiddev (`HID_REPORT_TYPE_*`). Register
/// access only ever uses feature reports.
pub mod report_type {
    pub const FEATURE: u32 = 3;
}

/// `HID_REPORT_ID_FIRST`: selects the device's first report of the given type
pub const REPORT_ID_FIRST: u32 = 0x100;

pub mod timing {
    use std::time::Duration;

    /// Pause between committing a register frame and reading it back.
    ///
    /// The device needs this to latch the written value or stage the read
    /// data. The 5us figure is kept as-is: it is short next to a USB polling
    /// interval and may have been meant as 5ms, but nothing has been measured
    /// on hardware to justify changing it.
    pub const SETTLE_DELAY: Duration = Duration::from_micros(5);
}

pub use timing::SETTLE_DELAY;

/// Report addressed by a hiddev report ioctl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRef {
    pub report_type: u32,
    pub report_id: u32,
}

/// Usage addressed by a hiddev usage ioctl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageRef {
    pub report: ReportRef,
    pub field_index: u32,
    pub usage_index: u32,
}

/// The feature report every register frame travels in
pub const REGISTER_REPORT: ReportRef = ReportRef {
    report_type: report_type::FEATURE,
    report_id: REPORT_ID_FIRST,
};

/// First usage of the register report's only field
pub const REGISTER_USAGE: UsageRef = UsageRef {
    report: REGISTER_REPORT,
    field_index: 0,
    usage_index: 0,
};

/// A single register operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Read { address: u8 },
    Write { address: u8, value: u8 },
}

impl Request {
    /// Build a request from loosely-typed parts, as a binding layer would
    /// receive them. Exactly one of `write` and `read` must be set.
    pub fn from_parts(address: u8, write: Option<u8>, read: bool) -> Result<Self, RegisterError> {
        match (write, read) {
            (Some(value), false) => Ok(Request::Write { address, value }),
            (None, true) => Ok(Request::Read { address }),
            _ => Err(RegisterError::InvalidRequest),
        }
    }

    /// Encode into the usage vector submitted with `HIDIOCSUSAGES`
    pub fn frame(&self) -> ReportFrame {
        match *self {
            Request::Write { address, value } => ReportFrame {
                slots: [OPCODE, i32::from(address), 0, 1, i32::from(value)],
                len: 5,
            },
            Request::Read { address } => ReportFrame {
                slots: [OPCODE, 0, i32::from(address), 0, 0],
                len: 4,
            },
        }
    }
}

/// Encoded register frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportFrame {
    slots: [i32; FRAME_SLOTS],
    len: usize,
}

impl ReportFrame {
    /// Values actually submitted to the device
    pub fn values(&self) -> &[i32] {
        &self.slots[..self.len]
    }

    /// All five slots, including ones not submitted
    pub fn slots(&self) -> &[i32; FRAME_SLOTS] {
        &self.slots
    }

    /// Data-length slot. This, not the data byte, marks a write: a write
    /// of zero has `data == 0` too.
    pub fn data_length(&self) -> i32 {
        self.slots[3]
    }

    pub fn data(&self) -> u8 {
        self.slots[4] as u8
    }

    pub fn is_write(&self) -> bool {
        self.data_length() == 1
    }

    /// Decode a submitted usage vector back into a request, if it is one.
    pub fn parse(values: &[i32]) -> Option<Request> {
        match values {
            [OPCODE, address, 0, 1, value] => Some(Request::Write {
                address: *address as u8,
                value: *value as u8,
            }),
            [OPCODE, 0, address, 0] => Some(Request::Read {
                address: *address as u8,
            }),
            _ => None,
        }
    }
}
