//! Register read/write transactions
//!
//! One call is one physical register operation:
//!
//! 1. identify the device (HIDIOCGDEVINFO); bail unless it is a TigerJet
//! 2. submit the frame (HIDIOCSUSAGES) and commit it (HIDIOCSREPORT)
//! 3. wait [`SETTLE_DELAY`]
//! 4. reads only: refresh the report (HIDIOCGREPORT) and fetch slot 0
//!    (HIDIOCGUSAGES)
//!
//! Every stage is attempted once. The first failure ends the call.

use tracing::debug;

use crate::error::{IdentityMismatch, RegisterError};
use crate::protocol::{Request, REGISTER_REPORT, REGISTER_USAGE, SETTLE_DELAY};
use crate::types::Identity;
use crate::HiddevBackend;

/// Query the device and classify it by vendor ID
pub fn identify<B: HiddevBackend + ?Sized>(backend: &B) -> Result<Identity, RegisterError> {
    let info = backend
        .device_info()
        .map_err(RegisterError::DeviceQuery)?;
    Ok(Identity::from_info(&info))
}

/// True if the handle is a TigerJet. Fails only if the query itself fails.
pub fn is_tigerjet<B: HiddevBackend + ?Sized>(backend: &B) -> Result<bool, RegisterError> {
    identify(backend).map(|id| id.is_tigerjet())
}

/// Read one register
pub fn read_register<B: HiddevBackend + ?Sized>(
    backend: &B,
    address: u8,
) -> Result<u8, RegisterError> {
    submit(backend, Request::Read { address })?;
    let value = read_back(backend)?;
    debug!("TigerJet read 0x{:02X} = 0x{:02X}", address, value);
    Ok(value)
}

/// Write one register
pub fn write_register<B: HiddevBackend + ?Sized>(
    backend: &B,
    address: u8,
    value: u8,
) -> Result<(), RegisterError> {
    submit(backend, Request::Write { address, value })
}

/// Run a single register transaction
///
/// Returns `Some(value)` for reads and `None` for writes.
pub fn transact<B: HiddevBackend + ?Sized>(
    backend: &B,
    request: Request,
) -> Result<Option<u8>, RegisterError> {
    match request {
        Request::Read { address } => read_register(backend, address).map(Some),
        Request::Write { address, value } => {
            write_register(backend, address, value).map(|()| None)
        }
    }
}

/// Identity check, frame submission, commit and settle
fn submit<B: HiddevBackend + ?Sized>(backend: &B, request: Request) -> Result<(), RegisterError> {
    // Identity is checked on every call; the fd may have been reopened
    // onto a different device since the last one.
    match backend.device_info() {
        Ok(info) => {
            if let Identity::Other { vendor_id, .. } = Identity::from_info(&info) {
                return Err(RegisterError::NotTigerJet(IdentityMismatch::Vendor(
                    vendor_id,
                )));
            }
        }
        Err(e) => return Err(RegisterError::NotTigerJet(IdentityMismatch::Query(e))),
    }

    let frame = request.frame();
    debug!("TigerJet {:?}: frame {:?}", request, frame.values());

    backend
        .set_usages(REGISTER_USAGE, frame.values())
        .map_err(RegisterError::Submit)?;
    backend
        .set_report(REGISTER_REPORT)
        .map_err(RegisterError::Report)?;

    backend.settle(SETTLE_DELAY);
    Ok(())
}

/// Refresh the register report and take the value from slot 0
fn read_back<B: HiddevBackend + ?Sized>(backend: &B) -> Result<u8, RegisterError> {
    backend
        .get_report(REGISTER_REPORT)
        .map_err(RegisterError::Readback)?;
    let mut values = [0i32; 1];
    backend
        .get_usages(REGISTER_USAGE, &mut values)
        .map_err(RegisterError::Readback)?;

    // Register values are 8 bits; the usage slot is a kernel __s32.
    Ok(values[0] as u8)
}
