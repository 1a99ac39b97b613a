//! Register access error types

use nix::errno::Errno;
use thiserror::Error;

/// Why a transaction's identity precondition failed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityMismatch {
    #[error("vendor ID {0:04x}")]
    Vendor(u16),

    #[error("device info query failed: {0}")]
    Query(Errno),
}

/// Errors that can occur during register operations
///
/// The ioctl stage variants carry the errno reported by the kernel. None of
/// them are retried here; the caller decides whether to rerun the whole
/// transaction.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterError {
    /// HIDIOCGDEVINFO failed (bad fd, not a hiddev node, permissions)
    #[error("Device info query failed: {0}")]
    DeviceQuery(Errno),

    /// Transaction attempted on something that isn't a TigerJet
    #[error("Not a TigerJet device ({0})")]
    NotTigerJet(IdentityMismatch),

    /// Request asked for both or neither of read and write
    #[error("Invalid request: exactly one of read or write must be set")]
    InvalidRequest,

    /// HIDIOCSUSAGES failed
    #[error("Submitting register frame failed: {0}")]
    Submit(Errno),

    /// HIDIOCSREPORT failed
    #[error("Committing register report failed: {0}")]
    Report(Errno),

    /// HIDIOCGREPORT or HIDIOCGUSAGES failed while reading back
    #[error("Reading back register value failed: {0}")]
    Readback(Errno),
}

impl RegisterError {
    /// Underlying OS error, if the failure came from an ioctl
    pub fn errno(&self) -> Option<Errno> {
        match *self {
            RegisterError::DeviceQuery(e)
            | RegisterError::NotTigerJet(IdentityMismatch::Query(e))
            | RegisterError::Submit(e)
            | RegisterError::Report(e)
            | RegisterError::Readback(e) => Some(e),
            RegisterError::NotTigerJet(IdentityMismatch::Vendor(_))
            | RegisterError::InvalidRequest => None,
        }
    }

    /// The kernel refused access to the hiddev node (EACCES/EPERM)
    pub fn is_permission_denied(&self) -> bool {
        matches!(self.errno(), Some(Errno::EACCES | Errno::EPERM))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_carried_per_stage() {
        assert_eq!(RegisterError::Submit(Errno::EIO).errno(), Some(Errno::EIO));
        assert_eq!(RegisterError::Report(Errno::EPIPE).errno(), Some(Errno::EPIPE));
        assert_eq!(RegisterError::Readback(Errno::ENODEV).errno(), Some(Errno::ENODEV));
        assert_eq!(RegisterError::InvalidRequest.errno(), None);
        assert_eq!(
            RegisterError::NotTigerJet(IdentityMismatch::Vendor(0x046D)).errno(),
            None
        );
    }

    #[test]
    fn test_display() {
        let err = RegisterError::NotTigerJet(IdentityMismatch::Vendor(0x046d));
        assert_eq!(err.to_string(), "Not a TigerJet device (vendor ID 046d)");
        assert!(RegisterError::DeviceQuery(Errno::EACCES).is_permission_denied());
        assert!(!RegisterError::Submit(Errno::EIO).is_permission_denied());
    }
}
