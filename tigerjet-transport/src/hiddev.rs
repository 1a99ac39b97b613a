//! Linux hiddev backend
//!
//! Issues the `<linux/hiddev.h>` ioctls on a descriptor the caller opened
//! (usually `/dev/usb/hiddevN`). The descriptor is borrowed: this module
//! never opens, closes or enumerates device nodes.

use std::os::fd::{AsRawFd, BorrowedFd};

use nix::errno::Errno;
use zerocopy::FromZeros;

use crate::error::RegisterError;
use crate::types::DeviceInfo;
use crate::{register, HiddevBackend, ReportRef, UsageRef};

/// `HID_MAX_MULTI_USAGES`
pub const MAX_MULTI_USAGES: usize = 1024;

const HIDDEV_IOC_MAGIC: u8 = b'H';

/// `struct hiddev_devinfo`
#[derive(Debug, Clone, Copy, FromZeros)]
#[repr(C)]
pub struct HiddevDevinfo {
    pub bustype: u32,
    pub busnum: u32,
    pub devnum: u32,
    pub ifnum: u32,
    pub vendor: i16,
    pub product: i16,
    pub version: i16,
    pub num_applications: u32,
}

/// `struct hiddev_report_info`
#[derive(Debug, Clone, Copy, FromZeros)]
#[repr(C)]
pub struct HiddevReportInfo {
    pub report_type: u32,
    pub report_id: u32,
    pub num_fields: u32,
}

/// `struct hiddev_usage_ref`
#[derive(Debug, Clone, Copy, FromZeros)]
#[repr(C)]
pub struct HiddevUsageRef {
    pub report_type: u32,
    pub report_id: u32,
    pub field_index: u32,
    pub usage_index: u32,
    pub usage_code: u32,
    pub value: i32,
}

/// `struct hiddev_usage_ref_multi`
#[derive(Clone, Copy, FromZeros)]
#[repr(C)]
pub struct HiddevUsageRefMulti {
    pub uref: HiddevUsageRef,
    pub num_values: u32,
    pub values: [i32; MAX_MULTI_USAGES],
}

nix::ioctl_read!(hidiocgdevinfo, HIDDEV_IOC_MAGIC, 0x03, HiddevDevinfo);
nix::ioctl_write_ptr!(hidiocgreport, HIDDEV_IOC_MAGIC, 0x07, HiddevReportInfo);
nix::ioctl_write_ptr!(hidiocsreport, HIDDEV_IOC_MAGIC, 0x08, HiddevReportInfo);
nix::ioctl_readwrite!(hidiocgusages, HIDDEV_IOC_MAGIC, 0x13, HiddevUsageRefMulti);
nix::ioctl_write_ptr!(hidiocsusages, HIDDEV_IOC_MAGIC, 0x14, HiddevUsageRefMulti);

impl HiddevReportInfo {
    fn for_report(report: ReportRef) -> Self {
        Self {
            report_type: report.report_type,
            report_id: report.report_id,
            num_fields: 0,
        }
    }
}

impl HiddevUsageRefMulti {
    fn for_usage(usage: UsageRef, count: usize) -> Result<Self, Errno> {
        if count > MAX_MULTI_USAGES {
            return Err(Errno::EINVAL);
        }
        let mut multi = Self::new_zeroed();
        multi.uref.report_type = usage.report.report_type;
        multi.uref.report_id = usage.report.report_id;
        multi.uref.field_index = usage.field_index;
        multi.uref.usage_index = usage.usage_index;
        multi.num_values = count as u32;
        Ok(multi)
    }
}

/// hiddev ioctls on a borrowed descriptor
#[derive(Debug, Clone, Copy)]
pub struct Hiddev<'fd> {
    fd: BorrowedFd<'fd>,
}

impl<'fd> Hiddev<'fd> {
    pub fn new(fd: BorrowedFd<'fd>) -> Self {
        Self { fd }
    }
}

impl HiddevBackend for Hiddev<'_> {
    fn device_info(&self) -> Result<DeviceInfo, Errno> {
        let mut info = HiddevDevinfo::new_zeroed();
        // SAFETY: `info` is a live, correctly laid out hiddev_devinfo
        unsafe { hidiocgdevinfo(self.fd.as_raw_fd(), &mut info) }?;
        // The kernel declares vendor/product/version as __s16
        Ok(DeviceInfo {
            vendor: info.vendor as u16,
            product: info.product as u16,
            version: info.version as u16,
            busnum: info.busnum,
            devnum: info.devnum,
            ifnum: info.ifnum,
        })
    }

    fn set_usages(&self, usage: UsageRef, values: &[i32]) -> Result<(), Errno> {
        let mut multi = HiddevUsageRefMulti::for_usage(usage, values.len())?;
        multi.values[..values.len()].copy_from_slice(values);
        // SAFETY: `multi` is a live hiddev_usage_ref_multi with num_values
        // bounded by HID_MAX_MULTI_USAGES
        unsafe { hidiocsusages(self.fd.as_raw_fd(), &multi) }?;
        Ok(())
    }

    fn set_report(&self, report: ReportRef) -> Result<(), Errno> {
        let info = HiddevReportInfo::for_report(report);
        // SAFETY: `info` is a live hiddev_report_info
        unsafe { hidiocsreport(self.fd.as_raw_fd(), &info) }?;
        Ok(())
    }

    fn get_report(&self, report: ReportRef) -> Result<(), Errno> {
        let info = HiddevReportInfo::for_report(report);
        // SAFETY: `info` is a live hiddev_report_info
        unsafe { hidiocgreport(self.fd.as_raw_fd(), &info) }?;
        Ok(())
    }

    fn get_usages(&self, usage: UsageRef, values: &mut [i32]) -> Result<(), Errno> {
        let mut multi = HiddevUsageRefMulti::for_usage(usage, values.len())?;
        // SAFETY: `multi` is a live hiddev_usage_ref_multi with num_values
        // bounded by HID_MAX_MULTI_USAGES
        unsafe { hidiocgusages(self.fd.as_raw_fd(), &mut multi) }?;
        values.copy_from_slice(&multi.values[..values.len()]);
        Ok(())
    }
}

/// [`register::is_tigerjet`] on a raw hiddev descriptor
pub fn is_tigerjet(fd: BorrowedFd<'_>) -> Result<bool, RegisterError> {
    register::is_tigerjet(&Hiddev::new(fd))
}

/// [`register::read_register`] on a raw hiddev descriptor
pub fn read_register(fd: BorrowedFd<'_>, address: u8) -> Result<u8, RegisterError> {
    register::read_register(&Hiddev::new(fd), address)
}

/// [`register::write_register`] on a raw hiddev descriptor
pub fn write_register(fd: BorrowedFd<'_>, address: u8, value: u8) -> Result<(), RegisterError> {
    register::write_register(&Hiddev::new(fd), address, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_struct_layouts() {
        assert_eq!(size_of::<HiddevDevinfo>(), 28);
        assert_eq!(size_of::<HiddevReportInfo>(), 12);
        assert_eq!(size_of::<HiddevUsageRef>(), 24);
        assert_eq!(size_of::<HiddevUsageRefMulti>(), 24 + 4 + 4 * MAX_MULTI_USAGES);
    }

    #[test]
    #[cfg(any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "arm"))]
    fn test_ioctl_numbers() {
        // Expected values from the C macros in <linux/hiddev.h>
        let devinfo = nix::request_code_read!(b'H', 0x03, size_of::<HiddevDevinfo>());
        let greport = nix::request_code_write!(b'H', 0x07, size_of::<HiddevReportInfo>());
        let sreport = nix::request_code_write!(b'H', 0x08, size_of::<HiddevReportInfo>());
        let gusages = nix::request_code_readwrite!(b'H', 0x13, size_of::<HiddevUsageRefMulti>());
        let susages = nix::request_code_write!(b'H', 0x14, size_of::<HiddevUsageRefMulti>());

        assert_eq!(devinfo as u32, 0x801C_4803, "HIDIOCGDEVINFO mismatch");
        assert_eq!(greport as u32, 0x400C_4807, "HIDIOCGREPORT mismatch");
        assert_eq!(sreport as u32, 0x400C_4808, "HIDIOCSREPORT mismatch");
        assert_eq!(gusages as u32, 0xD01C_4813, "HIDIOCGUSAGES mismatch");
        assert_eq!(susages as u32, 0x501C_4814, "HIDIOCSUSAGES mismatch");
    }

    #[test]
    fn test_usage_multi_rejects_oversize() {
        let usage = crate::protocol::REGISTER_USAGE;
        assert!(HiddevUsageRefMulti::for_usage(usage, MAX_MULTI_USAGES).is_ok());
        assert!(matches!(
            HiddevUsageRefMulti::for_usage(usage, MAX_MULTI_USAGES + 1),
            Err(Errno::EINVAL)
        ));
    }

    #[test]
    fn test_not_a_hiddev_node() {
        use std::os::fd::AsFd;

        // /dev/null answers hiddev ioctls with ENOTTY
        let file = std::fs::File::open("/dev/null").unwrap();
        let err = is_tigerjet(file.as_fd()).unwrap_err();
        assert!(matches!(err, RegisterError::DeviceQuery(_)));
    }
}
