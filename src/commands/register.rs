//! Register command handlers.

use anyhow::Context;
use serde::Serialize;
use tigerjet_transport::{
    read_register, write_register, DeviceInfo, Identity, RegisterError, VENDOR_ID,
};

use super::{with_device, CommandResult, DeviceOptions};

#[derive(Serialize)]
struct InfoOutput {
    identity: Identity,
    device: DeviceInfo,
}

/// Identify the device
pub fn info(opts: &DeviceOptions, json: bool) -> CommandResult {
    with_device(opts, |dev| {
        let device = dev.device_info().map_err(RegisterError::DeviceQuery)?;
        let identity = Identity::from_info(&device);

        if json {
            let out = InfoOutput { identity, device };
            println!("{}", serde_json::to_string_pretty(&out)?);
            return Ok(());
        }

        println!(
            "Device: VID={:04X} PID={:04X} version={:04X} (bus {} dev {} if {})",
            device.vendor, device.product, device.version, device.busnum, device.devnum, device.ifnum
        );
        match identity {
            Identity::TigerJet { product_id } => {
                println!("TigerJet: yes (product 0x{product_id:04X})");
            }
            Identity::Other { vendor_id, .. } => {
                println!("TigerJet: no (vendor 0x{vendor_id:04X}, expected 0x{VENDOR_ID:04X})");
            }
        }
        Ok(())
    })
}

/// Read one register
pub fn read(opts: &DeviceOptions, address: u8) -> CommandResult {
    with_device(opts, |dev| {
        let value = read_register(dev, address)
            .with_context(|| format!("reading register 0x{address:02X}"))?;
        println!("0x{address:02X} = 0x{value:02X} ({value})");
        Ok(())
    })
}

/// Write one register
pub fn write(opts: &DeviceOptions, address: u8, value: u8) -> CommandResult {
    with_device(opts, |dev| {
        write_register(dev, address, value)
            .with_context(|| format!("writing 0x{value:02X} to register 0x{address:02X}"))?;
        println!("0x{address:02X} <- 0x{value:02X}");
        Ok(())
    })
}

/// Read a register range and print it as a hex table
pub fn dump(opts: &DeviceOptions, start: u8, end: u8) -> CommandResult {
    if start > end {
        anyhow::bail!("start 0x{start:02X} is past end 0x{end:02X}");
    }
    with_device(opts, |dev| {
        let mut values = Vec::with_capacity(usize::from(end - start) + 1);
        for address in start..=end {
            let value = read_register(dev, address)
                .with_context(|| format!("reading register 0x{address:02X}"))?;
            values.push((address, value));
        }
        print!("{}", format_dump(&values));
        Ok(())
    })
}

/// 16 registers per row, rows aligned to multiples of 0x10
fn format_dump(values: &[(u8, u8)]) -> String {
    let mut out = String::from("     00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f\n");
    let mut row: Option<u8> = None;
    for &(address, value) in values {
        let base = address & 0xF0;
        if row != Some(base) {
            if row.is_some() {
                out.push('\n');
            }
            out.push_str(&format!("{base:02x}: "));
            out.push_str(&"   ".repeat(usize::from(address & 0x0F)));
            row = Some(base);
        }
        out.push_str(&format!(" {value:02x}"));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_dump_aligned() {
        let values: Vec<(u8, u8)> = (0x00..=0x11).map(|a| (a, a)).collect();
        let out = format_dump(&values);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("00:  00 01"));
        assert_eq!(lines[2], "10:  10 11");
    }

    #[test]
    fn test_format_dump_unaligned_start() {
        let out = format_dump(&[(0x4E, 0x40), (0x4F, 0x00)]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], format!("40: {} 40 00", "   ".repeat(14)));
    }
}
