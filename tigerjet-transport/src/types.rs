//! Shared types for register access

use serde::{Deserialize, Serialize};

use crate::protocol::VENDOR_ID;

/// Snapshot of HIDIOCGDEVINFO. Never cached; read fresh on every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub vendor: u16,
    pub product: u16,
    pub version: u16,
    pub busnum: u32,
    pub devnum: u32,
    pub ifnum: u32,
}

/// Result of checking a handle against the TigerJet vendor ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Identity {
    #[serde(rename = "tigerjet")]
    TigerJet { product_id: u16 },
    Other { vendor_id: u16, product_id: u16 },
}

impl Identity {
    pub fn from_info(info: &DeviceInfo) -> Self {
        if info.vendor == VENDOR_ID {
            Identity::TigerJet {
                product_id: info.product,
            }
        } else {
            Identity::Other {
                vendor_id: info.vendor,
                product_id: info.product,
            }
        }
    }

    pub fn is_tigerjet(&self) -> bool {
        matches!(self, Identity::TigerJet { .. })
    }

    /// Product ID, only reported for TigerJet devices
    pub fn product_id(&self) -> Option<u16> {
        match *self {
            Identity::TigerJet { product_id } => Some(product_id),
            Identity::Other { .. } => None,
        }
    }
}
