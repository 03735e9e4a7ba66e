//! Bit-packed header sub-fields and node addressing.
//!
//! Sub-fields are kept as named values and only packed into their wire word
//! by `to_bits`. Bits without an assigned meaning are carried in `reserved`
//! so captured frames re-encode unchanged.

use serde::{Deserialize, Serialize};

/// Network prefix OR-ed into every source and destination address.
pub const NODE_ADDRESS_PREFIX: u32 = 0x0001_0000;

/// Builds a source or destination address from a node number.
pub fn node_address(node: u8) -> u32 {
    NODE_ADDRESS_PREFIX | u32::from(node)
}

/// Returns the node number carried in the low byte of an address.
pub fn node_number(address: u32) -> u8 {
    (address & 0xFF) as u8
}

/// Message control word (`M_CTL`, header offset 24).
///
/// ```text
///  31   30   29 ........................ 0
/// +----+----+----------------------------+
/// | TH | PP |          reserved          |
/// +----+----+----------------------------+
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlFlags {
    /// Token holder may transmit.
    pub token_holder: bool,
    /// Participation in progress.
    pub participating: bool,
    /// Bits 0-29.
    pub reserved: u32,
}

impl ControlFlags {
    const TOKEN_HOLDER_SHIFT: u32 = 31;
    const PARTICIPATING_SHIFT: u32 = 30;
    const RESERVED_MASK: u32 = (1 << 30) - 1;

    pub fn new(token_holder: bool, participating: bool) -> Self {
        Self {
            token_holder,
            participating,
            reserved: 0,
        }
    }

    pub fn to_bits(&self) -> u32 {
        (u32::from(self.token_holder) << Self::TOKEN_HOLDER_SHIFT)
            | (u32::from(self.participating) << Self::PARTICIPATING_SHIFT)
            | (self.reserved & Self::RESERVED_MASK)
    }

    pub fn from_bits(bits: u32) -> Self {
        Self {
            token_holder: (bits >> Self::TOKEN_HOLDER_SHIFT) & 1 != 0,
            participating: (bits >> Self::PARTICIPATING_SHIFT) & 1 != 0,
            reserved: bits & Self::RESERVED_MASK,
        }
    }
}

/// Mode word (`MODE`, header offset 52).
///
/// ```text
///  15 ........ 8   7 .... 4   3 .. 1    0
/// +-------------+----------+--------+----+
/// |    minor    |  major   |  rsvd  | TM |
/// +-------------+----------+--------+----+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeFlags {
    pub minor_version: u8,
    /// Four bits on the wire.
    pub major_version: u8,
    pub token_mode: bool,
    /// Bits 1-3.
    pub reserved: u8,
}

impl ModeFlags {
    const MINOR_SHIFT: u16 = 8;
    const MAJOR_SHIFT: u16 = 4;
    const MAJOR_MASK: u16 = 0x0F;
    const RESERVED_SHIFT: u16 = 1;
    const RESERVED_MASK: u16 = 0x07;

    pub fn new(minor_version: u8, major_version: u8, token_mode: bool) -> Self {
        Self {
            minor_version,
            major_version,
            token_mode,
            reserved: 0,
        }
    }

    pub fn to_bits(&self) -> u16 {
        (u16::from(self.minor_version) << Self::MINOR_SHIFT)
            | ((u16::from(self.major_version) & Self::MAJOR_MASK) << Self::MAJOR_SHIFT)
            | ((u16::from(self.reserved) & Self::RESERVED_MASK) << Self::RESERVED_SHIFT)
            | u16::from(self.token_mode)
    }

    pub fn from_bits(bits: u16) -> Self {
        Self {
            minor_version: (bits >> Self::MINOR_SHIFT) as u8,
            major_version: ((bits >> Self::MAJOR_SHIFT) & Self::MAJOR_MASK) as u8,
            token_mode: bits & 1 != 0,
            reserved: ((bits >> Self::RESERVED_SHIFT) & Self::RESERVED_MASK) as u8,
        }
    }
}

impl Default for ModeFlags {
    fn default() -> Self {
        Self::new(0, crate::PROTOCOL_MAJOR_VERSION, true)
    }
}
