//! FA-link common header.
//!
//! Every frame starts with the same 64-byte header. All multi-byte fields
//! are big-endian.
//!
//! ```text
//! offset  size  field
//!      0     4  frame type tag ("FACN")
//!      4     4  total frame length (TFL)
//!      8     4  source address (SA)
//!     12     4  destination address (DA)
//!     16     4  version sequence (V_SEQ)
//!     20     4  sequence (SEQ)
//!     24     4  control flags (M_CTL)
//!     28     2  upper layer size (ULS)
//!     30     2  message size (M_SZ)
//!     32     4  message address (M_ADD)
//!     36     1  message format (MFT)
//!     37     1  message related (M_RLT)
//!     38     2  reserved
//!     40     2  type code (TCD)
//!     42     2  protocol version (VER)
//!     44     2  common address 1 (C_AD1)
//!     46     2  common size 1 (C_SZ1)
//!     48     2  common address 2 (C_AD2)
//!     50     2  common size 2 (C_SZ2)
//!     52     2  mode flags (MODE)
//!     54     1  processing type (P_TYPE)
//!     55     1  priority (PRI)
//!     56     1  current block number (CBN)
//!     57     1  total block number (TBN)
//!     58     2  frame byte size (BSIZE)
//!     60     1  link status (LKS)
//!     61     1  token watchdog (TW)
//!     62     2  refresh cycle time (RCT)
//! ```

use crate::codec::{check_capacity, WireFormat};
use crate::error::{ensure_parse_len, FrameError};
use crate::flags::{node_address, node_number, ControlFlags, ModeFlags};
use crate::tcd::TransactionCode;
use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

/// Frame type tag carried by every frame: "FACN".
pub const FRAME_TYPE_TAG: [u8; 4] = *b"FACN";

/// Size of the common header in bytes.
pub const HEADER_SIZE: usize = 64;

/// Offset of the type code field.
pub const TYPE_CODE_OFFSET: usize = 40;

/// Default processing type.
pub const DEFAULT_PROCESSING_TYPE: u8 = 0x80;

/// Default token watchdog value.
pub const DEFAULT_TOKEN_WATCHDOG: u8 = 0x32;

/// The 64-byte common header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub frame_type_tag: [u8; 4],
    pub total_frame_length: u32,
    pub source_address: u32,
    pub destination_address: u32,
    pub version_sequence: u32,
    pub sequence: u32,
    pub control: ControlFlags,
    pub upper_layer_size: u16,
    pub message_size: u16,
    pub message_address: u32,
    pub message_format: u8,
    pub message_related: u8,
    pub reserved: u16,
    pub type_code: u16,
    pub protocol_version: u16,
    pub common_address1: u16,
    pub common_size1: u16,
    pub common_address2: u16,
    pub common_size2: u16,
    pub mode: ModeFlags,
    pub processing_type: u8,
    pub priority: u8,
    pub current_block_number: u8,
    pub total_block_number: u8,
    pub frame_byte_size: u16,
    pub link_status: u8,
    pub token_watchdog: u8,
    pub refresh_cycle_time: u16,
}

impl Header {
    /// Creates a header with the default field values for a frame of the
    /// given type travelling between two nodes.
    ///
    /// The length fields start at [`HEADER_SIZE`]; variant constructors
    /// widen them with [`with_frame_length`](Self::with_frame_length).
    pub fn new(type_code: TransactionCode, source_node: u8, destination_node: u8) -> Self {
        Self {
            frame_type_tag: FRAME_TYPE_TAG,
            total_frame_length: HEADER_SIZE as u32,
            source_address: node_address(source_node),
            destination_address: node_address(destination_node),
            version_sequence: 0,
            sequence: 0,
            control: ControlFlags::default(),
            upper_layer_size: 0,
            message_size: 0,
            message_address: 0,
            message_format: 0,
            message_related: 0,
            reserved: 0,
            type_code: type_code.code(),
            protocol_version: 0,
            common_address1: 0,
            common_size1: 0,
            common_address2: 0,
            common_size2: 0,
            mode: ModeFlags::default(),
            processing_type: DEFAULT_PROCESSING_TYPE,
            priority: 0,
            current_block_number: 1,
            total_block_number: 1,
            frame_byte_size: HEADER_SIZE as u16,
            link_status: 0,
            token_watchdog: DEFAULT_TOKEN_WATCHDOG,
            refresh_cycle_time: 0,
        }
    }

    /// Sets both length fields to `len`.
    pub fn with_frame_length(mut self, len: u16) -> Self {
        self.total_frame_length = u32::from(len);
        self.frame_byte_size = len;
        self
    }

    pub fn with_sequence(mut self, version_sequence: u32, sequence: u32) -> Self {
        self.version_sequence = version_sequence;
        self.sequence = sequence;
        self
    }

    pub fn with_control(mut self, control: ControlFlags) -> Self {
        self.control = control;
        self
    }

    pub fn with_mode(mut self, mode: ModeFlags) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_common_areas(
        mut self,
        address1: u16,
        size1: u16,
        address2: u16,
        size2: u16,
    ) -> Self {
        self.common_address1 = address1;
        self.common_size1 = size1;
        self.common_address2 = address2;
        self.common_size2 = size2;
        self
    }

    pub fn source_node(&self) -> u8 {
        node_number(self.source_address)
    }

    pub fn destination_node(&self) -> u8 {
        node_number(self.destination_address)
    }

    /// Returns the type code as a known transaction code, if it is one.
    pub fn transaction_code(&self) -> Option<TransactionCode> {
        TransactionCode::try_from(self.type_code).ok()
    }

    /// Reads the type code of an encoded frame without decoding the rest.
    pub fn peek_type_code(buf: &[u8]) -> Result<u16, FrameError> {
        ensure_parse_len(buf, HEADER_SIZE)?;
        Ok(u16::from_be_bytes([
            buf[TYPE_CODE_OFFSET],
            buf[TYPE_CODE_OFFSET + 1],
        ]))
    }
}

impl WireFormat for Header {
    fn encoded_len(&self) -> usize {
        HEADER_SIZE
    }

    fn encode_to(&self, buf: &mut [u8]) -> Result<usize, FrameError> {
        let len = check_capacity(self, buf)?;
        let mut out = &mut buf[..len];

        out.put_slice(&self.frame_type_tag);
        out.put_u32(self.total_frame_length);
        out.put_u32(self.source_address);
        out.put_u32(self.destination_address);
        out.put_u32(self.version_sequence);
        out.put_u32(self.sequence);
        out.put_u32(self.control.to_bits());
        out.put_u16(self.upper_layer_size);
        out.put_u16(self.message_size);
        out.put_u32(self.message_address);
        out.put_u8(self.message_format);
        out.put_u8(self.message_related);
        out.put_u16(self.reserved);
        out.put_u16(self.type_code);
        out.put_u16(self.protocol_version);
        out.put_u16(self.common_address1);
        out.put_u16(self.common_size1);
        out.put_u16(self.common_address2);
        out.put_u16(self.common_size2);
        out.put_u16(self.mode.to_bits());
        out.put_u8(self.processing_type);
        out.put_u8(self.priority);
        out.put_u8(self.current_block_number);
        out.put_u8(self.total_block_number);
        out.put_u16(self.frame_byte_size);
        out.put_u8(self.link_status);
        out.put_u8(self.token_watchdog);
        out.put_u16(self.refresh_cycle_time);

        debug_assert!(out.is_empty());
        Ok(len)
    }

    fn decode(buf: &[u8]) -> Result<Self, FrameError> {
        ensure_parse_len(buf, HEADER_SIZE)?;
        let mut src = &buf[..HEADER_SIZE];

        let mut frame_type_tag = [0u8; 4];
        src.copy_to_slice(&mut frame_type_tag);

        // Field order matches the offset table; each read advances `src`.
        let header = Header {
            frame_type_tag,
            total_frame_length: src.get_u32(),
            source_address: src.get_u32(),
            destination_address: src.get_u32(),
            version_sequence: src.get_u32(),
            sequence: src.get_u32(),
            control: ControlFlags::from_bits(src.get_u32()),
            upper_layer_size: src.get_u16(),
            message_size: src.get_u16(),
            message_address: src.get_u32(),
            message_format: src.get_u8(),
            message_related: src.get_u8(),
            reserved: src.get_u16(),
            type_code: src.get_u16(),
            protocol_version: src.get_u16(),
            common_address1: src.get_u16(),
            common_size1: src.get_u16(),
            common_address2: src.get_u16(),
            common_size2: src.get_u16(),
            mode: ModeFlags::from_bits(src.get_u16()),
            processing_type: src.get_u8(),
            priority: src.get_u8(),
            current_block_number: src.get_u8(),
            total_block_number: src.get_u8(),
            frame_byte_size: src.get_u16(),
            link_status: src.get_u8(),
            token_watchdog: src.get_u8(),
            refresh_cycle_time: src.get_u16(),
        };

        debug_assert!(!src.has_remaining());
        Ok(header)
    }
}
