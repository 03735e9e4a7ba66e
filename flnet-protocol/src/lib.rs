//! # flnet-protocol
//!
//! Frame codec for the FA-link (FL-net) factory-automation link layer.
//!
//! This crate provides:
//! - The 64-byte big-endian common header and its bit-packed sub-fields
//! - Token, trigger, participation request and cyclic frame variants
//! - Type-code dispatch from raw bytes to the matching variant
//!
//! The codec performs no I/O and holds no state. Sockets, token rotation
//! timing and retransmission belong to the caller.
//!
//! ```
//! use flnet_protocol::{parse, Frame, Token, WireFormat};
//!
//! let token = Token::new(0x01, 0x55);
//! let bytes = token.encode()?;
//! assert_eq!(bytes.len(), 64);
//!
//! let frame = parse(&bytes)?;
//! assert_eq!(frame, Frame::Token(token));
//! # Ok::<(), flnet_protocol::FrameError>(())
//! ```

pub mod codec;
pub mod dispatch;
pub mod error;
pub mod flags;
pub mod frame;
pub mod header;
pub mod tcd;

pub use codec::WireFormat;
pub use dispatch::parse;
pub use error::FrameError;
pub use flags::{node_address, node_number, ControlFlags, ModeFlags, NODE_ADDRESS_PREFIX};
pub use frame::{
    Cyclic, Frame, FrameKind, ParticipationHeader, Token, MAX_CYCLIC_DATA, NAME_LEN,
    PARTICIPATION_FRAME_SIZE,
};
pub use header::{Header, FRAME_TYPE_TAG, HEADER_SIZE};
pub use tcd::TransactionCode;

/// Major protocol version written into the mode word by default.
pub const PROTOCOL_MAJOR_VERSION: u8 = 3;
