//! Frame variants.
//!
//! Every variant owns its own [`Header`] plus an optional body:
//!
//! ```text
//! Token                 | header (64)                                        |
//! Trigger /             | header (64) | node (10) | vendor (10) | manuf (10) | rsvd (2) |
//!   ParticipationRequest
//! Cyclic                | header (64) | data (TFL - 64)                      |
//! ```

use crate::codec::{check_capacity, WireFormat};
use crate::error::{ensure_parse_len, FrameError};
use crate::flags::{ControlFlags, ModeFlags};
use crate::header::{Header, HEADER_SIZE};
use crate::tcd::TransactionCode;
use bytes::{Buf, BufMut, Bytes};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of each identity string in a participation frame.
pub const NAME_LEN: usize = 10;

/// Total length of a participation-style frame (64 + 3 * 10 + 2).
pub const PARTICIPATION_FRAME_SIZE: usize = HEADER_SIZE + 3 * NAME_LEN + 2;

/// Largest cyclic payload whose frame length still fits the 16-bit byte size.
pub const MAX_CYCLIC_DATA: usize = u16::MAX as usize - HEADER_SIZE;

const NAME_PAD: u8 = b' ';

/// Discriminant of a [`Frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    Token,
    Trigger,
    ParticipationRequest,
    Cyclic,
}

impl FrameKind {
    pub fn transaction_code(self) -> TransactionCode {
        match self {
            FrameKind::Token => TransactionCode::Token,
            FrameKind::Trigger => TransactionCode::Trigger,
            FrameKind::ParticipationRequest => TransactionCode::ParticipationRequest,
            FrameKind::Cyclic => TransactionCode::Cyclic,
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameKind::Token => write!(f, "token"),
            FrameKind::Trigger => write!(f, "trigger"),
            FrameKind::ParticipationRequest => write!(f, "participation request"),
            FrameKind::Cyclic => write!(f, "cyclic"),
        }
    }
}

/// Token frame: passes the transmission right. Header only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub header: Header,
}

impl Token {
    pub fn new(source_node: u8, destination_node: u8) -> Self {
        Self {
            header: Header::new(TransactionCode::Token, source_node, destination_node)
                .with_frame_length(HEADER_SIZE as u16),
        }
    }

    pub fn with_control(mut self, control: ControlFlags) -> Self {
        self.header.control = control;
        self
    }
}

impl WireFormat for Token {
    fn encoded_len(&self) -> usize {
        HEADER_SIZE
    }

    fn encode_to(&self, buf: &mut [u8]) -> Result<usize, FrameError> {
        self.header.encode_to(buf)
    }

    fn decode(buf: &[u8]) -> Result<Self, FrameError> {
        Ok(Self {
            header: Header::decode(buf)?,
        })
    }
}

/// Participation-style frame shared by trigger and participation request.
///
/// Names are stored exactly as they appear on the wire: space padded to
/// [`NAME_LEN`] bytes. Longer names are truncated when the frame is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipationHeader {
    pub header: Header,
    pub node_name: [u8; NAME_LEN],
    pub vendor_name: [u8; NAME_LEN],
    pub manufacturer_name: [u8; NAME_LEN],
}

impl ParticipationHeader {
    /// Builds a trigger frame.
    pub fn trigger(
        source_node: u8,
        destination_node: u8,
        node_name: &str,
        vendor_name: &str,
        manufacturer_name: &str,
    ) -> Self {
        Self::with_code(
            TransactionCode::Trigger,
            source_node,
            destination_node,
            node_name,
            vendor_name,
            manufacturer_name,
        )
    }

    /// Builds a participation request frame.
    pub fn participation_request(
        source_node: u8,
        destination_node: u8,
        node_name: &str,
        vendor_name: &str,
        manufacturer_name: &str,
    ) -> Self {
        Self::with_code(
            TransactionCode::ParticipationRequest,
            source_node,
            destination_node,
            node_name,
            vendor_name,
            manufacturer_name,
        )
    }

    fn with_code(
        code: TransactionCode,
        source_node: u8,
        destination_node: u8,
        node_name: &str,
        vendor_name: &str,
        manufacturer_name: &str,
    ) -> Self {
        Self {
            header: Header::new(code, source_node, destination_node)
                .with_frame_length(PARTICIPATION_FRAME_SIZE as u16),
            node_name: pad_name(node_name.as_bytes()),
            vendor_name: pad_name(vendor_name.as_bytes()),
            manufacturer_name: pad_name(manufacturer_name.as_bytes()),
        }
    }

    pub fn with_control(mut self, control: ControlFlags) -> Self {
        self.header = self.header.with_control(control);
        self
    }

    pub fn with_mode(mut self, mode: ModeFlags) -> Self {
        self.header = self.header.with_mode(mode);
        self
    }

    pub fn node_name(&self) -> String {
        display_name(&self.node_name)
    }

    pub fn vendor_name(&self) -> String {
        display_name(&self.vendor_name)
    }

    pub fn manufacturer_name(&self) -> String {
        display_name(&self.manufacturer_name)
    }
}

impl WireFormat for ParticipationHeader {
    fn encoded_len(&self) -> usize {
        PARTICIPATION_FRAME_SIZE
    }

    fn encode_to(&self, buf: &mut [u8]) -> Result<usize, FrameError> {
        let len = check_capacity(self, buf)?;
        let (head, body) = buf[..len].split_at_mut(HEADER_SIZE);
        self.header.encode_to(head)?;

        let mut out = body;
        out.put_slice(&self.node_name);
        out.put_slice(&self.vendor_name);
        out.put_slice(&self.manufacturer_name);
        // Reserved trailer is always zero.
        out.put_u16(0);

        Ok(len)
    }

    fn decode(buf: &[u8]) -> Result<Self, FrameError> {
        ensure_parse_len(buf, PARTICIPATION_FRAME_SIZE)?;
        let header = Header::decode(buf)?;

        let mut src = &buf[HEADER_SIZE..PARTICIPATION_FRAME_SIZE];
        let mut node_name = [0u8; NAME_LEN];
        let mut vendor_name = [0u8; NAME_LEN];
        let mut manufacturer_name = [0u8; NAME_LEN];
        src.copy_to_slice(&mut node_name);
        src.copy_to_slice(&mut vendor_name);
        src.copy_to_slice(&mut manufacturer_name);

        Ok(Self {
            header,
            node_name,
            vendor_name,
            manufacturer_name,
        })
    }
}

/// Right-pads with spaces to [`NAME_LEN`], truncating longer input.
pub fn pad_name(name: &[u8]) -> [u8; NAME_LEN] {
    let mut field = [NAME_PAD; NAME_LEN];
    let n = name.len().min(NAME_LEN);
    field[..n].copy_from_slice(&name[..n]);
    field
}

fn display_name(field: &[u8; NAME_LEN]) -> String {
    let end = field
        .iter()
        .rposition(|&b| b != NAME_PAD)
        .map_or(0, |i| i + 1);
    String::from_utf8_lossy(&field[..end]).into_owned()
}

/// Cyclic data frame.
///
/// On decode, every byte after the header becomes `data`, copied into an
/// owned buffer. Trailing bytes past the logical frame are therefore kept;
/// compare `data.len()` with `header.frame_byte_size` to detect them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cyclic {
    pub header: Header,
    pub data: Bytes,
}

impl Cyclic {
    /// Builds a cyclic frame carrying `data`, setting both length fields.
    pub fn new(
        source_node: u8,
        destination_node: u8,
        data: impl Into<Bytes>,
    ) -> Result<Self, FrameError> {
        let data = data.into();
        if data.len() > MAX_CYCLIC_DATA {
            return Err(FrameError::PayloadTooLarge {
                size: data.len(),
                max: MAX_CYCLIC_DATA,
            });
        }

        let frame_len = (HEADER_SIZE + data.len()) as u16;
        Ok(Self {
            header: Header::new(TransactionCode::Cyclic, source_node, destination_node)
                .with_frame_length(frame_len),
            data,
        })
    }

    pub fn with_common_areas(
        mut self,
        address1: u16,
        size1: u16,
        address2: u16,
        size2: u16,
    ) -> Self {
        self.header = self
            .header
            .with_common_areas(address1, size1, address2, size2);
        self
    }

    pub fn with_control(mut self, control: ControlFlags) -> Self {
        self.header = self.header.with_control(control);
        self
    }

    pub fn with_mode(mut self, mode: ModeFlags) -> Self {
        self.header = self.header.with_mode(mode);
        self
    }

    pub fn with_sequence(mut self, version_sequence: u32, sequence: u32) -> Self {
        self.header = self.header.with_sequence(version_sequence, sequence);
        self
    }

    /// Returns whether the payload length disagrees with the byte size field.
    pub fn has_length_mismatch(&self) -> bool {
        HEADER_SIZE + self.data.len() != usize::from(self.header.frame_byte_size)
    }
}

impl WireFormat for Cyclic {
    fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.data.len()
    }

    fn encode_to(&self, buf: &mut [u8]) -> Result<usize, FrameError> {
        let len = check_capacity(self, buf)?;
        let (head, body) = buf[..len].split_at_mut(HEADER_SIZE);
        self.header.encode_to(head)?;
        body.copy_from_slice(&self.data);
        Ok(len)
    }

    fn decode(buf: &[u8]) -> Result<Self, FrameError> {
        let header = Header::decode(buf)?;
        Ok(Self {
            header,
            data: Bytes::copy_from_slice(&buf[HEADER_SIZE..]),
        })
    }
}

/// A decoded frame of any supported variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Frame {
    Token(Token),
    Trigger(ParticipationHeader),
    ParticipationRequest(ParticipationHeader),
    Cyclic(Cyclic),
}

impl Frame {
    pub fn kind(&self) -> FrameKind {
        match self {
            Frame::Token(_) => FrameKind::Token,
            Frame::Trigger(_) => FrameKind::Trigger,
            Frame::ParticipationRequest(_) => FrameKind::ParticipationRequest,
            Frame::Cyclic(_) => FrameKind::Cyclic,
        }
    }

    pub fn header(&self) -> &Header {
        match self {
            Frame::Token(t) => &t.header,
            Frame::Trigger(p) | Frame::ParticipationRequest(p) => &p.header,
            Frame::Cyclic(c) => &c.header,
        }
    }
}

impl WireFormat for Frame {
    fn encoded_len(&self) -> usize {
        match self {
            Frame::Token(t) => t.encoded_len(),
            Frame::Trigger(p) | Frame::ParticipationRequest(p) => p.encoded_len(),
            Frame::Cyclic(c) => c.encoded_len(),
        }
    }

    fn encode_to(&self, buf: &mut [u8]) -> Result<usize, FrameError> {
        match self {
            Frame::Token(t) => t.encode_to(buf),
            Frame::Trigger(p) | Frame::ParticipationRequest(p) => p.encode_to(buf),
            Frame::Cyclic(c) => c.encode_to(buf),
        }
    }

    fn decode(buf: &[u8]) -> Result<Self, FrameError> {
        crate::dispatch::parse(buf)
    }
}

impl From<Token> for Frame {
    fn from(token: Token) -> Self {
        Frame::Token(token)
    }
}

impl From<Cyclic> for Frame {
    fn from(cyclic: Cyclic) -> Self {
        Frame::Cyclic(cyclic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_end_to_end() {
        let token = Token::new(0x01, 0x55);
        let bytes = token.encode().unwrap();

        assert_eq!(bytes.len(), 64);
        assert_eq!(&bytes[4..8], &[0x00, 0x00, 0x00, 0x40]);
        assert_eq!(&bytes[8..12], &[0x00, 0x01, 0x00, 0x01]);
        assert_eq!(&bytes[12..16], &[0x00, 0x01, 0x00, 0x55]);
        assert_eq!(&bytes[40..42], &[0xfd, 0xe8]);

        assert_eq!(Token::decode(&bytes).unwrap(), token);
    }

    #[test]
    fn test_token_control_flags() {
        let cases = [(false, false), (true, false), (false, true), (true, true)];
        for (holder, participating) in cases {
            let token = Token::new(1, 2).with_control(ControlFlags::new(holder, participating));
            let bytes = token.encode().unwrap();
            let mctl = u32::from_be_bytes([bytes[24], bytes[25], bytes[26], bytes[27]]);

            assert_eq!(mctl >> 31 == 1, holder);
            assert_eq!((mctl >> 30) & 1 == 1, participating);
            assert_eq!(mctl & 0x3FFF_FFFF, 0);
        }
    }

    #[test]
    fn test_token_decode_boundary() {
        assert!(matches!(
            Token::decode(&[0u8; 63]),
            Err(FrameError::TooShortToParse { .. })
        ));
        assert!(Token::decode(&[0u8; 64]).is_ok());
    }

    #[test]
    fn test_pad_name() {
        assert_eq!(&pad_name(b"NODE"), b"NODE      ");
        assert_eq!(&pad_name(b"0123456789"), b"0123456789");
        assert_eq!(&pad_name(b"0123456789ABC"), b"0123456789");
        assert_eq!(&pad_name(b""), b"          ");
    }

    #[test]
    fn test_trigger_layout() {
        let trigger = ParticipationHeader::trigger(1, 0xff, "NODE", "VENDOR", "MANUF.");
        let bytes = trigger.encode().unwrap();

        assert_eq!(bytes.len(), 96);
        assert_eq!(&bytes[4..8], &[0x00, 0x00, 0x00, 0x60]);
        assert_eq!(&bytes[40..42], &[0xfd, 0xf4]);
        assert_eq!(&bytes[58..60], &[0x00, 0x60]);
        assert_eq!(&bytes[64..74], b"NODE      ");
        assert_eq!(&bytes[74..84], b"VENDOR    ");
        assert_eq!(&bytes[84..94], b"MANUF.    ");
        assert_eq!(&bytes[94..96], &[0x00, 0x00]);

        assert_eq!(ParticipationHeader::decode(&bytes).unwrap(), trigger);
    }

    #[test]
    fn test_participation_request_code() {
        let request = ParticipationHeader::participation_request(2, 0xff, "A", "B", "C");
        let bytes = request.encode().unwrap();

        assert_eq!(bytes.len(), 96);
        assert_eq!(&bytes[40..42], &65002u16.to_be_bytes());
    }

    #[test]
    fn test_long_names_truncated() {
        let trigger =
            ParticipationHeader::trigger(1, 2, "NODE-NAME-TOO-LONG", "0123456789", "X");
        let bytes = trigger.encode().unwrap();

        assert_eq!(&bytes[64..74], b"NODE-NAME-");
        assert_eq!(&bytes[74..84], b"0123456789");
        assert_eq!(&bytes[84..94], b"X         ");
        assert_eq!(trigger.node_name(), "NODE-NAME-");
        assert_eq!(trigger.manufacturer_name(), "X");
    }

    #[test]
    fn test_participation_decode_keeps_bytes_verbatim() {
        let mut bytes = ParticipationHeader::trigger(1, 2, "A", "B", "C")
            .encode()
            .unwrap();
        bytes[64..74].copy_from_slice(b"AB\0\0CD    ");

        let decoded = ParticipationHeader::decode(&bytes).unwrap();
        assert_eq!(&decoded.node_name, b"AB\0\0CD    ");
        assert_eq!(&decoded.encode().unwrap()[..], &bytes[..]);
    }

    #[test]
    fn test_participation_reserved_not_round_tripped() {
        let mut bytes = ParticipationHeader::trigger(1, 2, "A", "B", "C")
            .encode()
            .unwrap();
        bytes[94] = 0xAB;
        bytes[95] = 0xCD;

        let decoded = ParticipationHeader::decode(&bytes).unwrap();
        let reencoded = decoded.encode().unwrap();
        assert_eq!(&reencoded[94..96], &[0x00, 0x00]);
    }

    #[test]
    fn test_participation_decode_too_short() {
        let bytes = ParticipationHeader::trigger(1, 2, "A", "B", "C")
            .encode()
            .unwrap();

        for len in [63, 64, 95] {
            let result = ParticipationHeader::decode(&bytes[..len]);
            assert!(matches!(
                result,
                Err(FrameError::TooShortToParse { needed: 96, .. })
            ));
        }
    }

    #[test]
    fn test_participation_encode_to_short_buffer() {
        let trigger = ParticipationHeader::trigger(1, 2, "A", "B", "C");
        let mut buf = [0x11u8; 95];

        assert!(matches!(
            trigger.encode_to(&mut buf),
            Err(FrameError::TooShortToMarshalBinary {
                needed: 96,
                actual: 95
            })
        ));
        assert!(buf.iter().all(|&b| b == 0x11));
    }

    #[test]
    fn test_cyclic_lengths() {
        let cyclic = Cyclic::new(0x55, 0x01, vec![0xA5u8; 136]).unwrap();
        assert_eq!(cyclic.header.total_frame_length, 200);
        assert_eq!(cyclic.header.frame_byte_size, 200);
        assert!(!cyclic.has_length_mismatch());

        let bytes = cyclic.encode().unwrap();
        assert_eq!(bytes.len(), 200);
        assert_eq!(&bytes[40..42], &[0xfd, 0xe9]);
        assert!(bytes[64..].iter().all(|&b| b == 0xA5));
    }

    #[test]
    fn test_cyclic_empty() {
        let cyclic = Cyclic::new(1, 2, Bytes::new()).unwrap();
        let bytes = cyclic.encode().unwrap();

        assert_eq!(bytes.len(), 64);
        let decoded = Cyclic::decode(&bytes).unwrap();
        assert!(decoded.data.is_empty());
        assert_eq!(decoded, cyclic);
    }

    #[test]
    fn test_cyclic_decode_takes_remainder() {
        let cyclic = Cyclic::new(1, 2, vec![1u8, 2, 3, 4]).unwrap();
        let mut bytes = cyclic.encode().unwrap().to_vec();
        bytes.extend_from_slice(&[9, 9]);

        let decoded = Cyclic::decode(&bytes).unwrap();
        assert_eq!(&decoded.data[..], &[1, 2, 3, 4, 9, 9]);
        assert!(decoded.has_length_mismatch());
    }

    #[test]
    fn test_cyclic_payload_too_large() {
        let result = Cyclic::new(1, 2, vec![0u8; MAX_CYCLIC_DATA + 1]);
        assert!(matches!(result, Err(FrameError::PayloadTooLarge { .. })));

        let cyclic = Cyclic::new(1, 2, vec![0u8; MAX_CYCLIC_DATA]).unwrap();
        assert_eq!(cyclic.header.frame_byte_size, u16::MAX);
    }

    #[test]
    fn test_cyclic_common_areas() {
        let cyclic = Cyclic::new(0x55, 0x01, vec![0u8; 8])
            .unwrap()
            .with_common_areas(4, 4, 64, 64)
            .with_sequence(0x0c466d, 0);
        let bytes = cyclic.encode().unwrap();

        assert_eq!(&bytes[16..20], &[0x00, 0x0c, 0x46, 0x6d]);
        assert_eq!(&bytes[44..52], &[0, 4, 0, 4, 0, 64, 0, 64]);
    }

    #[test]
    fn test_participation_control_and_mode() {
        let trigger = ParticipationHeader::trigger(0x01, 0xff, "NODE", "VENDOR", "MANUF.")
            .with_control(ControlFlags::new(false, true))
            .with_mode(ModeFlags::new(0x02, 3, false));
        let bytes = trigger.encode().unwrap();

        assert_eq!(&bytes[24..28], &[0x40, 0x00, 0x00, 0x00]);
        assert_eq!(&bytes[52..54], &[0x02, 0x30]);
        assert_eq!(bytes.len(), PARTICIPATION_FRAME_SIZE);

        let decoded = ParticipationHeader::decode(&bytes).unwrap();
        assert!(decoded.header.control.participating);
        assert!(!decoded.header.control.token_holder);
        assert_eq!(decoded.header.mode, ModeFlags::new(0x02, 3, false));
    }

    #[test]
    fn test_cyclic_control_and_mode() {
        let cyclic = Cyclic::new(0x55, 0x01, vec![0xAAu8; 4])
            .unwrap()
            .with_control(ControlFlags::new(true, false))
            .with_mode(ModeFlags::new(0, 3, false));
        let bytes = cyclic.encode().unwrap();

        assert_eq!(&bytes[24..28], &[0x80, 0x00, 0x00, 0x00]);
        assert_eq!(&bytes[52..54], &[0x00, 0x30]);
        assert_eq!(&bytes[64..], &[0xAA; 4]);
        assert_eq!(Cyclic::decode(&bytes).unwrap(), cyclic);
    }

    #[test]
    fn test_frame_accessors() {
        let frame = Frame::from(Token::new(1, 2));
        assert_eq!(frame.kind(), FrameKind::Token);
        assert_eq!(frame.header().source_node(), 1);
        assert_eq!(frame.encoded_len(), 64);

        let frame = Frame::Trigger(ParticipationHeader::trigger(1, 2, "A", "B", "C"));
        assert_eq!(frame.kind().transaction_code(), TransactionCode::Trigger);
        assert_eq!(frame.encoded_len(), 96);
    }

    #[test]
    fn test_frame_serializes_with_kind_tag() {
        let frame = Frame::from(Token::new(1, 2));
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["kind"], "token");
        assert_eq!(json["header"]["type_code"], 65000);
    }
}
