//! Type-code dispatch for inbound frames.

use crate::codec::WireFormat;
use crate::error::FrameError;
use crate::frame::{Cyclic, Frame, FrameKind, ParticipationHeader, Token};
use crate::header::Header;
use crate::tcd::TransactionCode;

/// Parses a raw buffer into the frame variant named by its type code.
///
/// Only token, cyclic, participation request and trigger frames are
/// supported; any other type code, known or not, fails with
/// [`FrameError::NotImplemented`]. Errors from the variant decoder are
/// wrapped in [`FrameError::Dispatch`].
pub fn parse(buf: &[u8]) -> Result<Frame, FrameError> {
    let type_code = Header::peek_type_code(buf)?;
    tracing::trace!(type_code, len = buf.len(), "dispatching frame");

    let kind = match kind_for(type_code) {
        Some(kind) => kind,
        None => {
            tracing::debug!(type_code, "unsupported frame type code");
            return Err(FrameError::NotImplemented(type_code));
        }
    };

    decode_as(kind, buf).map_err(|e| FrameError::dispatch(kind, e))
}

/// Maps a type code to the variant that decodes it.
pub fn kind_for(type_code: u16) -> Option<FrameKind> {
    match TransactionCode::try_from(type_code).ok()? {
        TransactionCode::Token => Some(FrameKind::Token),
        TransactionCode::Cyclic => Some(FrameKind::Cyclic),
        TransactionCode::ParticipationRequest => Some(FrameKind::ParticipationRequest),
        TransactionCode::Trigger => Some(FrameKind::Trigger),
        _ => None,
    }
}

fn decode_as(kind: FrameKind, buf: &[u8]) -> Result<Frame, FrameError> {
    Ok(match kind {
        FrameKind::Token => Frame::Token(Token::decode(buf)?),
        FrameKind::Trigger => Frame::Trigger(ParticipationHeader::decode(buf)?),
        FrameKind::ParticipationRequest => {
            Frame::ParticipationRequest(ParticipationHeader::decode(buf)?)
        }
        FrameKind::Cyclic => Frame::Cyclic(Cyclic::decode(buf)?),
    })
}
