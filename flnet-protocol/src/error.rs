//! Codec error types.

use crate::frame::FrameKind;
use thiserror::Error;

/// Errors that can occur while encoding, decoding or dispatching frames.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("too short to decode: need {needed} bytes, got {actual}")]
    TooShortToParse { needed: usize, actual: usize },

    #[error("insufficient buffer to serialize into: need {needed} bytes, got {actual}")]
    TooShortToMarshalBinary { needed: usize, actual: usize },

    #[error("type code {0} ({0:#06x}) not implemented")]
    NotImplemented(u16),

    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("failed to decode dispatched {kind} frame: {source}")]
    Dispatch {
        kind: FrameKind,
        #[source]
        source: Box<FrameError>,
    },
}

impl FrameError {
    /// Returns the innermost error, looking through dispatch context.
    pub fn root(&self) -> &FrameError {
        match self {
            FrameError::Dispatch { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns whether the failure was caused by a buffer that was too short.
    pub fn is_too_short(&self) -> bool {
        matches!(
            self.root(),
            FrameError::TooShortToParse { .. } | FrameError::TooShortToMarshalBinary { .. }
        )
    }

    pub(crate) fn dispatch(kind: FrameKind, source: FrameError) -> Self {
        FrameError::Dispatch {
            kind,
            source: Box::new(source),
        }
    }
}

/// Fails with [`FrameError::TooShortToParse`] if `buf` is shorter than `needed`.
pub(crate) fn ensure_parse_len(buf: &[u8], needed: usize) -> Result<(), FrameError> {
    if buf.len() < needed {
        return Err(FrameError::TooShortToParse {
            needed,
            actual: buf.len(),
        });
    }
    Ok(())
}

/// Fails with [`FrameError::TooShortToMarshalBinary`] if `buf` is shorter than `needed`.
pub(crate) fn ensure_marshal_len(buf: &[u8], needed: usize) -> Result<(), FrameError> {
    if buf.len() < needed {
        return Err(FrameError::TooShortToMarshalBinary {
            needed,
            actual: buf.len(),
        });
    }
    Ok(())
}
