//! FL-net transaction codes (TCD).
//!
//! The type code at header offset 40 selects the frame variant. Codes are
//! allocated from 65000 upward.

use crate::error::FrameError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base of the transaction code range.
pub const TCD_BASE: u16 = 65000;

/// Known transaction codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u16)]
pub enum TransactionCode {
    Token = TCD_BASE,
    Cyclic = TCD_BASE + 1,
    ParticipationRequest = TCD_BASE + 2,
    ByteBlockReadRequest = TCD_BASE + 3,
    ByteBlockWriteRequest = TCD_BASE + 4,
    WordBlockReadRequest = TCD_BASE + 5,
    WordBlockWriteRequest = TCD_BASE + 6,
    NetworkParameterReadRequest = TCD_BASE + 7,
    NetworkParameterWriteRequest = TCD_BASE + 8,
    StopCommandRequest = TCD_BASE + 9,
    OperationCommandRequest = TCD_BASE + 10,
    ProfileReadRequest = TCD_BASE + 11,
    Trigger = TCD_BASE + 12,
    LogDataReadRequest = TCD_BASE + 13,
    LogDataClearRequest = TCD_BASE + 14,
    MessageReturnRequest = TCD_BASE + 15,
}

impl TransactionCode {
    /// Every known code, in numeric order.
    pub const ALL: [TransactionCode; 16] = [
        TransactionCode::Token,
        TransactionCode::Cyclic,
        TransactionCode::ParticipationRequest,
        TransactionCode::ByteBlockReadRequest,
        TransactionCode::ByteBlockWriteRequest,
        TransactionCode::WordBlockReadRequest,
        TransactionCode::WordBlockWriteRequest,
        TransactionCode::NetworkParameterReadRequest,
        TransactionCode::NetworkParameterWriteRequest,
        TransactionCode::StopCommandRequest,
        TransactionCode::OperationCommandRequest,
        TransactionCode::ProfileReadRequest,
        TransactionCode::Trigger,
        TransactionCode::LogDataReadRequest,
        TransactionCode::LogDataClearRequest,
        TransactionCode::MessageReturnRequest,
    ];

    /// Returns the wire value.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Returns whether the dispatcher can decode frames with this code.
    pub fn is_dispatchable(self) -> bool {
        matches!(
            self,
            TransactionCode::Token
                | TransactionCode::Cyclic
                | TransactionCode::ParticipationRequest
                | TransactionCode::Trigger
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            TransactionCode::Token => "TOKEN",
            TransactionCode::Cyclic => "CYCLIC",
            TransactionCode::ParticipationRequest => "PARTICIPATION_REQUEST",
            TransactionCode::ByteBlockReadRequest => "BYTE_BLOCK_READ_REQUEST",
            TransactionCode::ByteBlockWriteRequest => "BYTE_BLOCK_WRITE_REQUEST",
            TransactionCode::WordBlockReadRequest => "WORD_BLOCK_READ_REQUEST",
            TransactionCode::WordBlockWriteRequest => "WORD_BLOCK_WRITE_REQUEST",
            TransactionCode::NetworkParameterReadRequest => "NETWORK_PARAMETER_READ_REQUEST",
            TransactionCode::NetworkParameterWriteRequest => "NETWORK_PARAMETER_WRITE_REQUEST",
            TransactionCode::StopCommandRequest => "STOP_COMMAND_REQUEST",
            TransactionCode::OperationCommandRequest => "OPERATION_COMMAND_REQUEST",
            TransactionCode::ProfileReadRequest => "PROFILE_READ_REQUEST",
            TransactionCode::Trigger => "TRIGGER",
            TransactionCode::LogDataReadRequest => "LOG_DATA_READ_REQUEST",
            TransactionCode::LogDataClearRequest => "LOG_DATA_CLEAR_REQUEST",
            TransactionCode::MessageReturnRequest => "MESSAGE_RETURN_REQUEST",
        }
    }
}

impl TryFrom<u16> for TransactionCode {
    type Error = FrameError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        value
            .checked_sub(TCD_BASE)
            .and_then(|offset| TransactionCode::ALL.get(offset as usize).copied())
            .ok_or(FrameError::NotImplemented(value))
    }
}

impl From<TransactionCode> for u16 {
    fn from(code: TransactionCode) -> Self {
        code.code()
    }
}

impl fmt::Display for TransactionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
