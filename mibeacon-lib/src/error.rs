use thiserror::Error;

use crate::measurement::DataPointType;

/// Errors from the advertisement header classifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("service data entry is not under UUID 0xFE95")]
    ServiceUuidMismatch,

    #[error("service data too short: {actual} bytes, need at least 14")]
    TooShort { actual: usize },

    #[error("frame control word has no data flag")]
    NoData,

    #[error("unknown device signature 0x{sensor_type:04X}")]
    UnknownDevice { sensor_type: u16 },
}

/// Errors from authenticated payload decryption.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("encrypted frame has wrong size: {actual} bytes, expected 22 or 23")]
    WrongSize { actual: usize },

    #[error("frame is not flagged as encrypted")]
    NotEncrypted,

    #[error("no bindkey provisioned for this device")]
    MissingKey,

    #[error("authenticated decryption failed")]
    AuthFailed,
}

/// Errors from the data-point decoder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("data point truncated: frame is {actual} bytes, need {needed}")]
    Truncated { needed: usize, actual: usize },

    #[error("declared data point length {declared} out of range [1, 4]")]
    LengthOutOfRange { declared: u8 },

    #[error("unknown data point type 0x{data_type:02X}")]
    UnknownType { data_type: u8 },

    #[error("{data_type} data point declares {declared} bytes, expected {expected}")]
    LengthMismatch {
        data_type: DataPointType,
        declared: u8,
        expected: u8,
    },
}

/// Any failure along the classify → decrypt → decode pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BeaconError {
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}
