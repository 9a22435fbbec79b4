use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Register log errors
    #[error("Unsupported register log magic: 0x{0:08x}")]
    InvalidMagic(u32),

    #[error("Unsupported register log: {0}")]
    UnsupportedFormat(String),

    #[error("Register data size {size} is not a multiple of {registers} registers")]
    BadRegisterDataSize { size: usize, registers: usize },

    #[error("Register {register} frame {frame} value 0x{value:02x} uses bits 6-7 needed for the mixer fold")]
    VolumeHighBits { register: usize, frame: usize, value: u8 },

    // Encoding errors
    #[error("{what} {value} exceeds encodable maximum {max}")]
    EncodingOverflow { what: &'static str, value: u64, max: u64 },

    #[error("Match with zero offset cannot be encoded")]
    ZeroOffset,

    #[error("Token stream covers {found} bytes, input has {expected}")]
    TokenCoverage { expected: usize, found: usize },

    // Decoding errors
    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Decoded match offset of zero")]
    InvalidOffset,

    #[error("Back-reference offset {offset} exceeds available output {available}")]
    InvalidBackReference { offset: u32, available: usize },

    // Container errors
    #[error("Invalid container: {0}")]
    InvalidContainer(String),

    #[error("Round-trip verification failed for channel {channel}")]
    VerifyMismatch { channel: usize },

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
