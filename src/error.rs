use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum StreamError {
    #[error("Buffer full: {needed} bytes needed, {available} available")]
    BufferFull { needed: usize, available: usize } = 1,
    #[error("Decoder destroyed")]
    Destroyed = 2,

    // Logic errors
    #[error("Invalid bit count {0} (at most 32 bits per read)")]
    InvalidBitCount(u32) = 100,
    #[error("Invalid buffer mode {0}")]
    InvalidBufferMode(u8) = 101,
    #[error("Invalid argument capacity")]
    InvalidArgumentCapacity = 102,
}

pub type Result<T> = std::result::Result<T, StreamError>;
