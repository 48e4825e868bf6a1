use crate::BufferMode;
use crate::constants::DEFAULT_CAPACITY_BYTES;
use crate::error::{Result, StreamError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferOptions {
    pub initial_capacity_bytes: usize,
    pub mode: BufferMode,
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self {
            initial_capacity_bytes: DEFAULT_CAPACITY_BYTES,
            mode: BufferMode::Expand,
        }
    }
}

impl BufferOptions {
    pub fn new(initial_capacity_bytes: usize, mode: BufferMode) -> Self {
        Self {
            initial_capacity_bytes,
            mode,
        }
    }

    pub fn validate(&self) -> Result<()> {
        // An expanding arena of size zero would never grow past zero when doubled.
        if self.initial_capacity_bytes == 0 {
            return Err(StreamError::InvalidArgumentCapacity);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecoderOptions {
    /// Live, unseekable source: no timestamp bookkeeping at all.
    pub streaming: bool,
    pub buffer: BufferOptions,
}

impl DecoderOptions {
    pub fn streaming() -> Self {
        Self {
            streaming: true,
            ..Self::default()
        }
    }

    pub fn with_buffer(mut self, buffer: BufferOptions) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.buffer.validate()
    }
}
