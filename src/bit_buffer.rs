//! Byte arena read through a bit-granular cursor.
//!
//! Bytes are appended at the tail with [`BitBuffer::write`] and consumed MSB-first
//! with [`BitBuffer::peek`] / [`BitBuffer::read`]. When a write does not fit, the
//! [`BufferMode`] decides what happens: `Expand` grows the arena, `Evict` drops
//! bytes the cursor has already passed.
//!
//! Reads are not bounds checked against the valid data. Callers gate them with
//! [`BitBuffer::has`]; bits read past the end are unspecified.

use crate::BufferMode;
use crate::constants::{BITS_PER_BYTE, MAX_READ_BITS};
use crate::error::{Result, StreamError};
use crate::options::BufferOptions;
use std::cmp::{max, min};

#[derive(Debug, Clone)]
pub struct BitBuffer {
    bytes: Vec<u8>,
    byte_length: usize,
    index: usize,
    mode: BufferMode,
}

impl BitBuffer {
    pub fn new(options: BufferOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::with_capacity(options.initial_capacity_bytes, options.mode))
    }

    pub fn with_capacity(capacity: usize, mode: BufferMode) -> Self {
        Self {
            bytes: vec![0u8; capacity],
            byte_length: 0,
            index: 0,
            mode,
        }
    }

    /// Wraps existing data. The whole slice is valid and the cursor starts at bit 0.
    pub fn from_bytes(data: &[u8], mode: BufferMode) -> Self {
        Self {
            bytes: data.to_vec(),
            byte_length: data.len(),
            index: 0,
            mode,
        }
    }

    pub fn mode(&self) -> BufferMode {
        self.mode
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Number of valid bytes currently held.
    pub fn len(&self) -> usize {
        self.byte_length
    }

    pub fn is_empty(&self) -> bool {
        self.byte_length == 0
    }

    /// Free space at the tail, in bytes.
    pub fn available(&self) -> usize {
        self.bytes.len() - self.byte_length
    }

    /// Read cursor, in bits.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn remaining_bits(&self) -> usize {
        self.bit_length().saturating_sub(self.index)
    }

    pub(crate) fn data(&self) -> &[u8] {
        &self.bytes[..self.byte_length]
    }

    fn bit_length(&self) -> usize {
        self.byte_length * BITS_PER_BYTE
    }

    pub fn write_chunk(&mut self, data: &[u8]) -> Result<usize> {
        self.write(&[data])
    }

    /// Appends `chunks` in order and returns the number of bytes appended.
    ///
    /// In `Evict` mode a write larger than the whole arena fails with
    /// [`StreamError::BufferFull`] and leaves the buffer untouched. Any other
    /// write fits after eviction, possibly at the cost of unread data.
    pub fn write(&mut self, chunks: &[&[u8]]) -> Result<usize> {
        let total_length: usize = chunks.iter().map(|chunk| chunk.len()).sum();
        let available = self.available();

        if total_length > available {
            match self.mode {
                BufferMode::Expand => {
                    let new_size = max(self.bytes.len() * 2, self.byte_length + total_length);
                    self.resize(new_size);
                }
                BufferMode::Evict => {
                    if total_length > self.bytes.len() {
                        log::warn!(
                            "rejecting write of {} bytes: larger than the whole buffer ({} bytes)",
                            total_length,
                            self.bytes.len()
                        );
                        return Err(StreamError::BufferFull {
                            needed: total_length,
                            available,
                        });
                    }
                    self.evict(total_length);
                    debug_assert!(total_length <= self.available());
                }
            }
        }

        for chunk in chunks {
            self.append(chunk);
        }

        Ok(total_length)
    }

    fn append(&mut self, chunk: &[u8]) {
        let end = self.byte_length + chunk.len();
        self.bytes[self.byte_length..end].copy_from_slice(chunk);
        self.byte_length = end;
    }

    /// Reallocates the arena to `size` bytes, keeping as much valid data as fits.
    pub fn resize(&mut self, size: usize) {
        log::debug!("resizing bit buffer from {} to {} bytes", self.bytes.len(), size);
        self.bytes.resize(size, 0);
        self.byte_length = min(self.byte_length, size);
        self.index = min(self.index, self.bit_length());
    }

    /// Frees space at the tail by discarding bytes before the cursor.
    ///
    /// If everything has been consumed, or compaction cannot free `size_needed`
    /// bytes, the buffer is emptied including any unread data. If nothing has
    /// been consumed this is a no-op.
    pub fn evict(&mut self, size_needed: usize) {
        let byte_pos = self.index >> 3;
        let available = self.available();

        if self.index >= self.bit_length() || size_needed > available + byte_pos {
            if self.index < self.bit_length() {
                log::warn!(
                    "emergency eviction: dropping {} unread bytes to fit {} bytes",
                    self.byte_length - byte_pos,
                    size_needed
                );
            }
            self.byte_length = 0;
            self.index = 0;
            return;
        } else if byte_pos == 0 {
            return;
        }

        log::debug!("compacting bit buffer: discarding {} consumed bytes", byte_pos);
        self.bytes.copy_within(byte_pos..self.byte_length, 0);
        self.byte_length -= byte_pos;
        self.index -= byte_pos << 3;
    }

    /// Returns the next `count` bits, MSB first, without moving the cursor.
    pub fn peek(&self, count: u32) -> Result<u32> {
        if count > MAX_READ_BITS {
            return Err(StreamError::InvalidBitCount(count));
        }

        let mut offset = self.index;
        let mut count = count;
        let mut value = 0u32;

        while count > 0 {
            // Past the arena the stream reads as zero.
            let current_byte = self.bytes.get(offset >> 3).copied().unwrap_or(0) as u32;
            let remaining = 8 - (offset & 7) as u32; // bits left in this byte
            let read = min(remaining, count);
            let shift = remaining - read;
            let mask = 0xff >> (8 - read);

            value = (value << read) | ((current_byte >> shift) & mask);

            offset = offset.saturating_add(read as usize);
            count -= read;
        }

        Ok(value)
    }

    pub fn read(&mut self, count: u32) -> Result<u32> {
        let value = self.peek(count)?;
        self.index = self.index.saturating_add(count as usize);
        Ok(value)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read(1)? == 1)
    }

    /// Moves the cursor forward without a bound check and returns the new index.
    pub fn skip(&mut self, count: usize) -> usize {
        self.index = self.index.saturating_add(count);
        self.index
    }

    pub fn rewind(&mut self, count: usize) {
        self.index = self.index.saturating_sub(count);
    }

    pub fn has(&self, count: usize) -> bool {
        self.remaining_bits() >= count
    }
}

impl Default for BitBuffer {
    fn default() -> Self {
        let options = BufferOptions::default();
        Self::with_capacity(options.initial_capacity_bytes, options.mode)
    }
}
