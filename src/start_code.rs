//! Byte-aligned start-code search (`00 00 01 id`) over a [`BitBuffer`].
//!
//! Elementary streams delimit their units with a three byte prefix followed by
//! an id byte. The scans always begin at the first whole byte at or after the
//! bit cursor.

use crate::bit_buffer::BitBuffer;
use crate::constants::{BITS_PER_BYTE, START_CODE_PREFIX, START_CODE_SIZE};

/// Byte offset of the first complete start code (prefix and id) at or after `from`.
pub fn find_start_code_prefix(data: &[u8], from: usize) -> Option<usize> {
    data.get(from..)?
        .windows(START_CODE_SIZE)
        .position(|window| window[..START_CODE_PREFIX.len()] == START_CODE_PREFIX)
        .map(|position| position + from)
}

impl BitBuffer {
    fn aligned_byte_index(&self) -> usize {
        self.index().div_ceil(BITS_PER_BYTE)
    }

    /// Moves the cursor past the next start code and returns its id.
    ///
    /// Returns `None` once the data is exhausted, leaving the cursor at the end
    /// of the valid data. A prefix without its id byte is not a match yet.
    pub fn find_next_start_code(&mut self) -> Option<u8> {
        let from = self.aligned_byte_index();
        match find_start_code_prefix(self.data(), from) {
            Some(position) => {
                let id = self.data()[position + START_CODE_PREFIX.len()];
                self.set_index((position + START_CODE_SIZE) * BITS_PER_BYTE);
                Some(id)
            }
            None => {
                self.set_index(self.len() * BITS_PER_BYTE);
                None
            }
        }
    }

    /// Skips start codes until one with id `code` is found.
    pub fn find_start_code(&mut self, code: u8) -> Option<u8> {
        loop {
            match self.find_next_start_code() {
                Some(current) if current != code => continue,
                found => return found,
            }
        }
    }

    /// True if the next aligned byte is past the valid data or begins a start code prefix.
    pub fn next_bytes_are_start_code(&self) -> bool {
        let from = self.aligned_byte_index();
        let data = self.data();
        from >= data.len()
            || data.get(from..from + START_CODE_PREFIX.len()) == Some(&START_CODE_PREFIX[..])
    }
}
