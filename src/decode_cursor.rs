//! Timestamp-synchronized read cursor over a [`BitBuffer`].
//!
//! Every [`DecodeCursor::write`] records the presentation time of the first
//! byte it appends, keyed by the logical bit offset of that byte. As a codec
//! consumes bits it calls [`DecodeCursor::advance_decoded_time`]: crossing a
//! recorded offset snaps the decoded time to that timestamp, otherwise the
//! elapsed duration reported by the codec is added.

use crate::bit_buffer::BitBuffer;
use crate::constants::BITS_PER_BYTE;
use crate::error::{Result, StreamError};
use crate::options::DecoderOptions;
use crate::timestamp::{Timestamp, TimestampIndex};

#[derive(Debug, Clone)]
pub struct DecodeCursor {
    buffer: BitBuffer,
    timestamps: TimestampIndex,
    collect_timestamps: bool,
    bytes_written: usize,
    start_time: f64,
    decoded_time: f64,
    can_play: bool,
    destroyed: bool,
}

impl DecodeCursor {
    pub fn new(options: DecoderOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            buffer: BitBuffer::new(options.buffer)?,
            timestamps: TimestampIndex::new(),
            collect_timestamps: !options.streaming,
            bytes_written: 0,
            start_time: 0.0,
            decoded_time: 0.0,
            can_play: false,
            destroyed: false,
        })
    }

    /// Appends `chunks` received with presentation time `pts` (seconds).
    ///
    /// Returns the number of bytes appended. A rejected write records nothing.
    pub fn write(&mut self, pts: f64, chunks: &[&[u8]]) -> Result<usize> {
        if self.destroyed {
            return Err(StreamError::Destroyed);
        }
        let index = self.bytes_written * BITS_PER_BYTE;
        let appended = self.buffer.write(chunks)?;

        if self.collect_timestamps {
            if self.timestamps.is_empty() {
                self.start_time = pts;
                self.decoded_time = pts;
            }
            self.timestamps.push(index, pts);
        }

        self.bytes_written += appended;
        self.can_play = true;
        Ok(appended)
    }

    pub fn write_chunk(&mut self, pts: f64, data: &[u8]) -> Result<usize> {
        self.write(pts, &[data])
    }

    /// Repositions the buffer at the last timestamp not later than `time`.
    ///
    /// Falls back to the start of the buffer and `start_time` when `time`
    /// precedes every recorded timestamp. Does nothing in streaming mode.
    pub fn seek(&mut self, time: f64) {
        if !self.collect_timestamps {
            return;
        }

        match self.timestamps.seek(time) {
            Some(Timestamp { index, time: found }) => {
                self.buffer.set_index(index);
                self.decoded_time = found;
            }
            None => {
                self.buffer.set_index(0);
                self.decoded_time = self.start_time;
            }
        }
        log::debug!(
            "seek to {:.3}s: bit index {}, decoded time {:.3}s",
            time,
            self.buffer.index(),
            self.decoded_time
        );
    }

    /// Resynchronizes the decoded time after the codec consumed some bits.
    pub fn advance_decoded_time(&mut self, seconds: f64) {
        if self.collect_timestamps {
            if let Some(timestamp) = self.timestamps.advance(self.buffer.index()) {
                self.decoded_time = timestamp.time;
                return;
            }
        }

        self.decoded_time += seconds;
    }

    pub fn current_time(&self) -> f64 {
        self.decoded_time
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn can_play(&self) -> bool {
        self.can_play
    }

    /// Total bytes appended through [`DecodeCursor::write`], regardless of eviction.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    pub fn collects_timestamps(&self) -> bool {
        self.collect_timestamps
    }

    pub fn timestamps(&self) -> &[Timestamp] {
        self.timestamps.entries()
    }

    pub fn buffer(&self) -> &BitBuffer {
        &self.buffer
    }

    pub fn buffer_index(&self) -> usize {
        self.buffer.index()
    }

    pub fn set_buffer_index(&mut self, index: usize) {
        self.buffer.set_index(index);
    }

    /// Appends raw bytes without recording a timestamp or counting them in
    /// [`DecodeCursor::bytes_written`].
    pub fn buffer_write(&mut self, chunks: &[&[u8]]) -> Result<usize> {
        if self.destroyed {
            return Err(StreamError::Destroyed);
        }
        self.buffer.write(chunks)
    }

    /// Read access to the bitstream for a codec.
    pub fn bits(&mut self) -> BitReader<'_> {
        BitReader {
            buffer: &mut self.buffer,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Releases the buffered data and timestamp table. Later writes fail with
    /// [`StreamError::Destroyed`].
    pub fn destroy(&mut self) {
        self.buffer = BitBuffer::with_capacity(0, self.buffer.mode());
        self.timestamps.clear();
        self.can_play = false;
        self.destroyed = true;
    }
}

/// Read-side view of a cursor's buffer handed to codecs.
///
/// Moves the bit cursor but cannot append, resize or evict.
pub struct BitReader<'a> {
    buffer: &'a mut BitBuffer,
}

impl BitReader<'_> {
    pub fn index(&self) -> usize {
        self.buffer.index()
    }

    pub fn set_index(&mut self, index: usize) {
        self.buffer.set_index(index);
    }

    pub fn has(&self, count: usize) -> bool {
        self.buffer.has(count)
    }

    pub fn remaining_bits(&self) -> usize {
        self.buffer.remaining_bits()
    }

    pub fn peek(&self, count: u32) -> Result<u32> {
        self.buffer.peek(count)
    }

    pub fn read(&mut self, count: u32) -> Result<u32> {
        self.buffer.read(count)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        self.buffer.read_bool()
    }

    pub fn skip(&mut self, count: usize) -> usize {
        self.buffer.skip(count)
    }

    pub fn rewind(&mut self, count: usize) {
        self.buffer.rewind(count);
    }

    pub fn find_next_start_code(&mut self) -> Option<u8> {
        self.buffer.find_next_start_code()
    }

    pub fn find_start_code(&mut self, code: u8) -> Option<u8> {
        self.buffer.find_start_code(code)
    }

    pub fn next_bytes_are_start_code(&self) -> bool {
        self.buffer.next_bytes_are_start_code()
    }
}
