//! Ingestion core of a streaming media decoder.
//!
//! [`BitBuffer`] is a growable or evicting byte arena read through a bit-granular
//! cursor. [`DecodeCursor`] owns one and keeps the presentation timestamps of
//! incoming chunks indexed by bit offset, so that a codec consuming the stream
//! can report a decoded time and seek by time. [`Decoder`] ties a concrete
//! [`Codec`] to a cursor, a connected [`Destination`] and an injected [`Clock`].

pub mod bit_buffer;
pub mod clock;
pub mod constants;
pub mod decode_cursor;
pub mod decoder;
pub mod error;
pub mod options;
pub mod start_code;
pub mod timestamp;
pub mod wasm;

pub use bit_buffer::BitBuffer;
pub use clock::{Clock, ManualClock, SystemClock};
pub use decode_cursor::{BitReader, DecodeCursor};
pub use decoder::{Codec, DecodeStep, Decoder, Destination};
pub use error::{Result, StreamError};
pub use options::{BufferOptions, DecoderOptions};
pub use timestamp::{Timestamp, TimestampIndex};

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Overflow policy of a [`BitBuffer`], fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[num_enum(error_type(name = StreamError, constructor = StreamError::InvalidBufferMode))]
#[repr(u8)]
pub enum BufferMode {
    /// Reclaim space by discarding bytes the cursor has already consumed.
    /// Memory stays bounded by the initial capacity.
    Evict = 1,
    /// Grow the arena (at least doubling) whenever a write does not fit.
    #[default]
    Expand = 2,
}
