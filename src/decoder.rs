//! Binds a concrete codec to a [`DecodeCursor`], a connected sink and a clock.

use crate::clock::Clock;
use crate::decode_cursor::DecodeCursor;
use crate::error::{Result, StreamError};
use crate::options::DecoderOptions;

/// Result of one decode step.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeStep<T> {
    /// A unit of output was produced.
    Produced(T),
    /// Nothing to emit yet, usually because more data is needed.
    Idle,
}

/// Codec-specific half of a decoder.
///
/// Implementations read bits through [`DecodeCursor::bits`] and report the
/// duration of what they consumed with [`DecodeCursor::advance_decoded_time`].
pub trait Codec {
    type Output;

    fn decode(&mut self, cursor: &mut DecodeCursor) -> Result<DecodeStep<Self::Output>> {
        cursor.advance_decoded_time(0.0);
        Ok(DecodeStep::Idle)
    }

    /// Releases codec-specific state.
    fn destroy(&mut self) {}
}

/// Sink receiving decoded output, e.g. a renderer or audio output.
pub trait Destination<T> {
    fn write(&mut self, output: T);
}

impl<T, F: FnMut(T)> Destination<T> for F {
    fn write(&mut self, output: T) {
        self(output)
    }
}

type DecodeCallback = Box<dyn FnMut(f64)>;

pub struct Decoder<C: Codec> {
    cursor: DecodeCursor,
    codec: C,
    destination: Option<Box<dyn Destination<C::Output>>>,
    clock: Box<dyn Clock>,
    on_decode: Option<DecodeCallback>,
}

impl<C: Codec> Decoder<C> {
    pub fn new(codec: C, options: DecoderOptions, clock: impl Clock + 'static) -> Result<Self> {
        Ok(Self {
            cursor: DecodeCursor::new(options)?,
            codec,
            destination: None,
            clock: Box::new(clock),
            on_decode: None,
        })
    }

    pub fn connect(&mut self, destination: impl Destination<C::Output> + 'static) {
        self.destination = Some(Box::new(destination));
    }

    /// Registers a callback receiving the wall time, in seconds, spent in each decode step.
    pub fn on_decode(&mut self, callback: impl FnMut(f64) + 'static) {
        self.on_decode = Some(Box::new(callback));
    }

    pub fn write(&mut self, pts: f64, chunks: &[&[u8]]) -> Result<usize> {
        self.cursor.write(pts, chunks)
    }

    pub fn write_chunk(&mut self, pts: f64, data: &[u8]) -> Result<usize> {
        self.write(pts, &[data])
    }

    /// Runs one codec step and forwards its output to the destination.
    ///
    /// Returns whether output was produced.
    pub fn decode(&mut self) -> Result<bool> {
        if self.cursor.is_destroyed() {
            return Err(StreamError::Destroyed);
        }

        let started = self.clock.now();
        let step = self.codec.decode(&mut self.cursor)?;
        let elapsed = self.clock.now() - started;

        if let Some(callback) = self.on_decode.as_mut() {
            callback(elapsed);
        }

        match step {
            DecodeStep::Produced(output) => {
                if let Some(destination) = self.destination.as_mut() {
                    destination.write(output);
                }
                Ok(true)
            }
            DecodeStep::Idle => Ok(false),
        }
    }

    pub fn seek(&mut self, time: f64) {
        self.cursor.seek(time);
    }

    pub fn current_time(&self) -> f64 {
        self.cursor.current_time()
    }

    pub fn can_play(&self) -> bool {
        self.cursor.can_play()
    }

    pub fn cursor(&self) -> &DecodeCursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut DecodeCursor {
        &mut self.cursor
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn codec_mut(&mut self) -> &mut C {
        &mut self.codec
    }

    pub fn is_destroyed(&self) -> bool {
        self.cursor.is_destroyed()
    }

    pub fn destroy(&mut self) {
        if self.cursor.is_destroyed() {
            return;
        }
        self.codec.destroy();
        self.destination = None;
        self.on_decode = None;
        self.cursor.destroy();
    }
}
