//! streamcursor CLI - inspect elementary streams with the bit cursor core.
//!
//! `scan` lists the start codes of a file, `replay` feeds a file through a
//! decoder in timestamped chunks and prints how the decoded time evolves.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::cell::Cell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use streamcursor_rs::constants::{BITS_PER_BYTE, START_CODE_SIZE};
use streamcursor_rs::{
    BitBuffer, BufferMode, BufferOptions, Codec, DecodeCursor, DecodeStep, Decoder,
    DecoderOptions, SystemClock,
};

/// Bit cursor diagnostics for MPEG-style elementary streams
#[derive(Parser)]
#[command(name = "streamcursor")]
#[command(author = "streamcursor-rs contributors")]
#[command(version)]
#[command(about = "Scan start codes and replay streams through a timestamped decode cursor", long_about = None)]
#[command(after_help = "EXAMPLES:
    streamcursor scan -i video.m1v
    streamcursor scan -i video.m1v --code 0xB3
    streamcursor replay -i video.m1v --chunk-size 2048 --seek 1.5
    streamcursor -vv replay -i video.m1v --mode evict --capacity 65536")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the start codes (00 00 01 id) found in a file
    #[command(visible_alias = "s")]
    Scan {
        /// Input elementary stream
        #[arg(short, long, help = "Path to the stream file")]
        input: PathBuf,

        /// Only report start codes with this id (decimal or 0x-prefixed hex)
        #[arg(short, long, value_parser = parse_start_code_id)]
        code: Option<u8>,

        /// Stop after this many start codes
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Feed a file through a decoder in timestamped chunks
    ///
    /// Each chunk gets a presentation time of chunk_number * chunk_duration.
    /// Every start code counts as one decoded unit of unit_duration seconds.
    #[command(visible_alias = "r")]
    Replay {
        /// Input elementary stream
        #[arg(short, long, help = "Path to the stream file")]
        input: PathBuf,

        /// Bytes per written chunk
        #[arg(long, default_value = "4096")]
        chunk_size: usize,

        /// Presentation time step between chunks, in seconds
        #[arg(long, default_value = "0.04")]
        chunk_duration: f64,

        /// Decoded time reported per unit, in seconds
        #[arg(long, default_value = "0.04")]
        unit_duration: f64,

        /// Disable timestamp collection (live source)
        #[arg(long)]
        streaming: bool,

        /// Initial buffer capacity in bytes
        #[arg(long, default_value = "1048576")]
        capacity: usize,

        /// Buffer overflow policy
        #[arg(short, long, default_value = "expand", value_enum)]
        mode: ModeArg,

        /// Seek to this time after the replay and decode from there
        #[arg(long)]
        seek: Option<f64>,
    },
}

#[derive(Clone, Debug, ValueEnum)]
enum ModeArg {
    /// Drop consumed bytes, bounded memory
    Evict,
    /// Grow the buffer as needed
    Expand,
}

impl From<ModeArg> for BufferMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Evict => BufferMode::Evict,
            ModeArg::Expand => BufferMode::Expand,
        }
    }
}

fn parse_start_code_id(value: &str) -> Result<u8, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid start code id {:?}: {}", value, e))
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let result = match cli.command {
        Commands::Scan { input, code, limit } => scan_stream(&input, code, limit),
        Commands::Replay {
            input,
            chunk_size,
            chunk_duration,
            unit_duration,
            streaming,
            capacity,
            mode,
            seek,
        } => {
            let options = DecoderOptions {
                streaming,
                buffer: BufferOptions::new(capacity, mode.into()),
            };
            replay_stream(&input, options, chunk_size, chunk_duration, unit_duration, seek)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn scan_stream(
    input: &PathBuf,
    code: Option<u8>,
    limit: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let mut bits = BitBuffer::from_bytes(&data, BufferMode::Expand);

    println!("File: {:?}", input);
    println!("Size: {} bytes", data.len());
    println!();

    let mut found = 0usize;
    while limit.is_none_or(|limit| found < limit) {
        let id = match code {
            Some(code) => bits.find_start_code(code),
            None => bits.find_next_start_code(),
        };
        let Some(id) = id else {
            break;
        };
        let offset = bits.index() / BITS_PER_BYTE - START_CODE_SIZE;
        println!("  {:>10}  0x{:02X}", offset, id);
        found += 1;
    }

    println!();
    println!("✓ {} start codes", found);
    Ok(())
}

/// One start code seen by [`UnitCodec`].
struct Unit {
    id: u8,
    offset: usize,
    time: f64,
}

/// Treats every start code as a unit of fixed duration.
struct UnitCodec {
    unit_duration: f64,
}

impl Codec for UnitCodec {
    type Output = Unit;

    fn decode(&mut self, cursor: &mut DecodeCursor) -> streamcursor_rs::Result<DecodeStep<Unit>> {
        let mut bits = cursor.bits();
        let start = bits.index();
        match bits.find_next_start_code() {
            Some(id) => {
                let offset = bits.index() / BITS_PER_BYTE - START_CODE_SIZE;
                cursor.advance_decoded_time(self.unit_duration);
                Ok(DecodeStep::Produced(Unit {
                    id,
                    offset,
                    time: cursor.current_time(),
                }))
            }
            None => {
                // Rescan from here once more data arrives; a start code may straddle chunks.
                let resume = cursor
                    .buffer_index()
                    .saturating_sub((START_CODE_SIZE - 1) * BITS_PER_BYTE)
                    .max(start);
                cursor.set_buffer_index(resume);
                Ok(DecodeStep::Idle)
            }
        }
    }
}

fn replay_stream(
    input: &PathBuf,
    options: DecoderOptions,
    chunk_size: usize,
    chunk_duration: f64,
    unit_duration: f64,
    seek: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    if chunk_size == 0 {
        return Err("chunk size must be at least 1".into());
    }

    let data = fs::read(input)?;
    let mut decoder = Decoder::new(UnitCodec { unit_duration }, options, SystemClock::new())?;
    decoder.connect(|unit: Unit| {
        println!(
            "  {:>10}  0x{:02X}  t={:.3}s",
            unit.offset, unit.id, unit.time
        );
    });

    let decode_time = Rc::new(Cell::new(0.0));
    let decode_time_sink = decode_time.clone();
    decoder.on_decode(move |elapsed| decode_time_sink.set(decode_time_sink.get() + elapsed));

    let mut units = 0usize;
    for (chunk_number, chunk) in data.chunks(chunk_size).enumerate() {
        decoder.write_chunk(chunk_number as f64 * chunk_duration, chunk)?;
        while decoder.decode()? {
            units += 1;
        }
    }

    println!();
    println!("✓ Replayed {} bytes, {} units", data.len(), units);
    println!("  Decoded time:     {:.3}s", decoder.current_time());
    println!("  Timestamps:       {}", decoder.cursor().timestamps().len());

    if let Some(time) = seek {
        decoder.seek(time);
        println!();
        println!(
            "Seek to {:.3}s: decoded time {:.3}s, bit index {}",
            time,
            decoder.current_time(),
            decoder.cursor().buffer_index()
        );
        while decoder.decode()? {}
        println!("  Decoded time after seek: {:.3}s", decoder.current_time());
    }

    println!("  Decode wall time: {:.6}s", decode_time.get());

    decoder.destroy();
    Ok(())
}
