// Default arena size of a freshly constructed buffer (1 MiB).
pub const DEFAULT_CAPACITY_BYTES: usize = 1024 * 1024;

// Widest field a single peek/read may return. The accumulator is a u32.
pub const MAX_READ_BITS: u32 = 32;

pub const BITS_PER_BYTE: usize = 8;

// Byte-aligned framing marker used by MPEG elementary streams: 00 00 01 followed by an id byte.
pub const START_CODE_PREFIX: [u8; 3] = [0x00, 0x00, 0x01];

// Prefix plus the id byte.
pub const START_CODE_SIZE: usize = START_CODE_PREFIX.len() + 1;
