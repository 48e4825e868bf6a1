use proptest::prelude::*;
use streamcursor_rs::{BitBuffer, BufferMode, BufferOptions, DecodeCursor, DecoderOptions};

prop_compose! {
    /// Non-decreasing presentation times paired with chunk payloads.
    fn arb_chunks()(
        steps in prop::collection::vec((0.0f64..1.0, prop::collection::vec(any::<u8>(), 0..64)), 1..40),
    ) -> Vec<(f64, Vec<u8>)> {
        let mut pts = 0.0;
        steps
            .into_iter()
            .map(|(step, data)| {
                pts += step;
                (pts, data)
            })
            .collect()
    }
}

/// Reference MSB-first bit extraction.
fn bits_at(data: &[u8], offset: usize, count: u32) -> u32 {
    (0..count as usize).fold(0u32, |value, i| {
        let bit = offset + i;
        let byte = data.get(bit / 8).copied().unwrap_or(0);
        (value << 1) | ((byte >> (7 - bit % 8)) & 1) as u32
    })
}

proptest! {
    /// Property: each timestamp offset is the byte count written before it, in bits
    #[test]
    fn prop_timestamp_offsets_are_cumulative(chunks in arb_chunks()) {
        let mut cursor = DecodeCursor::new(DecoderOptions::default()).unwrap();
        let mut written = 0usize;
        for (pts, data) in &chunks {
            let index = written * 8;
            cursor.write_chunk(*pts, data).unwrap();
            prop_assert_eq!(cursor.timestamps().last().unwrap().index, index);
            written += data.len();
        }
        prop_assert_eq!(cursor.bytes_written(), written);
        prop_assert!(cursor.timestamps().windows(2).all(|pair| pair[0].index <= pair[1].index));
    }

    /// Property: peek is idempotent and matches the reference extraction
    #[test]
    fn prop_peek_idempotent(data in prop::collection::vec(any::<u8>(), 1..32), offset in 0usize..256, count in 0u32..=32) {
        let mut buffer = BitBuffer::from_bytes(&data, BufferMode::Expand);
        let offset = offset % (data.len() * 8);
        buffer.set_index(offset);
        let first = buffer.peek(count).unwrap();
        prop_assert_eq!(first, buffer.peek(count).unwrap());
        prop_assert_eq!(buffer.index(), offset);
        if buffer.has(count as usize) {
            prop_assert_eq!(first, bits_at(&data, offset, count));
        }
    }

    /// Property: read(n) then rewind(n) restores the cursor and the peeked value
    #[test]
    fn prop_read_rewind_roundtrip(data in prop::collection::vec(any::<u8>(), 4..32), skip in 0usize..64, count in 1u32..=32) {
        let mut buffer = BitBuffer::from_bytes(&data, BufferMode::Expand);
        buffer.skip(skip % (data.len() * 8 - 31));
        let before = buffer.peek(32).unwrap();
        let index = buffer.index();
        buffer.read(count).unwrap();
        buffer.rewind(count as usize);
        prop_assert_eq!(buffer.index(), index);
        prop_assert_eq!(buffer.peek(32).unwrap(), before);
    }

    /// Property: an expanding buffer never loses unread bytes
    #[test]
    fn prop_expand_keeps_everything(
        chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..100), 0..30),
        consume in 0usize..2000,
    ) {
        let mut buffer = BitBuffer::new(BufferOptions::new(16, BufferMode::Expand)).unwrap();
        let mut all = Vec::new();
        for chunk in &chunks {
            buffer.write_chunk(chunk).unwrap();
            all.extend_from_slice(chunk);
        }
        let consumed = consume.min(all.len());
        buffer.skip(consumed * 8);
        prop_assert_eq!(buffer.len(), all.len());
        prop_assert!(buffer.capacity() >= all.len());
        for &expected in &all[consumed..] {
            prop_assert_eq!(buffer.read(8).unwrap(), expected as u32);
        }
    }

    /// Property: compaction on write preserves the unread bytes from the cursor on
    #[test]
    fn prop_evict_compaction_preserves_unread(
        initial in prop::collection::vec(any::<u8>(), 1..64),
        consumed_bits in 0usize..512,
        incoming in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        let capacity = 64;
        let mut buffer = BitBuffer::with_capacity(capacity, BufferMode::Evict);
        buffer.write_chunk(&initial).unwrap();
        let consumed_bits = consumed_bits % (initial.len() * 8);
        buffer.skip(consumed_bits);

        let byte_pos = consumed_bits / 8;
        let compacts = incoming.len() > capacity - initial.len()
            && incoming.len() <= capacity - initial.len() + byte_pos;
        let mut stream = initial.clone();
        stream.extend_from_slice(&incoming);

        buffer.write_chunk(&incoming).unwrap();

        if compacts {
            prop_assert_eq!(buffer.index(), consumed_bits % 8);
            prop_assert_eq!(buffer.len(), initial.len() - byte_pos + incoming.len());
            buffer.set_index(0);
            for &byte in &stream[byte_pos..] {
                prop_assert_eq!(buffer.read(8).unwrap(), byte as u32);
            }
        } else if incoming.len() <= capacity - initial.len() {
            prop_assert_eq!(buffer.index(), consumed_bits);
            prop_assert_eq!(buffer.peek(8).unwrap(), bits_at(&stream, consumed_bits, 8));
        }
    }
}
