//! End-to-end scenarios for the buffer and decode cursor through the public API.

use std::cell::RefCell;
use std::rc::Rc;
use streamcursor_rs::{
    BitBuffer, BufferMode, BufferOptions, Codec, DecodeCursor, DecodeStep, Decoder,
    DecoderOptions, ManualClock, StreamError,
};

#[test]
fn test_emergency_eviction_leaves_only_new_data() {
    let mut buffer = BitBuffer::with_capacity(8, BufferMode::Evict);
    buffer.write_chunk(&[0xFF; 8]).unwrap();
    buffer.read(8).unwrap();
    buffer.write_chunk(&[0xAA; 4]).unwrap();
    assert_eq!(buffer.len(), 4);
    assert_eq!(buffer.capacity(), 8);
}

#[test]
fn test_start_codes_found_in_order() {
    let mut buffer = BitBuffer::from_bytes(
        &[0x00, 0x00, 0x01, 0x09, 0xAB, 0xCD, 0x00, 0x00, 0x01, 0x07, 0xEF],
        BufferMode::Expand,
    );
    assert_eq!(buffer.find_start_code(9), Some(9));
    assert_eq!(buffer.find_start_code(7), Some(7));
    assert_eq!(buffer.find_start_code(7), None);
    assert_eq!(buffer.index(), 11 * 8);
}

#[test]
fn test_seek_between_timestamps() {
    let mut cursor = DecodeCursor::new(DecoderOptions::default()).unwrap();
    cursor.write_chunk(0.0, b"XXXXXX").unwrap();
    cursor.write_chunk(1.0, b"YYYYYYYYY").unwrap();
    cursor.write_chunk(2.0, b"ZZZ").unwrap();

    cursor.seek(1.5);
    assert_eq!(cursor.current_time(), 1.0);
    assert_eq!(cursor.buffer_index(), cursor.timestamps()[1].index);
    assert_eq!(cursor.buffer_index(), 48);
    assert_eq!(cursor.bits().read(8).unwrap(), b'Y' as u32);

    cursor.seek(-5.0);
    assert_eq!(cursor.current_time(), cursor.start_time());
    assert_eq!(cursor.current_time(), 0.0);
    assert_eq!(cursor.buffer_index(), 0);
}

#[test]
fn test_advance_accumulates_between_boundaries() {
    let mut cursor = DecodeCursor::new(DecoderOptions::default()).unwrap();
    cursor.write_chunk(0.0, &[0; 64]).unwrap();
    cursor.write_chunk(10.0, &[0; 64]).unwrap();

    let mut expected = 0.0;
    for _ in 0..20 {
        cursor.bits().skip(8);
        cursor.advance_decoded_time(0.016);
        expected += 0.016;
    }
    assert!((cursor.current_time() - expected).abs() < 1e-9);

    cursor.set_buffer_index(64 * 8);
    cursor.advance_decoded_time(0.016);
    assert_eq!(cursor.current_time(), 10.0);
}

#[test]
fn test_seek_then_resync_forward() {
    let mut cursor = DecodeCursor::new(DecoderOptions::default()).unwrap();
    for i in 0..5 {
        cursor.write_chunk(i as f64 * 0.5, &[i as u8; 10]).unwrap();
    }
    cursor.set_buffer_index(45 * 8);
    cursor.advance_decoded_time(0.0);
    assert_eq!(cursor.current_time(), 2.0);

    cursor.seek(0.7);
    assert_eq!(cursor.current_time(), 0.5);
    assert_eq!(cursor.buffer_index(), 80);

    cursor.bits().skip(80);
    cursor.advance_decoded_time(0.1);
    assert_eq!(cursor.current_time(), 1.0);
}

#[test]
fn test_evicting_stream_keeps_unread_data() {
    let options = DecoderOptions::streaming().with_buffer(BufferOptions::new(16, BufferMode::Evict));
    let mut cursor = DecodeCursor::new(options).unwrap();

    let mut produced = Vec::new();
    for chunk in 0u8..10 {
        let data: Vec<u8> = (0..6).map(|i| chunk * 6 + i).collect();
        cursor.write_chunk(0.0, &data).unwrap();
        let mut bits = cursor.bits();
        while bits.has(8 * 4) {
            produced.push(bits.read(8).unwrap() as u8);
        }
    }

    let expected: Vec<u8> = (0..produced.len() as u8).collect();
    assert_eq!(produced, expected);
    assert_eq!(cursor.buffer().capacity(), 16);
    assert_eq!(cursor.bytes_written(), 60);
}

#[test]
fn test_oversized_evict_write_is_backpressure() {
    let options = DecoderOptions::default().with_buffer(BufferOptions::new(8, BufferMode::Evict));
    let mut cursor = DecodeCursor::new(options).unwrap();
    cursor.write_chunk(0.0, &[1, 2, 3]).unwrap();
    let result = cursor.write(1.0, &[&[0; 6], &[0; 6]]);
    assert_eq!(
        result,
        Err(StreamError::BufferFull {
            needed: 12,
            available: 5
        })
    );
    assert_eq!(cursor.timestamps().len(), 1);
    assert_eq!(cursor.bits().read(24).unwrap(), 0x010203);
}

struct ByteCodec;

impl Codec for ByteCodec {
    type Output = u8;

    fn decode(&mut self, cursor: &mut DecodeCursor) -> streamcursor_rs::Result<DecodeStep<u8>> {
        let mut bits = cursor.bits();
        if !bits.has(8) {
            return Ok(DecodeStep::Idle);
        }
        let value = bits.read(8)? as u8;
        cursor.advance_decoded_time(0.1);
        Ok(DecodeStep::Produced(value))
    }
}

#[test]
fn test_decoder_pushes_to_destination() {
    let mut decoder = Decoder::new(ByteCodec, DecoderOptions::default(), ManualClock::default()).unwrap();
    let received = Rc::new(RefCell::new(Vec::new()));
    let sink = received.clone();
    decoder.connect(move |value: u8| sink.borrow_mut().push(value));

    assert!(!decoder.can_play());
    decoder.write_chunk(5.0, &[1, 2]).unwrap();
    decoder.write_chunk(6.0, &[3]).unwrap();
    while decoder.decode().unwrap() {}

    assert_eq!(*received.borrow(), vec![1, 2, 3]);
    // 5.0 + 0.1, then crossing byte 2 snaps to 6.0, then + 0.1.
    assert!((decoder.current_time() - 6.1).abs() < 1e-9);

    decoder.seek(5.5);
    assert_eq!(decoder.current_time(), 5.0);
    assert!(decoder.decode().unwrap());
    assert_eq!(received.borrow().len(), 4);
}
