//! WebAssembly bindings for streamcursor-rs.
//!
//! Exposes a [`DecodeCursor`](crate::DecodeCursor) to JavaScript hosts so a
//! page-side source can push chunks and a JS decoder can read bits from it.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
fn to_js(error: crate::StreamError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Timestamp-synchronized bit cursor.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct StreamCursor {
    inner: crate::DecodeCursor,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl StreamCursor {
    /// # Arguments
    /// * `streaming` - Disable timestamp collection (live sources)
    /// * `capacity` - Initial buffer size in bytes
    /// * `mode` - 1 = evict consumed bytes, 2 = expand
    #[wasm_bindgen(constructor)]
    pub fn new(streaming: bool, capacity: usize, mode: u8) -> Result<StreamCursor, JsValue> {
        let mode = crate::BufferMode::try_from(mode).map_err(to_js)?;
        let options = crate::DecoderOptions {
            streaming,
            buffer: crate::BufferOptions::new(capacity, mode),
        };
        let inner = crate::DecodeCursor::new(options).map_err(to_js)?;
        Ok(StreamCursor { inner })
    }

    pub fn write(&mut self, pts: f64, data: &[u8]) -> Result<usize, JsValue> {
        self.inner.write_chunk(pts, data).map_err(to_js)
    }

    pub fn seek(&mut self, time: f64) {
        self.inner.seek(time);
    }

    #[wasm_bindgen(js_name = advanceDecodedTime)]
    pub fn advance_decoded_time(&mut self, seconds: f64) {
        self.inner.advance_decoded_time(seconds);
    }

    #[wasm_bindgen(getter, js_name = currentTime)]
    pub fn current_time(&self) -> f64 {
        self.inner.current_time()
    }

    #[wasm_bindgen(getter, js_name = canPlay)]
    pub fn can_play(&self) -> bool {
        self.inner.can_play()
    }

    #[wasm_bindgen(getter)]
    pub fn index(&self) -> usize {
        self.inner.buffer_index()
    }

    #[wasm_bindgen(setter)]
    pub fn set_index(&mut self, index: usize) {
        self.inner.set_buffer_index(index);
    }

    pub fn has(&self, count: usize) -> bool {
        self.inner.buffer().has(count)
    }

    pub fn peek(&self, count: u32) -> Result<u32, JsValue> {
        self.inner.buffer().peek(count).map_err(to_js)
    }

    pub fn read(&mut self, count: u32) -> Result<u32, JsValue> {
        self.inner.bits().read(count).map_err(to_js)
    }

    pub fn skip(&mut self, count: usize) -> usize {
        self.inner.bits().skip(count)
    }

    pub fn rewind(&mut self, count: usize) {
        self.inner.bits().rewind(count);
    }

    /// Returns the id of the next start code, or -1 when the data is exhausted.
    #[wasm_bindgen(js_name = findNextStartCode)]
    pub fn find_next_start_code(&mut self) -> i32 {
        self.inner.bits().find_next_start_code().map_or(-1, i32::from)
    }

    #[wasm_bindgen(js_name = findStartCode)]
    pub fn find_start_code(&mut self, code: u8) -> i32 {
        self.inner.bits().find_start_code(code).map_or(-1, i32::from)
    }

    #[wasm_bindgen(js_name = nextBytesAreStartCode)]
    pub fn next_bytes_are_start_code(&self) -> bool {
        self.inner.buffer().next_bytes_are_start_code()
    }

    pub fn destroy(&mut self) {
        self.inner.destroy();
    }
}
