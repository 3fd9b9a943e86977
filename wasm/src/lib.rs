use aprswave_core::{AprsEncoder, EncoderConfig, Frame, PathEncoding};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmEncoder {
    inner: AprsEncoder,
}

#[wasm_bindgen]
impl WasmEncoder {
    #[wasm_bindgen(constructor)]
    pub fn new(legacy_path: bool) -> Result<WasmEncoder, JsValue> {
        let path_encoding = if legacy_path {
            PathEncoding::Concatenated
        } else {
            PathEncoding::PerEntry
        };
        let inner = AprsEncoder::new(EncoderConfig {
            path_encoding,
            ..EncoderConfig::default()
        })
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmEncoder { inner })
    }

    /// Encode an APRS packet into 16-bit PCM samples at 6 kHz
    /// Returns an Int16Array
    #[wasm_bindgen]
    pub fn encode(
        &self,
        to_call: &str,
        from_call: &str,
        path: &str,
        info: &[u8],
    ) -> Result<Vec<i16>, JsValue> {
        let frame = Frame::parse(to_call, from_call, path, info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.inner
            .encode(&frame)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Encode an APRS packet into a complete WAV file image
    #[wasm_bindgen(js_name = encodeWav)]
    pub fn encode_wav(
        &self,
        to_call: &str,
        from_call: &str,
        path: &str,
        info: &[u8],
    ) -> Result<Vec<u8>, JsValue> {
        let frame = Frame::parse(to_call, from_call, path, info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let mut buffer = std::io::Cursor::new(Vec::new());
        self.inner
            .encode_wav(&frame, &mut buffer)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(buffer.into_inner())
    }
}

#[wasm_bindgen(js_name = sampleRate)]
pub fn sample_rate() -> u32 {
    aprswave_core::SAMPLE_RATE
}
