//! PCM sample conversion.
//!
//! Media providers hand audio over as raw 16-bit little-endian mono PCM;
//! the detector works on normalized `f32` samples. Conversion is total:
//! any byte buffer decodes, an odd trailing byte is simply dropped.

use byteorder::{ByteOrder, LittleEndian};

/// Divisor mapping `i16` sample values into [-1.0, 1.0).
/// `-32768` lands exactly on -1.0.
const I16_SCALE: f32 = 32768.0;

/// Decode little-endian signed 16-bit mono PCM into normalized samples.
pub fn decode_i16le(bytes: &[u8]) -> Vec<f32> {
    let mut samples = Vec::with_capacity(bytes.len() / 2);
    for chunk in bytes.chunks_exact(2) {
        let raw = LittleEndian::read_i16(chunk);
        samples.push(raw as f32 / I16_SCALE);
    }
    samples
}

/// Encode normalized samples as little-endian signed 16-bit mono PCM.
///
/// Inverse of [`decode_i16le`]; used by tools and tests that synthesize
/// provider payloads. Samples outside [-1.0, 1.0] are clamped.
pub fn encode_i16le(samples: &[f32]) -> Vec<u8> {
    let mut bytes = vec![0u8; samples.len() * 2];
    for (i, sample) in samples.iter().enumerate() {
        let clamped = sample.clamp(-1.0, 1.0);
        let raw = (clamped * I16_SCALE).clamp(i16::MIN as f32, i16::MAX as f32) as i16;
        LittleEndian::write_i16(&mut bytes[i * 2..i * 2 + 2], raw);
    }
    bytes
}
