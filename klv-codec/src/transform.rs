//! Scalar value transforms
//!
//! Conversions between floating-point domain values and fixed-width integer
//! wire representations. Every encoder clamps to its domain before
//! quantizing, so out-of-range input saturates instead of wrapping, and
//! every decoder is the inverse of its encoder up to one quantization step.
//!
//! | transform    | domain            | wire                                   |
//! |--------------|-------------------|----------------------------------------|
//! | unsigned     | `[0, 2^(8w)-1]`   | `w` bytes, rounded                     |
//! | imap         | `[min, max]`      | `w` bytes, full unsigned range         |
//! | signed       | `[-A, +A]`        | `w` bytes two's complement, min = NaN  |
//! | probability  | `[0, 1]`          | 1 byte, `0..=255`                      |
//! | percentage   | `[0, 100]`        | 1 byte, value as-is                    |

use crate::error::{KlvError, KlvResult};
use klv_ber::{pack_be, unpack_be, unpack_be_signed};

/// Largest unsigned value representable in `width` bytes
pub fn max_unsigned(width: usize) -> u64 {
    if width >= 8 {
        u64::MAX
    } else {
        (1u64 << (width * 8)) - 1
    }
}

/// Largest signed value representable in `width` bytes
pub fn max_signed(width: usize) -> i64 {
    (max_unsigned(width) >> 1) as i64
}

/// Wire value reserved for "value unavailable" in signed mappings
pub fn signed_sentinel(width: usize) -> i64 {
    -max_signed(width) - 1
}

pub(crate) fn check_width(width: usize) -> KlvResult<()> {
    if (1..=8).contains(&width) {
        Ok(())
    } else {
        Err(KlvError::InvalidConfig(format!(
            "Integer width must be 1-8 bytes, got {}",
            width
        )))
    }
}

fn require_number(value: f64) -> KlvResult<f64> {
    if value.is_nan() {
        Err(KlvError::InvalidData("NaN cannot be quantized".to_string()))
    } else {
        Ok(value)
    }
}

fn quantize(scaled: f64, max: u64) -> u64 {
    // Float to int casts saturate, so 2^64 lands on u64::MAX
    (scaled.round() as u64).min(max)
}

/// Encode a direct unsigned integer
pub fn encode_unsigned(value: f64, width: usize) -> KlvResult<Vec<u8>> {
    check_width(width)?;
    let max = max_unsigned(width);
    let clamped = require_number(value)?.clamp(0.0, max as f64);
    pack_be(quantize(clamped, max), width)
}

/// Decode a direct unsigned integer
pub fn decode_unsigned(bytes: &[u8], width: usize) -> KlvResult<f64> {
    Ok(unpack_be(bytes, width)? as f64)
}

/// Encode a value linearly mapped from `[min, max]` onto the full unsigned range
pub fn encode_imap(value: f64, min: f64, max: f64, width: usize) -> KlvResult<Vec<u8>> {
    check_width(width)?;
    let (lo, span) = imap_bounds(min, max)?;
    let clamped = require_number(value)?.clamp(lo, lo + span);
    let top = max_unsigned(width);
    let norm = (clamped - lo) / span;
    pack_be(quantize(norm * top as f64, top), width)
}

/// Decode a linearly mapped value
pub fn decode_imap(bytes: &[u8], min: f64, max: f64, width: usize) -> KlvResult<f64> {
    let (lo, span) = imap_bounds(min, max)?;
    let raw = unpack_be(bytes, width)?;
    Ok(lo + span * (raw as f64 / max_unsigned(width) as f64))
}

fn imap_bounds(min: f64, max: f64) -> KlvResult<(f64, f64)> {
    let lo = min.min(max);
    let span = min.max(max) - lo;
    if !(span > 0.0) || !span.is_finite() {
        return Err(KlvError::InvalidConfig(format!(
            "Linear mapping needs a finite non-empty range, got [{}, {}]",
            min, max
        )));
    }
    Ok((lo, span))
}

/// Encode a value symmetrically mapped from `[-amplitude, +amplitude]`
///
/// NaN encodes as the reserved minimum value.
pub fn encode_signed(value: f64, amplitude: f64, width: usize) -> KlvResult<Vec<u8>> {
    check_width(width)?;
    check_amplitude(amplitude)?;
    let raw = if value.is_nan() {
        signed_sentinel(width)
    } else {
        let top = max_signed(width);
        let clamped = value.clamp(-amplitude, amplitude);
        ((clamped * (top as f64 / amplitude)).round() as i64).clamp(-top, top)
    };
    pack_be(raw as u64, width)
}

/// Decode a symmetric signed value; the reserved minimum decodes to NaN
pub fn decode_signed(bytes: &[u8], amplitude: f64, width: usize) -> KlvResult<f64> {
    check_amplitude(amplitude)?;
    let raw = unpack_be_signed(bytes, width)?;
    if raw == signed_sentinel(width) {
        return Ok(f64::NAN);
    }
    Ok(raw as f64 * (amplitude / max_signed(width) as f64))
}

fn check_amplitude(amplitude: f64) -> KlvResult<()> {
    if amplitude > 0.0 && amplitude.is_finite() {
        Ok(())
    } else {
        Err(KlvError::InvalidConfig(format!(
            "Signed mapping needs a positive amplitude, got {}",
            amplitude
        )))
    }
}

/// Encode a probability in `[0, 1]` as one byte scaled to `0..=255`
pub fn encode_probability(value: f64) -> KlvResult<Vec<u8>> {
    let clamped = require_number(value)?.clamp(0.0, 1.0);
    Ok(vec![(clamped * 255.0).round() as u8])
}

pub fn decode_probability(bytes: &[u8]) -> KlvResult<f64> {
    Ok(unpack_be(bytes, 1)? as f64 / 255.0)
}

/// Encode a percentage in `[0, 100]` as one byte holding the percentage itself
pub fn encode_percentage(value: f64) -> KlvResult<Vec<u8>> {
    let clamped = require_number(value)?.clamp(0.0, 100.0);
    Ok(vec![clamped.round() as u8])
}

pub fn decode_percentage(bytes: &[u8]) -> KlvResult<f64> {
    Ok(unpack_be(bytes, 1)? as f64)
}
