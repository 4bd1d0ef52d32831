//! Fixed-width big-endian integers (1 to 8 bytes)

use crate::error::{KlvError, KlvResult};

fn check_width(width: usize) -> KlvResult<()> {
    if (1..=8).contains(&width) {
        Ok(())
    } else {
        Err(KlvError::InvalidData(format!(
            "Integer width must be 1-8 bytes, got {}",
            width
        )))
    }
}

/// Pack the low `width` bytes of `value`, most significant first
///
/// Higher bytes are dropped; callers clamp before packing.
pub fn pack_be(value: u64, width: usize) -> KlvResult<Vec<u8>> {
    check_width(width)?;
    Ok(value.to_be_bytes()[8 - width..].to_vec())
}

/// Unpack exactly `width` big-endian bytes
pub fn unpack_be(bytes: &[u8], width: usize) -> KlvResult<u64> {
    check_width(width)?;
    if bytes.len() != width {
        return Err(KlvError::SizeMismatch {
            expected: width,
            actual: bytes.len(),
        });
    }
    Ok(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
}

/// Unpack exactly `width` big-endian bytes as a two's complement integer
pub fn unpack_be_signed(bytes: &[u8], width: usize) -> KlvResult<i64> {
    let raw = unpack_be(bytes, width)?;
    let shift = 64 - (width * 8) as u32;
    // Sign extend from the top bit of the field
    Ok(((raw << shift) as i64) >> shift)
}
