//! BER-OID unsigned integers
//!
//! Same scheme as the sub-identifier components of an ASN.1 OBJECT
//! IDENTIFIER: the value is split into 7-bit groups, most significant group
//! first, and every byte except the last has bit 7 set.
//!
//! ```text
//! 1      -> 01
//! 127    -> 7F
//! 128    -> 81 00
//! 16384  -> 81 80 00
//! ```

use crate::error::{KlvError, KlvResult};

/// Encode `value` as a BER-OID integer
pub fn encode_oid(value: u64) -> Vec<u8> {
    let mut groups = Vec::with_capacity(10);
    let mut remaining = value;
    loop {
        groups.push((remaining & 0x7F) as u8);
        remaining >>= 7;
        if remaining == 0 {
            break;
        }
    }

    // Most significant group first, continuation bit on all but the last
    let last = groups.len() - 1;
    groups
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &group)| if i < last { group | 0x80 } else { group })
        .collect()
}

/// Decode a BER-OID integer from the start of `data`
///
/// # Returns
/// Returns `Ok((value, bytes_consumed))`
///
/// # Error Handling
/// Returns `InvalidData` if the buffer is empty, ends before a byte without
/// the continuation bit, or the value does not fit in a `u64`.
pub fn decode_oid(data: &[u8]) -> KlvResult<(u64, usize)> {
    if data.is_empty() {
        return Err(KlvError::InvalidData("Empty buffer for BER-OID decoding".to_string()));
    }

    let mut value = 0u64;
    for (i, &byte) in data.iter().enumerate() {
        if value >> 57 != 0 {
            return Err(KlvError::InvalidData("BER-OID value overflows 64 bits".to_string()));
        }
        value = (value << 7) | (byte & 0x7F) as u64;
        if (byte & 0x80) == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(KlvError::InvalidData(
        "BER-OID did not terminate before end of buffer".to_string(),
    ))
}
