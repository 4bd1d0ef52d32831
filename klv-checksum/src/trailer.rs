//! Checksum trailer placement and verification

use crate::crc16::crc16_ccitt;
use crate::error::{KlvError, KlvResult};
use crate::word_sum::word_sum_16;
use klv_core::ChecksumKind;

/// Reserved local tag of the checksum trailer item
pub const TRAILER_TAG: u8 = 0x01;

/// Length byte of the checksum trailer item
pub const TRAILER_VALUE_LENGTH: u8 = 0x02;

/// Total size of the trailer: tag, length, two checksum bytes
pub const TRAILER_LENGTH: usize = 4;

/// Compute the checksum of `data` with the given algorithm
pub fn checksum(kind: ChecksumKind, data: &[u8]) -> u16 {
    match kind {
        ChecksumKind::Crc16Ccitt => crc16_ccitt(data),
        ChecksumKind::WordSum16 => word_sum_16(data),
    }
}

/// Append the 4-byte trailer to `buffer`
///
/// The checksum covers everything already in `buffer` plus the trailer's
/// own tag and length bytes.
pub fn append_trailer(kind: ChecksumKind, buffer: &mut Vec<u8>) {
    buffer.push(TRAILER_TAG);
    buffer.push(TRAILER_VALUE_LENGTH);
    let value = checksum(kind, buffer);
    buffer.extend_from_slice(&value.to_be_bytes());
}

/// Check whether `data` ends with something shaped like a trailer
pub fn has_trailer(data: &[u8]) -> bool {
    data.len() >= TRAILER_LENGTH
        && data[data.len() - TRAILER_LENGTH] == TRAILER_TAG
        && data[data.len() - TRAILER_LENGTH + 1] == TRAILER_VALUE_LENGTH
}

/// Verify the trailer closing `data`
///
/// # Returns
/// The number of bytes preceding the trailer
///
/// # Error Handling
/// - `ChecksumMissing` if `data` does not end with a trailer
/// - `ChecksumMismatch` if the recomputed checksum differs from the stored one
pub fn verify_trailer(kind: ChecksumKind, data: &[u8]) -> KlvResult<usize> {
    if !has_trailer(data) {
        return Err(KlvError::ChecksumMissing);
    }

    let covered = data.len() - 2;
    let stored = u16::from_be_bytes([data[covered], data[covered + 1]]);
    let computed = checksum(kind, &data[..covered]);
    if computed != stored {
        return Err(KlvError::ChecksumMismatch { computed, stored });
    }

    Ok(data.len() - TRAILER_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_append_and_verify() {
        let mut data = vec![0x05, 0x02, 0x40, 0x00];
        append_trailer(ChecksumKind::Crc16Ccitt, &mut data);
        assert_eq!(data.len(), 8);
        assert_eq!(&data[4..6], &[TRAILER_TAG, TRAILER_VALUE_LENGTH]);
        assert_eq!(verify_trailer(ChecksumKind::Crc16Ccitt, &data).unwrap(), 4);
    }

    #[test]
    fn test_verify_detects_wrong_algorithm() {
        let mut data = vec![0x10, 0x20, 0x30];
        append_trailer(ChecksumKind::WordSum16, &mut data);
        assert!(verify_trailer(ChecksumKind::WordSum16, &data).is_ok());
        assert!(matches!(
            verify_trailer(ChecksumKind::Crc16Ccitt, &data),
            Err(KlvError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_verify_missing_trailer() {
        assert_eq!(
            verify_trailer(ChecksumKind::Crc16Ccitt, &[0x05, 0x02, 0x40]),
            Err(KlvError::ChecksumMissing)
        );
        assert_eq!(
            verify_trailer(ChecksumKind::Crc16Ccitt, &[0x02, 0x02, 0x00, 0x00]),
            Err(KlvError::ChecksumMissing)
        );
    }

    #[test]
    fn test_single_bit_flip_is_detected() {
        let mut rng = rand::thread_rng();
        let mut data: Vec<u8> = (0..64).map(|_| rng.r#gen::<u8>()).collect();
        append_trailer(ChecksumKind::Crc16Ccitt, &mut data);
        let covered = data.len() - 2;

        for bit in 0..covered * 8 {
            let mut corrupted = data.clone();
            corrupted[bit / 8] ^= 1 << (bit % 8);
            assert!(verify_trailer(ChecksumKind::Crc16Ccitt, &corrupted).is_err());
        }
    }
}
