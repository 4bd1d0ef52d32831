//! BER definite-length codec
//!
//! # Encoding Format
//!
//! Short form (lengths 0-127):
//! ```text
//! Byte: 0 L L L L L L L
//! ```
//!
//! Long form (lengths >= 128):
//! ```text
//! First byte:      1 N N N N N N N  (N = number of length bytes)
//! Following bytes: L L L L L L L L  (big-endian length value, no leading zero byte)
//! ```
//!
//! Sets keyed by local tags may instead use a single fixed length byte, see
//! [`LengthForm::Fixed1`]. [`encode_length`] and [`decode_length`] dispatch
//! on the form.

use crate::error::{KlvError, KlvResult};
use klv_core::LengthForm;

/// Largest number of long-form length bytes accepted on decode
const MAX_LENGTH_BYTES: usize = std::mem::size_of::<usize>();

/// BER length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerLength {
    /// Short form: length 0-127
    Short(u8),
    /// Long form: length >= 128, encoded with length-of-length
    Long(usize),
}

impl BerLength {
    /// Create a new BER length
    ///
    /// Automatically chooses short or long form based on the length value.
    pub fn new(length: usize) -> Self {
        if length < 128 {
            BerLength::Short(length as u8)
        } else {
            BerLength::Long(length)
        }
    }

    /// Get the length value
    pub fn value(&self) -> usize {
        match self {
            BerLength::Short(l) => *l as usize,
            BerLength::Long(l) => *l,
        }
    }

    /// Number of bytes the encoded form of `length` occupies
    pub fn encoded_len(length: usize) -> usize {
        if length < 128 {
            1
        } else {
            1 + significant_bytes(length)
        }
    }

    /// Encode length to bytes
    pub fn encode(&self) -> Vec<u8> {
        match self {
            BerLength::Short(length) => vec![*length],
            BerLength::Long(length) => {
                let num_bytes = significant_bytes(*length);
                let mut result = Vec::with_capacity(1 + num_bytes);
                result.push(0x80 | num_bytes as u8);
                for i in (0..num_bytes).rev() {
                    result.push(((*length >> (i * 8)) & 0xFF) as u8);
                }
                result
            }
        }
    }

    /// Decode length from the start of `data`
    ///
    /// # Returns
    /// Returns `Ok((BerLength, bytes_consumed))` if successful
    ///
    /// # Error Handling
    /// Returns `MalformedLength` if:
    /// - Buffer is empty
    /// - The indefinite form (`0x80`) is used
    /// - The long form declares more length bytes than a `usize` holds
    /// - The long form length bytes extend past the buffer end
    pub fn decode(data: &[u8]) -> KlvResult<(Self, usize)> {
        let Some(&first_byte) = data.first() else {
            return Err(KlvError::MalformedLength(
                "Empty buffer for length decoding".to_string(),
            ));
        };

        if (first_byte & 0x80) == 0 {
            return Ok((BerLength::Short(first_byte), 1));
        }

        let num_bytes = (first_byte & 0x7F) as usize;
        if num_bytes == 0 {
            return Err(KlvError::MalformedLength(
                "Indefinite length encoding not supported".to_string(),
            ));
        }
        if num_bytes > MAX_LENGTH_BYTES {
            return Err(KlvError::MalformedLength(format!(
                "Length encoding too large: {} bytes (max {})",
                num_bytes, MAX_LENGTH_BYTES
            )));
        }
        if data.len() < 1 + num_bytes {
            return Err(KlvError::MalformedLength(format!(
                "Buffer too short for long form length: need {} bytes, got {}",
                1 + num_bytes,
                data.len()
            )));
        }

        let length = data[1..=num_bytes]
            .iter()
            .fold(0usize, |acc, &b| (acc << 8) | b as usize);

        Ok((BerLength::Long(length), 1 + num_bytes))
    }

    /// Decode length starting at `offset` inside `buf`
    pub fn decode_at(buf: &[u8], offset: usize) -> KlvResult<(Self, usize)> {
        if offset >= buf.len() {
            return Err(KlvError::MalformedLength(format!(
                "Length offset {} at or past buffer end ({})",
                offset,
                buf.len()
            )));
        }
        Self::decode(&buf[offset..])
    }
}

fn significant_bytes(length: usize) -> usize {
    let bits = usize::BITS - length.leading_zeros();
    (bits as usize).div_ceil(8).max(1)
}

/// Encode `length` in the given form
///
/// The fixed 1-byte form fails with `LengthOverflow` above 255.
pub fn encode_length(form: LengthForm, length: usize) -> KlvResult<Vec<u8>> {
    match form {
        LengthForm::Ber => Ok(BerLength::new(length).encode()),
        LengthForm::Fixed1 => {
            let byte = u8::try_from(length).map_err(|_| KlvError::LengthOverflow {
                length,
                form: form.name(),
            })?;
            Ok(vec![byte])
        }
    }
}

/// Decode a length of the given form at `offset`
///
/// # Returns
/// `(length, bytes_consumed)`
pub fn decode_length(form: LengthForm, buf: &[u8], offset: usize) -> KlvResult<(usize, usize)> {
    match form {
        LengthForm::Ber => {
            let (length, consumed) = BerLength::decode_at(buf, offset)?;
            Ok((length.value(), consumed))
        }
        LengthForm::Fixed1 => match buf.get(offset) {
            Some(&byte) => Ok((byte as usize, 1)),
            None => Err(KlvError::MalformedLength(format!(
                "Length offset {} at or past buffer end ({})",
                offset,
                buf.len()
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_ber_length_short() {
        let length = BerLength::new(100);
        let encoded = length.encode();
        assert_eq!(encoded, vec![100]);
    }

    #[test]
    fn test_ber_length_long() {
        assert_eq!(BerLength::new(128).encode(), vec![0x81, 0x80]);
        assert_eq!(BerLength::new(1000).encode(), vec![0x82, 0x03, 0xE8]);
        assert_eq!(BerLength::new(0x0100_0000).encode(), vec![0x84, 0x01, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_ber_length_decode() {
        let (length, consumed) = BerLength::decode(&[100]).unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(length.value(), 100);

        let (length, consumed) = BerLength::decode(&[0x82, 0x03, 0xE8, 0xFF]).unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(length.value(), 1000);
    }

    #[test]
    fn test_ber_length_decode_errors() {
        assert!(matches!(BerLength::decode(&[]), Err(KlvError::MalformedLength(_))));
        assert!(matches!(BerLength::decode(&[0x80]), Err(KlvError::MalformedLength(_))));
        assert!(matches!(BerLength::decode(&[0x82, 0x01]), Err(KlvError::MalformedLength(_))));
        assert!(matches!(
            BerLength::decode(&[0x89, 1, 2, 3, 4, 5, 6, 7, 8, 9]),
            Err(KlvError::MalformedLength(_))
        ));
        assert!(matches!(BerLength::decode_at(&[0x05], 1), Err(KlvError::MalformedLength(_))));
    }

    #[test]
    fn test_encoded_len_matches_encode() {
        for n in [0usize, 1, 127, 128, 255, 256, 65535, 65536, 1 << 24] {
            assert_eq!(BerLength::encoded_len(n), BerLength::new(n).encode().len());
        }
    }

    #[test]
    fn test_length_round_trip_random() {
        let mut rng = rand::thread_rng();
        for _ in 0..2000 {
            let n = rng.gen_range(0..=u32::MAX) as usize;
            let encoded = encode_length(LengthForm::Ber, n).unwrap();
            assert_eq!((encoded[0] & 0x80) == 0, n < 128);
            assert_eq!(decode_length(LengthForm::Ber, &encoded, 0).unwrap(), (n, encoded.len()));
        }
        for n in 0..300usize {
            let encoded = encode_length(LengthForm::Ber, n).unwrap();
            assert_eq!(decode_length(LengthForm::Ber, &encoded, 0).unwrap(), (n, encoded.len()));
        }
    }

    #[test]
    fn test_fixed1_length() {
        assert_eq!(encode_length(LengthForm::Fixed1, 200).unwrap(), vec![200]);
        assert!(matches!(
            encode_length(LengthForm::Fixed1, 256),
            Err(KlvError::LengthOverflow { length: 256, .. })
        ));
        assert_eq!(decode_length(LengthForm::Fixed1, &[0x00, 0xC8], 1).unwrap(), (200, 1));
        assert!(decode_length(LengthForm::Fixed1, &[0x00], 1).is_err());
    }
}
