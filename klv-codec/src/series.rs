//! Series codec
//!
//! A series is a flat concatenation of length-prefixed sets:
//!
//! - keyed:   `[BER length][BER-OID key][set bytes]` per element
//! - unkeyed: `[BER length][set bytes]` per element
//!
//! Unlike [`KlvSet::decode`], series decoding is strict: the input must be
//! partitioned exactly into complete elements.

use crate::error::{KlvError, KlvResult};
use crate::registry::CodecRegistry;
use crate::set::KlvSet;
use klv_ber::{decode_oid, encode_length, encode_oid, BerLength};
use klv_core::{Framing, LengthForm};
use std::collections::HashSet;

/// One element of a keyed series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesElement {
    pub key: u64,
    pub set: KlvSet,
}

impl SeriesElement {
    pub fn new(key: u64, set: KlvSet) -> Self {
        Self { key, set }
    }
}

fn check_unique_keys(elements: &[SeriesElement]) -> KlvResult<()> {
    let mut seen = HashSet::with_capacity(elements.len());
    for element in elements {
        if !seen.insert(element.key) {
            return Err(KlvError::DuplicateKey(element.key));
        }
    }
    Ok(())
}

fn non_empty(set: Vec<u8>) -> KlvResult<Vec<u8>> {
    if set.is_empty() {
        return Err(KlvError::InvalidData("Series element must contain at least one item".to_string()));
    }
    Ok(set)
}

/// Encode a keyed series
///
/// Keys are checked for uniqueness before any element is written.
pub fn encode_keyed_series(elements: &[SeriesElement], registry: &CodecRegistry) -> KlvResult<Vec<u8>> {
    check_unique_keys(elements)?;

    let mut out = Vec::new();
    for element in elements {
        let set = non_empty(element.set.encode(registry)?)?;
        let mut body = encode_oid(element.key);
        body.extend_from_slice(&set);
        out.extend_from_slice(&encode_length(LengthForm::Ber, body.len())?);
        out.extend_from_slice(&body);
    }
    Ok(out)
}

/// Split the next `[BER length][body]` element off `data` at `offset`
///
/// # Returns
/// `(body, bytes_consumed)`
fn next_element(data: &[u8], offset: usize) -> KlvResult<(&[u8], usize)> {
    let (length, header) = BerLength::decode_at(data, offset).map_err(|e| {
        KlvError::TruncatedSeries(format!("Element header at offset {}: {}", offset, e))
    })?;
    let length = length.value();

    let start = offset + header;
    let remaining = data.len() - start;
    if length > remaining {
        return Err(KlvError::MalformedLength(format!(
            "Series element at offset {} declares {} bytes, {} remain",
            offset, length, remaining
        )));
    }
    if length == 0 {
        return Err(KlvError::InvalidData(format!("Empty series element at offset {}", offset)));
    }
    Ok((&data[start..start + length], header + length))
}

/// Decode a keyed series whose element sets use `framing`
pub fn decode_keyed_series(
    data: &[u8],
    framing: Framing,
    registry: &CodecRegistry,
) -> KlvResult<Vec<SeriesElement>> {
    let mut elements = Vec::new();
    let mut seen = HashSet::new();
    let mut offset = 0;

    while offset < data.len() {
        let (body, consumed) = next_element(data, offset)?;
        let (key, key_len) = decode_oid(body)?;
        if key_len == body.len() {
            return Err(KlvError::InvalidData(format!("Series element {} has no items", key)));
        }
        if !seen.insert(key) {
            return Err(KlvError::DuplicateKey(key));
        }

        let mut set = KlvSet::new(framing);
        set.decode_strict(&body[key_len..], registry)?;
        log::trace!("Decoded series element {} with {} items", key, set.len());

        elements.push(SeriesElement::new(key, set));
        offset += consumed;
    }
    Ok(elements)
}

/// Encode an unkeyed series
pub fn encode_series(sets: &[KlvSet], registry: &CodecRegistry) -> KlvResult<Vec<u8>> {
    let mut out = Vec::new();
    for set in sets {
        let body = non_empty(set.encode(registry)?)?;
        out.extend_from_slice(&encode_length(LengthForm::Ber, body.len())?);
        out.extend_from_slice(&body);
    }
    Ok(out)
}

/// Decode an unkeyed series whose element sets use `framing`
pub fn decode_series(data: &[u8], framing: Framing, registry: &CodecRegistry) -> KlvResult<Vec<KlvSet>> {
    let mut sets = Vec::new();
    let mut offset = 0;

    while offset < data.len() {
        let (body, consumed) = next_element(data, offset)?;
        let mut set = KlvSet::new(framing);
        set.decode_strict(body, registry)?;
        log::trace!("Decoded series element {} with {} items", sets.len(), set.len());

        sets.push(set);
        offset += consumed;
    }
    Ok(sets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ValueCodec;
    use klv_core::UniversalLabel;

    const STANDARD: u8 = 0x03;

    fn confidence() -> UniversalLabel {
        UniversalLabel::for_standard(STANDARD, 0x11)
    }

    fn registry() -> CodecRegistry {
        let mut registry = CodecRegistry::new();
        registry.register_codec(confidence(), ValueCodec::probability());
        registry
    }

    fn element(key: u64, value: f64) -> SeriesElement {
        let mut set = KlvSet::local(STANDARD);
        set.push_leaf(confidence(), value);
        SeriesElement::new(key, set)
    }

    #[test]
    fn test_keyed_layout() {
        let encoded = encode_keyed_series(&[element(200, 1.0)], &registry()).unwrap();
        // length, two-byte OID key, one 3-byte item
        assert_eq!(encoded, vec![0x05, 0x81, 0x48, 0x11, 0x01, 0xFF]);
    }

    #[test]
    fn test_keyed_round_trip() {
        let registry = registry();
        let elements: Vec<_> = (1..=5).map(|k| element(k, 0.1 * k as f64)).collect();
        let encoded = encode_keyed_series(&elements, &registry).unwrap();
        let decoded = decode_keyed_series(&encoded, Framing::local(STANDARD), &registry).unwrap();

        assert_eq!(decoded.len(), 5);
        for (k, element) in (1..=5u64).zip(&decoded) {
            assert_eq!(element.key, k);
            let value = element.set.value(&confidence()).unwrap();
            assert!((value - 0.1 * k as f64).abs() <= 1.0 / 255.0);
        }
    }

    #[test]
    fn test_duplicate_key_rejected_on_encode() {
        let elements = vec![element(7, 0.5), element(8, 0.5), element(7, 0.25)];
        assert_eq!(
            encode_keyed_series(&elements, &registry()),
            Err(KlvError::DuplicateKey(7))
        );
    }

    #[test]
    fn test_duplicate_key_rejected_on_decode() {
        let registry = registry();
        let one = encode_keyed_series(&[element(3, 0.5)], &registry).unwrap();
        let mut doubled = one.clone();
        doubled.extend_from_slice(&one);
        assert_eq!(
            decode_keyed_series(&doubled, Framing::local(STANDARD), &registry),
            Err(KlvError::DuplicateKey(3))
        );
    }

    #[test]
    fn test_keyed_partial_element_is_error() {
        let registry = registry();
        let mut encoded = encode_keyed_series(&[element(1, 0.5), element(2, 0.5)], &registry).unwrap();
        encoded.pop();
        assert!(matches!(
            decode_keyed_series(&encoded, Framing::local(STANDARD), &registry),
            Err(KlvError::MalformedLength(_))
        ));

        let dangling = [0x04, 0x01, 0x11, 0x01, 0x80, 0x82];
        assert!(matches!(
            decode_keyed_series(&dangling, Framing::local(STANDARD), &registry),
            Err(KlvError::TruncatedSeries(_))
        ));
    }

    #[test]
    fn test_keyed_element_without_key_terminator() {
        let data = [0x01, 0x81];
        assert!(matches!(
            decode_keyed_series(&data, Framing::local(STANDARD), &registry()),
            Err(KlvError::InvalidData(_))
        ));
    }

    #[test]
    fn test_empty_elements_rejected() {
        let registry = registry();
        let empty = SeriesElement::new(1, KlvSet::local(STANDARD));
        assert!(matches!(
            encode_keyed_series(&[empty.clone()], &registry),
            Err(KlvError::InvalidData(_))
        ));
        assert!(matches!(
            encode_series(&[empty.set], &registry),
            Err(KlvError::InvalidData(_))
        ));
        for data in [&[0x00][..], &[0x01, 0x05][..]] {
            assert!(matches!(
                decode_keyed_series(data, Framing::local(STANDARD), &registry),
                Err(KlvError::InvalidData(_))
            ));
        }
    }

    #[test]
    fn test_unkeyed_round_trip() {
        let registry = registry();
        let sets: Vec<_> = [0.2, 0.4, 0.6].iter().map(|&v| element(0, v).set).collect();
        let encoded = encode_series(&sets, &registry).unwrap();
        assert_eq!(&encoded[..4], &[0x03, 0x11, 0x01, 0x33]);

        let decoded = decode_series(&encoded, Framing::local(STANDARD), &registry).unwrap();
        assert_eq!(decoded.len(), 3);
        assert!((decoded[2].value(&confidence()).unwrap() - 0.6).abs() <= 1.0 / 255.0);
    }

    #[test]
    fn test_unkeyed_leftover_bytes_are_error() {
        let registry = registry();
        let mut encoded = encode_series(&[element(0, 0.5).set], &registry).unwrap();
        encoded.push(0x05);
        assert!(matches!(
            decode_series(&encoded, Framing::local(STANDARD), &registry),
            Err(KlvError::MalformedLength(_))
        ));
        assert!(decode_series(&[], Framing::local(STANDARD), &registry).unwrap().is_empty());
    }
}
