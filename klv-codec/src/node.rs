//! KLV node model
//!
//! A node is one of three variants:
//!
//! - [`KlvLeaf`]: a numeric value converted to bytes by the registered codec
//!   of its label
//! - [`KlvBytes`]: an opaque payload (text, nested sets, series, or values
//!   without a numeric codec)
//! - [`KlvSet`]: an ordered group of nodes; as a child it carries a label
//!   and is written as one item whose value is the child's own encoding
//!
//! Every item is framed as `[key][length][value]`, with key and length
//! written according to the [`Framing`] of the owning set.

use crate::error::{KlvError, KlvResult};
use crate::registry::CodecRegistry;
use crate::set::KlvSet;
use bytes::BufMut;
use klv_ber::{decode_length, encode_length};
use klv_core::{Framing, UniversalLabel};

/// One framed item borrowed from an input buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawItem<'a> {
    /// Label of the item (rebuilt from the local tag in local-tag mode)
    pub label: UniversalLabel,
    /// Value bytes
    pub value: &'a [u8],
    /// Total bytes taken by key, length and value
    pub consumed: usize,
}

/// Write one `[key][length][value]` item
pub fn write_item(
    out: &mut impl BufMut,
    framing: &Framing,
    label: &UniversalLabel,
    value: &[u8],
) -> KlvResult<()> {
    let length = encode_length(framing.length_form(), value.len())?;
    out.put_slice(framing.key_mode().key_bytes(label).as_ref());
    out.put_slice(&length);
    out.put_slice(value);
    Ok(())
}

/// Read one item starting at `offset`
///
/// # Error Handling
/// Returns `MalformedLength` when the key, the length field or the value
/// would extend past the end of `data`.
pub fn read_item<'a>(data: &'a [u8], offset: usize, framing: &Framing) -> KlvResult<RawItem<'a>> {
    let key_mode = framing.key_mode();
    let key_len = key_mode.key_len();
    let remaining = data.len().saturating_sub(offset);
    if remaining < key_len + 1 {
        return Err(KlvError::MalformedLength(format!(
            "Item header needs at least {} bytes at offset {}, {} remain",
            key_len + 1,
            offset,
            remaining
        )));
    }

    let label = key_mode
        .read_label(&data[offset..])
        .ok_or_else(|| KlvError::InvalidData(format!("Unreadable key at offset {}", offset)))?;
    let (length, length_bytes) = decode_length(framing.length_form(), data, offset + key_len)?;

    let start = offset + key_len + length_bytes;
    let end = start.checked_add(length).filter(|&end| end <= data.len()).ok_or_else(|| {
        KlvError::MalformedLength(format!(
            "Item at offset {} declares {} value bytes, {} remain",
            offset,
            length,
            data.len() - start
        ))
    })?;

    Ok(RawItem {
        label,
        value: &data[start..end],
        consumed: end - offset,
    })
}

fn expect_label(expected: &UniversalLabel, found: UniversalLabel) -> KlvResult<()> {
    if *expected != found {
        return Err(KlvError::IdentifierMismatch {
            expected: *expected,
            found,
        });
    }
    Ok(())
}

/// Numeric leaf
#[derive(Debug, Clone, PartialEq)]
pub struct KlvLeaf {
    label: UniversalLabel,
    value: f64,
}

impl KlvLeaf {
    pub fn new(label: UniversalLabel, value: f64) -> Self {
        Self { label, value }
    }

    /// Create a leaf to decode into
    pub fn empty(label: UniversalLabel) -> Self {
        Self::new(label, 0.0)
    }

    pub fn label(&self) -> &UniversalLabel {
        &self.label
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Encode as one framed item
    pub fn encode(&self, framing: &Framing, registry: &CodecRegistry) -> KlvResult<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_into(&mut out, framing, registry)?;
        Ok(out)
    }

    pub(crate) fn encode_into(
        &self,
        out: &mut Vec<u8>,
        framing: &Framing,
        registry: &CodecRegistry,
    ) -> KlvResult<()> {
        let payload = registry.require(&self.label)?.encode(self.value)?;
        write_item(out, framing, &self.label, &payload)
    }

    /// Decode one framed item into this leaf
    ///
    /// The embedded key must resolve to this leaf's own label.
    pub fn decode(&mut self, data: &[u8], framing: &Framing, registry: &CodecRegistry) -> KlvResult<()> {
        let item = read_item(data, 0, framing)?;
        expect_label(&self.label, item.label)?;
        self.decode_value(item.value, registry)
    }

    /// Decode a bare value slice with this leaf's codec
    pub(crate) fn decode_value(&mut self, value: &[u8], registry: &CodecRegistry) -> KlvResult<()> {
        self.value = registry.require(&self.label)?.decode(value)?;
        Ok(())
    }
}

/// Opaque byte leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KlvBytes {
    label: UniversalLabel,
    value: Vec<u8>,
}

impl KlvBytes {
    pub fn new(label: UniversalLabel, value: Vec<u8>) -> Self {
        Self { label, value }
    }

    pub fn empty(label: UniversalLabel) -> Self {
        Self::new(label, Vec::new())
    }

    pub fn label(&self) -> &UniversalLabel {
        &self.label
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn set_value(&mut self, value: Vec<u8>) {
        self.value = value;
    }

    pub fn into_value(self) -> Vec<u8> {
        self.value
    }

    pub fn encode(&self, framing: &Framing) -> KlvResult<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_into(&mut out, framing)?;
        Ok(out)
    }

    pub(crate) fn encode_into(&self, out: &mut Vec<u8>, framing: &Framing) -> KlvResult<()> {
        write_item(out, framing, &self.label, &self.value)
    }

    /// Decode one framed item; the payload is kept verbatim
    pub fn decode(&mut self, data: &[u8], framing: &Framing) -> KlvResult<()> {
        let item = read_item(data, 0, framing)?;
        expect_label(&self.label, item.label)?;
        self.value = item.value.to_vec();
        Ok(())
    }
}

/// A node of the KLV tree
#[derive(Debug, Clone, PartialEq)]
pub enum KlvNode {
    Leaf(KlvLeaf),
    Bytes(KlvBytes),
    /// Nested set written as the value of one item under the label
    Set(UniversalLabel, KlvSet),
}

impl KlvNode {
    pub fn leaf(label: UniversalLabel, value: f64) -> Self {
        KlvNode::Leaf(KlvLeaf::new(label, value))
    }

    pub fn bytes(label: UniversalLabel, value: impl Into<Vec<u8>>) -> Self {
        KlvNode::Bytes(KlvBytes::new(label, value.into()))
    }

    pub fn set(label: UniversalLabel, set: KlvSet) -> Self {
        KlvNode::Set(label, set)
    }

    pub fn label(&self) -> &UniversalLabel {
        match self {
            KlvNode::Leaf(leaf) => leaf.label(),
            KlvNode::Bytes(bytes) => bytes.label(),
            KlvNode::Set(label, _) => label,
        }
    }

    pub fn as_leaf(&self) -> Option<&KlvLeaf> {
        match self {
            KlvNode::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&KlvBytes> {
        match self {
            KlvNode::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&KlvSet> {
        match self {
            KlvNode::Set(_, set) => Some(set),
            _ => None,
        }
    }

    /// Encode this node under the framing of the set that owns it
    pub fn encode(&self, framing: &Framing, registry: &CodecRegistry) -> KlvResult<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_into(&mut out, framing, registry)?;
        Ok(out)
    }

    pub(crate) fn encode_into(
        &self,
        out: &mut Vec<u8>,
        framing: &Framing,
        registry: &CodecRegistry,
    ) -> KlvResult<()> {
        match self {
            KlvNode::Leaf(leaf) => leaf.encode_into(out, framing, registry),
            KlvNode::Bytes(bytes) => bytes.encode_into(out, framing),
            // The nested set keeps its own framing and trailer
            KlvNode::Set(label, nested) => write_item(out, framing, label, &nested.encode(registry)?),
        }
    }
}

impl From<KlvLeaf> for KlvNode {
    fn from(leaf: KlvLeaf) -> Self {
        KlvNode::Leaf(leaf)
    }
}

impl From<KlvBytes> for KlvNode {
    fn from(bytes: KlvBytes) -> Self {
        KlvNode::Bytes(bytes)
    }
}
