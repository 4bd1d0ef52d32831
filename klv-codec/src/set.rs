//! KLV sets
//!
//! A [`KlvSet`] owns an ordered list of child nodes and the [`Framing`] used
//! to write every one of them. Encoding concatenates the children and, when
//! the framing enables it, closes the set with a checksum trailer.
//!
//! Decoding is tolerant: it stops quietly at the first item whose header or
//! value would run past the end of the buffer. Use [`KlvSet::decode_strict`]
//! when the whole buffer must be accounted for.

use crate::error::{KlvError, KlvResult};
use crate::node::{read_item, KlvBytes, KlvLeaf, KlvNode};
use crate::registry::CodecRegistry;
use klv_checksum::{append_trailer, has_trailer, verify_trailer, TRAILER_LENGTH, TRAILER_TAG};
use klv_core::{Framing, KeyMode, UniversalLabel};

/// Ordered group of KLV nodes sharing one framing
#[derive(Debug, Clone, PartialEq)]
pub struct KlvSet {
    framing: Framing,
    children: Vec<KlvNode>,
}

impl KlvSet {
    pub fn new(framing: Framing) -> Self {
        Self {
            framing,
            children: Vec::new(),
        }
    }

    /// UL-keyed set with BER lengths and no trailer
    pub fn universal() -> Self {
        Self::new(Framing::universal())
    }

    /// Local-tag set for `standard` with 1-byte lengths and no trailer
    pub fn local(standard: u8) -> Self {
        Self::new(Framing::local(standard))
    }

    pub fn framing(&self) -> &Framing {
        &self.framing
    }

    /// Append a child, keeping insertion order
    pub fn add(&mut self, node: impl Into<KlvNode>) -> &mut Self {
        self.children.push(node.into());
        self
    }

    pub fn push_leaf(&mut self, label: UniversalLabel, value: f64) -> &mut Self {
        self.add(KlvLeaf::new(label, value))
    }

    pub fn push_bytes(&mut self, label: UniversalLabel, value: impl Into<Vec<u8>>) -> &mut Self {
        self.add(KlvBytes::new(label, value.into()))
    }

    /// Embed `nested` as the opaque payload of a Bytes child
    ///
    /// The nested set is encoded with its own framing.
    pub fn push_set(
        &mut self,
        label: UniversalLabel,
        nested: &KlvSet,
        registry: &CodecRegistry,
    ) -> KlvResult<&mut Self> {
        let payload = nested.encode(registry)?;
        Ok(self.push_bytes(label, payload))
    }

    /// Add `nested` as a Set child under `label`
    ///
    /// It is encoded with its own framing when the parent is encoded, and
    /// decodes back as a single Bytes child readable through
    /// [`KlvSet::nested`].
    pub fn push_group(&mut self, label: UniversalLabel, nested: KlvSet) -> &mut Self {
        self.add(KlvNode::set(label, nested))
    }

    pub fn children(&self) -> &[KlvNode] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Encode all children, followed by the trailer if enabled
    pub fn encode(&self, registry: &CodecRegistry) -> KlvResult<Vec<u8>> {
        let mut out = self.encode_items(registry)?;
        if let Some(kind) = self.framing.checksum() {
            append_trailer(kind, &mut out);
        }
        Ok(out)
    }

    /// Encode all children without a trailer
    ///
    /// # Error Handling
    /// `InvalidData` if a local set with a trailer holds a child on the
    /// reserved trailer tag, which its own decode would take for the trailer
    pub fn encode_items(&self, registry: &CodecRegistry) -> KlvResult<Vec<u8>> {
        let reserves_trailer_tag =
            self.framing.checksum().is_some() && matches!(self.framing.key_mode(), KeyMode::Local { .. });

        let mut out = Vec::new();
        for child in &self.children {
            if reserves_trailer_tag && child.label().local_tag().value() == TRAILER_TAG {
                return Err(KlvError::InvalidData(format!(
                    "{} uses local tag {:#04x}, reserved for the checksum trailer",
                    child.label(),
                    TRAILER_TAG
                )));
            }
            child.encode_into(&mut out, &self.framing, registry)?;
        }
        Ok(out)
    }

    /// Decode `data` into this set, replacing any existing children
    ///
    /// # Returns
    /// The number of bytes consumed, trailer included
    ///
    /// # Error Handling
    /// - Truncated items end decoding early without an error
    /// - `ChecksumMissing` / `ChecksumMismatch` when the trailer is enabled
    ///   and absent or wrong
    /// - Codec failures of registered leaves propagate
    pub fn decode(&mut self, data: &[u8], registry: &CodecRegistry) -> KlvResult<usize> {
        self.children.clear();
        let checksum = self.framing.checksum();
        let mut offset = 0;

        while offset < data.len() {
            if let Some(kind) = checksum {
                if self.at_trailer(&data[offset..]) {
                    let end = offset + TRAILER_LENGTH;
                    verify_trailer(kind, &data[..end])?;
                    return Ok(end);
                }
            }

            let item = match read_item(data, offset, &self.framing) {
                Ok(item) => item,
                Err(e) => {
                    log::debug!("Set decode stopped at offset {} of {}: {}", offset, data.len(), e);
                    break;
                }
            };

            let node = match registry.lookup(&item.label) {
                Some(_) => {
                    let mut leaf = KlvLeaf::empty(item.label);
                    leaf.decode_value(item.value, registry)?;
                    KlvNode::Leaf(leaf)
                }
                None => {
                    log::trace!("No codec for {}, keeping {} raw bytes", item.label, item.value.len());
                    KlvNode::bytes(item.label, item.value)
                }
            };
            self.children.push(node);
            offset += item.consumed;
        }

        if checksum.is_some() {
            return Err(KlvError::ChecksumMissing);
        }
        Ok(offset)
    }

    /// Decode `data`, requiring that it is consumed completely
    pub fn decode_strict(&mut self, data: &[u8], registry: &CodecRegistry) -> KlvResult<()> {
        let consumed = self.decode(data, registry)?;
        if consumed != data.len() {
            return Err(KlvError::MalformedLength(format!(
                "Set decoded {} of {} bytes",
                consumed,
                data.len()
            )));
        }
        Ok(())
    }

    fn at_trailer(&self, rest: &[u8]) -> bool {
        match self.framing.key_mode() {
            // The trailer tag is reserved in local sets
            KeyMode::Local { .. } => rest.first() == Some(&TRAILER_TAG) && rest.len() >= TRAILER_LENGTH,
            KeyMode::Universal => rest.len() == TRAILER_LENGTH && has_trailer(rest),
        }
    }

    fn find(&self, label: &UniversalLabel) -> Option<&KlvNode> {
        self.children.iter().find(|child| child.label() == label)
    }

    /// First numeric value stored under `label`
    pub fn value(&self, label: &UniversalLabel) -> Option<f64> {
        self.children
            .iter()
            .filter_map(KlvNode::as_leaf)
            .find(|leaf| leaf.label() == label)
            .map(KlvLeaf::value)
    }

    /// First opaque payload stored under `label`
    pub fn bytes(&self, label: &UniversalLabel) -> Option<&[u8]> {
        self.children
            .iter()
            .filter_map(KlvNode::as_bytes)
            .find(|bytes| bytes.label() == label)
            .map(KlvBytes::value)
    }

    /// Like [`KlvSet::value`], failing with `UnknownIdentifier` when absent
    pub fn require_value(&self, label: &UniversalLabel) -> KlvResult<f64> {
        self.value(label).ok_or(KlvError::UnknownIdentifier(*label))
    }

    /// Nested set stored under `label`
    ///
    /// A Set child is returned as is. An opaque payload is decoded with
    /// `framing`.
    pub fn nested(
        &self,
        label: &UniversalLabel,
        framing: Framing,
        registry: &CodecRegistry,
    ) -> KlvResult<Option<KlvSet>> {
        let found = self.children.iter().find_map(|child| match child {
            KlvNode::Bytes(bytes) if bytes.label() == label => Some(Err(bytes.value())),
            KlvNode::Set(set_label, set) if set_label == label => Some(Ok(set)),
            _ => None,
        });
        let payload = match found {
            None => return Ok(None),
            Some(Ok(set)) => return Ok(Some(set.clone())),
            Some(Err(payload)) => payload,
        };
        let mut nested = KlvSet::new(framing);
        nested.decode(payload, registry)?;
        Ok(Some(nested))
    }

    /// Whether any child carries `label`
    pub fn contains(&self, label: &UniversalLabel) -> bool {
        self.find(label).is_some()
    }
}
