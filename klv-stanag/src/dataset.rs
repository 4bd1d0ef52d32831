//! Dataset and packet builder
//!
//! Turns a list of tag/value pairs into a [`KlvSet`] or a complete
//! STANAG 4609 packet. Nested datasets are encoded up front and embedded as
//! opaque payloads of their parent.

use crate::error::KlvResult;
use crate::st0601;
use klv_codec::{encode_packet, CodecRegistry, KlvSet, PacketConfig};
use klv_core::{Framing, UniversalLabel};
use serde::{Deserialize, Serialize};

/// Key addressing of a built dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Addressing {
    /// 16-byte Universal Labels with BER lengths
    #[default]
    Universal,
    /// 1-byte Local Tags with 1-byte lengths, scoped to the standard of the
    /// first label
    Local,
}

/// Value of one tag
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Numeric(f64),
    Dataset(KlvSet),
    Bytes(Vec<u8>),
}

impl From<f64> for TagValue {
    fn from(value: f64) -> Self {
        TagValue::Numeric(value)
    }
}

impl From<KlvSet> for TagValue {
    fn from(set: KlvSet) -> Self {
        TagValue::Dataset(set)
    }
}

impl From<Vec<u8>> for TagValue {
    fn from(bytes: Vec<u8>) -> Self {
        TagValue::Bytes(bytes)
    }
}

impl From<&[u8]> for TagValue {
    fn from(bytes: &[u8]) -> Self {
        TagValue::Bytes(bytes.to_vec())
    }
}

impl From<&str> for TagValue {
    fn from(text: &str) -> Self {
        TagValue::Bytes(text.as_bytes().to_vec())
    }
}

impl From<String> for TagValue {
    fn from(text: String) -> Self {
        TagValue::Bytes(text.into_bytes())
    }
}

/// A labelled tag value
pub type Tag = (UniversalLabel, TagValue);

fn framing_for(tags: &[Tag], addressing: Addressing) -> Framing {
    match addressing {
        Addressing::Universal => Framing::universal(),
        Addressing::Local => {
            let standard = tags.first().map(|(label, _)| label.standard_id()).unwrap_or(0);
            Framing::local(standard)
        }
    }
}

fn build_set(tags: &[Tag], framing: Framing, registry: &CodecRegistry) -> KlvResult<KlvSet> {
    let mut set = KlvSet::new(framing);
    for (label, value) in tags {
        match value {
            TagValue::Numeric(v) => {
                set.push_leaf(*label, *v);
            }
            TagValue::Dataset(nested) => {
                set.push_set(*label, nested, registry)?;
            }
            TagValue::Bytes(bytes) => {
                set.push_bytes(*label, bytes.clone());
            }
        }
    }
    Ok(set)
}

/// Build a set from `tags`
///
/// With local addressing the standard is taken from the first label.
pub fn create_dataset(tags: &[Tag], addressing: Addressing, registry: &CodecRegistry) -> KlvResult<KlvSet> {
    build_set(tags, framing_for(tags, addressing), registry)
}

/// Build a complete packet from `tags` with the given configuration
pub fn create_packet(tags: &[Tag], config: &PacketConfig, registry: &CodecRegistry) -> KlvResult<Vec<u8>> {
    let payload = build_set(tags, config.payload_framing, registry)?;
    encode_packet(config, &payload, registry)
}

/// Build a STANAG 4609 UAS Datalink packet from `tags`
pub fn create_stanag4609_packet(tags: &[Tag], registry: &CodecRegistry) -> KlvResult<Vec<u8>> {
    create_packet(tags, &PacketConfig::default(), registry)
}

/// Incremental builder of datasets and packets
#[derive(Debug, Clone, Default)]
pub struct CompositeBuilder {
    tags: Vec<Tag>,
}

impl CompositeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_numeric(&mut self, label: UniversalLabel, value: f64) -> &mut Self {
        self.add_tag(label, TagValue::Numeric(value))
    }

    pub fn add_bytes(&mut self, label: UniversalLabel, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.add_tag(label, TagValue::Bytes(bytes.into()))
    }

    pub fn add_string(&mut self, label: UniversalLabel, text: &str) -> &mut Self {
        self.add_tag(label, text)
    }

    pub fn add_dataset(&mut self, label: UniversalLabel, set: KlvSet) -> &mut Self {
        self.add_tag(label, TagValue::Dataset(set))
    }

    /// Nest the dataset built by `builder`
    pub fn add_builder(
        &mut self,
        label: UniversalLabel,
        builder: &CompositeBuilder,
        addressing: Addressing,
        registry: &CodecRegistry,
    ) -> KlvResult<&mut Self> {
        let set = builder.as_dataset(addressing, registry)?;
        Ok(self.add_dataset(label, set))
    }

    pub fn add_tag(&mut self, label: UniversalLabel, value: impl Into<TagValue>) -> &mut Self {
        self.tags.push((label, value.into()));
        self
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn as_dataset(&self, addressing: Addressing, registry: &CodecRegistry) -> KlvResult<KlvSet> {
        create_dataset(&self.tags, addressing, registry)
    }

    /// Encode a complete packet
    ///
    /// When the configuration asks for it, the UAS LS version item is
    /// appended if no tag carries it.
    pub fn as_packet(&self, config: &PacketConfig, registry: &CodecRegistry) -> KlvResult<Vec<u8>> {
        let has_version = self
            .tags
            .iter()
            .any(|(label, _)| *label == st0601::UAS_LS_VERSION_NUMBER);

        if config.append_version && !has_version {
            let mut tags = self.tags.clone();
            tags.push((
                st0601::UAS_LS_VERSION_NUMBER,
                TagValue::Numeric(st0601::DEFAULT_LS_VERSION),
            ));
            return create_packet(&tags, config, registry);
        }
        create_packet(&self.tags, config, registry)
    }
}
