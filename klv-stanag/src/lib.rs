//! STANAG 4609 datasets and MISB catalogs
//!
//! This crate provides the tag/value builder for datasets and UAS Datalink
//! packets, and the field catalogs of the supported MISB standards:
//!
//! - [`st0601`]: UAS Datalink Local Set
//! - [`st0102`]: Security Metadata Local Set
//! - [`st0903`]: VMTI Local Set, VTarget packs, Algorithm and Ontology sets
//!
//! Catalogs are data only; [`register_all`] loads every one of them into a
//! registry.

pub mod dataset;
pub mod error;
pub mod st0102;
pub mod st0601;
pub mod st0903;

pub use dataset::{
    create_dataset, create_packet, create_stanag4609_packet, Addressing, CompositeBuilder, Tag,
    TagValue,
};
pub use error::{KlvError, KlvResult};

use klv_codec::CodecRegistry;

/// Register the fields of every supported standard
pub fn register_all(registry: &mut CodecRegistry) -> KlvResult<()> {
    st0601::register(registry)?;
    st0102::register(registry)?;
    st0903::register(registry)?;
    log::debug!("Registered STANAG catalogs, {} codecs", registry.len());
    Ok(())
}

/// Registry holding every supported standard
pub fn standard_registry() -> KlvResult<CodecRegistry> {
    let mut registry = CodecRegistry::new();
    register_all(&mut registry)?;
    Ok(registry)
}
