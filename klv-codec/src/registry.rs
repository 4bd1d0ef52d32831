//! Value codec registry
//!
//! Maps a [`UniversalLabel`] to the pair of pure functions that convert a
//! domain value to its wire bytes and back. Registries are plain values
//! passed to the encode/decode entry points; a process-wide instance can be
//! published once with [`CodecRegistry::install`] and is read-only from then on.

use crate::error::{KlvError, KlvResult};
use crate::transform;
use klv_core::UniversalLabel;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Encoder half of a value codec
pub type EncodeFn = Arc<dyn Fn(f64) -> KlvResult<Vec<u8>> + Send + Sync>;

/// Decoder half of a value codec
pub type DecodeFn = Arc<dyn Fn(&[u8]) -> KlvResult<f64> + Send + Sync>;

static GLOBAL_REGISTRY: OnceCell<CodecRegistry> = OnceCell::new();

/// Encode/decode function pair for one identifier
#[derive(Clone)]
pub struct ValueCodec {
    encoder: EncodeFn,
    decoder: DecodeFn,
    kind: &'static str,
}

impl ValueCodec {
    /// Build a codec from arbitrary functions
    pub fn custom<E, D>(encoder: E, decoder: D) -> Self
    where
        E: Fn(f64) -> KlvResult<Vec<u8>> + Send + Sync + 'static,
        D: Fn(&[u8]) -> KlvResult<f64> + Send + Sync + 'static,
    {
        Self {
            encoder: Arc::new(encoder),
            decoder: Arc::new(decoder),
            kind: "custom",
        }
    }

    /// Direct unsigned integer of `width` bytes
    pub fn unsigned(width: usize) -> KlvResult<Self> {
        transform::check_width(width)?;
        Ok(Self {
            kind: "unsigned",
            ..Self::custom(
                move |v| transform::encode_unsigned(v, width),
                move |b| transform::decode_unsigned(b, width),
            )
        })
    }

    /// Linear mapping of `[min, max]` onto `width` bytes
    pub fn imap(min: f64, max: f64, width: usize) -> KlvResult<Self> {
        transform::check_width(width)?;
        // Reject degenerate ranges at registration rather than on first use
        transform::encode_imap(min, min, max, width)?;
        Ok(Self {
            kind: "imap",
            ..Self::custom(
                move |v| transform::encode_imap(v, min, max, width),
                move |b| transform::decode_imap(b, min, max, width),
            )
        })
    }

    /// Symmetric signed mapping of `[-amplitude, +amplitude]` onto `width` bytes
    pub fn signed(amplitude: f64, width: usize) -> KlvResult<Self> {
        transform::check_width(width)?;
        transform::encode_signed(0.0, amplitude, width)?;
        Ok(Self {
            kind: "signed",
            ..Self::custom(
                move |v| transform::encode_signed(v, amplitude, width),
                move |b| transform::decode_signed(b, amplitude, width),
            )
        })
    }

    /// Probability in `[0, 1]` scaled to one byte
    pub fn probability() -> Self {
        Self {
            kind: "probability",
            ..Self::custom(transform::encode_probability, transform::decode_probability)
        }
    }

    /// Percentage in `[0, 100]` stored directly in one byte
    pub fn percentage() -> Self {
        Self {
            kind: "percentage",
            ..Self::custom(transform::encode_percentage, transform::decode_percentage)
        }
    }

    pub fn encode(&self, value: f64) -> KlvResult<Vec<u8>> {
        (self.encoder)(value)
    }

    pub fn decode(&self, bytes: &[u8]) -> KlvResult<f64> {
        (self.decoder)(bytes)
    }

    /// Name of the transform family, for diagnostics
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl fmt::Debug for ValueCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueCodec").field("kind", &self.kind).finish()
    }
}

/// Registry of value codecs keyed by Universal Label
#[derive(Debug, Clone, Default)]
pub struct CodecRegistry {
    entries: HashMap<UniversalLabel, ValueCodec>,
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an encode/decode function pair for `label`
    pub fn register<E, D>(&mut self, label: UniversalLabel, encoder: E, decoder: D)
    where
        E: Fn(f64) -> KlvResult<Vec<u8>> + Send + Sync + 'static,
        D: Fn(&[u8]) -> KlvResult<f64> + Send + Sync + 'static,
    {
        self.register_codec(label, ValueCodec::custom(encoder, decoder));
    }

    /// Register a prepared codec for `label`, replacing any previous entry
    pub fn register_codec(&mut self, label: UniversalLabel, codec: ValueCodec) {
        if let Some(previous) = self.entries.insert(label, codec) {
            log::debug!("Replaced {} codec registered for {}", previous.kind(), label);
        }
    }

    pub fn lookup(&self, label: &UniversalLabel) -> Option<&ValueCodec> {
        self.entries.get(label)
    }

    /// Look up `label`, failing with `UnknownIdentifier` on a miss
    pub fn require(&self, label: &UniversalLabel) -> KlvResult<&ValueCodec> {
        self.lookup(label)
            .ok_or(KlvError::UnknownIdentifier(*label))
    }

    pub fn contains(&self, label: &UniversalLabel) -> bool {
        self.entries.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Publish this registry as the process-wide instance
    ///
    /// Succeeds once per process; the installed registry is immutable.
    pub fn install(self) -> KlvResult<&'static CodecRegistry> {
        let count = self.len();
        GLOBAL_REGISTRY
            .set(self)
            .map_err(|_| KlvError::Registry("Global codec registry already installed".to_string()))?;
        log::debug!("Installed global codec registry with {} entries", count);
        Self::global()
    }

    /// Get the process-wide registry
    pub fn global() -> KlvResult<&'static CodecRegistry> {
        GLOBAL_REGISTRY
            .get()
            .ok_or_else(|| KlvError::Registry("Global codec registry not installed".to_string()))
    }

    /// Get the process-wide registry, building it with `init` on first use
    pub fn global_or_init<F>(init: F) -> &'static CodecRegistry
    where
        F: FnOnce() -> CodecRegistry,
    {
        GLOBAL_REGISTRY.get_or_init(init)
    }
}
