//! Error types re-exported from `klv-core`

pub use klv_core::error::{KlvError, KlvResult};
