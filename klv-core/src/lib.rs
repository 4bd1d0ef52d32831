//! Core types and utilities for KLV metadata
//!
//! This crate provides the error type, the identifier model (Universal Labels
//! and standard-scoped Local Tags) and the framing configuration shared by
//! every other crate of the workspace.

pub mod error;
pub mod framing;
pub mod label;

pub use error::{KlvError, KlvResult};
pub use framing::{ChecksumKind, Framing, KeyBytes, KeyMode, LengthForm};
pub use label::{LocalTag, UniversalLabel, UL_LENGTH};
