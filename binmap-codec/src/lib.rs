//! # binmap Codec
//!
//! Encoding and decoding of records against a compiled layout.
//!
//! This crate provides:
//! - [`Record`], the per-instance value store mediating access by role
//! - [`encode`] / [`encode_into`] producing fixed-length byte buffers
//! - [`decode`] populating a fresh record from wire bytes
//!
//! Layouts are immutable and can be shared across threads freely. Each
//! record owns its values and needs external locking only when a single
//! instance is mutated from several threads.

pub mod decoder;
pub mod encoder;
pub mod record;

pub use decoder::decode;
pub use encoder::{encode, encode_into};
pub use record::Record;
