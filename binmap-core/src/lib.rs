//! # binmap Core
//!
//! Core types shared by every binmap crate.
//!
//! This crate provides:
//! - The scalar type registry (fixed-width primitive binary types)
//! - The [`Value`] model records are read and written through
//! - Byte-order aware buffer traits used by the codec engine
//! - Error types for schema compilation, field access and decoding

pub mod buffer;
pub mod error;
pub mod types;
pub mod value;

pub use buffer::{ReadBuffer, WriteBuffer};
pub use error::{Error, Result};
pub use types::{ByteOrder, ScalarDomain, ScalarKind, ScalarType};
pub use value::{EnumValue, Value};
