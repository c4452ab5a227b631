//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```
//! use binmap::prelude::*;
//! ```

// Core types
pub use binmap_core::buffer::{ReadBuffer, WriteBuffer};
pub use binmap_core::error::{Error, Result};
pub use binmap_core::types::{ByteOrder, ScalarType};
pub use binmap_core::value::{EnumValue, Value};

// Schema types
pub use binmap_schema::{
    EnumDomain, EnumKind, FieldDescriptor, FieldView, Layout, Role, Schema, SchemaBuilder,
    Validation,
};

// Codec types
pub use binmap_codec::{Record, decode, encode, encode_into};
