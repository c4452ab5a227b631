//! # binmap
//!
//! Fixed-layout binary records driven by a declarative field schema.
//!
//! A schema is an ordered list of fields, each with a scalar type and a
//! role. Compiling it yields an immutable [`Layout`] of offsets and widths;
//! records of that layout encode to, and decode from, byte buffers of
//! exactly the layout's total length.
//!
//! ## Roles
//!
//! - **Plain** - read/write, range-checked against the scalar type
//! - **Padding** - zero bytes on the wire, never readable
//! - **Constant** - always encodes its declared value
//! - **Autolength** - encodes the record length plus an offset
//! - **EnumMapped** - an integer exposed as an enum member
//! - **Calculated** - recomputed from earlier fields on every encode
//!
//! ## Quick Start
//!
//! ```
//! use binmap::prelude::*;
//!
//! let layout = SchemaBuilder::new()
//!     .field("temp", "b")
//!     .field("hum", "B")
//!     .calculated("checksum", "B", |v| {
//!         Ok(Value::Int((v.int("temp")? + v.int("hum")?) & 0xFF))
//!     })
//!     .compile()?;
//!
//! let record = Record::with_values(layout.clone(), [("temp", -20), ("hum", 10)])?;
//! let bytes = record.encode()?;
//! assert_eq!(bytes, [0xEC, 0x0A, 0xF6]);
//!
//! let decoded = Record::decode(layout, &bytes)?;
//! assert_eq!(decoded.get("temp")?, Value::Int(-20));
//! # Ok::<(), binmap::Error>(())
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Scalar registry, values, buffers, errors
//! - [`schema`] - Field descriptors, builder, compiler, layout
//! - [`codec`] - Records, encoder, decoder

pub mod prelude;

/// Scalar registry, values and buffers.
pub mod core {
    pub use binmap_core::*;
}

/// Schema declaration and compilation.
pub mod schema {
    pub use binmap_schema::*;
}

/// Record storage and the encode/decode engine.
pub mod codec {
    pub use binmap_codec::*;
}

// Re-export commonly used items at the crate root
pub use binmap_codec::{Record, decode, encode, encode_into};
pub use binmap_core::{ByteOrder, EnumValue, Error, Result, ScalarType, Value};
pub use binmap_schema::{
    EnumDomain, EnumKind, FieldDescriptor, FieldView, Layout, Role, Schema, SchemaBuilder,
    Validation,
};
