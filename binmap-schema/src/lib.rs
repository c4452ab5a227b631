//! # binmap Schema
//!
//! Schema declaration and compilation.
//!
//! This crate provides:
//! - Field descriptors and their roles (plain, padding, constant,
//!   autolength, enum-mapped, calculated)
//! - Enum domains, strict or flag-style
//! - A builder for assembling schemas
//! - The compiler producing an immutable, shareable [`Layout`]

pub mod compiler;
pub mod field;
pub mod layout;
pub mod schema;
pub mod view;

pub use compiler::compile;
pub use field::{CalculateFn, EnumDomain, EnumKind, FieldDescriptor, Role};
pub use layout::{FieldSlot, Layout};
pub use schema::{Schema, SchemaBuilder, Validation};
pub use view::FieldView;
