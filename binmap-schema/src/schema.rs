//! Schema definition and builder.

use crate::compiler::compile;
use crate::field::{EnumDomain, FieldDescriptor};
use crate::layout::Layout;
use crate::view::FieldView;
use binmap_core::{ByteOrder, Result, Value};
use std::sync::Arc;

/// Decode policy for constant and autolength fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Validation {
    /// Wire bytes are accepted as-is.
    #[default]
    Passive,
    /// Constants must match their declared value, autolength fields the
    /// encoded length, and strict enums a declared member.
    Strict,
}

/// Ordered field descriptors plus the settings they are packed with.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    /// Fields in wire order.
    pub fields: Vec<FieldDescriptor>,
    /// Byte order for every multi-byte field.
    pub byte_order: ByteOrder,
    /// Decode validation policy.
    pub validation: Validation,
}

impl Schema {
    /// Creates a schema from an ordered field list.
    #[must_use]
    pub fn new(fields: Vec<FieldDescriptor>, byte_order: ByteOrder) -> Self {
        Self {
            fields,
            byte_order,
            validation: Validation::default(),
        }
    }

    /// Compiles the schema into a shareable layout.
    ///
    /// # Errors
    /// Returns the first schema problem found, see [`compile`].
    pub fn compile(&self) -> Result<Arc<Layout>> {
        compile(self).map(Arc::new)
    }
}

/// Builder for assembling a schema field by field.
///
/// # Example
/// ```
/// use binmap_core::ByteOrder;
/// use binmap_schema::SchemaBuilder;
///
/// let layout = SchemaBuilder::new()
///     .byte_order(ByteOrder::BigEndian)
///     .field("temp", "b")
///     .field("humidity", "B")
///     .padding(2)
///     .compile()
///     .expect("valid schema");
/// assert_eq!(layout.total_length(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Creates an empty builder with native byte order and passive validation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the byte order.
    #[must_use]
    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.schema.byte_order = order;
        self
    }

    /// Sets the decode validation policy.
    #[must_use]
    pub fn validation(mut self, validation: Validation) -> Self {
        self.schema.validation = validation;
        self
    }

    /// Appends a prepared descriptor.
    #[must_use]
    pub fn descriptor(mut self, descriptor: FieldDescriptor) -> Self {
        self.schema.fields.push(descriptor);
        self
    }

    /// Appends a plain field.
    #[must_use]
    pub fn field(self, name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        self.descriptor(FieldDescriptor::plain(name, type_tag))
    }

    /// Appends a plain field with an initial value.
    #[must_use]
    pub fn field_with_default(
        self,
        name: impl Into<String>,
        type_tag: impl Into<String>,
        default: impl Into<Value>,
    ) -> Self {
        self.descriptor(FieldDescriptor::plain(name, type_tag).with_default(default))
    }

    /// Appends anonymous padding.
    #[must_use]
    pub fn padding(self, length: usize) -> Self {
        self.descriptor(FieldDescriptor::padding(length))
    }

    /// Appends named padding.
    #[must_use]
    pub fn named_padding(self, name: impl Into<String>, length: usize) -> Self {
        let mut descriptor = FieldDescriptor::padding(length);
        descriptor.name = name.into();
        self.descriptor(descriptor)
    }

    /// Appends a constant field.
    #[must_use]
    pub fn constant(
        self,
        name: impl Into<String>,
        type_tag: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.descriptor(FieldDescriptor::constant(name, type_tag, value))
    }

    /// Appends an autolength field.
    #[must_use]
    pub fn autolength(
        self,
        name: impl Into<String>,
        type_tag: impl Into<String>,
        offset: i64,
    ) -> Self {
        self.descriptor(FieldDescriptor::autolength(name, type_tag, offset))
    }

    /// Appends an enum-mapped field.
    #[must_use]
    pub fn enumerated(
        self,
        name: impl Into<String>,
        type_tag: impl Into<String>,
        domain: impl Into<Arc<EnumDomain>>,
        default: impl Into<Value>,
    ) -> Self {
        self.descriptor(FieldDescriptor::enumerated(name, type_tag, domain, default))
    }

    /// Appends a calculated field.
    #[must_use]
    pub fn calculated<F>(self, name: impl Into<String>, type_tag: impl Into<String>, f: F) -> Self
    where
        F: Fn(&FieldView<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.descriptor(FieldDescriptor::calculated(name, type_tag, f))
    }

    /// Appends fields described by struct-style format entries.
    ///
    /// # Errors
    /// Returns [`binmap_core::Error::Schema`] for a malformed entry.
    pub fn format_fields<'a, I>(mut self, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, format) in entries {
            self.schema
                .fields
                .push(FieldDescriptor::parse(name, format)?);
        }
        Ok(self)
    }

    /// Returns the assembled schema.
    #[must_use]
    pub fn build(self) -> Schema {
        self.schema
    }

    /// Compiles the assembled schema.
    ///
    /// # Errors
    /// Returns the first schema problem found.
    pub fn compile(self) -> Result<Arc<Layout>> {
        self.schema.compile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Role;

    #[test]
    fn test_builder_defaults() {
        let schema = SchemaBuilder::new().build();
        assert_eq!(schema.byte_order, ByteOrder::Native);
        assert_eq!(schema.validation, Validation::Passive);
        assert!(schema.fields.is_empty());
    }

    #[test]
    fn test_builder_order() {
        let schema = SchemaBuilder::new()
            .byte_order(ByteOrder::LittleEndian)
            .validation(Validation::Strict)
            .constant("magic", "H", 0xBEEFu16)
            .field("temp", "b")
            .named_padding("_pad", 2)
            .autolength("len", "B", 0)
            .build();

        let roles: Vec<&str> = schema.fields.iter().map(|f| f.role.name()).collect();
        assert_eq!(roles, ["constant", "plain", "padding", "autolength"]);
        assert_eq!(schema.fields[2].name, "_pad");
        assert_eq!(schema.fields[2].role, Role::Padding(2));
        assert_eq!(schema.validation, Validation::Strict);
    }

    #[test]
    fn test_format_fields() {
        let schema = SchemaBuilder::new()
            .format_fields([("temp", "B"), ("_pad1", "xx"), ("humidity", "B")])
            .expect("valid formats")
            .build();
        assert_eq!(schema.fields.len(), 3);
        assert_eq!(schema.fields[1].role, Role::Padding(2));

        assert!(SchemaBuilder::new().format_fields([("x", "4B")]).is_err());
    }
}
