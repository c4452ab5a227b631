//! Compiled byte layout.
//!
//! A [`Layout`] is the immutable result of compiling a schema: every field
//! with its resolved scalar type, offset and width, plus the total length.
//! It is shared read-only by every record of the schema.

use crate::field::{EnumKind, FieldDescriptor, Role};
use crate::schema::Validation;
use binmap_core::{ByteOrder, Error, Result, ScalarType, Value};
use std::collections::HashMap;

/// One field placed in the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSlot {
    pub(crate) descriptor: FieldDescriptor,
    pub(crate) scalar: Option<ScalarType>,
    pub(crate) offset: usize,
    pub(crate) width: usize,
    pub(crate) initial: Option<Value>,
}

impl FieldSlot {
    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Returns the field role.
    #[must_use]
    pub fn role(&self) -> &Role {
        &self.descriptor.role
    }

    /// Returns the resolved scalar type, `None` for padding.
    #[must_use]
    pub const fn scalar(&self) -> Option<ScalarType> {
        self.scalar
    }

    /// Returns the byte offset of the field.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the encoded width of the field in bytes.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the value a fresh record starts with, `None` for padding.
    #[must_use]
    pub fn initial(&self) -> Option<&Value> {
        self.initial.as_ref()
    }

    /// Returns true if the field is padding.
    #[must_use]
    pub const fn is_padding(&self) -> bool {
        self.descriptor.role.is_padding()
    }

    /// Checks a value against the field and returns its stored form.
    ///
    /// Enum-mapped fields accept a member of their domain or a raw integer
    /// and store the underlying integer. Every other field stores the value
    /// normalized by its scalar type.
    ///
    /// # Errors
    /// Returns [`Error::TypeMismatch`] or [`Error::ValueOutOfRange`] when the
    /// value cannot be stored, [`Error::AttributeUnavailable`] for padding.
    pub fn check(&self, value: &Value) -> Result<Value> {
        let scalar = self.scalar.ok_or_else(|| Error::AttributeUnavailable {
            field: self.name().to_string(),
        })?;

        let Role::EnumMapped { domain, .. } = self.role() else {
            return scalar.coerce(self.name(), value);
        };

        match value {
            Value::Enum(member) => {
                if !domain.contains(member) {
                    return Err(Error::mismatch(self.name(), "member of its enum", "enum"));
                }
                scalar.coerce(self.name(), &Value::Int(member.value()))
            }
            Value::Int(_) | Value::UInt(_) => {
                let stored = scalar.coerce(self.name(), value)?;
                if domain.kind() == EnumKind::Strict && self.member_of(&stored).is_none() {
                    return Err(Error::ValueOutOfRange {
                        field: self.name().to_string(),
                        value: value.to_string(),
                        scalar: scalar.name(),
                        range: format!("a member of {}", domain.name()),
                    });
                }
                Ok(stored)
            }
            other => Err(Error::mismatch(self.name(), "enum or integer", other.kind_name())),
        }
    }

    /// Turns a stored value into what `get()` returns.
    ///
    /// Enum-mapped fields yield their domain member; everything else is
    /// returned as stored.
    ///
    /// # Errors
    /// Returns [`Error::ValueOutOfRange`] for a strict enum holding a value
    /// without a member, which only decoding can produce.
    pub fn present(&self, stored: &Value) -> Result<Value> {
        let Role::EnumMapped { domain, .. } = self.role() else {
            return Ok(stored.clone());
        };
        self.member_of(stored).map(Value::Enum).ok_or_else(|| Error::ValueOutOfRange {
            field: self.name().to_string(),
            value: stored.to_string(),
            scalar: self.scalar.map_or("enum", |s| s.name()),
            range: format!("a member of {}", domain.name()),
        })
    }

    fn member_of(&self, stored: &Value) -> Option<binmap_core::EnumValue> {
        let Role::EnumMapped { domain, .. } = self.role() else {
            return None;
        };
        let value = match domain.kind() {
            EnumKind::Strict => stored.as_i64()?,
            // Flags keep any bit pattern, including the high bit of a u64.
            EnumKind::Flags => stored
                .as_i64()
                .or_else(|| stored.as_u64().map(|v| v as i64))?,
        };
        domain.lookup_sized(value, self.width)
    }
}

/// Compiled, immutable layout of a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub(crate) fields: Vec<FieldSlot>,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) total_length: usize,
    pub(crate) byte_order: ByteOrder,
    pub(crate) validation: Validation,
    pub(crate) autolength: Option<usize>,
}

impl Layout {
    /// Returns the fields in schema order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSlot] {
        &self.fields
    }

    /// Returns the number of fields, padding included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the layout has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the encoded length of every record in bytes.
    #[must_use]
    pub const fn total_length(&self) -> usize {
        self.total_length
    }

    /// Returns the byte order of the schema.
    #[must_use]
    pub const fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Returns the decode validation policy.
    #[must_use]
    pub const fn validation(&self) -> Validation {
        self.validation
    }

    /// Returns the index of the autolength field, if any.
    #[must_use]
    pub const fn autolength(&self) -> Option<usize> {
        self.autolength
    }

    /// Looks up a field index by name.
    ///
    /// # Errors
    /// Returns [`Error::UnknownField`] if no field has that name.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| Error::unknown_field(name))
    }

    /// Looks up a field by name.
    ///
    /// # Errors
    /// Returns [`Error::UnknownField`] if no field has that name.
    pub fn field(&self, name: &str) -> Result<&FieldSlot> {
        self.index_of(name).map(|idx| &self.fields[idx])
    }

    /// Returns the value an autolength field encodes.
    #[must_use]
    pub fn autolength_value(&self, offset: i64) -> i128 {
        self.total_length as i128 + i128::from(offset)
    }
}
