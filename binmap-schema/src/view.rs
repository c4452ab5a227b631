//! Read-only view handed to calculated fields.

use crate::layout::Layout;
use binmap_core::{Error, Result, Value};

/// Resolved values of the fields declared before a calculated field.
///
/// Reads of the calculated field itself or of anything declared after it
/// fail with [`Error::ForwardReference`].
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    layout: &'a Layout,
    resolved: &'a [Option<Value>],
    current: &'a str,
}

impl<'a> FieldView<'a> {
    /// Creates a view over the first `resolved.len()` fields of `layout`.
    ///
    /// # Arguments
    /// * `layout` - Layout the values belong to
    /// * `resolved` - Stored values in schema order, `None` for padding
    /// * `current` - Name of the calculated field being evaluated
    #[must_use]
    pub fn new(layout: &'a Layout, resolved: &'a [Option<Value>], current: &'a str) -> Self {
        Self {
            layout,
            resolved,
            current,
        }
    }

    /// Returns the layout the view belongs to.
    #[must_use]
    pub fn layout(&self) -> &'a Layout {
        self.layout
    }

    /// Reads a field the way `get()` on a record would.
    ///
    /// # Errors
    /// Returns [`Error::UnknownField`], [`Error::ForwardReference`] or
    /// [`Error::AttributeUnavailable`] for fields that cannot be read.
    pub fn get(&self, name: &str) -> Result<Value> {
        let idx = self.layout.index_of(name)?;
        let slot = &self.layout.fields()[idx];
        if slot.is_padding() {
            return Err(Error::AttributeUnavailable {
                field: name.to_string(),
            });
        }
        match self.resolved.get(idx) {
            Some(Some(stored)) => slot.present(stored),
            _ => Err(Error::ForwardReference {
                field: self.current.to_string(),
                target: name.to_string(),
            }),
        }
    }

    /// Reads an integer field, enum members included.
    ///
    /// # Errors
    /// As [`FieldView::get`], plus [`Error::TypeMismatch`] for non-integers.
    pub fn int(&self, name: &str) -> Result<i64> {
        let value = self.get(name)?;
        value
            .as_i64()
            .ok_or_else(|| Error::mismatch(name, "integer", value.kind_name()))
    }

    /// Reads a numeric field as a float.
    ///
    /// # Errors
    /// As [`FieldView::get`], plus [`Error::TypeMismatch`] for non-numbers.
    pub fn float(&self, name: &str) -> Result<f64> {
        let value = self.get(name)?;
        value
            .as_f64()
            .or_else(|| value.as_i64().map(|v| v as f64))
            .ok_or_else(|| Error::mismatch(name, "number", value.kind_name()))
    }
}
