//! Error types for binmap operations.

use thiserror::Error;

/// Core error type for binmap operations.
///
/// Schema problems surface from compilation, before any record exists.
/// The remaining variants surface from field access or from a single
/// encode/decode call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Structural problem in a schema definition.
    #[error("schema error: {message}")]
    Schema {
        /// Error message.
        message: String,
    },

    /// Type tag that the scalar registry does not know.
    #[error("unknown scalar type '{tag}'")]
    UnknownType {
        /// Unresolved type tag.
        tag: String,
    },

    /// Value outside the domain of the field's scalar type.
    #[error("field '{field}': {scalar} format requires {range}, got {value}")]
    ValueOutOfRange {
        /// Field name.
        field: String,
        /// Offending value, rendered.
        value: String,
        /// Scalar type name.
        scalar: &'static str,
        /// Accepted range, rendered.
        range: String,
    },

    /// Value of the wrong kind for the field.
    #[error("field '{field}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Field name.
        field: String,
        /// Expected value kind.
        expected: &'static str,
        /// Actual value kind.
        found: &'static str,
    },

    /// Write to a field whose value is owned by the schema.
    #[error("{role} field '{field}' is read-only")]
    ImmutableField {
        /// Field name.
        field: String,
        /// Role of the field.
        role: &'static str,
    },

    /// Read of a field that holds no retrievable value.
    #[error("padding ({field}) is not readable")]
    AttributeUnavailable {
        /// Field name.
        field: String,
    },

    /// Decode input whose size differs from the layout.
    #[error("length mismatch: expected {expected} bytes, got {actual} bytes")]
    LengthMismatch {
        /// Layout total length.
        expected: usize,
        /// Input length.
        actual: usize,
    },

    /// Field name not declared in the schema.
    #[error("unknown field '{name}'")]
    UnknownField {
        /// Requested name.
        name: String,
    },

    /// Calculated field reading a field that is not resolved yet.
    #[error("calculated field '{field}' cannot read '{target}' declared after it")]
    ForwardReference {
        /// Calculated field name.
        field: String,
        /// Field it tried to read.
        target: String,
    },

    /// Decoded value differs from the declared one under strict validation.
    #[error("field '{field}': expected {expected} on the wire, found {actual}")]
    ConstantMismatch {
        /// Field name.
        field: String,
        /// Declared value, rendered.
        expected: String,
        /// Decoded value, rendered.
        actual: String,
    },
}

impl Error {
    /// Creates a schema error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Creates an unknown field error.
    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField { name: name.into() }
    }

    /// Creates an immutable field error.
    pub fn immutable(field: impl Into<String>, role: &'static str) -> Self {
        Self::ImmutableField {
            field: field.into(),
            role,
        }
    }

    /// Creates a type mismatch error.
    pub fn mismatch(field: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            found,
        }
    }
}

/// Result type alias for binmap operations.
pub type Result<T> = std::result::Result<T, Error>;
