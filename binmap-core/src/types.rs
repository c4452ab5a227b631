//! Scalar type registry.
//!
//! This module maps type tags to the fixed-width primitive binary types a
//! field can be declared with, along with their numeric domain and sign.
//! The registry is a static table; nothing in it changes at runtime.

use crate::error::{Error, Result};
use crate::value::Value;
use std::fmt;

/// Byte order used to pack every multi-byte field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    /// Host byte order.
    #[default]
    Native,
    /// Little-endian byte order.
    LittleEndian,
    /// Big-endian (network) byte order.
    BigEndian,
}

impl ByteOrder {
    /// Parses byte order from a format prefix or a name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "@" | "=" | "native" => Some(Self::Native),
            "<" | "littleendian" | "little-endian" | "le" => Some(Self::LittleEndian),
            ">" | "!" | "bigendian" | "big-endian" | "be" | "network" => Some(Self::BigEndian),
            _ => None,
        }
    }

    /// Returns true if multi-byte values are written most significant byte first.
    #[must_use]
    pub const fn is_big_endian(&self) -> bool {
        match self {
            Self::BigEndian => true,
            Self::LittleEndian => false,
            Self::Native => cfg!(target_endian = "big"),
        }
    }
}

/// Numeric family of a scalar type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Two's complement integer.
    Signed,
    /// Unsigned integer.
    Unsigned,
    /// IEEE 754 floating point.
    Float,
    /// Single byte boolean.
    Bool,
    /// Single byte character.
    Char,
}

/// Set of values a scalar type can represent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarDomain {
    /// Inclusive integer range.
    Integer {
        /// Smallest representable value.
        min: i128,
        /// Largest representable value.
        max: i128,
    },
    /// Floating point values with finite magnitude up to `max`.
    Float {
        /// Largest finite magnitude.
        max: f64,
    },
    /// `true` or `false`.
    Bool,
    /// Any single byte.
    Char,
}

impl fmt::Display for ScalarDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer { min, max } => write!(f, "{min} <= number <= {max}"),
            Self::Float { max } => write!(f, "|number| <= {max:e}"),
            Self::Bool => write!(f, "a bool"),
            Self::Char => write!(f, "a single byte"),
        }
    }
}

/// Primitive binary types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// Single character (1 byte).
    Char,
    /// Boolean (1 byte).
    Bool,
    /// Signed 8-bit integer.
    Int8,
    /// Unsigned 8-bit integer.
    Uint8,
    /// Signed 16-bit integer.
    Int16,
    /// Unsigned 16-bit integer.
    Uint16,
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 32-bit integer.
    Uint32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 64-bit integer.
    Uint64,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
}

/// Registry of type tags: struct-format codes first, then descriptive names.
const REGISTRY: &[(&str, ScalarType)] = &[
    ("c", ScalarType::Char),
    ("?", ScalarType::Bool),
    ("b", ScalarType::Int8),
    ("B", ScalarType::Uint8),
    ("h", ScalarType::Int16),
    ("H", ScalarType::Uint16),
    ("i", ScalarType::Int32),
    ("I", ScalarType::Uint32),
    ("l", ScalarType::Int32),
    ("L", ScalarType::Uint32),
    ("q", ScalarType::Int64),
    ("Q", ScalarType::Uint64),
    ("f", ScalarType::Float32),
    ("d", ScalarType::Float64),
    ("char", ScalarType::Char),
    ("bool", ScalarType::Bool),
    ("int8", ScalarType::Int8),
    ("uint8", ScalarType::Uint8),
    ("int16", ScalarType::Int16),
    ("uint16", ScalarType::Uint16),
    ("int32", ScalarType::Int32),
    ("uint32", ScalarType::Uint32),
    ("int64", ScalarType::Int64),
    ("uint64", ScalarType::Uint64),
    ("float32", ScalarType::Float32),
    ("float", ScalarType::Float32),
    ("float64", ScalarType::Float64),
    ("double", ScalarType::Float64),
];

impl ScalarType {
    /// Resolves a type tag against the registry.
    ///
    /// # Errors
    /// Returns [`Error::UnknownType`] if the tag is not registered.
    pub fn resolve(tag: &str) -> Result<Self> {
        REGISTRY
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, scalar)| *scalar)
            .ok_or_else(|| Error::UnknownType {
                tag: tag.to_string(),
            })
    }

    /// Returns the size of the type in bytes.
    #[must_use]
    pub const fn width(&self) -> usize {
        match self {
            Self::Char | Self::Bool | Self::Int8 | Self::Uint8 => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Int32 | Self::Uint32 | Self::Float32 => 4,
            Self::Int64 | Self::Uint64 | Self::Float64 => 8,
        }
    }

    /// Returns the numeric family of the type.
    #[must_use]
    pub const fn kind(&self) -> ScalarKind {
        match self {
            Self::Char => ScalarKind::Char,
            Self::Bool => ScalarKind::Bool,
            Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64 => ScalarKind::Signed,
            Self::Uint8 | Self::Uint16 | Self::Uint32 | Self::Uint64 => ScalarKind::Unsigned,
            Self::Float32 | Self::Float64 => ScalarKind::Float,
        }
    }

    /// Returns true if this is a signed integer or floating point type.
    #[must_use]
    pub const fn is_signed(&self) -> bool {
        matches!(self.kind(), ScalarKind::Signed | ScalarKind::Float)
    }

    /// Returns true if this is an integer type.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self.kind(), ScalarKind::Signed | ScalarKind::Unsigned)
    }

    /// Returns the canonical type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Uint8 => "uint8",
            Self::Int16 => "int16",
            Self::Uint16 => "uint16",
            Self::Int32 => "int32",
            Self::Uint32 => "uint32",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    /// Returns the set of values the type can hold.
    #[must_use]
    pub fn domain(&self) -> ScalarDomain {
        match self.kind() {
            ScalarKind::Signed => {
                let bits = self.width() * 8;
                ScalarDomain::Integer {
                    min: -(1i128 << (bits - 1)),
                    max: (1i128 << (bits - 1)) - 1,
                }
            }
            ScalarKind::Unsigned => ScalarDomain::Integer {
                min: 0,
                max: (1i128 << (self.width() * 8)) - 1,
            },
            ScalarKind::Float if self.width() == 4 => ScalarDomain::Float {
                max: f64::from(f32::MAX),
            },
            ScalarKind::Float => ScalarDomain::Float { max: f64::MAX },
            ScalarKind::Bool => ScalarDomain::Bool,
            ScalarKind::Char => ScalarDomain::Char,
        }
    }

    /// Checks `value` against the type and normalizes it to the type's
    /// canonical representation.
    ///
    /// Integers come back as [`Value::Int`] or [`Value::UInt`], floats are
    /// rounded to the type's precision.
    ///
    /// # Arguments
    /// * `field` - Field name, used in error messages
    /// * `value` - Value to check
    ///
    /// # Errors
    /// Returns [`Error::TypeMismatch`] for a value of the wrong kind and
    /// [`Error::ValueOutOfRange`] for a value outside the domain.
    pub fn coerce(&self, field: &str, value: &Value) -> Result<Value> {
        let out_of_range = || Error::ValueOutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            scalar: self.name(),
            range: self.domain().to_string(),
        };

        match (self.kind(), self.domain()) {
            (ScalarKind::Signed | ScalarKind::Unsigned, ScalarDomain::Integer { min, max }) => {
                let v = match value {
                    Value::Int(_) | Value::UInt(_) => value.as_i128(),
                    _ => None,
                }
                .ok_or_else(|| Error::mismatch(field, "integer", value.kind_name()))?;
                if v < min || v > max {
                    return Err(out_of_range());
                }
                if self.kind() == ScalarKind::Signed {
                    Ok(Value::Int(v as i64))
                } else {
                    Ok(Value::UInt(v as u64))
                }
            }
            (ScalarKind::Float, ScalarDomain::Float { max }) => {
                let v = value
                    .as_f64()
                    .ok_or_else(|| Error::mismatch(field, "float", value.kind_name()))?;
                if v.is_finite() && v.abs() > max {
                    return Err(out_of_range());
                }
                if self.width() == 4 {
                    Ok(Value::Float(f64::from(v as f32)))
                } else {
                    Ok(Value::Float(v))
                }
            }
            (ScalarKind::Bool, _) => match value {
                Value::Bool(_) => Ok(value.clone()),
                other => Err(Error::mismatch(field, "bool", other.kind_name())),
            },
            (ScalarKind::Char, _) => match value {
                Value::Char(_) => Ok(value.clone()),
                other => Err(Error::mismatch(field, "char", other.kind_name())),
            },
            _ => Err(Error::mismatch(field, self.name(), value.kind_name())),
        }
    }

    /// Returns the zero value of the type.
    #[must_use]
    pub const fn zero(&self) -> Value {
        match self.kind() {
            ScalarKind::Signed => Value::Int(0),
            ScalarKind::Unsigned => Value::UInt(0),
            ScalarKind::Float => Value::Float(0.0),
            ScalarKind::Bool => Value::Bool(false),
            ScalarKind::Char => Value::Char(0),
        }
    }

    /// Returns the raw bit pattern of a value, truncated to the type width.
    ///
    /// The value is expected to have gone through [`ScalarType::coerce`].
    #[must_use]
    pub fn to_bits(&self, value: &Value) -> u64 {
        let bits = match value {
            Value::Int(v) => *v as u64,
            Value::UInt(v) => *v,
            Value::Float(v) if self.width() == 4 => u64::from((*v as f32).to_bits()),
            Value::Float(v) => v.to_bits(),
            Value::Bool(v) => u64::from(*v),
            Value::Char(v) => u64::from(*v),
            Value::Enum(e) => e.value() as u64,
        };
        if self.width() == 8 {
            bits
        } else {
            bits & ((1u64 << (self.width() * 8)) - 1)
        }
    }

    /// Rebuilds a value from the raw bit pattern read off the wire.
    #[must_use]
    pub fn from_bits(&self, bits: u64) -> Value {
        let width_bits = (self.width() * 8) as u32;
        match self.kind() {
            ScalarKind::Signed => {
                let shift = 64 - width_bits;
                Value::Int(((bits << shift) as i64) >> shift)
            }
            ScalarKind::Unsigned => Value::UInt(bits),
            ScalarKind::Float if self.width() == 4 => {
                Value::Float(f64::from(f32::from_bits(bits as u32)))
            }
            ScalarKind::Float => Value::Float(f64::from_bits(bits)),
            ScalarKind::Bool => Value::Bool(bits != 0),
            ScalarKind::Char => Value::Char(bits as u8),
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
