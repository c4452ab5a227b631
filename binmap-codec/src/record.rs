//! Record value store.
//!
//! A [`Record`] holds the current values of one message instance. Every
//! access goes through the field's role: padding is write-only noise,
//! constant, autolength and calculated fields are read-only, and enum-mapped
//! fields translate between members and their underlying integers.

use crate::decoder::decode;
use crate::encoder::{encode, resolve_values};
use binmap_core::{Error, Result, Value};
use binmap_schema::{Layout, Role};
use std::fmt;
use std::sync::Arc;

/// Live values of one message instance.
///
/// A record shares its [`Layout`] with every other record of the schema
/// and owns its value storage exclusively. It is not synchronized; share
/// one instance across threads only behind a lock.
#[derive(Clone)]
pub struct Record {
    layout: Arc<Layout>,
    values: Vec<Option<Value>>,
}

impl Record {
    /// Creates a record holding the initial value of every field.
    #[must_use]
    pub fn new(layout: Arc<Layout>) -> Self {
        let values = layout
            .fields()
            .iter()
            .map(|slot| slot.initial().cloned())
            .collect();
        Self { layout, values }
    }

    /// Creates a record and assigns the given values by name.
    ///
    /// # Errors
    /// Returns the first error any of the assignments raises, such as
    /// [`Error::UnknownField`] for a name the schema does not declare.
    pub fn with_values<I, K, V>(layout: Arc<Layout>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut record = Self::new(layout);
        for (name, value) in values {
            record.set(name.as_ref(), value)?;
        }
        Ok(record)
    }

    /// Decodes a record from exactly `layout.total_length()` bytes.
    ///
    /// # Errors
    /// See [`decode`].
    pub fn decode(layout: Arc<Layout>, bytes: &[u8]) -> Result<Self> {
        decode(layout, bytes)
    }

    pub(crate) fn from_parts(layout: Arc<Layout>, values: Vec<Option<Value>>) -> Self {
        Self { layout, values }
    }

    /// Returns the layout the record is encoded with.
    #[must_use]
    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    pub(crate) fn stored(&self) -> &[Option<Value>] {
        &self.values
    }

    /// Reads a field.
    ///
    /// Enum-mapped fields return their member, calculated fields are
    /// evaluated against the current values of the fields before them.
    ///
    /// # Errors
    /// Returns [`Error::UnknownField`] for an undeclared name and
    /// [`Error::AttributeUnavailable`] for padding.
    pub fn get(&self, name: &str) -> Result<Value> {
        let idx = self.layout.index_of(name)?;
        self.get_at(idx)
    }

    fn get_at(&self, idx: usize) -> Result<Value> {
        let slot = &self.layout.fields()[idx];
        match (slot.role(), &self.values[idx]) {
            (Role::Padding(_), _) | (_, None) => Err(Error::AttributeUnavailable {
                field: slot.name().to_string(),
            }),
            (Role::Calculated(_), _) => {
                let mut resolved = resolve_values(&self.layout, &self.values, idx + 1)?;
                resolved
                    .pop()
                    .flatten()
                    .ok_or_else(|| Error::unknown_field(slot.name()))
            }
            (_, Some(stored)) => slot.present(stored),
        }
    }

    /// Reads the stored value of a field without enum mapping or evaluation.
    ///
    /// For a decoded record this is the value found on the wire, which lets
    /// callers compare a received checksum against [`Record::get`].
    ///
    /// # Errors
    /// Returns [`Error::UnknownField`] for an undeclared name and
    /// [`Error::AttributeUnavailable`] for padding.
    pub fn raw(&self, name: &str) -> Result<&Value> {
        let idx = self.layout.index_of(name)?;
        self.values[idx]
            .as_ref()
            .ok_or_else(|| Error::AttributeUnavailable {
                field: name.to_string(),
            })
    }

    /// Assigns a field.
    ///
    /// Assignments to padding are ignored. Plain fields are range-checked
    /// against their scalar type; enum-mapped fields accept a member or a
    /// raw integer. On error the record is left unchanged.
    ///
    /// # Errors
    /// Returns [`Error::UnknownField`], [`Error::ImmutableField`],
    /// [`Error::TypeMismatch`] or [`Error::ValueOutOfRange`].
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let idx = self.layout.index_of(name)?;
        let slot = &self.layout.fields()[idx];
        match slot.role() {
            Role::Padding(_) => Ok(()),
            Role::Plain | Role::EnumMapped { .. } => {
                let stored = slot.check(&value.into())?;
                self.values[idx] = Some(stored);
                Ok(())
            }
            role => Err(Error::immutable(name, role.name())),
        }
    }

    /// Iterates readable fields in schema order, padding excluded.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Result<Value>)> + '_ {
        self.layout
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.is_padding())
            .map(move |(idx, slot)| (slot.name(), self.get_at(idx)))
    }

    /// Encodes the record.
    ///
    /// # Errors
    /// See [`encode`].
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode(self)
    }

    /// Replaces every value with the ones decoded from `bytes`.
    ///
    /// # Errors
    /// See [`decode`]. On error the record is left unchanged.
    pub fn load(&mut self, bytes: &[u8]) -> Result<()> {
        *self = decode(Arc::clone(&self.layout), bytes)?;
        Ok(())
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        if !Arc::ptr_eq(&self.layout, &other.layout) && self.layout != other.layout {
            return false;
        }
        self.layout
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.is_padding())
            .all(|(idx, _)| match (self.get_at(idx), other.get_at(idx)) {
                (Ok(a), Ok(b)) => a == b,
                // Unreadable on both sides, e.g. a strict enum decoded without a member.
                (Err(_), Err(_)) => self.values[idx] == other.values[idx],
                _ => false,
            })
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in self.fields() {
            match value {
                Ok(value) => map.entry(&name, &value),
                Err(err) => map.entry(&name, &err),
            };
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binmap_core::{ByteOrder, EnumValue};
    use binmap_schema::{EnumDomain, SchemaBuilder};

    fn temp_hum() -> Arc<Layout> {
        SchemaBuilder::new()
            .field("temp", "B")
            .field("humidity", "B")
            .compile()
            .expect("Failed to compile")
    }

    fn colors() -> EnumDomain {
        EnumDomain::strict("Color")
            .member("Red", 1)
            .member("Green", 2)
            .member("Blue", 3)
    }

    #[test]
    fn test_fresh_record_defaults() {
        let record = Record::new(temp_hum());
        assert_eq!(record.get("temp"), Ok(Value::UInt(0)));
        assert_eq!(record.get("humidity"), Ok(Value::UInt(0)));
    }

    #[test]
    fn test_with_values() {
        let record = Record::with_values(temp_hum(), [("temp", 10u8), ("humidity", 60u8)])
            .expect("valid values");
        assert_eq!(record.get("temp"), Ok(Value::UInt(10)));
        assert_eq!(record.get("humidity"), Ok(Value::UInt(60)));

        let result = Record::with_values(temp_hum(), [("hum", 60u8)]);
        assert_eq!(
            result.map(|_| ()),
            Err(Error::UnknownField {
                name: "hum".to_string()
            })
        );
    }

    #[test]
    fn test_set_and_get() {
        let mut record = Record::new(temp_hum());
        record.set("temp", 30u8).expect("in range");
        record.set("humidity", 30).expect("in range");
        assert_eq!(record.get("temp"), Ok(Value::UInt(30)));
        assert_eq!(record.get("humidity"), Ok(Value::UInt(30)));
    }

    #[test]
    fn test_value_bounds() {
        let mut record = Record::new(temp_hum());
        let err = record.set("temp", 256).expect_err("out of range");
        assert!(err.to_string().contains("0 <= number <= 255"));
        assert!(record.set("temp", -1).is_err());
        assert!(matches!(
            record.set("temp", true),
            Err(Error::TypeMismatch { .. })
        ));
        assert_eq!(record.get("temp"), Ok(Value::UInt(0)));
    }

    #[test]
    fn test_padding_access() {
        let layout = SchemaBuilder::new()
            .field("temp", "B")
            .named_padding("_pad1", 2)
            .field("humidity", "B")
            .compile()
            .expect("Failed to compile");
        let mut record =
            Record::with_values(layout, [("temp", 10u8), ("humidity", 60u8)]).expect("valid");

        let err = record.get("_pad1").expect_err("padding");
        assert_eq!(err.to_string(), "padding (_pad1) is not readable");
        assert!(record.raw("_pad1").is_err());

        record.set("_pad1", 99).expect("ignored");
        assert_eq!(record.get("temp"), Ok(Value::UInt(10)));
        assert_eq!(record.get("humidity"), Ok(Value::UInt(60)));
    }

    #[test]
    fn test_immutable_roles() {
        let layout = SchemaBuilder::new()
            .constant("magic", "B", 0xAAu8)
            .field("temp", "b")
            .autolength("len", "B", 0)
            .calculated("crc", "B", |v| Ok(Value::Int(v.int("temp")? & 0xFF)))
            .compile()
            .expect("Failed to compile");
        let mut record = Record::with_values(layout, [("temp", -5)]).expect("valid");
        let before = record.clone();

        for name in ["magic", "len", "crc"] {
            assert!(matches!(
                record.set(name, 1u8),
                Err(Error::ImmutableField { .. })
            ));
        }
        assert_eq!(record, before);
        assert_eq!(record.get("magic"), Ok(Value::UInt(0xAA)));
        assert_eq!(record.get("len"), Ok(Value::UInt(4)));
        assert_eq!(record.get("crc"), Ok(Value::UInt(0xFB)));
    }

    #[test]
    fn test_enum_coercion() {
        let layout = SchemaBuilder::new()
            .enumerated("color", "B", colors(), EnumValue::new("Red", 1))
            .compile()
            .expect("Failed to compile");
        let mut record = Record::new(layout);
        assert_eq!(
            record.get("color"),
            Ok(Value::Enum(EnumValue::new("Red", 1)))
        );

        record.set("color", 3).expect("member value");
        assert_eq!(
            record.get("color"),
            Ok(Value::Enum(EnumValue::new("Blue", 3)))
        );
        assert_eq!(record.raw("color"), Ok(&Value::UInt(3)));

        record
            .set("color", EnumValue::new("Green", 2))
            .expect("member");
        assert_eq!(
            record.get("color"),
            Ok(Value::Enum(EnumValue::new("Green", 2)))
        );

        assert!(matches!(
            record.set("color", 7),
            Err(Error::ValueOutOfRange { .. })
        ));
        assert!(matches!(
            record.set("color", 300),
            Err(Error::ValueOutOfRange { .. })
        ));
        assert_eq!(
            record.get("color"),
            Ok(Value::Enum(EnumValue::new("Green", 2)))
        );
    }

    #[test]
    fn test_flag_enum_raw_bits() {
        let perms = EnumDomain::flags("Perm")
            .member("Read", 4)
            .member("Write", 2)
            .member("Exec", 1);
        let layout = SchemaBuilder::new()
            .enumerated("perm", "B", perms, 0u8)
            .compile()
            .expect("Failed to compile");
        let mut record = Record::new(layout);

        record.set("perm", 5).expect("flag bits");
        assert_eq!(
            record.get("perm"),
            Ok(Value::Enum(EnumValue::new("Read|Exec", 5)))
        );
        record.set("perm", 0x40).expect("unknown bits are kept");
        assert_eq!(record.raw("perm"), Ok(&Value::UInt(0x40)));
    }

    #[test]
    fn test_equality() {
        let layout = temp_hum();
        let a = Record::with_values(Arc::clone(&layout), [("temp", 10u8)]).expect("valid");
        let b = Record::with_values(Arc::clone(&layout), [("temp", 10u8)]).expect("valid");
        let c = Record::with_values(Arc::clone(&layout), [("temp", 20u8)]).expect("valid");
        assert_eq!(a, b);
        assert_ne!(a, c);

        let other = SchemaBuilder::new()
            .field("temp", "B")
            .compile()
            .expect("Failed to compile");
        let d = Record::with_values(other, [("temp", 10u8)]).expect("valid");
        assert_ne!(a, d);
        assert_eq!(a.get("temp"), d.get("temp"));
    }

    #[test]
    fn test_equality_unmapped_enum_values() {
        let layout = SchemaBuilder::new()
            .enumerated("color", "B", EnumDomain::strict("Color").member("Red", 1), 1u8)
            .compile()
            .expect("Failed to compile");
        let a = Record::decode(Arc::clone(&layout), &[2]).expect("Failed to decode");
        let b = Record::decode(Arc::clone(&layout), &[9]).expect("Failed to decode");
        let c = Record::decode(layout, &[2]).expect("Failed to decode");
        assert!(a.get("color").is_err());
        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_plain_rejects_enum_member() {
        let mut record = Record::new(temp_hum());
        assert!(matches!(
            record.set("temp", EnumValue::new("Red", 1)),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_fields_iteration() {
        let layout = SchemaBuilder::new()
            .byte_order(ByteOrder::LittleEndian)
            .field("a", "h")
            .padding(2)
            .field("b", "?")
            .compile()
            .expect("Failed to compile");
        let record = Record::with_values(layout, [("a", Value::Int(-3)), ("b", Value::Bool(true))])
            .expect("valid");
        let fields: Vec<(&str, Value)> = record
            .fields()
            .map(|(name, value)| (name, value.expect("readable")))
            .collect();
        assert_eq!(fields, [("a", Value::Int(-3)), ("b", Value::Bool(true))]);
        assert_eq!(format!("{record:?}"), r#"{"a": Int(-3), "b": Bool(true)}"#);
    }

    #[test]
    fn test_unknown_field() {
        let mut record = Record::new(temp_hum());
        assert!(matches!(record.get("wind"), Err(Error::UnknownField { .. })));
        assert!(matches!(
            record.set("wind", 1),
            Err(Error::UnknownField { .. })
        ));
    }
}
