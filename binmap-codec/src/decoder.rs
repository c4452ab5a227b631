//! Record decoding.
//!
//! Wire bytes are authoritative: every field, read-only ones included, is
//! populated straight from its byte range. Padding bytes are skipped.

use crate::record::Record;
use binmap_core::{Error, ReadBuffer, Result, Value};
use binmap_schema::{EnumKind, FieldSlot, Layout, Role, Validation};
use std::sync::Arc;

/// Decodes a record from exactly `layout.total_length()` bytes.
///
/// Under [`Validation::Strict`] constants must carry their declared value,
/// the autolength field the encoded length plus its offset, and strict
/// enums a declared member.
///
/// # Arguments
/// * `layout` - Layout of the record
/// * `bytes` - Encoded record
///
/// # Errors
/// Returns [`Error::LengthMismatch`] if the input size differs from the
/// layout, and under strict validation [`Error::ConstantMismatch`] or
/// [`Error::ValueOutOfRange`]. No record is produced on error.
pub fn decode(layout: Arc<Layout>, bytes: &[u8]) -> Result<Record> {
    if bytes.len() != layout.total_length() {
        return Err(Error::LengthMismatch {
            expected: layout.total_length(),
            actual: bytes.len(),
        });
    }

    let order = layout.byte_order();
    let mut values = Vec::with_capacity(layout.len());
    for slot in layout.fields() {
        let Some(scalar) = slot.scalar() else {
            values.push(None);
            continue;
        };
        let value = bytes.get_scalar(slot.offset(), scalar, order);
        if layout.validation() == Validation::Strict {
            validate(&layout, slot, &value).inspect_err(|e| {
                tracing::debug!("Rejected {} byte record: {}", bytes.len(), e);
            })?;
        }
        values.push(Some(value));
    }

    tracing::trace!("Decoded {} fields from {} bytes", layout.len(), bytes.len());
    Ok(Record::from_parts(layout, values))
}

fn validate(layout: &Layout, slot: &FieldSlot, value: &Value) -> Result<()> {
    let expected = match slot.role() {
        Role::Constant(_) => slot.initial().cloned(),
        Role::Autolength(offset) => {
            let length = i64::try_from(layout.autolength_value(*offset)).unwrap_or(i64::MAX);
            Some(slot.check(&Value::Int(length))?)
        }
        Role::EnumMapped { domain, .. } if domain.kind() == EnumKind::Strict => {
            slot.present(value)?;
            None
        }
        _ => None,
    };

    match expected {
        Some(expected) if expected != *value => Err(Error::ConstantMismatch {
            field: slot.name().to_string(),
            expected: expected.to_string(),
            actual: value.to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;
    use binmap_core::{ByteOrder, EnumValue};
    use binmap_schema::{EnumDomain, SchemaBuilder};

    #[test]
    fn test_single_signed_byte() {
        let layout = SchemaBuilder::new()
            .field("temp", "b")
            .compile()
            .expect("Failed to compile");
        let record = decode(layout, &[0xF6]).expect("Failed to decode");
        assert_eq!(record.get("temp"), Ok(Value::Int(-10)));
    }

    #[test]
    fn test_length_mismatch() {
        let layout = SchemaBuilder::new()
            .field("temp", "B")
            .field("hum", "B")
            .compile()
            .expect("Failed to compile");
        assert_eq!(
            decode(Arc::clone(&layout), &[1]).map(|_| ()),
            Err(Error::LengthMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert!(decode(layout, &[1, 2, 3]).is_err());
    }

    #[test]
    fn test_padding_discarded() {
        let layout = SchemaBuilder::new()
            .format_fields([("temp", "B"), ("_pad1", "xx"), ("humidity", "B")])
            .expect("valid formats")
            .compile()
            .expect("Failed to compile");
        let record = decode(layout, &[10, 0xAB, 0xCD, 60]).expect("Failed to decode");
        assert_eq!(record.get("temp"), Ok(Value::UInt(10)));
        assert_eq!(record.get("humidity"), Ok(Value::UInt(60)));
        assert!(matches!(
            record.get("_pad1"),
            Err(Error::AttributeUnavailable { .. })
        ));
    }

    #[test]
    fn test_passive_accepts_wire_values() {
        let layout = SchemaBuilder::new()
            .constant("magic", "B", 0x55u8)
            .autolength("len", "B", 0)
            .compile()
            .expect("Failed to compile");
        let record = decode(layout, &[0x66, 99]).expect("Failed to decode");
        assert_eq!(record.get("magic"), Ok(Value::UInt(0x66)));
        assert_eq!(record.get("len"), Ok(Value::UInt(99)));
    }

    #[test]
    fn test_strict_rejects_bad_constant() {
        let layout = SchemaBuilder::new()
            .validation(Validation::Strict)
            .constant("magic", "B", 0x55u8)
            .autolength("len", "B", 0)
            .compile()
            .expect("Failed to compile");

        assert!(decode(Arc::clone(&layout), &[0x55, 2]).is_ok());
        assert!(matches!(
            decode(Arc::clone(&layout), &[0x66, 2]),
            Err(Error::ConstantMismatch { .. })
        ));
        assert!(matches!(
            decode(layout, &[0x55, 3]),
            Err(Error::ConstantMismatch { .. })
        ));
    }

    #[test]
    fn test_strict_enum_domain() {
        let domain = EnumDomain::strict("Color").member("Red", 1).member("Blue", 3);
        let passive = SchemaBuilder::new()
            .enumerated("color", "B", domain.clone(), 1u8)
            .compile()
            .expect("Failed to compile");
        let record = decode(passive, &[2]).expect("wire bytes are authoritative");
        assert_eq!(record.raw("color"), Ok(&Value::UInt(2)));
        assert!(matches!(
            record.get("color"),
            Err(Error::ValueOutOfRange { .. })
        ));

        let strict = SchemaBuilder::new()
            .validation(Validation::Strict)
            .enumerated("color", "B", domain, 1u8)
            .compile()
            .expect("Failed to compile");
        assert!(matches!(
            decode(Arc::clone(&strict), &[2]),
            Err(Error::ValueOutOfRange { .. })
        ));
        let record = decode(strict, &[3]).expect("Failed to decode");
        assert_eq!(
            record.get("color"),
            Ok(Value::Enum(EnumValue::new("Blue", 3)))
        );
    }

    #[test]
    fn test_calculated_keeps_wire_value() {
        let layout = SchemaBuilder::new()
            .field("temp", "b")
            .field("hum", "B")
            .calculated("checksum", "B", |v| {
                Ok(Value::Int((v.int("temp")? + v.int("hum")?) & 0xFF))
            })
            .compile()
            .expect("Failed to compile");
        let record = decode(layout, &[0xEC, 0x0A, 0x00]).expect("Failed to decode");
        assert_eq!(record.raw("checksum"), Ok(&Value::UInt(0)));
        assert_eq!(record.get("checksum"), Ok(Value::UInt(0xF6)));
    }

    #[test]
    fn test_round_trip() {
        let mode = EnumDomain::strict("Mode").member("Idle", 0).member("Run", 2);
        let layout = SchemaBuilder::new()
            .byte_order(ByteOrder::BigEndian)
            .constant("magic", "H", 0xBEEFu16)
            .autolength("len", "B", 0)
            .field("temp", "h")
            .padding(3)
            .field("pressure", "d")
            .field("ratio", "f")
            .field("counter", "Q")
            .field("ok", "?")
            .field("tag", "c")
            .enumerated("mode", "B", mode, 0u8)
            .calculated("sum", "i", |v| Ok(Value::Int(v.int("temp")? + v.int("len")?)))
            .compile()
            .expect("Failed to compile");

        let record = Record::with_values(
            Arc::clone(&layout),
            [
                ("temp", Value::Int(-1234)),
                ("pressure", Value::Float(1013.25)),
                ("ratio", Value::Float(0.1)),
                ("counter", Value::UInt(u64::MAX)),
                ("ok", Value::Bool(true)),
                ("tag", Value::Char(b'Q')),
                ("mode", Value::Enum(EnumValue::new("Run", 2))),
            ],
        )
        .expect("valid values");

        let bytes = encode(&record).expect("Failed to encode");
        assert_eq!(bytes.len(), layout.total_length());
        assert_eq!(&bytes[2..3], &[layout.total_length() as u8]);

        let decoded = decode(Arc::clone(&layout), &bytes).expect("Failed to decode");
        assert_eq!(decoded, record);
        for ((name, a), (_, b)) in decoded.fields().zip(record.fields()) {
            assert_eq!(a, b, "field {name}");
        }
    }

    #[test]
    fn test_load_replaces_values() {
        let layout = SchemaBuilder::new()
            .field("temp", "B")
            .field("hum", "B")
            .compile()
            .expect("Failed to compile");
        let mut record = Record::new(layout);
        record.load(&[10, 70]).expect("Failed to load");
        assert_eq!(record.get("temp"), Ok(Value::UInt(10)));
        assert_eq!(record.get("hum"), Ok(Value::UInt(70)));

        assert!(record.load(&[1, 2, 3]).is_err());
        assert_eq!(record.get("temp"), Ok(Value::UInt(10)));
    }
}
