//! Record encoding.
//!
//! Fields are written in schema order at their layout offsets, all in the
//! schema's byte order. The autolength field, if any, is written last once
//! every other field is in place.

use crate::record::Record;
use binmap_core::{Error, Result, Value, WriteBuffer};
use binmap_schema::{FieldView, Layout, Role};

/// Resolves the values the first `upto` fields encode with.
///
/// Plain and enum-mapped fields yield their stored value, constants their
/// declared value, the autolength field the encoded length plus its offset,
/// and calculated fields the result of their function over the fields
/// resolved before them. Padding yields `None`.
pub(crate) fn resolve_values(
    layout: &Layout,
    stored: &[Option<Value>],
    upto: usize,
) -> Result<Vec<Option<Value>>> {
    let mut resolved: Vec<Option<Value>> = Vec::with_capacity(upto);

    for (slot, value) in layout.fields().iter().zip(stored).take(upto) {
        let value = match slot.role() {
            Role::Padding(_) => None,
            Role::Plain | Role::EnumMapped { .. } => value.clone(),
            Role::Constant(_) => slot.initial().cloned(),
            Role::Autolength(offset) => {
                let length = layout.autolength_value(*offset);
                let length = i64::try_from(length).unwrap_or(i64::MAX);
                Some(slot.check(&Value::Int(length))?)
            }
            Role::Calculated(f) => {
                let view = FieldView::new(layout, &resolved, slot.name());
                let computed = f(&view)?;
                Some(slot.check(&computed)?)
            }
        };
        resolved.push(value);
    }

    Ok(resolved)
}

/// Encodes a record into a new buffer of exactly `total_length` bytes.
///
/// # Errors
/// Returns any error raised by a calculated field's function, or
/// [`Error::ValueOutOfRange`] / [`Error::TypeMismatch`] when its result does
/// not fit the field. The record is never modified.
pub fn encode(record: &Record) -> Result<Vec<u8>> {
    let mut buffer = vec![0u8; record.layout().total_length()];
    encode_into(record, &mut buffer)?;
    Ok(buffer)
}

/// Encodes a record into the start of `buffer`.
///
/// # Arguments
/// * `record` - Record to encode
/// * `buffer` - Destination, at least `total_length` bytes long
///
/// # Returns
/// The number of bytes written, always the layout's total length.
///
/// # Errors
/// Returns [`Error::LengthMismatch`] if the buffer is too short, otherwise
/// the errors of [`encode`]. Both are raised before anything is written.
pub fn encode_into(record: &Record, buffer: &mut [u8]) -> Result<usize> {
    let layout = record.layout();
    let total_length = layout.total_length();
    if buffer.len() < total_length {
        return Err(Error::LengthMismatch {
            expected: total_length,
            actual: buffer.len(),
        });
    }

    let resolved = resolve_values(layout, record.stored(), layout.len())?;
    let order = layout.byte_order();
    let buffer = &mut buffer[..total_length];
    let mut deferred = None;

    for (slot, value) in layout.fields().iter().zip(&resolved) {
        match (slot.role(), slot.scalar(), value) {
            (Role::Padding(_), _, _) => buffer.zero(slot.offset(), slot.width()),
            (Role::Autolength(offset), Some(scalar), _) => deferred = Some((slot, scalar, *offset)),
            (_, Some(scalar), Some(value)) => buffer.put_scalar(slot.offset(), scalar, value, order),
            _ => {}
        }
    }

    if let Some((slot, scalar, offset)) = deferred {
        let length = buffer.len() as i128 + i128::from(offset);
        let length = i64::try_from(length).unwrap_or(i64::MAX);
        let value = slot.check(&Value::Int(length))?;
        buffer.put_scalar(slot.offset(), scalar, &value, order);
    }

    tracing::trace!("Encoded {} fields into {} bytes", layout.len(), total_length);
    Ok(total_length)
}
