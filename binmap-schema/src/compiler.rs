//! Schema compiler.
//!
//! Validates an ordered field list and places every field at the running
//! sum of the widths before it. Compilation is a pure function of the
//! schema: the same descriptors always produce the same [`Layout`].

use crate::field::{EnumKind, Role};
use crate::layout::{FieldSlot, Layout};
use crate::schema::Schema;
use binmap_core::{Error, Result, ScalarType, Value};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

/// Compiles a schema into its layout.
///
/// # Arguments
/// * `schema` - The schema to compile
///
/// # Errors
/// Returns [`Error::UnknownType`] for an unresolvable type tag and
/// [`Error::Schema`] for any structural problem: missing or duplicate
/// names, zero-length padding, a role incompatible with its scalar type,
/// more than one autolength field, or a default that does not fit.
pub fn compile(schema: &Schema) -> Result<Layout> {
    let mut fields = Vec::with_capacity(schema.fields.len());
    let mut index = HashMap::new();
    let mut autolength: Option<usize> = None;
    let mut offset = 0usize;

    for (position, descriptor) in schema.fields.iter().enumerate() {
        let name = descriptor.name.as_str();
        let (scalar, width) = match &descriptor.role {
            Role::Padding(0) => {
                return Err(Error::schema(format!(
                    "padding at position {position} has zero length"
                )));
            }
            Role::Padding(length) => (None, *length),
            _ => {
                if name.is_empty() {
                    return Err(Error::schema(format!(
                        "field at position {position} needs a name"
                    )));
                }
                let scalar = ScalarType::resolve(&descriptor.type_tag)?;
                (Some(scalar), scalar.width())
            }
        };

        if !name.is_empty() {
            match index.entry(name.to_string()) {
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
                Entry::Occupied(existing) => {
                    let both_padding = descriptor.role.is_padding()
                        && schema.fields[*existing.get()].role.is_padding();
                    if !both_padding {
                        return Err(Error::schema(format!("duplicate field name '{name}'")));
                    }
                }
            }
        }

        if matches!(descriptor.role, Role::Autolength(_)) {
            if let Some(first) = autolength {
                return Err(Error::schema(format!(
                    "field '{name}' is a second autolength field after '{}'",
                    schema.fields[first].name
                )));
            }
            autolength = Some(position);
        }

        fields.push(FieldSlot {
            descriptor: descriptor.clone(),
            scalar,
            offset,
            width,
            initial: None,
        });
        offset = offset.checked_add(width).ok_or_else(|| {
            Error::schema(format!("field at position {position} overflows the record length"))
        })?;
    }

    let total_length = offset;
    for slot in &mut fields {
        slot.initial = initial_value(slot, total_length)?;
    }

    tracing::debug!(
        "Compiled layout: {} fields, {} bytes, {:?}",
        fields.len(),
        total_length,
        schema.byte_order
    );

    Ok(Layout {
        fields,
        index,
        total_length,
        byte_order: schema.byte_order,
        validation: schema.validation,
        autolength,
    })
}

/// Checks the role against the scalar type and computes the value a fresh
/// record starts with.
fn initial_value(slot: &FieldSlot, total_length: usize) -> Result<Option<Value>> {
    let Some(scalar) = slot.scalar else {
        return Ok(None);
    };
    let name = slot.name();
    let default = slot.descriptor.default.as_ref();

    if default.is_some() && !matches!(slot.role(), Role::Plain) {
        return Err(Error::schema(format!(
            "{} field '{name}' does not take a default",
            slot.role().name()
        )));
    }
    let fits = |value: &Value| {
        scalar.coerce(name, value).map_err(|e| {
            Error::schema(format!("default of field '{name}' does not fit: {e}"))
        })
    };

    let initial = match slot.role() {
        Role::Plain => match default {
            Some(value) => fits(value)?,
            None => scalar.zero(),
        },
        Role::Padding(_) => return Ok(None),
        Role::Constant(value) => fits(value)?,
        Role::Autolength(offset) => {
            require_integer(scalar, name, "autolength")?;
            let length = i64::try_from(total_length as i128 + i128::from(*offset))
                .map_err(|_| Error::schema(format!("length of field '{name}' overflows")))?;
            fits(&Value::Int(length))?
        }
        Role::EnumMapped { domain, default } => {
            require_integer(scalar, name, "enum")?;
            let mut seen = HashSet::new();
            for member in domain.members() {
                if !seen.insert(member.name().to_string()) {
                    return Err(Error::schema(format!(
                        "duplicate member '{}' in enum '{}'",
                        member.name(),
                        domain.name()
                    )));
                }
                fits(&Value::Int(member.value()))?;
            }
            if domain.kind() == EnumKind::Strict && seen.is_empty() {
                return Err(Error::schema(format!(
                    "strict enum '{}' of field '{name}' has no members",
                    domain.name()
                )));
            }
            slot.check(default).map_err(|e| {
                Error::schema(format!("default of field '{name}' does not fit: {e}"))
            })?
        }
        Role::Calculated(_) => scalar.zero(),
    };
    Ok(Some(initial))
}

fn require_integer(scalar: ScalarType, name: &str, role: &str) -> Result<()> {
    if scalar.is_integer() {
        Ok(())
    } else {
        Err(Error::schema(format!(
            "{role} field '{name}' needs an integer type, got {scalar}"
        )))
    }
}
