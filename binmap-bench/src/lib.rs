//! # binmap Bench
//!
//! Sample schemas shared by the binmap benchmarks.

use binmap_codec::Record;
use binmap_core::{ByteOrder, Result, Value};
use binmap_schema::{EnumDomain, Layout, SchemaBuilder};
use std::sync::Arc;

/// Builds a telemetry-style schema exercising every field role.
#[must_use]
pub fn telemetry_schema(order: ByteOrder) -> SchemaBuilder {
    let state = EnumDomain::strict("State")
        .member("Off", 0)
        .member("On", 1)
        .member("Fault", 2);

    SchemaBuilder::new()
        .byte_order(order)
        .constant("magic", "H", 0xA55Au16)
        .autolength("length", "H", 0)
        .field("sequence", "I")
        .field("timestamp", "Q")
        .enumerated("state", "B", state, 0u8)
        .padding(3)
        .field("temperature", "h")
        .field("pressure", "d")
        .field("ratio", "f")
        .field("valid", "?")
        .calculated("checksum", "B", |v| {
            let sum = v.int("sequence")? + v.int("temperature")? + v.int("state")?;
            Ok(Value::Int(sum & 0xFF))
        })
}

/// Compiles [`telemetry_schema`] in big-endian order.
///
/// # Errors
/// Returns an error if the schema fails to compile.
pub fn telemetry_layout() -> Result<Arc<Layout>> {
    telemetry_schema(ByteOrder::BigEndian).compile()
}

/// Builds a populated record of [`telemetry_layout`].
///
/// # Errors
/// Returns an error if a sample value does not fit its field.
pub fn telemetry_record(layout: Arc<Layout>) -> Result<Record> {
    Record::with_values(
        layout,
        [
            ("sequence", Value::UInt(42)),
            ("timestamp", Value::UInt(1_700_000_000_000)),
            ("state", Value::Int(1)),
            ("temperature", Value::Int(-215)),
            ("pressure", Value::Float(1013.25)),
            ("ratio", Value::Float(0.5)),
            ("valid", Value::Bool(true)),
        ],
    )
}
