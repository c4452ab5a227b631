//! Sensor frame example.
//!
//! Builds a small telemetry frame with a magic constant, a length byte, an
//! enum-mapped status, padding and a checksum, then round-trips it.
//!
//! Run with:
//! ```bash
//! RUST_LOG=trace cargo run --example sensor
//! ```

use binmap::prelude::*;
use std::sync::Arc;

fn sensor_layout() -> Result<Arc<Layout>> {
    let status = EnumDomain::strict("Status")
        .member("Idle", 0)
        .member("Measuring", 1)
        .member("Fault", 2);

    SchemaBuilder::new()
        .byte_order(ByteOrder::BigEndian)
        .validation(Validation::Strict)
        .constant("magic", "H", 0x5AA5u16)
        .autolength("length", "B", 0)
        .enumerated("status", "B", status, EnumValue::new("Idle", 0))
        .field("temperature", "h")
        .field("humidity", "B")
        .padding(2)
        .calculated("checksum", "B", |v| {
            let sum = v.int("temperature")? + v.int("humidity")? + v.int("status")?;
            Ok(Value::Int(sum & 0xFF))
        })
        .compile()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let layout = sensor_layout()?;
    tracing::info!("Sensor frame is {} bytes", layout.total_length());

    let mut record = Record::new(Arc::clone(&layout));
    record.set("status", EnumValue::new("Measuring", 1))?;
    record.set("temperature", -125)?;
    record.set("humidity", 48u8)?;

    let bytes = record.encode()?;
    tracing::info!("Encoded: {:02X?}", bytes);

    let decoded = Record::decode(Arc::clone(&layout), &bytes)?;
    for (name, value) in decoded.fields() {
        tracing::info!("{} = {}", name, value?);
    }

    if let Err(e) = decoded.clone().set("magic", 1u16) {
        tracing::info!("Rejected write: {}", e);
    }

    let mut corrupted = bytes.clone();
    corrupted[0] = 0;
    if let Err(e) = Record::decode(layout, &corrupted) {
        tracing::warn!("Rejected frame: {}", e);
    }

    Ok(())
}
