//! Lenient deserializers for ledger files.
//!
//! Older ledger lines store the request parameters exactly as they arrived
//! on the query string: `duration` as a string (or absent), `unit` as any
//! string. These helpers normalize them the same way incoming requests are.

use serde::Deserialize;

use crate::query::{DurationUnit, parse_duration_value};
use logviewer_config::constants::DEFAULT_DURATION_VALUE;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DurationRepr {
    U64(u64),
    I64(i64),
    F64(f64),
    String(String),
}

pub fn duration_from_string_or_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<DurationRepr>::deserialize(deserializer)?;
    let parsed = match value {
        Some(DurationRepr::U64(v)) => u32::try_from(v).ok(),
        Some(DurationRepr::I64(v)) => u32::try_from(v).ok(),
        Some(DurationRepr::F64(v)) if v.fract() == 0.0 && v >= 0.0 && v <= u32::MAX as f64 => {
            Some(v as u32)
        }
        Some(DurationRepr::String(s)) => Some(parse_duration_value(Some(&s))),
        Some(DurationRepr::F64(_)) | None => None,
    };
    Ok(parsed.filter(|v| *v > 0).unwrap_or(DEFAULT_DURATION_VALUE))
}

pub fn unit_from_any_string<'de, D>(deserializer: D) -> Result<DurationUnit, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(DurationUnit::from_param(value.as_deref()))
}

pub fn default_duration() -> u32 {
    DEFAULT_DURATION_VALUE
}
