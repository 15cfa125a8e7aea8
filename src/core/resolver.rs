//! Pulls easting, northing, zone and hemisphere out of a record.
//!
//! Absent or ambiguous values are a normal condition and resolve to
//! [`Resolution::Skip`]. Present values that do not parse are format errors.

use crate::config::FieldConfig;
use crate::domain::model::{CoordinateQuadruple, CoordinateRole, Record, SkipReason};
use crate::utils::error::{Result, TransformError};
use serde_json::{Number, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Leave the record untouched.
    Skip(SkipReason),
    Ready(CoordinateQuadruple),
}

/// A single field value after list unwrapping.
#[derive(Debug, Clone, Copy)]
enum Scalar<'a> {
    Text(&'a str),
    Number(&'a Number),
    Other(&'a Value),
}

impl<'a> Scalar<'a> {
    fn from_value(value: &'a Value) -> Self {
        match value {
            Value::String(text) => Scalar::Text(text.trim()),
            Value::Number(number) => Scalar::Number(number),
            other => Scalar::Other(other),
        }
    }

    fn to_text(self) -> String {
        match self {
            Scalar::Text(text) => text.to_string(),
            Scalar::Number(number) => number.to_string(),
            Scalar::Other(value) => value.to_string(),
        }
    }
}

pub fn resolve(record: &Record, config: &FieldConfig) -> Result<Resolution> {
    let easting = match lookup(record, &config.easting, None, CoordinateRole::Easting) {
        Ok(scalar) => scalar,
        Err(reason) => return Ok(Resolution::Skip(reason)),
    };
    let northing = match lookup(record, &config.northing, None, CoordinateRole::Northing) {
        Ok(scalar) => scalar,
        Err(reason) => return Ok(Resolution::Skip(reason)),
    };
    let zone = match lookup(
        record,
        &config.zone,
        Some(config.zone_default.as_str()),
        CoordinateRole::Zone,
    ) {
        Ok(scalar) => scalar,
        Err(reason) => return Ok(Resolution::Skip(reason)),
    };
    let hemisphere = match lookup(
        record,
        &config.hemisphere,
        Some(config.hemisphere_default.as_str()),
        CoordinateRole::Hemisphere,
    ) {
        Ok(scalar) => scalar,
        Err(reason) => return Ok(Resolution::Skip(reason)),
    };

    Ok(Resolution::Ready(CoordinateQuadruple {
        easting: parse_float(easting, CoordinateRole::Easting)?,
        northing: parse_float(northing, CoordinateRole::Northing)?,
        zone: parse_zone(zone)?,
        northern: is_northern(hemisphere, &config.northern_value),
    }))
}

/// Only text equal to the sentinel selects the northern hemisphere. A JSON
/// number never matches, even when its digits equal the sentinel.
fn is_northern(hemisphere: Scalar<'_>, northern_value: &str) -> bool {
    matches!(hemisphere, Scalar::Text(text) if text == northern_value)
}

/// Finds `field` and unwraps a one-element list. A missing field falls back
/// to `default` when one is given.
fn lookup<'a>(
    record: &'a Record,
    field: &str,
    default: Option<&'a str>,
    role: CoordinateRole,
) -> std::result::Result<Scalar<'a>, SkipReason> {
    let value = match (record.get(field), default) {
        (Some(value), _) => value,
        (None, Some(default)) => return Ok(Scalar::Text(default.trim())),
        (None, None) => return Err(SkipReason::Missing(role)),
    };

    match value {
        Value::Array(items) => match items.as_slice() {
            [] => Err(SkipReason::Empty(role)),
            [only] => Ok(Scalar::from_value(only)),
            _ => Err(SkipReason::Multiple(role)),
        },
        other => Ok(Scalar::from_value(other)),
    }
}

fn parse_float(scalar: Scalar<'_>, role: CoordinateRole) -> Result<f64> {
    let parsed = match scalar {
        Scalar::Text(text) => text.parse::<f64>().ok(),
        Scalar::Number(number) => number.as_f64(),
        Scalar::Other(_) => None,
    };
    parsed.ok_or_else(|| TransformError::format(role, scalar.to_text()))
}

fn parse_zone(scalar: Scalar<'_>) -> Result<i64> {
    let parsed = match scalar {
        Scalar::Text(text) => text.parse::<i64>().ok(),
        // whole numbers first; fractional zones truncate toward zero
        Scalar::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Scalar::Other(_) => None,
    };
    parsed.ok_or_else(|| TransformError::format(CoordinateRole::Zone, scalar.to_text()))
}
