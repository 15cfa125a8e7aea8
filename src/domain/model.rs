use serde::{Deserialize, Serialize};
use std::fmt;

/// A flat record as it travels through the service. Field order is preserved
/// (`serde_json` is built with `preserve_order`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.data.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: serde_json::Value) {
        self.data.insert(field.into(), value);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateRole {
    Easting,
    Northing,
    Zone,
    Hemisphere,
}

impl fmt::Display for CoordinateRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Easting => "easting",
            Self::Northing => "northing",
            Self::Zone => "zone",
            Self::Hemisphere => "hemisphere",
        };
        f.write_str(name)
    }
}

/// Why a record was passed through without conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Missing(CoordinateRole),
    Multiple(CoordinateRole),
    Empty(CoordinateRole),
}

impl SkipReason {
    pub fn role(&self) -> CoordinateRole {
        match *self {
            Self::Missing(role) | Self::Multiple(role) | Self::Empty(role) => role,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(role) => write!(f, "No {} coordinate found in entity, skipping...", role),
            Self::Multiple(role) => {
                write!(f, "Multiple {} values found in entity, skipping...", role)
            }
            Self::Empty(role) => write!(f, "Empty {} value list in entity, skipping...", role),
        }
    }
}

/// Validated converter input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateQuadruple {
    pub easting: f64,
    pub northing: f64,
    pub zone: i64,
    pub northern: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticResult {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeodeticResult {
    /// The `"<lat>, <lon>"` text written to the combined output field.
    pub fn combined_text(&self) -> String {
        format!(
            "{}, {}",
            coordinate_text(self.latitude),
            coordinate_text(self.longitude)
        )
    }
}

/// Shortest round-trip text for a coordinate. Whole numbers keep their `.0`;
/// magnitudes below 1e-4 or from 1e16 up use an exponent with a sign and at
/// least two digits (`9.047313696020008e-06`, `1e+16`).
fn coordinate_text(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // `{:e}` yields the shortest digits, e.g. "-9.047313696020008e-6" or "0e0"
    let scientific = format!("{:e}", value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    }

    let (negative, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    // digits before the decimal point
    let point = exponent + 1;
    let mut text = String::with_capacity(digits.len() + 8);
    if negative {
        text.push('-');
    }
    if point <= 0 {
        text.push_str("0.");
        text.extend(std::iter::repeat('0').take(point.unsigned_abs() as usize));
        text.push_str(&digits);
    } else {
        let point = point as usize;
        if point >= digits.len() {
            text.push_str(&digits);
            text.extend(std::iter::repeat('0').take(point - digits.len()));
            text.push_str(".0");
        } else {
            text.push_str(&digits[..point]);
            text.push('.');
            text.push_str(&digits[point..]);
        }
    }
    text
}
