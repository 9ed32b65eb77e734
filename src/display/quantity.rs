//! Kubernetes quantity parsing and binary byte formatting

use std::fmt;

/// Errors from parsing a quantity string
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum QuantityError {
    #[error("empty quantity")]
    Empty,

    #[error("invalid quantity number in '{0}'")]
    InvalidNumber(String),

    #[error("unknown quantity suffix '{suffix}' in '{input}'")]
    UnknownSuffix { input: String, suffix: String },
}

/// Binary byte units, each 1024 times the previous
pub const BINARY_BYTE_UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

const BINARY_SUFFIXES: &[(&str, i32)] = &[
    ("Ki", 1),
    ("Mi", 2),
    ("Gi", 3),
    ("Ti", 4),
    ("Pi", 5),
    ("Ei", 6),
];

const DECIMAL_SUFFIXES: &[(&str, i32)] = &[
    ("n", -3),
    ("u", -2),
    ("m", -1),
    ("k", 1),
    ("M", 2),
    ("G", 3),
    ("T", 4),
    ("P", 5),
    ("E", 6),
];

/// Convert a quantity such as `10Gi`, `500M`, `250m` or `1e3` to its base value
pub fn convert_to_base_value(quantity: &str) -> Result<f64, QuantityError> {
    let quantity = quantity.trim();
    if quantity.is_empty() {
        return Err(QuantityError::Empty);
    }

    // Plain numbers, including exponent notation
    if let Ok(value) = quantity.parse::<f64>() {
        return Ok(value);
    }

    let split = quantity
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(quantity.len());
    let (number, suffix) = quantity.split_at(split);
    let number: f64 = number
        .parse()
        .map_err(|_| QuantityError::InvalidNumber(quantity.to_string()))?;

    if let Some((_, power)) = BINARY_SUFFIXES.iter().find(|(s, _)| *s == suffix) {
        return Ok(number * 1024f64.powi(*power));
    }
    if let Some((_, power)) = DECIMAL_SUFFIXES.iter().find(|(s, _)| *s == suffix) {
        return Ok(number * 1000f64.powi(*power));
    }

    Err(QuantityError::UnknownSuffix {
        input: quantity.to_string(),
        suffix: suffix.to_string(),
    })
}

/// A value expressed in a display unit
#[derive(Debug, Clone, PartialEq)]
pub struct Humanized {
    pub value: f64,
    pub unit: &'static str,
    pub string: String,
}

impl fmt::Display for Humanized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string)
    }
}

/// Format a byte count with binary units
///
/// Without a preferred unit the largest unit keeping the value at or above 1 is
/// picked. With one, the value is expressed in that unit even if it ends up below 1.
/// Values are rounded to two decimals.
pub fn humanize_binary_bytes(bytes: f64, preferred_unit: Option<&str>) -> Humanized {
    let bytes = if bytes.is_finite() { bytes } else { 0.0 };

    let preferred_index =
        preferred_unit.and_then(|p| BINARY_BYTE_UNITS.iter().position(|u| *u == p));
    let unit_index = match preferred_index {
        Some(index) => index,
        None => {
            let mut index = 0;
            let mut value = bytes.abs();
            while value >= 1024.0 && index < BINARY_BYTE_UNITS.len() - 1 {
                value /= 1024.0;
                index += 1;
            }
            index
        }
    };

    let value = round_to(bytes / 1024f64.powi(unit_index as i32), 2);
    let unit = BINARY_BYTE_UNITS[unit_index];
    Humanized {
        value,
        unit,
        string: format!("{} {}", format_number(value), unit),
    }
}

/// Round to `digits` decimals
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

/// Shortest decimal form: `10`, `1.5`, `0.25`
pub fn format_number(value: f64) -> String {
    // `{}` on f64 already drops trailing zeros; normalise -0
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_and_decimal_suffixes() {
        assert_eq!(convert_to_base_value("1Ki").unwrap(), 1024.0);
        assert_eq!(convert_to_base_value("10Gi").unwrap(), 10.0 * 1024f64.powi(3));
        assert_eq!(convert_to_base_value("1.5Mi").unwrap(), 1.5 * 1024.0 * 1024.0);
        assert_eq!(convert_to_base_value("500M").unwrap(), 500_000_000.0);
        assert_eq!(convert_to_base_value("2k").unwrap(), 2000.0);
        assert_eq!(convert_to_base_value("250m").unwrap(), 0.25);
    }

    #[test]
    fn test_plain_numbers() {
        assert_eq!(convert_to_base_value("1073741824").unwrap(), 1073741824.0);
        assert_eq!(convert_to_base_value("1e3").unwrap(), 1000.0);
        assert_eq!(convert_to_base_value(" 42 ").unwrap(), 42.0);
    }

    #[test]
    fn test_invalid_quantities() {
        assert_eq!(convert_to_base_value(""), Err(QuantityError::Empty));
        assert!(matches!(
            convert_to_base_value("Gi"),
            Err(QuantityError::InvalidNumber(_))
        ));
        assert!(matches!(
            convert_to_base_value("10Xi"),
            Err(QuantityError::UnknownSuffix { .. })
        ));
    }

    #[test]
    fn test_humanize_picks_unit() {
        assert_eq!(humanize_binary_bytes(0.0, None).string, "0 B");
        assert_eq!(humanize_binary_bytes(512.0, None).string, "512 B");
        assert_eq!(humanize_binary_bytes(1536.0, None).string, "1.5 KiB");
        let gib = humanize_binary_bytes(10.0 * 1024f64.powi(3), None);
        assert_eq!(gib.value, 10.0);
        assert_eq!(gib.unit, "GiB");
        assert_eq!(gib.string, "10 GiB");
    }

    #[test]
    fn test_humanize_preferred_unit() {
        let used = humanize_binary_bytes(512.0 * 1024.0 * 1024.0, Some("GiB"));
        assert_eq!(used.value, 0.5);
        assert_eq!(used.string, "0.5 GiB");

        // Unknown preferred unit falls back to automatic selection
        assert_eq!(humanize_binary_bytes(2048.0, Some("parsecs")).unit, "KiB");
    }
}
