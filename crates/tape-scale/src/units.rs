//! Length grammar and length formatting.
//!
//! Lengths are carried as inches internally. Parsing accepts the forms
//! users type on drawings:
//!
//! - feet and inches: `1'-6"`, `1' 6"`, `1'6"`, `1'`
//! - inches, plain or fractional: `6"`, `1/4"`, `6 1/2"`, `1-1/2"`
//! - metric: `25mm`, `2.5 cm`, `1m`
//! - bare numbers, read in the caller's default unit

use crate::error::{Result, ScaleError};
use serde::{Deserialize, Serialize};

/// A unit a length can be entered or displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Inches (the internal unit).
    #[default]
    Inches,
    /// Feet.
    Feet,
    /// Millimeters.
    Millimeters,
    /// Centimeters.
    Centimeters,
    /// Meters.
    Meters,
}

impl LengthUnit {
    /// How many inches one of this unit is.
    pub fn inches_per_unit(self) -> f64 {
        match self {
            LengthUnit::Inches => 1.0,
            LengthUnit::Feet => 12.0,
            LengthUnit::Millimeters => 1.0 / 25.4,
            LengthUnit::Centimeters => 1.0 / 2.54,
            LengthUnit::Meters => 1.0 / 0.0254,
        }
    }

    /// Suffix used when displaying a value in this unit.
    pub fn suffix(self) -> &'static str {
        match self {
            LengthUnit::Inches => "\"",
            LengthUnit::Feet => "'",
            LengthUnit::Millimeters => "mm",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Meters => "m",
        }
    }
}

// Longest suffix first: "mm" and "cm" also end in "m".
const METRIC_SUFFIXES: [(&str, LengthUnit); 3] = [
    ("mm", LengthUnit::Millimeters),
    ("cm", LengthUnit::Centimeters),
    ("m", LengthUnit::Meters),
];

/// Parse a length expression into inches.
///
/// Bare numbers are read in `default_unit`. A leading `-` negates the whole
/// expression; the `-` between feet and inches in `1'-6"` is a separator.
pub fn parse_length(text: &str, default_unit: LengthUnit) -> Result<f64> {
    let s = text.trim();
    if s.is_empty() {
        return Err(ScaleError::Empty);
    }

    let (sign, body) = match s.strip_prefix('-') {
        Some(rest) => (-1.0, rest.trim_start()),
        None => (1.0, s),
    };

    parse_unsigned_length(body, default_unit)
        .map(|inches| sign * inches)
        .ok_or_else(|| ScaleError::InvalidLength(s.to_string()))
}

fn parse_unsigned_length(s: &str, default_unit: LengthUnit) -> Option<f64> {
    let lower = s.to_ascii_lowercase();
    for (suffix, unit) in METRIC_SUFFIXES {
        if let Some(number) = lower.strip_suffix(suffix) {
            return parse_decimal(number.trim()).map(|v| v * unit.inches_per_unit());
        }
    }

    if let Some((feet, rest)) = s.split_once('\'') {
        let feet = parse_mixed(feet.trim())?;
        let rest = rest.trim();
        let rest = rest.strip_prefix('-').unwrap_or(rest).trim();
        let inches = if rest.is_empty() {
            0.0
        } else {
            parse_mixed(rest.strip_suffix('"')?.trim())?
        };
        return Some(feet * 12.0 + inches);
    }

    if let Some(inches) = s.strip_suffix('"') {
        return parse_mixed(inches.trim());
    }

    parse_mixed(s).map(|v| v * default_unit.inches_per_unit())
}

/// `6`, `6.5`, `1/4`, `6 1/2` or `1-1/2`.
fn parse_mixed(s: &str) -> Option<f64> {
    if let Some((whole, fraction)) = s.split_once(|c: char| c.is_whitespace() || c == '-') {
        let fraction = fraction.trim();
        if !fraction.contains('/') {
            return None;
        }
        return Some(parse_decimal(whole.trim())? + parse_fraction(fraction)?);
    }

    if s.contains('/') {
        parse_fraction(s)
    } else {
        parse_decimal(s)
    }
}

fn parse_fraction(s: &str) -> Option<f64> {
    let (num, den) = s.split_once('/')?;
    let den = parse_decimal(den.trim())?;
    if den == 0.0 {
        return None;
    }
    Some(parse_decimal(num.trim())? / den)
}

/// Unsigned decimal without exponent, `inf` or `nan`.
pub(crate) fn parse_decimal(s: &str) -> Option<f64> {
    let mut digits = 0;
    let mut dots = 0;
    for c in s.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 {
        return None;
    }
    s.parse().ok()
}

/// How lengths are rendered for the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "lowercase")]
pub enum LengthFormat {
    /// Feet and fractional inches rounded to `1/denominator"`, e.g. `12' 6 1/2"`.
    Architectural {
        /// Fraction precision, e.g. 16 for sixteenths of an inch.
        denominator: u32,
    },
    /// A decimal number in a single unit, e.g. `250mm`.
    Decimal {
        /// Display unit.
        unit: LengthUnit,
        /// Digits after the decimal point.
        precision: usize,
    },
}

impl Default for LengthFormat {
    fn default() -> Self {
        LengthFormat::Architectural { denominator: 16 }
    }
}

impl LengthFormat {
    /// Format a length given in inches.
    pub fn format(&self, inches: f64) -> String {
        match *self {
            LengthFormat::Architectural { denominator } => format_architectural(inches, denominator),
            LengthFormat::Decimal { unit, precision } => {
                let value = inches / unit.inches_per_unit();
                format!("{:.*}{}", precision, value, unit.suffix())
            }
        }
    }
}

fn format_architectural(inches: f64, denominator: u32) -> String {
    let den = i64::from(denominator.max(1));
    let sign = if inches < 0.0 { "-" } else { "" };
    let ticks = (inches.abs() * den as f64).round() as i64;

    let feet = ticks / (12 * den);
    let rem = ticks % (12 * den);
    let whole = rem / den;
    let num = rem % den;

    let inch_part = if num == 0 {
        whole.to_string()
    } else {
        let g = gcd(num, den);
        let fraction = format!("{}/{}", num / g, den / g);
        if whole == 0 {
            fraction
        } else {
            format!("{whole} {fraction}")
        }
    };

    if ticks == 0 {
        "0\"".to_string()
    } else if feet > 0 {
        format!("{sign}{feet}' {inch_part}\"")
    } else {
        format!("{sign}{inch_part}\"")
    }
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn inches(s: &str) -> f64 {
        parse_length(s, LengthUnit::Inches).unwrap()
    }

    #[test]
    fn test_feet_and_inches() {
        assert_relative_eq!(inches("1'-0\""), 12.0);
        assert_relative_eq!(inches("1'-6\""), 18.0);
        assert_relative_eq!(inches("1' 6\""), 18.0);
        assert_relative_eq!(inches("1'6\""), 18.0);
        assert_relative_eq!(inches("2'"), 24.0);
        assert_relative_eq!(inches("  20' "), 240.0);
    }

    #[test]
    fn test_fractional_inches() {
        assert_relative_eq!(inches("1/4\""), 0.25);
        assert_relative_eq!(inches("6 1/2\""), 6.5);
        assert_relative_eq!(inches("1-1/2\""), 1.5);
        assert_relative_eq!(inches("3/16"), 0.1875);
        assert_relative_eq!(inches("1'-3 1/2\""), 15.5);
    }

    #[test]
    fn test_metric() {
        assert_relative_eq!(inches("25.4mm"), 1.0, epsilon = 1e-12);
        assert_relative_eq!(inches("2.54 cm"), 1.0, epsilon = 1e-12);
        assert_relative_eq!(inches("1M"), 1.0 / 0.0254, epsilon = 1e-9);
    }

    #[test]
    fn test_bare_numbers_use_default_unit() {
        assert_relative_eq!(parse_length("3", LengthUnit::Feet).unwrap(), 36.0);
        assert_relative_eq!(
            parse_length("1000", LengthUnit::Millimeters).unwrap(),
            1000.0 / 25.4,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_negative_lengths_parse() {
        assert_relative_eq!(inches("-1'"), -12.0);
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_length("   ", LengthUnit::Inches), Err(ScaleError::Empty));
        for bad in ["abc", "1//4\"", "1/0\"", "1.2.3", "inf", "NaN", "1e3", "1' 6", "6 5\"", "--1"] {
            assert!(
                matches!(parse_length(bad, LengthUnit::Inches), Err(ScaleError::InvalidLength(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_architectural_format() {
        let fmt = LengthFormat::default();
        assert_eq!(fmt.format(150.0), "12' 6\"");
        assert_eq!(fmt.format(12.0), "1' 0\"");
        assert_eq!(fmt.format(6.5), "6 1/2\"");
        assert_eq!(fmt.format(0.25), "1/4\"");
        assert_eq!(fmt.format(0.0), "0\"");
        assert_eq!(fmt.format(0.001), "0\"");
        assert_eq!(fmt.format(-18.0), "-1' 6\"");
        // 11.99 rounds up into the next foot
        assert_eq!(fmt.format(11.99), "1' 0\"");
    }

    #[test]
    fn test_decimal_format() {
        let mm = LengthFormat::Decimal {
            unit: LengthUnit::Millimeters,
            precision: 0,
        };
        assert_eq!(mm.format(10.0), "254mm");

        let m = LengthFormat::Decimal {
            unit: LengthUnit::Meters,
            precision: 2,
        };
        assert_eq!(m.format(1.0 / 0.0254), "1.00m");

        let inch = LengthFormat::Decimal {
            unit: LengthUnit::Inches,
            precision: 0,
        };
        assert_eq!(inch.format(250.0), "250\"");
    }
}
