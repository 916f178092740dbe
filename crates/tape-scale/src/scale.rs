//! The drawing scale model and its session-wide shared handle.

use crate::error::{Result, ScaleError};
use crate::units::{parse_decimal, parse_length, LengthUnit};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

/// A validated drawing scale.
///
/// A `Scale` only exists for input that reduced to a strictly positive
/// factor; a rejected string is a [`ScaleError`] instead, so the factor of
/// an invalid scale can never be read.
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    spec: String,
    factor: f64,
}

impl Scale {
    /// The `1:1` scale.
    pub fn identity() -> Self {
        Self {
            spec: "1:1".to_string(),
            factor: 1.0,
        }
    }

    /// Parse a scale, reading bare numbers of an equation in inches.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with_unit(text, LengthUnit::Inches)
    }

    /// Parse a scale.
    ///
    /// `A:B` gives the factor `B / A`. `L1 = L2` gives `L2 / L1` where both
    /// sides are length expressions; bare numbers in them are read in
    /// `default_unit`. Whitespace around tokens is ignored.
    pub fn parse_with_unit(text: &str, default_unit: LengthUnit) -> Result<Self> {
        let spec = text.trim();
        if spec.is_empty() {
            return Err(ScaleError::Empty);
        }

        let factor = if let Some((a, b)) = spec.split_once(':') {
            parse_ratio_side(b)? / parse_ratio_side(a)?
        } else if let Some((paper, model)) = spec.split_once('=') {
            parse_length(model, default_unit)? / parse_length(paper, default_unit)?
        } else {
            return Err(ScaleError::Malformed(spec.to_string()));
        };

        if !(factor.is_finite() && factor > 0.0) {
            return Err(ScaleError::NonPositive(factor));
        }

        Ok(Self {
            spec: spec.to_string(),
            factor,
        })
    }

    /// The text the scale was entered as.
    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// Unitless multiplier from model length to the length the user reads.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Scale a model length into the length read at this scale.
    pub fn scale_length(&self, length: f64) -> f64 {
        length * self.factor
    }
}

/// A ratio side: a plain decimal, optionally signed so `-1:50` is reported
/// as a non-positive scale rather than as garbage.
fn parse_ratio_side(s: &str) -> Result<f64> {
    let s = s.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1.0, rest.trim_start()),
        None => (1.0, s),
    };
    parse_decimal(digits)
        .map(|v| sign * v)
        .ok_or_else(|| ScaleError::InvalidNumber(s.to_string()))
}

impl Default for Scale {
    fn default() -> Self {
        Self::identity()
    }
}

impl FromStr for Scale {
    type Err = ScaleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Canonical `1:N` form, whatever form the scale was entered in.
///
/// `N` is the shortest decimal that reads back as the same factor, so the
/// printed form always parses to an equal scale.
impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1:{}", self.factor)
    }
}

/// Handle to the session's current scale.
///
/// Clones share the same value: the scale chosen in one tool activation is
/// still in effect in the next. Text entry is the only writer; every readout
/// reads the current value.
#[derive(Debug, Clone, Default)]
pub struct SharedScale {
    inner: Arc<RwLock<Arc<Scale>>>,
}

impl SharedScale {
    /// A handle holding `scale`.
    pub fn new(scale: Scale) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(scale))),
        }
    }

    /// The scale currently in effect.
    pub fn current(&self) -> Arc<Scale> {
        // A poisoned lock still holds a complete `Scale`.
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Install `scale`, returning the one it replaced.
    pub fn replace(&self, scale: Scale) -> Arc<Scale> {
        log::info!("drawing scale set to {scale} (entered as {:?})", scale.spec());
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_ratio_factor() {
        assert_relative_eq!(Scale::parse("1:50").unwrap().factor(), 50.0);
        assert_relative_eq!(Scale::parse(" 2 : 100 ").unwrap().factor(), 50.0);
        assert_relative_eq!(Scale::parse("10:1").unwrap().factor(), 0.1);
        assert_relative_eq!(Scale::parse("1:1").unwrap().factor(), 1.0);
    }

    #[test]
    fn test_architectural_equation() {
        let s = Scale::parse("1/4\" = 1'-0\"").unwrap();
        assert_relative_eq!(s.factor(), 48.0);
        assert_eq!(s.to_string(), "1:48");
        assert_eq!(s.spec(), "1/4\" = 1'-0\"");

        assert_relative_eq!(Scale::parse("1\"=20'").unwrap().factor(), 240.0);
        assert_relative_eq!(Scale::parse("1/8\" = 1'").unwrap().factor(), 96.0);
        assert_relative_eq!(
            Scale::parse("1mm = 1m").unwrap().factor(),
            1000.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_bare_equation_sides_use_default_unit() {
        let s = Scale::parse_with_unit("1 = 2'", LengthUnit::Feet).unwrap();
        assert_relative_eq!(s.factor(), 2.0);
    }

    #[test]
    fn test_invalid_scales() {
        assert_eq!(Scale::parse(""), Err(ScaleError::Empty));
        assert!(matches!(Scale::parse("0:50"), Err(ScaleError::NonPositive(_))));
        assert!(matches!(Scale::parse("1:0"), Err(ScaleError::NonPositive(_))));
        assert!(matches!(Scale::parse("-1:50"), Err(ScaleError::NonPositive(_))));
        assert!(matches!(Scale::parse("1:-50"), Err(ScaleError::NonPositive(_))));
        assert!(matches!(Scale::parse("a:b"), Err(ScaleError::InvalidNumber(_))));
        assert!(matches!(Scale::parse("1:2:3"), Err(ScaleError::InvalidNumber(_))));
        assert!(matches!(Scale::parse("50"), Err(ScaleError::Malformed(_))));
        assert!(matches!(Scale::parse("1\" = "), Err(ScaleError::Empty)));
        assert!(matches!(Scale::parse("0\" = 1'"), Err(ScaleError::NonPositive(_))));
        assert!(matches!(Scale::parse("-1\" = 1'"), Err(ScaleError::NonPositive(_))));
        assert!(matches!(Scale::parse("x = 1'"), Err(ScaleError::InvalidLength(_))));
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(Scale::parse("3:1").unwrap().to_string(), "1:0.3333333333333333");
        assert_eq!(Scale::parse("1:2.5").unwrap().to_string(), "1:2.5");
        assert_eq!(Scale::parse("1:125000").unwrap().to_string(), "1:125000");
        assert_eq!(Scale::identity().to_string(), "1:1");
    }

    #[test]
    fn test_tiny_and_huge_factors_reparse() {
        for text in ["1000000000000000000:1", "1:1000000000000000000", "3:1", "7:3"] {
            let scale = Scale::parse(text).unwrap();
            let shown = scale.to_string();
            assert!(!shown.contains('e'), "{shown}");
            let again = Scale::parse(&shown).unwrap();
            assert_eq!(again.factor(), scale.factor(), "{text} shown as {shown}");
        }
        assert_eq!(
            Scale::parse("1000000000000000000:1").unwrap().to_string(),
            "1:0.000000000000000001"
        );
    }

    #[test]
    fn test_shared_scale_is_shared_between_clones() {
        let a = SharedScale::new(Scale::identity());
        let b = a.clone();
        let previous = b.replace(Scale::parse("1:20").unwrap());
        assert_eq!(previous.to_string(), "1:1");
        assert_eq!(a.current().to_string(), "1:20");
    }

    proptest! {
        #[test]
        fn prop_ratio_factor_is_b_over_a(a in 0.001f64..10_000.0, b in 0.001f64..10_000.0) {
            let text = format!("{a}:{b}");
            let scale = Scale::parse(&text).unwrap();
            prop_assert!((scale.factor() - b / a).abs() <= 1e-9 * (b / a));
        }

        #[test]
        fn prop_display_roundtrips(a in 0.001f64..10_000.0, b in 0.001f64..10_000.0) {
            let scale = Scale::parse(&format!("{a}:{b}")).unwrap();
            let shown = scale.to_string();
            prop_assert!(shown.starts_with("1:"));
            let again = Scale::parse(&shown).unwrap();
            prop_assert!((again.factor() - scale.factor()).abs() <= 1e-12 * scale.factor());
        }

        #[test]
        fn prop_non_positive_sides_are_rejected(a in -10_000.0f64..=0.0, b in 0.001f64..10_000.0) {
            let ab = format!("{a}:{b}");
            let ba = format!("{b}:{a}");
            prop_assert!(Scale::parse(&ab).is_err());
            prop_assert!(Scale::parse(&ba).is_err());
        }
    }
}
