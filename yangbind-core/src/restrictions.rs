//! Restriction metadata of derived types.

use serde::Serialize;

/// Numeric bound of a range restriction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Number {
    /// Integral bound.
    Integer(i128),
    /// Decimal64 bound, kept in its canonical textual form.
    Decimal(String),
}

impl From<i128> for Number {
    fn from(value: i128) -> Self {
        Self::Integer(value)
    }
}

/// Inclusive numeric range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NumericRange {
    /// Lower bound.
    pub min: Number,
    /// Upper bound.
    pub max: Number,
}

/// Inclusive length range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LengthRange {
    /// Minimum length.
    pub min: u64,
    /// Maximum length.
    pub max: u64,
}

/// Pattern restriction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PatternConstraint {
    /// Regular expression as written in the schema.
    pub regex: String,
    /// Whether the pattern uses `modifier invert-match`.
    pub inverted: bool,
}

impl PatternConstraint {
    /// Creates a plain pattern constraint.
    #[must_use]
    pub fn new(regex: impl Into<String>) -> Self {
        Self {
            regex: regex.into(),
            inverted: false,
        }
    }
}

/// Range, length and pattern restrictions of a type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Restrictions {
    /// Allowed numeric ranges.
    pub ranges: Vec<NumericRange>,
    /// Allowed lengths.
    pub lengths: Vec<LengthRange>,
    /// Pattern constraints, all of which must match.
    pub patterns: Vec<PatternConstraint>,
    /// Fraction digits of a decimal64 type.
    pub fraction_digits: Option<u8>,
}

impl Restrictions {
    /// Creates an empty restriction set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no restriction is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
            && self.lengths.is_empty()
            && self.patterns.is_empty()
            && self.fraction_digits.is_none()
    }

    /// Adds an integral range.
    #[must_use]
    pub fn range(mut self, min: i128, max: i128) -> Self {
        self.ranges.push(NumericRange {
            min: Number::Integer(min),
            max: Number::Integer(max),
        });
        self
    }

    /// Adds a length range.
    #[must_use]
    pub fn length(mut self, min: u64, max: u64) -> Self {
        self.lengths.push(LengthRange { min, max });
        self
    }

    /// Adds a pattern.
    #[must_use]
    pub fn pattern(mut self, pattern: PatternConstraint) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Sets decimal64 fraction digits.
    #[must_use]
    pub fn fraction_digits(mut self, digits: u8) -> Self {
        self.fraction_digits = Some(digits);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restrictions_builder() {
        let r = Restrictions::new()
            .range(0, 100)
            .length(1, 8)
            .pattern(PatternConstraint::new("[a-z]+"));
        assert!(!r.is_empty());
        assert_eq!(r.ranges[0].max, Number::Integer(100));
        assert_eq!(r.lengths[0], LengthRange { min: 1, max: 8 });
        assert!(!r.patterns[0].inverted);
    }

    #[test]
    fn test_restrictions_empty() {
        assert!(Restrictions::new().is_empty());
        assert!(!Restrictions::new().fraction_digits(2).is_empty());
    }
}
