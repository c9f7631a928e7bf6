//! Physical units attached to decoded control values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AsiError, AsiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Time,
    Temperature,
    Ratio,
    Signal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Second,
    Millisecond,
    Microsecond,
    Celsius,
    Kelvin,
    Percent,
    /// Analog-to-digital units (detector counts)
    Adu,
}

impl Unit {
    pub fn dimension(self) -> Dimension {
        match self {
            Unit::Second | Unit::Millisecond | Unit::Microsecond => Dimension::Time,
            Unit::Celsius | Unit::Kelvin => Dimension::Temperature,
            Unit::Percent => Dimension::Ratio,
            Unit::Adu => Dimension::Signal,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Second => "s",
            Unit::Millisecond => "ms",
            Unit::Microsecond => "us",
            Unit::Celsius => "deg_C",
            Unit::Kelvin => "K",
            Unit::Percent => "%",
            Unit::Adu => "adu",
        }
    }

    // Affine map onto the base unit of the dimension:
    // base = value / per_base + offset. `per_base` is an exact integer.
    fn to_base(self) -> (f64, f64) {
        match self {
            Unit::Second => (1.0, 0.0),
            Unit::Millisecond => (1e3, 0.0),
            Unit::Microsecond => (1e6, 0.0),
            Unit::Celsius => (1.0, 0.0),
            Unit::Kelvin => (1.0, -273.15),
            Unit::Percent | Unit::Adu => (1.0, 0.0),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A number tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Quantity { value, unit }
    }

    pub fn seconds(value: f64) -> Self {
        Quantity::new(value, Unit::Second)
    }

    pub fn milliseconds(value: f64) -> Self {
        Quantity::new(value, Unit::Millisecond)
    }

    pub fn microseconds(value: f64) -> Self {
        Quantity::new(value, Unit::Microsecond)
    }

    pub fn celsius(value: f64) -> Self {
        Quantity::new(value, Unit::Celsius)
    }

    pub fn percent(value: f64) -> Self {
        Quantity::new(value, Unit::Percent)
    }

    pub fn adu(value: f64) -> Self {
        Quantity::new(value, Unit::Adu)
    }

    /// Numeric value expressed in `target`. Fails across dimensions.
    pub fn value_in(&self, target: Unit) -> AsiResult<f64> {
        if self.unit == target {
            return Ok(self.value);
        }
        if self.unit.dimension() != target.dimension() {
            return Err(AsiError::validation(format!(
                "cannot convert {self} to {target}"
            )));
        }
        let (per_base, offset) = self.unit.to_base();
        let (target_per_base, target_offset) = target.to_base();
        let base = self.value / per_base + offset;
        Ok((base - target_offset) * target_per_base)
    }

    pub fn to(&self, target: Unit) -> AsiResult<Quantity> {
        Ok(Quantity::new(self.value_in(target)?, target))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_unit_is_identity() {
        assert_eq!(Quantity::seconds(5.0).value_in(Unit::Second).unwrap(), 5.0);
    }

    #[test]
    fn test_converts_within_a_dimension() {
        assert_eq!(Quantity::milliseconds(5000.0).value_in(Unit::Second).unwrap(), 5.0);
        assert_eq!(Quantity::seconds(2.0).value_in(Unit::Microsecond).unwrap(), 2_000_000.0);
        let c = Quantity::new(300.0, Unit::Kelvin).value_in(Unit::Celsius).unwrap();
        assert!((c - 26.85).abs() < 1e-9);
    }

    #[test]
    fn test_refuses_to_cross_dimensions() {
        let err = Quantity::percent(50.0).value_in(Unit::Second).unwrap_err();
        assert!(matches!(err, AsiError::Validation(_)));
        assert!(Quantity::celsius(20.0).to(Unit::Adu).is_err());
    }
}
