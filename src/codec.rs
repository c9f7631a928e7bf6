//! Conversion between raw control registers and typed values.
//!
//! Decoding divides by the registry divisor; encoding multiplies and truncates
//! toward zero. A product within a few ulps of an integer is taken as that
//! integer, so raw -> value -> raw is exact (exposure 511 us decodes to
//! 0.000511 s and encodes back to 511) while 21.57 deg_C still encodes to 215.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::FlipStatus;
use crate::control::{ControlKind, ControlType};
use crate::error::{AsiError, AsiResult};
use crate::units::Quantity;

/// A control value as callers see it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    Quantity(Quantity),
    Bool(bool),
    Flip(FlipStatus),
    Raw(i64),
}

impl ControlValue {
    pub fn as_quantity(&self) -> Option<Quantity> {
        match self {
            ControlValue::Quantity(q) => Some(*q),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ControlValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_flip(&self) -> Option<FlipStatus> {
        match self {
            ControlValue::Flip(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<i64> {
        match self {
            ControlValue::Raw(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ControlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlValue::Quantity(q) => write!(f, "{q}"),
            ControlValue::Bool(b) => write!(f, "{b}"),
            ControlValue::Flip(flip) => write!(f, "{flip:?}"),
            ControlValue::Raw(v) => write!(f, "{v}"),
        }
    }
}

impl From<Quantity> for ControlValue {
    fn from(q: Quantity) -> Self {
        ControlValue::Quantity(q)
    }
}

impl From<bool> for ControlValue {
    fn from(b: bool) -> Self {
        ControlValue::Bool(b)
    }
}

impl From<FlipStatus> for ControlValue {
    fn from(f: FlipStatus) -> Self {
        ControlValue::Flip(f)
    }
}

impl From<i64> for ControlValue {
    fn from(v: i64) -> Self {
        ControlValue::Raw(v)
    }
}

/// Interpret a raw register value of `control`.
pub fn decode(raw: i64, control: ControlType) -> AsiResult<ControlValue> {
    let value = match control.kind() {
        ControlKind::UnitScaled { unit, divisor } => {
            ControlValue::Quantity(Quantity::new(raw as f64 / f64::from(divisor), unit))
        }
        ControlKind::Boolean => ControlValue::Bool(raw != 0),
        ControlKind::EnumeratedFlip => ControlValue::Flip(
            FlipStatus::from_raw(raw).ok_or(AsiError::Decode { field: "FLIP", value: raw })?,
        ),
        ControlKind::RawInteger => ControlValue::Raw(raw),
    };
    Ok(value)
}

/// Same as [`decode`], addressing the control by its raw identifier.
pub fn decode_raw(raw: i64, control_type: i32) -> AsiResult<ControlValue> {
    decode(raw, ControlType::from_raw(control_type)?)
}

/// Produce the raw register value for `value` written to `control`.
pub fn encode(value: &ControlValue, control: ControlType) -> AsiResult<i64> {
    match (control.kind(), value) {
        (ControlKind::UnitScaled { unit, divisor }, ControlValue::Quantity(q)) => {
            let scaled = q.value_in(unit)? * f64::from(divisor);
            truncate(scaled, control)
        }
        (ControlKind::Boolean, ControlValue::Bool(b)) => Ok(i64::from(*b)),
        (ControlKind::EnumeratedFlip, ControlValue::Flip(flip)) => Ok(i64::from(flip.as_raw())),
        (ControlKind::RawInteger, ControlValue::Raw(v)) => Ok(*v),
        (kind, value) => Err(AsiError::validation(format!(
            "{value} is not a valid value for {control} ({kind:?})"
        ))),
    }
}

/// Same as [`encode`], addressing the control by its raw identifier.
pub fn encode_raw(value: &ControlValue, control_type: i32) -> AsiResult<i64> {
    encode(value, ControlType::from_raw(control_type)?)
}

// 2^63 is exactly representable; anything at or beyond it does not fit.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

// Float error of one conversion plus one scaling stays within a few ulps.
const SNAP_ULPS: f64 = 8.0;

fn truncate(scaled: f64, control: ControlType) -> AsiResult<i64> {
    let nearest = scaled.round();
    let tolerance = SNAP_ULPS * f64::EPSILON * nearest.abs().max(1.0);
    let truncated = if (scaled - nearest).abs() <= tolerance {
        nearest
    } else {
        scaled.trunc()
    };
    if !truncated.is_finite() || truncated >= I64_BOUND || truncated < -I64_BOUND {
        return Err(AsiError::validation(format!(
            "{scaled} is out of range for {control}"
        )));
    }
    Ok(truncated as i64)
}
