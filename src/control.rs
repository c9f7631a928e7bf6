//! Control identifiers and the registry of what their raw values mean.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AsiError, AsiResult};
use crate::units::Unit;

/// Camera control addressed through `ASIGetControlValue`/`ASISetControlValue`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlType {
    Gain = 0,
    /// Microseconds on the wire
    Exposure = 1,
    Gamma = 2,
    WbR = 3,
    WbB = 4,
    Offset = 5,
    BandwidthOverload = 6,
    Overclock = 7,
    /// Tenths of a degree Celsius on the wire
    Temperature = 8,
    Flip = 9,
    AutoMaxGain = 10,
    /// Microseconds on the wire
    AutoMaxExp = 11,
    AutoTargetBrightness = 12,
    HardwareBin = 13,
    HighSpeedMode = 14,
    CoolerPowerPerc = 15,
    /// Whole degrees Celsius, unlike `Temperature`
    TargetTemp = 16,
    CoolerOn = 17,
    /// Less grid at software bin mode for color cameras
    MonoBin = 18,
    FanOn = 19,
    PatternAdjust = 20,
    AntiDewHeater = 21,
}

/// How the raw integer of a control is presented to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// `presented = raw / divisor`, tagged with `unit`.
    UnitScaled { unit: Unit, divisor: u32 },
    /// Nonzero is `true`.
    Boolean,
    /// One of the four [`FlipStatus`](crate::FlipStatus) states.
    EnumeratedFlip,
    RawInteger,
}

impl ControlKind {
    /// Factor applied to the raw value on decode.
    pub fn scale(self) -> Option<f64> {
        match self {
            ControlKind::UnitScaled { divisor, .. } => Some(1.0 / f64::from(divisor)),
            _ => None,
        }
    }
}

const MICROSECONDS: u32 = 1_000_000;
const DECI: u32 = 10;

impl ControlType {
    /// SDK alias of [`ControlType::Offset`].
    pub const BRIGHTNESS: ControlType = ControlType::Offset;
    /// SDK alias of [`ControlType::AutoTargetBrightness`].
    pub const AUTO_MAX_BRIGHTNESS: ControlType = ControlType::AutoTargetBrightness;

    pub const ALL: [ControlType; 22] = [
        ControlType::Gain,
        ControlType::Exposure,
        ControlType::Gamma,
        ControlType::WbR,
        ControlType::WbB,
        ControlType::Offset,
        ControlType::BandwidthOverload,
        ControlType::Overclock,
        ControlType::Temperature,
        ControlType::Flip,
        ControlType::AutoMaxGain,
        ControlType::AutoMaxExp,
        ControlType::AutoTargetBrightness,
        ControlType::HardwareBin,
        ControlType::HighSpeedMode,
        ControlType::CoolerPowerPerc,
        ControlType::TargetTemp,
        ControlType::CoolerOn,
        ControlType::MonoBin,
        ControlType::FanOn,
        ControlType::PatternAdjust,
        ControlType::AntiDewHeater,
    ];

    pub fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn from_raw(value: i32) -> AsiResult<Self> {
        usize::try_from(value)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or(AsiError::UnsupportedControl(value))
    }

    /// The registry entry for this control.
    ///
    /// No wildcard arm: a new control does not compile until it is given a kind.
    pub fn kind(self) -> ControlKind {
        use ControlType::*;
        match self {
            Exposure | AutoMaxExp => ControlKind::UnitScaled {
                unit: Unit::Second,
                divisor: MICROSECONDS,
            },
            Temperature => ControlKind::UnitScaled {
                unit: Unit::Celsius,
                divisor: DECI,
            },
            TargetTemp => ControlKind::UnitScaled {
                unit: Unit::Celsius,
                divisor: 1,
            },
            BandwidthOverload | CoolerPowerPerc => ControlKind::UnitScaled {
                unit: Unit::Percent,
                divisor: 1,
            },
            Offset | AutoTargetBrightness => ControlKind::UnitScaled {
                unit: Unit::Adu,
                divisor: 1,
            },
            AntiDewHeater | CoolerOn | FanOn | HardwareBin | HighSpeedMode | MonoBin
            | PatternAdjust => ControlKind::Boolean,
            Flip => ControlKind::EnumeratedFlip,
            Gain | Gamma | WbR | WbB | Overclock | AutoMaxGain => ControlKind::RawInteger,
        }
    }

    pub fn is_boolean(self) -> bool {
        matches!(self.kind(), ControlKind::Boolean)
    }

    /// SDK name without the `ASI_` prefix.
    pub fn name(self) -> &'static str {
        use ControlType::*;
        match self {
            Gain => "GAIN",
            Exposure => "EXPOSURE",
            Gamma => "GAMMA",
            WbR => "WB_R",
            WbB => "WB_B",
            Offset => "OFFSET",
            BandwidthOverload => "BANDWIDTHOVERLOAD",
            Overclock => "OVERCLOCK",
            Temperature => "TEMPERATURE",
            Flip => "FLIP",
            AutoMaxGain => "AUTO_MAX_GAIN",
            AutoMaxExp => "AUTO_MAX_EXP",
            AutoTargetBrightness => "AUTO_TARGET_BRIGHTNESS",
            HardwareBin => "HARDWARE_BIN",
            HighSpeedMode => "HIGH_SPEED_MODE",
            CoolerPowerPerc => "COOLER_POWER_PERC",
            TargetTemp => "TARGET_TEMP",
            CoolerOn => "COOLER_ON",
            MonoBin => "MONO_BIN",
            FanOn => "FAN_ON",
            PatternAdjust => "PATTERN_ADJUST",
            AntiDewHeater => "ANTI_DEW_HEATER",
        }
    }
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Registry lookup by raw control identifier.
pub fn kind_of(control_type: i32) -> AsiResult<ControlKind> {
    ControlType::from_raw(control_type).map(ControlType::kind)
}
