use std::fmt;

use serde::{Deserialize, Serialize};

/// Bayer filter arrangement of a color sensor.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BayerPattern {
    RG = 0,
    BG = 1,
    GR = 2,
    GB = 3,
}

impl BayerPattern {
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn from_raw(value: i32) -> Option<Self> {
        use BayerPattern::*;
        match value {
            0 => Some(RG),
            1 => Some(BG),
            2 => Some(GR),
            3 => Some(GB),
            _ => None,
        }
    }
}

/// Frame encoding, corresponding to `ASI_IMG_TYPE`.
///
/// The SDK's `END` value (-1) only terminates the supported-format list in the
/// camera info record and has no variant here; see [`asi_sys::ASI_IMG_END`].
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageType {
    Raw8 = 0,
    Rgb24 = 1,
    Raw16 = 2,
    Y8 = 3,
}

impl ImageType {
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn from_raw(value: i32) -> Option<Self> {
        use ImageType::*;
        match value {
            0 => Some(Raw8),
            1 => Some(Rgb24),
            2 => Some(Raw16),
            3 => Some(Y8),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ImageType::Raw8 => "RAW8",
            ImageType::Rgb24 => "RGB24",
            ImageType::Raw16 => "RAW16",
            ImageType::Y8 => "Y8",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Readout flip applied by the camera.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FlipStatus {
    #[default]
    None = 0,
    Horiz = 1,
    Vert = 2,
    Both = 3,
}

impl FlipStatus {
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn from_raw(value: i64) -> Option<Self> {
        match value {
            0 => Some(FlipStatus::None),
            1 => Some(FlipStatus::Horiz),
            2 => Some(FlipStatus::Vert),
            3 => Some(FlipStatus::Both),
            _ => None,
        }
    }
}

/// ST4 guide port direction.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuideDirection {
    North = 0,
    South = 1,
    East = 2,
    West = 3,
}

impl GuideDirection {
    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

/// State of a single-frame (snap) exposure.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExposureStatus {
    Idle = 0,
    Working = 1,
    Success = 2,
    Failed = 3,
}

impl ExposureStatus {
    pub fn from_raw(value: i32) -> Option<Self> {
        use ExposureStatus::*;
        match value {
            0 => Some(Idle),
            1 => Some(Working),
            2 => Some(Success),
            3 => Some(Failed),
            _ => None,
        }
    }
}

/// Trigger mode of a trigger-capable camera. `END` (-1) terminates the
/// supported-mode list and has no variant.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMode {
    Normal = 0,
    TrigSoftEdge = 1,
    TrigRiseEdge = 2,
    TrigFallEdge = 3,
    TrigSoftLevel = 4,
    TrigHighLevel = 5,
    TrigLowLevel = 6,
}

impl CameraMode {
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn from_raw(value: i32) -> Option<Self> {
        use CameraMode::*;
        match value {
            0 => Some(Normal),
            1 => Some(TrigSoftEdge),
            2 => Some(TrigRiseEdge),
            3 => Some(TrigFallEdge),
            4 => Some(TrigSoftLevel),
            5 => Some(TrigHighLevel),
            6 => Some(TrigLowLevel),
            _ => None,
        }
    }
}

/// External trigger output pin.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrigOutput {
    /// Only pin A output
    PinA = 0,
    /// Only pin B output
    PinB = 1,
    None = -1,
}

impl TrigOutput {
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn from_raw(value: i32) -> Option<Self> {
        match value {
            0 => Some(TrigOutput::PinA),
            1 => Some(TrigOutput::PinB),
            -1 => Some(TrigOutput::None),
            _ => None,
        }
    }
}
