//! Typed views of the SDK's camera-info and control-caps records.

use std::fmt;

use asi_sys::{
    ASI_CAMERA_INFO, ASI_CONTROL_CAPS, ASI_ID_MAX, ASI_IMG_END, ASI_MODE_END, ASI_SUPPORTED_MODE,
};
use serde::Serialize;

use crate::codec::{self, ControlValue};
use crate::common::{BayerPattern, CameraMode, ImageType};
use crate::control::ControlType;
use crate::error::{AsiError, AsiResult};
use crate::misc::{fixed_c_string, flag};

/// Static capabilities of one camera, decoded from `ASI_CAMERA_INFO`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraInfo {
    pub name: String,
    /// In `0..ID_MAX`; used to address the camera in every other call.
    pub camera_id: i32,
    /// Pixels
    pub max_height: u32,
    /// Pixels
    pub max_width: u32,
    pub is_color_camera: bool,
    /// Only meaningful when `is_color_camera` is set.
    pub bayer_pattern: BayerPattern,
    pub supported_bins: Vec<u32>,
    pub supported_video_formats: Vec<ImageType>,
    /// Microns
    pub pixel_size_um: f64,
    pub has_mechanical_shutter: bool,
    pub has_st4_port: bool,
    pub has_cooler: bool,
    pub is_usb3_host: bool,
    pub is_usb3_camera: bool,
    /// Electrons per ADU at the current gain
    pub e_per_adu: f32,
    pub bit_depth: u32,
    pub is_trigger_camera: bool,
}

fn decode_u32(field: &'static str, value: i64) -> AsiResult<u32> {
    u32::try_from(value).map_err(|_| AsiError::Decode { field, value })
}

/// Binning slots up to (excluding) the first zero.
fn parse_bins(slots: &[i32]) -> AsiResult<Vec<u32>> {
    slots
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| decode_u32("SupportedBins", i64::from(b)))
        .collect()
}

/// Format slots up to (excluding) the END sentinel.
fn parse_formats(slots: &[i32]) -> AsiResult<Vec<ImageType>> {
    slots
        .iter()
        .take_while(|&&f| f != ASI_IMG_END)
        .map(|&f| {
            ImageType::from_raw(f).ok_or(AsiError::Decode {
                field: "SupportedVideoFormat",
                value: i64::from(f),
            })
        })
        .collect()
}

/// Trigger modes of `ASI_SUPPORTED_MODE`, up to (excluding) the END sentinel.
pub fn decode_camera_modes(raw: &ASI_SUPPORTED_MODE) -> AsiResult<Vec<CameraMode>> {
    raw.SupportedCameraMode
        .iter()
        .take_while(|&&m| m != ASI_MODE_END)
        .map(|&m| {
            CameraMode::from_raw(m).ok_or(AsiError::Decode {
                field: "SupportedCameraMode",
                value: i64::from(m),
            })
        })
        .collect()
}

impl CameraInfo {
    pub fn decode(raw: &ASI_CAMERA_INFO) -> AsiResult<Self> {
        if !(0..ASI_ID_MAX).contains(&raw.CameraID) {
            return Err(AsiError::Decode {
                field: "CameraID",
                value: i64::from(raw.CameraID),
            });
        }
        let bayer_pattern = BayerPattern::from_raw(raw.BayerPattern).ok_or(AsiError::Decode {
            field: "BayerPattern",
            value: i64::from(raw.BayerPattern),
        })?;

        Ok(CameraInfo {
            name: fixed_c_string("Name", &raw.Name)?,
            camera_id: raw.CameraID,
            max_height: decode_u32("MaxHeight", i64::from(raw.MaxHeight))?,
            max_width: decode_u32("MaxWidth", i64::from(raw.MaxWidth))?,
            is_color_camera: flag(raw.IsColorCam),
            bayer_pattern,
            supported_bins: parse_bins(&raw.SupportedBins)?,
            supported_video_formats: parse_formats(&raw.SupportedVideoFormat)?,
            pixel_size_um: raw.PixelSize,
            has_mechanical_shutter: flag(raw.MechanicalShutter),
            has_st4_port: flag(raw.ST4Port),
            has_cooler: flag(raw.IsCoolerCam),
            is_usb3_host: flag(raw.IsUSB3Host),
            is_usb3_camera: flag(raw.IsUSB3Camera),
            e_per_adu: raw.ElecPerADU,
            bit_depth: decode_u32("BitDepth", i64::from(raw.BitDepth))?,
            is_trigger_camera: flag(raw.IsTriggerCam),
        })
    }

    pub fn supports_format(&self, image_type: ImageType) -> bool {
        self.supported_video_formats.contains(&image_type)
    }

    pub fn supports_binning(&self, bin: u32) -> bool {
        self.supported_bins.contains(&bin)
    }

    /// Largest frame `(width, height)` at the given binning.
    pub fn max_roi(&self, bin: u32) -> AsiResult<(u32, u32)> {
        if !self.supports_binning(bin) {
            return Err(AsiError::validation(format!(
                "binning {bin} not supported by {} (supported: {:?})",
                self.name, self.supported_bins
            )));
        }
        Ok((self.max_width / bin, self.max_height / bin))
    }
}

impl fmt::Display for CameraInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (id {}, {}x{}, {}-bit, {})",
            self.name,
            self.camera_id,
            self.max_width,
            self.max_height,
            self.bit_depth,
            if self.is_color_camera { "color" } else { "mono" }
        )
    }
}

/// Limits of one control on one camera, decoded from `ASI_CONTROL_CAPS`.
///
/// `min_value`, `max_value` and `default_value` are already interpreted
/// through the control registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlCaps {
    pub name: String,
    pub description: String,
    pub min_value: ControlValue,
    pub max_value: ControlValue,
    pub default_value: ControlValue,
    pub is_auto_supported: bool,
    pub is_writable: bool,
    pub control_type: ControlType,
}

impl ControlCaps {
    pub fn decode(raw: &ASI_CONTROL_CAPS) -> AsiResult<Self> {
        let control_type = ControlType::from_raw(raw.ControlType)?;
        Ok(ControlCaps {
            name: fixed_c_string("Name", &raw.Name)?,
            description: fixed_c_string("Description", &raw.Description)?,
            min_value: codec::decode(i64::from(raw.MinValue), control_type)?,
            max_value: codec::decode(i64::from(raw.MaxValue), control_type)?,
            default_value: codec::decode(i64::from(raw.DefaultValue), control_type)?,
            is_auto_supported: flag(raw.IsAutoSupported),
            is_writable: flag(raw.IsWritable),
            control_type,
        })
    }
}
