//! Session configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::camera::RoiFormat;
use crate::common::ImageType;
use crate::device_info::CameraInfo;
use crate::error::{AsiError, AsiResult};

/// How a [`Camera`](crate::Camera) is selected and set up when opened.
///
/// ```toml
/// camera_index = 0
/// image_type = "RAW16"
/// binning = 2
/// video_timeout_ms = 500
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    /// Index among connected cameras, not the camera id.
    pub camera_index: i32,
    pub image_type: ImageType,
    pub binning: u32,
    /// Defaults to the full sensor width at the chosen binning.
    pub width: Option<u32>,
    /// Defaults to the full sensor height at the chosen binning.
    pub height: Option<u32>,
    /// Added to twice the exposure time when waiting for a video frame.
    pub video_timeout_ms: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            image_type: ImageType::Raw16,
            binning: 1,
            width: None,
            height: None,
            video_timeout_ms: 500,
        }
    }
}

impl CameraConfig {
    pub fn new(camera_index: i32) -> Self {
        Self {
            camera_index,
            ..Default::default()
        }
    }

    pub fn from_toml_str(text: &str) -> AsiResult<Self> {
        let config: CameraConfig =
            toml::from_str(text).map_err(|e| AsiError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> AsiResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            AsiError::InvalidConfiguration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> AsiResult<()> {
        if self.camera_index < 0 {
            return Err(AsiError::InvalidConfiguration(format!(
                "camera_index must not be negative, got {}",
                self.camera_index
            )));
        }
        if self.binning == 0 {
            return Err(AsiError::InvalidConfiguration("binning must be at least 1".into()));
        }
        if self.width == Some(0) || self.height == Some(0) {
            return Err(AsiError::InvalidConfiguration(
                "width and height must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn video_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.video_timeout_ms))
    }

    /// The ROI this configuration asks for on the given camera. Missing
    /// dimensions are the full sensor, rounded down to the SDK alignment.
    pub fn roi(&self, info: &CameraInfo) -> AsiResult<RoiFormat> {
        let full = RoiFormat::full_sensor(info, self.binning, self.image_type)?;
        Ok(RoiFormat {
            width: self.width.unwrap_or(full.width),
            height: self.height.unwrap_or(full.height),
            ..full
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device_info::tests::sample_info;

    #[test]
    fn test_defaults() {
        let config = CameraConfig::from_toml_str("").unwrap();
        assert_eq!(config, CameraConfig::default());
        assert_eq!(config.video_timeout(), Duration::from_millis(500));
    }

    #[test]
    fn test_parse_toml() {
        let config = CameraConfig::from_toml_str(
            r#"
            camera_index = 1
            image_type = "RGB24"
            binning = 2
            width = 640
            height = 480
            "#,
        )
        .unwrap();
        assert_eq!(config.camera_index, 1);
        assert_eq!(config.image_type, ImageType::Rgb24);
        assert_eq!((config.width, config.height), (Some(640), Some(480)));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            CameraConfig::from_toml_str("binning = 0"),
            Err(AsiError::InvalidConfiguration(_))
        ));
        assert!(CameraConfig::from_toml_str("camera_index = -1").is_err());
        assert!(CameraConfig::from_toml_str("image_type = \"END\"").is_err());
        assert!(CameraConfig::from_toml_str("exposure = 3").is_err());
    }

    #[test]
    fn test_roi_defaults_to_full_sensor() {
        let info = CameraInfo::decode(&sample_info()).unwrap();
        let mut config = CameraConfig::default();
        config.binning = 2;
        let roi = config.roi(&info).unwrap();
        assert_eq!((roi.width, roi.height, roi.bin), (2072, 1410, 2));
        assert!(roi.is_aligned());

        config.binning = 3;
        let roi = config.roi(&info).unwrap();
        assert_eq!((roi.width, roi.height), (1376, 940));

        config.width = Some(640);
        assert_eq!(config.roi(&info).unwrap().width, 640);

        config.binning = 16;
        assert!(config.roi(&info).is_err());
    }

    #[test]
    fn test_from_missing_file() {
        let err = CameraConfig::from_toml_file("/nonexistent/asi.toml").unwrap_err();
        assert!(matches!(err, AsiError::InvalidConfiguration(_)));
    }
}
