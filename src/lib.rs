pub mod camera;
pub mod codec;
pub mod common;
pub mod config;
pub mod control;
pub mod device_info;
pub mod driver;
pub mod error;
pub mod frame;
pub mod misc;
pub mod units;

#[cfg(test)]
mod mock;

pub use asi_sys as bindings;

// Re-export main types for convenience
pub use crate::camera::{camera_property, list_cameras, num_connected_cameras, Camera, RoiFormat};
pub use crate::codec::ControlValue;
pub use crate::common::{
    BayerPattern, CameraMode, ExposureStatus, FlipStatus, GuideDirection, ImageType, TrigOutput,
};
pub use crate::config::CameraConfig;
pub use crate::control::{ControlKind, ControlType};
pub use crate::device_info::{CameraInfo, ControlCaps};
pub use crate::driver::Driver;
#[cfg(feature = "native")]
pub use crate::driver::NativeDriver;
pub use crate::error::{AsiError, AsiResult, ErrorCode};
pub use crate::frame::{FrameBuffer, FrameBufferSpec, FrameData};
pub use crate::units::{Dimension, Quantity, Unit};
