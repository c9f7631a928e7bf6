//! An open camera and the calls made against it.
//!
//! [`Camera`] owns its [`Driver`], so every call on one device goes through a
//! single `&mut` borrow. Values cross the boundary through the control codec
//! and frame buffers are shaped from the negotiated [`RoiFormat`].

use std::fmt;
use std::os::raw::c_long;
use std::time::Duration;

use asi_sys::{ASI_CAMERA_INFO, ASI_CONTROL_CAPS, ASI_ID, ASI_SUPPORTED_MODE};

use crate::codec::{self, ControlValue};
use crate::common::{CameraMode, ExposureStatus, GuideDirection, ImageType, TrigOutput};
use crate::config::CameraConfig;
use crate::control::ControlType;
use crate::device_info::{self, CameraInfo, ControlCaps};
use crate::driver::Driver;
use crate::error::{check, AsiError, AsiResult};
use crate::frame::{FrameBuffer, FrameBufferSpec};
use crate::units::Unit;

/// Region of interest: output geometry (after binning) and pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoiFormat {
    pub width: u32,
    pub height: u32,
    pub bin: u32,
    pub image_type: ImageType,
}

impl RoiFormat {
    /// The SDK only accepts widths in multiples of this.
    pub const WIDTH_ALIGN: u32 = 8;
    /// The SDK only accepts heights in multiples of this.
    pub const HEIGHT_ALIGN: u32 = 2;

    /// Largest aligned frame the camera delivers at `bin`.
    pub fn full_sensor(info: &CameraInfo, bin: u32, image_type: ImageType) -> AsiResult<Self> {
        let (width, height) = info.max_roi(bin)?;
        Ok(RoiFormat {
            width: width - width % Self::WIDTH_ALIGN,
            height: height - height % Self::HEIGHT_ALIGN,
            bin,
            image_type,
        })
    }

    pub fn is_aligned(&self) -> bool {
        self.width % Self::WIDTH_ALIGN == 0 && self.height % Self::HEIGHT_ALIGN == 0
    }

    pub fn frame_spec(&self) -> AsiResult<FrameBufferSpec> {
        FrameBufferSpec::allocate(self.width, self.height, self.image_type)
    }
}

impl fmt::Display for RoiFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} bin{} {}",
            self.width, self.height, self.bin, self.image_type
        )
    }
}

fn to_i32(field: &str, value: u32) -> AsiResult<i32> {
    i32::try_from(value).map_err(|_| AsiError::validation(format!("{field} {value} is too large")))
}

fn from_i32(field: &'static str, value: i32) -> AsiResult<u32> {
    u32::try_from(value).map_err(|_| AsiError::Decode {
        field,
        value: i64::from(value),
    })
}

fn micros(field: &str, duration: Duration) -> AsiResult<c_long> {
    i64::try_from(duration.as_micros())
        .ok()
        .and_then(|us| c_long::try_from(us).ok())
        .ok_or_else(|| AsiError::validation(format!("{field} {duration:?} is too long")))
}

fn seconds_to_duration(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
}

/// Number of cameras the SDK currently sees.
pub fn num_connected_cameras<D: Driver>(driver: &mut D) -> i32 {
    driver.num_connected_cameras()
}

/// Capabilities of the camera at `index` among the connected ones.
///
/// The index is checked against the connected count before the SDK is asked.
pub fn camera_property<D: Driver>(driver: &mut D, index: i32) -> AsiResult<CameraInfo> {
    let count = driver.num_connected_cameras();
    if count < 1 {
        log::warn!("No ASI cameras found");
        return Err(AsiError::NoCameras);
    }
    if index < 0 || index >= count {
        log::warn!("Requested camera index {index}, but only {count} cameras found");
        return Err(AsiError::CameraIndexOutOfRange { index, count });
    }
    let mut raw = ASI_CAMERA_INFO::default();
    check("ASIGetCameraProperty", driver.camera_property(&mut raw, index))?;
    CameraInfo::decode(&raw)
}

/// Capabilities of every connected camera, by index. Empty when none are attached.
pub fn list_cameras<D: Driver>(driver: &mut D) -> AsiResult<Vec<CameraInfo>> {
    let count = driver.num_connected_cameras();
    (0..count.max(0))
        .map(|index| {
            let mut raw = ASI_CAMERA_INFO::default();
            check("ASIGetCameraProperty", driver.camera_property(&mut raw, index))?;
            CameraInfo::decode(&raw)
        })
        .collect()
}

/// An opened and initialised camera.
///
/// Closed when dropped; use [`Camera::close`] to observe the result.
pub struct Camera<D: Driver> {
    driver: D,
    info: CameraInfo,
    roi: RoiFormat,
    video_timeout: Duration,
    /// Last exposure time written or read, for video frame waits.
    exposure: Duration,
    scratch: Vec<u8>,
    video_active: bool,
    closed: bool,
}

impl<D: Driver> fmt::Debug for Camera<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Camera")
            .field("info", &self.info)
            .field("roi", &self.roi)
            .field("video_active", &self.video_active)
            .field("closed", &self.closed)
            .finish()
    }
}

impl<D: Driver> Camera<D> {
    /// Open the camera selected by `config`, initialise it and apply the
    /// configured region of interest.
    pub fn open(mut driver: D, config: &CameraConfig) -> AsiResult<Self> {
        config.validate()?;
        let info = camera_property(&mut driver, config.camera_index)?;
        let id = info.camera_id;

        check("ASIOpenCamera", driver.open_camera(id))?;
        if let Err(e) = check("ASIInitCamera", driver.init_camera(id)) {
            let _ = check("ASICloseCamera", driver.close_camera(id));
            return Err(e);
        }
        log::info!("Opened camera {info}");

        let full = RoiFormat {
            width: info.max_width,
            height: info.max_height,
            bin: 1,
            image_type: config.image_type,
        };
        let mut camera = Camera {
            driver,
            info,
            roi: full,
            video_timeout: config.video_timeout(),
            exposure: Duration::ZERO,
            scratch: Vec::new(),
            video_active: false,
            closed: false,
        };
        // From here on a failure drops `camera`, which closes it.
        camera.roi_format()?;
        let roi = config.roi(&camera.info)?;
        camera.set_roi_format(roi)?;
        camera.control_value(ControlType::Exposure)?;
        Ok(camera)
    }

    pub fn info(&self) -> &CameraInfo {
        &self.info
    }

    pub fn camera_id(&self) -> i32 {
        self.info.camera_id
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// The region of interest as last set or read.
    pub fn roi(&self) -> RoiFormat {
        self.roi
    }

    pub fn is_video_active(&self) -> bool {
        self.video_active
    }

    /// Capabilities of another connected camera, by index.
    pub fn camera_property(&mut self, index: i32) -> AsiResult<CameraInfo> {
        camera_property(&mut self.driver, index)
    }

    /// Every control the camera reports, in the order the SDK lists them.
    ///
    /// Controls whose type is unknown to this crate are skipped.
    pub fn control_caps(&mut self) -> AsiResult<Vec<ControlCaps>> {
        let id = self.info.camera_id;
        let mut count = 0;
        check("ASIGetNumOfControls", self.driver.num_of_controls(id, &mut count))?;

        let mut controls = Vec::with_capacity(count.max(0) as usize);
        for index in 0..count {
            let mut raw = ASI_CONTROL_CAPS::default();
            check("ASIGetControlCaps", self.driver.control_caps(id, index, &mut raw))?;
            match ControlCaps::decode(&raw) {
                Ok(caps) => controls.push(caps),
                Err(AsiError::UnsupportedControl(control_type)) => {
                    log::debug!("Skipping unknown control type {control_type}");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(controls)
    }

    /// Current value of `control` and whether it is under automatic control.
    pub fn control_value(&mut self, control: ControlType) -> AsiResult<(ControlValue, bool)> {
        let mut raw: c_long = 0;
        let mut auto = 0;
        check(
            "ASIGetControlValue",
            self.driver
                .get_control_value(self.info.camera_id, control.as_raw(), &mut raw, &mut auto),
        )?;
        let value = codec::decode(i64::from(raw), control)?;
        self.remember_exposure(control, &value);
        Ok((value, auto != 0))
    }

    /// Write `value` to `control`, with automatic control on or off.
    ///
    /// Quantities may be in any unit of the control's dimension, e.g.
    /// milliseconds for `Exposure`.
    pub fn set_control_value(
        &mut self,
        control: ControlType,
        value: impl Into<ControlValue>,
        auto: bool,
    ) -> AsiResult<()> {
        let value = value.into();
        let raw = codec::encode(&value, control)?;
        let raw = c_long::try_from(raw)
            .map_err(|_| AsiError::validation(format!("{value} is out of range for {control}")))?;
        log::debug!("Setting {control} to {value} (raw {raw}, auto {auto})");
        check(
            "ASISetControlValue",
            self.driver
                .set_control_value(self.info.camera_id, control.as_raw(), raw, i32::from(auto)),
        )?;
        self.remember_exposure(control, &value);
        Ok(())
    }

    fn remember_exposure(&mut self, control: ControlType, value: &ControlValue) {
        if control != ControlType::Exposure {
            return;
        }
        if let Some(seconds) = value.as_quantity().and_then(|q| q.value_in(Unit::Second).ok()) {
            self.exposure = seconds_to_duration(seconds);
        }
    }

    /// Change the region of interest. Rejected locally when the camera does
    /// not support the binning or format, the frame exceeds the sensor, or
    /// the geometry is not aligned.
    pub fn set_roi_format(&mut self, roi: RoiFormat) -> AsiResult<()> {
        if !self.info.supports_format(roi.image_type) {
            return Err(AsiError::validation(format!(
                "{} does not support {} (supported: {:?})",
                self.info.name, roi.image_type, self.info.supported_video_formats
            )));
        }
        let (max_width, max_height) = self.info.max_roi(roi.bin)?;
        if roi.width == 0 || roi.height == 0 || roi.width > max_width || roi.height > max_height {
            return Err(AsiError::validation(format!(
                "ROI {}x{} outside 1..={max_width} x 1..={max_height} at bin {}",
                roi.width, roi.height, roi.bin
            )));
        }
        if !roi.is_aligned() {
            return Err(AsiError::validation(format!(
                "ROI {}x{} must have a width divisible by {} and a height divisible by {}",
                roi.width,
                roi.height,
                RoiFormat::WIDTH_ALIGN,
                RoiFormat::HEIGHT_ALIGN
            )));
        }
        check(
            "ASISetROIFormat",
            self.driver.set_roi_format(
                self.info.camera_id,
                to_i32("width", roi.width)?,
                to_i32("height", roi.height)?,
                to_i32("bin", roi.bin)?,
                roi.image_type.as_raw(),
            ),
        )?;
        log::debug!("ROI set to {roi}");
        self.roi = roi;
        Ok(())
    }

    /// Read the region of interest back from the camera.
    pub fn roi_format(&mut self) -> AsiResult<RoiFormat> {
        let (mut width, mut height, mut bin, mut image_type) = (0, 0, 0, 0);
        check(
            "ASIGetROIFormat",
            self.driver.get_roi_format(
                self.info.camera_id,
                &mut width,
                &mut height,
                &mut bin,
                &mut image_type,
            ),
        )?;
        let roi = RoiFormat {
            width: from_i32("Width", width)?,
            height: from_i32("Height", height)?,
            bin: from_i32("Bin", bin)?,
            image_type: ImageType::from_raw(image_type).ok_or(AsiError::Decode {
                field: "ImgType",
                value: i64::from(image_type),
            })?,
        };
        self.roi = roi;
        Ok(roi)
    }

    pub fn start_video_capture(&mut self) -> AsiResult<()> {
        check(
            "ASIStartVideoCapture",
            self.driver.start_video_capture(self.info.camera_id),
        )?;
        self.video_active = true;
        Ok(())
    }

    pub fn stop_video_capture(&mut self) -> AsiResult<()> {
        check(
            "ASIStopVideoCapture",
            self.driver.stop_video_capture(self.info.camera_id),
        )?;
        self.video_active = false;
        Ok(())
    }

    /// Wait used for a video frame when none is given: twice the exposure
    /// time plus the configured video timeout.
    pub fn default_frame_wait(&self) -> Duration {
        self.exposure * 2 + self.video_timeout
    }

    /// Next video frame in a newly allocated buffer.
    pub fn video_frame(&mut self, timeout: Option<Duration>) -> AsiResult<FrameBuffer> {
        let mut frame = FrameBuffer::new(self.roi.frame_spec()?);
        self.video_frame_into(&mut frame, timeout)?;
        Ok(frame)
    }

    /// Next video frame, written into `frame`, which must match the current ROI.
    pub fn video_frame_into(
        &mut self,
        frame: &mut FrameBuffer,
        timeout: Option<Duration>,
    ) -> AsiResult<()> {
        self.prepare_scratch(frame)?;
        let wait = timeout.unwrap_or_else(|| self.default_frame_wait());
        let wait_ms = i32::try_from(wait.as_millis()).unwrap_or(i32::MAX);
        check(
            "ASIGetVideoData",
            self.driver
                .get_video_data(self.info.camera_id, &mut self.scratch, wait_ms),
        )?;
        log::debug!("Read video frame {} ({wait_ms} ms wait)", self.roi);
        frame.fill_from_bytes(&self.scratch)
    }

    fn prepare_scratch(&mut self, frame: &FrameBuffer) -> AsiResult<()> {
        let spec = self.roi.frame_spec()?;
        if *frame.spec() != spec {
            return Err(AsiError::validation(format!(
                "frame buffer {:?} does not match current ROI {}",
                frame.spec(),
                self.roi
            )));
        }
        self.scratch.resize(spec.byte_len(), 0);
        Ok(())
    }

    /// Start a single exposure. `dark` keeps the shutter closed on cameras
    /// that have one.
    pub fn start_exposure(&mut self, dark: bool) -> AsiResult<()> {
        check(
            "ASIStartExposure",
            self.driver
                .start_exposure(self.info.camera_id, i32::from(dark)),
        )
    }

    pub fn stop_exposure(&mut self) -> AsiResult<()> {
        check("ASIStopExposure", self.driver.stop_exposure(self.info.camera_id))
    }

    pub fn exposure_status(&mut self) -> AsiResult<ExposureStatus> {
        let mut status = 0;
        check(
            "ASIGetExpStatus",
            self.driver.exposure_status(self.info.camera_id, &mut status),
        )?;
        ExposureStatus::from_raw(status).ok_or(AsiError::Decode {
            field: "ExpStatus",
            value: i64::from(status),
        })
    }

    /// Image of the finished exposure.
    pub fn exposure_frame(&mut self) -> AsiResult<FrameBuffer> {
        let mut frame = FrameBuffer::new(self.roi.frame_spec()?);
        self.prepare_scratch(&frame)?;
        check(
            "ASIGetDataAfterExp",
            self.driver
                .get_data_after_exp(self.info.camera_id, &mut self.scratch),
        )?;
        log::debug!("Read exposure frame {}", self.roi);
        frame.fill_from_bytes(&self.scratch)?;
        Ok(frame)
    }

    /// Start (`on`) or stop an ST4 guide pulse.
    pub fn pulse_guide(&mut self, direction: GuideDirection, on: bool) -> AsiResult<()> {
        let id = self.info.camera_id;
        if on {
            check("ASIPulseGuideOn", self.driver.pulse_guide_on(id, direction.as_raw()))
        } else {
            check("ASIPulseGuideOff", self.driver.pulse_guide_off(id, direction.as_raw()))
        }
    }

    /// User-writable identifier stored in the camera's flash.
    pub fn custom_id(&mut self) -> AsiResult<String> {
        let mut raw = ASI_ID::default();
        check("ASIGetID", self.driver.get_id(self.info.camera_id, &mut raw))?;
        let end = raw.id.iter().position(|&b| b == 0).unwrap_or(raw.id.len());
        std::str::from_utf8(&raw.id[..end])
            .map(|s| s.trim().to_string())
            .map_err(|_| AsiError::DecodeText { field: "ID" })
    }

    /// Store up to eight bytes of text as the camera's identifier.
    pub fn set_custom_id(&mut self, id: &str) -> AsiResult<()> {
        let mut raw = ASI_ID::default();
        if id.len() > raw.id.len() {
            return Err(AsiError::validation(format!(
                "camera ID {id:?} is longer than {} bytes",
                raw.id.len()
            )));
        }
        raw.id[..id.len()].copy_from_slice(id.as_bytes());
        check("ASISetID", self.driver.set_id(self.info.camera_id, raw))
    }

    /// Trigger modes the camera accepts, in SDK order.
    pub fn supported_modes(&mut self) -> AsiResult<Vec<CameraMode>> {
        let mut raw = ASI_SUPPORTED_MODE::default();
        check(
            "ASIGetCameraSupportMode",
            self.driver.camera_support_mode(self.info.camera_id, &mut raw),
        )?;
        device_info::decode_camera_modes(&raw)
    }

    pub fn camera_mode(&mut self) -> AsiResult<CameraMode> {
        let mut mode = 0;
        check(
            "ASIGetCameraMode",
            self.driver.get_camera_mode(self.info.camera_id, &mut mode),
        )?;
        CameraMode::from_raw(mode).ok_or(AsiError::Decode {
            field: "CameraMode",
            value: i64::from(mode),
        })
    }

    pub fn set_camera_mode(&mut self, mode: CameraMode) -> AsiResult<()> {
        log::debug!("Setting camera mode {mode:?}");
        check(
            "ASISetCameraMode",
            self.driver.set_camera_mode(self.info.camera_id, mode.as_raw()),
        )
    }

    pub fn send_soft_trigger(&mut self, start: bool) -> AsiResult<()> {
        check(
            "ASISendSoftTrigger",
            self.driver
                .send_soft_trigger(self.info.camera_id, i32::from(start)),
        )
    }

    /// Configure a trigger output pin: level while active, delay after the
    /// trigger and pulse length.
    pub fn set_trigger_output(
        &mut self,
        pin: TrigOutput,
        pin_high: bool,
        delay: Duration,
        duration: Duration,
    ) -> AsiResult<()> {
        let delay = micros("trigger delay", delay)?;
        let duration = micros("trigger duration", duration)?;
        check(
            "ASISetTriggerOutputIOConf",
            self.driver.set_trigger_output_io_conf(
                self.info.camera_id,
                pin.as_raw(),
                i32::from(pin_high),
                delay,
                duration,
            ),
        )
    }

    /// Stop any video capture and close the camera.
    pub fn close(mut self) -> AsiResult<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> AsiResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let id = self.info.camera_id;
        let stopped = if self.video_active {
            self.video_active = false;
            check("ASIStopVideoCapture", self.driver.stop_video_capture(id))
        } else {
            Ok(())
        };
        check("ASICloseCamera", self.driver.close_camera(id))?;
        log::info!("Closed camera {}", self.info.name);
        stopped
    }
}

impl<D: Driver> Drop for Camera<D> {
    fn drop(&mut self) {
        // Failures were already logged by `check`.
        let _ = self.shutdown();
    }
}
