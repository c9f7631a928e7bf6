//! Scripted [`Driver`] for testing sessions without hardware.

use std::cell::RefCell;
use std::collections::HashMap;
use std::os::raw::c_long;
use std::rc::Rc;

use asi_sys::{ASI_CAMERA_INFO, ASI_CONTROL_CAPS, ASI_ID, ASI_SUPPORTED_MODE};

use crate::control::ControlType;
use crate::device_info::tests::{sample_caps, sample_info};
use crate::driver::Driver;
use crate::error::ErrorCode;

const SUCCESS: i32 = 0;

/// In-memory camera. Every call is recorded in `calls`; a code placed in
/// `failures` under an SDK function name is returned by that function.
///
/// [`MockDriver::journal`] shares the call record, so it can still be read
/// after the driver has been moved into (and dropped with) a session.
pub struct MockDriver {
    pub cameras: Vec<ASI_CAMERA_INFO>,
    pub controls: Vec<ASI_CONTROL_CAPS>,
    pub values: HashMap<i32, (c_long, i32)>,
    /// width, height, bin, image type
    pub roi: (i32, i32, i32, i32),
    pub open: Vec<i32>,
    pub video_active: bool,
    pub exposure_status: i32,
    pub failures: HashMap<&'static str, ErrorCode>,
    pub calls: Vec<&'static str>,
    pub last_wait_ms: Option<i32>,
    pub guiding: Vec<i32>,
    pub id: ASI_ID,
    pub supported_modes: ASI_SUPPORTED_MODE,
    pub mode: i32,
    journal: Rc<RefCell<Vec<&'static str>>>,
    frame_counter: u8,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDriver {
    /// One color camera (id 3, 4144x2822) with exposure, temperature, gain,
    /// cooler and flip controls.
    pub fn new() -> Self {
        let mut values = HashMap::new();
        values.insert(ControlType::Exposure.as_raw(), (10_000, 0));
        values.insert(ControlType::Temperature.as_raw(), (215, 0));
        values.insert(ControlType::Gain.as_raw(), (120, 1));
        values.insert(ControlType::CoolerOn.as_raw(), (0, 0));
        values.insert(ControlType::Flip.as_raw(), (0, 0));

        let mut supported_modes = ASI_SUPPORTED_MODE::default();
        supported_modes.SupportedCameraMode[..3].copy_from_slice(&[0, 1, 2]);

        MockDriver {
            cameras: vec![sample_info()],
            controls: vec![
                sample_caps(ControlType::Gain, 0, 570, 200),
                sample_caps(ControlType::Exposure, 32, 2_000_000_000, 10_000),
                sample_caps(ControlType::Temperature, -500, 1000, 200),
                sample_caps(ControlType::CoolerOn, 0, 1, 0),
                sample_caps(ControlType::Flip, 0, 3, 0),
            ],
            values,
            roi: (4144, 2822, 1, 0),
            open: Vec::new(),
            video_active: false,
            exposure_status: 0,
            failures: HashMap::new(),
            calls: Vec::new(),
            last_wait_ms: None,
            guiding: Vec::new(),
            id: ASI_ID::default(),
            supported_modes,
            mode: 0,
            journal: Rc::default(),
            frame_counter: 0,
        }
    }

    pub fn with_cameras(mut self, cameras: Vec<ASI_CAMERA_INFO>) -> Self {
        self.cameras = cameras;
        self
    }

    pub fn failing(mut self, operation: &'static str, code: ErrorCode) -> Self {
        self.failures.insert(operation, code);
        self
    }

    pub fn journal(&self) -> Rc<RefCell<Vec<&'static str>>> {
        Rc::clone(&self.journal)
    }

    fn record(&mut self, operation: &'static str) {
        self.calls.push(operation);
        self.journal.borrow_mut().push(operation);
    }

    fn enter(&mut self, operation: &'static str) -> Option<i32> {
        self.record(operation);
        self.failures.get(operation).map(|code| code.as_raw())
    }

    fn frame_len(&self) -> usize {
        let (w, h, _, t) = self.roi;
        let bytes_per_pixel = match t {
            1 => 3,
            2 => 2,
            _ => 1,
        };
        (w * h) as usize * bytes_per_pixel
    }

    fn write_frame(&mut self, buffer: &mut [u8]) -> i32 {
        if buffer.len() < self.frame_len() {
            return ErrorCode::BufferTooSmall.as_raw();
        }
        self.frame_counter = self.frame_counter.wrapping_add(1);
        buffer.fill(self.frame_counter);
        SUCCESS
    }
}

impl Driver for MockDriver {
    fn num_connected_cameras(&mut self) -> i32 {
        self.record("ASIGetNumOfConnectedCameras");
        self.cameras.len() as i32
    }

    fn camera_property(&mut self, info: &mut ASI_CAMERA_INFO, index: i32) -> i32 {
        if let Some(code) = self.enter("ASIGetCameraProperty") {
            return code;
        }
        match usize::try_from(index).ok().and_then(|i| self.cameras.get(i)) {
            Some(camera) => {
                *info = *camera;
                SUCCESS
            }
            None => ErrorCode::InvalidIndex.as_raw(),
        }
    }

    fn open_camera(&mut self, camera_id: i32) -> i32 {
        if let Some(code) = self.enter("ASIOpenCamera") {
            return code;
        }
        self.open.push(camera_id);
        SUCCESS
    }

    fn init_camera(&mut self, camera_id: i32) -> i32 {
        if let Some(code) = self.enter("ASIInitCamera") {
            return code;
        }
        if self.open.contains(&camera_id) {
            SUCCESS
        } else {
            ErrorCode::CameraClosed.as_raw()
        }
    }

    fn close_camera(&mut self, camera_id: i32) -> i32 {
        if let Some(code) = self.enter("ASICloseCamera") {
            return code;
        }
        self.open.retain(|&id| id != camera_id);
        SUCCESS
    }

    fn num_of_controls(&mut self, _camera_id: i32, count: &mut i32) -> i32 {
        if let Some(code) = self.enter("ASIGetNumOfControls") {
            return code;
        }
        *count = self.controls.len() as i32;
        SUCCESS
    }

    fn control_caps(&mut self, _camera_id: i32, index: i32, caps: &mut ASI_CONTROL_CAPS) -> i32 {
        if let Some(code) = self.enter("ASIGetControlCaps") {
            return code;
        }
        match usize::try_from(index).ok().and_then(|i| self.controls.get(i)) {
            Some(c) => {
                *caps = *c;
                SUCCESS
            }
            None => ErrorCode::InvalidControlType.as_raw(),
        }
    }

    fn get_control_value(
        &mut self,
        _camera_id: i32,
        control_type: i32,
        value: &mut c_long,
        auto: &mut i32,
    ) -> i32 {
        if let Some(code) = self.enter("ASIGetControlValue") {
            return code;
        }
        match self.values.get(&control_type) {
            Some(&(v, a)) => {
                *value = v;
                *auto = a;
                SUCCESS
            }
            None => ErrorCode::InvalidControlType.as_raw(),
        }
    }

    fn set_control_value(
        &mut self,
        _camera_id: i32,
        control_type: i32,
        value: c_long,
        auto: i32,
    ) -> i32 {
        if let Some(code) = self.enter("ASISetControlValue") {
            return code;
        }
        self.values.insert(control_type, (value, auto));
        SUCCESS
    }

    fn set_roi_format(
        &mut self,
        _camera_id: i32,
        width: i32,
        height: i32,
        bin: i32,
        image_type: i32,
    ) -> i32 {
        if let Some(code) = self.enter("ASISetROIFormat") {
            return code;
        }
        if self.video_active {
            return ErrorCode::VideoModeActive.as_raw();
        }
        self.roi = (width, height, bin, image_type);
        SUCCESS
    }

    fn get_roi_format(
        &mut self,
        _camera_id: i32,
        width: &mut i32,
        height: &mut i32,
        bin: &mut i32,
        image_type: &mut i32,
    ) -> i32 {
        if let Some(code) = self.enter("ASIGetROIFormat") {
            return code;
        }
        (*width, *height, *bin, *image_type) = self.roi;
        SUCCESS
    }

    fn start_video_capture(&mut self, _camera_id: i32) -> i32 {
        if let Some(code) = self.enter("ASIStartVideoCapture") {
            return code;
        }
        self.video_active = true;
        SUCCESS
    }

    fn stop_video_capture(&mut self, _camera_id: i32) -> i32 {
        if let Some(code) = self.enter("ASIStopVideoCapture") {
            return code;
        }
        self.video_active = false;
        SUCCESS
    }

    fn get_video_data(&mut self, _camera_id: i32, buffer: &mut [u8], wait_ms: i32) -> i32 {
        if let Some(code) = self.enter("ASIGetVideoData") {
            return code;
        }
        self.last_wait_ms = Some(wait_ms);
        if !self.video_active {
            return ErrorCode::InvalidSequence.as_raw();
        }
        self.write_frame(buffer)
    }

    fn start_exposure(&mut self, _camera_id: i32, _is_dark: i32) -> i32 {
        if let Some(code) = self.enter("ASIStartExposure") {
            return code;
        }
        if self.video_active {
            return ErrorCode::VideoModeActive.as_raw();
        }
        // Snap exposures complete immediately.
        self.exposure_status = 2;
        SUCCESS
    }

    fn stop_exposure(&mut self, _camera_id: i32) -> i32 {
        if let Some(code) = self.enter("ASIStopExposure") {
            return code;
        }
        self.exposure_status = 0;
        SUCCESS
    }

    fn exposure_status(&mut self, _camera_id: i32, status: &mut i32) -> i32 {
        if let Some(code) = self.enter("ASIGetExpStatus") {
            return code;
        }
        *status = self.exposure_status;
        SUCCESS
    }

    fn get_data_after_exp(&mut self, _camera_id: i32, buffer: &mut [u8]) -> i32 {
        if let Some(code) = self.enter("ASIGetDataAfterExp") {
            return code;
        }
        if self.exposure_status != 2 {
            return ErrorCode::GeneralError.as_raw();
        }
        self.write_frame(buffer)
    }

    fn pulse_guide_on(&mut self, _camera_id: i32, direction: i32) -> i32 {
        if let Some(code) = self.enter("ASIPulseGuideOn") {
            return code;
        }
        self.guiding.push(direction);
        SUCCESS
    }

    fn pulse_guide_off(&mut self, _camera_id: i32, direction: i32) -> i32 {
        if let Some(code) = self.enter("ASIPulseGuideOff") {
            return code;
        }
        self.guiding.retain(|&d| d != direction);
        SUCCESS
    }

    fn get_id(&mut self, _camera_id: i32, id: &mut ASI_ID) -> i32 {
        if let Some(code) = self.enter("ASIGetID") {
            return code;
        }
        *id = self.id;
        SUCCESS
    }

    fn set_id(&mut self, _camera_id: i32, id: ASI_ID) -> i32 {
        if let Some(code) = self.enter("ASISetID") {
            return code;
        }
        self.id = id;
        SUCCESS
    }

    fn camera_support_mode(&mut self, _camera_id: i32, modes: &mut ASI_SUPPORTED_MODE) -> i32 {
        if let Some(code) = self.enter("ASIGetCameraSupportMode") {
            return code;
        }
        *modes = self.supported_modes;
        SUCCESS
    }

    fn get_camera_mode(&mut self, _camera_id: i32, mode: &mut i32) -> i32 {
        if let Some(code) = self.enter("ASIGetCameraMode") {
            return code;
        }
        *mode = self.mode;
        SUCCESS
    }

    fn set_camera_mode(&mut self, _camera_id: i32, mode: i32) -> i32 {
        if let Some(code) = self.enter("ASISetCameraMode") {
            return code;
        }
        self.mode = mode;
        SUCCESS
    }

    fn send_soft_trigger(&mut self, _camera_id: i32, _start: i32) -> i32 {
        self.enter("ASISendSoftTrigger").unwrap_or(SUCCESS)
    }

    fn set_trigger_output_io_conf(
        &mut self,
        _camera_id: i32,
        _pin: i32,
        _pin_high: i32,
        _delay: c_long,
        _duration: c_long,
    ) -> i32 {
        self.enter("ASISetTriggerOutputIOConf").unwrap_or(SUCCESS)
    }
}
