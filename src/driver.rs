//! The call boundary to the vendor SDK.
//!
//! [`Driver`] mirrors the C calling convention one to one: primitive integers
//! and `asi-sys` records go in, the raw `ASI_ERROR_CODE` comes back. All
//! interpretation happens above this trait, so a session can run against the
//! real library ([`NativeDriver`], `native` feature) or a scripted stand-in.

use std::os::raw::c_long;

use asi_sys::{ASI_CAMERA_INFO, ASI_CONTROL_CAPS, ASI_ID, ASI_SUPPORTED_MODE};

pub trait Driver {
    /// Number of attached cameras. Not an error code.
    fn num_connected_cameras(&mut self) -> i32;
    fn camera_property(&mut self, info: &mut ASI_CAMERA_INFO, index: i32) -> i32;
    fn open_camera(&mut self, camera_id: i32) -> i32;
    fn init_camera(&mut self, camera_id: i32) -> i32;
    fn close_camera(&mut self, camera_id: i32) -> i32;

    fn num_of_controls(&mut self, camera_id: i32, count: &mut i32) -> i32;
    fn control_caps(&mut self, camera_id: i32, index: i32, caps: &mut ASI_CONTROL_CAPS) -> i32;
    fn get_control_value(
        &mut self,
        camera_id: i32,
        control_type: i32,
        value: &mut c_long,
        auto: &mut i32,
    ) -> i32;
    fn set_control_value(
        &mut self,
        camera_id: i32,
        control_type: i32,
        value: c_long,
        auto: i32,
    ) -> i32;

    fn set_roi_format(
        &mut self,
        camera_id: i32,
        width: i32,
        height: i32,
        bin: i32,
        image_type: i32,
    ) -> i32;
    fn get_roi_format(
        &mut self,
        camera_id: i32,
        width: &mut i32,
        height: &mut i32,
        bin: &mut i32,
        image_type: &mut i32,
    ) -> i32;

    fn start_video_capture(&mut self, camera_id: i32) -> i32;
    fn stop_video_capture(&mut self, camera_id: i32) -> i32;
    fn get_video_data(&mut self, camera_id: i32, buffer: &mut [u8], wait_ms: i32) -> i32;

    fn start_exposure(&mut self, camera_id: i32, is_dark: i32) -> i32;
    fn stop_exposure(&mut self, camera_id: i32) -> i32;
    fn exposure_status(&mut self, camera_id: i32, status: &mut i32) -> i32;
    fn get_data_after_exp(&mut self, camera_id: i32, buffer: &mut [u8]) -> i32;

    fn pulse_guide_on(&mut self, camera_id: i32, direction: i32) -> i32;
    fn pulse_guide_off(&mut self, camera_id: i32, direction: i32) -> i32;

    fn get_id(&mut self, camera_id: i32, id: &mut ASI_ID) -> i32;
    fn set_id(&mut self, camera_id: i32, id: ASI_ID) -> i32;

    fn camera_support_mode(&mut self, camera_id: i32, modes: &mut ASI_SUPPORTED_MODE) -> i32;
    fn get_camera_mode(&mut self, camera_id: i32, mode: &mut i32) -> i32;
    fn set_camera_mode(&mut self, camera_id: i32, mode: i32) -> i32;
    fn send_soft_trigger(&mut self, camera_id: i32, start: i32) -> i32;
    fn set_trigger_output_io_conf(
        &mut self,
        camera_id: i32,
        pin: i32,
        pin_high: i32,
        delay: c_long,
        duration: c_long,
    ) -> i32;
}

#[cfg(feature = "native")]
pub use native::NativeDriver;

#[cfg(feature = "native")]
mod native {
    use std::os::raw::c_long;

    use asi_sys::*;

    use super::Driver;
    use crate::error::ErrorCode;

    /// Forwards every call to `libASICamera2`.
    ///
    /// The SDK keeps its own global state, so this carries none; give each
    /// [`Camera`](crate::Camera) its own value.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct NativeDriver;

    impl NativeDriver {
        pub fn new() -> Self {
            NativeDriver
        }
    }

    fn buffer_len(buffer: &[u8]) -> Option<c_long> {
        c_long::try_from(buffer.len()).ok()
    }

    impl Driver for NativeDriver {
        fn num_connected_cameras(&mut self) -> i32 {
            unsafe { ASIGetNumOfConnectedCameras() }
        }

        fn camera_property(&mut self, info: &mut ASI_CAMERA_INFO, index: i32) -> i32 {
            unsafe { ASIGetCameraProperty(info, index) }
        }

        fn open_camera(&mut self, camera_id: i32) -> i32 {
            unsafe { ASIOpenCamera(camera_id) }
        }

        fn init_camera(&mut self, camera_id: i32) -> i32 {
            unsafe { ASIInitCamera(camera_id) }
        }

        fn close_camera(&mut self, camera_id: i32) -> i32 {
            unsafe { ASICloseCamera(camera_id) }
        }

        fn num_of_controls(&mut self, camera_id: i32, count: &mut i32) -> i32 {
            unsafe { ASIGetNumOfControls(camera_id, count) }
        }

        fn control_caps(&mut self, camera_id: i32, index: i32, caps: &mut ASI_CONTROL_CAPS) -> i32 {
            unsafe { ASIGetControlCaps(camera_id, index, caps) }
        }

        fn get_control_value(
            &mut self,
            camera_id: i32,
            control_type: i32,
            value: &mut c_long,
            auto: &mut i32,
        ) -> i32 {
            unsafe { ASIGetControlValue(camera_id, control_type, value, auto) }
        }

        fn set_control_value(
            &mut self,
            camera_id: i32,
            control_type: i32,
            value: c_long,
            auto: i32,
        ) -> i32 {
            unsafe { ASISetControlValue(camera_id, control_type, value, auto) }
        }

        fn set_roi_format(
            &mut self,
            camera_id: i32,
            width: i32,
            height: i32,
            bin: i32,
            image_type: i32,
        ) -> i32 {
            unsafe { ASISetROIFormat(camera_id, width, height, bin, image_type) }
        }

        fn get_roi_format(
            &mut self,
            camera_id: i32,
            width: &mut i32,
            height: &mut i32,
            bin: &mut i32,
            image_type: &mut i32,
        ) -> i32 {
            unsafe { ASIGetROIFormat(camera_id, width, height, bin, image_type) }
        }

        fn start_video_capture(&mut self, camera_id: i32) -> i32 {
            unsafe { ASIStartVideoCapture(camera_id) }
        }

        fn stop_video_capture(&mut self, camera_id: i32) -> i32 {
            unsafe { ASIStopVideoCapture(camera_id) }
        }

        fn get_video_data(&mut self, camera_id: i32, buffer: &mut [u8], wait_ms: i32) -> i32 {
            let Some(len) = buffer_len(buffer) else {
                return ErrorCode::InvalidSize.as_raw();
            };
            unsafe { ASIGetVideoData(camera_id, buffer.as_mut_ptr(), len, wait_ms) }
        }

        fn start_exposure(&mut self, camera_id: i32, is_dark: i32) -> i32 {
            unsafe { ASIStartExposure(camera_id, is_dark) }
        }

        fn stop_exposure(&mut self, camera_id: i32) -> i32 {
            unsafe { ASIStopExposure(camera_id) }
        }

        fn exposure_status(&mut self, camera_id: i32, status: &mut i32) -> i32 {
            unsafe { ASIGetExpStatus(camera_id, status) }
        }

        fn get_data_after_exp(&mut self, camera_id: i32, buffer: &mut [u8]) -> i32 {
            let Some(len) = buffer_len(buffer) else {
                return ErrorCode::InvalidSize.as_raw();
            };
            unsafe { ASIGetDataAfterExp(camera_id, buffer.as_mut_ptr(), len) }
        }

        fn pulse_guide_on(&mut self, camera_id: i32, direction: i32) -> i32 {
            unsafe { ASIPulseGuideOn(camera_id, direction) }
        }

        fn pulse_guide_off(&mut self, camera_id: i32, direction: i32) -> i32 {
            unsafe { ASIPulseGuideOff(camera_id, direction) }
        }

        fn get_id(&mut self, camera_id: i32, id: &mut ASI_ID) -> i32 {
            unsafe { ASIGetID(camera_id, id) }
        }

        fn set_id(&mut self, camera_id: i32, id: ASI_ID) -> i32 {
            unsafe { ASISetID(camera_id, id) }
        }

        fn camera_support_mode(&mut self, camera_id: i32, modes: &mut ASI_SUPPORTED_MODE) -> i32 {
            unsafe { ASIGetCameraSupportMode(camera_id, modes) }
        }

        fn get_camera_mode(&mut self, camera_id: i32, mode: &mut i32) -> i32 {
            unsafe { ASIGetCameraMode(camera_id, mode) }
        }

        fn set_camera_mode(&mut self, camera_id: i32, mode: i32) -> i32 {
            unsafe { ASISetCameraMode(camera_id, mode) }
        }

        fn send_soft_trigger(&mut self, camera_id: i32, start: i32) -> i32 {
            unsafe { ASISendSoftTrigger(camera_id, start) }
        }

        fn set_trigger_output_io_conf(
            &mut self,
            camera_id: i32,
            pin: i32,
            pin_high: i32,
            delay: c_long,
            duration: c_long,
        ) -> i32 {
            unsafe { ASISetTriggerOutputIOConf(camera_id, pin, pin_high, delay, duration) }
        }
    }
}
