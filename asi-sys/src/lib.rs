//! Raw declarations for the ZWO ASI camera SDK (`ASICamera2.h`).
//!
//! Record layouts and constants are always available so that the safe crate can
//! decode them without linking. The function declarations require the `native`
//! feature, which also makes the build script link `libASICamera2`.

#![allow(non_camel_case_types, non_snake_case)]

use std::os::raw::{c_char, c_float, c_int, c_long, c_uchar};

/// `ASI_ERROR_CODE`; the SDK returns it as a plain `int`.
pub type ASI_ERROR_CODE = c_int;
/// `ASI_BOOL`: `ASI_FALSE = 0`, `ASI_TRUE = 1`.
pub type ASI_BOOL = c_int;
/// `ASI_CONTROL_TYPE`.
pub type ASI_CONTROL_TYPE = c_int;
/// `ASI_IMG_TYPE`.
pub type ASI_IMG_TYPE = c_int;
/// `ASI_EXPOSURE_STATUS`.
pub type ASI_EXPOSURE_STATUS = c_int;
/// `ASI_GUIDE_DIRECTION`.
pub type ASI_GUIDE_DIRECTION = c_int;
/// `ASI_CAMERA_MODE`.
pub type ASI_CAMERA_MODE = c_int;
/// `ASI_TRIG_OUTPUT_PIN`.
pub type ASI_TRIG_OUTPUT_PIN = c_int;

pub const ASI_FALSE: ASI_BOOL = 0;
pub const ASI_TRUE: ASI_BOOL = 1;

pub const ASI_SUCCESS: ASI_ERROR_CODE = 0;
/// One past the last defined error code. Not a code the SDK returns.
pub const ASI_ERROR_END: ASI_ERROR_CODE = 18;

/// Terminator of `SupportedVideoFormat`.
pub const ASI_IMG_END: ASI_IMG_TYPE = -1;
/// Terminator of `ASI_SUPPORTED_MODE::SupportedCameraMode`.
pub const ASI_MODE_END: c_int = -1;

/// Exclusive upper bound of `CameraID`.
pub const ASI_ID_MAX: c_int = 128;

pub const ASI_NAME_LEN: usize = 64;
pub const ASI_DESCRIPTION_LEN: usize = 128;
pub const ASI_BIN_SLOTS: usize = 16;
pub const ASI_FORMAT_SLOTS: usize = 8;
pub const ASI_MODE_SLOTS: usize = 16;

/// `_ASI_CAMERA_INFO`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ASI_CAMERA_INFO {
    pub Name: [c_char; ASI_NAME_LEN],
    pub CameraID: c_int,
    pub MaxHeight: c_long,
    pub MaxWidth: c_long,
    pub IsColorCam: ASI_BOOL,
    pub BayerPattern: c_int,
    /// e.g. `1, 2, 4, 8, 0, ...` means 1x, 2x, 4x and 8x binning.
    pub SupportedBins: [c_int; ASI_BIN_SLOTS],
    /// Terminated by [`ASI_IMG_END`].
    pub SupportedVideoFormat: [ASI_IMG_TYPE; ASI_FORMAT_SLOTS],
    /// Microns.
    pub PixelSize: f64,
    pub MechanicalShutter: ASI_BOOL,
    pub ST4Port: ASI_BOOL,
    pub IsCoolerCam: ASI_BOOL,
    pub IsUSB3Host: ASI_BOOL,
    pub IsUSB3Camera: ASI_BOOL,
    pub ElecPerADU: c_float,
    pub BitDepth: c_int,
    pub IsTriggerCam: ASI_BOOL,
    pub Unused: [c_char; 16],
}

impl Default for ASI_CAMERA_INFO {
    fn default() -> Self {
        ASI_CAMERA_INFO {
            Name: [0; ASI_NAME_LEN],
            CameraID: 0,
            MaxHeight: 0,
            MaxWidth: 0,
            IsColorCam: ASI_FALSE,
            BayerPattern: 0,
            SupportedBins: [0; ASI_BIN_SLOTS],
            SupportedVideoFormat: [ASI_IMG_END; ASI_FORMAT_SLOTS],
            PixelSize: 0.0,
            MechanicalShutter: ASI_FALSE,
            ST4Port: ASI_FALSE,
            IsCoolerCam: ASI_FALSE,
            IsUSB3Host: ASI_FALSE,
            IsUSB3Camera: ASI_FALSE,
            ElecPerADU: 0.0,
            BitDepth: 0,
            IsTriggerCam: ASI_FALSE,
            Unused: [0; 16],
        }
    }
}

/// `_ASI_CONTROL_CAPS`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ASI_CONTROL_CAPS {
    pub Name: [c_char; ASI_NAME_LEN],
    pub Description: [c_char; ASI_DESCRIPTION_LEN],
    pub MaxValue: c_long,
    pub MinValue: c_long,
    pub DefaultValue: c_long,
    pub IsAutoSupported: ASI_BOOL,
    /// Some controls are read only, e.g. temperature.
    pub IsWritable: ASI_BOOL,
    pub ControlType: ASI_CONTROL_TYPE,
    pub Unused: [c_char; 32],
}

impl Default for ASI_CONTROL_CAPS {
    fn default() -> Self {
        ASI_CONTROL_CAPS {
            Name: [0; ASI_NAME_LEN],
            Description: [0; ASI_DESCRIPTION_LEN],
            MaxValue: 0,
            MinValue: 0,
            DefaultValue: 0,
            IsAutoSupported: ASI_FALSE,
            IsWritable: ASI_FALSE,
            ControlType: 0,
            Unused: [0; 32],
        }
    }
}

/// `_ASI_ID`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ASI_ID {
    pub id: [c_uchar; 8],
}

/// `_ASI_SUPPORTED_MODE`, terminated by [`ASI_MODE_END`].
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ASI_SUPPORTED_MODE {
    pub SupportedCameraMode: [c_int; ASI_MODE_SLOTS],
}

impl Default for ASI_SUPPORTED_MODE {
    fn default() -> Self {
        ASI_SUPPORTED_MODE {
            SupportedCameraMode: [ASI_MODE_END; ASI_MODE_SLOTS],
        }
    }
}

#[cfg(feature = "native")]
unsafe extern "C" {
    pub fn ASIGetNumOfConnectedCameras() -> c_int;
    pub fn ASIGetCameraProperty(
        pASICameraInfo: *mut ASI_CAMERA_INFO,
        iCameraIndex: c_int,
    ) -> ASI_ERROR_CODE;
    pub fn ASIOpenCamera(iCameraID: c_int) -> ASI_ERROR_CODE;
    pub fn ASIInitCamera(iCameraID: c_int) -> ASI_ERROR_CODE;
    pub fn ASICloseCamera(iCameraID: c_int) -> ASI_ERROR_CODE;
    pub fn ASIGetNumOfControls(iCameraID: c_int, piNumberOfControls: *mut c_int)
        -> ASI_ERROR_CODE;
    pub fn ASIGetControlCaps(
        iCameraID: c_int,
        iControlIndex: c_int,
        pControlCaps: *mut ASI_CONTROL_CAPS,
    ) -> ASI_ERROR_CODE;
    pub fn ASIGetControlValue(
        iCameraID: c_int,
        ControlType: ASI_CONTROL_TYPE,
        plValue: *mut c_long,
        pbAuto: *mut ASI_BOOL,
    ) -> ASI_ERROR_CODE;
    pub fn ASISetControlValue(
        iCameraID: c_int,
        ControlType: ASI_CONTROL_TYPE,
        lValue: c_long,
        bAuto: ASI_BOOL,
    ) -> ASI_ERROR_CODE;
    pub fn ASISetROIFormat(
        iCameraID: c_int,
        iWidth: c_int,
        iHeight: c_int,
        iBin: c_int,
        Img_type: ASI_IMG_TYPE,
    ) -> ASI_ERROR_CODE;
    pub fn ASIGetROIFormat(
        iCameraID: c_int,
        piWidth: *mut c_int,
        piHeight: *mut c_int,
        piBin: *mut c_int,
        pImg_type: *mut ASI_IMG_TYPE,
    ) -> ASI_ERROR_CODE;
    pub fn ASIStartVideoCapture(iCameraID: c_int) -> ASI_ERROR_CODE;
    pub fn ASIStopVideoCapture(iCameraID: c_int) -> ASI_ERROR_CODE;
    pub fn ASIGetVideoData(
        iCameraID: c_int,
        pBuffer: *mut c_uchar,
        lBuffSize: c_long,
        iWaitms: c_int,
    ) -> ASI_ERROR_CODE;
    pub fn ASIStartExposure(iCameraID: c_int, bIsDark: ASI_BOOL) -> ASI_ERROR_CODE;
    pub fn ASIStopExposure(iCameraID: c_int) -> ASI_ERROR_CODE;
    pub fn ASIGetExpStatus(iCameraID: c_int, pExpStatus: *mut ASI_EXPOSURE_STATUS)
        -> ASI_ERROR_CODE;
    pub fn ASIGetDataAfterExp(
        iCameraID: c_int,
        pBuffer: *mut c_uchar,
        lBuffSize: c_long,
    ) -> ASI_ERROR_CODE;
    pub fn ASIPulseGuideOn(iCameraID: c_int, direction: ASI_GUIDE_DIRECTION) -> ASI_ERROR_CODE;
    pub fn ASIPulseGuideOff(iCameraID: c_int, direction: ASI_GUIDE_DIRECTION) -> ASI_ERROR_CODE;
    pub fn ASIGetID(iCameraID: c_int, pID: *mut ASI_ID) -> ASI_ERROR_CODE;
    pub fn ASISetID(iCameraID: c_int, ID: ASI_ID) -> ASI_ERROR_CODE;
    pub fn ASIGetCameraSupportMode(
        iCameraID: c_int,
        pSupportedMode: *mut ASI_SUPPORTED_MODE,
    ) -> ASI_ERROR_CODE;
    pub fn ASIGetCameraMode(iCameraID: c_int, mode: *mut ASI_CAMERA_MODE) -> ASI_ERROR_CODE;
    pub fn ASISetCameraMode(iCameraID: c_int, mode: ASI_CAMERA_MODE) -> ASI_ERROR_CODE;
    pub fn ASISendSoftTrigger(iCameraID: c_int, bStart: ASI_BOOL) -> ASI_ERROR_CODE;
    pub fn ASISetTriggerOutputIOConf(
        iCameraID: c_int,
        pin: ASI_TRIG_OUTPUT_PIN,
        bPinHigh: ASI_BOOL,
        lDelay: c_long,
        lDuration: c_long,
    ) -> ASI_ERROR_CODE;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_records_are_terminated() {
        let info = ASI_CAMERA_INFO::default();
        assert!(info.SupportedBins.iter().all(|&b| b == 0));
        assert!(info.SupportedVideoFormat.iter().all(|&f| f == ASI_IMG_END));

        let modes = ASI_SUPPORTED_MODE::default();
        assert_eq!(modes.SupportedCameraMode[0], ASI_MODE_END);
    }

    #[test]
    fn test_control_caps_layout_matches_header() {
        // 64 + 128 name/description bytes precede the first c_long.
        let caps = ASI_CONTROL_CAPS::default();
        let base = &caps as *const _ as usize;
        let max = &caps.MaxValue as *const _ as usize;
        assert_eq!(max - base, ASI_NAME_LEN + ASI_DESCRIPTION_LEN);
    }
}
