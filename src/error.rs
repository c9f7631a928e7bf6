//! Error handling for the ASI camera bindings

use std::fmt;

use thiserror::Error;

/// Result type for ASI camera operations
pub type AsiResult<T> = Result<T, AsiError>;

/// Outcome of a call into the vendor SDK, corresponding to `ASI_ERROR_CODE`.
///
/// The set is closed: [`ErrorCode::from_raw`] folds anything the SDK does not
/// define into [`ErrorCode::GeneralError`].
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Success = 0,
    /// No camera connected or index value out of boundary
    InvalidIndex = 1,
    InvalidId = 2,
    InvalidControlType = 3,
    /// Camera didn't open
    CameraClosed = 4,
    /// Failed to find the camera, maybe it was removed
    CameraRemoved = 5,
    /// Cannot find the path of the file
    InvalidPath = 6,
    InvalidFileFormat = 7,
    /// Wrong video format size
    InvalidSize = 8,
    /// Unsupported image format
    InvalidImageType = 9,
    /// The start position is out of boundary
    OutOfBoundary = 10,
    Timeout = 11,
    /// Stop capture first
    InvalidSequence = 12,
    BufferTooSmall = 13,
    VideoModeActive = 14,
    ExposureInProgress = 15,
    /// General error, e.g. value is out of valid range
    GeneralError = 16,
    /// The current mode is wrong
    InvalidMode = 17,
}

impl ErrorCode {
    pub fn from_raw(value: i32) -> Self {
        use ErrorCode::*;
        match value {
            0 => Success,
            1 => InvalidIndex,
            2 => InvalidId,
            3 => InvalidControlType,
            4 => CameraClosed,
            5 => CameraRemoved,
            6 => InvalidPath,
            7 => InvalidFileFormat,
            8 => InvalidSize,
            9 => InvalidImageType,
            10 => OutOfBoundary,
            11 => Timeout,
            12 => InvalidSequence,
            13 => BufferTooSmall,
            14 => VideoModeActive,
            15 => ExposureInProgress,
            16 => GeneralError,
            17 => InvalidMode,
            _ => GeneralError,
        }
    }

    pub fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ErrorCode::Success
    }

    /// SDK name of the code, without the `ASI_ERROR_` prefix.
    pub fn name(self) -> &'static str {
        use ErrorCode::*;
        match self {
            Success => "SUCCESS",
            InvalidIndex => "INVALID_INDEX",
            InvalidId => "INVALID_ID",
            InvalidControlType => "INVALID_CONTROL_TYPE",
            CameraClosed => "CAMERA_CLOSED",
            CameraRemoved => "CAMERA_REMOVED",
            InvalidPath => "INVALID_PATH",
            InvalidFileFormat => "INVALID_FILEFORMAT",
            InvalidSize => "INVALID_SIZE",
            InvalidImageType => "INVALID_IMGTYPE",
            OutOfBoundary => "OUTOF_BOUNDARY",
            Timeout => "TIMEOUT",
            InvalidSequence => "INVALID_SEQUENCE",
            BufferTooSmall => "BUFFER_TOO_SMALL",
            VideoModeActive => "VIDEO_MODE_ACTIVE",
            ExposureInProgress => "EXPOSURE_IN_PROGRESS",
            GeneralError => "GENERAL_ERROR",
            InvalidMode => "INVALID_MODE",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors that can occur when working with an ASI camera
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AsiError {
    /// An SDK call returned something other than `SUCCESS`
    #[error("Error calling {operation}: {code}")]
    Boundary {
        operation: &'static str,
        code: ErrorCode,
    },
    /// A record from the SDK held a value that does not decode
    #[error("Cannot decode {field}: unexpected value {value}")]
    Decode { field: &'static str, value: i64 },
    /// Text field of a record is not valid UTF-8
    #[error("Cannot decode {field}: not valid UTF-8")]
    DecodeText { field: &'static str },
    #[error("Unsupported control type: {0}")]
    UnsupportedControl(i32),
    #[error("Unsupported image type: {0}")]
    UnsupportedImageType(i32),
    /// Caller-supplied geometry, unit or value is invalid
    #[error("Invalid value: {0}")]
    Validation(String),
    #[error("No ASI cameras found")]
    NoCameras,
    #[error("Requested camera index {index}, but only {count} cameras found")]
    CameraIndexOutOfRange { index: i32, count: i32 },
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl AsiError {
    pub fn validation(message: impl Into<String>) -> Self {
        AsiError::Validation(message.into())
    }

    /// Resolved SDK code, for boundary failures.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            AsiError::Boundary { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Map the raw return of an SDK call named `operation` to a result.
pub fn check(operation: &'static str, raw: i32) -> AsiResult<()> {
    let code = ErrorCode::from_raw(raw);
    if code.is_success() {
        Ok(())
    } else {
        log::warn!("Error calling {operation}: {code}");
        Err(AsiError::Boundary { operation, code })
    }
}
