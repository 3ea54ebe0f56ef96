use failure::Fail;

#[derive(Debug, Fail)]
pub enum FPrintError {
    #[fail(display = "Fail on init. FPrint error code: {}", _0)]
    InitError(i32),
    #[fail(display = "Null ptr found: {}", _0)]
    NullPtr(NullPtrContext),
    #[fail(display = "Not supported: {}", _0)]
    NotSupported(NotSupportContext),
    #[fail(
        display = "Error not covered by the libfprint documentation. Error code: {}",
        _0
    )]
    Other(i32),
    #[fail(
        display = "The enrollment process has been aborted by an internal or I/O error. Code: {}",
        _0
    )]
    UnexpectedAbort(i32),
    #[fail(display = "Identify failed. Error code: {}", _0)]
    IdentifyFailed(i32),
    #[fail(display = "Can not convert stored print into unified representation")]
    ConvertationFailed,
    #[fail(display = "Buffer does not contain a valid stored print")]
    InvalidPrintData,
    #[fail(display = "Can not convert from `{}`", _0)]
    TryFromError(u32),
}

#[derive(Debug, Fail)]
pub enum NullPtrContext {
    #[fail(display = "on discovering devices")]
    Discovering,
    #[fail(display = "on opening device")]
    OpenDevice,
    #[fail(display = "on capturing image")]
    CaptureImage,
    #[fail(display = "on completing enrollment")]
    EnrollPrint,
}

#[derive(Debug, Fail)]
pub enum NotSupportContext {
    #[fail(
        display = "either the unconditional flag was set but the device does not support this, or the device does not support imaging"
    )]
    CapturingImage,
    #[fail(display = "device not support identification")]
    Identify,
}
