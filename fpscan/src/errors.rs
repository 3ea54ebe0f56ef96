use failure::Fail;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Fail)]
pub enum ScanError {
    #[fail(display = "No fingerprint readers detected. Connect a fingerprint scanner and try again.")]
    NoReaders,
    #[fail(display = "Reader [{}] not found ({} reader(s) detected)", index, count)]
    ReaderNotFound { index: usize, count: usize },
    #[fail(display = "{} failed. SDK result code: {:#x}", operation, code)]
    Sdk { operation: Operation, code: i32 },
    #[fail(display = "Not supported by this reader: {}", _0)]
    NotSupported(Operation),
    #[fail(display = "Backend unavailable: {}", _0)]
    BackendUnavailable(String),
    #[fail(display = "Reader backend error: {}", _0)]
    Backend(String),
    #[fail(
        display = "Invalid fingerprint image data ({}x{} image with {} bytes)",
        width, height, len
    )]
    InvalidImage { width: u32, height: u32, len: usize },
    #[fail(display = "Template is empty")]
    EmptyTemplate,
    #[fail(display = "Template text is not valid: {}", _0)]
    TemplateText(#[cause] hex::FromHexError),
    #[fail(display = "User name must not be blank")]
    InvalidName,
    #[fail(display = "Failed to encode image: {}", _0)]
    Image(#[cause] image::ImageError),
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] rusqlite::Error),
    #[fail(display = "{}", _0)]
    Io(#[cause] std::io::Error),
}

impl ScanError {
    /// Errors that only concern the current sample; another capture may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ScanError::Sdk { .. } | ScanError::InvalidImage { .. } | ScanError::EmptyTemplate
        )
    }
}

impl From<std::io::Error> for ScanError {
    fn from(error: std::io::Error) -> Self {
        ScanError::Io(error)
    }
}

impl From<rusqlite::Error> for ScanError {
    fn from(error: rusqlite::Error) -> Self {
        ScanError::Database(error)
    }
}

impl From<image::ImageError> for ScanError {
    fn from(error: image::ImageError) -> Self {
        ScanError::Image(error)
    }
}

impl From<hex::FromHexError> for ScanError {
    fn from(error: hex::FromHexError) -> Self {
        ScanError::TemplateText(error)
    }
}

/// SDK operation an error or capability refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Open,
    Capture,
    Extraction,
    Enrollment,
    Identification,
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let string = match self {
            Operation::Open => "opening reader",
            Operation::Capture => "capture",
            Operation::Extraction => "template extraction",
            Operation::Enrollment => "enrollment",
            Operation::Identification => "identification",
        };

        write!(f, "{}", string)
    }
}
