use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DlError>;

#[derive(Error, Debug)]
pub enum DlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Invalid Content-Length: '{value}'")]
    InvalidContentLength { value: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Extraction failed: {path}: {message}")]
    ExtractionError { path: PathBuf, message: String },
}

impl DlError {
    pub fn extraction_error<P: Into<PathBuf>, S: Into<String>>(path: P, message: S) -> Self {
        DlError::ExtractionError {
            path: path.into(),
            message: message.into(),
        }
    }
}
