//! dlutils
//!
//! Fetches a single file from a direct URL or from Google Drive, writes it to
//! disk with a live progress line, and optionally unpacks it as tar.gz, gzip
//! or zip.

pub mod core;
pub mod error;
pub mod utils;

pub use crate::core::download::{download_from_url, Downloader, Transfer};
pub use crate::core::gdrive::download_from_google_drive;
pub use crate::core::options::DownloadOptions;
pub use crate::error::{DlError, Result};
