pub mod download;
pub mod extract;
pub mod filename;
pub mod gdrive;
pub mod options;
pub mod progress;
