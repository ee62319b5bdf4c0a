use std::path::{Path, PathBuf};

/// Where a download lands and what happens to it afterwards.
///
/// The three extraction flags are independent: each one that is set runs,
/// in the order tar.gz, gzip, zip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    pub directory: PathBuf,
    pub file_name: Option<String>,
    pub extract_targz: bool,
    pub extract_gz: bool,
    pub extract_zip: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        DownloadOptions {
            directory: PathBuf::from("."),
            file_name: None,
            extract_targz: false,
            extract_gz: false,
            extract_zip: false,
        }
    }
}

impl DownloadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directory<P: AsRef<Path>>(mut self, directory: P) -> Self {
        self.directory = directory.as_ref().to_path_buf();
        self
    }

    pub fn file_name<S: Into<String>>(mut self, file_name: S) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn extract_targz(mut self, enabled: bool) -> Self {
        self.extract_targz = enabled;
        self
    }

    pub fn extract_gz(mut self, enabled: bool) -> Self {
        self.extract_gz = enabled;
        self
    }

    pub fn extract_zip(mut self, enabled: bool) -> Self {
        self.extract_zip = enabled;
        self
    }

    pub fn wants_extraction(&self) -> bool {
        self.extract_targz || self.extract_gz || self.extract_zip
    }
}
