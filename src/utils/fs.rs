use crate::error::{DlError, Result};
use std::path::Path;

pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => DlError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => DlError::from(e),
        })?;
    }
    Ok(())
}

/// Size of whatever sits at `path`, or `None` if nothing readable does.
pub fn existing_size(path: &Path) -> Option<u64> {
    std::fs::metadata(path).ok().map(|m| m.len())
}

pub fn create_file(path: &Path) -> Result<std::fs::File> {
    std::fs::File::create(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => DlError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => DlError::from(e),
    })
}
