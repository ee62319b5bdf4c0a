use crate::core::options::DownloadOptions;
use crate::error::{DlError, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tar::Archive;
use zip::ZipArchive;

/// Runs every extraction the options ask for, in the order tar.gz, gzip, zip.
///
/// The flags are not mutually exclusive: setting several runs several
/// extractions over the same file.
pub fn extract_downloaded<W: Write>(
    archive_path: &Path,
    options: &DownloadOptions,
    out: &mut W,
) -> Result<()> {
    if options.extract_targz {
        writeln!(out, "Extracting...")?;
        extract_tar_gz(archive_path, &options.directory)?;
    }

    if options.extract_gz {
        writeln!(out, "Extracting...")?;
        extract_gz(archive_path)?;
    }

    if options.extract_zip {
        writeln!(out, "Extracting...")?;
        extract_zip(archive_path, &options.directory)?;
    }

    Ok(())
}

pub fn extract_tar_gz(archive_path: &Path, destination: &Path) -> Result<()> {
    log::debug!("Unpacking tar.gz {archive_path:?} into {destination:?}");
    let file = File::open(archive_path)?;
    let decoder = GzDecoder::new(file);
    let mut archive = Archive::new(decoder);
    archive.unpack(destination)?;
    Ok(())
}

/// Decompresses a plain gzip file next to itself and returns the output path.
pub fn extract_gz(archive_path: &Path) -> Result<PathBuf> {
    let output_path = gz_output_path(archive_path)?;
    log::debug!("Decompressing {archive_path:?} to {output_path:?}");

    let mut decoder = GzDecoder::new(File::open(archive_path)?);
    let mut output = File::create(&output_path)?;
    std::io::copy(&mut decoder, &mut output)?;
    Ok(output_path)
}

/// Sibling path named like the archive with the first `.gz` removed, wherever
/// it occurs in the name (`archive.gz.bak` becomes `archive.bak`).
pub fn gz_output_path(archive_path: &Path) -> Result<PathBuf> {
    let file_name = archive_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| DlError::extraction_error(archive_path, "invalid archive file name"))?;

    if !file_name.contains(".gz") {
        return Err(DlError::extraction_error(
            archive_path,
            "file name has no '.gz' to strip; output would overwrite the archive",
        ));
    }

    Ok(archive_path.with_file_name(file_name.replacen(".gz", "", 1)))
}

pub fn extract_zip(archive_path: &Path, destination: &Path) -> Result<()> {
    log::debug!("Unpacking zip {archive_path:?} into {destination:?}");
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let outpath = match entry.enclosed_name() {
            Some(path) => destination.join(path),
            None => {
                log::warn!("Skipping zip entry with unsafe path: {}", entry.name());
                continue;
            }
        };

        if entry.is_dir() {
            std::fs::create_dir_all(&outpath)?;
        } else {
            if let Some(p) = outpath.parent() {
                if !p.exists() {
                    std::fs::create_dir_all(p)?;
                }
            }
            let mut outfile = File::create(&outpath)?;
            std::io::copy(&mut entry, &mut outfile)?;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn gzip_bytes(payload: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(payload).unwrap();
        encoder.finish().unwrap()
    }

    fn write_tar_gz(path: &Path, entries: &[(&str, &[u8])]) {
        let encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let mut writer = ZipWriter::new(File::create(path).unwrap());
        for (name, data) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_gz_output_path_strips_first_occurrence() {
        let path = Path::new("/tmp/data/archive.gz.bak");
        assert_eq!(
            gz_output_path(path).unwrap(),
            PathBuf::from("/tmp/data/archive.bak")
        );
        assert_eq!(
            gz_output_path(Path::new("a.gz.gz")).unwrap(),
            PathBuf::from("a.gz")
        );
    }

    #[test]
    fn test_gz_output_path_only_touches_file_name() {
        let path = Path::new("/tmp/x.gz/file.txt.gz");
        assert_eq!(
            gz_output_path(path).unwrap(),
            PathBuf::from("/tmp/x.gz/file.txt")
        );
    }

    #[test]
    fn test_gz_output_path_rejects_names_without_gz() {
        let result = gz_output_path(Path::new("plain.bin"));
        assert!(matches!(result, Err(DlError::ExtractionError { .. })));
    }

    #[test]
    fn test_extract_gz_round_trip() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("archive.gz.bak");
        let payload = b"hello gzip payload".repeat(100);
        std::fs::write(&archive, gzip_bytes(&payload)).unwrap();

        let output = extract_gz(&archive).unwrap();
        assert_eq!(output, temp.path().join("archive.bak"));
        assert_eq!(std::fs::read(&output).unwrap(), payload);
    }

    #[test]
    fn test_extract_gz_rejects_non_gzip() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("broken.gz");
        std::fs::write(&archive, b"definitely not gzip").unwrap();

        assert!(matches!(extract_gz(&archive), Err(DlError::Io(_))));
    }

    #[test]
    fn test_extract_tar_gz() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("bundle.tar.gz");
        write_tar_gz(&archive, &[("a.txt", b"alpha"), ("nested/b.txt", b"beta")]);

        extract_tar_gz(&archive, temp.path()).unwrap();
        assert_eq!(std::fs::read(temp.path().join("a.txt")).unwrap(), b"alpha");
        assert_eq!(
            std::fs::read(temp.path().join("nested/b.txt")).unwrap(),
            b"beta"
        );
    }

    #[test]
    fn test_extract_zip() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("bundle.zip");
        write_zip(&archive, &[("one.txt", b"1"), ("dir/two.txt", b"22")]);

        extract_zip(&archive, temp.path()).unwrap();
        assert_eq!(std::fs::read(temp.path().join("one.txt")).unwrap(), b"1");
        assert_eq!(std::fs::read(temp.path().join("dir/two.txt")).unwrap(), b"22");
    }

    #[test]
    fn test_extract_zip_rejects_non_zip() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("broken.zip");
        std::fs::write(&archive, b"not a zip at all").unwrap();

        assert!(matches!(
            extract_zip(&archive, temp.path()),
            Err(DlError::Zip(_))
        ));
    }

    #[test]
    fn test_extract_downloaded_runs_every_flag_in_order() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("both.tar.gz");
        write_tar_gz(&archive, &[("inner.txt", b"inner")]);

        let options = DownloadOptions::new()
            .directory(temp.path())
            .extract_targz(true)
            .extract_gz(true);
        let mut out = Vec::new();
        extract_downloaded(&archive, &options, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Extracting...\nExtracting...\n");
        assert!(temp.path().join("inner.txt").exists());
        // gzip pass leaves the raw tar next to the archive
        assert!(temp.path().join("both.tar").exists());
    }
}
