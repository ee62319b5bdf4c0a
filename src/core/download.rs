use crate::core::extract;
use crate::core::filename::resolve_file_name;
use crate::core::options::DownloadOptions;
use crate::core::progress::Progress;
use crate::error::{DlError, Result};
use crate::utils::fs;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, CONTENT_DISPOSITION, CONTENT_LENGTH};
use std::borrow::Cow;
use std::io::{self, Read, Stdout, Write};
use std::path::Path;

pub const BLOCK_SIZE: usize = 8192;

pub(crate) const DRIVE_ENDPOINT: &str = "https://drive.google.com/uc?export=download&id=";

const USER_AGENT: &str = concat!("dlutils/", env!("CARGO_PKG_VERSION"));

/// An opened response waiting to be written to disk: the URL it came from,
/// its headers and its unread body.
pub struct Transfer<R> {
    pub url: String,
    pub headers: HeaderMap,
    pub body: R,
}

impl<R: Read> Transfer<R> {
    pub fn new<S: Into<String>>(url: S, headers: HeaderMap, body: R) -> Self {
        Self {
            url: url.into(),
            headers,
            body,
        }
    }
}

impl Transfer<Response> {
    /// Fails on 4xx/5xx statuses.
    pub fn from_response<S: Into<String>>(url: S, response: Response) -> Result<Self> {
        let response = response.error_for_status()?;
        let headers = response.headers().clone();
        Ok(Self::new(url, headers, response))
    }
}

/// Fetches files and reports progress to `out` (stdout unless told otherwise).
pub struct Downloader<W: Write> {
    out: W,
    pub(crate) drive_endpoint: String,
}

impl Default for Downloader<Stdout> {
    fn default() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Downloader<Stdout> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<W: Write> Downloader<W> {
    pub fn with_output(out: W) -> Self {
        Self {
            out,
            drive_endpoint: DRIVE_ENDPOINT.to_string(),
        }
    }

    /// Replaces the Google Drive export URL prefix; the file id is appended
    /// to it verbatim.
    pub fn drive_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.drive_endpoint = endpoint.into();
        self
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn download_url(&mut self, url: &str, options: &DownloadOptions) -> Result<()> {
        log::debug!("Opening {url}");
        let client = http_client(false)?;
        let response = client.get(url).send()?;
        self.save(Transfer::from_response(url, response)?, options)
    }

    /// Writes an opened transfer to disk, then runs the requested
    /// extractions.
    ///
    /// Nothing is read from the body when a file of the reported size is
    /// already in place. A reported length of 0 (or no length at all)
    /// accepts any existing file.
    pub fn save<R: Read>(&mut self, transfer: Transfer<R>, options: &DownloadOptions) -> Result<()> {
        let Transfer {
            url,
            headers,
            mut body,
        } = transfer;

        let disposition = header_str(&headers, CONTENT_DISPOSITION);
        let file_name = resolve_file_name(options.file_name.as_deref(), disposition.as_deref(), &url);
        let file_path = options.directory.join(&file_name);

        let content_length = content_length(&headers)?;
        match content_length {
            Some(length) => writeln!(self.out, "Downloading: {file_name} Bytes: {length}")?,
            None => writeln!(self.out, "Downloading: {file_name}")?,
        }
        let file_size = content_length.unwrap_or(0);

        if let Some(existing) = fs::existing_size(&file_path) {
            if existing == file_size || file_size == 0 {
                writeln!(self.out, "File {} already exists, skipping", file_path.display())?;
                return Ok(());
            }
        }

        fs::ensure_dir_exists(&options.directory)?;
        let written = write_body(&mut body, &file_path, file_size, &mut self.out)?;
        log::debug!("Wrote {written} bytes to {file_path:?}");

        if options.wants_extraction() {
            extract::extract_downloaded(&file_path, options, &mut self.out)?;
        }
        writeln!(self.out, "Done")?;
        Ok(())
    }
}

/// Downloads `url` into `options.directory`, printing progress to stdout.
pub fn download_from_url(url: &str, options: &DownloadOptions) -> Result<()> {
    Downloader::new().download_url(url, options)
}

pub(crate) fn http_client(cookie_store: bool) -> Result<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .cookie_store(cookie_store)
        .build()?;
    Ok(client)
}

// Non-UTF-8 bytes become U+FFFD rather than failing the download.
fn header_str(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<Cow<'_, str>> {
    headers
        .get(&name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()))
}

/// `None` when the header is absent.
pub fn content_length(headers: &HeaderMap) -> Result<Option<u64>> {
    match header_str(headers, CONTENT_LENGTH) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| DlError::InvalidContentLength {
                value: value.to_string(),
            }),
        None => Ok(None),
    }
}

// The file is closed when it drops, including on a failed read; whatever was
// written before the failure stays on disk.
fn write_body<R: Read, W: Write>(
    body: &mut R,
    file_path: &Path,
    total: u64,
    out: &mut W,
) -> Result<u64> {
    let mut file = fs::create_file(file_path)?;
    let mut progress = Progress::new(out, total);
    let mut buffer = vec![0u8; BLOCK_SIZE];

    loop {
        let read = read_block(body, &mut buffer)?;
        if read == 0 {
            break;
        }
        file.write_all(&buffer[..read])?;
        progress.advance(read)?;
    }

    Ok(progress.finish()?)
}

/// Fills `buf` unless the reader runs dry first; only the final block of a
/// stream comes back short. A read error after some bytes arrived returns
/// those bytes, and the error surfaces on the next call.
fn read_block<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if filled > 0 => {
                log::debug!("Read failed after {filled} bytes of a block: {e}");
                break;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
