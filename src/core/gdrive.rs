//! Google Drive downloads.
//!
//! Drive answers the first request for a large file with a warning page and a
//! `download_warning*` cookie; the file itself only comes back once the
//! cookie's value is echoed as `confirm=<token>`. Small files skip the warning
//! and the token is simply empty.

use crate::core::download::{http_client, Downloader, Transfer};
use crate::core::options::DownloadOptions;
use crate::error::Result;
use reqwest::header::{HeaderMap, SET_COOKIE};
use std::io::Write;

const WARNING_COOKIE_PREFIX: &str = "download_warning";

impl<W: Write> Downloader<W> {
    pub fn download_google_drive(&mut self, file_id: &str, options: &DownloadOptions) -> Result<()> {
        let url = format!("{}{}", self.drive_endpoint, file_id);

        // Both requests share this client's cookie store; it lives only as
        // long as this call.
        let client = http_client(true)?;

        log::debug!("Requesting Drive warning page {url}");
        let first = client.get(&url).send()?.error_for_status()?;
        let token = confirm_token(first.headers());
        drop(first);

        let url = confirm_url(&url, &token);
        log::debug!("Drive confirmation token: {token:?}");
        let response = client.get(&url).send()?;
        self.save(Transfer::from_response(url, response)?, options)
    }
}

/// Downloads a Google Drive file by id, printing progress to stdout.
pub fn download_from_google_drive(file_id: &str, options: &DownloadOptions) -> Result<()> {
    Downloader::new().download_google_drive(file_id, options)
}

/// Value of the first `download_warning*` cookie set by the response, or an
/// empty string.
pub fn confirm_token(headers: &HeaderMap) -> String {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(cookie_pair)
        .find(|(name, _)| name.starts_with(WARNING_COOKIE_PREFIX))
        .map(|(_, value)| value.to_string())
        .unwrap_or_default()
}

pub fn confirm_url(url: &str, token: &str) -> String {
    format!("{url}&confirm={token}")
}

// `name=value` ahead of any cookie attributes.
fn cookie_pair(header: &str) -> Option<(&str, &str)> {
    let pair = header.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    Some((name.trim(), value))
}
