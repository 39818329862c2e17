//! Archive download.
//!
//! One GET request streamed to a staging file. No retries: a transient
//! failure propagates as [`InstallError::Network`] and the install simply
//! fails.

use crate::error::InstallError;
use crate::output;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

/// Whole-request deadline. Distribution archives are tens of megabytes, so
/// this is generous rather than snappy.
const DOWNLOAD_TIMEOUT_SECS: u64 = 300;

/// Download `url` to `dest`, returning the number of bytes written.
///
/// A failed or interrupted download removes the partial file before the
/// error propagates, so `dest` never holds a misleadingly complete artifact.
pub fn fetch(url: &str, dest: &Path) -> Result<u64, InstallError> {
    match fetch_to_file(url, dest) {
        Ok(total) => Ok(total),
        Err(e) => {
            let _ = std::fs::remove_file(dest);
            Err(e)
        }
    }
}

fn fetch_to_file(url: &str, dest: &Path) -> Result<u64, InstallError> {
    let response = ureq::get(url)
        .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .call()
        .map_err(|e| network(url, e.to_string()))?;

    // Sized bar when the server tells us the length, spinner otherwise.
    let pb = match response
        .header("content-length")
        .and_then(|s| s.parse().ok())
    {
        Some(len) => output::download_progress(len),
        None => output::spinner("downloading"),
    };

    let mut file = std::fs::File::create(dest)
        .map_err(|e| InstallError::fs(format!("cannot create {}", dest.display()), e))?;

    let mut reader = response.into_reader();
    let mut buffer = [0u8; 8192];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| network(url, format!("stream interrupted: {e}")))?;

        if bytes_read == 0 {
            break;
        }

        file.write_all(&buffer[..bytes_read])
            .map_err(|e| InstallError::fs(format!("cannot write {}", dest.display()), e))?;

        total_bytes += bytes_read as u64;
        pb.set_position(total_bytes);
    }

    pb.finish_and_clear();
    Ok(total_bytes)
}

fn network(url: &str, reason: String) -> InstallError {
    InstallError::Network {
        url: url.to_string(),
        reason,
    }
}

/// Extract the filename from a download URL, stripping any query string or
/// fragment.
pub fn filename_from_url(url: &str) -> String {
    let clean = url.split('?').next().unwrap_or(url);
    let clean = clean.split('#').next().unwrap_or(clean);

    clean
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("download")
        .to_string()
}
