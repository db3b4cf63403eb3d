//! Input resolution: turn a user-supplied path or URL into an
//! [`UploadedDocument`].
//!
//! This is the CLI-facing edge of the upload boundary: it reads the bytes
//! into memory, classifies the media type (extension for local files,
//! Content-Type header with an extension fallback for URLs), and hands the
//! rest of the pipeline an immutable upload. No size or page-count limit is
//! enforced here.

use crate::document::{MediaType, UploadedDocument};
use crate::error::AskFilesError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to an in-memory upload.
///
/// If the input is a URL, download it. If it is a local file, read it and
/// classify by extension.
pub async fn resolve_input(
    input: &str,
    timeout_secs: u64,
) -> Result<UploadedDocument, AskFilesError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input)
    }
}

/// Read a local file, classifying its media type by extension.
fn resolve_local(path_str: &str) -> Result<UploadedDocument, AskFilesError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(AskFilesError::FileNotFound { path });
    }

    let media_type = media_type_from_path(&path)?;

    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(AskFilesError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(AskFilesError::FileNotFound { path });
        }
    };

    debug!("Resolved local file: {} ({})", path.display(), media_type);

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path_str.to_string());

    Ok(UploadedDocument::new(bytes, media_type).with_name(name))
}

/// Download a URL into memory.
async fn download_url(url: &str, timeout_secs: u64) -> Result<UploadedDocument, AskFilesError> {
    info!("Downloading: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AskFilesError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            AskFilesError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            AskFilesError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(AskFilesError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    // Content-Type first; fall back to the URL path's extension.
    let header_mime = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string());

    let filename = extract_filename(url);

    let media_type = match header_mime.as_deref().map(MediaType::from_mime) {
        Some(Ok(mt)) => mt,
        _ => media_type_from_path(Path::new(&filename))?,
    };

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AskFilesError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?
        .to_vec();

    info!("Downloaded {} bytes ({})", bytes.len(), media_type);

    Ok(UploadedDocument::new(bytes, media_type).with_name(filename))
}

/// Classify a path by its extension.
fn media_type_from_path(path: &Path) -> Result<MediaType, AskFilesError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| AskFilesError::InvalidInput {
            input: path.display().to_string(),
        })?;

    MediaType::from_extension(ext)
}

/// Extract a reasonable filename from the URL path.
fn extract_filename(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }

    "download".to_string()
}
