//! Use case for uploading local files into the knowledge base.

use std::{
    fs,
    path::{Path, PathBuf},
};

use url::Url;

use super::contracts::{DocumentReceipt, GatewayError};

const FILE_URI_PREFIX: &str = "file://";

pub trait DocumentUploader {
    /// Submits one file as the multipart `file` field.
    fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<DocumentReceipt, GatewayError>;
}

impl<T: DocumentUploader + ?Sized> DocumentUploader for &T {
    fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<DocumentReceipt, GatewayError> {
        (*self).upload(file_name, bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// The local file could not be read; nothing was sent.
    ReadFailed { path: PathBuf, reason: String },
    Unreachable,
    Rejected { status: u16 },
    InvalidResponse,
}

/// Name shown in the file list and sent as the multipart file name.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Reads `path` from disk and uploads it.
///
/// # Errors
/// `UploadError::ReadFailed` when the file cannot be read; otherwise the
/// backend failure mapped onto the upload error space.
pub fn upload_file(
    uploader: &dyn DocumentUploader,
    path: &Path,
) -> Result<DocumentReceipt, UploadError> {
    let bytes = fs::read(path).map_err(|source| UploadError::ReadFailed {
        path: path.to_path_buf(),
        reason: source.to_string(),
    })?;

    let file_name = display_name(path);
    tracing::debug!(file = %file_name, bytes = bytes.len(), "uploading file");

    uploader
        .upload(&file_name, bytes)
        .map_err(map_gateway_error)
}

fn map_gateway_error(error: GatewayError) -> UploadError {
    match error {
        GatewayError::Unreachable(_) => UploadError::Unreachable,
        GatewayError::Rejected { status } => UploadError::Rejected { status },
        GatewayError::InvalidResponse(_) => UploadError::InvalidResponse,
    }
}

/// Splits pasted/dropped text into file paths.
///
/// Accepts one or more paths per line separated by whitespace. Single or
/// double quotes group a path, a backslash escapes the next character, and
/// `file://` URIs are reduced to their (percent-decoded) path.
pub fn parse_dropped_paths(raw: &str) -> Vec<PathBuf> {
    raw.lines()
        .flat_map(split_line)
        .filter(|token| !token.is_empty())
        .map(strip_file_uri)
        .collect()
}

fn split_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = line.trim().chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (None, '\\') => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            (None, '\'' | '"') => quote = Some(ch),
            (Some(open), _) if ch == open => quote = None,
            (None, _) if ch.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

fn strip_file_uri(token: String) -> PathBuf {
    if !token.starts_with(FILE_URI_PREFIX) {
        return PathBuf::from(token);
    }

    Url::parse(&token)
        .ok()
        .and_then(|uri| uri.to_file_path().ok())
        .unwrap_or_else(|| PathBuf::from(token))
}
