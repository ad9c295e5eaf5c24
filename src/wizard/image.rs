//! Asynchronous image reads with per-field request tokens.
//!
//! A file read cannot be aborted once started, so every read is tagged with a token from a
//! per-field counter. Any later change to the field bumps the counter, and a completion whose
//! token is no longer the latest is discarded.

use crate::models::ImageData;
use std::collections::HashMap;
use std::io;
use std::path::Path;

/// Handle for one in-flight read. Hand it back when the read completes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImageTicket {
    key: String,
    token: u64,
}

impl ImageTicket {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn token(&self) -> u64 {
        self.token
    }
}

/// Latest token per field key.
#[derive(Clone, Debug, Default)]
pub(crate) struct ImageReads {
    tokens: HashMap<String, u64>,
}

impl ImageReads {
    pub(crate) fn begin(&mut self, key: &str) -> ImageTicket {
        let token = self.bump(key);
        ImageTicket {
            key: key.to_string(),
            token,
        }
    }

    /// Called on every other change to the field so in-flight reads go stale.
    pub(crate) fn bump(&mut self, key: &str) -> u64 {
        let token = self.tokens.entry(key.to_string()).or_insert(0);
        *token += 1;
        *token
    }

    pub(crate) fn is_current(&self, ticket: &ImageTicket) -> bool {
        self.tokens.get(&ticket.key) == Some(&ticket.token)
    }
}

/// Read a file into an [`ImageData`], guessing the mime type from the extension.
pub async fn read_image_file(path: impl AsRef<Path>) -> io::Result<ImageData> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    Ok(ImageData::new(mime_for(path), bytes))
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
