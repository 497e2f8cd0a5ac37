//! Scoped credential file handed to yt-dlp.
//!
//! yt-dlp only reads cookies from a Netscape-format file on disk. The blob
//! from the environment is written to a private temp file that lives as
//! long as this value and is removed when it is dropped.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::Result;

/// A cookie jar written to a temporary file.
#[derive(Debug)]
pub struct CredentialFile {
    file: NamedTempFile,
}

impl CredentialFile {
    /// Write `blob` to a fresh temp file.
    pub fn write(blob: &str) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("dakids-cookies-")
            .suffix(".txt")
            .tempfile()?;
        file.write_all(blob.as_bytes())?;
        if !blob.ends_with('\n') {
            file.write_all(b"\n")?;
        }
        file.flush()?;

        tracing::info!("Cookies written to {}", file.path().display());
        Ok(Self { file })
    }

    /// Location to pass as `--cookies`.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
