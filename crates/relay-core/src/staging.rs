//! Transient storage for uploaded attachments.
//!
//! A [`StagedFile`] belongs to exactly one request. The request flow calls
//! [`StagedFile::remove`] once it is done; if the flow bails out early (a
//! multipart error halfway through the upload, a panic in a handler) the
//! `Drop` impl removes the file instead.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Bytes kept from the start of every upload for magic-byte sniffing.
pub const HEAD_LEN: usize = 16;

/// Directory holding staged uploads.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory if it does not exist yet.
    pub async fn ensure(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    /// Open a new, uniquely named staged file for writing.
    pub async fn create(
        &self,
        original_name: Option<String>,
        declared_type: Option<String>,
    ) -> io::Result<StagedWriter> {
        let path = self.dir.join(format!("upload-{}", Uuid::new_v4()));
        let file = OpenOptions::new().write(true).create_new(true).open(&path).await?;
        tracing::debug!("Staging upload at {}", path.display());

        Ok(StagedWriter {
            file,
            staged: StagedFile {
                path,
                original_name,
                declared_type,
                size: 0,
                head: Vec::with_capacity(HEAD_LEN),
                removed: false,
            },
        })
    }
}

/// Write side of a staged upload. The file is already owned by the inner
/// [`StagedFile`], so dropping the writer mid-upload removes it.
pub struct StagedWriter {
    file: File,
    staged: StagedFile,
}

impl StagedWriter {
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.file.write_all(chunk).await?;
        let missing = HEAD_LEN.saturating_sub(self.staged.head.len());
        self.staged.head.extend_from_slice(&chunk[..missing.min(chunk.len())]);
        self.staged.size += chunk.len() as u64;
        Ok(())
    }

    pub async fn finish(mut self) -> io::Result<StagedFile> {
        self.file.flush().await?;
        drop(self.file);
        Ok(self.staged)
    }
}

/// An uploaded attachment on local disk.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    original_name: Option<String>,
    declared_type: Option<String>,
    size: u64,
    head: Vec<u8>,
    removed: bool,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name the client sent, if any.
    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    /// Content type the client declared for the multipart field.
    pub fn declared_type(&self) -> Option<&str> {
        self.declared_type.as_deref()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// First [`HEAD_LEN`] bytes (fewer for tiny files).
    pub fn head(&self) -> &[u8] {
        &self.head
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Name used in logs and as the display name in the remote file store.
    pub fn display_name(&self) -> &str {
        self.original_name
            .as_deref()
            .or_else(|| self.path.file_name().and_then(|n| n.to_str()))
            .unwrap_or("upload")
    }

    pub async fn read_all(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path).await
    }

    /// Delete the file. Calling it again after success is a no-op, and a
    /// file that is already gone counts as removed.
    pub async fn remove(&mut self) -> io::Result<()> {
        if self.removed {
            return Ok(());
        }
        match fs::remove_file(&self.path).await {
            Ok(()) => {},
            Err(e) if e.kind() == io::ErrorKind::NotFound => {},
            Err(e) => return Err(e),
        }
        self.removed = true;
        tracing::debug!("Removed staged upload {}", self.path.display());
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("Removed staged upload {} on drop", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {},
            Err(e) => tracing::warn!(
                "Failed to remove staged upload {} on drop: {}",
                self.path.display(),
                e
            ),
        }
    }
}
