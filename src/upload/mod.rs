// Uploaded file handle and its byte sources

pub mod gate;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::warn;

use crate::types::{PipelineError, PipelineResult};

/// Supplier of a file's raw bytes. Every call performs a fresh read of the
/// underlying source; nothing is cached between invocations.
#[async_trait]
pub trait ByteSource: Send + Sync {
    async fn read(&self) -> io::Result<Bytes>;
}

/// Reads from the filesystem via tokio, reopening the path on each call.
pub struct DiskSource {
    path: PathBuf,
}

impl DiskSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ByteSource for DiskSource {
    async fn read(&self) -> io::Result<Bytes> {
        let contents = tokio::fs::read(&self.path).await?;
        Ok(Bytes::from(contents))
    }
}

/// Serves a byte buffer already resident in memory. Useful for surfaces that
/// receive the upload body directly, and for tests.
pub struct MemorySource {
    bytes: Bytes,
}

impl MemorySource {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self { bytes: bytes.into() }
    }
}

#[async_trait]
impl ByteSource for MemorySource {
    async fn read(&self) -> io::Result<Bytes> {
        Ok(self.bytes.clone())
    }
}

/// Opaque handle for a candidate file: a name, the content-type the upload
/// surface declared for it, a byte length, and the source of its bytes.
/// The pipeline never mutates one; cloning shares the source.
#[derive(Clone)]
pub struct UploadedFile {
    name: String,
    content_type: String,
    len: u64,
    source: Arc<dyn ByteSource>,
}

impl UploadedFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        len: u64,
        source: Arc<dyn ByteSource>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            len,
            source,
        }
    }

    /// Wraps an in-memory buffer, taking the length from the buffer itself.
    pub fn in_memory(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        let bytes = bytes.into();
        let len = bytes.len() as u64;
        Self::new(name, content_type, len, Arc::new(MemorySource::new(bytes)))
    }

    /// Builds a handle for a file on disk, guessing the declared
    /// content-type from the name the way a browser would populate it.
    pub async fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();
        let len = tokio::fs::metadata(path).await?.len();
        Ok(Self::new(
            name,
            content_type,
            len,
            Arc::new(DiskSource::new(path)),
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn source(&self) -> Arc<dyn ByteSource> {
        Arc::clone(&self.source)
    }

    /// Reads the full contents as a byte buffer. I/O details are logged;
    /// the pipeline error stays short.
    pub async fn read_bytes(&self) -> PipelineResult<Bytes> {
        self.source.read().await.map_err(|err| {
            warn!("read of {} failed: {err}", self.name);
            PipelineError::Read
        })
    }

    /// Reads the full contents as text, replacing invalid UTF-8 rather than
    /// failing, the way a text-mode file read does in a browser.
    pub async fn read_text(&self) -> PipelineResult<String> {
        let bytes = self.read_bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}
