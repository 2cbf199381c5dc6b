// Binary-document handler: revocable byte references for embedding

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;
use uuid::Uuid;

use crate::decode::Decoded;
use crate::types::{PipelineError, PipelineResult};
use crate::upload::{ByteSource, UploadedFile};

/// Revocable reference to a document's bytes, suitable for handing to an
/// embedded viewer. Uniquely owned: the lifecycle manager's current state is
/// the only long-lived holder, and every transition out of that state
/// revokes the handle. `Drop` revokes as a backstop, so a handle can never
/// outlive its owner un-revoked.
pub struct BlobHandle {
    id: Uuid,
    source: Arc<dyn ByteSource>,
    revoked: Arc<AtomicBool>,
}

impl BlobHandle {
    fn allocate(file: &UploadedFile) -> Self {
        let id = Uuid::new_v4();
        debug!("allocated blob {id} for {}", file.name());
        Self {
            id,
            source: file.source(),
            revoked: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked.load(Ordering::SeqCst)
    }

    /// Hands out an observer that outlives the handle, for consumers that
    /// need to notice release (viewers, tests).
    pub fn probe(&self) -> RevocationProbe {
        RevocationProbe(Arc::clone(&self.revoked))
    }

    /// Fetches the document bytes for display. Fails once revoked, the same
    /// way a released object URL no longer resolves.
    pub async fn bytes(&self) -> PipelineResult<Bytes> {
        if self.is_revoked() {
            return Err(PipelineError::Read);
        }
        self.source.read().await.map_err(|_| PipelineError::Read)
    }

    /// Releases the reference. Idempotent.
    pub fn revoke(&self) {
        if !self.revoked.swap(true, Ordering::SeqCst) {
            debug!("revoked blob {}", self.id);
        }
    }
}

impl Drop for BlobHandle {
    fn drop(&mut self) {
        self.revoke();
    }
}

impl std::fmt::Debug for BlobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobHandle")
            .field("id", &self.id)
            .field("revoked", &self.is_revoked())
            .finish()
    }
}

/// Cloneable view onto a blob's revocation state.
#[derive(Clone)]
pub struct RevocationProbe(Arc<AtomicBool>);

impl RevocationProbe {
    pub fn is_revoked(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Attaches a fresh revocable reference to the file. The bytes are not read
/// here; the handler is exempt from the pipeline's read step.
pub fn attach(file: &UploadedFile) -> Decoded {
    Decoded::BinaryDocument {
        file_name: file.name().to_string(),
        blob: BlobHandle::allocate(file),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_file() -> UploadedFile {
        UploadedFile::in_memory("paper.pdf", "application/pdf", &b"%PDF-1.4"[..])
    }

    #[tokio::test]
    async fn test_attach_carries_name_and_live_blob() {
        let decoded = attach(&pdf_file());
        match decoded {
            Decoded::BinaryDocument { file_name, blob } => {
                assert_eq!(file_name, "paper.pdf");
                assert!(!blob.is_revoked());
                assert_eq!(&blob.bytes().await.unwrap()[..], b"%PDF-1.4");
            }
            other => panic!("expected binary document, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_revoked_blob_no_longer_resolves() {
        let Decoded::BinaryDocument { blob, .. } = attach(&pdf_file()) else {
            panic!("expected binary document");
        };
        let probe = blob.probe();
        blob.revoke();
        blob.revoke(); // idempotent
        assert!(probe.is_revoked());
        assert_eq!(blob.bytes().await.unwrap_err(), PipelineError::Read);
    }

    #[test]
    fn test_drop_revokes() {
        let Decoded::BinaryDocument { blob, .. } = attach(&pdf_file()) else {
            panic!("expected binary document");
        };
        let probe = blob.probe();
        drop(blob);
        assert!(probe.is_revoked());
    }

    #[test]
    fn test_each_attach_allocates_a_fresh_reference() {
        let file = pdf_file();
        let (a, b) = (attach(&file), attach(&file));
        let (Decoded::BinaryDocument { blob: a, .. }, Decoded::BinaryDocument { blob: b, .. }) =
            (a, b)
        else {
            panic!("expected binary documents");
        };
        assert_ne!(a.id(), b.id());
    }
}
