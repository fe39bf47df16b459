use mime::Mime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::workflows::hba::checklist::DocumentKey;

use super::domain::{DocumentRef, ReferenceNo};

/// Upload size cap, 50 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Inbound file metadata supplied by the uploader. The bytes themselves are
/// handed to the [`DocumentStore`] out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUpload {
    pub file_name: String,
    pub size_bytes: u64,
    pub content_type: String,
}

/// Checks an upload against the size cap and the PDF-only rule before it is
/// allowed anywhere near a store.
pub fn validate_upload(upload: &DocumentUpload) -> Result<(), UploadRejected> {
    if upload.size_bytes > MAX_UPLOAD_BYTES {
        return Err(UploadRejected::TooLarge {
            size_bytes: upload.size_bytes,
        });
    }
    let parsed: Mime = upload
        .content_type
        .parse()
        .map_err(|_| UploadRejected::WrongType {
            content_type: upload.content_type.clone(),
        })?;
    if parsed.type_() != mime::APPLICATION || parsed.subtype() != mime::PDF {
        return Err(UploadRejected::WrongType {
            content_type: upload.content_type.clone(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejected {
    #[error("file of {size_bytes} bytes exceeds the 50 MiB upload cap")]
    TooLarge { size_bytes: u64 },
    #[error("content type '{content_type}' is not accepted, only application/pdf")]
    WrongType { content_type: String },
}

/// Storage backend for checklist documents.
pub trait DocumentStore: Send + Sync {
    fn store(
        &self,
        reference: &ReferenceNo,
        key: DocumentKey,
        upload: &DocumentUpload,
    ) -> Result<DocumentRef, DocumentStoreError>;
}

#[derive(Debug, Error)]
pub enum DocumentStoreError {
    #[error("document store unavailable: {0}")]
    Unavailable(String),
}
