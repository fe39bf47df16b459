//! House building advance application intake, review, and sanction flow.
//!
//! The aggregate here owns an application's status, checklist fulfillment,
//! and review notes. Every change travels through the status machine in
//! [`crate::workflows::hba::machine`], so handlers and services stay thin
//! wrappers over pure transitions plus storage and collaborator calls.

pub(crate) mod documents;
pub mod domain;
pub(crate) mod intake;
pub(crate) mod letter;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use documents::{
    validate_upload, DocumentStore, DocumentStoreError, DocumentUpload, UploadRejected,
    MAX_UPLOAD_BYTES,
};
pub use domain::{
    Applicant, Application, ApplicationStatusView, ApplicationSubmission, DocumentRef,
    InboxEntryView, ItemFulfillment, ParseReferenceError, ReferenceNo, SanctionRecord,
    SubmittedItem,
};
pub use intake::{ChecklistGuard, IntakeError};
pub use letter::{
    approximate_emi, LetterArtifact, LetterError, LetterRenderer, SanctionLetterData,
    ANNUAL_INTEREST_RATE, LETTER_SIGNATORY, LETTER_SUBJECT, RECOVERY_INSTALLMENTS,
};
pub use repository::{
    ApplicationRepository, Notifier, NotifyError, RepositoryError, WorkflowNotice,
};
pub use router::application_router;
pub use service::{CorrectionError, HbaApplicationService, SanctionOutcome, WorkflowServiceError};
