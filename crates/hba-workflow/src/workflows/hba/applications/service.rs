use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Datelike, Utc};
use thiserror::Error;
use tracing::warn;

use crate::workflows::hba::checklist::{ChecklistSectionView, DocumentKey};
use crate::workflows::hba::domain::{AppStatus, ApplicationType, ReviewAction, WorkflowAction};
use crate::workflows::hba::machine::{self, TransitionError};
use crate::workflows::hba::pipeline::{self, WorkflowProgressView};
use crate::workflows::hba::review::ReviewData;
use crate::workflows::hba::roles::UserRole;

use super::documents::{
    validate_upload, DocumentStore, DocumentStoreError, DocumentUpload, UploadRejected,
};
use super::domain::{
    Application, ApplicationSubmission, InboxEntryView, ItemFulfillment, ReferenceNo,
    SanctionRecord, SubmittedItem,
};
use super::intake::{ChecklistGuard, IntakeError};
use super::letter::{
    LetterArtifact, LetterError, LetterRenderer, SanctionLetterData, ANNUAL_INTEREST_RATE,
    RECOVERY_INSTALLMENTS,
};
use super::repository::{ApplicationRepository, Notifier, RepositoryError, WorkflowNotice};

/// Orchestrates the application lifecycle: intake validation, status
/// transitions, document storage, and sanction issuance. Every state change
/// is computed first and committed to the repository in one write.
pub struct HbaApplicationService<R, N> {
    guard: ChecklistGuard,
    repository: Arc<R>,
    notifier: Arc<N>,
    documents: Arc<dyn DocumentStore>,
    letters: Arc<dyn LetterRenderer>,
}

static REFERENCE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_reference() -> ReferenceNo {
    let serial = REFERENCE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReferenceNo::allocate(Utc::now().year(), serial)
}

impl<R, N> HbaApplicationService<R, N>
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
{
    pub fn new(
        repository: Arc<R>,
        notifier: Arc<N>,
        documents: Arc<dyn DocumentStore>,
        letters: Arc<dyn LetterRenderer>,
    ) -> Self {
        Self {
            guard: ChecklistGuard::standard(),
            repository,
            notifier,
            documents,
            letters,
        }
    }

    /// The checklist sections collected for the given application shape.
    pub fn checklist(
        &self,
        app_type: ApplicationType,
        is_bank_transfer: bool,
    ) -> Vec<ChecklistSectionView> {
        self.guard.catalog().active_view(app_type, is_bank_transfer)
    }

    /// Validates and registers a new application, stores its documents, and
    /// places it on the Employee Services desk.
    pub fn submit(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<Application, WorkflowServiceError> {
        self.guard.validate(&submission)?;
        for item in submission.items.values() {
            if let SubmittedItem::Upload(upload) = item {
                validate_upload(upload)?;
            }
        }

        let reference = next_reference();
        let mut fulfillment = BTreeMap::new();
        for (&key, item) in &submission.items {
            let entry = match item {
                SubmittedItem::Upload(upload) => ItemFulfillment::Received {
                    document: self.documents.store(&reference, key, upload)?,
                },
                SubmittedItem::NotApplicable => ItemFulfillment::NotApplicable,
            };
            fulfillment.insert(key, entry);
        }

        let outcome = machine::transition(
            AppStatus::Draft,
            UserRole::Applicant,
            WorkflowAction::Submit,
            &ReviewData::default(),
        )?;

        let now = Utc::now();
        let application = self.repository.insert(Application {
            reference,
            applicant: submission.applicant,
            app_type: submission.app_type,
            is_bank_transfer: submission.is_bank_transfer,
            property_location: submission.property_location,
            requested_amount: submission.requested_amount,
            salary: submission.salary,
            fulfillment,
            status: outcome.status,
            review: outcome.review,
            submitted_at: now,
            updated_at: now,
            sanction: None,
        })?;

        self.send_notice(
            "application_submitted",
            &application.reference,
            &[("status", application.status.code())],
        );
        Ok(application)
    }

    /// Applies one desk decision. The caller's provisional review is checked
    /// against the action's preconditions and committed together with the new
    /// status.
    pub fn decide(
        &self,
        reference: &ReferenceNo,
        role: UserRole,
        action: ReviewAction,
        review: ReviewData,
    ) -> Result<Application, WorkflowServiceError> {
        let mut application = self.fetch(reference)?;
        let outcome = machine::transition(
            application.status,
            role,
            action.as_workflow_action(),
            &review,
        )?;
        application.status = outcome.status;
        application.review = outcome.review;
        application.updated_at = Utc::now();
        self.repository.update(application.clone())?;

        let template = match action {
            ReviewAction::Return => "application_returned",
            ReviewAction::Recommend | ReviewAction::Approve => "application_advanced",
        };
        self.send_notice(
            template,
            reference,
            &[
                ("status", application.status.code()),
                ("desk", role.code()),
            ],
        );
        Ok(application)
    }

    /// Replaces one rejected document on a returned application and clears
    /// its rejection flag. Only the applicant may do this, and only for
    /// documents the reviewer actually flagged.
    pub fn reupload_document(
        &self,
        reference: &ReferenceNo,
        role: UserRole,
        key: DocumentKey,
        upload: DocumentUpload,
    ) -> Result<Application, WorkflowServiceError> {
        if role != UserRole::Applicant {
            return Err(CorrectionError::NotApplicant { role }.into());
        }
        let mut application = self.fetch(reference)?;
        if application.status != AppStatus::Returned {
            return Err(CorrectionError::NotOpenForCorrection {
                status: application.status,
            }
            .into());
        }
        if !application.review.is_rejected(key) {
            return Err(CorrectionError::NotRejected { key }.into());
        }
        validate_upload(&upload)?;

        let document = self.documents.store(reference, key, &upload)?;
        application
            .fulfillment
            .insert(key, ItemFulfillment::Received { document });
        application.review.set_rejection(key, false);
        application.updated_at = Utc::now();
        self.repository.update(application.clone())?;

        let key_text = key.to_string();
        self.send_notice(
            "document_reuploaded",
            reference,
            &[
                ("document", key_text.as_str()),
                ("outstanding", &application.review.rejection_count().to_string()),
            ],
        );
        Ok(application)
    }

    /// Sends a corrected application back into the pipeline. Fails while any
    /// rejection is still outstanding.
    pub fn resubmit(
        &self,
        reference: &ReferenceNo,
        role: UserRole,
    ) -> Result<Application, WorkflowServiceError> {
        let mut application = self.fetch(reference)?;
        let review = application.review.clone();
        let outcome =
            machine::transition(application.status, role, WorkflowAction::Submit, &review)?;
        application.status = outcome.status;
        application.review = outcome.review;
        application.updated_at = Utc::now();
        self.repository.update(application.clone())?;

        self.send_notice(
            "application_resubmitted",
            reference,
            &[("status", application.status.code())],
        );
        Ok(application)
    }

    /// Renders the sanction letter and moves the application to its final
    /// sanctioned status. The letter is rendered before anything is
    /// committed, so a renderer failure leaves the application untouched.
    pub fn issue_sanction(
        &self,
        reference: &ReferenceNo,
        role: UserRole,
    ) -> Result<SanctionOutcome, WorkflowServiceError> {
        let mut application = self.fetch(reference)?;
        let next = machine::issue_sanction(application.status, role)?;

        let letter = self
            .letters
            .render(&SanctionLetterData::for_application(&application))?;

        let issued_at = Utc::now();
        application.status = next;
        application.review = ReviewData::default();
        application.sanction = Some(SanctionRecord {
            issued_at,
            amount: application.requested_amount,
            monthly_installment: super::letter::approximate_emi(application.requested_amount),
            interest_rate: ANNUAL_INTEREST_RATE.to_string(),
            installments: RECOVERY_INSTALLMENTS,
            purpose: application.app_type.purpose().to_string(),
        });
        application.updated_at = issued_at;
        self.repository.update(application.clone())?;

        self.send_notice(
            "sanction_issued",
            reference,
            &[("status", application.status.code())],
        );
        Ok(SanctionOutcome { application, letter })
    }

    /// Work queue for one desk, oldest submissions first.
    pub fn inbox(&self, role: UserRole) -> Result<Vec<InboxEntryView>, WorkflowServiceError> {
        let statuses = role.inbox_statuses();
        let mut entries: Vec<InboxEntryView> = self
            .repository
            .list()?
            .iter()
            .filter(|application| statuses.contains(&application.status))
            .map(Application::inbox_entry)
            .collect();
        entries.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        Ok(entries)
    }

    pub fn application(
        &self,
        reference: &ReferenceNo,
    ) -> Result<Application, WorkflowServiceError> {
        self.fetch(reference)
    }

    pub fn progress(
        &self,
        reference: &ReferenceNo,
    ) -> Result<WorkflowProgressView, WorkflowServiceError> {
        let application = self.fetch(reference)?;
        Ok(pipeline::progress_view(application.status))
    }

    fn fetch(&self, reference: &ReferenceNo) -> Result<Application, WorkflowServiceError> {
        let application = self
            .repository
            .fetch(reference)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(application)
    }

    fn send_notice(&self, template: &str, reference: &ReferenceNo, details: &[(&str, &str)]) {
        let notice = WorkflowNotice {
            template: template.to_string(),
            reference: reference.clone(),
            details: details
                .iter()
                .map(|&(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };
        // Best effort: the workflow outcome stands even when the notice
        // cannot be delivered.
        if let Err(err) = self.notifier.notify(notice) {
            warn!(%reference, template, "workflow notice not delivered: {err}");
        }
    }
}

/// Result of issuing a sanction: the updated application plus the rendered
/// letter for download.
#[derive(Debug, Clone)]
pub struct SanctionOutcome {
    pub application: Application,
    pub letter: LetterArtifact,
}

/// Gates on the applicant correction flow that sit in front of the status
/// machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrectionError {
    #[error("role {} may not re-upload applicant documents", .role.label())]
    NotApplicant { role: UserRole },
    #[error("application is {} and not open for correction", .status.label())]
    NotOpenForCorrection { status: AppStatus },
    #[error("document {key} is not rejected, there is nothing to replace")]
    NotRejected { key: DocumentKey },
}

#[derive(Debug, Error)]
pub enum WorkflowServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Correction(#[from] CorrectionError),
    #[error(transparent)]
    Upload(#[from] UploadRejected),
    #[error(transparent)]
    Documents(#[from] DocumentStoreError),
    #[error(transparent)]
    Letter(#[from] LetterError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
