use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::hba::applications::documents::{
    DocumentStore, DocumentStoreError, DocumentUpload,
};
use crate::workflows::hba::applications::domain::{
    Applicant, Application, ApplicationSubmission, DocumentRef, ReferenceNo, SubmittedItem,
};
use crate::workflows::hba::applications::letter::{
    LetterArtifact, LetterError, LetterRenderer, SanctionLetterData,
};
use crate::workflows::hba::applications::repository::{
    ApplicationRepository, Notifier, NotifyError, RepositoryError, WorkflowNotice,
};
use crate::workflows::hba::applications::{application_router, HbaApplicationService};
use crate::workflows::hba::checklist::{ChecklistCatalog, DocumentKey};
use crate::workflows::hba::domain::{AppStatus, ApplicationType, EmployeeNo, ReviewAction};
use crate::workflows::hba::review::ReviewData;
use crate::workflows::hba::roles::UserRole;

pub(super) fn applicant() -> Applicant {
    Applicant {
        name: "Manish Kumar Sharma".to_string(),
        designation: "Manager (LPG)".to_string(),
        department: "LPG Operations".to_string(),
        employee_no: EmployeeNo::new("00510674").expect("valid employee number"),
    }
}

pub(super) fn pdf_upload(name: &str) -> DocumentUpload {
    DocumentUpload {
        file_name: format!("{name}.pdf"),
        size_bytes: 180_000,
        content_type: "application/pdf".to_string(),
    }
}

/// Uploads for every required key of the given application shape.
pub(super) fn complete_items(
    app_type: ApplicationType,
    is_bank_transfer: bool,
) -> BTreeMap<DocumentKey, SubmittedItem> {
    ChecklistCatalog::standard()
        .required_keys(app_type, is_bank_transfer)
        .into_iter()
        .map(|key| {
            (
                key,
                SubmittedItem::Upload(pdf_upload(&key.to_string())),
            )
        })
        .collect()
}

/// A complete resale purchase application with bank repayment, comfortably
/// inside the entitlement.
pub(super) fn submission() -> ApplicationSubmission {
    ApplicationSubmission {
        applicant: applicant(),
        app_type: ApplicationType::Resale,
        is_bank_transfer: true,
        property_location: "Sector 45, Gurgaon".to_string(),
        requested_amount: 4_000_000,
        salary: Default::default(),
        items: complete_items(ApplicationType::Resale, true),
    }
}

pub(super) fn construction_submission() -> ApplicationSubmission {
    ApplicationSubmission {
        applicant: applicant(),
        app_type: ApplicationType::UnderConstruction,
        is_bank_transfer: false,
        property_location: "Plot 12, Rohtak Road".to_string(),
        requested_amount: 3_200_000,
        salary: Default::default(),
        items: complete_items(ApplicationType::UnderConstruction, false),
    }
}

/// Close enough to the entitlement ceiling to be flagged high priority.
pub(super) fn near_ceiling_submission() -> ApplicationSubmission {
    let mut submission = submission();
    submission.requested_amount = 6_000_000;
    submission
}

pub(super) fn build_service() -> (
    HbaApplicationService<MemoryRepository, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = HbaApplicationService::new(
        repository.clone(),
        notifier.clone(),
        Arc::new(MemoryDocumentStore::default()),
        Arc::new(StaticLetterRenderer),
    );
    (service, repository, notifier)
}

pub(super) fn application_router_with_service(
    service: HbaApplicationService<MemoryRepository, MemoryNotifier>,
) -> axum::Router {
    application_router(Arc::new(service))
}

/// Walks scripted clean decisions until the application reaches `target`.
pub(super) fn drive_to(
    service: &HbaApplicationService<MemoryRepository, MemoryNotifier>,
    reference: &ReferenceNo,
    target: AppStatus,
) -> Application {
    let mut application = service.application(reference).expect("application exists");
    while application.status != target {
        let (role, action) = next_decision(application.status);
        application = service
            .decide(reference, role, action, ReviewData::default())
            .expect("scripted decision succeeds");
    }
    application
}

fn next_decision(status: AppStatus) -> (UserRole, ReviewAction) {
    match status {
        AppStatus::Submitted => (UserRole::EmployeeServices, ReviewAction::Recommend),
        AppStatus::PendingLaw => (UserRole::Law, ReviewAction::Recommend),
        AppStatus::PendingHr => (UserRole::HumanResources, ReviewAction::Approve),
        AppStatus::PendingEngg => (UserRole::Engineering, ReviewAction::Approve),
        AppStatus::PendingRelations => (UserRole::HumanResources, ReviewAction::Approve),
        AppStatus::PendingFinance => (UserRole::Finance, ReviewAction::Recommend),
        AppStatus::ApprovedFinance => (UserRole::EmployeeServices, ReviewAction::Recommend),
        AppStatus::PendingEd => (UserRole::ExecutiveDirector, ReviewAction::Approve),
        other => panic!("no scripted decision from {other:?}"),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ReferenceNo, Application>>>,
}

impl ApplicationRepository for MemoryRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&application.reference) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.reference.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, application: Application) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(application.reference.clone(), application);
        Ok(())
    }

    fn fetch(&self, reference: &ReferenceNo) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(reference).cloned())
    }

    fn list(&self) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    notices: Arc<Mutex<Vec<WorkflowNotice>>>,
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<WorkflowNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notice: WorkflowNotice) -> Result<(), NotifyError> {
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _notice: WorkflowNotice) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp relay down".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryDocumentStore {
    stored: Mutex<Vec<(ReferenceNo, DocumentKey, String)>>,
}

impl DocumentStore for MemoryDocumentStore {
    fn store(
        &self,
        reference: &ReferenceNo,
        key: DocumentKey,
        upload: &DocumentUpload,
    ) -> Result<DocumentRef, DocumentStoreError> {
        let storage_key = format!("mem://hba/{}/{key}/{}", reference.path_segment(), upload.file_name);
        self.stored
            .lock()
            .expect("document store mutex poisoned")
            .push((reference.clone(), key, storage_key.clone()));
        Ok(DocumentRef {
            file_name: upload.file_name.clone(),
            storage_key,
        })
    }
}

pub(super) struct StaticLetterRenderer;

impl LetterRenderer for StaticLetterRenderer {
    fn render(&self, data: &SanctionLetterData) -> Result<LetterArtifact, LetterError> {
        Ok(LetterArtifact {
            content_type: "application/pdf".to_string(),
            bytes: format!("{} / {}", data.subject, data.reference).into_bytes(),
        })
    }
}

pub(super) struct FailingLetterRenderer;

impl LetterRenderer for FailingLetterRenderer {
    fn render(&self, _data: &SanctionLetterData) -> Result<LetterArtifact, LetterError> {
        Err(LetterError::Render("renderer offline".to_string()))
    }
}

pub(super) struct ConflictRepository;

impl ApplicationRepository for ConflictRepository {
    fn insert(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _application: Application) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _reference: &ReferenceNo) -> Result<Option<Application>, RepositoryError> {
        Ok(None)
    }

    fn list(&self) -> Result<Vec<Application>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _application: Application) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _reference: &ReferenceNo) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn key(raw: &str) -> DocumentKey {
    raw.parse().expect("valid document key")
}
