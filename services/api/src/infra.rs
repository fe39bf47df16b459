use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use hba_workflow::config::DirectoryConfig;
use hba_workflow::error::AppError;
use hba_workflow::workflows::directory::EmployeeDirectory;
use hba_workflow::workflows::hba::applications::{
    Application, ApplicationRepository, DocumentRef, DocumentStore, DocumentStoreError,
    DocumentUpload, LetterArtifact, LetterError, LetterRenderer, Notifier, NotifyError,
    ReferenceNo, RepositoryError, SanctionLetterData, WorkflowNotice,
};
use hba_workflow::workflows::hba::DocumentKey;
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Seeded desk directory, hydrated on top with the configured roster export
/// when one is present.
pub(crate) fn load_directory(config: &DirectoryConfig) -> Result<EmployeeDirectory, AppError> {
    let mut directory = EmployeeDirectory::seeded();
    if let Some(path) = &config.csv_path {
        let roster = EmployeeDirectory::from_path(path)?;
        for record in roster.records() {
            directory.insert(record.clone());
        }
    }
    Ok(directory)
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ReferenceNo, Application>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
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
        if guard.contains_key(&application.reference) {
            guard.insert(application.reference.clone(), application);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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
pub(crate) struct InMemoryNotifier {
    notices: Arc<Mutex<Vec<WorkflowNotice>>>,
}

impl Notifier for InMemoryNotifier {
    fn notify(&self, notice: WorkflowNotice) -> Result<(), NotifyError> {
        let mut guard = self.notices.lock().expect("notifier mutex poisoned");
        guard.push(notice);
        Ok(())
    }
}

impl InMemoryNotifier {
    pub(crate) fn notices(&self) -> Vec<WorkflowNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

#[derive(Default)]
pub(crate) struct InMemoryDocumentStore;

impl DocumentStore for InMemoryDocumentStore {
    fn store(
        &self,
        reference: &ReferenceNo,
        key: DocumentKey,
        upload: &DocumentUpload,
    ) -> Result<DocumentRef, DocumentStoreError> {
        Ok(DocumentRef {
            file_name: upload.file_name.clone(),
            storage_key: format!(
                "mem://hba/{}/{key}/{}",
                reference.path_segment(),
                upload.file_name
            ),
        })
    }
}

/// Lays the sanction order out as plain text. Stands in for the typesetting
/// pipeline; the workflow only cares that an artifact comes back.
pub(crate) struct PlainTextLetterRenderer;

impl LetterRenderer for PlainTextLetterRenderer {
    fn render(&self, data: &SanctionLetterData) -> Result<LetterArtifact, LetterError> {
        let body = format!(
            "{subject}\n\
             Ref: {reference}\n\n\
             Dear {name}, {designation} (Emp. No. {employee_no}),\n\n\
             Sanction of Rs. {amount} is hereby accorded towards {purpose}\n\
             at {location}.\n\n\
             The advance carries interest at {interest} and is recoverable in\n\
             {installments} monthly installments of approximately Rs. {emi}.\n\n\
             {signatory}\n",
            subject = data.subject,
            reference = data.reference,
            name = data.applicant_name,
            designation = data.designation,
            employee_no = data.employee_no,
            amount = data.amount,
            purpose = data.purpose,
            location = data.property_location,
            interest = data.interest_rate,
            installments = data.installments,
            emi = data.monthly_installment,
            signatory = data.signatory,
        );
        Ok(LetterArtifact {
            content_type: "text/plain; charset=utf-8".to_string(),
            bytes: body.into_bytes(),
        })
    }
}

/// Content type for a demo upload, derived from the file name the same way
/// a browser would fill it in.
pub(crate) fn guess_content_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
