use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::domain::{Application, ReferenceNo};

/// Storage abstraction so the service can run against an in-memory map in
/// tests and a real database in deployment.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;

    fn update(&self, application: Application) -> Result<(), RepositoryError>;

    fn fetch(&self, reference: &ReferenceNo) -> Result<Option<Application>, RepositoryError>;

    fn list(&self) -> Result<Vec<Application>, RepositoryError>;
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("an application with this reference already exists")]
    Conflict,
    #[error("application not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound notification hook. Delivery is best effort end to end; the
/// workflow never rolls back because a notice failed to go out.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: WorkflowNotice) -> Result<(), NotifyError>;
}

/// Payload handed to a [`Notifier`] after a workflow event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowNotice {
    pub template: String,
    pub reference: ReferenceNo,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
