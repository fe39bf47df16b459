pub mod applications;

pub mod checklist;
pub mod domain;
pub mod eligibility;
pub mod machine;
pub mod pipeline;
pub mod review;
pub mod roles;

pub use checklist::{ChecklistCatalog, ChecklistSection, DocumentKey};
pub use domain::{AppStatus, ApplicationType, ReviewAction, WorkflowAction};
pub use machine::{TransitionError, TransitionOutcome};
pub use review::ReviewData;
pub use roles::UserRole;
