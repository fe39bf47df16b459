use thiserror::Error;

use crate::workflows::hba::checklist::{ChecklistCatalog, DocumentKey};
use crate::workflows::hba::domain::EmployeeNo;

use super::domain::ApplicationSubmission;

/// Admission gate for new applications. A submission is only accepted when
/// the form fields are well formed, the amount sits inside the entitlement,
/// and every required checklist line is covered by an upload or an explicit
/// not-applicable marking.
#[derive(Debug, Clone, Default)]
pub struct ChecklistGuard {
    catalog: ChecklistCatalog,
}

impl ChecklistGuard {
    pub fn standard() -> Self {
        Self {
            catalog: ChecklistCatalog::standard(),
        }
    }

    pub fn catalog(&self) -> &ChecklistCatalog {
        &self.catalog
    }

    pub fn validate(&self, submission: &ApplicationSubmission) -> Result<(), IntakeError> {
        let raw_no = submission.applicant.employee_no.as_str();
        if !EmployeeNo::is_well_formed(raw_no) {
            return Err(IntakeError::InvalidEmployeeNo {
                value: raw_no.to_string(),
            });
        }
        if submission.applicant.name.trim().is_empty() {
            return Err(IntakeError::MissingApplicantName);
        }
        if submission.property_location.trim().is_empty() {
            return Err(IntakeError::MissingPropertyLocation);
        }
        if submission.requested_amount == 0 {
            return Err(IntakeError::ZeroAmount);
        }

        let assessment = submission.salary.assess(submission.requested_amount);
        if assessment.is_exceeded() {
            return Err(IntakeError::ExceedsEntitlement {
                requested: submission.requested_amount,
                limit: assessment.limit(),
            });
        }

        for &key in submission.items.keys() {
            if self.catalog.item(key).is_none() {
                return Err(IntakeError::UnknownItem { key });
            }
            if !key
                .section
                .applies_to(submission.app_type, submission.is_bank_transfer)
            {
                return Err(IntakeError::InactiveSection { key });
            }
        }

        for key in self
            .catalog
            .required_keys(submission.app_type, submission.is_bank_transfer)
        {
            if !submission.items.contains_key(&key) {
                return Err(IntakeError::MissingRequired { key });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error("employee number '{value}' must be exactly eight digits")]
    InvalidEmployeeNo { value: String },
    #[error("applicant name is required")]
    MissingApplicantName,
    #[error("property location is required")]
    MissingPropertyLocation,
    #[error("requested amount must be greater than zero")]
    ZeroAmount,
    #[error("requested amount {requested} exceeds the entitlement limit of {limit}")]
    ExceedsEntitlement { requested: u64, limit: u64 },
    #[error("document {key} is not part of the checklist")]
    UnknownItem { key: DocumentKey },
    #[error("document {key} belongs to a section not collected for this application")]
    InactiveSection { key: DocumentKey },
    #[error("required document {key} is neither uploaded nor marked not applicable")]
    MissingRequired { key: DocumentKey },
}
