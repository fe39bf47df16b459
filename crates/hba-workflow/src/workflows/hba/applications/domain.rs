use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::workflows::hba::checklist::DocumentKey;
use crate::workflows::hba::domain::{AppStatus, ApplicationType, CasePriority, EmployeeNo};
use crate::workflows::hba::eligibility::{EligibilityAssessment, SalaryBasis};
use crate::workflows::hba::pipeline;
use crate::workflows::hba::review::{ActionItem, ReviewData};
use crate::workflows::hba::roles;

use super::documents::DocumentUpload;

/// Reference number allocated at submission, canonically `HBA/<year>/<serial>`.
///
/// URL path segments use the hyphenated spelling (`HBA-2026-042`); both forms
/// parse to the same canonical value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReferenceNo(String);

impl ReferenceNo {
    pub(crate) fn allocate(year: i32, serial: u64) -> Self {
        Self(format!("HBA/{year}/{serial:03}"))
    }

    pub fn parse(value: &str) -> Result<Self, ParseReferenceError> {
        let normalized = value.trim().replace('-', "/");
        let mut parts = normalized.split('/');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some("HBA"), Some(year), Some(serial), None)
                if year.len() == 4
                    && year.bytes().all(|b| b.is_ascii_digit())
                    && !serial.is_empty()
                    && serial.bytes().all(|b| b.is_ascii_digit()) =>
            {
                Ok(Self(format!("HBA/{year}/{serial}")))
            }
            _ => Err(ParseReferenceError {
                value: value.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hyphenated form safe to embed in a URL path.
    pub fn path_segment(&self) -> String {
        self.0.replace('/', "-")
    }
}

impl fmt::Display for ReferenceNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ReferenceNo {
    type Err = ParseReferenceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for ReferenceNo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReferenceNo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid application reference")]
pub struct ParseReferenceError {
    pub value: String,
}

/// Identity block captured on the application form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub name: String,
    pub designation: String,
    pub department: String,
    pub employee_no: EmployeeNo,
}

/// Pointer to a document persisted by a [`super::DocumentStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub file_name: String,
    pub storage_key: String,
}

/// One checklist line on an inbound submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmittedItem {
    Upload(DocumentUpload),
    NotApplicable,
}

/// How an accepted application covers one checklist line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemFulfillment {
    Received { document: DocumentRef },
    NotApplicable,
}

/// Application form as handed over by the applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSubmission {
    pub applicant: Applicant,
    pub app_type: ApplicationType,
    pub is_bank_transfer: bool,
    pub property_location: String,
    pub requested_amount: u64,
    /// Falls back to the reference salary figures when omitted.
    #[serde(default)]
    pub salary: SalaryBasis,
    pub items: BTreeMap<DocumentKey, SubmittedItem>,
}

/// Terms recorded when the sanction order goes out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanctionRecord {
    pub issued_at: DateTime<Utc>,
    pub amount: u64,
    pub monthly_installment: u64,
    pub interest_rate: String,
    pub installments: u32,
    pub purpose: String,
}

/// The stored application aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub reference: ReferenceNo,
    pub applicant: Applicant,
    pub app_type: ApplicationType,
    pub is_bank_transfer: bool,
    pub property_location: String,
    pub requested_amount: u64,
    pub salary: SalaryBasis,
    pub fulfillment: BTreeMap<DocumentKey, ItemFulfillment>,
    pub status: AppStatus,
    #[serde(default)]
    pub review: ReviewData,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sanction: Option<SanctionRecord>,
}

impl Application {
    pub fn assessment(&self) -> EligibilityAssessment {
        self.salary.assess(self.requested_amount)
    }

    /// High priority when the requested amount runs close to the entitlement.
    pub fn priority(&self) -> CasePriority {
        match self.assessment() {
            EligibilityAssessment::NearCeiling { .. } => CasePriority::High,
            _ => CasePriority::Normal,
        }
    }

    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            reference: self.reference.clone(),
            status: self.status,
            status_label: self.status.label(),
            completed_steps: pipeline::completed_steps(self.status),
            total_steps: pipeline::TOTAL_STEPS,
            pending_with: roles::desk_for(self.status).map(|role| role.label()),
            action_items: self.review.action_items(),
            submitted_at: self.submitted_at,
            updated_at: self.updated_at,
            sanction: self.sanction.clone(),
        }
    }

    pub fn inbox_entry(&self) -> InboxEntryView {
        InboxEntryView {
            reference: self.reference.clone(),
            applicant: self.applicant.clone(),
            app_type: self.app_type,
            purpose: self.app_type.purpose(),
            requested_amount: self.requested_amount,
            status: self.status,
            status_label: self.status.label(),
            priority: self.priority(),
            submitted_at: self.submitted_at,
        }
    }
}

/// Snapshot reported back to the applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationStatusView {
    pub reference: ReferenceNo,
    pub status: AppStatus,
    pub status_label: &'static str,
    pub completed_steps: usize,
    pub total_steps: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_with: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub action_items: Vec<ActionItem>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanction: Option<SanctionRecord>,
}

/// Row in a reviewer's work queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboxEntryView {
    pub reference: ReferenceNo,
    pub applicant: Applicant,
    pub app_type: ApplicationType,
    pub purpose: &'static str,
    pub requested_amount: u64,
    pub status: AppStatus,
    pub status_label: &'static str,
    pub priority: CasePriority,
    pub submitted_at: DateTime<Utc>,
}
