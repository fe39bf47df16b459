use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle states for a house building advance application.
///
/// Wire codes keep the SCREAMING_SNAKE_CASE forms carried by stored records,
/// so serialized statuses stay readable next to historic data exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppStatus {
    Draft,
    Submitted,
    PendingLaw,
    PendingHr,
    PendingEngg,
    PendingRelations,
    PendingFinance,
    ApprovedFinance,
    PendingEd,
    ApprovedByEd,
    Sanctioned,
    Returned,
    Approved,
}

impl AppStatus {
    pub const fn ordered() -> [Self; 13] {
        [
            Self::Draft,
            Self::Submitted,
            Self::PendingLaw,
            Self::PendingHr,
            Self::PendingEngg,
            Self::PendingRelations,
            Self::PendingFinance,
            Self::ApprovedFinance,
            Self::PendingEd,
            Self::ApprovedByEd,
            Self::Sanctioned,
            Self::Returned,
            Self::Approved,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::PendingLaw => "Pending with Law",
            Self::PendingHr => "Pending with HR",
            Self::PendingEngg => "Pending with Engineering",
            Self::PendingRelations => "Pending with Employee Relations",
            Self::PendingFinance => "Pending with Finance",
            Self::ApprovedFinance => "Finance Concurrence Granted",
            Self::PendingEd => "Pending with ED",
            Self::ApprovedByEd => "Approved by ED",
            Self::Sanctioned => "Sanctioned",
            Self::Returned => "Returned to Applicant",
            Self::Approved => "Approved",
        }
    }

    /// Stable wire code, identical to the serde form.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::PendingLaw => "PENDING_LAW",
            Self::PendingHr => "PENDING_HR",
            Self::PendingEngg => "PENDING_ENGG",
            Self::PendingRelations => "PENDING_RELATIONS",
            Self::PendingFinance => "PENDING_FINANCE",
            Self::ApprovedFinance => "APPROVED_FINANCE",
            Self::PendingEd => "PENDING_ED",
            Self::ApprovedByEd => "APPROVED_BY_ED",
            Self::Sanctioned => "SANCTIONED",
            Self::Returned => "RETURNED",
            Self::Approved => "APPROVED",
        }
    }

    pub fn parse_code(value: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|status| status.code() == value.trim())
    }

    /// Terminal states accept no further workflow actions.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Sanctioned | Self::Approved)
    }
}

/// Everything a participant can ask the status machine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowAction {
    Submit,
    Return,
    Recommend,
    Approve,
}

impl WorkflowAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Submit => "Submit",
            Self::Return => "Return",
            Self::Recommend => "Recommend",
            Self::Approve => "Approve",
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Submit => "SUBMIT",
            Self::Return => "RETURN",
            Self::Recommend => "RECOMMEND",
            Self::Approve => "APPROVE",
        }
    }
}

/// Subset of [`WorkflowAction`] a reviewer desk may take on a pending file.
/// Submission travels through the dedicated intake and resubmit paths instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewAction {
    Return,
    Recommend,
    Approve,
}

impl ReviewAction {
    pub const fn as_workflow_action(self) -> WorkflowAction {
        match self {
            Self::Return => WorkflowAction::Return,
            Self::Recommend => WorkflowAction::Recommend,
            Self::Approve => WorkflowAction::Approve,
        }
    }
}

/// Purchase mode declared on the application. The wire form keeps the
/// PascalCase variant names used by stored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationType {
    Resale,
    UnderConstruction,
}

impl ApplicationType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Resale => "Resale",
            Self::UnderConstruction => "Under Construction",
        }
    }

    /// Purpose line printed on the sanction letter.
    pub const fn purpose(self) -> &'static str {
        match self {
            Self::Resale => "Purchase of Resale Flat",
            Self::UnderConstruction => "Construction of House",
        }
    }
}

/// Queue ordering hint shown on reviewer inboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CasePriority {
    High,
    Normal,
}

impl CasePriority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Normal => "Normal",
        }
    }
}

/// Corporate employee number, always exactly eight digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeNo(String);

impl EmployeeNo {
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidEmployeeNo> {
        let value = value.into();
        if Self::is_well_formed(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidEmployeeNo { value })
        }
    }

    pub fn is_well_formed(value: &str) -> bool {
        value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EmployeeNo {
    type Err = InvalidEmployeeNo;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("employee number '{value}' must be exactly eight digits")]
pub struct InvalidEmployeeNo {
    pub value: String,
}
