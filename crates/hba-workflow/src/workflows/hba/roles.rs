use crate::workflows::hba::domain::{AppStatus, WorkflowAction};
use serde::{Deserialize, Serialize};

/// Desks that participate in the approval chain, plus the applicant. Wire
/// codes keep the short department forms used by stored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Applicant,
    #[serde(rename = "ES")]
    EmployeeServices,
    Law,
    Engineering,
    #[serde(rename = "HR")]
    HumanResources,
    Finance,
    #[serde(rename = "ED")]
    ExecutiveDirector,
}

impl UserRole {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Applicant,
            Self::EmployeeServices,
            Self::Law,
            Self::Engineering,
            Self::HumanResources,
            Self::Finance,
            Self::ExecutiveDirector,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Applicant => "Applicant",
            Self::EmployeeServices => "Employee Services",
            Self::Law => "Law",
            Self::Engineering => "Engineering",
            Self::HumanResources => "Human Resources",
            Self::Finance => "Finance",
            Self::ExecutiveDirector => "Executive Director",
        }
    }

    /// Stable wire code, identical to the serde form.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Applicant => "Applicant",
            Self::EmployeeServices => "ES",
            Self::Law => "Law",
            Self::Engineering => "Engineering",
            Self::HumanResources => "HR",
            Self::Finance => "Finance",
            Self::ExecutiveDirector => "ED",
        }
    }

    pub fn parse_code(value: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|role| role.code() == value.trim())
    }

    /// Actions this role may ever fire. Recommending desks forward files
    /// without own approval authority; approving desks grant clearances.
    /// Every reviewer desk may also return a file to the applicant.
    pub const fn permitted_actions(self) -> &'static [WorkflowAction] {
        match self {
            Self::Applicant => &[WorkflowAction::Submit],
            Self::EmployeeServices | Self::Finance | Self::Law => {
                &[WorkflowAction::Return, WorkflowAction::Recommend]
            }
            Self::HumanResources | Self::Engineering | Self::ExecutiveDirector => {
                &[WorkflowAction::Return, WorkflowAction::Approve]
            }
        }
    }

    pub fn may_fire(self, action: WorkflowAction) -> bool {
        self.permitted_actions().contains(&action)
    }

    /// Statuses that land in this role's inbox. The HR desk also clears the
    /// employee-relations pass, and Employee Services shepherds the file at
    /// intake, after finance concurrence, and at sanction issuance.
    pub const fn inbox_statuses(self) -> &'static [AppStatus] {
        match self {
            Self::Applicant => &[AppStatus::Returned],
            Self::EmployeeServices => &[
                AppStatus::Submitted,
                AppStatus::ApprovedFinance,
                AppStatus::ApprovedByEd,
            ],
            Self::Law => &[AppStatus::PendingLaw],
            Self::Engineering => &[AppStatus::PendingEngg],
            Self::HumanResources => &[AppStatus::PendingHr, AppStatus::PendingRelations],
            Self::Finance => &[AppStatus::PendingFinance],
            Self::ExecutiveDirector => &[AppStatus::PendingEd],
        }
    }

    /// Fixed desk profile for signature blocks and inbox headers.
    pub const fn profile(self) -> ReviewerProfile {
        match self {
            Self::Applicant => ReviewerProfile {
                name: "Manish Kumar Sharma",
                employee_no: "00510674",
                designation: "Manager (LPG)",
                department: "LPG Operations",
                grade: "C (Manager)",
                location: "Gurgaon BP",
                email: "sharmamk6@indianoil.in",
            },
            Self::EmployeeServices => ReviewerProfile {
                name: "Shreeja Das",
                employee_no: "00510299",
                designation: "Manager (ES)",
                department: "Human Resources",
                grade: "C (Manager)",
                location: "State Office",
                email: "shreeja.das@indianoil.in",
            },
            Self::Law => ReviewerProfile {
                name: "Abhay Airan",
                employee_no: "00507846",
                designation: "Senior Law Officer",
                department: "State Office",
                grade: "C (Senior Officer)",
                location: "Regional Office",
                email: "abhay.airan@indianoil.in",
            },
            Self::Engineering => ReviewerProfile {
                name: "Karthik Nair",
                employee_no: "00388210",
                designation: "Chief Engineer (Civil)",
                department: "State Office",
                grade: "E (Chief Manager)",
                location: "State Office",
                email: "karthik.n@indianoil.in",
            },
            Self::HumanResources => ReviewerProfile {
                name: "Rimil Sing Soren",
                employee_no: "00082900",
                designation: "Senior Manager (HR)",
                department: "Human Resources",
                grade: "D (Senior Manager)",
                location: "State Office",
                email: "rimil.soren@indianoil.in",
            },
            Self::Finance => ReviewerProfile {
                name: "Shubham Deep",
                employee_no: "00515260",
                designation: "Manager (Finance)",
                department: "State Office",
                grade: "C (Manager)",
                location: "State Office",
                email: "shubham.deep@indianoil.in",
            },
            Self::ExecutiveDirector => ReviewerProfile {
                name: "Rajeev Kumar",
                employee_no: "12345678",
                designation: "Executive Director",
                department: "Regional Office",
                grade: "H (Executive Director)",
                location: "Regional Office",
                email: "rajeev.k@indianoil.in",
            },
        }
    }
}

/// Which desk currently holds files in the given status.
pub const fn desk_for(status: AppStatus) -> Option<UserRole> {
    match status {
        AppStatus::Draft | AppStatus::Returned => Some(UserRole::Applicant),
        AppStatus::Submitted | AppStatus::ApprovedFinance | AppStatus::ApprovedByEd => {
            Some(UserRole::EmployeeServices)
        }
        AppStatus::PendingLaw => Some(UserRole::Law),
        AppStatus::PendingHr | AppStatus::PendingRelations => Some(UserRole::HumanResources),
        AppStatus::PendingEngg => Some(UserRole::Engineering),
        AppStatus::PendingFinance => Some(UserRole::Finance),
        AppStatus::PendingEd => Some(UserRole::ExecutiveDirector),
        AppStatus::Sanctioned | AppStatus::Approved => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReviewerProfile {
    pub name: &'static str,
    pub employee_no: &'static str,
    pub designation: &'static str,
    pub department: &'static str,
    pub grade: &'static str,
    pub location: &'static str,
    pub email: &'static str,
}
