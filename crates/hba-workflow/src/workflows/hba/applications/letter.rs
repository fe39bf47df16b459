use serde::Serialize;
use thiserror::Error;

use super::domain::Application;

/// Fixed terms printed on every sanction order.
pub const ANNUAL_INTEREST_RATE: &str = "7.1% p.a.";
pub const RECOVERY_INSTALLMENTS: u32 = 240;
pub const LETTER_SIGNATORY: &str = "Senior Manager (ES)";
pub const LETTER_SUBJECT: &str = "Sanction of House Building Allowance (HBA)";

/// Rounded combined principal-plus-interest installment quoted on the letter.
pub fn approximate_emi(amount: u64) -> u64 {
    let amount = amount as f64;
    (amount * 0.00711 + amount / RECOVERY_INSTALLMENTS as f64).round() as u64
}

/// Everything a renderer needs to lay out the sanction letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SanctionLetterData {
    pub reference: super::domain::ReferenceNo,
    pub applicant_name: String,
    pub designation: String,
    pub employee_no: String,
    pub amount: u64,
    pub monthly_installment: u64,
    pub property_location: String,
    pub purpose: &'static str,
    pub interest_rate: &'static str,
    pub installments: u32,
    pub subject: &'static str,
    pub signatory: &'static str,
}

impl SanctionLetterData {
    pub fn for_application(application: &Application) -> Self {
        Self {
            reference: application.reference.clone(),
            applicant_name: application.applicant.name.clone(),
            designation: application.applicant.designation.clone(),
            employee_no: application.applicant.employee_no.to_string(),
            amount: application.requested_amount,
            monthly_installment: approximate_emi(application.requested_amount),
            property_location: application.property_location.clone(),
            purpose: application.app_type.purpose(),
            interest_rate: ANNUAL_INTEREST_RATE,
            installments: RECOVERY_INSTALLMENTS,
            subject: LETTER_SUBJECT,
            signatory: LETTER_SIGNATORY,
        }
    }
}

/// Rendered letter plus the media type it was produced in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterArtifact {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Producer of the final sanction letter document.
pub trait LetterRenderer: Send + Sync {
    fn render(&self, data: &SanctionLetterData) -> Result<LetterArtifact, LetterError>;
}

#[derive(Debug, Error)]
pub enum LetterError {
    #[error("letter rendering failed: {0}")]
    Render(String),
}
