use crate::workflows::hba::domain::ApplicationType;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The four parts of the document checklist. Which parts apply to an
/// application depends on its purchase mode and repayment route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChecklistSection {
    #[serde(rename = "partA")]
    PartA,
    #[serde(rename = "partB")]
    PartB,
    #[serde(rename = "partC")]
    PartC,
    #[serde(rename = "partD")]
    PartD,
}

impl ChecklistSection {
    pub const fn ordered() -> [Self; 4] {
        [Self::PartA, Self::PartB, Self::PartC, Self::PartD]
    }

    /// Short key used inside document identifiers, e.g. the `partA` in `partA-7`.
    pub const fn key(self) -> &'static str {
        match self {
            Self::PartA => "partA",
            Self::PartB => "partB",
            Self::PartC => "partC",
            Self::PartD => "partD",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::PartA => "General Documents",
            Self::PartB => "Resale Specifics",
            Self::PartC => "Construction Specifics",
            Self::PartD => "Bank Repayment",
        }
    }

    pub fn parse_key(value: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|section| section.key() == value)
    }

    /// Whether this section is collected for the given application shape.
    /// Part A is always collected; the others hang off the purchase mode
    /// and the bank-transfer flag.
    pub const fn applies_to(self, app_type: ApplicationType, is_bank_transfer: bool) -> bool {
        match self {
            Self::PartA => true,
            Self::PartB => matches!(app_type, ApplicationType::Resale),
            Self::PartC => matches!(app_type, ApplicationType::UnderConstruction),
            Self::PartD => is_bank_transfer,
        }
    }
}

/// Identifies one checklist document, e.g. `partA-7`. The rendered form is
/// the stable convention used in stored records, review payloads, and URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentKey {
    pub section: ChecklistSection,
    pub id: u8,
}

impl DocumentKey {
    pub const fn new(section: ChecklistSection, id: u8) -> Self {
        Self { section, id }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.section.key(), self.id)
    }
}

impl FromStr for DocumentKey {
    type Err = ParseDocumentKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseDocumentKeyError {
            value: value.to_string(),
        };

        let (section, id) = value.split_once('-').ok_or_else(malformed)?;
        let section = ChecklistSection::parse_key(section).ok_or_else(malformed)?;
        let id = id.parse::<u8>().map_err(|_| malformed())?;
        if id == 0 {
            return Err(malformed());
        }

        Ok(Self { section, id })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed document key '{value}': expected a form like 'partA-7'")]
pub struct ParseDocumentKeyError {
    pub value: String,
}

impl Serialize for DocumentKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocumentKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// Whether the desk expects the original instrument or accepts a photocopy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentForm {
    Original,
    Xerox,
}

impl DocumentForm {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Original => "Original",
            Self::Xerox => "Xerox",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    pub key: DocumentKey,
    pub label: &'static str,
    pub required: bool,
    pub form: DocumentForm,
}

#[derive(Debug, Clone)]
pub struct SectionChecklist {
    pub section: ChecklistSection,
    pub items: Vec<ChecklistItem>,
}

impl SectionChecklist {
    pub fn view(&self) -> ChecklistSectionView {
        ChecklistSectionView {
            section: self.section,
            title: self.section.title(),
            items: self.items.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChecklistSectionView {
    pub section: ChecklistSection,
    pub title: &'static str,
    pub items: Vec<ChecklistItem>,
}

/// The fixed document catalog collected with every application.
#[derive(Debug, Clone)]
pub struct ChecklistCatalog {
    sections: [SectionChecklist; 4],
}

impl ChecklistCatalog {
    pub fn standard() -> Self {
        Self {
            sections: [
                SectionChecklist {
                    section: ChecklistSection::PartA,
                    items: section_items(ChecklistSection::PartA, PART_A_ITEMS),
                },
                SectionChecklist {
                    section: ChecklistSection::PartB,
                    items: section_items(ChecklistSection::PartB, PART_B_ITEMS),
                },
                SectionChecklist {
                    section: ChecklistSection::PartC,
                    items: section_items(ChecklistSection::PartC, PART_C_ITEMS),
                },
                SectionChecklist {
                    section: ChecklistSection::PartD,
                    items: section_items(ChecklistSection::PartD, PART_D_ITEMS),
                },
            ],
        }
    }

    pub fn section(&self, section: ChecklistSection) -> &SectionChecklist {
        &self.sections[section as usize]
    }

    pub fn item(&self, key: DocumentKey) -> Option<&ChecklistItem> {
        let index = (key.id as usize).checked_sub(1)?;
        self.section(key.section).items.get(index)
    }

    pub fn active_sections(
        &self,
        app_type: ApplicationType,
        is_bank_transfer: bool,
    ) -> Vec<&SectionChecklist> {
        self.sections
            .iter()
            .filter(|section| section.section.applies_to(app_type, is_bank_transfer))
            .collect()
    }

    pub fn active_view(
        &self,
        app_type: ApplicationType,
        is_bank_transfer: bool,
    ) -> Vec<ChecklistSectionView> {
        self.active_sections(app_type, is_bank_transfer)
            .into_iter()
            .map(SectionChecklist::view)
            .collect()
    }

    /// Keys the applicant must cover (upload or mark not applicable) for the
    /// given application shape.
    pub fn required_keys(
        &self,
        app_type: ApplicationType,
        is_bank_transfer: bool,
    ) -> Vec<DocumentKey> {
        self.active_sections(app_type, is_bank_transfer)
            .into_iter()
            .flat_map(|section| section.items.iter())
            .filter(|item| item.required)
            .map(|item| item.key)
            .collect()
    }
}

impl Default for ChecklistCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn section_items(
    section: ChecklistSection,
    specs: &[(&'static str, bool, DocumentForm)],
) -> Vec<ChecklistItem> {
    specs
        .iter()
        .enumerate()
        .map(|(index, &(label, required, form))| ChecklistItem {
            key: DocumentKey::new(section, index as u8 + 1),
            label,
            required,
            form,
        })
        .collect()
}

const PART_A_ITEMS: &[(&str, bool, DocumentForm)] = &[
    (
        "Covering letter along with check list for the documents submitted",
        true,
        DocumentForm::Original,
    ),
    ("Application Form duly filled", true, DocumentForm::Original),
    ("Letter of Undertaking", true, DocumentForm::Original),
    (
        "Declaration (Rs.100/- franking & duly Notarized)",
        true,
        DocumentForm::Original,
    ),
    (
        "Agreement (Rs.100/- franking only)",
        true,
        DocumentForm::Original,
    ),
    (
        "Latest salary slips of Loanee employee & Surety",
        true,
        DocumentForm::Original,
    ),
    (
        "Surety Bond (Rs.100/- franking only)",
        true,
        DocumentForm::Original,
    ),
    (
        "Gratuity Undertaking (Rs.100/- franking & duly Notarized)",
        true,
        DocumentForm::Original,
    ),
    (
        "Irrevocable Letter of Undertaking-cum Declaration as per IOC's Proforma on Rs.100/- Stamp paper",
        true,
        DocumentForm::Original,
    ),
    (
        "NOC from Builder/Society on their Letterhead, as per the IOC format",
        true,
        DocumentForm::Original,
    ),
    (
        "Title Clearance-cum-Search Report by an Advocates (Latest Original). Search for 30 years",
        true,
        DocumentForm::Original,
    ),
    (
        "Receipt obtained for carrying out Search Report",
        true,
        DocumentForm::Original,
    ),
    (
        "Valuation Report from Govt. Approved valuer along with his Registration Certificate",
        true,
        DocumentForm::Original,
    ),
    (
        "Money Receipts and Possession letter",
        true,
        DocumentForm::Original,
    ),
    (
        "Copy of Approved Blue Print of the construction with the flat earmarked duly certified by an Architect",
        true,
        DocumentForm::Original,
    ),
    (
        "Indemnity Bond as per IOC's Proforma (Gram Panchayat cases)",
        false,
        DocumentForm::Original,
    ),
    (
        "Permission from Local authority in case Flat/House constructed on agricultural land",
        false,
        DocumentForm::Xerox,
    ),
    (
        "Declaration from Spouse in case of joint registration",
        true,
        DocumentForm::Original,
    ),
    (
        "Completion of Equitable Mortgage Formality by submission of relevant documents available in A&W",
        true,
        DocumentForm::Original,
    ),
    (
        "Commencement Certificate issued by Local Authority",
        true,
        DocumentForm::Xerox,
    ),
    (
        "Occupation Certificate issued by Local Authority",
        true,
        DocumentForm::Xerox,
    ),
    (
        "Advocate/ Government letter stating property is not under Urban & Ceiling and Regulation Act 1976",
        true,
        DocumentForm::Xerox,
    ),
    (
        "Approval, if any, required from the Govt. of Maharashtra Housing Department to Mortgage the flat with IOC",
        false,
        DocumentForm::Xerox,
    ),
    (
        "Completion of Mortgage Formality by submission of all original documents",
        true,
        DocumentForm::Original,
    ),
    (
        "Any other documents as and when required after perusal of the document submitted",
        false,
        DocumentForm::Original,
    ),
];

const PART_B_ITEMS: &[(&str, bool, DocumentForm)] = &[
    (
        "Sale Deed of Flat/house between employee & the seller",
        true,
        DocumentForm::Original,
    ),
    (
        "Sale Deed of Flat/House between the Builder & seller",
        true,
        DocumentForm::Xerox,
    ),
    (
        "Lodgment Receipt in original issued by Sub-Registrar of Assurance",
        true,
        DocumentForm::Original,
    ),
    (
        "Society's / Association's Registration Certificate",
        true,
        DocumentForm::Xerox,
    ),
    (
        "Share Certificate issued by Society",
        true,
        DocumentForm::Original,
    ),
    ("Society's Bylaws", true, DocumentForm::Xerox),
];

const PART_C_ITEMS: &[(&str, bool, DocumentForm)] = &[
    (
        "Agreement to Sell/Sale Deed of Flat/house between employee & Developer",
        true,
        DocumentForm::Original,
    ),
    (
        "Stamp Duty/Registration Receipt",
        true,
        DocumentForm::Original,
    ),
    (
        "Deed of Partnership in case of Partnership Firm",
        true,
        DocumentForm::Xerox,
    ),
    (
        "Power of Attorney Authorizing any of the partners to sign all documents",
        true,
        DocumentForm::Xerox,
    ),
    (
        "Progress Report from Registered Architect for the status of construction",
        true,
        DocumentForm::Original,
    ),
];

const PART_D_ITEMS: &[(&str, bool, DocumentForm)] = &[
    (
        "Loan Agreement between employee and Bank/FI",
        true,
        DocumentForm::Xerox,
    ),
    (
        "Letter from Bank stating the Principle Loan outstanding",
        true,
        DocumentForm::Original,
    ),
    (
        "Letter from Bank stating the Original documents mortgaged with them",
        true,
        DocumentForm::Original,
    ),
    (
        "Document transfer consent letter from Bank/FI",
        true,
        DocumentForm::Original,
    ),
    (
        "Money Receipt-cum-mortgage release letter from Bank/FI",
        true,
        DocumentForm::Original,
    ),
];
