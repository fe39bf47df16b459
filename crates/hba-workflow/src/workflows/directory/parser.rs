use std::io::Read;

use serde::{Deserialize, Deserializer};

use crate::workflows::hba::roles::UserRole;

/// One raw roster line, before employee numbers and roles are validated.
#[derive(Debug)]
pub(crate) struct RosterRow {
    pub(crate) employee_no: String,
    pub(crate) name: String,
    pub(crate) designation: String,
    pub(crate) department: String,
    pub(crate) role: String,
    pub(crate) location: String,
    pub(crate) email: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RosterRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<RosterCsvRow>() {
        let row = record?;
        rows.push(RosterRow {
            employee_no: row.employee_no,
            name: row.name,
            designation: row.designation,
            department: row.department,
            role: row.role,
            location: row.location,
            email: row.email,
        });
    }

    Ok(rows)
}

/// Maps the free-form role column onto a workflow role. HR exports are not
/// consistent about department spellings, so the match runs on a normalized
/// form.
pub(crate) fn resolve_role(value: &str) -> Option<UserRole> {
    match normalize_role(value).as_str() {
        "applicant" => Some(UserRole::Applicant),
        "es" | "employee services" => Some(UserRole::EmployeeServices),
        "law" | "law dept" | "law department" => Some(UserRole::Law),
        "engineering" | "engg" => Some(UserRole::Engineering),
        "hr" | "human resources" | "hr & er" => Some(UserRole::HumanResources),
        "finance" => Some(UserRole::Finance),
        "ed" | "executive director" => Some(UserRole::ExecutiveDirector),
        _ => None,
    }
}

fn normalize_role(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

#[derive(Debug, Deserialize)]
struct RosterCsvRow {
    #[serde(rename = "Employee No")]
    employee_no: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Designation")]
    designation: String,
    #[serde(rename = "Department")]
    department: String,
    #[serde(rename = "Role")]
    role: String,
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "Email", default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
