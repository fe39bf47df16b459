//! Employee directory backing sign-in lookups, seeded with the desk
//! profiles and hydratable from the HR master roster export.

mod parser;

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::workflows::hba::domain::{EmployeeNo, InvalidEmployeeNo};
use crate::workflows::hba::roles::UserRole;

/// One directory entry, the unit returned by sign-in lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeRecord {
    pub employee_no: EmployeeNo,
    pub name: String,
    pub designation: String,
    pub department: String,
    pub role: UserRole,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EmployeeDirectory {
    records: HashMap<EmployeeNo, EmployeeRecord>,
}

impl EmployeeDirectory {
    /// Directory preloaded with the fixed desk profiles, one employee per
    /// workflow role.
    pub fn seeded() -> Self {
        let mut directory = Self::default();

        for role in UserRole::ordered() {
            let profile = role.profile();
            if let Ok(employee_no) = EmployeeNo::new(profile.employee_no) {
                directory.insert(EmployeeRecord {
                    employee_no,
                    name: profile.name.to_string(),
                    designation: profile.designation.to_string(),
                    department: profile.department.to_string(),
                    role,
                    location: profile.location.to_string(),
                    email: Some(profile.email.to_string()),
                });
            }
        }

        directory
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DirectoryImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Hydrates the directory from a roster export. Rows are rejected with
    /// their row number when the role or employee number cannot be read.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DirectoryImportError> {
        let mut directory = Self::default();

        for (index, row) in parser::parse_rows(reader)?.into_iter().enumerate() {
            // Row 1 of the export is the header line.
            let row_no = index + 2;
            let role = match parser::resolve_role(&row.role) {
                Some(role) => role,
                None => {
                    return Err(DirectoryImportError::UnknownRole {
                        row: row_no,
                        value: row.role,
                    })
                }
            };
            let employee_no = match EmployeeNo::new(row.employee_no) {
                Ok(employee_no) => employee_no,
                Err(invalid) => {
                    return Err(DirectoryImportError::InvalidEmployeeNo {
                        row: row_no,
                        value: invalid.value,
                    })
                }
            };

            directory.insert(EmployeeRecord {
                employee_no,
                name: row.name,
                designation: row.designation,
                department: row.department,
                role,
                location: row.location,
                email: row.email,
            });
        }

        Ok(directory)
    }

    /// Last write wins, so a corrected export row supersedes an earlier one.
    pub fn insert(&mut self, record: EmployeeRecord) {
        self.records.insert(record.employee_no.clone(), record);
    }

    pub fn get(&self, employee_no: &EmployeeNo) -> Option<&EmployeeRecord> {
        self.records.get(employee_no)
    }

    pub fn records(&self) -> impl Iterator<Item = &EmployeeRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Sign-in boundary: resolves an employee number to a directory record.
pub trait AuthProvider: Send + Sync {
    fn lookup(&self, employee_no: &str) -> Result<EmployeeRecord, AuthError>;
}

impl AuthProvider for EmployeeDirectory {
    fn lookup(&self, employee_no: &str) -> Result<EmployeeRecord, AuthError> {
        let employee_no = EmployeeNo::new(employee_no.trim())?;
        self.records
            .get(&employee_no)
            .cloned()
            .ok_or(AuthError::NotFound { employee_no })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error(transparent)]
    Malformed(#[from] InvalidEmployeeNo),
    #[error("no directory entry for employee number {employee_no}")]
    NotFound { employee_no: EmployeeNo },
}

#[derive(Debug)]
pub enum DirectoryImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    UnknownRole { row: usize, value: String },
    InvalidEmployeeNo { row: usize, value: String },
}

impl std::fmt::Display for DirectoryImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectoryImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            DirectoryImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            DirectoryImportError::UnknownRole { row, value } => {
                write!(f, "row {}: unrecognized role '{}'", row, value)
            }
            DirectoryImportError::InvalidEmployeeNo { row, value } => {
                write!(f, "row {}: invalid employee number '{}'", row, value)
            }
        }
    }
}

impl std::error::Error for DirectoryImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DirectoryImportError::Io(err) => Some(err),
            DirectoryImportError::Csv(err) => Some(err),
            DirectoryImportError::UnknownRole { .. }
            | DirectoryImportError::InvalidEmployeeNo { .. } => None,
        }
    }
}

impl From<std::io::Error> for DirectoryImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for DirectoryImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}
