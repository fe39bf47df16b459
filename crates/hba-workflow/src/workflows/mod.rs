pub mod directory;
pub mod hba;
