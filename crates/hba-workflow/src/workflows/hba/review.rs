use crate::workflows::hba::checklist::DocumentKey;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One desk's working notes over an application's checklist.
///
/// A document may carry a remark without being rejected. Clearing a rejection
/// also drops the remark so a stale instruction never reaches the applicant.
/// All operations are plain data edits, idempotent for identical inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewData {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub remarks: BTreeMap<DocumentKey, String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub rejected_docs: BTreeSet<DocumentKey>,
}

impl ReviewData {
    pub fn is_rejected(&self, key: DocumentKey) -> bool {
        self.rejected_docs.contains(&key)
    }

    pub fn remark(&self, key: DocumentKey) -> Option<&str> {
        self.remarks.get(&key).map(String::as_str)
    }

    pub fn rejection_count(&self) -> usize {
        self.rejected_docs.len()
    }

    /// A clean review has no rejected documents. Remarks alone do not block
    /// an application from advancing.
    pub fn is_clean(&self) -> bool {
        self.rejected_docs.is_empty()
    }

    /// Marks `key` rejected or not. Clearing a rejection also drops its
    /// remark.
    pub fn set_rejection(&mut self, key: DocumentKey, rejected: bool) {
        if rejected {
            self.rejected_docs.insert(key);
        } else if self.rejected_docs.remove(&key) {
            self.remarks.remove(&key);
        }
    }

    /// Records a remark against `key`. Empty or whitespace-only text removes
    /// the entry instead. Does not touch the rejection flag.
    pub fn set_remark(&mut self, key: DocumentKey, text: impl Into<String>) {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.remarks.remove(&key);
        } else {
            self.remarks.insert(key, trimmed.to_string());
        }
    }

    /// Compound edit used by the document-inspection flow: an unverified
    /// document is a rejected one, and the remark travels with the verdict.
    pub fn verify_document(&mut self, key: DocumentKey, verified: bool, remark: impl Into<String>) {
        self.set_rejection(key, !verified);
        self.set_remark(key, remark);
    }

    /// What the applicant must fix, in checklist order.
    pub fn action_items(&self) -> Vec<ActionItem> {
        self.rejected_docs
            .iter()
            .map(|&key| ActionItem {
                key,
                remark: self.remarks.get(&key).cloned(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionItem {
    pub key: DocumentKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::hba::checklist::ChecklistSection;

    fn key(section: ChecklistSection, id: u8) -> DocumentKey {
        DocumentKey::new(section, id)
    }

    #[test]
    fn rejecting_then_clearing_restores_the_original_membership() {
        let mut review = ReviewData::default();
        let surety_bond = key(ChecklistSection::PartA, 7);

        review.set_rejection(surety_bond, true);
        assert!(review.is_rejected(surety_bond));
        assert_eq!(review.rejection_count(), 1);

        review.set_rejection(surety_bond, false);
        assert!(review.is_clean());
        assert_eq!(review, ReviewData::default());
    }

    #[test]
    fn set_rejection_is_idempotent() {
        let mut once = ReviewData::default();
        let noc = key(ChecklistSection::PartA, 10);
        once.set_rejection(noc, true);

        let mut twice = once.clone();
        twice.set_rejection(noc, true);
        assert_eq!(once, twice);

        once.set_rejection(noc, false);
        once.set_rejection(noc, false);
        assert_eq!(once, ReviewData::default());
    }

    #[test]
    fn clearing_a_rejection_drops_its_remark() {
        let mut review = ReviewData::default();
        let blueprint = key(ChecklistSection::PartA, 15);

        review.set_rejection(blueprint, true);
        review.set_remark(blueprint, "Blurry scan, please re-upload");
        review.set_rejection(blueprint, false);

        assert!(review.remark(blueprint).is_none());
        assert!(review.is_clean());
    }

    #[test]
    fn remarks_survive_without_rejection() {
        let mut review = ReviewData::default();
        let salary_slips = key(ChecklistSection::PartA, 6);

        review.set_remark(salary_slips, "Older than three months, noted");
        assert!(!review.is_rejected(salary_slips));
        assert_eq!(
            review.remark(salary_slips),
            Some("Older than three months, noted")
        );
    }

    #[test]
    fn blank_remark_text_removes_the_entry() {
        let mut review = ReviewData::default();
        let sale_deed = key(ChecklistSection::PartB, 1);

        review.set_remark(sale_deed, "  Registration page missing  ");
        assert_eq!(review.remark(sale_deed), Some("Registration page missing"));

        review.set_remark(sale_deed, "   ");
        assert!(review.remark(sale_deed).is_none());
    }

    #[test]
    fn verify_document_composes_rejection_and_remark() {
        let mut review = ReviewData::default();
        let search_report = key(ChecklistSection::PartA, 11);

        review.verify_document(search_report, false, "Search covers only 12 years");
        assert!(review.is_rejected(search_report));
        assert_eq!(
            review.remark(search_report),
            Some("Search covers only 12 years")
        );

        review.verify_document(search_report, true, "");
        assert_eq!(review, ReviewData::default());
    }

    #[test]
    fn action_items_list_rejections_in_checklist_order() {
        let mut review = ReviewData::default();
        review.set_rejection(key(ChecklistSection::PartB, 3), true);
        review.set_rejection(key(ChecklistSection::PartA, 11), true);
        review.set_rejection(key(ChecklistSection::PartA, 2), true);
        review.set_remark(key(ChecklistSection::PartA, 11), "Search period short");

        let items = review.action_items();
        let keys: Vec<String> = items.iter().map(|item| item.key.to_string()).collect();
        assert_eq!(keys, vec!["partA-2", "partA-11", "partB-3"]);
        assert_eq!(items[1].remark.as_deref(), Some("Search period short"));
        assert!(items[0].remark.is_none());
    }
}
