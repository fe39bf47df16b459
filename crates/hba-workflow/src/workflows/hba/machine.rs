use crate::workflows::hba::domain::{AppStatus, WorkflowAction};
use crate::workflows::hba::review::ReviewData;
use crate::workflows::hba::roles::{desk_for, UserRole};
use thiserror::Error;

/// Result of a successfully applied workflow action.
///
/// Advancing hands the file to a fresh desk, so the review resets; returning
/// keeps the review intact so the applicant sees exactly what to fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub status: AppStatus,
    pub review: ReviewData,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("role {} is not permitted to {}", .role.label(), .action.label())]
    ActionNotPermitted {
        role: UserRole,
        action: WorkflowAction,
    },
    #[error("no {} is available to {} while the application is {}", .action.label(), .role.label(), .status.label())]
    WrongDesk {
        status: AppStatus,
        role: UserRole,
        action: WorkflowAction,
    },
    #[error("application is already {} and closed to further action", .status.label())]
    TerminalStatus { status: AppStatus },
    #[error("cannot return an application with no rejected documents")]
    NothingRejected,
    #[error("cannot advance while {count} rejected document(s) await correction")]
    RejectionsOutstanding { count: usize },
    #[error("role {} does not issue sanction orders", .role.label())]
    NotSanctionIssuer { role: UserRole },
    #[error("sanction issuance requires executive director approval, application is {}", .status.label())]
    SanctionNotReady { status: AppStatus },
}

/// Applies one role-gated action to an application's current state.
///
/// Pure over its inputs: callers own the aggregate and commit the outcome
/// atomically, so a failed call leaves nothing half-mutated. `review` is the
/// acting desk's provisional edit, validated here against the action's
/// preconditions.
pub fn transition(
    status: AppStatus,
    role: UserRole,
    action: WorkflowAction,
    review: &ReviewData,
) -> Result<TransitionOutcome, TransitionError> {
    if !role.may_fire(action) {
        return Err(TransitionError::ActionNotPermitted { role, action });
    }
    if status.is_terminal() {
        return Err(TransitionError::TerminalStatus { status });
    }

    match action {
        WorkflowAction::Return => {
            if desk_for(status) != Some(role) {
                return Err(TransitionError::WrongDesk {
                    status,
                    role,
                    action,
                });
            }
            if review.is_clean() {
                return Err(TransitionError::NothingRejected);
            }
            Ok(TransitionOutcome {
                status: AppStatus::Returned,
                review: review.clone(),
            })
        }
        WorkflowAction::Submit | WorkflowAction::Recommend | WorkflowAction::Approve => {
            let next = advance_target(status, role, action).ok_or({
                TransitionError::WrongDesk {
                    status,
                    role,
                    action,
                }
            })?;
            if !review.is_clean() {
                return Err(TransitionError::RejectionsOutstanding {
                    count: review.rejection_count(),
                });
            }
            Ok(TransitionOutcome {
                status: next,
                review: ReviewData::default(),
            })
        }
    }
}

/// Issues the sanction order once the Executive Director has signed off.
/// Kept apart from [`transition`] because issuance is a clerical step by the
/// Employee Services desk, not one of the review actions.
pub fn issue_sanction(status: AppStatus, role: UserRole) -> Result<AppStatus, TransitionError> {
    if role != UserRole::EmployeeServices {
        return Err(TransitionError::NotSanctionIssuer { role });
    }
    if status.is_terminal() {
        return Err(TransitionError::TerminalStatus { status });
    }
    if status != AppStatus::ApprovedByEd {
        return Err(TransitionError::SanctionNotReady { status });
    }
    Ok(AppStatus::Sanctioned)
}

/// The forward edges of the pipeline. The departmental fan-out is linearized
/// as Law, HR, Engineering, Employee Relations, then Finance; the HR desk
/// clears both HR passes. `APPROVED_FINANCE` survives as an entry point for
/// records predating direct finance-to-ED routing.
const fn advance_target(
    status: AppStatus,
    role: UserRole,
    action: WorkflowAction,
) -> Option<AppStatus> {
    match (status, role, action) {
        (AppStatus::Draft, UserRole::Applicant, WorkflowAction::Submit) => {
            Some(AppStatus::Submitted)
        }
        (AppStatus::Returned, UserRole::Applicant, WorkflowAction::Submit) => {
            Some(AppStatus::Submitted)
        }
        (AppStatus::Submitted, UserRole::EmployeeServices, WorkflowAction::Recommend) => {
            Some(AppStatus::PendingLaw)
        }
        (AppStatus::PendingLaw, UserRole::Law, WorkflowAction::Recommend) => {
            Some(AppStatus::PendingHr)
        }
        (AppStatus::PendingHr, UserRole::HumanResources, WorkflowAction::Approve) => {
            Some(AppStatus::PendingEngg)
        }
        (AppStatus::PendingEngg, UserRole::Engineering, WorkflowAction::Approve) => {
            Some(AppStatus::PendingRelations)
        }
        (AppStatus::PendingRelations, UserRole::HumanResources, WorkflowAction::Approve) => {
            Some(AppStatus::PendingFinance)
        }
        (AppStatus::PendingFinance, UserRole::Finance, WorkflowAction::Recommend) => {
            Some(AppStatus::PendingEd)
        }
        (AppStatus::ApprovedFinance, UserRole::EmployeeServices, WorkflowAction::Recommend) => {
            Some(AppStatus::PendingEd)
        }
        (AppStatus::PendingEd, UserRole::ExecutiveDirector, WorkflowAction::Approve) => {
            Some(AppStatus::ApprovedByEd)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::hba::checklist::{ChecklistSection, DocumentKey};

    fn clean() -> ReviewData {
        ReviewData::default()
    }

    fn with_rejection(key: DocumentKey, remark: &str) -> ReviewData {
        let mut review = ReviewData::default();
        review.set_rejection(key, true);
        review.set_remark(key, remark);
        review
    }

    #[test]
    fn happy_path_walks_every_desk_in_order() {
        let path = [
            (AppStatus::Draft, UserRole::Applicant, WorkflowAction::Submit),
            (
                AppStatus::Submitted,
                UserRole::EmployeeServices,
                WorkflowAction::Recommend,
            ),
            (AppStatus::PendingLaw, UserRole::Law, WorkflowAction::Recommend),
            (
                AppStatus::PendingHr,
                UserRole::HumanResources,
                WorkflowAction::Approve,
            ),
            (
                AppStatus::PendingEngg,
                UserRole::Engineering,
                WorkflowAction::Approve,
            ),
            (
                AppStatus::PendingRelations,
                UserRole::HumanResources,
                WorkflowAction::Approve,
            ),
            (
                AppStatus::PendingFinance,
                UserRole::Finance,
                WorkflowAction::Recommend,
            ),
            (
                AppStatus::PendingEd,
                UserRole::ExecutiveDirector,
                WorkflowAction::Approve,
            ),
        ];

        let mut status = AppStatus::Draft;
        for (expected_at, role, action) in path {
            assert_eq!(status, expected_at);
            let outcome = transition(status, role, action, &clean()).expect("step advances");
            assert!(outcome.review.is_clean());
            status = outcome.status;
        }
        assert_eq!(status, AppStatus::ApprovedByEd);
        assert_eq!(
            issue_sanction(status, UserRole::EmployeeServices),
            Ok(AppStatus::Sanctioned)
        );
    }

    #[test]
    fn finance_concurrence_moves_straight_to_ed() {
        let outcome = transition(
            AppStatus::PendingFinance,
            UserRole::Finance,
            WorkflowAction::Recommend,
            &clean(),
        )
        .expect("finance recommends");
        assert_eq!(outcome.status, AppStatus::PendingEd);
    }

    #[test]
    fn legacy_finance_concurrence_state_still_routes_forward() {
        let outcome = transition(
            AppStatus::ApprovedFinance,
            UserRole::EmployeeServices,
            WorkflowAction::Recommend,
            &clean(),
        )
        .expect("compilation desk forwards");
        assert_eq!(outcome.status, AppStatus::PendingEd);
    }

    #[test]
    fn hr_cannot_recommend_anywhere() {
        match transition(
            AppStatus::PendingHr,
            UserRole::HumanResources,
            WorkflowAction::Recommend,
            &clean(),
        ) {
            Err(TransitionError::ActionNotPermitted { role, action }) => {
                assert_eq!(role, UserRole::HumanResources);
                assert_eq!(action, WorkflowAction::Recommend);
            }
            other => panic!("expected ActionNotPermitted, got {other:?}"),
        }
    }

    #[test]
    fn advancing_with_open_rejections_is_blocked() {
        let review = with_rejection(
            DocumentKey::new(ChecklistSection::PartA, 7),
            "Franking value illegible",
        );
        match transition(
            AppStatus::PendingLaw,
            UserRole::Law,
            WorkflowAction::Recommend,
            &review,
        ) {
            Err(TransitionError::RejectionsOutstanding { count }) => assert_eq!(count, 1),
            other => panic!("expected RejectionsOutstanding, got {other:?}"),
        }
    }

    #[test]
    fn returning_with_a_clean_review_is_blocked() {
        match transition(
            AppStatus::PendingEngg,
            UserRole::Engineering,
            WorkflowAction::Return,
            &clean(),
        ) {
            Err(TransitionError::NothingRejected) => {}
            other => panic!("expected NothingRejected, got {other:?}"),
        }
    }

    #[test]
    fn return_keeps_the_review_for_the_applicant() {
        let blurry = DocumentKey::new(ChecklistSection::PartA, 7);
        let review = with_rejection(blurry, "Blurry scan");

        let outcome = transition(
            AppStatus::Submitted,
            UserRole::EmployeeServices,
            WorkflowAction::Return,
            &review,
        )
        .expect("return succeeds with a rejection recorded");

        assert_eq!(outcome.status, AppStatus::Returned);
        assert_eq!(outcome.review, review);
        assert_eq!(outcome.review.remark(blurry), Some("Blurry scan"));
    }

    #[test]
    fn a_desk_cannot_return_someone_elses_file() {
        let review = with_rejection(
            DocumentKey::new(ChecklistSection::PartB, 1),
            "Seller name mismatch",
        );
        match transition(
            AppStatus::PendingHr,
            UserRole::Law,
            WorkflowAction::Return,
            &review,
        ) {
            Err(TransitionError::WrongDesk { status, role, .. }) => {
                assert_eq!(status, AppStatus::PendingHr);
                assert_eq!(role, UserRole::Law);
            }
            other => panic!("expected WrongDesk, got {other:?}"),
        }
    }

    #[test]
    fn out_of_order_recommend_is_rejected() {
        match transition(
            AppStatus::PendingLaw,
            UserRole::EmployeeServices,
            WorkflowAction::Recommend,
            &clean(),
        ) {
            Err(TransitionError::WrongDesk { .. }) => {}
            other => panic!("expected WrongDesk, got {other:?}"),
        }
    }

    #[test]
    fn resubmission_requires_every_rejection_cleared() {
        let review = with_rejection(
            DocumentKey::new(ChecklistSection::PartA, 15),
            "Architect certification missing",
        );
        match transition(
            AppStatus::Returned,
            UserRole::Applicant,
            WorkflowAction::Submit,
            &review,
        ) {
            Err(TransitionError::RejectionsOutstanding { count }) => assert_eq!(count, 1),
            other => panic!("expected RejectionsOutstanding, got {other:?}"),
        }

        let outcome = transition(
            AppStatus::Returned,
            UserRole::Applicant,
            WorkflowAction::Submit,
            &clean(),
        )
        .expect("clean corrections resubmit");
        assert_eq!(outcome.status, AppStatus::Submitted);
    }

    #[test]
    fn terminal_statuses_accept_no_actions() {
        for status in [AppStatus::Sanctioned, AppStatus::Approved] {
            match transition(
                status,
                UserRole::EmployeeServices,
                WorkflowAction::Recommend,
                &clean(),
            ) {
                Err(TransitionError::TerminalStatus { status: reported }) => {
                    assert_eq!(reported, status);
                }
                other => panic!("expected TerminalStatus, got {other:?}"),
            }
        }
    }

    #[test]
    fn sanction_issuance_is_gated_to_the_es_desk() {
        match issue_sanction(AppStatus::ApprovedByEd, UserRole::Finance) {
            Err(TransitionError::NotSanctionIssuer { role }) => {
                assert_eq!(role, UserRole::Finance);
            }
            other => panic!("expected NotSanctionIssuer, got {other:?}"),
        }

        match issue_sanction(AppStatus::PendingEd, UserRole::EmployeeServices) {
            Err(TransitionError::SanctionNotReady { status }) => {
                assert_eq!(status, AppStatus::PendingEd);
            }
            other => panic!("expected SanctionNotReady, got {other:?}"),
        }

        match issue_sanction(AppStatus::Sanctioned, UserRole::EmployeeServices) {
            Err(TransitionError::TerminalStatus { .. }) => {}
            other => panic!("expected TerminalStatus, got {other:?}"),
        }
    }
}
