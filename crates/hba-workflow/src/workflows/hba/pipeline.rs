use crate::workflows::hba::domain::AppStatus;
use serde::Serialize;

pub const TOTAL_STEPS: usize = 8;

/// One entry on the canonical eight-step approval timeline.
#[derive(Debug, Clone, Copy)]
pub struct WorkflowStep {
    pub id: u8,
    pub role: &'static str,
    pub label: &'static str,
    pub kind: StepKind,
    /// Statuses attesting that this step has been cleared.
    pub status_match: &'static [AppStatus],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Sequential,
    Parallel { sub_steps: &'static [&'static str] },
}

pub fn steps() -> &'static [WorkflowStep] {
    &STEPS
}

static STEPS: [WorkflowStep; TOTAL_STEPS] = [
    WorkflowStep {
        id: 1,
        role: "Applicant",
        label: "Submission",
        kind: StepKind::Sequential,
        status_match: &[AppStatus::Submitted],
    },
    WorkflowStep {
        id: 2,
        role: "ES / State HR",
        label: "Initial Verification",
        kind: StepKind::Sequential,
        status_match: &[
            AppStatus::PendingLaw,
            AppStatus::PendingHr,
            AppStatus::PendingEngg,
            AppStatus::PendingRelations,
        ],
    },
    WorkflowStep {
        id: 3,
        role: "Departments",
        label: "Parallel Clearances",
        kind: StepKind::Parallel {
            sub_steps: &["Law Dept", "HR & ER", "Engineering"],
        },
        status_match: &[AppStatus::PendingFinance],
    },
    WorkflowStep {
        id: 4,
        role: "ES / State HR",
        label: "Consolidation",
        kind: StepKind::Sequential,
        status_match: &[AppStatus::PendingFinance],
    },
    WorkflowStep {
        id: 5,
        role: "Finance",
        label: "Budget Concurrence",
        kind: StepKind::Sequential,
        status_match: &[AppStatus::ApprovedFinance, AppStatus::PendingEd],
    },
    WorkflowStep {
        id: 6,
        role: "ES / State HR",
        label: "Final Scrutiny",
        kind: StepKind::Sequential,
        status_match: &[AppStatus::PendingEd],
    },
    WorkflowStep {
        id: 7,
        role: "ED (Region)",
        label: "Final Authority Approval",
        kind: StepKind::Sequential,
        status_match: &[AppStatus::ApprovedByEd, AppStatus::Sanctioned],
    },
    WorkflowStep {
        id: 8,
        role: "ES / State HR",
        label: "Sanction Order Issuance",
        kind: StepKind::Sequential,
        status_match: &[AppStatus::Sanctioned],
    },
];

/// Number of fully cleared canonical steps for a status.
///
/// Total over the whole status domain. A returned file projects back to the
/// start, and so does the legacy blanket `APPROVED`. The parallel clearances
/// have no partial tracking, so step 3 and the consolidation that follows it
/// both read as cleared only once the file reaches the finance desk.
pub const fn completed_steps(status: AppStatus) -> usize {
    match status {
        AppStatus::Draft => 0,
        AppStatus::Submitted => 1,
        AppStatus::PendingLaw
        | AppStatus::PendingHr
        | AppStatus::PendingEngg
        | AppStatus::PendingRelations => 2,
        AppStatus::PendingFinance => 4,
        AppStatus::ApprovedFinance => 5,
        AppStatus::PendingEd => 6,
        AppStatus::ApprovedByEd => 7,
        AppStatus::Sanctioned => 8,
        AppStatus::Returned | AppStatus::Approved => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Done,
    Active,
    Upcoming,
}

impl StepState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Done => "Done",
            Self::Active => "Active",
            Self::Upcoming => "Upcoming",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowProgressView {
    pub status: AppStatus,
    pub status_label: &'static str,
    pub completed_steps: usize,
    pub total_steps: usize,
    pub steps: Vec<WorkflowStepView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowStepView {
    pub id: u8,
    pub role: &'static str,
    pub label: &'static str,
    pub state: StepState,
    pub state_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_steps: Option<Vec<&'static str>>,
}

/// Renders the timeline for a status. Presentation only; transition legality
/// lives in the status machine.
pub fn progress_view(status: AppStatus) -> WorkflowProgressView {
    let completed = completed_steps(status);
    let steps = STEPS
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let state = if index < completed {
                StepState::Done
            } else if index == completed {
                StepState::Active
            } else {
                StepState::Upcoming
            };
            WorkflowStepView {
                id: step.id,
                role: step.role,
                label: step.label,
                state,
                state_label: state.label(),
                sub_steps: match step.kind {
                    StepKind::Parallel { sub_steps } => Some(sub_steps.to_vec()),
                    StepKind::Sequential => None,
                },
            }
        })
        .collect();

    WorkflowProgressView {
        status,
        status_label: status.label(),
        completed_steps: completed,
        total_steps: TOTAL_STEPS,
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_is_total_and_bounded() {
        for status in AppStatus::ordered() {
            let completed = completed_steps(status);
            assert!(completed <= TOTAL_STEPS, "bound for {}", status.code());
        }
    }

    #[test]
    fn projection_is_monotonic_over_the_happy_path() {
        let happy_path = [
            AppStatus::Draft,
            AppStatus::Submitted,
            AppStatus::PendingLaw,
            AppStatus::PendingHr,
            AppStatus::PendingEngg,
            AppStatus::PendingRelations,
            AppStatus::PendingFinance,
            AppStatus::ApprovedFinance,
            AppStatus::PendingEd,
            AppStatus::ApprovedByEd,
            AppStatus::Sanctioned,
        ];

        let mut previous = 0;
        for status in happy_path {
            let completed = completed_steps(status);
            assert!(
                completed >= previous,
                "{} projected backwards to {}",
                status.code(),
                completed
            );
            previous = completed;
        }
        assert_eq!(previous, TOTAL_STEPS);
    }

    #[test]
    fn returned_and_legacy_statuses_project_to_the_start() {
        assert_eq!(completed_steps(AppStatus::Draft), 0);
        assert_eq!(completed_steps(AppStatus::Returned), 0);
        assert_eq!(completed_steps(AppStatus::Approved), 0);
    }

    #[test]
    fn parallel_clearances_complete_as_one_block() {
        for status in [
            AppStatus::PendingLaw,
            AppStatus::PendingHr,
            AppStatus::PendingEngg,
            AppStatus::PendingRelations,
        ] {
            assert_eq!(completed_steps(status), 2, "for {}", status.code());
        }
        // Clearing the departments also clears the consolidation step.
        assert_eq!(completed_steps(AppStatus::PendingFinance), 4);
    }

    #[test]
    fn timeline_has_eight_steps_with_one_fan_out() {
        let steps = steps();
        assert_eq!(steps.len(), TOTAL_STEPS);
        let ids: Vec<u8> = steps.iter().map(|step| step.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7, 8]);

        let fan_outs: Vec<&WorkflowStep> = steps
            .iter()
            .filter(|step| matches!(step.kind, StepKind::Parallel { .. }))
            .collect();
        assert_eq!(fan_outs.len(), 1);
        assert_eq!(fan_outs[0].id, 3);
        match fan_outs[0].kind {
            StepKind::Parallel { sub_steps } => {
                assert_eq!(sub_steps, &["Law Dept", "HR & ER", "Engineering"]);
            }
            StepKind::Sequential => unreachable!(),
        }
    }

    #[test]
    fn progress_view_marks_done_active_and_upcoming() {
        let view = progress_view(AppStatus::PendingFinance);
        assert_eq!(view.completed_steps, 4);
        assert_eq!(view.status_label, "Pending with Finance");

        let states: Vec<StepState> = view.steps.iter().map(|step| step.state).collect();
        assert_eq!(
            states,
            vec![
                StepState::Done,
                StepState::Done,
                StepState::Done,
                StepState::Done,
                StepState::Active,
                StepState::Upcoming,
                StepState::Upcoming,
                StepState::Upcoming,
            ]
        );
        assert_eq!(view.steps[2].sub_steps.as_deref(), Some(&["Law Dept", "HR & ER", "Engineering"][..]));

        let done = progress_view(AppStatus::Sanctioned);
        assert!(done.steps.iter().all(|step| step.state == StepState::Done));
    }
}
