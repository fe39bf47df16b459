use crate::infra::{
    guess_content_type, InMemoryApplicationRepository, InMemoryDocumentStore, InMemoryNotifier,
    PlainTextLetterRenderer,
};
use clap::Args;
use hba_workflow::error::AppError;
use hba_workflow::workflows::directory::{AuthProvider, EmployeeDirectory};
use hba_workflow::workflows::hba::applications::{
    Applicant, ApplicationSubmission, DocumentUpload, HbaApplicationService, SubmittedItem,
};
use hba_workflow::workflows::hba::pipeline::{self, StepKind, StepState, WorkflowProgressView};
use hba_workflow::workflows::hba::{
    AppStatus, ApplicationType, ChecklistCatalog, ChecklistSection, DocumentKey, ReviewAction,
    ReviewData, UserRole,
};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Walk an under-construction purchase instead of a resale one.
    #[arg(long)]
    pub(crate) under_construction: bool,
    /// Route the advance through direct bank-loan repayment (adds part D).
    #[arg(long)]
    pub(crate) bank_transfer: bool,
    /// Advance amount in rupees. Defaults to 4,000,000.
    #[arg(long)]
    pub(crate) amount: Option<u64>,
    /// Skip the return-and-correction detour and walk the happy path only.
    #[arg(long)]
    pub(crate) skip_correction: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct PipelineShowArgs {
    /// Render the timeline as seen at this status code (e.g. PENDING_FINANCE)
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: Option<AppStatus>,
}

fn parse_status(raw: &str) -> Result<AppStatus, String> {
    AppStatus::parse_code(raw).ok_or_else(|| {
        let codes: Vec<&str> = AppStatus::ordered().iter().map(|status| status.code()).collect();
        format!("unknown status '{raw}', expected one of: {}", codes.join(", "))
    })
}

pub(crate) fn run_pipeline_show(args: PipelineShowArgs) -> Result<(), AppError> {
    match args.status {
        Some(status) => render_timeline(&pipeline::progress_view(status)),
        None => {
            println!("Canonical approval pipeline ({} steps)", pipeline::TOTAL_STEPS);
            for step in pipeline::steps() {
                println!("{}. {} — {}", step.id, step.label, step.role);
                if let StepKind::Parallel { sub_steps } = step.kind {
                    for sub_step in sub_steps {
                        println!("     · {sub_step}");
                    }
                }
            }

            println!("\nStatus projection (cleared steps of {})", pipeline::TOTAL_STEPS);
            for status in AppStatus::ordered() {
                println!(
                    "- {:<18} {}",
                    status.code(),
                    pipeline::completed_steps(status)
                );
            }
        }
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        under_construction,
        bank_transfer,
        amount,
        skip_correction,
    } = args;

    let app_type = if under_construction {
        ApplicationType::UnderConstruction
    } else {
        ApplicationType::Resale
    };
    let amount = amount.unwrap_or(4_000_000);

    println!("House building advance workflow demo");

    let directory = EmployeeDirectory::seeded();
    let applicant_record = match directory.lookup(UserRole::Applicant.profile().employee_no) {
        Ok(record) => record,
        Err(err) => {
            println!("  Directory unavailable: {err}");
            return Ok(());
        }
    };

    let repository = Arc::new(InMemoryApplicationRepository::default());
    let notifier = Arc::new(InMemoryNotifier::default());
    let service = HbaApplicationService::new(
        repository,
        notifier.clone(),
        Arc::new(InMemoryDocumentStore),
        Arc::new(PlainTextLetterRenderer),
    );

    let sections = service.checklist(app_type, bank_transfer);
    println!(
        "Checklist for {} ({} repayment): {} section(s)",
        app_type.label(),
        if bank_transfer { "bank" } else { "salary" },
        sections.len()
    );
    for section in &sections {
        let required = section.items.iter().filter(|item| item.required).count();
        println!(
            "- {}: {} items, {} required",
            section.title,
            section.items.len(),
            required
        );
    }

    let submission = ApplicationSubmission {
        applicant: Applicant {
            name: applicant_record.name.clone(),
            designation: applicant_record.designation.clone(),
            department: applicant_record.department.clone(),
            employee_no: applicant_record.employee_no.clone(),
        },
        app_type,
        is_bank_transfer: bank_transfer,
        property_location: "Sector 45, Gurgaon".to_string(),
        requested_amount: amount,
        salary: Default::default(),
        items: complete_items(app_type, bank_transfer),
    };

    let application = match service.submit(submission) {
        Ok(application) => application,
        Err(err) => {
            println!("  Submission rejected: {err}");
            return Ok(());
        }
    };
    let reference = application.reference.clone();
    let assessment = application.assessment();
    println!(
        "\nSubmitted as {} by {} on {}",
        reference,
        application.applicant.name,
        application.submitted_at.format("%d %b %Y %H:%M UTC")
    );
    println!(
        "Eligibility: {} (limit Rs. {}), priority {}",
        assessment.label(),
        assessment.limit(),
        application.priority().label()
    );

    if !skip_correction {
        println!("\nEmployee Services flags a defect and returns the file");
        let surety_bond = DocumentKey::new(ChecklistSection::PartA, 7);
        let mut review = ReviewData::default();
        review.verify_document(surety_bond, false, "Franking value illegible");

        let returned = match service.decide(
            &reference,
            UserRole::EmployeeServices,
            ReviewAction::Return,
            review,
        ) {
            Ok(application) => application,
            Err(err) => {
                println!("  Return failed: {err}");
                return Ok(());
            }
        };
        println!("- Status: {}", returned.status.label());
        for item in returned.review.action_items() {
            println!(
                "- Fix {}: {}",
                item.key,
                item.remark.as_deref().unwrap_or("no remark recorded")
            );
        }

        println!("\nApplicant replaces the document and resubmits");
        let upload = demo_upload(&format!("{surety_bond}-corrected.pdf"));
        if let Err(err) =
            service.reupload_document(&reference, UserRole::Applicant, surety_bond, upload)
        {
            println!("  Re-upload failed: {err}");
            return Ok(());
        }
        match service.resubmit(&reference, UserRole::Applicant) {
            Ok(application) => println!("- Status: {}", application.status.label()),
            Err(err) => {
                println!("  Resubmission failed: {err}");
                return Ok(());
            }
        }
    }

    println!("\nDesk decisions");
    let script = [
        (UserRole::EmployeeServices, ReviewAction::Recommend),
        (UserRole::Law, ReviewAction::Recommend),
        (UserRole::HumanResources, ReviewAction::Approve),
        (UserRole::Engineering, ReviewAction::Approve),
        (UserRole::HumanResources, ReviewAction::Approve),
        (UserRole::Finance, ReviewAction::Recommend),
        (UserRole::ExecutiveDirector, ReviewAction::Approve),
    ];
    for (role, action) in script {
        match service.decide(&reference, role, action, ReviewData::default()) {
            Ok(application) => println!(
                "- {} clears the file: now {}",
                role.label(),
                application.status.label()
            ),
            Err(err) => {
                println!("  Decision by {} failed: {err}", role.label());
                return Ok(());
            }
        }
    }

    println!("\nEmployee Services issues the sanction order");
    let outcome = match service.issue_sanction(&reference, UserRole::EmployeeServices) {
        Ok(outcome) => outcome,
        Err(err) => {
            println!("  Sanction issuance failed: {err}");
            return Ok(());
        }
    };
    println!("{}", String::from_utf8_lossy(&outcome.letter.bytes));

    match service.progress(&reference) {
        Ok(view) => render_timeline(&view),
        Err(err) => println!("  Progress unavailable: {err}"),
    }

    let notices = notifier.notices();
    println!("\nNotifications dispatched: {}", notices.len());
    for notice in notices {
        println!("- {} -> {}", notice.template, notice.reference);
    }

    Ok(())
}

/// Uploads for every required key of the chosen application shape.
fn complete_items(
    app_type: ApplicationType,
    is_bank_transfer: bool,
) -> BTreeMap<DocumentKey, SubmittedItem> {
    ChecklistCatalog::standard()
        .required_keys(app_type, is_bank_transfer)
        .into_iter()
        .map(|key| {
            (
                key,
                SubmittedItem::Upload(demo_upload(&format!("{key}.pdf"))),
            )
        })
        .collect()
}

fn demo_upload(file_name: &str) -> DocumentUpload {
    DocumentUpload {
        file_name: file_name.to_string(),
        size_bytes: 210_000,
        content_type: guess_content_type(file_name),
    }
}

fn render_timeline(view: &WorkflowProgressView) {
    println!(
        "\nApproval timeline — {} ({}/{} steps cleared)",
        view.status_label, view.completed_steps, view.total_steps
    );
    for step in &view.steps {
        let marker = match step.state {
            StepState::Done => "[x]",
            StepState::Active => "[>]",
            StepState::Upcoming => "[ ]",
        };
        println!("{marker} {}. {} — {}", step.id, step.label, step.role);
        if let Some(sub_steps) = &step.sub_steps {
            for sub_step in sub_steps {
                println!("      · {sub_step}");
            }
        }
    }
}
