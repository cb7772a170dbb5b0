use crate::infra::EngineState;
use crate::views::{unattainable_notice, upload_notice, EligibilityView, TranscriptView};
use clap::Args;
use result_engine::config::{AppConfig, Fixtures};
use result_engine::eligibility::{EligibilityEvaluator, StudentProfile};
use result_engine::error::{AppError, EngineError};
use result_engine::ingest::MarkSheetImporter;
use result_engine::planner::{
    ExamSurvivalPlanner, InternalMarksPolicy, SurvivalRules, TargetCgpaPlanner, TargetOutlook,
};
use result_engine::subjects::SubjectCode;
use result_engine::telemetry;
use result_engine::transcript::TranscriptStore;
use std::fs::File;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct IngestArgs {
    /// CSV mark sheet; the file name (without extension) names the subject
    pub(crate) csv: PathBuf,
    /// Subject name to record instead of the file name
    #[arg(long)]
    pub(crate) subject: Option<String>,
    /// Subject code to record instead of a generated one
    #[arg(long)]
    pub(crate) code: Option<String>,
    /// Pass mark (defaults to the configured threshold of 35)
    #[arg(long)]
    pub(crate) pass_threshold: Option<f64>,
}

#[derive(Args, Debug)]
pub(crate) struct TargetArgs {
    /// CGPA to reach by the end of the programme
    #[arg(long)]
    pub(crate) target: f64,
    /// Completed SGPAs in semester order, comma separated (defaults to the loaded transcript)
    #[arg(long, value_delimiter = ',')]
    pub(crate) history: Vec<f64>,
    /// Number of semesters in the programme
    #[arg(long)]
    pub(crate) program_length: Option<u8>,
}

#[derive(Args, Debug)]
pub(crate) struct SurvivalArgs {
    /// Internal assessment marks already earned
    #[arg(long)]
    pub(crate) internal: f64,
    /// Compute even when internal marks fall outside the valid range
    #[arg(long)]
    pub(crate) lenient: bool,
}

#[derive(Args, Debug)]
pub(crate) struct EligibilityArgs {
    /// Current CGPA (defaults to the loaded transcript)
    #[arg(long, requires = "backlogs")]
    pub(crate) cgpa: Option<f64>,
    /// Active backlog count
    #[arg(long, requires = "cgpa")]
    pub(crate) backlogs: Option<u32>,
}

#[derive(Args, Debug)]
pub(crate) struct TranscriptArgs {
    /// Semester index, starting at 1
    #[arg(long)]
    pub(crate) semester: u8,
}

fn load_state() -> Result<EngineState, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let fixtures: Fixtures = config.fixtures()?;
    Ok(EngineState::from_fixtures(fixtures))
}

pub(crate) fn run_ingest(args: IngestArgs) -> Result<(), AppError> {
    let state = load_state()?;
    let threshold = args
        .pass_threshold
        .unwrap_or(state.fixtures.engine.pass_threshold);

    let importer = MarkSheetImporter::new(threshold);
    let code = args.code.map(SubjectCode);
    let summary = match args.subject.as_deref() {
        Some(subject) => importer.from_reader(File::open(&args.csv)?, subject, code)?,
        None => importer.from_path(&args.csv, code)?,
    };
    let aggregate = &summary.aggregate;

    println!("{}", upload_notice(&summary));
    println!("  Subject code: {}", aggregate.code);
    println!("  Mark column: {}", summary.mark_column);
    if summary.skipped_rows > 0 {
        println!("  Rows without a numeric mark: {}", summary.skipped_rows);
    }
    match aggregate.failure_rate() {
        Some(rate) if rate > state.fixtures.engine.critical_threshold => println!(
            "  Critical subject: {:.0}% failure rate",
            rate * 100.0
        ),
        Some(rate) => println!("  Failure rate: {:.0}%", rate * 100.0),
        None => println!("  No students evaluated"),
    }

    Ok(())
}

pub(crate) fn run_target_plan(args: TargetArgs) -> Result<(), AppError> {
    let state = load_state()?;
    let engine = &state.fixtures.engine;
    let history = if args.history.is_empty() {
        state.transcript_profile()?.sgpa_history()
    } else {
        args.history
    };
    let planner = TargetCgpaPlanner::new(args.program_length.unwrap_or(engine.program_length));

    let required = planner.required_remaining_average(&history, args.target)?;
    let remaining = usize::from(planner.program_length()) - history.len();

    println!(
        "Target CGPA {} after {} completed semester(s)",
        args.target,
        history.len()
    );
    match TargetOutlook::classify(required, engine.grade_scale_max) {
        TargetOutlook::AlreadySecured => {
            println!("  Target already secured (required average {required})")
        }
        TargetOutlook::Attainable => {
            println!("  Average {required} SGPA over the remaining {remaining} semester(s)")
        }
        TargetOutlook::BeyondScale => println!(
            "  Not reachable: needs {required} SGPA, above the {} scale",
            engine.grade_scale_max
        ),
    }

    Ok(())
}

pub(crate) fn run_survival_plan(args: SurvivalArgs) -> Result<(), AppError> {
    let state = load_state()?;
    let configured = state.fixtures.engine.survival;
    let rules = SurvivalRules {
        internal_policy: if args.lenient {
            InternalMarksPolicy::Lenient
        } else {
            configured.internal_policy
        },
        ..configured
    };

    match ExamSurvivalPlanner::new(rules).required_external(args.internal) {
        Ok(required) => println!(
            "With {} internal marks you need {required}/{} in the external exam",
            args.internal, rules.external_max
        ),
        Err(EngineError::Unattainable { .. }) => println!("{}", unattainable_notice(&rules)),
        Err(other) => return Err(other.into()),
    }

    Ok(())
}

pub(crate) fn run_eligibility(args: EligibilityArgs) -> Result<(), AppError> {
    let state = load_state()?;
    let profile = match (args.cgpa, args.backlogs) {
        (Some(cgpa), Some(backlogs)) => StudentProfile::new(cgpa, backlogs, Vec::new())?,
        _ => state.transcript_profile()?,
    };

    println!(
        "Placement check for CGPA {} with {} backlog(s)",
        profile.cgpa(),
        profile.backlog_count()
    );
    for decision in EligibilityEvaluator::evaluate(&profile, &state.fixtures.companies) {
        let view = EligibilityView::from(decision);
        if view.eligible {
            println!("  [eligible] {} ({})", view.company, view.package);
        } else {
            println!(
                "  [locked]   {} ({}): {}",
                view.company,
                view.package,
                view.notes.join(", ")
            );
        }
    }

    Ok(())
}

pub(crate) fn run_transcript(args: TranscriptArgs) -> Result<(), AppError> {
    let state = load_state()?;
    let view = TranscriptView::new(args.semester, state.transcript.semester(args.semester)?);

    println!(
        "Semester {}: SGPA {}, {} credits, {}",
        view.semester, view.sgpa, view.credits, view.verdict
    );
    for subject in &view.subjects {
        println!(
            "  {:<8} {:<24} {:>5} {:>5} {:>5} {:>3} {:<3} {}",
            subject.code,
            subject.name,
            subject.internal,
            subject.external,
            subject.total,
            subject.credits,
            subject.grade,
            subject.status.label()
        );
    }

    Ok(())
}
