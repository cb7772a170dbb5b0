use crate::commands::{
    run_eligibility, run_ingest, run_survival_plan, run_target_plan, run_transcript,
    EligibilityArgs, IngestArgs, SurvivalArgs, TargetArgs, TranscriptArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use result_engine::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "ResultPro Engine",
    about = "Serve or query the university result analytics engine",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Aggregate a CSV mark sheet and print the subject summary
    Ingest(IngestArgs),
    /// Grade planning calculators
    Plan {
        #[command(subcommand)]
        command: PlanCommand,
    },
    /// Check recruiter eligibility for a CGPA and backlog count
    Eligibility(EligibilityArgs),
    /// Print one semester of the loaded transcript
    Transcript(TranscriptArgs),
}

#[derive(Subcommand, Debug)]
enum PlanCommand {
    /// SGPA needed in the remaining semesters to reach a target CGPA
    Target(TargetArgs),
    /// External-exam score needed to pass given internal marks
    Survival(SurvivalArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Ingest(args) => run_ingest(args),
        Command::Plan {
            command: PlanCommand::Target(args),
        } => run_target_plan(args),
        Command::Plan {
            command: PlanCommand::Survival(args),
        } => run_survival_plan(args),
        Command::Eligibility(args) => run_eligibility(args),
        Command::Transcript(args) => run_transcript(args),
    }
}
