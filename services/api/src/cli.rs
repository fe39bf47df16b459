use crate::demo::{run_demo, run_pipeline_show, DemoArgs, PipelineShowArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hba_workflow::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "HBA Approval Workflow",
    about = "Run and demonstrate the house building advance approval workflow from the command line",
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
    /// Inspect the canonical approval pipeline
    Pipeline {
        #[command(subcommand)]
        command: PipelineCommand,
    },
    /// Run an end-to-end CLI demo covering intake, review, and sanction
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum PipelineCommand {
    /// Show the approval timeline, optionally as seen at one status
    Show(PipelineShowArgs),
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
        Command::Pipeline {
            command: PipelineCommand::Show(args),
        } => run_pipeline_show(args),
        Command::Demo(args) => run_demo(args),
    }
}
