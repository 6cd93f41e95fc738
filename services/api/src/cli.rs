use crate::demo::{run_demo, run_score_report, DemoArgs, ScoreReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use party_scheduler::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Party Scheduler",
    about = "Collect date preferences and pick the party date from the command line",
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
    /// Score a directory of stored responses and print the ranking
    Score(ScoreReportArgs),
    /// Walk through a sample poll from setup to announcement
    Demo(DemoArgs),
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
        Command::Score(args) => run_score_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
