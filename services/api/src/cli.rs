use crate::commands::{
    run_booklet, run_export, run_score, run_thank_you, BookletArgs, ExportArgs, ScoreArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mindmirror::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "MindMirror",
    about = "Score the MindMirror inventories and produce personalised booklets",
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
    /// Print trait and need rankings for a respondent record
    Score(ScoreArgs),
    /// Render a respondent's booklet to a PDF file
    Booklet(BookletArgs),
    /// Render a respondent's thank-you letter to a PDF file
    ThankYou(BookletArgs),
    /// Export a JSON array of records as CSV
    Export(ExportArgs),
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
        Command::Score(args) => run_score(args),
        Command::Booklet(args) => run_booklet(args),
        Command::ThankYou(args) => run_thank_you(args),
        Command::Export(args) => run_export(args),
    }
}
