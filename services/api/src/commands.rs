use crate::infra::{read_record, read_rows, BookletService};
use clap::Args;
use mindmirror::config::AppConfig;
use mindmirror::error::AppError;
use mindmirror::telemetry;
use mindmirror::workflows::assessment::{
    AssessmentOutcome, CompletionStatus, Dimension, DimensionSet, Ranking, RespondentRecord,
};
use mindmirror::workflows::export::CsvExporter;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding one respondent record
    #[arg(long)]
    pub(crate) record: PathBuf,
    /// Print the rankings as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BookletArgs {
    /// JSON file holding one respondent record
    #[arg(long)]
    pub(crate) record: PathBuf,
    /// Directory the PDF is written to
    #[arg(long, default_value = ".")]
    pub(crate) out_dir: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// JSON file holding an array of records
    #[arg(long)]
    pub(crate) records: PathBuf,
    /// Output CSV path (prints to stdout when omitted)
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let record = read_record(&args.record)?;
    let outcome = AssessmentOutcome::from_record(&record);

    if args.json {
        let completion = CompletionStatus::from_record(&record);
        let payload = serde_json::json!({ "outcome": outcome, "completion": completion });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Scores for {}", record.display_name());
    render_ranking(DimensionSet::Traits, outcome.big_five.as_ref());
    render_ranking(DimensionSet::Needs, outcome.basic_needs.as_ref());
    Ok(())
}

pub(crate) fn run_booklet(args: BookletArgs) -> Result<(), AppError> {
    let (service, record) = prepare(&args)?;
    let (file_name, bytes) = service.render(&record)?;
    let path = write_pdf(&args, &file_name, &bytes)?;

    println!("Booklet written to {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

pub(crate) fn run_thank_you(args: BookletArgs) -> Result<(), AppError> {
    let (service, record) = prepare(&args)?;
    let (file_name, bytes) = service.render_thank_you(&record)?;
    let path = write_pdf(&args, &file_name, &bytes)?;

    println!("Thank-you letter written to {}", path.display());
    Ok(())
}

fn prepare(args: &BookletArgs) -> Result<(BookletService, RespondentRecord), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let record = read_record(&args.record)?;
    Ok((BookletService::from_config(&config.assets), record))
}

fn write_pdf(args: &BookletArgs, file_name: &str, bytes: &[u8]) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(&args.out_dir)?;
    let path = args.out_dir.join(file_name);
    std::fs::write(&path, bytes)?;
    Ok(path)
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let rows = read_rows(&args.records)?;
    let csv = CsvExporter::export(&rows)?;

    match args.out {
        Some(path) => {
            std::fs::write(&path, csv)?;
            println!("Exported {} records to {}", rows.len(), path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}

fn render_ranking<D: Dimension>(set: DimensionSet, ranking: Option<&Ranking<D>>) {
    println!("\n{}", set.label());

    let Some(ranking) = ranking else {
        println!("- {}", set.not_completed_message());
        return;
    };

    for entry in &ranking.ranked {
        println!(
            "{}. {:<18} raw {:>2}  {:>3}%",
            entry.rank, entry.label, entry.raw_sum, entry.percentile
        );
    }

    match ranking.dominant_pair {
        Some(pair) => {
            let (first, second) = pair.labels();
            println!("Dominant pair: {first} & {second}");
        }
        None => println!("Dominant pair: not enough data"),
    }
}
