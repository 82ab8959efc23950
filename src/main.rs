use clap::Parser;
use log::{error, warn};
use service_report::report::{ImageOutcome, Letterhead, ReportRecord, ReportRenderer};
use service_report::ImageSource;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "service-report")]
#[command(about = "Render a maintenance service record (JSON) into a PDF report", long_about = None)]
#[command(version)]
struct Cli {
    /// Service record as JSON
    record: PathBuf,
    /// Where to write the PDF; defaults to REPORTE_<SERVICE>_<Client>.pdf
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Logo drawn in the page header
    #[arg(long)]
    logo: Option<PathBuf>,
}

fn run(cli: Cli) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(&cli.record)?;
    let record = ReportRecord::from_json(&json)?;

    let mut letterhead = Letterhead::default();
    if let Some(logo) = cli.logo {
        letterhead = letterhead.with_logo(ImageSource::Path(logo));
    }
    let renderer = ReportRenderer::new().with_letterhead(letterhead);
    let (pdf, summary) = renderer.render_with_summary(&record)?;

    let output = cli
        .output
        .unwrap_or_else(|| PathBuf::from(record.suggested_file_name()));
    std::fs::write(&output, pdf)?;

    let invalid = summary
        .photos
        .iter()
        .chain(summary.signatures.iter())
        .filter(|outcome| **outcome == ImageOutcome::Invalid)
        .count();
    if invalid > 0 {
        warn!("{invalid} image(s) could not be decoded and were left out");
    }
    Ok(output)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(output) => {
            println!("{}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
