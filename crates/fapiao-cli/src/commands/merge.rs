//! Merge command - scrape a receipt directory and merge PDFs by date.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use fapiao_core::models::config::FapiaoConfig;
use fapiao_core::pipeline::{
    BatchPipeline, BatchReport, PipelineEvent, PipelineObserver, TracingObserver,
};

const DEFAULT_NAME: &str = "my_health_invoices";
const INPUT_FOLDER: &str = "发票";
const OUTPUT_FOLDER: &str = "merged_invoices";

/// Arguments for the merge command.
#[derive(Args)]
pub struct MergeArgs {
    /// Directory containing the receipt PDFs
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory receiving one merged PDF per date
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Collection name used for the default directories
    #[arg(short, long, default_value = DEFAULT_NAME)]
    name: String,

    /// Also write summary.csv to the output directory
    #[arg(long)]
    summary: bool,
}

/// Logs every event and advances a progress bar once per scanned file.
struct ProgressObserver {
    inner: TracingObserver,
    bar: ProgressBar,
}

impl ProgressObserver {
    fn new() -> anyhow::Result<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
                .progress_chars("=>-"),
        );
        Ok(Self {
            inner: TracingObserver,
            bar,
        })
    }
}

impl PipelineObserver for ProgressObserver {
    fn on_event(&self, event: &PipelineEvent<'_>) {
        self.bar.suspend(|| self.inner.on_event(event));
        match event {
            PipelineEvent::Scanned { files, .. } => self.bar.set_length(*files as u64),
            PipelineEvent::RecordExtracted { .. } | PipelineEvent::FileSkipped { .. } => {
                self.bar.inc(1)
            }
            PipelineEvent::Deduplicated { .. } => self.bar.finish_and_clear(),
            _ => {}
        }
    }
}

pub async fn run(args: MergeArgs, config: &FapiaoConfig) -> anyhow::Result<()> {
    let start = Instant::now();

    let input_dir = match args.input.clone().or_else(|| config.paths.input_dir.clone()) {
        Some(dir) => dir,
        None => downloads_dir()?.join(INPUT_FOLDER).join(&args.name),
    };
    let output_dir = match args.output.clone().or_else(|| config.paths.output_dir.clone()) {
        Some(dir) => dir,
        None => downloads_dir()?.join(OUTPUT_FOLDER).join(&args.name),
    };

    fs::create_dir_all(&input_dir)?;
    fs::create_dir_all(&output_dir)?;
    info!("Input directory: {}", input_dir.display());
    info!("Output directory: {}", output_dir.display());

    let observer = ProgressObserver::new()?;
    let pipeline = BatchPipeline::new(config);
    let report = pipeline.run(&input_dir, &output_dir, &observer)?;
    observer.bar.finish_and_clear();

    if args.summary || config.merge.write_summary {
        let summary_path = output_dir.join("summary.csv");
        write_summary(&summary_path, &report)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    print_report(&report, start);
    Ok(())
}

fn downloads_dir() -> anyhow::Result<PathBuf> {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .ok_or_else(|| anyhow::anyhow!("Cannot determine the Downloads directory; pass --input and --output"))
}

fn print_report(report: &BatchReport, start: Instant) {
    if report.scanned == 0 {
        println!("{} No PDF files found", style("ℹ").blue());
        return;
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        report.scanned,
        start.elapsed()
    );
    println!(
        "   {} extracted, {} kept after deduplication, {} skipped",
        style(report.records.len()).green(),
        style(report.kept.len()).green(),
        style(report.skipped.len()).red()
    );

    for group in &report.groups {
        let label = group
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unknown date".to_string());
        if group.written {
            println!(
                "   {} {}: {} files, {} pages -> {}",
                style("✓").green(),
                label,
                group.files,
                group.pages,
                group.output.display()
            );
        } else {
            println!(
                "   {} {}: nothing written",
                style("✗").red(),
                label
            );
        }
        for path in &group.failed {
            println!("       - {} could not be merged", path.display());
        }
    }

    if !report.skipped.is_empty() {
        println!();
        println!("{}", style("Skipped files:").red());
        for path in &report.skipped {
            println!("  - {}", path.display());
        }
    }
}

fn write_summary(path: &Path, report: &BatchReport) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "invoice_code",
        "date",
        "year",
        "payer",
        "amount",
        "modified",
        "status",
    ])?;

    for record in &report.records {
        let status = if report.is_kept(record) { "kept" } else { "duplicate" };
        wtr.write_record([
            record.filename.as_str(),
            record.invoice_code.as_deref().unwrap_or(""),
            &record.date_key().unwrap_or_default(),
            &record.year().unwrap_or_default(),
            record.payer.as_deref().unwrap_or(""),
            &record.amount.map(|a| a.to_string()).unwrap_or_default(),
            &record.modified.to_rfc3339(),
            status,
        ])?;
    }

    for path in &report.skipped {
        let filename = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        wtr.write_record([filename, "", "", "", "", "", "", "skipped"])?;
    }

    wtr.flush()?;
    Ok(())
}
