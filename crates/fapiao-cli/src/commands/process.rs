//! Process command - extract the fields of a single receipt.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::debug;

use fapiao_core::invoice::InvoiceProcessor;
use fapiao_core::models::config::FapiaoConfig;
use fapiao_core::models::invoice::InvoiceRecord;
use fapiao_core::pipeline::TracingObserver;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config: &FapiaoConfig) -> anyhow::Result<()> {
    let start = Instant::now();

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let processor = InvoiceProcessor::new(&config.extraction);
    let record = processor.process(&args.input, &TracingObserver)?;

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&record)?,
        OutputFormat::Text => format_record_text(&record),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());
    Ok(())
}

fn format_record_text(record: &InvoiceRecord) -> String {
    let missing = "-".to_string();
    let mut output = String::new();

    output.push_str(&format!("File:         {}\n", record.filename));
    output.push_str(&format!(
        "Invoice code: {}\n",
        record.invoice_code.as_ref().unwrap_or(&missing)
    ));
    output.push_str(&format!(
        "Date:         {}\n",
        record.date_key().unwrap_or_else(|| missing.clone())
    ));
    output.push_str(&format!(
        "Payer:        {}\n",
        record.payer.as_ref().unwrap_or(&missing)
    ));
    output.push_str(&format!(
        "Amount:       {}\n",
        record.amount.map(|a| a.to_string()).unwrap_or_else(|| missing.clone())
    ));
    output.push_str(&format!("Modified:     {}\n", record.modified.to_rfc3339()));

    let fields = record.missing_fields();
    if !fields.is_empty() {
        let names: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
        output.push_str(&format!("\nMissing: {}\n", names.join(", ")));
    }

    output
}
