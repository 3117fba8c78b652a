// Command-line entry point: load a campaign export, write the metrics report.
use anyhow::{Context, Result};
use campaign_metrics::{compute_campaign_report, loader, output, util};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "campaign_metrics")]
#[command(about = "Group ad campaigns by keyword and compute performance benchmarks")]
struct Args {
    /// Campaign performance export (CSV with a header row)
    input: PathBuf,

    /// Comma-separated keywords used to group campaign names
    #[arg(short, long, env = "CAMPAIGN_KEYWORDS", default_value = "")]
    keywords: String,

    /// Where to write the metrics CSV
    #[arg(short, long, default_value = output::DOWNLOAD_FILENAME)]
    output: PathBuf,

    /// Optional path for a JSON summary across all groups
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Number of report rows to print to the console
    #[arg(long, default_value_t = 20)]
    preview: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let (table, load_report) = loader::load_table(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    info!(
        "Processing dataset... ({} rows loaded, {} skipped)",
        util::format_int(load_report.loaded_rows),
        util::format_int(load_report.parse_errors)
    );

    let report = compute_campaign_report(table, &args.keywords)?;

    output::write_csv(&args.output, &report.rows)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!("Campaign Performance Benchmarks\n");
    output::preview_table_rows(&report.rows, args.preview);
    println!("(Full table exported to {})\n", args.output.display());

    if let Some(path) = &args.summary {
        let summary = report.summary();
        output::write_json(path, &summary)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!(
            "Summary Stats ({}): {} groups, total spend ${}",
            path.display(),
            summary.total_groups,
            util::format_number(summary.totals.spend, 2)
        );
    }

    Ok(())
}
