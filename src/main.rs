use anyhow::{Context, Result};
use clap::Parser;
use ticknoise::cli::{Cli, OutputFormat};
use ticknoise::config::AnalysisConfig;
use ticknoise::csv_output::{histogram_to_csv, CsvSeriesOutput, CsvStatsOutput};
use ticknoise::histogram::histogram;
use ticknoise::json_output::JsonReport;
use ticknoise::pipeline::{analyze, Analysis};
use ticknoise::table::read_table;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; `--debug` forces TRACE, otherwise RUST_LOG or warn
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print the report in the requested format
fn print_report(analysis: &Analysis, format: OutputFormat) -> Result<()> {
    let report = analysis.report();
    match format {
        OutputFormat::Text => {
            println!("{}", report.strategy_summary());
            println!();
            print!("{}", report.to_report_string());
        }
        OutputFormat::Json => {
            let json = JsonReport::from_analysis(analysis)
                .to_json()
                .context("Failed to serialize report")?;
            println!("{}", json);
        }
        OutputFormat::Csv => {
            print!("{}", CsvStatsOutput::new(report).to_csv());
        }
    }
    Ok(())
}

/// Write the plot-support exports requested on the command line
fn write_exports(args: &Cli, analysis: &Analysis) -> Result<()> {
    if let Some(path) = &args.export_series {
        std::fs::write(path, CsvSeriesOutput::new(analysis).to_csv())
            .with_context(|| format!("Failed to write series export {}", path.display()))?;
        eprintln!("Series saved to {}", path.display());
    }

    if let Some(path) = &args.export_histogram {
        let detrended = analysis.report().detrended();
        let hist = histogram(
            analysis.detrended(),
            args.bins,
            detrended.mean,
            detrended.real_std,
        )?;
        std::fs::write(path, histogram_to_csv(&hist))
            .with_context(|| format!("Failed to write histogram export {}", path.display()))?;
        eprintln!("Histogram saved to {}", path.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let base = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    let config = args.apply_to(base)?;
    config.validate()?;

    let series = read_table(&args.input, &config.table)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    tracing::debug!(samples = series.len(), "input loaded");

    let analysis = analyze(&series, &config)?;

    print_report(&analysis, args.format)?;
    write_exports(&args, &analysis)?;

    Ok(())
}
