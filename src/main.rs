/*!
 * Command-line interface for codedump
 */

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::ThreadPoolBuilder;

use codedump::config::{Args, Config};
use codedump::error::Result;
use codedump::report::{ReportFormat, Reporter, ScanReport};
use codedump::scanner::Scanner;
use codedump::writer::MarkdownWriter;

fn setup_logging(verbose: u8) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // stdout may carry the document
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut cmd = Args::command();
        generate(shell, &mut cmd, "codedump", &mut io::stdout());
        return Ok(());
    }

    setup_logging(args.verbose);

    let config = Config::from_args(args);
    config.validate()?;

    // Configure thread pool
    if let Err(e) = ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build_global()
    {
        tracing::warn!(error = %e, "failed to set thread pool size");
    }

    let progress = if config.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    match ProgressStyle::default_bar().template(
        "{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ({percent}%) ⏱️  Elapsed: {elapsed_precise}",
    ) {
        Ok(style) => progress.set_style(style),
        Err(e) => tracing::debug!(error = %e, "using default progress style"),
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📊 Scanning");
    progress.set_message(format!(
        "📂 Scanning directory: {}",
        config.target_dir.display()
    ));

    let start_time = Instant::now();

    let scanner = Scanner::new(config.clone(), Arc::new(progress.clone()))?;
    let writer = MarkdownWriter::new(config.clone());

    let dump = scanner.scan()?;
    progress.finish_and_clear();
    writer.write(&dump)?;

    let total_duration = start_time.elapsed();

    if !config.quiet {
        let output_file = config
            .output_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<stdout>".to_string());
        let scan_report = ScanReport::from_dump(
            &dump,
            output_file,
            total_duration,
            scanner.get_statistics().file_details,
        );

        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        reporter.print_report(&scan_report);
    }

    Ok(())
}
