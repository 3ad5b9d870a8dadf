use analyzer::{Analyzer, Stage};
use anyhow::Context;
use clap::Parser;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use configuration::{init_logging, load_settings, CliArgs};
use dump_store::DumpRepository;
use indicatif::{ProgressBar, ProgressStyle};

/// The main entry point for the dump analyzer.
fn main() -> anyhow::Result<()> {
    // Pick up DUMP_ANALYZER_* overrides from a .env file, if there is one
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let settings = load_settings(args.config.as_deref()).context("Failed to load settings")?;

    let repo = DumpRepository::open(&args.directory, settings.layout.clone())
        .context("Failed to open the dump directory")?;
    init_logging(&settings.logging, repo.root()).context("Failed to initialize logging")?;

    tracing::info!(directory = %repo.root().display(), "Starting dump analysis.");

    // ==============================================================================
    // Analysis Stages
    // ==============================================================================

    let progress = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(Stage::ALL.len() as u64)
    };
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );

    let analyzer = Analyzer::new(settings);
    let outcome = analyzer
        .run_with_progress(&repo, |stage| {
            progress.set_position(stage.index() as u64);
            progress.set_message(stage.describe());
        })
        .context("Dump analysis failed")?;
    progress.finish_with_message("Done!");

    // ==============================================================================
    // Run Summary
    // ==============================================================================

    if !args.quiet {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["Merchant", "Revenue", "Holding cost", "Order cost", "Profit"]);
        for summary in &outcome.report.summaries {
            table.add_row(vec![
                summary.name.clone(),
                format!("{:.2}", summary.revenue),
                format!("{:.2}", summary.holding_cost),
                format!("{:.2}", summary.order_cost),
                format!("{:.2}", summary.profit),
            ]);
        }
        println!("{table}");

        let unknown = &outcome.report.unknown_merchants;
        if !unknown.is_empty() {
            println!("Ignored {} merchant(s) missing from the mapping.", unknown.len());
        }
        for path in &outcome.artifacts {
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}
