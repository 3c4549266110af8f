use anyhow::Context;
use clap::Parser;
use icon_tracker::{
    args::{IngestCli, ProjectPaths},
    ingest::{IngestOptions, ingest},
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = IngestCli::parse();

    let paths = ProjectPaths::resolve(cli.project_root).context("Resolving the project root")?;
    log::info!("Starting ingestion from {:?}...", paths.assets_dir());

    let options = IngestOptions {
        threshold: cli.threshold,
        dry_run: cli.dry_run,
    };
    let report = match ingest(&paths, &options) {
        Ok(report) => report,
        Err(e) if e.is_missing_input() => {
            log::error!("{}", e);
            return Ok(());
        }
        Err(e) => return Err(e).context("Ingesting icons"),
    };

    log::info!("--- Ingestion Complete ---");
    log::info!("Matches found: {}", report.matched);
    log::info!("New assignments: {}", report.newly_assigned);
    log::info!("Total processed: {}", report.processed());
    log::info!("Skipped: {}", report.skipped.len());
    log::info!("Remaining empty slots: {}", report.remaining_empty_slots);
    log::info!("Tracker total: {} complete", report.total_complete);

    Ok(())
}
