//! Running an import or delete job against the remote ERP

pub(crate) mod execute;
mod report;
pub(crate) mod selection;

use anyhow::{Context, Result};
use es_core::{EntityKey, SyncJob, SyncRunState};
use es_sync::SyncExecutor;
use std::time::Instant;

use crate::cli::OutputFormat;
use crate::commands::common::{write_json_results, ExitCode, SyncReport, EXIT_ENTITY_FAILED};
use crate::context::RuntimeContext;
use execute::CliReporter;

/// Execute a job, persist its state and report, and print the results
///
/// Returns `ExitCode(4)` when at least one entity failed.
pub(crate) async fn run_job(
    ctx: &RuntimeContext,
    job: SyncJob,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let catalog = &ctx.project.catalog;
    let connector = ctx.connector()?;

    let order: Vec<EntityKey> = job
        .execution_order(catalog)
        .into_iter()
        .map(|e| e.key.clone())
        .collect();
    ctx.verbose(&format!(
        "{} order: {}",
        job.kind(),
        order
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    ));

    let mut state = SyncRunState::new(job.kind(), job.import_mode(), order.clone());
    state.dry_run = job.dry_run();

    let text = output == OutputFormat::Text;
    let show_progress = text && !quiet;
    let mut reporter = CliReporter::new(
        order.len(),
        show_progress,
        show_progress,
        state,
        ctx.project.run_state_path(),
    );

    if show_progress {
        println!(
            "Running {} of {} entities{}...",
            job.kind(),
            order.len(),
            if job.dry_run() { " (dry run)" } else { "" }
        );
    }

    let start = Instant::now();
    let results = SyncExecutor::new(catalog, &connector)
        .run(&job, &mut reporter)
        .await;
    let elapsed_secs = start.elapsed().as_secs_f64();
    let state = reporter.finish();
    log::debug!("Run {} finished with status {}", state.run_id, state.status);

    let report = SyncReport::new(
        job.kind(),
        job.import_mode(),
        job.dry_run(),
        elapsed_secs,
        &results,
    );
    let results_path = ctx.project.results_path();
    write_json_results(&results_path, &report)?;
    ctx.verbose(&format!("Results written to {}", results_path.display()));

    match output {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize results")?;
            println!("{}", json);
        }
        OutputFormat::Text => report::print_results(job.kind(), &results, elapsed_secs, quiet),
    }

    if results.iter().any(|r| r.is_error()) {
        return Err(ExitCode(EXIT_ENTITY_FAILED).into());
    }
    Ok(())
}
