//! Delete command implementation

use anyhow::{bail, Context, Result};
use dialoguer::Confirm;
use es_core::{EntityCatalog, ImportMode, JobKind, SyncJob};
use std::io::IsTerminal;

use crate::cli::{DeleteArgs, GlobalArgs, OutputFormat};
use crate::commands::common::{ExitCode, EXIT_VALIDATION};
use crate::commands::sync::{run_job, selection};
use crate::context::RuntimeContext;

/// Execute the delete command
pub(crate) async fn execute(args: &DeleteArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let catalog = &ctx.project.catalog;

    let Some(job) = selection::build_job(
        catalog,
        &args.selection,
        JobKind::Delete,
        ImportMode::default(),
        &ctx.project.run_state_path(),
    )?
    else {
        println!("Nothing to retry: the previous delete had no failed or unfinished entities");
        return Ok(());
    };

    if !args.yes && !confirm_delete(catalog, &job, args.output)? {
        println!("Delete cancelled");
        return Err(ExitCode(EXIT_VALIDATION).into());
    }

    run_job(&ctx, job, args.output, args.quiet).await
}

/// Labels in the order they will be deleted
fn delete_plan(catalog: &EntityCatalog, job: &SyncJob) -> Vec<String> {
    job.execution_order(catalog)
        .into_iter()
        .map(|e| format!("{} ({})", e.label, e.key))
        .collect()
}

fn confirm_delete(catalog: &EntityCatalog, job: &SyncJob, output: OutputFormat) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        bail!("Refusing to delete without confirmation; pass --yes when not running interactively");
    }

    // Keep stdout clean for JSON consumers
    if output == OutputFormat::Text {
        println!("The following entities will be deleted, in this order:");
        for (i, line) in delete_plan(catalog, job).iter().enumerate() {
            println!("  {}. {}", i + 1, line);
        }
    }

    Confirm::new()
        .with_prompt(format!("Delete {} entities from the ERP?", job.len()))
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}
