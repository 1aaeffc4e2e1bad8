//! Import command implementation

use anyhow::Result;
use es_core::{ImportMode, JobKind, SyncRunState};

use crate::cli::{GlobalArgs, ImportArgs};
use crate::commands::sync::{run_job, selection};
use crate::context::RuntimeContext;

/// Execute the import command
pub(crate) async fn execute(args: &ImportArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let state_path = ctx.project.run_state_path();

    let previous = if args.selection.retry_failed {
        Some(selection::previous_run(JobKind::Import, &state_path)?)
    } else {
        None
    };
    let (mode, dry_run) = import_settings(
        args,
        ctx.project.config.defaults.import_mode,
        previous.as_ref(),
    );

    let Some(job) = selection::build_job(
        &ctx.project.catalog,
        &args.selection,
        JobKind::Import,
        mode,
        &state_path,
    )?
    else {
        println!("Nothing to retry: the previous import had no failed or unfinished entities");
        return Ok(());
    };

    let job = job.with_dry_run(dry_run);
    ctx.verbose(&format!(
        "Importing {} entities in {} mode{}",
        job.len(),
        mode,
        if job.dry_run() { " (dry run)" } else { "" }
    ));

    run_job(&ctx, job, args.output, args.quiet).await
}

/// Mode and dry-run flag for this import
///
/// A retry repeats the previous run's mode unless `--mode` is given, and a
/// retried dry run stays a dry run.
fn import_settings(
    args: &ImportArgs,
    default_mode: ImportMode,
    previous: Option<&SyncRunState>,
) -> (ImportMode, bool) {
    let mode = args
        .mode
        .map(ImportMode::from)
        .or_else(|| previous.and_then(|s| s.import_mode))
        .unwrap_or(default_mode);
    let dry_run = args.dry_run || previous.is_some_and(|s| s.dry_run);
    (mode, dry_run)
}
