//! Status command implementation

use anyhow::{Context, Result};
use es_core::{RunStatus, SyncRunState};

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::context::RuntimeContext;

/// Execute the status command
pub(crate) async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let path = ctx.project.run_state_path();

    let Some(state) = SyncRunState::load(&path).context("Failed to load run state")? else {
        match args.output {
            OutputFormat::Text => println!("No sync run recorded yet"),
            OutputFormat::Json => println!("null"),
        }
        return Ok(());
    };

    match args.output {
        OutputFormat::Text => {
            for line in status_lines(&state) {
                println!("{}", line);
            }
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&state).context("Failed to serialize run state")?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn status_lines(state: &SyncRunState) -> Vec<String> {
    let summary = state.summary();
    let mut lines = vec![
        format!("Run:       {}", state.run_id),
        format!("Kind:      {}", state.kind),
    ];
    if let Some(mode) = state.import_mode {
        lines.push(format!("Mode:      {}", mode));
    }
    if state.dry_run {
        lines.push("Dry run:   yes".to_string());
    }
    if state.status == RunStatus::Running {
        // Nothing marks a run killed mid-way; its state stays `running`
        lines.push("Status:    running (interrupted unless erpsync is still active)".to_string());
    } else {
        lines.push(format!("Status:    {}", state.status));
    }
    lines.push(format!(
        "Started:   {}",
        state.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    lines.push(format!(
        "Updated:   {}",
        state.last_updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    lines.push(format!(
        "Entities:  {} completed, {} failed, {} pending ({}ms)",
        summary.completed, summary.failed, summary.pending, summary.total_duration_ms
    ));

    if !state.failed_entities.is_empty() {
        lines.push(String::new());
        lines.push("Failed:".to_string());
        for failed in &state.failed_entities {
            lines.push(format!("  ✗ {}: {}", failed.key, failed.error));
        }
    }

    if !state.pending_entities.is_empty() {
        lines.push(String::new());
        lines.push("Pending:".to_string());
        for key in &state.pending_entities {
            lines.push(format!("  - {}", key));
        }
    }

    if !state.failed_entities.is_empty() || !state.pending_entities.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Re-run failed and pending entities with: erpsync {} --retry-failed",
            state.kind
        ));
    }
    lines
}
