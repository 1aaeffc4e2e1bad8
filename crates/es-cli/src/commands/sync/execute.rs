//! Progress display and run state persistence while a job runs

use es_core::{SyncResult, SyncRunState};
use es_sync::{ProgressEvent, ProgressReporter};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use super::report::entity_line;

/// Reporter used by the CLI
///
/// Drives an optional progress bar, prints one line per finished entity,
/// and rewrites the run state after every entity so an interrupted job
/// still leaves an accurate record behind.
pub(crate) struct CliReporter {
    bar: Option<ProgressBar>,
    print_lines: bool,
    state: SyncRunState,
    state_path: PathBuf,
}

impl CliReporter {
    pub(crate) fn new(
        total: usize,
        show_progress: bool,
        print_lines: bool,
        state: SyncRunState,
        state_path: PathBuf,
    ) -> Self {
        let bar = show_progress.then(|| {
            let pb = ProgressBar::new(total as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb
        });

        let reporter = Self {
            bar,
            print_lines,
            state,
            state_path,
        };
        reporter.save_state();
        reporter
    }

    fn save_state(&self) {
        if let Err(e) = self.state.save(&self.state_path) {
            log::warn!(
                "Failed to save run state to {}: {}",
                self.state_path.display(),
                e
            );
        }
    }

    /// Close the progress bar and persist the final run status
    pub(crate) fn finish(mut self) -> SyncRunState {
        if let Some(pb) = self.bar.take() {
            pb.finish_and_clear();
        }
        self.state.mark_run_completed();
        self.save_state();
        self.state
    }
}

impl ProgressReporter for CliReporter {
    fn report(&mut self, event: &ProgressEvent) {
        log::debug!(
            "[{}/{}] {} {}",
            event.ordinal(),
            event.total,
            event.kind,
            event.entity_key
        );
        if let Some(pb) = &self.bar {
            pb.set_message(format!("{} ({}/{})", event.label, event.ordinal(), event.total));
        }
    }

    fn finished(&mut self, result: &SyncResult) {
        self.state.record(result);
        self.save_state();

        if self.print_lines {
            let line = entity_line(result);
            match &self.bar {
                Some(pb) => pb.println(line),
                None => println!("{}", line),
            }
        }
        if let Some(pb) = &self.bar {
            pb.inc(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use es_core::{EntityKey, JobKind, RunStatus};
    use tempfile::TempDir;

    #[test]
    fn test_state_saved_after_each_entity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("target").join("sync_state.json");
        let state = SyncRunState::new(
            JobKind::Delete,
            None,
            vec![EntityKey::new("safe_transactions"), EntityKey::new("safes")],
        );

        let mut reporter = CliReporter::new(2, false, false, state, path.clone());
        assert_eq!(
            SyncRunState::load(&path).unwrap().unwrap().pending_entities.len(),
            2
        );

        reporter.finished(&SyncResult::success(
            EntityKey::new("safe_transactions"),
            "Safe Transactions",
            "deleted",
        ));
        let saved = SyncRunState::load(&path).unwrap().unwrap();
        assert!(saved.is_completed("safe_transactions"));
        assert_eq!(saved.status, RunStatus::Running);

        reporter.finished(&SyncResult::error(EntityKey::new("safes"), "Safes", "in use"));
        let final_state = reporter.finish();
        assert_eq!(final_state.status, RunStatus::Failed);

        let saved = SyncRunState::load(&path).unwrap().unwrap();
        assert_eq!(saved.status, RunStatus::Failed);
        assert_eq!(saved.failed_keys(), vec!["safes"]);
    }
}
