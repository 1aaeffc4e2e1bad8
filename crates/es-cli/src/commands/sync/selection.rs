//! Turning CLI selection flags into a job

use anyhow::{bail, Context, Result};
use es_core::{
    CoreError, EntityCatalog, EntityKey, ImportMode, JobKind, SelectionModel, SyncJob,
    SyncRunState,
};
use std::path::Path;

use crate::cli::SelectionArgs;

/// Build the job described by the selection flags
///
/// `--retry-failed` re-runs the previous run's failed entities plus any it
/// never reached (a run interrupted with Ctrl-C leaves them pending).
/// Returns `Ok(None)` when there is nothing to retry.
pub(crate) fn build_job(
    catalog: &EntityCatalog,
    args: &SelectionArgs,
    kind: JobKind,
    mode: ImportMode,
    state_path: &Path,
) -> Result<Option<SyncJob>> {
    let mut selection = SelectionModel::new(catalog);
    selection.set_mode(mode);

    if args.retry_failed {
        let keys = retry_keys(catalog, kind, state_path)?;
        if keys.is_empty() {
            return Ok(None);
        }
        for key in &keys {
            selection.select(key)?;
        }
    } else if args.all {
        selection.select_all();
    } else if !args.entities.is_empty() {
        for key in &args.entities {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            if !selection.select(key)? {
                return Err(CoreError::DisabledEntity {
                    key: key.to_string(),
                }
                .into());
            }
        }
    } else {
        bail!("No entities selected. Use --entities, --all or --retry-failed");
    }

    if args.with_deps {
        add_related(catalog, &mut selection, kind)?;
    }

    Ok(Some(selection.build_job(kind)?))
}

/// The previous run, which must have been of the same kind
pub(crate) fn previous_run(kind: JobKind, state_path: &Path) -> Result<SyncRunState> {
    let Some(state) = SyncRunState::load(state_path).context("Failed to load run state")? else {
        bail!("No previous run found. Run 'erpsync {}' first.", kind);
    };

    if state.kind != kind {
        bail!(
            "The previous run was a {} (run {}); --retry-failed only re-runs a {} run",
            state.kind,
            state.run_id,
            kind
        );
    }
    Ok(state)
}

/// Failed and never-attempted entities of the previous run
fn retry_keys(catalog: &EntityCatalog, kind: JobKind, state_path: &Path) -> Result<Vec<EntityKey>> {
    let state = previous_run(kind, state_path)?;
    if !state.pending_entities.is_empty() {
        log::info!(
            "Run {} left {} entities unfinished; retrying them too",
            state.run_id,
            state.pending_entities.len()
        );
    }

    let mut keys = Vec::new();
    for key in state.failed_keys().into_iter().chain(state.pending_entities) {
        if catalog.is_enabled(&key) {
            keys.push(key);
        } else {
            log::warn!("Skipping '{}': no longer an enabled entity", key);
        }
    }
    Ok(keys)
}

/// Add transitive dependencies (import) or dependents (delete)
fn add_related(
    catalog: &EntityCatalog,
    selection: &mut SelectionModel<'_>,
    kind: JobKind,
) -> Result<()> {
    let chosen: Vec<EntityKey> = selection.selected_keys().into_iter().cloned().collect();
    for key in &chosen {
        let related = match kind {
            JobKind::Import => catalog.transitive_dependencies(key),
            JobKind::Delete => catalog.transitive_dependents(key),
        };
        for other in related {
            if !selection.select(&other)? {
                log::warn!(
                    "'{}' is related to '{}' but disabled; leaving it out",
                    other,
                    key
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use es_core::SyncResult;
    use tempfile::TempDir;

    fn args(entities: &[&str]) -> SelectionArgs {
        SelectionArgs {
            entities: entities.iter().map(|e| e.to_string()).collect(),
            ..SelectionArgs::default()
        }
    }

    fn build(
        catalog: &EntityCatalog,
        args: &SelectionArgs,
        kind: JobKind,
        state_path: &Path,
    ) -> Result<Option<SyncJob>> {
        build_job(catalog, args, kind, ImportMode::Update, state_path)
    }

    #[test]
    fn test_explicit_entities() {
        let catalog = EntityCatalog::builtin().unwrap();
        let dir = TempDir::new().unwrap();
        let job = build(
            &catalog,
            &args(&["clients", " safes "]),
            JobKind::Import,
            &dir.path().join("state.json"),
        )
        .unwrap()
        .unwrap();

        assert_eq!(job.len(), 2);
        assert!(job.contains("safes"));
    }

    #[test]
    fn test_disabled_entity_is_an_error() {
        let catalog = EntityCatalog::builtin().unwrap();
        let dir = TempDir::new().unwrap();
        let err = build(
            &catalog,
            &args(&["sales_returns"]),
            JobKind::Import,
            &dir.path().join("state.json"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("disabled"));
    }

    #[test]
    fn test_nothing_selected_is_an_error() {
        let catalog = EntityCatalog::builtin().unwrap();
        let dir = TempDir::new().unwrap();
        assert!(build(
            &catalog,
            &SelectionArgs::default(),
            JobKind::Delete,
            &dir.path().join("state.json"),
        )
        .is_err());
    }

    #[test]
    fn test_with_deps_import_adds_dependencies() {
        let catalog = EntityCatalog::builtin().unwrap();
        let dir = TempDir::new().unwrap();
        let mut selection = args(&["clients"]);
        selection.with_deps = true;

        let job = build(&catalog, &selection, JobKind::Import, &dir.path().join("s.json"))
            .unwrap()
            .unwrap();
        for key in ["clients", "client_types", "area_tags", "governorates", "countries"] {
            assert!(job.contains(key), "missing {}", key);
        }
        assert_eq!(job.len(), 5);
    }

    #[test]
    fn test_with_deps_delete_adds_dependents() {
        let catalog = EntityCatalog::builtin().unwrap();
        let dir = TempDir::new().unwrap();
        let mut selection = args(&["safes"]);
        selection.with_deps = true;

        let job = build(&catalog, &selection, JobKind::Delete, &dir.path().join("s.json"))
            .unwrap()
            .unwrap();
        assert!(job.contains("safe_transactions"));
        assert_eq!(job.len(), 2);
    }

    #[test]
    fn test_retry_failed_uses_previous_failures() {
        let catalog = EntityCatalog::builtin().unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sync_state.json");

        let mut state = SyncRunState::new(
            JobKind::Import,
            Some(ImportMode::Update),
            vec![EntityKey::new("products"), EntityKey::new("product_variants")],
        );
        state.record(&SyncResult::error(EntityKey::new("products"), "Products", "boom"));
        state.record(&SyncResult::success(
            EntityKey::new("product_variants"),
            "Product Variants",
            "ok",
        ));
        state.save(&path).unwrap();

        let retry = SelectionArgs {
            retry_failed: true,
            ..SelectionArgs::default()
        };
        let job = build(&catalog, &retry, JobKind::Import, &path).unwrap().unwrap();
        assert_eq!(job.len(), 1);
        assert!(job.contains("products"));

        // A delete retry must not pick up an import run
        assert!(build(&catalog, &retry, JobKind::Delete, &path).is_err());
    }

    #[test]
    fn test_retry_failed_includes_unfinished_entities() {
        let catalog = EntityCatalog::builtin().unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sync_state.json");

        // Interrupted after the first entity: never marked completed
        let mut state = SyncRunState::new(
            JobKind::Delete,
            None,
            vec![
                EntityKey::new("safe_transactions"),
                EntityKey::new("safes"),
                EntityKey::new("warehouses"),
            ],
        );
        state.record(&SyncResult::error(
            EntityKey::new("safe_transactions"),
            "Safe Transactions",
            "locked",
        ));
        state.save(&path).unwrap();

        let retry = SelectionArgs {
            retry_failed: true,
            ..SelectionArgs::default()
        };
        let job = build(&catalog, &retry, JobKind::Delete, &path).unwrap().unwrap();
        assert_eq!(job.len(), 3);
        for key in ["safe_transactions", "safes", "warehouses"] {
            assert!(job.contains(key), "missing {}", key);
        }
    }

    #[test]
    fn test_retry_failed_without_failures() {
        let catalog = EntityCatalog::builtin().unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sync_state.json");
        SyncRunState::new(JobKind::Delete, None, Vec::new())
            .save(&path)
            .unwrap();

        let retry = SelectionArgs {
            retry_failed: true,
            ..SelectionArgs::default()
        };
        assert!(build(&catalog, &retry, JobKind::Delete, &path)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_retry_failed_without_state() {
        let catalog = EntityCatalog::builtin().unwrap();
        let dir = TempDir::new().unwrap();
        let retry = SelectionArgs {
            retry_failed: true,
            ..SelectionArgs::default()
        };
        let err = build(&catalog, &retry, JobKind::Import, &dir.path().join("none.json"))
            .unwrap_err();
        assert!(err.to_string().contains("No previous run found"));
    }
}
