use super::*;
use tempfile::tempdir;

fn keys(names: &[&str]) -> Vec<EntityKey> {
    names.iter().map(|n| EntityKey::new(*n)).collect()
}

fn import_state(names: &[&str]) -> SyncRunState {
    SyncRunState::new(JobKind::Import, Some(ImportMode::Update), keys(names))
}

#[test]
fn test_new_run_state() {
    let state = import_state(&["countries", "governorates"]);

    assert_eq!(state.run_id.len(), 8);
    assert_eq!(state.pending_entities.len(), 2);
    assert!(state.completed_entities.is_empty());
    assert!(state.failed_entities.is_empty());
    assert_eq!(state.status, RunStatus::Running);
}

#[test]
fn test_record_success_and_failure() {
    let mut state = import_state(&["countries", "governorates", "clients"]);

    state.record(&SyncResult::success(EntityKey::new("countries"), "Countries", "ok").with_duration_ms(120));
    state.record(&SyncResult::error(
        EntityKey::new("governorates"),
        "Governorates",
        "network timeout",
    ));

    assert!(state.is_completed("countries"));
    assert!(state.is_failed("governorates"));
    assert_eq!(state.pending_entities, vec!["clients"]);
    assert_eq!(state.failed_entities[0].error, "network timeout");
}

#[test]
fn test_mark_run_completed() {
    let mut state = import_state(&["safes"]);
    state.record(&SyncResult::success(EntityKey::new("safes"), "Safes", "ok"));
    state.mark_run_completed();
    assert_eq!(state.status, RunStatus::Completed);

    let mut failed = import_state(&["safes"]);
    failed.record(&SyncResult::error(EntityKey::new("safes"), "Safes", "boom"));
    failed.mark_run_completed();
    assert_eq!(failed.status, RunStatus::Failed);
}

#[test]
fn test_unfinished_entities_fail_the_run() {
    let mut state = import_state(&["safes", "safe_transactions"]);
    state.record(&SyncResult::success(EntityKey::new("safes"), "Safes", "ok"));
    state.mark_run_completed();
    assert_eq!(state.status, RunStatus::Failed);
}

#[test]
fn test_failed_keys() {
    let mut state = import_state(&["products", "product_variants"]);
    state.record(&SyncResult::error(EntityKey::new("products"), "Products", "boom"));
    state.record(&SyncResult::success(
        EntityKey::new("product_variants"),
        "Product Variants",
        "ok",
    ));
    assert_eq!(state.failed_keys(), vec!["products"]);
}

#[test]
fn test_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("target").join("sync_state.json");

    let mut state = SyncRunState::new(JobKind::Delete, None, keys(&["safe_transactions", "safes"]));
    state.record(&SyncResult::success(
        EntityKey::new("safe_transactions"),
        "Safe Transactions",
        "deleted",
    ));
    state.save(&path).unwrap();

    assert!(!path.with_extension("json.tmp").exists());

    let loaded = SyncRunState::load(&path).unwrap().unwrap();
    assert_eq!(loaded.run_id, state.run_id);
    assert_eq!(loaded.kind, JobKind::Delete);
    assert_eq!(loaded.import_mode, None);
    assert_eq!(loaded.completed_entities.len(), 1);
    assert_eq!(loaded.pending_entities, vec!["safes"]);
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    let loaded = SyncRunState::load(&dir.path().join("sync_state.json")).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn test_summary() {
    let mut state = import_state(&["countries", "governorates", "clients"]);
    state.record(&SyncResult::success(EntityKey::new("countries"), "Countries", "ok").with_duration_ms(1000));
    state.record(&SyncResult::success(EntityKey::new("governorates"), "Governorates", "ok").with_duration_ms(2000));
    state.record(&SyncResult::error(EntityKey::new("clients"), "Clients", "boom"));

    assert_eq!(
        state.summary(),
        SyncRunStateSummary {
            completed: 2,
            failed: 1,
            pending: 0,
            total_duration_ms: 3000,
        }
    );
}
