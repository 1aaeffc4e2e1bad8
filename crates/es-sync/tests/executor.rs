use async_trait::async_trait;
use es_connector::{
    Connector, ConnectorError, ConnectorResult, ImportOptions, RemoteAction, RemoteData,
    RemoteItem, RemoteResponse,
};
use es_core::{
    extract_item_issues, summarize, EntityCatalog, EntityDefinition, ImportMode, ItemAction,
    ItemId, ItemIssue, JobKind, JobOutcome, SelectionModel, SyncDetail, SyncJob, SyncStatus,
};
use es_sync::{NoProgress, ProgressEvent, SyncExecutor};
use std::collections::HashMap;
use std::sync::Mutex;

enum Script {
    Respond(RemoteResponse),
    Fail(String),
    Reject(u16, String, SyncDetail),
    Panic,
}

/// In-memory connector that records every call and replays scripted outcomes
#[derive(Default)]
struct ScriptedConnector {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<String>>,
    options: Mutex<Vec<ImportOptions>>,
}

impl ScriptedConnector {
    fn with(mut self, entity: &str, script: Script) -> Self {
        self.scripts.insert(entity.to_string(), script);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, call: String, entity: &str) -> ConnectorResult<RemoteResponse> {
        self.calls.lock().unwrap().push(call);
        match self.scripts.get(entity) {
            Some(Script::Respond(response)) => Ok(response.clone()),
            Some(Script::Fail(message)) => Err(ConnectorError::Transport(message.clone())),
            Some(Script::Reject(status, message, detail)) => Err(ConnectorError::Status {
                status: *status,
                message: message.clone(),
                detail: detail.clone(),
            }),
            Some(Script::Panic) => panic!("connector exploded on {}", entity),
            None => Ok(RemoteResponse::success(&format!("{} done", entity))),
        }
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    async fn import_entity(
        &self,
        entity: &str,
        options: ImportOptions,
    ) -> ConnectorResult<RemoteResponse> {
        self.options.lock().unwrap().push(options);
        self.respond(format!("import:{}", entity), entity)
    }

    async fn delete_entity(&self, entity: &str) -> ConnectorResult<RemoteResponse> {
        self.respond(format!("delete:{}", entity), entity)
    }

    fn connector_type(&self) -> &'static str {
        "scripted"
    }
}

fn catalog() -> EntityCatalog {
    EntityCatalog::builtin().unwrap()
}

fn import_job(catalog: &EntityCatalog, keys: &[&str]) -> SyncJob {
    SyncJob::import(catalog, keys.iter().copied(), ImportMode::Update).unwrap()
}

fn result_keys(results: &[es_core::SyncResult]) -> Vec<String> {
    results.iter().map(|r| r.entity_key.to_string()).collect()
}

#[tokio::test]
async fn test_import_runs_in_dependency_order() {
    let catalog = catalog();
    let connector = ScriptedConnector::default();
    let executor = SyncExecutor::new(&catalog, &connector);

    let job = import_job(&catalog, &["clients", "countries", "governorates"]);
    let results = executor.run(&job, &mut NoProgress).await;

    assert_eq!(
        result_keys(&results),
        vec!["countries", "governorates", "clients"]
    );
    assert!(results.iter().all(|r| r.status == SyncStatus::Success));
    assert_eq!(results[0].message, "countries done");

    let summary = summarize(&results);
    assert_eq!(summary.success_count, 3);
    assert_eq!(summary.error_count, 0);
    assert_eq!(summary.outcome(), JobOutcome::Success);
}

#[tokio::test]
async fn test_failure_does_not_stop_later_entities() {
    let catalog = catalog();
    let connector = ScriptedConnector::default()
        .with("products", Script::Fail("network timeout".to_string()));
    let executor = SyncExecutor::new(&catalog, &connector);

    let job = import_job(&catalog, &["product_variants", "products"]);
    let results = executor.run(&job, &mut NoProgress).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].entity_key, "products");
    assert_eq!(results[0].status, SyncStatus::Error);
    assert_eq!(results[0].message, "network timeout");
    assert_eq!(results[1].entity_key, "product_variants");
    assert_eq!(results[1].status, SyncStatus::Success);
    assert_eq!(summarize(&results).outcome(), JobOutcome::Partial);
}

#[tokio::test]
async fn test_error_envelope_is_an_entity_failure() {
    let catalog = catalog();
    let connector = ScriptedConnector::default().with(
        "warehouses",
        Script::Respond(RemoteResponse::error("warehouse codes missing")),
    );
    let executor = SyncExecutor::new(&catalog, &connector);

    let job = import_job(&catalog, &["warehouses", "safes"]);
    let results = executor.run(&job, &mut NoProgress).await;

    assert_eq!(results[0].status, SyncStatus::Error);
    assert_eq!(results[0].message, "warehouse codes missing");
    assert_eq!(results[1].status, SyncStatus::Success);
}

#[tokio::test]
async fn test_panicking_connector_is_isolated() {
    let catalog = catalog();
    let connector = ScriptedConnector::default().with("countries", Script::Panic);
    let executor = SyncExecutor::new(&catalog, &connector);

    let job = import_job(&catalog, &["countries", "client_types"]);
    let results = executor.run(&job, &mut NoProgress).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].status, SyncStatus::Error);
    assert!(results[0].message.contains("connector exploded on countries"));
    assert_eq!(results[1].status, SyncStatus::Success);
}

#[tokio::test]
async fn test_all_failed_classifies_as_error() {
    let catalog = catalog();
    let connector = ScriptedConnector::default()
        .with("safes", Script::Fail("refused".to_string()))
        .with("warehouses", Script::Fail("refused".to_string()));
    let executor = SyncExecutor::new(&catalog, &connector);

    let job = import_job(&catalog, &["safes", "warehouses"]);
    let results = executor.run(&job, &mut NoProgress).await;

    assert_eq!(summarize(&results).outcome(), JobOutcome::Error);
}

#[tokio::test]
async fn test_each_entity_called_exactly_once() {
    let catalog = catalog();
    let connector = ScriptedConnector::default();
    let executor = SyncExecutor::new(&catalog, &connector);

    let mut selection = SelectionModel::new(&catalog);
    selection.select_all();
    let job = selection.build_job(JobKind::Import).unwrap();
    let results = executor.run(&job, &mut NoProgress).await;

    let calls = connector.calls();
    assert_eq!(calls.len(), job.len());
    assert_eq!(results.len(), job.len());
    let mut unique = calls.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), calls.len());
    assert!(!calls.contains(&"import:sales_returns".to_string()));
}

#[tokio::test]
async fn test_empty_job_issues_no_calls() {
    let catalog = catalog();
    let connector = ScriptedConnector::default();
    let executor = SyncExecutor::new(&catalog, &connector);

    let job = SyncJob::import(&catalog, std::iter::empty(), ImportMode::Update).unwrap();
    let mut events = 0;
    let results = executor
        .run(&job, &mut |_: &ProgressEvent| events += 1)
        .await;

    assert!(results.is_empty());
    assert!(connector.calls().is_empty());
    assert_eq!(events, 0);
}

#[tokio::test]
async fn test_delete_runs_in_reverse_order() {
    let catalog = catalog();
    let connector = ScriptedConnector::default();
    let executor = SyncExecutor::new(&catalog, &connector);

    let job = SyncJob::delete(&catalog, ["safes", "safe_transactions"]).unwrap();
    let results = executor.run(&job, &mut NoProgress).await;

    assert_eq!(
        connector.calls(),
        vec!["delete:safe_transactions", "delete:safes"]
    );
    assert_eq!(result_keys(&results), vec!["safe_transactions", "safes"]);
}

#[tokio::test]
async fn test_delete_order_mirrors_import_order() {
    let catalog = catalog();
    let keys = ["clients", "countries", "sales_orders", "products", "warehouses"];

    let import_connector = ScriptedConnector::default();
    SyncExecutor::new(&catalog, &import_connector)
        .run(&import_job(&catalog, &keys), &mut NoProgress)
        .await;

    let delete_connector = ScriptedConnector::default();
    SyncExecutor::new(&catalog, &delete_connector)
        .run(&SyncJob::delete(&catalog, keys).unwrap(), &mut NoProgress)
        .await;

    let mut imported: Vec<String> = import_connector
        .calls()
        .into_iter()
        .map(|c| c.trim_start_matches("import:").to_string())
        .collect();
    imported.reverse();
    let deleted: Vec<String> = delete_connector
        .calls()
        .into_iter()
        .map(|c| c.trim_start_matches("delete:").to_string())
        .collect();
    assert_eq!(imported, deleted);
}

#[tokio::test]
async fn test_skipped_items_on_successful_entity() {
    let catalog = catalog();
    let response = RemoteResponse::success("Imported clients").with_data(RemoteData {
        details: vec![RemoteItem {
            id: ItemId::Int(7),
            name: None,
            action: RemoteAction::Skipped,
            reason: Some("duplicate".to_string()),
            error: None,
        }],
        skipped_orders_log: Vec::new(),
    });
    let connector = ScriptedConnector::default().with("clients", Script::Respond(response));
    let executor = SyncExecutor::new(&catalog, &connector);

    let results = executor
        .run(&import_job(&catalog, &["clients"]), &mut NoProgress)
        .await;

    assert_eq!(results[0].status, SyncStatus::Success);
    let issues = extract_item_issues(&results[0]);
    assert!(issues.failed.is_empty());
    assert_eq!(issues.skipped.len(), 1);
    assert_eq!(issues.skipped[0].id, ItemId::Int(7));
    assert_eq!(issues.skipped[0].reason.as_deref(), Some("duplicate"));
}

#[tokio::test]
async fn test_progress_reported_before_each_call() {
    let catalog = catalog();
    let connector = ScriptedConnector::default();
    let executor = SyncExecutor::new(&catalog, &connector);

    let job = import_job(&catalog, &["governorates", "countries"]);
    let mut events: Vec<ProgressEvent> = Vec::new();
    executor
        .run(&job, &mut |event: &ProgressEvent| {
            // Calls made so far must equal the events seen before this one
            assert_eq!(connector.calls().len(), event.current_index);
            events.push(event.clone());
        })
        .await;

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].label, "Countries");
    assert_eq!(events[0].total, 2);
    assert_eq!(events[1].ordinal(), 2);
    assert_eq!(events[1].entity_key, "governorates");
}

#[tokio::test]
async fn test_import_options_passed_through() {
    let catalog = catalog();
    let connector = ScriptedConnector::default();
    let executor = SyncExecutor::new(&catalog, &connector);

    let job = SyncJob::import(&catalog, ["safes"], ImportMode::Replace)
        .unwrap()
        .with_dry_run(true);
    executor.run(&job, &mut NoProgress).await;

    let options = connector.options.lock().unwrap().clone();
    assert_eq!(
        options,
        vec![ImportOptions {
            mode: ImportMode::Replace,
            dry_run: true,
        }]
    );
}

#[tokio::test]
async fn test_keys_missing_from_executor_catalog_still_get_results() {
    let full = catalog();
    let job = import_job(&full, &["countries", "warehouses"]);

    // The executor's catalog only declares countries
    let narrow =
        EntityCatalog::from_definitions(vec![EntityDefinition::new("countries", "Countries")])
            .unwrap();
    let connector = ScriptedConnector::default();
    let results = SyncExecutor::new(&narrow, &connector)
        .run(&job, &mut NoProgress)
        .await;

    assert_eq!(results.len(), job.len());
    assert_eq!(connector.calls(), vec!["import:countries"]);
    assert_eq!(result_keys(&results), vec!["countries", "warehouses"]);
    assert_eq!(results[0].status, SyncStatus::Success);
    assert_eq!(results[1].status, SyncStatus::Error);
    assert!(results[1].message.contains("not part of this catalog"));
}

#[tokio::test]
async fn test_keys_disabled_in_executor_catalog_are_errors() {
    let full = catalog();
    let job = SyncJob::delete(&full, ["safes", "safe_transactions"]).unwrap();

    let definitions = EntityCatalog::builtin_definitions()
        .into_iter()
        .map(|d| if d.key == "safes" { d.disabled() } else { d })
        .collect();
    let restricted = EntityCatalog::from_definitions(definitions).unwrap();
    let connector = ScriptedConnector::default();
    let results = SyncExecutor::new(&restricted, &connector)
        .run(&job, &mut NoProgress)
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(connector.calls(), vec!["delete:safe_transactions"]);
    assert_eq!(results[1].entity_key, "safes");
    assert_eq!(results[1].label, "Safes");
    assert_eq!(results[1].status, SyncStatus::Error);
    assert!(results[1].message.contains("disabled"));
}

#[tokio::test]
async fn test_http_error_keeps_item_detail() {
    let catalog = catalog();
    let detail = SyncDetail {
        items: vec![ItemIssue::new(7_i64, ItemAction::Failed).with_reason("missing client")],
        skipped_log: Vec::new(),
    };
    let connector = ScriptedConnector::default().with(
        "sales_orders",
        Script::Reject(422, "bad rows".to_string(), detail),
    );
    let executor = SyncExecutor::new(&catalog, &connector);

    let results = executor
        .run(&import_job(&catalog, &["sales_orders"]), &mut NoProgress)
        .await;

    assert_eq!(results[0].status, SyncStatus::Error);
    assert_eq!(results[0].message, "HTTP 422: bad rows");
    let issues = extract_item_issues(&results[0]);
    assert_eq!(issues.failed.len(), 1);
    assert_eq!(issues.failed[0].reason.as_deref(), Some("missing client"));
}
