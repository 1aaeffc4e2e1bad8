//! Catalog command implementation

use anyhow::{Context, Result};
use es_core::{EntityCatalog, EntityDescriptor, EntityKey};
use serde::Serialize;

use crate::cli::{CatalogArgs, CatalogOutput, GlobalArgs};
use crate::commands::common::print_table;
use crate::context::RuntimeContext;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogListing<'a> {
    import_order: &'a [EntityDescriptor],
    delete_order: Vec<&'a EntityKey>,
}

/// Execute the catalog command
pub(crate) async fn execute(args: &CatalogArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let catalog = &ctx.project.catalog;

    match args.output {
        CatalogOutput::Table => print_catalog_table(catalog),
        CatalogOutput::Json => {
            let listing = CatalogListing {
                import_order: catalog.all(),
                delete_order: catalog.list_delete_order(),
            };
            let json =
                serde_json::to_string_pretty(&listing).context("Failed to serialize catalog")?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn catalog_rows(catalog: &EntityCatalog) -> Vec<Vec<String>> {
    catalog
        .all()
        .iter()
        .map(|entity| {
            let deps = if entity.depends_on.is_empty() {
                "-".to_string()
            } else {
                entity
                    .depends_on
                    .iter()
                    .map(|d| d.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            vec![
                format!("#{}", entity.import_rank),
                entity.key.to_string(),
                entity.label.clone(),
                if entity.enabled { "yes" } else { "no" }.to_string(),
                deps,
            ]
        })
        .collect()
}

fn print_catalog_table(catalog: &EntityCatalog) {
    print_table(
        &["RANK", "KEY", "LABEL", "ENABLED", "DEPENDS ON"],
        &catalog_rows(catalog),
    );

    let delete_order: Vec<&str> = catalog
        .list_delete_order()
        .into_iter()
        .map(|k| k.as_str())
        .collect();
    println!();
    println!("Delete order: {}", delete_order.join(" -> "));
}
