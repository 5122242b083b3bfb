use std::path::Path;

use color_eyre::eyre::Context;
use db::transfer::{export_catalog, import_catalog, CatalogExport};
use tracing::info;

use crate::{AppConfig, Result};

pub(crate) async fn export_to_file(path: &Path) -> Result<()> {
    let pool = AppConfig::from_env()?.connect_db().await?;

    let export = export_catalog(&pool).await?;
    tokio::fs::write(path, export.to_json()?)
        .await
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;

    println!(
        "Exported {} units and {} recipes to {}",
        export.units().len(),
        export.recipes().len(),
        path.display()
    );

    Ok(())
}

pub(crate) async fn import_from_file(path: &Path) -> Result<()> {
    let pool = AppConfig::from_env()?.connect_db().await?;

    let bytes = tokio::fs::read(path)
        .await
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    let export = CatalogExport::from_json(&bytes)?;
    let summary = import_catalog(&pool, &export).await?;

    info!(?summary, path = %path.display(), "Import finished");
    println!(
        "Imported {} units, {} recipe types and {} recipes",
        summary.units, summary.recipe_types, summary.recipes
    );

    Ok(())
}

pub(crate) async fn reset() -> Result<()> {
    let pool = AppConfig::from_env()?.connect_db().await?;

    db::seed::reset(&pool).await?;
    println!("Catalog reset to the starter recipes");

    Ok(())
}
