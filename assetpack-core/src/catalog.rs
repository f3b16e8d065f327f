//! Reading and writing catalog files.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::AssetPackError;
use crate::models::Catalog;
use crate::validation::validate_catalog;
use crate::Result;

/// Parses and validates catalog JSON.
///
/// # Errors
/// Fails on malformed JSON or a document that does not match the catalog
/// schema.
pub fn parse_catalog(json: &str) -> Result<Catalog> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| AssetPackError::serialization("Failed to parse catalog JSON", e))?;

    validate_catalog(&value)?;

    serde_json::from_value(value)
        .map_err(|e| AssetPackError::serialization("Failed to decode catalog", e))
}

/// Serializes a catalog with two-space indentation.
///
/// The document is validated before it is returned.
pub fn render_catalog(catalog: &Catalog) -> Result<String> {
    let value = serde_json::to_value(catalog)
        .map_err(|e| AssetPackError::serialization("Failed to encode catalog", e))?;

    validate_catalog(&value)?;

    serde_json::to_string_pretty(&value)
        .map_err(|e| AssetPackError::serialization("Failed to render catalog", e))
}

/// Loads a catalog file
pub async fn load_catalog(path: &Path) -> Result<Catalog> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AssetPackError::io("read catalog", path, e))?;

    let catalog = parse_catalog(&json)?;
    debug!(
        "Loaded {} assets ({} models) from {}",
        catalog.assets.len(),
        catalog.model_count(),
        path.display()
    );
    Ok(catalog)
}

/// Writes a catalog file, creating the parent directory if needed
pub async fn save_catalog(catalog: &Catalog, path: &Path) -> Result<()> {
    let json = render_catalog(catalog)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AssetPackError::io("create directory", parent, e))?;
    }

    tokio::fs::write(path, json)
        .await
        .map_err(|e| AssetPackError::io("write catalog", path, e))?;

    debug!("Wrote {} assets to {}", catalog.assets.len(), path.display());
    Ok(())
}

/// Re-reads a written catalog and checks it matches what was saved.
///
/// # Errors
/// Returns a configuration error naming the file if the content read back
/// differs from `expected`.
pub async fn verify_round_trip(expected: &Catalog, path: &Path) -> Result<()> {
    let written = load_catalog(path).await?;
    if &written != expected {
        return Err(AssetPackError::configuration(format!(
            "Catalog read back from {} does not match the catalog that was written",
            path.display()
        )));
    }
    debug!("Round-trip check passed for {}", path.display());
    Ok(())
}

/// Backs up `catalog_path` to `backup_path`, then copies `output_path` over
/// the catalog.
///
/// The catalog is not touched unless the backup succeeded.
pub async fn backup_and_replace(
    catalog_path: &Path,
    output_path: &Path,
    backup_path: &Path,
) -> Result<()> {
    tokio::fs::copy(catalog_path, backup_path)
        .await
        .map_err(|e| AssetPackError::io("back up catalog to", backup_path, e))?;
    info!("Backed up catalog to {}", backup_path.display());

    tokio::fs::copy(output_path, catalog_path)
        .await
        .map_err(|e| AssetPackError::io("replace catalog", catalog_path, e))?;
    info!("Replaced {} with {}", catalog_path.display(), output_path.display());

    Ok(())
}
