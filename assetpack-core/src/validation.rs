//! JSON Schema validation for asset catalogs.
//!
//! Catalogs are checked on the way in, so a malformed file is rejected with a
//! field-level message before any rename runs, and on the way out, so the
//! tool never writes a catalog it could not read back.
//!
//! # Example
//! ```rust
//! use assetpack_core::validation::{initialize_catalog_validator, validate_catalog};
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! initialize_catalog_validator()?;
//!
//! let catalog = json!({
//!     "assets": [{
//!         "id": "downloads-pack/standard-model-1",
//!         "type": "model",
//!         "label": "Standard Model 1",
//!         "description": "GLB model",
//!         "tags": ["model"]
//!     }]
//! });
//!
//! validate_catalog(&catalog)?;
//! # Ok(())
//! # }
//! ```

use std::collections::{BTreeSet, HashSet};
use std::sync::OnceLock;

use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

use crate::models::Catalog;

/// Catalog and rename table validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Schema compilation failed during initialization
    #[error("JSON Schema compilation failed: {message}")]
    SchemaCompilation {
        /// Compiler message
        message: String,
    },

    /// Catalog did not match the schema
    #[error("Catalog validation failed with {error_count} errors: {errors:?}")]
    ValidationFailed {
        /// Number of messages collected, capped at ten
        error_count: usize,
        /// Schema messages with their instance paths
        errors: Vec<String>,
    },

    /// A rename table entry cannot produce a usable asset
    #[error("Invalid rename entry '{old_id}': {reason}")]
    InvalidRenameEntry {
        /// Table key of the offending entry
        old_id: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Embedded JSON Schema for catalog files
const CATALOG_SCHEMA: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "Asset pack catalog",
  "type": "object",
  "required": ["assets"],
  "properties": {
    "assets": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["id", "type"],
        "properties": {
          "id": { "type": "string", "minLength": 1 },
          "type": { "type": "string", "minLength": 1 },
          "label": { "type": "string" },
          "description": { "type": "string" },
          "tags": { "type": "array", "items": { "type": "string" } }
        }
      }
    }
  }
}"#;

/// Maximum number of schema errors reported for one document
const MAX_REPORTED_ERRORS: usize = 10;

/// Compiled JSON Schema instance (initialized once)
static COMPILED_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Compiles the embedded catalog schema and caches it for reuse.
///
/// Safe to call more than once.
///
/// # Errors
/// Returns `ValidationError::SchemaCompilation` if the embedded schema is invalid.
pub fn initialize_catalog_validator() -> Result<(), ValidationError> {
    compiled_schema().map(|_| ())
}

fn compiled_schema() -> Result<&'static Validator, ValidationError> {
    if let Some(validator) = COMPILED_SCHEMA.get() {
        return Ok(validator);
    }

    let schema_json: Value =
        serde_json::from_str(CATALOG_SCHEMA).map_err(|e| ValidationError::SchemaCompilation {
            message: format!("Failed to parse embedded schema: {}", e),
        })?;

    let compiled = jsonschema::validator_for(&schema_json).map_err(|e| {
        ValidationError::SchemaCompilation {
            message: format!("Schema compilation error: {}", e),
        }
    })?;

    Ok(COMPILED_SCHEMA.get_or_init(|| compiled))
}

/// Validates a catalog document against the embedded schema.
///
/// # Errors
/// Returns `ValidationFailed` with up to ten schema messages.
pub fn validate_catalog(json_value: &Value) -> Result<(), ValidationError> {
    let schema = compiled_schema()?;

    let errors: Vec<String> = schema
        .iter_errors(json_value)
        .take(MAX_REPORTED_ERRORS)
        .map(|e| e.to_string())
        .collect();

    if !errors.is_empty() {
        return Err(ValidationError::ValidationFailed {
            error_count: errors.len(),
            errors,
        });
    }

    Ok(())
}

/// Returns every asset id that appears more than once.
pub fn duplicate_asset_ids(catalog: &Catalog) -> BTreeSet<String> {
    let mut seen = HashSet::new();
    catalog
        .assets
        .iter()
        .filter(|asset| !seen.insert(asset.id.as_str()))
        .map(|asset| asset.id.clone())
        .collect()
}

/// Returns ids duplicated in `after` that were not already duplicated in
/// `before`, i.e. the collisions a rename pass introduced.
pub fn new_duplicate_ids(before: &Catalog, after: &Catalog) -> BTreeSet<String> {
    let existing = duplicate_asset_ids(before);
    duplicate_asset_ids(after)
        .into_iter()
        .filter(|id| !existing.contains(id))
        .collect()
}
