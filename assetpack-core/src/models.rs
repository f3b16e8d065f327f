//! Catalog data model.
//!
//! Only the fields the rename engine reads or writes are typed. Everything
//! else in a catalog (pack metadata, per-asset file paths, sizes, previews)
//! is carried through untouched in the `extra` maps so that a load/save cycle
//! does not drop data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Asset type string for 3D models, the only type the rename table applies to
pub const MODEL_ASSET_TYPE: &str = "model";

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Pack-qualified identifier, e.g. `downloads-pack/standard-model-1`
    pub id: String,
    /// Asset kind (`model`, `texture`, `hdri`, ...)
    #[serde(rename = "type")]
    pub asset_type: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Search tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Fields not interpreted by assetpack
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Asset {
    /// Creates an asset with only the identifying fields set
    pub fn new(id: impl Into<String>, asset_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            asset_type: asset_type.into(),
            label: None,
            description: None,
            tags: None,
            extra: Map::new(),
        }
    }

    /// Returns true if this asset is a 3D model
    pub fn is_model(&self) -> bool {
        self.asset_type == MODEL_ASSET_TYPE
    }

    /// Returns the last `/`-separated segment of the id.
    ///
    /// An id without a separator is returned whole; an id ending in `/`
    /// yields the empty string.
    pub fn trailing_id(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(self.id.as_str())
    }
}

/// An asset catalog file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Entries in file order
    pub assets: Vec<Asset>,
    /// Top-level fields other than `assets`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Catalog {
    /// Creates a catalog holding the given assets
    pub fn new(assets: Vec<Asset>) -> Self {
        Self {
            assets,
            extra: Map::new(),
        }
    }

    /// Number of assets of type `model`
    pub fn model_count(&self) -> usize {
        self.assets.iter().filter(|a| a.is_model()).count()
    }

    /// Finds an asset by its full id
    pub fn find(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }
}
