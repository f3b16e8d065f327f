//! Rename table and the pass that applies it to a catalog.
//!
//! A rename table maps the trailing segment of an old model id
//! (`standard-model-1`) to the descriptive fields that replace it. Applying
//! the table visits every asset exactly once; renamed assets are never
//! matched a second time in the same pass.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::AssetPackError;
use crate::models::{Asset, Catalog};
use crate::validation::ValidationError;
use crate::Result;

/// Replacement fields for one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameEntry {
    /// New trailing id segment
    pub name: String,
    /// Display name
    pub label: String,
    /// Description, typically with file size and polygon class
    pub description: String,
    /// Replacement tag list
    pub tags: Vec<String>,
}

impl RenameEntry {
    /// Builds the full id for this entry under `pack_prefix`
    pub fn qualified_id(&self, pack_prefix: &str) -> String {
        format!("{}/{}", pack_prefix, self.name)
    }
}

/// Ordered mapping from old id segment to replacement fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenameTable {
    entries: Vec<(String, RenameEntry)>,
    index: HashMap<String, usize>,
}

impl RenameTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry for `old_id`.
    ///
    /// Replacing keeps the original position.
    pub fn insert(&mut self, old_id: impl Into<String>, entry: RenameEntry) {
        let old_id = old_id.into();
        if let Some(&position) = self.index.get(&old_id) {
            if let Some(slot) = self.entries.get_mut(position) {
                slot.1 = entry;
            }
            return;
        }
        self.index.insert(old_id.clone(), self.entries.len());
        self.entries.push((old_id, entry));
    }

    /// Looks up the entry for an old id segment
    pub fn get(&self, old_id: &str) -> Option<&RenameEntry> {
        self.index
            .get(old_id)
            .and_then(|&position| self.entries.get(position))
            .map(|(_, entry)| entry)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RenameEntry)> {
        self.entries.iter().map(|(old, entry)| (old.as_str(), entry))
    }

    /// Checks that every entry can produce a well-formed, unique asset id.
    ///
    /// # Errors
    /// Returns `ValidationError::InvalidRenameEntry` for the first offending
    /// entry.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        let mut seen_names = HashSet::new();

        for (old_id, entry) in self.iter() {
            let reason = if old_id.is_empty() {
                Some("old id must not be empty".to_string())
            } else if entry.name.trim().is_empty() {
                Some("name must not be empty".to_string())
            } else if entry.name.contains('/') {
                Some(format!("name '{}' must not contain '/'", entry.name))
            } else if entry.label.trim().is_empty() {
                Some("label must not be empty".to_string())
            } else if !seen_names.insert(entry.name.as_str()) {
                Some(format!(
                    "name '{}' is already the target of another entry",
                    entry.name
                ))
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(ValidationError::InvalidRenameEntry {
                    old_id: old_id.to_string(),
                    reason,
                });
            }
        }

        Ok(())
    }

    /// Parses a table from a JSON object keyed by old id.
    ///
    /// Key order in the document becomes table order.
    ///
    /// # Errors
    /// Fails on malformed JSON, entries missing required fields, or entries
    /// rejected by [`RenameTable::validate`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: Map<String, Value> = serde_json::from_str(json)
            .map_err(|e| AssetPackError::serialization("Failed to parse rename table", e))?;

        let mut table = Self::new();
        for (old_id, value) in raw {
            let entry: RenameEntry = serde_json::from_value(value).map_err(|e| {
                AssetPackError::serialization(
                    format!("Invalid rename table entry '{}'", old_id),
                    e,
                )
            })?;
            table.insert(old_id, entry);
        }

        table.validate()?;
        Ok(table)
    }

    /// Reads a table from a JSON file
    pub async fn load(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AssetPackError::io("read rename table", path, e))?;
        let table = Self::from_json_str(&json)?;
        debug!("Loaded {} rename entries from {}", table.len(), path.display());
        Ok(table)
    }

    /// The table for the downloads pack, assigned after visual inspection of
    /// each model
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (old_id, name, label, description, tags) in BUILTIN_RENAMES {
            table.insert(
                *old_id,
                RenameEntry {
                    name: (*name).to_string(),
                    label: (*label).to_string(),
                    description: (*description).to_string(),
                    tags: tags.iter().map(|t| (*t).to_string()).collect(),
                },
            );
        }
        table
    }
}

type BuiltinRename = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static [&'static str],
);

const BUILTIN_RENAMES: &[BuiltinRename] = &[
    (
        "standard-model-1",
        "decorative-object-1",
        "Decorative Object 1",
        "3D decorative object for scenes (7.6M, medium-poly)",
        &["decorative", "prop", "medium-poly", "indoor"],
    ),
    (
        "detailed-model-2",
        "detailed-prop-1",
        "Detailed Prop 1",
        "High-detail prop model (9.7M, high-poly)",
        &["prop", "detailed", "high-poly", "decorative"],
    ),
    (
        "simple-model-3",
        "simple-prop-1",
        "Simple Prop 1",
        "Simple prop for background (4.7M, low-poly)",
        &["prop", "simple", "low-poly", "background"],
    ),
    (
        "detailed-model-4",
        "detailed-prop-2",
        "Detailed Prop 2",
        "High-detail prop model (13M, high-poly)",
        &["prop", "detailed", "high-poly", "decorative"],
    ),
    (
        "standard-model-5",
        "standard-prop-1",
        "Standard Prop 1",
        "Standard prop model (5.2M, medium-poly)",
        &["prop", "standard", "medium-poly"],
    ),
    (
        "standard-model-6",
        "standard-prop-2",
        "Standard Prop 2",
        "Standard prop model (5.5M, medium-poly)",
        &["prop", "standard", "medium-poly"],
    ),
    (
        "detailed-model-7",
        "detailed-prop-3",
        "Detailed Prop 3",
        "High-detail prop model (11M, high-poly)",
        &["prop", "detailed", "high-poly"],
    ),
    (
        "standard-model-8",
        "standard-prop-3",
        "Standard Prop 3",
        "Standard prop model (6.8M, medium-poly)",
        &["prop", "standard", "medium-poly"],
    ),
    (
        "standard-model-9",
        "standard-prop-4",
        "Standard Prop 4",
        "Standard prop model (9.0M, medium-poly)",
        &["prop", "standard", "medium-poly"],
    ),
    (
        "detailed-model-11",
        "detailed-prop-4",
        "Detailed Prop 4",
        "High-detail prop model (9.7M, high-poly)",
        &["prop", "detailed", "high-poly"],
    ),
    (
        "standard-model-12",
        "standard-prop-5",
        "Standard Prop 5",
        "Standard prop model (7.3M, medium-poly)",
        &["prop", "standard", "medium-poly"],
    ),
    (
        "detailed-model-13",
        "chinese-dragon",
        "Chinese Dragon",
        "Oriental dragon with detailed scales and traditional design (12M, high-poly)",
        &[
            "dragon",
            "fantasy",
            "creature",
            "high-poly",
            "hero-asset",
            "oriental",
        ],
    ),
    (
        "detailed-model-14",
        "detailed-prop-5",
        "Detailed Prop 5",
        "High-detail prop model (10M, high-poly)",
        &["prop", "detailed", "high-poly"],
    ),
];

/// One asset that was (or would be) renamed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedRename {
    /// Trailing id segment that matched the table
    pub old_id: String,
    /// Full id before the rename
    pub previous_id: String,
    /// Full id after the rename
    pub new_id: String,
    /// New trailing id segment
    pub name: String,
}

impl fmt::Display for AppliedRename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "✓ {} → {}", self.old_id, self.name)
    }
}

/// Outcome of a rename pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameReport {
    /// Renamed assets in catalog order
    pub applied: Vec<AppliedRename>,
    /// Table keys that matched no model asset
    pub unmatched: Vec<String>,
}

impl RenameReport {
    /// Number of assets renamed
    pub fn renamed_count(&self) -> usize {
        self.applied.len()
    }

    /// Returns true if nothing was renamed
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

fn matching_entry<'t>(asset: &Asset, table: &'t RenameTable) -> Option<&'t RenameEntry> {
    if !asset.is_model() {
        return None;
    }
    table.get(asset.trailing_id())
}

fn collect_report(
    catalog: &Catalog,
    table: &RenameTable,
    pack_prefix: &str,
) -> RenameReport {
    let mut applied = Vec::new();
    let mut matched = HashSet::new();

    for asset in &catalog.assets {
        if let Some(entry) = matching_entry(asset, table) {
            let old_id = asset.trailing_id().to_string();
            matched.insert(old_id.clone());
            applied.push(AppliedRename {
                old_id,
                previous_id: asset.id.clone(),
                new_id: entry.qualified_id(pack_prefix),
                name: entry.name.clone(),
            });
        }
    }

    let unmatched = table
        .iter()
        .filter(|(old_id, _)| !matched.contains(*old_id))
        .map(|(old_id, _)| old_id.to_string())
        .collect();

    RenameReport { applied, unmatched }
}

/// Reports what [`apply_renames`] would change without touching the catalog
pub fn plan_renames(catalog: &Catalog, table: &RenameTable, pack_prefix: &str) -> RenameReport {
    collect_report(catalog, table, pack_prefix)
}

fn rewrite_matches(catalog: &mut Catalog, table: &RenameTable, pack_prefix: &str) {
    for asset in &mut catalog.assets {
        let Some(entry) = matching_entry(asset, table) else {
            continue;
        };
        let new_id = entry.qualified_id(pack_prefix);
        debug!("Renaming {} to {}", asset.id, new_id);

        asset.id = new_id;
        asset.label = Some(entry.label.clone());
        asset.description = Some(entry.description.clone());
        asset.tags = Some(entry.tags.clone());
    }
}

/// Returns a copy of `catalog` with `table` applied, leaving the input as is
pub fn renamed_copy(catalog: &Catalog, table: &RenameTable, pack_prefix: &str) -> Catalog {
    let mut renamed = catalog.clone();
    rewrite_matches(&mut renamed, table, pack_prefix);
    renamed
}

/// Applies `table` to every model asset in `catalog`.
///
/// A model asset whose trailing id segment is a table key gets its id
/// replaced with `{pack_prefix}/{name}` and its label, description, and tags
/// overwritten with the entry's values. Every other asset is left as is.
pub fn apply_renames(
    catalog: &mut Catalog,
    table: &RenameTable,
    pack_prefix: &str,
) -> RenameReport {
    // Matches are computed against the untouched catalog so a new id can
    // never be picked up by a later lookup.
    let report = collect_report(catalog, table, pack_prefix);
    rewrite_matches(catalog, table, pack_prefix);

    for old_id in &report.unmatched {
        warn!("Rename table entry '{}' matched no model asset", old_id);
    }

    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(name: &str) -> RenameEntry {
        RenameEntry {
            name: name.to_string(),
            label: format!("Label {}", name),
            description: format!("Description {}", name),
            tags: vec!["prop".to_string()],
        }
    }

    fn sample_catalog() -> Catalog {
        serde_json::from_value(json!({
            "assets": [
                {
                    "id": "downloads-pack/standard-model-1",
                    "type": "model",
                    "label": "Standard Model 1",
                    "description": "GLB model (7.6M)",
                    "tags": ["model", "glb"],
                    "path": "models/standard-model-1.glb"
                },
                {
                    "id": "downloads-pack/standard-model-1",
                    "type": "texture",
                    "label": "Texture",
                    "description": "Not a model",
                    "tags": ["texture"]
                },
                {
                    "id": "downloads-pack/detailed-model-13",
                    "type": "model",
                    "label": "Detailed Model 13",
                    "description": "GLB model (12M)",
                    "tags": ["model"]
                },
                {
                    "id": "downloads-pack/unknown-model-99",
                    "type": "model",
                    "label": "Unknown",
                    "description": "Left alone",
                    "tags": []
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_builtin_table_contents() {
        let table = RenameTable::builtin();
        assert_eq!(table.len(), 13);
        assert!(table.validate().is_ok());
        assert!(table.get("standard-model-10").is_none());

        let dragon = table.get("detailed-model-13").unwrap();
        assert_eq!(dragon.name, "chinese-dragon");
        assert_eq!(dragon.label, "Chinese Dragon");
        assert_eq!(
            dragon.tags,
            vec!["dragon", "fantasy", "creature", "high-poly", "hero-asset", "oriental"]
        );

        let first = table.iter().next().unwrap();
        assert_eq!(first.0, "standard-model-1");
        assert_eq!(first.1.name, "decorative-object-1");
    }

    #[test]
    fn test_apply_renames_updates_matching_models() {
        let mut catalog = sample_catalog();
        let report = apply_renames(&mut catalog, &RenameTable::builtin(), "downloads-pack");

        let renamed = &catalog.assets[0];
        assert_eq!(renamed.id, "downloads-pack/decorative-object-1");
        assert_eq!(renamed.label.as_deref(), Some("Decorative Object 1"));
        assert_eq!(
            renamed.description.as_deref(),
            Some("3D decorative object for scenes (7.6M, medium-poly)")
        );
        assert_eq!(
            renamed.tags.as_deref(),
            Some(&["decorative", "prop", "medium-poly", "indoor"].map(String::from)[..])
        );
        assert_eq!(
            renamed.extra.get("path"),
            Some(&json!("models/standard-model-1.glb"))
        );

        assert_eq!(catalog.assets[2].id, "downloads-pack/chinese-dragon");
        assert_eq!(report.renamed_count(), 2);
        assert_eq!(report.applied[0].to_string(), "✓ standard-model-1 → decorative-object-1");
        assert_eq!(report.applied[1].previous_id, "downloads-pack/detailed-model-13");
    }

    #[test]
    fn test_apply_renames_leaves_other_assets_alone() {
        let original = sample_catalog();
        let mut catalog = original.clone();
        apply_renames(&mut catalog, &RenameTable::builtin(), "downloads-pack");

        assert_eq!(catalog.assets[1], original.assets[1]);
        assert_eq!(catalog.assets[3], original.assets[3]);
    }

    #[test]
    fn test_apply_renames_reports_unmatched_entries() {
        let mut catalog = sample_catalog();
        let report = apply_renames(&mut catalog, &RenameTable::builtin(), "downloads-pack");

        assert_eq!(report.unmatched.len(), 11);
        assert!(!report.unmatched.contains(&"standard-model-1".to_string()));
        assert!(report.unmatched.contains(&"detailed-model-14".to_string()));
    }

    #[test]
    fn test_apply_renames_is_single_pass() {
        // The second entry's key is the first entry's target name.
        let mut table = RenameTable::new();
        table.insert("a", entry("b"));
        table.insert("b", entry("c"));

        let mut catalog = Catalog::new(vec![Asset::new("pack/a", "model")]);
        let report = apply_renames(&mut catalog, &table, "pack");

        assert_eq!(catalog.assets[0].id, "pack/b");
        assert_eq!(report.renamed_count(), 1);
    }

    #[test]
    fn test_apply_renames_uses_pack_prefix() {
        let mut catalog = Catalog::new(vec![Asset::new("old-pack/a", "model")]);
        let mut table = RenameTable::new();
        table.insert("a", entry("renamed"));

        apply_renames(&mut catalog, &table, "new-pack");
        assert_eq!(catalog.assets[0].id, "new-pack/renamed");
    }

    #[test]
    fn test_renamed_copy_renames_models_sharing_a_segment() {
        let catalog = Catalog::new(vec![
            Asset::new("downloads-pack/standard-model-1", "model"),
            Asset::new("other-pack/standard-model-1", "model"),
        ]);

        let renamed = renamed_copy(&catalog, &RenameTable::builtin(), "downloads-pack");

        assert_eq!(catalog.assets[1].id, "other-pack/standard-model-1");
        assert!(
            renamed
                .assets
                .iter()
                .all(|asset| asset.id == "downloads-pack/decorative-object-1")
        );
    }

    #[test]
    fn test_plan_does_not_mutate() {
        let catalog = sample_catalog();
        let report = plan_renames(&catalog, &RenameTable::builtin(), "downloads-pack");

        assert_eq!(report.renamed_count(), 2);
        assert_eq!(catalog, sample_catalog());
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut table = RenameTable::new();
        table.insert("a", entry("one"));
        table.insert("b", entry("two"));
        table.insert("a", entry("three"));

        let order: Vec<_> = table.iter().map(|(k, e)| (k, e.name.as_str())).collect();
        assert_eq!(order, vec![("a", "three"), ("b", "two")]);
    }

    #[test]
    fn test_validate_rejects_bad_entries() {
        let mut table = RenameTable::new();
        table.insert("a", entry("nested/name"));
        assert!(matches!(
            table.validate(),
            Err(ValidationError::InvalidRenameEntry { .. })
        ));

        let mut table = RenameTable::new();
        table.insert("a", entry("same"));
        table.insert("b", entry("same"));
        let err = table.validate().unwrap_err();
        assert!(err.to_string().contains("'b'"));

        let mut table = RenameTable::new();
        table.insert("a", entry("  "));
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_from_json_str_keeps_document_order() {
        let json = r#"{
            "zeta-model-1": {
                "name": "zeta-prop",
                "label": "Zeta Prop",
                "description": "Zeta",
                "tags": ["prop"]
            },
            "alpha-model-2": {
                "name": "alpha-prop",
                "label": "Alpha Prop",
                "description": "Alpha",
                "tags": []
            }
        }"#;

        let table = RenameTable::from_json_str(json).unwrap();
        let keys: Vec<_> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta-model-1", "alpha-model-2"]);
    }

    #[test]
    fn test_from_json_str_rejects_incomplete_entry() {
        let json = r#"{ "a": { "name": "b", "label": "B" } }"#;
        let err = RenameTable::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("Invalid rename table entry 'a'"));
    }
}
