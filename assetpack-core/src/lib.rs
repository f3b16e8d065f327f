//! Core data structures and the rename engine for assetpack.
//!
//! assetpack rewrites a JSON asset catalog: model assets whose id ends in a
//! key of a rename table get a new id, label, description, and tags, and the
//! result is written to a separate file so the original stays untouched
//! until the operator swaps it in.
//!
//! # Example
//! ```rust
//! use assetpack_core::{Asset, Catalog, RenameTable, apply_renames};
//!
//! let mut catalog = Catalog::new(vec![
//!     Asset::new("downloads-pack/detailed-model-13", "model"),
//!     Asset::new("downloads-pack/detailed-model-13", "texture"),
//! ]);
//!
//! let report = apply_renames(&mut catalog, &RenameTable::builtin(), "downloads-pack");
//!
//! assert_eq!(report.renamed_count(), 1);
//! assert_eq!(catalog.assets[0].id, "downloads-pack/chinese-dragon");
//! assert_eq!(catalog.assets[1].id, "downloads-pack/detailed-model-13");
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod rename;
pub mod validation;

// Re-export commonly used types
pub use catalog::{backup_and_replace, load_catalog, save_catalog, verify_round_trip};
pub use config::RenameSettings;
pub use error::{AssetPackError, Result};
pub use logging::init_logging;
pub use models::{Asset, Catalog, MODEL_ASSET_TYPE};
pub use rename::{
    AppliedRename, RenameEntry, RenameReport, RenameTable, apply_renames, plan_renames,
    renamed_copy,
};
pub use validation::{ValidationError, initialize_catalog_validator, validate_catalog};
