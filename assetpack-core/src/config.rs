//! Paths and settings for a rename run.

use std::path::{Path, PathBuf};

use crate::error::AssetPackError;
use crate::Result;

/// Catalog location used when neither `--catalog` nor `ASSETPACK_CATALOG` is set
pub const DEFAULT_CATALOG_PATH: &str =
    "~/.claude/asset-packs/webgpu-threejs-tsl/packs/downloads-pack/downloads.catalog.json";

/// Output location used when neither `--output` nor `ASSETPACK_OUTPUT` is set
pub const DEFAULT_OUTPUT_PATH: &str = "~/Downloads/downloads-renamed.catalog.json";

/// Id prefix given to renamed assets
pub const DEFAULT_PACK_PREFIX: &str = "downloads-pack";

/// Suffix appended to the catalog path when backing it up
pub const BACKUP_SUFFIX: &str = ".backup";

/// Expands a leading `~` to the current user's home directory.
///
/// Only `~` on its own or followed by a separator is expanded; `~user`
/// forms are returned unchanged.
///
/// # Errors
/// Returns a configuration error if the path needs expansion and no home
/// directory can be determined.
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    let Ok(rest) = path.strip_prefix("~") else {
        return Ok(path.to_path_buf());
    };

    let home = dirs::home_dir().ok_or_else(|| {
        AssetPackError::configuration(format!(
            "Cannot expand '{}': home directory is unknown",
            path.display()
        ))
    })?;

    Ok(home.join(rest))
}

/// Path of the backup written next to `catalog_path`
pub fn backup_path(catalog_path: &Path) -> PathBuf {
    let mut raw = catalog_path.as_os_str().to_owned();
    raw.push(BACKUP_SUFFIX);
    PathBuf::from(raw)
}

/// Trims trailing separators and rejects an empty prefix.
///
/// # Errors
/// Returns a configuration error for a prefix that is empty after trimming.
pub fn normalize_pack_prefix(prefix: &str) -> Result<String> {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(AssetPackError::configuration(
            "Pack prefix must not be empty",
        ));
    }
    Ok(trimmed.to_string())
}

/// Absolute form of `path` with symlinks and `.`/`..` resolved, for
/// comparing two paths that may not exist yet.
///
/// A missing file is resolved through its parent directory. If neither
/// exists the path is returned as given.
fn comparable_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return canonical;
    }

    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            std::fs::canonicalize(parent)
                .map(|dir| dir.join(name))
                .unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

/// Resolved settings for one rename run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameSettings {
    /// Catalog to read, and to replace with `--apply`
    pub catalog_path: PathBuf,
    /// Where the updated catalog is written
    pub output_path: PathBuf,
    /// External rename table; the built-in table is used when unset
    pub table_path: Option<PathBuf>,
    /// Id prefix for renamed assets, without a trailing `/`
    pub pack_prefix: String,
}

impl RenameSettings {
    /// Resolves raw CLI values: expands `~` and normalizes the prefix.
    ///
    /// # Errors
    /// Fails if a path cannot be expanded, the prefix is empty, or the
    /// output path is the catalog itself.
    pub fn resolve(
        catalog_path: &Path,
        output_path: &Path,
        table_path: Option<&Path>,
        pack_prefix: &str,
    ) -> Result<Self> {
        let settings = Self {
            catalog_path: expand_home(catalog_path)?,
            output_path: expand_home(output_path)?,
            table_path: table_path.map(expand_home).transpose()?,
            pack_prefix: normalize_pack_prefix(pack_prefix)?,
        };

        settings.ensure_distinct_paths()?;
        Ok(settings)
    }

    /// Checks that the output is not the catalog under another spelling,
    /// such as `./catalog.json`, a `..` detour, or a symlink.
    ///
    /// # Errors
    /// Returns a configuration error when both paths name the same file.
    pub fn ensure_distinct_paths(&self) -> Result<()> {
        if comparable_path(&self.catalog_path) == comparable_path(&self.output_path) {
            return Err(AssetPackError::configuration(format!(
                "Output path {} is the catalog itself; use --apply to replace the catalog",
                self.output_path.display()
            )));
        }
        Ok(())
    }

    /// Where `--apply` saves the original catalog
    pub fn backup_path(&self) -> PathBuf {
        backup_path(&self.catalog_path)
    }
}

impl Default for RenameSettings {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            table_path: None,
            pack_prefix: DEFAULT_PACK_PREFIX.to_string(),
        }
    }
}
