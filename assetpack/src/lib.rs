//! Command-line interface for assetpack.
//!
//! The binary in `main.rs` only parses arguments and installs logging; the
//! command implementations live here so they can be exercised in tests with
//! an in-memory writer instead of stdout.

use std::io::Write;
use std::path::{Path, PathBuf};

use assetpack_core::{
    AssetPackError, RenameReport, RenameSettings, RenameTable, Result, apply_renames,
    backup_and_replace, config, initialize_catalog_validator, load_catalog, plan_renames,
    renamed_copy, save_catalog, validation, verify_round_trip,
};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "assetpack")]
#[command(about = "Batch rename and relabel models in a JSON asset catalog")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "
assetpack - rename and relabel catalog models

Model assets whose id ends in a key of the rename table get a new id,
label, description, and tags. The updated catalog is written to a separate
file; the original is only replaced when --apply is given. Rename options
go either before any subcommand (for the default rename) or after one.

EXAMPLES:
  assetpack
  assetpack rename --output ./renamed.catalog.json
  assetpack rename --table renames.json --pack-prefix garden-pack --apply
  assetpack check --catalog ./downloads.catalog.json
  assetpack table
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,

    /// Rename options used when no subcommand is given
    #[command(flatten)]
    pub rename: RenameArgs,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply the rename table and write the updated catalog
    Rename(RenameArgs),
    /// Show which assets would be renamed without writing anything
    Check(CheckArgs),
    /// Print the rename table
    Table(TableArgs),
}

#[derive(Args, Clone, Debug)]
pub struct RenameArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output catalog path
    #[arg(
        short,
        long,
        env = "ASSETPACK_OUTPUT",
        default_value = config::DEFAULT_OUTPUT_PATH,
        help = "Where to write the updated catalog"
    )]
    pub output: PathBuf,

    /// Replace the catalog after writing
    #[arg(
        long,
        help = "Back up the catalog to <catalog>.backup and replace it with the output"
    )]
    pub apply: bool,
}

#[derive(Args, Clone, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args, Clone, Debug)]
pub struct TableArgs {
    /// Rename table file
    #[arg(
        long,
        env = "ASSETPACK_TABLE",
        help = "JSON rename table to print instead of the built-in one"
    )]
    pub table: Option<PathBuf>,
}

/// Inputs shared by `rename` and `check`
#[derive(Args, Clone, Debug)]
pub struct SourceArgs {
    /// Catalog to read
    #[arg(
        short,
        long,
        env = "ASSETPACK_CATALOG",
        default_value = config::DEFAULT_CATALOG_PATH,
        help = "Catalog file to read"
    )]
    pub catalog: PathBuf,

    /// Rename table file
    #[arg(
        long,
        env = "ASSETPACK_TABLE",
        help = "JSON rename table (defaults to the built-in downloads-pack table)"
    )]
    pub table: Option<PathBuf>,

    /// Id prefix for renamed assets
    #[arg(
        long,
        env = "ASSETPACK_PACK_PREFIX",
        default_value = config::DEFAULT_PACK_PREFIX,
        help = "Pack prefix for renamed asset ids"
    )]
    pub pack_prefix: String,
}

#[derive(Args, Clone, Debug)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    pub verbose: u8,

    /// Suppress logging
    #[arg(short, long, global = true, help = "Suppress all logging except errors")]
    pub quiet: bool,
}

impl RenameArgs {
    /// Expands paths and checks the prefix
    pub fn settings(&self) -> Result<RenameSettings> {
        RenameSettings::resolve(
            &self.source.catalog,
            &self.output,
            self.source.table.as_deref(),
            &self.source.pack_prefix,
        )
    }
}

fn write_err(e: std::io::Error) -> AssetPackError {
    AssetPackError::Io {
        context: "Failed to write command output".to_string(),
        source: e,
    }
}

/// Loads the table at `path`, or the built-in table when `path` is unset
pub async fn load_table(path: Option<&Path>) -> Result<RenameTable> {
    match path {
        Some(path) => {
            let path = config::expand_home(path)?;
            info!("Using rename table {}", path.display());
            RenameTable::load(&path).await
        }
        None => {
            debug!("Using built-in rename table");
            Ok(RenameTable::builtin())
        }
    }
}

/// Renders the manual steps that swap the output in for the catalog
pub fn follow_up_instructions(settings: &RenameSettings) -> String {
    format!(
        "To apply:\n  cp {catalog} {backup}\n  cp {output} {catalog}\n",
        catalog = settings.catalog_path.display(),
        backup = settings.backup_path().display(),
        output = settings.output_path.display(),
    )
}

/// Loads the catalog, applies the rename table, and writes the result.
///
/// Each rename is reported on `out` as it would appear on the terminal,
/// followed by either the manual follow-up steps or, with `apply`, the
/// result of backing up and replacing the catalog.
pub async fn run_rename(
    settings: &RenameSettings,
    apply: bool,
    out: &mut impl Write,
) -> Result<RenameReport> {
    settings.ensure_distinct_paths()?;
    initialize_catalog_validator()?;

    info!("Catalog: {}", settings.catalog_path.display());
    info!("Output: {}", settings.output_path.display());

    let table = load_table(settings.table_path.as_deref()).await?;
    let original = load_catalog(&settings.catalog_path).await?;
    let mut catalog = original.clone();

    let report = apply_renames(&mut catalog, &table, &settings.pack_prefix);
    for id in validation::new_duplicate_ids(&original, &catalog) {
        warn!("Rename produced duplicate asset id {}", id);
    }

    if report.is_empty() {
        warn!("No model assets matched the rename table");
    }

    save_catalog(&catalog, &settings.output_path).await?;
    verify_round_trip(&catalog, &settings.output_path).await?;
    info!(
        "Renamed {} of {} model assets",
        report.renamed_count(),
        catalog.model_count()
    );

    for rename in &report.applied {
        writeln!(out, "{}", rename).map_err(write_err)?;
    }
    writeln!(
        out,
        "\n✓ Updated catalog saved to: {}",
        settings.output_path.display()
    )
    .map_err(write_err)?;

    if apply {
        let backup = settings.backup_path();
        backup_and_replace(&settings.catalog_path, &settings.output_path, &backup).await?;
        writeln!(out, "✓ Backup written to: {}", backup.display()).map_err(write_err)?;
        writeln!(
            out,
            "✓ Catalog replaced: {}",
            settings.catalog_path.display()
        )
        .map_err(write_err)?;
    } else {
        write!(out, "\n{}", follow_up_instructions(settings)).map_err(write_err)?;
    }

    Ok(report)
}

/// Reports what `rename` would do without writing any file
pub async fn run_check(args: &CheckArgs, out: &mut impl Write) -> Result<RenameReport> {
    initialize_catalog_validator()?;

    let catalog_path = config::expand_home(&args.source.catalog)?;
    let pack_prefix = config::normalize_pack_prefix(&args.source.pack_prefix)?;
    let table = load_table(args.source.table.as_deref()).await?;
    let catalog = load_catalog(&catalog_path).await?;

    let report = plan_renames(&catalog, &table, &pack_prefix);
    let renamed = renamed_copy(&catalog, &table, &pack_prefix);

    writeln!(out, "Catalog: {}", catalog_path.display()).map_err(write_err)?;
    writeln!(
        out,
        "Assets: {} ({} models)",
        catalog.assets.len(),
        catalog.model_count()
    )
    .map_err(write_err)?;

    for id in validation::duplicate_asset_ids(&catalog) {
        writeln!(out, "⚠ Duplicate asset id: {}", id).map_err(write_err)?;
    }
    for id in validation::new_duplicate_ids(&catalog, &renamed) {
        writeln!(out, "⚠ Rename would duplicate asset id: {}", id).map_err(write_err)?;
    }

    writeln!(out, "Would rename {}:", report.renamed_count()).map_err(write_err)?;
    for rename in &report.applied {
        writeln!(out, "  {} → {}", rename.previous_id, rename.new_id).map_err(write_err)?;
    }

    if !report.unmatched.is_empty() {
        writeln!(out, "Unmatched table entries:").map_err(write_err)?;
        for old_id in &report.unmatched {
            writeln!(out, "  {}", old_id).map_err(write_err)?;
        }
    }

    Ok(report)
}

/// Prints every table entry in table order
pub async fn run_table(args: &TableArgs, out: &mut impl Write) -> Result<()> {
    let table = load_table(args.table.as_deref()).await?;

    for (old_id, entry) in table.iter() {
        writeln!(out, "{} → {}", old_id, entry.name).map_err(write_err)?;
        writeln!(out, "    label:       {}", entry.label).map_err(write_err)?;
        writeln!(out, "    description: {}", entry.description).map_err(write_err)?;
        writeln!(out, "    tags:        {}", entry.tags.join(", ")).map_err(write_err)?;
    }
    writeln!(out, "{} entries", table.len()).map_err(write_err)?;

    Ok(())
}
