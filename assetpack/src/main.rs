//! Asset catalog rename tool.
//!
//! Reads a JSON asset catalog, renames and relabels the model assets listed
//! in the rename table, and writes the result to a separate file.

use assetpack::{Cli, Command, run_check, run_rename, run_table};
use assetpack_core::{Result, init_logging};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet)?;

    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Some(Command::Rename(args)) => run_rename(&args.settings()?, args.apply, &mut stdout)
            .await
            .map(|_| ()),
        Some(Command::Check(args)) => run_check(args, &mut stdout).await.map(|_| ()),
        Some(Command::Table(args)) => run_table(args, &mut stdout).await,
        None => {
            run_rename(&cli.rename.settings()?, cli.rename.apply, &mut stdout)
                .await
                .map(|_| ())
        }
    }
}
