//! # Remove Command Implementation
//!
//! Implements `taglock remove <PATH>`, which deletes a dependency's working
//! tree and drops it from the manifest and the lockfile.

use anyhow::Result;
use clap::Args;

use taglock::output::Status;

use super::Context;

/// Delete a dependency and forget it
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Path of the dependency to remove, as listed in the manifest
    #[arg(value_name = "PATH")]
    pub path: String,
}

/// Execute the `remove` command.
pub fn execute(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let engine = ctx.engine();
    let removed = engine
        .remove(&args.path)
        .map_err(|e| super::explain(&engine, e))?;

    println!(
        "{} Removed {} ({})",
        ctx.out.marker(Status::Removed),
        ctx.out.path(&removed.path),
        removed.source_url
    );
    Ok(())
}
