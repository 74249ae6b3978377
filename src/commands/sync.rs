//! # Sync Command Implementation
//!
//! Implements `taglock sync`, which makes every dependency's working tree
//! match the lockfile. Missing dependencies are cloned, present ones are
//! fetched, and each is checked out at its locked commit. Version
//! constraints are not consulted.

use anyhow::Result;
use clap::Args;

use taglock::output::Status;

use super::Context;

/// Check out every dependency at its locked commit
#[derive(Args, Debug)]
pub struct SyncArgs {}

/// Execute the `sync` command.
pub fn execute(_args: SyncArgs, ctx: &Context) -> Result<()> {
    let engine = ctx.engine();
    let reports = engine.sync().map_err(|e| super::explain(&engine, e))?;

    if reports.is_empty() {
        println!("No dependencies to sync");
        return Ok(());
    }

    for report in &reports {
        println!(
            "{} {} at {}",
            ctx.out.marker(Status::Ok),
            ctx.out.path(&report.path),
            ctx.out.hash(&report.hash)
        );
    }
    println!("Synced {} dependencies", reports.len());
    Ok(())
}
