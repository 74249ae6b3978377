//! # List Command Implementation
//!
//! Implements `taglock list`, a read-only report of the manifest's
//! dependencies in manifest order, with each one's constraint, locked commit
//! and whether its working tree is present. `--json` prints the same data as
//! a JSON array for scripts.

use anyhow::Result;
use clap::Args;

use taglock::engine::DependencyStatus;
use taglock::output::{OutputConfig, Status};

use super::Context;

/// List dependencies with their locked commits
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Execute the `list` command.
pub fn execute(args: ListArgs, ctx: &Context) -> Result<()> {
    let engine = ctx.engine();
    let statuses = engine.list().map_err(|e| super::explain(&engine, e))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    if statuses.is_empty() {
        println!("No dependencies");
        return Ok(());
    }

    for status in &statuses {
        println!("{}", describe(&ctx.out, status));
    }
    Ok(())
}

fn describe(out: &OutputConfig, status: &DependencyStatus) -> String {
    let dependency = &status.dependency;
    let marker = if status.present && status.locked.is_some() {
        out.marker(Status::Ok)
    } else {
        out.marker(Status::Missing)
    };
    let constraint = if dependency.version.is_empty() {
        "*"
    } else {
        dependency.version.as_str()
    };
    let locked = match &status.locked {
        Some(hash) => out.hash(hash),
        None => "unlocked".to_string(),
    };
    let presence = if status.present { "" } else { " (not synced)" };

    format!(
        "{} {} {} {} {}{}",
        marker,
        out.path(&dependency.path),
        dependency.source_url,
        constraint,
        locked,
        presence
    )
}
