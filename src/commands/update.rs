//! # Update Command Implementation
//!
//! Implements `taglock update`, which re-resolves every dependency's version
//! constraint against the tags its remote currently publishes, checks out
//! the newest match and moves the lockfile forward.
//!
//! The manifest is never modified. The lockfile is written after each
//! dependency, so if one fails part-way the dependencies reported before the
//! error stay updated and locked.

use anyhow::Result;
use clap::Args;

use taglock::engine::DependencyReport;
use taglock::output::{OutputConfig, Status};

use super::Context;

/// Re-resolve every constraint and move the lockfile forward
#[derive(Args, Debug)]
pub struct UpdateArgs {}

/// Execute the `update` command.
pub fn execute(_args: UpdateArgs, ctx: &Context) -> Result<()> {
    let engine = ctx.engine();
    let reports = engine.update().map_err(|e| super::explain(&engine, e))?;

    if reports.is_empty() {
        println!("No dependencies to update");
        return Ok(());
    }

    for report in &reports {
        println!("{}", describe(&ctx.out, report));
    }

    let changed = reports.iter().filter(|r| r.changed()).count();
    println!(
        "Updated {} of {} dependencies",
        changed,
        reports.len()
    );
    Ok(())
}

fn describe(out: &OutputConfig, report: &DependencyReport) -> String {
    let target = if report.tag.is_empty() {
        out.hash(&report.hash)
    } else {
        format!("{} ({})", report.tag, out.hash(&report.hash))
    };

    match (&report.previous, report.changed()) {
        (_, false) => format!(
            "{} {} already at {}",
            out.marker(Status::Unchanged),
            out.path(&report.path),
            target
        ),
        (Some(previous), true) => format!(
            "{} {} {} -> {}",
            out.marker(Status::Updated),
            out.path(&report.path),
            out.hash(previous),
            target
        ),
        (None, true) => format!(
            "{} {} locked at {}",
            out.marker(Status::Updated),
            out.path(&report.path),
            target
        ),
    }
}
