//! # Add Command Implementation
//!
//! Implements `taglock add <PATH> <URL>`, which clones a dependency into the
//! project, checks out the newest tag matching `--version` (or the newest
//! tag overall) and records it in the manifest and lockfile.

use anyhow::Result;
use clap::Args;

use taglock::output::Status;

use super::Context;

/// Add a dependency to the project
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Where to place the dependency, relative to the project directory
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Git URL to clone the dependency from
    #[arg(value_name = "URL")]
    pub url: String,

    /// Semver constraint for the dependency's tags (e.g., ^1.2, >=1.0.0, <2.0.0)
    #[arg(long, value_name = "RANGE", default_value = "")]
    pub version: String,
}

/// Execute the `add` command.
pub fn execute(args: AddArgs, ctx: &Context) -> Result<()> {
    let engine = ctx.engine();
    let report = engine
        .add(&args.path, &args.url, &args.version)
        .map_err(|e| super::explain(&engine, e))?;

    if report.tag.is_empty() {
        println!(
            "{} No tag of {} matches '{}'; left at the default ref",
            ctx.out.marker(Status::Warn),
            args.url,
            args.version
        );
    }

    let tag = if report.tag.is_empty() {
        String::new()
    } else {
        format!(" @ {}", report.tag)
    };
    println!(
        "{} Added {}{} ({})",
        ctx.out.marker(Status::Added),
        ctx.out.path(&report.path),
        tag,
        ctx.out.hash(&report.hash)
    );
    Ok(())
}
