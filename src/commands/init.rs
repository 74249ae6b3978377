//! # Init Command Implementation
//!
//! Implements `taglock init`, which creates the project manifest and an
//! empty lockfile in the project directory. The project name and repository
//! are required; license, homepage and `--meta key:value` pairs are
//! optional.

use std::collections::BTreeMap;

use anyhow::Result;
use clap::Args;

use taglock::defaults::{LOCK_FILENAME, MANIFEST_FILENAME};
use taglock::engine::ProjectSeed;
use taglock::output::Status;

use super::Context;

/// Initialize a new taglock project
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project name
    #[arg(long)]
    pub name: String,

    /// URL of the project's own repository
    #[arg(long, value_name = "URL")]
    pub repository: String,

    /// SPDX license identifier (e.g., MIT)
    #[arg(long, default_value = "")]
    pub license: String,

    /// Project homepage
    #[arg(long, value_name = "URL", default_value = "")]
    pub homepage: String,

    /// Extra metadata as key:value (repeatable)
    #[arg(long = "meta", value_name = "KEY:VALUE", value_parser = parse_meta)]
    pub meta: Vec<(String, String)>,
}

/// Execute the `init` command.
pub fn execute(args: InitArgs, ctx: &Context) -> Result<()> {
    let engine = ctx.engine();
    let seed = ProjectSeed {
        name: args.name,
        license: args.license,
        homepage: args.homepage,
        source_url: args.repository,
        meta: args.meta.into_iter().collect::<BTreeMap<_, _>>(),
    };

    engine
        .init(&seed)
        .map_err(|e| super::explain(&engine, e))?;

    println!(
        "{} Created {} and {} for {}",
        ctx.out.marker(Status::Ok),
        MANIFEST_FILENAME,
        LOCK_FILENAME,
        seed.name
    );
    println!("Next: taglock add <PATH> <URL> [--version <RANGE>]");
    Ok(())
}

/// Parses `key:value`. The value may itself contain colons.
fn parse_meta(input: &str) -> std::result::Result<(String, String), String> {
    match input.split_once(':') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected KEY:VALUE, got '{input}'")),
    }
}
