//! # taglock CLI
//!
//! Binary entry point for the `taglock` command-line tool.
//!
//! It parses arguments with `clap`, sets up logging, builds a
//! `ResolutionEngine` bound to the project directory and runs one command.
//! Errors propagate to `main` as `anyhow::Error`, which prints them to
//! stderr and exits with status 1.
//!
//! All engine logic lives in the `taglock` library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
