// SPDX-License-Identifier: Apache-2.0

//! Musefeed - AI-generated content feeds driven by your interests.
//!
//! A CLI that generates a personalized image feed from selected interests
//! and runs one-off text and image generations.

mod cli;
mod commands;
mod errors;
mod logging;
mod output;
mod table;

use anyhow::{Context, Result};
use clap::Parser;
use musefeed_core::load_config;
use tracing::debug;

use crate::cli::{Cli, OutputContext};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging();

    let output_ctx = OutputContext::from_cli(cli.output, cli.quiet);

    // Load config early so invalid files fail before any work starts
    let config = load_config().context("Failed to load configuration")?;
    debug!("Configuration loaded successfully");

    match commands::run(cli.command, output_ctx, config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let formatted = errors::format_error(&e);
            eprintln!("Error: {formatted}");
            Err(e)
        }
    }
}
