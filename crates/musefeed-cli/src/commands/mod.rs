// SPDX-License-Identifier: Apache-2.0

//! Command handlers for the Musefeed CLI.

pub mod completions;
pub mod feed;
pub mod image;
pub mod interests;
pub mod text;

use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use musefeed_core::AppConfig;

use crate::cli::{Commands, OutputContext};
use crate::output;

/// Creates a styled spinner (only if interactive).
fn maybe_spinner(ctx: &OutputContext, message: &str) -> Option<ProgressBar> {
    if ctx.is_interactive() {
        let s = ProgressBar::new_spinner();
        s.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid spinner template"),
        );
        s.set_message(message.to_string());
        s.enable_steady_tick(Duration::from_millis(100));
        Some(s)
    } else {
        None
    }
}

/// Dispatch to the appropriate command handler.
pub async fn run(command: Commands, ctx: OutputContext, config: AppConfig) -> Result<()> {
    match command {
        Commands::Feed { force, count } => {
            let spinner = maybe_spinner(&ctx, "Refreshing feed...");
            let items = feed::run(force, count, &config).await?;
            if let Some(s) = spinner {
                s.finish_and_clear();
            }
            output::render_feed(&items, &ctx);
            Ok(())
        }

        Commands::Interests(cmd) => interests::run(cmd, &ctx),

        Commands::Text { topic, kind, model } => {
            let mut text_config = config.text;
            if let Some(model) = model {
                text_config.model = model;
            }

            let spinner = maybe_spinner(&ctx, "Generating text...");
            let content = text::run(&text_config, kind.into(), &topic).await;
            if let Some(s) = spinner {
                s.finish_and_clear();
            }

            output::render_generated("content", &content?, &ctx);
            Ok(())
        }

        Commands::Image { prompt, model } => {
            let mut image_config = config.image;
            if let Some(model) = model {
                image_config.model = model;
            }

            let spinner = maybe_spinner(&ctx, "Generating image...");
            let generated = image::run(&image_config, &prompt).await;
            if let Some(s) = spinner {
                s.finish_and_clear();
            }

            output::render_generated("image", &generated?.to_string(), &ctx);
            Ok(())
        }

        Commands::Completions { shell } => {
            completions::run(shell);
            Ok(())
        }
    }
}
