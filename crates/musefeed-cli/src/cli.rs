// SPDX-License-Identifier: Apache-2.0

//! Command-line interface definition for Musefeed.
//!
//! Uses clap's derive API for declarative CLI parsing with noun-verb
//! subcommands.

use std::io::IsTerminal;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use musefeed_core::ContentKind;

/// Output format for CLI results.
#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with colors (default)
    #[default]
    Text,
    /// JSON output for programmatic consumption
    Json,
}

/// Global output configuration passed to commands.
#[derive(Clone)]
pub struct OutputContext {
    /// Output format (text, json)
    pub format: OutputFormat,
    /// Suppress non-essential output (spinners, progress)
    pub quiet: bool,
    /// Whether stdout is a terminal (TTY)
    pub is_tty: bool,
}

impl OutputContext {
    /// Creates an `OutputContext` from CLI arguments.
    pub fn from_cli(format: OutputFormat, quiet: bool) -> Self {
        Self {
            format,
            quiet,
            is_tty: std::io::stdout().is_terminal(),
        }
    }

    /// Returns true if interactive elements (spinners, prompts) should be shown.
    pub fn is_interactive(&self) -> bool {
        self.is_tty && !self.quiet && matches!(self.format, OutputFormat::Text)
    }
}

/// The kind of short-form text content to generate.
#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    /// A social post, max 280 characters
    Tweet,
    /// A short, clean joke
    Joke,
    /// A brief educational fact
    Fact,
    /// Send the topic verbatim as the prompt
    Custom,
}

impl From<KindArg> for ContentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Tweet => ContentKind::Tweet,
            KindArg::Joke => ContentKind::Joke,
            KindArg::Fact => ContentKind::Fact,
            KindArg::Custom => ContentKind::Custom,
        }
    }
}

/// Musefeed - AI-generated content feeds driven by your interests.
///
/// Generates a personalized image feed from your selected interests and runs
/// one-off text and image generations.
#[derive(Parser)]
#[command(name = "musefeed")]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Output format (text, json)
    #[arg(long, short = 'o', global = true, default_value = "text", value_enum)]
    pub output: OutputFormat,

    /// Suppress non-essential output (spinners, progress)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the feed, regenerating when the cache has gone stale
    Feed {
        /// Regenerate even if cached content is still fresh
        #[arg(long)]
        force: bool,

        /// Number of items to generate on a refresh (defaults to the
        /// configured items_per_refresh)
        #[arg(long)]
        count: Option<usize>,
    },

    /// Manage the interests that drive feed generation
    #[command(subcommand)]
    Interests(InterestsCommand),

    /// Generate short-form text for a topic
    Text {
        /// Topic to write about (or the full prompt with --kind custom)
        topic: String,

        /// Content kind framing the topic
        #[arg(long, value_enum, default_value = "tweet")]
        kind: KindArg,

        /// Override the configured text model (e.g., gpt-4o, grok-3-latest)
        #[arg(long)]
        model: Option<String>,
    },

    /// Generate a single image from a prompt
    Image {
        /// Text prompt describing the image
        prompt: String,

        /// Override the configured image model (e.g., gpt-image-1, dall-e-3)
        #[arg(long)]
        model: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Interest management subcommands.
#[derive(Subcommand)]
pub enum InterestsCommand {
    /// List the full interest catalog
    List,
    /// Show the currently selected interests
    Show,
    /// Interactively pick interests from the catalog
    Pick,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_feed_count_is_unset_unless_given() {
        let cli = Cli::try_parse_from(["musefeed", "feed"]).unwrap();
        let Commands::Feed { count, .. } = cli.command else {
            panic!("expected feed command");
        };
        // No flag means the configured items_per_refresh decides
        assert_eq!(count, None);

        let cli = Cli::try_parse_from(["musefeed", "feed", "--count", "5"]).unwrap();
        let Commands::Feed { count, .. } = cli.command else {
            panic!("expected feed command");
        };
        assert_eq!(count, Some(5));
    }

    #[test]
    fn test_kind_arg_maps_to_content_kind() {
        assert_eq!(ContentKind::from(KindArg::Tweet), ContentKind::Tweet);
        assert_eq!(ContentKind::from(KindArg::Joke), ContentKind::Joke);
        assert_eq!(ContentKind::from(KindArg::Fact), ContentKind::Fact);
        assert_eq!(ContentKind::from(KindArg::Custom), ContentKind::Custom);
    }
}
