// SPDX-License-Identifier: Apache-2.0

//! Rendering of command results per output format.
//!
//! Text output goes through the table printer with colors; JSON output is
//! serialized straight to stdout for programmatic consumption.

use console::style;
use musefeed_core::{FeedItem, Interest};

use crate::cli::{OutputContext, OutputFormat};
use crate::table::TablePrinter;

/// Renders the feed.
pub fn render_feed(items: &[FeedItem], ctx: &OutputContext) {
    match ctx.format {
        OutputFormat::Json => print_json(items),
        OutputFormat::Text => {
            if items.is_empty() {
                println!(
                    "{}",
                    style("Feed is empty. Run `musefeed feed --force` to generate content.").dim()
                );
                return;
            }

            let mut table = TablePrinter::new(4).with_max_cell_width(60);
            table.add_row(&["USER", "LIKES", "POSTED", "PROMPT"]);
            for item in items {
                table.add_row(&[
                    &format!("@{}", item.username),
                    &item.likes.to_string(),
                    &item.timestamp,
                    &item.prompt,
                ]);
            }
            print!("{}", table.render());

            println!();
            for item in items {
                println!("{}", item.image_url);
            }
        }
    }
}

/// Renders an interest list (catalog or current selection).
pub fn render_interests(interests: &[Interest], ctx: &OutputContext) {
    match ctx.format {
        OutputFormat::Json => print_json(interests),
        OutputFormat::Text => {
            if interests.is_empty() {
                println!(
                    "{}",
                    style("No interests selected. Run `musefeed interests pick`.").dim()
                );
                return;
            }

            let mut table = TablePrinter::new(3);
            table.add_row(&["ID", "NAME", "TAGS"]);
            for interest in interests {
                table.add_row(&[&interest.id, &interest.name, &interest.tags.join(", ")]);
            }
            print!("{}", table.render());
        }
    }
}

/// Renders a single generated value (text content, image URL, or file path).
pub fn render_generated(label: &str, value: &str, ctx: &OutputContext) {
    match ctx.format {
        OutputFormat::Json => {
            let mut object = serde_json::Map::new();
            object.insert(label.to_string(), serde_json::Value::from(value));
            print_json(&serde_json::Value::Object(object));
        }
        OutputFormat::Text => println!("{value}"),
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Failed to serialize output: {e}"),
    }
}
