// SPDX-License-Identifier: Apache-2.0

//! Interest management: list the catalog, show the current selection, and
//! interactively pick interests.

use std::sync::Arc;

use anyhow::{Result, bail};
use console::style;
use dialoguer::MultiSelect;
use musefeed_core::{FileStore, PreferencesStore, catalog};

use crate::cli::{InterestsCommand, OutputContext};
use crate::output;

/// Runs an interests subcommand.
pub fn run(command: InterestsCommand, ctx: &OutputContext) -> Result<()> {
    let prefs = PreferencesStore::new(Arc::new(FileStore::default_location()));

    match command {
        InterestsCommand::List => {
            output::render_interests(catalog(), ctx);
            Ok(())
        }
        InterestsCommand::Show => {
            output::render_interests(&prefs.interests(), ctx);
            Ok(())
        }
        InterestsCommand::Pick => pick(&prefs, ctx),
    }
}

/// Interactive multi-select over the catalog, persisted wholesale.
fn pick(prefs: &PreferencesStore, ctx: &OutputContext) -> Result<()> {
    if !ctx.is_interactive() {
        bail!("`interests pick` requires an interactive terminal");
    }

    let current: Vec<String> = prefs.interests().iter().map(|i| i.id.clone()).collect();
    let items: Vec<String> = catalog()
        .iter()
        .map(|i| format!("{} ({})", i.name, i.tags.join(", ")))
        .collect();
    let defaults: Vec<bool> = catalog()
        .iter()
        .map(|i| current.contains(&i.id))
        .collect();

    let picked = MultiSelect::new()
        .with_prompt("Select interests for your feed (space to toggle, enter to confirm)")
        .items(&items)
        .defaults(&defaults)
        .interact()?;

    let selection = picked
        .into_iter()
        .map(|idx| catalog()[idx].clone())
        .collect::<Vec<_>>();

    let count = selection.len();
    prefs.update_interests(selection);

    println!(
        "{}",
        style(format!("Saved {count} interest(s).")).green()
    );
    Ok(())
}
