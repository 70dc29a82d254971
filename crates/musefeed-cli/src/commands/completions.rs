// SPDX-License-Identifier: Apache-2.0

//! Shell completion generation.

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::Cli;

/// Writes completions for `shell` to stdout.
pub fn run(shell: Shell) {
    let mut command = Cli::command();
    generate(shell, &mut command, "musefeed", &mut std::io::stdout());
}
