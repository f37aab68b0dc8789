//! # Completions Command Implementation
//!
//! Prints a shell completion script for `bulk-clone` to stdout.
//!
//! ```bash
//! bulk-clone completions bash > ~/.local/share/bash-completion/completions/bulk-clone
//! bulk-clone completions zsh > ~/.zfunc/_bulk-clone
//! bulk-clone completions fish > ~/.config/fish/completions/bulk-clone.fish
//! ```

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io::{self, Write};

use crate::cli::Cli;

const BIN_NAME: &str = "bulk-clone";

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, out);
}

/// Execute the `completions` command.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    write_completions(args.shell, &mut io::stdout());
    Ok(())
}
