//! Shell completion generation
//!
//! Generates shell completion scripts for bash, zsh, fish, and PowerShell.
//!
//! # Usage
//!
//! ```bash
//! # Bash - add to ~/.bashrc
//! source <(minv completions bash)
//!
//! # Fish - write straight into the completions directory
//! minv completions fish --dir ~/.config/fish/completions
//! ```

use clap::CommandFactory;
use clap_complete::{generate, generate_to, Shell};
use console::style;
use miette::{IntoDiagnostic, Result};
use std::io;
use std::path::PathBuf;

use crate::cli::Cli;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script into this directory instead of stdout
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();

    match args.dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir).into_diagnostic()?;
            let path = generate_to(args.shell, &mut cmd, "minv", &dir).into_diagnostic()?;
            eprintln!(
                "{} Wrote {} completions to {}",
                style("✓").green(),
                args.shell,
                style(path.display()).cyan()
            );
        }
        None => generate(args.shell, &mut cmd, "minv", &mut io::stdout()),
    }
    Ok(())
}
