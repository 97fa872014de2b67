use anyhow::Result;
use clap::Args;
use clap_complete::{Shell, generate};

/// Arguments for `sprig completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Print a completion script for `shell` to stdout.
///
/// # Errors
///
/// Infallible today; returns `Result` to match the other commands.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> Result<()> {
    let mut out = std::io::stdout();
    generate(shell, command, "sprig", &mut out);
    Ok(())
}
