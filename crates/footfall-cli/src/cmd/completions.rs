use anyhow::Result;
use clap::Args;
use clap_complete::{Shell, generate};

/// Arguments for `footfall completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to emit a completion script for.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `shell` to stdout.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> Result<()> {
    let mut out = std::io::stdout();
    generate(shell, command, "footfall", &mut out);
    Ok(())
}
