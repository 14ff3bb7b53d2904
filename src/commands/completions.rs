use clap::CommandFactory;
use clap_complete::{Shell, generate};
use eyre::Result;
use std::io::{self, Write};

use crate::cli::Cli;

pub fn run(shell: Shell) -> Result<()> {
    write_completions(shell, &mut io::stdout().lock())
}

/// Completion script for `shell`, named after the binary clap reports
fn write_completions(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completions(shell: Shell) -> String {
        let mut out = Vec::new();
        write_completions(shell, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_bash_completions_cover_subcommands() {
        let script = completions(Shell::Bash);
        assert!(script.contains("timeline"));
        for subcommand in ["publish", "decode", "config", "completions"] {
            assert!(script.contains(subcommand), "missing {}", subcommand);
        }
        assert!(script.contains("--task-id"));
    }

    #[test]
    fn test_zsh_completions_header() {
        let script = completions(Shell::Zsh);
        assert!(script.contains("#compdef timeline"));
    }
}
