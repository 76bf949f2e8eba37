// src/cli/completion.rs
use crate::cli::args::Cli;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;
use tracing::{debug, instrument};

const BIN_NAME: &str = "bkorg";

/// Resolves a shell name case-insensitively ("bash", "Zsh", "FISH", ...)
pub fn parse_shell(name: &str) -> io::Result<Shell> {
    name.to_lowercase().parse::<Shell>().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "Unsupported shell: {}. Supported shells: bash, zsh, fish, elvish, powershell",
                name
            ),
        )
    })
}

/// How to load the generated script, printed to stderr ahead of it
pub fn install_hint(shell: Shell) -> Option<&'static str> {
    match shell {
        Shell::Bash => Some("eval \"$(bkorg completion bash)\""),
        Shell::Zsh => Some("bkorg completion zsh > ~/.zfunc/_bkorg"),
        Shell::Fish => Some("bkorg completion fish | source"),
        _ => None,
    }
}

/// Writes the completion script for `shell` to `out`.
#[instrument(level = "debug", skip(out))]
pub fn generate_completion<W: io::Write>(shell: &str, out: &mut W) -> io::Result<()> {
    let shell = parse_shell(shell)?;
    debug!("Generating {} completion", shell);
    generate(shell, &mut Cli::command(), BIN_NAME, out);
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn given_fish_when_generating_then_script_targets_bkorg() {
        // Arrange
        let mut out = Vec::new();

        // Act
        generate_completion("fish", &mut out).unwrap();

        // Assert
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("-c bkorg"));
        assert!(script.contains("organize"));
    }

    #[rstest]
    #[case("BASH", Shell::Bash)]
    #[case("zsh", Shell::Zsh)]
    #[case("PowerShell", Shell::PowerShell)]
    fn given_mixed_case_name_when_parsing_then_shell_resolves(
        #[case] name: &str,
        #[case] expected: Shell,
    ) {
        assert_eq!(parse_shell(name).unwrap(), expected);
    }

    #[test]
    fn given_unknown_shell_when_generating_then_invalid_input_and_nothing_written() {
        let mut out = Vec::new();

        let err = generate_completion("tcsh", &mut out).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(err.to_string().contains("Unsupported shell: tcsh"));
        assert!(out.is_empty());
    }
}
