// src/cli/mod.rs
use crate::cli::args::{resolve_flag, Cli, Commands};
use crate::cli::error::CliResult;
use crate::config::Settings;
use crate::domain::reconciliation::OrganizeOptions;

pub mod args;
pub mod commands;
pub mod completion;
pub mod display;
pub mod error;

pub fn execute_command(cli: Cli, settings: &Settings) -> CliResult<()> {
    if cli.generate_config {
        println!("{}", crate::config::generate_default_config());
        return Ok(());
    }
    match cli.command {
        Some(Commands::Organize {
            sort,
            no_sort,
            merge,
            no_merge,
            dedup,
            no_dedup,
            dry_run,
            is_json,
        }) => {
            let configured = settings.options;
            let options = OrganizeOptions {
                sort_bookmarks: resolve_flag(sort, no_sort, configured.sort_bookmarks),
                merge_folders: resolve_flag(merge, no_merge, configured.merge_folders),
                remove_duplicates: resolve_flag(dedup, no_dedup, configured.remove_duplicates),
            };
            commands::organize(settings, options, dry_run, is_json, cli.no_color)
        }
        Some(Commands::Watch { interval }) => commands::watch(settings, interval),
        Some(Commands::Show) => commands::show(settings),
        Some(Commands::Completion { shell }) => handle_completion(shell),
        None => Ok(()),
    }
}

fn handle_completion(shell: String) -> CliResult<()> {
    let to_cli_error = |e: std::io::Error| {
        error::CliError::CommandFailed(format!("Failed to generate completion script: {}", e))
    };

    // Brief comment on stderr about what's being output
    let parsed = completion::parse_shell(&shell).map_err(to_cli_error)?;
    if let Some(hint) = completion::install_hint(parsed) {
        eprintln!("# Outputting {} completion script for bkorg", parsed);
        eprintln!("# To use, run: {}", hint);
    }

    completion::generate_completion(&shell, &mut std::io::stdout()).map_err(to_cli_error)
}
