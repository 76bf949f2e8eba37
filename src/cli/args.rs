// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bkorg", author, version, about, long_about = None)]
/// Keeps a bookmark tree tidy: sorting, duplicate removal, folder merging
pub struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Bookmark tree JSON file, overrides the configured store_path
    #[arg(long, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    #[arg(long = "no-color", help = "disable colored output")]
    pub no_color: bool,

    #[arg(long = "generate-config", help = "print a default configuration to stdout")]
    pub generate_config: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Runs one reconciliation pass and saves the result
    Organize {
        #[arg(long, overrides_with = "no_sort", help = "sort folders first, then alphabetically")]
        sort: bool,

        #[arg(long = "no-sort", overrides_with = "sort")]
        no_sort: bool,

        #[arg(long, overrides_with = "no_merge", help = "merge folders with the same name")]
        merge: bool,

        #[arg(long = "no-merge", overrides_with = "merge")]
        no_merge: bool,

        #[arg(long, overrides_with = "no_dedup", help = "remove duplicate bookmarks")]
        dedup: bool,

        #[arg(long = "no-dedup", overrides_with = "dedup")]
        no_dedup: bool,

        #[arg(long = "dry-run", help = "report what would change without saving")]
        dry_run: bool,

        #[arg(long = "json", help = "output the result as json")]
        is_json: bool,
    },

    /// Organizes periodically until interrupted
    Watch {
        #[arg(
            short,
            long,
            value_name = "MINUTES",
            help = "minutes between runs, overrides the configured interval"
        )]
        interval: Option<u64>,
    },

    /// Prints the bookmark tree
    Show,

    /// Generates shell completion scripts
    Completion {
        /// Shell to generate completions for (bash, zsh, fish)
        shell: String,
    },
}

/// Resolves a `--x`/`--no-x` pair against the configured value
pub fn resolve_flag(on: bool, off: bool, configured: bool) -> bool {
    match (on, off) {
        (true, _) => true,
        (_, true) => false,
        _ => configured,
    }
}
