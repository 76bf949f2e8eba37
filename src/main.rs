// src/main.rs
use bkorg::cli::args::Cli;
use bkorg::cli::display::print_error;
use bkorg::config::load_settings;
use bkorg::exitcode;
use clap::Parser;
use tracing::{debug, info, instrument};
use tracing_subscriber::{
    filter::{filter_fn, LevelFilter},
    fmt::{self, format::FmtSpan},
    prelude::*,
};

const NOISY_MODULES: [&str; 4] = ["tokio", "runtime", "mio", "clap_builder"];

#[instrument]
fn main() {
    let cli = Cli::parse();
    let no_color = cli.no_color;

    setup_logging(cli.debug, no_color);

    let mut settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            print_error(&format!("Failed to load settings: {}", e), no_color);
            std::process::exit(exitcode::USAGE);
        }
    };
    if let Some(store) = &cli.store {
        debug!("Store path overridden on the command line: {}", store.display());
        settings.store_path = store.to_string_lossy().into_owned();
    }

    if let Err(e) = bkorg::cli::execute_command(cli, &settings) {
        print_error(&format!("Error: {}", e), no_color);
        std::process::exit(e.exit_code());
    }
}

fn is_noisy(target: &str) -> bool {
    NOISY_MODULES.iter().any(|name| target.starts_with(name))
}

fn setup_logging(verbosity: u8, no_color: bool) {
    debug!("INIT: Attempting logger init from main.rs");

    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    // Runtime internals drown the engine's own spans at trace level
    let module_filter = filter_fn(|metadata| !is_noisy(metadata.target()));

    // Human output and logs go to stderr, stdout stays machine readable
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(!no_color)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter).with_filter(module_filter))
        .init();

    match filter {
        LevelFilter::INFO => info!("Debug mode: info"),
        LevelFilter::DEBUG => debug!("Debug mode: debug"),
        LevelFilter::TRACE => debug!("Debug mode: trace"),
        _ => {}
    }
}
