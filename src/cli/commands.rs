// src/cli/commands.rs
use crate::application::AutoOrganizer;
use crate::cli::display;
use crate::cli::error::{CliError, CliResult};
use crate::config::Settings;
use crate::domain::flatten::{flatten_bookmarks, flatten_folders};
use crate::domain::reconciliation::OrganizeOptions;
use crate::domain::repositories::store::BookmarkStore;
use crate::infrastructure::di::ServiceContainer;
use chrono::Local;
use tokio::runtime::Runtime;
use tracing::{debug, error, instrument};

fn runtime() -> CliResult<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Other(format!("Failed to create async runtime: {}", e)))
}

/// One pass, saved unless `dry_run`. A failed pass is never saved.
#[instrument(skip(settings), level = "debug")]
pub fn organize(
    settings: &Settings,
    options: OrganizeOptions,
    dry_run: bool,
    is_json: bool,
    no_color: bool,
) -> CliResult<()> {
    let services = ServiceContainer::new(settings)?;
    let rt = runtime()?;
    let result = rt.block_on(services.organizer.run_organization(&options));

    if result.success && !dry_run {
        services
            .store
            .save()
            .map_err(|e| CliError::from(e).context("saving bookmark file"))?;
        debug!("Saved {}", services.store.path().display());
    }

    if is_json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::Other(format!("Failed to serialize result: {}", e)))?;
        println!("{}", json);
    } else {
        display::print_result(&result, dry_run, no_color);
    }

    match result.error {
        Some(message) if !result.success => Err(CliError::OrganizationFailed(message)),
        _ => Ok(()),
    }
}

/// Periodic organization until Ctrl-C, saving after every successful pass
#[instrument(skip(settings), level = "debug")]
pub fn watch(settings: &Settings, interval: Option<u64>) -> CliResult<()> {
    let minutes = interval.unwrap_or(settings.schedule.interval_minutes);
    let services = ServiceContainer::new(settings)?;
    let auto = AutoOrganizer::new(services.organizer.clone(), settings.options, minutes)
        .map_err(|e| CliError::from(e).context("watch"))?;

    eprintln!(
        "Organizing {} every {} minutes, press Ctrl-C to stop",
        services.store.path().display(),
        minutes
    );

    let store = services.store.clone();
    let rt = runtime()?;
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    };
    let runs = rt.block_on(auto.run_until(shutdown, |result| {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        if result.success {
            if let Err(e) = store.save() {
                error!("Failed to save bookmark file: {}", e);
                eprintln!("[{}] save failed: {}", stamp, e);
            }
        }
        println!("[{}] {}", stamp, display::summary_line(result));
    }));

    eprintln!("Stopped after {} runs", runs);
    Ok(())
}

/// Prints the tree and its counts
#[instrument(skip(settings), level = "debug")]
pub fn show(settings: &Settings) -> CliResult<()> {
    let services = ServiceContainer::new(settings)?;
    let rt = runtime()?;
    let tree = rt.block_on(services.store.get_tree())?;

    let rendered = display::render_tree(&tree);
    if !rendered.is_empty() {
        println!("{}", rendered);
    }
    println!(
        "{} bookmarks in {} folders",
        flatten_bookmarks(&tree).len(),
        flatten_folders(&tree).len()
    );
    Ok(())
}
