use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use doclib_console_core::config::ConsoleSettings;
use doclib_console_core::contract::{LibraryApi, LibraryId, Notifier, SearchMode};
use doclib_console_core::dataset::{self, Dataset};
use doclib_console_core::http::HttpLibraryApi;
use doclib_console_core::library_form::{ActionOutcome, LibraryForm, LibraryFormController};
use doclib_console_core::notification::Notification;
use doclib_console_core::release_sync::{ModalState, ReleaseSyncController};
use doclib_console_core::search::render::{no_results_message, FAILED_TEXT};
use doclib_console_core::search::{ResultArea, SearchController};
use tracing::info;

use crate::host::{TerminalHost, TerminalNotifier};
use crate::load_config::{default_config, load_config};

/// CLI for doclib-console: search documentation and manage libraries.
#[derive(Parser)]
#[clap(
    name = "doclib-console",
    version,
    about = "Search indexed documentation and manage libraries and their synced versions"
)]
pub struct Cli {
    /// Path to the YAML config file
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the indexed documentation
    Search {
        /// Search text, at least one non-blank character
        query: String,
        /// hybrid, keyword or semantic
        #[clap(long)]
        mode: Option<SearchMode>,
        /// Restrict results to one library
        #[clap(long)]
        library: Option<String>,
    },
    /// List upstream releases of a library and whether they are indexed
    Releases { library_id: String },
    /// Queue several releases of a library for synchronisation
    BatchSync {
        library_id: String,
        /// Tag to sync; repeatable
        #[clap(long = "tag")]
        tags: Vec<String>,
        /// Select every release that is not indexed yet
        #[clap(long, conflicts_with = "tags")]
        all: bool,
    },
    /// Sync a single version; prompts for it when omitted
    Sync {
        library_id: String,
        #[clap(long)]
        version: Option<String>,
    },
    /// Create a library
    Create(LibraryFields),
    /// Update a library
    Update {
        library_id: String,
        #[clap(flatten)]
        fields: LibraryFields,
    },
    /// Delete a library
    Delete {
        library_id: String,
        /// Name shown in the confirmation
        #[clap(long)]
        name: Option<String>,
        /// Skip the confirmation
        #[clap(long, short)]
        yes: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct LibraryFields {
    #[clap(long)]
    pub name: Option<String>,
    #[clap(long)]
    pub display_name: Option<String>,
    #[clap(long)]
    pub description: Option<String>,
    #[clap(long)]
    pub source_type: Option<String>,
    #[clap(long)]
    pub source_url: Option<String>,
    #[clap(long)]
    pub category: Option<String>,
    /// Comma-separated
    #[clap(long)]
    pub tags: Option<String>,
}

impl From<LibraryFields> for LibraryForm {
    fn from(fields: LibraryFields) -> Self {
        LibraryForm {
            name: fields.name,
            display_name: fields.display_name,
            description: fields.description,
            source_type: fields.source_type,
            source_url: fields.source_url,
            category: fields.category,
            tags: fields.tags,
        }
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    let settings = match &cli.config {
        Some(path) => load_config(path)?,
        None => default_config(),
    };
    settings.trace_loaded();

    let api: Arc<dyn LibraryApi> = Arc::new(HttpLibraryApi::from_settings(&settings.api)?);

    match cli.command {
        Commands::Search {
            query,
            mode,
            library,
        } => search(api, &settings, query, mode, library).await,
        Commands::Releases { library_id } => releases(api, &settings, library_id).await,
        Commands::BatchSync {
            library_id,
            tags,
            all,
        } => batch_sync(api, &settings, library_id, tags, all).await,
        Commands::Sync {
            library_id,
            version,
        } => {
            let mut button = Dataset::new().with(dataset::SYNC_LIBRARY, library_id);
            if let Some(version) = version {
                button.insert(dataset::VERSION, version);
            }
            let mut controller = form_controller(api, false);
            let outcome = controller.sync_version(&button).await;
            controller.settle().await;
            finish(outcome)
        }
        Commands::Create(fields) => {
            let mut controller = form_controller(api, false);
            let outcome = controller.submit(&Dataset::new(), &fields.into()).await;
            controller.settle().await;
            finish(outcome)
        }
        Commands::Update { library_id, fields } => {
            let element = Dataset::new()
                .with(dataset::MODE, "edit")
                .with(dataset::LIBRARY_ID, library_id);
            let mut controller = form_controller(api, false);
            let outcome = controller.submit(&element, &fields.into()).await;
            controller.settle().await;
            finish(outcome)
        }
        Commands::Delete {
            library_id,
            name,
            yes,
        } => {
            let mut button = Dataset::new().with(dataset::DELETE_LIBRARY, library_id);
            if let Some(name) = name {
                button.insert(dataset::LIBRARY_NAME, name);
            }
            let mut controller = form_controller(api, yes);
            let outcome = controller.delete(&button).await;
            controller.settle().await;
            finish(outcome)
        }
    }
}

fn form_controller(api: Arc<dyn LibraryApi>, assume_yes: bool) -> LibraryFormController {
    LibraryFormController::new(
        api,
        Arc::new(TerminalNotifier::default()),
        Arc::new(TerminalHost::new(assume_yes)),
    )
}

fn finish(outcome: ActionOutcome) -> Result<()> {
    info!(?outcome, "Library action finished");
    match outcome {
        ActionOutcome::Completed => Ok(()),
        ActionOutcome::Cancelled => {
            TerminalNotifier::default().notify(Notification::info("Cancelled"));
            Ok(())
        }
        ActionOutcome::Failed { .. } => bail!("Library action failed"),
        ActionOutcome::Miswired => bail!("Library action is missing its library id"),
    }
}

async fn search(
    api: Arc<dyn LibraryApi>,
    settings: &ConsoleSettings,
    query: String,
    mode: Option<SearchMode>,
    library: Option<String>,
) -> Result<()> {
    let mut controller = SearchController::new(api, settings.search.clone());
    if let Some(mode) = mode {
        controller.set_mode(mode);
    }
    controller.set_library_filter(library.map(LibraryId::new));
    controller.on_submit(&query).await;

    match controller.result_area() {
        ResultArea::Blank => bail!("Search text must not be blank"),
        ResultArea::Loading => bail!("Search did not complete"),
        ResultArea::Failed => bail!(FAILED_TEXT),
        ResultArea::NoResults { query } => {
            println!("{}", no_results_message(&query));
            Ok(())
        }
        ResultArea::Results(items) => {
            for item in items {
                println!("{}  ({:.2})", item.title, item.score);
                match item.chunk_index {
                    Some(chunk) => println!("    {}  chunk {}", item.path, chunk),
                    None => println!("    {}", item.path),
                }
                println!("    {}", item.content);
            }
            Ok(())
        }
    }
}

fn sync_controller(api: Arc<dyn LibraryApi>, settings: &ConsoleSettings) -> ReleaseSyncController {
    ReleaseSyncController::new(
        api,
        Arc::new(TerminalNotifier::default()),
        Arc::new(TerminalHost::new(false)),
        settings.sync.clone(),
    )
}

async fn open_modal(controller: &mut ReleaseSyncController, library_id: String) -> Result<()> {
    controller.open(&Dataset::new().with(dataset::LIBRARY_ID, library_id));
    controller.settle().await;
    if let Some(error) = controller.modal().error() {
        bail!(error.to_string());
    }
    if !controller.modal().is_open() {
        bail!("Library id must not be blank");
    }
    Ok(())
}

async fn releases(
    api: Arc<dyn LibraryApi>,
    settings: &ConsoleSettings,
    library_id: String,
) -> Result<()> {
    let mut controller = sync_controller(api, settings);
    open_modal(&mut controller, library_id).await?;

    let modal = controller.modal();
    println!("Default docs path: {}", modal.default_docs_path());
    for release in modal.releases() {
        let marker = if release.exists { "indexed" } else { "available" };
        println!(
            "{:<10} {:<20} {:<12} {}",
            marker, release.tag_name, release.version, release.docs_path
        );
    }
    controller.close();
    Ok(())
}

async fn batch_sync(
    api: Arc<dyn LibraryApi>,
    settings: &ConsoleSettings,
    library_id: String,
    tags: Vec<String>,
    all: bool,
) -> Result<()> {
    let mut controller = sync_controller(api, settings);
    open_modal(&mut controller, library_id).await?;

    if all {
        controller.toggle_select_all();
    }
    let mut seen = HashSet::new();
    for tag in tags.iter().filter(|tag| seen.insert(tag.as_str())) {
        if !controller.toggle(tag) {
            bail!("Release {tag} is unknown or already indexed");
        }
    }

    controller.start_sync();
    controller.settle().await;
    match controller.modal().state() {
        ModalState::Closed => Ok(()),
        _ => bail!("Batch sync was not accepted"),
    }
}
