use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ruleport_adapter::DocumentAdapter;
use ruleport_core::utils::{init_logging, LogLevel};
use ruleport_core::{RuleportConfig, StoreBackend};
use ruleport_docstore::{DocumentStore, FileDocumentStore, InMemoryDocumentStore};
use tracing::debug;

mod commands;

use commands::policy::{AddArgs, RemoveArgs, RemoveFilteredArgs, RemoveTypeArgs};
use commands::query::{ImportArgs, ListArgs};

/// Ruleport Command Line Interface
///
/// Manages authorization rules kept in a document store.
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Configuration file (TOML)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory of the file store
    #[clap(long, global = true)]
    store: Option<PathBuf>,

    /// Collection holding the rules
    #[clap(long, global = true)]
    collection: Option<String>,

    /// Model definition file, the basic RBAC model when absent
    #[clap(long, global = true)]
    model: Option<PathBuf>,

    /// Log level (trace, debug, info, warning, error)
    #[clap(long, global = true)]
    log_level: Option<LogLevel>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store one rule
    Add(AddArgs),

    /// Remove one rule
    Remove(RemoveArgs),

    /// Remove the rules matching field values
    #[clap(name = "remove-filtered")]
    RemoveFiltered(RemoveFilteredArgs),

    /// Remove every rule of a type
    #[clap(name = "remove-type")]
    RemoveType(RemoveTypeArgs),

    /// Replace the stored rules with a policy file
    Import(ImportArgs),

    /// Print the stored rules
    List(ListArgs),

    /// Print the number of stored rules
    Count,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config =
        RuleportConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(store) = &cli.store {
        config.store.path = store.clone();
    }
    if let Some(collection) = &cli.collection {
        config.adapter.collection = collection.clone();
    }

    let level = match cli.log_level {
        Some(level) => level,
        None => config
            .log_level
            .as_deref()
            .and_then(|l| l.parse().ok())
            .unwrap_or_default(),
    };
    init_logging(level);
    debug!(?config, "effective configuration");

    match config.store.backend {
        StoreBackend::File => {
            let mut store = FileDocumentStore::open(&config.store.path).with_context(|| {
                format!("failed to open store at {}", config.store.path.display())
            })?;
            if let Some(limit) = config.store.max_batch_writes {
                store = store.with_max_batch_writes(limit);
            }
            run(DocumentAdapter::with_config(store, &config.adapter)?, &cli)
        }
        StoreBackend::Memory => {
            let mut store = InMemoryDocumentStore::new();
            if let Some(limit) = config.store.max_batch_writes {
                store = store.with_max_batch_writes(limit);
            }
            run(DocumentAdapter::with_config(store, &config.adapter)?, &cli)
        }
    }
}

fn run<S: DocumentStore>(mut adapter: DocumentAdapter<S>, cli: &Cli) -> anyhow::Result<()> {
    let model = cli.model.as_deref();
    match &cli.command {
        Commands::Add(args) => commands::policy::execute_add(&adapter, args),
        Commands::Remove(args) => commands::policy::execute_remove(&adapter, args),
        Commands::RemoveFiltered(args) => {
            commands::policy::execute_remove_filtered(&adapter, args)
        }
        Commands::RemoveType(args) => commands::policy::execute_remove_type(&adapter, args),
        Commands::Import(args) => commands::query::execute_import(&adapter, model, args),
        Commands::List(args) => commands::query::execute_list(&mut adapter, model, args),
        Commands::Count => commands::query::execute_count(&mut adapter, model),
    }
}
