//! `tdiary` - CLI for traveldiary
//!
//! This binary records, lists, searches, edits and removes travel entries.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{BufRead, IsTerminal, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use traveldiary::cli::{
    AddCommand, Cli, Command, ConfigCommand, EditCommand, OutputFormat, RemoveCommand,
};
use traveldiary::host::{FileImagePicker, FixedLocationProvider, ManualGeocoder};
use traveldiary::list::Confirm;
use traveldiary::notify::ConsoleNotifier;
use traveldiary::{
    init_logging, CaptureFlow, Config, Draft, EntryCache, EntryStore, RemoveOutcome,
    SqliteKeyValueStore, TravelEntry,
};

type Store = EntryStore<SqliteKeyValueStore>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbosity());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<traveldiary::Error>() {
                Some(e) => eprintln!("{}: {e}", e.title()),
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Add(cmd) => {
            let (store, mut cache) = open_diary(&config)?;
            handle_add(&config, &store, &mut cache, cmd).await
        }
        Command::List(cmd) => {
            let (_, cache) = open_diary(&config)?;
            print_entries(cache.entries(), cache.count(), cmd.format())
        }
        Command::Search(cmd) => {
            let (_, cache) = open_diary(&config)?;
            let found = config.list_manager().search(&cache, &cmd.query);
            print_entries(&found, found.len(), cmd.format())
        }
        Command::Show(cmd) => {
            let (_, cache) = open_diary(&config)?;
            let entry = cache
                .get(&cmd.id)
                .ok_or_else(|| traveldiary::Error::not_found(&cmd.id))?;
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(entry)?);
            } else {
                print_entry(entry);
            }
            Ok(())
        }
        Command::Edit(cmd) => {
            let (store, mut cache) = open_diary(&config)?;
            handle_edit(&config, &store, &mut cache, cmd)
        }
        Command::Remove(cmd) => {
            let (store, mut cache) = open_diary(&config)?;
            handle_remove(&config, &store, &mut cache, &cmd)
        }
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

/// Open the configured store and load the mirror from it.
fn open_diary(config: &Config) -> anyhow::Result<(Store, EntryCache)> {
    let backend = SqliteKeyValueStore::open(config.database_path())?;
    let store = EntryStore::with_key(backend, config.storage.entries_key.clone());
    let cache = EntryCache::loaded(&store)?;
    Ok((store, cache))
}

async fn handle_add(
    config: &Config,
    store: &Store,
    cache: &mut EntryCache,
    cmd: AddCommand,
) -> anyhow::Result<()> {
    let position = cmd.position().or_else(|| config.default_position());
    let mut flow = CaptureFlow::new(
        FileImagePicker::new(cmd.photo.clone()),
        FixedLocationProvider::new(position),
        ManualGeocoder::new(cmd.address()),
    )
    .with_accuracy(config.accuracy());

    flow.capture(cmd.image_source()).await?;
    debug!("Capture finished in state {}", flow.state().name());

    let draft = Draft::from_capture(flow.state(), cmd.title, cmd.description);
    let outcome = config
        .composer()
        .submit(store, cache, &ConsoleNotifier, &draft)
        .await?;

    println!();
    print_entry(&outcome.entry);

    if std::io::stdout().is_terminal() {
        tokio::time::sleep(outcome.reset_after).await;
    }
    flow.reset();
    Ok(())
}

fn handle_edit(
    config: &Config,
    store: &Store,
    cache: &mut EntryCache,
    cmd: EditCommand,
) -> anyhow::Result<()> {
    let current = cache
        .get(&cmd.id)
        .ok_or_else(|| traveldiary::Error::not_found(&cmd.id))?;
    let title = cmd.title.unwrap_or_else(|| current.title.clone());
    let description = cmd
        .description
        .unwrap_or_else(|| current.description.clone());

    let edited = config
        .list_manager()
        .edit(store, cache, &cmd.id, &title, &description)?;

    println!("Entry updated");
    println!();
    print_entry(&edited);
    Ok(())
}

fn handle_remove(
    config: &Config,
    store: &Store,
    cache: &mut EntryCache,
    cmd: &RemoveCommand,
) -> anyhow::Result<()> {
    let confirm = PromptConfirm { assume_yes: cmd.yes };

    match config
        .list_manager()
        .remove(store, cache, &cmd.id, &confirm)?
    {
        RemoveOutcome::Removed(entry) => {
            println!("Removed \"{}\" ({} entries left)", entry.title, cache.count());
        }
        RemoveOutcome::Cancelled => println!("Nothing removed."),
        RemoveOutcome::NotFound => println!("No entry with id {}; nothing removed.", cmd.id),
    }
    Ok(())
}

/// Asks on stdin before removing, unless `--yes` was given.
#[derive(Debug)]
struct PromptConfirm {
    assume_yes: bool,
}

impl Confirm for PromptConfirm {
    fn confirm_removal(&self, entry: &TravelEntry) -> bool {
        if self.assume_yes {
            return true;
        }

        print!(
            "Remove \"{}\"? Are you sure you want to remove this travel entry? [y/N] ",
            entry.title
        );
        if std::io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

fn print_entries(entries: &[TravelEntry], count: usize, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(entries)?);
            return Ok(());
        }
        OutputFormat::Plain => {
            for entry in entries {
                print_entry(entry);
                println!();
            }
        }
        OutputFormat::Table => {
            println!("{:<36}  {:<16}  {:<25}  ADDRESS", "ID", "DATE", "TITLE");
            for entry in entries {
                println!(
                    "{:<36}  {:<16}  {:<25}  {}",
                    entry.id,
                    entry.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                    entry.title,
                    entry.address
                );
            }
        }
    }

    if entries.is_empty() {
        println!("No travel entries yet.");
    } else {
        println!("{count} {}", if count == 1 { "entry" } else { "entries" });
    }
    Ok(())
}

fn print_entry(entry: &TravelEntry) {
    println!("{}", entry.title);
    println!("  id:       {}", entry.id);
    println!("  date:     {}", entry.timestamp.format("%Y-%m-%d %H:%M UTC"));
    println!("  location: {}", entry.address);
    println!("  image:    {}", entry.image_uri);
    println!("  {}", entry.description);
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Entries key:        {}", config.storage.entries_key);
                println!();
                println!("[Limits]");
                println!("  Title:              {}", config.limits.title_max);
                println!(
                    "  Description (new):  {}",
                    config.limits.description_max_create
                );
                println!(
                    "  Description (edit): {}",
                    config.limits.description_max_edit
                );
                println!();
                println!("[Capture]");
                println!("  High accuracy:      {}", config.capture.high_accuracy);
                match config.default_position() {
                    Some(p) => println!("  Default position:   {}, {}", p.latitude, p.longitude),
                    None => println!("  Default position:   (none)"),
                }
                println!();
                println!("[Notifications]");
                println!("  Enabled:            {}", config.notifications.enabled);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path.clone()))
                .with_context(|| format!("configuration at {} is invalid", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
