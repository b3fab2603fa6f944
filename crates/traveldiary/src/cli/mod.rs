//! Command-line interface for traveldiary.
//!
//! This module provides the CLI structure for the `tdiary` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, EditCommand, ListCommand, OutputFormat, RemoveCommand,
    SearchCommand, ShowCommand,
};

use crate::logging::Verbosity;

/// tdiary - Keep a diary of the places you visit
///
/// Record a photo, where it was taken, a title and a few words about it,
/// then browse, search, edit or remove entries later.
#[derive(Debug, Parser)]
#[command(name = "tdiary")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Capture a photo and location, then save a new entry
    Add(AddCommand),

    /// List all entries, newest first
    List(ListCommand),

    /// Find entries by title
    Search(SearchCommand),

    /// Show a single entry
    Show(ShowCommand),

    /// Change the title or description of an entry
    Edit(EditCommand),

    /// Remove an entry
    Remove(RemoveCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
