//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::address::GeocodedAddress;
use crate::capture::{ImageSource, Position};

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Entry title (at most 25 characters)
    #[arg(short, long)]
    pub title: String,

    /// Entry description (at most 200 characters)
    #[arg(short, long)]
    pub description: String,

    /// Image file to attach
    #[arg(short, long, value_name = "FILE", conflicts_with = "camera")]
    pub photo: Option<PathBuf>,

    /// Take a new photo with the camera
    #[arg(long)]
    pub camera: bool,

    /// Latitude of the current position
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Longitude of the current position
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Street for the resolved address
    #[arg(long)]
    pub street: Option<String>,

    /// City for the resolved address
    #[arg(long)]
    pub city: Option<String>,

    /// Region for the resolved address
    #[arg(long)]
    pub region: Option<String>,

    /// Country for the resolved address
    #[arg(long)]
    pub country: Option<String>,
}

impl AddCommand {
    /// Which image source was requested.
    #[must_use]
    pub fn image_source(&self) -> ImageSource {
        if self.camera {
            ImageSource::Camera
        } else {
            ImageSource::Library
        }
    }

    /// Position given on the command line, if any.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        Some(Position::new(self.lat?, self.lon?))
    }

    /// Address components given on the command line.
    #[must_use]
    pub fn address(&self) -> GeocodedAddress {
        GeocodedAddress {
            street: self.street.clone(),
            city: self.city.clone(),
            region: self.region.clone(),
            country: self.country.clone(),
        }
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Output as JSON (same as `--format json`)
    #[arg(long, conflicts_with = "format")]
    pub json: bool,
}

impl ListCommand {
    /// The format to print in, with `--json` taking effect.
    #[must_use]
    pub fn format(&self) -> OutputFormat {
        OutputFormat::resolve(self.format, self.json)
    }
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Text to look for in entry titles (case-insensitive)
    pub query: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Output as JSON (same as `--format json`)
    #[arg(long, conflicts_with = "format")]
    pub json: bool,
}

impl SearchCommand {
    /// The format to print in, with `--json` taking effect.
    #[must_use]
    pub fn format(&self) -> OutputFormat {
        OutputFormat::resolve(self.format, self.json)
    }
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Entry id
    pub id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Entry id
    pub id: String,

    /// New title (keeps the current one if omitted)
    #[arg(short, long)]
    pub title: Option<String>,

    /// New description (keeps the current one if omitted)
    #[arg(short, long)]
    pub description: Option<String>,
}

/// Remove command arguments.
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Entry id
    pub id: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Plain,
    /// Formatted table
    #[default]
    Table,
    /// JSON output
    Json,
}

impl OutputFormat {
    fn resolve(format: Self, json: bool) -> Self {
        if json {
            Self::Json
        } else {
            format
        }
    }
}
