// Copyright (c) 2024-2025 Scanstore Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command definitions for Scanstore

use clap::{Parser, Subcommand, ValueEnum};
use scanstore::{CatalogConfig, DescriptorFormat, StorageType};
use std::path::PathBuf;

/// Log level options
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only errors
    Error,
    /// Warnings and errors
    Warn,
    /// Info, warnings, and errors
    Info,
    /// Debug messages and above (verbose)
    Debug,
    /// All messages including trace (very verbose)
    Trace,
    /// Disable all logging
    Off,
}

impl LogLevel {
    /// Convert to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// Scanstore CLI - inspect and edit a video/image table catalog
#[derive(Parser)]
#[command(name = "scanstore")]
#[command(about = "Scanstore - metadata catalog for per-item video and image tables")]
#[command(version)]
pub struct Cli {
    /// Database path (default ./db)
    #[arg(long, global = true)]
    pub path: Option<PathBuf>,

    /// Storage backend (posix, sled, redb)
    #[arg(long, global = true)]
    pub storage: Option<StorageType>,

    /// Logical root prefixed to every descriptor path
    #[arg(long, global = true)]
    pub root: Option<String>,

    /// Encoding for newly written descriptors (bincode, json)
    #[arg(long = "descriptor-format", global = true)]
    pub descriptor_format: Option<DescriptorFormat>,

    /// JSON configuration file; command-line flags override its values
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Set log level (error, warn, info, debug, trace, off)
    #[arg(short = 'l', long = "log-level", global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Verbose mode (equivalent to --log-level debug)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Resolve the database configuration from the config file and flags
    pub fn catalog_config(&self) -> Result<CatalogConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(file) => CatalogConfig::from_file(file)?,
            None => CatalogConfig::default(),
        };
        if let Some(path) = &self.path {
            config.db_path = path.clone();
        }
        if let Some(storage) = self.storage {
            config.storage_type = storage;
        }
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(format) = self.descriptor_format {
            config.format = format;
        }
        Ok(config)
    }
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show detailed version information
    Version,

    /// Create an empty catalog if none exists
    Init,

    /// List registered tables
    Tables {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// List registered jobs
    Jobs {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show one table's schema and row layout
    Describe {
        /// Table name
        table: String,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Publish a new table
    CreateTable {
        /// Table name
        name: String,

        /// Column as name:type, repeatable; ids follow the given order
        #[arg(short = 'C', long = "column")]
        columns: Vec<String>,

        /// Number of rows
        #[arg(long, default_value_t = 0)]
        rows: i64,

        /// Rows stored per item
        #[arg(long = "rows-per-item", default_value_t = 0)]
        rows_per_item: i64,
    },

    /// Remove a table from the catalog (its descriptor is kept)
    DropTable {
        /// Table name
        name: String,
    },

    /// Report descriptors no longer referenced by the catalog
    Orphans,
}

/// Output format options
#[derive(Clone, Copy, Debug)]
pub enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}
