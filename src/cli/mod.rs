//! CLI module - Command-line interface for Setube
//!
//! This module provides a structured CLI using clap for argument parsing.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};

/// Setube - media search, convert and download
#[derive(Parser)]
#[command(name = "setube")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the media backend
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Show metadata and formats for a media URL
    #[command(alias = "i")]
    Info {
        /// Media URL
        url: String,
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// List the formats currently offered for a media URL
    Formats {
        /// Media URL
        url: String,
    },

    /// Convert and download a media URL
    #[command(alias = "dl")]
    Download {
        /// Media URL
        url: String,
        /// Conversion preset (see `setube presets`)
        #[arg(long, short, default_value = "mp3-320")]
        preset: String,
        /// Directory to save into (defaults to downloads.output_dir)
        #[arg(long, short)]
        output: Option<String>,
    },

    /// List conversion presets
    Presets,

    /// Browse and manage local history
    #[command(alias = "h", args_conflicts_with_subcommands = true)]
    History {
        #[command(subcommand)]
        command: Option<HistoryCommands>,
        /// Collection to list when no subcommand is given (default: searches)
        #[arg(value_enum)]
        kind: Option<HistoryKind>,
        /// Number of entries to show (defaults to history.default_limit)
        #[arg(long, short = 'n')]
        limit: Option<u64>,
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List recent entries, newest first
    #[command(alias = "ls")]
    List {
        #[arg(value_enum, default_value = "searches")]
        kind: HistoryKind,
        /// Number of entries to show (defaults to history.default_limit)
        #[arg(long, short = 'n')]
        limit: Option<u64>,
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete one entry
    #[command(alias = "rm")]
    Delete {
        #[arg(value_enum)]
        kind: HistoryKind,
        /// Entry id
        id: i64,
    },
    /// Delete every entry of one collection, or of all of them
    Clear {
        #[arg(value_enum)]
        target: ClearTarget,
    },
    /// Show how many entries each collection holds
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HistoryKind {
    #[value(alias = "search")]
    Searches,
    #[value(alias = "metadata", alias = "viewed")]
    Media,
    #[value(alias = "conversion")]
    Conversions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClearTarget {
    #[value(alias = "search")]
    Searches,
    #[value(alias = "metadata", alias = "viewed")]
    Media,
    #[value(alias = "conversion")]
    Conversions,
    All,
}
