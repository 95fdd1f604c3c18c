//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Article archive for the Donut Bucho site
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root containing the config file (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: archive.toml)
    #[arg(short = 'C', long, default_value = "archive.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve archive, post and slug data as JSON over HTTP
    Serve {
        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the category chips and the posts shown for a selection
    Archive {
        /// Category slug to filter by (default: all records)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Print a single post by slug
    Post {
        /// Post slug
        slug: String,
    },

    /// List every post slug known to the content store
    Slugs,
}
