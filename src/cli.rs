//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `folio`.
#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Load and render portfolio site data")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load experience and projects, prefetch details, and print the page.
    Build {
        /// Bundle file (JSON or data.js) to use instead of per-file fetches.
        #[arg(long)]
        bundle: Option<PathBuf>,
    },
    /// Open the project modal for a slug and print its panes.
    Show {
        /// Repository slug, e.g. `owner__repo`.
        slug: String,
        /// Bundle file (JSON or data.js) consulted before the network.
        #[arg(long)]
        bundle: Option<PathBuf>,
    },
    /// Pack the site's data files into a single bundle.
    Pack {
        /// Write the bundle here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Emit `window.SITE_DATA = ...;` for direct inclusion in a page.
        #[arg(long)]
        data_js: bool,
    },
    /// Build a file tree JSON from repository paths, one per line.
    Tree {
        /// File listing the paths (`-` for stdin).
        paths: PathBuf,
    },
}
