//! Data layer for a single-page portfolio site.
//!
//! Loads the experience list and the project catalog, renders cards, keeps
//! a per-session project cache warm in the background, and drives the
//! project detail modal. Resources come through the [`ports::Fetcher`] port
//! so the same code runs against a live site, a local directory, or a
//! recorded cassette.

pub mod adapters;
pub mod cache;
pub mod cassette;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod csv;
pub mod error;
pub mod experience;
pub mod info;
pub mod logging;
pub mod modal;
pub mod model;
pub mod pack;
pub mod page;
pub mod prefetch;
pub mod ports;

#[cfg(test)]
pub(crate) mod test_support;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_tree_reads_path_listing() {
        let dir = tempfile::tempdir().unwrap();
        let listing = dir.path().join("paths.txt");
        std::fs::write(&listing, "a.rs\nsrc/b.rs\n").unwrap();
        assert!(run(["folio".into(), "tree".into(), listing.into_os_string()]).is_ok());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["folio", "unknown"]);
        assert!(result.is_err());
    }
}
