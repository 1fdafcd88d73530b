//! Command dispatch and handlers.

pub mod build;
pub mod pack;
pub mod show;
pub mod tree;

use std::future::Future;
use std::path::Path;

use crate::cli::Command;
use crate::config::FolioConfig;
use crate::context::{load_bundle, ServiceContext};

/// Dispatch a parsed command to its handler.
///
/// Configuration comes from the environment (see [`FolioConfig::from_env`]).
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the command fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Tree { paths } => tree::run(paths),
        Command::Build { bundle } => {
            let ctx = site_context(bundle.as_deref())?;
            block_on(build::run(&ctx))
        }
        Command::Show { slug, bundle } => {
            let ctx = site_context(bundle.as_deref())?;
            block_on(show::run(&ctx, slug))
        }
        Command::Pack { output, data_js } => {
            let ctx = site_context(None)?;
            block_on(pack::run(&ctx, output.as_deref(), *data_js))
        }
    }
}

/// Builds the service context from the environment and an optional bundle file.
fn site_context(bundle: Option<&Path>) -> Result<ServiceContext, String> {
    let config = FolioConfig::from_env()?;
    let bundle = bundle.map(load_bundle).transpose()?;
    ServiceContext::from_config(&config, bundle)
}

/// Runs `future` to completion on a single-threaded runtime.
fn block_on<F: Future<Output = Result<(), String>>>(future: F) -> Result<(), String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start runtime: {e}"))?
        .block_on(future)
}
