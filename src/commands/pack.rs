//! `folio pack` command.

use std::path::Path;

use tracing::info;

use crate::context::ServiceContext;
use crate::pack::pack;

/// Execute the `pack` command.
///
/// Reads every data file from the configured site and writes one bundle,
/// as JSON or as a `window.SITE_DATA` assignment.
///
/// # Errors
///
/// Returns an error string if serialization or writing the output fails.
pub async fn run(ctx: &ServiceContext, output: Option<&Path>, data_js: bool) -> Result<(), String> {
    let outcome = pack(ctx.fetcher.as_ref()).await;
    let json = serde_json::to_string(&outcome.bundle)
        .map_err(|e| format!("Failed to serialize bundle: {e}"))?;
    let text = if data_js { format!("window.SITE_DATA = {json};") } else { json };

    match output {
        Some(path) => {
            std::fs::write(path, text)
                .map_err(|e| format!("Failed to write bundle {}: {e}", path.display()))?;
            info!(
                path = %path.display(),
                repos = outcome.bundle.repo_files.len(),
                invalid = outcome.invalid.len(),
                "bundle written"
            );
        }
        None => println!("{text}"),
    }
    Ok(())
}
