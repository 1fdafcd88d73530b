//! `folio show` command.

use crate::context::ServiceContext;
use crate::modal::{ContentSource, Modal};

/// Execute the `show` command.
///
/// Opens the modal for `slug` on a cold cache, so content comes from the
/// bundle when one was given and from the site otherwise.
///
/// # Errors
///
/// Never fails once the context exists; pane errors are printed inline.
pub async fn run(ctx: &ServiceContext, slug: &str) -> Result<(), String> {
    let modal = Modal::new(ctx);
    let source = modal.open(slug).await;
    let view = modal.view();

    println!("Project: {}", view.title);
    println!("Source: {}", source_label(source));
    println!("\n== README ==\n{}", view.readme);
    println!("\n== Files ==\n{}", view.tree);

    modal.close().await;
    Ok(())
}

fn source_label(source: ContentSource) -> &'static str {
    match source {
        ContentSource::Cache => "cache",
        ContentSource::Bundle => "bundle",
        ContentSource::Network => "network",
    }
}
