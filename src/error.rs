//! Error types shared by the loaders and the fetch port.

use thiserror::Error;

/// Failure to obtain a single resource.
///
/// Always recoverable at the call site: callers substitute empty content or
/// an inline message and carry on with sibling work.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("{path}: HTTP {status}")]
    Status {
        /// Resource path relative to the site root.
        path: String,
        /// Status code returned.
        status: u16,
    },
    /// The request could not be completed.
    #[error("{path}: {message}")]
    Network {
        /// Resource path relative to the site root.
        path: String,
        /// Transport error text.
        message: String,
    },
    /// Reading from a local site directory failed.
    #[error("{path}: {source}")]
    Io {
        /// Resource path relative to the site root.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The resource was fetched but did not parse.
    #[error("{path}: invalid JSON: {message}")]
    Parse {
        /// Resource path relative to the site root.
        path: String,
        /// Parser error text.
        message: String,
    },
    /// A recorded failure served from a cassette.
    #[error("{0}")]
    Replayed(String),
}

/// Failure of a whole load step.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The repository list could not be obtained. Fatal for the project section.
    #[error("failed to load project catalog: {0}")]
    Catalog(#[source] FetchError),
    /// A single repository could not be turned into a card.
    #[error("repository {slug:?}: {reason}")]
    Repository {
        /// Slug of the skipped repository.
        slug: String,
        /// Why it was skipped.
        reason: String,
    },
    /// The experience data could not be obtained.
    #[error("failed to load experience data: {0}")]
    Experience(#[source] FetchError),
}
