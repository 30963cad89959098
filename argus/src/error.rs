use thiserror::Error;

/// Everything a search against the archive can fail with.
///
/// The engine and the transport throw a much wider range of errors than an
/// analyst can act on, so they are collapsed into this closed set before
/// crossing the library boundary. Anything unrecognized lands in `Unknown`
/// rather than escaping as a transport type.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The engine could not be reached at all (refused, unresolved, or
    /// timed out).
    #[error("cannot connect to the search engine: {0}")]
    Connection(#[source] reqwest::Error),

    /// The engine understood the request and rejected it. The most common
    /// cause is pointing a vector query at an index that was never
    /// populated with `embeddings`.
    #[error("the search engine rejected the query against `{index}`: {reason}. Check that the index contains an `embeddings` vector field.")]
    BadRequest { index: String, reason: String },

    /// The named index does not exist.
    #[error("index not found: {0}")]
    NotFound(String),

    /// Anything else. The message is preserved for the logs.
    #[error("{0}")]
    Unknown(String),
}
