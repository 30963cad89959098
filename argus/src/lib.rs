#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod config;
mod elastic;
mod embed;
mod error;
mod facets;
pub mod openai;
mod prompt;
pub mod query;
mod results;

pub use config::Config;
pub use elastic::{DocSource, Elastic, Hit};
pub use embed::{Embedder, EMBEDDING_MODEL};
pub use error::SearchError;
pub use facets::{facet_options, facet_values, FacetOptions};
pub use openai::OpenAI;
pub use prompt::build_prompt;
pub use query::{facet_terms, must_clauses, Facet, ANY};
pub use results::{DocRow, Passage, ResultTable};

use chrono::NaiveDate;

/// Archive indices known to this deployment, offered as picker options.
/// Searching an index that is not on this list still works.
pub const INDEX_OPTIONS: &[&str] = &[
    "ua-by-facebook",
    "ua-by-telegram",
    "ua-by-web",
    "ua-by-youtube",
    "dm-8-countries-twitter",
    "dm-8-countries-telegram",
    "ndi-lithuania-instagram",
    "ndi-lithuania-web",
    "ndi-lithuania-youtube",
    "ndi-lithuania-telegram",
    "ndi-lithuania-initial-kivu-twitter",
    "recovery-win-facebook",
    "recovery-win-telegram",
    "recovery-win-web",
    "recovery-win-twitter",
    "recovery-win-comments-telegram",
];

pub const DEFAULT_K: u32 = 20;
pub const DEFAULT_NUM_CANDIDATES: u32 = 10_000;
pub const DEFAULT_MAX_HITS: u32 = 50;

/// Everything one search run needs: the question, where to look, and how
/// to filter.
///
/// Callers are expected to keep `num_candidates` at or above `k`; the
/// values are forwarded to the engine unclamped and it rejects a pool
/// smaller than the neighbour count.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub indices: Vec<String>,
    pub question: String,
    pub categories: Vec<String>,
    pub languages: Vec<String>,
    pub countries: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub k: u32,
    pub num_candidates: u32,
    pub max_hits: u32,
}

/// Embeds the question, runs the filtered KNN search, and shapes the hits
/// into a result table.
///
/// # Errors
///
/// This function will return an error if the question cannot be embedded
/// or the engine call fails; see [`SearchError`] for the taxonomy.
pub async fn search_archives(
    config: &Config,
    params: &SearchParams,
) -> Result<ResultTable, SearchError> {
    let vector = Embedder::global(&config.embed)
        .embed(&params.question)
        .await
        .map_err(|error| SearchError::Unknown(format!("embedding failed: {error}")))?;

    let must = must_clauses(
        facet_terms(&params.categories, &Facet::Category.keyword_field()),
        facet_terms(&params.languages, &Facet::Language.keyword_field()),
        facet_terms(&params.countries, &Facet::Country.keyword_field()),
        params.start,
        params.end,
    );

    let hits = Elastic::new(&config.elastic)?
        .knn_search(
            &params.indices,
            &vector,
            params.k,
            params.num_candidates,
            &must,
            params.max_hits,
        )
        .await?;

    Ok(ResultTable::from_hits(hits))
}

/// Summarizes a result table with the chat model and returns the answer
/// verbatim.
///
/// # Errors
///
/// This function will return an error if the completions call fails.
pub async fn summarize_table(
    config: &Config,
    question: &str,
    table: &ResultTable,
) -> anyhow::Result<String> {
    OpenAI::new(&config.openai)
        .summarize(&build_prompt(question, &table.passages()))
        .await
}
