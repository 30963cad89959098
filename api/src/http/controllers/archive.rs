use axum::extract::{Path, State};
use axum_jsonschema::Json;
use chrono::NaiveDate;
use schemars::JsonSchema;
use tracing::warn;

use argus::{
    facet_options, search_archives, summarize_table, DocRow, Elastic, Facet, FacetOptions,
    ResultTable, SearchParams, DEFAULT_K, DEFAULT_MAX_HITS, DEFAULT_NUM_CANDIDATES, INDEX_OPTIONS,
};

use crate::{
    axum::{
        errors::{ApiError, ApiResult},
        state::AppState,
    },
    utils::influx,
};

#[allow(clippy::unused_async)]
pub async fn indices() -> Json<Vec<&'static str>> {
    Json(INDEX_OPTIONS.to_vec())
}

pub async fn facets(
    State(state): State<AppState>,
    Path(index): Path<String>,
) -> ApiResult<Json<FacetOptions>> {
    if let Err(error) = influx::track_facets(&state.influx, &index).await {
        warn!("Failed to track facet resolution: {error}");
    }

    let elastic = Elastic::new(&state.config.elastic)?;

    Ok(Json(facet_options(&elastic, &index).await))
}

#[derive(Debug, serde::Deserialize, JsonSchema)]
pub struct SearchRequest {
    question: String,
    indices: Vec<String>,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    languages: Vec<String>,
    #[serde(default)]
    countries: Vec<String>,
    start: NaiveDate,
    end: NaiveDate,
    #[serde(default = "default_k")]
    k: u32,
    #[serde(default = "default_num_candidates")]
    num_candidates: u32,
    #[serde(default = "default_max_hits")]
    max_hits: u32,
}

const fn default_k() -> u32 {
    DEFAULT_K
}

const fn default_num_candidates() -> u32 {
    DEFAULT_NUM_CANDIDATES
}

const fn default_max_hits() -> u32 {
    DEFAULT_MAX_HITS
}

impl SearchRequest {
    fn into_params(self) -> ApiResult<SearchParams> {
        if self.indices.is_empty() {
            return Err(ApiError::ClientError(
                "At least one index is required.".to_string(),
            ));
        }

        Ok(SearchParams {
            indices: self.indices,
            question: self.question,
            categories: self.categories,
            languages: self.languages,
            countries: self.countries,
            start: self.start,
            end: self.end,
            k: self.k,
            num_candidates: self.num_candidates,
            max_hits: self.max_hits,
        })
    }
}

#[derive(Debug, serde::Serialize)]
pub struct SearchResults {
    total: usize,
    rows: Vec<DocRow>,
    distributions: Distributions,
}

#[derive(Debug, serde::Serialize)]
struct Distributions {
    category: Vec<FacetCount>,
    language: Vec<FacetCount>,
    country: Vec<FacetCount>,
}

#[derive(Debug, serde::Serialize)]
struct FacetCount {
    value: String,
    count: u64,
}

impl From<ResultTable> for SearchResults {
    fn from(table: ResultTable) -> Self {
        Self {
            total: table.len(),
            distributions: Distributions {
                category: facet_counts(&table, Facet::Category),
                language: facet_counts(&table, Facet::Language),
                country: facet_counts(&table, Facet::Country),
            },
            rows: table.rows,
        }
    }
}

fn facet_counts(table: &ResultTable, facet: Facet) -> Vec<FacetCount> {
    table
        .distribution(facet)
        .into_iter()
        .map(|(value, count)| FacetCount { value, count })
        .collect()
}

pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> ApiResult<Json<SearchResults>> {
    let params = request.into_params()?;

    if let Err(error) = influx::track_search(&state.influx, &params.indices.join(",")).await {
        warn!("Failed to track search: {error}");
    }

    let table = search_archives(&state.config, &params).await?;

    Ok(Json(table.into()))
}

#[derive(Debug, serde::Serialize)]
pub struct AskResponse {
    answer: Option<String>,
    results: SearchResults,
}

pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> ApiResult<Json<AskResponse>> {
    let params = request.into_params()?;

    if let Err(error) = influx::track_ask(&state.influx, &params.indices.join(",")).await {
        warn!("Failed to track ask: {error}");
    }

    let table = search_archives(&state.config, &params).await?;

    let answer = if table.is_empty() {
        None
    } else {
        Some(summarize_table(&state.config, &params.question, &table).await?)
    };

    Ok(Json(AskResponse {
        answer,
        results: table.into(),
    }))
}
