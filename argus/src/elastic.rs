use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::debug;

use crate::{config::ElasticConfig, error::SearchError, query};

/// Explicit cap on every engine round trip. Vector searches over the larger
/// archives can be slow, so this is generous rather than snappy.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// How many distinct values a facet aggregation may return.
const FACET_BUCKET_LIMIT: u32 = 10_000;

/// Thin client for the search engine's REST interface.
///
/// Built fresh for each analyst action; nothing here is cached or pooled
/// beyond what the HTTP client does on its own.
pub struct Elastic {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl Elastic {
    /// # Errors
    ///
    /// This function will return an error if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &ElasticConfig) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|error| SearchError::Unknown(error.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            api_key: config.api_key.clone(),
        })
    }

    /// Runs a filtered KNN search against one or more indices and returns
    /// the ranked hits in engine order.
    ///
    /// # Errors
    ///
    /// This function will return [`SearchError::Connection`] when the
    /// engine is unreachable, [`SearchError::BadRequest`] when it rejects
    /// the query, [`SearchError::NotFound`] when an index does not exist,
    /// and [`SearchError::Unknown`] for everything else.
    pub async fn knn_search(
        &self,
        indices: &[String],
        vector: &[f32],
        k: u32,
        num_candidates: u32,
        must: &[Value],
        max_hits: u32,
    ) -> Result<Vec<Hit>, SearchError> {
        let body = query::search_body(vector, k, num_candidates, must, max_hits);
        let response: SearchResponse = self.search(&indices.join(","), &body).await?;

        debug!("Engine returned {} hits", response.hits.hits.len());

        Ok(response.hits.hits)
    }

    /// Returns the distinct values present in `field` across `index`.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::knn_search`].
    pub async fn unique_field_values(
        &self,
        index: &str,
        field: &str,
    ) -> Result<Vec<String>, SearchError> {
        let body = json!({
            "size": 0,
            "aggs": {
                "unique_values": {
                    "terms": {
                        "field": field,
                        "size": FACET_BUCKET_LIMIT,
                    }
                }
            }
        });

        let response: AggregationResponse = self.search(index, &body).await?;

        Ok(response
            .aggregations
            .unique_values
            .buckets
            .into_iter()
            .map(|bucket| bucket.key)
            .collect())
    }

    async fn search<T: serde::de::DeserializeOwned>(
        &self,
        index: &str,
        body: &Value,
    ) -> Result<T, SearchError> {
        let response = self
            .client
            .post(format!("{}/{index}/_search", self.base_url))
            .header("Authorization", format!("ApiKey {}", self.api_key))
            .json(body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_error_status(status, index, &text));
        }

        response
            .json()
            .await
            .map_err(|error| SearchError::Unknown(format!("unreadable engine response: {error}")))
    }
}

fn classify_transport_error(error: reqwest::Error) -> SearchError {
    if error.is_connect() || error.is_timeout() {
        SearchError::Connection(error)
    } else {
        SearchError::Unknown(error.to_string())
    }
}

fn classify_error_status(status: StatusCode, index: &str, body: &str) -> SearchError {
    match status {
        StatusCode::BAD_REQUEST => SearchError::BadRequest {
            index: index.to_string(),
            reason: extract_reason(body),
        },
        StatusCode::NOT_FOUND => SearchError::NotFound(index.to_string()),
        _ => SearchError::Unknown(format!("engine returned {status}: {body}")),
    }
}

/// Pulls the engine's own `root_cause` reason out of an error body, falling
/// back to the raw text when the body is not the usual error envelope.
fn extract_reason(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/root_cause/0/reason")
                .and_then(Value::as_str)
                .map(ToString::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

/// One raw hit as the engine reports it.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Hit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f32>,
    #[serde(rename = "_source", default)]
    pub source: DocSource,
}

/// The stored document fields this application reads. Archives are not
/// uniformly mapped, so every field is optional and defaults to empty.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct DocSource {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub translated_text: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, serde::Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, serde::Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, serde::Deserialize)]
struct AggregationResponse {
    aggregations: UniqueValues,
}

#[derive(Debug, serde::Deserialize)]
struct UniqueValues {
    unique_values: TermsBuckets,
}

#[derive(Debug, serde::Deserialize)]
struct TermsBuckets {
    #[serde(default)]
    buckets: Vec<Bucket>,
}

#[derive(Debug, serde::Deserialize)]
struct Bucket {
    key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_maps_to_the_guidance_error() {
        let body = r#"{"error":{"root_cause":[{"type":"query_shard_exception","reason":"failed to create query: field [embeddings] does not exist in the mapping"}]},"status":400}"#;

        let error = classify_error_status(StatusCode::BAD_REQUEST, "ua-by-web", body);

        match error {
            SearchError::BadRequest { index, reason } => {
                assert_eq!(index, "ua-by-web");
                assert!(reason.contains("embeddings"));
                assert!(!reason.contains("root_cause"));
            }
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn missing_index_maps_to_not_found() {
        let error = classify_error_status(StatusCode::NOT_FOUND, "no-such-index", "{}");

        assert!(matches!(error, SearchError::NotFound(index) if index == "no-such-index"));
    }

    #[test]
    fn unexpected_statuses_stay_unknown() {
        let error =
            classify_error_status(StatusCode::INTERNAL_SERVER_ERROR, "ua-by-web", "boom");

        assert!(matches!(error, SearchError::Unknown(message) if message.contains("boom")));
    }

    #[test]
    fn reason_extraction_falls_back_to_raw_text() {
        assert_eq!(extract_reason("not json at all"), "not json at all");
    }

    #[test]
    fn hits_deserialize_with_missing_fields() {
        let raw = r#"{
            "took": 3,
            "hits": {
                "total": { "value": 2 },
                "hits": [
                    {
                        "_id": "a1",
                        "_score": 0.92,
                        "_source": {
                            "date": "2023-05-01",
                            "text": "оригінальний текст",
                            "translated_text": "original text",
                            "url": "example.org/post/1",
                            "country": "UA",
                            "language": "uk",
                            "category": "news"
                        }
                    },
                    { "_id": "b2" }
                ]
            }
        }"#;

        let response: SearchResponse = serde_json::from_str(raw).unwrap();
        let hits = response.hits.hits;

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "a1");
        assert_eq!(hits[0].source.language, "uk");
        assert_eq!(hits[1].score, None);
        assert_eq!(hits[1].source.url, "");
    }

    #[test]
    fn aggregation_buckets_deserialize_to_values() {
        let raw = r#"{
            "hits": { "total": { "value": 120 } },
            "aggregations": {
                "unique_values": {
                    "buckets": [
                        { "key": "news", "doc_count": 80 },
                        { "key": "satire", "doc_count": 40 }
                    ]
                }
            }
        }"#;

        let response: AggregationResponse = serde_json::from_str(raw).unwrap();
        let values: Vec<String> = response
            .aggregations
            .unique_values
            .buckets
            .into_iter()
            .map(|bucket| bucket.key)
            .collect();

        assert_eq!(values, vec!["news", "satire"]);
    }
}
