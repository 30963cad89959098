use std::collections::HashSet;

use chrono::NaiveDate;
use serde_json::{json, Value};

/// Sentinel facet value meaning "do not filter on this facet at all".
pub const ANY: &str = "Any";

/// Name of the dense-vector field the archive documents are indexed under.
pub const EMBEDDINGS_FIELD: &str = "embeddings";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The document facets an analyst can filter and chart on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Category,
    Language,
    Country,
}

impl Facet {
    pub const ALL: [Self; 3] = [Self::Category, Self::Language, Self::Country];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Language => "language",
            Self::Country => "country",
        }
    }

    /// The exact-match field backing this facet in the engine mapping.
    #[must_use]
    pub fn keyword_field(self) -> String {
        format!("{}.keyword", self.as_str())
    }
}

/// Builds the exact-match clauses for one facet.
///
/// An empty selection and a selection containing [`ANY`] both mean the
/// facet is unconstrained and produce no clauses. Duplicate selections
/// collapse into a single clause.
#[must_use]
pub fn facet_terms(selected: &[String], field: &str) -> Vec<Value> {
    if selected.is_empty() || selected.iter().any(|value| value == ANY) {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    selected
        .iter()
        .filter(|value| seen.insert(value.as_str()))
        .map(|value| json!({ "term": { field: value } }))
        .collect()
}

/// Assembles the AND-combined clause list for a filtered search.
///
/// The date-range clause is always present, both bounds inclusive. Each
/// non-empty facet term set becomes an OR-group satisfied by any single
/// match; empty sets are omitted entirely rather than encoded as
/// always-true clauses. The two date bounds are passed through unvalidated,
/// so an inverted range simply matches nothing.
#[must_use]
pub fn must_clauses(
    category_terms: Vec<Value>,
    language_terms: Vec<Value>,
    country_terms: Vec<Value>,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<Value> {
    let mut must = vec![json!({
        "range": {
            "date": {
                "gte": start.format(DATE_FORMAT).to_string(),
                "lte": end.format(DATE_FORMAT).to_string(),
            }
        }
    })];

    push_should_group(&mut must, category_terms);
    push_should_group(&mut must, language_terms);
    push_should_group(&mut must, country_terms);

    must
}

fn push_should_group(must: &mut Vec<Value>, terms: Vec<Value>) {
    if !terms.is_empty() {
        must.push(json!({
            "bool": {
                "should": terms,
                "minimum_should_match": 1,
            }
        }));
    }
}

/// Assembles the full `_search` request body.
///
/// The filter applies during candidate collection, before similarity
/// ranking, so the engine always ranks documents that already satisfy the
/// metadata constraints. `max_hits` caps how many ranked hits come back.
#[must_use]
pub fn search_body(
    vector: &[f32],
    k: u32,
    num_candidates: u32,
    must: &[Value],
    max_hits: u32,
) -> Value {
    json!({
        "size": max_hits,
        "knn": {
            "field": EMBEDDINGS_FIELD,
            "query_vector": vector,
            "k": k,
            "num_candidates": num_candidates,
            "filter": {
                "bool": {
                    "must": must,
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn empty_selection_is_unconstrained() {
        assert!(facet_terms(&[], "category.keyword").is_empty());
    }

    #[test]
    fn any_disables_the_whole_facet() {
        let selected = vec!["news".to_string(), ANY.to_string()];

        assert!(facet_terms(&selected, "category.keyword").is_empty());
    }

    #[test]
    fn terms_keep_selection_order_and_collapse_duplicates() {
        let selected = vec![
            "uk".to_string(),
            "ua".to_string(),
            "uk".to_string(),
        ];

        let terms = facet_terms(&selected, "language.keyword");

        assert_eq!(
            terms,
            vec![
                json!({ "term": { "language.keyword": "uk" } }),
                json!({ "term": { "language.keyword": "ua" } }),
            ]
        );
    }

    #[test]
    fn unfiltered_search_still_carries_the_date_range() {
        let must = must_clauses(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            date("2022-02-24"),
            date("2022-03-01"),
        );

        assert_eq!(
            must,
            vec![json!({
                "range": { "date": { "gte": "2022-02-24", "lte": "2022-03-01" } }
            })]
        );
    }

    #[test]
    fn each_selected_facet_becomes_one_should_group() {
        let must = must_clauses(
            facet_terms(&["news".to_string()], "category.keyword"),
            facet_terms(&["uk".to_string(), "ru".to_string()], "language.keyword"),
            Vec::new(),
            date("2023-01-01"),
            date("2023-12-31"),
        );

        assert_eq!(must.len(), 3);
        assert_eq!(
            must[2],
            json!({
                "bool": {
                    "should": [
                        { "term": { "language.keyword": "uk" } },
                        { "term": { "language.keyword": "ru" } },
                    ],
                    "minimum_should_match": 1,
                }
            })
        );
    }

    #[test]
    fn building_twice_from_the_same_inputs_is_identical() {
        let build = || {
            must_clauses(
                facet_terms(&["satire".to_string()], "category.keyword"),
                Vec::new(),
                facet_terms(&["by".to_string()], "country.keyword"),
                date("2023-06-01"),
                date("2023-06-30"),
            )
        };

        assert_eq!(build(), build());
    }

    #[test]
    fn inverted_date_range_is_passed_through() {
        let must = must_clauses(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            date("2023-12-31"),
            date("2023-01-01"),
        );

        assert_eq!(must[0]["range"]["date"]["gte"], "2023-12-31");
        assert_eq!(must[0]["range"]["date"]["lte"], "2023-01-01");
    }

    #[test]
    fn search_body_filter_sits_inside_the_knn_clause() {
        let must = must_clauses(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            date("2023-01-01"),
            date("2023-12-31"),
        );
        let body = search_body(&[0.1, 0.2, 0.3], 20, 10_000, &must, 50);

        assert_eq!(body["size"], 50);
        assert_eq!(body["knn"]["field"], EMBEDDINGS_FIELD);
        assert_eq!(body["knn"]["k"], 20);
        assert_eq!(body["knn"]["num_candidates"], 10_000);
        assert_eq!(body["knn"]["query_vector"], json!([0.1_f32, 0.2_f32, 0.3_f32]));
        assert_eq!(body["knn"]["filter"]["bool"]["must"], json!(must));
        assert!(body.get("query").is_none());
    }
}
