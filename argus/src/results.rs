use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::{elastic::Hit, query::Facet};

/// One shaped row of the result table.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DocRow {
    pub id: String,
    pub score: f32,
    pub date: Option<NaiveDate>,
    pub text: String,
    pub translated_text: String,
    pub url: String,
    pub country: String,
    pub language: String,
    pub category: String,
}

/// A retrieved passage paired with the url it came from, ready to hand to
/// the summarizer.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Passage {
    pub text: String,
    pub url: String,
}

/// Tabular view over one batch of hits.
///
/// Rebuilt from scratch on every search; rows stay in engine order and are
/// never re-sorted here.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ResultTable {
    pub rows: Vec<DocRow>,
}

impl ResultTable {
    /// Shapes raw hits into display rows. Shaping never fails: values that
    /// cannot be used degrade to empty fields instead of erroring.
    #[must_use]
    pub fn from_hits(hits: Vec<Hit>) -> Self {
        let rows = hits
            .into_iter()
            .map(|hit| DocRow {
                id: hit.id,
                score: hit.score.unwrap_or_default(),
                date: parse_date(&hit.source.date),
                text: hit.source.text,
                translated_text: hit.source.translated_text,
                url: normalize_url(hit.source.url),
                country: hit.source.country,
                language: hit.source.language,
                category: hit.source.category,
            })
            .collect();

        Self { rows }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Counts rows per distinct value of `facet`, most frequent first and
    /// ties broken alphabetically.
    ///
    /// Rows with no value for the facet are not counted, so the result can
    /// be empty even when the table is not. An empty distribution means
    /// there is nothing to chart.
    #[must_use]
    pub fn distribution(&self, facet: Facet) -> Vec<(String, u64)> {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for row in &self.rows {
            let value = match facet {
                Facet::Category => row.category.as_str(),
                Facet::Language => row.language.as_str(),
                Facet::Country => row.country.as_str(),
            };

            if !value.is_empty() {
                *counts.entry(value).or_default() += 1;
            }
        }

        let mut counts: Vec<(String, u64)> = counts
            .into_iter()
            .map(|(value, count)| (value.to_string(), count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        counts
    }

    /// The (passage, source url) pairs fed to the summarizer, in row order.
    ///
    /// The translated text is preferred when present: the archives are
    /// multilingual and the summarization prompt is English.
    #[must_use]
    pub fn passages(&self) -> Vec<Passage> {
        self.rows
            .iter()
            .map(|row| Passage {
                text: if row.translated_text.is_empty() {
                    row.text.clone()
                } else {
                    row.translated_text.clone()
                },
                url: row.url.clone(),
            })
            .collect()
    }
}

/// Prefixes `https://` when the stored url carries no scheme, so result
/// links are clickable. Empty stays empty.
fn normalize_url(url: String) -> String {
    if url.is_empty() || url.contains("://") {
        url
    } else {
        format!("https://{url}")
    }
}

/// Parses the engine's date value down to a calendar date, dropping any
/// time component. Anything unparseable becomes `None`.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date())
        })
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .ok()
}
