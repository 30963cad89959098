use tracing::error;

use crate::{
    elastic::Elastic,
    query::{Facet, ANY},
};

/// The option lists a filter picker offers for one index, one list per
/// facet. Every list carries the [`ANY`] sentinel sorted into position.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FacetOptions {
    pub categories: Vec<String>,
    pub languages: Vec<String>,
    pub countries: Vec<String>,
}

/// Resolves the distinct values of one facet on `index`.
///
/// Resolution only exists to populate a picker, so it fails open: any
/// engine error is logged and degrades to an empty list instead of
/// breaking the surrounding interaction.
pub async fn facet_values(elastic: &Elastic, index: &str, facet: Facet) -> Vec<String> {
    match elastic
        .unique_field_values(index, &facet.keyword_field())
        .await
    {
        Ok(values) => values,
        Err(err) => {
            error!(
                "Failed to resolve {} values on {index}: {err}",
                facet.as_str()
            );
            Vec::new()
        }
    }
}

/// Resolves all three facet option lists for `index`, one engine round
/// trip per facet.
pub async fn facet_options(elastic: &Elastic, index: &str) -> FacetOptions {
    FacetOptions {
        categories: with_any(facet_values(elastic, index, Facet::Category).await),
        languages: with_any(facet_values(elastic, index, Facet::Language).await),
        countries: with_any(facet_values(elastic, index, Facet::Country).await),
    }
}

fn with_any(mut values: Vec<String>) -> Vec<String> {
    values.push(ANY.to_string());
    values.sort();
    values
}
