//! Facet resolution is best-effort: when the engine cannot be reached the
//! value lists degrade to empty and the option lists still offer "Any".

use argus::{config::ElasticConfig, facet_options, facet_values, Elastic, Facet};

fn unreachable_engine() -> Elastic {
    let config = ElasticConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        api_key: String::new(),
    };

    Elastic::new(&config).unwrap()
}

#[tokio::test]
async fn an_unreachable_engine_resolves_no_facet_values() {
    let values = facet_values(&unreachable_engine(), "ua-by-web", Facet::Category).await;

    assert!(values.is_empty());
}

#[tokio::test]
async fn option_lists_degrade_to_the_sentinel_alone() {
    let options = facet_options(&unreachable_engine(), "ua-by-web").await;

    assert_eq!(options.categories, vec!["Any"]);
    assert_eq!(options.languages, vec!["Any"]);
    assert_eq!(options.countries, vec!["Any"]);
}
