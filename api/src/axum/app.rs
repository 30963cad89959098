use axum::Router;
use std::env;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use argus::Config;

use crate::{axum::state, http::routes};

const REQUIRED_ENV_VARS: &[&str] = &[
    "INFLUX_DB",
    "INFLUX_URL",
    "INFLUX_ORG",
    "INFLUX_TOKEN",
    "ELASTIC_HOST",
    "ELASTIC_API_KEY",
    "OPENAI_API_KEY",
    "EMBEDDINGS_URL",
];

pub fn create() -> Router {
    for var in REQUIRED_ENV_VARS {
        assert!(env::var(var).is_ok(), "${var} not set");
    }

    let config = Config::from_env().expect("Invalid configuration");

    Router::new()
        .merge(routes::mount())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state::create(config))
}
