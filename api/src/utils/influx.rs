use std::env;

use anyhow::Result;
use futures::stream;
use influxdb2::{models::DataPoint, Client};

const FACETS_MEASUREMENT: &str = "archive_facets";
const SEARCH_MEASUREMENT: &str = "archive_search";
const ASK_MEASUREMENT: &str = "archive_ask";

pub async fn track_facets(client: &Client, index: &str) -> Result<()> {
    track_event(client, index, FACETS_MEASUREMENT).await
}

pub async fn track_search(client: &Client, indices: &str) -> Result<()> {
    track_event(client, indices, SEARCH_MEASUREMENT).await
}

pub async fn track_ask(client: &Client, indices: &str) -> Result<()> {
    track_event(client, indices, ASK_MEASUREMENT).await
}

async fn track_event(client: &Client, index: &str, event: &str) -> Result<()> {
    let point = DataPoint::builder(event)
        .tag("index", index)
        .field("value", 1)
        .build()?;

    Ok(client
        .write(&env::var("INFLUX_DB")?, stream::once(async { point }))
        .await?)
}
