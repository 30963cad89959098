use influxdb2::Client;
use std::{env, sync::Arc};

use argus::Config;

pub struct State {
    pub config: Config,
    pub influx: Client,
}

#[allow(clippy::module_name_repetitions)]
pub type AppState = Arc<State>;

pub fn create(config: Config) -> AppState {
    Arc::new(State {
        config,
        influx: influx_client(),
    })
}

fn influx_client() -> Client {
    Client::new(
        env::var("INFLUX_URL").expect("$INFLUX_URL not set"),
        env::var("INFLUX_ORG").expect("$INFLUX_ORG not set"),
        env::var("INFLUX_TOKEN").expect("$INFLUX_TOKEN not set"),
    )
}
