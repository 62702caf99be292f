mod client;
mod loader;
pub mod magnitude;
mod quake_plugin;
mod renderer;
mod ui;
pub(crate) mod worker;

use std::time::Duration;

pub use quake_plugin::*;
pub use ui::*;
use ureq::Agent;

/// USGS GeoJSON summary feed covering the past day.
pub const USGS_ALL_DAY_FEED: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson";

#[derive(Clone)]
pub struct UsgsClient {
    url: String,
    pub agent: Agent,
}

impl Default for UsgsClient {
    fn default() -> Self {
        Self::new(USGS_ALL_DAY_FEED)
    }
}

impl UsgsClient {
    pub fn new(url: &str) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(10)))
            .http_status_as_error(false)
            .build();
        let agent: Agent = config.into();
        UsgsClient {
            url: url.to_string(),
            agent,
        }
    }
}
