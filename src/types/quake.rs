use bevy::prelude::*;
use rstar::{AABB, RTree, RTreeObject};

use super::Coord;

/// A single event from the USGS feed.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct QuakeFeature {
    pub id: String,
    pub place: String,
    /// Event time, milliseconds since the Unix epoch.
    pub time_ms: i64,
    pub mag: f64,
    pub epicenter: Coord,
}

impl RTreeObject for QuakeFeature {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let (x, y) = self.epicenter.to_mercator();
        AABB::from_point([x, y])
    }
}

/// Spatially indexed collection of fetched earthquakes.
#[derive(Resource, Clone, Debug)]
pub struct QuakeSet {
    pub features: RTree<QuakeFeature>,
    pub respawn: bool,
}

impl Default for QuakeSet {
    fn default() -> Self {
        Self::new()
    }
}

impl QuakeSet {
    pub fn new() -> Self {
        Self {
            features: RTree::new(),
            respawn: false,
        }
    }

    pub fn replace(&mut self, features: Vec<QuakeFeature>) {
        self.features = RTree::bulk_load(features);
        self.respawn = true;
    }
}
