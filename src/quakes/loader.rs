use geojson::GeoJson;
use serde::{Deserialize, Serialize};

use crate::types::{Coord, QuakeFeature};

/// A parsed feed: the usable events plus a count of entries that were
/// dropped for missing a point geometry or a magnitude.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct QuakeFeed {
    pub features: Vec<QuakeFeature>,
    pub skipped: usize,
    pub metadata: Option<FeedMetadata>,
}

/// Parses the USGS summary feed and returns the renderable events.
pub fn parse_quake_feed(data: &str) -> Result<QuakeFeed, Box<dyn std::error::Error>> {
    let geojson = data.parse::<GeoJson>()?;

    let mut feed = QuakeFeed::default();
    if let GeoJson::FeatureCollection(collection) = geojson {
        feed.metadata = collection
            .foreign_members
            .as_ref()
            .and_then(|members| members.get("metadata"))
            .and_then(|value| serde_json::from_value(value.clone()).ok());

        for feature in collection.features {
            let epicenter = match feature.geometry.as_ref().map(|g| &g.value) {
                Some(geojson::Value::Point(point)) if point.len() >= 2 => {
                    Coord::new(point[1] as f32, point[0] as f32)
                }
                _ => {
                    feed.skipped += 1;
                    continue;
                }
            };

            let properties = feature.properties.unwrap_or_default();
            let mag = match properties.get("mag").and_then(|v| v.as_f64()) {
                Some(mag) => mag,
                None => {
                    feed.skipped += 1;
                    continue;
                }
            };

            feed.features.push(QuakeFeature {
                id: match feature.id {
                    Some(geojson::feature::Id::String(id)) => id,
                    Some(geojson::feature::Id::Number(id)) => id.to_string(),
                    None => String::from("unknown"),
                },
                place: properties
                    .get("place")
                    .and_then(|v| v.as_str())
                    .unwrap_or("Unknown location")
                    .to_string(),
                time_ms: properties.get("time").and_then(|v| v.as_i64()).unwrap_or(0),
                mag,
                epicenter,
            });
        }
    }

    Ok(feed)
}

// USGS summary feed metadata, thanks to: https://transform.tools/json-to-rust-serde
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedMetadata {
    pub generated: Option<i64>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub status: Option<i64>,
    pub api: Option<String>,
    pub count: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quakes::magnitude::{MagnitudeBand, marker_style};

    const SAMPLE_FEED: &str = r#"{
        "type": "FeatureCollection",
        "metadata": {
            "generated": 1755820800000,
            "url": "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson",
            "title": "USGS All Earthquakes, Past Day",
            "status": 200,
            "api": "1.10.3",
            "count": 4
        },
        "features": [
            {
                "type": "Feature",
                "properties": {"mag": 4.2, "place": "83 km E of Somewhere", "time": 1755800000000},
                "geometry": {"type": "Point", "coordinates": [-120.5, 36.2, 8.3]},
                "id": "nc75001234"
            },
            {
                "type": "Feature",
                "properties": {"mag": 1.3, "time": 1755801111111},
                "geometry": {"type": "Point", "coordinates": [10.0, 20.0]},
                "id": "us60001111"
            },
            {
                "type": "Feature",
                "properties": {"mag": null, "place": "unlocatable", "time": 1},
                "geometry": {"type": "Point", "coordinates": [30.0, 40.0]},
                "id": "us60002222"
            },
            {
                "type": "Feature",
                "properties": {"mag": 2.0, "place": "no epicenter", "time": 2},
                "geometry": null,
                "id": "us60003333"
            }
        ]
    }"#;

    #[test]
    fn parses_events_and_skips_unusable_ones() {
        let feed = parse_quake_feed(SAMPLE_FEED).unwrap();
        assert_eq!(feed.features.len(), 2);
        assert_eq!(feed.skipped, 2);

        let first = &feed.features[0];
        assert_eq!(first.id, "nc75001234");
        assert_eq!(first.place, "83 km E of Somewhere");
        assert_eq!(first.time_ms, 1755800000000);
        assert_eq!(first.mag, 4.2);
        assert!((first.epicenter.lat - 36.2).abs() < 1e-6);
        assert!((first.epicenter.long + 120.5).abs() < 1e-6);
    }

    #[test]
    fn missing_place_gets_a_fallback() {
        let feed = parse_quake_feed(SAMPLE_FEED).unwrap();
        assert_eq!(feed.features[1].place, "Unknown location");
    }

    #[test]
    fn metadata_comes_from_the_foreign_member() {
        let feed = parse_quake_feed(SAMPLE_FEED).unwrap();
        let metadata = feed.metadata.unwrap();
        assert_eq!(metadata.title.as_deref(), Some("USGS All Earthquakes, Past Day"));
        assert_eq!(metadata.count, Some(4));
    }

    #[test]
    fn parsed_event_styles_like_the_raw_magnitude() {
        let feed = parse_quake_feed(SAMPLE_FEED).unwrap();
        let style = marker_style(feed.features[0].mag);
        assert_eq!(style.radius, 21.0);
        assert_eq!(style.fill, MagnitudeBand::FourToFive.rgb());
    }

    #[test]
    fn non_collection_input_is_empty_not_an_error() {
        let feed = parse_quake_feed(r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#).unwrap();
        assert!(feed.features.is_empty());
        assert_eq!(feed.skipped, 0);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(parse_quake_feed("not a feed").is_err());
    }
}
