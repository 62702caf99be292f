use std::{fs, path::Path, time::Duration};

use bevy::{
    asset::RenderAssetUsages,
    image::Image,
    render::render_resource::{Extent3d, TextureDimension, TextureFormat},
};
use ureq::Agent;

use crate::types::TileId;

pub const OSM_TILES: &str = "https://tile.openstreetmap.org";
pub const GOOGLE_SATELLITE_TILES: &str = "https://mt1.google.com/vt/lyrs=s";
pub const CARTO_DARK_TILES: &str = "https://basemaps.cartocdn.com/dark_all";
pub const CARTO_LIGHT_TILES: &str = "https://basemaps.cartocdn.com/light_all";

/// One raster base layer: a slippy tile server plus its display name and
/// attribution line.
#[derive(Debug, Clone, PartialEq)]
pub struct TileProvider {
    pub name: &'static str,
    url: &'static str,
    pub attribution: &'static str,
    pub enabled: bool,
}

impl TileProvider {
    /// Request URL for a tile. Google serves through query parameters,
    /// everything else through the usual z/x/y path.
    pub fn tile_url(&self, tile: TileId) -> String {
        let x = tile.wrapped_x();
        if self.url.contains("google") {
            format!("{}&x={}&y={}&z={}", self.url, x, tile.y, tile.zoom)
        } else {
            format!("{}/{}/{}/{}.png", self.url, tile.zoom, x, tile.y)
        }
    }

    /// Fetches one tile as encoded image bytes, reading through the disk
    /// cache. Rate limited responses are retried after a pause.
    pub fn fetch_raster(&self, tile: TileId, cache_dir: &Path) -> Result<Vec<u8>, ureq::Error> {
        let cache_file = cache_dir.join(self.name).join(format!(
            "{}_{}_{}.png",
            tile.zoom,
            tile.wrapped_x(),
            tile.y
        ));
        if cache_file.exists() {
            if let Ok(bytes) = fs::read(&cache_file) {
                return Ok(bytes);
            }
        }

        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(10)))
            .http_status_as_error(false)
            .build();
        let agent: Agent = config.into();
        let url = self.tile_url(tile);
        loop {
            let mut response = agent.get(&url).call()?;
            if response.status() == 200 {
                let bytes = response.body_mut().read_to_vec()?;
                if let Some(parent) = cache_file.parent() {
                    let _ = fs::create_dir_all(parent);
                }
                let _ = fs::write(&cache_file, &bytes);
                return Ok(bytes);
            } else if response.status() == 429 {
                std::thread::sleep(Duration::from_secs(5));
            } else {
                return Err(ureq::Error::BadUri(format!(
                    "tile server returned status {}",
                    response.status()
                )));
            }
        }
    }
}

/// The switchable base layers plus the earthquake overlay flag. Exactly
/// one base layer is enabled at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRegistry {
    pub base_layers: Vec<TileProvider>,
    pub show_quakes: bool,
    pub base_changed: bool,
}

impl Default for LayerRegistry {
    fn default() -> Self {
        Self {
            base_layers: vec![
                TileProvider {
                    name: "Outdoors",
                    url: OSM_TILES,
                    attribution: "© OpenStreetMap contributors",
                    enabled: false,
                },
                TileProvider {
                    name: "Satellite",
                    url: GOOGLE_SATELLITE_TILES,
                    attribution: "Imagery © Google",
                    enabled: true,
                },
                TileProvider {
                    name: "Dark map",
                    url: CARTO_DARK_TILES,
                    attribution: "© OpenStreetMap contributors © CARTO",
                    enabled: false,
                },
                TileProvider {
                    name: "Light map",
                    url: CARTO_LIGHT_TILES,
                    attribution: "© OpenStreetMap contributors © CARTO",
                    enabled: false,
                },
            ],
            show_quakes: true,
            base_changed: false,
        }
    }
}

impl LayerRegistry {
    /// Switches the enabled base layer. Unknown names leave the registry
    /// untouched.
    pub fn enable_only(&mut self, name: &str) {
        if self.base_layers.iter().any(|layer| layer.name == name) {
            for layer in &mut self.base_layers {
                layer.enabled = layer.name == name;
            }
            self.base_changed = true;
        }
    }

    pub fn enabled_base(&self) -> Option<&TileProvider> {
        self.base_layers.iter().find(|layer| layer.enabled)
    }
}

/// Decoded image bytes to raw RGBA pixels.
pub fn tile_to_rgba(data: &[u8]) -> Result<Vec<u8>, image::ImageError> {
    let img = image::load_from_memory(data)?;
    Ok(img.to_rgba8().into_raw())
}

pub fn buffer_to_bevy_image(data: Vec<u8>, tile_size: u32) -> Image {
    Image::new(
        Extent3d {
            width: tile_size,
            height: tile_size,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_form_tile_url() {
        let registry = LayerRegistry::default();
        let outdoors = &registry.base_layers[0];
        assert_eq!(
            outdoors.tile_url(TileId::new(0, 1, 2)),
            "https://tile.openstreetmap.org/2/0/1.png"
        );
    }

    #[test]
    fn google_uses_query_parameters() {
        let registry = LayerRegistry::default();
        let satellite = registry.enabled_base().unwrap();
        assert_eq!(
            satellite.tile_url(TileId::new(1, 2, 3)),
            "https://mt1.google.com/vt/lyrs=s&x=1&y=2&z=3"
        );
    }

    #[test]
    fn urls_wrap_across_the_antimeridian() {
        let registry = LayerRegistry::default();
        let outdoors = &registry.base_layers[0];
        assert_eq!(
            outdoors.tile_url(TileId::new(-1, 1, 2)),
            "https://tile.openstreetmap.org/2/3/1.png"
        );
        assert_eq!(
            outdoors.tile_url(TileId::new(4, 1, 2)),
            "https://tile.openstreetmap.org/2/0/1.png"
        );
    }

    #[test]
    fn satellite_is_the_startup_layer() {
        let registry = LayerRegistry::default();
        assert_eq!(registry.enabled_base().unwrap().name, "Satellite");
        assert!(registry.show_quakes);
    }

    #[test]
    fn enable_only_keeps_exactly_one_base() {
        let mut registry = LayerRegistry::default();
        registry.enable_only("Dark map");
        let enabled: Vec<_> = registry
            .base_layers
            .iter()
            .filter(|layer| layer.enabled)
            .collect();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].name, "Dark map");
        assert!(registry.base_changed);
    }

    #[test]
    fn unknown_layer_name_is_ignored() {
        let mut registry = LayerRegistry::default();
        registry.enable_only("Topographic");
        assert_eq!(registry.enabled_base().unwrap().name, "Satellite");
        assert!(!registry.base_changed);
    }

    #[test]
    fn control_order_and_attributions() {
        let registry = LayerRegistry::default();
        let names: Vec<_> = registry.base_layers.iter().map(|l| l.name).collect();
        assert_eq!(names, ["Outdoors", "Satellite", "Dark map", "Light map"]);
        assert!(registry.base_layers.iter().all(|l| !l.attribution.is_empty()));
    }
}
