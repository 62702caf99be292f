use bevy::math::Vec2;
use std::f64::consts::{FRAC_PI_2, PI};

/// Half the circumference of the Web Mercator plane, in meters.
const MERCATOR_HALF: f64 = 20_037_508.34;

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub lat: f32,
    pub long: f32,
}

impl Coord {
    pub const fn new(lat: f32, long: f32) -> Self {
        Self { lat, long }
    }

    /// Slippy-map tile containing this coordinate at the given zoom level.
    pub fn to_tile_coords(&self, zoom: u32) -> TileId {
        let n = 2.0f64.powi(zoom as i32);
        let x = ((self.long as f64 + 180.0) / 360.0 * n).floor() as i32;
        let lat_rad = (self.lat as f64).to_radians();
        let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n).floor() as i32;
        TileId::new(x, y, zoom)
    }

    pub fn to_mercator(&self) -> (f64, f64) {
        let x = self.long as f64 * MERCATOR_HALF / 180.0;
        let lat_rad = (self.lat as f64).to_radians();
        let y = lat_rad.tan().asinh() * MERCATOR_HALF / PI;
        (x, y)
    }

    /// World-space position relative to the reference coordinate, with one
    /// tile of `tile_quality` pixels spanning a tile width at `zoom`.
    pub fn to_game_coords(&self, reference: Coord, zoom: u32, tile_quality: f64) -> Vec2 {
        let (ref_x, ref_y) = reference.to_mercator();
        let (x, y) = self.to_mercator();
        let scale = meters_per_pixel(zoom, tile_quality);
        Vec2::new(((x - ref_x) / scale) as f32, ((y - ref_y) / scale) as f32)
    }
}

/// Slippy-map tile index. `x` grows east, `y` grows south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    pub x: i32,
    pub y: i32,
    pub zoom: u32,
}

impl TileId {
    pub const fn new(x: i32, y: i32, zoom: u32) -> Self {
        Self { x, y, zoom }
    }

    /// Lat/long of the tile's north-west corner.
    pub fn to_lat_long(&self) -> Coord {
        let n = 2.0f64.powi(self.zoom as i32);
        let lon = self.x as f64 / n * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * self.y as f64 / n))
            .sinh()
            .atan()
            .to_degrees();
        Coord::new(lat as f32, normalize_longitude(lon) as f32)
    }

    /// World-space position of the north-west corner. Computed from the
    /// indices directly so copies beyond the antimeridian land in their
    /// own repeat of the world instead of snapping back to the first.
    pub fn to_game_coords(&self, reference: Coord, tile_quality: f64) -> Vec2 {
        let span = tile_span_meters(self.zoom);
        let merc_x = self.x as f64 * span - MERCATOR_HALF;
        let merc_y = MERCATOR_HALF - self.y as f64 * span;
        let (ref_x, ref_y) = reference.to_mercator();
        let scale = meters_per_pixel(self.zoom, tile_quality);
        Vec2::new(
            ((merc_x - ref_x) / scale) as f32,
            ((merc_y - ref_y) / scale) as f32,
        )
    }

    /// Number of tiles along one axis at the given zoom level.
    pub fn per_axis(zoom: u32) -> i32 {
        1 << zoom
    }

    /// The x index wrapped across the antimeridian.
    pub fn wrapped_x(&self) -> i32 {
        self.x.rem_euclid(Self::per_axis(self.zoom))
    }

    /// Whether the y index lies on the projection plane. There is no
    /// vertical wraparound; rows outside the range have no tile.
    pub fn in_y_range(&self) -> bool {
        self.y >= 0 && self.y < Self::per_axis(self.zoom)
    }
}

/// Meters of Web Mercator plane covered by one tile edge.
fn tile_span_meters(zoom: u32) -> f64 {
    MERCATOR_HALF * 2.0 / 2.0f64.powi(zoom as i32)
}

/// Meters of Web Mercator plane covered by one world-space unit.
pub fn meters_per_pixel(zoom: u32, tile_quality: f64) -> f64 {
    tile_span_meters(zoom) / tile_quality
}

/// Tile whose square contains the given world-space position. Inverse of
/// [`TileId::to_game_coords`], so positions in repeated world copies map
/// to out-of-range x indices rather than wrapping.
pub fn world_to_tile(world: Vec2, reference: Coord, zoom: u32, tile_quality: f64) -> TileId {
    let (ref_x, ref_y) = reference.to_mercator();
    let scale = meters_per_pixel(zoom, tile_quality);
    let span = tile_span_meters(zoom);
    let merc_x = ref_x + world.x as f64 * scale;
    let merc_y = ref_y + world.y as f64 * scale;
    let x = ((merc_x + MERCATOR_HALF) / span).floor() as i32;
    let y = ((MERCATOR_HALF - merc_y) / span).floor() as i32;
    TileId::new(x, y, zoom)
}

/// Inverse of [`Coord::to_game_coords`]: world-space offsets back to lat/long.
pub fn world_mercator_to_lat_lon(
    x_offset: f64,
    y_offset: f64,
    reference: Coord,
    zoom: u32,
    tile_quality: f64,
) -> Coord {
    let (ref_x, ref_y) = reference.to_mercator();
    let scale = meters_per_pixel(zoom, tile_quality);

    let global_x = ref_x + x_offset * scale;
    let global_y = ref_y + y_offset * scale;

    let lon = global_x / MERCATOR_HALF * 180.0;
    let lat = (global_y / MERCATOR_HALF * 180.0).to_radians();
    let lat = (2.0 * lat.exp().atan() - FRAC_PI_2).to_degrees();

    Coord::new(lat as f32, normalize_longitude(lon) as f32)
}

fn normalize_longitude(lon: f64) -> f64 {
    let mut lon = lon;
    while lon > 180.0 {
        lon -= 360.0;
    }
    while lon < -180.0 {
        lon += 360.0;
    }
    lon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_coords_at_low_zoom() {
        let tile = Coord::new(39.0, -105.0).to_tile_coords(2);
        assert_eq!((tile.x, tile.y), (0, 1));
    }

    #[test]
    fn tile_coords_match_known_slippy_index() {
        // Central London lands in tile (511, 340) at zoom 10.
        let tile = Coord::new(51.5074, -0.1278).to_tile_coords(10);
        assert_eq!((tile.x, tile.y, tile.zoom), (511, 340, 10));
    }

    #[test]
    fn tile_corner_of_world_tile() {
        let corner = TileId::new(0, 0, 0).to_lat_long();
        assert!((corner.lat - 85.0511).abs() < 0.001);
        assert!((corner.long + 180.0).abs() < 0.001);
    }

    #[test]
    fn game_coords_round_trip() {
        let reference = Coord::new(39.0, -105.0);
        let point = Coord::new(36.17, -120.45);
        let world = point.to_game_coords(reference, 5, 256.0);
        let back = world_mercator_to_lat_lon(world.x as f64, world.y as f64, reference, 5, 256.0);
        assert!((back.lat - point.lat).abs() < 0.01);
        assert!((back.long - point.long).abs() < 0.01);
    }

    #[test]
    fn reference_maps_to_origin() {
        let reference = Coord::new(39.0, -105.0);
        let world = reference.to_game_coords(reference, 2, 256.0);
        assert!(world.x.abs() < 1e-6);
        assert!(world.y.abs() < 1e-6);
    }

    #[test]
    fn world_to_tile_inverts_tile_corner_position() {
        let reference = Coord::new(39.0, -105.0);
        for tile in [TileId::new(0, 1, 2), TileId::new(3, 2, 2), TileId::new(-1, 1, 2)] {
            let corner = tile.to_game_coords(reference, 256.0);
            // Just inside the corner; y grows south in tile space.
            let inside = corner + Vec2::new(1.0, -1.0);
            assert_eq!(world_to_tile(inside, reference, 2, 256.0), tile);
        }
    }

    #[test]
    fn world_origin_sits_in_the_reference_tile() {
        let reference = Coord::new(39.0, -105.0);
        assert_eq!(
            world_to_tile(Vec2::ZERO, reference, 2, 256.0),
            reference.to_tile_coords(2)
        );
    }

    #[test]
    fn x_wraps_y_does_not() {
        assert_eq!(TileId::new(-1, 0, 2).wrapped_x(), 3);
        assert_eq!(TileId::new(4, 1, 2).wrapped_x(), 0);
        assert_eq!(TileId::new(2, 2, 2).wrapped_x(), 2);
        assert!(!TileId::new(0, -1, 2).in_y_range());
        assert!(!TileId::new(0, 4, 2).in_y_range());
        assert!(TileId::new(0, 3, 2).in_y_range());
    }

    #[test]
    fn longitude_normalization() {
        assert_eq!(normalize_longitude(190.0), -170.0);
        assert_eq!(normalize_longitude(-200.0), 160.0);
        assert_eq!(normalize_longitude(45.0), 45.0);
    }
}
