use std::{path::PathBuf, thread};

use bevy::{
    input::mouse::MouseWheel,
    prelude::*,
    utils::{HashMap, HashSet},
    window::PrimaryWindow,
};
use crossbeam_channel::{Receiver, Sender, bounded};
use directories::ProjectDirs;

use super::provider::{LayerRegistry, buffer_to_bevy_image, tile_to_rgba};
use super::ui::TilesUiPlugin;
use crate::camera::camera_rect;
use crate::types::{Coord, TileId, world_mercator_to_lat_lon, world_to_tile};
use crate::{EguiBlockInputState, STARTING_LOCATION, STARTING_ZOOM, TILE_QUALITY};

const MIN_ZOOM_LEVEL: u32 = 1;
const MAX_ZOOM_LEVEL: u32 = 15;

pub struct TileMapPlugin;

impl Plugin for TileMapPlugin {
    fn build(&self, app: &mut App) {
        let (tx, rx): (ChunkSenderType, ChunkReceiverType) = bounded(10);
        app.insert_resource(ChunkReceiver(rx))
            .insert_resource(ChunkSender(tx))
            .insert_resource(TileMapResources::default())
            .insert_resource(Clean::default())
            .add_event::<ZoomChangedEvent>()
            .add_systems(
                FixedUpdate,
                (spawn_chunks_around_camera, spawn_to_needed_chunks),
            )
            .add_systems(Update, detect_zoom_level)
            .add_systems(
                FixedUpdate,
                (
                    despawn_outofrange_chunks,
                    read_tile_map_receiver,
                    clean_tile_map,
                )
                    .chain(),
            )
            .add_plugins(TilesUiPlugin);
    }
}

/// Sent whenever the discrete zoom level switches, so world-space
/// positions derived from it can be rebuilt.
#[derive(Event, Default)]
pub struct ZoomChangedEvent;

#[derive(Debug, Resource, Clone, Default)]
pub struct TileMapResources {
    pub zoom_manager: ZoomManager,
    pub chunk_manager: ChunkManager,
    pub location_manager: Location,
}

impl TileMapResources {
    /// World-space position back to lat/long.
    pub fn point_to_coord(&self, world: Vec2) -> Coord {
        world_mercator_to_lat_lon(
            world.x as f64,
            world.y as f64,
            self.chunk_manager.reference,
            self.zoom_manager.zoom_level,
            self.zoom_manager.tile_size as f64,
        )
    }

    /// Lat/long to world-space position at the current zoom level.
    pub fn coord_to_point(&self, coord: Coord) -> Vec2 {
        coord.to_game_coords(
            self.chunk_manager.reference,
            self.zoom_manager.zoom_level,
            self.zoom_manager.tile_size as f64,
        )
    }
}

#[derive(Debug, Clone)]
pub struct ZoomManager {
    pub zoom_level: u32,
    pub last_projection_level: f32,
    pub tile_size: f32,
}

impl Default for ZoomManager {
    fn default() -> Self {
        Self {
            zoom_level: STARTING_ZOOM,
            last_projection_level: 1.0,
            tile_size: TILE_QUALITY as f32,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChunkManager {
    pub spawned_chunks: HashSet<TileId>,
    pub to_spawn_chunks: HashMap<TileId, Vec<u8>>,
    pub update: bool,
    pub reference: Coord,
    pub layers: LayerRegistry,
    pub cache_dir: PathBuf,
}

impl Default for ChunkManager {
    fn default() -> Self {
        let cache_dir = ProjectDirs::from("", "", "quake-map")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("cache"));
        Self {
            spawned_chunks: HashSet::default(),
            to_spawn_chunks: HashMap::default(),
            update: true,
            reference: STARTING_LOCATION,
            layers: LayerRegistry::default(),
            cache_dir,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Location {
    pub location: Coord,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            location: STARTING_LOCATION,
        }
    }
}

#[derive(Resource, Clone, Default)]
struct Clean {
    clean: bool,
}

fn clean_tile_map(
    mut res_manager: ResMut<TileMapResources>,
    commands: Commands,
    chunk_query: Query<(Entity, &TileMarker)>,
    mut clean: ResMut<Clean>,
) {
    if clean.clean {
        clean.clean = false;
        despawn_all_chunks(commands, chunk_query);
        res_manager.chunk_manager.spawned_chunks.clear();
        res_manager.chunk_manager.to_spawn_chunks.clear();
    }
}

fn detect_zoom_level(
    mut res_manager: ResMut<TileMapResources>,
    mut ortho_projection_query: Query<&mut OrthographicProjection, With<Camera>>,
    mut camera_query: Query<&mut Transform, With<Camera>>,
    state: Res<EguiBlockInputState>,
    q_windows: Query<&Window, With<PrimaryWindow>>,
    evr_scroll: EventReader<MouseWheel>,
    mut clean: ResMut<Clean>,
    mut zoom_event: EventWriter<ZoomChangedEvent>,
) {
    if let (Ok(mut projection), Ok(mut camera)) = (
        ortho_projection_query.get_single_mut(),
        camera_query.get_single_mut(),
    ) {
        if projection.scale != res_manager.zoom_manager.last_projection_level
            && !state.block_input
            && !evr_scroll.is_empty()
        {
            let width =
                camera_rect(q_windows.single(), &projection).0 / res_manager.zoom_manager.tile_size;
            let zoom_level = res_manager.zoom_manager.zoom_level;
            let new_level = if width > 6.5 && zoom_level > MIN_ZOOM_LEVEL {
                zoom_level - 1
            } else if width < 3.5 && zoom_level < MAX_ZOOM_LEVEL {
                zoom_level + 1
            } else {
                zoom_level
            };

            if new_level != zoom_level {
                res_manager.zoom_manager.zoom_level = new_level;
                projection.scale = 1.0;
                // Keep the stored location under the camera across the
                // scale reset.
                camera.translation = res_manager
                    .location_manager
                    .location
                    .to_game_coords(
                        res_manager.chunk_manager.reference,
                        new_level,
                        res_manager.zoom_manager.tile_size as f64,
                    )
                    .extend(1.0);
                res_manager.chunk_manager.update = true;
                clean.clean = true;
                zoom_event.send(ZoomChangedEvent);
            }
        }
        if res_manager.chunk_manager.layers.base_changed {
            res_manager.chunk_manager.layers.base_changed = false;
            res_manager.chunk_manager.update = true;
            clean.clean = true;
        }
    }
}

pub type ChunkData = (TileId, Vec<u8>);
pub type ChunkSenderType = Sender<ChunkData>;
pub type ChunkReceiverType = Receiver<ChunkData>;

#[derive(Resource, Deref)]
pub struct ChunkReceiver(Receiver<ChunkData>);

#[derive(Resource, Deref)]
pub struct ChunkSender(Sender<ChunkData>);

#[derive(Component)]
pub struct TileMarker(pub TileId);

fn spawn_chunk(
    commands: &mut Commands,
    tile: Handle<Image>,
    tile_id: TileId,
    reference: Coord,
    tile_size: f32,
) {
    let corner = tile_id.to_game_coords(reference, tile_size as f64);
    let center = corner + Vec2::new(tile_size / 2.0, -tile_size / 2.0);
    commands.spawn((
        Sprite {
            image: tile,
            custom_size: Some(Vec2::splat(tile_size)),
            ..default()
        },
        Transform::from_translation(center.extend(0.0)),
        TileMarker(tile_id),
    ));
}

fn spawn_chunks_around_camera(
    camera_query: Query<&Transform, With<Camera>>,
    chunk_sender: Res<ChunkSender>,
    mut res_manager: ResMut<TileMapResources>,
) {
    if !res_manager.chunk_manager.update {
        return;
    }
    res_manager.chunk_manager.update = false;

    let Some(provider) = res_manager.chunk_manager.layers.enabled_base().cloned() else {
        return;
    };
    let zoom_level = res_manager.zoom_manager.zoom_level;
    let tile_size = res_manager.zoom_manager.tile_size;
    let reference = res_manager.chunk_manager.reference;
    let cache_dir = res_manager.chunk_manager.cache_dir.clone();

    for transform in camera_query.iter() {
        let camera_tile = world_to_tile(
            transform.translation.xy(),
            reference,
            zoom_level,
            tile_size as f64,
        );
        let range = 4;

        for y in (camera_tile.y - range)..=(camera_tile.y + range) {
            for x in (camera_tile.x - range)..=(camera_tile.x + range) {
                let tile = TileId::new(x, y, zoom_level);
                if res_manager.chunk_manager.spawned_chunks.contains(&tile) {
                    continue;
                }
                res_manager.chunk_manager.spawned_chunks.insert(tile);
                // Rows past the poles have no tile to fetch.
                if !tile.in_y_range() {
                    continue;
                }

                let tx = chunk_sender.0.clone();
                let provider = provider.clone();
                let cache_dir = cache_dir.clone();
                thread::spawn(move || match provider.fetch_raster(tile, &cache_dir) {
                    Ok(bytes) => match tile_to_rgba(&bytes) {
                        Ok(rgba) => {
                            if let Err(e) = tx.send((tile, rgba)) {
                                eprintln!("Failed to send tile data: {:?}", e);
                            }
                        }
                        Err(e) => eprintln!("Failed to decode tile {:?}: {}", tile, e),
                    },
                    Err(e) => eprintln!("Failed to fetch tile {:?}: {}", tile, e),
                });
            }
        }
    }
}

fn read_tile_map_receiver(
    map_receiver: Res<ChunkReceiver>,
    mut res_manager: ResMut<TileMapResources>,
) {
    let mut new_chunks = Vec::new();

    while let Ok((tile, raw_image_data)) = map_receiver.try_recv() {
        // Tiles requested before a zoom switch come back under the old
        // level and would land on the wrong grid.
        if tile.zoom != res_manager.zoom_manager.zoom_level {
            continue;
        }
        if !res_manager.chunk_manager.to_spawn_chunks.contains_key(&tile) {
            new_chunks.push((tile, raw_image_data));
        }
    }

    for (tile, data) in new_chunks {
        res_manager.chunk_manager.to_spawn_chunks.insert(tile, data);
    }
}

fn spawn_to_needed_chunks(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    mut res_manager: ResMut<TileMapResources>,
) {
    let tile_size = res_manager.zoom_manager.tile_size;
    let reference = res_manager.chunk_manager.reference;
    let to_spawn_chunks: Vec<ChunkData> =
        res_manager.chunk_manager.to_spawn_chunks.drain().collect();
    for (tile_id, raw_image_data) in to_spawn_chunks {
        if raw_image_data.len() != (tile_size as usize) * (tile_size as usize) * 4 {
            warn!("tile {:?} decoded to an unexpected size, dropping it", tile_id);
            continue;
        }
        let tile_handle = images.add(buffer_to_bevy_image(raw_image_data, tile_size as u32));
        spawn_chunk(&mut commands, tile_handle, tile_id, reference, tile_size);
        res_manager.chunk_manager.spawned_chunks.insert(tile_id);
    }
}

fn despawn_outofrange_chunks(
    mut commands: Commands,
    camera_query: Query<&Transform, With<Camera>>,
    chunks_query: Query<(Entity, &Transform, &TileMarker)>,
    mut res_manager: ResMut<TileMapResources>,
) {
    for camera_transform in camera_query.iter() {
        for (entity, chunk_transform, marker) in chunks_query.iter() {
            let chunk_pos = chunk_transform.translation.xy();
            let distance = camera_transform.translation.xy().distance(chunk_pos);
            if distance > res_manager.zoom_manager.tile_size * 10. {
                res_manager.chunk_manager.spawned_chunks.remove(&marker.0);
                commands.entity(entity).despawn_recursive();
            }
        }
    }
}

fn despawn_all_chunks(mut commands: Commands, chunks_query: Query<(Entity, &TileMarker)>) {
    for (entity, _) in chunks_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_round_trip_through_resources() {
        let resources = TileMapResources::default();
        let there = Coord::new(36.17, -120.45);
        let world = resources.coord_to_point(there);
        let back = resources.point_to_coord(world);
        assert!((back.lat - there.lat).abs() < 0.01);
        assert!((back.long - there.long).abs() < 0.01);
    }

    #[test]
    fn starting_view_is_centered_on_the_map_origin() {
        let resources = TileMapResources::default();
        assert_eq!(resources.zoom_manager.zoom_level, STARTING_ZOOM);
        let origin = resources.coord_to_point(resources.location_manager.location);
        assert!(origin.length() < 1e-6);
    }

    #[test]
    fn zoom_bounds_bracket_the_starting_level() {
        assert!((MIN_ZOOM_LEVEL..=MAX_ZOOM_LEVEL).contains(&STARTING_ZOOM));
    }
}
