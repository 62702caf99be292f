use bevy::{prelude::*, window::PrimaryWindow};
use rstar::AABB;

use crate::EguiBlockInputState;
use crate::camera::camera_middle_to_lat_long;
use crate::quakes::{SelectedQuake, magnitude::marker_style};
use crate::tiles::TileMapResources;
use crate::types::{QuakeFeature, QuakeSet, meters_per_pixel};

pub struct InteractionSystemPlugin;

impl Plugin for InteractionSystemPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, handle_mouse);
    }
}

/// Release this close to the press position still counts as a click.
const CLICK_SLOP: f32 = 4.0;

/// Wider than the largest marker the styling can produce, in pixels.
const PICK_ENVELOPE_PX: f64 = 60.0;

#[derive(Default)]
pub struct DragState {
    press_position: Option<Vec2>,
}

fn handle_mouse(
    buttons: Res<ButtonInput<MouseButton>>,
    q_windows: Query<&Window, With<PrimaryWindow>>,
    camera: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    mut res_manager: ResMut<TileMapResources>,
    quake_set: Res<QuakeSet>,
    mut selected: ResMut<SelectedQuake>,
    state: Res<EguiBlockInputState>,
    mut drag: Local<DragState>,
) {
    let Ok((camera, camera_transform)) = camera.get_single() else {
        return;
    };
    let Ok(window) = q_windows.get_single() else {
        return;
    };
    if state.block_input {
        return;
    }

    if buttons.just_pressed(MouseButton::Left) {
        drag.press_position = window.cursor_position();
    }
    if buttons.pressed(MouseButton::Left) {
        // Keep tiles streaming in while the map is dragged.
        res_manager.chunk_manager.update = true;
    }

    if buttons.just_released(MouseButton::Left) {
        let movement = camera_middle_to_lat_long(camera_transform, &res_manager);
        if movement != res_manager.location_manager.location {
            res_manager.location_manager.location = movement;
            res_manager.chunk_manager.update = true;
        }

        if let (Some(press), Some(position)) = (drag.press_position.take(), window.cursor_position())
        {
            if press.distance(position) < CLICK_SLOP
                && res_manager.chunk_manager.layers.show_quakes
            {
                if let Ok(world_pos) = camera.viewport_to_world_2d(camera_transform, position) {
                    selected.0 = pick_quake(world_pos, &res_manager, &quake_set);
                }
            }
        }
    }
}

/// The event whose marker covers the position, preferring the closest
/// epicenter when markers overlap.
fn pick_quake(
    world_pos: Vec2,
    res_manager: &TileMapResources,
    quake_set: &QuakeSet,
) -> Option<QuakeFeature> {
    let cursor = res_manager.point_to_coord(world_pos);
    let (x, y) = cursor.to_mercator();
    let meters = PICK_ENVELOPE_PX
        * meters_per_pixel(
            res_manager.zoom_manager.zoom_level,
            res_manager.zoom_manager.tile_size as f64,
        );
    let probe = AABB::from_corners([x - meters, y - meters], [x + meters, y + meters]);

    let mut best: Option<(f32, &QuakeFeature)> = None;
    for quake in quake_set.features.locate_in_envelope_intersecting(&probe) {
        let center = res_manager.coord_to_point(quake.epicenter);
        let distance = center.distance(world_pos);
        if distance <= marker_style(quake.mag).radius {
            match best {
                Some((closest, _)) if closest <= distance => {}
                _ => best = Some((distance, quake)),
            }
        }
    }
    best.map(|(_, quake)| quake.clone())
}
