use bevy::{
    input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel},
    prelude::*,
};

use crate::EguiBlockInputState;
use crate::tiles::TileMapResources;
use crate::types::Coord;

pub struct CameraSystemPlugin;

impl Plugin for CameraSystemPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera)
            .add_systems(Update, (pan_camera, zoom_camera));
    }
}

fn setup_camera(mut commands: Commands, res_manager: Option<Res<TileMapResources>>) {
    if let Some(res_manager) = res_manager {
        let starting = res_manager.coord_to_point(res_manager.location_manager.location);

        commands.spawn((
            Camera2d,
            Transform {
                translation: Vec3::new(starting.x, starting.y, 1.0),
                ..Default::default()
            },
        ));
    } else {
        error!("TileMapResources not found. Add the tile map plugin first.");
    }
}

fn pan_camera(
    buttons: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<MouseMotion>,
    mut camera_query: Query<(&mut Transform, &OrthographicProjection), With<Camera2d>>,
    state: Res<EguiBlockInputState>,
) {
    if state.block_input || !buttons.pressed(MouseButton::Left) {
        motion.clear();
        return;
    }
    let Ok((mut transform, projection)) = camera_query.get_single_mut() else {
        return;
    };
    for ev in motion.read() {
        transform.translation.x -= ev.delta.x * projection.scale;
        transform.translation.y += ev.delta.y * projection.scale;
    }
}

fn zoom_camera(
    mut evr_scroll: EventReader<MouseWheel>,
    mut projection_query: Query<&mut OrthographicProjection, With<Camera2d>>,
    state: Res<EguiBlockInputState>,
) {
    if state.block_input {
        evr_scroll.clear();
        return;
    }
    let Ok(mut projection) = projection_query.get_single_mut() else {
        return;
    };
    for ev in evr_scroll.read() {
        let step = match ev.unit {
            MouseScrollUnit::Line => ev.y * 0.1,
            MouseScrollUnit::Pixel => ev.y * 0.002,
        };
        projection.scale = (projection.scale * (1.0 - step)).clamp(0.25, 4.0);
    }
}

pub fn camera_rect(window: &Window, projection: &OrthographicProjection) -> (f32, f32) {
    (
        window.width() * projection.scale,
        window.height() * projection.scale,
    )
}

/// Lat/long currently under the middle of the camera.
pub fn camera_middle_to_lat_long(
    camera_transform: &GlobalTransform,
    res_manager: &TileMapResources,
) -> Coord {
    res_manager.point_to_coord(camera_transform.translation().xy())
}
