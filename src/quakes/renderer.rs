use bevy::prelude::*;

use super::magnitude::marker_style;
use crate::tiles::{TileMapResources, ZoomChangedEvent};
use crate::types::QuakeSet;

#[derive(Component)]
pub struct QuakeMarker;

const MARKER_ELEVATION: f32 = 500.0;

/// Rebuilds every epicenter marker when new feed data lands or the zoom
/// level moves the world-space positions.
pub fn respawn_quake_markers(
    mut commands: Commands,
    markers_query: Query<Entity, With<QuakeMarker>>,
    mut quake_set: ResMut<QuakeSet>,
    res_manager: Res<TileMapResources>,
    mut zoom_change: EventReader<ZoomChangedEvent>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    if !quake_set.respawn && zoom_change.is_empty() {
        return;
    }
    quake_set.respawn = false;
    zoom_change.clear();

    for entity in markers_query.iter() {
        commands.entity(entity).despawn_recursive();
    }

    let visibility = if res_manager.chunk_manager.layers.show_quakes {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };

    for quake in quake_set.features.iter() {
        let style = marker_style(quake.mag);
        let center = res_manager.coord_to_point(quake.epicenter);

        let (r, g, b) = style.fill;
        let fill = Color::srgba_u8(r, g, b, (style.fill_alpha * 255.0) as u8);
        let (r, g, b) = style.outline;
        let outline = Color::srgb_u8(r, g, b);
        let inner = (style.radius - style.outline_weight / 2.0).max(0.0);
        let outer = style.radius + style.outline_weight / 2.0;

        commands
            .spawn((
                Mesh2d(meshes.add(Circle::new(style.radius))),
                MeshMaterial2d(materials.add(fill)),
                Transform::from_translation(center.extend(MARKER_ELEVATION)),
                visibility,
                QuakeMarker,
                quake.clone(),
            ))
            .with_child((
                Mesh2d(meshes.add(Annulus::new(inner, outer))),
                MeshMaterial2d(materials.add(outline)),
                Transform::from_xyz(0.0, 0.0, 0.5),
            ));
    }
}

/// Applies the overlay toggle to markers that are already spawned.
pub fn sync_marker_visibility(
    res_manager: Res<TileMapResources>,
    mut markers: Query<&mut Visibility, With<QuakeMarker>>,
    mut shown: Local<Option<bool>>,
) {
    let show = res_manager.chunk_manager.layers.show_quakes;
    if *shown == Some(show) {
        return;
    }
    *shown = Some(show);
    for mut visibility in &mut markers {
        *visibility = if show {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}
