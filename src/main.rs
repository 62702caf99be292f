use bevy::{prelude::*, winit::{UpdateMode, WinitSettings}};

use bevy_egui::EguiPlugin;
use camera::CameraSystemPlugin;
use debug::DebugPlugin;
use interaction::InteractionSystemPlugin;
use quakes::QuakePlugin;
use tiles::TileMapPlugin;
use types::Coord;

pub mod camera;
pub mod debug;
pub mod interaction;
pub mod quakes;
pub mod tiles;
pub mod types;

pub const STARTING_LOCATION: Coord = Coord::new(39.0, -105.0);
pub const STARTING_ZOOM: u32 = 2;
// This can be changed, it changes the size of each tile too.
pub const TILE_QUALITY: i32 = 256;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Earthquake Map".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .add_plugins(DebugPlugin)
        .add_plugins(EguiPlugin)
        .add_plugins(TileMapPlugin)
        .insert_resource(EguiBlockInputState::default())
        .add_plugins((CameraSystemPlugin, InteractionSystemPlugin))
        .insert_resource(WinitSettings {
            unfocused_mode: UpdateMode::Reactive {
                wait: std::time::Duration::from_secs(1),
                react_to_device_events: true,
                react_to_user_events: true,
                react_to_window_events: true,
            },
            ..Default::default()
        })
        .insert_resource(ClearColor(Color::from(Srgba {
            red: 0.9,
            green: 0.9,
            blue: 0.8,
            alpha: 1.0,
        })))
        .add_plugins(QuakePlugin)
        .add_systems(Update, absorb_egui_inputs)
        .run();
}

#[derive(Resource, Default)]
pub struct EguiBlockInputState {
    pub block_input: bool,
}
fn absorb_egui_inputs(
    mut contexts: bevy_egui::EguiContexts,
    mut state: ResMut<EguiBlockInputState>,
) {
    let ctx = contexts.ctx_mut();
    state.block_input = ctx.wants_pointer_input() || ctx.is_pointer_over_area();
}
