//! Layer control: pick the base layer, toggle the earthquake overlay.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::TileMapResources;

pub struct TilesUiPlugin;

impl Plugin for TilesUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, layer_control_ui);
    }
}

fn layer_control_ui(mut res_manager: ResMut<TileMapResources>, mut contexts: EguiContexts) {
    let ctx = contexts.ctx_mut();

    egui::Window::new("Layers")
        .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
        .title_bar(false)
        .resizable(false)
        .movable(false)
        .show(ctx, |ui| {
            let mut switch_to = None;
            for layer in &res_manager.chunk_manager.layers.base_layers {
                let mut checked = layer.enabled;
                if ui.checkbox(&mut checked, layer.name).clicked() && !layer.enabled {
                    switch_to = Some(layer.name);
                }
            }
            if let Some(name) = switch_to {
                res_manager.chunk_manager.layers.enable_only(name);
            }

            ui.separator();
            ui.checkbox(
                &mut res_manager.chunk_manager.layers.show_quakes,
                "Earthquakes",
            );

            if let Some(base) = res_manager.chunk_manager.layers.enabled_base() {
                ui.separator();
                ui.small(base.attribution);
            }
        });
}
