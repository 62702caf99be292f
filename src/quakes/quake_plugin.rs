use bevy::prelude::*;
use crossbeam_channel::bounded;

use super::renderer::{respawn_quake_markers, sync_marker_visibility};
use super::ui::{SelectedQuake, legend_window, popup_window};
use super::worker::{FeedReceiver, FeedSender, read_feed_receiver, start_feed_fetch};
use crate::types::QuakeSet;

pub struct QuakePlugin;

impl Plugin for QuakePlugin {
    fn build(&self, app: &mut App) {
        let (tx, rx) = bounded(1);
        app.insert_resource(QuakeSet::new())
            .insert_resource(FeedSender(tx))
            .insert_resource(FeedReceiver(rx))
            .init_resource::<SelectedQuake>()
            .add_systems(Startup, start_feed_fetch)
            .add_systems(FixedUpdate, read_feed_receiver)
            .add_systems(Update, (respawn_quake_markers, sync_marker_visibility))
            .add_systems(Update, (legend_window, popup_window));
    }
}
