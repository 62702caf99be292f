use bevy::prelude::*;
use crossbeam_channel::{Receiver, Sender};

use super::UsgsClient;
use super::loader::parse_quake_feed;
use crate::types::{QuakeFeature, QuakeSet};

#[derive(Resource, Deref)]
pub struct FeedSender(pub Sender<Vec<QuakeFeature>>);

#[derive(Resource, Deref)]
pub struct FeedReceiver(pub Receiver<Vec<QuakeFeature>>);

/// Fetches the feed once on a background thread. Failures are logged and
/// delivered as an empty batch so the map still comes up.
pub fn start_feed_fetch(sender: Res<FeedSender>) {
    let tx = sender.0.clone();
    std::thread::spawn(move || {
        let client = UsgsClient::default();
        let batch = match client.fetch_feed() {
            Ok(body) => match parse_quake_feed(&body) {
                Ok(feed) => {
                    if feed.skipped > 0 {
                        info!(
                            "skipped {} feed entries without a point or magnitude",
                            feed.skipped
                        );
                    }
                    match feed.metadata.and_then(|metadata| metadata.title) {
                        Some(title) => info!("loaded {} events from {}", feed.features.len(), title),
                        None => info!("loaded {} events", feed.features.len()),
                    }
                    feed.features
                }
                Err(e) => {
                    warn!("could not parse the feed: {}", e);
                    Vec::new()
                }
            },
            Err(e) => {
                warn!("could not fetch the feed: {}", e);
                Vec::new()
            }
        };
        if let Err(e) = tx.send(batch) {
            eprintln!("Failed to send feed data: {:?}", e);
        }
    });
}

pub fn read_feed_receiver(
    feed_receiver: Option<Res<FeedReceiver>>,
    mut quake_set: ResMut<QuakeSet>,
) {
    if let Some(feed_receiver) = feed_receiver {
        if let Ok(batch) = feed_receiver.try_recv() {
            quake_set.replace(batch);
        }
    }
}
