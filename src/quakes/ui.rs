use bevy::prelude::*;
use bevy_egui::{
    EguiContexts,
    egui::{self, Color32, RichText},
};
use chrono::{DateTime, Local, TimeZone};

use super::magnitude::MagnitudeBand;
use crate::tiles::TileMapResources;
use crate::types::QuakeFeature;

/// The event whose popup is open, if any.
#[derive(Resource, Default, Clone)]
pub struct SelectedQuake(pub Option<QuakeFeature>);

pub fn legend_window(res_manager: Res<TileMapResources>, mut contexts: EguiContexts) {
    if !res_manager.chunk_manager.layers.show_quakes {
        return;
    }
    let ctx = contexts.ctx_mut();

    egui::Window::new("Legend")
        .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -10.0])
        .title_bar(false)
        .resizable(false)
        .movable(false)
        .show(ctx, |ui| {
            for band in MagnitudeBand::ALL {
                let (r, g, b) = band.rgb();
                ui.horizontal(|ui| {
                    egui::color_picker::show_color(
                        ui,
                        Color32::from_rgb(r, g, b),
                        egui::vec2(16.0, 12.0),
                    );
                    ui.label(band.label());
                });
            }
        });
}

pub fn popup_window(
    mut selected: ResMut<SelectedQuake>,
    res_manager: Res<TileMapResources>,
    mut contexts: EguiContexts,
) {
    if !res_manager.chunk_manager.layers.show_quakes {
        selected.0 = None;
        return;
    }
    let Some(quake) = selected.0.clone() else {
        return;
    };
    let ctx = contexts.ctx_mut();

    let mut close = false;
    egui::Window::new("Earthquake")
        .anchor(egui::Align2::CENTER_TOP, [0.0, 24.0])
        .title_bar(false)
        .resizable(false)
        .movable(false)
        .show(ctx, |ui| {
            ui.label(RichText::new(&quake.place).strong());
            ui.separator();
            ui.label(format_event_time(quake.time_ms));
            ui.label(format!("{} Magnitude", quake.mag));
            if ui.small_button("Close").clicked() {
                close = true;
            }
        });
    if close {
        selected.0 = None;
    }
}

pub fn format_event_time(time_ms: i64) -> String {
    format_event_time_in(time_ms, &Local)
}

fn format_event_time_in<Tz: TimeZone>(time_ms: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::from_timestamp_millis(time_ms) {
        Some(utc) => utc
            .with_timezone(tz)
            .format("%a %b %e %Y %H:%M:%S")
            .to_string(),
        None => String::from("Unknown time"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn event_time_reads_like_a_date_header() {
        assert_eq!(
            format_event_time_in(1755800000000, &Utc),
            "Thu Aug 21 2025 18:13:20"
        );
    }

    #[test]
    fn epoch_and_day_padding() {
        assert_eq!(format_event_time_in(0, &Utc), "Thu Jan  1 1970 00:00:00");
    }

    #[test]
    fn out_of_range_time_is_handled() {
        assert_eq!(format_event_time_in(i64::MAX, &Utc), "Unknown time");
    }

    #[test]
    fn magnitude_line_drops_trailing_zero_like_the_feed() {
        assert_eq!(format!("{} Magnitude", 4.0_f64), "4 Magnitude");
        assert_eq!(format!("{} Magnitude", 4.2_f64), "4.2 Magnitude");
    }

    #[test]
    fn popup_content_for_a_typical_event() {
        use crate::quakes::magnitude::{MagnitudeBand, marker_style};
        use crate::types::Coord;

        let quake = QuakeFeature {
            id: "us7000test".to_string(),
            place: "10km NE of Town".to_string(),
            time_ms: 1700000000000,
            mag: 4.2,
            epicenter: Coord::new(36.2, -120.5),
        };

        assert_eq!(quake.place, "10km NE of Town");
        assert_eq!(
            format_event_time_in(quake.time_ms, &Utc),
            "Tue Nov 14 2023 22:13:20"
        );
        assert_eq!(format!("{} Magnitude", quake.mag), "4.2 Magnitude");

        let style = marker_style(quake.mag);
        assert_eq!(style.radius, 21.0);
        assert_eq!(style.fill, MagnitudeBand::FourToFive.rgb());
    }
}
