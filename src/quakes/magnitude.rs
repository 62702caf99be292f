//! Magnitude bands and the marker styling derived from them.

/// Color bands for event magnitudes, strongest first. Band bounds are
/// half-open: the lower bound belongs to the band above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagnitudeBand {
    FivePlus,
    FourToFive,
    ThreeToFour,
    TwoToThree,
    OneToTwo,
    BelowOne,
}

impl MagnitudeBand {
    /// All bands, in legend order (strongest first).
    pub const ALL: [MagnitudeBand; 6] = [
        MagnitudeBand::FivePlus,
        MagnitudeBand::FourToFive,
        MagnitudeBand::ThreeToFour,
        MagnitudeBand::TwoToThree,
        MagnitudeBand::OneToTwo,
        MagnitudeBand::BelowOne,
    ];

    pub fn for_magnitude(mag: f64) -> Self {
        if mag >= 5.0 {
            MagnitudeBand::FivePlus
        } else if mag >= 4.0 {
            MagnitudeBand::FourToFive
        } else if mag >= 3.0 {
            MagnitudeBand::ThreeToFour
        } else if mag >= 2.0 {
            MagnitudeBand::TwoToThree
        } else if mag >= 1.0 {
            MagnitudeBand::OneToTwo
        } else {
            MagnitudeBand::BelowOne
        }
    }

    pub const fn rgb(&self) -> (u8, u8, u8) {
        match self {
            MagnitudeBand::FivePlus => (255, 99, 71),     // tomato
            MagnitudeBand::FourToFive => (255, 160, 122), // light salmon
            MagnitudeBand::ThreeToFour => (218, 165, 32), // goldenrod
            MagnitudeBand::TwoToThree => (255, 255, 0),   // yellow
            MagnitudeBand::OneToTwo => (173, 255, 47),    // green yellow
            MagnitudeBand::BelowOne => (127, 255, 0),     // chartreuse
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            MagnitudeBand::FivePlus => "5+",
            MagnitudeBand::FourToFive => "4-5",
            MagnitudeBand::ThreeToFour => "3-4",
            MagnitudeBand::TwoToThree => "2-3",
            MagnitudeBand::OneToTwo => "1-2",
            MagnitudeBand::BelowOne => "0-1",
        }
    }
}

/// How one epicenter marker is drawn. Radius is in screen pixels at
/// projection scale 1, colors are sRGB bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub radius: f32,
    pub fill: (u8, u8, u8),
    pub fill_alpha: f32,
    pub outline: (u8, u8, u8),
    pub outline_weight: f32,
}

pub fn marker_style(mag: f64) -> MarkerStyle {
    MarkerStyle {
        radius: (mag.abs() * 5.0) as f32,
        fill: MagnitudeBand::for_magnitude(mag).rgb(),
        fill_alpha: 0.5,
        outline: (255, 255, 255),
        outline_weight: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_bounds_belong_to_the_stronger_band() {
        assert_eq!(MagnitudeBand::for_magnitude(5.0), MagnitudeBand::FivePlus);
        assert_eq!(
            MagnitudeBand::for_magnitude(4.9999),
            MagnitudeBand::FourToFive
        );
        assert_eq!(MagnitudeBand::for_magnitude(4.0), MagnitudeBand::FourToFive);
        assert_eq!(
            MagnitudeBand::for_magnitude(3.0),
            MagnitudeBand::ThreeToFour
        );
        assert_eq!(MagnitudeBand::for_magnitude(2.0), MagnitudeBand::TwoToThree);
        assert_eq!(MagnitudeBand::for_magnitude(1.0), MagnitudeBand::OneToTwo);
        assert_eq!(MagnitudeBand::for_magnitude(0.9999), MagnitudeBand::BelowOne);
    }

    #[test]
    fn everything_below_one_shares_a_band() {
        assert_eq!(MagnitudeBand::for_magnitude(0.5), MagnitudeBand::BelowOne);
        assert_eq!(MagnitudeBand::for_magnitude(0.0), MagnitudeBand::BelowOne);
        assert_eq!(MagnitudeBand::for_magnitude(-1.2), MagnitudeBand::BelowOne);
        assert_eq!(MagnitudeBand::for_magnitude(-4.0), MagnitudeBand::BelowOne);
    }

    #[test]
    fn band_colors() {
        assert_eq!(MagnitudeBand::FivePlus.rgb(), (255, 99, 71));
        assert_eq!(MagnitudeBand::FourToFive.rgb(), (255, 160, 122));
        assert_eq!(MagnitudeBand::ThreeToFour.rgb(), (218, 165, 32));
        assert_eq!(MagnitudeBand::TwoToThree.rgb(), (255, 255, 0));
        assert_eq!(MagnitudeBand::OneToTwo.rgb(), (173, 255, 47));
        assert_eq!(MagnitudeBand::BelowOne.rgb(), (127, 255, 0));
    }

    #[test]
    fn legend_order_is_strongest_first() {
        let labels: Vec<_> = MagnitudeBand::ALL.iter().map(|b| b.label()).collect();
        assert_eq!(labels, ["5+", "4-5", "3-4", "2-3", "1-2", "0-1"]);
    }

    #[test]
    fn radius_scales_with_magnitude_size() {
        assert_eq!(marker_style(4.2).radius, 21.0);
        assert_eq!(marker_style(0.3).radius, 1.5);
    }

    #[test]
    fn negative_magnitude_keeps_a_positive_radius() {
        let style = marker_style(-4.0);
        assert_eq!(style.radius, 20.0);
        assert_eq!(style.fill, MagnitudeBand::BelowOne.rgb());
    }

    #[test]
    fn fill_and_outline_are_fixed() {
        let style = marker_style(2.7);
        assert_eq!(style.fill_alpha, 0.5);
        assert_eq!(style.outline, (255, 255, 255));
        assert_eq!(style.outline_weight, 1.0);
    }

    #[test]
    fn styling_is_deterministic() {
        assert_eq!(marker_style(4.2), marker_style(4.2));
        let style = marker_style(4.2);
        assert_eq!(style.fill, MagnitudeBand::FourToFive.rgb());
    }
}
