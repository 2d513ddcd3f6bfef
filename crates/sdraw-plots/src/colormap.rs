//! Colormaps for binned plots

use plotters::style::colors::colormaps::{ColorMap as _, ViridisRGB};
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

/// Colormap used to shade bins by count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMap {
    /// Blue through cyan, yellow and red
    #[default]
    Jet,
    /// Perceptually uniform purple to yellow
    Viridis,
}

/// Piecewise-linear channel: `(position, value)` anchors over `[0, 1]`
type Segments = &'static [(f64, f64)];

const JET_RED: Segments = &[(0.0, 0.0), (0.35, 0.0), (0.66, 1.0), (0.89, 1.0), (1.0, 0.5)];
const JET_GREEN: Segments = &[
    (0.0, 0.0),
    (0.125, 0.0),
    (0.375, 1.0),
    (0.64, 1.0),
    (0.91, 0.0),
    (1.0, 0.0),
];
const JET_BLUE: Segments = &[(0.0, 0.5), (0.11, 1.0), (0.34, 1.0), (0.65, 0.0), (1.0, 0.0)];

fn channel(segments: Segments, t: f64) -> u8 {
    let value = segments
        .windows(2)
        .find(|w| t <= w[1].0)
        .map(|w| {
            let (x0, y0) = w[0];
            let (x1, y1) = w[1];
            y0 + (y1 - y0) * (t - x0) / (x1 - x0)
        })
        .unwrap_or(segments[segments.len() - 1].1);
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

impl ColorMap {
    /// Color at position `t`, clamped into `[0, 1]`
    pub fn color_at(self, t: f64) -> RGBColor {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Jet => RGBColor(channel(JET_RED, t), channel(JET_GREEN, t), channel(JET_BLUE, t)),
            Self::Viridis => ViridisRGB.get_color(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jet_endpoints() {
        assert_eq!(ColorMap::Jet.color_at(0.0), RGBColor(0, 0, 128));
        assert_eq!(ColorMap::Jet.color_at(1.0), RGBColor(128, 0, 0));
        // green plateau in the middle
        assert_eq!(ColorMap::Jet.color_at(0.5).1, 255);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(ColorMap::Jet.color_at(-3.0), ColorMap::Jet.color_at(0.0));
        assert_eq!(ColorMap::Jet.color_at(7.0), ColorMap::Jet.color_at(1.0));
        assert_eq!(ColorMap::Viridis.color_at(f64::NAN), ColorMap::Viridis.color_at(0.0));
    }

    #[test]
    fn test_viridis_differs_from_jet() {
        assert_ne!(ColorMap::Viridis.color_at(0.2), ColorMap::Jet.color_at(0.2));
    }
}
