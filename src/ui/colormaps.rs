//! Color mapping for image views.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Palette used to map greyscale image values to terminal colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorPalette {
    /// Perceptually uniform blue-green-yellow.
    #[default]
    Viridis,
    /// Purple-orange-yellow.
    Plasma,
    /// Blue to red through the hue wheel.
    Rainbow,
    /// Diverging blue-white-red.
    BlueRed,
}

impl ColorPalette {
    /// Get the next palette in the cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Viridis => Self::Plasma,
            Self::Plasma => Self::Rainbow,
            Self::Rainbow => Self::BlueRed,
            Self::BlueRed => Self::Viridis,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Viridis => "Viridis",
            Self::Plasma => "Plasma",
            Self::Rainbow => "Rainbow",
            Self::BlueRed => "Blue-Red",
        }
    }

    /// Map a normalized value (0.0 to 1.0) to an RGB color.
    pub fn color(self, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        match self {
            Self::Viridis => two_segment(t, (68.0, 1.0, 84.0), (33.0, 104.0, 109.0), (253.0, 231.0, 37.0)),
            Self::Plasma => two_segment(t, (13.0, 8.0, 135.0), (180.0, 54.0, 121.0), (240.0, 175.0, 12.0)),
            Self::Rainbow => rainbow_color(t),
            Self::BlueRed => two_segment(t, (0.0, 0.0, 255.0), (255.0, 255.0, 255.0), (255.0, 0.0, 0.0)),
        }
    }
}

/// Scale `v` between `lo` and `hi` into 0..=1. A flat range maps to 0.
pub fn normalize(v: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        (v - lo) / (hi - lo)
    } else {
        0.0
    }
}

/// Piecewise linear interpolation through three anchor colours.
fn two_segment(t: f64, low: (f64, f64, f64), mid: (f64, f64, f64), high: (f64, f64, f64)) -> Color {
    let (a, b, s) = if t < 0.5 {
        (low, mid, t * 2.0)
    } else {
        (mid, high, (t - 0.5) * 2.0)
    };
    let lerp = |x: f64, y: f64| (x + s * (y - x)) as u8;
    Color::Rgb(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// Rainbow colormap, hue from 240 (blue) down to 0 (red).
fn rainbow_color(t: f64) -> Color {
    let h = (1.0 - t) * 240.0;
    let x = 1.0 - ((h / 60.0) % 2.0 - 1.0).abs();

    let (r, g, b) = if h < 60.0 {
        (1.0, x, 0.0)
    } else if h < 120.0 {
        (x, 1.0, 0.0)
    } else if h < 180.0 {
        (0.0, 1.0, x)
    } else {
        (0.0, x, 1.0)
    };

    Color::Rgb((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_cycle_back_to_start() {
        let mut p = ColorPalette::default();
        for _ in 0..4 {
            p = p.next();
        }
        assert_eq!(p, ColorPalette::Viridis);
    }

    #[test]
    fn endpoints_hit_anchor_colours() {
        assert_eq!(ColorPalette::BlueRed.color(0.0), Color::Rgb(0, 0, 255));
        assert_eq!(ColorPalette::BlueRed.color(0.5), Color::Rgb(255, 255, 255));
        assert_eq!(ColorPalette::Rainbow.color(1.0), Color::Rgb(255, 0, 0));
        assert_eq!(ColorPalette::Viridis.color(f64::NAN), ColorPalette::Viridis.color(0.0));
    }

    #[test]
    fn flat_range_normalizes_to_zero() {
        assert_eq!(normalize(3.0, 3.0, 3.0), 0.0);
        assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
    }
}
