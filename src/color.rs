use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::charts::Rgb;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct pastel colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.55, 0.72);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Line colours for series without a fixed colour.
pub const QUALITATIVE: [Rgb; 4] = [
    [0x63, 0x6e, 0xfa],
    [0xef, 0x55, 0x3b],
    [0x00, 0xcc, 0x96],
    [0xab, 0x63, 0xfa],
];

pub fn to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

/// Colour of the n-th series of a chart.
pub fn series_color(n: usize, fixed: Option<Rgb>) -> Color32 {
    to_color32(fixed.unwrap_or(QUALITATIVE[n % QUALITATIVE.len()]))
}

// ---------------------------------------------------------------------------
// Continuous colour scales
// ---------------------------------------------------------------------------

const VIRIDIS: [u32; 10] = [
    0x440154, 0x482878, 0x3e4989, 0x31688e, 0x26828e, 0x1f9e89, 0x35b779, 0x6ece58, 0xb5de2b,
    0xfde725,
];

/// Blue for -1 through white to red for +1.
const RED_BLUE: [u32; 11] = [
    0x053061, 0x2166ac, 0x4393c3, 0x92c5de, 0xd1e5f0, 0xf7f7f7, 0xfddbc7, 0xf4a582, 0xd6604d,
    0xb2182b, 0x67001f,
];

/// Piecewise-linear colour scale over `[lo, hi]`, interpolated in linear RGB.
#[derive(Debug, Clone)]
pub struct ContinuousScale {
    stops: Vec<LinSrgb>,
    lo: f64,
    hi: f64,
}

fn hex_to_linear(hex: u32) -> LinSrgb {
    let srgb = Srgb::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8);
    srgb.into_format::<f32>().into_linear::<f32>()
}

impl ContinuousScale {
    fn from_hex(stops: &[u32], lo: f64, hi: f64) -> Self {
        Self {
            stops: stops.iter().map(|&h| hex_to_linear(h)).collect(),
            lo,
            hi,
        }
    }

    /// Sequential scale used by the choropleth.
    pub fn viridis(lo: f64, hi: f64) -> Self {
        Self::from_hex(&VIRIDIS, lo, hi)
    }

    /// Diverging scale used by the correlation matrix.
    pub fn red_blue(lo: f64, hi: f64) -> Self {
        Self::from_hex(&RED_BLUE, lo, hi)
    }

    /// Position of `value` in `[0, 1]`, clamped.
    pub fn position(&self, value: f64) -> f32 {
        let range = self.hi - self.lo;
        if range.abs() < f64::EPSILON {
            return 0.5;
        }
        ((value - self.lo) / range).clamp(0.0, 1.0) as f32
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        let segments = self.stops.len() - 1;
        let t = self.position(value) * segments as f32;
        let idx = (t.floor() as usize).min(segments - 1);
        let mixed = self.stops[idx].mix(self.stops[idx + 1], t - idx as f32);
        let rgb: Srgb<u8> = Srgb::from_linear(mixed);
        Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        assert_ne!(colors[0], colors[1]);
    }

    #[test]
    fn scale_hits_end_stops() {
        let scale = ContinuousScale::viridis(0.0, 10.0);
        assert_eq!(scale.color_for(0.0), Color32::from_rgb(0x44, 0x01, 0x54));
        assert_eq!(scale.color_for(10.0), Color32::from_rgb(0xfd, 0xe7, 0x25));
        assert_eq!(scale.color_for(99.0), scale.color_for(10.0));
    }

    #[test]
    fn diverging_scale_is_white_at_zero() {
        let scale = ContinuousScale::red_blue(-1.0, 1.0);
        assert_eq!(scale.color_for(0.0), Color32::from_rgb(0xf7, 0xf7, 0xf7));
        assert_eq!(scale.position(-2.0), 0.0);
    }

    #[test]
    fn degenerate_range_uses_midpoint() {
        let scale = ContinuousScale::viridis(3.0, 3.0);
        assert_eq!(scale.position(3.0), 0.5);
    }
}
