use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Colour of the baseline bar and badge.
pub const BASELINE_COLOR: Color32 = Color32::from_rgb(54, 162, 235);

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
/// Hues sweep magenta → red → yellow → green, leaving blue to the baseline.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (300.0 + (i as f32 / n as f32) * 200.0) % 360.0;
            let hsl = Hsl::new(hue, 0.55, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: location identifier → Color32
// ---------------------------------------------------------------------------

/// Maps the locations of a comparison to bar colours, baseline highlighted.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map for `ids`; `baseline` gets [`BASELINE_COLOR`].
    pub fn new<'a>(ids: impl IntoIterator<Item = &'a str>, baseline: &str) -> Self {
        let others: Vec<&str> = ids.into_iter().filter(|id| *id != baseline).collect();
        let palette = generate_palette(others.len());

        let mut mapping: BTreeMap<String, Color32> = others
            .into_iter()
            .zip(palette)
            .map(|(id, c)| (id.to_string(), c))
            .collect();
        mapping.insert(baseline.to_string(), BASELINE_COLOR);

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a location identifier.
    pub fn color_for(&self, id: &str) -> Color32 {
        self.mapping.get(id).copied().unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_sizes_and_distinct() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(5);
        assert_eq!(colors.len(), 5);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_baseline_is_highlighted() {
        let map = ColorMap::new(["CA", "TX", "NY"], "TX");
        assert_eq!(map.color_for("TX"), BASELINE_COLOR);
        assert_ne!(map.color_for("CA"), BASELINE_COLOR);
        assert_ne!(map.color_for("CA"), map.color_for("NY"));
        assert_eq!(map.color_for("ZZ"), Color32::GRAY);
    }
}
