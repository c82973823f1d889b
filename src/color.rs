use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Diverging ramp for the correlation heatmap
// ---------------------------------------------------------------------------

/// Blue → light grey → red for values in `[-1, 1]`. `NaN` maps to dark grey.
pub fn coolwarm(value: f64) -> Color32 {
    if value.is_nan() {
        return Color32::DARK_GRAY;
    }
    let cool: LinSrgb = Srgb::new(0.23_f32, 0.30, 0.75).into_linear();
    let mid: LinSrgb = Srgb::new(0.87_f32, 0.87, 0.87).into_linear();
    let warm: LinSrgb = Srgb::new(0.71_f32, 0.02, 0.15).into_linear();

    let t = value.clamp(-1.0, 1.0) as f32;
    let mixed = if t < 0.0 {
        mid.mix(cool, -t)
    } else {
        mid.mix(warm, t)
    };
    to_color32(Srgb::from_linear(mixed))
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the unique values of one categorical column to distinct colours.
///
/// Built once from the full dataset so a value keeps its colour while
/// filters change.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(unique_values: &BTreeSet<String>) -> Self {
        let palette = generate_palette(unique_values.len());
        let mapping = unique_values
            .iter()
            .cloned()
            .zip(palette)
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let colors = generate_palette(5);
        assert_eq!(colors.len(), 5);
        let unique: BTreeSet<[u8; 4]> = colors.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 5);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_value_gets_default() {
        let values: BTreeSet<String> = ["No", "Yes"].iter().map(|s| s.to_string()).collect();
        let map = ColorMap::new(&values);
        assert_ne!(map.color_for("No"), map.color_for("Yes"));
        assert_eq!(map.color_for("Maybe"), Color32::GRAY);
    }

    #[test]
    fn coolwarm_ends_differ() {
        let cold = coolwarm(-1.0);
        let hot = coolwarm(1.0);
        assert!(cold.b() > cold.r());
        assert!(hot.r() > hot.b());
        assert_eq!(coolwarm(f64::NAN), Color32::DARK_GRAY);
        assert_eq!(coolwarm(5.0), hot);
    }
}
