use std::collections::BTreeMap;

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
// Categorical colours: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the labels of one category column (professions, genders) to
/// distinct colours.
#[derive(Debug, Clone)]
pub struct CategoryColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl CategoryColors {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let palette = generate_palette(labels.len());
        let mapping = labels.into_iter().zip(palette).collect();

        CategoryColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Sequential scale for numeric values
// ---------------------------------------------------------------------------

/// Linear colour ramp from dark blue (low) to yellow (high).
#[derive(Debug, Clone, Copy)]
pub struct SequentialScale {
    min: f64,
    max: f64,
}

impl SequentialScale {
    const LOW: (f32, f32, f32) = (0.05, 0.03, 0.53);
    const HIGH: (f32, f32, f32) = (0.94, 0.98, 0.13);

    pub fn new(min: f64, max: f64) -> Self {
        SequentialScale { min, max }
    }

    /// Scale spanning the finite values of `values`; `[0, 1]` if there are none.
    pub fn spanning(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if min > max {
            SequentialScale::new(0.0, 1.0)
        } else {
            SequentialScale::new(min, max)
        }
    }

    /// Position of `value` on the scale, in `[0, 1]`.
    pub fn fraction(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON || !value.is_finite() {
            return 0.0;
        }
        ((value - self.min) / range).clamp(0.0, 1.0)
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        Self::color_at(self.fraction(value))
    }

    /// Colour at `fraction` of the ramp, clamped to `[0, 1]`.
    pub fn color_at(fraction: f64) -> Color32 {
        let (lr, lg, lb) = Self::LOW;
        let (hr, hg, hb) = Self::HIGH;
        let low: LinSrgb = Srgb::new(lr, lg, lb).into_linear();
        let high: LinSrgb = Srgb::new(hr, hg, hb).into_linear();
        let mixed = low.mix(high, fraction.clamp(0.0, 1.0) as f32);
        to_color32(Srgb::from_linear(mixed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        let palette = generate_palette(9);
        assert_eq!(palette.len(), 9);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_category_falls_back_to_gray() {
        let colors = CategoryColors::new(["Female", "Male"]);
        assert_ne!(colors.color_for("Female"), colors.color_for("Male"));
        assert_eq!(colors.color_for("Other"), Color32::GRAY);
    }

    #[test]
    fn sequential_scale_clamps_and_orders() {
        let scale = SequentialScale::spanning([10.0, 20.0, 30.0]);
        assert_eq!(scale.fraction(10.0), 0.0);
        assert_eq!(scale.fraction(30.0), 1.0);
        assert_eq!(scale.fraction(100.0), 1.0);
        assert_eq!(scale.fraction(20.0), 0.5);
        assert_ne!(scale.color_for(10.0), scale.color_for(30.0));

        let flat = SequentialScale::spanning(std::iter::empty());
        assert_eq!(flat.fraction(0.5), 0.5);
    }
}
