use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{FromColor, Hsl, Srgb};

use crate::data::model::{CellValue, UNSUCCESSFUL_STATUS};

/// Fixed colour for failing students, in the table and the pie.
pub const UNSUCCESSFUL_COLOR: Color32 = Color32::from_rgb(214, 69, 65);

const GOLDEN_ANGLE: f32 = 137.508;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// `n` distinct colours. Hues advance by the golden angle, so the first
/// colours stay the same when a column is added to a chart.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (210.0 + i as f32 * GOLDEN_ANGLE) % 360.0;
            let rgb: Srgb<u8> = Srgb::<f32>::from_color(Hsl::new(hue, 0.6, 0.5)).into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of a category field to distinct colours.
/// `"Unsuccessful"` always gets `UNSUCCESSFUL_COLOR`.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<CellValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from a field's distinct values.
    pub fn new(values: &BTreeSet<CellValue>) -> Self {
        let unsuccessful = CellValue::String(UNSUCCESSFUL_STATUS.to_string());
        let others: Vec<&CellValue> = values.iter().filter(|v| **v != unsuccessful).collect();
        let mut mapping: BTreeMap<CellValue, Color32> = others
            .iter()
            .map(|v| (*v).clone())
            .zip(generate_palette(others.len()))
            .collect();
        if values.contains(&unsuccessful) {
            mapping.insert(unsuccessful, UNSUCCESSFUL_COLOR);
        }
        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &CellValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}
