use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Series colours
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
///
/// Lightness is lowered in light mode so thin lines stay readable on a white
/// background.
pub fn generate_palette(n: usize, dark_mode: bool) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    let lightness = if dark_mode { 0.62 } else { 0.45 };
    (0..n)
        .map(|i| {
            let hue = (220.0 + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.75, lightness);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Colours for `n` chart series, indexed by series position.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    colors: Vec<Color32>,
}

impl SeriesColors {
    pub fn new(n: usize, dark_mode: bool) -> Self {
        Self {
            colors: generate_palette(n, dark_mode),
        }
    }

    pub fn color_for(&self, index: usize) -> Color32 {
        if self.colors.is_empty() {
            return Color32::GRAY;
        }
        self.colors[index % self.colors.len()]
    }
}
