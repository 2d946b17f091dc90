use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues,
/// starting at `hue_offset` degrees.
pub fn generate_palette(n: usize, hue_offset: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (hue_offset + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
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
// Channel colours
// ---------------------------------------------------------------------------

/// One colour per channel of a signal group.
#[derive(Debug, Clone, Default)]
pub struct ChannelPalette {
    colors: Vec<Color32>,
}

impl ChannelPalette {
    pub fn new(n_channels: usize, hue_offset: f32) -> Self {
        Self {
            colors: generate_palette(n_channels, hue_offset),
        }
    }

    /// Colour of channel `index`; out-of-range channels are grey.
    pub fn color_for(&self, index: usize) -> Color32 {
        self.colors.get(index).copied().unwrap_or(Color32::GRAY)
    }

    /// Legend entries (`Channel N` → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.colors
            .iter()
            .enumerate()
            .map(|(i, c)| (channel_name(i), *c))
            .collect()
    }
}

/// Display name of a zero-based channel index.
pub fn channel_name(index: usize) -> String {
    format!("Channel {}", index + 1)
}
