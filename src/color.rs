use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Per-channel line colours
// ---------------------------------------------------------------------------

/// Golden-angle hue step; consecutive columns land far apart on the wheel.
const HUE_STEP: f32 = 137.507_77;

/// Colour for a table column. Depends only on the column index so a channel
/// keeps its colour while other channels are ticked or unticked.
pub fn channel_color(column: usize) -> Color32 {
    let hue = (column as f32 * HUE_STEP) % 360.0;
    // Alternate lightness so neighbouring hues stay distinguishable.
    let lightness = if column % 2 == 0 { 0.55 } else { 0.45 };
    let rgb: Srgb = Hsl::new(hue, 0.75, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_are_stable_and_distinct() {
        assert_eq!(channel_color(3), channel_color(3));
        let colors: Vec<Color32> = (1..12).map(channel_color).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
