use eframe::egui::Color32;
use palette::{FromColor, Hsl, Srgb};

const SATURATION: f32 = 0.75;
const LIGHTNESS: f32 = 0.55;

/// Hue (degrees) of the single-series accent colour.
const ACCENT_HUE: f32 = 210.0;

fn hsl_color(hue: f32) -> Color32 {
    let hsl: Hsl = Hsl::new(hue, SATURATION, LIGHTNESS);
    let rgb: Srgb<u8> = Srgb::<f32>::from_color(hsl).into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// `n` chart colours with hues spread evenly around the wheel.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    generate_palette_from(n, 0.0)
}

/// Like [`generate_palette`], with the first hue at `hue_offset` degrees so
/// neighbouring charts do not share colours.
pub fn generate_palette_from(n: usize, hue_offset: f32) -> Vec<Color32> {
    let step = 360.0 / n.max(1) as f32;
    (0..n)
        .map(|i| hsl_color(hue_offset + step * i as f32))
        .collect()
}

/// Colour for single-series charts (histogram, scatter).
pub fn accent() -> Color32 {
    hsl_color(ACCENT_HUE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(5).len(), 5);
    }

    #[test]
    fn test_offset_shifts_first_hue() {
        assert_eq!(generate_palette_from(1, ACCENT_HUE)[0], accent());
        assert_ne!(generate_palette(1)[0], accent());
    }

    #[test]
    fn test_palette_colours_distinct() {
        let colours = generate_palette(6);
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
