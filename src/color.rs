use std::collections::BTreeMap;
use std::str::FromStr;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Lighten, Srgb};

use crate::config::ColorConfig;

// ---------------------------------------------------------------------------
// Hex parsing / adjustment
// ---------------------------------------------------------------------------

/// Parse `#RRGGBB` (or `RRGGBB`, or the 3-digit short form).
pub fn parse_hex(hex: &str) -> Option<Color32> {
    let rgb = Srgb::<u8>::from_str(hex.trim()).ok()?;
    Some(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

fn parse_or(hex: &str, default: &str, name: &str) -> Color32 {
    parse_hex(hex).unwrap_or_else(|| {
        log::warn!("Invalid colour '{hex}' for {name}, using {default}");
        parse_hex(default).unwrap_or(Color32::GRAY)
    })
}

/// Mix `color` towards white in HSL space; `amount` in `0.0..=1.0`.
pub fn lighten(color: Color32, amount: f32) -> Color32 {
    let rgb = Srgb::new(color.r(), color.g(), color.b()).into_format::<f32>();
    let hsl: Hsl = rgb.into_color();
    let out: Srgb = hsl.lighten(amount).into_color();
    let out = out.into_format::<u8>();
    Color32::from_rgb(out.red, out.green, out.blue)
}

/// Same colour with alpha set from `opacity` in `0.0..=1.0`.
pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Dashboard palette plus the category → colour mapping used by the map.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color32,
    pub secondary: Color32,
    pub accent: Color32,
    pub background: Color32,
    pub text: Color32,
    categories: BTreeMap<String, Color32>,
    fallback: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::from_config(&ColorConfig::default())
    }
}

impl Theme {
    pub fn from_config(cfg: &ColorConfig) -> Self {
        let defaults = ColorConfig::default();
        let categories = cfg
            .categories
            .iter()
            .map(|(cat, hex)| (cat.clone(), parse_or(hex, &defaults.fallback, cat)))
            .collect();

        Theme {
            primary: parse_or(&cfg.primary, &defaults.primary, "primary"),
            secondary: parse_or(&cfg.secondary, &defaults.secondary, "secondary"),
            accent: parse_or(&cfg.accent, &defaults.accent, "accent"),
            background: parse_or(&cfg.background, &defaults.background, "background"),
            text: parse_or(&cfg.text, &defaults.text, "text"),
            categories,
            fallback: parse_or(&cfg.fallback, &defaults.fallback, "fallback"),
        }
    }

    /// The discrete colour sequence charts cycle through.
    pub fn sequence(&self) -> [Color32; 3] {
        [self.primary, self.secondary, self.accent]
    }

    /// `i`-th colour of [`Theme::sequence`], wrapping around.
    pub fn sequence_color(&self, i: usize) -> Color32 {
        let seq = self.sequence();
        seq[i % seq.len()]
    }

    /// Fixed colour of a category; unmapped categories get the fallback.
    pub fn category_color(&self, category: &str) -> Color32 {
        self.categories
            .get(category)
            .copied()
            .unwrap_or(self.fallback)
    }

    /// Return the legend entries (category → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.categories
            .iter()
            .map(|(c, color)| (c.clone(), *color))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#2E8B57"), Some(Color32::from_rgb(0x2E, 0x8B, 0x57)));
        assert_eq!(parse_hex("666666"), Some(Color32::from_rgb(0x66, 0x66, 0x66)));
        assert_eq!(parse_hex("#fff"), Some(Color32::WHITE));
        assert_eq!(parse_hex("verde"), None);
    }

    #[test]
    fn test_category_colors_and_fallback() {
        let theme = Theme::default();
        assert_eq!(theme.category_color("A"), theme.primary);
        assert_eq!(theme.category_color("B"), theme.secondary);
        assert_eq!(theme.category_color("C"), theme.accent);
        assert_eq!(theme.category_color("Z"), Color32::from_rgb(0x66, 0x66, 0x66));
        assert_eq!(theme.legend_entries().len(), 3);
    }

    #[test]
    fn test_invalid_config_colour_uses_default() {
        let cfg = ColorConfig {
            primary: "not-a-colour".to_string(),
            ..ColorConfig::default()
        };
        let theme = Theme::from_config(&cfg);
        assert_eq!(theme.primary, Color32::from_rgb(0x2E, 0x8B, 0x57));
    }

    #[test]
    fn test_sequence_wraps() {
        let theme = Theme::default();
        assert_eq!(theme.sequence_color(0), theme.primary);
        assert_eq!(theme.sequence_color(4), theme.secondary);
    }

    #[test]
    fn test_opacity_and_lighten() {
        let c = with_opacity(Color32::from_rgb(10, 20, 30), 0.5);
        assert_eq!(c.a(), 128);
        assert_eq!(with_opacity(Color32::RED, 3.0).a(), 255);

        let light = lighten(Color32::from_rgb(0x2E, 0x8B, 0x57), 0.9);
        assert!(light.r() > 0x2E && light.g() > 0x8B && light.b() > 0x57);
        assert_eq!(lighten(Color32::WHITE, 0.5), Color32::WHITE);
    }
}
