use portal_core::AppConfig;
use ratatui::style::Color;
use tracing::warn;

/// Bloom brand palette.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary_fg: Color,
    pub accent: Color,
    pub muted: Color,
    pub banner_bg: Color,
    pub banner_fg: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        let banner_bg = Color::Rgb(0x8B, 0xC5, 0x3F);
        Self {
            primary_fg: Color::White,
            accent: Color::Rgb(0x00, 0x6D, 0xB6),
            muted: Color::Rgb(0x80, 0x82, 0x85),
            banner_bg,
            banner_fg: Color::White,
            selection_bg: Color::DarkGray,
            selection_fg: Color::White,
            danger: Color::Red,
        }
    }
}

impl Theme {
    /// Default palette with the configured accent applied, if it parses.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut theme = Self::default();
        if let Some(raw) = config.accent_color.as_deref() {
            match parse_hex_color(raw) {
                Some(color) => {
                    theme.accent = color;
                    theme.selection_bg = color;
                    theme.selection_fg = contrast_color(&color, theme.selection_fg);
                }
                None => warn!(accent = raw, "ignoring unparseable accent colour"),
            }
        }
        theme
    }
}

pub fn parse_hex_color(input: &str) -> Option<Color> {
    let trimmed = input.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

fn contrast_color(color: &Color, fallback: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let luminance = 0.299 * f64::from(*r) + 0.587 * f64::from(*g) + 0.114 * f64::from(*b);
            if luminance > 186.0 {
                Color::Black
            } else {
                Color::White
            }
        }
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(parse_hex_color("#8BC53F"), Some(Color::Rgb(0x8B, 0xC5, 0x3F)));
        assert_eq!(parse_hex_color("fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("zzzzzz"), None);
    }

    #[test]
    fn accent_override_applies_with_contrast() {
        let config = AppConfig {
            accent_color: Some("#ffffff".to_string()),
            ..AppConfig::default()
        };
        let theme = Theme::from_config(&config);
        assert_eq!(theme.accent, Color::Rgb(255, 255, 255));
        assert_eq!(theme.selection_fg, Color::Black);
    }

    #[test]
    fn bad_accent_keeps_default() {
        let config = AppConfig {
            accent_color: Some("blue-ish".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(Theme::from_config(&config).accent, Theme::default().accent);
    }
}
