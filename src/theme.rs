//! Theme colors loaded from the Omarchy/Hyprland system theme
//! (~/.config/omarchy/current/theme/kitty.conf), with a Catppuccin-flavored
//! fallback palette.

use ratatui::style::Color;
use std::collections::HashMap;
use std::fs;

/// Semantic colors used by the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,      // Active borders, highlights, key hints
    pub danger: Color,      // Decline button, errors
    pub success: Color,     // Accept button
    pub warning: Color,     // Status line feedback
    pub text: Color,        // Primary text
    pub text_dim: Color,    // Secondary text, hints
    pub bg_selected: Color, // Selected row / focused button background
    pub inactive: Color,    // Inactive borders, separators
    pub header: Color,      // Table header text
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(250, 179, 135),
            danger: Color::Rgb(243, 139, 168),
            success: Color::Rgb(166, 218, 149),
            warning: Color::Rgb(250, 179, 135),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(243, 139, 168),
        }
    }
}

impl Theme {
    /// Load theme from the Omarchy system theme, falling back to defaults
    pub fn load() -> Self {
        Self::load_omarchy_theme().unwrap_or_default()
    }

    fn load_omarchy_theme() -> Option<Self> {
        let theme_path = dirs::home_dir()?.join(".config/omarchy/current/theme/kitty.conf");
        let content = fs::read_to_string(theme_path).ok()?;

        let colors = parse_kitty_conf(&content);
        if colors.is_empty() {
            return None;
        }

        // Omarchy themes remap the 16-color slots, so pick by slot with
        // sensible alternates rather than by conventional meaning.
        let pick = |keys: &[&str], fallback: Color| {
            keys.iter()
                .find_map(|k| colors.get(*k).copied())
                .unwrap_or(fallback)
        };

        let accent = pick(&["color2", "color10"], Color::Rgb(255, 193, 7));
        let danger = pick(&["color1", "color9"], Color::Rgb(211, 95, 95));

        Some(Self {
            accent,
            danger,
            success: accent,
            warning: pick(&["color4", "color12"], Color::Rgb(230, 142, 13)),
            text: pick(&["foreground"], Color::Rgb(190, 190, 190)),
            text_dim: pick(&["color8"], Color::Rgb(138, 138, 141)),
            bg_selected: pick(&["selection_background", "color0"], Color::Rgb(51, 51, 51)),
            inactive: pick(&["inactive_border_color", "color8"], Color::Rgb(89, 89, 89)),
            header: danger,
        })
    }
}

/// Parse kitty.conf lines of the form `key #hexcolor`
fn parse_kitty_conf(content: &str) -> HashMap<String, Color> {
    let mut colors = HashMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once(char::is_whitespace) {
            if let Some(color) = parse_hex_color(value.trim()) {
                colors.insert(key.trim().to_string(), color);
            }
        }
    }

    colors
}

/// Parse a hex color string (#RRGGBB or #RGB)
fn parse_hex_color(s: &str) -> Option<Color> {
    let s = s.trim().trim_start_matches('#');

    match s.len() {
        6 => {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}
