//! Theme colors, optionally overridden from ~/.config/propdash/theme.conf
//!
//! The file uses `key #RRGGBB` lines (kitty.conf style), so an existing
//! terminal color scheme can be copied in as-is.

use ratatui::style::Color;
use std::collections::HashMap;
use std::fs;

/// Theme colors for the UI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub accent: Color,       // Focused borders, selector value
    pub danger: Color,       // Load errors
    pub success: Color,      // Summary pane highlights
    pub text: Color,         // Primary text
    pub text_dim: Color,     // Hints, status text
    pub bg_selected: Color,  // Highlighted dropdown row
    pub inactive: Color,     // Disabled selector, unfocused borders
    pub header: Color,       // Title bar
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(137, 180, 250),
            danger: Color::Rgb(243, 139, 168),
            success: Color::Rgb(166, 218, 149),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(250, 179, 135),
        }
    }
}

impl Theme {
    /// Load the user's theme file, or defaults if it is absent or empty
    pub fn load() -> Self {
        let Ok(dir) = crate::config::AppConfig::config_dir() else {
            return Self::default();
        };

        match fs::read_to_string(dir.join("theme.conf")) {
            Ok(content) => Self::from_conf(&content),
            Err(_) => Self::default(),
        }
    }

    /// Build a theme from theme.conf content. Unknown keys are ignored and
    /// missing keys keep their default.
    pub fn from_conf(content: &str) -> Self {
        let colors = Self::parse_conf(content);
        let base = Self::default();
        let pick = |keys: &[&str], fallback: Color| {
            keys.iter()
                .find_map(|k| colors.get(*k).copied())
                .unwrap_or(fallback)
        };

        Self {
            accent: pick(&["accent", "color4"], base.accent),
            danger: pick(&["danger", "color1"], base.danger),
            success: pick(&["success", "color2"], base.success),
            text: pick(&["text", "foreground"], base.text),
            text_dim: pick(&["text_dim", "color8"], base.text_dim),
            bg_selected: pick(&["bg_selected", "selection_background"], base.bg_selected),
            inactive: pick(&["inactive", "inactive_border_color"], base.inactive),
            header: pick(&["header", "color3"], base.header),
        }
    }

    /// Parse `key value` lines, keeping only values that are hex colors
    fn parse_conf(content: &str) -> HashMap<String, Color> {
        let mut colors = HashMap::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once(char::is_whitespace) {
                if let Some(color) = Self::parse_hex_color(value) {
                    colors.insert(key.trim().to_string(), color);
                }
            }
        }

        colors
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');
        if !s.is_ascii() {
            return None;
        }

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
}
