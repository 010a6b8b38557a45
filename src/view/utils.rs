//! Utility functions for rendering UI components

use ratatui::style::Color;

use crate::model::Theme;

/// Colors derived from the active theme. Views never hardcode colors except
/// for the error overlay, which stays red in both themes.
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub dim: Color,
    pub accent: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                fg: Color::White,
                bg: Color::Black,
                dim: Color::DarkGray,
                accent: Color::Magenta,
                highlight_fg: Color::Black,
                highlight_bg: Color::Magenta,
            },
            Theme::Light => Self {
                fg: Color::Black,
                bg: Color::White,
                dim: Color::Gray,
                accent: Color::Blue,
                highlight_fg: Color::White,
                highlight_bg: Color::Blue,
            },
        }
    }
}

pub fn format_duration(secs: f64) -> String {
    let total_seconds = secs.max(0.0) as u64;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_width)
    } else {
        format!("{:<width$}", s, width = max_width)
    }
}

/// "★★★☆☆" for a rating of 3; all hollow when unrated.
pub fn stars(rating: Option<u8>) -> String {
    let filled = rating.unwrap_or(0).min(5) as usize;
    let mut out = String::new();
    for _ in 0..filled {
        out.push('★');
    }
    for _ in filled..5 {
        out.push('☆');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_render_as_minutes_and_padded_seconds() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(372.0), "6:12");
        assert_eq!(format_duration(59.9), "0:59");
        assert_eq!(format_duration(-3.0), "0:00");
    }

    #[test]
    fn truncation_keeps_the_requested_width() {
        assert_eq!(truncate_string("Neon Horizon", 8), "Neon ...");
        assert_eq!(truncate_string("abc", 5), "abc  ");
    }

    #[test]
    fn star_rows_always_have_five_glyphs() {
        assert_eq!(stars(None), "☆☆☆☆☆");
        assert_eq!(stars(Some(3)), "★★★☆☆");
        assert_eq!(stars(Some(9)), "★★★★★");
    }
}
