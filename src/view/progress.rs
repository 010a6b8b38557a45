//! Mini-player bar rendering

use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::player::PlaybackSnapshot;

use super::utils::{format_duration, Palette};

pub fn render_mini_player(
    frame: &mut Frame,
    area: Rect,
    playback: &PlaybackSnapshot,
    palette: &Palette,
) {
    let status_text = match playback.current_track() {
        None => " No track playing".to_string(),
        Some(track) if playback.is_playing() => {
            format!(" ▶ {} | {}", track.title, track.artist)
        }
        Some(track) => format!(" ⏸ {} | {}", track.title, track.artist),
    };

    let shuffle_text = if playback.shuffle { "Shuffle: On" } else { "Shuffle: Off" };
    let repeat_text = if playback.repeat { "Repeat: On" } else { "Repeat: Off" };
    let volume_text = format!("Vol: {}%", (playback.volume * 100.0).round() as u32);

    let time_str = format!(
        "{} / {}",
        format_duration(playback.position_secs()),
        format_duration(playback.duration_secs())
    );

    let progress_ratio = if playback.duration_secs() > 0.0 {
        (playback.position_secs() / playback.duration_secs()).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let title = format!("{} ", status_text);
    let controls_info = format!(" {} | {} | {} ", shuffle_text, repeat_text, volume_text);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_bottom(Line::from(controls_info).right_aligned()),
        )
        .gauge_style(Style::default().fg(palette.accent))
        .ratio(progress_ratio)
        .label(time_str);

    frame.render_widget(gauge, area);
}
