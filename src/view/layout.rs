//! Top bar rendering (title, view tabs, status badges)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{ActiveView, UiState};

use super::utils::Palette;

pub fn render_top_bar(frame: &mut Frame, area: Rect, ui_state: &UiState, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(14),
            Constraint::Min(0),
            Constraint::Length(22),
        ])
        .split(area);

    let title = Paragraph::new("♫ MoodPlay")
        .style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    // View tabs, active one highlighted
    let mut spans = Vec::new();
    for view in [ActiveView::Library, ActiveView::Queue, ActiveView::AiDj] {
        let style = if view == ui_state.active_view {
            Style::default()
                .fg(palette.highlight_fg)
                .bg(palette.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.dim)
        };
        spans.push(Span::styled(format!(" {} ", view.title()), style));
        spans.push(Span::raw(" "));
    }
    let tabs = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(tabs, chunks[1]);

    let (status_text, status_style) = if ui_state.is_online {
        ("online", Style::default().fg(palette.accent))
    } else {
        ("offline", Style::default().fg(palette.dim))
    };
    let status = Paragraph::new(format!("{} | {}", status_text, ui_state.theme.as_str()))
        .style(status_style)
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(status, chunks[2]);
}
