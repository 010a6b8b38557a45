//! AI DJ transcript and input

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
    Frame,
};

use crate::model::{ChatMessage, ChatRole, UiState};

use super::utils::Palette;

pub fn render_chat(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    chat: &[ChatMessage],
    palette: &Palette,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Transcript
            Constraint::Length(3), // Input box
        ])
        .split(area);

    render_transcript(frame, chunks[0], ui_state, chat, palette);
    render_input(frame, chunks[1], ui_state, palette);
}

fn render_transcript(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    chat: &[ChatMessage],
    palette: &Palette,
) {
    let mut lines: Vec<Line> = Vec::new();
    for message in chat {
        let (speaker, style) = match message.role {
            ChatRole::User => (
                "You",
                Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
            ),
            ChatRole::Assistant => (
                "DJ",
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", speaker), style),
            Span::styled(
                message.sent_at.format("%H:%M").to_string(),
                Style::default().fg(palette.dim),
            ),
        ]));
        for text_line in message.text.lines() {
            lines.push(Line::from(Span::styled(
                format!("  {}", text_line),
                Style::default().fg(palette.fg),
            )));
        }
        for (i, track) in message.recommended.iter().enumerate() {
            lines.push(Line::from(Span::styled(
                format!("  Ctrl+{}  {} by {}", i + 1, track.title, track.artist),
                Style::default().fg(palette.accent),
            )));
        }
        lines.push(Line::from(""));
    }

    if ui_state.dj_pending {
        lines.push(Line::from(Span::styled(
            "DJ is thinking...",
            Style::default()
                .fg(palette.dim)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    // Pin the tail of the conversation into view
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;

    let transcript = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" AI DJ ")
                .border_style(Style::default().fg(palette.dim))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(transcript, area);
}

fn render_input(frame: &mut Frame, area: Rect, ui_state: &UiState, palette: &Palette) {
    let (text, style) = if !ui_state.is_online {
        (
            "You're offline. The AI DJ needs a connection.".to_string(),
            Style::default().fg(palette.dim),
        )
    } else if ui_state.dj_pending {
        (
            "Waiting for the DJ...".to_string(),
            Style::default().fg(palette.dim),
        )
    } else if ui_state.chat_input.is_empty() {
        (
            "How are you feeling? (Enter to send)".to_string(),
            Style::default().fg(palette.dim),
        )
    } else {
        (
            ui_state.chat_input.clone(),
            Style::default().fg(palette.fg),
        )
    };

    let input = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Mood ")
            .border_style(Style::default().fg(palette.accent))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(input, area);
}
