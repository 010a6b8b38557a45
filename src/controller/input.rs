//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::ActiveView;
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        // Handle error message first (blocks all other interactions)
        if model.has_error().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    model.clear_error().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        // Handle help popup
        if model.is_help_open().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') => {
                    model.hide_help().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        // Full-player overlay: transport keys only
        if model.is_player_open().await {
            match key.code {
                KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('F') => {
                    model.close_player().await;
                }
                KeyCode::Char(' ') => {
                    drop(model);
                    self.toggle_playback().await;
                }
                KeyCode::Char('n') | KeyCode::Char('N') => self.next_track(),
                KeyCode::Char('p') | KeyCode::Char('P') => self.previous_track(),
                KeyCode::Char('s') | KeyCode::Char('S') => self.toggle_shuffle(),
                KeyCode::Char('r') | KeyCode::Char('R') => self.toggle_repeat(),
                KeyCode::Left => self.seek_by(-5.0),
                KeyCode::Right => self.seek_by(5.0),
                KeyCode::Char('+') | KeyCode::Char('=') => self.volume_up(),
                KeyCode::Char('-') => self.volume_down(),
                _ => {}
            }
            return Ok(());
        }

        let ui_state = model.get_ui_state().await;

        // The AI DJ view owns the keyboard for text entry
        if ui_state.active_view == ActiveView::AiDj {
            match key.code {
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        model.cycle_view_backward().await;
                    } else {
                        model.cycle_view_forward().await;
                    }
                    return Ok(());
                }
                KeyCode::BackTab => {
                    model.cycle_view_backward().await;
                    return Ok(());
                }
                KeyCode::Enter => {
                    drop(model);
                    self.send_mood().await;
                    return Ok(());
                }
                KeyCode::Esc => {
                    model.chat_input_clear().await;
                    return Ok(());
                }
                KeyCode::Backspace => {
                    model.chat_input_backspace().await;
                    return Ok(());
                }
                KeyCode::Char(c) => {
                    if key.modifiers.contains(KeyModifiers::CONTROL) {
                        if c == 'q' || c == 'Q' {
                            model.set_should_quit().await;
                            return Ok(());
                        }
                        // Ctrl+1..9 plays the nth track of the latest mix
                        if let Some(digit) = c.to_digit(10) {
                            if digit >= 1 {
                                drop(model);
                                self.play_recommended((digit - 1) as usize).await;
                            }
                            return Ok(());
                        }
                    }
                    // Typing is pointless while offline; the input is shown
                    // disabled, so swallow the character too.
                    if model.is_online().await && !model.is_dj_pending().await {
                        model.chat_input_push(c).await;
                    }
                    return Ok(());
                }
                _ => return Ok(()),
            }
        }

        // Queue view navigation and editing
        if ui_state.active_view == ActiveView::Queue {
            match key.code {
                KeyCode::Up => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        drop(model);
                        self.queue_move_selected(true).await;
                    } else {
                        model.queue_move_up().await;
                    }
                    return Ok(());
                }
                KeyCode::Down => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        drop(model);
                        self.queue_move_selected(false).await;
                    } else {
                        let len = self.player.snapshot().queue.len();
                        model.queue_move_down(len).await;
                    }
                    return Ok(());
                }
                KeyCode::Char('K') => {
                    drop(model);
                    self.queue_move_selected(true).await;
                    return Ok(());
                }
                KeyCode::Char('J') => {
                    drop(model);
                    self.queue_move_selected(false).await;
                    return Ok(());
                }
                KeyCode::Enter => {
                    drop(model);
                    self.play_selected_queue().await;
                    return Ok(());
                }
                KeyCode::Delete => {
                    drop(model);
                    self.queue_remove_selected().await;
                    return Ok(());
                }
                _ => {}
            }
        }

        // Library view navigation, rating, and import
        if ui_state.active_view == ActiveView::Library {
            match key.code {
                KeyCode::Up => {
                    model.library_move_up().await;
                    return Ok(());
                }
                KeyCode::Down => {
                    model.library_move_down().await;
                    return Ok(());
                }
                KeyCode::Enter => {
                    drop(model);
                    self.play_selected_library().await;
                    return Ok(());
                }
                KeyCode::Char(c @ '1'..='5') => {
                    let rating = c as u8 - b'0';
                    drop(model);
                    self.rate_selected(rating).await;
                    return Ok(());
                }
                KeyCode::Char('i') | KeyCode::Char('I') => {
                    drop(model);
                    self.import_music().await;
                    return Ok(());
                }
                _ => {}
            }
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit().await;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    model.cycle_view_backward().await;
                } else {
                    model.cycle_view_forward().await;
                }
            }
            KeyCode::BackTab => {
                model.cycle_view_backward().await;
            }
            // Play/Pause toggle
            KeyCode::Char(' ') => {
                drop(model);
                self.toggle_playback().await;
            }
            KeyCode::Char('n') | KeyCode::Char('N') => self.next_track(),
            KeyCode::Char('p') | KeyCode::Char('P') => self.previous_track(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.toggle_shuffle(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.toggle_repeat(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.volume_up(),
            KeyCode::Char('-') => self.volume_down(),
            KeyCode::Left => self.seek_by(-5.0),
            KeyCode::Right => self.seek_by(5.0),
            // Toggle color scheme
            KeyCode::Char('t') | KeyCode::Char('T') => {
                model.toggle_theme().await;
            }
            // Open the full player
            KeyCode::Char('f') | KeyCode::Char('F') => {
                model.open_player().await;
            }
            // Show help popup
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help().await;
            }
            _ => {}
        }
        Ok(())
    }
}
