//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::ActiveSection;
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
        if model.is_help_popup_open().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') => {
                    model.hide_help_popup().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        // Detail overlay swallows everything except closing keys
        if model.is_detail_open().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') | KeyCode::Char('Q') => {
                    drop(model);
                    self.close_detail().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        let ui_state = model.get_ui_state().await;

        match key.code {
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                model.cycle_section_backward().await;
                return Ok(());
            }
            KeyCode::Tab => {
                model.cycle_section_forward().await;
                return Ok(());
            }
            KeyCode::BackTab => {
                model.cycle_section_backward().await;
                return Ok(());
            }
            _ => {}
        }

        // Handle search input when in search section
        if ui_state.active_section == ActiveSection::Search {
            match key.code {
                KeyCode::Enter => {
                    drop(model);
                    self.submit_search().await;
                    return Ok(());
                }
                KeyCode::Esc => {
                    drop(model);
                    self.clear_search().await;
                    return Ok(());
                }
                KeyCode::Backspace => {
                    model.backspace_search().await;
                    return Ok(());
                }
                KeyCode::Char(c) => {
                    // Q still quits even in search mode when Ctrl is pressed
                    if (c == 'q' || c == 'Q') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        model.set_should_quit(true).await;
                        return Ok(());
                    }
                    model.append_to_search(c).await;
                    return Ok(());
                }
                _ => {}
            }
        }

        // Sort and genre selectors react to left/right
        if matches!(ui_state.active_section, ActiveSection::Sort | ActiveSection::Genre) {
            let forward = match key.code {
                KeyCode::Right => Some(true),
                KeyCode::Left => Some(false),
                _ => None,
            };
            if let Some(forward) = forward {
                drop(model);
                if ui_state.active_section == ActiveSection::Sort {
                    self.cycle_sort(forward).await;
                } else {
                    self.cycle_genre(forward).await;
                }
                return Ok(());
            }
        }

        // Handle results list navigation
        if ui_state.active_section == ActiveSection::Results {
            match key.code {
                KeyCode::Up => {
                    model.results_move_up().await;
                    return Ok(());
                }
                KeyCode::Down => {
                    // Moving past the last row asks for the next page
                    if model.results_move_down().await {
                        drop(model);
                        self.load_more().await;
                    }
                    return Ok(());
                }
                KeyCode::Enter => {
                    drop(model);
                    self.open_selected_movie().await;
                    return Ok(());
                }
                _ => {}
            }
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            // Load next page
            KeyCode::Char('m') | KeyCode::Char('M') => {
                drop(model);
                self.load_more().await;
            }
            // Re-issue the current request
            KeyCode::Char('r') | KeyCode::Char('R') => {
                drop(model);
                self.refresh().await;
            }
            // Focus search
            KeyCode::Char('/') | KeyCode::Char('g') | KeyCode::Char('G') => {
                model.set_active_section(ActiveSection::Search).await;
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                model.set_active_section(ActiveSection::Sort).await;
            }
            KeyCode::Char('f') | KeyCode::Char('F') => {
                model.set_active_section(ActiveSection::Genre).await;
            }
            // Show help popup
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help_popup().await;
            }
            KeyCode::Esc => {
                model.set_active_section(ActiveSection::Results).await;
            }
            _ => {}
        }
        Ok(())
    }
}
