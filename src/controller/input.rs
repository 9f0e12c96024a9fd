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

        let model = &self.model;

        // Ctrl+Q quits from anywhere, including text inputs
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        {
            model.set_should_quit(true).await;
            return Ok(());
        }

        // Blocking alert comes first (must be acknowledged)
        if model.has_alert().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                model.dismiss_alert().await;
            }
            return Ok(());
        }

        // Settings editor captures all keys while open
        if model.is_settings_open().await {
            match key.code {
                KeyCode::Enter => self.save_settings().await,
                KeyCode::Esc => model.close_settings().await,
                KeyCode::Backspace => model.backspace_settings().await,
                KeyCode::Char(c) => model.append_to_settings(c).await,
                _ => {}
            }
            return Ok(());
        }

        if model.is_help_popup_open().await {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?')
            ) {
                model.hide_help_popup().await;
            }
            return Ok(());
        }

        // The error banner only swallows its own dismiss keys
        if model.has_error().await && matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            model.clear_error().await;
            return Ok(());
        }

        let ui_state = model.get_ui_state().await;

        match key.code {
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

        // Text input in the search box
        if ui_state.active_section == ActiveSection::Search && ui_state.search_editing {
            match key.code {
                KeyCode::Enter => {
                    self.spawn_search(ui_state.search_query.clone());
                }
                KeyCode::Esc | KeyCode::Down => {
                    model.set_search_editing(false).await;
                }
                KeyCode::Backspace => {
                    model.backspace_search().await;
                }
                KeyCode::Char(c) => {
                    model.append_to_search(c).await;
                }
                _ => {}
            }
            return Ok(());
        }

        // Text input in the download box
        if ui_state.active_section == ActiveSection::Download {
            match key.code {
                KeyCode::Enter => self.submit_download().await,
                KeyCode::Backspace => model.backspace_download().await,
                KeyCode::Esc => model.show_section(ActiveSection::Home).await,
                KeyCode::Char(c) => model.append_to_download(c).await,
                _ => {}
            }
            return Ok(());
        }

        match ui_state.active_section {
            ActiveSection::Home => match key.code {
                KeyCode::Left => model.move_grid_selection(-1, 0).await,
                KeyCode::Right => model.move_grid_selection(1, 0).await,
                KeyCode::Up => model.move_grid_selection(0, -1).await,
                KeyCode::Down => model.move_grid_selection(0, 1).await,
                KeyCode::Enter => self.play_grid_entry(ui_state.grid_selected).await,
                _ => self.handle_global_key(key).await,
            },
            ActiveSection::Search => match key.code {
                KeyCode::Up => model.move_list_selection(-1).await,
                KeyCode::Down => model.move_list_selection(1).await,
                KeyCode::Enter => self.play_list_entry(ui_state.list_selected).await,
                KeyCode::Esc => {
                    model.clear_search_query().await;
                    model.set_search_editing(true).await;
                }
                _ => self.handle_global_key(key).await,
            },
            ActiveSection::Download => {}
        }

        Ok(())
    }

    async fn handle_global_key(&self, key: KeyEvent) {
        let model = &self.model;
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            // Play/Pause toggle
            KeyCode::Char(' ') => self.toggle_playback().await,
            KeyCode::Char('n') | KeyCode::Char('N') => self.next_track().await,
            KeyCode::Char('p') | KeyCode::Char('P') => self.previous_track().await,
            // Seek
            KeyCode::Char(',') => self.seek_backward().await,
            KeyCode::Char('.') => self.seek_forward().await,
            // Volume
            KeyCode::Char('+') | KeyCode::Char('=') => self.volume_up().await,
            KeyCode::Char('-') => self.volume_down().await,
            // Sections
            KeyCode::Char('1') => self.show_section(ActiveSection::Home).await,
            KeyCode::Char('2') => self.show_section(ActiveSection::Search).await,
            KeyCode::Char('3') => self.show_section(ActiveSection::Download).await,
            // Focus search
            KeyCode::Char('/') | KeyCode::Char('g') | KeyCode::Char('G') => {
                self.show_section(ActiveSection::Search).await;
                model.set_search_editing(true).await;
            }
            // Reload popular tracks
            KeyCode::Char('r') | KeyCode::Char('R') => self.spawn_popular_fetch(),
            // Credential editor
            KeyCode::Char('c') | KeyCode::Char('C') => self.open_settings().await,
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                model.show_help_popup().await;
            }
            _ => {}
        }
    }
}
