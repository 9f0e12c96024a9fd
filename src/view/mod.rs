//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, popup placement)
//! - `layout`: Navigation bar
//! - `content`: Home grid, search list and download section
//! - `progress`: Transport bar
//! - `overlays`: Modal overlays (error, alert, settings editor, help)

mod utils;
mod layout;
mod content;
mod progress;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{ContentState, PlaybackInfo, UiState};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, playback: &PlaybackInfo, ui_state: &UiState, content_state: &ContentState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Navigation
                Constraint::Min(0),    // Active section
                Constraint::Length(3), // Transport bar
            ])
            .split(frame.area());

        layout::render_nav_bar(frame, chunks[0], ui_state);

        content::render_main_content(frame, chunks[1], ui_state, content_state, playback);

        progress::render_progress_bar(frame, chunks[2], playback);

        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        if ui_state.settings_editor.is_some() {
            overlays::render_settings_editor(frame, ui_state);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }

        // Drawn last so it sits above everything it blocks
        if ui_state.alert.is_some() {
            overlays::render_alert(frame, ui_state);
        }
    }
}
