//! Overlay rendering (error notification, alert, settings editor, help popup)

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::UiState;
use super::utils::centered_rect;

const POPUP_WIDTH: u16 = 52;

/// Lines a message occupies when wrapped into `inner_width` columns
fn wrapped_lines(message: &str, inner_width: u16) -> u16 {
    let inner_width = inner_width.max(1) as usize;
    message.chars().count().div_ceil(inner_width).max(1) as u16
}

pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState) {
    let Some(error_msg) = &ui_state.error_message else {
        return;
    };
    let area = frame.area();
    let width = POPUP_WIDTH.min(area.width.saturating_sub(4));
    let height = 2 + wrapped_lines(error_msg, width.saturating_sub(2));
    let mut popup_area = centered_rect(area, width, height);
    // Banner sits just above the transport bar
    popup_area.y = area.y + area.height.saturating_sub(popup_area.height + 3);

    frame.render_widget(Clear, popup_area);

    let error_widget = Paragraph::new(error_msg.as_str())
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Error (Esc to dismiss) ")
                .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(error_widget, popup_area);
}

pub fn render_alert(frame: &mut Frame, ui_state: &UiState) {
    let Some(message) = &ui_state.alert else {
        return;
    };
    let area = frame.area();
    let width = 46.min(area.width.saturating_sub(4));
    let height = 4 + wrapped_lines(message, width.saturating_sub(4));
    let popup_area = centered_rect(area, width, height);

    frame.render_widget(Clear, popup_area);

    let alert = Paragraph::new(message.as_str())
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Notice ")
                .title_bottom(Line::from(" Enter to dismiss ").right_aligned())
                .title_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                .padding(Padding::uniform(1))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(alert, popup_area);
}

pub fn render_settings_editor(frame: &mut Frame, ui_state: &UiState) {
    let Some(editor) = &ui_state.settings_editor else {
        return;
    };
    let popup_area = centered_rect(frame.area(), 56, 7);

    frame.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(Span::styled(
            "Enter your Jamendo client id:",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(editor.input.clone(), Style::default().fg(Color::Green)),
            Span::styled("▏", Style::default().fg(Color::Green)),
        ]),
    ];

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Jamendo client id ")
            .title_bottom(Line::from(" Enter: save | Esc: cancel ").right_aligned())
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .padding(Padding::horizontal(1))
            .style(Style::default().bg(Color::Black)),
    );

    frame.render_widget(widget, popup_area);
}

pub fn render_help_popup(frame: &mut Frame) {
    let keybindings = [
        ("", "── Navigation ──"),
        ("Tab / Shift+Tab", "Cycle sections"),
        ("1 / 2 / 3", "Home / Search / Download"),
        ("← ↑ ↓ →", "Move selection"),
        ("Enter", "Play selected track"),
        ("/ or G", "Focus search"),
        ("Esc", "Leave input / dismiss"),
        ("", ""),
        ("", "── Playback ──"),
        ("Space", "Play / Pause"),
        ("N", "Next track"),
        ("P", "Previous track"),
        (", / .", "Seek -5s / +5s"),
        ("+ / -", "Volume up / down"),
        ("", ""),
        ("", "── General ──"),
        ("R", "Reload popular tracks"),
        ("C", "Edit client id"),
        ("H", "Toggle this help"),
        ("Q / Ctrl+Q", "Quit"),
    ];

    let area = frame.area();
    let popup_area = centered_rect(area, 62, keybindings.len() as u16 + 2);

    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                // Section header or empty line
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}
