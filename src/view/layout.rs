//! Navigation bar

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{NAV_ITEMS, UiState};

pub fn render_nav_bar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let mut spans: Vec<Span> = Vec::new();
    for (i, item) in NAV_ITEMS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        }
        let style = match item.section {
            Some(section) if section == ui_state.active_section => Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            Some(_) => Style::default().fg(Color::White),
            // Reserved, not selectable yet
            None => Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        };
        spans.push(Span::styled(item.label, style));
    }

    let nav = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Jamendo ")
            .title_bottom(Line::from(" H: help ").right_aligned())
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(nav, area);
}
