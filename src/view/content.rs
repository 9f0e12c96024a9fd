//! Main content area rendering (home grid, search list, download form)

use std::time::Duration;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use ratatui::widgets::Padding;

use crate::model::{
    ActiveSection, ContentState, DownloadStatus, GRID_COLUMNS, PlaybackInfo, SearchView,
    TrackCard, TrackRow, UiState, grid_cards, list_rows,
};
use super::utils::{format_time, truncate_string};

const CARD_HEIGHT: u16 = 6;

pub fn render_main_content(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    content_state: &ContentState,
    playback: &PlaybackInfo,
) {
    match ui_state.active_section {
        ActiveSection::Home => render_home(frame, area, ui_state, content_state, playback),
        ActiveSection::Search => render_search(frame, area, ui_state, content_state, playback),
        ActiveSection::Download => render_download(frame, area, ui_state),
    }
}

fn playing_title(playback: &PlaybackInfo) -> Option<&str> {
    playback.now_playing.as_ref().map(|n| n.name.as_str())
}

fn render_home(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    content_state: &ContentState,
    playback: &PlaybackInfo,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Popular This Week ")
        .border_style(Style::default().fg(Color::Green));

    if content_state.home_loading && content_state.home.is_empty() {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        frame.render_widget(loading, area);
        return;
    }

    let cards = grid_cards(&content_state.home);
    if cards.is_empty() {
        let empty = Paragraph::new("Nothing to show yet. Press R to reload.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block.padding(Padding::horizontal(1)));
        frame.render_widget(empty, area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let row_count = cards.len().div_ceil(GRID_COLUMNS);
    let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
    let selected_row = ui_state.grid_selected / GRID_COLUMNS;
    let first_row = selected_row.saturating_sub(visible_rows.saturating_sub(1));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
        .split(inner);

    for (slot, row) in (first_row..row_count).take(visible_rows).enumerate() {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
            .split(rows[slot]);

        for (col, card) in cards
            .iter()
            .skip(row * GRID_COLUMNS)
            .take(GRID_COLUMNS)
            .enumerate()
        {
            let selected = card.index == ui_state.grid_selected;
            render_card(frame, columns[col], card, selected, playing_title(playback));
        }
    }
}

fn render_card(frame: &mut Frame, area: Rect, card: &TrackCard, selected: bool, playing: Option<&str>) {
    let width = area.width.saturating_sub(4) as usize;
    let is_playing = playing == Some(card.title.as_str());

    let border_style = if selected {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title_style = if is_playing {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };

    let overlay = if selected {
        Span::styled(format!("{} ", card.overlay_icon), Style::default().fg(Color::Green))
    } else {
        Span::raw("  ")
    };

    let lines = vec![
        Line::from(Span::styled(
            truncate_string(&card.image, width),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(vec![overlay, Span::styled(truncate_string(&card.title, width.saturating_sub(2)), title_style)]),
        Line::from(Span::styled(
            truncate_string(&card.artist, width),
            Style::default().fg(Color::Gray),
        )),
    ];

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_search(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    content_state: &ContentState,
    playback: &PlaybackInfo,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search input
            Constraint::Min(0),    // Results
        ])
        .split(area);

    let editing = ui_state.search_editing;
    let input_style = if editing {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };
    let search_text = if ui_state.search_query.is_empty() && editing {
        "Type to search...".to_string()
    } else if editing {
        format!("{}▏", ui_state.search_query)
    } else {
        ui_state.search_query.clone()
    };
    let search = Paragraph::new(search_text).style(input_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .padding(Padding::horizontal(1))
            .border_style(if editing {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            }),
    );
    frame.render_widget(search, chunks[0]);

    let title = match &content_state.search {
        SearchView::Results { query, tracks } => format!(" Results for \"{}\" ({}) ", query, tracks.len()),
        _ => " Results ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1))
        .border_style(if editing {
            Style::default()
        } else {
            Style::default().fg(Color::Green)
        });

    if let Some(placeholder) = content_state.search.placeholder() {
        let style = match content_state.search {
            SearchView::Searching { .. } => Style::default().fg(Color::Yellow),
            _ => Style::default().fg(Color::DarkGray),
        };
        frame.render_widget(Paragraph::new(placeholder).style(style).block(block), chunks[1]);
        return;
    }

    let rows = list_rows(content_state.search.tracks());
    let width = chunks[1].width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| track_row_item(row, width, row.index == ui_state.list_selected, playing_title(playback)))
        .collect();

    let list = List::new(items).block(block).highlight_style(Style::default());
    let mut list_state = ListState::default();
    list_state.select(Some(ui_state.list_selected));
    frame.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn track_row_item(row: &TrackRow, width: usize, selected: bool, playing: Option<&str>) -> ListItem<'static> {
    let duration = row
        .duration_secs
        .map(|secs| format_time(Duration::from_secs(secs as u64)))
        .unwrap_or_default();
    // icon(2) + separators(6) + duration(6)
    let text_width = width.saturating_sub(14);
    let title_width = text_width * 55 / 100;
    let artist_width = text_width.saturating_sub(title_width);

    let style = if selected {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else if playing == Some(row.title.as_str()) {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };

    ListItem::new(Line::from(vec![
        Span::styled(format!("{} ", row.inline_icon), Style::default().fg(Color::Green)),
        Span::styled(format!("{:<title_width$}", truncate_string(&row.title, title_width)), style),
        Span::raw("   "),
        Span::styled(
            format!("{:<artist_width$}", truncate_string(&row.artist, artist_width)),
            Style::default().fg(Color::Gray),
        ),
        Span::raw("   "),
        Span::styled(format!("{:>6}", duration), Style::default().fg(Color::DarkGray)),
    ]))
}

fn render_download(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // URL input
            Constraint::Min(0),    // Status
        ])
        .split(area);

    let input_text = if ui_state.download_input.is_empty() {
        "Paste a video or audio URL and press Enter".to_string()
    } else {
        format!("{}▏", ui_state.download_input)
    };
    let input = Paragraph::new(input_text)
        .style(Style::default().fg(Color::Green))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Download as MP3 ")
                .padding(Padding::horizontal(1))
                .border_style(Style::default().fg(Color::Green)),
        );
    frame.render_widget(input, chunks[0]);

    let status: Vec<Line> = match &ui_state.download_status {
        None => vec![],
        Some(DownloadStatus::MissingUrl) => vec![Line::from(Span::styled(
            "Please enter a URL.",
            Style::default().fg(Color::LightRed),
        ))],
        Some(DownloadStatus::Started { url }) => vec![
            Line::from(Span::styled(
                "Converting & Downloading...",
                Style::default().fg(Color::LightGreen),
            )),
            Line::from(Span::styled(
                "Please wait. The file will start downloading automatically.",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(url.clone(), Style::default().fg(Color::DarkGray))),
        ],
    };

    let widget = Paragraph::new(status).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Status ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, chunks[1]);
}
