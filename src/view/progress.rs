//! Transport bar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::model::{PlaybackInfo, PlaybackState};
use super::utils::format_time;

fn status_text(playback: &PlaybackInfo) -> String {
    let Some(now_playing) = &playback.now_playing else {
        return " No track playing ".to_string();
    };
    let icon = match playback.state {
        PlaybackState::Playing => "▶",
        PlaybackState::Paused | PlaybackState::Unloaded => "⏸",
    };
    format!(" {} {} | {} ", icon, now_playing.name, now_playing.artist)
}

fn time_label(playback: &PlaybackInfo) -> String {
    let progress = &playback.progress;
    match (progress.duration, progress.remaining()) {
        (Some(total), Some(remaining)) => format!(
            "{} / {} (-{})",
            format_time(progress.elapsed),
            format_time(total),
            format_time(remaining)
        ),
        _ => format!("{} / --:--", format_time(progress.elapsed)),
    }
}

pub fn render_progress_bar(frame: &mut Frame, area: Rect, playback: &PlaybackInfo) {
    let volume_text = format!(" Vol: {}% ", (playback.volume * 100.0).round() as u32);
    let position_text = if playback.track_count > 0 {
        format!(" {}/{} ", playback.current_index + 1, playback.track_count)
    } else {
        String::new()
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(status_text(playback))
                .title_bottom(Line::from(position_text).left_aligned())
                .title_bottom(Line::from(volume_text).right_aligned()),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(playback.progress.ratio())
        .label(time_label(playback));

    frame.render_widget(gauge, area);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn info() -> PlaybackInfo {
        PlaybackInfo {
            state: PlaybackState::Unloaded,
            now_playing: None,
            progress: Default::default(),
            volume: 1.0,
            current_index: 0,
            track_count: 0,
        }
    }

    #[test]
    fn label_shows_elapsed_total_and_remaining() {
        let mut playback = info();
        playback.progress.elapsed = Duration::from_secs(65);
        playback.progress.duration = Some(Duration::from_secs(200));
        assert_eq!(time_label(&playback), "1:05 / 3:20 (-2:15)");
    }

    #[test]
    fn label_without_duration_has_no_total() {
        assert_eq!(time_label(&info()), "0:00 / --:--");
        assert_eq!(status_text(&info()), " No track playing ");
    }
}
