//! Content state and the track list → view model projections

use super::track::Track;

pub const GRID_PLAY_ICON: &str = "▶";
pub const LIST_PLAY_ICON: &str = "⏵";

/// A card in the home grid
#[derive(Clone, Debug, PartialEq)]
pub struct TrackCard {
    /// Position in the list this card was rendered from
    pub index: usize,
    pub title: String,
    pub artist: String,
    pub image: String,
    pub overlay_icon: &'static str,
}

/// A row in the search results list
#[derive(Clone, Debug, PartialEq)]
pub struct TrackRow {
    pub index: usize,
    pub title: String,
    pub artist: String,
    pub image: String,
    pub duration_secs: Option<u32>,
    pub inline_icon: &'static str,
}

/// Project tracks into grid cards. Every call builds a fresh set.
pub fn grid_cards(tracks: &[Track]) -> Vec<TrackCard> {
    tracks
        .iter()
        .enumerate()
        .map(|(index, track)| TrackCard {
            index,
            title: track.name.clone(),
            artist: track.artist_name.clone(),
            image: track.album_image.clone(),
            overlay_icon: GRID_PLAY_ICON,
        })
        .collect()
}

/// Project tracks into list rows. Every call builds a fresh set.
pub fn list_rows(tracks: &[Track]) -> Vec<TrackRow> {
    tracks
        .iter()
        .enumerate()
        .map(|(index, track)| TrackRow {
            index,
            title: track.name.clone(),
            artist: track.artist_name.clone(),
            image: track.album_image.clone(),
            duration_secs: track.duration,
            inline_icon: LIST_PLAY_ICON,
        })
        .collect()
}

/// What the search section currently shows
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SearchView {
    #[default]
    Idle,
    Searching { query: String },
    NoResults { query: String },
    Results { query: String, tracks: Vec<Track> },
}

impl SearchView {
    pub fn tracks(&self) -> &[Track] {
        match self {
            SearchView::Results { tracks, .. } => tracks,
            _ => &[],
        }
    }

    /// Text shown in place of the result list, if any.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            SearchView::Idle => Some("Press / to search, Enter to submit"),
            SearchView::Searching { .. } => Some("Searching..."),
            SearchView::NoResults { .. } => Some("No results found."),
            SearchView::Results { .. } => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ContentState {
    /// Popular tracks shown on the home grid
    pub home: Vec<Track>,
    pub home_loading: bool,
    pub search: SearchView,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks(count: usize) -> Vec<Track> {
        (0..count)
            .map(|i| Track {
                name: format!("Track {i}"),
                artist_name: format!("Artist {i}"),
                album_image: format!("https://img/{i}"),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn grid_cards_index_into_the_rendered_list() {
        let cards = grid_cards(&tracks(12));
        assert_eq!(cards.len(), 12);
        assert_eq!(cards[5].index, 5);
        assert_eq!(cards[5].title, "Track 5");
        assert_eq!(cards[5].artist, "Artist 5");
        assert!(cards.iter().all(|c| c.overlay_icon == GRID_PLAY_ICON));
    }

    #[test]
    fn list_rows_restart_indices_per_call() {
        let all = tracks(6);
        let rows = list_rows(&all[3..]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].index, 0);
        assert_eq!(rows[0].title, "Track 3");
        assert_eq!(rows[0].inline_icon, LIST_PLAY_ICON);
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert!(grid_cards(&[]).is_empty());
        assert!(list_rows(&[]).is_empty());
    }
}
