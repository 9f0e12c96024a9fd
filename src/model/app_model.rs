//! Main application model with state management

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::catalog::CatalogError;
use super::content::{ContentState, SearchView};
use super::playback::{PlaybackController, PlaybackError, PlaybackInfo};
use super::track::Track;
use super::types::{ActiveSection, DownloadStatus, SettingsEditor, UiState};

/// Cards per row in the home grid
pub const GRID_COLUMNS: usize = 4;

/// Main application model containing all state
pub struct AppModel {
    player: Arc<Mutex<PlaybackController>>,
    pub ui_state: Arc<Mutex<UiState>>,
    pub content_state: Arc<Mutex<ContentState>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new(player: PlaybackController) -> Self {
        Self {
            player: Arc::new(Mutex::new(player)),
            ui_state: Arc::new(Mutex::new(UiState::default())),
            content_state: Arc::new(Mutex::new(ContentState::default())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn get_content_state(&self) -> ContentState {
        self.content_state.lock().await.clone()
    }

    pub async fn get_playback_info(&self) -> PlaybackInfo {
        self.player.lock().await.info()
    }

    #[cfg(test)]
    pub async fn playback_tracks(&self) -> Vec<Track> {
        self.player.lock().await.tracks().to_vec()
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub async fn show_section(&self, section: ActiveSection) {
        let mut state = self.ui_state.lock().await;
        state.active_section = section;
        tracing::debug!(?section, "Section shown");
    }

    pub async fn cycle_section_forward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.next();
    }

    pub async fn cycle_section_backward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.prev();
    }

    pub async fn move_grid_selection(&self, dx: isize, dy: isize) {
        let len = self.content_state.lock().await.home.len();
        let mut state = self.ui_state.lock().await;
        if len == 0 {
            state.grid_selected = 0;
            return;
        }
        let target = state.grid_selected as isize + dx + dy * GRID_COLUMNS as isize;
        state.grid_selected = target.clamp(0, len as isize - 1) as usize;
    }

    pub async fn move_list_selection(&self, delta: isize) {
        let len = self.content_state.lock().await.search.tracks().len();
        let mut state = self.ui_state.lock().await;
        if len == 0 {
            state.list_selected = 0;
            return;
        }
        let target = state.list_selected as isize + delta;
        state.list_selected = target.clamp(0, len as isize - 1) as usize;
    }

    // ========================================================================
    // Text inputs
    // ========================================================================

    pub async fn set_search_editing(&self, editing: bool) {
        self.ui_state.lock().await.search_editing = editing;
    }

    pub async fn append_to_search(&self, c: char) {
        self.ui_state.lock().await.search_query.push(c);
    }

    pub async fn backspace_search(&self) {
        self.ui_state.lock().await.search_query.pop();
    }

    pub async fn clear_search_query(&self) {
        self.ui_state.lock().await.search_query.clear();
    }

    pub async fn append_to_download(&self, c: char) {
        self.ui_state.lock().await.download_input.push(c);
    }

    pub async fn backspace_download(&self) {
        self.ui_state.lock().await.download_input.pop();
    }

    pub async fn set_download_status(&self, status: DownloadStatus) {
        self.ui_state.lock().await.download_status = Some(status);
    }

    // ========================================================================
    // Error surface, alerts and overlays
    // ========================================================================

    pub async fn set_error(&self, message: String) {
        self.ui_state.lock().await.error_message = Some(message);
    }

    pub async fn clear_error(&self) {
        self.ui_state.lock().await.error_message = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    /// Put a catalog failure on the banner. Credential failures also open
    /// the settings editor, pre-filled with `credential`.
    pub async fn show_catalog_error(&self, error: &CatalogError, credential: &str) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(format!("Error: {error}"));
        if error.is_auth() {
            state.settings_editor = Some(SettingsEditor {
                input: credential.to_string(),
            });
        }
    }

    pub async fn show_alert(&self, message: String) {
        self.ui_state.lock().await.alert = Some(message);
    }

    pub async fn dismiss_alert(&self) {
        self.ui_state.lock().await.alert = None;
    }

    pub async fn has_alert(&self) -> bool {
        self.ui_state.lock().await.alert.is_some()
    }

    pub async fn open_settings(&self, credential: &str) {
        self.ui_state.lock().await.settings_editor = Some(SettingsEditor {
            input: credential.to_string(),
        });
    }

    pub async fn close_settings(&self) {
        self.ui_state.lock().await.settings_editor = None;
    }

    pub async fn is_settings_open(&self) -> bool {
        self.ui_state.lock().await.settings_editor.is_some()
    }

    pub async fn settings_input(&self) -> Option<String> {
        self.ui_state
            .lock()
            .await
            .settings_editor
            .as_ref()
            .map(|editor| editor.input.clone())
    }

    pub async fn append_to_settings(&self, c: char) {
        if let Some(editor) = self.ui_state.lock().await.settings_editor.as_mut() {
            editor.input.push(c);
        }
    }

    pub async fn backspace_settings(&self) {
        if let Some(editor) = self.ui_state.lock().await.settings_editor.as_mut() {
            editor.input.pop();
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    // ========================================================================
    // Catalog results
    // ========================================================================

    pub async fn begin_popular_fetch(&self) {
        self.clear_error().await;
        self.content_state.lock().await.home_loading = true;
    }

    pub async fn fail_popular_fetch(&self) {
        self.content_state.lock().await.home_loading = false;
    }

    /// Replace the home grid. The playback list only picks these up if it
    /// has nothing yet.
    pub async fn apply_popular(&self, tracks: Vec<Track>) {
        {
            let mut player = self.player.lock().await;
            if player.tracks().is_empty() {
                player.set_tracks(tracks.clone());
            }
        }

        let len = tracks.len();
        {
            let mut content = self.content_state.lock().await;
            content.home = tracks;
            content.home_loading = false;
        }

        let mut state = self.ui_state.lock().await;
        if state.grid_selected >= len {
            state.grid_selected = 0;
        }
    }

    pub async fn begin_search(&self, query: &str) {
        {
            let mut state = self.ui_state.lock().await;
            state.active_section = ActiveSection::Search;
            state.error_message = None;
        }
        self.content_state.lock().await.search = SearchView::Searching {
            query: query.to_string(),
        };
    }

    /// Show search results. A non-empty result set becomes the playback
    /// list; an empty one leaves it alone.
    pub async fn apply_search_results(&self, query: &str, tracks: Vec<Track>) {
        if tracks.is_empty() {
            self.content_state.lock().await.search = SearchView::NoResults {
                query: query.to_string(),
            };
            return;
        }

        self.player.lock().await.set_tracks(tracks.clone());
        self.content_state.lock().await.search = SearchView::Results {
            query: query.to_string(),
            tracks,
        };

        let mut state = self.ui_state.lock().await;
        state.list_selected = 0;
        state.search_editing = false;
        state.active_section = ActiveSection::Search;
    }

    pub async fn fail_search(&self) {
        self.content_state.lock().await.search = SearchView::Idle;
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Activate entry `index` of the home grid.
    pub async fn play_from_home(&self, index: usize) -> Result<(), PlaybackError> {
        let tracks = self.content_state.lock().await.home.clone();
        self.play_from(tracks, index).await
    }

    /// Activate entry `index` of the search result list.
    pub async fn play_from_search(&self, index: usize) -> Result<(), PlaybackError> {
        let tracks = self.content_state.lock().await.search.tracks().to_vec();
        self.play_from(tracks, index).await
    }

    async fn play_from(&self, tracks: Vec<Track>, index: usize) -> Result<(), PlaybackError> {
        if index >= tracks.len() {
            return Ok(());
        }
        let mut player = self.player.lock().await;
        player.set_tracks(tracks);
        player.load(index)
    }

    pub async fn toggle_play_pause(&self) {
        self.player.lock().await.toggle_play_pause();
    }

    pub async fn next_track(&self) -> Result<(), PlaybackError> {
        self.player.lock().await.next()
    }

    pub async fn previous_track(&self) -> Result<(), PlaybackError> {
        self.player.lock().await.prev()
    }

    pub async fn on_track_ended(&self, generation: u64) -> Result<(), PlaybackError> {
        self.player.lock().await.on_output_ended(generation)
    }

    pub async fn on_time_update(&self, position: Duration, duration: Option<Duration>) {
        self.player.lock().await.on_time_update(position, duration);
    }

    /// Seek relative to the displayed position, within the seek range.
    pub async fn seek_by(&self, delta_secs: i64) {
        let mut player = self.player.lock().await;
        let progress = player.info().progress;
        if progress.duration.is_none() {
            return;
        }
        let target = (progress.elapsed.as_secs() as i64 + delta_secs).clamp(0, progress.seek_max as i64);
        player.seek(Duration::from_secs(target as u64));
    }

    /// Nudge the volume control, which itself stays within [0, 1].
    pub async fn adjust_volume(&self, delta: f32) -> f32 {
        let mut player = self.player.lock().await;
        let level = (player.volume() + delta).clamp(0.0, 1.0);
        player.set_volume(level);
        level
    }

    pub async fn set_volume(&self, level: f32) {
        self.player.lock().await.set_volume(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::{OutputCall, RecordingOutput};
    use crate::model::content::{grid_cards, list_rows};
    use crate::model::playback::PlaybackState;

    fn tracks(prefix: &str, count: usize) -> Vec<Track> {
        (0..count)
            .map(|i| Track {
                id: format!("{prefix}{i}"),
                name: format!("{prefix} {i}"),
                artist_name: "Artist".to_string(),
                album_image: format!("https://img/{prefix}/{i}"),
                audio: Some(format!("https://audio/{prefix}/{i}")),
                duration: Some(200),
            })
            .collect()
    }

    fn model() -> (AppModel, RecordingOutput) {
        let output = RecordingOutput::default();
        let player = PlaybackController::new(Box::new(output.clone()));
        (AppModel::new(player), output)
    }

    #[tokio::test]
    async fn popular_grid_entry_plays_its_track() {
        let (model, output) = model();
        let popular = tracks("popular", 12);
        model.apply_popular(popular.clone()).await;

        let content = model.get_content_state().await;
        assert_eq!(grid_cards(&content.home).len(), 12);

        model.play_from_home(5).await.unwrap();
        let info = model.get_playback_info().await;
        assert_eq!(info.current_index, 5);
        assert_eq!(info.state, PlaybackState::Playing);
        assert_eq!(info.now_playing.unwrap().name, "popular 5");
        assert_eq!(
            output.calls(),
            vec![
                OutputCall::Load("https://audio/popular/5".to_string()),
                OutputCall::Play
            ]
        );
    }

    #[tokio::test]
    async fn popular_only_seeds_an_empty_playback_list() {
        let (model, _output) = model();
        model.apply_popular(tracks("first", 3)).await;
        model.apply_popular(tracks("second", 3)).await;

        let playback = model.playback_tracks().await;
        assert_eq!(playback[0].name, "first 0");
        assert_eq!(model.get_content_state().await.home[0].name, "second 0");
    }

    #[tokio::test]
    async fn empty_search_keeps_current_list() {
        let (model, _output) = model();
        model.apply_popular(tracks("popular", 12)).await;

        model.begin_search("jazz").await;
        assert_eq!(
            model.get_content_state().await.search.placeholder(),
            Some("Searching...")
        );

        model.apply_search_results("jazz", Vec::new()).await;
        let content = model.get_content_state().await;
        assert_eq!(content.search.placeholder(), Some("No results found."));
        assert!(list_rows(content.search.tracks()).is_empty());
        assert_eq!(model.playback_tracks().await, tracks("popular", 12));
    }

    #[tokio::test]
    async fn failed_search_drops_previous_results() {
        let (model, _output) = model();
        model.apply_search_results("rock", tracks("rock", 4)).await;

        model.begin_search("jazz").await;
        model.fail_search().await;

        let content = model.get_content_state().await;
        assert_eq!(content.search, SearchView::Idle);
        assert!(content.search.tracks().is_empty());
        assert_eq!(model.playback_tracks().await, tracks("rock", 4));
    }

    #[tokio::test]
    async fn search_results_become_the_playback_list() {
        let (model, _output) = model();
        model.apply_popular(tracks("popular", 12)).await;
        model.begin_search("rock").await;
        model.apply_search_results("rock", tracks("rock", 4)).await;

        assert_eq!(model.playback_tracks().await, tracks("rock", 4));
        let ui = model.get_ui_state().await;
        assert_eq!(ui.active_section, ActiveSection::Search);
        assert!(!ui.search_editing);

        model.play_from_search(3).await.unwrap();
        let info = model.get_playback_info().await;
        assert_eq!(info.now_playing.unwrap().name, "rock 3");
    }

    #[tokio::test]
    async fn auth_errors_open_the_settings_editor() {
        let (model, _output) = model();
        let error = CatalogError::Auth {
            message: "Invalid client id".to_string(),
        };
        model.show_catalog_error(&error, "841052ed").await;

        let ui = model.get_ui_state().await;
        assert_eq!(ui.error_message.as_deref(), Some("Error: Invalid client id"));
        assert_eq!(ui.settings_editor.unwrap().input, "841052ed");
    }

    #[tokio::test]
    async fn other_errors_only_show_the_banner() {
        let (model, _output) = model();
        let error = CatalogError::Api {
            code: Some(6),
            message: "Rate limit exceeded".to_string(),
        };
        model.show_catalog_error(&error, "841052ed").await;

        let ui = model.get_ui_state().await;
        assert_eq!(ui.error_message.as_deref(), Some("Error: Rate limit exceeded"));
        assert!(ui.settings_editor.is_none());

        model.begin_popular_fetch().await;
        assert!(!model.has_error().await);
    }

    #[tokio::test]
    async fn grid_selection_moves_by_rows_and_clamps() {
        let (model, _output) = model();
        model.apply_popular(tracks("popular", 10)).await;

        model.move_grid_selection(0, 1).await;
        assert_eq!(model.get_ui_state().await.grid_selected, GRID_COLUMNS);
        model.move_grid_selection(0, 5).await;
        assert_eq!(model.get_ui_state().await.grid_selected, 9);
        model.move_grid_selection(-20, 0).await;
        assert_eq!(model.get_ui_state().await.grid_selected, 0);
    }

    #[tokio::test]
    async fn volume_control_stays_in_range() {
        let (model, output) = model();
        assert_eq!(model.adjust_volume(0.1).await, 1.0);
        model.set_volume(0.02).await;
        assert_eq!(model.adjust_volume(-0.05).await, 0.0);
        assert_eq!(output.calls().last(), Some(&OutputCall::SetVolume(0.0)));
    }

    #[tokio::test]
    async fn seek_by_stays_within_seek_range() {
        let (model, output) = model();
        model.apply_popular(tracks("popular", 1)).await;
        model.play_from_home(0).await.unwrap();
        output.clear();

        // No duration reported yet.
        model.seek_by(5).await;
        assert!(output.calls().is_empty());

        model
            .on_time_update(Duration::from_secs(198), Some(Duration::from_millis(200_500)))
            .await;
        model.seek_by(5).await;
        assert_eq!(output.calls(), vec![OutputCall::Seek(Duration::from_secs(200))]);
    }
}
