//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! coordinates between the model and view, and drives the catalog client and
//! the player. It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `playback`: Playback control methods
//! - `navigation`: Sections, catalog fetches, settings and downloads
//! - `player_events`: Audio output event listener

mod input;
mod playback;
mod navigation;
mod player_events;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::model::{AppModel, CatalogClient, PlaybackError};
use crate::settings::SettingsStore;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<AppModel>,
    pub(crate) catalog: CatalogClient,
    pub(crate) settings: Arc<Mutex<SettingsStore>>,
    pub(crate) config: Arc<Config>,
}

impl AppController {
    pub fn new(
        model: Arc<AppModel>,
        catalog: CatalogClient,
        settings: SettingsStore,
        config: Config,
    ) -> Self {
        Self {
            model,
            catalog,
            settings: Arc::new(Mutex::new(settings)),
            config: Arc::new(config),
        }
    }

    pub(crate) async fn credential(&self) -> String {
        self.settings.lock().await.get().to_string()
    }

    /// Missing streams get a blocking alert rather than the error banner.
    pub(crate) async fn report_playback(&self, result: Result<(), PlaybackError>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "Playback request failed");
            self.model.show_alert(e.to_string()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;
    use crate::audio::testing::{OutputCall, RecordingOutput};
    use crate::model::{ActiveSection, DownloadStatus, PlaybackController, PlaybackState, SearchView};
    use crate::settings::{CREDENTIAL_KEY, MemoryStorage, Storage};

    // Nothing listens here, so catalog requests fail straight away
    const UNREACHABLE_API: &str = "http://127.0.0.1:9";

    const SILENT_THEN_PLAYABLE: &str = r#"[
        {"id": "1", "name": "Silent", "artist_name": "A", "album_image": "https://img/1"},
        {"id": "2", "name": "Song", "artist_name": "B", "album_image": "https://img/2",
         "audio": "https://audio/2"}
    ]"#;

    fn controller() -> (AppController, RecordingOutput, MemoryStorage) {
        let output = RecordingOutput::default();
        let player = PlaybackController::new(Box::new(output.clone()));
        let model = Arc::new(AppModel::new(player));
        let catalog = CatalogClient::new(reqwest::Client::new(), UNREACHABLE_API);
        let storage = MemoryStorage::default();
        let settings = SettingsStore::load(Box::new(storage.clone()));
        let controller = AppController::new(model, catalog, settings, Config::default());
        (controller, output, storage)
    }

    async fn press(controller: &AppController, code: KeyCode) {
        controller
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .await
            .unwrap();
    }

    async fn clear_settings_input(controller: &AppController) {
        while controller
            .model
            .settings_input()
            .await
            .is_some_and(|input| !input.is_empty())
        {
            press(controller, KeyCode::Backspace).await;
        }
    }

    #[tokio::test]
    async fn missing_stream_blocks_input_until_acknowledged() {
        let (controller, output, _storage) = controller();
        controller
            .model
            .apply_popular(serde_json::from_str(SILENT_THEN_PLAYABLE).unwrap())
            .await;

        controller.play_grid_entry(0).await;
        assert_eq!(
            controller.model.get_ui_state().await.alert.as_deref(),
            Some("No audio stream available for this track.")
        );

        // Swallowed while the alert is up
        press(&controller, KeyCode::Char('n')).await;
        assert!(output.calls().is_empty());
        assert_eq!(controller.model.get_playback_info().await.state, PlaybackState::Unloaded);

        press(&controller, KeyCode::Enter).await;
        assert!(!controller.model.has_alert().await);

        press(&controller, KeyCode::Char('n')).await;
        assert_eq!(
            output.calls(),
            vec![OutputCall::Load("https://audio/2".to_string()), OutputCall::Play]
        );
    }

    #[tokio::test]
    async fn blank_client_id_keeps_editor_open() {
        let (controller, _output, storage) = controller();
        controller.open_settings().await;
        clear_settings_input(&controller).await;
        press(&controller, KeyCode::Char(' ')).await;

        press(&controller, KeyCode::Enter).await;

        assert!(controller.model.is_settings_open().await);
        assert_eq!(storage.get(CREDENTIAL_KEY), None);
    }

    #[tokio::test]
    async fn saving_client_id_closes_editor_and_reloads_home() {
        let (controller, _output, storage) = controller();
        controller.open_settings().await;
        clear_settings_input(&controller).await;
        for c in "feedbeef".chars() {
            press(&controller, KeyCode::Char(c)).await;
        }

        press(&controller, KeyCode::Enter).await;

        assert!(!controller.model.is_settings_open().await);
        assert_eq!(controller.credential().await, "feedbeef");
        assert_eq!(storage.get(CREDENTIAL_KEY).as_deref(), Some("feedbeef"));

        // The reload runs in the background; it starts loading, then fails
        // against the unreachable catalog.
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let loading = controller.model.get_content_state().await.home_loading;
                if loading || controller.model.has_error().await {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn empty_download_url_asks_for_one() {
        let (controller, _output, _storage) = controller();
        controller.show_section(ActiveSection::Download).await;

        press(&controller, KeyCode::Enter).await;
        assert_eq!(
            controller.model.get_ui_state().await.download_status,
            Some(DownloadStatus::MissingUrl)
        );

        press(&controller, KeyCode::Char(' ')).await;
        press(&controller, KeyCode::Enter).await;
        assert_eq!(
            controller.model.get_ui_state().await.download_status,
            Some(DownloadStatus::MissingUrl)
        );
    }

    #[tokio::test]
    async fn failed_search_clears_the_listing() {
        let (controller, _output, _storage) = controller();
        controller
            .model
            .apply_search_results("rock", serde_json::from_str(SILENT_THEN_PLAYABLE).unwrap())
            .await;

        controller.perform_search("jazz").await;

        assert_eq!(controller.model.get_content_state().await.search, SearchView::Idle);
        assert!(
            controller
                .model
                .get_ui_state()
                .await
                .error_message
                .is_some_and(|message| message.starts_with("Error: "))
        );
        assert_eq!(controller.model.get_playback_info().await.track_count, 2);
    }
}
