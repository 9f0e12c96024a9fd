//! Playback control methods

use super::AppController;

const SEEK_STEP_SECS: i64 = 5;
const VOLUME_STEP: f32 = 0.05;

impl AppController {
    pub async fn play_grid_entry(&self, index: usize) {
        let result = self.model.play_from_home(index).await;
        self.report_playback(result).await;
    }

    pub async fn play_list_entry(&self, index: usize) {
        let result = self.model.play_from_search(index).await;
        self.report_playback(result).await;
    }

    pub async fn toggle_playback(&self) {
        self.model.toggle_play_pause().await;
    }

    pub async fn next_track(&self) {
        tracing::debug!("Skipping to next track");
        let result = self.model.next_track().await;
        self.report_playback(result).await;
    }

    pub async fn previous_track(&self) {
        tracing::debug!("Skipping to previous track");
        let result = self.model.previous_track().await;
        self.report_playback(result).await;
    }

    pub async fn seek_forward(&self) {
        self.model.seek_by(SEEK_STEP_SECS).await;
    }

    pub async fn seek_backward(&self) {
        self.model.seek_by(-SEEK_STEP_SECS).await;
    }

    pub async fn volume_up(&self) {
        let level = self.model.adjust_volume(VOLUME_STEP).await;
        tracing::debug!(level, "Volume up");
    }

    pub async fn volume_down(&self) {
        let level = self.model.adjust_volume(-VOLUME_STEP).await;
        tracing::debug!(level, "Volume down");
    }
}
