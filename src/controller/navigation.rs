//! Navigation-related controller methods (sections, catalog fetches, settings, downloads)

use crate::model::{ActiveSection, DownloadStatus, download_link};
use super::AppController;

impl AppController {
    pub async fn show_section(&self, section: ActiveSection) {
        self.model.show_section(section).await;
    }

    /// Fetch the popular listing in the background.
    pub fn spawn_popular_fetch(&self) {
        let controller = self.clone();
        tokio::spawn(async move {
            controller.fetch_popular().await;
        });
    }

    pub async fn fetch_popular(&self) {
        self.model.begin_popular_fetch().await;
        let credential = self.credential().await;

        match self.catalog.fetch_popular(&credential).await {
            Ok(tracks) => {
                tracing::info!(tracks = tracks.len(), "Popular tracks loaded");
                self.model.apply_popular(tracks).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching popular tracks");
                self.model.fail_popular_fetch().await;
                self.model.show_catalog_error(&e, &credential).await;
            }
        }
    }

    /// Run a search in the background. Empty queries are ignored.
    pub fn spawn_search(&self, query: String) {
        if query.is_empty() {
            return;
        }
        let controller = self.clone();
        tokio::spawn(async move {
            controller.perform_search(&query).await;
        });
    }

    pub async fn perform_search(&self, query: &str) {
        tracing::debug!(query, "Performing search");
        self.model.begin_search(query).await;
        let credential = self.credential().await;

        match self.catalog.search(&credential, query).await {
            Ok(tracks) => {
                tracing::info!(query, tracks = tracks.len(), "Search completed successfully");
                self.model.apply_search_results(query, tracks).await;
            }
            Err(e) => {
                tracing::error!(query, error = %e, "Search failed");
                self.model.fail_search().await;
                self.model.show_catalog_error(&e, &credential).await;
            }
        }
    }

    pub async fn open_settings(&self) {
        let credential = self.credential().await;
        self.model.open_settings(&credential).await;
    }

    /// Save the credential typed into the settings editor and reload the
    /// home listing with it. Blank input keeps the editor open.
    pub async fn save_settings(&self) {
        let Some(input) = self.model.settings_input().await else {
            return;
        };

        let saved = self.settings.lock().await.set(&input);
        match saved {
            Ok(true) => {
                self.model.close_settings().await;
                self.spawn_popular_fetch();
            }
            Ok(false) => {}
            Err(e) => {
                tracing::error!(error = %e, "Could not persist client id");
                self.model.set_error(format!("Error: {e}")).await;
            }
        }
    }

    /// Hand the download link to the system opener. Nothing is read back
    /// from the endpoint, so the status is optimistic.
    pub async fn submit_download(&self) {
        let input = self.model.get_ui_state().await.download_input.trim().to_string();
        if input.is_empty() {
            self.model.set_download_status(DownloadStatus::MissingUrl).await;
            return;
        }

        let link = match download_link(&self.config.download_server, &input) {
            Ok(link) => link,
            Err(e) => {
                tracing::error!(error = %e, "Could not build download link");
                self.model.set_error(format!("Error: {e}")).await;
                return;
            }
        };

        tracing::info!(url = %input, link = %link, "Opening download link");
        if let Err(e) = open::that(link.as_str()) {
            tracing::error!(error = %e, "Failed to open download link");
            self.model
                .set_error(format!("Error: could not open {link}: {e}"))
                .await;
            return;
        }

        self.model
            .set_download_status(DownloadStatus::Started { url: input })
            .await;
    }
}
