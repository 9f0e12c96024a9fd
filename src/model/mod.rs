//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (sections, UI state, overlays)
//! - `track`: Track records returned by the catalog
//! - `catalog`: Jamendo catalog API client
//! - `playback`: Playback controller (track list, index, play/pause state)
//! - `content`: Content state and track list view models
//! - `download`: Download endpoint links
//! - `app_model`: Main application model with state management methods

mod types;
mod track;
mod catalog;
mod playback;
mod content;
mod download;
mod app_model;

// Re-export all public types for convenient access
pub use types::{ActiveSection, DownloadStatus, NAV_ITEMS, UiState};

pub use catalog::CatalogClient;

pub use playback::{PlaybackController, PlaybackError, PlaybackInfo, PlaybackState};

pub use content::{ContentState, SearchView, TrackCard, TrackRow, grid_cards, list_rows};

pub use download::download_link;

pub use app_model::{AppModel, GRID_COLUMNS};
