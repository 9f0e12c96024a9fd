//! Playback controller: the current track list, index and play/pause state

use std::time::Duration;

use crate::audio::{AudioOutput, DEFAULT_VOLUME};
use super::track::Track;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Unloaded,
    Playing,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    NoStreamAvailable { track: String },
}

impl std::fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackError::NoStreamAvailable { .. } => {
                write!(f, "No audio stream available for this track.")
            }
        }
    }
}

impl std::error::Error for PlaybackError {}

/// Metadata shown in the transport bar
#[derive(Clone, Debug, PartialEq)]
pub struct NowPlaying {
    pub name: String,
    pub artist: String,
    pub image: String,
}

impl NowPlaying {
    fn from_track(track: &Track) -> Self {
        Self {
            name: track.name.clone(),
            artist: track.artist_name.clone(),
            image: track.album_image.clone(),
        }
    }
}

/// Elapsed/remaining display state and the seek range
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Progress {
    pub elapsed: Duration,
    pub duration: Option<Duration>,
    /// Upper bound of the seek range in whole seconds
    pub seek_max: u64,
}

impl Progress {
    pub fn remaining(&self) -> Option<Duration> {
        self.duration.map(|d| d.saturating_sub(self.elapsed))
    }

    pub fn ratio(&self) -> f64 {
        match self.duration {
            Some(d) if !d.is_zero() => (self.elapsed.as_secs_f64() / d.as_secs_f64()).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}

/// Everything the view needs to draw the transport bar
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackInfo {
    pub state: PlaybackState,
    pub now_playing: Option<NowPlaying>,
    pub progress: Progress,
    pub volume: f32,
    pub current_index: usize,
    pub track_count: usize,
}

pub struct PlaybackController {
    output: Box<dyn AudioOutput>,
    tracks: Vec<Track>,
    current_index: usize,
    state: PlaybackState,
    now_playing: Option<NowPlaying>,
    progress: Progress,
    volume: f32,
    /// Generation of the source last handed to the output
    loaded_generation: Option<u64>,
}

impl PlaybackController {
    pub fn new(output: Box<dyn AudioOutput>) -> Self {
        Self {
            output,
            tracks: Vec::new(),
            current_index: 0,
            state: PlaybackState::Unloaded,
            now_playing: None,
            progress: Progress::default(),
            volume: DEFAULT_VOLUME,
            loaded_generation: None,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    #[cfg(test)]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[cfg(test)]
    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.current_index)
    }

    #[cfg(test)]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn info(&self) -> PlaybackInfo {
        PlaybackInfo {
            state: self.state,
            now_playing: self.now_playing.clone(),
            progress: self.progress,
            volume: self.volume,
            current_index: self.current_index,
            track_count: self.tracks.len(),
        }
    }

    /// Replace the track list wholesale.
    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        if self.current_index >= self.tracks.len() {
            self.current_index = 0;
        }
    }

    /// Load the track at `index` and start it. Out-of-range indices are ignored.
    pub fn load(&mut self, index: usize) -> Result<(), PlaybackError> {
        let Some(track) = self.tracks.get(index) else {
            tracing::trace!(index, len = self.tracks.len(), "Ignoring out-of-range load");
            return Ok(());
        };

        self.current_index = index;

        let Some(url) = track.stream_url() else {
            tracing::warn!(index, track = %track.name, "Track has no audio stream");
            return Err(PlaybackError::NoStreamAvailable {
                track: track.name.clone(),
            });
        };

        tracing::info!(index, track = %track.name, artist = %track.artist_name, "Loading track");
        self.now_playing = Some(NowPlaying::from_track(track));
        self.progress = Progress::default();
        self.loaded_generation = Some(self.output.load(url));
        self.output.play();
        self.state = PlaybackState::Playing;
        Ok(())
    }

    pub fn toggle_play_pause(&mut self) {
        match self.state {
            PlaybackState::Unloaded => {}
            PlaybackState::Playing => {
                self.output.pause();
                self.state = PlaybackState::Paused;
            }
            PlaybackState::Paused => {
                self.output.play();
                self.state = PlaybackState::Playing;
            }
        }
        tracing::debug!(state = ?self.state, "Toggled playback");
    }

    pub fn next(&mut self) -> Result<(), PlaybackError> {
        if self.tracks.is_empty() {
            return Ok(());
        }
        let mut next = self.current_index + 1;
        if next >= self.tracks.len() {
            next = 0;
        }
        self.load(next)
    }

    pub fn prev(&mut self) -> Result<(), PlaybackError> {
        if self.tracks.is_empty() {
            return Ok(());
        }
        let prev = match self.current_index.checked_sub(1) {
            Some(i) => i,
            None => self.tracks.len() - 1,
        };
        self.load(prev)
    }

    pub fn on_track_ended(&mut self) -> Result<(), PlaybackError> {
        tracing::debug!(index = self.current_index, "Track ended, advancing");
        self.next()
    }

    /// End-of-source report from the output. Reports for a source that has
    /// since been replaced are dropped.
    pub fn on_output_ended(&mut self, generation: u64) -> Result<(), PlaybackError> {
        if self.loaded_generation != Some(generation) {
            tracing::debug!(generation, current = ?self.loaded_generation, "Ignoring end of superseded source");
            return Ok(());
        }
        self.on_track_ended()
    }

    pub fn seek(&mut self, position: Duration) {
        self.output.seek(position);
        self.progress.elapsed = position;
    }

    pub fn set_volume(&mut self, level: f32) {
        self.volume = level;
        self.output.set_volume(level);
    }

    /// Apply a position report from the output. Reports without a known
    /// duration leave the display untouched.
    pub fn on_time_update(&mut self, position: Duration, duration: Option<Duration>) {
        let Some(duration) = duration.filter(|d| !d.is_zero()) else {
            return;
        };
        self.progress.elapsed = position;
        self.progress.duration = Some(duration);
        self.progress.seek_max = duration.as_secs();
    }
}
