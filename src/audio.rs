//! Audio output: a single rodio sink driven from a dedicated thread.
//!
//! The rest of the app only sees [`AudioOutput`]; stream bytes are fetched
//! over HTTP on the tokio runtime and handed to the playback thread once
//! complete. Position, duration and end-of-track are reported back on a
//! broadcast channel as [`OutputEvent`]s.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rodio::Source as _;

pub const DEFAULT_VOLUME: f32 = 1.0;

const POSITION_UPDATE_INTERVAL: Duration = Duration::from_millis(250);
const EVENT_CHANNEL_CAPACITY: usize = 100;

/// The playback capability the player drives.
pub trait AudioOutput: Send {
    /// Replace the current source and return its generation. Nothing is
    /// audible until `play`.
    fn load(&mut self, source: &str) -> u64;
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position: Duration);
    fn set_volume(&mut self, level: f32);
}

#[derive(Debug, Clone)]
pub enum OutputEvent {
    TimeUpdate {
        position: Duration,
        duration: Option<Duration>,
    },
    /// The source loaded as `generation` played to the end
    Ended { generation: u64 },
    Error(String),
}

pub type OutputEventRx = tokio::sync::broadcast::Receiver<OutputEvent>;

#[derive(Debug)]
enum Command {
    Load { generation: u64 },
    SourceReady { generation: u64, data: Vec<u8> },
    Play,
    Pause,
    Seek(Duration),
    SetVolume(f32),
}

pub struct AudioBackend {
    command_tx: std::sync::mpsc::Sender<Command>,
    event_tx: tokio::sync::broadcast::Sender<OutputEvent>,
    generation: Arc<AtomicU64>,
    http: reqwest::Client,
    _thread_handle: std::thread::JoinHandle<()>,
}

impl AudioBackend {
    pub fn new(http: reqwest::Client) -> Self {
        let (command_tx, command_rx) = std::sync::mpsc::channel::<Command>();
        let (event_tx, _) = tokio::sync::broadcast::channel::<OutputEvent>(EVENT_CHANNEL_CAPACITY);

        let thread_events = event_tx.clone();
        let thread_handle = std::thread::spawn(move || {
            run(command_rx, thread_events);
        });

        Self {
            command_tx,
            event_tx,
            generation: Arc::new(AtomicU64::new(0)),
            http,
            _thread_handle: thread_handle,
        }
    }

    pub fn subscribe(&self) -> OutputEventRx {
        self.event_tx.subscribe()
    }

    fn send(&self, command: Command) {
        if self.command_tx.send(command).is_err() {
            tracing::warn!("Playback thread is gone, dropping command");
        }
    }
}

impl AudioOutput for AudioBackend {
    fn load(&mut self, source: &str) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.send(Command::Load { generation });

        let http = self.http.clone();
        let command_tx = self.command_tx.clone();
        let event_tx = self.event_tx.clone();
        let latest = self.generation.clone();
        let url = source.to_string();

        tokio::spawn(async move {
            tracing::debug!(url = %url, generation, "Fetching stream");
            let result = fetch_stream(&http, &url).await;
            deliver_stream(result, generation, &latest, &command_tx, &event_tx);
        });

        generation
    }

    fn play(&mut self) {
        self.send(Command::Play);
    }

    fn pause(&mut self) {
        self.send(Command::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.send(Command::Seek(position));
    }

    fn set_volume(&mut self, level: f32) {
        self.send(Command::SetVolume(level));
    }
}

async fn fetch_stream(http: &reqwest::Client, url: &str) -> reqwest::Result<Vec<u8>> {
    let response = http.get(url).send().await?.error_for_status()?;
    Ok(response.bytes().await?.into())
}

/// Hand fetched bytes to the playback thread, or report the failure. Both
/// are dropped once a newer load has started.
fn deliver_stream<E: std::fmt::Display>(
    result: Result<Vec<u8>, E>,
    generation: u64,
    latest: &AtomicU64,
    command_tx: &std::sync::mpsc::Sender<Command>,
    event_tx: &tokio::sync::broadcast::Sender<OutputEvent>,
) {
    if latest.load(Ordering::SeqCst) != generation {
        match result {
            Ok(_) => tracing::debug!(generation, "Stream superseded before it arrived"),
            Err(e) => tracing::debug!(generation, error = %e, "Superseded stream failed"),
        }
        return;
    }

    match result {
        Ok(data) => {
            let _ = command_tx.send(Command::SourceReady { generation, data });
        }
        Err(e) => {
            tracing::error!(generation, error = %e, "Stream fetch failed");
            let _ = event_tx.send(OutputEvent::Error(format!("Playback error: {e}")));
        }
    }
}

fn build_decoder(
    data: Vec<u8>,
) -> Result<rodio::decoder::Decoder<std::io::Cursor<Vec<u8>>>, rodio::decoder::DecoderError> {
    rodio::decoder::DecoderBuilder::new()
        .with_byte_len(data.len() as u64)
        .with_data(std::io::Cursor::new(data))
        .build()
}

fn run(
    command_rx: std::sync::mpsc::Receiver<Command>,
    event_tx: tokio::sync::broadcast::Sender<OutputEvent>,
) {
    let stream_handle = match rodio::OutputStreamBuilder::open_default_stream() {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(error = %e, "Could not open audio output");
            let _ = event_tx.send(OutputEvent::Error(format!("Audio init failed: {e}")));
            return;
        }
    };
    let sink = rodio::Sink::connect_new(stream_handle.mixer());
    sink.set_volume(DEFAULT_VOLUME);

    let mut current_generation = 0;
    let mut wants_playing = false;
    let mut has_source = false;
    let mut duration: Option<Duration> = None;
    let mut last_position_update = Instant::now();

    loop {
        loop {
            match command_rx.try_recv() {
                Ok(Command::Load { generation }) => {
                    sink.clear();
                    current_generation = generation;
                    has_source = false;
                    duration = None;
                }
                Ok(Command::SourceReady { generation, data }) => {
                    if generation != current_generation {
                        continue;
                    }
                    match build_decoder(data) {
                        Ok(decoder) => {
                            duration = decoder.total_duration();
                            sink.append(decoder);
                            has_source = true;
                            if wants_playing {
                                sink.play();
                            }
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Could not decode stream");
                            let _ = event_tx
                                .send(OutputEvent::Error(format!("Playback error: {e}")));
                        }
                    }
                }
                Ok(Command::Play) => {
                    wants_playing = true;
                    sink.play();
                }
                Ok(Command::Pause) => {
                    wants_playing = false;
                    sink.pause();
                }
                Ok(Command::Seek(position)) => {
                    if let Err(e) = sink.try_seek(position) {
                        tracing::warn!("Failed to seek to position {position:?}: {e}");
                    }
                }
                Ok(Command::SetVolume(level)) => sink.set_volume(level),
                Err(std::sync::mpsc::TryRecvError::Empty) => break,
                Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                    tracing::debug!("Playback thread shutting down");
                    return;
                }
            }
        }

        if has_source && sink.empty() {
            has_source = false;
            let _ = event_tx.send(OutputEvent::Ended {
                generation: current_generation,
            });
        }

        let now = Instant::now();
        if now.duration_since(last_position_update) >= POSITION_UPDATE_INTERVAL {
            last_position_update = now;
            if has_source && !sink.is_paused() {
                let _ = event_tx.send(OutputEvent::TimeUpdate {
                    position: sink.get_pos(),
                    duration,
                });
            }
        }

        std::thread::sleep(Duration::from_millis(10));
    }
}
