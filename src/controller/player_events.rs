//! Audio output event listener

use tokio::sync::broadcast::error::RecvError;

use crate::audio::{OutputEvent, OutputEventRx};
use super::AppController;

impl AppController {
    pub fn start_player_event_listener(&self, mut events: OutputEventRx) {
        let controller = self.clone();
        tracing::info!("Starting audio output event listener");

        tokio::spawn(async move {
            loop {
                let event = match events.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::trace!(skipped, "Output events lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                if controller.model.should_quit().await {
                    tracing::debug!("Output event listener shutting down");
                    break;
                }

                match event {
                    OutputEvent::TimeUpdate { position, duration } => {
                        controller.model.on_time_update(position, duration).await;
                    }
                    OutputEvent::Ended { generation } => {
                        tracing::debug!(generation, "OutputEvent::Ended");
                        let result = controller.model.on_track_ended(generation).await;
                        controller.report_playback(result).await;
                    }
                    OutputEvent::Error(message) => {
                        tracing::error!(error = %message, "Audio output error");
                        controller.model.set_error(message).await;
                    }
                }
            }
        });
    }
}
