use super::Event;
use crossterm::event::{self, Event as CrosstermEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Listen for keyboard input events with graceful shutdown support
pub async fn listen(tx: mpsc::Sender<Event>, cancel: CancellationToken) {
    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                tracing::debug!("Input listener cancelled");
                break;
            }
            () = tokio::time::sleep(Duration::from_millis(50)) => {
                // Drain everything that queued up since the last poll
                while event::poll(Duration::ZERO).unwrap_or(false) {
                    let Ok(CrosstermEvent::Key(key)) = event::read() else {
                        continue;
                    };
                    // Windows reports releases too
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if tx.send(Event::Key(key)).await.is_err() {
                        return;
                    }
                }
            }
        }
    }
}
