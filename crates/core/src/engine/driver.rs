//! Periodic tick driver.
//!
//! Runs the coordinator's telemetry loop as a background task: one tick per
//! interval, player error events interleaved on the same loop so recovery
//! actions never overlap.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, Mutex};
use tracing::{info, warn};

use crate::monitor::PlayerErrorCategory;

use super::coordinator::PlaybackCoordinator;

/// Drives a coordinator's tick loop.
pub struct TickDriver {
    coordinator: Arc<Mutex<PlaybackCoordinator>>,
    tick_interval: Duration,
    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
}

impl TickDriver {
    pub fn new(coordinator: Arc<Mutex<PlaybackCoordinator>>, tick_interval: Duration) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            coordinator,
            tick_interval,
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
        }
    }

    pub fn coordinator(&self) -> Arc<Mutex<PlaybackCoordinator>> {
        Arc::clone(&self.coordinator)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Start the tick loop (spawns a background task).
    ///
    /// `error_rx` is the player's asynchronous error event channel.
    pub fn start(&self, mut error_rx: mpsc::UnboundedReceiver<PlayerErrorCategory>) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("tick driver already running");
            return;
        }

        let coordinator = Arc::clone(&self.coordinator);
        let running = Arc::clone(&self.running);
        let tick_interval = self.tick_interval;
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            info!("tick driver started");
            let mut interval = tokio::time::interval(tick_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("tick driver received shutdown signal");
                        break;
                    }
                    maybe_error = error_rx.recv() => {
                        match maybe_error {
                            Some(category) => {
                                coordinator.lock().await.handle_player_error(category).await;
                            }
                            None => {
                                info!("player error channel closed");
                                break;
                            }
                        }
                    }
                    _ = interval.tick() => {
                        if !running.load(Ordering::Relaxed) {
                            break;
                        }
                        coordinator.lock().await.tick().await;
                    }
                }
            }
            running.store(false, Ordering::SeqCst);
            info!("tick driver stopped");
        });
    }

    /// Stop the tick loop.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        let _ = self.shutdown_tx.send(());
    }
}
