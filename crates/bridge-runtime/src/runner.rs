//! # Relay Pump
//!
//! Drives a shared `BridgeNetwork` on a `tokio` interval: one relay tick and
//! one `pump` per interval, until shutdown is signalled.

use crate::network::BridgeNetwork;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// A network plus the task ticking its relay.
pub struct BridgeRuntime {
    network: Arc<Mutex<BridgeNetwork>>,
    tick: Duration,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl BridgeRuntime {
    /// Wrap `network`, ticking every `tick`.
    pub fn new(network: BridgeNetwork, tick: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            network: Arc::new(Mutex::new(network)),
            tick,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Shared handle to the network.
    pub fn network(&self) -> Arc<Mutex<BridgeNetwork>> {
        Arc::clone(&self.network)
    }

    /// Spawn the relay pump.
    pub fn spawn_pump(&self) -> JoinHandle<()> {
        let network = Arc::clone(&self.network);
        let mut shutdown = self.shutdown_rx.clone();
        let mut interval = tokio::time::interval(self.tick);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let report = {
                            let mut net = network.lock();
                            net.tick(1);
                            net.pump()
                        };
                        if !report.is_empty() {
                            info!(
                                applied = report.applied.len(),
                                duplicates = report.duplicates,
                                failed = report.failed.len(),
                                "[runtime] Relay pumped"
                            );
                        }
                    }
                    _ = shutdown.changed() => {
                        debug!("[runtime] Relay pump stopping");
                        break;
                    }
                }
            }
        })
    }

    /// Wait until `done` holds, checking once per tick, for at most
    /// `max_ticks` ticks. Returns whether it held.
    pub async fn wait_until<F>(&self, max_ticks: u64, done: F) -> bool
    where
        F: Fn(&BridgeNetwork) -> bool,
    {
        for _ in 0..=max_ticks {
            if done(&self.network.lock()) {
                return true;
            }
            tokio::time::sleep(self.tick).await;
        }
        false
    }

    /// Signal the pump to stop.
    pub fn shutdown(&self) {
        if self.shutdown_tx.send(true).is_err() {
            debug!("[runtime] Shutdown signalled with no pump listening");
        }
    }
}
