// ABOUTME: Background heart-rate polling task publishing snapshots through a watch channel
// ABOUTME: Polls on a fixed interval independently of frame delivery and stops on shutdown or drop
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::source::HeartRateSource;
use super::tracker::{HeartRateSnapshot, LastValidHeartRate};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

/// Handle to a running poll loop
///
/// Readers call [`HeartRatePoller::latest`] whenever they need a value; the
/// loop never waits on them.
#[derive(Debug)]
pub struct HeartRatePoller {
    snapshots: watch::Receiver<HeartRateSnapshot>,
    shutdown_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl HeartRatePoller {
    /// Start polling `source` every `interval`
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        source: Arc<dyn HeartRateSource>,
        interval: Duration,
        warning_threshold: u32,
    ) -> Self {
        let (snapshot_tx, snapshots) = watch::channel(HeartRateSnapshot::default());
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let handle = tokio::spawn(async move {
            let mut tracker = LastValidHeartRate::new(warning_threshold);
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(interval_ms = interval.as_millis(), "heart-rate polling started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let result = source.fetch().await;
                        let snapshot = tracker.apply(&result);
                        if snapshot_tx.send(snapshot).is_err() {
                            debug!("heart-rate readers gone");
                            break;
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        debug!("heart-rate poller received shutdown signal");
                        break;
                    }
                }
            }
            info!("heart-rate polling stopped");
        });

        Self {
            snapshots,
            shutdown_tx,
            handle,
        }
    }

    /// Most recent snapshot
    #[must_use]
    pub fn latest(&self) -> HeartRateSnapshot {
        *self.snapshots.borrow()
    }

    /// A receiver for callers that want to await new snapshots
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<HeartRateSnapshot> {
        self.snapshots.clone()
    }

    /// Stop polling and wait for the task to exit
    pub async fn shutdown(self) {
        // A full channel or a finished task both mean the loop is stopping
        let _ = self.shutdown_tx.try_send(());
        let _ = self.handle.await;
    }
}
