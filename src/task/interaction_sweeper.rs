//! Periodic expiry of timed-out interactions.

use std::sync::Arc;

use log::debug;
use log::info;
use log::warn;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio::time::interval;

use crate::interaction::InteractionEngine;
use crate::interaction::MessageSink;
use crate::interaction::apply_render;

/// Removes expired interactions and clears their reactions.
pub struct InteractionSweeper {
    engine: Arc<InteractionEngine>,
    sink: Arc<dyn MessageSink>,
    period: Duration,
}

impl InteractionSweeper {
    pub fn new(engine: Arc<InteractionEngine>, sink: Arc<dyn MessageSink>, period: Duration) -> Self {
        Self {
            engine,
            sink,
            period,
        }
    }

    /// Runs one sweep and returns how many interactions expired.
    pub async fn sweep(&self) -> usize {
        let expired = self.engine.expire_if_timed_out(self.engine.now());
        for (message, render) in &expired {
            let failed = apply_render(self.sink.as_ref(), message, render).await;
            if failed > 0 {
                warn!(
                    "Failed to clean up expired interaction on message {}",
                    message.message_id
                );
            }
        }
        if !expired.is_empty() {
            debug!("Sweeper: expired {} interactions", expired.len());
        }
        expired.len()
    }

    /// Starts sweeping in the background.
    pub fn start(self) -> JoinHandle<()> {
        info!(
            "Interaction sweeper started (interval: {}s)",
            self.period.as_secs()
        );
        tokio::spawn(async move {
            let mut interval = interval(self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                self.sweep().await;
            }
        })
    }
}
