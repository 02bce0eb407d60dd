//! Command Emitter
//!
//! Samples the translator on a fixed cadence and queues the resulting
//! command for the transport worker. Never waits on the transport.

use crate::domain::translator::SharedTranslator;
use crate::infrastructure::bluetooth::outbound::{DispatchOutcome, OutboundSender};
use crate::infrastructure::bluetooth::ConnectionState;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{error, info, trace, warn};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(250);

pub struct CommandEmitter {
    translator: SharedTranslator,
    connection: ConnectionState,
    outbound: OutboundSender,
    interval: Duration,
}

impl CommandEmitter {
    pub fn new(
        translator: SharedTranslator,
        connection: ConnectionState,
        outbound: OutboundSender,
        interval: Duration,
    ) -> Self {
        Self {
            translator,
            connection,
            outbound,
            interval: if interval.is_zero() {
                DEFAULT_TICK_INTERVAL
            } else {
                interval
            },
        }
    }

    /// Build and queue this tick's command. Returns the queued text.
    pub fn tick(&self) -> Option<String> {
        let connected = self.connection.is_connected();
        let command = match self.translator.lock() {
            Ok(translator) => translator.tick(connected)?,
            Err(_) => {
                error!("Translator lock poisoned, skipping tick");
                return None;
            }
        };

        let message = command.to_string();
        trace!("Tick: {}", message);
        match self.outbound.dispatch(message.clone()) {
            DispatchOutcome::Queued => Some(message),
            DispatchOutcome::Dropped => {
                warn!(
                    "Link is falling behind, {} commands dropped so far",
                    self.outbound.dropped_count()
                );
                None
            }
            DispatchOutcome::Closed => None,
        }
    }

    /// Tick until the outbound queue closes. The first tick fires one
    /// interval after start.
    pub async fn run(self) {
        info!("Command emitter started ({:?} cadence)", self.interval);
        let mut interval = time::interval_at(Instant::now() + self.interval, self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            self.tick();
            if self.outbound.is_closed() {
                info!(
                    "Outbound queue closed, stopping emitter ({} commands dropped)",
                    self.outbound.dropped_count()
                );
                break;
            }
        }
    }
}
