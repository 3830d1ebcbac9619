use super::position_ingest::{IngestStats, PositionIngest};
use super::query_service::{QueryService, QueryStats};
use crate::common::{BusError, MessageBus, Subscription};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub ingest: IngestStats,
    pub queries: QueryStats,
    /// Deliveries from an exchange neither handler owns.
    pub unrouted: u64,
}

/// Single consumer for every exchange the tracker listens on.
///
/// Position updates and queries share one queue and are handled one at a
/// time in arrival order. Each delivery is finished with the board before
/// the next one is read, so a query sees every position message that
/// arrived ahead of it.
pub struct Dispatcher {
    bus: Arc<dyn MessageBus>,
    ingest: PositionIngest,
    queries: QueryService,
}

impl Dispatcher {
    pub fn new(bus: Arc<dyn MessageBus>, ingest: PositionIngest, queries: QueryService) -> Self {
        Self {
            bus,
            ingest,
            queries,
        }
    }

    pub async fn subscribe(&self) -> Result<Subscription, BusError> {
        let bindings = [self.ingest.binding(), self.queries.binding()];
        let subscription = self.bus.subscribe_all(&bindings).await?;
        for binding in &bindings {
            tracing::info!(
                "Waiting for messages on '{}' with keys {:?}",
                binding.exchange,
                binding.patterns
            );
        }
        Ok(subscription)
    }

    /// Process deliveries until the subscription closes or the board worker
    /// goes away. No single message can stop the loop.
    pub async fn run(self, mut subscription: Subscription) -> DispatchStats {
        let mut stats = DispatchStats::default();

        while let Some(delivery) = subscription.recv().await {
            let outcome = if self.ingest.accepts(&delivery) {
                self.ingest.process(&delivery, &mut stats.ingest).await
            } else if self.queries.accepts(&delivery) {
                self.queries.process(&delivery, &mut stats.queries).await
            } else {
                tracing::warn!(
                    exchange = %delivery.exchange,
                    routing_key = %delivery.routing_key,
                    "No handler for delivery"
                );
                stats.unrouted += 1;
                Ok(())
            };

            if let Err(e) = outcome {
                tracing::error!("Stopping dispatcher: {}", e);
                break;
            }
        }

        tracing::info!(
            applied = stats.ingest.applied,
            rejected = stats.ingest.rejected,
            dropped = stats.ingest.dropped,
            answered = stats.queries.answered,
            unknown = stats.queries.unknown,
            publish_failures = stats.queries.publish_failures,
            unrouted = stats.unrouted,
            "Dispatcher finished"
        );
        stats
    }
}
