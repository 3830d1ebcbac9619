use crate::common::{Binding, BusError, Delivery, MessageBus, RoutingPattern, Subscription};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;

struct BoundQueue {
    patterns: Vec<RoutingPattern>,
    queue: mpsc::UnboundedSender<Delivery>,
}

impl BoundQueue {
    fn accepts(&self, routing_key: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(routing_key))
    }
}

/// Process-local topic exchange.
///
/// Every `subscribe_all` call gets its own queue, so two subscribers with
/// overlapping patterns both receive a matching message. A queue bound on
/// several exchanges sees their messages in publish order, since publishing
/// holds the exchange table lock. Messages published
/// with no matching binding are discarded, as on a real topic exchange.
#[derive(Default)]
pub struct InMemoryBus {
    exchanges: Mutex<HashMap<String, Vec<BoundQueue>>>,
    offline: AtomicBool,
}

impl InMemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an unreachable broker: publishes fail until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn binding_count(&self, exchange: &str) -> usize {
        self.exchanges
            .lock()
            .map(|exchanges| exchanges.get(exchange).map(Vec::len).unwrap_or(0))
            .unwrap_or(0)
    }
}

#[async_trait]
impl MessageBus for InMemoryBus {
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        payload: Vec<u8>,
    ) -> Result<(), BusError> {
        let publish_error = |reason: &str| BusError::Publish {
            exchange: exchange.to_string(),
            routing_key: routing_key.to_string(),
            reason: reason.to_string(),
        };

        if self.offline.load(Ordering::SeqCst) {
            return Err(publish_error("bus is offline"));
        }

        let mut exchanges = self
            .exchanges
            .lock()
            .map_err(|_| publish_error("exchange table poisoned"))?;

        if let Some(bindings) = exchanges.get_mut(exchange) {
            // Queues whose subscriber went away are unbound here.
            bindings.retain(|binding| {
                if !binding.accepts(routing_key) {
                    return !binding.queue.is_closed();
                }
                binding
                    .queue
                    .send(Delivery::new(exchange, routing_key, payload.clone()))
                    .is_ok()
            });
        }
        Ok(())
    }

    async fn subscribe_all(&self, bindings: &[Binding]) -> Result<Subscription, BusError> {
        let (queue, receiver) = mpsc::unbounded_channel();
        let mut exchanges = self.exchanges.lock().map_err(|_| BusError::Subscribe {
            exchange: bindings
                .iter()
                .map(|b| b.exchange.as_str())
                .collect::<Vec<_>>()
                .join(","),
            reason: "exchange table poisoned".to_string(),
        })?;

        for binding in bindings {
            exchanges
                .entry(binding.exchange.clone())
                .or_default()
                .push(BoundQueue {
                    patterns: binding.patterns.iter().map(|p| RoutingPattern::parse(p)).collect(),
                    queue: queue.clone(),
                });
        }

        Ok(Subscription::new(receiver))
    }
}
