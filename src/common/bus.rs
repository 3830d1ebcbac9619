use crate::common::BusError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A message as handed to a subscriber by the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub exchange: String,
    pub routing_key: String,
    pub payload: Vec<u8>,
}

impl Delivery {
    pub fn new(exchange: &str, routing_key: &str, payload: Vec<u8>) -> Self {
        Self {
            exchange: exchange.to_string(),
            routing_key: routing_key.to_string(),
            payload,
        }
    }
}

/// Receiving end of a queue bound to an exchange.
///
/// Deliveries come out in the order the bus accepted them. Messages are
/// considered acknowledged as soon as they land here, so anything still
/// queued when the subscription is dropped is lost.
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<Delivery>,
    pump: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn new(receiver: mpsc::UnboundedReceiver<Delivery>) -> Self {
        Self {
            receiver,
            pump: None,
        }
    }

    /// Subscription fed by a background task that is aborted on drop.
    pub fn with_pump(receiver: mpsc::UnboundedReceiver<Delivery>, pump: JoinHandle<()>) -> Self {
        Self {
            receiver,
            pump: Some(pump),
        }
    }

    /// Next delivery, or `None` once the bus side has gone away.
    pub async fn recv(&mut self) -> Option<Delivery> {
        self.receiver.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }
}

/// One exchange plus the patterns a queue is bound to it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub exchange: String,
    pub patterns: Vec<String>,
}

impl Binding {
    pub fn new(exchange: &str, patterns: &[&str]) -> Self {
        Self {
            exchange: exchange.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Port for topic-routed publish/subscribe transports.
#[async_trait]
pub trait MessageBus: Send + Sync {
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        payload: Vec<u8>,
    ) -> Result<(), BusError>;

    /// Bind one fresh private queue under every binding in `bindings`.
    ///
    /// Deliveries from all of them come out of the returned subscription in
    /// the order the bus accepted them.
    async fn subscribe_all(&self, bindings: &[Binding]) -> Result<Subscription, BusError>;

    /// Bind a fresh private queue to `exchange` with every pattern in `patterns`.
    async fn subscribe(&self, exchange: &str, patterns: &[&str]) -> Result<Subscription, BusError> {
        self.subscribe_all(&[Binding::new(exchange, patterns)]).await
    }
}
