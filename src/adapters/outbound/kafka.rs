use crate::common::{
    matches_any, Binding, BusError, Delivery, MessageBus, RoutingPattern, Subscription,
};
use crate::config::BusConfig;
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::Message;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;

/// Topic-exchange semantics on top of Kafka.
///
/// Each exchange is a Kafka topic and the routing key travels as the record
/// key. Brokers cannot filter on keys, so binding patterns are applied on
/// the consumer side. Every subscription joins a fresh consumer group, which
/// gives it a private copy of the stream like an anonymous queue would.
/// Offsets are auto-committed, so delivery is at-most-once.
///
/// A subscription binding several exchanges reads all of their topics from
/// one consumer. Kafka orders records per partition only, so messages on
/// different exchanges are interleaved in the order the consumer fetched
/// them.
///
/// Partitions are assigned asynchronously after `subscribe_all` returns and
/// new groups start at the latest offset, so records produced before the
/// first rebalance completes are not seen.
pub struct KafkaBus {
    producer: FutureProducer,
    config: BusConfig,
}

impl KafkaBus {
    pub fn new(config: &BusConfig) -> Result<Self, BusError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", config.brokers.join(","))
            .set("client.id", &config.client_id)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| BusError::Connection(format!("Failed to create Kafka producer: {}", e)))?;

        Ok(Self {
            producer,
            config: config.clone(),
        })
    }

    fn consumer(&self) -> Result<StreamConsumer, BusError> {
        let group_id = format!("{}-{}", self.config.client_id, uuid::Uuid::new_v4());
        ClientConfig::new()
            .set("bootstrap.servers", self.config.brokers.join(","))
            .set("group.id", &group_id)
            .set("client.id", &self.config.client_id)
            .set("enable.partition.eof", "false")
            .set("session.timeout.ms", "6000")
            .set("enable.auto.commit", "true")
            .set("auto.offset.reset", "latest")
            .create()
            .map_err(|e| BusError::Connection(format!("Failed to create Kafka consumer: {}", e)))
    }
}

#[async_trait]
impl MessageBus for KafkaBus {
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        payload: Vec<u8>,
    ) -> Result<(), BusError> {
        let record = FutureRecord::to(exchange).key(routing_key).payload(&payload);

        self.producer
            .send(record, Duration::from_secs(5))
            .await
            .map(|_| ())
            .map_err(|(e, _)| BusError::Publish {
                exchange: exchange.to_string(),
                routing_key: routing_key.to_string(),
                reason: e.to_string(),
            })
    }

    async fn subscribe_all(&self, bindings: &[Binding]) -> Result<Subscription, BusError> {
        let mut routes: HashMap<String, Vec<RoutingPattern>> = HashMap::new();
        for binding in bindings {
            routes
                .entry(binding.exchange.clone())
                .or_default()
                .extend(binding.patterns.iter().map(|p| RoutingPattern::parse(p)));
        }
        let topics: Vec<String> = routes.keys().cloned().collect();
        let topic_names: Vec<&str> = topics.iter().map(String::as_str).collect();

        let consumer = self.consumer()?;
        consumer.subscribe(&topic_names).map_err(|e| BusError::Subscribe {
            exchange: topics.join(","),
            reason: e.to_string(),
        })?;

        let (queue, receiver) = mpsc::unbounded_channel();

        let pump = tokio::spawn(async move {
            loop {
                let received = consumer.recv().await.map(|message| {
                    let key = message
                        .key()
                        .map(|k| String::from_utf8_lossy(k).into_owned())
                        .unwrap_or_default();
                    let payload = message.payload().map(<[u8]>::to_vec).unwrap_or_default();
                    (message.topic().to_string(), key, payload)
                });

                match received {
                    Ok((topic, key, payload)) => {
                        let bound = routes
                            .get(&topic)
                            .map(|patterns| matches_any(patterns, &key))
                            .unwrap_or(false);
                        if !bound {
                            continue;
                        }
                        if queue.send(Delivery::new(&topic, &key, payload)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Kafka receive error: {}", e);
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        });

        Ok(Subscription::with_pump(receiver, pump))
    }
}
