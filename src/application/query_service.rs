use crate::common::{ApplicationError, Binding, Delivery, DomainError, MessageBus};
use crate::domains::tracking::BoardHandle;
use std::sync::Arc;

/// Response body for an identity the board has never seen.
pub const UNKNOWN_IDENTITY: &str = "!";
pub const CONTACT_SEPARATOR: &str = ", ";

/// Exchanges and keys the query protocol runs on.
#[derive(Debug, Clone)]
pub struct QueryRoutes {
    pub request_exchange: String,
    pub request_key: String,
    pub response_exchange: String,
}

impl Default for QueryRoutes {
    fn default() -> Self {
        Self {
            request_exchange: "query".to_string(),
            request_key: "query".to_string(),
            response_exchange: "query-response".to_string(),
        }
    }
}

/// Render a contact lookup as a response payload. An empty list is an
/// empty body, a failed lookup is the sentinel.
pub fn encode_response(lookup: &Result<Vec<String>, DomainError>) -> String {
    match lookup {
        Ok(contacts) => contacts.join(CONTACT_SEPARATOR),
        Err(_) => UNKNOWN_IDENTITY.to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStats {
    pub answered: u64,
    pub unknown: u64,
    pub publish_failures: u64,
}

/// Answers "who has this person met" requests.
///
/// The queried identity doubles as the response routing key, so a client
/// that bound a private queue on its own name sees only its own answer.
pub struct QueryService {
    bus: Arc<dyn MessageBus>,
    board: BoardHandle,
    routes: QueryRoutes,
}

impl QueryService {
    pub fn new(bus: Arc<dyn MessageBus>, board: BoardHandle, routes: QueryRoutes) -> Self {
        Self { bus, board, routes }
    }

    pub fn binding(&self) -> Binding {
        Binding::new(
            &self.routes.request_exchange,
            &[self.routes.request_key.as_str()],
        )
    }

    pub fn accepts(&self, delivery: &Delivery) -> bool {
        delivery.exchange == self.routes.request_exchange
    }

    /// Answer one request. A failed publish is counted and logged; only a
    /// stopped board worker is returned as an error.
    pub async fn process(
        &self,
        delivery: &Delivery,
        stats: &mut QueryStats,
    ) -> Result<(), ApplicationError> {
        match self.answer(delivery).await {
            Ok(Answer::Contacts) => stats.answered += 1,
            Ok(Answer::Unknown) => {
                stats.answered += 1;
                stats.unknown += 1;
            }
            Err(ApplicationError::Bus(e)) => {
                // The board is untouched by queries; just report.
                tracing::error!("Failed to send query response: {}", e);
                stats.publish_failures += 1;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    async fn answer(&self, delivery: &Delivery) -> Result<Answer, ApplicationError> {
        let identity = String::from_utf8_lossy(&delivery.payload).into_owned();

        let lookup = match self.board.contacts(identity.clone()).await {
            Ok(contacts) => Ok(contacts),
            Err(ApplicationError::Domain(e)) => Err(e),
            Err(e) => return Err(e),
        };
        let answer = match &lookup {
            Ok(_) => Answer::Contacts,
            Err(e) => {
                tracing::info!("{}", e);
                Answer::Unknown
            }
        };
        let body = encode_response(&lookup);

        self.bus
            .publish(&self.routes.response_exchange, &identity, body.into_bytes())
            .await?;
        tracing::info!("Sent query response for {}", identity);
        Ok(answer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Contacts,
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_contacts_most_recent_first_as_given() {
        let lookup = Ok(vec!["Carol".to_string(), "Bob".to_string()]);
        assert_eq!(encode_response(&lookup), "Carol, Bob");
    }

    #[test]
    fn empty_list_and_unknown_identity_are_distinct() {
        assert_eq!(encode_response(&Ok(Vec::new())), "");
        let unknown = Err(DomainError::NotFound {
            identity: "Zed".to_string(),
        });
        assert_eq!(encode_response(&unknown), UNKNOWN_IDENTITY);
    }
}
