use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation failed: {reason}")]
    Validation { reason: String },

    #[error("Person {identity} already exists")]
    Duplicate { identity: String },

    #[error("Person {identity} does not exist")]
    NotFound { identity: String },

    #[error("Unrecognized routing key '{routing_key}': {reason}")]
    Protocol { routing_key: String, reason: String },
}

impl DomainError {
    pub fn validation(reason: impl Into<String>) -> Self {
        DomainError::Validation {
            reason: reason.into(),
        }
    }

    pub fn protocol(routing_key: &str, reason: impl Into<String>) -> Self {
        DomainError::Protocol {
            routing_key: routing_key.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum BusError {
    #[error("Failed to connect to bus: {0}")]
    Connection(String),

    #[error("Failed to publish to {exchange}/{routing_key}: {reason}")]
    Publish {
        exchange: String,
        routing_key: String,
        reason: String,
    },

    #[error("Failed to subscribe on {exchange}: {reason}")]
    Subscribe { exchange: String, reason: String },

    #[error("Subscription closed")]
    Closed,
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Bus error: {0}")]
    Bus(#[from] BusError),

    #[error("Board worker is no longer running")]
    WorkerStopped,

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
