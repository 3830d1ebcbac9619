use crate::common::{ApplicationError, Binding, Delivery, DomainError, DomainResult};
use crate::domains::tracking::{BoardHandle, Direction};

/// Creation keys: `new.person.<x>.<y>`, optionally followed by an
/// infection flag as published by the agent simulator.
pub const CREATE_PATTERN: &str = "new.person.*.*";
pub const CREATE_WITH_STATUS_PATTERN: &str = "new.person.*.*.*";
/// Movement keys: `move.person.<direction>`.
pub const MOVE_PATTERN: &str = "move.person.*";

/// A decoded position-exchange message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionInstruction {
    Create {
        identity: String,
        x: i64,
        y: i64,
        infected: bool,
    },
    Move {
        identity: String,
        direction: Direction,
    },
}

impl PositionInstruction {
    /// Decode a routing key plus payload.
    ///
    /// A key of the wrong shape is a `Protocol` error; a well-formed move key
    /// carrying an unknown direction is a `Validation` error.
    pub fn parse(routing_key: &str, payload: &[u8]) -> DomainResult<Self> {
        let identity = String::from_utf8_lossy(payload).into_owned();
        let parts: Vec<&str> = routing_key.split('.').collect();

        match parts.as_slice() {
            ["new", "person", x, y] => Ok(PositionInstruction::Create {
                identity,
                x: parse_coordinate(routing_key, x)?,
                y: parse_coordinate(routing_key, y)?,
                infected: false,
            }),
            ["new", "person", x, y, flag] => Ok(PositionInstruction::Create {
                identity,
                x: parse_coordinate(routing_key, x)?,
                y: parse_coordinate(routing_key, y)?,
                infected: parse_flag(routing_key, flag)?,
            }),
            ["new", "person", ..] => Err(DomainError::protocol(
                routing_key,
                "expected new.person.<x>.<y>[.<infected>]",
            )),
            ["move", "person", direction] => Ok(PositionInstruction::Move {
                identity,
                direction: direction.parse()?,
            }),
            ["move", "person", ..] => Err(DomainError::protocol(
                routing_key,
                "expected move.person.<direction>",
            )),
            _ => Err(DomainError::protocol(routing_key, "unknown instruction")),
        }
    }
}

fn parse_coordinate(routing_key: &str, word: &str) -> DomainResult<i64> {
    word.parse::<i64>()
        .map_err(|_| DomainError::protocol(routing_key, format!("'{}' is not an integer", word)))
}

fn parse_flag(routing_key: &str, word: &str) -> DomainResult<bool> {
    match word.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(DomainError::protocol(
            routing_key,
            format!("'{}' is not a boolean", word),
        )),
    }
}

/// Counters for position deliveries handled so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub applied: u64,
    pub rejected: u64,
    pub dropped: u64,
}

/// Applies position-exchange messages to the board.
pub struct PositionIngest {
    board: BoardHandle,
    exchange: String,
}

impl PositionIngest {
    pub fn new(board: BoardHandle, exchange: impl Into<String>) -> Self {
        Self {
            board,
            exchange: exchange.into(),
        }
    }

    pub fn binding(&self) -> Binding {
        Binding::new(
            &self.exchange,
            &[CREATE_PATTERN, CREATE_WITH_STATUS_PATTERN, MOVE_PATTERN],
        )
    }

    pub fn accepts(&self, delivery: &Delivery) -> bool {
        delivery.exchange == self.exchange
    }

    /// Apply one delivery and wait for the board to finish with it.
    ///
    /// Malformed and rejected messages are counted and logged. Only a
    /// stopped board worker is returned as an error.
    pub async fn process(
        &self,
        delivery: &Delivery,
        stats: &mut IngestStats,
    ) -> Result<(), ApplicationError> {
        match self.apply(delivery).await {
            Ok(()) => stats.applied += 1,
            Err(ApplicationError::Domain(e @ DomainError::Protocol { .. })) => {
                tracing::warn!("Dropped position message: {}", e);
                stats.dropped += 1;
            }
            Err(ApplicationError::Domain(e)) => {
                tracing::warn!(
                    routing_key = %delivery.routing_key,
                    "Rejected position message: {}",
                    e
                );
                stats.rejected += 1;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    async fn apply(&self, delivery: &Delivery) -> Result<(), ApplicationError> {
        let instruction = PositionInstruction::parse(&delivery.routing_key, &delivery.payload)?;
        match instruction {
            PositionInstruction::Create {
                identity,
                x,
                y,
                infected,
            } => self.board.create_person(identity, x, y, infected).await,
            PositionInstruction::Move {
                identity,
                direction,
            } => self.board.move_person(identity, direction).await.map(|_| ()),
        }
    }
}
