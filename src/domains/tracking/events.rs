use super::grid::{Cell, Direction};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoardEvent {
    PersonCreated {
        identity: String,
        cell: Cell,
        infected: bool,
        timestamp: DateTime<Utc>,
    },
    PersonMoved {
        identity: String,
        direction: Direction,
        from: Cell,
        to: Cell,
        timestamp: DateTime<Utc>,
    },
    ContactRecorded {
        identity: String,
        contact: String,
        cell: Cell,
        timestamp: DateTime<Utc>,
    },
}

impl BoardEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            BoardEvent::PersonCreated { .. } => "PersonCreated",
            BoardEvent::PersonMoved { .. } => "PersonMoved",
            BoardEvent::ContactRecorded { .. } => "ContactRecorded",
        }
    }

    pub fn identity(&self) -> &str {
        match self {
            BoardEvent::PersonCreated { identity, .. } => identity,
            BoardEvent::PersonMoved { identity, .. } => identity,
            BoardEvent::ContactRecorded { identity, .. } => identity,
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            BoardEvent::PersonCreated { timestamp, .. } => *timestamp,
            BoardEvent::PersonMoved { timestamp, .. } => *timestamp,
            BoardEvent::ContactRecorded { timestamp, .. } => *timestamp,
        }
    }

    /// One-line rendering used by the board logger.
    pub fn describe(&self) -> String {
        match self {
            BoardEvent::PersonCreated {
                identity,
                cell,
                infected,
                ..
            } => {
                if *infected {
                    format!("Added person {} at {} (infected)", identity, cell)
                } else {
                    format!("Added person {} at {}", identity, cell)
                }
            }
            BoardEvent::PersonMoved {
                identity,
                direction,
                to,
                ..
            } => format!("Moved {} {} to {}", identity, direction, to),
            BoardEvent::ContactRecorded {
                identity, contact, ..
            } => format!("{} has added {} as a contact", identity, contact),
        }
    }
}
