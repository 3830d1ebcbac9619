use super::contacts::{ContactGraph, RecomputeMode};
use super::events::BoardEvent;
use super::grid::{Cell, Direction, Grid};
use crate::common::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A tracked person. Equality looks at the identity only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub identity: String,
    pub cell: Cell,
    /// Fixed at creation; never changed by movement or contact.
    pub infected: bool,
}

impl PartialEq for Agent {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for Agent {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentView {
    pub identity: String,
    pub cell: Cell,
    pub infected: bool,
    /// Most recent first.
    pub contacts: Vec<String>,
}

/// Read-only copy of the board for observers such as a board view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub width: u32,
    pub height: u32,
    pub agents: Vec<AgentView>,
}

impl BoardSnapshot {
    pub fn occupants(&self, cell: Cell) -> impl Iterator<Item = &AgentView> {
        self.agents.iter().filter(move |a| a.cell == cell)
    }
}

/// Authoritative registry of agents and their contacts.
///
/// Agents are kept in registration order; the recompute pass walks them in
/// that order, so discovery order is deterministic.
#[derive(Debug, Clone)]
pub struct BoardState {
    grid: Grid,
    mode: RecomputeMode,
    agents: Vec<Agent>,
    index: HashMap<String, usize>,
    contacts: ContactGraph,
    uncommitted_events: Vec<BoardEvent>,
}

impl BoardState {
    pub fn new(grid: Grid) -> Self {
        Self::with_mode(grid, RecomputeMode::default())
    }

    pub fn with_mode(grid: Grid, mode: RecomputeMode) -> Self {
        Self {
            grid,
            mode,
            agents: Vec::new(),
            index: HashMap::new(),
            contacts: ContactGraph::new(),
            uncommitted_events: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn agent(&self, identity: &str) -> Option<&Agent> {
        self.index.get(identity).map(|&i| &self.agents[i])
    }

    pub fn create_person(&mut self, identity: &str, x: i64, y: i64) -> DomainResult<()> {
        self.create_person_with_status(identity, x, y, false)
    }

    pub fn create_person_with_status(
        &mut self,
        identity: &str,
        x: i64,
        y: i64,
        infected: bool,
    ) -> DomainResult<()> {
        if identity.is_empty() {
            return Err(DomainError::validation("Identity must not be empty"));
        }
        if self.index.contains_key(identity) {
            return Err(DomainError::Duplicate {
                identity: identity.to_string(),
            });
        }
        let cell = self.grid.cell(x, y).map_err(|e| match e {
            DomainError::Validation { reason } => {
                DomainError::validation(format!("{} for {}", reason, identity))
            }
            other => other,
        })?;

        self.index.insert(identity.to_string(), self.agents.len());
        self.agents.push(Agent {
            identity: identity.to_string(),
            cell,
            infected,
        });
        self.contacts.register(identity);

        self.add_event(BoardEvent::PersonCreated {
            identity: identity.to_string(),
            cell,
            infected,
            timestamp: chrono::Utc::now(),
        });
        self.check_contacts();
        Ok(())
    }

    /// Move one step, clamping at the grid edge. Returns the new cell.
    pub fn move_person(&mut self, identity: &str, direction: Direction) -> DomainResult<Cell> {
        let &position = self.index.get(identity).ok_or_else(|| DomainError::NotFound {
            identity: identity.to_string(),
        })?;

        let from = self.agents[position].cell;
        let to = self.grid.step(from, direction);
        self.agents[position].cell = to;

        self.add_event(BoardEvent::PersonMoved {
            identity: identity.to_string(),
            direction,
            from,
            to,
            timestamp: chrono::Utc::now(),
        });
        self.check_contacts();
        Ok(to)
    }

    /// Contacts of `identity`, most recently discovered first.
    pub fn get_contacts(&self, identity: &str) -> DomainResult<Vec<String>> {
        self.contacts
            .recent_first(identity)
            .ok_or_else(|| DomainError::NotFound {
                identity: identity.to_string(),
            })
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut agents: Vec<AgentView> = self
            .agents
            .iter()
            .map(|agent| AgentView {
                identity: agent.identity.clone(),
                cell: agent.cell,
                infected: agent.infected,
                contacts: self
                    .contacts
                    .recent_first(&agent.identity)
                    .unwrap_or_default(),
            })
            .collect();
        agents.sort_by(|a, b| a.identity.cmp(&b.identity));

        BoardSnapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            agents,
        }
    }

    pub fn uncommitted_events(&self) -> &[BoardEvent] {
        &self.uncommitted_events
    }

    pub fn take_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.uncommitted_events)
    }

    fn add_event(&mut self, event: BoardEvent) {
        self.uncommitted_events.push(event);
    }

    fn check_contacts(&mut self) {
        let occupants: Vec<(&str, Cell)> = self
            .agents
            .iter()
            .map(|a| (a.identity.as_str(), a.cell))
            .collect();
        let discoveries = self.contacts.recompute(&occupants, self.mode);

        let timestamp = chrono::Utc::now();
        for discovery in discoveries {
            let owner = self.index[&discovery.owner];
            self.uncommitted_events.push(BoardEvent::ContactRecorded {
                cell: self.agents[owner].cell,
                identity: discovery.owner,
                contact: discovery.contact,
                timestamp,
            });
        }
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new(Grid::default())
    }
}
