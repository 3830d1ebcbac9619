use super::grid::Cell;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// How a recompute pass treats a pair that is already linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecomputeMode {
    /// Skip the known pair and keep scanning.
    #[default]
    Complete,
    /// Abort the whole pass at the first known pair. Under-reports contacts
    /// once three or more agents share a cell; kept only for parity with
    /// the legacy tracker.
    LegacyEarlyReturn,
}

/// Contacts of one agent in order of first discovery.
#[derive(Debug, Clone, Default)]
struct ContactList {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl ContactList {
    fn push(&mut self, contact: &str) -> bool {
        if !self.seen.insert(contact.to_string()) {
            return false;
        }
        self.order.push(contact.to_string());
        true
    }
}

/// A contact recorded by a recompute pass, from `owner`'s point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub owner: String,
    pub contact: String,
}

/// Per-agent ordered, duplicate-free contact sets.
#[derive(Debug, Clone, Default)]
pub struct ContactGraph {
    lists: HashMap<String, ContactList>,
}

impl ContactGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, identity: &str) {
        self.lists.entry(identity.to_string()).or_default();
    }

    pub fn contains(&self, owner: &str, contact: &str) -> bool {
        self.lists
            .get(owner)
            .map(|list| list.seen.contains(contact))
            .unwrap_or(false)
    }

    /// Append `contact` to `owner`'s list. Returns false for self-links,
    /// unknown owners and contacts that are already present.
    pub fn record(&mut self, owner: &str, contact: &str) -> bool {
        if owner == contact {
            return false;
        }
        match self.lists.get_mut(owner) {
            Some(list) => list.push(contact),
            None => false,
        }
    }

    /// Contacts in chronological order of first discovery.
    pub fn discovery_order(&self, owner: &str) -> Option<&[String]> {
        self.lists.get(owner).map(|list| list.order.as_slice())
    }

    /// Contacts most-recently-discovered first.
    pub fn recent_first(&self, owner: &str) -> Option<Vec<String>> {
        self.discovery_order(owner)
            .map(|order| order.iter().rev().cloned().collect())
    }

    /// Link every pair of distinct agents that share a cell.
    ///
    /// `occupants` must be in registration order; it fixes the order in which
    /// simultaneous discoveries are appended. Both orderings of a pair are
    /// visited, which is what makes the links symmetric.
    pub fn recompute(&mut self, occupants: &[(&str, Cell)], mode: RecomputeMode) -> Vec<Discovery> {
        match mode {
            RecomputeMode::Complete => self.recompute_by_cell(occupants),
            RecomputeMode::LegacyEarlyReturn => self.recompute_legacy(occupants),
        }
    }

    fn recompute_by_cell(&mut self, occupants: &[(&str, Cell)]) -> Vec<Discovery> {
        let mut by_cell: HashMap<Cell, Vec<&str>> = HashMap::new();
        for (identity, cell) in occupants {
            by_cell.entry(*cell).or_default().push(*identity);
        }

        let mut discoveries = Vec::new();
        for (owner, cell) in occupants {
            let Some(mates) = by_cell.get(cell) else {
                continue;
            };
            for mate in mates {
                if self.record(owner, mate) {
                    discoveries.push(Discovery {
                        owner: owner.to_string(),
                        contact: mate.to_string(),
                    });
                }
            }
        }
        discoveries
    }

    fn recompute_legacy(&mut self, occupants: &[(&str, Cell)]) -> Vec<Discovery> {
        let mut discoveries = Vec::new();
        for (owner, owner_cell) in occupants {
            for (other, other_cell) in occupants {
                if owner == other || owner_cell != other_cell {
                    continue;
                }
                if self.contains(owner, other) {
                    return discoveries;
                }
                if self.record(owner, other) {
                    discoveries.push(Discovery {
                        owner: owner.to_string(),
                        contact: other.to_string(),
                    });
                }
            }
        }
        discoveries
    }
}
