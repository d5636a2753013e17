//! Session state
//!
//! Everything that persists between events lives in [`SessionState`]; the
//! controller in `session.rs` takes it by reference for every event.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use super::ball::Projectile;
use super::contact::ContactRegistry;
use super::table::PlacedSurface;
use crate::platform::NodeId;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Looking for a horizontal plane; a tap places the table
    #[default]
    Scanning,
    /// Table is down; a tap throws a ball
    TablePlaced,
}

/// Complete session state (serializable for debugging and replays)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: SessionPhase,
    /// The placed table (Some exactly when phase is TablePlaced)
    pub surface: Option<PlacedSurface>,
    /// Scanning overlay node per plane anchor id
    pub overlays: BTreeMap<u32, NodeId>,
    /// Live balls, oldest first
    pub projectiles: VecDeque<Projectile>,
    /// Sunk cups
    pub contacts: ContactRegistry,
    /// Balls thrown this session
    pub throws: u32,
    /// Seconds since the session started
    pub time_secs: f32,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_projectile(&self, node: NodeId) -> bool {
        self.projectiles.iter().any(|p| p.node == node)
    }

    pub fn projectile(&self, node: NodeId) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.node == node)
    }

    pub fn score(&self) -> usize {
        self.contacts.scored_count()
    }

    /// Cups still standing
    pub fn cups_remaining(&self) -> usize {
        self.surface
            .as_ref()
            .map(|s| s.cups.iter().filter(|c| !self.contacts.is_scored(**c)).count())
            .unwrap_or(0)
    }
}
