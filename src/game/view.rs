//! One snapshot, one viewer, one instant: everything a renderer needs

use serde::Serialize;
use crate::error::GameResult;
use crate::game::actions::{ActionAvailabilityResolver, AvailableActions, ViewerRole};
use crate::game::phase::{GamePhase, GamePhaseDeriver};
use crate::game::snapshot::{Address, GameStateSnapshot};
use crate::game::status::StatusSummary;
use crate::game::timeout::TimeoutCalculator;

/// Derived view of a game for a single viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameView {
    #[serde(skip)]
    pub snapshot: GameStateSnapshot,
    pub phase: GamePhase,
    pub role: ViewerRole,
    pub actions: AvailableActions,
    /// Seconds left in the forfeiture window at `observed_at`
    pub remaining: u64,
    /// Unix time at which the window closes
    pub deadline: u64,
    pub observed_at: u64,
    pub status: StatusSummary,
}

impl GameView {
    /// Run the full derivation pipeline over `snapshot`
    pub fn build(snapshot: GameStateSnapshot, viewer: Option<Address>, now: u64) -> GameResult<Self> {
        let phase = GamePhaseDeriver::derive(&snapshot, now)?;
        let role = ViewerRole::identify(viewer, &snapshot);
        let actions = ActionAvailabilityResolver::resolve(&phase, role);
        let status = StatusSummary::describe(&phase, role);

        Ok(Self {
            remaining: phase.remaining(),
            deadline: TimeoutCalculator::deadline(snapshot.timeout(), snapshot.last_action()),
            snapshot,
            phase,
            role,
            actions,
            observed_at: now,
            status,
        })
    }
}
