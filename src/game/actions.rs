//! Viewer roles and the actions each phase offers them

use std::collections::BTreeSet;
use std::fmt;
use serde::Serialize;
use crate::game::phase::GamePhase;
use crate::game::snapshot::{Address, GameStateSnapshot, Stake};

/// How the connected party relates to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerRole {
    Player1,
    Player2,
    Spectator,
}

impl ViewerRole {
    pub const ALL: [ViewerRole; 3] = [ViewerRole::Player1, ViewerRole::Player2, ViewerRole::Spectator];

    /// Match the viewer against the snapshot's player slots.
    ///
    /// An absent viewer, the zero address, or an address in neither slot is a
    /// spectator. If both slots hold the same address, Player 1 wins.
    pub fn identify(viewer: Option<Address>, snapshot: &GameStateSnapshot) -> Self {
        let Some(viewer) = viewer.and_then(Address::non_zero) else {
            return ViewerRole::Spectator;
        };

        if snapshot.player1() == Some(viewer) {
            ViewerRole::Player1
        } else if snapshot.player2() == Some(viewer) {
            ViewerRole::Player2
        } else {
            ViewerRole::Spectator
        }
    }
}

impl fmt::Display for ViewerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewerRole::Player1 => "player1",
            ViewerRole::Player2 => "player2",
            ViewerRole::Spectator => "spectator",
        };
        f.write_str(name)
    }
}

/// Something the viewer may do next
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionKind {
    /// Display-only; never changes contract state
    ViewStatus,
    /// Match the stake and play a move
    Join { stake: Stake },
    /// Reveal Player 1's committed move
    Reveal,
    /// Player 1 reclaims the stake after Player 2 failed to play
    ClaimTimeoutRefund,
    /// Player 2 takes both stakes after Player 1 failed to reveal
    ClaimTimeoutStake,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::ViewStatus => "view_status",
            ActionKind::Join { .. } => "join",
            ActionKind::Reveal => "reveal",
            ActionKind::ClaimTimeoutRefund => "claim_timeout_refund",
            ActionKind::ClaimTimeoutStake => "claim_timeout_stake",
        }
    }

    /// True for every action that sends a transaction
    pub fn changes_state(&self) -> bool {
        !matches!(self, ActionKind::ViewStatus)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered set of actions offered to one viewer for one phase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AvailableActions(BTreeSet<ActionKind>);

impl AvailableActions {
    pub fn contains(&self, action: &ActionKind) -> bool {
        self.0.contains(action)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionKind> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Actions other than `ViewStatus`
    pub fn transactional(&self) -> impl Iterator<Item = &ActionKind> {
        self.0.iter().filter(|a| a.changes_state())
    }

    /// Check every offered action against the phase it was resolved for
    pub fn is_consistent_with(&self, phase: &GamePhase) -> bool {
        self.0.iter().all(|action| match (action, phase) {
            (ActionKind::ViewStatus, _) => true,
            (ActionKind::Join { stake }, GamePhase::AwaitingPlayer2 { stake: required, .. }) => stake == required,
            (ActionKind::Reveal, GamePhase::AwaitingPlayer1Reveal { .. }) => true,
            (ActionKind::ClaimTimeoutRefund, GamePhase::TimedOutAwaitingPlayer1Claim { .. }) => true,
            (ActionKind::ClaimTimeoutStake, GamePhase::TimedOutAwaitingPlayer2Claim { .. }) => true,
            _ => false,
        })
    }
}

impl<'a> IntoIterator for &'a AvailableActions {
    type Item = &'a ActionKind;
    type IntoIter = std::collections::btree_set::Iter<'a, ActionKind>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Decides which actions a role may take in a phase
pub struct ActionAvailabilityResolver;

impl ActionAvailabilityResolver {
    /// Pure function of `(phase, role)`
    pub fn resolve(phase: &GamePhase, role: ViewerRole) -> AvailableActions {
        let mut actions = BTreeSet::new();
        actions.insert(ActionKind::ViewStatus);

        let offered = match (phase, role) {
            (GamePhase::AwaitingPlayer2 { stake, .. }, ViewerRole::Spectator | ViewerRole::Player2) => {
                Some(ActionKind::Join { stake: *stake })
            }
            (GamePhase::AwaitingPlayer1Reveal { .. }, ViewerRole::Player1) => Some(ActionKind::Reveal),
            (GamePhase::TimedOutAwaitingPlayer1Claim { .. }, ViewerRole::Player1) => {
                Some(ActionKind::ClaimTimeoutRefund)
            }
            (GamePhase::TimedOutAwaitingPlayer2Claim { .. }, ViewerRole::Player2) => {
                Some(ActionKind::ClaimTimeoutStake)
            }
            _ => None,
        };

        actions.extend(offered);
        AvailableActions(actions)
    }
}
