//! Game phase reconstruction from a raw contract snapshot
//!
//! The contract keeps no phase tag. Stake, Player 2's move and the timeout
//! window together determine exactly one of six phases; anything that fits
//! none of them is reported as an inconsistent state instead of guessed.

use std::fmt;
use serde::Serialize;
use tracing::{trace, warn};
use crate::error::{GameProtocolError, GameResult};
use crate::game::snapshot::{GameStateSnapshot, Move, Stake};
use crate::game::timeout::TimeoutCalculator;

/// Exhaustive set of phases a game contract can be observed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum GamePhase {
    /// Funded, Player 2 has not played and the window is still open
    AwaitingPlayer2 { stake: Stake, remaining: u64 },
    /// Player 2 has played; Player 1 must reveal before the window closes
    AwaitingPlayer1Reveal { player2_move: Move, remaining: u64 },
    /// Player 2 never played; Player 1 may reclaim the stake
    TimedOutAwaitingPlayer1Claim { stake: Stake },
    /// Player 1 never revealed; Player 2 may take both stakes
    TimedOutAwaitingPlayer2Claim { stake: Stake, player2_move: Move },
    /// Stake drained without Player 2 ever playing
    SettledNoPlayer2,
    /// Stake drained after Player 2 played. A reveal payout and a Player 2
    /// timeout claim leave identical fields, so the outcome is unknown here.
    SettledAmbiguous { player2_move: Move },
}

impl GamePhase {
    /// Stable snake_case name used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            GamePhase::AwaitingPlayer2 { .. } => "awaiting_player2",
            GamePhase::AwaitingPlayer1Reveal { .. } => "awaiting_player1_reveal",
            GamePhase::TimedOutAwaitingPlayer1Claim { .. } => "timed_out_awaiting_player1_claim",
            GamePhase::TimedOutAwaitingPlayer2Claim { .. } => "timed_out_awaiting_player2_claim",
            GamePhase::SettledNoPlayer2 => "settled_no_player2",
            GamePhase::SettledAmbiguous { .. } => "settled_ambiguous",
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, GamePhase::SettledNoPlayer2 | GamePhase::SettledAmbiguous { .. })
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(
            self,
            GamePhase::TimedOutAwaitingPlayer1Claim { .. } | GamePhase::TimedOutAwaitingPlayer2Claim { .. }
        )
    }

    /// Seconds left in the forfeiture window; zero once timed out or settled
    pub fn remaining(&self) -> u64 {
        match self {
            GamePhase::AwaitingPlayer2 { remaining, .. }
            | GamePhase::AwaitingPlayer1Reveal { remaining, .. } => *remaining,
            _ => 0,
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps one snapshot and the current time to one phase
pub struct GamePhaseDeriver;

impl GamePhaseDeriver {
    /// Derive the unique phase for `snapshot` at unix time `now`
    pub fn derive(snapshot: &GameStateSnapshot, now: u64) -> GameResult<GamePhase> {
        let player2_move = Self::check_consistency(snapshot).map_err(|e| {
            warn!(error = %e, "Rejecting snapshot");
            e
        })?;

        let stake = snapshot.stake();
        let moved = player2_move != Move::Null;
        let timed_out = TimeoutCalculator::has_timed_out(snapshot.timeout(), snapshot.last_action(), now);
        let remaining = TimeoutCalculator::remaining(snapshot.timeout(), snapshot.last_action(), now);

        // Settled phases ignore the timeout flag.
        let phase = match (stake.is_zero(), moved, timed_out) {
            (false, false, false) => GamePhase::AwaitingPlayer2 { stake, remaining },
            (false, true, false) => GamePhase::AwaitingPlayer1Reveal { player2_move, remaining },
            (false, false, true) => GamePhase::TimedOutAwaitingPlayer1Claim { stake },
            (false, true, true) => GamePhase::TimedOutAwaitingPlayer2Claim { stake, player2_move },
            (true, false, _) => GamePhase::SettledNoPlayer2,
            (true, true, _) => GamePhase::SettledAmbiguous { player2_move },
        };

        trace!(
            phase = phase.name(),
            stake = %stake,
            moved,
            timed_out,
            remaining,
            now,
            "Derived game phase"
        );

        Ok(phase)
    }

    /// Structural checks; returns the decoded Player 2 move on success
    fn check_consistency(snapshot: &GameStateSnapshot) -> GameResult<Move> {
        if snapshot.is_provisional() {
            return Err(GameProtocolError::inconsistent(
                "snapshot fields were not read at a single instant",
                None,
            ));
        }

        if snapshot.player1().is_none() {
            return Err(GameProtocolError::inconsistent(
                "player 1 slot is empty; no game exists at this contract",
                Some("j1"),
            ));
        }

        let player2_move = Move::from_code(snapshot.player2_move_code()).map_err(|_| {
            GameProtocolError::inconsistent(
                format!("move code {} is outside the contract's range", snapshot.player2_move_code()),
                Some("c2"),
            )
        })?;

        if player2_move != Move::Null && snapshot.player2().is_none() {
            return Err(GameProtocolError::inconsistent(
                "player 2 move is set but the player 2 slot is empty",
                Some("c2"),
            ));
        }

        Ok(player2_move)
    }
}
