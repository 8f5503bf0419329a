//! Human-readable status lines for a derived phase

use serde::Serialize;
use crate::game::actions::ViewerRole;
use crate::game::phase::GamePhase;
use crate::game::snapshot::Stake;

const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Render wei as an ether decimal string using integer arithmetic only
///
/// Trailing fractional zeros are dropped: `1500000000000000000` → `"1.5"`.
pub fn format_ether(stake: Stake) -> String {
    let wei = stake.wei();
    let whole = wei / WEI_PER_ETHER;
    let frac = wei % WEI_PER_ETHER;

    if frac == 0 {
        return whole.to_string();
    }

    let frac = format!("{:018}", frac);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

/// Headline and stake caption for one viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub headline: String,
    pub stake_caption: Option<String>,
}

impl StatusSummary {
    pub fn describe(phase: &GamePhase, role: ViewerRole) -> Self {
        let headline = match (phase, role) {
            (GamePhase::AwaitingPlayer2 { .. }, ViewerRole::Player2) => "Your move: match the stake to play".to_string(),
            (GamePhase::AwaitingPlayer2 { .. }, _) => "Waiting for Player 2 to play".to_string(),
            (GamePhase::AwaitingPlayer1Reveal { .. }, ViewerRole::Player1) => "Player 2 has played; reveal your move".to_string(),
            (GamePhase::AwaitingPlayer1Reveal { player2_move, .. }, _) => {
                format!("Player 2 played {}; waiting for Player 1 to reveal", player2_move)
            }
            (GamePhase::TimedOutAwaitingPlayer1Claim { .. }, _) => {
                "Player 2 timed out; Player 1 can reclaim the stake".to_string()
            }
            (GamePhase::TimedOutAwaitingPlayer2Claim { .. }, _) => {
                "Player 1 failed to reveal; Player 2 can claim the stake".to_string()
            }
            (GamePhase::SettledNoPlayer2, _) => "Game over: stake reclaimed by Player 1".to_string(),
            (GamePhase::SettledAmbiguous { .. }, _) => {
                "Game over: settled by reveal or by Player 2's timeout claim (not determinable from contract state)".to_string()
            }
        };

        let stake_caption = match phase {
            GamePhase::AwaitingPlayer2 { stake, .. }
            | GamePhase::TimedOutAwaitingPlayer1Claim { stake }
            | GamePhase::TimedOutAwaitingPlayer2Claim { stake, .. } => Some(Self::caption(*stake, role)),
            GamePhase::AwaitingPlayer1Reveal { .. } | GamePhase::SettledNoPlayer2 | GamePhase::SettledAmbiguous { .. } => None,
        };

        Self { headline, stake_caption }
    }

    fn caption(stake: Stake, role: ViewerRole) -> String {
        let amount = format_ether(stake);
        match role {
            ViewerRole::Spectator => format!("{} ETH at stake", amount),
            ViewerRole::Player1 => format!("{} ETH staked by you", amount),
            ViewerRole::Player2 => format!("{} ETH stake required to play", amount),
        }
    }
}
