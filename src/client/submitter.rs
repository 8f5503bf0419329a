//! Transaction submission seam

use std::fmt;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::GameResult;
use crate::game::{ActionKind, Move};

/// Call arguments that accompany an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionParams {
    /// Claims take no arguments
    None,
    Join { mv: Move },
    /// The move and the 256-bit salt behind Player 1's commitment
    Reveal { mv: Move, salt: [u8; 32] },
}

impl ActionParams {
    /// Whether these params fit the given action
    pub fn fits(&self, action: &ActionKind) -> bool {
        match (self, action) {
            (ActionParams::Join { mv }, ActionKind::Join { .. }) => *mv != Move::Null,
            (ActionParams::Reveal { mv, .. }, ActionKind::Reveal) => *mv != Move::Null,
            (ActionParams::None, ActionKind::ClaimTimeoutRefund | ActionKind::ClaimTimeoutStake) => true,
            _ => false,
        }
    }
}

/// Hash of a submitted transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionHandle(pub [u8; 32]);

impl fmt::Display for TransactionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Signs and sends the transaction behind an action
#[async_trait]
pub trait ActionSubmitter: Send + Sync {
    async fn submit(&self, action: &ActionKind, params: ActionParams) -> GameResult<TransactionHandle>;
}
