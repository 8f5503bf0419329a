//! Duel - phase reconstruction for two-party commit-reveal wagering contracts
//!
//! The game contract exposes only raw fields (stake, both player slots,
//! Player 1's move commitment, Player 2's move, the timeout and the last
//! action time). This crate turns one snapshot of those fields into:
//! - a single, exhaustively matched [`GamePhase`]
//! - the [`AvailableActions`] for whoever is looking at it
//!
//! The `game` module is the pure core. The `client` module wraps it with
//! snapshot readers, a retrying decorator, submission guarding and an
//! explicit pull-based watcher.

pub mod game;
pub mod client;
pub mod error;
pub mod config;

// Re-export commonly used types for convenience
pub use error::{GameProtocolError, GameResult, ReaderError};

// Re-export the derivation core
pub use game::{
    ActionAvailabilityResolver, ActionKind, Address, AvailableActions, GamePhase, GamePhaseDeriver,
    GameStateSnapshot, GameView, Move, MoveCommitment, RawSnapshot, Stake, StatusSummary, format_ether,
    TimeoutCalculator, ViewerRole,
};

// Re-export client interfaces
pub use client::{
    ActionParams, ActionSubmitter, ChainReader, GameWatcher, RetryingReader, SnapshotFileReader,
    TransactionHandle,
};

// Re-export configuration interfaces
pub use config::{DuelConfig, GameConfig, LogSettings, NetworkConfig};
