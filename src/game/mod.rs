//! Phase reconstruction core
//!
//! Pure, synchronous functions over immutable snapshots. Nothing in this
//! module reads the clock, performs I/O, or keeps state between calls.

pub mod snapshot;
pub mod timeout;
pub mod phase;
pub mod actions;
pub mod status;
pub mod view;

pub use snapshot::{Address, GameStateSnapshot, Move, MoveCommitment, RawSnapshot, Stake};
pub use timeout::TimeoutCalculator;
pub use phase::{GamePhase, GamePhaseDeriver};
pub use actions::{ActionAvailabilityResolver, ActionKind, AvailableActions, ViewerRole};
pub use status::{format_ether, StatusSummary};
pub use view::GameView;
