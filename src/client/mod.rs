//! Client-side plumbing around the derivation core: snapshot readers,
//! transaction submission and the pull-based watcher

pub mod reader;
pub mod submitter;
pub mod watcher;

pub use reader::{ChainReader, RetryingReader, SnapshotFileReader};
pub use submitter::{ActionParams, ActionSubmitter, TransactionHandle};
pub use watcher::{unix_now, GameWatcher};
