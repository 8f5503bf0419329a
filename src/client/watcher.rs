//! Explicit pull of a fresh game view

use std::ops::ControlFlow;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;
use crate::client::reader::ChainReader;
use crate::client::submitter::{ActionParams, ActionSubmitter, TransactionHandle};
use crate::config::GameConfig;
use crate::error::{GameProtocolError, GameResult};
use crate::game::{ActionKind, Address, GameView};

/// Current unix time in seconds, clamped at zero
pub fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}

/// Pulls snapshots for one contract and derives a view from each
///
/// Nothing is cached: every `pull` reads a new snapshot and derives from
/// scratch, so a view never outlives the poll that produced it.
#[derive(Debug)]
pub struct GameWatcher<R> {
    reader: R,
    contract: Address,
    clock_skew_tolerance: u64,
}

impl<R: ChainReader> GameWatcher<R> {
    pub fn new(reader: R, contract: Address) -> Self {
        Self::with_config(reader, contract, &GameConfig::default())
    }

    pub fn with_config(reader: R, contract: Address, config: &GameConfig) -> Self {
        Self {
            reader,
            contract,
            clock_skew_tolerance: config.clock_skew_tolerance,
        }
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Read a fresh snapshot and derive the view for `viewer` at `now`
    pub async fn pull(&self, viewer: Option<Address>, now: u64) -> GameResult<GameView> {
        let span = info_span!(
            "pull",
            correlation_id = %Uuid::new_v4(),
            contract = %self.contract,
        );

        async move {
            let snapshot = self.reader.read(&self.contract).await.map_err(|source| {
                warn!(error = %source, "Snapshot unavailable");
                GameProtocolError::SnapshotUnavailable {
                    source,
                    contract: self.contract.to_string(),
                }
            })?;

            if let Some(skew) = self.excess_skew(snapshot.last_action(), now) {
                warn!(
                    last_action = snapshot.last_action(),
                    now,
                    skew,
                    tolerance = self.clock_skew_tolerance,
                    "Snapshot last action lies in the future; local clock may be behind"
                );
            }

            debug!(fingerprint = %snapshot.fingerprint(), "Snapshot read");

            let view = GameView::build(snapshot, viewer, now)?;
            info!(
                phase = view.phase.name(),
                role = %view.role,
                actions = view.actions.len(),
                remaining = view.remaining,
                "Game view derived"
            );
            Ok(view)
        }
        .instrument(span)
        .await
    }

    /// `pull` at the local wall-clock time
    pub async fn pull_now(&self, viewer: Option<Address>) -> GameResult<GameView> {
        self.pull(viewer, unix_now()).await
    }

    /// Pull at the wall-clock time every `interval` until `on_view` breaks
    ///
    /// The first pull happens immediately. Failed pulls are handed to
    /// `on_view` like successful ones. A zero interval is raised to one
    /// millisecond.
    pub async fn watch<F>(&self, viewer: Option<Address>, interval: Duration, mut on_view: F)
    where
        F: FnMut(GameResult<GameView>) -> ControlFlow<()>,
    {
        let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if on_view(self.pull_now(viewer).await).is_break() {
                debug!(contract = %self.contract, "Watch stopped");
                return;
            }
        }
    }

    /// Seconds by which `last_action` exceeds `now` beyond the tolerance
    fn excess_skew(&self, last_action: u64, now: u64) -> Option<u64> {
        (last_action > now.saturating_add(self.clock_skew_tolerance)).then(|| last_action - now)
    }

    /// Forward `action` to the submitter only if a fresh pull still offers it
    ///
    /// The action must still be offered at `now`. If the window closed or the
    /// opponent acted since the last display, this fails with `ActionNotAvailable`.
    pub async fn submit<S: ActionSubmitter>(
        &self,
        submitter: &S,
        viewer: Option<Address>,
        action: ActionKind,
        params: ActionParams,
        now: u64,
    ) -> GameResult<TransactionHandle> {
        let view = self.pull(viewer, now).await?;

        if !action.changes_state() || !view.actions.contains(&action) {
            warn!(action = %action, phase = view.phase.name(), role = %view.role, "Refusing unavailable action");
            return Err(GameProtocolError::ActionNotAvailable {
                action: action.to_string(),
                phase: view.phase.name().to_string(),
            });
        }

        if !params.fits(&action) {
            return Err(GameProtocolError::Submission(
                format!("parameters {:?} do not fit action {}", params, action)
            ));
        }

        let handle = submitter.submit(&action, params).await?;
        info!(action = %action, tx = %handle, "Action submitted");
        Ok(handle)
    }
}
