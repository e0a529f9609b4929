//! Single-writer game session.
//!
//! One task owns the [`GameStore`]. Player actions, generation ticks and
//! notification expiry are all serialized through its loop, so no two
//! commits can interleave.

use crate::store::GameStore;
use sim_core::{GameState, Notification, Resources};
use sim_econ::{Action, TransactionError};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("game session has shut down")]
    Closed,
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

enum Command {
    Act {
        action: Action,
        response: oneshot::Sender<Result<String, TransactionError>>,
    },
    Snapshot {
        response: oneshot::Sender<Arc<GameState>>,
    },
    Notifications {
        response: oneshot::Sender<Vec<Notification>>,
    },
    Dismiss {
        id: u64,
        response: oneshot::Sender<bool>,
    },
    Tick {
        response: oneshot::Sender<Resources>,
    },
    Shutdown,
}

/// Cloneable front end to a running session.
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    pub async fn act(&self, action: Action) -> Result<String, SessionError> {
        let (response, rx) = oneshot::channel();
        self.send(Command::Act { action, response }).await?;
        Ok(rx.await.map_err(|_| SessionError::Closed)??)
    }

    pub async fn snapshot(&self) -> Result<Arc<GameState>, SessionError> {
        let (response, rx) = oneshot::channel();
        self.send(Command::Snapshot { response }).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn notifications(&self) -> Result<Vec<Notification>, SessionError> {
        let (response, rx) = oneshot::channel();
        self.send(Command::Notifications { response }).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn dismiss(&self, id: u64) -> Result<bool, SessionError> {
        let (response, rx) = oneshot::channel();
        self.send(Command::Dismiss { id, response }).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Force a generation tick outside the timer.
    pub async fn tick(&self) -> Result<Resources, SessionError> {
        let (response, rx) = oneshot::channel();
        self.send(Command::Tick { response }).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.send(Command::Shutdown).await
    }

    async fn send(&self, command: Command) -> Result<(), SessionError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| SessionError::Closed)
    }
}

/// Start the session loop. The join handle yields the store back once the
/// session is shut down or every handle is dropped.
pub fn spawn_session(store: GameStore) -> (SessionHandle, JoinHandle<GameStore>) {
    let (command_tx, command_rx) = mpsc::channel(64);
    let period = Duration::from_millis(store.config().tick_interval_ms);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let join = tokio::spawn(run(store, command_rx, ticker));
    (SessionHandle { command_tx }, join)
}

async fn run(
    mut store: GameStore,
    mut command_rx: mpsc::Receiver<Command>,
    mut ticker: tokio::time::Interval,
) -> GameStore {
    let ttl = Duration::from_millis(store.config().notification_ttl_ms);
    let mut expiries: VecDeque<(Instant, u64)> = VecDeque::new();
    info!(interval_ms = store.config().tick_interval_ms, "session started");

    loop {
        let next_expiry = expiries
            .front()
            .map(|(at, _)| *at)
            .unwrap_or_else(Instant::now);
        tokio::select! {
            biased;
            _ = sleep_until(next_expiry), if !expiries.is_empty() => {
                if let Some((_, id)) = expiries.pop_front() {
                    if store.dismiss(id) {
                        debug!(id, "notification expired");
                    }
                }
            }
            _ = ticker.tick() => {
                store.tick();
            }
            command = command_rx.recv() => {
                let Some(command) = command else { break };
                let seen = store.last_notification_id();
                match command {
                    Command::Act { action, response } => {
                        let _ = response.send(store.dispatch(action));
                    }
                    Command::Snapshot { response } => {
                        let _ = response.send(store.snapshot());
                    }
                    Command::Notifications { response } => {
                        let _ = response.send(store.notifications().to_vec());
                    }
                    Command::Dismiss { id, response } => {
                        let _ = response.send(store.dismiss(id));
                    }
                    Command::Tick { response } => {
                        let _ = response.send(store.tick());
                    }
                    Command::Shutdown => break,
                }
                let deadline = Instant::now() + ttl;
                for id in seen + 1..=store.last_notification_id() {
                    expiries.push_back((deadline, id));
                }
            }
        }
    }

    info!(revision = store.revision(), "session stopped");
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sim_core::{EconomyConfig, Severity};
    use tokio::time::advance;

    fn start() -> (SessionHandle, JoinHandle<GameStore>) {
        spawn_session(GameStore::new(EconomyConfig::default()).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_follow_the_interval() {
        let (handle, _join) = start();
        advance(Duration::from_millis(2_999)).await;
        assert_eq!(handle.snapshot().await.unwrap().ticks, 0);
        advance(Duration::from_millis(1)).await;
        let snap = handle.snapshot().await.unwrap();
        assert_eq!(snap.ticks, 1);
        assert_eq!(snap.resources.credits, Decimal::from(1010));
    }

    #[tokio::test(start_paused = true)]
    async fn notifications_expire_after_ttl() {
        let (handle, _join) = start();
        handle.act(Action::BoostMorale).await.unwrap();
        let feed = handle.notifications().await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].severity, Severity::Success);
        advance(Duration::from_millis(4_999)).await;
        assert_eq!(handle.notifications().await.unwrap().len(), 1);
        advance(Duration::from_millis(1)).await;
        assert!(handle.notifications().await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_action_is_reported_and_notified() {
        let (handle, _join) = start();
        let err = handle.act(Action::ExploreSystem).await.unwrap_err();
        assert!(matches!(err, SessionError::Transaction(_)));
        let feed = handle.notifications().await.unwrap();
        assert_eq!(feed[0].severity, Severity::Error);
        assert!(handle.dismiss(feed[0].id).await.unwrap());
        assert!(handle.notifications().await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_returns_the_store() {
        let (handle, join) = start();
        handle.act(Action::TrainCrew).await.unwrap();
        handle.tick().await.unwrap();
        handle.shutdown().await.unwrap();
        let store = join.await.unwrap();
        assert_eq!(store.snapshot().ticks, 1);
        assert_eq!(store.resources().credits, Decimal::from(910));
        assert_eq!(handle.snapshot().await.unwrap_err(), SessionError::Closed);
    }
}
