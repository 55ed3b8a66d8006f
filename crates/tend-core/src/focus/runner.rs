//! Periodic tick task for an active session.
//!
//! One tokio task owns the [`FocusEngine`] for the lifetime of a session.
//! Ticks and user commands meet only inside that task, so the counters never
//! see concurrent read-modify-write. Missed ticks (the process was suspended
//! or the runtime stalled) are skipped rather than replayed.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use uuid::Uuid;

use super::engine::{FocusEngine, SessionSummary};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::storage::KeyValueStore;

/// Each engine tick counts one second, so the runner must tick at exactly
/// this rate.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

enum Command {
    ToggleBreak(oneshot::Sender<Option<Event>>),
    SelectCategory(String, oneshot::Sender<Option<Event>>),
    ToggleTodo(Uuid, oneshot::Sender<Result<Option<Event>>>),
    Snapshot(oneshot::Sender<Event>),
    Summary(oneshot::Sender<SessionSummary>),
    End(oneshot::Sender<Option<Event>>),
}

/// Handle to a running session.
///
/// `end()` stops the task and hands the engine back in the `Ending` phase.
/// Dropping the handle also stops the task; the engine is then lost.
pub struct SessionRunner<S> {
    tx: mpsc::Sender<Command>,
    task: JoinHandle<FocusEngine<S>>,
}

impl<S> SessionRunner<S>
where
    S: KeyValueStore + Send + 'static,
{
    /// Start a session on `engine` and tick it every [`TICK_PERIOD`].
    ///
    /// Must be called from within a tokio runtime. The first tick lands one
    /// full period after the start.
    pub fn start(mut engine: FocusEngine<S>) -> (Self, Option<Event>) {
        let started = engine.start();
        let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let (tx, rx) = mpsc::channel(16);
        let task = tokio::spawn(run(engine, rx, ticker));
        (Self { tx, task }, started)
    }

    pub async fn toggle_break(&self) -> Result<Option<Event>> {
        self.request(Command::ToggleBreak).await
    }

    pub async fn select_category(&self, name: impl Into<String>) -> Result<Option<Event>> {
        let name = name.into();
        self.request(|reply| Command::SelectCategory(name, reply)).await
    }

    pub async fn toggle_todo(&self, id: Uuid) -> Result<Option<Event>> {
        self.request(|reply| Command::ToggleTodo(id, reply)).await?
    }

    pub async fn snapshot(&self) -> Result<Event> {
        self.request(Command::Snapshot).await
    }

    pub async fn summary(&self) -> Result<SessionSummary> {
        self.request(Command::Summary).await
    }

    /// End the session and take the engine back for saving or abandoning.
    pub async fn end(self) -> Result<(FocusEngine<S>, Option<Event>)> {
        let ended = self.request(Command::End).await?;
        let engine = self
            .task
            .await
            .map_err(|e| CoreError::Runner(e.to_string()))?;
        Ok((engine, ended))
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| CoreError::Runner("session runner stopped".into()))?;
        rx.await
            .map_err(|_| CoreError::Runner("session runner dropped the reply".into()))
    }
}

async fn run<S: KeyValueStore>(
    mut engine: FocusEngine<S>,
    mut rx: mpsc::Receiver<Command>,
    mut ticker: tokio::time::Interval,
) -> FocusEngine<S> {
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                engine.tick();
            }
            cmd = rx.recv() => match cmd {
                Some(Command::ToggleBreak(reply)) => {
                    let _ = reply.send(engine.toggle_break());
                }
                Some(Command::SelectCategory(name, reply)) => {
                    let _ = reply.send(engine.select_category(&name));
                }
                Some(Command::ToggleTodo(id, reply)) => {
                    let _ = reply.send(engine.toggle_completion(id));
                }
                Some(Command::Snapshot(reply)) => {
                    let _ = reply.send(engine.snapshot());
                }
                Some(Command::Summary(reply)) => {
                    let _ = reply.send(engine.summary());
                }
                Some(Command::End(reply)) => {
                    let _ = reply.send(engine.end_session());
                    break;
                }
                None => {
                    tracing::debug!("session handle dropped, stopping ticks");
                    break;
                }
            },
        }
    }
    engine
}
