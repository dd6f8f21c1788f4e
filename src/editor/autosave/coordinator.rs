//! # Auto-Save Coordinator
//!
//! One coordinator task per editor session. The task owns all save
//! bookkeeping; handles talk to it over a command channel, so `on_change`
//! never blocks the editor.
//!
//! ## Architecture
//!
//! The task waits on three sources at once:
//! - **Commands** from handles (changes, manual saves, rebinds, shutdown)
//! - **The in-flight save**, a spawned task whose `JoinHandle` is the only
//!   in-flight slot
//! - **The debounce deadline**, re-armed by every change
//!
//! Save results are tagged with the session generation. A rebind or
//! teardown bumps or abandons the generation, and a result that comes back
//! for an older one is dropped on the floor.

use super::saver::DocumentSaver;
use super::state::SaveState;
use super::AutoSaveSettings;
use crate::shared::{SaveError, SaveEvent, SaveReceipt, SaveTarget};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Buffered save events per subscriber
const EVENT_CAPACITY: usize = 64;

/// Result of a manual save request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualSave {
    /// A save started with the pending content
    Started,
    /// A save is in flight; the pending content goes out right after it
    Queued,
    /// A save is in flight and nothing changed since it started
    AlreadySaving,
    /// Nothing pending and nothing in flight; no save was issued
    NothingToSave,
}

#[derive(Debug)]
enum Command {
    Change(String),
    SaveNow(oneshot::Sender<ManualSave>),
    Flush(oneshot::Sender<Result<(), SaveError>>),
    Rebind {
        target: SaveTarget,
        done: oneshot::Sender<()>,
    },
    Reset(oneshot::Sender<()>),
    Shutdown,
}

/// What to do once the in-flight save resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum FollowUp {
    None,
    Debounced,
    Immediate,
}

struct InFlight {
    generation: u64,
    target: SaveTarget,
    content: String,
    task: JoinHandle<Result<SaveReceipt, SaveError>>,
}

/// Handle to a running coordinator.
///
/// Cheap to clone. When the last handle is dropped the coordinator shuts
/// down exactly as if [`AutoSaveHandle::shutdown`] had been called.
#[derive(Debug, Clone)]
pub struct AutoSaveHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<SaveState>,
    events: broadcast::Sender<SaveEvent>,
}

impl AutoSaveHandle {
    /// Record the editor's latest content and restart the debounce timer
    pub fn on_change(&self, content: impl Into<String>) -> Result<(), SaveError> {
        self.send(Command::Change(content.into()))
    }

    /// Save the pending content now, skipping the debounce
    pub async fn save_now(&self) -> Result<ManualSave, SaveError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::SaveNow(tx))?;
        rx.await.map_err(|_| SaveError::SessionClosed)
    }

    /// Save the pending content now and wait until nothing is in flight.
    ///
    /// Resolves with the error of the last failed save, if the session is
    /// left with unsaved content.
    pub async fn flush(&self) -> Result<(), SaveError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Flush(tx))?;
        rx.await.map_err(|_| SaveError::SessionClosed)?
    }

    /// Bind the session to another document.
    ///
    /// Pending content and the debounce timer are dropped; a save still in
    /// flight finishes but its result is ignored.
    pub async fn rebind(&self, target: SaveTarget) -> Result<(), SaveError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Rebind { target, done: tx })?;
        rx.await.map_err(|_| SaveError::SessionClosed)
    }

    /// Drop local edits for the current document.
    ///
    /// Like [`AutoSaveHandle::rebind`] to the same document, except that a
    /// draft whose create request is still in flight keeps the id the
    /// server assigns, so the draft is never created a second time.
    pub async fn reset(&self) -> Result<(), SaveError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Reset(tx))?;
        rx.await.map_err(|_| SaveError::SessionClosed)
    }

    /// Tear the session down. No save is issued after this.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Latest published state.
    ///
    /// Commands are processed asynchronously, so a change sent a moment ago
    /// may not be reflected yet; use [`AutoSaveHandle::subscribe_state`] to
    /// follow transitions.
    pub fn state(&self) -> SaveState {
        self.state.borrow().clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<SaveState> {
        self.state.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SaveEvent> {
        self.events.subscribe()
    }

    fn send(&self, command: Command) -> Result<(), SaveError> {
        self.commands
            .send(command)
            .map_err(|_| SaveError::SessionClosed)
    }
}

/// The task behind an [`AutoSaveHandle`]
pub struct AutoSaveCoordinator<S> {
    saver: Arc<S>,
    settings: AutoSaveSettings,
    target: SaveTarget,
    generation: u64,
    pending: Option<String>,
    deadline: Option<Instant>,
    in_flight: Option<InFlight>,
    /// Generation of a superseded draft create whose id the current target still needs
    orphaned_draft: Option<u64>,
    follow_up: FollowUp,
    last_saved_at: Option<chrono::DateTime<Utc>>,
    last_error: Option<SaveError>,
    flush_waiters: Vec<oneshot::Sender<Result<(), SaveError>>>,
    state: watch::Sender<SaveState>,
    events: broadcast::Sender<SaveEvent>,
}

impl<S: DocumentSaver> AutoSaveCoordinator<S> {
    /// Start a coordinator for one editor session.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(target: SaveTarget, saver: S, settings: AutoSaveSettings) -> AutoSaveHandle {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SaveState::new(target));
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);

        let coordinator = Self {
            saver: Arc::new(saver),
            settings,
            target,
            generation: 0,
            pending: None,
            deadline: None,
            in_flight: None,
            orphaned_draft: None,
            follow_up: FollowUp::None,
            last_saved_at: None,
            last_error: None,
            flush_waiters: Vec::new(),
            state: state_tx,
            events: events_tx.clone(),
        };

        debug!(
            document = %target,
            debounce_ms = settings.debounce.as_millis() as u64,
            "auto-save session mounted"
        );
        tokio::spawn(coordinator.run(commands_rx));

        AutoSaveHandle {
            commands: commands_tx,
            state: state_rx,
            events: events_tx,
        }
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        loop {
            let deadline = self.deadline;
            tokio::select! {
                biased;
                command = commands.recv() => match command {
                    Some(command) => {
                        if !self.handle(command) {
                            break;
                        }
                    }
                    None => break,
                },
                joined = wait_for(&mut self.in_flight) => self.complete(joined),
                _ = sleep_until(deadline) => {
                    self.deadline = None;
                    self.fire(false);
                }
            }
            self.publish();
        }
        self.teardown();
    }

    /// Returns false when the session should stop
    fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Change(content) => {
                self.pending = Some(content);
                self.deadline = Some(Instant::now() + self.settings.debounce);
            }
            Command::SaveNow(reply) => {
                self.deadline = None;
                let outcome = self.fire(true);
                debug!(document = %self.target, ?outcome, "manual save");
                let _ = reply.send(outcome);
            }
            Command::Flush(reply) => {
                self.flush_waiters.push(reply);
                self.deadline = None;
                self.fire(true);
                if self.in_flight.is_none() {
                    self.resolve_flush();
                }
            }
            Command::Rebind { target, done } => {
                self.rebind(target);
                let _ = done.send(());
            }
            Command::Reset(done) => {
                self.reset();
                let _ = done.send(());
            }
            Command::Shutdown => return false,
        }
        true
    }

    /// Timer expiry or manual trigger
    fn fire(&mut self, manual: bool) -> ManualSave {
        if self.in_flight.is_some() {
            if self.pending.is_none() {
                return ManualSave::AlreadySaving;
            }
            let wanted = if manual {
                FollowUp::Immediate
            } else {
                FollowUp::Debounced
            };
            self.follow_up = self.follow_up.max(wanted);
            debug!(document = %self.target, "save in flight, queued follow-up");
            return ManualSave::Queued;
        }

        match self.pending.take() {
            Some(content) => {
                self.start(content);
                ManualSave::Started
            }
            None => ManualSave::NothingToSave,
        }
    }

    fn start(&mut self, content: String) {
        let saver = Arc::clone(&self.saver);
        let target = self.target;
        let timeout = self.settings.timeout;
        let payload = content.clone();

        let task = tokio::spawn(async move {
            let save = saver.save(target, payload);
            match timeout {
                Some(limit) => tokio::time::timeout(limit, save)
                    .await
                    .unwrap_or_else(|_| {
                        Err(SaveError::Timeout {
                            after_ms: limit.as_millis() as u64,
                        })
                    }),
                None => save.await,
            }
        });

        debug!(document = %target, bytes = content.len(), "auto-save started");
        self.emit(SaveEvent::Started { target });
        self.in_flight = Some(InFlight {
            generation: self.generation,
            target,
            content,
            task,
        });
    }

    fn complete(&mut self, joined: Result<Result<SaveReceipt, SaveError>, JoinError>) {
        let Some(flight) = self.in_flight.take() else {
            return;
        };
        let result = joined.unwrap_or_else(|e| {
            Err(SaveError::Aborted {
                message: e.to_string(),
            })
        });

        let orphaned = self.orphaned_draft.take() == Some(flight.generation);
        if flight.generation != self.generation {
            match result {
                Ok(receipt) if orphaned && self.target.is_draft() => {
                    self.target = SaveTarget::Existing(receipt.document_id);
                    info!(
                        document = %self.target,
                        "draft created by a superseded save, keeping its id"
                    );
                }
                _ => debug!(document = %flight.target, "discarding result of superseded save"),
            }
        } else {
            match result {
                Ok(receipt) => self.saved(receipt),
                Err(error) => self.failed(error, flight),
            }
        }

        match std::mem::replace(&mut self.follow_up, FollowUp::None) {
            FollowUp::Immediate => {
                self.deadline = None;
                self.fire(true);
            }
            FollowUp::Debounced => {
                self.deadline = Some(Instant::now() + self.settings.debounce);
            }
            FollowUp::None => {}
        }

        // a flush covers edits that arrived while it was waiting
        if !self.flush_waiters.is_empty()
            && self.in_flight.is_none()
            && self.pending.is_some()
            && self.last_error.is_none()
        {
            self.deadline = None;
            self.fire(true);
        }

        if self.in_flight.is_none() {
            self.resolve_flush();
        }
    }

    fn saved(&mut self, receipt: SaveReceipt) {
        if self.target.is_draft() {
            self.target = SaveTarget::Existing(receipt.document_id);
        }
        let at = Utc::now();
        self.last_saved_at = Some(at);
        self.last_error = None;

        info!(document = %self.target, version = ?receipt.version, "document saved");
        self.emit(SaveEvent::Saved {
            target: self.target,
            at,
            version: receipt.version,
        });
    }

    fn failed(&mut self, error: SaveError, flight: InFlight) {
        warn!(document = %flight.target, %error, "auto-save failed");
        if self.pending.is_none() {
            self.pending = Some(flight.content);
        }
        self.last_error = Some(error.clone());
        self.emit(SaveEvent::Failed {
            target: flight.target,
            error,
        });
    }

    fn rebind(&mut self, target: SaveTarget) {
        self.generation += 1;
        if target != self.target {
            self.last_saved_at = None;
        }
        debug!(
            from = %self.target,
            to = %target,
            generation = self.generation,
            "auto-save rebound"
        );

        self.target = target;
        self.orphaned_draft = None;
        self.discard_local();
    }

    fn reset(&mut self) {
        if let Some(flight) = &self.in_flight {
            if flight.target.is_draft() && self.target.is_draft() {
                self.orphaned_draft = Some(flight.generation);
            }
        }
        self.generation += 1;
        debug!(document = %self.target, generation = self.generation, "auto-save reset");
        self.discard_local();
    }

    fn discard_local(&mut self) {
        self.pending = None;
        self.deadline = None;
        self.follow_up = FollowUp::None;
        self.last_error = None;
        for waiter in self.flush_waiters.drain(..) {
            let _ = waiter.send(Err(SaveError::SessionClosed));
        }
    }

    fn resolve_flush(&mut self) {
        let outcome = match &self.last_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        };
        for waiter in self.flush_waiters.drain(..) {
            let _ = waiter.send(outcome.clone());
        }
    }

    fn snapshot(&self) -> SaveState {
        SaveState {
            target: self.target,
            is_saving: self.in_flight.is_some(),
            last_saved_at: self.last_saved_at,
            pending_content: self.pending.clone(),
            dirty_while_saving: self.follow_up != FollowUp::None,
            last_error: self.last_error.clone(),
        }
    }

    fn publish(&self) {
        let snapshot = self.snapshot();
        self.state.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }

    fn emit(&self, event: SaveEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    fn teardown(mut self) {
        if let Some(flight) = self.in_flight.take() {
            // dropping the JoinHandle detaches the save; it may still land on the server
            debug!(
                document = %flight.target,
                "session closed with a save in flight, result will be ignored"
            );
        }
        for waiter in self.flush_waiters.drain(..) {
            let _ = waiter.send(Err(SaveError::SessionClosed));
        }
        debug!(document = %self.target, "auto-save session unmounted");
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn wait_for(
    in_flight: &mut Option<InFlight>,
) -> Result<Result<SaveReceipt, SaveError>, JoinError> {
    match in_flight {
        Some(flight) => (&mut flight.task).await,
        None => std::future::pending().await,
    }
}
