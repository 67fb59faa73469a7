//! Momentary "active" state that expires on its own.
//!
//! Used for copy confirmation: the flagged identifier shows "Copied!" until
//! the expiry passes or another identifier is flagged.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// How long a flag stays set when nothing else is triggered.
pub const DEFAULT_EXPIRY: Duration = Duration::from_millis(2000);

/// Single-slot transient flag store.
///
/// At most one identifier is set at a time; triggering another one
/// replaces it immediately (last write wins).
#[derive(Debug)]
pub struct TransientFlag {
    shared: Arc<Shared>,
    expiry: Duration,
}

#[derive(Debug)]
struct Shared {
    slot: Mutex<Slot>,
    current: watch::Sender<Option<Arc<str>>>,
}

#[derive(Debug, Default)]
struct Slot {
    /// Flagged identifier and the instant it expires
    flagged: Option<(Arc<str>, Instant)>,

    /// Bumped on every trigger and clear; a scheduled clear only applies
    /// while its generation is current
    generation: u64,

    /// Scheduled clear for the current trigger
    pending: Option<JoinHandle<()>>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn expire(&self, generation: u64) {
        let mut slot = self.lock();
        if slot.generation != generation {
            return;
        }

        slot.pending = None;
        if let Some((id, _)) = slot.flagged.take() {
            tracing::debug!(id = %id, "Flag expired");
            self.current.send_replace(None);
        }
    }
}

impl TransientFlag {
    /// Create an empty store whose flags last for `expiry`.
    pub fn new(expiry: Duration) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot::default()),
                current,
            }),
            expiry,
        }
    }

    /// How long a flag stays set.
    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Flag `id` and schedule it to clear after the expiry.
    ///
    /// Any previously scheduled clear is cancelled.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn trigger(&self, id: impl Into<Arc<str>>) {
        let id: Arc<str> = id.into();
        let deadline = Instant::now() + self.expiry;

        let mut slot = self.shared.lock();
        if let Some(previous) = slot.pending.take() {
            previous.abort();
        }

        slot.generation = slot.generation.wrapping_add(1);
        let generation = slot.generation;
        slot.flagged = Some((Arc::clone(&id), deadline));

        let shared = Arc::clone(&self.shared);
        slot.pending = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            shared.expire(generation);
        }));

        tracing::debug!(id = %id, "Flag set");
        self.shared.current.send_replace(Some(id));
    }

    /// Check whether `id` is flagged and its expiry has not passed.
    pub fn is_active(&self, id: &str) -> bool {
        let slot = self.shared.lock();
        match &slot.flagged {
            Some((flagged, deadline)) => flagged.as_ref() == id && Instant::now() < *deadline,
            None => false,
        }
    }

    /// The flagged identifier, if any.
    pub fn current(&self) -> Option<Arc<str>> {
        let slot = self.shared.lock();
        slot.flagged
            .as_ref()
            .filter(|(_, deadline)| Instant::now() < *deadline)
            .map(|(id, _)| Arc::clone(id))
    }

    /// When the current flag expires.
    pub fn deadline(&self) -> Option<Instant> {
        self.shared.lock().flagged.as_ref().map(|(_, d)| *d)
    }

    /// Clear the flag now and cancel the scheduled clear.
    pub fn clear(&self) {
        let mut slot = self.shared.lock();
        if let Some(pending) = slot.pending.take() {
            pending.abort();
        }
        slot.generation = slot.generation.wrapping_add(1);

        if slot.flagged.take().is_some() {
            self.shared.current.send_replace(None);
        }
    }

    /// Subscribe to changes of the flagged identifier.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<str>>> {
        self.shared.current.subscribe()
    }
}

impl Default for TransientFlag {
    fn default() -> Self {
        Self::new(DEFAULT_EXPIRY)
    }
}

impl Drop for TransientFlag {
    fn drop(&mut self) {
        if let Some(pending) = self.shared.lock().pending.take() {
            pending.abort();
        }
    }
}
