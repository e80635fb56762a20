//! Single-slot session outcome cell.
//!
//! The controller publishes the final session outcome through this cell
//! instead of binding to any UI mechanism; the presentation layer polls
//! [`OutcomeWatcher::current`] or awaits [`OutcomeWatcher::changed`].
//! Within one session the first write wins; later writes are ignored so a
//! duplicate invalidation can never overwrite the recorded outcome.

use tokio::sync::watch;

use nfctap_core::SessionOutcome;

/// Writer side of the outcome slot, owned by the session controller.
#[derive(Debug)]
pub struct OutcomeCell {
    tx: watch::Sender<Option<SessionOutcome>>,
}

impl OutcomeCell {
    /// Create an empty cell.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Store the outcome if the slot is empty.
    ///
    /// Returns `true` if the outcome was stored, `false` if the slot was
    /// already occupied (the stored value is kept).
    pub fn set_once(&self, outcome: SessionOutcome) -> bool {
        self.tx.send_if_modified(|slot| {
            if slot.is_none() {
                *slot = Some(outcome);
                true
            } else {
                false
            }
        })
    }

    /// Empty the slot for a new session.
    pub fn clear(&self) {
        self.tx.send_if_modified(|slot| slot.take().is_some());
    }

    /// The currently stored outcome, if any.
    pub fn get(&self) -> Option<SessionOutcome> {
        self.tx.borrow().clone()
    }

    /// Create a watcher for the presentation layer.
    pub fn subscribe(&self) -> OutcomeWatcher {
        OutcomeWatcher {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for OutcomeCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Reader side of the outcome slot.
#[derive(Debug, Clone)]
pub struct OutcomeWatcher {
    rx: watch::Receiver<Option<SessionOutcome>>,
}

impl OutcomeWatcher {
    /// The currently stored outcome, if any.
    pub fn current(&self) -> Option<SessionOutcome> {
        self.rx.borrow().clone()
    }

    /// Wait until the slot content changes, then return it.
    ///
    /// Returns `None` if the controller side is gone or the change
    /// emptied the slot (a new session starting).
    pub async fn changed(&mut self) -> Option<SessionOutcome> {
        self.rx.changed().await.ok()?;
        self.rx.borrow_and_update().clone()
    }
}
