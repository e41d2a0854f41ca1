//! Spring listeners and the registry that fans notifications out to them.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::spring::Spring;

/// Identifier for a registered spring listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Receives notifications from a [`Spring`].
///
/// Both callbacks default to no-ops. The spring passed in is the one that
/// fired; callbacks may register or remove listeners on it, and those changes
/// take effect from the next notification.
pub trait SpringListener: Send + Sync {
    /// The spring's value or velocity changed.
    fn on_update(&self, _spring: &Spring) {}

    /// The spring came to rest during the last `advance`.
    fn on_at_rest(&self, _spring: &Spring) {}
}

/// Which callback a fan-out delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Notification {
    /// `on_update` only.
    Update,
    /// `on_update` followed by `on_at_rest`, per listener.
    UpdateAndRest,
}

type Entry = (ListenerId, Arc<dyn SpringListener>);

/// Duplicate-free listener set with snapshot-then-iterate delivery.
pub(crate) struct Listeners {
    entries: RwLock<BTreeMap<ListenerId, Arc<dyn SpringListener>>>,
    next_id: AtomicU64,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl Default for Listeners {
    fn default() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Listeners {
    /// Registers `listener`, returning the existing id if the same `Arc` is
    /// already present.
    pub fn add(&self, listener: Arc<dyn SpringListener>) -> ListenerId {
        let mut entries = self.entries.write();
        let existing = entries
            .iter()
            .find(|(_, registered)| Arc::ptr_eq(registered, &listener))
            .map(|(id, _)| *id);
        if let Some(id) = existing {
            return id;
        }
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        entries.insert(id, listener);
        debug!(spring.listener_id = id.0, "Spring listener registered");
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let removed = self.entries.write().remove(&id).is_some();
        if removed {
            debug!(spring.listener_id = id.0, "Spring listener removed");
        }
        removed
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write();
        if !entries.is_empty() {
            debug!(
                spring.listener_count = entries.len(),
                "Spring listeners cleared"
            );
        }
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.read().contains_key(&id)
    }

    /// Delivers `notification` to every listener registered when the call
    /// starts.
    pub fn notify(&self, spring: &Spring, notification: Notification) {
        // The lock is released before any callback runs, so callbacks may
        // mutate the set.
        let snapshot: Vec<Entry> = self
            .entries
            .read()
            .iter()
            .map(|(id, listener)| (*id, Arc::clone(listener)))
            .collect();

        for (id, listener) in snapshot {
            let result = catch_unwind(AssertUnwindSafe(|| {
                listener.on_update(spring);
                if notification == Notification::UpdateAndRest {
                    listener.on_at_rest(spring);
                }
            }));
            if result.is_err() {
                warn!(
                    spring.listener_id = id.0,
                    spring.value = spring.current_value(),
                    "Spring listener panicked"
                );
            }
        }
    }
}
