//! Selector-based change subscriptions.
//!
//! # Invariants
//! - A listener only runs when its selected projection differs (`PartialEq`)
//!   from the value it last observed.
//! - Listeners run synchronously, in subscription order.

use crate::model::state::AppState;

/// Handle returned by `TaskStore::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Watcher = Box<dyn FnMut(&AppState) + Send>;

#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    watchers: Vec<(SubscriptionId, Watcher)>,
}

impl Subscribers {
    /// Registers `listener` for the projection chosen by `selector`.
    ///
    /// The current projection is captured as the baseline; registering does
    /// not invoke the listener.
    pub(crate) fn add<T, S, L>(
        &mut self,
        state: &AppState,
        selector: S,
        mut listener: L,
    ) -> SubscriptionId
    where
        T: PartialEq + Send + 'static,
        S: Fn(&AppState) -> T + Send + 'static,
        L: FnMut(&T) + Send + 'static,
    {
        let mut last = selector(state);
        let watcher: Watcher = Box::new(move |state: &AppState| {
            let next = selector(state);
            if next != last {
                listener(&next);
                last = next;
            }
        });

        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.watchers.push((id, watcher));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.watchers.len();
        self.watchers.retain(|(watcher_id, _)| *watcher_id != id);
        self.watchers.len() != before
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.watchers.len()
    }

    pub(crate) fn notify(&mut self, state: &AppState) {
        for (_, watcher) in &mut self.watchers {
            watcher(state);
        }
    }
}
