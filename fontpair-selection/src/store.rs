//! Owner of the live selection, with change notification.
//!
//! Observers are registered as `Arc<Mutex<O>>` and held weakly: once the
//! last strong reference goes away the subscription is pruned on the next
//! notification. Every mutation is a single transition; observers only ever
//! see whole states.

use crate::error::SelectionError;
use crate::preset::Preset;
use crate::role::Role;
use crate::state::{FieldUpdate, SelectionState};
use fontpair_catalog::Catalog;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Receives every new selection state after a transition.
pub trait SelectionObserver: Send {
    fn on_selection_changed(&mut self, state: &SelectionState);
}

impl<F> SelectionObserver for F
where
    F: FnMut(&SelectionState) + Send,
{
    fn on_selection_changed(&mut self, state: &SelectionState) {
        self(state)
    }
}

/// Handle returned by [`SelectionStore::subscribe`].
pub type SubscriptionId = u64;

type ObserverRef = Weak<Mutex<dyn SelectionObserver>>;

pub struct SelectionStore {
    state: SelectionState,
    observers: Vec<(SubscriptionId, ObserverRef)>,
    next_id: SubscriptionId,
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new(SelectionState::default())
    }
}

impl SelectionStore {
    pub fn new(initial: SelectionState) -> Self {
        Self {
            state: initial,
            observers: Vec::new(),
            next_id: 1,
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Replace one field of one role. Invalid values leave the state as is.
    pub fn update(&mut self, role: Role, update: FieldUpdate) -> Result<(), SelectionError> {
        let next = self.state.update(role, update)?;
        self.transition(next);
        Ok(())
    }

    /// Font picker change for `role`, with weight snapping against `catalog`.
    pub fn select_font(&mut self, role: Role, font_id: &str, catalog: &Catalog) {
        let next = self.state.select_font(role, font_id, catalog);
        self.transition(next);
    }

    /// Set a role's font with weight snapping; reselecting the current font
    /// is a no-op here.
    pub fn set_font(&mut self, role: Role, font_id: &str, catalog: &Catalog) {
        let next = self.state.with_font(role, font_id, catalog);
        self.transition(next);
    }

    /// Replace the whole selection with `preset` in one step. A preset
    /// with an out-of-range weight or size is rejected and nothing changes.
    pub fn apply(&mut self, preset: &Preset) -> Result<(), SelectionError> {
        preset.validate()?;
        self.transition(preset.clone());
        Ok(())
    }

    /// Register an observer. It stays subscribed until [`unsubscribe`] is
    /// called or every strong reference to it is dropped.
    ///
    /// [`unsubscribe`]: SelectionStore::unsubscribe
    pub fn subscribe<O>(&mut self, observer: &Arc<Mutex<O>>) -> SubscriptionId
    where
        O: SelectionObserver + 'static,
    {
        let weak: ObserverRef = Arc::downgrade(observer) as Weak<Mutex<dyn SelectionObserver>>;
        let id = self.next_id;
        self.next_id += 1;
        self.observers.push((id, weak));
        log::debug!("Selection observer {} subscribed", id);
        id
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        before != self.observers.len()
    }

    /// Number of subscriptions whose observer is still alive.
    pub fn observer_count(&self) -> usize {
        self.observers
            .iter()
            .filter(|(_, weak)| weak.strong_count() > 0)
            .count()
    }

    fn transition(&mut self, next: SelectionState) {
        if next == self.state {
            return;
        }
        self.state = next;
        self.notify();
    }

    fn notify(&mut self) {
        let state = &self.state;
        self.observers.retain(|(id, weak)| match weak.upgrade() {
            Some(observer) => {
                observer.lock().on_selection_changed(state);
                true
            }
            None => {
                log::trace!("Pruning dropped selection observer {}", id);
                false
            }
        });
    }
}
