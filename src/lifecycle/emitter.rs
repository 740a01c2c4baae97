// src/lifecycle/emitter.rs

use std::sync::{Arc, Mutex, PoisonError, Weak};

use anyhow::Result;

use super::Disposable;

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
}

/// Synchronous multi-listener event emitter.
///
/// Listeners run on the firing thread, in subscription order. The emitter
/// owns its listeners; a [`Subscription`] only holds a weak reference back,
/// so a subscriber never keeps the emitter (or whatever owns it) alive.
pub struct EventEmitter<T> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T> EventEmitter<T> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Register a listener. Release the returned subscription to remove it.
    #[must_use = "dropping the subscription leaves the listener attached with no way to remove it"]
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> Subscription<T> {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Arc::new(listener)));

        Subscription {
            registry: Arc::downgrade(&self.registry),
            id: Some(id),
        }
    }

    /// Deliver `event` to every listener registered at the time of the call.
    pub fn fire(&self, event: &T) {
        // Snapshot so listeners may subscribe/unsubscribe while being called.
        let listeners: Vec<Listener<T>> = {
            let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
            registry.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };
        for listener in listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .len()
    }
}

/// Clones share the same listener registry.
impl<T> Clone for EventEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<T> Default for EventEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for EventEmitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Handle for one registered listener.
pub struct Subscription<T> {
    registry: Weak<Mutex<Registry<T>>>,
    id: Option<u64>,
}

impl<T: 'static> Disposable for Subscription<T> {
    fn release(&mut self) -> Result<()> {
        let Some(id) = self.id.take() else {
            return Ok(());
        };
        // Emitter already gone: nothing left to detach from.
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
            registry.listeners.retain(|(lid, _)| *lid != id);
        }
        Ok(())
    }
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
