use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, Weak};

// ---------------------------------------------------------------------------
// Observable selection set
// ---------------------------------------------------------------------------

/// Immutable view of the selection handed to observers. A new snapshot is
/// built on every change, so a snapshot held by an observer never changes.
pub type Snapshot<T> = Arc<BTreeSet<T>>;

type Observer<T> = Arc<dyn Fn(&Snapshot<T>) + Send + Sync>;

struct Inner<T> {
    current: Snapshot<T>,
    observers: Vec<(u64, Observer<T>)>,
    next_id: u64,
}

/// Set of selected identifiers that notifies observers after every change.
///
/// Cloning the store yields another handle to the same set.
pub struct SelectionStore<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for SelectionStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Ord + Clone + Send + Sync + 'static> Default for SelectionStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone + Send + Sync + 'static> SelectionStore<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                current: Arc::new(BTreeSet::new()),
                observers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register `observer`. It is called right away with the current set,
    /// then once after every change until the returned handle is
    /// unsubscribed or dropped.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, observer: F) -> Subscription<T>
    where
        F: Fn(&Snapshot<T>) + Send + Sync + 'static,
    {
        let observer: Observer<T> = Arc::new(observer);
        let (id, current) = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.observers.push((id, Arc::clone(&observer)));
            (id, Arc::clone(&inner.current))
        };
        observer(&current);
        Subscription {
            store: Arc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    /// Current set. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Snapshot<T> {
        Arc::clone(&self.lock().current)
    }

    pub fn has(&self, item: &T) -> bool {
        self.lock().current.contains(item)
    }

    pub fn len(&self) -> usize {
        self.lock().current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().current.is_empty()
    }

    pub fn add(&self, item: T) {
        self.update(|set| {
            set.insert(item);
        });
    }

    /// Remove `item`. Observers are notified even if it was not selected.
    pub fn delete(&self, item: &T) {
        self.update(|set| {
            set.remove(item);
        });
    }

    pub fn clear(&self) {
        self.publish(|_| BTreeSet::new());
    }

    /// Select `item` if unselected, unselect it otherwise.
    pub fn toggle(&self, item: T) {
        self.update(|set| {
            if !set.remove(&item) {
                set.insert(item);
            }
        });
    }

    fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut BTreeSet<T>),
    {
        self.publish(|current| {
            let mut next = current.clone();
            f(&mut next);
            next
        });
    }

    fn publish<F>(&self, next: F)
    where
        F: FnOnce(&BTreeSet<T>) -> BTreeSet<T>,
    {
        // Observers run after the lock is released so they may call back
        // into the store.
        let (snapshot, observers) = {
            let mut inner = self.lock();
            let snapshot = Arc::new(next(&inner.current));
            inner.current = Arc::clone(&snapshot);
            let observers: Vec<(u64, Observer<T>)> = inner
                .observers
                .iter()
                .map(|(id, o)| (*id, Arc::clone(o)))
                .collect();
            (snapshot, observers)
        };
        for (id, observer) in observers {
            // An earlier observer in this round may have unsubscribed it.
            if self.is_registered(id) {
                observer(&snapshot);
            }
        }
    }

    fn is_registered(&self, id: u64) -> bool {
        self.lock().observers.iter().any(|(oid, _)| *oid == id)
    }

    #[cfg(test)]
    fn observer_count(&self) -> usize {
        self.lock().observers.len()
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Registration handle returned by [`SelectionStore::subscribe`].
pub struct Subscription<T> {
    store: Weak<Mutex<Inner<T>>>,
    id: Option<u64>,
}

impl<T> Subscription<T> {
    /// Stop receiving notifications.
    pub fn unsubscribe(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        let (Some(id), Some(store)) = (self.id.take(), self.store.upgrade()) else {
            return;
        };
        let mut inner = store.lock().unwrap_or_else(|e| e.into_inner());
        inner.observers.retain(|(oid, _)| *oid != id);
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.detach();
    }
}

// ---------------------------------------------------------------------------
// Application selections
// ---------------------------------------------------------------------------

/// Selected movies (by title id, e.g. `tt0068646`).
pub type MovieSelection = SelectionStore<String>;

/// Selected people (by person id, e.g. `nm0000008`).
pub type PeopleSelection = SelectionStore<String>;

/// The two selection domains the views share.
#[derive(Clone, Default)]
pub struct Selections {
    pub movies: MovieSelection,
    pub people: PeopleSelection,
}

impl Selections {
    pub fn new() -> Self {
        Self::default()
    }
}
