//! Memoized dataset loading.
//!
//! Every dataset has one [`Loader`]: a locator, a [`Format`] and an owned
//! cache slot ([`Memoized`]). The first `load()` fetches and parses; every
//! later call returns the same `Arc` without touching the source.
//!
//! Policy:
//! * successes are cached until [`Memoized::invalidate`];
//! * failures are never cached, the next call fetches again;
//! * concurrent first calls share one in-flight fetch and all receive its
//!   outcome, success or error. Nothing is retried internally.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use log::{debug, error, info};

use crate::data::loader::Format;
use crate::error::{LoadError, Result};
use crate::source::ResourceSource;

// ---------------------------------------------------------------------------
// Memoized – the cache slot
// ---------------------------------------------------------------------------

type PendingLoad<T> = Shared<BoxFuture<'static, Result<Arc<T>>>>;

enum Slot<T> {
    Empty,
    /// A load is in flight; late callers await the same future.
    Pending(PendingLoad<T>),
    Ready(Arc<T>),
}

/// A cache slot holding at most one successfully computed value.
pub struct Memoized<T> {
    slot: Mutex<Slot<T>>,
}

impl<T> Default for Memoized<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(Slot::Empty),
        }
    }
}

impl<T> Memoized<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The cached value, if any. Never performs I/O.
    pub fn peek(&self) -> Option<Arc<T>> {
        match &*self.lock() {
            Slot::Ready(value) => Some(Arc::clone(value)),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(&*self.lock(), Slot::Ready(_))
    }

    /// Drop the cached value; the next `get_or_try_init` computes again.
    /// A load already in flight still resolves for its waiters but is not
    /// stored.
    pub fn invalidate(&self) {
        *self.lock() = Slot::Empty;
    }
}

impl<T: Send + Sync + 'static> Memoized<T> {
    /// Return the cached value or run `init` to produce it.
    ///
    /// While `init` is in flight every other caller awaits the same future
    /// and receives the same result. An `Err` empties the slot so the next
    /// call starts a fresh load.
    pub async fn get_or_try_init<F, Fut>(&self, init: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let pending = {
            let mut slot = self.lock();
            match &*slot {
                Slot::Ready(value) => return Ok(Arc::clone(value)),
                Slot::Pending(pending) => pending.clone(),
                Slot::Empty => {
                    let pending = init().map(|r| r.map(Arc::new)).boxed().shared();
                    *slot = Slot::Pending(pending.clone());
                    pending
                }
            }
        };

        let result = pending.clone().await;

        let mut slot = self.lock();
        // Only settle the slot if it still holds this load; `invalidate`
        // may have replaced it meanwhile.
        if let Slot::Pending(current) = &*slot {
            if current.ptr_eq(&pending) {
                *slot = match &result {
                    Ok(value) => Slot::Ready(Arc::clone(value)),
                    Err(_) => Slot::Empty,
                };
            }
        }
        result
    }
}

// ---------------------------------------------------------------------------
// Loader – one dataset
// ---------------------------------------------------------------------------

/// Fetch + parse + memoize for one resource.
pub struct Loader<F: Format> {
    locator: String,
    format: F,
    source: Arc<dyn ResourceSource>,
    cache: Memoized<F::Output>,
}

impl<F: Format> Loader<F> {
    pub fn new(locator: impl Into<String>, format: F, source: Arc<dyn ResourceSource>) -> Self {
        Self {
            locator: locator.into(),
            format,
            source,
            cache: Memoized::new(),
        }
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// Load the dataset, fetching only when nothing is cached.
    pub async fn load(&self) -> Result<Arc<F::Output>> {
        if let Some(cached) = self.cache.peek() {
            debug!("Using cached data for {}", self.locator);
            return Ok(cached);
        }
        let locator = self.locator.clone();
        let format = self.format.clone();
        let source = Arc::clone(&self.source);
        self.cache
            .get_or_try_init(move || fetch_and_parse(locator, format, source))
            .await
    }

    /// Cached value without I/O.
    pub fn cached(&self) -> Option<Arc<F::Output>> {
        self.cache.peek()
    }

    /// Forget the cached value so the next `load` refetches.
    pub fn invalidate(&self) {
        if self.cache.is_loaded() {
            info!("Invalidating cached data for {}", self.locator);
        }
        self.cache.invalidate();
    }
}

async fn fetch_and_parse<F: Format>(
    locator: String,
    format: F,
    source: Arc<dyn ResourceSource>,
) -> Result<F::Output> {
    let fetched = source.fetch(&locator).await?;
    if !fetched.is_success() {
        error!("Could not load {}: status {}", locator, fetched.status);
        return Err(LoadError::ResourceUnavailable {
            kind: format.kind(),
            locator,
            status: fetched.status,
        });
    }
    let output = format.parse(&fetched.body)?;
    info!("Loaded {}: {}", locator, F::describe(&output));
    Ok(output)
}
