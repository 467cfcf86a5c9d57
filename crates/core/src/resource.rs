//! Async resource lifecycle.
//!
//! An [`AsyncResource`] tracks one remote-fetched value through its
//! data / loading / error lifecycle. It is a cheap cloneable handle: clones
//! share the same state, so a store can hand a resource to a producer closure
//! or to a concurrent task without giving up ownership.
//!
//! # Concurrency
//!
//! Overlapping calls to [`AsyncResource::run`] are allowed. Writes to `data`
//! and `error` follow real completion order, not call order (last writer
//! wins). The resource never cancels a superseded call itself; it only
//! recognizes a cancellation reported by the producer's error. `loading`
//! stays true until every overlapping call has settled.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::failure::{Failure, describe_failure};

/// Point-in-time copy of a resource's state.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    /// Last successfully produced value.
    pub data: Option<T>,
    /// Message of the last reported failure.
    pub error: Option<String>,
    /// Whether a producer is in flight.
    pub loading: bool,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            loading: false,
        }
    }
}

struct Inner<T> {
    data: Option<T>,
    error: Option<String>,
    in_flight: usize,
    /// Bumped whenever a call starts or settles.
    generation: u64,
}

impl<T> Inner<T> {
    fn settle(&mut self, data: Option<T>) {
        self.data = data;
        self.error = None;
        self.generation += 1;
    }

    fn fail(&mut self, message: String) {
        self.error = Some(message);
        self.generation += 1;
    }
}

/// State captured when a call starts.
struct Started {
    previous_error: Option<String>,
    generation: u64,
}

/// Container for the lifecycle of one remote value.
pub struct AsyncResource<T> {
    inner: Arc<RwLock<Inner<T>>>,
}

impl<T> Clone for AsyncResource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for AsyncResource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for AsyncResource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("AsyncResource")
            .field("data", &inner.data)
            .field("error", &inner.error)
            .field("loading", &(inner.in_flight > 0))
            .finish()
    }
}

/// Resets the in-flight count on every exit path, including drop of the
/// `run` future mid-await.
struct InFlight<'a, T> {
    inner: &'a RwLock<Inner<T>>,
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        let mut inner = self.inner.write();
        inner.in_flight = inner.in_flight.saturating_sub(1);
    }
}

impl<T> AsyncResource<T> {
    /// Create an empty resource: no data, no error, not loading.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                data: None,
                error: None,
                in_flight: 0,
                generation: 0,
            })),
        }
    }

    /// Whether a producer is currently in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.read().in_flight > 0
    }

    /// Message of the last reported failure.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.inner.read().error.clone()
    }

    /// Borrow the current data for the duration of `f`.
    pub fn with_data<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        f(self.inner.read().data.as_ref())
    }

    /// Replace the stored data without touching `error` or `loading`.
    ///
    /// Used by owning stores to upsert a record into a cached list.
    pub fn set_data(&self, data: Option<T>) {
        self.inner.write().data = data;
    }

    /// Mutate the stored data in place.
    pub fn update_data(&self, f: impl FnOnce(&mut Option<T>)) {
        f(&mut self.inner.write().data);
    }

    fn begin(&self) -> (InFlight<'_, T>, Started) {
        let mut inner = self.inner.write();
        inner.in_flight += 1;
        inner.generation += 1;
        let started = Started {
            previous_error: inner.error.take(),
            generation: inner.generation,
        };
        (
            InFlight {
                inner: &self.inner,
            },
            started,
        )
    }

    /// A cancelled call puts back the error it cleared, unless another call
    /// has started or settled since.
    fn record_failure<E>(&self, error: &E, started: Started)
    where
        E: Failure + fmt::Display,
    {
        if error.is_cancelled() {
            debug!(reason = %error, "Discarding cancelled request");
            let mut inner = self.inner.write();
            if inner.generation == started.generation {
                inner.error = started.previous_error;
            }
        } else {
            let message = describe_failure(error);
            warn!(error = %error, message = %message, "Remote call failed");
            self.inner.write().fail(message);
        }
    }
}

impl<T: Clone> AsyncResource<T> {
    /// Current data, cloned.
    #[must_use]
    pub fn data(&self) -> Option<T> {
        self.inner.read().data.clone()
    }

    /// Copy of the full state.
    #[must_use]
    pub fn snapshot(&self) -> ResourceState<T> {
        let inner = self.inner.read();
        ResourceState {
            data: inner.data.clone(),
            error: inner.error.clone(),
            loading: inner.in_flight > 0,
        }
    }

    /// Run `producer` and drive the resource through its lifecycle.
    ///
    /// Clears `error` and marks the resource loading, awaits the producer
    /// once (no retry), then:
    /// - on success stores the value into `data` and clears `error`;
    /// - on a cancelled failure leaves `data` and `error` as they were before
    ///   this call, unless a newer call has started or settled meanwhile;
    /// - on any other failure stores a readable message into `error`, keeping
    ///   the last successful `data`.
    ///
    /// Returns the resource's data after settling, which is `None` if
    /// nothing has ever succeeded.
    pub async fn run<F, Fut, E>(&self, producer: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Failure + fmt::Display,
    {
        self.run_optional(|| async move { producer().await.map(Some) })
            .await
    }

    /// Like [`run`](Self::run) for producers that may succeed without a
    /// value. A successful `None` clears `data` (e.g. after a delete).
    pub async fn run_optional<F, Fut, E>(&self, producer: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<Option<T>, E>>,
        E: Failure + fmt::Display,
    {
        let (guard, started) = self.begin();
        match producer().await {
            Ok(value) => self.inner.write().settle(value),
            Err(e) => self.record_failure(&e, started),
        }
        drop(guard);
        self.data()
    }

    /// Like [`run`](Self::run), but hands the producer's outcome back to
    /// the caller as well. Used where a batch needs per-call failures.
    pub async fn try_run<F, Fut, E>(&self, producer: F) -> std::result::Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Failure + fmt::Display,
    {
        let (guard, started) = self.begin();
        let outcome = producer().await;
        match &outcome {
            Ok(value) => self.inner.write().settle(Some(value.clone())),
            Err(e) => self.record_failure(e, started),
        }
        drop(guard);
        outcome
    }
}
