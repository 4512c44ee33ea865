//! Typed observer bus for record-change events.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use civi_core::SyncEvent;
use civi_resolver::RequestCache;

use crate::error::SyncError;

/// State scoped to one dispatch of one event.
///
/// Every observer of the same publish shares the pass, so descriptor lookups
/// made by one are cache hits for the next. A new pass starts empty.
#[derive(Debug, Default)]
pub struct SyncPass {
    cache: RequestCache,
}

impl SyncPass {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&mut self) -> &mut RequestCache {
        &mut self.cache
    }
}

/// Something that reacts to record changes published on a [`SyncBus`].
#[async_trait]
pub trait SyncObserver: Send + Sync {
    /// Short name used in logs and dispatch reports.
    fn name(&self) -> &str;

    /// Handle one event. Errors are reported by the bus and do not stop
    /// later observers.
    async fn on_event(&self, event: &SyncEvent, pass: &mut SyncPass) -> Result<(), SyncError>;
}

/// An observer that failed during a dispatch.
#[derive(Debug)]
pub struct ObserverFailure {
    pub observer: String,
    pub error: SyncError,
}

/// Outcome of one [`SyncBus::publish`].
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Observers that ran, failed or not.
    pub delivered: usize,
    pub failures: Vec<ObserverFailure>,
    /// Set when the publish was made from inside a pass of the same bus and
    /// was dropped without reaching any observer.
    pub dropped: bool,
}

impl DispatchReport {
    /// Delivered and every observer succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        !self.dropped && self.failures.is_empty()
    }
}

#[derive(Default)]
struct BusInner {
    observers: RwLock<Vec<Arc<dyn SyncObserver>>>,
    in_flight: AtomicUsize,
}

tokio::task_local! {
    /// Buses the current task is dispatching a pass for, outermost first.
    static DISPATCHING: Vec<usize>;
}

/// Dispatches [`SyncEvent`]s to registered observers in registration order.
///
/// Cloning yields another handle to the same bus, which is how an observer
/// can publish follow-up events. A publish made from inside one of this bus's
/// passes, on the same task, is dropped so a write one observer makes does not
/// echo back through the bridge. Publishes from other tasks always dispatch.
#[derive(Clone, Default)]
pub struct SyncBus {
    inner: Arc<BusInner>,
}

/// Counts a pass as in flight until it ends, including on unwind.
struct PassGuard<'a>(&'a AtomicUsize);

impl<'a> PassGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(counter)
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl SyncBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, observer: Arc<dyn SyncObserver>) {
        tracing::debug!(observer = observer.name(), "observer subscribed");
        self.inner
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether any task is currently dispatching a pass on this bus.
    #[must_use]
    pub fn is_dispatching(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire) > 0
    }

    fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    /// Deliver `event` to every observer with a fresh [`SyncPass`].
    pub async fn publish(&self, event: &SyncEvent) -> DispatchReport {
        let id = self.id();
        let mut active = DISPATCHING.try_with(Clone::clone).unwrap_or_default();
        if active.contains(&id) {
            tracing::debug!(
                entity = %event.entity,
                record_id = event.record_id,
                operation = %event.operation,
                "re-entrant publish dropped"
            );
            return DispatchReport {
                dropped: true,
                ..DispatchReport::default()
            };
        }
        active.push(id);
        DISPATCHING.scope(active, self.dispatch(event)).await
    }

    async fn dispatch(&self, event: &SyncEvent) -> DispatchReport {
        let _guard = PassGuard::enter(&self.inner.in_flight);

        // Snapshot so observers may subscribe others without deadlocking.
        let observers = self
            .inner
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut pass = SyncPass::new();
        let mut report = DispatchReport::default();
        for observer in observers {
            report.delivered += 1;
            if let Err(error) = observer.on_event(event, &mut pass).await {
                tracing::warn!(
                    observer = observer.name(),
                    entity = %event.entity,
                    record_id = event.record_id,
                    %error,
                    "sync observer failed"
                );
                report.failures.push(ObserverFailure {
                    observer: observer.name().to_string(),
                    error,
                });
            }
        }
        report
    }
}
