//! Deferred views and their per-route memo.
//!
//! A route does not hold its view, it holds a [`ViewLoader`]: a producer
//! that returns a future resolving to the view. The first navigation to a
//! route runs the loader; the result is memoized in a [`ViewCache`] for the
//! lifetime of the tree.
//!
//! Overlapping loads are deduplicated. While a load for a route is in
//! flight, further requests for the same route wait for it instead of
//! calling the loader again. Loads of different routes never share state.
//! If the in-flight load fails or its future is dropped, the pending slot is
//! cleared and one of the waiters takes over.
//!
//! # Example
//!
//! ```
//! use shell_navigator::{lazy_view, RouteId, ViewCache};
//!
//! let loader = lazy_view(|| async { Ok::<_, shell_navigator::ViewLoadError>("filling view") });
//! let cache = ViewCache::new();
//!
//! let view = pollster::block_on(cache.get_or_load(RouteId::ROOT, &loader)).unwrap();
//! assert_eq!(*view, "filling view");
//! assert!(cache.is_loaded(RouteId::ROOT));
//! ```

use crate::error::ViewLoadError;
use crate::tree::RouteId;
use crate::trace_log;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll, Waker};

/// Future returned by a [`ViewLoader`].
pub type ViewFuture<V> = Pin<Box<dyn Future<Output = Result<V, ViewLoadError>> + Send>>;

type Producer<V> = Arc<dyn Fn() -> ViewFuture<V> + Send + Sync>;

/// Zero-argument producer of a view.
///
/// Cloning a loader is cheap; clones share the same producer.
pub struct ViewLoader<V> {
    produce: Producer<V>,
}

impl<V: Send + 'static> ViewLoader<V> {
    /// Wrap an async producer.
    pub fn new<F, Fut>(produce: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, ViewLoadError>> + Send + 'static,
    {
        Self {
            produce: Arc::new(move || Box::pin(produce()) as ViewFuture<V>),
        }
    }

    /// A loader whose view is already at hand.
    pub fn ready(view: V) -> Self
    where
        V: Clone + Sync,
    {
        Self::new(move || {
            let view = view.clone();
            async move { Ok::<_, ViewLoadError>(view) }
        })
    }
}

impl<V> ViewLoader<V> {
    /// Start a load. Each call invokes the producer once.
    pub fn load(&self) -> ViewFuture<V> {
        (self.produce)()
    }
}

impl<V> Clone for ViewLoader<V> {
    fn clone(&self) -> Self {
        Self {
            produce: Arc::clone(&self.produce),
        }
    }
}

impl<V> fmt::Debug for ViewLoader<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewLoader").finish_non_exhaustive()
    }
}

/// Create a [`ViewLoader`] from an async closure.
///
/// ```
/// use shell_navigator::{lazy_view, ViewLoadError};
///
/// let loader = lazy_view(|| async { Ok::<_, ViewLoadError>(42_u32) });
/// assert_eq!(pollster::block_on(loader.load()), Ok(42));
/// ```
pub fn lazy_view<V, F, Fut>(produce: F) -> ViewLoader<V>
where
    V: Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<V, ViewLoadError>> + Send + 'static,
{
    ViewLoader::new(produce)
}

enum Slot<V> {
    /// A leader is running the loader; wakers belong to waiting requests.
    Loading(Vec<Waker>),
    Ready(Arc<V>),
}

enum Claim<V> {
    Ready(Arc<V>),
    Lead,
    Wait,
}

/// Memo of loaded views keyed by [`RouteId`].
pub struct ViewCache<V> {
    slots: Mutex<HashMap<RouteId, Slot<V>>>,
}

impl<V> ViewCache<V> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<RouteId, Slot<V>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// `true` once a view for `id` has been loaded successfully.
    pub fn is_loaded(&self, id: RouteId) -> bool {
        matches!(self.lock().get(&id), Some(Slot::Ready(_)))
    }

    /// `true` while a load for `id` is in flight.
    pub fn is_pending(&self, id: RouteId) -> bool {
        matches!(self.lock().get(&id), Some(Slot::Loading(_)))
    }

    /// Number of memoized views.
    pub fn loaded_count(&self) -> usize {
        self.lock()
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }

    fn claim(&self, id: RouteId) -> Claim<V> {
        let mut slots = self.lock();
        match slots.get(&id) {
            Some(Slot::Ready(view)) => Claim::Ready(Arc::clone(view)),
            Some(Slot::Loading(_)) => Claim::Wait,
            None => {
                slots.insert(id, Slot::Loading(Vec::new()));
                Claim::Lead
            }
        }
    }

    /// Replace the pending slot for `id` and wake everyone waiting on it.
    fn release(&self, id: RouteId, view: Option<Arc<V>>) {
        let previous = {
            let mut slots = self.lock();
            match view {
                Some(view) => slots.insert(id, Slot::Ready(view)),
                None => slots.remove(&id),
            }
        };

        if let Some(Slot::Loading(waiters)) = previous {
            trace_log!("Waking {} waiter(s) for route #{}", waiters.len(), id.index());
            for waker in waiters {
                waker.wake();
            }
        }
    }
}

impl<V: Send + Sync + 'static> ViewCache<V> {
    /// Return the memoized view for `id`, loading it with `loader` if needed.
    ///
    /// The loader runs at most once per successful load; concurrent callers
    /// for the same `id` share that load.
    pub async fn get_or_load(
        &self,
        id: RouteId,
        loader: &ViewLoader<V>,
    ) -> Result<Arc<V>, ViewLoadError> {
        loop {
            match self.claim(id) {
                Claim::Ready(view) => {
                    trace_log!("View memo hit for route #{}", id.index());
                    return Ok(view);
                }
                Claim::Wait => {
                    trace_log!("Waiting on in-flight view load for route #{}", id.index());
                    if let Some(view) = (WaitForView { cache: self, id }).await {
                        return Ok(view);
                    }
                    // The leader gave up without a view; claim again.
                }
                Claim::Lead => {
                    let guard = LeaderGuard {
                        cache: self,
                        id,
                        settled: false,
                    };
                    let result = loader.load().await;
                    return guard.settle(result);
                }
            }
        }
    }
}

impl<V> Default for ViewCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for ViewCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.lock();
        let pending = slots
            .values()
            .filter(|slot| matches!(slot, Slot::Loading(_)))
            .count();
        f.debug_struct("ViewCache")
            .field("loaded", &(slots.len() - pending))
            .field("pending", &pending)
            .finish()
    }
}

/// Clears the pending slot if the leading load is dropped before settling.
struct LeaderGuard<'a, V> {
    cache: &'a ViewCache<V>,
    id: RouteId,
    settled: bool,
}

impl<V> LeaderGuard<'_, V> {
    fn settle(mut self, result: Result<V, ViewLoadError>) -> Result<Arc<V>, ViewLoadError> {
        self.settled = true;
        match result {
            Ok(view) => {
                let view = Arc::new(view);
                self.cache.release(self.id, Some(Arc::clone(&view)));
                Ok(view)
            }
            Err(err) => {
                self.cache.release(self.id, None);
                Err(err)
            }
        }
    }
}

impl<V> Drop for LeaderGuard<'_, V> {
    fn drop(&mut self) {
        if !self.settled {
            trace_log!("View load for route #{} abandoned", self.id.index());
            self.cache.release(self.id, None);
        }
    }
}

/// Resolves once the pending slot for `id` is settled.
///
/// Yields `None` when the slot was cleared without a view.
struct WaitForView<'a, V> {
    cache: &'a ViewCache<V>,
    id: RouteId,
}

impl<V> Future for WaitForView<'_, V> {
    type Output = Option<Arc<V>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut slots = self.cache.lock();
        match slots.get_mut(&self.id) {
            Some(Slot::Ready(view)) => Poll::Ready(Some(Arc::clone(view))),
            Some(Slot::Loading(waiters)) => {
                if !waiters.iter().any(|w| w.will_wake(cx.waker())) {
                    waiters.push(cx.waker().clone());
                }
                Poll::Pending
            }
            None => Poll::Ready(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_loader(calls: &Arc<AtomicUsize>) -> ViewLoader<String> {
        let calls = Arc::clone(calls);
        lazy_view(move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok::<_, ViewLoadError>(format!("view #{n}")) }
        })
    }

    #[test]
    fn test_loader_runs_once_then_memoized() {
        let calls = Arc::new(AtomicUsize::new(0));
        let loader = counting_loader(&calls);
        let cache = ViewCache::new();
        let id = RouteId::ROOT;

        let first = pollster::block_on(cache.get_or_load(id, &loader)).unwrap();
        let second = pollster::block_on(cache.get_or_load(id, &loader)).unwrap();

        assert_eq!(*first, "view #1");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.loaded_count(), 1);
    }

    #[test]
    fn test_failed_load_is_not_memoized() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let loader: ViewLoader<&'static str> = lazy_view(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(ViewLoadError::new("offline"))
                } else {
                    Ok("tools")
                }
            }
        });
        let cache = ViewCache::new();

        let err = pollster::block_on(cache.get_or_load(RouteId::ROOT, &loader)).unwrap_err();
        assert_eq!(err.message(), "offline");
        assert!(!cache.is_loaded(RouteId::ROOT));
        assert!(!cache.is_pending(RouteId::ROOT));

        let view = pollster::block_on(cache.get_or_load(RouteId::ROOT, &loader)).unwrap();
        assert_eq!(*view, "tools");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_ready_loader() {
        let loader = ViewLoader::ready("demo");
        assert_eq!(pollster::block_on(loader.load()), Ok("demo"));
        assert_eq!(pollster::block_on(loader.clone().load()), Ok("demo"));
    }
}
