//! Reference-counted loading indicator.
//!
//! Every in-flight operation holds one count. The registered observer is
//! shown while the count is positive and hidden when it drops back to zero.
//! A [`LoadingSignal`] is created by the application root and cloned into
//! whatever needs it; clones share the same counter.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

/// Whatever renders the loading overlay.
pub trait LoadingObserver: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

#[derive(Default)]
struct State {
    count: usize,
    observer: Option<Arc<dyn LoadingObserver>>,
}

#[derive(Clone, Default)]
pub struct LoadingSignal {
    state: Arc<Mutex<State>>,
}

enum Notify {
    Show,
    Hide,
}

impl LoadingSignal {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Observer callbacks run after the lock is released so an observer may
    /// query the signal.
    fn notify(observer: Option<Arc<dyn LoadingObserver>>, what: Notify) {
        if let Some(observer) = observer {
            match what {
                Notify::Show => observer.show(),
                Notify::Hide => observer.hide(),
            }
        }
    }

    /// Start one operation and show the overlay.
    pub fn increment(&self) {
        let observer = {
            let mut state = self.lock();
            state.count += 1;
            log::debug!("loading count -> {}", state.count);
            state.observer.clone()
        };
        Self::notify(observer, Notify::Show);
    }

    /// Finish one operation; hides the overlay when the last one finishes.
    ///
    /// A decrement with nothing in flight leaves the count at zero and does
    /// not fire `hide` again.
    pub fn decrement(&self) {
        let observer = {
            let mut state = self.lock();
            if state.count == 0 {
                log::debug!("unmatched loading decrement ignored");
                return;
            }
            state.count -= 1;
            log::debug!("loading count -> {}", state.count);
            if state.count > 0 {
                return;
            }
            state.observer.clone()
        };
        Self::notify(observer, Notify::Hide);
    }

    /// Drop every count and hide, whatever was in flight.
    pub fn force_reset(&self) {
        let observer = {
            let mut state = self.lock();
            if state.count > 0 {
                log::warn!("loading signal reset with {} operation(s) in flight", state.count);
            }
            state.count = 0;
            state.observer.clone()
        };
        Self::notify(observer, Notify::Hide);
    }

    /// Attach the overlay and bring it in line with the current count.
    pub fn register(&self, observer: Arc<dyn LoadingObserver>) {
        let busy = {
            let mut state = self.lock();
            state.observer = Some(observer.clone());
            state.count > 0
        };
        Self::notify(Some(observer), if busy { Notify::Show } else { Notify::Hide });
    }

    /// Detach the overlay. The count keeps tracking silently.
    pub fn unregister(&self) {
        self.lock().observer = None;
    }

    pub fn count(&self) -> usize {
        self.lock().count
    }

    pub fn is_busy(&self) -> bool {
        self.count() > 0
    }

    pub fn is_registered(&self) -> bool {
        self.lock().observer.is_some()
    }

    /// Increment now and decrement when the returned guard is dropped.
    pub fn guard(&self) -> LoadingGuard {
        self.increment();
        LoadingGuard {
            signal: self.clone(),
        }
    }

    /// Run `operation` with the overlay shown, on success and on error alike.
    pub async fn track<F: Future>(&self, operation: F) -> F::Output {
        let _busy = self.guard();
        operation.await
    }
}

impl std::fmt::Debug for LoadingSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("LoadingSignal")
            .field("count", &state.count)
            .field("registered", &state.observer.is_some())
            .finish()
    }
}

/// Holds one count of a [`LoadingSignal`] until dropped.
#[must_use = "the count is released as soon as the guard is dropped"]
pub struct LoadingGuard {
    signal: LoadingSignal,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.signal.decrement();
    }
}
