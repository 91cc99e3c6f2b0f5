//! Periodic autosave scheduling.
//!
//! The timer and the thing it runs are decoupled: the spawned task only ever
//! reads a shared cell on each tick, and the application swaps the cell's
//! callback as the session moves between verses. Swapping never restarts the
//! timer, and a callback registered mid-interval is the one the next tick
//! sees. This avoids the classic staleness bug where a scheduled closure
//! captures an outdated draft.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Ticks fire every 30 seconds unless configured otherwise.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

type Callback = Box<dyn FnMut() + Send>;

struct CellState {
    enabled: bool,
    callback: Option<Callback>,
}

/// Shared slot holding the current autosave callback.
///
/// Clones refer to the same slot; the scheduler holds one clone, the
/// application another.
#[derive(Clone)]
pub struct AutosaveCell {
    inner: Arc<Mutex<CellState>>,
}

impl Default for AutosaveCell {
    fn default() -> Self {
        Self::new()
    }
}

impl AutosaveCell {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(CellState {
                enabled: true,
                callback: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CellState> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Install the callback the next tick will run. Replaces any previous
    /// one; the running timer is untouched.
    pub fn set_callback(&self, callback: impl FnMut() + Send + 'static) {
        self.lock().callback = Some(Box::new(callback));
    }

    /// Remove the callback (e.g. when no verse is open).
    pub fn clear_callback(&self) {
        self.lock().callback = None;
    }

    /// Gate ticks without uninstalling the callback.
    pub fn set_enabled(&self, enabled: bool) {
        self.lock().enabled = enabled;
    }

    /// Run one tick now. Returns whether a callback actually ran; a disabled
    /// or empty cell is a no-op.
    pub fn tick(&self) -> bool {
        let mut state = self.lock();
        if !state.enabled {
            return false;
        }
        match state.callback.as_mut() {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }
}

/// Running autosave timer. Dropping it stops the ticks.
pub struct Autosave {
    task: tokio::task::JoinHandle<()>,
}

impl Autosave {
    /// Start ticking the cell every `interval`. The first tick fires one
    /// full interval after spawn, not immediately; a delayed tick is not
    /// compensated with a burst.
    pub fn spawn(cell: AutosaveCell, interval: Duration) -> Self {
        let task = tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval's first tick completes immediately; consume it.
            timer.tick().await;
            loop {
                timer.tick().await;
                if cell.tick() {
                    debug!("autosave tick fired");
                }
            }
        });
        Self { task }
    }

    pub fn shutdown(self) {
        self.task.abort();
    }
}

impl Drop for Autosave {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_cell() -> (AutosaveCell, Arc<AtomicUsize>) {
        let cell = AutosaveCell::new();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        cell.set_callback(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (cell, count)
    }

    #[test]
    fn tick_runs_installed_callback() {
        let (cell, count) = counting_cell();
        assert!(cell.tick());
        assert!(cell.tick());
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn empty_or_disabled_cell_is_noop() {
        let cell = AutosaveCell::new();
        assert!(!cell.tick());

        let (cell, count) = counting_cell();
        cell.set_enabled(false);
        assert!(!cell.tick());
        cell.set_enabled(true);
        assert!(cell.tick());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn replacing_callback_takes_effect_next_tick() {
        let (cell, old_count) = counting_cell();
        cell.tick();

        let new_count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&new_count);
        cell.set_callback(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        cell.tick();
        cell.tick();

        assert_eq!(old_count.load(Ordering::SeqCst), 1);
        assert_eq!(new_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn disabled_ticks_are_skipped_not_deferred() {
        // N ticks with k of them disabled fire exactly N - k callbacks.
        let (cell, count) = counting_cell();
        for round in 0..10 {
            cell.set_enabled(round % 3 != 0);
            cell.tick();
        }
        assert_eq!(count.load(Ordering::SeqCst), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn scheduler_fires_on_the_interval() {
        let (cell, count) = counting_cell();
        let autosave = Autosave::spawn(cell.clone(), Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        autosave.shutdown();
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn swapped_callback_is_seen_mid_interval() {
        let (cell, old_count) = counting_cell();
        let _autosave = Autosave::spawn(cell.clone(), Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(10)).await;
        let new_count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&new_count);
        cell.set_callback(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(old_count.load(Ordering::SeqCst), 0);
        assert_eq!(new_count.load(Ordering::SeqCst), 1);
    }
}
