//! Autoplay Scheduler - Interval timers that emit step intents.
//!
//! Each autoplaying carousel owns one background timer. The timer thread
//! only bumps an atomic tick counter; the main thread drains due ticks
//! each pipeline pass and feeds them through the navigation resolver.
//! Because ticks carry no parameters, a reconfigured or cancelled timer
//! can never act on stale step size or slide count.
//!
//! # Pattern
//!
//! - `configure` cancels any existing timer, then starts a fresh one when
//!   the config enables autoplay. Called on mount and on every change to
//!   an autoplay-relevant field.
//! - `take_due_ticks` drains the counter on the main thread.
//! - `cancel` flips the running flag and orphans the tick cell; the
//!   thread parks itself on its next wake.
//!
//! # Example
//!
//! ```ignore
//! use spark_carousel::state::autoplay;
//!
//! autoplay::configure(index, &config);
//! // ... each pipeline tick ...
//! for _ in 0..autoplay::take_due_ticks(index) {
//!     navigation::step_forward(index);
//! }
//! autoplay::cancel(index);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use crate::types::CarouselConfig;

// =============================================================================
// INTERVAL CLOCK
// =============================================================================

/// Pure tick arithmetic for an interval timer.
///
/// Accumulates elapsed time and yields how many whole intervals are due,
/// carrying the remainder forward so drift never builds up. The timer
/// thread drives it with measured elapsed time; tests drive it with fake
/// time for exact cadence assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalClock {
    interval: Duration,
    carry: Duration,
}

impl IntervalClock {
    /// Create a clock with the given interval between ticks.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            carry: Duration::ZERO,
        }
    }

    /// Advance by elapsed time, returning the number of due ticks.
    ///
    /// A zero interval yields no ticks, ever.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.interval.is_zero() {
            return 0;
        }
        self.carry += elapsed;
        let ticks = (self.carry.as_nanos() / self.interval.as_nanos()) as u32;
        self.carry -= self.interval * ticks;
        ticks
    }
}

// =============================================================================
// TIMER REGISTRY
// =============================================================================

/// Per-instance timer state.
struct AutoplayEntry {
    /// Flag to signal the timer thread to stop.
    running: Arc<AtomicBool>,
    /// Ticks produced by the thread, drained on the main thread.
    ticks: Arc<AtomicU64>,
    /// How many produced ticks have been drained already.
    seen: u64,
    /// Interval the timer was started with.
    interval_ms: u64,
}

thread_local! {
    static AUTOPLAY_ENTRIES: RefCell<HashMap<usize, AutoplayEntry>> = RefCell::new(HashMap::new());

    /// Timers started since the last reset.
    static TIMERS_STARTED: RefCell<usize> = const { RefCell::new(0) };

    /// Timers cancelled since the last reset.
    static TIMERS_CANCELLED: RefCell<usize> = const { RefCell::new(0) };
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Apply a config to the instance's timer: cancel the old one, start a
/// new one if the config enables autoplay.
///
/// Callers invoke this whenever `auto_play`, `auto_play_interval_ms`,
/// `slide_count`, or `slides_to_scroll` changes. The last two do not feed
/// the timer itself, but recreating on every relevant change keeps the
/// cadence aligned with the moment of the change.
pub fn configure(index: usize, config: &CarouselConfig) {
    cancel(index);

    if !config.autoplay_enabled() {
        return;
    }
    let interval_ms = config.auto_play_interval_ms;

    let running = Arc::new(AtomicBool::new(true));
    let ticks = Arc::new(AtomicU64::new(0));

    let thread_running = running.clone();
    let thread_ticks = ticks.clone();
    thread::spawn(move || {
        let mut clock = IntervalClock::new(Duration::from_millis(interval_ms));
        // Sleep in short slices so a cancel is honored promptly even
        // when the interval is seconds long.
        let granularity = Duration::from_millis(interval_ms.min(25));
        let mut last = Instant::now();

        while thread_running.load(Ordering::SeqCst) {
            thread::sleep(granularity);
            if !thread_running.load(Ordering::SeqCst) {
                break;
            }
            let now = Instant::now();
            let due = clock.advance(now - last);
            last = now;
            if due > 0 {
                thread_ticks.fetch_add(due as u64, Ordering::SeqCst);
            }
        }
    });

    AUTOPLAY_ENTRIES.with(|entries| {
        entries.borrow_mut().insert(
            index,
            AutoplayEntry {
                running,
                ticks,
                seen: 0,
                interval_ms,
            },
        );
    });
    TIMERS_STARTED.with(|count| *count.borrow_mut() += 1);

    debug!("carousel {index}: autoplay timer started, interval {interval_ms}ms");
}

/// Cancel the instance's timer, if one is running.
///
/// The entry is removed immediately, so ticks the lingering thread still
/// produces land in an orphaned cell nobody drains. Returns true if a
/// timer was actually cancelled.
pub fn cancel(index: usize) -> bool {
    let entry = AUTOPLAY_ENTRIES.with(|entries| entries.borrow_mut().remove(&index));
    let Some(entry) = entry else {
        return false;
    };

    entry.running.store(false, Ordering::SeqCst);
    TIMERS_CANCELLED.with(|count| *count.borrow_mut() += 1);

    debug!(
        "carousel {index}: autoplay timer cancelled, interval {}ms",
        entry.interval_ms
    );
    true
}

/// Drain the ticks that became due since the last drain.
///
/// Returns 0 for instances without a running timer.
pub fn take_due_ticks(index: usize) -> u64 {
    AUTOPLAY_ENTRIES.with(|entries| {
        let mut entries = entries.borrow_mut();
        let Some(entry) = entries.get_mut(&index) else {
            return 0;
        };
        let produced = entry.ticks.load(Ordering::SeqCst);
        let due = produced - entry.seen;
        entry.seen = produced;
        due
    })
}

/// Check if the instance currently has a running timer.
pub fn is_autoplay_running(index: usize) -> bool {
    AUTOPLAY_ENTRIES.with(|entries| {
        entries
            .borrow()
            .get(&index)
            .map(|entry| entry.running.load(Ordering::SeqCst))
            .unwrap_or(false)
    })
}

/// Timers started since the last reset.
pub fn timers_started() -> usize {
    TIMERS_STARTED.with(|count| *count.borrow())
}

/// Timers cancelled since the last reset.
pub fn timers_cancelled() -> usize {
    TIMERS_CANCELLED.with(|count| *count.borrow())
}

/// Reset all autoplay state (for testing).
///
/// Stops all timers, clears all entries, zeroes the counters.
pub fn reset_autoplay() {
    AUTOPLAY_ENTRIES.with(|entries| {
        let mut entries = entries.borrow_mut();
        for entry in entries.values() {
            entry.running.store(false, Ordering::SeqCst);
        }
        entries.clear();
    });
    TIMERS_STARTED.with(|count| *count.borrow_mut() = 0);
    TIMERS_CANCELLED.with(|count| *count.borrow_mut() = 0);
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{allocate_index, reset_carousels};
    use crate::state::navigation::{self, current_position, reset_navigation_state};

    fn setup() {
        reset_carousels();
        reset_navigation_state();
        reset_autoplay();
    }

    fn autoplay_config(interval_ms: u64) -> CarouselConfig {
        CarouselConfig {
            auto_play: true,
            auto_play_interval_ms: interval_ms,
            ..Default::default()
        }
    }

    // =========================================================================
    // IntervalClock tests (fake time)
    // =========================================================================

    #[test]
    fn test_clock_exact_intervals() {
        let mut clock = IntervalClock::new(Duration::from_millis(1000));

        assert_eq!(clock.advance(Duration::from_millis(1000)), 1);
        assert_eq!(clock.advance(Duration::from_millis(1000)), 1);
        assert_eq!(clock.advance(Duration::from_millis(1000)), 1);
    }

    #[test]
    fn test_clock_carries_remainder() {
        let mut clock = IntervalClock::new(Duration::from_millis(1000));

        // 1500ms: one tick due, 500ms carried
        assert_eq!(clock.advance(Duration::from_millis(1500)), 1);
        // 500ms more completes the second interval
        assert_eq!(clock.advance(Duration::from_millis(500)), 1);
    }

    #[test]
    fn test_clock_accumulates_sub_interval() {
        let mut clock = IntervalClock::new(Duration::from_millis(1000));

        assert_eq!(clock.advance(Duration::from_millis(400)), 0);
        assert_eq!(clock.advance(Duration::from_millis(400)), 0);
        assert_eq!(clock.advance(Duration::from_millis(400)), 1);
    }

    #[test]
    fn test_clock_multiple_due() {
        let mut clock = IntervalClock::new(Duration::from_millis(1000));

        assert_eq!(clock.advance(Duration::from_millis(3500)), 3);
        assert_eq!(clock.advance(Duration::from_millis(500)), 1);
    }

    #[test]
    fn test_clock_zero_interval_inert() {
        let mut clock = IntervalClock::new(Duration::ZERO);

        assert_eq!(clock.advance(Duration::from_secs(10)), 0);
        assert_eq!(clock.advance(Duration::from_secs(10)), 0);
    }

    #[test]
    fn test_autoplay_cadence_with_fake_time() {
        setup();
        let idx = allocate_index(None, autoplay_config(1000), 3);

        // Three 1000ms advances on a 3-slide carousel: 1, 2, wrap to 0
        let mut clock = IntervalClock::new(Duration::from_millis(1000));
        for expected in [1, 2, 0] {
            let due = clock.advance(Duration::from_millis(1000));
            assert_eq!(due, 1);
            for _ in 0..due {
                navigation::step_forward(idx);
            }
            assert_eq!(current_position(idx), expected);
        }
    }

    // =========================================================================
    // Timer lifecycle tests
    // =========================================================================

    #[test]
    fn test_configure_starts_timer() {
        setup();
        let idx = allocate_index(None, autoplay_config(60_000), 3);

        configure(idx, &autoplay_config(60_000));
        assert!(is_autoplay_running(idx));
        assert_eq!(timers_started(), 1);
        assert_eq!(timers_cancelled(), 0);

        cancel(idx);
    }

    #[test]
    fn test_configure_disabled_no_timer() {
        setup();
        let idx = allocate_index(None, CarouselConfig::default(), 3);

        configure(idx, &CarouselConfig::default());
        assert!(!is_autoplay_running(idx));
        assert_eq!(timers_started(), 0);
    }

    #[test]
    fn test_zero_interval_never_starts() {
        setup();
        let idx = allocate_index(None, autoplay_config(0), 3);

        configure(idx, &autoplay_config(0));
        assert!(!is_autoplay_running(idx));
        assert_eq!(timers_started(), 0);
    }

    #[test]
    fn test_cancel_balances_start() {
        setup();
        let idx = allocate_index(None, autoplay_config(60_000), 3);

        configure(idx, &autoplay_config(60_000));
        assert!(cancel(idx));
        assert_eq!(timers_started(), 1);
        assert_eq!(timers_cancelled(), 1);

        // Cancelling again is a no-op, the balance holds
        assert!(!cancel(idx));
        assert_eq!(timers_cancelled(), 1);
    }

    #[test]
    fn test_reconfigure_recreates_timer() {
        setup();
        let idx = allocate_index(None, autoplay_config(60_000), 3);

        configure(idx, &autoplay_config(60_000));
        configure(idx, &autoplay_config(30_000));
        assert!(is_autoplay_running(idx));
        assert_eq!(timers_started(), 2);
        assert_eq!(timers_cancelled(), 1);

        cancel(idx);
        assert_eq!(timers_cancelled(), 2);
    }

    #[test]
    fn test_reconfigure_to_disabled_cancels() {
        setup();
        let idx = allocate_index(None, autoplay_config(60_000), 3);

        configure(idx, &autoplay_config(60_000));
        configure(idx, &CarouselConfig::default());
        assert!(!is_autoplay_running(idx));
        assert_eq!(timers_started(), 1);
        assert_eq!(timers_cancelled(), 1);
    }

    #[test]
    fn test_take_due_ticks_drains() {
        setup();
        let idx = allocate_index(None, autoplay_config(10), 3);

        configure(idx, &autoplay_config(10));

        // Real thread, lenient bound: after several intervals at least
        // one tick must be due
        thread::sleep(Duration::from_millis(60));
        assert!(take_due_ticks(idx) >= 1);

        cancel(idx);
        assert_eq!(take_due_ticks(idx), 0);
    }

    #[test]
    fn test_cancelled_ticks_never_applied() {
        setup();
        let idx = allocate_index(None, autoplay_config(10), 3);

        configure(idx, &autoplay_config(10));
        cancel(idx);

        // Whatever the lingering thread produced goes to the orphaned
        // cell; the drain sees nothing
        thread::sleep(Duration::from_millis(40));
        assert_eq!(take_due_ticks(idx), 0);
    }

    #[test]
    fn test_take_without_timer() {
        setup();
        let idx = allocate_index(None, CarouselConfig::default(), 3);

        assert_eq!(take_due_ticks(idx), 0);
    }
}
