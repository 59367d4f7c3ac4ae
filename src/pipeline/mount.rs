//! Mount API - Application lifecycle and render effect.
//!
//! This module provides the entry point for hosting carousels in a
//! terminal. It owns the terminal modes (raw mode, mouse capture), the
//! one render effect that re-runs the host's draw closure when any
//! carousel signal changes, and the event loop that routes input and
//! pumps autoplay ticks.
//!
//! # Example
//!
//! ```ignore
//! use spark_carousel::pipeline::mount;
//!
//! // Mount with your render closure
//! let handle = mount::mount(move || draw_everything())?;
//!
//! // Option 1: Run blocking event loop
//! mount::run(&handle)?;
//!
//! // Option 2: Tick manually in your own loop
//! while mount::tick(&handle)? {
//!     // Your logic here
//! }
//!
//! // Clean up
//! handle.unmount();
//! ```

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::debug;
use spark_signals::effect;

use crate::engine::live_indices;
use crate::state::{autoplay, input, navigation};
use crate::state::input::InputEvent;

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by mount() that allows unmounting.
///
/// Holds:
/// - The render effect stop function
/// - The running flag (set to false on Ctrl+C or unmount)
pub struct MountHandle {
    stop_effect: Option<Box<dyn FnOnce()>>,
    running: Arc<AtomicBool>,
}

impl MountHandle {
    /// Stop the event loop and restore the terminal.
    ///
    /// This will:
    /// 1. Set running to false
    /// 2. Cancel every running autoplay timer
    /// 3. Disable mouse capture and raw mode
    /// 4. Stop the render effect
    pub fn unmount(mut self) {
        self.running.store(false, Ordering::SeqCst);

        // Nobody drains ticks after this, so no timer may outlive it
        for index in live_indices() {
            autoplay::cancel(index);
        }

        let _ = input::disable_mouse();
        let _ = disable_raw_mode();

        if let Some(stop) = self.stop_effect.take() {
            stop();
        }

        debug!("pipeline unmounted");
    }

    /// Check if still running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop the application (sets running to false).
    /// Use this to trigger graceful shutdown from custom code.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        // Same teardown as unmount, best effort; cancel is idempotent
        // and the effect stop is taken, so this is safe after an
        // explicit unmount
        self.running.store(false, Ordering::SeqCst);

        for index in live_indices() {
            autoplay::cancel(index);
        }

        let _ = input::disable_mouse();
        let _ = disable_raw_mode();

        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Mount the carousel host.
///
/// This sets up:
/// 1. Raw mode, so pointer and key events arrive unbuffered
/// 2. The ONE render effect wrapping the host's draw closure
/// 3. Mouse capture, so pointer sequences reach the gesture tracker
///
/// The draw closure re-runs whenever a signal it read changes: position,
/// config, slide count, or measurements of any carousel it touches.
///
/// Returns a MountHandle for cleanup.
pub fn mount<F>(mut render: F) -> io::Result<MountHandle>
where
    F: FnMut() + 'static,
{
    enable_raw_mode()?;

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    // Create the ONE render effect
    let stop_fn = effect(move || {
        if !running_clone.load(Ordering::SeqCst) {
            return;
        }
        render();
    });

    input::enable_mouse()?;

    debug!("pipeline mounted");

    Ok(MountHandle {
        stop_effect: Some(Box::new(stop_fn)),
        running,
    })
}

/// Unmount and clean up.
pub fn unmount(handle: MountHandle) {
    handle.unmount();
}

// =============================================================================
// Autoplay Pump
// =============================================================================

/// Drain due autoplay ticks into the navigation resolver.
///
/// Each due tick is one forward step for its instance, using the step
/// size and slide count as they are NOW, not as they were when the timer
/// started. Call once per loop pass; `tick` does it for you.
pub fn drain_autoplay() {
    for index in live_indices() {
        let due = autoplay::take_due_ticks(index);
        for _ in 0..due {
            navigation::step_forward(index);
        }
    }
}

// =============================================================================
// Event Loop
// =============================================================================

/// Run the event loop once (non-blocking).
///
/// Polls input with a short timeout, routes pointer sequences to the
/// gesture tracker, and pumps autoplay ticks. Ctrl+C stops the handle;
/// other unrouted events are dropped, so hosts that interpret keys run
/// their own loop over [`poll_event`](crate::state::input::poll_event) and
/// [`route_event`](crate::state::input::route_event) instead.
///
/// # Returns
///
/// * `Ok(true)` - Continue running
/// * `Ok(false)` - Stop requested (Ctrl+C pressed or `handle.stop()` called)
/// * `Err(e)` - I/O error while polling
pub fn tick(handle: &MountHandle) -> io::Result<bool> {
    if !handle.is_running() {
        return Ok(false);
    }

    // Poll with short timeout (~60fps)
    if let Some(event) = input::poll_event(Duration::from_millis(16))? {
        if !input::route_event(&event) {
            if let InputEvent::Key(key) = event {
                if key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    handle.stop();
                }
            }
        }
    }

    drain_autoplay();

    Ok(handle.is_running())
}

/// Run the event loop (blocking until stopped).
///
/// This function blocks until:
/// - Ctrl+C is pressed (sets running to false)
/// - `handle.stop()` is called from another thread/handler
pub fn run(handle: &MountHandle) -> io::Result<()> {
    while tick(handle)? {
        // Continue processing events
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::thread;

    use crate::engine::{allocate_index, reset_carousels};
    use crate::state::autoplay::reset_autoplay;
    use crate::state::navigation::{current_position, on_slide_change, reset_navigation_state};
    use crate::types::CarouselConfig;

    fn setup() {
        reset_carousels();
        reset_navigation_state();
        reset_autoplay();
    }

    #[test]
    fn test_drain_without_timers() {
        setup();
        let idx = allocate_index(None, CarouselConfig::default(), 3);

        drain_autoplay();
        assert_eq!(current_position(idx), 0);
    }

    #[test]
    fn test_drain_steps_per_due_tick() {
        setup();
        let config = CarouselConfig {
            auto_play: true,
            auto_play_interval_ms: 10,
            ..Default::default()
        };
        let idx = allocate_index(None, config, 3);

        let steps = Rc::new(Cell::new(0usize));
        let steps_clone = steps.clone();
        let _cleanup = on_slide_change(idx, Rc::new(move |_| {
            steps_clone.set(steps_clone.get() + 1);
        }));

        autoplay::configure(idx, &config);
        thread::sleep(Duration::from_millis(60));
        drain_autoplay();

        // Real thread, lenient bound: several intervals elapsed, so at
        // least one step must have landed
        assert!(steps.get() >= 1);

        // Everything due was consumed in one pass
        assert_eq!(autoplay::take_due_ticks(idx), 0);

        autoplay::cancel(idx);
    }

    #[test]
    fn test_drain_skips_released_instances() {
        setup();
        let config = CarouselConfig {
            auto_play: true,
            auto_play_interval_ms: 10,
            ..Default::default()
        };
        let idx = allocate_index(None, config, 3);
        autoplay::configure(idx, &config);

        autoplay::cancel(idx);
        crate::engine::release_index(idx);
        thread::sleep(Duration::from_millis(30));

        // Nothing to drain, nothing panics
        drain_autoplay();
    }

    #[test]
    fn test_running_flag() {
        let running = Arc::new(AtomicBool::new(true));
        assert!(running.load(Ordering::SeqCst));

        running.store(false, Ordering::SeqCst);
        assert!(!running.load(Ordering::SeqCst));
    }

    #[test]
    fn test_drop_cancels_live_timers() {
        setup();
        let config = CarouselConfig {
            auto_play: true,
            auto_play_interval_ms: 60_000,
            ..Default::default()
        };
        let idx = allocate_index(None, config, 3);
        autoplay::configure(idx, &config);
        assert!(autoplay::is_autoplay_running(idx));

        // A handle dropped without unmount still stops every timer
        let handle = MountHandle {
            stop_effect: None,
            running: Arc::new(AtomicBool::new(true)),
        };
        drop(handle);

        assert!(!autoplay::is_autoplay_running(idx));
        assert_eq!(autoplay::timers_cancelled(), 1);
        assert_eq!(autoplay::take_due_ticks(idx), 0);
    }
}
