//! Navigation Resolver - The single writer of carousel position.
//!
//! Every navigation source funnels through here: arrow controls, dot
//! controls, drag gestures, autoplay ticks, and direct calls. Nothing else
//! writes the position signal, so ordering and wrap behavior live in one
//! place.
//!
//! # API
//!
//! - `go_to_slide` - Resolve an absolute request (with wrap) and commit
//! - `step_forward` / `step_backward` - Move by `slides_to_scroll`
//! - `go_to_group` - Jump to a dot's group
//! - `dot_count` / `active_dot` - Dot indicator math
//! - `on_slide_change` - Register a committed-change callback
//!
//! # Example
//!
//! ```ignore
//! use spark_carousel::state::navigation;
//!
//! navigation::step_forward(index);
//! navigation::go_to_group(index, 2);
//!
//! let cleanup = navigation::on_slide_change(index, Rc::new(|pos| {
//!     println!("now at {pos}");
//! }));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::trace;

use crate::engine::get_state;

// =============================================================================
// WRAP
// =============================================================================

/// Normalize a requested index into `[0, slide_count)`.
///
/// Wrap is edge-reset, not modulo: any request before the start lands on
/// the last slide, any request past the end lands on the first. In-range
/// requests pass through unchanged.
///
/// `slide_count == 0` yields 0; callers treat navigation as a no-op there.
pub fn wrap_index(requested: i64, slide_count: usize) -> usize {
    if slide_count == 0 {
        return 0;
    }
    if requested < 0 {
        slide_count - 1
    } else if requested >= slide_count as i64 {
        0
    } else {
        requested as usize
    }
}

// =============================================================================
// SLIDE CHANGE CALLBACKS
// =============================================================================

/// Callback fired after a committed position change, with the new index.
pub type SlideCallback = Rc<dyn Fn(usize)>;

thread_local! {
    // Multiple callbacks per instance supported (component callback + user extras)
    static SLIDE_CALLBACKS: RefCell<HashMap<usize, Vec<Option<SlideCallback>>>> =
        RefCell::new(HashMap::new());
}

/// Register a slide-change callback for an instance.
/// Returns a cleanup function to unregister.
pub fn on_slide_change(index: usize, callback: SlideCallback) -> impl FnOnce() {
    let callback_id = SLIDE_CALLBACKS.with(|reg| {
        let mut reg = reg.borrow_mut();
        let list = reg.entry(index).or_default();
        let id = list.len();
        list.push(Some(callback));
        id
    });

    move || {
        SLIDE_CALLBACKS.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(list) = reg.get_mut(&index) {
                if callback_id < list.len() {
                    // Tombstone so later IDs stay valid
                    list[callback_id] = None;
                }
                if list.iter().all(|cb| cb.is_none()) {
                    reg.remove(&index);
                }
            }
        });
    }
}

/// Fire callbacks for a committed change.
///
/// Handlers are cloned out of the registry borrow before invocation, so a
/// handler may itself navigate or register callbacks without re-entering
/// the borrow.
fn notify_slide_change(index: usize, position: usize) {
    let callbacks: Vec<SlideCallback> = SLIDE_CALLBACKS.with(|reg| {
        reg.borrow()
            .get(&index)
            .map(|list| list.iter().filter_map(|cb| cb.clone()).collect())
            .unwrap_or_default()
    });
    for callback in callbacks {
        callback(position);
    }
}

// =============================================================================
// NAVIGATION OPERATIONS
// =============================================================================

/// Resolve an absolute slide request and commit it.
///
/// The request is wrapped into range first. Same-value requests are
/// complete no-ops: no signal write, no callbacks.
///
/// Returns true if the position changed.
pub fn go_to_slide(index: usize, requested: i64) -> bool {
    let Some(state) = get_state(index) else {
        return false;
    };
    let count = state.slide_count.get();
    if count == 0 {
        return false;
    }

    let target = wrap_index(requested, count);
    let current = state.position.get();
    if target == current {
        return false;
    }

    state.position.set(target);
    trace!("carousel {index}: position {current} -> {target}");
    notify_slide_change(index, target);
    true
}

/// Advance by one step (`slides_to_scroll` slides), wrapping past the end.
pub fn step_forward(index: usize) -> bool {
    let Some(state) = get_state(index) else {
        return false;
    };
    let scroll = state.config.get().slides_to_scroll as i64;
    let current = state.position.get() as i64;
    go_to_slide(index, current + scroll)
}

/// Go back by one step (`slides_to_scroll` slides), wrapping past the start.
pub fn step_backward(index: usize) -> bool {
    let Some(state) = get_state(index) else {
        return false;
    };
    let scroll = state.config.get().slides_to_scroll as i64;
    let current = state.position.get() as i64;
    go_to_slide(index, current - scroll)
}

/// Jump to the first slide of a dot's group.
pub fn go_to_group(index: usize, dot_index: usize) -> bool {
    let Some(state) = get_state(index) else {
        return false;
    };
    let scroll = state.config.get().slides_to_scroll;
    go_to_slide(index, (dot_index * scroll) as i64)
}

/// Pull the position back into range after `slide_count` changed.
///
/// Clamps to the last slide rather than wrapping, so shrinking the slide
/// set keeps the user on the nearest surviving slide. Fires callbacks
/// like any other committed change.
pub fn renormalize_position(index: usize) -> bool {
    let Some(state) = get_state(index) else {
        return false;
    };
    let count = state.slide_count.get();
    let current = state.position.get();

    let target = if count == 0 { 0 } else { current.min(count - 1) };
    if target == current {
        return false;
    }

    state.position.set(target);
    trace!("carousel {index}: position renormalized {current} -> {target}");
    notify_slide_change(index, target);
    true
}

// =============================================================================
// QUERIES
// =============================================================================

/// Current slide index (0 if the instance does not exist).
///
/// Reads the position signal, so calls inside a derived or effect create
/// a reactive dependency.
pub fn current_position(index: usize) -> usize {
    get_state(index).map(|s| s.position.get()).unwrap_or(0)
}

/// Number of dot indicators: `ceil(slide_count / slides_to_scroll)`.
pub fn dot_count(index: usize) -> usize {
    let Some(state) = get_state(index) else {
        return 0;
    };
    let count = state.slide_count.get();
    if count == 0 {
        return 0;
    }
    let scroll = state.config.get().slides_to_scroll;
    count.div_ceil(scroll)
}

/// Which dot is active: `floor(current / slides_to_scroll)`.
pub fn active_dot(index: usize) -> usize {
    let Some(state) = get_state(index) else {
        return 0;
    };
    let scroll = state.config.get().slides_to_scroll;
    state.position.get() / scroll
}

// =============================================================================
// CLEANUP / RESET
// =============================================================================

/// Remove navigation state for a released instance.
pub fn cleanup_index(index: usize) {
    SLIDE_CALLBACKS.with(|reg| {
        reg.borrow_mut().remove(&index);
    });
}

/// Reset all navigation state (for testing).
pub fn reset_navigation_state() {
    SLIDE_CALLBACKS.with(|reg| reg.borrow_mut().clear());
}

// =============================================================================
// TESTS
// =============================================================================
