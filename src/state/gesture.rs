//! Gesture Tracker - Drag sessions that resolve into navigation.
//!
//! A two-state machine per instance: Idle and Dragging. Pointer-down
//! starts a session recording the x coordinate; pointer-up or
//! pointer-leave ends it, compares the travelled distance against the
//! threshold, and hands the resulting intent to the navigation resolver.
//!
//! Sessions hold no navigation parameters. Step size and slide count are
//! read by the resolver at commit time, so a config change mid-drag
//! cannot act on stale values.
//!
//! # Example
//!
//! ```ignore
//! use spark_carousel::state::gesture;
//!
//! gesture::begin_drag(index, 500.0);
//! // ... pointer travels left ...
//! gesture::end_drag(index, 400.0); // resolves a forward step
//! ```

use std::cell::RefCell;
use std::collections::HashMap;

use log::trace;

use super::navigation;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Minimum horizontal travel, in track units, before a released drag
/// navigates. Released drags at or under this distance snap back.
pub const DRAG_THRESHOLD: f32 = 50.0;

// =============================================================================
// DRAG SESSIONS
// =============================================================================

/// The intent a resolved swipe hands to the resolver.
///
/// Dragging left (negative distance) reveals the next slide, so it maps
/// to Forward; dragging right maps to Backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    start_x: f32,
}

thread_local! {
    static DRAG_SESSIONS: RefCell<HashMap<usize, DragSession>> = RefCell::new(HashMap::new());
}

// =============================================================================
// STATE MACHINE
// =============================================================================

/// Begin a drag session at the given x coordinate.
///
/// Always permitted, including while autoplay runs. A down while already
/// Dragging restarts the session at the new coordinate.
pub fn begin_drag(index: usize, x: f32) {
    DRAG_SESSIONS.with(|sessions| {
        sessions
            .borrow_mut()
            .insert(index, DragSession { start_x: x });
    });
    trace!("carousel {index}: drag start at {x}");
}

/// Check if an instance has an active drag session.
pub fn is_dragging(index: usize) -> bool {
    DRAG_SESSIONS.with(|sessions| sessions.borrow().contains_key(&index))
}

/// End a drag session at the given x coordinate.
///
/// Pointer-up and pointer-leave both land here; the session is discarded
/// either way, so a drag that exits the viewport cannot get stuck.
///
/// Returns the swipe intent when the travelled distance exceeds
/// [`DRAG_THRESHOLD`], after handing it to the resolver. Whether the
/// position actually changed is the resolver's decision (a one-slide
/// carousel swallows the step). Returns None for sub-threshold releases
/// and for ends without a session.
pub fn end_drag(index: usize, x: f32) -> Option<SwipeDirection> {
    let session = DRAG_SESSIONS.with(|sessions| sessions.borrow_mut().remove(&index))?;

    let distance = x - session.start_x;
    if !(distance.abs() > DRAG_THRESHOLD) {
        trace!("carousel {index}: drag end at {x}, distance {distance} under threshold");
        return None;
    }

    let direction = if distance < 0.0 {
        SwipeDirection::Forward
    } else {
        SwipeDirection::Backward
    };
    trace!("carousel {index}: drag end at {x}, distance {distance} -> {direction:?}");

    match direction {
        SwipeDirection::Forward => {
            navigation::step_forward(index);
        }
        SwipeDirection::Backward => {
            navigation::step_backward(index);
        }
    }
    Some(direction)
}

// =============================================================================
// CLEANUP / RESET
// =============================================================================

/// Remove gesture state for a released instance.
pub fn cleanup_index(index: usize) {
    DRAG_SESSIONS.with(|sessions| {
        sessions.borrow_mut().remove(&index);
    });
}

/// Reset all gesture state (for testing).
pub fn reset_gesture_state() {
    DRAG_SESSIONS.with(|sessions| sessions.borrow_mut().clear());
}

// =============================================================================
// TESTS
// =============================================================================
