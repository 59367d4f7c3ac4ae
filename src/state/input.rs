//! Input Module - Event conversion and pointer routing.
//!
//! Bridges crossterm's event system with the gesture tracker. Pointer
//! sequences (left button down, move, up) are hit-tested against
//! registered viewport bounds and routed to the owning carousel; every
//! other event is handed back to the caller untouched.
//!
//! # API
//!
//! - `convert_event` - Convert a crossterm event to our InputEvent
//! - `poll_event` - Non-blocking event check with timeout
//! - `read_event` - Blocking event read
//! - `route_event` - Dispatch a pointer sequence to its carousel
//! - `set_viewport_bounds` - Register where a carousel lives on screen
//! - `enable_mouse` / `disable_mouse` - Control mouse capture
//!
//! # Capture
//!
//! A pointer down inside a carousel's bounds captures the sequence for
//! that instance. Moves stay with it until the pointer leaves the bounds
//! or the button releases; leaving ends the drag at the exit coordinate,
//! the same as a release there.
//!
//! # Example
//!
//! ```ignore
//! use spark_carousel::state::input::{poll_event, route_event};
//! use std::time::Duration;
//!
//! loop {
//!     if let Some(event) = poll_event(Duration::from_millis(16))? {
//!         if !route_event(&event) {
//!             // keys, resize, and misses are the caller's business
//!         }
//!     }
//! }
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::stdout;
use std::time::Duration;

use crossterm::event::{
    poll, read, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyEvent,
    MouseButton as CrosstermMouseButton, MouseEvent as CrosstermMouseEvent, MouseEventKind,
};
use crossterm::execute;
use log::trace;

use super::gesture;

// =============================================================================
// EVENT TYPES
// =============================================================================

/// Phase of a pointer sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    /// Left button pressed.
    Down,
    /// Pointer moved, pressed or not.
    Move,
    /// Left button released.
    Up,
}

/// One pointer sample in terminal cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub x: u16,
    pub y: u16,
}

/// Unified event type for the engine.
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Pointer event (down, move, up).
    Pointer(PointerEvent),
    /// Keyboard event, passed through for the caller to interpret.
    Key(KeyEvent),
    /// Terminal resize event (new width, height).
    Resize(u16, u16),
    /// No event or unhandled event type.
    None,
}

// =============================================================================
// VIEWPORT BOUNDS
// =============================================================================

/// Screen rectangle a carousel occupies, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Bounds {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if a point falls inside (right/bottom edges exclusive).
    /// Edges past `u16::MAX` saturate to the end of the coordinate space.
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && x < self.x.saturating_add(self.width)
            && y >= self.y
            && y < self.y.saturating_add(self.height)
    }
}

thread_local! {
    /// index -> on-screen bounds
    static VIEWPORT_BOUNDS: RefCell<HashMap<usize, Bounds>> = RefCell::new(HashMap::new());

    /// Instance that owns the active pointer sequence.
    static CAPTURED: RefCell<Option<usize>> = const { RefCell::new(None) };
}

/// Register where a carousel lives on screen. Hosts call this after
/// layout, before routing events.
pub fn set_viewport_bounds(index: usize, bounds: Bounds) {
    VIEWPORT_BOUNDS.with(|all| {
        all.borrow_mut().insert(index, bounds);
    });
}

/// Bounds registered for an instance.
pub fn get_viewport_bounds(index: usize) -> Option<Bounds> {
    VIEWPORT_BOUNDS.with(|all| all.borrow().get(&index).copied())
}

/// Instance currently owning the pointer sequence.
pub fn captured_instance() -> Option<usize> {
    CAPTURED.with(|captured| *captured.borrow())
}

/// Find the carousel under a point. Lowest index wins on overlap.
fn hit_test(x: u16, y: u16) -> Option<usize> {
    VIEWPORT_BOUNDS.with(|all| {
        let all = all.borrow();
        let mut hits: Vec<usize> = all
            .iter()
            .filter(|(_, bounds)| bounds.contains(x, y))
            .map(|(index, _)| *index)
            .collect();
        hits.sort_unstable();
        hits.first().copied()
    })
}

// =============================================================================
// EVENT CONVERSION
// =============================================================================

/// Convert a crossterm mouse event to a pointer sample.
///
/// Only the left button drives gestures; everything else is None.
pub fn convert_pointer_event(event: CrosstermMouseEvent) -> Option<PointerEvent> {
    let action = match event.kind {
        MouseEventKind::Down(CrosstermMouseButton::Left) => PointerAction::Down,
        MouseEventKind::Drag(CrosstermMouseButton::Left) => PointerAction::Move,
        MouseEventKind::Moved => PointerAction::Move,
        MouseEventKind::Up(CrosstermMouseButton::Left) => PointerAction::Up,
        _ => return None,
    };

    Some(PointerEvent {
        action,
        x: event.column,
        y: event.row,
    })
}

/// Convert any crossterm event to our InputEvent.
pub fn convert_event(event: CrosstermEvent) -> InputEvent {
    match event {
        CrosstermEvent::Mouse(mouse) => match convert_pointer_event(mouse) {
            Some(pointer) => InputEvent::Pointer(pointer),
            None => InputEvent::None,
        },
        CrosstermEvent::Key(key) => InputEvent::Key(key),
        CrosstermEvent::Resize(w, h) => InputEvent::Resize(w, h),
        _ => InputEvent::None,
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event()?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event() -> std::io::Result<InputEvent> {
    Ok(convert_event(read()?))
}

// =============================================================================
// EVENT ROUTING
// =============================================================================

/// Route an event into the gesture tracker.
///
/// Returns true if a carousel consumed it. Keys, resizes, and pointer
/// events over no carousel return false so the caller can act on them.
pub fn route_event(event: &InputEvent) -> bool {
    let InputEvent::Pointer(pointer) = event else {
        return false;
    };

    match pointer.action {
        PointerAction::Down => {
            let Some(index) = hit_test(pointer.x, pointer.y) else {
                return false;
            };
            CAPTURED.with(|captured| *captured.borrow_mut() = Some(index));
            gesture::begin_drag(index, pointer.x as f32);
            true
        }
        PointerAction::Move => {
            let Some(index) = captured_instance() else {
                return false;
            };
            let inside = get_viewport_bounds(index)
                .map(|bounds| bounds.contains(pointer.x, pointer.y))
                .unwrap_or(false);
            if !inside {
                // Leaving the viewport ends the drag at the exit point
                trace!("carousel {index}: pointer left viewport at x={}", pointer.x);
                CAPTURED.with(|captured| *captured.borrow_mut() = None);
                gesture::end_drag(index, pointer.x as f32);
            }
            true
        }
        PointerAction::Up => {
            let Some(index) = captured_instance() else {
                return false;
            };
            CAPTURED.with(|captured| *captured.borrow_mut() = None);
            gesture::end_drag(index, pointer.x as f32);
            true
        }
    }
}

// =============================================================================
// MOUSE CAPTURE
// =============================================================================

/// Enable mouse capture.
pub fn enable_mouse() -> std::io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

/// Disable mouse capture.
pub fn disable_mouse() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

// =============================================================================
// CLEANUP
// =============================================================================

/// Drop input state for one instance.
pub fn cleanup_index(index: usize) {
    VIEWPORT_BOUNDS.with(|all| {
        all.borrow_mut().remove(&index);
    });
    CAPTURED.with(|captured| {
        let mut captured = captured.borrow_mut();
        if *captured == Some(index) {
            *captured = None;
        }
    });
}

/// Reset all input state (for testing).
pub fn reset_input_state() {
    VIEWPORT_BOUNDS.with(|all| all.borrow_mut().clear());
    CAPTURED.with(|captured| *captured.borrow_mut() = None);
}

// =============================================================================
// TESTS
// =============================================================================
