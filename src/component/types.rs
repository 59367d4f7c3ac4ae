//! Component types - Props, control surface, cleanup.
//!
//! These types define the interface for assembling a carousel instance.

use crate::state::navigation::SlideCallback;
use crate::types::CarouselConfig;

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function owned by a handle.
///
/// Runs when the carousel unmounts and releases all per-instance state.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Props
// =============================================================================

/// Props for [`carousel`](super::carousel).
///
/// Everything is optional. The defaults give a static, single-slide-wide
/// carousel with no slides.
#[derive(Default)]
pub struct CarouselProps {
    /// Stable id for lookups across the registry. Auto-generated when
    /// omitted.
    pub id: Option<String>,
    /// Behavior config. Sanitized on the way in.
    pub config: CarouselConfig,
    /// Number of slides the host will render.
    pub slide_count: usize,
    /// Called with the new position after every committed change.
    pub on_slide_change: Option<SlideCallback>,
}

// =============================================================================
// Control Surface
// =============================================================================

/// What the host should render for navigation chrome, derived from the
/// current config and position.
///
/// The flags only gate rendering. The underlying operations stay callable
/// either way, so a host can wire its own chrome without flipping them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlSurface {
    /// Render previous/next arrows.
    pub show_arrows: bool,
    /// Render the dot strip.
    pub show_dots: bool,
    /// How many dots the strip has.
    pub dot_count: usize,
    /// Which dot is lit.
    pub active_dot: usize,
}
