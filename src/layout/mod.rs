//! Carousel Engine - Layout Module
//!
//! Pure viewport geometry. Given a config, a slide count, the current
//! position, and measured dimensions, projects the flat numbers a
//! renderer needs: track translation, slide width, wrapper height.
//!
//! No layout engine is involved. The track is a single row of
//! equal-width slides, so the geometry is closed-form arithmetic.
//!
//! # Reactivity
//!
//! [`project`] is a pure function of its inputs. [`project_frame`] reads
//! the instance's signals, so calling it inside a derived or effect
//! creates dependencies on position, config, slide count, and
//! measurements.
//!
//! # Example
//!
//! ```ignore
//! use spark_carousel::layout::create_frame_derived;
//!
//! let frame = create_frame_derived(index);
//! println!("translate by {}", frame.get().translate_x);
//! ```

use spark_signals::{derived, Derived};

use crate::engine::get_state;
use crate::types::CarouselConfig;

// =============================================================================
// TYPES
// =============================================================================

/// Measured dimensions fed in from outside.
///
/// The engine never measures anything itself. The host reports the
/// viewport width and per-slide heights, and the projector folds them
/// into the frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Measurements {
    /// Width of the carousel viewport, in the host's units.
    pub container_width: f32,
    /// Height of each slide, indexed by slide position. May be shorter
    /// than the slide count while slides are still unmeasured.
    pub slide_heights: Vec<f32>,
}

/// Projected geometry for one rendered frame.
///
/// All values are finite for every input, including zero slides and
/// unmeasured dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportFrame {
    /// How far the track is shifted left of the viewport origin, in the
    /// host's units. Grows as the position advances.
    pub translate_x: f32,
    /// Track width as a percentage of the viewport. 100 means one
    /// viewport-width of track per `slides_to_show` slides.
    pub track_width_percent: f32,
    /// Width of one slide in the host's units, or 0 while the container
    /// is unmeasured.
    pub slide_width: f32,
    /// Width of one slide as a percentage of the track.
    pub slide_width_percent: f32,
    /// Height of the slide at the current position, or 0 while
    /// unmeasured.
    pub wrapper_height: f32,
    /// Gap between adjacent slides, passed through from the config.
    pub gap: f32,
}

// =============================================================================
// PROJECTION
// =============================================================================

/// Project the viewport frame for one carousel state.
///
/// Pure function: same inputs, same frame. The config is re-sanitized on
/// the way in, so even a hand-built config cannot produce NaN geometry.
/// Zero slides or an unmeasured container yield a zeroed frame with only
/// the gap passed through; no transform is emitted until both exist.
pub fn project(
    config: &CarouselConfig,
    slide_count: usize,
    current: usize,
    measurements: &Measurements,
) -> ViewportFrame {
    let config = config.sanitized();

    if slide_count == 0 {
        return ViewportFrame {
            gap: config.gap,
            ..ViewportFrame::default()
        };
    }

    // NaN width fails the comparison and lands here too
    if !(measurements.container_width > 0.0) || !measurements.container_width.is_finite() {
        return ViewportFrame {
            gap: config.gap,
            ..ViewportFrame::default()
        };
    }

    let count = slide_count as f32;
    let slide_width = measurements.container_width / count;

    ViewportFrame {
        translate_x: current as f32 * slide_width + config.gap * current as f32,
        track_width_percent: count * 100.0 / config.slides_to_show,
        slide_width,
        slide_width_percent: 100.0 / count,
        wrapper_height: measurements
            .slide_heights
            .get(current)
            .copied()
            .unwrap_or(0.0),
        gap: config.gap,
    }
}

/// Project the frame for a registered instance, reading its signals.
///
/// Returns a default frame for unknown indices.
pub fn project_frame(index: usize) -> ViewportFrame {
    let Some(state) = get_state(index) else {
        return ViewportFrame::default();
    };

    let config = state.config.get();
    let slide_count = state.slide_count.get();
    let current = state.position.get();
    let measurements = state.measurements.get();

    project(&config, slide_count, current, &measurements)
}

/// Create a derived that recomputes the frame whenever any input signal
/// changes (position, config, slide count, measurements).
pub fn create_frame_derived(index: usize) -> Derived<ViewportFrame> {
    derived(move || project_frame(index))
}

// =============================================================================
// MEASUREMENT WRITES
// =============================================================================

/// Replace the instance's measurements wholesale.
///
/// Returns true if the value changed.
pub fn set_measurements(index: usize, measurements: Measurements) -> bool {
    let Some(state) = get_state(index) else {
        return false;
    };
    if state.measurements.get() == measurements {
        return false;
    }
    state.measurements.set(measurements);
    true
}

/// Update just the container width.
pub fn set_container_width(index: usize, width: f32) -> bool {
    let Some(state) = get_state(index) else {
        return false;
    };
    let mut measurements = state.measurements.get();
    if measurements.container_width == width {
        return false;
    }
    measurements.container_width = width;
    state.measurements.set(measurements);
    true
}

/// Report the measured height of one slide, growing the height list as
/// needed. Unmeasured slots are 0.
pub fn set_slide_height(index: usize, slide: usize, height: f32) -> bool {
    let Some(state) = get_state(index) else {
        return false;
    };
    let mut measurements = state.measurements.get();
    if slide >= measurements.slide_heights.len() {
        measurements.slide_heights.resize(slide + 1, 0.0);
    }
    if measurements.slide_heights[slide] == height {
        return false;
    }
    measurements.slide_heights[slide] = height;
    state.measurements.set(measurements);
    true
}

// =============================================================================
// Tests
// =============================================================================
