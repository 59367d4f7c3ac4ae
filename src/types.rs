//! Core types for spark-carousel.
//!
//! These types define the foundation that everything builds on.
//! They flow through the reactive pipeline and configure how a carousel behaves.

// =============================================================================
// Carousel Configuration
// =============================================================================

/// Default autoplay interval in milliseconds.
pub const DEFAULT_AUTOPLAY_INTERVAL_MS: u64 = 3000;

/// Default gap between slides (in track units).
pub const DEFAULT_GAP: f32 = 16.0;

/// Behavior configuration for a carousel instance.
///
/// All fields have working defaults, so partial construction with
/// struct update syntax is the normal way to build one:
///
/// ```
/// use spark_carousel::types::CarouselConfig;
///
/// let config = CarouselConfig {
///     auto_play: true,
///     dots: true,
///     ..Default::default()
/// };
/// assert_eq!(config.auto_play_interval_ms, 3000);
/// assert_eq!(config.slides_to_scroll, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselConfig {
    /// Advance automatically on a timer.
    pub auto_play: bool,
    /// Milliseconds between automatic advances. 0 disables the timer.
    pub auto_play_interval_ms: u64,
    /// How many slides are visible at once. Fractional values (e.g. 2.5)
    /// show a partial slide at the edge.
    pub slides_to_show: f32,
    /// How many slides one navigation step moves.
    pub slides_to_scroll: usize,
    /// Render dot indicators.
    pub dots: bool,
    /// Render previous/next arrow controls.
    pub arrows: bool,
    /// Spacing between adjacent slides (in track units).
    pub gap: f32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            auto_play: false,
            auto_play_interval_ms: DEFAULT_AUTOPLAY_INTERVAL_MS,
            slides_to_show: 1.0,
            slides_to_scroll: 1,
            dots: false,
            arrows: false,
            gap: DEFAULT_GAP,
        }
    }
}

impl CarouselConfig {
    /// Clamp degenerate values into usable ranges.
    ///
    /// - `slides_to_show <= 0` (or NaN) becomes 1.0
    /// - `slides_to_scroll == 0` becomes 1
    /// - `gap < 0` (or NaN) becomes 0.0
    ///
    /// Every config entering the engine passes through here, so downstream
    /// math can divide by `slides_to_show` without checking.
    pub fn sanitized(mut self) -> Self {
        // NaN fails both comparisons, so it falls back too.
        if !(self.slides_to_show > 0.0) {
            self.slides_to_show = 1.0;
        }
        if self.slides_to_scroll == 0 {
            self.slides_to_scroll = 1;
        }
        if !(self.gap >= 0.0) {
            self.gap = 0.0;
        }
        self
    }

    /// Whether the autoplay timer should run under this config.
    #[inline]
    pub fn autoplay_enabled(&self) -> bool {
        self.auto_play && self.auto_play_interval_ms > 0
    }
}

// =============================================================================
// Tests
// =============================================================================
