//! Carousel Component - Assembles one carousel instance.
//!
//! Wires the registry, navigation resolver, gesture tracker, and autoplay
//! scheduler together behind a single handle. The handle is headless: it
//! owns no rendering, only state and the operations that change it.
//!
//! # Reactivity
//!
//! The handle's reads go through the instance's signals, so calling them
//! inside a derived or effect creates dependencies. For a ready-made
//! reactive frame, see [`create_frame_derived`](crate::layout::create_frame_derived).
//!
//! # Example
//!
//! ```ignore
//! use spark_carousel::component::{carousel, CarouselProps};
//! use spark_carousel::types::CarouselConfig;
//!
//! let handle = carousel(CarouselProps {
//!     slide_count: 5,
//!     config: CarouselConfig {
//!         auto_play: true,
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! });
//!
//! handle.next();
//! assert_eq!(handle.current_slide(), 1);
//!
//! handle.unmount();
//! ```

use crate::engine::{allocate_index, get_id, get_state, release_index};
use crate::layout::{self, ViewportFrame};
use crate::state::{autoplay, gesture, input, navigation};
use crate::types::CarouselConfig;

use super::types::{CarouselProps, Cleanup, ControlSurface};

// =============================================================================
// Handle
// =============================================================================

/// Live carousel instance.
///
/// Releases on [`unmount`](CarouselHandle::unmount) or on drop,
/// whichever comes first. Handles created with the same id share one
/// instance and hold one registry reference each; the instance tears
/// down when the last of them goes.
pub struct CarouselHandle {
    index: usize,
    cleanup: Option<Cleanup>,
}

// =============================================================================
// Assembly
// =============================================================================

/// Create a carousel instance.
///
/// Allocates registry state, registers the slide-change callback, and
/// starts the autoplay timer if the config asks for one. A props id
/// naming an existing instance yields another handle on it instead of a
/// new allocation. Returns a handle exposing the control surface;
/// `unmount` (or drop) releases it.
pub fn carousel(props: CarouselProps) -> CarouselHandle {
    // 1. ALLOCATE INDEX - seeds position, config, slide count, and
    //    measurement signals (config sanitized by the registry)
    let index = allocate_index(props.id.as_deref(), props.config, props.slide_count);

    // 2. REGISTER SLIDE CALLBACK
    let mut callback_cleanup: Option<Box<dyn FnOnce()>> = None;
    if let Some(on_slide_change) = props.on_slide_change {
        let cleanup_fn = navigation::on_slide_change(index, on_slide_change);
        callback_cleanup = Some(Box::new(cleanup_fn));
    }

    // 3. CONFIGURE AUTOPLAY - reads the sanitized config back out of the
    //    registry so the timer sees what the instance sees
    if let Some(state) = get_state(index) {
        autoplay::configure(index, &state.config.get());
    }

    // 4. RETURN HANDLE - the handle's own callback always unregisters;
    //    instance-wide state tears down with the last reference
    let cleanup: Cleanup = Box::new(move || {
        if let Some(cleanup) = callback_cleanup {
            cleanup();
        }
        if release_index(index) {
            autoplay::cancel(index);
            gesture::cleanup_index(index);
            input::cleanup_index(index);
            navigation::cleanup_index(index);
        }
    });

    CarouselHandle {
        index,
        cleanup: Some(cleanup),
    }
}

impl CarouselHandle {
    /// Registry index of this instance. State modules key their storage
    /// by this index, so hosts can drive them directly.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Stable id of this instance.
    pub fn id(&self) -> Option<String> {
        get_id(self.index)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Advance by `slides_to_scroll`, wrapping past the last slide to 0.
    pub fn next(&self) -> bool {
        navigation::step_forward(self.index)
    }

    /// Step back by `slides_to_scroll`, wrapping before 0 to the last
    /// slide.
    pub fn previous(&self) -> bool {
        navigation::step_backward(self.index)
    }

    /// Jump to the first slide of a dot group.
    pub fn select_dot(&self, dot_index: usize) -> bool {
        navigation::go_to_group(self.index, dot_index)
    }

    /// Jump to a slide by index, with out-of-range resets to the edges.
    pub fn go_to(&self, requested: i64) -> bool {
        navigation::go_to_slide(self.index, requested)
    }

    /// Current slide position.
    pub fn current_slide(&self) -> usize {
        navigation::current_position(self.index)
    }

    // =========================================================================
    // State reads
    // =========================================================================

    /// Current slide count.
    pub fn slide_count(&self) -> usize {
        get_state(self.index)
            .map(|state| state.slide_count.get())
            .unwrap_or(0)
    }

    /// Current (sanitized) config.
    pub fn config(&self) -> CarouselConfig {
        get_state(self.index)
            .map(|state| state.config.get())
            .unwrap_or_default()
    }

    /// Snapshot of the projected viewport geometry.
    pub fn frame(&self) -> ViewportFrame {
        layout::project_frame(self.index)
    }

    /// What navigation chrome the host should render right now.
    pub fn controls(&self) -> ControlSurface {
        let Some(state) = get_state(self.index) else {
            return ControlSurface::default();
        };
        let config = state.config.get();
        ControlSurface {
            show_arrows: config.arrows,
            show_dots: config.dots,
            dot_count: navigation::dot_count(self.index),
            active_dot: navigation::active_dot(self.index),
        }
    }

    /// Whether an autoplay timer is currently running.
    pub fn is_auto_playing(&self) -> bool {
        autoplay::is_autoplay_running(self.index)
    }

    // =========================================================================
    // State writes
    // =========================================================================

    /// Replace the config. The new value is sanitized, and the autoplay
    /// timer is recreated when a field it depends on changed.
    pub fn set_config(&self, config: CarouselConfig) {
        let Some(state) = get_state(self.index) else {
            return;
        };
        let old = state.config.get();
        let new = config.sanitized();
        if old == new {
            return;
        }
        state.config.set(new);

        if old.auto_play != new.auto_play
            || old.auto_play_interval_ms != new.auto_play_interval_ms
            || old.slides_to_scroll != new.slides_to_scroll
        {
            autoplay::configure(self.index, &new);
        }
    }

    /// Replace the slide count. The position renormalizes into the new
    /// range and the autoplay cadence realigns to the change.
    pub fn set_slide_count(&self, slide_count: usize) {
        let Some(state) = get_state(self.index) else {
            return;
        };
        if state.slide_count.get() == slide_count {
            return;
        }
        state.slide_count.set(slide_count);
        navigation::renormalize_position(self.index);
        autoplay::configure(self.index, &state.config.get());
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Release this handle: its slide callback unregisters, and when it
    /// was the last handle on the instance the timer cancels, gesture
    /// and input state drop, and the index frees.
    pub fn unmount(mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl Drop for CarouselHandle {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::engine::{get_allocated_count, get_index, is_allocated, reset_carousels};
    use crate::layout::Measurements;
    use crate::state::autoplay::{reset_autoplay, timers_cancelled, timers_started};
    use crate::state::navigation::reset_navigation_state;

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

    #[test]
    fn test_carousel_mounts() {
        setup();

        let handle = carousel(CarouselProps {
            id: Some("gallery".to_string()),
            slide_count: 5,
            ..Default::default()
        });

        assert_eq!(handle.current_slide(), 0);
        assert_eq!(handle.slide_count(), 5);
        assert_eq!(handle.id(), Some("gallery".to_string()));
        assert_eq!(get_index("gallery"), Some(handle.index()));
    }

    #[test]
    fn test_unmount_releases() {
        setup();

        let handle = carousel(CarouselProps {
            slide_count: 3,
            ..Default::default()
        });
        let index = handle.index();

        handle.unmount();
        assert!(!is_allocated(index));
        assert_eq!(get_allocated_count(), 0);
    }

    #[test]
    fn test_unmount_cancels_timer() {
        setup();

        let handle = carousel(CarouselProps {
            slide_count: 3,
            config: autoplay_config(60_000),
            ..Default::default()
        });
        let index = handle.index();
        assert!(handle.is_auto_playing());
        assert_eq!(timers_started(), 1);

        handle.unmount();
        assert_eq!(timers_cancelled(), 1);
        assert!(!autoplay::is_autoplay_running(index));
    }

    #[test]
    fn test_drop_tears_down() {
        setup();

        let index;
        {
            let handle = carousel(CarouselProps {
                slide_count: 3,
                config: autoplay_config(60_000),
                ..Default::default()
            });
            index = handle.index();
            assert!(is_allocated(index));
        }

        assert!(!is_allocated(index));
        assert_eq!(timers_started(), 1);
        assert_eq!(timers_cancelled(), 1);
    }

    #[test]
    fn test_handle_navigation() {
        setup();

        let handle = carousel(CarouselProps {
            slide_count: 6,
            config: CarouselConfig {
                slides_to_scroll: 2,
                ..Default::default()
            },
            ..Default::default()
        });

        assert!(handle.next());
        assert_eq!(handle.current_slide(), 2);

        assert!(handle.previous());
        assert_eq!(handle.current_slide(), 0);

        assert!(handle.select_dot(2));
        assert_eq!(handle.current_slide(), 4);

        assert!(handle.go_to(-1));
        assert_eq!(handle.current_slide(), 5);
    }

    #[test]
    fn test_on_slide_change_prop() {
        setup();

        let seen = Rc::new(Cell::new(usize::MAX));
        let seen_clone = seen.clone();

        let handle = carousel(CarouselProps {
            slide_count: 3,
            on_slide_change: Some(Rc::new(move |position| {
                seen_clone.set(position);
            })),
            ..Default::default()
        });

        handle.next();
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_set_config_sanitizes() {
        setup();

        let handle = carousel(CarouselProps {
            slide_count: 4,
            ..Default::default()
        });

        handle.set_config(CarouselConfig {
            slides_to_scroll: 0,
            slides_to_show: -2.0,
            ..Default::default()
        });

        let config = handle.config();
        assert_eq!(config.slides_to_scroll, 1);
        assert_eq!(config.slides_to_show, 1.0);
    }

    #[test]
    fn test_set_config_reconfigures_autoplay() {
        setup();

        let handle = carousel(CarouselProps {
            slide_count: 3,
            ..Default::default()
        });
        assert_eq!(timers_started(), 0);

        // Enabling autoplay starts a timer
        handle.set_config(autoplay_config(60_000));
        assert_eq!(timers_started(), 1);

        // Changing the interval recreates it
        handle.set_config(autoplay_config(30_000));
        assert_eq!(timers_started(), 2);
        assert_eq!(timers_cancelled(), 1);

        // A cosmetic change leaves the timer alone
        handle.set_config(CarouselConfig {
            gap: 8.0,
            ..autoplay_config(30_000)
        });
        assert_eq!(timers_started(), 2);

        handle.unmount();
        assert_eq!(timers_cancelled(), 2);
    }

    #[test]
    fn test_set_slide_count_renormalizes() {
        setup();

        let handle = carousel(CarouselProps {
            slide_count: 6,
            ..Default::default()
        });
        handle.go_to(5);

        handle.set_slide_count(3);
        assert_eq!(handle.current_slide(), 2);

        handle.set_slide_count(0);
        assert_eq!(handle.current_slide(), 0);
    }

    #[test]
    fn test_controls_surface() {
        setup();

        let handle = carousel(CarouselProps {
            slide_count: 6,
            config: CarouselConfig {
                dots: true,
                arrows: true,
                slides_to_scroll: 2,
                ..Default::default()
            },
            ..Default::default()
        });
        handle.select_dot(1);

        let controls = handle.controls();
        assert!(controls.show_arrows);
        assert!(controls.show_dots);
        assert_eq!(controls.dot_count, 3);
        assert_eq!(controls.active_dot, 1);
    }

    #[test]
    fn test_controls_hidden_by_default() {
        setup();

        let handle = carousel(CarouselProps {
            slide_count: 4,
            ..Default::default()
        });

        let controls = handle.controls();
        assert!(!controls.show_arrows);
        assert!(!controls.show_dots);
        assert_eq!(controls.dot_count, 4);
    }

    #[test]
    fn test_duplicate_id_reuses_instance() {
        setup();

        let first = carousel(CarouselProps {
            id: Some("hero".to_string()),
            slide_count: 4,
            ..Default::default()
        });
        let second = carousel(CarouselProps {
            id: Some("hero".to_string()),
            slide_count: 9,
            ..Default::default()
        });

        assert_eq!(first.index(), second.index());
        // The original instance state wins
        assert_eq!(first.slide_count(), 4);
    }

    #[test]
    fn test_shared_id_survives_first_release() {
        setup();

        let first = carousel(CarouselProps {
            id: Some("hero".to_string()),
            slide_count: 4,
            config: autoplay_config(60_000),
            ..Default::default()
        });
        let index = first.index();
        let second = carousel(CarouselProps {
            id: Some("hero".to_string()),
            ..Default::default()
        });
        assert_eq!(second.index(), index);

        // Dropping one handle keeps the shared instance and its timer
        drop(first);
        assert!(is_allocated(index));
        assert!(autoplay::is_autoplay_running(index));

        // The retained slot cannot be handed to a new instance, so the
        // surviving handle cannot tear down someone else's state
        let other = carousel(CarouselProps {
            slide_count: 2,
            ..Default::default()
        });
        assert_ne!(other.index(), index);

        // The last shared handle tears the instance down
        drop(second);
        assert!(!is_allocated(index));
        assert!(!autoplay::is_autoplay_running(index));
        assert_eq!(timers_started(), 2);
        assert_eq!(timers_cancelled(), 2);
    }

    #[test]
    fn test_frame_snapshot() {
        setup();

        let handle = carousel(CarouselProps {
            slide_count: 4,
            config: CarouselConfig {
                gap: 30.0,
                ..Default::default()
            },
            ..Default::default()
        });
        layout::set_measurements(
            handle.index(),
            Measurements {
                container_width: 400.0,
                slide_heights: vec![12.0, 24.0, 36.0, 48.0],
            },
        );
        handle.go_to(1);

        let frame = handle.frame();
        assert_eq!(frame.slide_width, 100.0);
        assert_eq!(frame.translate_x, 130.0);
        assert_eq!(frame.wrapper_height, 24.0);
    }
}
