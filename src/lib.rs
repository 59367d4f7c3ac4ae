//! # spark-carousel
//!
//! Reactive headless carousel engine for terminal UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for fine-grained reactivity.
//!
//! ## Architecture
//!
//! A carousel is an index into per-concern registries rather than an
//! object. Position, config, slide count, and measurements live in
//! signals keyed by that index; navigation, gestures, and autoplay are
//! state systems that resolve intents into position writes through one
//! resolver.
//!
//! The engine is headless. It never draws a cell: hosts read the
//! projected geometry (a pure derived) and render however they like;
//! the pipeline wires crossterm input and timer ticks into the state.
//!
//! ```text
//! Pointer events → gesture tracker  → navigation resolver → position signal
//! Autoplay ticks → drain pump       → navigation resolver → position signal
//! Position/config/measurement signals → frame derived → render effect
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types (CarouselConfig, defaults, sanitation)
//! - [`engine`] - Instance registry, per-instance signals
//! - [`state`] - Navigation, gesture, autoplay, input systems
//! - [`layout`] - Pure viewport geometry projection
//! - [`component`] - Instance assembly, the `carousel()` entry point
//! - [`pipeline`] - Terminal lifecycle, event loop, autoplay pump
//!
//! ## Example
//!
//! ```ignore
//! use spark_carousel::{carousel, CarouselProps, CarouselConfig};
//!
//! let handle = carousel(CarouselProps {
//!     slide_count: 5,
//!     config: CarouselConfig {
//!         auto_play: true,
//!         dots: true,
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! });
//!
//! handle.next();
//! assert_eq!(handle.current_slide(), 1);
//! handle.unmount();
//! ```

pub mod component;
pub mod engine;
pub mod layout;
pub mod pipeline;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use engine::{
    allocate_index, get_allocated_count, get_id, get_index, get_state, is_allocated,
    live_indices, release_index, reset_carousels, CarouselState,
};

pub use layout::{
    create_frame_derived, project, project_frame, set_container_width, set_measurements,
    set_slide_height, Measurements, ViewportFrame,
};

pub use component::{carousel, CarouselHandle, CarouselProps, Cleanup, ControlSurface};

pub use pipeline::{drain_autoplay, mount, run, tick, unmount, MountHandle};

pub use state::navigation::{
    active_dot, current_position, dot_count, go_to_group, go_to_slide, on_slide_change,
    step_backward, step_forward, wrap_index, SlideCallback,
};

pub use state::gesture::{begin_drag, end_drag, is_dragging, SwipeDirection, DRAG_THRESHOLD};

pub use state::input::{
    convert_event, poll_event, read_event, route_event, set_viewport_bounds, Bounds, InputEvent,
    PointerAction, PointerEvent,
};
