//! Carousel Component - Instance assembly.
//!
//! This module provides the component-level entry point:
//! - [`carousel`] - Assemble one instance, returns a [`CarouselHandle`]
//!
//! # Architecture
//!
//! A carousel is an index into per-concern registries. Assembly:
//! 1. Allocates an index and seeds the instance signals
//! 2. Registers the slide-change callback
//! 3. Configures the autoplay timer
//! 4. Returns a handle whose `unmount` tears it all down in reverse
//!
//! # Reactivity
//!
//! Handle reads go through the instance signals, so they track inside
//! deriveds and effects. Writes go through the single-writer resolver,
//! so every position change fires the registered callbacks exactly once.

mod types;
mod carousel;

pub use types::*;
pub use carousel::{carousel, CarouselHandle};
