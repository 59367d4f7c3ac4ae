//! Carousel Engine - Instance registry.
//!
//! The engine manages the core data structures:
//! - Registry: Index allocation, ID mapping
//! - CarouselState: Per-instance signal bundle
//!
//! # Architecture
//!
//! Carousel instances are NOT objects. They are indices into a registry:
//!
//! ```text
//! Index 0: "hero"    (position=2, slides=6, autoplay on)
//! Index 1: "gallery" (position=0, slides=4, autoplay off)
//! ```
//!
//! Every state module (navigation, gesture, autoplay, input) keys its own
//! storage by the same index, so an instance is fully described by the
//! union of those maps and tears down by removing one key from each.

mod registry;

pub use registry::*;
