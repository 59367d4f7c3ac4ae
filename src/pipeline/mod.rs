//! Reactive Pipeline
//!
//! This module implements the loop that connects terminal input and
//! timers to carousel state, and carousel state to the host's renderer.
//!
//! # Pipeline Architecture
//!
//! ```text
//! Pointer events → gesture tracker  → navigation resolver → position signal
//! Autoplay ticks → drain pump       → navigation resolver → position signal
//! Position/config/measurement signals → frame derived → render effect
//! ```
//!
//! ## Key Design Principles
//!
//! - **Single Writer**: only the navigation resolver writes positions
//! - **Pure Deriveds**: frame projection is pure computation
//! - **Side Effects in Effect**: terminal I/O happens in the host's
//!   render closure, nowhere else

pub mod mount;

// Re-exports
pub use mount::{drain_autoplay, mount, run, tick, unmount, MountHandle};
