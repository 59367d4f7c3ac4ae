//! State Module - Runtime state management systems
//!
//! This module contains the reactive state systems that power carousel
//! interactivity:
//!
//! - **Navigation** - Single-writer position resolver, edge wrapping, dot mapping
//! - **Gesture** - Horizontal drag tracking with a commit threshold
//! - **Autoplay** - Interval timers that emit step intents
//! - **Input** - crossterm event conversion, pointer capture, routing
//!
//! Modules stay namespaced because they share verbs (`cleanup_index`,
//! `reset_*`). Each keys its storage by the registry index.

pub mod autoplay;
pub mod gesture;
pub mod input;
pub mod navigation;
