//! Carousel Registry - Index allocation and per-instance state.
//!
//! Manages the lifecycle of carousel instances:
//! - ID ↔ Index bidirectional mapping
//! - Free index pool for O(1) reuse
//! - Per-instance signal bundle (position, config, slide count, measurements)
//! - Reference-counted release for handles sharing an id
//! - Auto-reset when the last instance is released

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use log::debug;
use spark_signals::{signal, Signal};

use crate::layout::Measurements;
use crate::types::CarouselConfig;

// =============================================================================
// Instance State
// =============================================================================

/// The reactive state bundle owned by one carousel instance.
///
/// Signals are cheap to clone (shared handles), so this struct is handed
/// out by value. The position signal is only ever written by the
/// navigation resolver; everything else reads it.
#[derive(Clone)]
pub struct CarouselState {
    /// Current slide index. Always within `[0, slide_count)` when
    /// `slide_count > 0`, and 0 otherwise.
    pub position: Signal<usize>,
    /// Sanitized behavior configuration.
    pub config: Signal<CarouselConfig>,
    /// Number of slides the caller supplied.
    pub slide_count: Signal<usize>,
    /// Geometry reported by the render layer.
    pub measurements: Signal<Measurements>,
}

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Map carousel ID to instance index.
    static ID_TO_INDEX: RefCell<HashMap<String, usize>> = RefCell::new(HashMap::new());

    /// Map instance index to carousel ID.
    static INDEX_TO_ID: RefCell<HashMap<usize, String>> = RefCell::new(HashMap::new());

    /// Per-instance signal bundles.
    static STATES: RefCell<HashMap<usize, CarouselState>> = RefCell::new(HashMap::new());

    /// Set of currently allocated indices, ordered for deterministic iteration.
    static ALLOCATED_INDICES: RefCell<BTreeSet<usize>> = RefCell::new(BTreeSet::new());

    /// Live reference count per index. Duplicate-id allocations share a
    /// slot and hold one reference each.
    static INDEX_REFCOUNTS: RefCell<HashMap<usize, usize>> = RefCell::new(HashMap::new());

    /// Pool of freed indices for reuse.
    static FREE_INDICES: RefCell<Vec<usize>> = RefCell::new(Vec::new());

    /// Next index to allocate if pool is empty.
    static NEXT_INDEX: RefCell<usize> = const { RefCell::new(0) };

    /// Counter for generating unique IDs.
    static ID_COUNTER: RefCell<usize> = const { RefCell::new(0) };
}

// =============================================================================
// Index Allocation
// =============================================================================

/// Allocate an index for a new carousel instance.
///
/// # Arguments
/// * `id` - Optional carousel ID. If not provided, one is generated.
/// * `config` - Initial configuration (sanitized on the way in).
/// * `slide_count` - Number of slides the caller owns.
///
/// # Returns
/// The allocated index. If the ID is already allocated, returns the
/// existing index with one more reference on it, leaving its state
/// untouched.
pub fn allocate_index(id: Option<&str>, config: CarouselConfig, slide_count: usize) -> usize {
    // Generate ID if not provided
    let carousel_id = match id {
        Some(id) => id.to_string(),
        None => ID_COUNTER.with(|counter| {
            let mut counter = counter.borrow_mut();
            let id = format!("c{}", *counter);
            *counter += 1;
            id
        }),
    };

    // Check if already allocated
    let existing = ID_TO_INDEX.with(|map| map.borrow().get(&carousel_id).copied());
    if let Some(index) = existing {
        INDEX_REFCOUNTS.with(|counts| {
            if let Some(count) = counts.borrow_mut().get_mut(&index) {
                *count += 1;
            }
        });
        return index;
    }

    // Reuse free index or allocate new
    let index = FREE_INDICES.with(|free| {
        let mut free = free.borrow_mut();
        if let Some(index) = free.pop() {
            index
        } else {
            NEXT_INDEX.with(|next| {
                let mut next = next.borrow_mut();
                let index = *next;
                *next += 1;
                index
            })
        }
    });

    // Register mappings
    ID_TO_INDEX.with(|map| {
        map.borrow_mut().insert(carousel_id.clone(), index);
    });
    INDEX_TO_ID.with(|map| {
        map.borrow_mut().insert(index, carousel_id.clone());
    });
    ALLOCATED_INDICES.with(|set| {
        set.borrow_mut().insert(index);
    });
    INDEX_REFCOUNTS.with(|counts| {
        counts.borrow_mut().insert(index, 1);
    });

    // Seed the signal bundle
    STATES.with(|states| {
        states.borrow_mut().insert(
            index,
            CarouselState {
                position: signal(0),
                config: signal(config.sanitized()),
                slide_count: signal(slide_count),
                measurements: signal(Measurements::default()),
            },
        );
    });

    debug!("carousel allocated: id={carousel_id} index={index} slides={slide_count}");

    index
}

/// Release one reference to an index, freeing the slot when the last
/// one goes.
///
/// Returns true when this call freed the slot. Handles sharing an id
/// hold one reference each, so the slot survives until all of them
/// release; state modules keyed by the index (gesture sessions,
/// callbacks, viewport bounds, autoplay timers) clean themselves up
/// through the component's cleanup closure once that happens.
pub fn release_index(index: usize) -> bool {
    let id = INDEX_TO_ID.with(|map| map.borrow().get(&index).cloned());
    let Some(id) = id else { return false };

    let remaining = INDEX_REFCOUNTS.with(|counts| {
        let mut counts = counts.borrow_mut();
        let Some(count) = counts.get_mut(&index) else {
            return 0;
        };
        *count = count.saturating_sub(1);
        *count
    });
    if remaining > 0 {
        debug!("carousel retained: id={id} index={index} handles={remaining}");
        return false;
    }
    INDEX_REFCOUNTS.with(|counts| {
        counts.borrow_mut().remove(&index);
    });

    // Clean up mappings
    ID_TO_INDEX.with(|map| {
        map.borrow_mut().remove(&id);
    });
    INDEX_TO_ID.with(|map| {
        map.borrow_mut().remove(&index);
    });
    ALLOCATED_INDICES.with(|set| {
        set.borrow_mut().remove(&index);
    });
    STATES.with(|states| {
        states.borrow_mut().remove(&index);
    });

    // Return to pool for reuse
    FREE_INDICES.with(|free| {
        free.borrow_mut().push(index);
    });

    debug!("carousel released: id={id} index={index}");

    // AUTO-CLEANUP: when the last instance dies, reset allocation state
    let is_empty = ALLOCATED_INDICES.with(|set| set.borrow().is_empty());
    if is_empty {
        FREE_INDICES.with(|free| {
            free.borrow_mut().clear();
        });
        NEXT_INDEX.with(|next| {
            *next.borrow_mut() = 0;
        });
    }

    true
}

// =============================================================================
// Lookups
// =============================================================================

/// Get the signal bundle for an instance.
pub fn get_state(index: usize) -> Option<CarouselState> {
    STATES.with(|states| states.borrow().get(&index).cloned())
}

/// Get index for a carousel ID.
pub fn get_index(id: &str) -> Option<usize> {
    ID_TO_INDEX.with(|map| map.borrow().get(id).copied())
}

/// Get ID for an index.
pub fn get_id(index: usize) -> Option<String> {
    INDEX_TO_ID.with(|map| map.borrow().get(&index).cloned())
}

/// Get all currently allocated indices in ascending order.
pub fn live_indices() -> Vec<usize> {
    ALLOCATED_INDICES.with(|set| set.borrow().iter().copied().collect())
}

/// Check if an index is currently allocated.
pub fn is_allocated(index: usize) -> bool {
    ALLOCATED_INDICES.with(|set| set.borrow().contains(&index))
}

/// Get the count of currently allocated instances.
pub fn get_allocated_count() -> usize {
    ALLOCATED_INDICES.with(|set| set.borrow().len())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset all registry state (for testing).
pub fn reset_carousels() {
    ID_TO_INDEX.with(|map| map.borrow_mut().clear());
    INDEX_TO_ID.with(|map| map.borrow_mut().clear());
    STATES.with(|states| states.borrow_mut().clear());
    ALLOCATED_INDICES.with(|set| set.borrow_mut().clear());
    INDEX_REFCOUNTS.with(|counts| counts.borrow_mut().clear());
    FREE_INDICES.with(|free| free.borrow_mut().clear());
    NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
    ID_COUNTER.with(|counter| *counter.borrow_mut() = 0);
}
