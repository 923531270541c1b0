#![forbid(unsafe_code)]

//! Linear layout strategy.
//!
//! Items are arranged along one axis. Their *logical* order (the order the
//! user sees) is decoupled from their *physical* order (the order the
//! container registered them in): consumers can say "insert this third
//! visually" without caring how storage slots were assigned.
//!
//! The decoupling is a single table, `ids_to_position`, keyed by logical
//! slot and holding physical indices. Invariant: the table is a bijection
//! onto `[0, count)` at all times (no gaps, no duplicates), and every
//! insert or removal compacts it back into that shape.

use crate::allocator::{SlotSpec, allocate_evenly, distribute};
use crate::registry::ItemRegistry;
use crate::{Direction, LayoutError, SizeHint};
use trellis_core::geometry::{BoxF, Sizef};
use trellis_core::widget::WidgetId;

/// Arranges items in a row or a column.
#[derive(Debug, Clone)]
pub struct LinearLayout {
    direction: Direction,
    margin: f32,
    registry: ItemRegistry,
    /// Logical slot -> physical index.
    ids_to_position: Vec<usize>,
}

impl LinearLayout {
    /// Create a strategy for the given axis with an inter-item margin.
    #[must_use]
    pub fn new(direction: Direction, margin: f32) -> Self {
        Self {
            direction,
            margin: margin.max(0.0),
            registry: ItemRegistry::new(),
            ids_to_position: Vec::new(),
        }
    }

    /// The layout axis.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Space between consecutive items along the axis.
    #[must_use]
    pub const fn margin(&self) -> f32 {
        self.margin
    }

    /// Number of registered items.
    #[must_use]
    pub fn items_count(&self) -> usize {
        self.registry.len()
    }

    /// Registered items in physical order.
    #[must_use]
    pub fn items(&self) -> &[WidgetId] {
        self.registry.items()
    }

    /// The logical table: slot index -> physical index.
    #[must_use]
    pub fn positions(&self) -> &[usize] {
        &self.ids_to_position
    }

    /// Logical position currently held by a physical index.
    #[must_use]
    pub fn logical_position_of(&self, physical: usize) -> Option<usize> {
        self.ids_to_position.iter().position(|&p| p == physical)
    }

    /// Item occupying a logical slot.
    #[must_use]
    pub fn item_at_logical(&self, slot: usize) -> Option<WidgetId> {
        self.ids_to_position
            .get(slot)
            .and_then(|&physical| self.registry.get(physical))
    }

    /// Append an item at the end of the logical order.
    ///
    /// Equivalent to [`add_item_at`](Self::add_item_at) with the current
    /// item count as index.
    pub fn add_item(&mut self, item: WidgetId) -> Result<usize, LayoutError> {
        let end = self.items_count();
        self.add_item_at(item, end as i32)
    }

    /// Insert an item at a logical position, returning its physical index.
    ///
    /// The index is a defensive clamp, not a contract: a negative value
    /// inserts before the first item, a value past the end inserts after
    /// the last. Registration failures leave the logical table untouched.
    pub fn add_item_at(&mut self, item: WidgetId, index: i32) -> Result<usize, LayoutError> {
        let physical = self.registry.insert(item)?;

        // The registry already contains the new item, so the count below
        // includes it and `count - 1` is a valid logical slot.
        let count = self.registry.len();
        let normalized = (index.max(0) as usize).min(count - 1);

        // The table is keyed by logical slot: inserting here shifts every
        // item at or after the requested position one slot up, and physical
        // indices are untouched because registration appends. Both halves of
        // the bijection survive.
        self.ids_to_position.insert(normalized, physical);

        Ok(physical)
    }

    /// Remove an item, returning the physical index it occupied.
    ///
    /// The registry collapses physical indices greater than the removed one
    /// downward, so the table's stored values follow suit before the
    /// removed item's logical slot is erased.
    pub fn remove_item(&mut self, item: WidgetId) -> Result<usize, LayoutError> {
        let removed = self.registry.remove(item)?;

        // Locate the slot before renumbering: values are unique while the
        // bijection holds, and renumbering first could make a neighbor
        // (removed + 1, about to become removed) shadow the real slot.
        let slot = self.ids_to_position.iter().position(|&p| p == removed);

        for position in &mut self.ids_to_position {
            if *position > removed {
                *position -= 1;
            }
        }

        match slot {
            Some(slot) => {
                self.ids_to_position.remove(slot);
            }
            None => {
                tracing::warn!(
                    item = %item,
                    physical = removed,
                    "no logical position recorded for removed item"
                );
            }
        }

        Ok(removed)
    }

    /// Space left for items once inter-item margins are accounted for.
    ///
    /// An empty layout gets the base size unchanged.
    #[must_use]
    pub fn compute_available_size(&self, total_area: &BoxF) -> Sizef {
        let base = total_area.to_size();
        let count = self.items_count();
        if count == 0 {
            return base;
        }

        let margins = (count - 1) as f32 * self.margin;
        match self.direction {
            Direction::Horizontal => Sizef::new(base.w - margins, base.h),
            Direction::Vertical => Sizef::new(base.w, base.h - margins),
        }
    }

    /// Default box for each of `count` items sharing `area` evenly along
    /// the axis, keeping the cross-axis extent unchanged.
    pub fn compute_default_item_box(
        &self,
        area: Sizef,
        count: usize,
    ) -> Result<Sizef, LayoutError> {
        match self.direction {
            Direction::Horizontal => Ok(Sizef::new(allocate_evenly(area.w, count)?, area.h)),
            Direction::Vertical => Ok(Sizef::new(area.w, allocate_evenly(area.h, count)?)),
        }
    }

    /// Compute every item's target rectangle inside `window`.
    ///
    /// `hints` is indexed by physical index and must cover every registered
    /// item; the returned boxes are indexed the same way. Items are placed
    /// in logical order along the axis; when the minimums exceed the window
    /// the items keep their minimums and overflow.
    pub fn layout(&self, window: &BoxF, hints: &[SizeHint]) -> Result<Vec<BoxF>, LayoutError> {
        let count = self.items_count();
        if hints.len() != count {
            return Err(LayoutError::HintCountMismatch {
                expected: count,
                actual: hints.len(),
            });
        }
        if count == 0 {
            return Ok(Vec::new());
        }

        let available = self.compute_available_size(window);
        let extent = match self.direction {
            Direction::Horizontal => available.w,
            Direction::Vertical => available.h,
        };

        // Slots in logical order, minimums projected onto the axis.
        let slots: Vec<SlotSpec> = self
            .ids_to_position
            .iter()
            .map(|&physical| {
                let hint = hints[physical];
                let min = match self.direction {
                    Direction::Horizontal => hint.min.w,
                    Direction::Vertical => hint.min.h,
                };
                SlotSpec::new(min, hint.stretch)
            })
            .collect();

        let result = distribute(extent, &slots);
        if !result.fits() {
            tracing::debug!(
                deficit = result.deficit,
                "item minimums exceed the window; layout overflows"
            );
        }

        let mut boxes = vec![BoxF::ZERO; count];
        match self.direction {
            Direction::Horizontal => {
                let mut cursor = window.left_bound();
                for (slot, &physical) in self.ids_to_position.iter().enumerate() {
                    let w = result.sizes[slot];
                    boxes[physical] = BoxF::new(cursor + w / 2.0, window.y, w, window.h);
                    cursor += w + self.margin;
                }
            }
            Direction::Vertical => {
                let mut cursor = window.top_bound();
                for (slot, &physical) in self.ids_to_position.iter().enumerate() {
                    let h = result.sizes[slot];
                    boxes[physical] = BoxF::new(window.x, cursor - h / 2.0, window.w, h);
                    cursor -= h + self.margin;
                }
            }
        }

        Ok(boxes)
    }
}
