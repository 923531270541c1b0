#![forbid(unsafe_code)]

//! Physical-index item registry.
//!
//! Containers register children in add order; the position in that order is
//! the item's *physical index*. Physical indices are stable until a removal,
//! which compacts every greater index downward by one. Strategies build
//! their own ordering metadata (logical positions, cell locations) on top
//! of this registry.

use crate::LayoutError;
use trellis_core::widget::WidgetId;

/// Append-ordered registry of item handles.
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    items: Vec<WidgetId>,
}

impl ItemRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Registered items in physical order.
    #[must_use]
    pub fn items(&self) -> &[WidgetId] {
        &self.items
    }

    /// Item at a physical index.
    #[must_use]
    pub fn get(&self, physical: usize) -> Option<WidgetId> {
        self.items.get(physical).copied()
    }

    /// Physical index of an item.
    #[must_use]
    pub fn index_of(&self, item: WidgetId) -> Option<usize> {
        self.items.iter().position(|&id| id == item)
    }

    /// Register an item, returning its physical index.
    ///
    /// Registering the same handle twice is a contract violation; nothing is
    /// mutated on failure.
    pub fn insert(&mut self, item: WidgetId) -> Result<usize, LayoutError> {
        if self.index_of(item).is_some() {
            return Err(LayoutError::DuplicateItem(item));
        }
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    /// Remove an item, returning the physical index it occupied.
    ///
    /// Every physical index greater than the returned one collapses
    /// downward by one.
    pub fn remove(&mut self, item: WidgetId) -> Result<usize, LayoutError> {
        let physical = self
            .index_of(item)
            .ok_or(LayoutError::UnknownItem(item))?;
        self.items.remove(physical);
        Ok(physical)
    }
}
