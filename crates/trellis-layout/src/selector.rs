#![forbid(unsafe_code)]

//! Selector layout strategy.
//!
//! Shows exactly one child at a time: the active item receives the whole
//! window and every other item is parked on a zero box (hidden). Activation
//! is addressed by child name or by physical index; re-activating the
//! current child is a no-op so no spurious resize or repaint is generated.

use crate::registry::ItemRegistry;
use crate::{LayoutError, SizeHint};
use trellis_core::geometry::BoxF;
use trellis_core::widget::WidgetId;

/// Displays a single item out of many.
#[derive(Debug, Clone, Default)]
pub struct SelectorLayout {
    registry: ItemRegistry,
    /// Child names, parallel to the registry's physical order.
    names: Vec<String>,
    /// Physical index of the visible child.
    active: Option<usize>,
}

impl SelectorLayout {
    /// Create an empty selector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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

    /// Physical index of the active item.
    #[must_use]
    pub const fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Handle of the active item.
    #[must_use]
    pub fn active_item(&self) -> Option<WidgetId> {
        self.active.and_then(|physical| self.registry.get(physical))
    }

    /// Register a named item; the first registered item becomes active.
    pub fn add_item(&mut self, item: WidgetId, name: &str) -> Result<usize, LayoutError> {
        let physical = self.registry.insert(item)?;
        self.names.push(name.to_owned());
        if self.active.is_none() {
            self.active = Some(physical);
        }
        Ok(physical)
    }

    /// Remove an item, returning the physical index it occupied.
    ///
    /// Removing the active item deactivates the selector.
    pub fn remove_item(&mut self, item: WidgetId) -> Result<usize, LayoutError> {
        let physical = self.registry.remove(item)?;
        self.names.remove(physical);
        self.active = match self.active {
            Some(active) if active == physical => None,
            Some(active) if active > physical => Some(active - 1),
            other => other,
        };
        Ok(physical)
    }

    /// Activate the child with the given name.
    ///
    /// Returns whether the active item changed; activating the already
    /// active child does nothing.
    pub fn set_active_item(&mut self, name: &str) -> Result<bool, LayoutError> {
        let physical = self
            .names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| LayoutError::UnknownName(name.to_owned()))?;
        Ok(self.activate(physical))
    }

    /// Activate the child at a physical index.
    ///
    /// Returns whether the active item changed.
    pub fn set_active_index(&mut self, index: usize) -> Result<bool, LayoutError> {
        if index >= self.registry.len() {
            return Err(LayoutError::IndexOutOfRange {
                index,
                count: self.registry.len(),
            });
        }
        Ok(self.activate(index))
    }

    fn activate(&mut self, physical: usize) -> bool {
        if self.active == Some(physical) {
            return false;
        }
        self.active = Some(physical);
        true
    }

    /// Give the active item the whole window; hide the rest.
    pub fn layout(&self, window: &BoxF, hints: &[SizeHint]) -> Result<Vec<BoxF>, LayoutError> {
        let count = self.items_count();
        if hints.len() != count {
            return Err(LayoutError::HintCountMismatch {
                expected: count,
                actual: hints.len(),
            });
        }

        let mut boxes = vec![BoxF::ZERO; count];
        if let Some(active) = self.active {
            boxes[active] = *window;
        }
        Ok(boxes)
    }
}
