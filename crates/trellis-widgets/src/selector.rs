#![forbid(unsafe_code)]

//! Selector widget.
//!
//! A thin container that shows exactly one of its children at a time,
//! backed by the selector layout strategy. Activating the child that is
//! already visible is a no-op: no resize and no repaint are posted.

use std::fmt;
use trellis_core::event::{Event, EventQueue, PaintEvent, PaintRegion, ResizeRequest};
use trellis_core::geometry::{BoxF, Sizef};
use trellis_core::widget::{LayoutItem, WidgetId};
use trellis_layout::{LayoutError, SelectorLayout, SizeHint};

/// Shows one child widget out of many.
pub struct Selector {
    id: WidgetId,
    name: String,
    area: Option<BoxF>,
    layout: SelectorLayout,
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("children", &self.layout.items_count())
            .field("active", &self.layout.active_index())
            .finish()
    }
}

impl Selector {
    /// Create an empty selector.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            id: WidgetId::next(),
            name: name.to_owned(),
            area: None,
            layout: SelectorLayout::new(),
        }
    }

    /// Number of children.
    #[must_use]
    pub fn items_count(&self) -> usize {
        self.layout.items_count()
    }

    /// Handle of the visible child.
    #[must_use]
    pub fn active_widget(&self) -> Option<WidgetId> {
        self.layout.active_item()
    }

    /// Register a named child. The first child becomes visible.
    pub fn add_widget(&mut self, item: WidgetId, name: &str) -> Result<usize, LayoutError> {
        self.layout.add_item(item, name)
    }

    /// Remove a child.
    pub fn remove_widget(&mut self, item: WidgetId) -> Result<usize, LayoutError> {
        self.layout.remove_item(item)
    }

    /// Show the child with the given name.
    ///
    /// Selecting the child that is already visible posts nothing.
    pub fn set_active_widget(
        &mut self,
        name: &str,
        queue: &mut EventQueue,
    ) -> Result<(), LayoutError> {
        if self.layout.set_active_item(name)? {
            self.refresh(queue);
        }
        Ok(())
    }

    /// Show the child at the given physical index.
    ///
    /// Selecting the child that is already visible posts nothing.
    pub fn set_active_index(
        &mut self,
        index: usize,
        queue: &mut EventQueue,
    ) -> Result<(), LayoutError> {
        if self.layout.set_active_index(index)? {
            self.refresh(queue);
        }
        Ok(())
    }

    /// Resize entry point: recompute every child's rectangle and post the
    /// resize requests, visible child first.
    pub fn update(&mut self, window: BoxF, queue: &mut EventQueue) {
        self.area = Some(window);
        self.post_child_geometry(queue);
    }

    fn refresh(&self, queue: &mut EventQueue) {
        self.post_child_geometry(queue);
        let area = self.area.map_or(BoxF::ZERO, |a| a.to_origin());
        queue.post(Event::Paint(PaintEvent::single(
            self.id,
            PaintRegion::local(area),
        )));
    }

    fn post_child_geometry(&self, queue: &mut EventQueue) {
        let Some(window) = self.area else {
            return;
        };
        let hints = vec![SizeHint::ZERO; self.layout.items_count()];
        let Ok(boxes) = self.layout.layout(&window.to_origin(), &hints) else {
            return;
        };
        for (physical, area) in boxes.into_iter().enumerate() {
            let Some(target) = self.layout.items().get(physical).copied() else {
                continue;
            };
            queue.post(Event::Resize(ResizeRequest {
                target,
                area,
                previous: None,
            }));
        }
    }
}

impl LayoutItem for Selector {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn rendering_area(&self) -> Option<BoxF> {
        self.area
    }

    fn set_rendering_area(&mut self, area: BoxF) {
        self.area = Some(area);
    }

    fn size_hint(&self) -> Sizef {
        self.area.map_or(Sizef::ZERO, |a| a.to_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_posts_geometry_for_the_new_child() {
        let mut selector = Selector::new("pages");
        let first = WidgetId::next();
        let second = WidgetId::next();
        selector.add_widget(first, "first").unwrap();
        selector.add_widget(second, "second").unwrap();

        let mut queue = EventQueue::new();
        selector.update(BoxF::new(0.0, 0.0, 40.0, 20.0), &mut queue);
        queue.drain().count();

        selector.set_active_widget("second", &mut queue).unwrap();
        assert_eq!(selector.active_widget(), Some(second));

        let resize_to_window = queue.iter().any(|e| {
            matches!(
                e,
                Event::Resize(r) if r.target == second && r.area.w == 40.0
            )
        });
        assert!(resize_to_window, "the new child gets the full window");
    }

    #[test]
    fn reactivation_is_a_noop() {
        let mut selector = Selector::new("pages");
        selector.add_widget(WidgetId::next(), "only").unwrap();

        let mut queue = EventQueue::new();
        selector.set_active_widget("only", &mut queue).unwrap();
        assert!(queue.is_empty(), "the first child is already active");

        selector.set_active_index(0, &mut queue).unwrap();
        assert!(queue.is_empty());
    }

    #[test]
    fn unknown_children_are_errors() {
        let mut selector = Selector::new("pages");
        let mut queue = EventQueue::new();
        assert!(matches!(
            selector.set_active_widget("ghost", &mut queue),
            Err(LayoutError::UnknownName(_))
        ));
    }
}
