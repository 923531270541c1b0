#![forbid(unsafe_code)]

//! Widget identity and the item surface consumed by layout code.
//!
//! The widget tree itself (ownership of children, event dispatch, painting)
//! lives in the embedding application. Layout strategies and the scrollable
//! viewport only need the narrow [`LayoutItem`] surface: a stable identity,
//! the current rendering area, and a preferred-size query.

use crate::event::ResizeRequest;
use crate::geometry::{BoxF, Sizef};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque identity of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

static NEXT_WIDGET_ID: AtomicU64 = AtomicU64::new(1);

impl WidgetId {
    /// Allocate a fresh, process-unique id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_WIDGET_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, for logging.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The surface a child exposes to layout strategies and containers.
///
/// `rendering_area` is `None` until the first resize request has been
/// applied; geometry consumers treat that as "display the top-left corner"
/// (see the scrollable viewport's resize handling).
pub trait LayoutItem {
    /// Stable identity.
    fn id(&self) -> WidgetId;

    /// Human-readable name, for diagnostics.
    fn name(&self) -> &str;

    /// Current rendering area in the parent's frame, if one was assigned.
    fn rendering_area(&self) -> Option<BoxF>;

    /// Apply a rendering area.
    ///
    /// Called by the container when draining the event queue, never from
    /// inside a layout pass.
    fn set_rendering_area(&mut self, area: BoxF);

    /// Preferred size of the content.
    fn size_hint(&self) -> Sizef;
}

/// Apply a drained [`ResizeRequest`] to an item.
///
/// Returns `false` (and leaves the item untouched) when the request targets
/// a different widget.
pub fn apply_resize(item: &mut dyn LayoutItem, request: &ResizeRequest) -> bool {
    if item.id() != request.target {
        return false;
    }
    item.set_rendering_area(request.area);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoxF, Sizef};

    struct Probe {
        id: WidgetId,
        area: Option<BoxF>,
    }

    impl LayoutItem for Probe {
        fn id(&self) -> WidgetId {
            self.id
        }

        fn name(&self) -> &str {
            "probe"
        }

        fn rendering_area(&self) -> Option<BoxF> {
            self.area
        }

        fn set_rendering_area(&mut self, area: BoxF) {
            self.area = Some(area);
        }

        fn size_hint(&self) -> Sizef {
            Sizef::new(10.0, 10.0)
        }
    }

    #[test]
    fn widget_ids_are_unique() {
        let a = WidgetId::next();
        let b = WidgetId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn apply_resize_matches_target() {
        let mut probe = Probe {
            id: WidgetId::next(),
            area: None,
        };
        let hit = ResizeRequest {
            target: probe.id(),
            area: BoxF::new(0.0, 0.0, 4.0, 4.0),
            previous: None,
        };
        let miss = ResizeRequest {
            target: WidgetId::next(),
            area: BoxF::new(9.0, 9.0, 1.0, 1.0),
            previous: None,
        };

        assert!(!apply_resize(&mut probe, &miss));
        assert_eq!(probe.rendering_area(), None);

        assert!(apply_resize(&mut probe, &hit));
        assert_eq!(probe.rendering_area(), Some(BoxF::new(0.0, 0.0, 4.0, 4.0)));
    }
}
