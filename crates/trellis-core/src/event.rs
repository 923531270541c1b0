#![forbid(unsafe_code)]

//! Deferred notifications and the outbound event queue.
//!
//! Geometry changes are never applied in place. A layout pass or a gesture
//! handler posts [`Event`]s into an [`EventQueue`]; the owning container
//! drains the queue later and applies the requests in FIFO order. This keeps
//! a single user gesture from recursing into layout computation while a
//! layout pass is already on the stack, and guarantees that requests for the
//! same target are applied oldest-first so stale geometry never overwrites
//! fresher geometry.

use crate::geometry::BoxF;
use crate::widget::WidgetId;
use smallvec::SmallVec;
use std::collections::VecDeque;

/// Coordinate frame of a paint region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Relative to the emitting widget.
    Local,
    /// Window coordinates.
    Global,
}

/// A region scheduled for repaint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintRegion {
    /// The area to repaint.
    pub area: BoxF,
    /// Frame the area is expressed in.
    pub frame: Frame,
}

impl PaintRegion {
    /// A region in the emitter's local frame.
    #[must_use]
    pub const fn local(area: BoxF) -> Self {
        Self {
            area,
            frame: Frame::Local,
        }
    }

    /// A region in window coordinates.
    #[must_use]
    pub const fn global(area: BoxF) -> Self {
        Self {
            area,
            frame: Frame::Global,
        }
    }
}

/// Request to assign a new rendering area to a widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeRequest {
    /// Widget whose area should change.
    pub target: WidgetId,
    /// The new rendering area.
    pub area: BoxF,
    /// The area the widget had when the request was generated.
    pub previous: Option<BoxF>,
}

/// Notification that parts of a widget need repainting.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintEvent {
    /// Widget the regions belong to.
    pub source: WidgetId,
    /// Dirty regions. Usually one, occasionally a handful.
    pub regions: SmallVec<[PaintRegion; 4]>,
}

impl PaintEvent {
    /// A paint event with a single region.
    #[must_use]
    pub fn single(source: WidgetId, region: PaintRegion) -> Self {
        let mut regions = SmallVec::new();
        regions.push(region);
        Self { source, regions }
    }
}

/// Normalized visible-area notification from a scrollable viewport.
///
/// The box is expressed as fractions of the support widget's full extent:
/// `0` is the left/top edge of the content, `1` the right/bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleArea {
    /// The viewport that emitted the notification.
    pub source: WidgetId,
    /// Visible fraction of the content.
    pub area: BoxF,
}

/// An outbound notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Deferred resize request.
    Resize(ResizeRequest),
    /// Repaint notification.
    Paint(PaintEvent),
    /// Visible-area change from a scrollable viewport.
    VisibleArea(VisibleArea),
    /// A toggle button changed state through user interaction.
    Toggled {
        /// The button.
        source: WidgetId,
        /// New toggled state.
        on: bool,
    },
}

/// FIFO queue of outbound events.
///
/// Posted events are delivered exactly once, in posting order; there is no
/// cancellation. Superseding requests simply overwrite the outcome when the
/// later request is applied.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn post(&mut self, event: Event) {
        tracing::trace!(?event, "event posted");
        self.events.push_back(event);
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Drain all pending events in FIFO order.
    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.events.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoxF;

    #[test]
    fn queue_preserves_fifo_order() {
        let mut queue = EventQueue::new();
        let target = WidgetId::next();
        for i in 0..3 {
            queue.post(Event::Resize(ResizeRequest {
                target,
                area: BoxF::new(i as f32, 0.0, 1.0, 1.0),
                previous: None,
            }));
        }

        let xs: Vec<f32> = queue
            .drain()
            .map(|e| match e {
                Event::Resize(r) => r.area.x,
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn drain_empties_the_queue() {
        let mut queue = EventQueue::new();
        queue.post(Event::Toggled {
            source: WidgetId::next(),
            on: true,
        });
        assert_eq!(queue.len(), 1);
        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained.len(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn paint_event_single_region() {
        let e = PaintEvent::single(
            WidgetId::next(),
            PaintRegion::local(BoxF::new(0.0, 0.0, 2.0, 2.0)),
        );
        assert_eq!(e.regions.len(), 1);
        assert_eq!(e.regions[0].frame, Frame::Local);
    }
}
