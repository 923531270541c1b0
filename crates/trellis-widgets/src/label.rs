#![forbid(unsafe_code)]

//! Static text label.
//!
//! Pure presentational state: a string and its alignment. Every setter
//! detects no-op assignments so an unchanged label never schedules a
//! repaint.

use std::fmt;
use trellis_core::event::{Event, EventQueue, PaintEvent, PaintRegion};
use trellis_core::geometry::{BoxF, Sizef};
use trellis_core::lock::GeometryLock;
use trellis_core::widget::{LayoutItem, WidgetId};

/// Horizontal text placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlignment {
    /// Against the left edge.
    Left,
    /// Centered.
    #[default]
    Center,
    /// Against the right edge.
    Right,
}

/// Vertical text placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    /// Against the top edge.
    Top,
    /// Centered.
    #[default]
    Center,
    /// Against the bottom edge.
    Bottom,
}

#[derive(Debug)]
struct LabelProps {
    text: String,
    halign: HorizontalAlignment,
    valign: VerticalAlignment,
}

/// A piece of aligned text.
pub struct Label {
    id: WidgetId,
    name: String,
    area: Option<BoxF>,
    size_hint: Sizef,
    props: GeometryLock<LabelProps>,
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Label")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("text", &self.props.lock().text)
            .finish()
    }
}

impl Label {
    /// Create a label.
    #[must_use]
    pub fn new(name: &str, text: &str) -> Self {
        Self {
            id: WidgetId::next(),
            name: name.to_owned(),
            area: None,
            size_hint: Sizef::ZERO,
            props: GeometryLock::new(LabelProps {
                text: text.to_owned(),
                halign: HorizontalAlignment::default(),
                valign: VerticalAlignment::default(),
            }),
        }
    }

    /// Set the preferred size reported to layouts.
    #[must_use]
    pub fn with_size_hint(mut self, hint: Sizef) -> Self {
        self.size_hint = hint;
        self
    }

    /// Displayed text.
    #[must_use]
    pub fn text(&self) -> String {
        self.props.lock().text.clone()
    }

    /// Horizontal alignment.
    #[must_use]
    pub fn horizontal_alignment(&self) -> HorizontalAlignment {
        self.props.lock().halign
    }

    /// Vertical alignment.
    #[must_use]
    pub fn vertical_alignment(&self) -> VerticalAlignment {
        self.props.lock().valign
    }

    /// Replace the text; identical text posts nothing.
    pub fn set_text(&self, text: &str, queue: &mut EventQueue) {
        {
            let mut props = self.props.lock();
            if props.text == text {
                return;
            }
            props.text = text.to_owned();
        }
        self.request_repaint(queue);
    }

    /// Change the horizontal alignment; the current value posts nothing.
    pub fn set_horizontal_alignment(
        &self,
        alignment: HorizontalAlignment,
        queue: &mut EventQueue,
    ) {
        {
            let mut props = self.props.lock();
            if props.halign == alignment {
                return;
            }
            props.halign = alignment;
        }
        self.request_repaint(queue);
    }

    /// Change the vertical alignment; the current value posts nothing.
    pub fn set_vertical_alignment(&self, alignment: VerticalAlignment, queue: &mut EventQueue) {
        {
            let mut props = self.props.lock();
            if props.valign == alignment {
                return;
            }
            props.valign = alignment;
        }
        self.request_repaint(queue);
    }

    fn request_repaint(&self, queue: &mut EventQueue) {
        let area = self.area.map_or(BoxF::ZERO, |a| a.to_origin());
        queue.post(Event::Paint(PaintEvent::single(
            self.id,
            PaintRegion::local(area),
        )));
    }
}

impl LayoutItem for Label {
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
        self.size_hint
    }
}
