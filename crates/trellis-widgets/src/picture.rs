#![forbid(unsafe_code)]

//! Image display widget.
//!
//! Holds the path of the image to draw and how to fit it; decoding and
//! blitting belong to the rendering engine. Setters detect no-op
//! assignments so repaints are only scheduled for real changes.

use std::fmt;
use std::path::{Path, PathBuf};
use trellis_core::event::{Event, EventQueue, PaintEvent, PaintRegion};
use trellis_core::geometry::{BoxF, Sizef};
use trellis_core::lock::GeometryLock;
use trellis_core::widget::{LayoutItem, WidgetId};

/// How an image fills the widget's area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PictureMode {
    /// Keep the native size, cut away whatever sticks out.
    Crop,
    /// Scale to the widget's area.
    #[default]
    Fit,
}

#[derive(Debug)]
struct PictureProps {
    path: Option<PathBuf>,
    mode: PictureMode,
}

/// A widget displaying a single image.
pub struct Picture {
    id: WidgetId,
    name: String,
    area: Option<BoxF>,
    size_hint: Sizef,
    props: GeometryLock<PictureProps>,
}

impl fmt::Debug for Picture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let props = self.props.lock();
        f.debug_struct("Picture")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("path", &props.path)
            .field("mode", &props.mode)
            .finish()
    }
}

impl Picture {
    /// Create an empty picture widget.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            id: WidgetId::next(),
            name: name.to_owned(),
            area: None,
            size_hint: Sizef::ZERO,
            props: GeometryLock::new(PictureProps {
                path: None,
                mode: PictureMode::default(),
            }),
        }
    }

    /// Set the preferred size reported to layouts.
    #[must_use]
    pub fn with_size_hint(mut self, hint: Sizef) -> Self {
        self.size_hint = hint;
        self
    }

    /// Path of the displayed image.
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        self.props.lock().path.clone()
    }

    /// Current display mode.
    #[must_use]
    pub fn mode(&self) -> PictureMode {
        self.props.lock().mode
    }

    /// Display the image at `path`; re-assigning the same path posts
    /// nothing.
    pub fn set_picture(&self, path: &Path, queue: &mut EventQueue) {
        {
            let mut props = self.props.lock();
            if props.path.as_deref() == Some(path) {
                return;
            }
            props.path = Some(path.to_owned());
        }
        self.request_repaint(queue);
    }

    /// Drop the displayed image.
    pub fn clear(&self, queue: &mut EventQueue) {
        {
            let mut props = self.props.lock();
            if props.path.is_none() {
                return;
            }
            props.path = None;
        }
        self.request_repaint(queue);
    }

    /// Change how the image fills the area; the current mode posts
    /// nothing.
    pub fn set_mode(&self, mode: PictureMode, queue: &mut EventQueue) {
        {
            let mut props = self.props.lock();
            if props.mode == mode {
                return;
            }
            props.mode = mode;
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

impl LayoutItem for Picture {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_detect_noops() {
        let picture = Picture::new("logo");
        let mut queue = EventQueue::new();

        picture.clear(&mut queue);
        assert!(queue.is_empty(), "clearing an empty picture posts nothing");

        picture.set_picture(Path::new("logo.png"), &mut queue);
        assert_eq!(queue.len(), 1);
        picture.set_picture(Path::new("logo.png"), &mut queue);
        assert_eq!(queue.len(), 1, "same path posts nothing");

        picture.set_mode(PictureMode::Fit, &mut queue);
        assert_eq!(queue.len(), 1, "default mode re-assigned posts nothing");
        picture.set_mode(PictureMode::Crop, &mut queue);
        assert_eq!(queue.len(), 2);

        picture.clear(&mut queue);
        assert_eq!(queue.len(), 3);
        assert_eq!(picture.path(), None);
    }
}
