#![forbid(unsafe_code)]

//! Scrollable viewport.
//!
//! A [`ScrollArea`] shows a window onto a single "support" widget that is
//! usually larger than the window itself. It owns three pieces of math:
//!
//! - on resize, the support's rendering area is recomputed so the same
//!   content stays under the window, clamped so the window never wanders
//!   outside the support's preferred-size bounding box;
//! - a drag with the scroll button pans the support, one axis at a time,
//!   clamped at the content's edges; every pan emits a normalized
//!   visible-area notification;
//! - paint regions emitted by the support are cropped to the window before
//!   being forwarded, so nothing outside the visible rectangle is ever
//!   repainted.
//!
//! All geometry changes leave through the event queue as deferred requests;
//! nothing is applied while a layout pass or gesture handler is running.

use std::fmt;
use trellis_core::event::{Event, EventQueue, Frame, PaintEvent, PaintRegion, ResizeRequest};
use trellis_core::geometry::{BoxF, Sizef, Vec2};
use trellis_core::input::{FocusPolicy, MouseButton, MouseEvent};
use trellis_core::lock::GeometryLock;
use trellis_core::widget::{LayoutItem, WidgetId};

/// State shared with the paint path.
#[derive(Default)]
struct ScrollState {
    /// The content widget, if one is bound.
    support: Option<Box<dyn LayoutItem + Send>>,
    /// Drag-follow anchor in local coordinates; lives for one gesture.
    coords_to_follow: Option<Vec2>,
}

impl fmt::Debug for ScrollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollState")
            .field("support", &self.support.as_ref().map(|s| s.id()))
            .field("coords_to_follow", &self.coords_to_follow)
            .finish()
    }
}

/// A viewport onto an oversized content widget.
pub struct ScrollArea {
    id: WidgetId,
    name: String,
    /// Own rendering area; the position is always the container's origin.
    area: Option<BoxF>,
    /// Center of this widget in the global frame, maintained by the
    /// container.
    global_center: Vec2,
    scroll_button: MouseButton,
    focus_policy: FocusPolicy,
    props: GeometryLock<ScrollState>,
}

impl fmt::Debug for ScrollArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollArea")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("area", &self.area)
            .field("scroll_button", &self.scroll_button)
            .finish()
    }
}

impl ScrollArea {
    /// Create a viewport. It is deliberately not hover-sensitive.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            id: WidgetId::next(),
            name: name.to_owned(),
            area: None,
            global_center: Vec2::ZERO,
            scroll_button: MouseButton::Left,
            focus_policy: FocusPolicy::empty(),
            props: GeometryLock::new(ScrollState::default()),
        }
    }

    /// Button that starts a pan gesture.
    #[must_use]
    pub const fn scroll_button(&self) -> MouseButton {
        self.scroll_button
    }

    /// Change the pan button.
    pub fn set_scroll_button(&mut self, button: MouseButton) {
        self.scroll_button = button;
    }

    /// How this widget accepts focus.
    #[must_use]
    pub const fn focus_policy(&self) -> FocusPolicy {
        self.focus_policy
    }

    /// Record this widget's center in the global frame.
    pub fn set_global_center(&mut self, center: Vec2) {
        self.global_center = center;
    }

    /// Bind a new support widget, returning the previous one so the caller
    /// can dispose of it. At most one support is bound at a time.
    pub fn set_support(
        &self,
        widget: Option<Box<dyn LayoutItem + Send>>,
    ) -> Option<Box<dyn LayoutItem + Send>> {
        let mut state = self.props.lock();
        let previous = state.support.take();
        if let Some(widget) = widget {
            tracing::debug!(viewport = %self.id, support = %widget.id(), "support bound");
            state.support = Some(widget);
        }
        previous
    }

    /// Whether a support widget is bound.
    #[must_use]
    pub fn has_support(&self) -> bool {
        self.props.lock().support.is_some()
    }

    /// Identity of the bound support widget.
    #[must_use]
    pub fn support_id(&self) -> Option<WidgetId> {
        self.props.lock().support.as_ref().map(|s| s.id())
    }

    /// Rendering area currently applied to the support widget.
    #[must_use]
    pub fn support_area(&self) -> Option<BoxF> {
        self.props
            .lock()
            .support
            .as_ref()
            .and_then(|s| s.rendering_area())
    }

    /// Apply a drained resize request to the bound support widget.
    ///
    /// Returns `false` when no support is bound or the request targets
    /// another widget.
    pub fn apply_support_resize(&self, request: &ResizeRequest) -> bool {
        let mut state = self.props.lock();
        match state.support.as_mut() {
            Some(support) if support.id() == request.target => {
                support.set_rendering_area(request.area);
                true
            }
            _ => false,
        }
    }

    /// Resize entry point: assign the new window and recompute the
    /// support's rendering area, posting the resize request.
    pub fn update(&mut self, window: BoxF, queue: &mut EventQueue) {
        self.area = Some(window);

        let state = self.props.lock();
        let Some(support) = state.support.as_ref() else {
            return;
        };

        let target = Self::resized_support_area(&window, support.as_ref());
        queue.post(Event::Resize(ResizeRequest {
            target: support.id(),
            area: target,
            previous: support.rendering_area(),
        }));
    }

    /// Compute the support's rendering area for a new window.
    ///
    /// The target keeps the support's preferred size and its current center
    /// when one exists; on first layout the support's top-left corner is
    /// mapped into the window instead. The center is then clamped inside
    /// the support's preferred-size bounding box, left and top bounds
    /// first, so an undersized support ends up pinned to the top-left
    /// corner rather than centered with negative margins.
    fn resized_support_area(window: &BoxF, support: &dyn LayoutItem) -> BoxF {
        let old = support.rendering_area();
        let hint = support.size_hint();

        let center = match old {
            Some(area) if area.is_valid() => area.center(),
            _ => Vec2::new(
                -window.w / 2.0 + hint.w / 2.0,
                window.h / 2.0 - hint.h / 2.0,
            ),
        };

        let mut expected = BoxF::from_center(center, window.to_size());
        let bounds = BoxF::from_size(hint);

        if expected.left_bound() < bounds.left_bound() {
            expected.x += bounds.left_bound() - expected.left_bound();
        }
        if expected.right_bound() > bounds.right_bound() {
            expected.x -= expected.right_bound() - bounds.right_bound();
        }
        if expected.top_bound() > bounds.top_bound() {
            expected.y -= expected.top_bound() - bounds.top_bound();
        }
        if expected.bottom_bound() < bounds.bottom_bound() {
            expected.y += bounds.bottom_bound() - expected.bottom_bound();
        }

        BoxF::from_center(expected.center(), hint)
    }

    /// Press with the scroll button: record the drag-follow anchor.
    ///
    /// Returns whether the press was consumed as the start of a pan.
    pub fn mouse_press(&self, event: &MouseEvent) -> bool {
        if event.button != Some(self.scroll_button) {
            return false;
        }

        let local = self.map_from_global(event.position);
        let mut state = self.props.lock();
        // One anchor per press; a drag reuses it until the drop.
        state.coords_to_follow = Some(local);
        true
    }

    /// Drag with the scroll button held: pan the support.
    ///
    /// A drag that did not originate inside this widget's bounds is left to
    /// default handling. Returns whether the support actually moved.
    pub fn mouse_drag(&self, event: &MouseEvent, queue: &mut EventQueue) -> bool {
        if !event.buttons.contains(self.scroll_button.bit()) {
            return false;
        }
        let Some(origin) = event.press_origin(self.scroll_button) else {
            return false;
        };
        let Some(own) = self.area else {
            return false;
        };

        let local_area = own.to_origin();
        let drag_start = self.map_from_global(origin);
        if !local_area.contains_point(drag_start) {
            return false;
        }

        let mut state = self.props.lock();
        let anchor = *state.coords_to_follow.get_or_insert(drag_start);
        let local_end = self.map_from_global(event.position);

        let moved =
            self.handle_content_scrolling(&mut state, anchor, local_end, event.motion, queue);
        if moved {
            // The pan changed what this widget shows; repaint it whole.
            queue.post(Event::Paint(PaintEvent::single(
                self.id,
                PaintRegion::local(local_area),
            )));
        }
        moved
    }

    /// Drop of the scroll button: the gesture is over, clear the anchor.
    pub fn mouse_drop(&self, event: &MouseEvent) -> bool {
        if event.button != Some(self.scroll_button) {
            return false;
        }
        self.props.lock().coords_to_follow = None;
        true
    }

    /// Translate the support by the incremental motion of a drag event.
    ///
    /// The anchor and pointer positions identify the gesture but the
    /// translation uses `motion` only: drag events keep reporting the same
    /// anchor while the pointer moves further away, so applying the total
    /// displacement on every event would compound. Each axis moves only if
    /// the resulting window bound stays within the support's half-extents.
    fn handle_content_scrolling(
        &self,
        state: &mut ScrollState,
        _anchor: Vec2,
        _pointer: Vec2,
        motion: Vec2,
        queue: &mut EventQueue,
    ) -> bool {
        let Some(support) = state.support.as_ref() else {
            return false;
        };
        let Some(mut area) = support.rendering_area() else {
            return false;
        };
        let Some(own) = self.area else {
            return false;
        };

        let support_dims = area.to_size();
        let viewport = BoxF::from_center(area.center(), own.to_size());
        let max = support.size_hint();

        let mut updated = false;
        if motion.x < 0.0 && viewport.left_bound() + motion.x >= -max.w / 2.0 {
            area.x += motion.x;
            updated = true;
        }
        if motion.x > 0.0 && viewport.right_bound() + motion.x <= max.w / 2.0 {
            area.x += motion.x;
            updated = true;
        }
        if motion.y < 0.0 && viewport.bottom_bound() + motion.y >= -max.h / 2.0 {
            area.y += motion.y;
            updated = true;
        }
        if motion.y > 0.0 && viewport.top_bound() + motion.y <= max.h / 2.0 {
            area.y += motion.y;
            updated = true;
        }

        if !updated {
            return false;
        }

        queue.post(Event::Resize(ResizeRequest {
            target: support.id(),
            area,
            previous: support.rendering_area(),
        }));

        // Listeners want the area visible *of the support*, not how far the
        // support moved under this widget, hence the sign flip on the
        // center; extents are fractions of the full content size.
        let visible = BoxF::new(
            -area.x / support_dims.w,
            -area.y / support_dims.h,
            viewport.w / support_dims.w,
            viewport.h / support_dims.h,
        );
        tracing::debug!(
            viewport = %self.id,
            visible = ?visible,
            support_w = support_dims.w,
            support_h = support_dims.h,
            "visible area changed"
        );
        queue.post(Event::VisibleArea(trellis_core::event::VisibleArea {
            source: self.id,
            area: visible,
        }));

        true
    }

    /// Intercept a paint event emitted by the support widget.
    ///
    /// Every region is brought into the local frame, cropped to this
    /// widget's rectangle when it sticks out, re-globalized and re-emitted.
    /// Returns `false` (posting nothing) for paint events this widget is
    /// not responsible for.
    pub fn filter_paint(&self, event: &PaintEvent, queue: &mut EventQueue) -> bool {
        let state = self.props.lock();
        let Some(support) = state.support.as_ref() else {
            return false;
        };
        if event.source != support.id() {
            return false;
        }
        let Some(own) = self.area else {
            return false;
        };

        let this_area = own.to_origin();
        let mut cropped = PaintEvent {
            source: self.id,
            regions: Default::default(),
        };
        for region in &event.regions {
            let mut local = match region.frame {
                Frame::Local => region.area,
                Frame::Global => self.map_box_from_global(region.area),
            };
            if !this_area.contains_box(&local) {
                local = this_area.intersect(&local);
            }
            cropped
                .regions
                .push(PaintRegion::global(self.map_box_to_global(local)));
        }

        queue.post(Event::Paint(cropped));
        true
    }

    /// Global point into the local frame.
    #[must_use]
    pub fn map_from_global(&self, point: Vec2) -> Vec2 {
        point - self.global_center
    }

    /// Local point into the global frame.
    #[must_use]
    pub fn map_to_global(&self, point: Vec2) -> Vec2 {
        point + self.global_center
    }

    fn map_box_from_global(&self, area: BoxF) -> BoxF {
        area.translate(-self.global_center)
    }

    fn map_box_to_global(&self, area: BoxF) -> BoxF {
        area.translate(self.global_center)
    }
}

impl LayoutItem for ScrollArea {
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
        // The viewport itself is content-agnostic; it prefers whatever the
        // support prefers and degrades to nothing without one.
        self.props
            .lock()
            .support
            .as_ref()
            .map(|s| s.size_hint())
            .unwrap_or(Sizef::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Canvas {
        id: WidgetId,
        area: Option<BoxF>,
        hint: Sizef,
    }

    impl Canvas {
        fn new(w: f32, h: f32) -> Self {
            Self {
                id: WidgetId::next(),
                area: None,
                hint: Sizef::new(w, h),
            }
        }
    }

    impl LayoutItem for Canvas {
        fn id(&self) -> WidgetId {
            self.id
        }

        fn name(&self) -> &str {
            "canvas"
        }

        fn rendering_area(&self) -> Option<BoxF> {
            self.area
        }

        fn set_rendering_area(&mut self, area: BoxF) {
            self.area = Some(area);
        }

        fn size_hint(&self) -> Sizef {
            self.hint
        }
    }

    /// Build a 50x50 viewport over a 200x100 support, first layout applied.
    fn viewport_over_canvas() -> (ScrollArea, WidgetId, EventQueue) {
        let mut scroll = ScrollArea::new("view");
        let canvas = Canvas::new(200.0, 100.0);
        let canvas_id = canvas.id();
        scroll.set_support(Some(Box::new(canvas)));

        let mut queue = EventQueue::new();
        scroll.update(BoxF::new(0.0, 0.0, 50.0, 50.0), &mut queue);
        for event in queue.drain().collect::<Vec<_>>() {
            if let Event::Resize(request) = event {
                assert!(scroll.apply_support_resize(&request));
            }
        }
        (scroll, canvas_id, EventQueue::new())
    }

    #[test]
    fn update_without_support_posts_nothing() {
        let mut scroll = ScrollArea::new("view");
        let mut queue = EventQueue::new();
        scroll.update(BoxF::new(0.0, 0.0, 50.0, 50.0), &mut queue);
        assert!(queue.is_empty());
    }

    #[test]
    fn first_layout_shows_the_top_left_corner() {
        let (scroll, _, _) = viewport_over_canvas();
        let area = scroll.support_area().unwrap();
        // Support left bound meets the window's, top bound meets the top.
        assert!((area.left_bound() - (-25.0)).abs() < 1e-4);
        assert!((area.top_bound() - 25.0).abs() < 1e-4);
        assert_eq!(area.to_size(), Sizef::new(200.0, 100.0));
    }

    #[test]
    fn undersized_support_is_pinned_to_the_top_left() {
        let mut scroll = ScrollArea::new("view");
        scroll.set_support(Some(Box::new(Canvas::new(10.0, 10.0))));
        let mut queue = EventQueue::new();
        scroll.update(BoxF::new(0.0, 0.0, 50.0, 50.0), &mut queue);

        let Some(Event::Resize(request)) = queue.drain().next() else {
            panic!("expected a resize request");
        };
        assert!((request.area.left_bound() - (-25.0)).abs() < 1e-4);
        assert!((request.area.top_bound() - 25.0).abs() < 1e-4);
    }

    #[test]
    fn pan_within_bounds_moves_by_exactly_the_delta() {
        let (scroll, canvas_id, mut queue) = viewport_over_canvas();
        let before = scroll.support_area().unwrap();

        let press = MouseEvent::button(MouseButton::Left, Vec2::new(0.0, 0.0));
        assert!(scroll.mouse_press(&press));

        let drag = MouseEvent::at(Vec2::new(-10.0, 0.0))
            .with_buttons(MouseButton::Left.bit())
            .with_press_origin(MouseButton::Left, Vec2::new(0.0, 0.0))
            .with_motion(Vec2::new(-10.0, 0.0));
        assert!(scroll.mouse_drag(&drag, &mut queue));

        let resize = queue
            .drain()
            .find_map(|e| match e {
                Event::Resize(r) if r.target == canvas_id => Some(r),
                _ => None,
            })
            .expect("a support resize");
        assert!((resize.area.x - (before.x - 10.0)).abs() < 1e-4);
        assert!((resize.area.y - before.y).abs() < 1e-4);
    }

    #[test]
    fn pan_past_the_content_edge_leaves_the_axis_unchanged() {
        let (scroll, _, mut queue) = viewport_over_canvas();

        let press = MouseEvent::button(MouseButton::Left, Vec2::new(0.0, 0.0));
        scroll.mouse_press(&press);

        // First layout pins the top-left corner; panning further toward it
        // must not move either axis.
        let drag = MouseEvent::at(Vec2::new(10.0, -10.0))
            .with_buttons(MouseButton::Left.bit())
            .with_press_origin(MouseButton::Left, Vec2::new(0.0, 0.0))
            .with_motion(Vec2::new(10.0, -10.0));
        assert!(!scroll.mouse_drag(&drag, &mut queue));
        assert!(queue.is_empty());
    }

    #[test]
    fn drag_starting_outside_the_viewport_is_ignored() {
        let (scroll, _, mut queue) = viewport_over_canvas();

        let drag = MouseEvent::at(Vec2::new(0.0, 0.0))
            .with_buttons(MouseButton::Left.bit())
            .with_press_origin(MouseButton::Left, Vec2::new(500.0, 0.0))
            .with_motion(Vec2::new(-10.0, 0.0));
        assert!(!scroll.mouse_drag(&drag, &mut queue));
        assert!(queue.is_empty());
    }

    #[test]
    fn pan_emits_a_normalized_visible_area() {
        let (scroll, _, mut queue) = viewport_over_canvas();

        scroll.mouse_press(&MouseEvent::button(MouseButton::Left, Vec2::ZERO));
        let drag = MouseEvent::at(Vec2::new(-10.0, 0.0))
            .with_buttons(MouseButton::Left.bit())
            .with_press_origin(MouseButton::Left, Vec2::ZERO)
            .with_motion(Vec2::new(-10.0, 0.0));
        assert!(scroll.mouse_drag(&drag, &mut queue));

        let visible = queue
            .drain()
            .find_map(|e| match e {
                Event::VisibleArea(v) => Some(v),
                _ => None,
            })
            .expect("a visible-area notification");

        // 50/200 of the width and 50/100 of the height are visible.
        assert!((visible.area.w - 0.25).abs() < 1e-4);
        assert!((visible.area.h - 0.5).abs() < 1e-4);
        // Support center was 75 before the pan, 65 after: fraction -65/200.
        assert!((visible.area.x - (-65.0 / 200.0)).abs() < 1e-4);
    }

    #[test]
    fn drop_clears_the_anchor() {
        let (scroll, _, _) = viewport_over_canvas();
        scroll.mouse_press(&MouseEvent::button(MouseButton::Left, Vec2::ZERO));
        assert!(scroll.mouse_drop(&MouseEvent::button(MouseButton::Left, Vec2::ZERO)));
        assert!(scroll.props.lock().coords_to_follow.is_none());
    }

    #[test]
    fn replacing_the_support_returns_the_previous_one() {
        let scroll = ScrollArea::new("view");
        let first = Canvas::new(10.0, 10.0);
        let first_id = first.id();
        assert!(scroll.set_support(Some(Box::new(first))).is_none());

        let second = Canvas::new(20.0, 20.0);
        let second_id = second.id();
        let previous = scroll.set_support(Some(Box::new(second)));
        assert_eq!(previous.map(|w| w.id()), Some(first_id));
        assert_eq!(scroll.support_id(), Some(second_id));

        let previous = scroll.set_support(None);
        assert_eq!(previous.map(|w| w.id()), Some(second_id));
        assert!(!scroll.has_support());
    }
}
