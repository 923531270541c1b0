//! End-to-end viewport scenarios: a container driving a [`ScrollArea`]
//! through the deferred event queue, checking pan clamping and repaint
//! cropping against the geometry the support widget ends up with.

use smallvec::smallvec;
use trellis_core::event::{Event, EventQueue, Frame, PaintEvent, PaintRegion};
use trellis_core::geometry::{BoxF, Sizef, Vec2};
use trellis_core::input::{MouseButton, MouseEvent};
use trellis_core::widget::{LayoutItem, WidgetId};
use trellis_widgets::ScrollArea;

#[derive(Debug)]
struct Document {
    id: WidgetId,
    area: Option<BoxF>,
    hint: Sizef,
}

impl Document {
    fn new(w: f32, h: f32) -> Self {
        Self {
            id: WidgetId::next(),
            area: None,
            hint: Sizef::new(w, h),
        }
    }
}

impl LayoutItem for Document {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn name(&self) -> &str {
        "document"
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

/// Drain the queue the way a container would: apply resizes to the
/// viewport's support, collect everything else.
fn drain_and_apply(scroll: &ScrollArea, queue: &mut EventQueue) -> Vec<Event> {
    let events: Vec<Event> = queue.drain().collect();
    for event in &events {
        if let Event::Resize(request) = event {
            scroll.apply_support_resize(request);
        }
    }
    events
}

/// A 50x50 viewport over a 200x100 document, first layout applied.
fn laid_out_viewport() -> (ScrollArea, WidgetId) {
    let mut scroll = ScrollArea::new("view");
    let document = Document::new(200.0, 100.0);
    let document_id = document.id();
    scroll.set_support(Some(Box::new(document)));

    let mut queue = EventQueue::new();
    scroll.update(BoxF::new(0.0, 0.0, 50.0, 50.0), &mut queue);
    drain_and_apply(&scroll, &mut queue);
    (scroll, document_id)
}

fn drag(dx: f32, dy: f32) -> MouseEvent {
    MouseEvent::at(Vec2::new(dx, dy))
        .with_buttons(MouseButton::Left.bit())
        .with_press_origin(MouseButton::Left, Vec2::ZERO)
        .with_motion(Vec2::new(dx, dy))
}

#[test]
fn a_gesture_pans_until_the_content_edge_then_stops() {
    let (scroll, _) = laid_out_viewport();
    let mut queue = EventQueue::new();
    scroll.mouse_press(&MouseEvent::button(MouseButton::Left, Vec2::ZERO));

    // The support starts top-left pinned: 150 of its 200 width are hidden
    // to the right, so panning left works 15 times in 10-unit steps.
    for _ in 0..15 {
        assert!(scroll.mouse_drag(&drag(-10.0, 0.0), &mut queue));
        drain_and_apply(&scroll, &mut queue);
    }
    let area = scroll.support_area().unwrap();
    assert!((area.x - (-75.0)).abs() < 1e-3, "content right edge reached");

    // One more step would reveal space right of the content: clamped.
    assert!(!scroll.mouse_drag(&drag(-10.0, 0.0), &mut queue));
    assert!(queue.is_empty());
    let area = scroll.support_area().unwrap();
    assert!((area.x - (-75.0)).abs() < 1e-3);
}

#[test]
fn each_pan_applies_exactly_the_incremental_motion() {
    let (scroll, document_id) = laid_out_viewport();
    let mut queue = EventQueue::new();
    scroll.mouse_press(&MouseEvent::button(MouseButton::Left, Vec2::ZERO));

    let before = scroll.support_area().unwrap();
    scroll.mouse_drag(&drag(-7.0, 3.0), &mut queue);
    let events = drain_and_apply(&scroll, &mut queue);

    let after = scroll.support_area().unwrap();
    assert!((after.x - (before.x - 7.0)).abs() < 1e-4);
    assert!((after.y - (before.y + 3.0)).abs() < 1e-4);

    let resize_count = events
        .iter()
        .filter(|e| matches!(e, Event::Resize(r) if r.target == document_id))
        .count();
    assert_eq!(resize_count, 1, "one deferred resize per pan step");
}

#[test]
fn visible_area_fractions_track_the_pan() {
    let (scroll, _) = laid_out_viewport();
    let mut queue = EventQueue::new();
    scroll.mouse_press(&MouseEvent::button(MouseButton::Left, Vec2::ZERO));

    scroll.mouse_drag(&drag(-20.0, 0.0), &mut queue);
    let events = drain_and_apply(&scroll, &mut queue);
    let visible = events
        .iter()
        .find_map(|e| match e {
            Event::VisibleArea(v) => Some(*v),
            _ => None,
        })
        .expect("a visible-area notification");

    // Support center moved from 75 to 55: the window looks at content
    // fraction -55/200; a quarter of the width and half of the height
    // are visible.
    assert!((visible.area.x - (-55.0 / 200.0)).abs() < 1e-4);
    assert!((visible.area.w - 0.25).abs() < 1e-4);
    assert!((visible.area.h - 0.5).abs() < 1e-4);
}

#[test]
fn support_paint_regions_are_cropped_to_the_window() {
    let (scroll, document_id) = laid_out_viewport();
    let mut queue = EventQueue::new();

    // A region straddling the window's right edge, one fully outside,
    // and one fully inside.
    let paint = PaintEvent {
        source: document_id,
        regions: smallvec![
            PaintRegion::local(BoxF::new(25.0, 0.0, 20.0, 10.0)),
            PaintRegion::local(BoxF::new(80.0, 0.0, 10.0, 10.0)),
            PaintRegion::local(BoxF::new(0.0, 0.0, 10.0, 10.0)),
        ],
    };
    assert!(scroll.filter_paint(&paint, &mut queue));

    let forwarded = queue
        .drain()
        .find_map(|e| match e {
            Event::Paint(p) => Some(p),
            _ => None,
        })
        .expect("a cropped paint event");
    assert_eq!(forwarded.regions.len(), 3);

    // Straddling: only the overlap with the 50x50 window survives.
    let straddling = forwarded.regions[0].area;
    assert!((straddling.right_bound() - 25.0).abs() < 1e-4);
    assert!((straddling.left_bound() - 15.0).abs() < 1e-4);

    // Fully outside: rewritten to an empty no-op region.
    assert!(!forwarded.regions[1].area.is_valid());

    // Fully inside: untouched.
    assert_eq!(forwarded.regions[2].area, BoxF::new(0.0, 0.0, 10.0, 10.0));
    assert_eq!(forwarded.regions[2].frame, Frame::Global);
}

#[test]
fn foreign_paint_events_pass_through_untouched() {
    let (scroll, _) = laid_out_viewport();
    let mut queue = EventQueue::new();

    let paint = PaintEvent::single(
        WidgetId::next(),
        PaintRegion::local(BoxF::new(500.0, 0.0, 10.0, 10.0)),
    );
    assert!(!scroll.filter_paint(&paint, &mut queue));
    assert!(queue.is_empty());
}

#[test]
fn resize_recenters_on_the_panned_content() {
    let (mut scroll, _) = laid_out_viewport();
    let mut queue = EventQueue::new();
    scroll.mouse_press(&MouseEvent::button(MouseButton::Left, Vec2::ZERO));
    scroll.mouse_drag(&drag(-30.0, 0.0), &mut queue);
    drain_and_apply(&scroll, &mut queue);
    let panned = scroll.support_area().unwrap();

    // Growing the window keeps the support center while it stays legal.
    scroll.update(BoxF::new(0.0, 0.0, 60.0, 60.0), &mut queue);
    drain_and_apply(&scroll, &mut queue);
    let area = scroll.support_area().unwrap();
    assert!((area.x - panned.x).abs() < 1e-4);
}

#[test]
fn global_regions_are_localized_before_cropping() {
    let (mut scroll, document_id) = laid_out_viewport();
    scroll.set_global_center(Vec2::new(100.0, 0.0));
    let mut queue = EventQueue::new();

    // In global coordinates the window spans x in [75, 125].
    let paint = PaintEvent::single(
        document_id,
        PaintRegion::global(BoxF::new(120.0, 0.0, 20.0, 10.0)),
    );
    assert!(scroll.filter_paint(&paint, &mut queue));

    let forwarded = queue
        .drain()
        .find_map(|e| match e {
            Event::Paint(p) => Some(p),
            _ => None,
        })
        .expect("a cropped paint event");

    // Local crop keeps x in [10, 25]; re-globalized that is [110, 125].
    let region = forwarded.regions[0].area;
    assert!((region.left_bound() - 110.0).abs() < 1e-4);
    assert!((region.right_bound() - 125.0).abs() < 1e-4);
}
