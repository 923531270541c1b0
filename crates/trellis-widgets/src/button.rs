#![forbid(unsafe_code)]

//! Push and toggle buttons.
//!
//! The button proper is presentational; the interesting part is the state
//! machine. A click is a press followed by a release inside the button; a
//! press that ends with the pointer dragged elsewhere (a drop event) resets
//! the button without completing a click. Toggle buttons latch on a
//! completed click and announce the new state on the event queue;
//! programmatic toggling stays silent because the caller already knows.

use std::fmt;
use trellis_core::event::{Event, EventQueue, PaintEvent, PaintRegion};
use trellis_core::geometry::{BoxF, Sizef};
use trellis_core::input::{MouseButton, MouseEvent};
use trellis_core::lock::GeometryLock;
use trellis_core::widget::{LayoutItem, WidgetId};

/// Behavior of a button when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    /// Fires on every click.
    Push,
    /// Latches until clicked again.
    Toggle,
}

/// Visual/logical state of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ButtonState {
    Released,
    Pressed,
    Toggled,
}

#[derive(Debug)]
struct ButtonProps {
    state: ButtonState,
    /// State to restore when a press is abandoned.
    toggled_before_press: bool,
}

/// A clickable button.
pub struct Button {
    id: WidgetId,
    name: String,
    area: Option<BoxF>,
    kind: ButtonKind,
    click_button: MouseButton,
    size_hint: Sizef,
    props: GeometryLock<ButtonProps>,
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("state", &self.props.lock().state)
            .finish()
    }
}

impl Button {
    /// Create a button.
    #[must_use]
    pub fn new(name: &str, kind: ButtonKind) -> Self {
        Self {
            id: WidgetId::next(),
            name: name.to_owned(),
            area: None,
            kind,
            click_button: MouseButton::Left,
            size_hint: Sizef::ZERO,
            props: GeometryLock::new(ButtonProps {
                state: ButtonState::Released,
                toggled_before_press: false,
            }),
        }
    }

    /// Set the preferred size reported to layouts.
    #[must_use]
    pub fn with_size_hint(mut self, hint: Sizef) -> Self {
        self.size_hint = hint;
        self
    }

    /// The click behavior of this button.
    #[must_use]
    pub const fn kind(&self) -> ButtonKind {
        self.kind
    }

    /// Whether the button is currently latched.
    ///
    /// Push buttons never report `true`.
    #[must_use]
    pub fn toggled(&self) -> bool {
        self.props.lock().state == ButtonState::Toggled
    }

    /// Whether the button is currently held down.
    #[must_use]
    pub fn pressed(&self) -> bool {
        self.props.lock().state == ButtonState::Pressed
    }

    /// Press with the click button: sink the button.
    pub fn mouse_press(&self, event: &MouseEvent, queue: &mut EventQueue) -> bool {
        if event.button != Some(self.click_button) {
            return false;
        }

        let mut props = self.props.lock();
        props.toggled_before_press = props.state == ButtonState::Toggled;
        props.state = ButtonState::Pressed;
        drop(props);

        self.request_repaint(queue);
        true
    }

    /// Release inside the button: complete the click.
    ///
    /// A toggle button flips its latched state and announces it on the
    /// queue; a push button simply returns to released.
    pub fn mouse_release(&self, event: &MouseEvent, queue: &mut EventQueue) -> bool {
        if event.button != Some(self.click_button) {
            return false;
        }

        let mut props = self.props.lock();
        if props.state != ButtonState::Pressed {
            return false;
        }

        let toggled_on = match self.kind {
            ButtonKind::Push => {
                props.state = ButtonState::Released;
                None
            }
            ButtonKind::Toggle => {
                if props.toggled_before_press {
                    props.state = ButtonState::Released;
                    Some(false)
                } else {
                    props.state = ButtonState::Toggled;
                    Some(true)
                }
            }
        };
        drop(props);

        if let Some(on) = toggled_on {
            queue.post(Event::Toggled {
                source: self.id,
                on,
            });
        }
        self.request_repaint(queue);
        true
    }

    /// The pointer was dragged away and dropped elsewhere: abandon the
    /// press without completing a click.
    pub fn mouse_drop(&self, queue: &mut EventQueue) -> bool {
        let mut props = self.props.lock();
        if props.state != ButtonState::Pressed {
            return false;
        }
        props.state = if props.toggled_before_press {
            ButtonState::Toggled
        } else {
            ButtonState::Released
        };
        drop(props);

        self.request_repaint(queue);
        true
    }

    /// Programmatically force the latched state.
    ///
    /// Does nothing on push buttons; never announces on the queue, the
    /// caller initiated the change and listeners are assumed aware.
    pub fn toggle(&self, toggled: bool, queue: &mut EventQueue) {
        if self.kind != ButtonKind::Toggle {
            return;
        }

        let mut props = self.props.lock();
        let target = if toggled {
            ButtonState::Toggled
        } else {
            ButtonState::Released
        };
        if props.state == target {
            return;
        }
        props.state = target;
        drop(props);

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

impl LayoutItem for Button {
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
