#![forbid(unsafe_code)]

//! Canonical input types.
//!
//! Raw input decoding is the job of the embedding application; widgets only
//! consume the types defined here. Mouse coordinates are global (window
//! frame) and the same y-up axis as [`crate::geometry`].

use crate::geometry::Vec2;
use bitflags::bitflags;

/// A single mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left button.
    Left,
    /// Middle button (wheel press).
    Middle,
    /// Right button.
    Right,
}

impl MouseButton {
    /// Bit corresponding to this button in a [`MouseButtons`] set.
    #[inline]
    pub const fn bit(self) -> MouseButtons {
        match self {
            MouseButton::Left => MouseButtons::LEFT,
            MouseButton::Middle => MouseButtons::MIDDLE,
            MouseButton::Right => MouseButtons::RIGHT,
        }
    }

    #[inline]
    const fn index(self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Middle => 1,
            MouseButton::Right => 2,
        }
    }
}

bitflags! {
    /// The set of mouse buttons held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MouseButtons: u8 {
        /// Left button held.
        const LEFT = 0b001;
        /// Middle button held.
        const MIDDLE = 0b010;
        /// Right button held.
        const RIGHT = 0b100;
    }
}

/// A mouse press, release, motion or drag event.
///
/// Drag events report the *incremental* motion since the previous event in
/// [`motion`](Self::motion), and the position at which each button was
/// pressed via [`press_origin`](Self::press_origin). Gesture handlers rely
/// on the incremental motion rather than the displacement since press: the
/// same press origin is reported for every drag event of a gesture while
/// the pointer keeps moving away from it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MouseEvent {
    /// Current pointer position (global frame).
    pub position: Vec2,
    /// Motion since the previous mouse event.
    pub motion: Vec2,
    /// Button that triggered a press/release event, if any.
    pub button: Option<MouseButton>,
    /// Buttons held at the time of the event.
    pub buttons: MouseButtons,
    origins: [Option<Vec2>; 3],
}

impl MouseEvent {
    /// Create a motion event at a position.
    #[must_use]
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Create a press/release event for a button.
    #[must_use]
    pub fn button(button: MouseButton, position: Vec2) -> Self {
        Self {
            position,
            button: Some(button),
            buttons: button.bit(),
            ..Self::default()
        }
        .with_press_origin(button, position)
    }

    /// Set the held-button set.
    #[must_use]
    pub fn with_buttons(mut self, buttons: MouseButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Set the incremental motion since the previous event.
    #[must_use]
    pub fn with_motion(mut self, motion: Vec2) -> Self {
        self.motion = motion;
        self
    }

    /// Record where a button was initially pressed.
    #[must_use]
    pub fn with_press_origin(mut self, button: MouseButton, position: Vec2) -> Self {
        self.origins[button.index()] = Some(position);
        self
    }

    /// Position at which the given button was pressed, if it is held.
    #[must_use]
    pub fn press_origin(&self, button: MouseButton) -> Option<Vec2> {
        self.origins[button.index()]
    }
}

/// Key codes relevant to the widgets in this toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home.
    Home,
    /// End.
    End,
    /// Backspace.
    Backspace,
    /// Delete.
    Delete,
    /// Enter/Return.
    Enter,
    /// Escape.
    Escape,
}

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Shift key.
        const SHIFT = 0b001;
        /// Control key.
        const CTRL = 0b010;
        /// Alt/Option key.
        const ALT = 0b100;
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub key: Key,
    /// Modifiers held during the event.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a key event with no modifiers.
    #[must_use]
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
        }
    }

    /// Attach modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if Shift is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Check if Ctrl is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }
}

bitflags! {
    /// Ways a widget accepts focus.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FocusPolicy: u8 {
        /// Focus on hover.
        const HOVER = 0b001;
        /// Focus on click.
        const CLICK = 0b010;
        /// Focus via keyboard traversal.
        const TAB = 0b100;
    }
}

impl FocusPolicy {
    /// Click-only focus, the policy used by text entry widgets.
    pub const CLICK_FOCUS: Self = Self::CLICK;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_bits_are_distinct() {
        let all = MouseButton::Left.bit() | MouseButton::Middle.bit() | MouseButton::Right.bit();
        assert_eq!(all, MouseButtons::all());
    }

    #[test]
    fn press_event_records_origin() {
        let e = MouseEvent::button(MouseButton::Left, Vec2::new(3.0, 4.0));
        assert_eq!(e.press_origin(MouseButton::Left), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(e.press_origin(MouseButton::Right), None);
        assert!(e.buttons.contains(MouseButtons::LEFT));
    }

    #[test]
    fn drag_event_carries_incremental_motion() {
        let e = MouseEvent::at(Vec2::new(10.0, 10.0))
            .with_buttons(MouseButtons::LEFT)
            .with_press_origin(MouseButton::Left, Vec2::new(0.0, 0.0))
            .with_motion(Vec2::new(2.0, -1.0));
        assert_eq!(e.motion, Vec2::new(2.0, -1.0));
        assert_eq!(e.press_origin(MouseButton::Left), Some(Vec2::ZERO));
    }

    #[test]
    fn key_event_modifiers() {
        let e = KeyEvent::new(Key::Left).with_modifiers(Modifiers::CTRL);
        assert!(e.ctrl());
        assert!(!e.shift());
    }
}
