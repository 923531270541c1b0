#![forbid(unsafe_code)]

//! Core primitives for the trellis widget toolkit.
//!
//! This crate carries everything the layout and widget crates share:
//!
//! - [`geometry`] - center-based float boxes (y-up), points and sizes
//! - [`input`] - canonical mouse/keyboard/focus types
//! - [`event`] - deferred resize/paint/notification queue
//! - [`widget`] - widget identity and the [`widget::LayoutItem`] surface
//! - [`lock`] - the scoped geometry lock shared by all widgets

pub mod event;
pub mod geometry;
pub mod input;
pub mod lock;
pub mod widget;

pub use event::{Event, EventQueue, Frame, PaintEvent, PaintRegion, ResizeRequest, VisibleArea};
pub use geometry::{BoxF, Sizef, Vec2};
pub use input::{FocusPolicy, Key, KeyEvent, Modifiers, MouseButton, MouseButtons, MouseEvent};
pub use lock::GeometryLock;
pub use widget::{LayoutItem, WidgetId, apply_resize};
