#![forbid(unsafe_code)]

//! Widgets for the trellis toolkit.
//!
//! Each module carries one widget:
//!
//! - [`scrollable`] - viewport onto an oversized content widget
//! - [`button`] - push and toggle buttons
//! - [`combobox`] - drop-down item list with insert policies
//! - [`label`] / [`picture`] - presentational text and images
//! - [`selector`] - shows one child at a time
//! - [`textbox`] - single-line text editing model
//!
//! Widgets keep their mutable state behind the scoped geometry lock from
//! `trellis-core` and communicate exclusively through the deferred event
//! queue; nothing here mutates another widget in place.

pub mod button;
pub mod combobox;
pub mod label;
pub mod picture;
pub mod scrollable;
pub mod selector;
pub mod textbox;

pub use button::{Button, ButtonKind};
pub use combobox::{ComboBox, ComboBoxItem, ComboError, InsertPolicy};
pub use label::{HorizontalAlignment, Label, VerticalAlignment};
pub use picture::{Picture, PictureMode};
pub use scrollable::ScrollArea;
pub use selector::Selector;
pub use textbox::{CursorMotion, TextBox};
