#![forbid(unsafe_code)]

//! Layout strategies and the shared space allocator.
//!
//! This crate turns declarative constraints (minimum sizes, stretch
//! weights, margins, logical ordering) into concrete pixel geometry:
//!
//! - [`allocator`] - fair distribution of a pixel budget across slots
//! - [`LinearLayout`] - one axis, logical order decoupled from storage order
//! - [`GridLayout`] - 2D cells with spans and per-line minimum/stretch
//! - [`SelectorLayout`] - exactly one visible child at a time
//!
//! Strategies never own widgets; they track [`WidgetId`]s plus per-item
//! geometry metadata, and produce target rectangles the container turns
//! into deferred resize requests.

pub mod allocator;
pub mod grid;
pub mod linear;
pub mod registry;
pub mod selector;

pub use allocator::{Distribution, SlotSpec, allocate_evenly, distribute};
pub use grid::{CellLocation, GridError, GridLayout, LineInfo};
pub use linear::LinearLayout;
pub use registry::ItemRegistry;
pub use selector::SelectorLayout;

use std::fmt;
use trellis_core::event::{Event, EventQueue, ResizeRequest};
use trellis_core::geometry::{BoxF, Sizef};
use trellis_core::widget::WidgetId;

/// The axis a linear layout arranges its items along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Left to right.
    #[default]
    Horizontal,
    /// Top to bottom.
    Vertical,
}

/// Per-item size negotiation input for a layout pass.
///
/// `min` is the smallest box the item can be shrunk to; `stretch` is the
/// relative priority for receiving surplus space beyond the minimums.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeHint {
    /// Minimum acceptable size.
    pub min: Sizef,
    /// Stretch weight (0 = never receives surplus unless every weight is 0).
    pub stretch: f32,
}

impl SizeHint {
    /// No minimum, no stretch.
    pub const ZERO: Self = Self {
        min: Sizef::ZERO,
        stretch: 0.0,
    };

    /// Create a hint.
    #[must_use]
    pub const fn new(min: Sizef, stretch: f32) -> Self {
        Self { min, stretch }
    }

    /// A hint that only stretches.
    #[must_use]
    pub const fn stretching(stretch: f32) -> Self {
        Self {
            min: Sizef::ZERO,
            stretch,
        }
    }
}

/// Contract violations raised synchronously to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// The item is already registered with this strategy.
    DuplicateItem(WidgetId),
    /// The item is not registered with this strategy.
    UnknownItem(WidgetId),
    /// No child carries the requested name.
    UnknownName(String),
    /// An index does not designate an existing slot.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of valid slots.
        count: usize,
    },
    /// A layout pass received a hint slice of the wrong length.
    HintCountMismatch {
        /// Registered item count.
        expected: usize,
        /// Hints provided.
        actual: usize,
    },
    /// An even split across zero slots was requested.
    ZeroSlots,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateItem(id) => write!(f, "item {id} is already registered"),
            Self::UnknownItem(id) => write!(f, "item {id} is not registered"),
            Self::UnknownName(name) => write!(f, "no child named {name:?}"),
            Self::IndexOutOfRange { index, count } => {
                write!(f, "index {index} out of range for {count} item(s)")
            }
            Self::HintCountMismatch { expected, actual } => {
                write!(f, "expected {expected} size hint(s), got {actual}")
            }
            Self::ZeroSlots => write!(f, "cannot split an extent across zero slots"),
        }
    }
}

impl std::error::Error for LayoutError {}

/// The layout capability a container selects at construction time.
///
/// A tagged variant rather than a trait object: the set of strategies is
/// closed and the container frequently needs the strategy-specific surface
/// (grid line setters, linear logical insertion), reached through the
/// `as_*` accessors.
#[derive(Debug)]
pub enum LayoutStrategy {
    /// Items along one axis.
    Linear(LinearLayout),
    /// Items on a 2D cell grid.
    Grid(GridLayout),
    /// One visible item at a time.
    Selector(SelectorLayout),
}

impl LayoutStrategy {
    /// Number of registered items.
    #[must_use]
    pub fn items_count(&self) -> usize {
        match self {
            Self::Linear(l) => l.items_count(),
            Self::Grid(g) => g.items_count(),
            Self::Selector(s) => s.items_count(),
        }
    }

    /// Registered items in physical order.
    #[must_use]
    pub fn items(&self) -> &[WidgetId] {
        match self {
            Self::Linear(l) => l.items(),
            Self::Grid(g) => g.items(),
            Self::Selector(s) => s.items(),
        }
    }

    /// Remove an item, returning its former physical index.
    pub fn remove_item(&mut self, item: WidgetId) -> Result<usize, LayoutError> {
        match self {
            Self::Linear(l) => l.remove_item(item),
            Self::Grid(g) => g.remove_item(item),
            Self::Selector(s) => s.remove_item(item),
        }
    }

    /// Compute every child's target rectangle for the given window.
    ///
    /// `hints` is indexed by physical index; the result is too.
    pub fn layout(&self, window: &BoxF, hints: &[SizeHint]) -> Result<Vec<BoxF>, LayoutError> {
        match self {
            Self::Linear(l) => l.layout(window, hints),
            Self::Grid(g) => g.layout(window, hints),
            Self::Selector(s) => s.layout(window, hints),
        }
    }

    /// Access the linear strategy, if that is what this is.
    #[must_use]
    pub fn as_linear(&self) -> Option<&LinearLayout> {
        match self {
            Self::Linear(l) => Some(l),
            _ => None,
        }
    }

    /// Mutable access to the linear strategy.
    #[must_use]
    pub fn as_linear_mut(&mut self) -> Option<&mut LinearLayout> {
        match self {
            Self::Linear(l) => Some(l),
            _ => None,
        }
    }

    /// Access the grid strategy, if that is what this is.
    #[must_use]
    pub fn as_grid(&self) -> Option<&GridLayout> {
        match self {
            Self::Grid(g) => Some(g),
            _ => None,
        }
    }

    /// Mutable access to the grid strategy.
    #[must_use]
    pub fn as_grid_mut(&mut self) -> Option<&mut GridLayout> {
        match self {
            Self::Grid(g) => Some(g),
            _ => None,
        }
    }

    /// Access the selector strategy, if that is what this is.
    #[must_use]
    pub fn as_selector(&self) -> Option<&SelectorLayout> {
        match self {
            Self::Selector(s) => Some(s),
            _ => None,
        }
    }

    /// Mutable access to the selector strategy.
    #[must_use]
    pub fn as_selector_mut(&mut self) -> Option<&mut SelectorLayout> {
        match self {
            Self::Selector(s) => Some(s),
            _ => None,
        }
    }
}

/// Run a layout pass and post one deferred resize request per item.
///
/// This is the container's resize path: nothing is applied in place, the
/// requests are drained and applied later in posting order, so the layout
/// pass can never recurse into itself through a child resize.
pub fn post_layout(
    strategy: &LayoutStrategy,
    window: &BoxF,
    hints: &[SizeHint],
    queue: &mut EventQueue,
) -> Result<(), LayoutError> {
    let boxes = strategy.layout(window, hints)?;
    for (physical, area) in boxes.into_iter().enumerate() {
        let Some(target) = strategy.items().get(physical).copied() else {
            continue;
        };
        queue.post(Event::Resize(ResizeRequest {
            target,
            area,
            previous: None,
        }));
    }
    Ok(())
}
