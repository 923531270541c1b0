#![forbid(unsafe_code)]

//! Combo box.
//!
//! A combo box keeps a list of `{text, icon}` items, one of which may be
//! active, and toggles between two states: `Closed` (only the active item
//! is shown) and `Dropped` (the options are listed). Opening multiplies the
//! remembered closed box by the number of visible items and posts the
//! resize; closing restores the closed box. Where a new item lands is
//! decided by the configured [`InsertPolicy`].

use std::fmt;
use std::path::PathBuf;
use trellis_core::event::{Event, EventQueue, PaintEvent, PaintRegion, ResizeRequest};
use trellis_core::geometry::{BoxF, Sizef};
use trellis_core::lock::GeometryLock;
use trellis_core::widget::{LayoutItem, WidgetId};

/// Where a combo box inserts a new item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPolicy {
    /// No item can be inserted.
    NoInsert,
    /// Before the first element.
    AtTop,
    /// In place at the current element, which is replaced.
    AtCurrent,
    /// After the last element.
    AtBottom,
    /// After the current element.
    AfterCurrent,
    /// Before the current element.
    BeforeCurrent,
    /// At the alphabetical rank of the text.
    Alphabetically,
}

impl InsertPolicy {
    /// Human-readable policy name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoInsert => "no_insert",
            Self::AtTop => "insert_at_top",
            Self::AtCurrent => "insert_at_current",
            Self::AtBottom => "insert_at_bottom",
            Self::AfterCurrent => "insert_after_current",
            Self::BeforeCurrent => "insert_before_current",
            Self::Alphabetically => "insert_alphabetically",
        }
    }
}

impl fmt::Display for InsertPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of a combo box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboBoxItem {
    /// Displayed text.
    pub text: String,
    /// Optional icon path; the combo box owns the icon.
    pub icon: Option<PathBuf>,
}

/// Errors raised by combo box operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComboError {
    /// The insert policy forbids insertion.
    InsertNotAllowed(InsertPolicy),
    /// The index does not designate an item.
    NoSuchItem {
        /// Requested index.
        index: usize,
        /// Number of items.
        count: usize,
    },
}

impl fmt::Display for ComboError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsertNotAllowed(policy) => {
                write!(f, "policy {policy} does not allow insertion")
            }
            Self::NoSuchItem { index, count } => {
                write!(f, "no item {index} in a combo box of {count} item(s)")
            }
        }
    }
}

impl std::error::Error for ComboError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComboState {
    Closed,
    Dropped,
}

#[derive(Debug)]
struct ComboProps {
    state: ComboState,
    /// Geometry of the closed widget, remembered so the box can reopen and
    /// close without asking the layout.
    closed_box: Option<BoxF>,
    active: Option<usize>,
    items: Vec<ComboBoxItem>,
}

/// A drop-down list of selectable items.
pub struct ComboBox {
    id: WidgetId,
    name: String,
    area: Option<BoxF>,
    policy: InsertPolicy,
    max_visible_items: usize,
    props: GeometryLock<ComboProps>,
}

impl fmt::Debug for ComboBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let props = self.props.lock();
        f.debug_struct("ComboBox")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("policy", &self.policy)
            .field("items", &props.items.len())
            .field("active", &props.active)
            .finish()
    }
}

impl ComboBox {
    /// Create a combo box with an insert policy.
    #[must_use]
    pub fn new(name: &str, policy: InsertPolicy) -> Self {
        Self::with_max_visible(name, policy, 5)
    }

    /// Create a combo box limiting how many options are shown when open.
    #[must_use]
    pub fn with_max_visible(name: &str, policy: InsertPolicy, max_visible_items: usize) -> Self {
        Self {
            id: WidgetId::next(),
            name: name.to_owned(),
            area: None,
            policy,
            max_visible_items: max_visible_items.max(1),
            props: GeometryLock::new(ComboProps {
                state: ComboState::Closed,
                closed_box: None,
                active: None,
                items: Vec::new(),
            }),
        }
    }

    /// The configured insert policy.
    #[must_use]
    pub const fn policy(&self) -> InsertPolicy {
        self.policy
    }

    /// Number of items.
    #[must_use]
    pub fn items_count(&self) -> usize {
        self.props.lock().items.len()
    }

    /// Whether an item is active.
    #[must_use]
    pub fn has_active_item(&self) -> bool {
        self.props.lock().active.is_some()
    }

    /// Index of the active item.
    #[must_use]
    pub fn active_item(&self) -> Option<usize> {
        self.props.lock().active
    }

    /// Text of the item at an index.
    #[must_use]
    pub fn item_text(&self, index: usize) -> Option<String> {
        self.props.lock().items.get(index).map(|i| i.text.clone())
    }

    /// Whether the options are currently listed.
    #[must_use]
    pub fn is_dropped(&self) -> bool {
        self.props.lock().state == ComboState::Dropped
    }

    /// Whether only the active item is shown.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        !self.is_dropped()
    }

    /// Number of options shown when the box is open: at least one, at most
    /// the configured maximum.
    #[must_use]
    pub fn visible_items_count(&self) -> usize {
        self.props.lock().items.len().clamp(1, self.max_visible_items)
    }

    /// Insert an item where the policy dictates.
    ///
    /// The combo box takes ownership of the icon. Raises an error when the
    /// policy forbids insertion.
    pub fn insert_item(
        &self,
        text: &str,
        icon: Option<PathBuf>,
        queue: &mut EventQueue,
    ) -> Result<(), ComboError> {
        let mut props = self.props.lock();
        let (index, erase) = self.index_from_policy(&props, text)?;
        let item = ComboBoxItem {
            text: text.to_owned(),
            icon,
        };

        if erase && index >= 0 && (index as usize) < props.items.len() {
            // In-place policy: the current item gives way to the new one
            // and the active index keeps pointing at the slot.
            props.items[index as usize] = item;
        } else {
            Self::insert_at_locked(&mut props, index, item);
        }

        let repaint = Self::insertion_changed_display(&props);
        drop(props);
        if repaint {
            self.request_repaint(queue);
        }
        Ok(())
    }

    /// Insert an item at an explicit position, bypassing the policy.
    ///
    /// Out-of-range indices are clamped: negative inserts first, past the
    /// end inserts last.
    pub fn insert_item_at(
        &self,
        index: i64,
        text: &str,
        icon: Option<PathBuf>,
        queue: &mut EventQueue,
    ) {
        let mut props = self.props.lock();
        Self::insert_at_locked(
            &mut props,
            index,
            ComboBoxItem {
                text: text.to_owned(),
                icon,
            },
        );
        let repaint = Self::insertion_changed_display(&props);
        drop(props);
        if repaint {
            self.request_repaint(queue);
        }
    }

    fn insert_at_locked(props: &mut ComboProps, index: i64, item: ComboBoxItem) {
        let count = props.items.len();
        let position = if index < 0 {
            0
        } else {
            (index as usize).min(count)
        };
        props.items.insert(position, item);

        // An insertion at or before the active item shifts it up.
        if let Some(active) = props.active.as_mut()
            && *active >= position
        {
            *active += 1;
        }
    }

    /// The display only changes when the box was empty, or showed a single
    /// selected item.
    fn insertion_changed_display(props: &ComboProps) -> bool {
        props.items.len() == 1 || (props.items.len() == 2 && props.active.is_some())
    }

    /// Remove the item at an index.
    pub fn remove_item(&self, index: usize, queue: &mut EventQueue) -> Result<(), ComboError> {
        let mut props = self.props.lock();
        let count = props.items.len();
        if index >= count {
            return Err(ComboError::NoSuchItem { index, count });
        }

        props.items.remove(index);
        props.active = match props.active {
            Some(active) if active == index => {
                // Activate the item that took the slot, or the new last one.
                if props.items.is_empty() {
                    None
                } else {
                    Some(active.min(props.items.len() - 1))
                }
            }
            Some(active) if active > index => Some(active - 1),
            other => other,
        };
        drop(props);

        self.request_repaint(queue);
        Ok(())
    }

    /// Activate an item; activating the already active item does nothing.
    pub fn set_active_item(&self, index: usize, queue: &mut EventQueue) -> Result<(), ComboError> {
        let mut props = self.props.lock();
        let count = props.items.len();
        if index >= count {
            return Err(ComboError::NoSuchItem { index, count });
        }
        if props.active == Some(index) {
            return Ok(());
        }
        props.active = Some(index);
        drop(props);

        self.request_repaint(queue);
        Ok(())
    }

    /// Focus arrived: open the options.
    pub fn on_focus_gained(&self, queue: &mut EventQueue) {
        self.set_state(ComboState::Dropped, queue);
    }

    /// Focus left: fold back to the active item.
    pub fn on_focus_lost(&self, queue: &mut EventQueue) {
        self.set_state(ComboState::Closed, queue);
    }

    /// Switch state; a no-op when the state is already current, so no
    /// resize or repaint is generated.
    fn set_state(&self, state: ComboState, queue: &mut EventQueue) {
        let mut props = self.props.lock();
        if props.state == state {
            return;
        }
        props.state = state;

        let target = match state {
            ComboState::Dropped => props
                .closed_box
                .map(|closed| Self::dropped_box(closed, Self::visible_count(&props, self.max_visible_items))),
            ComboState::Closed => props.closed_box,
        };
        drop(props);

        if let Some(area) = target {
            queue.post(Event::Resize(ResizeRequest {
                target: self.id,
                area,
                previous: self.area,
            }));
        }
        self.request_repaint(queue);
    }

    fn visible_count(props: &ComboProps, max_visible: usize) -> usize {
        props.items.len().clamp(1, max_visible)
    }

    /// The open box keeps the closed width and grows downward by one
    /// closed-box height per visible item.
    fn dropped_box(closed: BoxF, visible: usize) -> BoxF {
        let n = visible as f32;
        BoxF::new(
            closed.x,
            closed.y - closed.h * (n - 1.0) / 2.0,
            closed.w,
            closed.h * n,
        )
    }

    /// Resolve the insertion slot for `text` from the policy.
    ///
    /// Returns the index and whether the item currently at that index gives
    /// way. The alphabetical rank scans the existing items and clamps to
    /// zero when it computes negative; boundary behavior is pinned down by
    /// tests rather than assumed.
    fn index_from_policy(
        &self,
        props: &ComboProps,
        text: &str,
    ) -> Result<(i64, bool), ComboError> {
        let mut alphabetical_rank = props.items.len() as i64;
        for (id, item) in props.items.iter().enumerate() {
            if item.text.as_str() < text {
                alphabetical_rank = id as i64 - 1;
            }
        }
        let alphabetical_rank = alphabetical_rank.max(0);

        let active = props.active.map_or(-1, |a| a as i64);
        let count = props.items.len() as i64;

        match self.policy {
            InsertPolicy::AtTop => Ok((0, false)),
            InsertPolicy::AtCurrent => Ok((active, true)),
            InsertPolicy::AtBottom => Ok((count, false)),
            InsertPolicy::AfterCurrent => Ok((active + 1, false)),
            InsertPolicy::BeforeCurrent => Ok((active, false)),
            InsertPolicy::Alphabetically => Ok((alphabetical_rank, false)),
            InsertPolicy::NoInsert => Err(ComboError::InsertNotAllowed(self.policy)),
        }
    }

    fn request_repaint(&self, queue: &mut EventQueue) {
        let area = self.area.map_or(BoxF::ZERO, |a| a.to_origin());
        queue.post(Event::Paint(PaintEvent::single(
            self.id,
            PaintRegion::local(area),
        )));
    }
}

impl LayoutItem for ComboBox {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn rendering_area(&self) -> Option<BoxF> {
        self.area
    }

    /// Also remembers the closed geometry so the box can reopen later.
    fn set_rendering_area(&mut self, area: BoxF) {
        self.area = Some(area);
        let mut props = self.props.lock();
        if props.state == ComboState::Closed {
            props.closed_box = Some(area);
        }
    }

    fn size_hint(&self) -> Sizef {
        self.props
            .lock()
            .closed_box
            .map_or(Sizef::ZERO, |b| b.to_size())
    }
}
