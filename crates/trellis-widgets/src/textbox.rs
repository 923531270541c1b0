#![forbid(unsafe_code)]

//! Single-line text entry.
//!
//! Only the editing model lives here: a text buffer, a cursor, and an
//! optional selection anchored where the selection started. Rendering the
//! three resulting runs (left of the selection, selected, right of it) is
//! the paint pipeline's business; this widget exposes the runs as strings
//! plus their display widths.
//!
//! Cursor and selection indices count grapheme clusters, not bytes, so
//! arrow keys never land inside a multi-byte sequence.

use std::fmt;
use trellis_core::event::{Event, EventQueue, PaintEvent, PaintRegion};
use trellis_core::geometry::{BoxF, Sizef};
use trellis_core::input::{FocusPolicy, Key, KeyEvent};
use trellis_core::lock::GeometryLock;
use trellis_core::widget::{LayoutItem, WidgetId};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Direction of a cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMotion {
    /// Toward the start of the text.
    Left,
    /// Toward the end of the text.
    Right,
}

#[derive(Debug)]
struct TextProps {
    text: String,
    /// Cursor position in grapheme clusters.
    cursor: usize,
    cursor_visible: bool,
    /// Grapheme index where the selection was started.
    selection_start: usize,
    selection_active: bool,
    text_changed: bool,
    cursor_changed: bool,
}

/// A single-line editable text field.
pub struct TextBox {
    id: WidgetId,
    name: String,
    area: Option<BoxF>,
    focus_policy: FocusPolicy,
    size_hint: Sizef,
    props: GeometryLock<TextProps>,
}

impl fmt::Debug for TextBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let props = self.props.lock();
        f.debug_struct("TextBox")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("text", &props.text)
            .field("cursor", &props.cursor)
            .finish()
    }
}

impl TextBox {
    /// Create a text box with initial content. Text boxes take click focus
    /// only; hovering must not steal the keyboard.
    #[must_use]
    pub fn new(name: &str, text: &str) -> Self {
        Self {
            id: WidgetId::next(),
            name: name.to_owned(),
            area: None,
            focus_policy: FocusPolicy::CLICK_FOCUS,
            size_hint: Sizef::ZERO,
            props: GeometryLock::new(TextProps {
                text: text.to_owned(),
                cursor: 0,
                cursor_visible: false,
                selection_start: 0,
                selection_active: false,
                text_changed: true,
                cursor_changed: false,
            }),
        }
    }

    /// Set the preferred size reported to layouts.
    #[must_use]
    pub fn with_size_hint(mut self, hint: Sizef) -> Self {
        self.size_hint = hint;
        self
    }

    /// How this widget accepts focus.
    #[must_use]
    pub const fn focus_policy(&self) -> FocusPolicy {
        self.focus_policy
    }

    /// Current content.
    #[must_use]
    pub fn text(&self) -> String {
        self.props.lock().text.clone()
    }

    /// Cursor position in grapheme clusters.
    #[must_use]
    pub fn cursor_index(&self) -> usize {
        self.props.lock().cursor
    }

    /// Whether the cursor is displayed.
    #[must_use]
    pub fn is_cursor_visible(&self) -> bool {
        self.props.lock().cursor_visible
    }

    /// Whether a selection is in progress.
    #[must_use]
    pub fn selection_started(&self) -> bool {
        self.props.lock().selection_active
    }

    /// The keyboard was grabbed: the user is about to edit, show the
    /// cursor.
    pub fn keyboard_grabbed(&self, queue: &mut EventQueue) {
        self.update_cursor_state(true, queue);
    }

    /// The keyboard was released: hide the cursor.
    pub fn keyboard_released(&self, queue: &mut EventQueue) {
        self.update_cursor_state(false, queue);
    }

    fn update_cursor_state(&self, visible: bool, queue: &mut EventQueue) {
        self.props.lock().cursor_visible = visible;
        self.request_repaint(queue);
    }

    /// Interpret a key event. Returns whether the key was consumed.
    ///
    /// Arrow keys move the cursor (Home/End and Ctrl fast-forward to the
    /// ends); Shift extends a selection; Backspace/Delete erase; printable
    /// characters insert at the cursor.
    pub fn handle_key(&self, event: &KeyEvent, queue: &mut EventQueue) -> bool {
        match event.key {
            Key::Left | Key::Right | Key::Home | Key::End => {
                {
                    let mut props = self.props.lock();
                    if event.shift() && !props.selection_active {
                        Self::start_selection_locked(&mut props);
                    } else if !event.shift() && props.selection_active {
                        Self::stop_selection_locked(&mut props);
                    }
                }
                let motion = match event.key {
                    Key::Left | Key::Home => CursorMotion::Left,
                    _ => CursorMotion::Right,
                };
                let fast_forward =
                    matches!(event.key, Key::Home | Key::End) || event.ctrl();
                self.update_cursor_position(motion, fast_forward, queue);
                true
            }
            Key::Backspace => {
                self.remove_char(true, queue);
                true
            }
            Key::Delete => {
                self.remove_char(false, queue);
                true
            }
            Key::Char(c) => {
                self.add_char(c, queue);
                true
            }
            _ => false,
        }
    }

    /// Move the cursor one step, or to the end of travel when
    /// fast-forwarding.
    pub fn update_cursor_position(
        &self,
        motion: CursorMotion,
        fast_forward: bool,
        queue: &mut EventQueue,
    ) {
        let mut props = self.props.lock();
        if props.text.is_empty() {
            Self::update_cursor_to(&mut props, 0);
        } else {
            let len = grapheme_len(&props.text);
            match motion {
                CursorMotion::Left => {
                    if fast_forward {
                        Self::update_cursor_to(&mut props, 0);
                    } else if props.cursor > 0 {
                        let target = props.cursor - 1;
                        Self::update_cursor_to(&mut props, target);
                    }
                }
                CursorMotion::Right => {
                    if fast_forward {
                        Self::update_cursor_to(&mut props, len);
                    } else if props.cursor < len {
                        let target = props.cursor + 1;
                        Self::update_cursor_to(&mut props, target);
                    }
                }
            }
        }
        let dirty = props.text_changed || props.cursor_changed;
        drop(props);
        if dirty {
            self.request_repaint(queue);
        }
    }

    /// Clamp-assign the cursor; flags changes so a repaint follows.
    fn update_cursor_to(props: &mut TextProps, position: usize) {
        let old = props.cursor;
        props.cursor = position.min(grapheme_len(&props.text));
        if old != props.cursor {
            props.text_changed = true;
            props.cursor_changed = true;
        }
    }

    /// Insert a character at the cursor.
    pub fn add_char(&self, c: char, queue: &mut EventQueue) {
        let mut props = self.props.lock();
        let at = byte_offset(&props.text, props.cursor);
        props.text.insert(at, c);
        // Keep the cursor on the same content, after the insertion; the
        // clamp covers characters that merged into an existing cluster.
        let target = (props.cursor + 1).min(grapheme_len(&props.text));
        props.cursor = target;
        props.text_changed = true;
        drop(props);
        self.request_repaint(queue);
    }

    /// Erase one grapheme: the one before the cursor (`backward`, the
    /// Backspace behavior) or the one under it (Delete). Returns whether
    /// anything was erased.
    pub fn remove_char(&self, backward: bool, queue: &mut EventQueue) -> bool {
        let mut props = self.props.lock();
        let len = grapheme_len(&props.text);
        let removed_at = if backward {
            if props.cursor == 0 {
                return false;
            }
            props.cursor - 1
        } else {
            if props.cursor >= len {
                return false;
            }
            props.cursor
        };

        let from = byte_offset(&props.text, removed_at);
        let to = byte_offset(&props.text, removed_at + 1);
        props.text.replace_range(from..to, "");
        if backward {
            props.cursor -= 1;
        }
        props.text_changed = true;
        drop(props);
        self.request_repaint(queue);
        true
    }

    /// Start a selection at the cursor.
    pub fn start_selection(&self) {
        Self::start_selection_locked(&mut self.props.lock());
    }

    fn start_selection_locked(props: &mut TextProps) {
        props.selection_active = true;
        props.selection_start = props.cursor;
    }

    /// End the selection. Stopping a selection that was never started is a
    /// consistency warning, not an error.
    pub fn stop_selection(&self) {
        Self::stop_selection_locked(&mut self.props.lock());
    }

    fn stop_selection_locked(props: &mut TextProps) {
        if !props.selection_active {
            tracing::warn!("stopping selection while none has been started");
            return;
        }
        props.selection_active = false;
        if props.selection_start != props.cursor {
            props.text_changed = true;
            props.cursor_changed = true;
        }
    }

    /// Whether a run of unselected text precedes the cursor/selection.
    #[must_use]
    pub fn has_left_text_part(&self) -> bool {
        let props = self.props.lock();
        Self::left_bound(&props) > 0
    }

    /// The run left of the cursor and of any selection.
    #[must_use]
    pub fn left_text(&self) -> String {
        let props = self.props.lock();
        slice(&props.text, 0, Self::left_bound(&props)).to_owned()
    }

    /// Whether a non-empty selected run exists.
    #[must_use]
    pub fn has_selected_text_part(&self) -> bool {
        let props = self.props.lock();
        props.selection_active && Self::left_bound(&props) != Self::right_bound(&props)
    }

    /// The selected run; empty without an active selection.
    #[must_use]
    pub fn selected_text(&self) -> String {
        let props = self.props.lock();
        if !props.selection_active {
            return String::new();
        }
        slice(&props.text, Self::left_bound(&props), Self::right_bound(&props)).to_owned()
    }

    /// Whether a run of unselected text follows the cursor/selection.
    #[must_use]
    pub fn has_right_text_part(&self) -> bool {
        let props = self.props.lock();
        Self::right_bound(&props) < grapheme_len(&props.text)
    }

    /// The run right of the cursor and of any selection.
    #[must_use]
    pub fn right_text(&self) -> String {
        let props = self.props.lock();
        let len = grapheme_len(&props.text);
        slice(&props.text, Self::right_bound(&props), len).to_owned()
    }

    /// Display width, in columns, of the text left of the cursor. The
    /// paint pipeline uses it to place the cursor glyph.
    #[must_use]
    pub fn columns_before_cursor(&self) -> usize {
        let props = self.props.lock();
        UnicodeWidthStr::width(slice(&props.text, 0, props.cursor))
    }

    fn left_bound(props: &TextProps) -> usize {
        if props.selection_active {
            props.cursor.min(props.selection_start)
        } else {
            props.cursor
        }
    }

    fn right_bound(props: &TextProps) -> usize {
        if props.selection_active {
            props.cursor.max(props.selection_start)
        } else {
            props.cursor
        }
    }

    /// Whether the text runs must be re-rendered; reading clears the flag.
    ///
    /// The paint pipeline polls this before rebuilding its textures.
    pub fn take_text_changed(&self) -> bool {
        std::mem::take(&mut self.props.lock().text_changed)
    }

    /// Whether the cursor glyph must be re-rendered; reading clears the
    /// flag.
    pub fn take_cursor_changed(&self) -> bool {
        std::mem::take(&mut self.props.lock().cursor_changed)
    }

    fn request_repaint(&self, queue: &mut EventQueue) {
        let area = self.area.map_or(BoxF::ZERO, |a| a.to_origin());
        queue.post(Event::Paint(PaintEvent::single(
            self.id,
            PaintRegion::local(area),
        )));
    }
}

impl LayoutItem for TextBox {
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

fn grapheme_len(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Byte offset of the grapheme at `index`; the text length past the end.
fn byte_offset(text: &str, index: usize) -> usize {
    text.grapheme_indices(true)
        .nth(index)
        .map_or(text.len(), |(offset, _)| offset)
}

fn slice(text: &str, from: usize, to: usize) -> &str {
    &text[byte_offset(text, from)..byte_offset(text, to)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use trellis_core::input::Modifiers;

    fn press(textbox: &TextBox, key: Key) {
        let mut queue = EventQueue::new();
        textbox.handle_key(&KeyEvent::new(key), &mut queue);
    }

    fn press_shift(textbox: &TextBox, key: Key) {
        let mut queue = EventQueue::new();
        textbox.handle_key(
            &KeyEvent::new(key).with_modifiers(Modifiers::SHIFT),
            &mut queue,
        );
    }

    #[test]
    fn cursor_moves_and_clamps() {
        let textbox = TextBox::new("field", "abc");
        press(&textbox, Key::Left);
        assert_eq!(textbox.cursor_index(), 0, "cannot move before the start");

        press(&textbox, Key::Right);
        press(&textbox, Key::Right);
        assert_eq!(textbox.cursor_index(), 2);

        press(&textbox, Key::End);
        assert_eq!(textbox.cursor_index(), 3);
        press(&textbox, Key::Right);
        assert_eq!(textbox.cursor_index(), 3, "cannot move past the end");

        press(&textbox, Key::Home);
        assert_eq!(textbox.cursor_index(), 0);
    }

    #[test]
    fn empty_text_keeps_the_cursor_at_zero() {
        let textbox = TextBox::new("field", "");
        press(&textbox, Key::End);
        assert_eq!(textbox.cursor_index(), 0);
    }

    #[test]
    fn typing_inserts_at_the_cursor() {
        let textbox = TextBox::new("field", "ac");
        press(&textbox, Key::Right);
        press(&textbox, Key::Char('b'));
        assert_eq!(textbox.text(), "abc");
        assert_eq!(textbox.cursor_index(), 2);
    }

    #[test]
    fn backspace_and_delete_erase_around_the_cursor() {
        let textbox = TextBox::new("field", "abc");
        press(&textbox, Key::Right);
        press(&textbox, Key::Backspace);
        assert_eq!(textbox.text(), "bc");
        assert_eq!(textbox.cursor_index(), 0);

        press(&textbox, Key::Delete);
        assert_eq!(textbox.text(), "c");

        let mut queue = EventQueue::new();
        assert!(!textbox.remove_char(true, &mut queue), "nothing to the left");
    }

    #[test]
    fn selection_splits_the_text_in_three() {
        let textbox = TextBox::new("field", "abcdef");
        press(&textbox, Key::Right);
        press(&textbox, Key::Right);
        press_shift(&textbox, Key::Right);
        press_shift(&textbox, Key::Right);

        assert!(textbox.selection_started());
        assert!(textbox.has_left_text_part());
        assert_eq!(textbox.left_text(), "ab");
        assert!(textbox.has_selected_text_part());
        assert_eq!(textbox.selected_text(), "cd");
        assert!(textbox.has_right_text_part());
        assert_eq!(textbox.right_text(), "ef");
    }

    #[test]
    fn backwards_selection_uses_the_same_bounds() {
        let textbox = TextBox::new("field", "abcd");
        press(&textbox, Key::End);
        press_shift(&textbox, Key::Left);
        press_shift(&textbox, Key::Left);

        assert_eq!(textbox.left_text(), "ab");
        assert_eq!(textbox.selected_text(), "cd");
        assert!(!textbox.has_right_text_part());
    }

    #[test]
    fn plain_motion_ends_the_selection() {
        let textbox = TextBox::new("field", "abc");
        press_shift(&textbox, Key::Right);
        assert!(textbox.selection_started());
        press(&textbox, Key::Left);
        assert!(!textbox.selection_started());
        assert_eq!(textbox.selected_text(), "");
    }

    #[test]
    fn stopping_without_a_selection_is_harmless() {
        let textbox = TextBox::new("field", "abc");
        textbox.stop_selection();
        assert!(!textbox.selection_started());
    }

    #[test]
    fn cursor_counts_grapheme_clusters() {
        // "e" followed by a combining acute accent is one cluster.
        let textbox = TextBox::new("field", "e\u{301}x");
        press(&textbox, Key::Right);
        assert_eq!(textbox.cursor_index(), 1);

        let mut queue = EventQueue::new();
        assert!(textbox.remove_char(true, &mut queue));
        assert_eq!(textbox.text(), "x", "the whole cluster goes at once");
    }

    #[test]
    fn column_width_accounts_for_wide_characters() {
        let textbox = TextBox::new("field", "漢a");
        press(&textbox, Key::Right);
        assert_eq!(textbox.columns_before_cursor(), 2);
        press(&textbox, Key::Right);
        assert_eq!(textbox.columns_before_cursor(), 3);
    }

    #[test]
    fn change_flags_clear_on_read() {
        let textbox = TextBox::new("field", "abc");
        assert!(textbox.take_text_changed(), "fresh content needs a render");
        assert!(!textbox.take_text_changed());

        press(&textbox, Key::Right);
        assert!(textbox.take_cursor_changed());
        assert!(!textbox.take_cursor_changed());
    }

    #[test]
    fn keyboard_grab_drives_cursor_visibility() {
        let textbox = TextBox::new("field", "abc");
        let mut queue = EventQueue::new();
        assert!(!textbox.is_cursor_visible());
        textbox.keyboard_grabbed(&mut queue);
        assert!(textbox.is_cursor_visible());
        textbox.keyboard_released(&mut queue);
        assert!(!textbox.is_cursor_visible());
        assert_eq!(queue.len(), 2, "each change requests a repaint");
    }

    proptest! {
        /// Whatever the motion/selection sequence, the three runs cover the
        /// text exactly once and the cursor stays in bounds.
        #[test]
        fn split_parts_always_reassemble(
            text in "[a-f]{0,8}",
            ops in prop::collection::vec((any::<bool>(), any::<bool>()), 0..12),
        ) {
            let textbox = TextBox::new("field", &text);
            let mut queue = EventQueue::new();
            for (right, shift) in ops {
                let key = if right { Key::Right } else { Key::Left };
                let modifiers = if shift {
                    Modifiers::SHIFT
                } else {
                    Modifiers::empty()
                };
                textbox.handle_key(
                    &KeyEvent::new(key).with_modifiers(modifiers),
                    &mut queue,
                );
            }

            prop_assert!(textbox.cursor_index() <= text.chars().count());
            let reassembled = format!(
                "{}{}{}",
                textbox.left_text(),
                textbox.selected_text(),
                textbox.right_text()
            );
            prop_assert_eq!(reassembled, text);
        }
    }
}
