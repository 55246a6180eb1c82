//! TagsField - the tokenizing input container.
//!
//! Owns the ordered tags (one [`TagChip`] per tag, same order), the free-text
//! buffer being typed, and the layout that wraps chips plus the caret into
//! lines.
//!
//! # Focus
//!
//! ```text
//!            begin_editing / tap            backspace on empty buffer
//! Unfocused ───────────────────▶ Typing ─────────────────────────────▶ ChipSelected(last)
//!     ▲                           ▲  │ delimiter / trigger:                │
//!     │ end_editing               │  │ accept buffer as tag                │ backspace: remove chip
//!     └───────────────────────────┤  ◀───────────────────────────────────── │ typing: resume buffer
//!                                 └──────────────────────────────────────────┘
//! ```
//!
//! Tapping a chip selects it from any state. The buffer only holds text while
//! no chip is selected.
//!
//! # Layout
//!
//! Mutations only mark the layout dirty. The next call to [`TagsField::layout`]
//! (the renderer makes one per frame) recomputes it and emits
//! `HeightChanged` if the height moved. Layout is a pure function of the
//! current state, so repeated passes give the same geometry and stay silent.
//!
//! # Example
//!
//! ```
//! use spark_tags::TagsField;
//!
//! let mut field = TagsField::new();
//! field.set_width(40);
//! field.configure(|cfg| cfg.delimiter = ",".into());
//! field.set_should_accept(|text| text != "OMG");
//!
//! field.begin_editing();
//! field.insert_text("rust,");
//! field.insert_text("OMG,");
//!
//! assert_eq!(field.tags().len(), 1);
//! assert_eq!(field.text(), "OMG");
//! ```

pub mod config;
pub mod events;
pub mod layout;

use std::fmt;
use std::time::Instant;

use spark_signals::{signal, Signal};

use crate::chip::{ChipRequest, TagChip};
use crate::image::{ChipId, Image, ImageLoadError, ImageLoader, ImageTicket};
use crate::input::{InputEvent, KeyboardEvent};
use crate::layout::text_measure::{pop_grapheme, string_width};
use crate::tag::Tag;
use crate::types::{Point, Size};

pub use config::{AcceptTrigger, TagsFieldConfig};
pub use events::{EventHandler, ListenerId, TagsFieldEvent};
pub use layout::{FieldLayout, Hit};

use events::Listeners;

// =============================================================================
// FOCUS STATE
// =============================================================================

/// Which surface holds keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusState {
    #[default]
    Unfocused,
    /// The caret is active; keystrokes edit the buffer.
    Typing,
    /// The chip at this index is selected and receives keystrokes.
    ChipSelected(usize),
}

type AcceptPredicate = Box<dyn FnMut(&str) -> bool>;
type WillAddHook = Box<dyn FnMut(&mut TagChip)>;

fn style_chip(config: &TagsFieldConfig, chip: &mut TagChip) {
    chip.set_style(config.chip_style());
    chip.set_display_delimiter(config.displayed_delimiter());
    chip.set_image_hidden(!config.show_images);
    if let Some(size) = config.image_size {
        chip.set_image_size(size);
    }
}

/// Push only the settings that changed between `old` and `new`, so
/// per-chip decoration from the will-add hook survives unrelated updates.
fn restyle_chip(old: &TagsFieldConfig, new: &TagsFieldConfig, chip: &mut TagChip) {
    let (was, style) = (old.chip_style(), new.chip_style());
    if (was.tint_color, was.text_color, was.selected_color, was.selected_text_color)
        != (style.tint_color, style.text_color, style.selected_color, style.selected_text_color)
    {
        chip.set_colors(&style);
    }
    if was.font != style.font {
        chip.set_font(style.font);
    }
    if was.margins != style.margins {
        chip.set_margins(style.margins);
    }
    if was.image_margin != style.image_margin {
        chip.set_image_margin(style.image_margin);
    }
    if old.displayed_delimiter() != new.displayed_delimiter() {
        chip.set_display_delimiter(new.displayed_delimiter());
    }
    if old.show_images != new.show_images {
        chip.set_image_hidden(!new.show_images);
    }
    if old.image_size != new.image_size {
        match new.image_size {
            Some(size) => chip.set_image_size(size),
            None => chip.reset_image_size(),
        }
    }
}

fn loader_mut(loader: &mut Option<Box<dyn ImageLoader>>) -> Option<&mut dyn ImageLoader> {
    match loader {
        Some(loader) => {
            let loader: &mut dyn ImageLoader = loader.as_mut();
            Some(loader)
        }
        None => None,
    }
}

// =============================================================================
// TAGS FIELD
// =============================================================================

pub struct TagsField {
    config: TagsFieldConfig,
    tags: Vec<Tag>,
    chips: Vec<TagChip>,
    text: String,
    focus: FocusState,
    width: u16,

    layout: FieldLayout,
    dirty: bool,
    reported_height: u16,

    next_chip_id: u64,
    listeners: Listeners,
    should_accept: Option<AcceptPredicate>,
    will_add: Option<WillAddHook>,
    image_loader: Option<Box<dyn ImageLoader>>,

    text_signal: Signal<String>,
    height_signal: Signal<u16>,
}

impl Default for TagsField {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TagsField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagsField")
            .field("tags", &self.tags)
            .field("text", &self.text)
            .field("focus", &self.focus)
            .field("width", &self.width)
            .field("dirty", &self.dirty)
            .field("reported_height", &self.reported_height)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl TagsField {
    pub fn new() -> Self {
        Self::with_config(TagsFieldConfig::default())
    }

    pub fn with_config(config: TagsFieldConfig) -> Self {
        Self {
            config,
            tags: Vec::new(),
            chips: Vec::new(),
            text: String::new(),
            focus: FocusState::Unfocused,
            width: 0,
            layout: FieldLayout::default(),
            dirty: true,
            reported_height: 0,
            next_chip_id: 0,
            listeners: Listeners::default(),
            should_accept: None,
            will_add: None,
            image_loader: None,
            text_signal: signal(String::new()),
            height_signal: signal(0),
        }
    }

    // =========================================================================
    // Read access
    // =========================================================================

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn chips(&self) -> &[TagChip] {
        &self.chips
    }

    pub fn chip(&self, index: usize) -> Option<&TagChip> {
        self.chips.get(index)
    }

    /// Mutable chip access for host decoration. Marks the layout dirty.
    ///
    /// Selection stays with the field:
    ///
    /// ```compile_fail
    /// # use std::time::Instant;
    /// # use spark_tags::TagsField;
    /// let mut field = TagsField::new();
    /// field.add_tags(["a", "b"]);
    /// field.chip_mut(1).unwrap().set_selected(true, Instant::now());
    /// ```
    pub fn chip_mut(&mut self, index: usize) -> Option<&mut TagChip> {
        self.dirty = true;
        self.chips.get_mut(index)
    }

    /// The buffer: text typed but not yet accepted.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn focus(&self) -> FocusState {
        self.focus
    }

    pub fn selected_index(&self) -> Option<usize> {
        match self.focus {
            FocusState::ChipSelected(i) => Some(i),
            _ => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.focus != FocusState::Unfocused
    }

    pub fn is_read_only(&self) -> bool {
        self.config.read_only
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// Whether the placeholder is drawn in place of the buffer.
    pub fn is_placeholder_visible(&self) -> bool {
        !self.config.read_only
            && self.text.is_empty()
            && !self.config.placeholder.is_empty()
            && (self.tags.is_empty() || self.config.placeholder_always_visible)
    }

    /// Whether any chip is mid-transition at `now`.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.chips.iter().any(|chip| chip.is_animating(now))
    }

    /// Reactive mirror of the buffer.
    pub fn text_signal(&self) -> Signal<String> {
        self.text_signal.clone()
    }

    /// Reactive mirror of the last reported height.
    pub fn height_signal(&self) -> Signal<u16> {
        self.height_signal.clone()
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn config(&self) -> &TagsFieldConfig {
        &self.config
    }

    /// Change the configuration and mark the layout dirty.
    ///
    /// Chips only receive the settings that actually changed.
    pub fn configure(&mut self, update: impl FnOnce(&mut TagsFieldConfig)) {
        let old = self.config.clone();
        update(&mut self.config);

        for chip in &mut self.chips {
            restyle_chip(&old, &self.config, chip);
        }

        if self.config.read_only && !old.read_only {
            self.resign_focus();
        }
        self.dirty = true;
    }

    pub fn set_width(&mut self, width: u16) {
        if self.width != width {
            self.width = width;
            self.dirty = true;
        }
    }

    // =========================================================================
    // Hooks & listeners
    // =========================================================================

    /// Register a listener for every [`TagsFieldEvent`].
    pub fn subscribe(&mut self, handler: impl FnMut(&TagsFieldEvent) + 'static) -> ListenerId {
        self.listeners.add(Box::new(handler))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Gate every new tag on its text.
    pub fn set_should_accept(&mut self, predicate: impl FnMut(&str) -> bool + 'static) {
        self.should_accept = Some(Box::new(predicate));
    }

    pub fn clear_should_accept(&mut self) {
        self.should_accept = None;
    }

    /// Decorate each chip before it is inserted (image size, image, ...).
    pub fn set_on_will_add_chip(&mut self, hook: impl FnMut(&mut TagChip) + 'static) {
        self.will_add = Some(Box::new(hook));
    }

    /// Install the image loader. Chips whose reference was assigned before
    /// any loader existed are requested now.
    pub fn set_image_loader(&mut self, loader: impl ImageLoader + 'static) {
        let mut loader: Box<dyn ImageLoader> = Box::new(loader);
        for chip in &mut self.chips {
            chip.request_missing_image(loader.as_mut());
        }
        self.image_loader = Some(loader);
    }

    fn emit(&mut self, event: TagsFieldEvent) {
        self.listeners.emit(&event);
    }

    // =========================================================================
    // Images
    // =========================================================================

    /// Point the chip at `index` to a new image reference.
    ///
    /// Cancels its outstanding request, if any, and asks the loader for the
    /// new one. A late answer for the old reference is then ignored.
    pub fn set_chip_image_ref(&mut self, index: usize, reference: Option<String>) -> bool {
        let Some(chip) = self.chips.get_mut(index) else {
            return false;
        };
        chip.assign_image_ref(reference, loader_mut(&mut self.image_loader));
        self.dirty = true;
        true
    }

    /// Deliver a loader answer. Returns true when a chip's image changed.
    pub fn resolve_image(&mut self, ticket: ImageTicket, result: Result<Image, ImageLoadError>) -> bool {
        match self.chips.iter_mut().find(|c| c.id() == ticket.chip) {
            Some(chip) => chip.resolve_image(ticket, result),
            None => {
                log::debug!("{}: image result for a removed chip", ticket.chip);
                false
            }
        }
    }

    // =========================================================================
    // Tags
    // =========================================================================

    pub fn add_tag(&mut self, text: impl Into<String>) -> bool {
        self.insert_tag(Tag::new(text))
    }

    pub fn add_tag_with(&mut self, tag: Tag) -> bool {
        self.insert_tag(tag)
    }

    /// Add several tags. Returns how many were accepted.
    pub fn add_tags<T: Into<Tag>>(&mut self, tags: impl IntoIterator<Item = T>) -> usize {
        tags.into_iter()
            .map(|tag| self.insert_tag(tag.into()))
            .filter(|added| *added)
            .count()
    }

    fn insert_tag(&mut self, tag: Tag) -> bool {
        if self.config.read_only {
            return false;
        }
        if tag.text().trim().is_empty() {
            return false;
        }
        if self.config.reject_duplicates && self.tags.contains(&tag) {
            log::debug!("tag {:?} rejected: duplicate", tag.text());
            return false;
        }
        if let Some(predicate) = self.should_accept.as_mut() {
            if !predicate(tag.text()) {
                log::debug!("tag {:?} rejected by should-accept", tag.text());
                return false;
            }
        }

        let id = ChipId(self.next_chip_id);
        self.next_chip_id += 1;

        let mut chip = TagChip::new(id, tag.clone());
        style_chip(&self.config, &mut chip);
        if let Some(hook) = self.will_add.as_mut() {
            hook(&mut chip);
        }
        if let Some(reference) = tag.image_ref() {
            if chip.image_slot().reference().is_none() {
                chip.assign_image_ref(Some(reference.to_string()), loader_mut(&mut self.image_loader));
            }
        }

        let index = self.tags.len();
        self.tags.push(tag.clone());
        self.chips.push(chip);
        self.dirty = true;

        log::debug!("tag {:?} added at {}", tag.text(), index);
        self.emit(TagsFieldEvent::TagAdded { tag, index });
        true
    }

    /// Remove the first tag equal to `tag`.
    pub fn remove_tag(&mut self, tag: &Tag) -> bool {
        match self.tags.iter().position(|t| t == tag) {
            Some(index) => self.remove_tag_at(index).is_some(),
            None => false,
        }
    }

    /// Remove the first tag with this text.
    pub fn remove_tag_text(&mut self, text: &str) -> bool {
        match self.tags.iter().position(|t| t.text() == text) {
            Some(index) => self.remove_tag_at(index).is_some(),
            None => false,
        }
    }

    pub fn remove_tag_at(&mut self, index: usize) -> Option<Tag> {
        if self.config.read_only || index >= self.tags.len() {
            return None;
        }

        match self.focus {
            FocusState::ChipSelected(selected) if selected == index => {
                self.focus = FocusState::Typing;
            }
            FocusState::ChipSelected(selected) if selected > index => {
                self.focus = FocusState::ChipSelected(selected - 1);
            }
            _ => {}
        }

        let mut chip = self.chips.remove(index);
        chip.cancel_image(loader_mut(&mut self.image_loader));
        let tag = self.tags.remove(index);
        self.dirty = true;

        log::debug!("tag {:?} removed from {}", tag.text(), index);
        self.emit(TagsFieldEvent::TagRemoved {
            tag: tag.clone(),
            index,
        });
        Some(tag)
    }

    /// Remove every tag, last first. Returns how many were removed.
    pub fn remove_all_tags(&mut self) -> usize {
        if self.config.read_only {
            return 0;
        }
        let count = self.tags.len();
        for index in (0..count).rev() {
            self.remove_tag_at(index);
        }
        count
    }

    // =========================================================================
    // Buffer
    // =========================================================================

    /// Run `change` and report a buffer change if it produced one.
    fn edit_text<R>(&mut self, change: impl FnOnce(&mut Self) -> R) -> R {
        let before = self.text.clone();
        let result = change(self);
        if self.text != before {
            self.dirty = true;
            self.text_signal.set(self.text.clone());
            let text = self.text.clone();
            self.emit(TagsFieldEvent::TextChanged(text));
        }
        result
    }

    /// Replace the buffer. Deselects any chip first.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        if self.config.read_only {
            return false;
        }
        let text = text.into();
        if self.selected_index().is_some() {
            self.focus_input();
        }
        self.edit_text(|field| field.text = text);
        true
    }

    /// Try to turn the buffer into a tag. Keeps the buffer on rejection.
    fn tokenize(&mut self) -> bool {
        let candidate = self.text.trim().to_string();
        if candidate.is_empty() {
            return false;
        }
        if self.insert_tag(Tag::new(candidate)) {
            self.text.clear();
            true
        } else {
            false
        }
    }

    /// Explicit accept action: the buffer becomes a tag if it can.
    pub fn accept_input(&mut self) -> bool {
        if self.config.read_only {
            return false;
        }
        self.edit_text(|field| field.tokenize())
    }

    /// Feed typed text into the buffer, honoring delimiter and triggers.
    fn type_text(&mut self, text: &str) {
        self.edit_text(|field| {
            for c in text.chars() {
                let trigger = AcceptTrigger::for_char(c);
                if let Some(trigger) = trigger {
                    if field.config.accept_triggers.contains(trigger) {
                        field.tokenize();
                        continue;
                    }
                }

                field.text.push(c);

                let delimiter_len = field.config.delimiter.len();
                if delimiter_len > 0 && field.text.ends_with(field.config.delimiter.as_str()) {
                    let keep = field.text.len() - delimiter_len;
                    field.text.truncate(keep);
                    field.tokenize();
                } else if trigger == Some(AcceptTrigger::RETURN) {
                    // A disabled return never lands in the buffer.
                    field.text.pop();
                }
            }
        });
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Focus the caret. Returns false in read-only mode.
    pub fn begin_editing(&mut self) -> bool {
        if self.config.read_only {
            return false;
        }
        self.focus_input();
        true
    }

    /// Drop focus entirely. The buffer is kept.
    pub fn end_editing(&mut self) {
        self.resign_focus();
    }

    fn resign_focus(&mut self) {
        if self.focus == FocusState::Unfocused {
            return;
        }
        self.deselect(Instant::now());
        self.focus = FocusState::Unfocused;
        self.dirty = true;
        self.emit(TagsFieldEvent::EndedEditing);
    }

    /// Move focus to the caret, deselecting any chip.
    fn focus_input(&mut self) {
        let was_unfocused = self.focus == FocusState::Unfocused;
        self.deselect(Instant::now());
        self.focus = FocusState::Typing;
        self.dirty = true;
        if was_unfocused {
            self.emit(TagsFieldEvent::BeganEditing);
        }
    }

    /// Deselect the selected chip, if any. Leaves `focus` for the caller to set.
    fn deselect(&mut self, now: Instant) -> Option<usize> {
        let FocusState::ChipSelected(index) = self.focus else {
            return None;
        };
        let chip = &mut self.chips[index];
        chip.set_selected(false, now);
        let id = chip.id();
        log::debug!("{} unselected", id);
        self.emit(TagsFieldEvent::TagUnselected { chip: id, index });
        Some(index)
    }

    /// Select the chip at `index`. No-op when it already is selected.
    pub fn select_chip(&mut self, index: usize) -> bool {
        if self.config.read_only || index >= self.chips.len() {
            return false;
        }
        if self.chips[index].is_selected() {
            return false;
        }

        // The buffer can't survive while a chip holds focus.
        if !self.text.is_empty() {
            self.edit_text(|field| {
                if !field.tokenize() {
                    field.text.clear();
                }
            });
        }

        let was_unfocused = self.focus == FocusState::Unfocused;
        let now = Instant::now();
        self.deselect(now);

        let chip = &mut self.chips[index];
        chip.set_selected(true, now);
        let id = chip.id();
        self.focus = FocusState::ChipSelected(index);
        self.dirty = true;

        if was_unfocused {
            self.emit(TagsFieldEvent::BeganEditing);
        }
        log::debug!("{} selected", id);
        self.emit(TagsFieldEvent::TagSelected { chip: id, index });
        true
    }

    /// Deselect the selected chip and go back to typing.
    pub fn unselect_chip(&mut self) -> bool {
        if self.selected_index().is_none() {
            return false;
        }
        self.focus_input();
        true
    }

    fn handle_chip_request(&mut self, index: usize, request: ChipRequest) -> bool {
        match request {
            ChipRequest::Select => self.select_chip(index),
            ChipRequest::InputText(text) => {
                self.focus_input();
                self.type_text(&text);
                true
            }
            ChipRequest::Delete { replacement } => {
                self.focus_input();
                let removed = self.remove_tag_at(index).is_some();
                if let Some(replacement) = replacement.filter(|r| !r.is_empty()) {
                    self.edit_text(|field| field.text = replacement);
                }
                removed
            }
        }
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    /// Text typed at whatever holds focus.
    pub fn insert_text(&mut self, text: &str) -> bool {
        if self.config.read_only || text.is_empty() {
            return false;
        }
        match self.focus {
            FocusState::Unfocused => false,
            FocusState::Typing => {
                self.type_text(text);
                true
            }
            FocusState::ChipSelected(index) => {
                let request = self.chips[index].insert_text(text);
                self.handle_chip_request(index, request)
            }
        }
    }

    /// Backspace at whatever holds focus.
    ///
    /// With an empty buffer the first backspace selects the last chip; the
    /// second one removes it.
    pub fn delete_backward(&mut self) -> bool {
        if self.config.read_only {
            return false;
        }
        match self.focus {
            FocusState::Unfocused => false,
            FocusState::Typing if !self.text.is_empty() => {
                self.edit_text(|field| pop_grapheme(&mut field.text))
            }
            FocusState::Typing => match self.chips.len() {
                0 => false,
                len => self.select_chip(len - 1),
            },
            FocusState::ChipSelected(index) => {
                let request = self.chips[index].delete_backward();
                self.handle_chip_request(index, request)
            }
        }
    }

    /// Enter: accept when `RETURN` is a trigger, then tell the host.
    pub fn press_return(&mut self) -> bool {
        if self.config.read_only || self.focus == FocusState::Unfocused {
            return false;
        }
        if self.focus == FocusState::Typing && self.config.accept_triggers.contains(AcceptTrigger::RETURN) {
            self.edit_text(|field| field.tokenize());
        }
        self.emit(TagsFieldEvent::ReturnPressed);
        true
    }

    /// Left arrow: from an empty buffer to the last chip, then chip to chip.
    pub fn select_previous(&mut self) -> bool {
        match self.focus {
            FocusState::Typing if self.text.is_empty() && !self.chips.is_empty() => {
                self.select_chip(self.chips.len() - 1)
            }
            FocusState::ChipSelected(index) if index > 0 => self.select_chip(index - 1),
            _ => false,
        }
    }

    /// Right arrow: chip to chip, past the last one back to the buffer.
    pub fn select_next(&mut self) -> bool {
        match self.focus {
            FocusState::ChipSelected(index) if index + 1 < self.chips.len() => {
                self.select_chip(index + 1)
            }
            FocusState::ChipSelected(_) => self.unselect_chip(),
            _ => false,
        }
    }

    fn handle_key(&mut self, event: &KeyboardEvent) -> bool {
        if !event.is_down() || event.modifiers.is_command() || self.focus == FocusState::Unfocused {
            return false;
        }
        log::trace!("key {:?} with focus {:?}", event.key, self.focus);

        match event.key.as_str() {
            "Backspace" => self.delete_backward(),
            "Enter" => self.press_return(),
            "Escape" => {
                self.end_editing();
                true
            }
            "ArrowLeft" => self.select_previous(),
            "ArrowRight" => self.select_next(),
            _ => match event.char() {
                Some(c) => self.insert_text(c.encode_utf8(&mut [0; 4])),
                None => false,
            },
        }
    }

    // =========================================================================
    // Pointer
    // =========================================================================

    /// A tap at `point`, relative to the field origin.
    pub fn tap(&mut self, point: Point) -> bool {
        if self.config.read_only {
            return false;
        }
        let hit = self.layout().hit_test(point);
        match hit {
            Some(Hit::Chip(index)) => match self.chips[index].tap() {
                Some(request) => self.handle_chip_request(index, request),
                None => false,
            },
            Some(Hit::Input) | Some(Hit::Field) => {
                self.focus_input();
                true
            }
            None => false,
        }
    }

    /// Route a terminal event. `origin` is where the field is drawn.
    ///
    /// Returns true when the field consumed the event.
    pub fn handle_event(&mut self, event: &InputEvent, origin: Point) -> bool {
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Paste(text) => self.insert_text(text),
            InputEvent::Mouse(mouse) if mouse.is_tap() => {
                let inside = mouse.x >= origin.x && mouse.y >= origin.y;
                let local = Point::new(mouse.x.saturating_sub(origin.x), mouse.y.saturating_sub(origin.y));
                let bounds = self.layout().bounds();
                if inside && bounds.contains(local) {
                    self.tap(local)
                } else {
                    self.end_editing();
                    false
                }
            }
            _ => false,
        }
    }

    // =========================================================================
    // Layout
    // =========================================================================

    pub fn needs_layout(&self) -> bool {
        self.dirty
    }

    /// Mark the layout dirty without changing anything.
    pub fn set_needs_layout(&mut self) {
        self.dirty = true;
    }

    /// Current layout, recomputed first if anything changed.
    pub fn layout(&mut self) -> &FieldLayout {
        if self.dirty {
            self.run_layout();
        }
        &self.layout
    }

    /// Recompute unconditionally. Emits `HeightChanged` only if the height moved.
    pub fn relayout(&mut self) -> &FieldLayout {
        self.run_layout();
        &self.layout
    }

    /// Last reported height.
    pub fn height(&self) -> u16 {
        self.reported_height
    }

    /// Size of the caret element, or None when read-only.
    fn caret_size(&self) -> Option<Size> {
        if self.config.read_only {
            return None;
        }
        let shown = if self.is_placeholder_visible() {
            self.config.placeholder.as_str()
        } else {
            self.text.as_str()
        };
        let width = string_width(shown)
            .saturating_add(1)
            .max(self.config.min_input_width);
        Some(Size::new(width, 1))
    }

    fn run_layout(&mut self) {
        self.layout = FieldLayout::compute(&self.chips, self.caret_size(), &self.config, self.width);
        self.dirty = false;

        let height = self.layout.height;
        if height != self.reported_height {
            log::trace!("height {} -> {}", self.reported_height, height);
            self.reported_height = height;
            self.height_signal.set(height);
            self.emit(TagsFieldEvent::HeightChanged(height));
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
