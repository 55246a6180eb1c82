//! Field notifications.
//!
//! Every notification is a [`TagsFieldEvent`] delivered synchronously, in
//! order, to each registered listener. Listeners are plain closures, kept
//! per field the way the framework keeps focus callbacks per component.
//!
//! The two hooks that must answer or mutate (should-accept and will-add)
//! are not events; see `TagsField::set_should_accept` and
//! `TagsField::set_on_will_add_chip`.

use crate::image::ChipId;
use crate::tag::Tag;

/// Something that happened to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagsFieldEvent {
    /// A tag was appended at `index`.
    TagAdded { tag: Tag, index: usize },
    /// A tag was removed from `index`.
    TagRemoved { tag: Tag, index: usize },
    /// The buffer changed.
    TextChanged(String),
    /// A layout pass produced a different height.
    HeightChanged(u16),
    /// The chip at `index` took focus.
    TagSelected { chip: ChipId, index: usize },
    /// The chip at `index` lost focus.
    TagUnselected { chip: ChipId, index: usize },
    /// Enter was pressed (after any acceptance it triggered).
    ReturnPressed,
    /// The field gained focus.
    BeganEditing,
    /// The field lost focus.
    EndedEditing,
}

/// Handle for removing a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type EventHandler = Box<dyn FnMut(&TagsFieldEvent)>;

/// Ordered listener list.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    handlers: Vec<(ListenerId, EventHandler)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, handler: EventHandler) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(hid, _)| *hid != id);
        self.handlers.len() != before
    }

    pub(crate) fn emit(&mut self, event: &TagsFieldEvent) {
        for (_, handler) in self.handlers.iter_mut() {
            handler(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.len()
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.handlers.len())
            .finish()
    }
}
