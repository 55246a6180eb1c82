//! # spark-tags
//!
//! Tokenized tags input field for terminal UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals): the
//! field mirrors its buffer and height into signals so a reactive UI can
//! track them, while everything else is plain owned state.
//!
//! ## Architecture
//!
//! ```text
//! crossterm event → input::convert_event → TagsField::handle_event
//!                                              │ mutates tags / buffer / focus,
//!                                              │ marks layout dirty, emits events
//!                                              ▼
//!                   renderer::render_field → TagsField::layout → FrameBuffer
//! ```
//!
//! A field owns an ordered list of [`Tag`]s, one [`TagChip`] per tag, and a
//! free-text buffer. Typing the delimiter (or an enabled accept trigger)
//! turns the buffer into a tag. Backspace on an empty buffer selects the
//! last chip; a second backspace removes it.
//!
//! ## Modules
//!
//! - [`types`] - Colors, cells, geometry
//! - [`tag`] - Tag value type
//! - [`chip`] - Per-tag visual token
//! - [`field`] - The tags field, its config and events
//! - [`layout`] - Text measurement and the flow engine
//! - [`image`] - Chip images and the pluggable loader
//! - [`animate`] - Selection transition
//! - [`input`] - Terminal event conversion
//! - [`renderer`] - Drawing into a frame buffer

pub mod animate;
pub mod chip;
pub mod field;
pub mod image;
pub mod input;
pub mod layout;
pub mod renderer;
pub mod tag;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use tag::{Tag, TagContext};

pub use chip::{ChipRequest, ChipStyle, TagChip};

pub use field::{
    AcceptTrigger, EventHandler, FieldLayout, FocusState, Hit, ListenerId, TagsField,
    TagsFieldConfig, TagsFieldEvent,
};

pub use image::{ChipId, Image, ImageContent, ImageLoadError, ImageLoader, ImageTicket};

pub use animate::{Appearance, SelectionTransition};

pub use input::{InputEvent, KeyboardEvent, Modifiers, MouseEvent};

pub use renderer::{render_field, FrameBuffer};
