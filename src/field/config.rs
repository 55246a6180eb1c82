//! Field configuration.
//!
//! Plain props struct with defaults. Read it with `TagsField::config()`,
//! change it with `TagsField::configure(|cfg| ...)`, which restyles the
//! chips and marks the layout dirty.

use crate::chip::ChipStyle;
use crate::types::{Attr, BorderStyle, Insets, Rgba, Size};

bitflags::bitflags! {
    /// Keystrokes that turn the buffer into a tag (besides the delimiter).
    ///
    /// Empty means tags are only accepted programmatically or through the
    /// configured delimiter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AcceptTrigger: u8 {
        /// Enter / `accept_input()`.
        const RETURN = 1 << 0;
        /// A typed `,`.
        const COMMA = 1 << 1;
        /// A typed space.
        const SPACE = 1 << 2;
    }
}

impl Default for AcceptTrigger {
    fn default() -> Self {
        Self::RETURN
    }
}

impl AcceptTrigger {
    /// Trigger for a single typed character, if any.
    pub fn for_char(c: char) -> Option<Self> {
        match c {
            ',' => Some(Self::COMMA),
            ' ' => Some(Self::SPACE),
            '\n' | '\r' => Some(Self::RETURN),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagsFieldConfig {
    // =========================================================================
    // Layout
    // =========================================================================
    /// Content inset of the field. Its vertical part counts toward the height.
    pub padding: Insets,
    /// Layout margins inside every chip.
    pub chip_margins: Insets,
    pub space_between_tags: u16,
    pub space_between_lines: u16,
    /// Maximum rendered lines (0 = unlimited).
    pub max_lines: u16,
    /// Stop growing at this height and clip instead.
    pub max_height: Option<u16>,
    /// Narrowest the caret element gets before it wraps to a new line.
    pub min_input_width: u16,

    // =========================================================================
    // Behavior
    // =========================================================================
    /// Blocks every mutation and hides the caret.
    pub read_only: bool,
    /// Typing this accepts the buffer. Empty disables delimiter acceptance.
    pub delimiter: String,
    /// Draw the delimiter after each chip's text.
    pub delimiter_visible: bool,
    pub accept_triggers: AcceptTrigger,
    /// Refuse a tag equal to one already in the field.
    pub reject_duplicates: bool,

    // =========================================================================
    // Placeholder
    // =========================================================================
    pub placeholder: String,
    /// Keep the placeholder while tags exist (buffer still has to be empty).
    pub placeholder_always_visible: bool,
    pub placeholder_color: Rgba,

    // =========================================================================
    // Images
    // =========================================================================
    pub show_images: bool,
    pub image_margin: u16,
    /// Overrides the image size of every chip.
    pub image_size: Option<Size>,

    // =========================================================================
    // Colors / font
    // =========================================================================
    pub tint_color: Rgba,
    pub text_color: Rgba,
    pub selected_color: Rgba,
    pub selected_text_color: Rgba,
    /// Color of the text being typed.
    pub field_text_color: Rgba,
    pub background: Rgba,
    pub font: Attr,
    pub border: BorderStyle,
    pub border_color: Rgba,
}

impl Default for TagsFieldConfig {
    fn default() -> Self {
        let chip = ChipStyle::default();
        Self {
            padding: Insets::ZERO,
            chip_margins: chip.margins,
            space_between_tags: 1,
            space_between_lines: 0,
            max_lines: 0,
            max_height: None,
            min_input_width: 4,
            read_only: false,
            delimiter: String::new(),
            delimiter_visible: false,
            accept_triggers: AcceptTrigger::default(),
            reject_duplicates: false,
            placeholder: String::new(),
            placeholder_always_visible: false,
            placeholder_color: Rgba::GRAY,
            show_images: false,
            image_margin: chip.image_margin,
            image_size: None,
            tint_color: chip.tint_color,
            text_color: chip.text_color,
            selected_color: chip.selected_color,
            selected_text_color: chip.selected_text_color,
            field_text_color: Rgba::TERMINAL_DEFAULT,
            background: Rgba::TERMINAL_DEFAULT,
            font: chip.font,
            border: BorderStyle::None,
            border_color: Rgba::TERMINAL_DEFAULT,
        }
    }
}

impl TagsFieldConfig {
    /// Chip style derived from this config.
    pub fn chip_style(&self) -> ChipStyle {
        ChipStyle {
            tint_color: self.tint_color,
            text_color: self.text_color,
            selected_color: self.selected_color,
            selected_text_color: self.selected_text_color,
            font: self.font,
            margins: self.chip_margins,
            image_margin: self.image_margin,
        }
    }

    /// Delimiter glyph each chip shows.
    pub fn displayed_delimiter(&self) -> &str {
        if self.delimiter_visible {
            &self.delimiter
        } else {
            ""
        }
    }

    /// Padding plus the border on every side.
    pub fn content_insets(&self) -> Insets {
        let b = self.border.width();
        Insets::new(
            self.padding.top.saturating_add(b),
            self.padding.right.saturating_add(b),
            self.padding.bottom.saturating_add(b),
            self.padding.left.saturating_add(b),
        )
    }
}
