//! TagChip - the focusable, drawable unit for one tag.
//!
//! A chip shows its tag's text (plus the delimiter glyph when the field
//! wants it) and, optionally, an image in front of the text. It owns its
//! measured size and recomputes it whenever something that affects size
//! changes.
//!
//! Chips don't talk to the field directly. Input that reaches a focused
//! chip comes back out as a [`ChipRequest`] for the field to act on.
//!
//! # Layout
//!
//! ```text
//! ┌ margins ─────────────────────────────┐
//! │ [image] <image_margin> text+delimiter │
//! └───────────────────────────────────────┘
//! ```

use std::time::Instant;

use crate::animate::{Appearance, SelectionTransition};
use crate::image::{ChipId, Image, ImageLoadError, ImageLoader, ImageSlot, ImageTicket};
use crate::layout::text_measure::measure_line;
use crate::tag::Tag;
use crate::types::{Attr, Insets, Rgba, Size};

// =============================================================================
// STYLE
// =============================================================================

/// Colors, font and spacing of a chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipStyle {
    /// Background when unselected.
    pub tint_color: Rgba,
    /// Text (and glyph image) color when unselected.
    pub text_color: Rgba,
    /// Background when selected.
    pub selected_color: Rgba,
    /// Text (and glyph image) color when selected.
    pub selected_text_color: Rgba,
    pub font: Attr,
    /// Space between the chip edge and its content.
    pub margins: Insets,
    /// Gap between a visible image and the text.
    pub image_margin: u16,
}

impl Default for ChipStyle {
    fn default() -> Self {
        Self {
            tint_color: Rgba::TINT,
            text_color: Rgba::WHITE,
            selected_color: Rgba::GRAY,
            selected_text_color: Rgba::BLACK,
            font: Attr::NONE,
            margins: Insets::symmetric(0, 1),
            image_margin: 1,
        }
    }
}

impl ChipStyle {
    /// Resting appearance for a selection state.
    pub fn appearance(&self, selected: bool) -> Appearance {
        if selected {
            Appearance::new(self.selected_color, self.selected_text_color)
        } else {
            Appearance::new(self.tint_color, self.text_color)
        }
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

/// What a chip asks its field to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChipRequest {
    /// Text typed while the chip had focus.
    InputText(String),
    /// Backspace while focused: remove this chip, optionally seeding the buffer.
    Delete { replacement: Option<String> },
    /// The chip was tapped while unselected.
    Select,
}

// =============================================================================
// CHIP
// =============================================================================

#[derive(Debug, Clone)]
pub struct TagChip {
    id: ChipId,
    tag: Tag,
    display_text: String,
    display_delimiter: String,
    style: ChipStyle,
    image: ImageSlot,
    image_hidden: bool,
    image_size: Size,
    selected: bool,
    transition: SelectionTransition,
    size: Size,
}

impl TagChip {
    /// Create a chip for `tag`. Images start hidden with the placeholder.
    pub fn new(id: ChipId, tag: Tag) -> Self {
        let style = ChipStyle::default();
        let image = ImageSlot::default();
        let image_size = image.image().size;
        let mut chip = Self {
            id,
            display_text: tag.text().to_string(),
            tag,
            display_delimiter: String::new(),
            style,
            image,
            image_hidden: true,
            image_size,
            selected: false,
            transition: SelectionTransition::settled(style.appearance(false)),
            size: Size::ZERO,
        };
        chip.update_size();
        chip
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> ChipId {
        self.id
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    pub fn display_delimiter(&self) -> &str {
        &self.display_delimiter
    }

    /// Text as drawn: display text followed by the delimiter glyph.
    pub fn label(&self) -> String {
        format!("{}{}", self.display_text, self.display_delimiter)
    }

    pub fn style(&self) -> &ChipStyle {
        &self.style
    }

    pub fn image(&self) -> &Image {
        self.image.image()
    }

    pub fn image_slot(&self) -> &ImageSlot {
        &self.image
    }

    pub fn is_image_hidden(&self) -> bool {
        self.image_hidden
    }

    pub fn image_size(&self) -> Size {
        self.image_size
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// A selected chip holds keyboard focus.
    pub fn has_focus(&self) -> bool {
        self.selected
    }

    /// Chips always report text so backspace reaches them.
    pub fn has_text(&self) -> bool {
        true
    }

    // =========================================================================
    // Size-affecting setters
    // =========================================================================

    pub fn set_display_text(&mut self, text: impl Into<String>) {
        self.display_text = text.into();
        self.update_size();
    }

    pub fn set_display_delimiter(&mut self, delimiter: impl Into<String>) {
        self.display_delimiter = delimiter.into();
        self.update_size();
    }

    pub fn set_image_hidden(&mut self, hidden: bool) {
        self.image_hidden = hidden;
        self.update_size();
    }

    pub fn set_image_size(&mut self, size: Size) {
        self.image_size = size;
        self.update_size();
    }

    pub fn set_image_margin(&mut self, margin: u16) {
        self.style.image_margin = margin;
        self.update_size();
    }

    pub fn set_font(&mut self, font: Attr) {
        self.style.font = font;
        self.update_size();
    }

    pub fn set_margins(&mut self, margins: Insets) {
        self.style.margins = margins;
        self.update_size();
    }

    /// Replace the whole style. Colors apply without animation.
    pub fn set_style(&mut self, style: ChipStyle) {
        self.style = style;
        self.transition.snap(style.appearance(self.selected));
        self.update_size();
    }

    /// Take the four colors of `style`, leaving font and spacing alone.
    pub(crate) fn set_colors(&mut self, style: &ChipStyle) {
        self.style.tint_color = style.tint_color;
        self.style.text_color = style.text_color;
        self.style.selected_color = style.selected_color;
        self.style.selected_text_color = style.selected_text_color;
        self.transition.snap(self.style.appearance(self.selected));
    }

    /// Drop a fixed image size: the box follows the shown image again.
    pub fn reset_image_size(&mut self) {
        self.image_size = self.image.image().size;
        self.update_size();
    }

    // =========================================================================
    // Images
    // =========================================================================

    /// Show `image` directly, adopting its size.
    pub fn set_image(&mut self, image: Image) {
        self.image_size = image.size;
        self.image.set_image(image);
        self.update_size();
    }

    /// Point the chip at a new image reference, cancelling any outstanding fetch.
    pub fn assign_image_ref(&mut self, reference: Option<String>, loader: Option<&mut dyn ImageLoader>) {
        self.image.assign(self.id, reference, loader);
    }

    pub fn cancel_image(&mut self, loader: Option<&mut dyn ImageLoader>) {
        self.image.cancel(loader);
    }

    /// Request the current reference if it was assigned before any loader existed.
    pub(crate) fn request_missing_image(&mut self, loader: &mut dyn ImageLoader) -> bool {
        self.image.request_missing(self.id, loader)
    }

    /// Apply a loader answer. Stale answers are ignored.
    ///
    /// The image is stored as delivered. Neither the chip's `image_size` nor
    /// its measured size changes; the renderer clips the image to `image_size`.
    pub fn resolve_image(&mut self, ticket: ImageTicket, result: Result<Image, ImageLoadError>) -> bool {
        self.image.resolve(ticket, result)
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    fn update_size(&mut self) {
        self.size = self.compute_size(None);
    }

    fn compute_size(&self, constraint: Option<Size>) -> Size {
        let margins = self.style.margins;
        let label = measure_line(&self.label());

        let (label, image, image_margin) = match constraint {
            None => {
                let (image, image_margin) = if self.image_hidden {
                    (Size::ZERO, 0)
                } else {
                    (self.image_size, self.style.image_margin)
                };
                (label, image, image_margin)
            }
            Some(offered) => {
                let fitting = Size::new(
                    offered.width.saturating_sub(margins.horizontal()),
                    offered.height.saturating_sub(margins.vertical()),
                );
                let (image, image_margin) = if self.image_hidden {
                    (Size::ZERO, 0)
                } else {
                    (self.image_size.min(fitting), self.style.image_margin)
                };
                let label_box = Size::new(
                    fitting.width.saturating_sub(image.width).saturating_sub(image_margin),
                    fitting.height.max(1),
                );
                (label.min(label_box), image, image_margin)
            }
        };

        Size::new(
            label
                .width
                .saturating_add(image.width)
                .saturating_add(image_margin)
                .saturating_add(margins.horizontal()),
            label.height.max(image.height).saturating_add(margins.vertical()),
        )
    }

    /// Natural size: text + (image + image margin when shown) + margins.
    pub fn intrinsic_size(&self) -> Size {
        self.size
    }

    /// Same composition as [`intrinsic_size`](Self::intrinsic_size), measured inside `constraint`.
    pub fn size_that_fits(&self, constraint: Size) -> Size {
        self.compute_size(Some(constraint))
    }

    /// Intrinsic size, with the width clamped to `size.width` when it overflows.
    pub fn size_to_fit(&self, size: Size) -> Size {
        let intrinsic = self.intrinsic_size();
        if intrinsic.width > size.width {
            Size::new(size.width, intrinsic.height)
        } else {
            intrinsic
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select or deselect, animating the change. Returns false if nothing changed.
    ///
    /// Selection belongs to the field, which keeps at most one chip selected.
    pub(crate) fn set_selected(&mut self, selected: bool, now: Instant) -> bool {
        if self.selected == selected {
            return false;
        }
        self.selected = selected;
        self.transition
            .start(self.style.appearance(selected), selected, now);
        true
    }

    /// Appearance to draw at `now`.
    pub fn appearance_at(&self, now: Instant) -> Appearance {
        self.transition.sample(now)
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.transition.is_running(now)
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Typed text is forwarded to the field.
    pub fn insert_text(&self, text: &str) -> ChipRequest {
        ChipRequest::InputText(text.to_string())
    }

    /// Backspace asks the field to delete this chip.
    pub fn delete_backward(&self) -> ChipRequest {
        ChipRequest::Delete { replacement: None }
    }

    /// A tap asks for selection, unless the chip already is selected.
    pub fn tap(&self) -> Option<ChipRequest> {
        if self.selected {
            None
        } else {
            Some(ChipRequest::Select)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
