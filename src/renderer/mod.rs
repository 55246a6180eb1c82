//! Field renderer - draws a [`TagsField`] into a [`FrameBuffer`].
//!
//! Runs the field's layout pass first (so `HeightChanged` fires from here in
//! a frame loop), then paints background, border, chips and the caret
//! element. Chip colors are sampled from their selection transition at
//! `now`; keep calling while [`TagsField::is_animating`] is true.
//!
//! # Example
//!
//! ```ignore
//! use spark_tags::renderer::{render_field, FrameBuffer};
//! use spark_tags::{Point, TagsField};
//! use std::time::Instant;
//!
//! let mut field = TagsField::new();
//! field.set_width(40);
//! let mut buf = FrameBuffer::new(80, 24);
//! let area = render_field(&mut field, &mut buf, Point::new(2, 1), Instant::now());
//! ```

pub mod buffer;

pub use buffer::FrameBuffer;

use std::time::Instant;

use crate::chip::TagChip;
use crate::field::{FocusState, TagsField};
use crate::image::ImageContent;
use crate::layout::text_measure::{string_width, truncate_text};
use crate::types::{Attr, Insets, Point, Rect, Rgba};

/// Scale above which a chip is drawn bold (the terminal can't grow a chip).
const EMPHASIS_SCALE: f32 = 1.05;

/// Draw `field` with its top-left corner at `origin`. Returns the area drawn.
pub fn render_field(field: &mut TagsField, buf: &mut FrameBuffer, origin: Point, now: Instant) -> Rect {
    let layout = field.layout().clone();
    let config = field.config();
    let area = layout.bounds().offset(origin);
    let clip = area;

    buf.fill_rect(area, config.background, Some(&clip));
    buf.draw_border(area, config.border, config.border_color, Some(&clip));
    let content_clip = area.inset(Insets::uniform(config.border.width()));

    for (chip, frame) in field.chips().iter().zip(&layout.chip_frames) {
        if let Some(frame) = frame {
            draw_chip(buf, chip, frame.offset(origin), now, &content_clip);
        }
    }

    if let Some(frame) = layout.input_frame {
        draw_input(buf, field, frame.offset(origin), &content_clip);
    }

    area
}

fn draw_chip(buf: &mut FrameBuffer, chip: &TagChip, frame: Rect, now: Instant, clip: &Rect) {
    let style = chip.style();
    let appearance = chip.appearance_at(now);
    let mut attrs = style.font;
    if appearance.scale > EMPHASIS_SCALE {
        attrs |= Attr::BOLD;
    }

    buf.fill_rect(frame, appearance.background, Some(clip));
    let Some(inner) = frame.inset(style.margins).intersect(clip) else {
        return;
    };

    let mut x = inner.x;
    if !chip.is_image_hidden() {
        let image = chip.image();
        let shown = image.size.min(chip.image_size()).min(inner.size());
        match &image.content {
            ImageContent::Glyph(c) => {
                if shown.width > 0 && shown.height > 0 {
                    buf.set_cell(x, inner.y, *c as u32, appearance.foreground, appearance.background, attrs, Some(clip));
                }
            }
            ImageContent::Pixels(_) => {
                for py in 0..shown.height {
                    for px in 0..shown.width {
                        match image.pixel(px, py) {
                            Some(color) if color != Rgba::TRANSPARENT => {
                                buf.set_cell(x + px, inner.y + py, b' ' as u32, appearance.foreground, color, Attr::NONE, Some(clip));
                            }
                            _ => {}
                        }
                    }
                }
            }
        }
        x = x
            .saturating_add(chip.image_size().width)
            .saturating_add(style.image_margin);
    }

    let room = inner.right().saturating_sub(x);
    let label = truncate_text(&chip.label(), room);
    buf.draw_text(x, inner.y, &label, appearance.foreground, Some(appearance.background), attrs, Some(clip));
}

fn draw_input(buf: &mut FrameBuffer, field: &TagsField, frame: Rect, clip: &Rect) {
    let config = field.config();
    let typing = field.focus() == FocusState::Typing;

    let caret_x = if field.is_placeholder_visible() {
        let room = frame.width;
        let placeholder = truncate_text(&config.placeholder, room);
        buf.draw_text(frame.x, frame.y, &placeholder, config.placeholder_color, None, config.font, Some(clip));
        frame.x
    } else {
        // One cell stays free for the caret.
        let room = frame.width.saturating_sub(1);
        let text = truncate_text(field.text(), room);
        let used = buf.draw_text(frame.x, frame.y, &text, config.field_text_color, None, config.font, Some(clip));
        frame.x + used.min(string_width(&text))
    };

    if typing {
        if let Some(cell) = buf.get_mut(caret_x, frame.y) {
            if clip.contains(Point::new(caret_x, frame.y)) {
                cell.attrs |= Attr::INVERSE;
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
