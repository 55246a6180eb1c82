//! Field geometry: chip frames, the caret frame and hit testing.
//!
//! Built from the flow engine. Chips are measured at `size_to_fit` of the
//! available width so a long tag never overflows its line; the caret takes
//! `max(text width + 1, min_input_width)` to decide where it wraps and then
//! stretches to the end of its line.

use crate::chip::TagChip;
use crate::field::config::TagsFieldConfig;
use crate::layout::flow::{flow_layout, FlowConfig, FlowLayout};
use crate::types::{Point, Rect, Size};

/// What a point inside the field lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Chip(usize),
    /// The caret / free-text element.
    Input,
    /// Field background.
    Field,
}

/// Result of a layout pass. Coordinates are relative to the field origin.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldLayout {
    pub width: u16,
    /// Reported height (after clipping).
    pub height: u16,
    /// Height without max-lines / max-height clipping.
    pub content_height: u16,
    /// Frame per chip, `None` when clipped away.
    pub chip_frames: Vec<Option<Rect>>,
    /// Caret frame; `None` when read-only or clipped.
    pub input_frame: Option<Rect>,
    pub flow: FlowLayout,
}

impl FieldLayout {
    /// Lay out `chips` followed by an optional caret of `caret` size.
    pub fn compute(chips: &[TagChip], caret: Option<Size>, config: &TagsFieldConfig, width: u16) -> Self {
        let flow_config = FlowConfig {
            container_width: width,
            margins: config.content_insets(),
            space_between_tags: config.space_between_tags,
            space_between_lines: config.space_between_lines,
            max_lines: config.max_lines,
            max_height: config.max_height,
        };
        let available = flow_config.available_width();

        let mut sizes: Vec<Size> = chips
            .iter()
            .map(|chip| chip.size_to_fit(Size::new(available, u16::MAX)))
            .collect();
        if let Some(caret) = caret {
            sizes.push(Size::new(caret.width.min(available), caret.height));
        }

        let flow = flow_layout(&sizes, &flow_config);

        let chip_frames = (0..chips.len())
            .map(|i| flow.positions[i].map(|p| Rect::from_origin_size(p, sizes[i])))
            .collect();

        let input_frame = caret.and_then(|_| {
            let i = chips.len();
            let origin = flow.positions[i]?;
            let line_end = flow_config.margins.left.saturating_add(available);
            let stretched = line_end.saturating_sub(origin.x).max(sizes[i].width);
            Some(Rect::new(origin.x, origin.y, stretched, sizes[i].height))
        });

        Self {
            width,
            height: flow.height,
            content_height: flow.content_height,
            chip_frames,
            input_frame,
            flow,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Number of rendered lines.
    pub fn line_count(&self) -> usize {
        self.flow.visible_lines
    }

    pub fn hit_test(&self, point: Point) -> Option<Hit> {
        if !self.bounds().contains(point) {
            return None;
        }
        if let Some(i) = self
            .chip_frames
            .iter()
            .position(|f| f.is_some_and(|f| f.contains(point)))
        {
            return Some(Hit::Chip(i));
        }
        if self.input_frame.is_some_and(|f| f.contains(point)) {
            return Some(Hit::Input);
        }
        Some(Hit::Field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ChipId;
    use crate::tag::Tag;
    use crate::types::Insets;

    fn chips(texts: &[&str]) -> Vec<TagChip> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| TagChip::new(ChipId(i as u64), Tag::new(*t)))
            .collect()
    }

    #[test]
    fn test_chips_and_caret_on_one_line() {
        let cfg = TagsFieldConfig::default();
        // chips: "ab" -> 4, "cd" -> 4; caret 4
        let layout = FieldLayout::compute(&chips(&["ab", "cd"]), Some(Size::new(4, 1)), &cfg, 20);
        assert_eq!(layout.chip_frames[0], Some(Rect::new(0, 0, 4, 1)));
        assert_eq!(layout.chip_frames[1], Some(Rect::new(5, 0, 4, 1)));
        // caret starts at 10 and stretches to 20
        assert_eq!(layout.input_frame, Some(Rect::new(10, 0, 10, 1)));
        assert_eq!(layout.height, 1);
    }

    #[test]
    fn test_caret_wraps_when_too_narrow() {
        let cfg = TagsFieldConfig::default();
        let layout = FieldLayout::compute(&chips(&["abcdef"]), Some(Size::new(4, 1)), &cfg, 10);
        // chip is 8 wide; 8 + 1 + 4 > 10
        assert_eq!(layout.input_frame, Some(Rect::new(0, 1, 10, 1)));
        assert_eq!(layout.height, 2);
    }

    #[test]
    fn test_long_chip_clamped() {
        let cfg = TagsFieldConfig {
            padding: Insets::symmetric(0, 1),
            ..TagsFieldConfig::default()
        };
        let layout = FieldLayout::compute(&chips(&["a very long tag text"]), None, &cfg, 10);
        assert_eq!(layout.chip_frames[0], Some(Rect::new(1, 0, 8, 1)));
        assert_eq!(layout.input_frame, None);
    }

    #[test]
    fn test_hit_test() {
        let cfg = TagsFieldConfig::default();
        let layout = FieldLayout::compute(&chips(&["ab", "cd"]), Some(Size::new(4, 1)), &cfg, 20);
        assert_eq!(layout.hit_test(Point::new(1, 0)), Some(Hit::Chip(0)));
        assert_eq!(layout.hit_test(Point::new(6, 0)), Some(Hit::Chip(1)));
        assert_eq!(layout.hit_test(Point::new(4, 0)), Some(Hit::Field));
        assert_eq!(layout.hit_test(Point::new(15, 0)), Some(Hit::Input));
        assert_eq!(layout.hit_test(Point::new(15, 3)), None);
    }

    #[test]
    fn test_clipped_chips_have_no_frame() {
        let cfg = TagsFieldConfig {
            max_lines: 1,
            ..TagsFieldConfig::default()
        };
        let layout = FieldLayout::compute(&chips(&["abcd", "efgh"]), Some(Size::new(4, 1)), &cfg, 8);
        assert!(layout.chip_frames[0].is_some());
        assert!(layout.chip_frames[1].is_none());
        assert!(layout.input_frame.is_none());
        assert_eq!(layout.height, 1);
        assert_eq!(layout.content_height, 3);
        assert_eq!(layout.line_count(), 1);
    }
}
