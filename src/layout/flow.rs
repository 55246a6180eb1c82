//! Flow Layout - greedy line wrapping for chips and the caret.
//!
//! Items are packed left to right. A new line starts whenever the next item
//! (plus the gap before it) would overflow the available width. An item
//! wider than the available width sits alone on its own line; callers clamp
//! chip widths beforehand so this only matters for degenerate widths.
//!
//! The result is a pure function of its inputs: running it twice on the same
//! sizes and config gives identical positions and heights.

use crate::types::{Insets, Point, Size};

// =============================================================================
// TYPES
// =============================================================================

/// Inputs to a flow pass that don't depend on the items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlowConfig {
    /// Total container width (margins included).
    pub container_width: u16,
    /// Space around the flowed content; counts toward the height.
    pub margins: Insets,
    /// Horizontal gap between neighbours on the same line.
    pub space_between_tags: u16,
    /// Vertical gap between lines.
    pub space_between_lines: u16,
    /// Maximum rendered lines (0 = unlimited).
    pub max_lines: u16,
    /// Maximum reported height, margins included.
    pub max_height: Option<u16>,
}

impl FlowConfig {
    /// Width available for items on one line.
    #[inline]
    pub fn available_width(&self) -> u16 {
        self.container_width.saturating_sub(self.margins.horizontal())
    }
}

/// One packed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowLine {
    /// First item index on this line.
    pub start: usize,
    /// One past the last item index on this line.
    pub end: usize,
    /// Top of the line, relative to the container.
    pub y: u16,
    /// Used width (items + gaps).
    pub width: u16,
    /// Tallest item on the line.
    pub height: u16,
}

impl FlowLine {
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Output of a flow pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlowLayout {
    /// Position per item, relative to the container. `None` = clipped.
    pub positions: Vec<Option<Point>>,
    /// Every packed line, clipped ones included.
    pub lines: Vec<FlowLine>,
    /// How many leading lines render.
    pub visible_lines: usize,
    /// Height needed to show every line.
    pub content_height: u16,
    /// Height after max-lines / max-height clipping. This is what gets reported.
    pub height: u16,
}

impl FlowLayout {
    /// Line index an item landed on.
    pub fn line_of(&self, item: usize) -> Option<usize> {
        self.lines.iter().position(|l| item >= l.start && item < l.end)
    }

    pub fn is_visible(&self, item: usize) -> bool {
        self.positions.get(item).is_some_and(Option::is_some)
    }
}

// =============================================================================
// ALGORITHM
// =============================================================================

/// Pack `sizes` into lines.
pub fn flow_layout(sizes: &[Size], config: &FlowConfig) -> FlowLayout {
    let available = config.available_width();
    let gap = config.space_between_tags;

    // Step 1: partition into lines
    let mut lines: Vec<FlowLine> = Vec::new();
    let mut line_start = 0usize;
    let mut line_width = 0u16;
    let mut line_height = 0u16;

    for (i, size) in sizes.iter().enumerate() {
        let needed = if i > line_start {
            line_width.saturating_add(gap).saturating_add(size.width)
        } else {
            size.width
        };

        if i > line_start && needed > available {
            lines.push(FlowLine {
                start: line_start,
                end: i,
                y: 0,
                width: line_width,
                height: line_height,
            });
            line_start = i;
            line_width = size.width;
            line_height = size.height;
        } else {
            line_width = needed;
            line_height = line_height.max(size.height);
        }
    }
    if line_start < sizes.len() {
        lines.push(FlowLine {
            start: line_start,
            end: sizes.len(),
            y: 0,
            width: line_width,
            height: line_height,
        });
    }

    // Step 2: stack lines vertically
    let mut y = config.margins.top;
    for (li, line) in lines.iter_mut().enumerate() {
        if li > 0 {
            y = y.saturating_add(config.space_between_lines);
        }
        line.y = y;
        y = y.saturating_add(line.height);
    }
    let content_height = stacked_height(&lines, lines.len(), config);

    // Step 3: clip to max lines, then to max height
    let mut visible_lines = lines.len();
    if config.max_lines > 0 {
        visible_lines = visible_lines.min(config.max_lines as usize);
    }
    let mut height = stacked_height(&lines, visible_lines, config);
    if let Some(max_height) = config.max_height {
        if height > max_height {
            let limit = max_height.saturating_sub(config.margins.bottom);
            visible_lines = lines[..visible_lines]
                .iter()
                .take_while(|l| l.y.saturating_add(l.height) <= limit)
                .count();
            height = max_height;
        }
    }

    // Step 4: place items
    let mut positions = vec![None; sizes.len()];
    for line in &lines[..visible_lines] {
        let mut x = config.margins.left;
        for (i, size) in sizes.iter().enumerate().take(line.end).skip(line.start) {
            if i > line.start {
                x = x.saturating_add(gap);
            }
            positions[i] = Some(Point::new(x, line.y));
            x = x.saturating_add(size.width);
        }
    }

    log::trace!(
        "flow: {} items, {} lines ({} visible), height {}",
        sizes.len(),
        lines.len(),
        visible_lines,
        height
    );

    FlowLayout {
        positions,
        lines,
        visible_lines,
        content_height,
        height,
    }
}

/// Height of the first `count` lines plus gaps and vertical margins.
fn stacked_height(lines: &[FlowLine], count: usize, config: &FlowConfig) -> u16 {
    let lines_total = lines[..count]
        .iter()
        .fold(0u16, |acc, l| acc.saturating_add(l.height));
    let gaps = config
        .space_between_lines
        .saturating_mul(count.saturating_sub(1).min(u16::MAX as usize) as u16);
    lines_total
        .saturating_add(gaps)
        .saturating_add(config.margins.vertical())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(widths: &[u16], height: u16) -> Vec<Size> {
        widths.iter().map(|&w| Size::new(w, height)).collect()
    }

    fn config(width: u16) -> FlowConfig {
        FlowConfig {
            container_width: width,
            ..FlowConfig::default()
        }
    }

    #[test]
    fn test_greedy_partition() {
        let cfg = FlowConfig {
            space_between_tags: 10,
            space_between_lines: 4,
            ..config(120)
        };
        let layout = flow_layout(&sizes(&[40, 60, 50], 3), &cfg);

        assert_eq!(layout.lines.len(), 2);
        assert_eq!((layout.lines[0].start, layout.lines[0].end), (0, 2));
        assert_eq!(layout.lines[0].width, 110);
        assert_eq!((layout.lines[1].start, layout.lines[1].end), (2, 3));
        assert_eq!(layout.height, 3 + 3 + 4);
        assert_eq!(layout.positions[0], Some(Point::new(0, 0)));
        assert_eq!(layout.positions[1], Some(Point::new(50, 0)));
        assert_eq!(layout.positions[2], Some(Point::new(0, 7)));
    }

    #[test]
    fn test_exact_fit_stays_on_line() {
        let cfg = FlowConfig {
            space_between_tags: 10,
            ..config(120)
        };
        let layout = flow_layout(&sizes(&[50, 60], 1), &cfg);
        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.lines[0].width, 120);
    }

    #[test]
    fn test_margins_reduce_width_and_add_height() {
        let cfg = FlowConfig {
            margins: Insets::new(1, 2, 1, 2),
            space_between_tags: 1,
            ..config(10)
        };
        // available = 6: [3, 2] fits (3+1+2=6), then [4]
        let layout = flow_layout(&sizes(&[3, 2, 4], 1), &cfg);
        assert_eq!(layout.lines.len(), 2);
        assert_eq!(layout.positions[0], Some(Point::new(2, 1)));
        assert_eq!(layout.positions[1], Some(Point::new(6, 1)));
        assert_eq!(layout.positions[2], Some(Point::new(2, 2)));
        assert_eq!(layout.height, 4);
    }

    #[test]
    fn test_oversized_item_alone() {
        let layout = flow_layout(&sizes(&[2, 30, 2], 1), &config(10));
        assert_eq!(layout.lines.len(), 3);
        assert_eq!(layout.lines[1].len(), 1);
    }

    #[test]
    fn test_mixed_heights() {
        let items = vec![Size::new(2, 1), Size::new(2, 3), Size::new(9, 2)];
        let layout = flow_layout(&items, &config(10));
        assert_eq!(layout.lines[0].height, 3);
        assert_eq!(layout.lines[1].y, 3);
        assert_eq!(layout.height, 5);
    }

    #[test]
    fn test_empty() {
        let cfg = FlowConfig {
            margins: Insets::uniform(1),
            ..config(10)
        };
        let layout = flow_layout(&[], &cfg);
        assert!(layout.lines.is_empty());
        assert_eq!(layout.height, 2);
    }

    #[test]
    fn test_max_lines_clips() {
        let cfg = FlowConfig {
            max_lines: 2,
            space_between_lines: 1,
            ..config(5)
        };
        let layout = flow_layout(&sizes(&[5, 5, 5, 5], 1), &cfg);
        assert_eq!(layout.lines.len(), 4);
        assert_eq!(layout.visible_lines, 2);
        assert_eq!(layout.height, 3);
        assert_eq!(layout.content_height, 7);
        assert!(layout.is_visible(1));
        assert!(!layout.is_visible(2));
        assert_eq!(layout.positions[3], None);
    }

    #[test]
    fn test_max_height_clips() {
        let cfg = FlowConfig {
            max_height: Some(4),
            space_between_lines: 1,
            ..config(5)
        };
        // lines at y = 0, 2, 4: only the first two end at or before 4
        let layout = flow_layout(&sizes(&[5, 5, 5], 1), &cfg);
        assert_eq!(layout.height, 4);
        assert_eq!(layout.visible_lines, 2);
        assert!(!layout.is_visible(2));
    }

    #[test]
    fn test_max_height_not_reached() {
        let cfg = FlowConfig {
            max_height: Some(10),
            ..config(5)
        };
        let layout = flow_layout(&sizes(&[5, 5], 1), &cfg);
        assert_eq!(layout.height, 2);
        assert_eq!(layout.visible_lines, 2);
    }

    #[test]
    fn test_idempotent() {
        let cfg = FlowConfig {
            space_between_tags: 1,
            space_between_lines: 1,
            margins: Insets::uniform(1),
            ..config(20)
        };
        let items = sizes(&[4, 7, 3, 9, 2], 1);
        assert_eq!(flow_layout(&items, &cfg), flow_layout(&items, &cfg));
    }

    #[test]
    fn test_line_of() {
        let layout = flow_layout(&sizes(&[5, 5, 5], 1), &config(10));
        assert_eq!(layout.line_of(0), Some(0));
        assert_eq!(layout.line_of(2), Some(1));
        assert_eq!(layout.line_of(3), None);
    }
}
