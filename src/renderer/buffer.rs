//! FrameBuffer and drawing primitives.
//!
//! A 2D grid of [`Cell`]s describing what a field looks like. The host copies
//! it to the terminal however it likes; the field only ever draws into it.
//!
//! - **Flat storage**: `Vec<Cell>`, row-major, `index = y * width + x`.
//! - **Clipping**: every primitive takes an optional clip [`Rect`].
//! - **Wide characters**: the cell after a 2-wide glyph holds `char = 0`.

use crate::layout::text_measure::char_width;
use crate::types::{Attr, BorderStyle, Cell, Point, Rect, Rgba};

// =============================================================================
// FrameBuffer
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a buffer filled with default cells.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Cell at (x, y), None if out of bounds.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Characters of row `y`, continuation cells skipped. Handy in tests.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .filter(|cell| cell.char != 0)
            .filter_map(|cell| char::from_u32(cell.char))
            .collect()
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::default();
        }
    }

    /// Resize the buffer (clears content).
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let size = width as usize * height as usize;
        self.cells.resize(size, Cell::default());
        self.clear();
    }

    // =========================================================================
    // Drawing Primitives
    // =========================================================================

    /// Set a single cell. A transparent `bg` keeps the existing background.
    ///
    /// Returns true if the cell was set.
    pub fn set_cell(&mut self, x: u16, y: u16, char: u32, fg: Rgba, bg: Rgba, attrs: Attr, clip: Option<&Rect>) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        if let Some(clip) = clip {
            if !clip.contains(Point::new(x, y)) {
                return false;
            }
        }

        let idx = self.index(x, y);
        let cell = &mut self.cells[idx];
        cell.char = char;
        cell.fg = fg;
        if bg != Rgba::TRANSPARENT {
            cell.bg = bg;
        }
        cell.attrs = attrs;
        true
    }

    /// Fill a rectangle with blanks on `bg`.
    pub fn fill_rect(&mut self, rect: Rect, bg: Rgba, clip: Option<&Rect>) {
        let area = match clip {
            Some(clip) => rect.intersect(clip),
            None => Some(rect),
        };
        let Some(area) = area.and_then(|a| a.intersect(&self.bounds())) else {
            return;
        };

        for row in area.y..area.bottom() {
            let start = self.index(area.x, row);
            let end = self.index(area.right(), row);
            for cell in &mut self.cells[start..end] {
                cell.char = b' ' as u32;
                cell.bg = bg;
                cell.attrs = Attr::NONE;
            }
        }
    }

    /// Draw text at a position.
    ///
    /// Returns the number of cells used (wide characters count 2).
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, fg: Rgba, bg: Option<Rgba>, attrs: Attr, clip: Option<&Rect>) -> u16 {
        let bg = bg.unwrap_or(Rgba::TRANSPARENT);
        let mut col = x;

        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            let width = char_width(ch);
            if width == 0 {
                continue;
            }

            if self.set_cell(col, y, ch as u32, fg, bg, attrs, clip) && width == 2 {
                // Continuation cell for the right half.
                self.set_cell(col + 1, y, 0, fg, bg, attrs, clip);
            }
            col = col.saturating_add(width);
        }

        col.saturating_sub(x)
    }

    /// Draw a border around `rect`.
    pub fn draw_border(&mut self, rect: Rect, style: BorderStyle, color: Rgba, clip: Option<&Rect>) {
        if rect.width < 2 || rect.height < 2 || style == BorderStyle::None {
            return;
        }

        let (horiz, vert, tl, tr, br, bl) = style.chars();
        let bg = Rgba::TRANSPARENT;
        let x2 = rect.right() - 1;
        let y2 = rect.bottom() - 1;

        self.set_cell(rect.x, rect.y, tl as u32, color, bg, Attr::NONE, clip);
        self.set_cell(x2, rect.y, tr as u32, color, bg, Attr::NONE, clip);
        self.set_cell(x2, y2, br as u32, color, bg, Attr::NONE, clip);
        self.set_cell(rect.x, y2, bl as u32, color, bg, Attr::NONE, clip);

        for col in (rect.x + 1)..x2 {
            self.set_cell(col, rect.y, horiz as u32, color, bg, Attr::NONE, clip);
            self.set_cell(col, y2, horiz as u32, color, bg, Attr::NONE, clip);
        }
        for row in (rect.y + 1)..y2 {
            self.set_cell(rect.x, row, vert as u32, color, bg, Attr::NONE, clip);
            self.set_cell(x2, row, vert as u32, color, bg, Attr::NONE, clip);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_bounds() {
        let buf = FrameBuffer::new(4, 2);
        assert_eq!(buf.cells().len(), 8);
        assert!(buf.get(3, 1).is_some());
        assert!(buf.get(4, 0).is_none());
    }

    #[test]
    fn test_draw_text_wide() {
        let mut buf = FrameBuffer::new(6, 1);
        let used = buf.draw_text(0, 0, "a世b", Rgba::WHITE, None, Attr::NONE, None);
        assert_eq!(used, 4);
        assert_eq!(buf.get(2, 0).map(|c| c.char), Some(0));
        assert_eq!(buf.row_text(0), "a世b  ");
    }

    #[test]
    fn test_draw_text_clipped() {
        let mut buf = FrameBuffer::new(10, 1);
        let clip = Rect::new(0, 0, 3, 1);
        buf.draw_text(0, 0, "abcdef", Rgba::WHITE, None, Attr::NONE, Some(&clip));
        assert_eq!(buf.row_text(0), "abc       ");
    }

    #[test]
    fn test_fill_rect_keeps_outside() {
        let mut buf = FrameBuffer::new(4, 2);
        buf.fill_rect(Rect::new(1, 0, 10, 1), Rgba::RED, None);
        assert_eq!(buf.get(0, 0).map(|c| c.bg), Some(Rgba::TERMINAL_DEFAULT));
        assert_eq!(buf.get(3, 0).map(|c| c.bg), Some(Rgba::RED));
        assert_eq!(buf.get(1, 1).map(|c| c.bg), Some(Rgba::TERMINAL_DEFAULT));
    }

    #[test]
    fn test_draw_border() {
        let mut buf = FrameBuffer::new(4, 3);
        buf.draw_border(buf.bounds(), BorderStyle::Single, Rgba::WHITE, None);
        assert_eq!(buf.row_text(0), "┌──┐");
        assert_eq!(buf.row_text(1), "│  │");
        assert_eq!(buf.row_text(2), "└──┘");
    }
}
