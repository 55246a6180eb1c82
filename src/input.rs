//! Input Module - terminal event conversion and polling
//!
//! Bridges crossterm's event system to the events a tags field routes.
//!
//! # API
//!
//! - `convert_key_event` - crossterm KeyEvent to [`KeyboardEvent`]
//! - `convert_mouse_event` - crossterm MouseEvent to [`MouseEvent`]
//! - `poll_event` / `read_event` - pull the next [`InputEvent`]
//! - `enable_mouse` / `disable_mouse` - mouse capture
//!
//! # Example
//!
//! ```ignore
//! use spark_tags::input::poll_event;
//! use spark_tags::{Point, TagsField};
//! use std::time::Duration;
//!
//! let mut field = TagsField::new();
//! field.begin_editing();
//! loop {
//!     if let Ok(Some(event)) = poll_event(Duration::from_millis(16)) {
//!         field.handle_event(&event, Point::ORIGIN);
//!     }
//! }
//! ```

use crossterm::event::{
    poll, read, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode,
    KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers, MouseButton as CrosstermMouseButton,
    MouseEvent as CrosstermMouseEvent, MouseEventKind,
};
use crossterm::execute;
use std::io::stdout;
use std::time::Duration;

// =============================================================================
// KEYBOARD TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }

    /// Ctrl, Alt or Meta held: the key is a shortcut, not text.
    pub fn is_command(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed (e.g., "a", "Enter", "ArrowLeft")
    pub key: String,
    pub modifiers: Modifiers,
    pub state: KeyState,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            state: KeyState::Press,
        }
    }

    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            state: KeyState::Press,
        }
    }

    /// Press or auto-repeat.
    pub fn is_down(&self) -> bool {
        self.state != KeyState::Release
    }

    /// The typed character, if this key produces exactly one.
    pub fn char(&self) -> Option<char> {
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

// =============================================================================
// MOUSE TYPES
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseAction {
    Down,
    Up,
    Drag,
    Move,
    Scroll,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    None,
}

/// Mouse event in terminal cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MouseEvent {
    pub action: MouseAction,
    pub button: MouseButton,
    pub x: u16,
    pub y: u16,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// Left-button press at (x, y).
    pub fn click(x: u16, y: u16) -> Self {
        Self {
            action: MouseAction::Down,
            button: MouseButton::Left,
            x,
            y,
            modifiers: Modifiers::default(),
        }
    }

    /// Counts as a tap.
    pub fn is_tap(&self) -> bool {
        self.action == MouseAction::Down && self.button == MouseButton::Left
    }
}

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// Unified event type
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Mouse(MouseEvent),
    Key(KeyboardEvent),
    /// Bracketed paste
    Paste(String),
    /// Terminal resize (new width, height)
    Resize(u16, u16),
    /// No event or unhandled event type
    None,
}

// =============================================================================
// CONVERSION
// =============================================================================

/// Convert crossterm KeyEvent to our KeyboardEvent
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        _ => String::new(),
    };

    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    KeyboardEvent {
        key,
        modifiers: convert_modifiers(event.modifiers),
        state,
    }
}

/// Convert crossterm MouseEvent to our MouseEvent
pub fn convert_mouse_event(event: CrosstermMouseEvent) -> MouseEvent {
    let (action, button) = match event.kind {
        MouseEventKind::Down(btn) => (MouseAction::Down, convert_mouse_button(btn)),
        MouseEventKind::Up(btn) => (MouseAction::Up, convert_mouse_button(btn)),
        MouseEventKind::Drag(btn) => (MouseAction::Drag, convert_mouse_button(btn)),
        MouseEventKind::Moved => (MouseAction::Move, MouseButton::None),
        _ => (MouseAction::Scroll, MouseButton::None),
    };

    MouseEvent {
        action,
        button,
        x: event.column,
        y: event.row,
        modifiers: convert_modifiers(event.modifiers),
    }
}

fn convert_mouse_button(btn: CrosstermMouseButton) -> MouseButton {
    match btn {
        CrosstermMouseButton::Left => MouseButton::Left,
        CrosstermMouseButton::Right => MouseButton::Right,
        CrosstermMouseButton::Middle => MouseButton::Middle,
    }
}

fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: mods.contains(KeyModifiers::META) || mods.contains(KeyModifiers::SUPER),
    }
}

/// Convert any crossterm event.
pub fn convert_event(event: CrosstermEvent) -> InputEvent {
    match event {
        CrosstermEvent::Mouse(mouse) => InputEvent::Mouse(convert_mouse_event(mouse)),
        CrosstermEvent::Key(key) => InputEvent::Key(convert_key_event(key)),
        CrosstermEvent::Paste(text) => InputEvent::Paste(text),
        CrosstermEvent::Resize(w, h) => InputEvent::Resize(w, h),
        _ => InputEvent::None,
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout. Returns None if nothing arrived.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event()?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event() -> std::io::Result<InputEvent> {
    Ok(convert_event(read()?))
}

pub fn enable_mouse() -> std::io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

pub fn disable_mouse() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> CrosstermKeyEvent {
        CrosstermKeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_convert_char() {
        let ev = convert_key_event(key(KeyCode::Char('a'), KeyModifiers::NONE));
        assert_eq!(ev.key, "a");
        assert_eq!(ev.char(), Some('a'));
        assert!(ev.is_down());
    }

    #[test]
    fn test_convert_named_keys() {
        assert_eq!(convert_key_event(key(KeyCode::Backspace, KeyModifiers::NONE)).key, "Backspace");
        assert_eq!(convert_key_event(key(KeyCode::Enter, KeyModifiers::NONE)).key, "Enter");
        assert_eq!(convert_key_event(key(KeyCode::Left, KeyModifiers::NONE)).key, "ArrowLeft");
        assert_eq!(convert_key_event(key(KeyCode::Enter, KeyModifiers::NONE)).char(), None);
    }

    #[test]
    fn test_convert_modifiers() {
        let ev = convert_key_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(ev.modifiers.ctrl);
        assert!(ev.modifiers.is_command());
        let ev = convert_key_event(key(KeyCode::Char('C'), KeyModifiers::SHIFT));
        assert!(!ev.modifiers.is_command());
    }

    #[test]
    fn test_convert_mouse_down() {
        let ev = convert_mouse_event(CrosstermMouseEvent {
            kind: MouseEventKind::Down(CrosstermMouseButton::Left),
            column: 3,
            row: 2,
            modifiers: KeyModifiers::NONE,
        });
        assert!(ev.is_tap());
        assert_eq!((ev.x, ev.y), (3, 2));
    }

    #[test]
    fn test_convert_resize() {
        assert_eq!(convert_event(CrosstermEvent::Resize(80, 24)), InputEvent::Resize(80, 24));
    }
}
