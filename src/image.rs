//! Chip images and the pluggable loader that resolves them.
//!
//! The field never fetches anything itself. When a chip needs an image it
//! hands an [`ImageTicket`] plus the reference string to the host's
//! [`ImageLoader`]; later the host passes the ticket back with the result
//! through `TagsField::resolve_image`. Each chip keeps at most one request
//! in flight. Assigning a new reference bumps the chip's generation and
//! cancels the old ticket, so a late answer for the old reference is
//! recognised as stale and dropped.
//!
//! Failed loads leave the placeholder in place. There is no retry.

use std::fmt;
use std::sync::Arc;

use crate::types::{Rgba, Size};

// =============================================================================
// IMAGE
// =============================================================================

/// What an image draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageContent {
    /// A single glyph, drawn in the chip's foreground color.
    Glyph(char),
    /// Row-major block of colored cells (`size.width * size.height` entries).
    Pixels(Arc<[Rgba]>),
}

/// A resolved bitmap, in cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub size: Size,
    pub content: ImageContent,
}

impl Image {
    /// Glyph shown until a request resolves.
    pub const PLACEHOLDER_GLYPH: char = '◉';

    pub fn placeholder() -> Self {
        Self::glyph(Self::PLACEHOLDER_GLYPH)
    }

    pub fn glyph(c: char) -> Self {
        Self {
            size: Size::new(1, 1),
            content: ImageContent::Glyph(c),
        }
    }

    /// Build a pixel image. Missing pixels are padded transparent, extra ones dropped.
    pub fn pixels(size: Size, pixels: impl IntoIterator<Item = Rgba>) -> Self {
        let count = size.width as usize * size.height as usize;
        let mut data: Vec<Rgba> = pixels.into_iter().take(count).collect();
        data.resize(count, Rgba::TRANSPARENT);
        Self {
            size,
            content: ImageContent::Pixels(data.into()),
        }
    }

    /// Pixel at (x, y), if this is a pixel image.
    pub fn pixel(&self, x: u16, y: u16) -> Option<Rgba> {
        match &self.content {
            ImageContent::Pixels(data) if x < self.size.width && y < self.size.height => {
                data.get(y as usize * self.size.width as usize + x as usize).copied()
            }
            _ => None,
        }
    }
}

// =============================================================================
// LOADING
// =============================================================================

/// Stable identity of a chip inside one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChipId(pub u64);

impl fmt::Display for ChipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chip#{}", self.0)
    }
}

/// Handle for one outstanding image request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageTicket {
    pub chip: ChipId,
    pub generation: u64,
}

/// Why a load failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageLoadError {
    #[error("image not found: {0}")]
    NotFound(String),
    #[error("could not decode image: {0}")]
    Decode(String),
    #[error("i/o error while loading image: {0}")]
    Io(String),
}

/// Host-side collaborator that turns references into images.
///
/// `request` must not call back into the field synchronously; deliver the
/// result later with `TagsField::resolve_image`.
pub trait ImageLoader {
    /// Start resolving `reference`. Answer with the same ticket.
    fn request(&mut self, ticket: ImageTicket, reference: &str);

    /// The ticket's answer is no longer wanted.
    fn cancel(&mut self, _ticket: ImageTicket) {}
}

// =============================================================================
// PER-CHIP SLOT
// =============================================================================

/// A chip's image state: what is shown and which request is outstanding.
#[derive(Debug, Clone)]
pub struct ImageSlot {
    image: Image,
    reference: Option<String>,
    generation: u64,
    pending: Option<ImageTicket>,
    /// A request went out for the current reference.
    requested: bool,
}

impl Default for ImageSlot {
    fn default() -> Self {
        Self {
            image: Image::placeholder(),
            reference: None,
            generation: 0,
            pending: None,
            requested: false,
        }
    }
}

impl ImageSlot {
    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn pending(&self) -> Option<ImageTicket> {
        self.pending
    }

    /// Replace the shown image directly (host-decorated chips).
    pub fn set_image(&mut self, image: Image) {
        self.image = image;
    }

    /// Point the slot at a new reference.
    ///
    /// Cancels whatever was outstanding, shows the placeholder and, when a
    /// loader is given, issues a fresh request.
    pub fn assign(
        &mut self,
        chip: ChipId,
        reference: Option<String>,
        loader: Option<&mut dyn ImageLoader>,
    ) {
        let mut loader = loader;
        if let Some(old) = self.pending.take() {
            if let Some(loader) = loader.as_deref_mut() {
                loader.cancel(old);
            }
        }

        self.generation += 1;
        self.reference = reference;
        self.image = Image::placeholder();
        self.requested = false;

        if let Some(loader) = loader {
            self.request_missing(chip, loader);
        }
    }

    /// Issue the request for the current reference unless one already went
    /// out. Returns true when a request was made.
    pub fn request_missing(&mut self, chip: ChipId, loader: &mut dyn ImageLoader) -> bool {
        if self.requested {
            return false;
        }
        let Some(reference) = self.reference.as_deref() else {
            return false;
        };
        let ticket = ImageTicket {
            chip,
            generation: self.generation,
        };
        self.pending = Some(ticket);
        self.requested = true;
        loader.request(ticket, reference);
        true
    }

    /// Cancel the outstanding request, if any.
    pub fn cancel(&mut self, loader: Option<&mut dyn ImageLoader>) {
        if let Some(ticket) = self.pending.take() {
            if let Some(loader) = loader {
                loader.cancel(ticket);
            }
        }
        self.generation += 1;
    }

    /// Apply a loader answer. Returns true when it changed the shown image.
    ///
    /// Answers for anything but the outstanding ticket are ignored. A failure
    /// clears the outstanding ticket and keeps the placeholder.
    pub fn resolve(&mut self, ticket: ImageTicket, result: Result<Image, ImageLoadError>) -> bool {
        if self.pending != Some(ticket) {
            log::debug!(
                "{}: discarding stale image result (generation {}, current {})",
                ticket.chip,
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.pending = None;

        match result {
            Ok(image) => {
                log::debug!("{}: image resolved ({}x{})", ticket.chip, image.size.width, image.size.height);
                self.image = image;
                true
            }
            Err(err) => {
                log::warn!("{}: {}", ticket.chip, err);
                false
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingLoader {
        requested: Vec<(ImageTicket, String)>,
        cancelled: Vec<ImageTicket>,
    }

    impl ImageLoader for RecordingLoader {
        fn request(&mut self, ticket: ImageTicket, reference: &str) {
            self.requested.push((ticket, reference.to_string()));
        }

        fn cancel(&mut self, ticket: ImageTicket) {
            self.cancelled.push(ticket);
        }
    }

    const CHIP: ChipId = ChipId(1);

    #[test]
    fn test_assign_requests() {
        let mut loader = RecordingLoader::default();
        let mut slot = ImageSlot::default();
        slot.assign(CHIP, Some("u1".into()), Some(&mut loader));

        assert_eq!(loader.requested.len(), 1);
        assert_eq!(loader.requested[0].1, "u1");
        assert_eq!(slot.pending(), Some(loader.requested[0].0));
        assert_eq!(slot.image(), &Image::placeholder());
    }

    #[test]
    fn test_resolve_applies() {
        let mut loader = RecordingLoader::default();
        let mut slot = ImageSlot::default();
        slot.assign(CHIP, Some("u1".into()), Some(&mut loader));
        let ticket = loader.requested[0].0;

        assert!(slot.resolve(ticket, Ok(Image::glyph('★'))));
        assert_eq!(slot.image(), &Image::glyph('★'));
        assert_eq!(slot.pending(), None);
    }

    #[test]
    fn test_reassign_discards_stale() {
        let mut loader = RecordingLoader::default();
        let mut slot = ImageSlot::default();
        slot.assign(CHIP, Some("u1".into()), Some(&mut loader));
        let first = loader.requested[0].0;
        slot.assign(CHIP, Some("u2".into()), Some(&mut loader));
        let second = loader.requested[1].0;

        assert_eq!(loader.cancelled, vec![first]);
        assert!(!slot.resolve(first, Ok(Image::glyph('A'))));
        assert_eq!(slot.image(), &Image::placeholder());
        assert!(slot.resolve(second, Ok(Image::glyph('B'))));
        assert_eq!(slot.image(), &Image::glyph('B'));
    }

    #[test]
    fn test_failure_keeps_placeholder() {
        let mut loader = RecordingLoader::default();
        let mut slot = ImageSlot::default();
        slot.assign(CHIP, Some("u1".into()), Some(&mut loader));
        let ticket = loader.requested[0].0;

        assert!(!slot.resolve(ticket, Err(ImageLoadError::NotFound("u1".into()))));
        assert_eq!(slot.image(), &Image::placeholder());
        assert_eq!(slot.pending(), None);
        // A second answer for the same ticket is stale now.
        assert!(!slot.resolve(ticket, Ok(Image::glyph('x'))));
    }

    #[test]
    fn test_assign_without_loader() {
        let mut slot = ImageSlot::default();
        slot.assign(CHIP, Some("u1".into()), None);
        assert_eq!(slot.reference(), Some("u1"));
        assert_eq!(slot.pending(), None);
    }

    #[test]
    fn test_late_loader_requests_once() {
        let mut loader = RecordingLoader::default();
        let mut slot = ImageSlot::default();
        slot.assign(CHIP, Some("u1".into()), None);

        assert!(slot.request_missing(CHIP, &mut loader));
        assert!(!slot.request_missing(CHIP, &mut loader));
        assert_eq!(loader.requested.len(), 1);
        assert_eq!(loader.requested[0].1, "u1");

        let ticket = loader.requested[0].0;
        assert!(slot.resolve(ticket, Ok(Image::glyph('★'))));
        assert!(!slot.request_missing(CHIP, &mut loader));
    }

    #[test]
    fn test_no_reference_no_request() {
        let mut loader = RecordingLoader::default();
        let mut slot = ImageSlot::default();
        assert!(!slot.request_missing(CHIP, &mut loader));
        assert!(loader.requested.is_empty());
    }

    #[test]
    fn test_pixels_padded() {
        let img = Image::pixels(Size::new(2, 2), [Rgba::RED]);
        assert_eq!(img.pixel(0, 0), Some(Rgba::RED));
        assert_eq!(img.pixel(1, 1), Some(Rgba::TRANSPARENT));
        assert_eq!(img.pixel(2, 0), None);
    }
}
