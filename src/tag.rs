//! Tag - the immutable value behind every chip.
//!
//! A tag is text, an optional image reference and an optional opaque
//! context. Two tags are equal when all three are equal; there is no
//! identity beyond that.
//!
//! # Example
//!
//! ```
//! use spark_tags::Tag;
//!
//! let plain = Tag::new("rust");
//! let with_image = Tag::new("ferris").with_image("https://example.com/ferris.png");
//! let with_context = Tag::new("issue").with_context(4711_u32);
//!
//! assert_eq!(plain, Tag::new("rust"));
//! assert_ne!(with_image, Tag::new("ferris"));
//! assert_eq!(with_context.context().and_then(|c| c.downcast_ref::<u32>()), Some(&4711));
//! ```

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// =============================================================================
// CONTEXT
// =============================================================================

/// Object-safe equality + hashing for context values.
trait ContextValue: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn eq_dyn(&self, other: &dyn ContextValue) -> bool;
    fn hash_dyn(&self, state: &mut dyn Hasher);
}

impl<T> ContextValue for T
where
    T: Any + fmt::Debug + PartialEq + Eq + Hash + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_dyn(&self, other: &dyn ContextValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn hash_dyn(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }
}

/// Opaque, hashable host value attached to a tag.
///
/// Any `Eq + Hash` type works. Contexts of different types are never equal.
#[derive(Clone)]
pub struct TagContext(Arc<dyn ContextValue>);

impl TagContext {
    pub fn new<T>(value: T) -> Self
    where
        T: Any + fmt::Debug + PartialEq + Eq + Hash + Send + Sync,
    {
        Self(Arc::new(value))
    }

    /// Borrow the value if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for TagContext {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_dyn(other.0.as_ref())
    }
}

impl Eq for TagContext {}

impl Hash for TagContext {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.as_any().type_id().hash(state);
        self.0.hash_dyn(state);
    }
}

impl fmt::Debug for TagContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TagContext").field(&self.0).finish()
    }
}

// =============================================================================
// TAG
// =============================================================================

/// One accepted token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    text: String,
    image_ref: Option<String>,
    context: Option<TagContext>,
}

impl Tag {
    /// Create a tag with just text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image_ref: None,
            context: None,
        }
    }

    /// Attach an image reference (URL-like string resolved by the image loader).
    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    /// Attach an opaque context value.
    pub fn with_context<T>(mut self, context: T) -> Self
    where
        T: Any + fmt::Debug + PartialEq + Eq + Hash + Send + Sync,
    {
        self.context = Some(TagContext::new(context));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }

    pub fn context(&self) -> Option<&TagContext> {
        self.context.as_ref()
    }

    /// Structural equality of text, image reference and context.
    pub fn equals(&self, other: &Tag) -> bool {
        self == other
    }
}

impl From<&str> for Tag {
    fn from(text: &str) -> Self {
        Tag::new(text)
    }
}

impl From<String> for Tag {
    fn from(text: String) -> Self {
        Tag::new(text)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equal_text_only() {
        assert_eq!(Tag::new("x"), Tag::new("x"));
        assert!(Tag::new("x").equals(&Tag::new("x")));
        assert_ne!(Tag::new("x"), Tag::new("y"));
    }

    #[test]
    fn test_image_ref_participates() {
        let a = Tag::new("x").with_image("u1");
        let b = Tag::new("x").with_image("u2");
        assert_ne!(a, b);
        assert_ne!(a, Tag::new("x"));
        assert_eq!(a, Tag::new("x").with_image("u1"));
    }

    #[test]
    fn test_context_participates() {
        let a = Tag::new("x").with_context(1_u32);
        assert_eq!(a, Tag::new("x").with_context(1_u32));
        assert_ne!(a, Tag::new("x").with_context(2_u32));
        assert_ne!(a, Tag::new("x"));
    }

    #[test]
    fn test_context_of_different_types_differs() {
        let a = Tag::new("x").with_context(1_u32);
        let b = Tag::new("x").with_context(1_u64);
        assert_ne!(a, b);
    }

    #[test]
    fn test_context_downcast() {
        let tag = Tag::new("x").with_context(String::from("ctx"));
        let ctx = tag.context().and_then(|c| c.downcast_ref::<String>());
        assert_eq!(ctx.map(String::as_str), Some("ctx"));
        assert!(tag.context().and_then(|c| c.downcast_ref::<u32>()).is_none());
    }

    #[test]
    fn test_hash_consistent_with_eq() {
        let mut set = HashSet::new();
        set.insert(Tag::new("x").with_context(7_i32));
        set.insert(Tag::new("x").with_context(7_i32));
        set.insert(Tag::new("x"));
        assert_eq!(set.len(), 2);
    }
}
