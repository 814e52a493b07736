//! Detents: named resting heights for the sheet.

use std::fmt;
use std::rc::Rc;

/// Identifier of a detent, unique within a configured set.
///
/// Cheap to clone; the engine is single-threaded so the backing storage is
/// an `Rc<str>`. Equality and hashing are by string value.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DetentId(Rc<str>);

impl DetentId {
    pub fn new(raw: impl Into<Rc<str>>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Tracks the content's own preferred height.
    pub fn content() -> Self {
        Self::new("content")
    }

    pub fn medium() -> Self {
        Self::new("medium")
    }

    pub fn large() -> Self {
        Self::new("large")
    }

    pub fn max() -> Self {
        Self::new("max")
    }
}

impl fmt::Debug for DetentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DetentId({})", self.0)
    }
}

impl fmt::Display for DetentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DetentId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Symbolic height request for a detent, resolved against container
/// geometry by the layout resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeightSpec {
    /// Full extent, leaving `inset` logical pixels below the safe-area top.
    /// An inset of 0 is the tallest possible sheet.
    MaxWithTopInset(f32),
    /// A fixed content height in logical pixels, measured up from the
    /// container bottom.
    Fixed(f32),
    /// Tall enough to show the embedded scroll region's full content.
    /// Falls back to the top anchor when no scroll region is configured.
    FitsScrollContent,
    /// Tall enough for the content's best-fit height at container width.
    FitsIntrinsicContent,
    /// `FitsScrollContent` when a scroll region exists, else
    /// `FitsIntrinsicContent`.
    Content,
}

impl HeightSpec {
    pub const MAX: HeightSpec = HeightSpec::MaxWithTopInset(0.0);
}

/// A named resting position. Immutable value object; equality is by
/// identifier plus height spec.
#[derive(Debug, Clone, PartialEq)]
pub struct Detent {
    pub id: DetentId,
    pub height: HeightSpec,
}

impl Detent {
    pub fn new(id: impl Into<DetentId>, height: HeightSpec) -> Self {
        Self {
            id: id.into(),
            height,
        }
    }
}

impl fmt::Display for Detent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.id, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detent_equality_is_id_plus_spec() {
        let a = Detent::new("medium", HeightSpec::Fixed(200.0));
        let b = Detent::new("medium", HeightSpec::Fixed(200.0));
        let c = Detent::new("medium", HeightSpec::Fixed(300.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn detent_ids_compare_by_value() {
        assert_eq!(DetentId::new("large"), DetentId::large());
        assert_ne!(DetentId::medium(), DetentId::large());
    }
}
