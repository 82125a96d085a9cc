//! Resolved segment chains used for write-back and dependency keys

use crate::context::Context;
use serde::{Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;

/// One segment of a resolved path
#[derive(Clone)]
pub enum Segment {
    /// Property name
    Key(String),
    /// Array index captured at resolve time
    Index(usize),
    /// Floating index of an iteration context
    ///
    /// Rendered with the context's current item each time the path is
    /// turned into a string, so a cached path follows reordered items.
    Item(Context),
    /// Any descendant, used by function argument dependencies
    Wildcard,
}

impl Segment {
    /// Create a key segment
    pub fn key(name: impl Into<String>) -> Self {
        Self::Key(name.into())
    }

    /// Current textual key of the segment
    pub fn current_key(&self) -> String {
        match self {
            Self::Key(name) => name.clone(),
            Self::Index(index) => index.to_string(),
            Self::Item(context) => context.item().map(|i| i.to_string()).unwrap_or_default(),
            Self::Wildcard => "*".to_string(),
        }
    }

    /// Check if this segment floats with an iteration context
    pub fn is_floating(&self) -> bool {
        matches!(self, Self::Item(_))
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Key(a), Self::Key(b)) => a == b,
            (Self::Index(a), Self::Index(b)) => a == b,
            (Self::Item(a), Self::Item(b)) => a.ptr_eq(b),
            (Self::Wildcard, Self::Wildcard) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(name) => write!(f, "{name:?}"),
            Self::Index(index) => write!(f, "{index}"),
            Self::Item(context) => match context.item() {
                Some(item) => write!(f, "Item({item})"),
                None => write!(f, "Item(?)"),
            },
            Self::Wildcard => write!(f, "*"),
        }
    }
}

impl From<&str> for Segment {
    fn from(name: &str) -> Self {
        Self::Key(name.to_string())
    }
}

impl From<String> for Segment {
    fn from(name: String) -> Self {
        Self::Key(name)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl Serialize for Segment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Index(index) => serializer.serialize_u64(*index as u64),
            Self::Item(context) => match context.item() {
                Some(item) => serializer.serialize_u64(item as u64),
                None => serializer.serialize_none(),
            },
            other => serializer.serialize_str(&other.current_key()),
        }
    }
}

/// Canonical location of a value, as an ordered segment chain
#[derive(Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedPath {
    segments: SmallVec<[Segment; 4]>,
}

impl ResolvedPath {
    /// Create an empty path (the root)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a path from key segments
    pub fn from_keys<S: AsRef<str>>(keys: &[S]) -> Self {
        keys.iter().map(|key| Segment::key(key.as_ref())).collect()
    }

    /// Get the segments
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Get the number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if this is the root path
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get the last segment
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Append a segment
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Append property names
    pub fn extend_keys<S: AsRef<str>>(&mut self, keys: &[S]) {
        self.segments.extend(keys.iter().map(|key| Segment::key(key.as_ref())));
    }

    /// Append a segment, returning the extended path
    pub fn with(mut self, segment: Segment) -> Self {
        self.push(segment);
        self
    }

    /// Check if this path ends in a wildcard
    pub fn is_wildcard(&self) -> bool {
        matches!(self.last(), Some(Segment::Wildcard))
    }

    /// Current keys of every segment
    pub fn keys(&self) -> Vec<String> {
        self.segments.iter().map(Segment::current_key).collect()
    }

    /// Join the current keys with a delimiter
    pub fn to_path_string(&self, delimiter: &str) -> String {
        self.keys().join(delimiter)
    }
}

impl FromIterator<Segment> for ResolvedPath {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl Extend<Segment> for ResolvedPath {
    fn extend<I: IntoIterator<Item = Segment>>(&mut self, iter: I) {
        self.segments.extend(iter);
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path_string("."))
    }
}

impl fmt::Debug for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.segments.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_path_string() {
        let mut path = ResolvedPath::from_keys(&["items"]);
        path.push(Segment::Index(2));
        path.extend_keys(&["name"]);
        assert_eq!(path.to_path_string("."), "items.2.name");
        assert_eq!(path.to_string(), "items.2.name");
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_wildcard() {
        let path = ResolvedPath::from_keys(&["list"]).with(Segment::Wildcard);
        assert!(path.is_wildcard());
        assert_eq!(path.to_string(), "list.*");
        assert!(!ResolvedPath::new().is_wildcard());
    }

    #[test]
    fn test_serialize_segments() {
        let path = ResolvedPath::from_keys(&["a"]).with(Segment::Index(1));
        assert_eq!(
            serde_json::to_value(&path).unwrap_or_default(),
            serde_json::json!(["a", 1])
        );
    }
}
