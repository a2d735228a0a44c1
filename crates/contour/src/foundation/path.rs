//! Issue paths
//!
//! A [`Path`] locates a sub-value inside the validated input, outer to
//! inner. Object keys are [`PathSegment::Key`], array indices are
//! [`PathSegment::Index`].

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Array index.
    Index(usize),
    /// Object or record key.
    Key(String),
}

impl PathSegment {
    /// Creates a key segment.
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    /// Creates an index segment.
    #[must_use]
    pub const fn index(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Key(key) => f.write_str(key),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Ordered location of a sub-value, outer to inner.
///
/// Most paths are shallow, so up to four segments live inline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(SmallVec<[PathSegment; 4]>);

impl Path {
    /// The empty path (the validated value itself).
    #[must_use]
    pub fn root() -> Self {
        Self(SmallVec::new())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.0.push(segment.into());
    }

    /// Inserts `segment` in front of every existing segment.
    pub fn prepend(&mut self, segment: PathSegment) {
        self.0.insert(0, segment);
    }

    /// Inserts all of `prefix` in front of every existing segment.
    pub fn prepend_path(&mut self, prefix: &Path) {
        if prefix.is_empty() {
            return;
        }
        self.0.insert_many(0, prefix.0.iter().cloned());
    }

    /// Builder form of [`Path::push`].
    #[must_use = "builder methods must be chained or built"]
    pub fn join(mut self, segment: impl Into<PathSegment>) -> Self {
        self.push(segment);
        self
    }

    /// Renders the path with `.` separators; the root renders as `""`.
    #[must_use]
    pub fn dotted(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromIterator<PathSegment> for Path {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(SmallVec::from_vec(segments))
    }
}

impl From<PathSegment> for Path {
    fn from(segment: PathSegment) -> Self {
        Self::root().join(segment)
    }
}

impl From<&str> for Path {
    fn from(key: &str) -> Self {
        Self::root().join(key)
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_rendering() {
        let path = Path::root().join("items").join(3usize).join("name");
        assert_eq!(path.to_string(), "items.3.name");
        assert_eq!(Path::root().dotted(), "");
    }

    #[test]
    fn test_prepend_keeps_relative_order() {
        let mut path = Path::from("b");
        path.prepend(PathSegment::key("a"));
        path.prepend(PathSegment::index(0));
        assert_eq!(
            path.segments(),
            &[
                PathSegment::index(0),
                PathSegment::key("a"),
                PathSegment::key("b")
            ]
        );
    }

    #[test]
    fn test_prepend_path() {
        let mut path = Path::from("leaf");
        path.prepend_path(&Path::root().join("form").join(2usize));
        assert_eq!(path.to_string(), "form.2.leaf");

        path.prepend_path(&Path::root());
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_serde_mixes_keys_and_indices() {
        let path = Path::root().join("tags").join(1usize);
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json, serde_json::json!(["tags", 1]));

        let back: Path = serde_json::from_value(json).unwrap();
        assert_eq!(back, path);
    }
}
