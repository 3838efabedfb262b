use std::fmt;

use crate::error::StorageError;

const SEPARATOR: char = '/';

/// Location of a directory inside the remote storage root.
///
/// An empty segment list is the root. Values are replaced wholesale on
/// navigation and never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RemotePath {
    segments: Vec<String>,
}

impl RemotePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses a `/`-separated string, ignoring empty segments so that
    /// `"/docs/"`, `"docs"` and `"docs//"` all name the same directory.
    pub fn parse(raw: &str) -> Result<Self, StorageError> {
        raw.split(SEPARATOR)
            .filter(|s| !s.is_empty())
            .try_fold(Self::root(), |path, segment| path.descend(segment))
    }

    pub fn descend(&self, child: &str) -> Result<Self, StorageError> {
        validate_segment(child)?;
        let mut segments = self.segments.clone();
        segments.push(child.to_string());
        Ok(Self { segments })
    }

    /// Parent path; the root is its own parent.
    pub fn ascend(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Value sent as `userPath`: segments joined by `/`, empty at the root.
    pub fn as_query(&self) -> String {
        self.segments.join("/")
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.as_query())
    }
}

pub fn validate_segment(segment: &str) -> Result<(), StorageError> {
    if segment.is_empty() || segment.contains(SEPARATOR) || segment == "." || segment == ".." {
        return Err(StorageError::InvalidSegment(segment.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_displays_as_slash() {
        let root = RemotePath::root();
        assert!(root.is_root());
        assert_eq!(root.to_string(), "/");
        assert_eq!(root.as_query(), "");
    }

    #[test]
    fn nested_path_joins_segments() {
        let path = RemotePath::root()
            .descend("docs")
            .and_then(|p| p.descend("2024"))
            .expect("valid segments");
        assert_eq!(path.to_string(), "/docs/2024");
        assert_eq!(path.as_query(), "docs/2024");
        assert_eq!(path.segments(), ["docs".to_string(), "2024".to_string()]);
    }

    #[test]
    fn descend_then_ascend_is_identity() {
        let start = RemotePath::parse("a/b").expect("parse");
        for name in ["c", "with space", "ünïcødé", "x.tar.gz"] {
            let child = start.descend(name).expect("valid");
            assert_eq!(child.ascend(), start);
        }
    }

    #[test]
    fn ascend_at_root_is_noop() {
        assert_eq!(RemotePath::root().ascend(), RemotePath::root());
    }

    #[test]
    fn descend_rejects_bad_segments() {
        let root = RemotePath::root();
        for bad in ["", "a/b", "/", ".", ".."] {
            assert_eq!(
                root.descend(bad),
                Err(StorageError::InvalidSegment(bad.to_string()))
            );
        }
    }

    #[test]
    fn parse_skips_empty_segments() {
        assert_eq!(
            RemotePath::parse("/docs//notes/").expect("parse").as_query(),
            "docs/notes"
        );
        assert!(RemotePath::parse("").expect("parse").is_root());
        assert!(RemotePath::parse("docs/../etc").is_err());
    }
}
