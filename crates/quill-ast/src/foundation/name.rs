//! Namespace paths and qualified names.
//!
//! Quill programs are organized into dot-separated namespaces:
//! `A.B.f` names the definition `f` inside namespace `A.B`. The compiler
//! uses [`NsPath`] as the key for every per-namespace table and [`QName`]
//! for every reference a user writes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A hierarchical namespace path.
///
/// Paths are immutable and support cheap comparison and hashing, which
/// makes them usable as map keys throughout resolution. The empty path is
/// the root namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NsPath {
    segments: Vec<String>,
}

impl NsPath {
    /// Create a path from a vector of segments.
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// The root namespace (no segments).
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dot-separated path. An empty string is the root namespace.
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            return Self::root();
        }
        Self {
            segments: s.split('.').map(String::from).collect(),
        }
    }

    /// The path segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True for the root namespace.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Extend with one more segment, returning a new path.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// The enclosing namespace, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            None
        } else {
            Some(Self::new(self.segments[..self.segments.len() - 1].to_vec()))
        }
    }

    /// True iff `self` is `prefix` or lies below it.
    ///
    /// Every path starts with the root namespace.
    pub fn starts_with(&self, prefix: &NsPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for NsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

impl From<&str> for NsPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

/// A possibly-qualified name: a namespace prefix plus a terminal identifier.
///
/// `A.B.f` parses as namespace `A.B`, ident `f`; a bare `f` has the root
/// namespace as its prefix and is *unqualified*.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QName {
    pub namespace: NsPath,
    pub ident: String,
}

impl QName {
    pub fn new(namespace: NsPath, ident: impl Into<String>) -> Self {
        Self {
            namespace,
            ident: ident.into(),
        }
    }

    /// Parse a dotted name; everything before the last dot is the namespace.
    pub fn parse(s: &str) -> Self {
        match s.rfind('.') {
            Some(i) => Self::new(NsPath::parse(&s[..i]), &s[i + 1..]),
            None => Self::new(NsPath::root(), s),
        }
    }

    /// True iff the name carries an explicit namespace prefix.
    pub fn is_qualified(&self) -> bool {
        !self.namespace.is_root()
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_root() {
            write!(f, "{}", self.ident)
        } else {
            write!(f, "{}.{}", self.namespace, self.ident)
        }
    }
}

impl From<&str> for QName {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}
