//! Source location tracking.
//!
//! Every AST node, symbol, and diagnostic carries a [`Span`]: a compact
//! byte range into a file registered with the [`SourceMap`]. The map turns
//! spans back into paths, line/column pairs, and snippets when diagnostics
//! are rendered.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Compact reference to a byte range in a source file.
///
/// Spans order by (file, start offset), which is the order diagnostics are
/// listed in when a pass reports several candidates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Span {
    /// Index into [`SourceMap`] files.
    pub file: u16,
    /// Byte offset of the first covered byte.
    pub start: u32,
    /// Byte offset one past the last covered byte.
    pub end: u32,
}

impl Span {
    pub fn new(file: u16, start: u32, end: u32) -> Self {
        Self { file, start, end }
    }

    /// Zero-length span at the start of a file, for synthesized nodes.
    pub fn synthetic(file: u16) -> Self {
        Self::new(file, 0, 0)
    }

    /// Smallest span covering both `self` and `other`.
    ///
    /// # Panics
    /// Panics if the spans come from different files.
    pub fn cover(&self, other: &Span) -> Span {
        assert_eq!(self.file, other.file, "cannot cover spans across files");
        Span {
            file: self.file,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// All source files of a compilation unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

/// One source file with a precomputed line index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
    /// Byte offset of each line start; `[0]` is always 0 and the final
    /// entry is the EOF sentinel.
    line_starts: Vec<u32>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file and return its id for use in spans.
    pub fn add(&mut self, path: PathBuf, text: String) -> u16 {
        let id = self.files.len();
        assert!(id < u16::MAX as usize, "too many source files");
        self.files.push(SourceFile::new(path, text));
        id as u16
    }

    pub fn file(&self, span: &Span) -> &SourceFile {
        &self.files[span.file as usize]
    }

    pub fn path(&self, span: &Span) -> &Path {
        &self.files[span.file as usize].path
    }

    /// The text the span covers.
    pub fn snippet(&self, span: &Span) -> &str {
        let file = &self.files[span.file as usize];
        &file.text[span.start as usize..span.end as usize]
    }

    /// 1-based (line, column) of the span start.
    pub fn line_col(&self, span: &Span) -> (u32, u32) {
        self.files[span.file as usize].line_col(span.start)
    }
}

impl SourceFile {
    pub fn new(path: PathBuf, text: String) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        if line_starts.last() != Some(&(text.len() as u32)) {
            line_starts.push(text.len() as u32);
        }
        Self {
            path,
            text,
            line_starts,
        }
    }

    /// 1-based (line, column) for a byte offset.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.max(1) - 1,
        };
        let line = line_idx as u32 + 1;
        let col = offset - self.line_starts[line_idx] + 1;
        (line, col)
    }
}
