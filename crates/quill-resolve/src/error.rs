//! Resolution diagnostics.
//!
//! Every user-facing resolution error carries the offending name, the
//! namespace the reference was made from, and a source span. Errors are
//! accumulated into a `Vec` rather than short-circuiting, so one pass
//! produces as many diagnostics as possible.

use thiserror::Error;

use quill_ast::foundation::name::{NsPath, QName};
use quill_ast::foundation::span::Span;

/// A user-facing resolution error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("undefined definition '{name}' referenced from namespace {ns}")]
    UndefinedDef { name: QName, ns: NsPath, span: Span },

    #[error("undefined table '{name}' referenced from namespace {ns}")]
    UndefinedTable { name: QName, ns: NsPath, span: Span },

    #[error("undefined type '{name}' referenced from namespace {ns}")]
    UndefinedType { name: QName, ns: NsPath, span: Span },

    #[error("undefined tag '{tag}' referenced from namespace {ns}")]
    UndefinedTag { tag: String, ns: NsPath, span: Span },

    #[error("ambiguous reference '{name}' from namespace {ns}")]
    AmbiguousRef {
        name: QName,
        ns: NsPath,
        span: Span,
        /// Candidate defining occurrences, in ascending source order.
        locations: Vec<Span>,
    },

    #[error("tag '{tag}' is declared by multiple enums visible from {ns}")]
    AmbiguousTag {
        tag: String,
        ns: NsPath,
        span: Span,
        /// Candidate declaring enums, in ascending source order.
        locations: Vec<Span>,
    },

    #[error("definition '{name}' is not accessible from namespace {ns}")]
    InaccessibleDef { name: QName, ns: NsPath, span: Span },

    #[error("enum '{name}' is not accessible from namespace {ns}")]
    InaccessibleEnum { name: QName, ns: NsPath, span: Span },
}

impl ResolveError {
    /// The primary source location of this diagnostic.
    pub fn span(&self) -> Span {
        match self {
            ResolveError::UndefinedDef { span, .. }
            | ResolveError::UndefinedTable { span, .. }
            | ResolveError::UndefinedType { span, .. }
            | ResolveError::UndefinedTag { span, .. }
            | ResolveError::AmbiguousRef { span, .. }
            | ResolveError::AmbiguousTag { span, .. }
            | ResolveError::InaccessibleDef { span, .. }
            | ResolveError::InaccessibleEnum { span, .. } => *span,
        }
    }
}

/// Combines two independently-resolved subtrees, accumulating the errors
/// of both when either fails.
pub fn merge2<A, B>(
    a: Result<A, Vec<ResolveError>>,
    b: Result<B, Vec<ResolveError>>,
) -> Result<(A, B), Vec<ResolveError>> {
    match (a, b) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(mut ea), Err(mut eb)) => {
            ea.append(&mut eb);
            Err(ea)
        }
        (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
    }
}

/// Combines a sequence of independently-resolved subtrees, accumulating
/// every error.
pub fn merge_all<T>(
    items: impl IntoIterator<Item = Result<T, Vec<ResolveError>>>,
) -> Result<Vec<T>, Vec<ResolveError>> {
    let mut oks = Vec::new();
    let mut errors = Vec::new();
    for item in items {
        match item {
            Ok(v) => oks.push(v),
            Err(mut e) => errors.append(&mut e),
        }
    }
    if errors.is_empty() {
        Ok(oks)
    } else {
        Err(errors)
    }
}
