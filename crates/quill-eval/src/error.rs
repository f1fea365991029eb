//! Internal evaluator errors.
//!
//! These are compiler invariant violations, not user errors: a
//! well-resolved, well-simplified program never triggers them. They abort
//! the pass with a diagnostic naming the offending construct.

use thiserror::Error;

use quill_ast::foundation::span::Span;
use quill_ast::foundation::symbol::DefnSym;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("unresolved variable '{name}' during specialization")]
    UnresolvedVariable { name: String, span: Span },

    #[error("unresolved reference '{sym}' during specialization")]
    UnresolvedReference { sym: DefnSym, span: Span },
}
