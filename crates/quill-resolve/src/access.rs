//! Accessibility oracle.
//!
//! A symbol declared in namespace `N` is visible from namespace `M` iff it
//! is marked public, or `M` is `N` itself or a descendant of it. Non-public
//! members are therefore inherited downward but never visible upward or
//! sideways.

use quill_ast::foundation::name::NsPath;

/// Decides whether a symbol declared in `declared_in` with the given
/// visibility is accessible from `from`.
pub fn is_accessible(declared_in: &NsPath, public: bool, from: &NsPath) -> bool {
    public || from.starts_with(declared_in)
}
