//! Canonical symbols and the factory that mints them.
//!
//! Resolution replaces every name occurrence with a symbol. Definition,
//! enum, table, and hole symbols are deterministic: constructing the same
//! (namespace, ident) pair twice yields equal symbols, so equality *is*
//! identity. Variable symbols are the opposite: each one is unique and
//! compares by its id alone.
//!
//! The [`SymbolFactory`] is the only source of fresh identity in a
//! compilation unit and the only mutable state in the whole pipeline. It is
//! passed by `&mut` through the passes that need it; there are no ambient
//! globals.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::foundation::name::NsPath;
use crate::foundation::span::Span;

macro_rules! named_symbol {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Serialize, Deserialize)]
        pub struct $name {
            pub namespace: NsPath,
            pub ident: String,
            /// Defining occurrence. Not part of the symbol's identity.
            pub span: Span,
        }

        impl $name {
            pub fn new(namespace: NsPath, ident: impl Into<String>, span: Span) -> Self {
                Self {
                    namespace,
                    ident: ident.into(),
                    span,
                }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.namespace == other.namespace && self.ident == other.ident
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.namespace.hash(state);
                self.ident.hash(state);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.namespace.is_root() {
                    write!(f, "{}", self.ident)
                } else {
                    write!(f, "{}.{}", self.namespace, self.ident)
                }
            }
        }
    };
}

named_symbol! {
    /// Symbol of a top-level definition (or hook).
    DefnSym
}

named_symbol! {
    /// Symbol of an enum declaration.
    EnumSym
}

named_symbol! {
    /// Symbol of a table or lattice declaration.
    TableSym
}

named_symbol! {
    /// Symbol of a `?hole` expression, named after the hole.
    HoleSym
}

/// Symbol of a bound variable.
///
/// Compares and hashes by its unique id; the text is for diagnostics only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarSym {
    pub id: u64,
    pub text: String,
}

impl PartialEq for VarSym {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for VarSym {}

impl Hash for VarSym {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for VarSym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}${}", self.text, self.id)
    }
}

/// Mints symbols for one compilation unit.
///
/// Deterministic constructors (`defn_sym`, `enum_sym`, `table_sym`,
/// `hole_sym`) do not consume the counter. Fresh constructors
/// (`fresh_var_sym`, `fresh_type_var`) are monotonic: no two calls within a
/// unit return equal results.
#[derive(Debug, Default)]
pub struct SymbolFactory {
    next: u64,
}

impl SymbolFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic definition symbol. Same inputs, same symbol.
    pub fn defn_sym(&self, namespace: NsPath, ident: impl Into<String>, span: Span) -> DefnSym {
        DefnSym::new(namespace, ident, span)
    }

    /// Deterministic enum symbol.
    pub fn enum_sym(&self, namespace: NsPath, ident: impl Into<String>, span: Span) -> EnumSym {
        EnumSym::new(namespace, ident, span)
    }

    /// Deterministic table symbol.
    pub fn table_sym(&self, namespace: NsPath, ident: impl Into<String>, span: Span) -> TableSym {
        TableSym::new(namespace, ident, span)
    }

    /// Deterministic hole symbol in the enclosing namespace.
    pub fn hole_sym(&self, namespace: NsPath, ident: impl Into<String>, span: Span) -> HoleSym {
        HoleSym::new(namespace, ident, span)
    }

    /// A variable symbol distinct from every other ever returned by this
    /// factory.
    pub fn fresh_var_sym(&mut self, prefix: &str) -> VarSym {
        let id = self.bump();
        VarSym {
            id,
            text: prefix.to_string(),
        }
    }

    /// A fresh type variable id, for synthesized polymorphic schemes.
    pub fn fresh_type_var(&mut self) -> u64 {
        self.bump()
    }

    fn bump(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}
