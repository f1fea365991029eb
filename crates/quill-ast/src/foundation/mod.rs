//! Foundation types shared by every pipeline stage.

pub mod name;
pub mod span;
pub mod symbol;

pub use name::{NsPath, QName};
pub use span::{SourceFile, SourceMap, Span};
pub use symbol::{DefnSym, EnumSym, HoleSym, SymbolFactory, TableSym, VarSym};
