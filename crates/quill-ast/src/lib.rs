//! # Quill AST
//!
//! AST and foundation types for the Quill compiler middle-end.
//!
//! The compiler pipeline consumes and produces three program shapes, all
//! defined here:
//!
//! ```text
//! Parse (external) → surface::Program
//!                        ↓  resolution (quill-resolve)
//!                    resolved::Program
//!                        ↓  inference + simplification (external)
//!                    simplified::Program
//!                        ↓  partial evaluation (quill-eval)
//!                    simplified::Program (residuals intact)
//! ```
//!
//! The `foundation` module carries the pieces shared by every shape:
//! namespace paths, qualified names, source spans, and the symbol factory
//! that mints every identity in a compilation unit.

pub mod foundation;
pub mod op;
pub mod resolved;
pub mod simplified;
pub mod surface;
pub mod types;

pub use foundation::name::{NsPath, QName};
pub use foundation::span::{SourceFile, SourceMap, Span};
pub use foundation::symbol::{DefnSym, EnumSym, HoleSym, SymbolFactory, TableSym, VarSym};
pub use types::{Kind, Scheme, Type};
