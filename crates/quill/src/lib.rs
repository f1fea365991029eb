//! # Quill compiler middle-end
//!
//! Facade over the middle-end of the Quill compiler: name resolution and
//! partial evaluation for a statically typed functional+logic language.
//!
//! This crate re-exports functionality from:
//! - `quill-ast` — foundation types plus the surface, resolved, and
//!   simplified program shapes
//! - `quill-resolve` — the resolution pipeline
//! - `quill-eval` — the partial evaluator and equality oracle
//!
//! ## Architecture
//!
//! ```text
//! quill-ast      - AST + foundation types
//!     ↓
//! quill-resolve  - names → symbols, types, accessibility, tags
//!     ↓
//! quill-eval     - online specialization over the simplified IR
//!     ↓
//! quill (facade) - re-exports + continuation-interface synthesis
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use quill::{resolve_program, SymbolFactory};
//! use quill::ast::surface::Program;
//!
//! let program = Program::new();
//! let mut factory = SymbolFactory::new();
//! let (resolved, _timings) = resolve_program(&program, &mut factory).unwrap();
//! assert!(resolved.defs.is_empty());
//! ```

pub use quill_ast::{self as ast, NsPath, QName, SourceMap, Span, SymbolFactory};
pub use quill_eval::{self as eval, canonicalize, specialize, syntactic_equal, EvalError};
pub use quill_resolve::{self as resolve, resolve_program, PhaseTimings, ResolveError};

pub mod contract;

pub use contract::{emit_interfaces, interface_of, ContinuationInterface, ContractError};

use quill_ast::simplified;

/// Emits the continuation interfaces of every distinct arrow type in a
/// specialized program, in first-seen order.
pub fn continuation_interfaces(program: &simplified::Program) -> Vec<ContinuationInterface> {
    let types = program.collect_types();
    emit_interfaces(types.iter())
}

/// Compiler version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
