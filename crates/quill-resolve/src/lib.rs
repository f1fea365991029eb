//! # Quill name resolution
//!
//! Transforms a parsed, namespaced [`surface::Program`] into a fully
//! resolved [`resolved::Program`] in which every name occurrence is a
//! canonical symbol and every type occurrence an internal type term.
//!
//! # Pipeline Position
//!
//! ```text
//! Parse → Resolution → Type Inference → Simplification → Partial Evaluation
//!            ^^^^^^
//!          YOU ARE HERE
//! ```
//!
//! The pass accumulates as many diagnostics as it can: independent
//! subtrees keep resolving after an error, and the pass fails overall with
//! the full list.
//!
//! [`surface::Program`]: quill_ast::surface::Program
//! [`resolved::Program`]: quill_ast::resolved::Program

pub mod access;
pub mod error;
pub mod expr;
pub mod pipeline;
pub mod tags;
pub mod types;

pub use access::is_accessible;
pub use error::ResolveError;
pub use expr::ExprResolver;
pub use pipeline::{resolve_program, PhaseTimings};
pub use tags::{lookup_enum_by_tag, EnumEntry, EnumTable};
pub use types::lookup_type;
