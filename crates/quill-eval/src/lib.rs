//! # Quill partial evaluator
//!
//! Online specialization over the simplified IR: reduces constants,
//! applies algebraic identities, simplifies through a syntactic equality
//! oracle, and reconstructs residual expressions where reduction gets
//! stuck.
//!
//! # Pipeline Position
//!
//! ```text
//! Resolution → Type Inference → Simplification → Partial Evaluation → Codegen
//!                                                     ^^^^^^
//!                                                   YOU ARE HERE
//! ```
//!
//! The evaluator is a pure tree-to-tree transformer: division by zero and
//! match failures are residualized for the runtime, and only genuine
//! compiler invariant violations (an unbound variable, a dangling
//! definition reference) abort the pass.

pub mod equality;
pub mod error;
pub mod eval;

pub use equality::{canonicalize, syntactic_equal, Equality};
pub use error::EvalError;
pub use eval::{specialize, PartialEvaluator};
