//! Unary and binary operators, shared by the surface AST and the
//! simplified IR.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    LogicalNot,
    Plus,
    Minus,
    BitwiseNegate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    Plus,
    Minus,
    Times,
    Divide,
    Modulo,
    // Comparison
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
    // Logical
    And,
    Or,
    Implication,
    Biconditional,
    // Bitwise
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    ShiftLeft,
    ShiftRight,
}

impl BinaryOp {
    /// Operators whose operand order does not affect the result.
    ///
    /// Short-circuit `And`/`Or` are excluded: their evaluation order is
    /// observable through the residual they leave behind.
    pub fn is_commutative(self) -> bool {
        matches!(
            self,
            BinaryOp::Plus
                | BinaryOp::Times
                | BinaryOp::Equal
                | BinaryOp::BitwiseAnd
                | BinaryOp::BitwiseOr
                | BinaryOp::BitwiseXor
        )
    }
}
