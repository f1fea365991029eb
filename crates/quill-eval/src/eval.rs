//! The partial evaluator.
//!
//! A direct-style recursive rewriter over the simplified IR. Every
//! sub-expression is reduced strictly, left to right; what cannot be
//! reduced to a value is reconstructed as a residual and embedded in the
//! output tree.
//!
//! Reduction highlights:
//!
//! - Fixed-width integer arithmetic folds with two's-complement
//!   wrap-around per width.
//! - Algebraic identities: `0 + x`, `x + 0`, `x - 0`, `x - x`, `0 * x`,
//!   `x * 0`, `1 * x`, `x * 1`, `x / 1`, `x % 1`.
//! - Division and modulo by a literal zero are *never* folded; the
//!   runtime traps them.
//! - `&&` and `||` short-circuit; `==` consults the syntactic equality
//!   oracle; `!=`, `==>` and `<==>` reduce by desugaring.
//! - `Let` keeps its binding when the bound form stays residual; the body
//!   is evaluated with the variable bound to a self-referential `Var`
//!   residual, so occurrences remain references.
//! - Beta reduction binds formals to the actuals as written; substitution
//!   happens lazily at each variable occurrence.

use indexmap::IndexMap;
use tracing::debug;

use quill_ast::foundation::span::Span;
use quill_ast::foundation::symbol::DefnSym;
use quill_ast::op::{BinaryOp, UnaryOp};
use quill_ast::simplified::{Def, Env, Expr, Program};
use quill_ast::types::Type;

use crate::equality::{syntactic_equal, Equality};
use crate::error::EvalError;

/// Partially evaluates expressions against one simplified program's
/// top-level definitions.
pub struct PartialEvaluator<'a> {
    defs: &'a IndexMap<DefnSym, Def>,
}

impl<'a> PartialEvaluator<'a> {
    pub fn new(program: &'a Program) -> Self {
        Self {
            defs: &program.defs,
        }
    }

    /// Reduces `expr` under `env` to a value or a residual.
    pub fn eval(&self, expr: &Expr, env: &Env) -> Result<Expr, EvalError> {
        match expr {
            // Literals and closures reduce to themselves; errors pass
            // through for the runtime.
            Expr::Unit
            | Expr::True
            | Expr::False
            | Expr::Int8(_)
            | Expr::Int16(_)
            | Expr::Int32(_)
            | Expr::Int64(_)
            | Expr::Str(_)
            | Expr::Closure { .. }
            | Expr::Error { .. }
            | Expr::MatchError { .. } => Ok(expr.clone()),

            Expr::Var { name, span, .. } => {
                let bound = env.lookup(name).ok_or_else(|| EvalError::UnresolvedVariable {
                    name: name.clone(),
                    span: *span,
                })?;
                // A variable bound to itself marks a preserved residual
                // binding; it stays a reference.
                if let Expr::Var {
                    name: bound_name, ..
                } = bound
                {
                    if bound_name == name {
                        return Ok(bound.clone());
                    }
                }
                self.eval(bound, env)
            }

            Expr::Ref { sym, span, .. } => match self.defs.get(sym) {
                // Top-level bodies are already at this tier; hand the
                // body over without re-entering it.
                Some(def) => Ok(def.body.clone()),
                None => Err(EvalError::UnresolvedReference {
                    sym: sym.clone(),
                    span: *span,
                }),
            },

            Expr::Lambda {
                formals,
                body,
                ty,
                span,
                ..
            } => Ok(Expr::Closure {
                formals: formals.clone(),
                body: body.clone(),
                env: env.clone(),
                ty: ty.clone(),
                span: *span,
            }),

            Expr::Apply3 {
                callee,
                actuals,
                ty,
                span,
            } => match self.eval(callee, env)? {
                Expr::Lambda { formals, body, .. } => {
                    let mut inner = env.clone();
                    for (formal, actual) in formals.iter().zip(actuals.iter()) {
                        inner = inner.bind(formal.name.clone(), actual.clone());
                    }
                    self.eval(&body, &inner)
                }
                Expr::Closure {
                    formals,
                    body,
                    env: captured,
                    ..
                } => {
                    let mut inner = captured;
                    for (formal, actual) in formals.iter().zip(actuals.iter()) {
                        inner = inner.bind(formal.name.clone(), actual.clone());
                    }
                    self.eval(&body, &inner)
                }
                residual => {
                    let actuals = actuals
                        .iter()
                        .map(|a| self.eval(a, env))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Expr::Apply3 {
                        callee: Box::new(residual),
                        actuals,
                        ty: ty.clone(),
                        span: *span,
                    })
                }
            },

            Expr::Unary {
                op,
                expr: operand,
                ty,
                span,
            } => {
                let value = self.eval(operand, env)?;
                match op {
                    UnaryOp::LogicalNot => match value {
                        Expr::True => Ok(Expr::False),
                        Expr::False => Ok(Expr::True),
                        residual => Ok(rebuild_unary(*op, residual, ty, span)),
                    },
                    UnaryOp::Plus => Ok(value),
                    UnaryOp::Minus => match value {
                        Expr::Int8(v) => Ok(Expr::Int8(v.wrapping_neg())),
                        Expr::Int16(v) => Ok(Expr::Int16(v.wrapping_neg())),
                        Expr::Int32(v) => Ok(Expr::Int32(v.wrapping_neg())),
                        Expr::Int64(v) => Ok(Expr::Int64(v.wrapping_neg())),
                        residual => Ok(rebuild_unary(*op, residual, ty, span)),
                    },
                    UnaryOp::BitwiseNegate => match value {
                        Expr::Int8(v) => Ok(Expr::Int8(!v)),
                        Expr::Int16(v) => Ok(Expr::Int16(!v)),
                        Expr::Int32(v) => Ok(Expr::Int32(!v)),
                        Expr::Int64(v) => Ok(Expr::Int64(!v)),
                        residual => Ok(rebuild_unary(*op, residual, ty, span)),
                    },
                }
            }

            Expr::Binary {
                op,
                lhs,
                rhs,
                ty,
                span,
            } => match op {
                BinaryOp::And => self.eval_and(lhs, rhs, ty, span, env),
                BinaryOp::Or => self.eval_or(lhs, rhs, ty, span, env),
                BinaryOp::Implication => {
                    // p ==> q is !p || q.
                    let desugared = Expr::Binary {
                        op: BinaryOp::Or,
                        lhs: Box::new(Expr::Unary {
                            op: UnaryOp::LogicalNot,
                            expr: lhs.clone(),
                            ty: Type::Bool,
                            span: *span,
                        }),
                        rhs: rhs.clone(),
                        ty: ty.clone(),
                        span: *span,
                    };
                    self.eval(&desugared, env)
                }
                BinaryOp::Biconditional => {
                    // p <==> q is (p ==> q) && (q ==> p).
                    let forward = Expr::Binary {
                        op: BinaryOp::Implication,
                        lhs: lhs.clone(),
                        rhs: rhs.clone(),
                        ty: Type::Bool,
                        span: *span,
                    };
                    let backward = Expr::Binary {
                        op: BinaryOp::Implication,
                        lhs: rhs.clone(),
                        rhs: lhs.clone(),
                        ty: Type::Bool,
                        span: *span,
                    };
                    let desugared = Expr::Binary {
                        op: BinaryOp::And,
                        lhs: Box::new(forward),
                        rhs: Box::new(backward),
                        ty: ty.clone(),
                        span: *span,
                    };
                    self.eval(&desugared, env)
                }
                BinaryOp::NotEqual => {
                    let desugared = Expr::Unary {
                        op: UnaryOp::LogicalNot,
                        expr: Box::new(Expr::Binary {
                            op: BinaryOp::Equal,
                            lhs: lhs.clone(),
                            rhs: rhs.clone(),
                            ty: Type::Bool,
                            span: *span,
                        }),
                        ty: ty.clone(),
                        span: *span,
                    };
                    self.eval(&desugared, env)
                }
                BinaryOp::Equal => {
                    let l = self.eval(lhs, env)?;
                    let r = self.eval(rhs, env)?;
                    match syntactic_equal(&l, &r, env) {
                        Equality::Equal => Ok(Expr::True),
                        Equality::NotEq => Ok(Expr::False),
                        Equality::Unknown => Ok(rebuild_binary(*op, l, r, ty, span)),
                    }
                }
                _ => {
                    let l = self.eval(lhs, env)?;
                    let r = self.eval(rhs, env)?;
                    if let Some(folded) = fold_binary(*op, &l, &r) {
                        return Ok(folded);
                    }
                    if let Some(rewritten) = rewrite_identity(*op, &l, &r, env) {
                        return Ok(rewritten);
                    }
                    Ok(rebuild_binary(*op, l, r, ty, span))
                }
            },

            Expr::Let {
                name,
                offset,
                bound,
                body,
                ty,
                span,
            } => {
                let bound_value = self.eval(bound, env)?;
                if bound_value.is_value() {
                    let inner = env.bind(name.clone(), bound_value);
                    self.eval(body, &inner)
                } else {
                    // The binding survives: occurrences of the variable
                    // stay references to it via a self-bound Var.
                    let marker = Expr::Var {
                        name: name.clone(),
                        offset: *offset,
                        ty: bound_value.ty(),
                        span: *span,
                    };
                    let inner = env.bind(name.clone(), marker);
                    let body_value = self.eval(body, &inner)?;
                    Ok(Expr::Let {
                        name: name.clone(),
                        offset: *offset,
                        bound: Box::new(bound_value),
                        body: Box::new(body_value),
                        ty: ty.clone(),
                        span: *span,
                    })
                }
            }

            Expr::IfThenElse {
                cond,
                then_branch,
                else_branch,
                ty,
                span,
            } => match self.eval(cond, env)? {
                Expr::True => self.eval(then_branch, env),
                Expr::False => self.eval(else_branch, env),
                residual => {
                    let then_branch = self.eval(then_branch, env)?;
                    let else_branch = self.eval(else_branch, env)?;
                    Ok(Expr::IfThenElse {
                        cond: Box::new(residual),
                        then_branch: Box::new(then_branch),
                        else_branch: Box::new(else_branch),
                        ty: ty.clone(),
                        span: *span,
                    })
                }
            },

            Expr::Tag {
                enum_sym,
                tag,
                payload,
                ty,
                span,
            } => {
                let payload = self.eval(payload, env)?;
                Ok(Expr::Tag {
                    enum_sym: enum_sym.clone(),
                    tag: tag.clone(),
                    payload: Box::new(payload),
                    ty: ty.clone(),
                    span: *span,
                })
            }

            Expr::CheckTag { tag, expr, span } => match self.eval(expr, env)? {
                Expr::Tag { tag: actual, .. } => {
                    Ok(if actual == *tag { Expr::True } else { Expr::False })
                }
                residual => Ok(Expr::CheckTag {
                    tag: tag.clone(),
                    expr: Box::new(residual),
                    span: *span,
                }),
            },

            Expr::GetTagValue { expr, ty, span } => match self.eval(expr, env)? {
                Expr::Tag { payload, .. } => Ok(*payload),
                residual => Ok(Expr::GetTagValue {
                    expr: Box::new(residual),
                    ty: ty.clone(),
                    span: *span,
                }),
            },

            Expr::Tuple { elems, ty, span } => {
                let elems = elems
                    .iter()
                    .map(|e| self.eval(e, env))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Expr::Tuple {
                    elems,
                    ty: ty.clone(),
                    span: *span,
                })
            }

            Expr::GetTupleIndex {
                expr,
                offset,
                ty,
                span,
            } => {
                let value = self.eval(expr, env)?;
                if let Expr::Tuple { elems, .. } = &value {
                    if value.is_value() {
                        return Ok(elems[*offset].clone());
                    }
                }
                Ok(Expr::GetTupleIndex {
                    expr: Box::new(value),
                    offset: *offset,
                    ty: ty.clone(),
                    span: *span,
                })
            }

            Expr::Set { elems, ty, span } => {
                let elems = elems
                    .iter()
                    .map(|e| self.eval(e, env))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Expr::Set {
                    elems,
                    ty: ty.clone(),
                    span: *span,
                })
            }
        }
    }

    fn eval_and(
        &self,
        lhs: &Expr,
        rhs: &Expr,
        ty: &Type,
        span: &Span,
        env: &Env,
    ) -> Result<Expr, EvalError> {
        match self.eval(lhs, env)? {
            Expr::True => self.eval(rhs, env),
            Expr::False => Ok(Expr::False),
            l_residual => match self.eval(rhs, env)? {
                Expr::True => Ok(l_residual),
                Expr::False => Ok(Expr::False),
                r_residual => Ok(rebuild_binary(BinaryOp::And, l_residual, r_residual, ty, span)),
            },
        }
    }

    fn eval_or(
        &self,
        lhs: &Expr,
        rhs: &Expr,
        ty: &Type,
        span: &Span,
        env: &Env,
    ) -> Result<Expr, EvalError> {
        match self.eval(lhs, env)? {
            Expr::True => Ok(Expr::True),
            Expr::False => self.eval(rhs, env),
            l_residual => match self.eval(rhs, env)? {
                Expr::True => Ok(Expr::True),
                Expr::False => Ok(l_residual),
                r_residual => Ok(rebuild_binary(BinaryOp::Or, l_residual, r_residual, ty, span)),
            },
        }
    }
}

/// Specializes a whole simplified program: every definition body is
/// partially evaluated under the empty environment.
pub fn specialize(program: &Program) -> Result<Program, EvalError> {
    let evaluator = PartialEvaluator::new(program);
    let mut out = Program::new();
    for def in program.defs.values() {
        let body = evaluator.eval(&def.body, &Env::empty())?;
        debug!(def = %def.sym, reduced = body.is_value(), "specialized definition");
        out.add_def(Def {
            sym: def.sym.clone(),
            ty: def.ty.clone(),
            body,
        });
    }
    Ok(out)
}

fn rebuild_unary(
    op: UnaryOp,
    operand: Expr,
    ty: &Type,
    span: &Span,
) -> Expr {
    Expr::Unary {
        op,
        expr: Box::new(operand),
        ty: ty.clone(),
        span: *span,
    }
}

fn rebuild_binary(
    op: BinaryOp,
    lhs: Expr,
    rhs: Expr,
    ty: &Type,
    span: &Span,
) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
        ty: ty.clone(),
        span: *span,
    }
}

macro_rules! wrap_binop {
    ($lhs:expr, $rhs:expr, $method:ident) => {
        match ($lhs, $rhs) {
            (Expr::Int8(a), Expr::Int8(b)) => Some(Expr::Int8(a.$method(*b))),
            (Expr::Int16(a), Expr::Int16(b)) => Some(Expr::Int16(a.$method(*b))),
            (Expr::Int32(a), Expr::Int32(b)) => Some(Expr::Int32(a.$method(*b))),
            (Expr::Int64(a), Expr::Int64(b)) => Some(Expr::Int64(a.$method(*b))),
            _ => None,
        }
    };
}

macro_rules! bit_binop {
    ($lhs:expr, $rhs:expr, $op:tt) => {
        match ($lhs, $rhs) {
            (Expr::Int8(a), Expr::Int8(b)) => Some(Expr::Int8(a $op b)),
            (Expr::Int16(a), Expr::Int16(b)) => Some(Expr::Int16(a $op b)),
            (Expr::Int32(a), Expr::Int32(b)) => Some(Expr::Int32(a $op b)),
            (Expr::Int64(a), Expr::Int64(b)) => Some(Expr::Int64(a $op b)),
            _ => None,
        }
    };
}

macro_rules! cmp_binop {
    ($lhs:expr, $rhs:expr, $op:tt) => {
        match ($lhs, $rhs) {
            (Expr::Int8(a), Expr::Int8(b)) => Some(bool_expr(a $op b)),
            (Expr::Int16(a), Expr::Int16(b)) => Some(bool_expr(a $op b)),
            (Expr::Int32(a), Expr::Int32(b)) => Some(bool_expr(a $op b)),
            (Expr::Int64(a), Expr::Int64(b)) => Some(bool_expr(a $op b)),
            _ => None,
        }
    };
}

fn bool_expr(b: bool) -> Expr {
    if b {
        Expr::True
    } else {
        Expr::False
    }
}

/// Folds a binary operation over two matching-width integer literals.
/// Arithmetic wraps per width; division and modulo by zero stay residual.
fn fold_binary(op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Option<Expr> {
    match op {
        BinaryOp::Plus => wrap_binop!(lhs, rhs, wrapping_add),
        BinaryOp::Minus => wrap_binop!(lhs, rhs, wrapping_sub),
        BinaryOp::Times => wrap_binop!(lhs, rhs, wrapping_mul),
        BinaryOp::Divide => {
            if is_zero_literal(rhs) {
                None
            } else {
                wrap_binop!(lhs, rhs, wrapping_div)
            }
        }
        BinaryOp::Modulo => {
            if is_zero_literal(rhs) {
                None
            } else {
                wrap_binop!(lhs, rhs, wrapping_rem)
            }
        }
        BinaryOp::Less => cmp_binop!(lhs, rhs, <),
        BinaryOp::LessEqual => cmp_binop!(lhs, rhs, <=),
        BinaryOp::Greater => cmp_binop!(lhs, rhs, >),
        BinaryOp::GreaterEqual => cmp_binop!(lhs, rhs, >=),
        BinaryOp::BitwiseAnd => bit_binop!(lhs, rhs, &),
        BinaryOp::BitwiseOr => bit_binop!(lhs, rhs, |),
        BinaryOp::BitwiseXor => bit_binop!(lhs, rhs, ^),
        BinaryOp::ShiftLeft => match (lhs, rhs) {
            (Expr::Int8(a), Expr::Int8(b)) => Some(Expr::Int8(a.wrapping_shl(*b as u32))),
            (Expr::Int16(a), Expr::Int16(b)) => Some(Expr::Int16(a.wrapping_shl(*b as u32))),
            (Expr::Int32(a), Expr::Int32(b)) => Some(Expr::Int32(a.wrapping_shl(*b as u32))),
            (Expr::Int64(a), Expr::Int64(b)) => Some(Expr::Int64(a.wrapping_shl(*b as u32))),
            _ => None,
        },
        BinaryOp::ShiftRight => match (lhs, rhs) {
            (Expr::Int8(a), Expr::Int8(b)) => Some(Expr::Int8(a.wrapping_shr(*b as u32))),
            (Expr::Int16(a), Expr::Int16(b)) => Some(Expr::Int16(a.wrapping_shr(*b as u32))),
            (Expr::Int32(a), Expr::Int32(b)) => Some(Expr::Int32(a.wrapping_shr(*b as u32))),
            (Expr::Int64(a), Expr::Int64(b)) => Some(Expr::Int64(a.wrapping_shr(*b as u32))),
            _ => None,
        },
        // Logical and equality operators never reach here.
        _ => None,
    }
}

/// Applies the algebraic identity rewrites for mixed literal/residual
/// operands.
fn rewrite_identity(op: BinaryOp, lhs: &Expr, rhs: &Expr, env: &Env) -> Option<Expr> {
    match op {
        BinaryOp::Plus => {
            if is_zero_literal(lhs) {
                Some(rhs.clone())
            } else if is_zero_literal(rhs) {
                Some(lhs.clone())
            } else {
                None
            }
        }
        BinaryOp::Minus => {
            if is_zero_literal(rhs) {
                Some(lhs.clone())
            } else if syntactic_equal(lhs, rhs, env) == Equality::Equal {
                zero_of(&lhs.ty())
            } else {
                None
            }
        }
        BinaryOp::Times => {
            if is_zero_literal(lhs) {
                Some(lhs.clone())
            } else if is_zero_literal(rhs) {
                Some(rhs.clone())
            } else if is_one_literal(lhs) {
                Some(rhs.clone())
            } else if is_one_literal(rhs) {
                Some(lhs.clone())
            } else {
                None
            }
        }
        BinaryOp::Divide => {
            if is_one_literal(rhs) {
                Some(lhs.clone())
            } else {
                None
            }
        }
        BinaryOp::Modulo => {
            if is_one_literal(rhs) {
                zero_of(&lhs.ty())
            } else {
                None
            }
        }
        _ => None,
    }
}

fn is_zero_literal(e: &Expr) -> bool {
    matches!(
        e,
        Expr::Int8(0) | Expr::Int16(0) | Expr::Int32(0) | Expr::Int64(0)
    )
}

fn is_one_literal(e: &Expr) -> bool {
    matches!(
        e,
        Expr::Int8(1) | Expr::Int16(1) | Expr::Int32(1) | Expr::Int64(1)
    )
}

/// The zero literal of an integer type.
fn zero_of(ty: &Type) -> Option<Expr> {
    match ty {
        Type::Int8 => Some(Expr::Int8(0)),
        Type::Int16 => Some(Expr::Int16(0)),
        Type::Int32 => Some(Expr::Int32(0)),
        Type::Int64 => Some(Expr::Int64(0)),
        _ => None,
    }
}
