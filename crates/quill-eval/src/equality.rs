//! Syntactic equality oracle and canonicalizer.
//!
//! [`syntactic_equal`] is a conservative three-valued decision procedure:
//! it answers [`Equality::Equal`] or [`Equality::NotEq`] only when the
//! structure of the two trees proves it, and [`Equality::Unknown`]
//! otherwise. The evaluator turns `Equal` into `True`, `NotEq` into
//! `False`, and leaves `Unknown` comparisons residual.
//!
//! [`canonicalize`] maps equivalent residuals toward one deterministic
//! form by ordering the operands of commutative operators under a fixed
//! structural ordering. It is a pure function and idempotent:
//! `canonicalize(canonicalize(e)) == canonicalize(e)`.

use std::cmp::Ordering;

use quill_ast::simplified::{Env, Expr};

/// Three-valued result of the syntactic equality oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equality {
    Equal,
    NotEq,
    Unknown,
}

/// Decides, structurally, whether two evaluated expressions must be
/// equal, must be unequal, or cannot be told apart syntactically.
///
/// Variables compare by name: under one environment, two occurrences of
/// the same binding denote the same value.
pub fn syntactic_equal(e1: &Expr, e2: &Expr, env: &Env) -> Equality {
    match (e1, e2) {
        (Expr::Unit, Expr::Unit) => Equality::Equal,
        (Expr::True, Expr::True) | (Expr::False, Expr::False) => Equality::Equal,
        (Expr::True, Expr::False) | (Expr::False, Expr::True) => Equality::NotEq,
        (Expr::Int8(a), Expr::Int8(b)) if a == b => Equality::Equal,
        (Expr::Int16(a), Expr::Int16(b)) if a == b => Equality::Equal,
        (Expr::Int32(a), Expr::Int32(b)) if a == b => Equality::Equal,
        (Expr::Int64(a), Expr::Int64(b)) if a == b => Equality::Equal,
        (Expr::Str(a), Expr::Str(b)) if a == b => Equality::Equal,

        (Expr::Var { name: a, .. }, Expr::Var { name: b, .. }) if a == b => Equality::Equal,

        (
            Expr::Tag {
                tag: t1,
                payload: p1,
                ..
            },
            Expr::Tag {
                tag: t2,
                payload: p2,
                ..
            },
        ) => {
            if t1 != t2 {
                Equality::NotEq
            } else {
                syntactic_equal(p1, p2, env)
            }
        }

        (Expr::Tuple { elems: a, .. }, Expr::Tuple { elems: b, .. }) if a.len() == b.len() => {
            let mut all_equal = true;
            for (x, y) in a.iter().zip(b.iter()) {
                match syntactic_equal(x, y, env) {
                    Equality::NotEq => return Equality::NotEq,
                    Equality::Unknown => all_equal = false,
                    Equality::Equal => {}
                }
            }
            if all_equal {
                Equality::Equal
            } else {
                Equality::Unknown
            }
        }

        _ => Equality::Unknown,
    }
}

/// Rewrites an expression into its canonical form: operands of
/// commutative operators are ordered under [`expr_order`], recursively.
pub fn canonicalize(expr: &Expr) -> Expr {
    match expr {
        Expr::Binary {
            op,
            lhs,
            rhs,
            ty,
            span,
        } => {
            let lhs = canonicalize(lhs);
            let rhs = canonicalize(rhs);
            let (lhs, rhs) = if op.is_commutative() && expr_order(&lhs, &rhs) == Ordering::Greater {
                (rhs, lhs)
            } else {
                (lhs, rhs)
            };
            Expr::Binary {
                op: *op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                ty: ty.clone(),
                span: *span,
            }
        }
        Expr::Unary { op, expr, ty, span } => Expr::Unary {
            op: *op,
            expr: Box::new(canonicalize(expr)),
            ty: ty.clone(),
            span: *span,
        },
        Expr::Apply3 {
            callee,
            actuals,
            ty,
            span,
        } => Expr::Apply3 {
            callee: Box::new(canonicalize(callee)),
            actuals: actuals.iter().map(canonicalize).collect(),
            ty: ty.clone(),
            span: *span,
        },
        Expr::Lambda {
            ann,
            formals,
            body,
            ty,
            span,
        } => Expr::Lambda {
            ann: ann.clone(),
            formals: formals.clone(),
            body: Box::new(canonicalize(body)),
            ty: ty.clone(),
            span: *span,
        },
        Expr::Let {
            name,
            offset,
            bound,
            body,
            ty,
            span,
        } => Expr::Let {
            name: name.clone(),
            offset: *offset,
            bound: Box::new(canonicalize(bound)),
            body: Box::new(canonicalize(body)),
            ty: ty.clone(),
            span: *span,
        },
        Expr::IfThenElse {
            cond,
            then_branch,
            else_branch,
            ty,
            span,
        } => Expr::IfThenElse {
            cond: Box::new(canonicalize(cond)),
            then_branch: Box::new(canonicalize(then_branch)),
            else_branch: Box::new(canonicalize(else_branch)),
            ty: ty.clone(),
            span: *span,
        },
        Expr::Tag {
            enum_sym,
            tag,
            payload,
            ty,
            span,
        } => Expr::Tag {
            enum_sym: enum_sym.clone(),
            tag: tag.clone(),
            payload: Box::new(canonicalize(payload)),
            ty: ty.clone(),
            span: *span,
        },
        Expr::CheckTag { tag, expr, span } => Expr::CheckTag {
            tag: tag.clone(),
            expr: Box::new(canonicalize(expr)),
            span: *span,
        },
        Expr::GetTagValue { expr, ty, span } => Expr::GetTagValue {
            expr: Box::new(canonicalize(expr)),
            ty: ty.clone(),
            span: *span,
        },
        Expr::Tuple { elems, ty, span } => Expr::Tuple {
            elems: elems.iter().map(canonicalize).collect(),
            ty: ty.clone(),
            span: *span,
        },
        Expr::GetTupleIndex {
            expr,
            offset,
            ty,
            span,
        } => Expr::GetTupleIndex {
            expr: Box::new(canonicalize(expr)),
            offset: *offset,
            ty: ty.clone(),
            span: *span,
        },
        Expr::Set { elems, ty, span } => Expr::Set {
            elems: elems.iter().map(canonicalize).collect(),
            ty: ty.clone(),
            span: *span,
        },
        // Leaves and closures pass through. Closure bodies are not
        // rewritten: their environments are observable.
        other => other.clone(),
    }
}

/// Deterministic structural ordering used by the canonicalizer.
///
/// Total on the shapes the canonicalizer reorders (literals, variables,
/// references, tags, tuples, unary and binary nodes); other shapes
/// compare equal, which leaves their order untouched.
pub fn expr_order(a: &Expr, b: &Expr) -> Ordering {
    rank(a).cmp(&rank(b)).then_with(|| match (a, b) {
        (Expr::Int8(x), Expr::Int8(y)) => x.cmp(y),
        (Expr::Int16(x), Expr::Int16(y)) => x.cmp(y),
        (Expr::Int32(x), Expr::Int32(y)) => x.cmp(y),
        (Expr::Int64(x), Expr::Int64(y)) => x.cmp(y),
        (Expr::Str(x), Expr::Str(y)) => x.cmp(y),
        (
            Expr::Var {
                name: n1,
                offset: o1,
                ..
            },
            Expr::Var {
                name: n2,
                offset: o2,
                ..
            },
        ) => n1.cmp(n2).then(o1.cmp(o2)),
        (Expr::Ref { sym: s1, .. }, Expr::Ref { sym: s2, .. }) => s1
            .namespace
            .cmp(&s2.namespace)
            .then_with(|| s1.ident.cmp(&s2.ident)),
        (
            Expr::Tag {
                tag: t1,
                payload: p1,
                ..
            },
            Expr::Tag {
                tag: t2,
                payload: p2,
                ..
            },
        ) => t1.cmp(t2).then_with(|| expr_order(p1, p2)),
        (Expr::Tuple { elems: a, .. }, Expr::Tuple { elems: b, .. }) => seq_order(a, b),
        (
            Expr::Unary {
                op: o1, expr: e1, ..
            },
            Expr::Unary {
                op: o2, expr: e2, ..
            },
        ) => (*o1 as u8)
            .cmp(&(*o2 as u8))
            .then_with(|| expr_order(e1, e2)),
        (
            Expr::Binary {
                op: o1,
                lhs: l1,
                rhs: r1,
                ..
            },
            Expr::Binary {
                op: o2,
                lhs: l2,
                rhs: r2,
                ..
            },
        ) => (*o1 as u8)
            .cmp(&(*o2 as u8))
            .then_with(|| expr_order(l1, l2))
            .then_with(|| expr_order(r1, r2)),
        _ => Ordering::Equal,
    })
}

fn seq_order(a: &[Expr], b: &[Expr]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match expr_order(x, y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

fn rank(e: &Expr) -> u8 {
    match e {
        Expr::Unit => 0,
        Expr::True => 1,
        Expr::False => 2,
        Expr::Int8(_) => 3,
        Expr::Int16(_) => 4,
        Expr::Int32(_) => 5,
        Expr::Int64(_) => 6,
        Expr::Str(_) => 7,
        Expr::Var { .. } => 8,
        Expr::Ref { .. } => 9,
        Expr::Tag { .. } => 10,
        Expr::Tuple { .. } => 11,
        Expr::Unary { .. } => 12,
        Expr::Binary { .. } => 13,
        Expr::Apply3 { .. } => 14,
        Expr::Lambda { .. } => 15,
        Expr::Closure { .. } => 16,
        Expr::Let { .. } => 17,
        Expr::IfThenElse { .. } => 18,
        Expr::CheckTag { .. } => 19,
        Expr::GetTagValue { .. } => 20,
        Expr::GetTupleIndex { .. } => 21,
        Expr::Set { .. } => 22,
        Expr::Error { .. } => 23,
        Expr::MatchError { .. } => 24,
    }
}
