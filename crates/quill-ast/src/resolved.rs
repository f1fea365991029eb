//! Resolved (post-resolution) AST and program.
//!
//! Same shape as the surface program, but every name occurrence is a
//! symbol, every type occurrence an internal [`Type`] term, and every tag
//! carries the enum symbol that declares it. Types of expressions are
//! still absent here; inference (external) supplies them.

use indexmap::IndexMap;

use crate::foundation::span::Span;
use crate::foundation::symbol::{DefnSym, EnumSym, HoleSym, TableSym, VarSym};
use crate::op::{BinaryOp, UnaryOp};
use crate::surface::TableKind;
use crate::types::{Effect, Scheme, Type};

/// A resolved expression with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Resolved expression variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Unit,
    True,
    False,
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Str(String),

    Var(VarSym),
    Wild,
    /// Reference to a resolved top-level definition.
    Ref(DefnSym),
    /// Reference to an externally-provided hook.
    Hook(DefnSym),
    /// A typed hole with its synthesized symbol; opaque from here on.
    Hole(HoleSym),

    Tag {
        enum_sym: EnumSym,
        tag: String,
        payload: Box<Expr>,
    },
    Apply {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Lambda {
        formals: Vec<Formal>,
        body: Box<Expr>,
    },
    Let {
        var: VarSym,
        bound: Box<Expr>,
        body: Box<Expr>,
    },
    IfThenElse {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Tuple(Vec<Expr>),
    Set(Vec<Expr>),
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Ascribe {
        expr: Box<Expr>,
        ty: Type,
    },
}

/// A resolved formal parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Formal {
    pub sym: VarSym,
    pub ty: Option<Type>,
    pub span: Span,
}

/// A resolved top-level definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Def {
    pub sym: DefnSym,
    pub public: bool,
    pub scheme: Scheme,
    pub effect: Effect,
    pub formals: Vec<Formal>,
    pub body: Expr,
    pub span: Span,
}

/// A resolved enum: its cases keyed by tag name, each with a payload type.
#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    pub sym: EnumSym,
    pub public: bool,
    pub cases: IndexMap<String, Case>,
    pub span: Span,
}

/// One resolved enum case.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub tag: String,
    pub payload: Type,
    pub span: Span,
}

/// A resolved table or lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub sym: TableSym,
    pub public: bool,
    pub kind: TableKind,
    pub attributes: Vec<(String, Type)>,
    pub span: Span,
}

/// A resolved index over a table.
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    pub table: TableSym,
    pub columns: Vec<Vec<String>>,
    pub span: Span,
}

/// A resolved predicate occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub table: TableSym,
    pub terms: Vec<Expr>,
    pub span: Span,
}

/// A resolved constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub head: Predicate,
    pub body: Vec<Predicate>,
    pub span: Span,
}

/// A resolved property (law).
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub sym: DefnSym,
    pub law: Expr,
    pub span: Span,
}

/// The fully-resolved program handed to type inference.
///
/// Every symbol that appears as a key has exactly one defining occurrence.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub defs: IndexMap<DefnSym, Def>,
    pub enums: IndexMap<EnumSym, Enum>,
    pub tables: IndexMap<TableSym, Table>,
    pub indices: Vec<Index>,
    pub constraints: Vec<Constraint>,
    pub properties: Vec<Property>,
    /// Hooks keyed by their definition symbol; type known, no body.
    pub hooks: IndexMap<DefnSym, Type>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }
}
