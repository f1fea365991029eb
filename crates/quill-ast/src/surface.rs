//! Surface (pre-resolution) AST and program.
//!
//! This is the shape the parser hands to resolution: declarations grouped
//! per namespace, with every reference still a textual [`QName`]. The
//! surface program is discarded once the resolved program is built.

use indexmap::IndexMap;

use crate::foundation::name::{NsPath, QName};
use crate::foundation::span::Span;
use crate::op::{BinaryOp, UnaryOp};
use crate::types::Type;

/// Surface type syntax. Names are unresolved; the elaborator turns these
/// into internal [`Type`] terms.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceType {
    /// A (possibly qualified) type name: builtin, enum, or type parameter.
    Name(QName, Span),
    /// Ordered component types.
    Tuple(Vec<SurfaceType>, Span),
    /// Function type.
    Arrow(Vec<SurfaceType>, Box<SurfaceType>, Span),
    /// Type constructor application, e.g. `Option[Int]`.
    Apply(Box<SurfaceType>, Box<SurfaceType>, Span),
}

impl SurfaceType {
    pub fn span(&self) -> Span {
        match self {
            SurfaceType::Name(_, span)
            | SurfaceType::Tuple(_, span)
            | SurfaceType::Arrow(_, _, span)
            | SurfaceType::Apply(_, _, span) => *span,
        }
    }
}

/// A surface expression with its source location.
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

/// Surface expression variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // Literals
    Unit,
    True,
    False,
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Str(String),

    /// Occurrence of a bound variable (or an unqualified name the parser
    /// could not classify; resolution decides).
    Var(String),
    /// Wildcard in a binding position.
    Wild,
    /// Reference to a top-level definition or hook.
    Ref(QName),
    /// A typed hole, `?name`.
    Hole(String),

    /// Tag expression with optional enum qualifier and optional payload.
    Tag {
        enum_name: Option<QName>,
        tag: String,
        payload: Option<Box<Expr>>,
    },

    Apply {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Lambda {
        formals: Vec<FormalParam>,
        body: Box<Expr>,
    },
    Let {
        name: String,
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
    /// Type ascription.
    Ascribe {
        expr: Box<Expr>,
        ty: SurfaceType,
    },
}

/// A formal parameter with optional type annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct FormalParam {
    pub name: String,
    pub ty: Option<SurfaceType>,
    pub span: Span,
}

/// A top-level definition.
#[derive(Debug, Clone, PartialEq)]
pub struct DefDecl {
    pub ident: String,
    pub public: bool,
    pub formals: Vec<FormalParam>,
    pub ret_ty: Option<SurfaceType>,
    pub body: Expr,
    pub span: Span,
}

/// An enum declaration with its cases.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub ident: String,
    pub public: bool,
    /// Type parameter names, e.g. `["T"]` for `Option[T]`.
    pub tparams: Vec<String>,
    pub cases: Vec<CaseDecl>,
    pub span: Span,
}

/// One enum case: a tag and its payload type.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseDecl {
    pub tag: String,
    pub payload: SurfaceType,
    pub span: Span,
}

/// Relation or lattice flavor of a table declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Relation,
    Lattice,
}

/// A table (relation) or lattice declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDecl {
    pub ident: String,
    pub public: bool,
    pub kind: TableKind,
    pub attributes: Vec<(String, SurfaceType)>,
    pub span: Span,
}

/// An index declaration over a table's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDecl {
    pub table: QName,
    pub columns: Vec<Vec<String>>,
    pub span: Span,
}

/// A single predicate occurrence in a constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub table: QName,
    pub terms: Vec<Expr>,
    pub span: Span,
}

/// A constraint: head predicate implied by body predicates. A fact has an
/// empty body.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintDecl {
    pub head: Predicate,
    pub body: Vec<Predicate>,
    pub span: Span,
}

/// A named property (law) over the program's definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub ident: String,
    pub law: Expr,
    pub span: Span,
}

/// An anonymous named expression; resolution wraps these in synthetic
/// definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedExpr {
    pub ident: String,
    pub expr: Expr,
    pub span: Span,
}

/// An externally-provided definition registered by the host. Hooks have a
/// type but no body.
#[derive(Debug, Clone, PartialEq)]
pub struct Hook {
    pub ty: Type,
    pub span: Span,
}

/// The parser's output: declarations grouped by namespace, plus the hook
/// table keyed by fully-qualified name.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub defs: IndexMap<NsPath, Vec<DefDecl>>,
    pub enums: IndexMap<NsPath, Vec<EnumDecl>>,
    pub lattices: IndexMap<NsPath, Vec<TableDecl>>,
    pub tables: IndexMap<NsPath, Vec<TableDecl>>,
    pub indices: IndexMap<NsPath, Vec<IndexDecl>>,
    pub constraints: IndexMap<NsPath, Vec<ConstraintDecl>>,
    pub properties: IndexMap<NsPath, Vec<PropertyDecl>>,
    pub named: IndexMap<NsPath, Vec<NamedExpr>>,
    pub hooks: IndexMap<QName, Hook>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_def(&mut self, ns: NsPath, decl: DefDecl) {
        self.defs.entry(ns).or_default().push(decl);
    }

    pub fn add_enum(&mut self, ns: NsPath, decl: EnumDecl) {
        self.enums.entry(ns).or_default().push(decl);
    }

    pub fn add_table(&mut self, ns: NsPath, decl: TableDecl) {
        self.tables.entry(ns).or_default().push(decl);
    }

    pub fn add_lattice(&mut self, ns: NsPath, decl: TableDecl) {
        self.lattices.entry(ns).or_default().push(decl);
    }

    pub fn add_index(&mut self, ns: NsPath, decl: IndexDecl) {
        self.indices.entry(ns).or_default().push(decl);
    }

    pub fn add_constraint(&mut self, ns: NsPath, decl: ConstraintDecl) {
        self.constraints.entry(ns).or_default().push(decl);
    }

    pub fn add_property(&mut self, ns: NsPath, decl: PropertyDecl) {
        self.properties.entry(ns).or_default().push(decl);
    }

    pub fn add_named(&mut self, ns: NsPath, decl: NamedExpr) {
        self.named.entry(ns).or_default().push(decl);
    }

    pub fn add_hook(&mut self, name: QName, hook: Hook) {
        self.hooks.insert(name, hook);
    }

    /// Definitions declared directly in `ns`.
    pub fn defs_in(&self, ns: &NsPath) -> &[DefDecl] {
        self.defs.get(ns).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Enums declared directly in `ns`.
    pub fn enums_in(&self, ns: &NsPath) -> &[EnumDecl] {
        self.enums.get(ns).map(Vec::as_slice).unwrap_or(&[])
    }
}
