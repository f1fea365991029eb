//! The resolution pipeline.
//!
//! Orchestrates the individual passes in order:
//!
//! 1. **Enums** — register every enum, then elaborate case payload types.
//! 2. **Definitions** — resolve every def body, wrap named top-level
//!    expressions in synthetic defs, and adopt hooks.
//! 3. **Datalog surface** — tables/lattices, indices, constraints, and
//!    properties.
//!
//! Each phase accumulates diagnostics and the pass fails overall with the
//! full list if any subtree failed. The output carries a per-phase timing
//! breakdown in nanoseconds for the caller's instrumentation.

use std::time::Instant;

use tracing::debug;

use quill_ast::foundation::name::{NsPath, QName};
use quill_ast::foundation::span::Span;
use quill_ast::foundation::symbol::{DefnSym, SymbolFactory, TableSym};
use quill_ast::resolved;
use quill_ast::surface;

use crate::error::{merge2, merge_all, ResolveError};
use crate::expr::{collect_var_names, ExprResolver, Scope};
use crate::tags::EnumTable;
use crate::types::{lookup_type, resolve_enum_cases};

/// Per-phase wall-clock nanosecond counters for one resolution pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseTimings {
    pub enums_ns: u64,
    pub defs_ns: u64,
    pub datalog_ns: u64,
    pub total_ns: u64,
}

/// Resolves a surface program into a symbol-keyed resolved program.
///
/// Returns every diagnostic the pass could produce when any subtree
/// fails; on success, also returns the phase timing breakdown.
pub fn resolve_program(
    program: &surface::Program,
    factory: &mut SymbolFactory,
) -> Result<(resolved::Program, PhaseTimings), Vec<ResolveError>> {
    let total_start = Instant::now();
    let mut errors = Vec::new();
    let mut out = resolved::Program::new();
    let mut timings = PhaseTimings::default();

    // Phase 1: enums.
    let phase_start = Instant::now();
    let mut enums = EnumTable::collect(program, factory);
    if let Err(mut e) = resolve_enum_cases(program, &mut enums) {
        errors.append(&mut e);
    }
    for entry in enums.iter() {
        out.enums.insert(
            entry.sym.clone(),
            resolved::Enum {
                sym: entry.sym.clone(),
                public: entry.public,
                cases: entry.cases.clone(),
                span: entry.span,
            },
        );
    }
    timings.enums_ns = phase_start.elapsed().as_nanos() as u64;
    debug!(
        enums = out.enums.len(),
        elapsed_ns = timings.enums_ns,
        "resolved enum declarations"
    );

    // Phase 2: definitions, named expressions, hooks.
    let phase_start = Instant::now();
    {
        let mut resolver = ExprResolver::new(program, &enums, factory);
        for (ns, decls) in &program.defs {
            for decl in decls {
                match resolver.resolve_def(ns, decl) {
                    Ok(def) => {
                        out.defs.insert(def.sym.clone(), def);
                    }
                    Err(mut e) => errors.append(&mut e),
                }
            }
        }
        for (ns, decls) in &program.named {
            for decl in decls {
                match resolver.resolve_named(ns, decl) {
                    Ok(def) => {
                        out.defs.insert(def.sym.clone(), def);
                    }
                    Err(mut e) => errors.append(&mut e),
                }
            }
        }
    }
    for (name, hook) in &program.hooks {
        let sym = DefnSym::new(name.namespace.clone(), name.ident.clone(), hook.span);
        out.hooks.insert(sym, hook.ty.clone());
    }
    timings.defs_ns = phase_start.elapsed().as_nanos() as u64;
    debug!(
        defs = out.defs.len(),
        hooks = out.hooks.len(),
        elapsed_ns = timings.defs_ns,
        "resolved definitions"
    );

    // Phase 3: datalog surface.
    let phase_start = Instant::now();
    for (ns, decls) in program.tables.iter().chain(program.lattices.iter()) {
        for decl in decls {
            match resolve_table(ns, decl, &enums) {
                Ok(table) => {
                    out.tables.insert(table.sym.clone(), table);
                }
                Err(mut e) => errors.append(&mut e),
            }
        }
    }
    for (ns, decls) in &program.indices {
        for decl in decls {
            match lookup_table(program, &decl.table, ns, decl.span) {
                Ok(sym) => out.indices.push(resolved::Index {
                    table: sym,
                    columns: decl.columns.clone(),
                    span: decl.span,
                }),
                Err(e) => errors.push(e),
            }
        }
    }
    {
        let mut resolver = ExprResolver::new(program, &enums, factory);
        for (ns, decls) in &program.constraints {
            for decl in decls {
                match resolve_constraint(&mut resolver, ns, decl) {
                    Ok(c) => out.constraints.push(c),
                    Err(mut e) => errors.append(&mut e),
                }
            }
        }
        for (ns, decls) in &program.properties {
            for decl in decls {
                match resolve_property(&mut resolver, ns, decl) {
                    Ok(p) => out.properties.push(p),
                    Err(mut e) => errors.append(&mut e),
                }
            }
        }
    }
    timings.datalog_ns = phase_start.elapsed().as_nanos() as u64;
    debug!(
        tables = out.tables.len(),
        constraints = out.constraints.len(),
        elapsed_ns = timings.datalog_ns,
        "resolved datalog declarations"
    );

    timings.total_ns = total_start.elapsed().as_nanos() as u64;

    if errors.is_empty() {
        Ok((out, timings))
    } else {
        Err(errors)
    }
}

fn resolve_table(
    ns: &NsPath,
    decl: &surface::TableDecl,
    enums: &EnumTable,
) -> Result<resolved::Table, Vec<ResolveError>> {
    let attributes = merge_all(decl.attributes.iter().map(|(name, st)| {
        lookup_type(st, ns, enums)
            .map(|ty| (name.clone(), ty))
            .map_err(|e| vec![e])
    }))?;
    Ok(resolved::Table {
        sym: TableSym::new(ns.clone(), decl.ident.clone(), decl.span),
        public: decl.public,
        kind: decl.kind,
        attributes,
        span: decl.span,
    })
}

/// Looks up a table reference: qualified names only in the named
/// namespace, unqualified names in the current namespace with a root
/// fallback.
fn lookup_table(
    program: &surface::Program,
    name: &QName,
    ns: &NsPath,
    span: Span,
) -> Result<TableSym, ResolveError> {
    let find = |in_ns: &NsPath| {
        let declared = |decls: &Vec<surface::TableDecl>| {
            decls
                .iter()
                .find(|d| d.ident == name.ident)
                .map(|d| TableSym::new(in_ns.clone(), name.ident.clone(), d.span))
        };
        program
            .tables
            .get(in_ns)
            .and_then(declared)
            .or_else(|| program.lattices.get(in_ns).and_then(declared))
    };

    let found = if name.is_qualified() {
        find(&name.namespace)
    } else {
        find(ns).or_else(|| find(&NsPath::root()))
    };

    found.ok_or_else(|| ResolveError::UndefinedTable {
        name: name.clone(),
        ns: ns.clone(),
        span,
    })
}

/// Resolves one constraint. Datalog variables are rule-scoped: every free
/// variable name in the head or body binds one fresh variable symbol for
/// the whole rule.
fn resolve_constraint(
    resolver: &mut ExprResolver<'_>,
    ns: &NsPath,
    decl: &surface::ConstraintDecl,
) -> Result<resolved::Constraint, Vec<ResolveError>> {
    let mut scope = Scope::new();
    scope.push();
    let mut names = Vec::new();
    for term in decl.head.terms.iter().chain(decl.body.iter().flat_map(|p| p.terms.iter())) {
        collect_var_names(term, &mut names);
    }
    for name in names {
        let sym = resolver.factory.fresh_var_sym(&name);
        scope.bind(name, sym);
    }

    let head = resolve_predicate(resolver, ns, &decl.head, &mut scope);
    let body = merge_all(
        decl.body
            .iter()
            .map(|p| resolve_predicate(resolver, ns, p, &mut scope))
            .collect::<Vec<_>>(),
    );
    scope.pop();
    let (head, body) = merge2(head, body)?;
    Ok(resolved::Constraint {
        head,
        body,
        span: decl.span,
    })
}

fn resolve_predicate(
    resolver: &mut ExprResolver<'_>,
    ns: &NsPath,
    pred: &surface::Predicate,
    scope: &mut Scope,
) -> Result<resolved::Predicate, Vec<ResolveError>> {
    let table = lookup_table(resolver.program, &pred.table, ns, pred.span).map_err(|e| vec![e]);
    let terms = merge_all(
        pred.terms
            .iter()
            .map(|t| resolver.resolve_expr(t, ns, scope))
            .collect::<Vec<_>>(),
    );
    let (table, terms) = merge2(table, terms)?;
    Ok(resolved::Predicate {
        table,
        terms,
        span: pred.span,
    })
}

fn resolve_property(
    resolver: &mut ExprResolver<'_>,
    ns: &NsPath,
    decl: &surface::PropertyDecl,
) -> Result<resolved::Property, Vec<ResolveError>> {
    let sym = resolver
        .factory
        .defn_sym(ns.clone(), decl.ident.clone(), decl.span);
    let mut scope = Scope::new();
    scope.push();
    let law = resolver.resolve_expr(&decl.law, ns, &mut scope)?;
    scope.pop();
    Ok(resolved::Property {
        sym,
        law,
        span: decl.span,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_ast::op::BinaryOp;
    use quill_ast::surface::{
        ConstraintDecl, DefDecl, Expr, ExprKind, IndexDecl, Predicate, Program, SurfaceType,
        TableDecl, TableKind,
    };
    use quill_ast::types::Type;

    fn ns(s: &str) -> NsPath {
        NsPath::parse(s)
    }

    fn e(kind: ExprKind) -> Expr {
        Expr::new(kind, Span::default())
    }

    fn name_ty(s: &str) -> SurfaceType {
        SurfaceType::Name(QName::parse(s), Span::default())
    }

    fn nullary_def(ident: &str, body: Expr) -> DefDecl {
        DefDecl {
            ident: ident.to_string(),
            public: true,
            formals: Vec::new(),
            ret_ty: None,
            body,
            span: Span::default(),
        }
    }

    fn edge_table(ident: &str) -> TableDecl {
        TableDecl {
            ident: ident.to_string(),
            public: true,
            kind: TableKind::Relation,
            attributes: vec![
                ("src".to_string(), name_ty("Int")),
                ("dst".to_string(), name_ty("Int")),
            ],
            span: Span::default(),
        }
    }

    #[test]
    fn test_cross_namespace_def_reference() {
        // namespace A.B { def f() = false }; namespace A { def g() = A.B.f() }
        let mut program = Program::new();
        program.add_def(ns("A.B"), nullary_def("f", e(ExprKind::False)));
        program.add_def(
            ns("A"),
            nullary_def(
                "g",
                e(ExprKind::Apply {
                    callee: Box::new(e(ExprKind::Ref(QName::parse("A.B.f")))),
                    args: Vec::new(),
                }),
            ),
        );

        let mut factory = SymbolFactory::new();
        let (resolved_program, _) = resolve_program(&program, &mut factory).unwrap();

        let f_sym = resolved_program
            .defs
            .keys()
            .find(|s| s.ident == "f")
            .unwrap()
            .clone();
        let g = resolved_program
            .defs
            .values()
            .find(|d| d.sym.ident == "g")
            .unwrap();
        match &g.body.kind {
            resolved::ExprKind::Apply { callee, .. } => match &callee.kind {
                resolved::ExprKind::Ref(sym) => assert_eq!(sym, &f_sym),
                other => panic!("expected Ref callee, got {:?}", other),
            },
            other => panic!("expected Apply body, got {:?}", other),
        }
    }

    #[test]
    fn test_table_attribute_types_elaborate() {
        let mut program = Program::new();
        program.add_table(ns("G"), edge_table("Edge"));

        let mut factory = SymbolFactory::new();
        let (resolved_program, _) = resolve_program(&program, &mut factory).unwrap();
        let table = resolved_program.tables.values().next().unwrap();
        assert_eq!(table.attributes[0], ("src".to_string(), Type::Int32));
        assert_eq!(table.kind, TableKind::Relation);
    }

    #[test]
    fn test_lattice_resolves_alongside_tables() {
        let mut program = Program::new();
        program.add_lattice(
            ns("G"),
            TableDecl {
                ident: "Reach".to_string(),
                public: true,
                kind: TableKind::Lattice,
                attributes: vec![("dist".to_string(), name_ty("Int"))],
                span: Span::default(),
            },
        );
        program.add_index(
            ns("G"),
            IndexDecl {
                table: QName::parse("Reach"),
                columns: vec![vec!["dist".to_string()]],
                span: Span::default(),
            },
        );

        let mut factory = SymbolFactory::new();
        let (resolved_program, _) = resolve_program(&program, &mut factory).unwrap();
        let table = resolved_program.tables.values().next().unwrap();
        assert_eq!(table.kind, TableKind::Lattice);
        assert_eq!(resolved_program.indices[0].table, table.sym);
    }

    #[test]
    fn test_undefined_table_in_index_and_constraint() {
        let mut program = Program::new();
        program.add_index(
            ns("G"),
            IndexDecl {
                table: QName::parse("Missing"),
                columns: vec![vec!["src".to_string()]],
                span: Span::default(),
            },
        );
        program.add_constraint(
            ns("G"),
            ConstraintDecl {
                head: Predicate {
                    table: QName::parse("AlsoMissing"),
                    terms: Vec::new(),
                    span: Span::default(),
                },
                body: Vec::new(),
                span: Span::default(),
            },
        );

        let mut factory = SymbolFactory::new();
        let errors = resolve_program(&program, &mut factory).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|err| matches!(err, ResolveError::UndefinedTable { .. })));
    }

    #[test]
    fn test_constraint_variables_bind_rule_wide() {
        // Path(x, y) :- Edge(x, y).
        let mut program = Program::new();
        program.add_table(ns("G"), edge_table("Edge"));
        program.add_table(ns("G"), edge_table("Path"));
        program.add_constraint(
            ns("G"),
            ConstraintDecl {
                head: Predicate {
                    table: QName::parse("Path"),
                    terms: vec![
                        e(ExprKind::Var("x".to_string())),
                        e(ExprKind::Var("y".to_string())),
                    ],
                    span: Span::default(),
                },
                body: vec![Predicate {
                    table: QName::parse("Edge"),
                    terms: vec![
                        e(ExprKind::Var("x".to_string())),
                        e(ExprKind::Var("y".to_string())),
                    ],
                    span: Span::default(),
                }],
                span: Span::default(),
            },
        );

        let mut factory = SymbolFactory::new();
        let (resolved_program, _) = resolve_program(&program, &mut factory).unwrap();
        let constraint = &resolved_program.constraints[0];

        let head_x = match &constraint.head.terms[0].kind {
            resolved::ExprKind::Var(v) => v.clone(),
            other => panic!("expected Var, got {:?}", other),
        };
        let body_x = match &constraint.body[0].terms[0].kind {
            resolved::ExprKind::Var(v) => v.clone(),
            other => panic!("expected Var, got {:?}", other),
        };
        // The same rule variable resolves to the same symbol in head and body.
        assert_eq!(head_x, body_x);
    }

    #[test]
    fn test_property_law_resolves() {
        let mut program = Program::new();
        program.add_def(ns("M"), nullary_def("zero", e(ExprKind::Int32(0))));
        program.add_property(
            ns("M"),
            surface::PropertyDecl {
                ident: "zeroIsZero".to_string(),
                law: e(ExprKind::Binary {
                    op: BinaryOp::Equal,
                    lhs: Box::new(e(ExprKind::Ref(QName::parse("zero")))),
                    rhs: Box::new(e(ExprKind::Int32(0))),
                }),
                span: Span::default(),
            },
        );

        let mut factory = SymbolFactory::new();
        let (resolved_program, _) = resolve_program(&program, &mut factory).unwrap();
        assert_eq!(resolved_program.properties.len(), 1);
        assert_eq!(resolved_program.properties[0].sym.ident, "zeroIsZero");
    }

    #[test]
    fn test_timings_are_populated() {
        let mut program = Program::new();
        program.add_def(ns("A"), nullary_def("f", e(ExprKind::Unit)));
        let mut factory = SymbolFactory::new();
        let (_, timings) = resolve_program(&program, &mut factory).unwrap();
        assert!(timings.total_ns >= timings.defs_ns);
    }

    #[test]
    fn test_errors_from_independent_namespaces_accumulate() {
        let mut program = Program::new();
        program.add_def(
            ns("A"),
            nullary_def("f", e(ExprKind::Ref(QName::parse("missing1")))),
        );
        program.add_def(
            ns("B"),
            nullary_def("g", e(ExprKind::Ref(QName::parse("missing2")))),
        );

        let mut factory = SymbolFactory::new();
        let errors = resolve_program(&program, &mut factory).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
