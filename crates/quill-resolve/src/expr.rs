//! Expression resolution.
//!
//! Walks the surface AST variant by variant, replacing every name
//! occurrence with a resolved symbol:
//!
//! - Bound variables resolve through the lexical [`Scope`]; `Wild` passes
//!   through.
//! - Unqualified definition references try the current namespace's defs
//!   *and* hooks (both hitting is ambiguous), then fall back to the root
//!   namespace. Qualified references look only in the named namespace and
//!   are subject to accessibility.
//! - `?holes` mint a hole symbol in the enclosing namespace.
//! - A bare tag whose declared payload is `Unit` gets a synthesized unit
//!   payload; a bare tag with any other payload type becomes the
//!   eta-expansion `λx. Tag(x)` with a freshly minted formal.
//!
//! Sibling subtrees are resolved independently and their diagnostics
//! accumulated, so a single pass reports as much as possible.

use std::collections::HashMap;

use quill_ast::foundation::name::{NsPath, QName};
use quill_ast::foundation::span::Span;
use quill_ast::foundation::symbol::{SymbolFactory, VarSym};
use quill_ast::resolved;
use quill_ast::surface;
use quill_ast::types::{Effect, Scheme, Type};

use crate::access::is_accessible;
use crate::error::{merge2, merge_all, ResolveError};
use crate::tags::{lookup_enum_by_tag, EnumTable};
use crate::types::lookup_type;

/// Lexical scope of bound variables. Inner frames shadow outer ones.
#[derive(Debug, Default)]
pub struct Scope {
    frames: Vec<HashMap<String, VarSym>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub fn pop(&mut self) {
        assert!(!self.frames.is_empty(), "cannot pop: no active scope");
        self.frames.pop();
    }

    pub fn bind(&mut self, name: impl Into<String>, sym: VarSym) {
        assert!(!self.frames.is_empty(), "cannot bind: no active scope");
        self.frames.last_mut().unwrap().insert(name.into(), sym);
    }

    pub fn get(&self, name: &str) -> Option<&VarSym> {
        self.frames.iter().rev().find_map(|f| f.get(name))
    }
}

/// Resolves expressions and declarations of one surface program.
pub struct ExprResolver<'a> {
    pub program: &'a surface::Program,
    pub enums: &'a EnumTable,
    pub factory: &'a mut SymbolFactory,
}

type ExprResult = Result<resolved::Expr, Vec<ResolveError>>;

impl<'a> ExprResolver<'a> {
    pub fn new(
        program: &'a surface::Program,
        enums: &'a EnumTable,
        factory: &'a mut SymbolFactory,
    ) -> Self {
        Self {
            program,
            enums,
            factory,
        }
    }

    /// Resolves one expression as seen from namespace `ns`.
    pub fn resolve_expr(
        &mut self,
        expr: &surface::Expr,
        ns: &NsPath,
        scope: &mut Scope,
    ) -> ExprResult {
        use surface::ExprKind as S;

        let span = expr.span;
        let out = |kind| Ok(resolved::Expr::new(kind, span));

        match &expr.kind {
            S::Unit => out(resolved::ExprKind::Unit),
            S::True => out(resolved::ExprKind::True),
            S::False => out(resolved::ExprKind::False),
            S::Int8(v) => out(resolved::ExprKind::Int8(*v)),
            S::Int16(v) => out(resolved::ExprKind::Int16(*v)),
            S::Int32(v) => out(resolved::ExprKind::Int32(*v)),
            S::Int64(v) => out(resolved::ExprKind::Int64(*v)),
            S::Str(v) => out(resolved::ExprKind::Str(v.clone())),

            S::Wild => out(resolved::ExprKind::Wild),

            S::Var(name) => match scope.get(name) {
                Some(sym) => out(resolved::ExprKind::Var(sym.clone())),
                // Not a bound variable: an unqualified reference.
                None => {
                    let qname = QName::new(NsPath::root(), name.clone());
                    self.lookup_def(&qname, ns, span).map_err(|e| vec![e]).and_then(out)
                }
            },

            S::Ref(name) => self
                .lookup_def(name, ns, span)
                .map_err(|e| vec![e])
                .and_then(out),

            S::Hole(name) => {
                let sym = self.factory.hole_sym(ns.clone(), name.clone(), span);
                out(resolved::ExprKind::Hole(sym))
            }

            S::Tag {
                enum_name,
                tag,
                payload,
            } => self.resolve_tag(enum_name.as_ref(), tag, payload.as_deref(), ns, scope, span),

            S::Apply { callee, args } => {
                let callee = self.resolve_expr(callee, ns, scope);
                let args = merge_all(
                    args.iter()
                        .map(|a| self.resolve_expr(a, ns, scope))
                        .collect::<Vec<_>>(),
                );
                let (callee, args) = merge2(callee, args)?;
                out(resolved::ExprKind::Apply {
                    callee: Box::new(callee),
                    args,
                })
            }

            S::Lambda { formals, body } => {
                scope.push();
                let formals = merge_all(
                    formals
                        .iter()
                        .map(|f| self.resolve_formal(f, ns, scope))
                        .collect::<Vec<_>>(),
                );
                let body = self.resolve_expr(body, ns, scope);
                scope.pop();
                let (formals, body) = merge2(formals, body)?;
                out(resolved::ExprKind::Lambda {
                    formals,
                    body: Box::new(body),
                })
            }

            S::Let { name, bound, body } => {
                let bound = self.resolve_expr(bound, ns, scope);
                let var = self.factory.fresh_var_sym(name);
                scope.push();
                scope.bind(name.clone(), var.clone());
                let body = self.resolve_expr(body, ns, scope);
                scope.pop();
                let (bound, body) = merge2(bound, body)?;
                out(resolved::ExprKind::Let {
                    var,
                    bound: Box::new(bound),
                    body: Box::new(body),
                })
            }

            S::IfThenElse {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond = self.resolve_expr(cond, ns, scope);
                let then_branch = self.resolve_expr(then_branch, ns, scope);
                let else_branch = self.resolve_expr(else_branch, ns, scope);
                let (cond, (then_branch, else_branch)) =
                    merge2(cond, merge2(then_branch, else_branch))?;
                out(resolved::ExprKind::IfThenElse {
                    cond: Box::new(cond),
                    then_branch: Box::new(then_branch),
                    else_branch: Box::new(else_branch),
                })
            }

            S::Tuple(elems) => {
                let elems = merge_all(
                    elems
                        .iter()
                        .map(|e| self.resolve_expr(e, ns, scope))
                        .collect::<Vec<_>>(),
                )?;
                out(resolved::ExprKind::Tuple(elems))
            }

            S::Set(elems) => {
                let elems = merge_all(
                    elems
                        .iter()
                        .map(|e| self.resolve_expr(e, ns, scope))
                        .collect::<Vec<_>>(),
                )?;
                out(resolved::ExprKind::Set(elems))
            }

            S::Unary { op, expr: operand } => {
                let operand = self.resolve_expr(operand, ns, scope)?;
                out(resolved::ExprKind::Unary {
                    op: *op,
                    expr: Box::new(operand),
                })
            }

            S::Binary { op, lhs, rhs } => {
                let lhs = self.resolve_expr(lhs, ns, scope);
                let rhs = self.resolve_expr(rhs, ns, scope);
                let (lhs, rhs) = merge2(lhs, rhs)?;
                out(resolved::ExprKind::Binary {
                    op: *op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                })
            }

            S::Ascribe { expr: inner, ty } => {
                let inner = self.resolve_expr(inner, ns, scope);
                let ty = lookup_type(ty, ns, self.enums).map_err(|e| vec![e]);
                let (inner, ty) = merge2(inner, ty)?;
                out(resolved::ExprKind::Ascribe {
                    expr: Box::new(inner),
                    ty,
                })
            }
        }
    }

    /// Resolves a whole definition declared in `ns`.
    pub fn resolve_def(
        &mut self,
        ns: &NsPath,
        decl: &surface::DefDecl,
    ) -> Result<resolved::Def, Vec<ResolveError>> {
        let sym = self.factory.defn_sym(ns.clone(), decl.ident.clone(), decl.span);

        let mut scope = Scope::new();
        scope.push();
        let formals = merge_all(
            decl.formals
                .iter()
                .map(|f| self.resolve_formal(f, ns, &mut scope))
                .collect::<Vec<_>>(),
        );
        let ret_ty = match &decl.ret_ty {
            Some(st) => lookup_type(st, ns, self.enums).map(Some).map_err(|e| vec![e]),
            None => Ok(None),
        };
        let body = self.resolve_expr(&decl.body, ns, &mut scope);
        scope.pop();

        let (formals, (ret_ty, body)) = merge2(formals, merge2(ret_ty, body))?;
        let scheme = self.def_scheme(&formals, ret_ty);

        Ok(resolved::Def {
            sym,
            public: decl.public,
            scheme,
            effect: Effect::Pure,
            formals,
            body,
            span: decl.span,
        })
    }

    /// Wraps a named top-level expression in a synthetic definition with a
    /// fresh polymorphic scheme and the empty effect.
    pub fn resolve_named(
        &mut self,
        ns: &NsPath,
        decl: &surface::NamedExpr,
    ) -> Result<resolved::Def, Vec<ResolveError>> {
        let sym = self.factory.defn_sym(ns.clone(), decl.ident.clone(), decl.span);
        let mut scope = Scope::new();
        scope.push();
        let body = self.resolve_expr(&decl.expr, ns, &mut scope)?;
        scope.pop();

        let var = self.factory.fresh_type_var();
        Ok(resolved::Def {
            sym,
            public: false,
            scheme: Scheme {
                vars: vec![var],
                base: Type::Var(var),
            },
            effect: Effect::Pure,
            formals: Vec::new(),
            body,
            span: decl.span,
        })
    }

    fn resolve_formal(
        &mut self,
        formal: &surface::FormalParam,
        ns: &NsPath,
        scope: &mut Scope,
    ) -> Result<resolved::Formal, Vec<ResolveError>> {
        let sym = self.factory.fresh_var_sym(&formal.name);
        scope.bind(formal.name.clone(), sym.clone());
        let ty = match &formal.ty {
            Some(st) => Some(lookup_type(st, ns, self.enums).map_err(|e| vec![e])?),
            None => None,
        };
        Ok(resolved::Formal {
            sym,
            ty,
            span: formal.span,
        })
    }

    fn resolve_tag(
        &mut self,
        enum_name: Option<&QName>,
        tag: &str,
        payload: Option<&surface::Expr>,
        ns: &NsPath,
        scope: &mut Scope,
        span: Span,
    ) -> ExprResult {
        let entry =
            lookup_enum_by_tag(self.enums, enum_name, tag, ns, span).map_err(|e| vec![e])?;
        let enum_sym = entry.sym.clone();
        let payload_ty = entry.cases[tag].payload.clone();

        match payload {
            Some(expr) => {
                let payload = self.resolve_expr(expr, ns, scope)?;
                Ok(resolved::Expr::new(
                    resolved::ExprKind::Tag {
                        enum_sym,
                        tag: tag.to_string(),
                        payload: Box::new(payload),
                    },
                    span,
                ))
            }
            None if payload_ty == Type::Unit => Ok(resolved::Expr::new(
                resolved::ExprKind::Tag {
                    enum_sym,
                    tag: tag.to_string(),
                    payload: Box::new(resolved::Expr::new(resolved::ExprKind::Unit, span)),
                },
                span,
            )),
            None => {
                // Bare constructor with a non-unit payload: eta-expand so
                // the tag can be used as a function value.
                let var = self.factory.fresh_var_sym("x");
                let body = resolved::Expr::new(
                    resolved::ExprKind::Tag {
                        enum_sym,
                        tag: tag.to_string(),
                        payload: Box::new(resolved::Expr::new(
                            resolved::ExprKind::Var(var.clone()),
                            span,
                        )),
                    },
                    span,
                );
                Ok(resolved::Expr::new(
                    resolved::ExprKind::Lambda {
                        formals: vec![resolved::Formal {
                            sym: var,
                            ty: Some(payload_ty),
                            span,
                        }],
                        body: Box::new(body),
                    },
                    span,
                ))
            }
        }
    }

    /// Looks up a definition or hook reference.
    fn lookup_def(
        &self,
        name: &QName,
        ns: &NsPath,
        span: Span,
    ) -> Result<resolved::ExprKind, ResolveError> {
        if name.is_qualified() {
            let target = &name.namespace;
            if let Some(decl) = self
                .program
                .defs_in(target)
                .iter()
                .find(|d| d.ident == name.ident)
            {
                if !is_accessible(target, decl.public, ns) {
                    return Err(ResolveError::InaccessibleDef {
                        name: name.clone(),
                        ns: ns.clone(),
                        span,
                    });
                }
                let sym = self.factory.defn_sym(target.clone(), name.ident.clone(), decl.span);
                return Ok(resolved::ExprKind::Ref(sym));
            }
            if let Some(hook) = self.program.hooks.get(name) {
                let sym = self.factory.defn_sym(target.clone(), name.ident.clone(), hook.span);
                return Ok(resolved::ExprKind::Hook(sym));
            }
            return Err(ResolveError::UndefinedDef {
                name: name.clone(),
                ns: ns.clone(),
                span,
            });
        }

        // Unqualified: current namespace first, then the root.
        if let Some(kind) = self.lookup_unqualified(&name.ident, ns, span)? {
            return Ok(kind);
        }
        if !ns.is_root() {
            if let Some(kind) = self.lookup_unqualified(&name.ident, &NsPath::root(), span)? {
                return Ok(kind);
            }
        }
        Err(ResolveError::UndefinedDef {
            name: name.clone(),
            ns: ns.clone(),
            span,
        })
    }

    /// One namespace's worth of unqualified lookup: defs and hooks both
    /// count, and hitting both at once is ambiguous.
    fn lookup_unqualified(
        &self,
        ident: &str,
        in_ns: &NsPath,
        span: Span,
    ) -> Result<Option<resolved::ExprKind>, ResolveError> {
        let def = self
            .program
            .defs_in(in_ns)
            .iter()
            .find(|d| d.ident == ident);
        let hook_name = QName::new(in_ns.clone(), ident);
        let hook = self.program.hooks.get(&hook_name);

        match (def, hook) {
            (Some(decl), Some(hook)) => {
                let mut locations = vec![decl.span, hook.span];
                locations.sort();
                Err(ResolveError::AmbiguousRef {
                    name: QName::new(NsPath::root(), ident),
                    ns: in_ns.clone(),
                    span,
                    locations,
                })
            }
            (Some(decl), None) => Ok(Some(resolved::ExprKind::Ref(self.factory.defn_sym(
                in_ns.clone(),
                ident,
                decl.span,
            )))),
            (None, Some(hook)) => Ok(Some(resolved::ExprKind::Hook(self.factory.defn_sym(
                in_ns.clone(),
                ident,
                hook.span,
            )))),
            (None, None) => Ok(None),
        }
    }

    fn def_scheme(&mut self, formals: &[resolved::Formal], ret_ty: Option<Type>) -> Scheme {
        let annotated: Option<Vec<Type>> = formals.iter().map(|f| f.ty.clone()).collect();
        match (annotated, ret_ty) {
            (Some(params), Some(result)) if !params.is_empty() => Scheme::mono(Type::Arrow {
                params,
                result: Box::new(result),
            }),
            (Some(_), Some(result)) => Scheme::mono(result),
            _ => {
                let var = self.factory.fresh_type_var();
                Scheme {
                    vars: vec![var],
                    base: Type::Var(var),
                }
            }
        }
    }
}

/// Collects the free variable names of a surface expression, in first-use
/// order. Constraint terms use this to bind their datalog variables
/// before resolution.
pub fn collect_var_names(expr: &surface::Expr, out: &mut Vec<String>) {
    use surface::ExprKind as S;
    match &expr.kind {
        S::Var(name) => {
            if !out.contains(name) {
                out.push(name.clone());
            }
        }
        S::Tag { payload, .. } => {
            if let Some(p) = payload {
                collect_var_names(p, out);
            }
        }
        S::Apply { callee, args } => {
            collect_var_names(callee, out);
            for a in args {
                collect_var_names(a, out);
            }
        }
        S::Lambda { body, .. } => collect_var_names(body, out),
        S::Let { bound, body, .. } => {
            collect_var_names(bound, out);
            collect_var_names(body, out);
        }
        S::IfThenElse {
            cond,
            then_branch,
            else_branch,
        } => {
            collect_var_names(cond, out);
            collect_var_names(then_branch, out);
            collect_var_names(else_branch, out);
        }
        S::Tuple(elems) | S::Set(elems) => {
            for e in elems {
                collect_var_names(e, out);
            }
        }
        S::Unary { expr, .. } => collect_var_names(expr, out),
        S::Binary { lhs, rhs, .. } => {
            collect_var_names(lhs, out);
            collect_var_names(rhs, out);
        }
        S::Ascribe { expr, .. } => collect_var_names(expr, out),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_ast::surface::{
        CaseDecl, DefDecl, EnumDecl, Expr, ExprKind, Hook, Program, SurfaceType,
    };

    fn ns(s: &str) -> NsPath {
        NsPath::parse(s)
    }

    fn sp(start: u32) -> Span {
        Span::new(0, start, start + 1)
    }

    fn e(kind: ExprKind) -> Expr {
        Expr::new(kind, Span::default())
    }

    fn name_ty(s: &str) -> SurfaceType {
        SurfaceType::Name(QName::parse(s), Span::default())
    }

    fn def(ident: &str, public: bool, body: Expr, span: Span) -> DefDecl {
        DefDecl {
            ident: ident.to_string(),
            public,
            formals: Vec::new(),
            ret_ty: None,
            body,
            span,
        }
    }

    fn option_program() -> Program {
        let mut program = Program::new();
        program.add_enum(
            NsPath::root(),
            EnumDecl {
                ident: "Option".to_string(),
                public: true,
                tparams: vec!["T".to_string()],
                cases: vec![
                    CaseDecl {
                        tag: "None".to_string(),
                        payload: name_ty("Unit"),
                        span: Span::default(),
                    },
                    CaseDecl {
                        tag: "Some".to_string(),
                        payload: name_ty("T"),
                        span: Span::default(),
                    },
                ],
                span: Span::default(),
            },
        );
        program
    }

    fn resolve_in(
        program: &Program,
        expr: &Expr,
        in_ns: &NsPath,
    ) -> Result<resolved::Expr, Vec<ResolveError>> {
        let mut factory = SymbolFactory::new();
        let mut enums = EnumTable::collect(program, &mut factory);
        crate::types::resolve_enum_cases(program, &mut enums).unwrap();
        let mut resolver = ExprResolver::new(program, &enums, &mut factory);
        let mut scope = Scope::new();
        scope.push();
        resolver.resolve_expr(expr, in_ns, &mut scope)
    }

    #[test]
    fn test_qualified_ref_matches_defining_symbol() {
        let mut program = Program::new();
        program.add_def(ns("A.B"), def("f", true, e(ExprKind::False), sp(0)));

        let occurrence = e(ExprKind::Ref(QName::parse("A.B.f")));
        let resolved_expr = resolve_in(&program, &occurrence, &ns("A")).unwrap();
        match resolved_expr.kind {
            resolved::ExprKind::Ref(sym) => {
                assert_eq!(sym.namespace, ns("A.B"));
                assert_eq!(sym.ident, "f");
            }
            other => panic!("expected Ref, got {:?}", other),
        }
    }

    #[test]
    fn test_unqualified_falls_back_to_root() {
        let mut program = Program::new();
        program.add_def(NsPath::root(), def("g", true, e(ExprKind::Unit), sp(0)));

        let occurrence = e(ExprKind::Ref(QName::parse("g")));
        let resolved_expr = resolve_in(&program, &occurrence, &ns("Deep.Inside")).unwrap();
        assert!(matches!(
            resolved_expr.kind,
            resolved::ExprKind::Ref(sym) if sym.namespace.is_root()
        ));
    }

    #[test]
    fn test_def_and_hook_collision_is_ambiguous() {
        let mut program = Program::new();
        program.add_def(ns("A"), def("f", true, e(ExprKind::Unit), sp(20)));
        program.add_hook(
            QName::parse("A.f"),
            Hook {
                ty: Type::Arrow {
                    params: vec![Type::Unit],
                    result: Box::new(Type::Unit),
                },
                span: sp(3),
            },
        );

        let occurrence = e(ExprKind::Ref(QName::parse("f")));
        let errors = resolve_in(&program, &occurrence, &ns("A")).unwrap_err();
        match &errors[0] {
            ResolveError::AmbiguousRef { locations, .. } => {
                assert_eq!(locations, &vec![sp(3), sp(20)]);
            }
            other => panic!("expected AmbiguousRef, got {:?}", other),
        }
    }

    #[test]
    fn test_hook_resolves_like_a_def() {
        let mut program = Program::new();
        program.add_hook(
            QName::parse("Host.print"),
            Hook {
                ty: Type::Arrow {
                    params: vec![Type::Str],
                    result: Box::new(Type::Unit),
                },
                span: sp(0),
            },
        );

        let occurrence = e(ExprKind::Ref(QName::parse("Host.print")));
        let resolved_expr = resolve_in(&program, &occurrence, &ns("A")).unwrap();
        assert!(matches!(resolved_expr.kind, resolved::ExprKind::Hook(_)));
    }

    #[test]
    fn test_inaccessible_def() {
        let mut program = Program::new();
        program.add_def(ns("X"), def("h", false, e(ExprKind::Unit), sp(0)));

        let occurrence = e(ExprKind::Ref(QName::parse("X.h")));
        let errors = resolve_in(&program, &occurrence, &ns("Y")).unwrap_err();
        match &errors[0] {
            ResolveError::InaccessibleDef { name, ns: from, .. } => {
                assert_eq!(name, &QName::parse("X.h"));
                assert_eq!(from, &ns("Y"));
            }
            other => panic!("expected InaccessibleDef, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_unit_tag_gets_synthesized_payload() {
        let program = option_program();
        let occurrence = e(ExprKind::Tag {
            enum_name: None,
            tag: "None".to_string(),
            payload: None,
        });
        let resolved_expr = resolve_in(&program, &occurrence, &NsPath::root()).unwrap();
        match resolved_expr.kind {
            resolved::ExprKind::Tag { tag, payload, .. } => {
                assert_eq!(tag, "None");
                assert!(matches!(payload.kind, resolved::ExprKind::Unit));
            }
            other => panic!("expected Tag, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_nonunit_tag_eta_expands() {
        let program = option_program();
        let occurrence = e(ExprKind::Tag {
            enum_name: None,
            tag: "Some".to_string(),
            payload: None,
        });
        let resolved_expr = resolve_in(&program, &occurrence, &NsPath::root()).unwrap();
        match resolved_expr.kind {
            resolved::ExprKind::Lambda { formals, body } => {
                assert_eq!(formals.len(), 1);
                match body.kind {
                    resolved::ExprKind::Tag { tag, payload, .. } => {
                        assert_eq!(tag, "Some");
                        assert!(matches!(
                            payload.kind,
                            resolved::ExprKind::Var(ref v) if *v == formals[0].sym
                        ));
                    }
                    other => panic!("expected Tag body, got {:?}", other),
                }
            }
            other => panic!("expected eta-expansion, got {:?}", other),
        }
    }

    #[test]
    fn test_hole_mints_symbol_in_enclosing_namespace() {
        let program = Program::new();
        let occurrence = e(ExprKind::Hole("todo".to_string()));
        let resolved_expr = resolve_in(&program, &occurrence, &ns("A.B")).unwrap();
        match resolved_expr.kind {
            resolved::ExprKind::Hole(sym) => {
                assert_eq!(sym.namespace, ns("A.B"));
                assert_eq!(sym.ident, "todo");
            }
            other => panic!("expected Hole, got {:?}", other),
        }
    }

    #[test]
    fn test_let_shadowing() {
        let program = Program::new();
        // let x = unit; let x = true; x
        let occurrence = e(ExprKind::Let {
            name: "x".to_string(),
            bound: Box::new(e(ExprKind::Unit)),
            body: Box::new(e(ExprKind::Let {
                name: "x".to_string(),
                bound: Box::new(e(ExprKind::True)),
                body: Box::new(e(ExprKind::Var("x".to_string()))),
            })),
        });
        let resolved_expr = resolve_in(&program, &occurrence, &NsPath::root()).unwrap();
        let resolved::ExprKind::Let { var: outer, body, .. } = resolved_expr.kind else {
            panic!("expected Let");
        };
        let resolved::ExprKind::Let { var: inner, body, .. } = body.kind else {
            panic!("expected inner Let");
        };
        assert_ne!(outer, inner);
        assert!(matches!(body.kind, resolved::ExprKind::Var(v) if v == inner));
    }

    #[test]
    fn test_errors_accumulate_across_siblings() {
        let program = Program::new();
        let occurrence = e(ExprKind::Tuple(vec![
            e(ExprKind::Ref(QName::parse("missing1"))),
            e(ExprKind::Unit),
            e(ExprKind::Ref(QName::parse("missing2"))),
        ]));
        let errors = resolve_in(&program, &occurrence, &NsPath::root()).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|err| matches!(err, ResolveError::UndefinedDef { .. })));
    }

    #[test]
    fn test_named_expr_becomes_polymorphic_synthetic_def() {
        let program = Program::new();
        let mut factory = SymbolFactory::new();
        let enums = EnumTable::collect(&program, &mut factory);
        let mut resolver = ExprResolver::new(&program, &enums, &mut factory);
        let named = surface::NamedExpr {
            ident: "probe".to_string(),
            expr: e(ExprKind::Int32(42)),
            span: Span::default(),
        };
        let def = resolver.resolve_named(&ns("A"), &named).unwrap();
        assert_eq!(def.sym.ident, "probe");
        assert_eq!(def.effect, Effect::Pure);
        assert_eq!(def.scheme.vars.len(), 1);
        assert!(matches!(def.scheme.base, Type::Var(v) if v == def.scheme.vars[0]));
        assert!(def.formals.is_empty());
    }
}
