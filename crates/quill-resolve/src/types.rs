//! Type elaboration.
//!
//! Translates surface type syntax into internal [`Type`] terms.
//!
//! Resolution order for a type name:
//!
//! 1. Built-in primitives, including the aliases `Int` → `Int32` and
//!    `Float` → `Float64`.
//! 2. Type parameters in scope (enum case payloads only).
//! 3. For unqualified names: enums of the current namespace, then the
//!    root namespace.
//! 4. For qualified names: enums of the named namespace only.
//!
//! Anything else is an undefined type. Higher-kinded inference is not
//! performed here; applications are elaborated structurally.

use std::collections::HashMap;

use quill_ast::foundation::name::{NsPath, QName};
use quill_ast::surface::{self, SurfaceType};
use quill_ast::types::{Kind, Type};

use crate::access::is_accessible;
use crate::error::ResolveError;
use crate::tags::EnumTable;

/// Elaborates a surface type as seen from namespace `ns`.
pub fn lookup_type(
    st: &SurfaceType,
    ns: &NsPath,
    enums: &EnumTable,
) -> Result<Type, ResolveError> {
    lookup_type_with_vars(st, ns, enums, &HashMap::new())
}

/// Elaborates a surface type with type parameters in scope, mapping each
/// parameter name to its minted type-variable id.
pub fn lookup_type_with_vars(
    st: &SurfaceType,
    ns: &NsPath,
    enums: &EnumTable,
    tvars: &HashMap<String, u64>,
) -> Result<Type, ResolveError> {
    match st {
        SurfaceType::Name(name, span) => {
            if !name.is_qualified() {
                if let Some(ty) = builtin(&name.ident) {
                    return Ok(ty);
                }
                if let Some(id) = tvars.get(&name.ident) {
                    return Ok(Type::Var(*id));
                }
                // Current namespace, then the root.
                if let Some(entry) = enums.lookup_in(ns, &name.ident) {
                    return Ok(enum_type(entry));
                }
                if let Some(entry) = enums.lookup_in(&NsPath::root(), &name.ident) {
                    return Ok(enum_type(entry));
                }
                Err(ResolveError::UndefinedType {
                    name: name.clone(),
                    ns: ns.clone(),
                    span: *span,
                })
            } else {
                // Qualified names resolve only in the named namespace.
                match enums.lookup_in(&name.namespace, &name.ident) {
                    Some(entry) => {
                        if is_accessible(&entry.sym.namespace, entry.public, ns) {
                            Ok(enum_type(entry))
                        } else {
                            Err(ResolveError::InaccessibleEnum {
                                name: name.clone(),
                                ns: ns.clone(),
                                span: *span,
                            })
                        }
                    }
                    None => Err(ResolveError::UndefinedType {
                        name: name.clone(),
                        ns: ns.clone(),
                        span: *span,
                    }),
                }
            }
        }
        SurfaceType::Tuple(elems, _) => {
            let elems = elems
                .iter()
                .map(|t| lookup_type_with_vars(t, ns, enums, tvars))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Type::Tuple(elems))
        }
        SurfaceType::Arrow(params, result, _) => {
            let params = params
                .iter()
                .map(|t| lookup_type_with_vars(t, ns, enums, tvars))
                .collect::<Result<Vec<_>, _>>()?;
            let result = lookup_type_with_vars(result, ns, enums, tvars)?;
            Ok(Type::Arrow {
                params,
                result: Box::new(result),
            })
        }
        SurfaceType::Apply(base, arg, _) => {
            let base = lookup_type_with_vars(base, ns, enums, tvars)?;
            let arg = lookup_type_with_vars(arg, ns, enums, tvars)?;
            Ok(Type::Apply {
                base: Box::new(base),
                arg: Box::new(arg),
            })
        }
    }
}

/// Second enum-resolution pass: elaborate every case's payload type, with
/// the enum's type parameters in scope.
pub fn resolve_enum_cases(
    program: &surface::Program,
    enums: &mut EnumTable,
) -> Result<(), Vec<ResolveError>> {
    let mut errors = Vec::new();
    let mut updates = Vec::new();

    for (ns, decls) in &program.enums {
        for decl in decls {
            let Some(entry) = enums.lookup_in(ns, &decl.ident) else {
                continue;
            };
            let sym = entry.sym.clone();
            let tvars: HashMap<String, u64> = entry.tparams.iter().cloned().collect();
            let mut payloads = Vec::new();
            for case in &decl.cases {
                match lookup_type_with_vars(&case.payload, ns, enums, &tvars) {
                    Ok(ty) => payloads.push((case.tag.clone(), ty)),
                    Err(e) => errors.push(e),
                }
            }
            updates.push((sym, payloads));
        }
    }

    for (sym, payloads) in updates {
        if let Some(entry) = enums.get_mut(&sym) {
            for (tag, ty) in payloads {
                if let Some(case) = entry.cases.get_mut(&tag) {
                    case.payload = ty;
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn enum_type(entry: &crate::tags::EnumEntry) -> Type {
    Type::Enum {
        sym: entry.sym.clone(),
        kind: Kind::of_arity(entry.tparams.len()),
    }
}

fn builtin(ident: &str) -> Option<Type> {
    Some(match ident {
        "Unit" => Type::Unit,
        "Bool" => Type::Bool,
        "Char" => Type::Char,
        "Int8" => Type::Int8,
        "Int16" => Type::Int16,
        "Int32" | "Int" => Type::Int32,
        "Int64" => Type::Int64,
        "Float32" => Type::Float32,
        "Float64" | "Float" => Type::Float64,
        "BigInt" => Type::BigInt,
        "Str" => Type::Str,
        "Array" => Type::Array,
        "Native" => Type::Native,
        "Ref" => Type::Ref,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_ast::foundation::span::Span;
    use quill_ast::foundation::symbol::SymbolFactory;
    use quill_ast::surface::{CaseDecl, EnumDecl, Program};

    fn ns(s: &str) -> NsPath {
        NsPath::parse(s)
    }

    fn name_ty(s: &str) -> SurfaceType {
        SurfaceType::Name(QName::parse(s), Span::default())
    }

    fn empty_table() -> EnumTable {
        EnumTable::collect(&Program::new(), &mut SymbolFactory::new())
    }

    fn table_with_enum(namespace: &str, ident: &str, tparams: &[&str]) -> EnumTable {
        let mut program = Program::new();
        program.add_enum(
            ns(namespace),
            EnumDecl {
                ident: ident.to_string(),
                public: true,
                tparams: tparams.iter().map(|s| s.to_string()).collect(),
                cases: vec![CaseDecl {
                    tag: "C".to_string(),
                    payload: name_ty("Unit"),
                    span: Span::default(),
                }],
                span: Span::default(),
            },
        );
        EnumTable::collect(&program, &mut SymbolFactory::new())
    }

    #[test]
    fn test_builtins_and_aliases() {
        let table = empty_table();
        let root = NsPath::root();
        assert_eq!(lookup_type(&name_ty("Int32"), &root, &table), Ok(Type::Int32));
        assert_eq!(lookup_type(&name_ty("Int"), &root, &table), Ok(Type::Int32));
        assert_eq!(lookup_type(&name_ty("Float"), &root, &table), Ok(Type::Float64));
        assert_eq!(lookup_type(&name_ty("Float32"), &root, &table), Ok(Type::Float32));
        assert_eq!(lookup_type(&name_ty("BigInt"), &root, &table), Ok(Type::BigInt));
    }

    #[test]
    fn test_current_namespace_enum_then_root_fallback() {
        let table = table_with_enum("A", "Color", &[]);
        // Visible from inside A without qualification.
        let ty = lookup_type(&name_ty("Color"), &ns("A"), &table).unwrap();
        assert!(matches!(ty, Type::Enum { ref sym, .. } if sym.ident == "Color"));

        // Not visible as an unqualified name from an unrelated namespace.
        let err = lookup_type(&name_ty("Color"), &ns("Z"), &table).unwrap_err();
        assert!(matches!(err, ResolveError::UndefinedType { .. }));

        // Root enums are the fallback for every namespace.
        let root_table = table_with_enum("", "Shape", &[]);
        let ty = lookup_type(&name_ty("Shape"), &ns("Deep.Nest"), &root_table).unwrap();
        assert!(matches!(ty, Type::Enum { ref sym, .. } if sym.ident == "Shape"));
    }

    #[test]
    fn test_qualified_name_resolves_only_in_named_namespace() {
        let table = table_with_enum("A", "Color", &[]);
        let ty = lookup_type(&name_ty("A.Color"), &ns("Z"), &table).unwrap();
        assert!(matches!(ty, Type::Enum { .. }));

        let err = lookup_type(&name_ty("B.Color"), &ns("Z"), &table).unwrap_err();
        assert!(matches!(err, ResolveError::UndefinedType { .. }));
    }

    #[test]
    fn test_tuple_and_arrow_recurse() {
        let table = empty_table();
        let root = NsPath::root();
        let st = SurfaceType::Arrow(
            vec![SurfaceType::Tuple(
                vec![name_ty("Int"), name_ty("Bool")],
                Span::default(),
            )],
            Box::new(name_ty("Str")),
            Span::default(),
        );
        let ty = lookup_type(&st, &root, &table).unwrap();
        assert_eq!(
            ty,
            Type::Arrow {
                params: vec![Type::Tuple(vec![Type::Int32, Type::Bool])],
                result: Box::new(Type::Str),
            }
        );
    }

    #[test]
    fn test_application_elaborates_structurally() {
        let table = table_with_enum("", "Option", &["T"]);
        let st = SurfaceType::Apply(
            Box::new(name_ty("Option")),
            Box::new(name_ty("Int")),
            Span::default(),
        );
        let ty = lookup_type(&st, &NsPath::root(), &table).unwrap();
        match ty {
            Type::Apply { base, arg } => {
                assert!(matches!(*base, Type::Enum { ref kind, .. } if *kind == Kind::of_arity(1)));
                assert_eq!(*arg, Type::Int32);
            }
            other => panic!("expected application, got {:?}", other),
        }
    }

    #[test]
    fn test_enum_cases_resolve_with_tparams() {
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
        let mut factory = SymbolFactory::new();
        let mut table = EnumTable::collect(&program, &mut factory);
        resolve_enum_cases(&program, &mut table).unwrap();

        let entry = table.lookup_in(&NsPath::root(), "Option").unwrap();
        assert_eq!(entry.cases["None"].payload, Type::Unit);
        assert!(matches!(entry.cases["Some"].payload, Type::Var(_)));
    }

    #[test]
    fn test_undefined_payload_type_is_reported() {
        let mut program = Program::new();
        program.add_enum(
            NsPath::root(),
            EnumDecl {
                ident: "Broken".to_string(),
                public: true,
                tparams: Vec::new(),
                cases: vec![CaseDecl {
                    tag: "C".to_string(),
                    payload: name_ty("Missing"),
                    span: Span::default(),
                }],
                span: Span::default(),
            },
        );
        let mut factory = SymbolFactory::new();
        let mut table = EnumTable::collect(&program, &mut factory);
        let errors = resolve_enum_cases(&program, &mut table).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ResolveError::UndefinedType { .. }));
    }
}
