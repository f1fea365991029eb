//! Enum registry and tag disambiguation.
//!
//! The [`EnumTable`] is built in two passes: [`EnumTable::collect`]
//! registers every enum's symbol, visibility, and type parameters so that
//! case payload types can refer to any enum (including mutually recursive
//! ones); the second pass lives in [`crate::types::resolve_enum_cases`]
//! and fills in the payload types.
//!
//! [`lookup_enum_by_tag`] resolves a tag occurrence to the unique enum
//! declaring it:
//!
//! 1. If exactly one enum anywhere declares the tag, that enum wins
//!    (subject to accessibility).
//! 2. Otherwise candidates are restricted to one namespace: the
//!    qualifier's namespace if the tag was qualified, else the current
//!    one.
//! 3. A unique restricted match wins; no match is an undefined tag;
//!    several matches without a qualifier are ambiguous (candidates
//!    listed in source order); with a qualifier the enum name filters the
//!    candidates and exactly one must remain.

use indexmap::IndexMap;

use quill_ast::foundation::name::{NsPath, QName};
use quill_ast::foundation::span::Span;
use quill_ast::foundation::symbol::{EnumSym, SymbolFactory};
use quill_ast::resolved::Case;
use quill_ast::surface;

use crate::access::is_accessible;
use crate::error::ResolveError;

/// One registered enum.
#[derive(Debug, Clone)]
pub struct EnumEntry {
    pub sym: EnumSym,
    pub public: bool,
    /// Type parameter names paired with their minted type-variable ids.
    pub tparams: Vec<(String, u64)>,
    /// Cases keyed by tag name. Empty until the second resolution pass
    /// fills the payload types in.
    pub cases: IndexMap<String, Case>,
    pub span: Span,
}

impl EnumEntry {
    /// True iff this enum declares the given tag.
    pub fn declares(&self, tag: &str) -> bool {
        self.cases.contains_key(tag)
    }
}

/// All enums of a compilation unit, keyed by symbol.
#[derive(Debug, Default)]
pub struct EnumTable {
    entries: IndexMap<EnumSym, EnumEntry>,
}

impl EnumTable {
    /// First pass: register every enum declaration with its case *names*.
    /// Payload types stay unresolved until the second pass.
    pub fn collect(program: &surface::Program, factory: &mut SymbolFactory) -> Self {
        let mut table = Self::default();
        for (ns, decls) in &program.enums {
            for decl in decls {
                let sym = factory.enum_sym(ns.clone(), decl.ident.clone(), decl.span);
                let tparams = decl
                    .tparams
                    .iter()
                    .map(|name| (name.clone(), factory.fresh_type_var()))
                    .collect();
                let mut cases = IndexMap::new();
                for case in &decl.cases {
                    cases.insert(
                        case.tag.clone(),
                        Case {
                            tag: case.tag.clone(),
                            // Placeholder until the second pass.
                            payload: quill_ast::types::Type::Unit,
                            span: case.span,
                        },
                    );
                }
                table.entries.insert(
                    sym.clone(),
                    EnumEntry {
                        sym,
                        public: decl.public,
                        tparams,
                        cases,
                        span: decl.span,
                    },
                );
            }
        }
        table
    }

    pub fn get(&self, sym: &EnumSym) -> Option<&EnumEntry> {
        self.entries.get(sym)
    }

    pub fn get_mut(&mut self, sym: &EnumSym) -> Option<&mut EnumEntry> {
        self.entries.get_mut(sym)
    }

    /// The enum named `ident` declared directly in `ns`, if any.
    pub fn lookup_in(&self, ns: &NsPath, ident: &str) -> Option<&EnumEntry> {
        self.entries
            .values()
            .find(|e| &e.sym.namespace == ns && e.sym.ident == ident)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnumEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves a tag occurrence to the enum declaring it.
///
/// `qualifier` is the optional enum qualifier the user wrote (`Color.Red`
/// has qualifier `Color`); `current` is the namespace the occurrence
/// appears in; `span` is the occurrence's location, used for diagnostics.
pub fn lookup_enum_by_tag<'a>(
    enums: &'a EnumTable,
    qualifier: Option<&QName>,
    tag: &str,
    current: &NsPath,
    span: Span,
) -> Result<&'a EnumEntry, ResolveError> {
    let global: Vec<&EnumEntry> = enums.iter().filter(|e| e.declares(tag)).collect();

    // No enum anywhere declares the tag.
    if global.is_empty() {
        return Err(ResolveError::UndefinedTag {
            tag: tag.to_string(),
            ns: current.clone(),
            span,
        });
    }

    // A globally unique declaring enum wins outright.
    if let [only] = global.as_slice() {
        return check_access(*only, current, span);
    }

    // Restrict to the qualifier's namespace, or the current one.
    let restricted_ns = match qualifier {
        Some(q) if q.is_qualified() => q.namespace.clone(),
        _ => current.clone(),
    };
    let mut local: Vec<&EnumEntry> = global
        .iter()
        .copied()
        .filter(|e| e.sym.namespace == restricted_ns)
        .collect();

    if let Some(q) = qualifier {
        if local.len() > 1 {
            local.retain(|e| e.sym.ident == q.ident);
        }
    }

    match local.as_slice() {
        [only] => check_access(*only, current, span),
        // A qualifier narrowed the search to a namespace that does not
        // declare the tag at all.
        [] if qualifier.is_some() => Err(ResolveError::UndefinedTag {
            tag: tag.to_string(),
            ns: current.clone(),
            span,
        }),
        // The namespace could not break the tie: report every candidate,
        // in source order.
        [] => Err(ambiguous(tag, current, span, &global)),
        _ => Err(ambiguous(tag, current, span, &local)),
    }
}

fn ambiguous(tag: &str, current: &NsPath, span: Span, candidates: &[&EnumEntry]) -> ResolveError {
    let mut locations: Vec<Span> = candidates.iter().map(|e| e.span).collect();
    locations.sort();
    ResolveError::AmbiguousTag {
        tag: tag.to_string(),
        ns: current.clone(),
        span,
        locations,
    }
}

fn check_access<'a>(
    entry: &'a EnumEntry,
    from: &NsPath,
    span: Span,
) -> Result<&'a EnumEntry, ResolveError> {
    if is_accessible(&entry.sym.namespace, entry.public, from) {
        Ok(entry)
    } else {
        Err(ResolveError::InaccessibleEnum {
            name: QName::new(entry.sym.namespace.clone(), entry.sym.ident.clone()),
            ns: from.clone(),
            span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_ast::surface::{CaseDecl, EnumDecl, Program, SurfaceType};

    fn unit_ty(span: Span) -> SurfaceType {
        SurfaceType::Name(QName::parse("Unit"), span)
    }

    fn enum_decl(ident: &str, public: bool, tags: &[&str], span: Span) -> EnumDecl {
        EnumDecl {
            ident: ident.to_string(),
            public,
            tparams: Vec::new(),
            cases: tags
                .iter()
                .map(|t| CaseDecl {
                    tag: t.to_string(),
                    payload: unit_ty(span),
                    span,
                })
                .collect(),
            span,
        }
    }

    fn ns(s: &str) -> NsPath {
        NsPath::parse(s)
    }

    #[test]
    fn test_globally_unique_tag_resolves_from_anywhere() {
        let mut program = Program::new();
        program.add_enum(ns("A"), enum_decl("Color", true, &["Red", "Green"], Span::new(0, 0, 5)));
        let mut factory = SymbolFactory::new();
        let table = EnumTable::collect(&program, &mut factory);

        let entry = lookup_enum_by_tag(&table, None, "Red", &ns("Z"), Span::default()).unwrap();
        assert_eq!(entry.sym.ident, "Color");
    }

    #[test]
    fn test_ambiguous_tag_lists_sorted_locations() {
        let mut program = Program::new();
        program.add_enum(ns("B"), enum_decl("Paint", true, &["Red"], Span::new(0, 40, 45)));
        program.add_enum(ns("A"), enum_decl("Color", true, &["Red"], Span::new(0, 10, 15)));
        let mut factory = SymbolFactory::new();
        let table = EnumTable::collect(&program, &mut factory);

        let err = lookup_enum_by_tag(&table, None, "Red", &ns("C"), Span::default()).unwrap_err();
        match err {
            ResolveError::AmbiguousTag { locations, .. } => {
                assert_eq!(locations, vec![Span::new(0, 10, 15), Span::new(0, 40, 45)]);
            }
            other => panic!("expected AmbiguousTag, got {:?}", other),
        }
    }

    #[test]
    fn test_namespace_restriction_breaks_global_tie() {
        let mut program = Program::new();
        program.add_enum(ns("A"), enum_decl("Color", true, &["Red"], Span::new(0, 0, 5)));
        program.add_enum(ns("B"), enum_decl("Paint", true, &["Red"], Span::new(0, 10, 15)));
        let mut factory = SymbolFactory::new();
        let table = EnumTable::collect(&program, &mut factory);

        // From inside A, the local enum wins.
        let entry = lookup_enum_by_tag(&table, None, "Red", &ns("A"), Span::default()).unwrap();
        assert_eq!(entry.sym.ident, "Color");
    }

    #[test]
    fn test_qualifier_filters_candidates() {
        let mut program = Program::new();
        program.add_enum(ns("A"), enum_decl("Color", true, &["Red"], Span::new(0, 0, 5)));
        program.add_enum(ns("A"), enum_decl("Paint", true, &["Red"], Span::new(0, 10, 15)));
        let mut factory = SymbolFactory::new();
        let table = EnumTable::collect(&program, &mut factory);

        let q = QName::parse("Paint");
        let entry = lookup_enum_by_tag(&table, Some(&q), "Red", &ns("A"), Span::default()).unwrap();
        assert_eq!(entry.sym.ident, "Paint");
    }

    #[test]
    fn test_qualified_namespace_restriction() {
        let mut program = Program::new();
        program.add_enum(ns("A"), enum_decl("Color", true, &["Red"], Span::new(0, 0, 5)));
        program.add_enum(ns("B"), enum_decl("Color", true, &["Red"], Span::new(0, 10, 15)));
        let mut factory = SymbolFactory::new();
        let table = EnumTable::collect(&program, &mut factory);

        let q = QName::parse("B.Color");
        let entry = lookup_enum_by_tag(&table, Some(&q), "Red", &ns("C"), Span::default()).unwrap();
        assert_eq!(entry.sym.namespace, ns("B"));
    }

    #[test]
    fn test_undefined_tag() {
        let program = Program::new();
        let mut factory = SymbolFactory::new();
        let table = EnumTable::collect(&program, &mut factory);

        let err = lookup_enum_by_tag(&table, None, "Red", &ns("A"), Span::default()).unwrap_err();
        assert!(matches!(err, ResolveError::UndefinedTag { .. }));
    }

    #[test]
    fn test_inaccessible_enum() {
        let mut program = Program::new();
        program.add_enum(ns("A.B"), enum_decl("Secret", false, &["Hidden"], Span::new(0, 0, 5)));
        let mut factory = SymbolFactory::new();
        let table = EnumTable::collect(&program, &mut factory);

        let err = lookup_enum_by_tag(&table, None, "Hidden", &ns("Z"), Span::default()).unwrap_err();
        assert!(matches!(err, ResolveError::InaccessibleEnum { .. }));
    }

    #[test]
    fn test_lookup_is_deterministic() {
        let mut program = Program::new();
        program.add_enum(ns("A"), enum_decl("Color", true, &["Red"], Span::new(0, 0, 5)));
        program.add_enum(ns("B"), enum_decl("Paint", true, &["Red"], Span::new(0, 10, 15)));
        let mut factory = SymbolFactory::new();
        let table = EnumTable::collect(&program, &mut factory);

        let first = lookup_enum_by_tag(&table, None, "Red", &ns("A"), Span::default()).unwrap();
        for _ in 0..10 {
            let again = lookup_enum_by_tag(&table, None, "Red", &ns("A"), Span::default()).unwrap();
            assert_eq!(first.sym, again.sym);
        }
    }
}
