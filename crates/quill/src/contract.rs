//! Continuation-interface synthesis.
//!
//! Later phases call function values uniformly regardless of return type.
//! To make that possible, every distinct arrow type in the program gets an
//! interface descriptor named canonically by its *erased* result type:
//! primitives erase to themselves, composite types to a generic object
//! tag. Each descriptor exposes exactly two operations: a zero-argument
//! accessor for the completed result and a single-argument entry point
//! taking the ambient context.
//!
//! This module only produces names and shapes; body synthesis belongs to
//! a later phase.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use quill_ast::types::Type;

/// Result type after erasure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErasedType {
    Bool,
    Char,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    /// Every composite or reference-like type.
    Object,
}

impl ErasedType {
    /// Erases a type: primitives survive, everything else collapses to
    /// [`ErasedType::Object`].
    pub fn of(ty: &Type) -> ErasedType {
        match ty {
            Type::Bool => ErasedType::Bool,
            Type::Char => ErasedType::Char,
            Type::Int8 => ErasedType::Int8,
            Type::Int16 => ErasedType::Int16,
            Type::Int32 => ErasedType::Int32,
            Type::Int64 => ErasedType::Int64,
            Type::Float32 => ErasedType::Float32,
            Type::Float64 => ErasedType::Float64,
            _ => ErasedType::Object,
        }
    }

    /// The canonical name suffix of this erased type.
    pub fn suffix(self) -> &'static str {
        match self {
            ErasedType::Bool => "Bool",
            ErasedType::Char => "Char",
            ErasedType::Int8 => "Int8",
            ErasedType::Int16 => "Int16",
            ErasedType::Int32 => "Int32",
            ErasedType::Int64 => "Int64",
            ErasedType::Float32 => "Float32",
            ErasedType::Float64 => "Float64",
            ErasedType::Object => "Obj",
        }
    }
}

/// Name and parameter list of one interface operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodShape {
    pub name: String,
    pub params: Vec<String>,
}

/// Descriptor of one continuation interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuationInterface {
    /// Canonical interface name, e.g. `Cont$Int32`.
    pub name: String,
    /// The erased result slot type.
    pub result: ErasedType,
    /// Zero-argument accessor for the completed result.
    pub result_accessor: MethodShape,
    /// Single-argument entry point taking the ambient context.
    pub apply_entry: MethodShape,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractError {
    #[error("illegal non-function type '{0}' has no continuation interface")]
    IllegalType(Type),
}

/// The continuation interface of one arrow type.
pub fn interface_of(ty: &Type) -> Result<ContinuationInterface, ContractError> {
    let Type::Arrow { result, .. } = ty else {
        return Err(ContractError::IllegalType(ty.clone()));
    };
    let erased = ErasedType::of(result);
    Ok(ContinuationInterface {
        name: format!("Cont${}", erased.suffix()),
        result: erased,
        result_accessor: MethodShape {
            name: "getResult".to_string(),
            params: Vec::new(),
        },
        apply_entry: MethodShape {
            name: "apply".to_string(),
            params: vec!["context".to_string()],
        },
    })
}

/// Emits one descriptor per distinct erased result among the arrow types
/// of `types`, in first-seen order. Non-arrow types are skipped.
pub fn emit_interfaces<'a>(
    types: impl IntoIterator<Item = &'a Type>,
) -> Vec<ContinuationInterface> {
    let mut seen: IndexSet<ErasedType> = IndexSet::new();
    let mut out = Vec::new();
    for ty in types {
        if let Ok(iface) = interface_of(ty) {
            if seen.insert(iface.result) {
                out.push(iface);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrow(params: Vec<Type>, result: Type) -> Type {
        Type::Arrow {
            params,
            result: Box::new(result),
        }
    }

    #[test]
    fn test_primitive_results_erase_to_themselves() {
        let iface = interface_of(&arrow(vec![Type::Unit], Type::Int32)).unwrap();
        assert_eq!(iface.name, "Cont$Int32");
        assert_eq!(iface.result, ErasedType::Int32);
    }

    #[test]
    fn test_composite_results_erase_to_object() {
        let tuple_result = arrow(vec![Type::Int32], Type::Tuple(vec![Type::Int32, Type::Bool]));
        let iface = interface_of(&tuple_result).unwrap();
        assert_eq!(iface.name, "Cont$Obj");

        let str_result = arrow(vec![Type::Int32], Type::Str);
        assert_eq!(interface_of(&str_result).unwrap().result, ErasedType::Object);
    }

    #[test]
    fn test_descriptor_shape() {
        let iface = interface_of(&arrow(vec![Type::Bool], Type::Bool)).unwrap();
        assert_eq!(iface.result_accessor.name, "getResult");
        assert!(iface.result_accessor.params.is_empty());
        assert_eq!(iface.apply_entry.name, "apply");
        assert_eq!(iface.apply_entry.params.len(), 1);
    }

    #[test]
    fn test_non_function_type_is_illegal() {
        let err = interface_of(&Type::Int32).unwrap_err();
        assert!(matches!(err, ContractError::IllegalType(Type::Int32)));
    }

    #[test]
    fn test_emit_dedups_by_erased_result() {
        let types = vec![
            arrow(vec![Type::Int32], Type::Int32),
            arrow(vec![Type::Bool, Type::Bool], Type::Int32),
            arrow(vec![Type::Unit], Type::Str),
            arrow(vec![Type::Unit], Type::Tuple(vec![Type::Bool])),
            Type::Int32,
        ];
        let interfaces = emit_interfaces(types.iter());
        // Two distinct erased results: Int32 and Obj (Str and the tuple
        // collapse together); the bare Int32 is not a function type.
        assert_eq!(interfaces.len(), 2);
        assert_eq!(interfaces[0].name, "Cont$Int32");
        assert_eq!(interfaces[1].name, "Cont$Obj");
    }
}
