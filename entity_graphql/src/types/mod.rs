// SPDX-License-Identifier: AGPL-3.0-or-later

//! GraphQL types known to the factories, type declarations and comparison operators.
use async_graphql::dynamic::TypeRef;

mod declaration;
mod operators;
mod registry;

pub use declaration::TypeDeclaration;
pub use operators::{BuiltinOperator, Operator, OperatorRegistry, OperatorType};
pub use registry::{TypeKind, TypeRegistry};

/// Wraps a type as non-null, unless it already is.
pub fn non_null(type_ref: TypeRef) -> TypeRef {
    match type_ref {
        TypeRef::NonNull(_) => type_ref,
        _ => TypeRef::NonNull(Box::new(type_ref)),
    }
}

/// Wraps a type as list.
pub fn list_of(type_ref: TypeRef) -> TypeRef {
    TypeRef::List(Box::new(type_ref))
}

/// Removes the outermost non-null wrapper, if any.
pub fn strip_non_null(type_ref: TypeRef) -> TypeRef {
    match type_ref {
        TypeRef::NonNull(inner) => *inner,
        _ => type_ref,
    }
}

/// Returns `true` if the outermost wrapper is non-null.
pub fn is_non_null(type_ref: &TypeRef) -> bool {
    matches!(type_ref, TypeRef::NonNull(_))
}

/// Returns the name of the innermost named type, unwrapping lists and non-null wrappers.
pub fn named_type(type_ref: &TypeRef) -> &str {
    match type_ref {
        TypeRef::Named(name) => name,
        TypeRef::NonNull(inner) | TypeRef::List(inner) => named_type(inner),
    }
}
