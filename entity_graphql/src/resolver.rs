// SPDX-License-Identifier: AGPL-3.0-or-later

//! Default field resolver, used for every field without a resolver of its own.
//!
//! Plain records are resolved by key. Objects are resolved through their accessors: for a field
//! `name` the methods `isName`, `hasName`, `getName` and finally `name` are tried in that order.
//! Objects without a matching accessor can still expose a public property of the same name.
//! Whatever can not be resolved is `null`, never an error.
use std::fmt;
use std::sync::Arc;

use async_graphql::indexmap::IndexMap;
use async_graphql::{Name, Value};

use crate::metadata::{ClassDescriptor, MethodDescriptor, Visibility};
use crate::utils::ucfirst;

/// An object whose fields can be resolved by calling its accessors.
///
/// Accessors are only looked up in [`Resolvable::descriptor`], so it must include inherited
/// members. Build it with [`instance_descriptor`](crate::metadata::instance_descriptor) rather
/// than passing the descriptor of the class alone.
pub trait Resolvable: Send + Sync {
    /// Describes every method and property an instance exposes, inherited ones included.
    fn descriptor(&self) -> &ClassDescriptor;

    /// Calls a method with its arguments in parameter order.
    fn call(&self, method: &str, args: Vec<Value>) -> Resolved;

    /// Reads a property.
    fn property(&self, name: &str) -> Option<Resolved>;
}

/// A resolved field value.
#[derive(Clone)]
pub enum Resolved {
    /// A plain value, lists and records included.
    Value(Value),
    /// An object whose own fields are resolved through its accessors.
    Object(Arc<dyn Resolvable>),
    /// A list of resolved values, possibly objects.
    List(Vec<Resolved>),
}

impl Resolved {
    /// Returns `null`.
    pub fn null() -> Self {
        Resolved::Value(Value::Null)
    }

    /// Wraps an object.
    pub fn object(object: impl Resolvable + 'static) -> Self {
        Resolved::Object(Arc::new(object))
    }

    /// Returns the plain value, `None` for objects and lists.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Resolved::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Returns `true` for a `null` value.
    pub fn is_null(&self) -> bool {
        matches!(self, Resolved::Value(Value::Null))
    }
}

impl From<Value> for Resolved {
    fn from(value: Value) -> Self {
        Resolved::Value(value)
    }
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Resolved::Object(object) => f
                .debug_tuple("Object")
                .field(&object.descriptor().name)
                .finish(),
            Resolved::List(items) => f.debug_tuple("List").field(items).finish(),
        }
    }
}

/// Identifier of an entity passed as argument.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityId {
    class_name: String,
    id: Value,
}

impl EntityId {
    /// Returns the identifier of an entity of the given class.
    pub fn new(class_name: &str, id: Value) -> Self {
        Self {
            class_name: class_name.to_string(),
            id,
        }
    }

    /// Class name of the identified entity.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The identifier as passed in the query.
    pub fn id(&self) -> &Value {
        &self.id
    }
}

/// Value of a field argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    /// Any other argument, passed as is.
    Value(Value),

    /// Passed to accessors as the bare identifier.
    EntityId(EntityId),
}

impl ArgumentValue {
    fn into_value(self) -> Value {
        match self {
            ArgumentValue::Value(value) => value,
            ArgumentValue::EntityId(entity_id) => entity_id.id,
        }
    }
}

impl From<Value> for ArgumentValue {
    fn from(value: Value) -> Self {
        ArgumentValue::Value(value)
    }
}

impl From<EntityId> for ArgumentValue {
    fn from(entity_id: EntityId) -> Self {
        ArgumentValue::EntityId(entity_id)
    }
}

/// Arguments of a field by name.
pub type Arguments = IndexMap<String, ArgumentValue>;

/// The parent value a field is resolved on.
#[derive(Clone, Copy)]
pub enum Source<'a> {
    /// Key / value structure.
    Record(&'a IndexMap<Name, Value>),

    /// Object resolved through its accessors.
    Object(&'a dyn Resolvable),
}

/// Resolves a field on its source, `null` when nothing matches.
pub fn resolve(source: Source<'_>, field_name: &str, args: &Arguments) -> Resolved {
    match source {
        Source::Record(record) => record
            .get(field_name)
            .cloned()
            .map(Resolved::Value)
            .unwrap_or_else(Resolved::null),
        Source::Object(object) => resolve_object(object, field_name, args),
    }
}

fn resolve_object(object: &dyn Resolvable, field_name: &str, args: &Arguments) -> Resolved {
    let class = object.descriptor();

    if let Some(method) = accessor(class, field_name) {
        return call(object, method, args);
    }

    match class.find_property(field_name) {
        Some(property) if property.visibility == Visibility::Public => object
            .property(field_name)
            .unwrap_or_else(Resolved::null),
        _ => Resolved::null(),
    }
}

/// Calls a method by name, `None` if the object has no such public instance method.
pub fn invoke(object: &dyn Resolvable, method_name: &str, args: &Arguments) -> Option<Resolved> {
    object
        .descriptor()
        .find_method(method_name)
        .filter(|method| is_callable(method))
        .map(|method| call(object, method, args))
}

/// Finds the first callable accessor of a field.
fn accessor<'a>(class: &'a ClassDescriptor, field_name: &str) -> Option<&'a MethodDescriptor> {
    let capitalized = ucfirst(field_name);
    let candidates = [
        format!("is{capitalized}"),
        format!("has{capitalized}"),
        format!("get{capitalized}"),
        field_name.to_string(),
    ];

    candidates
        .iter()
        .filter_map(|name| class.find_method(name))
        .find(|method| is_callable(method))
}

fn is_callable(method: &MethodDescriptor) -> bool {
    method.visibility == Visibility::Public && !method.is_static && !method.is_abstract
}

/// Passes the arguments matching the parameter names, falling back to the parameter defaults.
fn call(object: &dyn Resolvable, method: &MethodDescriptor, args: &Arguments) -> Resolved {
    let values = method
        .parameters
        .iter()
        .map(|parameter| match args.get(&parameter.name) {
            Some(argument) => argument.clone().into_value(),
            None => parameter.default_value.clone().unwrap_or(Value::Null),
        })
        .collect();

    object.call(&method.name, values)
}
