// SPDX-License-Identifier: AGPL-3.0-or-later

//! Plain field configuration records, ready to be turned into GraphQL schema types.
use async_graphql::dynamic::TypeRef;
use async_graphql::indexmap::IndexMap;
use async_graphql::Value;

/// Configuration of an argument, or of any input value in general.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentConfiguration {
    /// Name of the argument.
    pub name: String,
    /// GraphQL type of the argument.
    pub type_ref: TypeRef,
    /// Description shown in the schema.
    pub description: Option<String>,

    /// Default value, `Some(Value::Null)` is an explicit `null` default.
    pub default_value: Option<Value>,
}

impl ArgumentConfiguration {
    /// Returns a configuration without description nor default value.
    pub fn new(name: &str, type_ref: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            type_ref,
            description: None,
            default_value: None,
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Sets the default value, `Value::Null` included.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// Configuration of an input field, derived from a setter.
#[derive(Debug, Clone, PartialEq)]
pub struct InputFieldConfiguration {
    /// Name of the field on the input type.
    pub name: String,
    /// GraphQL type of the field.
    pub type_ref: TypeRef,
    /// Description shown in the schema.
    pub description: Option<String>,
    /// Default value, `Some(Value::Null)` is an explicit `null` default.
    pub default_value: Option<Value>,

    /// Setter writing the field.
    pub method: String,

    /// Whether the field may be changed after the entity was created.
    pub updatable: bool,
}

/// Configuration of an output field, derived from a getter.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFieldConfiguration {
    /// Name of the field on the object type.
    pub name: String,
    /// GraphQL type of the field.
    pub type_ref: TypeRef,
    /// Description shown in the schema.
    pub description: Option<String>,

    /// Getter resolving the field.
    pub method: String,

    /// Arguments indexed by their name, in parameter order.
    pub args: IndexMap<String, ArgumentConfiguration>,
}
