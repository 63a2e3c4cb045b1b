// SPDX-License-Identifier: AGPL-3.0-or-later

use async_graphql::dynamic::TypeRef;
use async_graphql::indexmap::IndexMap;
use async_graphql::{Name, Value};

use crate::errors::{ConfigurationError, ConfigurationResult};

/// Overrides shared by all field-like annotations: `Field`, `Input` and `Argument`.
///
/// Every value is optional and only overrides what would otherwise be derived from the method,
/// its docblock and its type hints. The default value is tri-state: unset (`None`), an explicit
/// value, or an explicit `null` (`Some(Value::Null)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationOverride {
    name: Option<String>,
    type_declaration: Option<String>,
    type_ref: Option<TypeRef>,
    description: Option<String>,
    default_value: Option<Value>,
}

impl AnnotationOverride {
    /// Returns empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overridden field name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Replaces the overridden field name.
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Type as declared in the annotation, for example `?int` or `Post[]`.
    pub fn type_declaration(&self) -> Option<&str> {
        self.type_declaration.as_deref()
    }

    /// Replaces the type declaration.
    pub fn set_type_declaration(&mut self, type_declaration: Option<String>) {
        self.type_declaration = type_declaration;
    }

    /// Resolved GraphQL type.
    pub fn type_ref(&self) -> Option<&TypeRef> {
        self.type_ref.as_ref()
    }

    /// Replaces the resolved GraphQL type.
    pub fn set_type_ref(&mut self, type_ref: Option<TypeRef>) {
        self.type_ref = type_ref;
    }

    /// Overridden description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Replaces the overridden description.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Returns `true` if a default value was set, even an explicit `null`.
    pub fn has_default_value(&self) -> bool {
        self.default_value.is_some()
    }

    /// Default value, `Some(&Value::Null)` for an explicit `null`.
    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Sets an explicit default value, `Value::Null` included.
    pub fn set_default_value(&mut self, default_value: Value) {
        self.default_value = Some(default_value);
    }

    /// Applies one key of an annotation value map. Returns `false` if the key is not one of the
    /// shared overrides.
    pub(crate) fn apply(
        &mut self,
        annotation: &str,
        key: &str,
        value: &Value,
    ) -> ConfigurationResult<bool> {
        match key {
            "name" => self.set_name(optional_string(annotation, key, value)?),
            "type" => self.set_type_declaration(optional_string(annotation, key, value)?),
            "description" => self.set_description(optional_string(annotation, key, value)?),
            "defaultValue" => self.set_default_value(value.clone()),
            _ => return Ok(false),
        }

        Ok(true)
    }

    /// Converts the overrides into a plain associative structure.
    ///
    /// The default value is only present when one was set, the type is rendered in GraphQL
    /// notation.
    pub fn to_map(&self) -> IndexMap<Name, Value> {
        let mut map = IndexMap::new();
        map.insert(Name::new("name"), optional_value(self.name.clone()));
        map.insert(
            Name::new("type"),
            optional_value(self.type_ref.as_ref().map(|type_ref| type_ref.to_string())),
        );
        map.insert(
            Name::new("description"),
            optional_value(self.description.clone()),
        );

        if let Some(default_value) = &self.default_value {
            map.insert(Name::new("defaultValue"), default_value.clone());
        }

        map
    }
}

/// Builder methods, used when declaring annotations in code.
impl AnnotationOverride {
    /// Overrides the field name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Declares the type, for example `?int` or `Post[]`.
    pub fn with_type(mut self, type_declaration: &str) -> Self {
        self.type_declaration = Some(type_declaration.to_string());
        self
    }

    /// Sets an already resolved GraphQL type.
    pub fn with_type_ref(mut self, type_ref: TypeRef) -> Self {
        self.type_ref = Some(type_ref);
        self
    }

    /// Overrides the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Sets the default value, `Value::Null` included.
    pub fn with_default_value(mut self, default_value: impl Into<Value>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }
}

/// Returns the entries of an annotation value map.
pub(crate) fn object_entries<'a>(
    annotation: &str,
    values: &'a Value,
) -> ConfigurationResult<&'a IndexMap<Name, Value>> {
    match values {
        Value::Object(map) => Ok(map),
        _ => Err(ConfigurationError::InvalidAnnotationValue {
            annotation: annotation.to_string(),
            attribute: "*".to_string(),
            expected: "a map of attributes".to_string(),
        }),
    }
}

pub(crate) fn unknown_attribute(annotation: &str, key: &str) -> ConfigurationError {
    ConfigurationError::UnknownAnnotationAttribute {
        annotation: annotation.to_string(),
        attribute: key.to_string(),
    }
}

pub(crate) fn optional_string(
    annotation: &str,
    key: &str,
    value: &Value,
) -> ConfigurationResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(string) => Ok(Some(string.clone())),
        _ => Err(ConfigurationError::InvalidAnnotationValue {
            annotation: annotation.to_string(),
            attribute: key.to_string(),
            expected: "a string".to_string(),
        }),
    }
}

pub(crate) fn required_string(
    annotation: &str,
    key: &str,
    value: &Value,
) -> ConfigurationResult<String> {
    optional_string(annotation, key, value)?.ok_or_else(|| {
        ConfigurationError::InvalidAnnotationValue {
            annotation: annotation.to_string(),
            attribute: key.to_string(),
            expected: "a string".to_string(),
        }
    })
}

pub(crate) fn optional_bool(
    annotation: &str,
    key: &str,
    value: &Value,
) -> ConfigurationResult<Option<bool>> {
    match value {
        Value::Null => Ok(None),
        Value::Boolean(flag) => Ok(Some(*flag)),
        _ => Err(ConfigurationError::InvalidAnnotationValue {
            annotation: annotation.to_string(),
            attribute: key.to_string(),
            expected: "a boolean".to_string(),
        }),
    }
}

pub(crate) fn optional_value(value: Option<String>) -> Value {
    value.map(Value::String).unwrap_or(Value::Null)
}
