// SPDX-License-Identifier: AGPL-3.0-or-later

use async_graphql::indexmap::IndexMap;
use async_graphql::{Name, Value};

use crate::annotation::base::{
    object_entries, optional_string, optional_value, unknown_attribute, AnnotationOverride,
};
use crate::errors::{ConfigurationError, ConfigurationResult};

/// Overrides for one argument of a getter. Its name must match the actual parameter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Argument {
    /// Name, type, description and default value of the argument.
    pub overrides: AnnotationOverride,
}

impl Argument {
    const NAME: &'static str = "Argument";

    /// Returns an annotation for the parameter with this name.
    pub fn new(name: &str) -> Self {
        Self {
            overrides: AnnotationOverride::new().with_name(name),
        }
    }

    /// Builds the annotation from its attribute map.
    pub fn from_value(values: &Value) -> ConfigurationResult<Self> {
        let mut argument = Self::default();
        for (key, value) in object_entries(Self::NAME, values)? {
            if !argument.overrides.apply(Self::NAME, key, value)? {
                return Err(unknown_attribute(Self::NAME, key));
            }
        }

        Ok(argument)
    }

    /// Changes the overrides with a builder closure.
    pub fn with(mut self, overrides: impl FnOnce(AnnotationOverride) -> AnnotationOverride) -> Self {
        self.overrides = overrides(self.overrides);
        self
    }

    /// Converts the annotation into a plain associative structure.
    pub fn to_map(&self) -> IndexMap<Name, Value> {
        self.overrides.to_map()
    }
}

/// Overrides for an output field derived from a getter.
///
/// All values are optional and only override what is declared by the method itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Field {
    /// Name, type and description of the field.
    pub overrides: AnnotationOverride,

    /// Name of the method resolving the field.
    pub method: Option<String>,

    /// Overrides for the arguments of the getter.
    pub args: Vec<Argument>,
}

impl Field {
    const NAME: &'static str = "Field";

    /// Returns an annotation without any override.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the annotation from its attribute map. `args` expects a list of argument attribute
    /// maps.
    pub fn from_value(values: &Value) -> ConfigurationResult<Self> {
        let mut field = Self::default();
        for (key, value) in object_entries(Self::NAME, values)? {
            if field.overrides.apply(Self::NAME, key, value)? {
                continue;
            }

            match key.as_str() {
                "method" => field.method = optional_string(Self::NAME, key, value)?,
                "args" => field.args = arguments_from_value(value)?,
                _ => return Err(unknown_attribute(Self::NAME, key)),
            }
        }

        Ok(field)
    }

    /// Changes the overrides with a builder closure.
    pub fn with(mut self, overrides: impl FnOnce(AnnotationOverride) -> AnnotationOverride) -> Self {
        self.overrides = overrides(self.overrides);
        self
    }

    /// Resolves the field with another method.
    pub fn with_method(mut self, method: &str) -> Self {
        self.method = Some(method.to_string());
        self
    }

    /// Adds overrides for one argument.
    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.args.push(argument);
        self
    }

    /// Converts the annotation into a plain associative structure, arguments included.
    pub fn to_map(&self) -> IndexMap<Name, Value> {
        let mut map = self.overrides.to_map();
        map.insert(Name::new("method"), optional_value(self.method.clone()));

        let args = self
            .args
            .iter()
            .map(|argument| Value::Object(argument.to_map()))
            .collect();
        map.insert(Name::new("args"), Value::List(args));

        map
    }
}

fn arguments_from_value(value: &Value) -> ConfigurationResult<Vec<Argument>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::List(items) => items.iter().map(Argument::from_value).collect(),
        _ => Err(ConfigurationError::InvalidAnnotationValue {
            annotation: Field::NAME.to_string(),
            attribute: "args".to_string(),
            expected: "a list of `Argument` annotations".to_string(),
        }),
    }
}
