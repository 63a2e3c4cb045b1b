// SPDX-License-Identifier: AGPL-3.0-or-later

use async_graphql::indexmap::IndexMap;
use async_graphql::{Name, Value};

use crate::annotation::base::{
    object_entries, optional_bool, optional_string, optional_value, unknown_attribute,
    AnnotationOverride,
};
use crate::errors::ConfigurationResult;

/// Overrides for an input field derived from a setter.
///
/// All values are optional and only override what is declared by the method itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Input {
    /// Name, type, description and default value of the field.
    pub overrides: AnnotationOverride,

    /// Name of the method writing the field.
    pub method: Option<String>,

    /// Whether the field may be changed after creation, defaults to `true`.
    pub updatable: Option<bool>,
}

impl Input {
    const NAME: &'static str = "Input";

    /// Returns an annotation without any override.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the annotation from its attribute map.
    pub fn from_value(values: &Value) -> ConfigurationResult<Self> {
        let mut input = Self::default();
        for (key, value) in object_entries(Self::NAME, values)? {
            if input.overrides.apply(Self::NAME, key, value)? {
                continue;
            }

            match key.as_str() {
                "method" => input.method = optional_string(Self::NAME, key, value)?,
                "updatable" => input.updatable = optional_bool(Self::NAME, key, value)?,
                _ => return Err(unknown_attribute(Self::NAME, key)),
            }
        }

        Ok(input)
    }

    /// Changes the overrides with a builder closure.
    pub fn with(mut self, overrides: impl FnOnce(AnnotationOverride) -> AnnotationOverride) -> Self {
        self.overrides = overrides(self.overrides);
        self
    }

    /// Sets whether the field may be changed after creation.
    pub fn with_updatable(mut self, updatable: bool) -> Self {
        self.updatable = Some(updatable);
        self
    }

    /// Returns `false` only if the field was declared as not updatable.
    pub fn is_updatable(&self) -> bool {
        self.updatable.unwrap_or(true)
    }

    /// Converts the annotation into a plain associative structure.
    pub fn to_map(&self) -> IndexMap<Name, Value> {
        let mut map = self.overrides.to_map();
        map.insert(Name::new("method"), optional_value(self.method.clone()));
        map.insert(Name::new("updatable"), Value::Boolean(self.is_updatable()));
        map
    }
}
