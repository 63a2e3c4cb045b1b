// SPDX-License-Identifier: AGPL-3.0-or-later

use async_graphql::Value;

use crate::annotation::base::{object_entries, optional_string, required_string, unknown_attribute};
use crate::errors::{ConfigurationError, ConfigurationResult};

/// Declares a custom operator on a field of the entity carrying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Name of the field the operator applies to. It does not need to be a mapped field.
    pub field: String,

    /// Identifier of a registered operator, for example `blog::filter::ModuloOperatorType`.
    pub operator: String,

    /// Leaf type the operator compares with.
    pub type_name: String,
}

impl Filter {
    const NAME: &'static str = "Filter";

    /// Returns a filter adding `operator` on `field`, comparing with `type_name`.
    pub fn new(field: &str, operator: &str, type_name: &str) -> Self {
        Self {
            field: field.to_string(),
            operator: operator.to_string(),
            type_name: type_name.to_string(),
        }
    }

    /// Builds the annotation from its attribute map, all three attributes are required.
    pub fn from_value(values: &Value) -> ConfigurationResult<Self> {
        let mut field = None;
        let mut operator = None;
        let mut type_name = None;

        for (key, value) in object_entries(Self::NAME, values)? {
            match key.as_str() {
                "field" => field = Some(required_string(Self::NAME, key, value)?),
                "operator" => operator = Some(required_string(Self::NAME, key, value)?),
                "type" => type_name = Some(required_string(Self::NAME, key, value)?),
                _ => return Err(unknown_attribute(Self::NAME, key)),
            }
        }

        match (field, operator, type_name) {
            (Some(field), Some(operator), Some(type_name)) => Ok(Self {
                field,
                operator,
                type_name,
            }),
            _ => Err(ConfigurationError::InvalidAnnotationValue {
                annotation: Self::NAME.to_string(),
                attribute: "field, operator, type".to_string(),
                expected: "all of them to be set".to_string(),
            }),
        }
    }
}

/// Repeatable class annotation collecting custom operators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    /// Custom operators in declaration order.
    pub filters: Vec<Filter>,
}

impl Filters {
    /// Returns the annotation holding these filters.
    pub fn new(filters: Vec<Filter>) -> Self {
        Self { filters }
    }

    /// Builds the annotation from a list of `Filter` attribute maps.
    pub fn from_value(values: &Value) -> ConfigurationResult<Self> {
        match values {
            Value::List(items) => Ok(Self {
                filters: items
                    .iter()
                    .map(Filter::from_value)
                    .collect::<ConfigurationResult<_>>()?,
            }),
            _ => Err(ConfigurationError::InvalidAnnotationValue {
                annotation: "Filters".to_string(),
                attribute: "filters".to_string(),
                expected: "a list of `Filter` annotations".to_string(),
            }),
        }
    }
}

/// Overrides the leaf type used by the conditions on a mapped property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterGroupCondition {
    /// Type declaration of the leaf type, `None` keeps the type of the mapping.
    pub type_name: Option<String>,
}

impl FilterGroupCondition {
    const NAME: &'static str = "FilterGroupCondition";

    /// Returns an annotation overriding the leaf type.
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: Some(type_name.to_string()),
        }
    }

    /// Builds the annotation from its attribute map.
    pub fn from_value(values: &Value) -> ConfigurationResult<Self> {
        let mut condition = Self::default();
        for (key, value) in object_entries(Self::NAME, values)? {
            match key.as_str() {
                "type" => condition.type_name = optional_string(Self::NAME, key, value)?,
                _ => return Err(unknown_attribute(Self::NAME, key)),
            }
        }

        Ok(condition)
    }
}

/// Excludes a method from the generated fields, or a property from the generated conditions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Exclude;
