// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;
use std::sync::Arc;

use async_graphql::dynamic::TypeRef;
use async_graphql::indexmap::IndexMap;
use async_graphql::Value;

use crate::config::Configuration;
use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::fields::ArgumentConfiguration;
use crate::types::{list_of, named_type, non_null, strip_non_null};
use crate::utils::lcfirst;

const NOT_FIELD: &str = "not";

/// A comparison predicate exposed as input type on the conditions of an entity field.
///
/// The input type is instantiated once per leaf type it compares with, so its fields receive the
/// leaf type as a parameter.
pub trait Operator: Send + Sync {
    /// Unique identifier, ending with the operator suffix, for example `EqualOperatorType` or
    /// `blog::filter::ModuloOperatorType`.
    fn identifier(&self) -> &str;

    fn description(&self) -> Option<String> {
        None
    }

    /// Fields of the input type when comparing with `leaf`.
    fn fields(&self, leaf: &TypeRef) -> Vec<ArgumentConfiguration>;
}

/// Operators available on every entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinOperator {
    /// Match values within a range.
    Between,
    /// Match empty collections.
    Empty,
    /// Match equal values.
    Equal,
    /// Match greater values.
    Greater,
    /// Match greater or equal values.
    GreaterOrEqual,
    /// Group results by the field.
    Group,
    /// Match collections containing any of the values.
    Have,
    /// Match values contained in a list.
    In,
    /// Match lesser values.
    Less,
    /// Match lesser or equal values.
    LessOrEqual,
    /// Match values against a pattern.
    Like,
    /// Match `null` values.
    Null,
}

impl BuiltinOperator {
    /// All built-in operators.
    pub const ALL: [BuiltinOperator; 12] = [
        BuiltinOperator::Between,
        BuiltinOperator::Empty,
        BuiltinOperator::Equal,
        BuiltinOperator::Greater,
        BuiltinOperator::GreaterOrEqual,
        BuiltinOperator::Group,
        BuiltinOperator::Have,
        BuiltinOperator::In,
        BuiltinOperator::Less,
        BuiltinOperator::LessOrEqual,
        BuiltinOperator::Like,
        BuiltinOperator::Null,
    ];

    /// Operators of a scalar field, in the order they appear on the condition type.
    pub const SCALAR: [BuiltinOperator; 10] = [
        BuiltinOperator::Like,
        BuiltinOperator::Between,
        BuiltinOperator::Equal,
        BuiltinOperator::Greater,
        BuiltinOperator::GreaterOrEqual,
        BuiltinOperator::In,
        BuiltinOperator::Less,
        BuiltinOperator::LessOrEqual,
        BuiltinOperator::Null,
        BuiltinOperator::Group,
    ];

    /// Operators of an association holding a single entity.
    pub const SINGLE_ASSOCIATION: [BuiltinOperator; 11] = [
        BuiltinOperator::Have,
        BuiltinOperator::Empty,
        BuiltinOperator::Between,
        BuiltinOperator::Equal,
        BuiltinOperator::Greater,
        BuiltinOperator::GreaterOrEqual,
        BuiltinOperator::In,
        BuiltinOperator::Less,
        BuiltinOperator::LessOrEqual,
        BuiltinOperator::Null,
        BuiltinOperator::Group,
    ];

    /// Operators of an association holding a collection of entities.
    pub const COLLECTION_ASSOCIATION: [BuiltinOperator; 2] =
        [BuiltinOperator::Have, BuiltinOperator::Empty];

    /// Identifier of the operator, for example `EqualOperatorType`.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinOperator::Between => "BetweenOperatorType",
            BuiltinOperator::Empty => "EmptyOperatorType",
            BuiltinOperator::Equal => "EqualOperatorType",
            BuiltinOperator::Greater => "GreaterOperatorType",
            BuiltinOperator::GreaterOrEqual => "GreaterOrEqualOperatorType",
            BuiltinOperator::Group => "GroupOperatorType",
            BuiltinOperator::Have => "HaveOperatorType",
            BuiltinOperator::In => "InOperatorType",
            BuiltinOperator::Less => "LessOperatorType",
            BuiltinOperator::LessOrEqual => "LessOrEqualOperatorType",
            BuiltinOperator::Like => "LikeOperatorType",
            BuiltinOperator::Null => "NullOperatorType",
        }
    }
}

impl fmt::Display for BuiltinOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Operator for BuiltinOperator {
    fn identifier(&self) -> &str {
        self.as_str()
    }

    fn description(&self) -> Option<String> {
        let description = match self {
            BuiltinOperator::Between => "Match values within the given range, bounds included",
            BuiltinOperator::Empty => "Match when the collection is empty",
            BuiltinOperator::Equal => "Match values equal to the given one",
            BuiltinOperator::Greater => "Match values greater than the given one",
            BuiltinOperator::GreaterOrEqual => "Match values greater than or equal to the given one",
            BuiltinOperator::Group => "Group results by this field",
            BuiltinOperator::Have => "Match when the collection contains any of the given values",
            BuiltinOperator::In => "Match values contained in the given list",
            BuiltinOperator::Less => "Match values less than the given one",
            BuiltinOperator::LessOrEqual => "Match values less than or equal to the given one",
            BuiltinOperator::Like => "Match values against a pattern using `%` as wildcard",
            BuiltinOperator::Null => "Match `null` values",
        };

        Some(description.to_string())
    }

    fn fields(&self, leaf: &TypeRef) -> Vec<ArgumentConfiguration> {
        let leaf = non_null(strip_non_null(leaf.clone()));

        match self {
            BuiltinOperator::Between => vec![
                ArgumentConfiguration::new("from", leaf.clone()),
                ArgumentConfiguration::new("to", leaf),
                not_field(),
            ],
            BuiltinOperator::Empty | BuiltinOperator::Null => vec![not_field()],
            BuiltinOperator::Equal
            | BuiltinOperator::Greater
            | BuiltinOperator::GreaterOrEqual
            | BuiltinOperator::Less
            | BuiltinOperator::LessOrEqual
            | BuiltinOperator::Like => {
                vec![ArgumentConfiguration::new("value", leaf), not_field()]
            }
            BuiltinOperator::Group => vec![ArgumentConfiguration::new(
                "value",
                TypeRef::named(TypeRef::BOOLEAN),
            )
            .description(
                "This field is never used and can be ignored, it only exists because an input \
                 object must have at least one field",
            )],
            BuiltinOperator::Have | BuiltinOperator::In => vec![
                ArgumentConfiguration::new("values", non_null(list_of(leaf))),
                not_field(),
            ],
        }
    }
}

fn not_field() -> ArgumentConfiguration {
    ArgumentConfiguration::new(NOT_FIELD, TypeRef::named(TypeRef::BOOLEAN))
        .default_value(Value::Boolean(false))
}

/// An operator input type instantiated for one leaf type.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorType {
    /// Type name, for example `EqualOperatorString`.
    pub name: String,
    /// Description shown in the schema.
    pub description: Option<String>,
    /// Fields of the input type.
    pub fields: Vec<ArgumentConfiguration>,
}

/// All operators known to the condition types, the built-in ones and those registered by the
/// application.
#[derive(Clone)]
pub struct OperatorRegistry {
    config: Configuration,
    operators: IndexMap<String, Arc<dyn Operator>>,
}

impl OperatorRegistry {
    /// Returns a registry holding the built-in operators.
    pub fn new(config: Configuration) -> Self {
        let mut registry = Self {
            config,
            operators: IndexMap::new(),
        };

        for operator in BuiltinOperator::ALL {
            registry
                .operators
                .insert(operator.as_str().to_string(), Arc::new(operator));
        }

        registry
    }

    /// Registers a custom operator, replacing any operator with the same identifier.
    ///
    /// Fails when another operator is already exposed under the same condition field name, for
    /// example `shop::EqualOperatorType` next to the built-in `EqualOperatorType`.
    pub fn register(
        &mut self,
        operator: impl Operator + 'static,
    ) -> ConfigurationResult<&mut Self> {
        let identifier = operator.identifier().to_string();
        let field_name = self.field_name(&identifier);

        let registered = self
            .operators
            .keys()
            .find(|known| **known != identifier && self.field_name(known) == field_name)
            .cloned();
        if let Some(registered) = registered {
            return Err(ConfigurationError::OperatorNameClash {
                operator: identifier,
                registered,
                field_name,
            });
        }

        self.operators.insert(identifier, Arc::new(operator));
        Ok(self)
    }

    /// Returns true if an operator with this identifier is registered.
    pub fn contains(&self, identifier: &str) -> bool {
        self.operators.contains_key(identifier)
    }

    /// Returns the registered operator with this identifier.
    pub fn get(&self, identifier: &str) -> Option<&Arc<dyn Operator>> {
        self.operators.get(identifier)
    }

    /// Short name of an operator without namespace and operator suffix.
    fn base_name<'a>(&self, identifier: &'a str) -> &'a str {
        let short_name = self.config.short_name(identifier);
        short_name
            .strip_suffix(self.config.operator_suffix.as_str())
            .unwrap_or(short_name)
    }

    /// Name of the condition field exposing an operator: the namespace and operator suffix are
    /// stripped and the first character is lowered, `EqualOperatorType` becomes `equal`.
    pub fn field_name(&self, identifier: &str) -> String {
        lcfirst(self.base_name(identifier))
    }

    /// Name of an operator type instantiated for a leaf type, `EqualOperatorType` comparing
    /// `String` values becomes `EqualOperatorString`.
    pub fn type_name(&self, identifier: &str, leaf: &TypeRef) -> String {
        format!(
            "{}{}{}",
            self.base_name(identifier),
            self.config.operator_type_suffix,
            named_type(leaf)
        )
    }

    /// Instantiates the input type of a registered operator for the given leaf type.
    pub fn instantiate(&self, identifier: &str, leaf: &TypeRef) -> Option<OperatorType> {
        let operator = self.get(identifier)?;

        Some(OperatorType {
            name: self.type_name(identifier, leaf),
            description: operator.description(),
            fields: operator.fields(leaf),
        })
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::new(Configuration::default())
    }
}

impl fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorRegistry")
            .field("operators", &self.operators.keys().collect::<Vec<_>>())
            .finish()
    }
}
