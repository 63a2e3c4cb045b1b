// SPDX-License-Identifier: AGPL-3.0-or-later

/// A specialized result type for building GraphQL configuration from entity metadata.
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;

/// Represents all the ways deriving GraphQL configuration from an entity can fail.
///
/// Every error is fatal to the schema build: a GraphQL schema must be fully resolvable before it
/// can serve any request.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// No class metadata or class description is known for this entity.
    #[error("no metadata found for entity `{0}`, make sure it is mapped by the ORM")]
    UnknownEntity(String),

    /// A type declaration names a type the registry does not know.
    #[error("no GraphQL type registered for `{0}`, register it in the type registry first")]
    UnknownType(String),

    /// Annotation lookups for a class could not be routed to any annotation driver.
    #[error("entity `{0}` must be configured with an annotation mapping driver")]
    MissingAnnotationDriver(String),

    /// An annotation was constructed with a key it does not support.
    #[error("annotation `{annotation}` has no attribute `{attribute}`")]
    UnknownAnnotationAttribute {
        /// Annotation name.
        annotation: String,
        /// Offending key.
        attribute: String,
    },

    /// An annotation attribute was given a value of the wrong kind.
    #[error("attribute `{attribute}` of annotation `{annotation}` expects {expected}")]
    InvalidAnnotationValue {
        /// Annotation name.
        annotation: String,
        /// Offending key.
        attribute: String,
        /// Human readable description of the accepted value.
        expected: String,
    },

    /// A parameter is type hinted as `array` without an explicit type override.
    #[error(
        "The parameter `${parameter}` on method {method} is type hinted as `array` and is not \
         overridden via `Argument` annotation. Either change the type hint or specify the type \
         with `Argument` annotation."
    )]
    ArrayParameter {
        /// Parameter name.
        parameter: String,
        /// Fully qualified method name.
        method: String,
    },

    /// A collection return type whose element entity is not mapped as an association.
    #[error(
        "The method {method} is type hinted with a return type of `{type_name}`, but the entity \
         contained in that collection could not be automatically detected. Either fix the type \
         hint, fix the ORM mapping, or specify the type with `Field` annotation."
    )]
    UnknownCollectionEntity {
        /// Fully qualified method name.
        method: String,
        /// The collection type hint.
        type_name: String,
    },

    /// No source declared a type for a parameter.
    #[error(
        "Could not find type for parameter `${parameter}` for method {method}. Either type hint \
         the parameter, or specify the type with `{annotation}` annotation."
    )]
    MissingParameterType {
        /// Parameter name.
        parameter: String,
        /// Fully qualified method name.
        method: String,
        /// Annotation which could declare the type.
        annotation: String,
    },

    /// No source declared a return type for a getter.
    #[error(
        "Could not find type for method {method}. Either type hint the return value, or specify \
         the type with `Field` annotation."
    )]
    MissingReturnType {
        /// Fully qualified method name.
        method: String,
    },

    /// A parameter resolved to a type which can not be used as GraphQL input.
    #[error(
        "Type for parameter `${parameter}` for method {method} must be an input type, but was \
         `{type_name}`. Use `{annotation}` annotation to specify a custom input type."
    )]
    NotInputType {
        /// Parameter name.
        parameter: String,
        /// Fully qualified method name.
        method: String,
        /// Resolved named type.
        type_name: String,
        /// Annotation which could declare the type.
        annotation: String,
    },

    /// Argument annotations which do not match any parameter of the annotated method.
    #[error(
        "The following arguments were declared via `Argument` annotation but do not match actual \
         parameter names on method {method}. Either rename or remove the annotations: {arguments}"
    )]
    ExtraArguments {
        /// Fully qualified method name.
        method: String,
        /// Comma separated list of unmatched argument names.
        arguments: String,
    },

    /// A `Filter` annotation names something which is not a registered operator.
    #[error(
        "On class `{class}` the annotation `Filter` expects an operator implementation, but got \
         `{operator}`"
    )]
    InvalidOperator {
        /// Class carrying the annotation.
        class: String,
        /// Offending operator identifier.
        operator: String,
    },

    /// Two operators would be exposed under the same condition field name.
    #[error(
        "operator `{operator}` is exposed as `{field_name}` like the registered operator \
         `{registered}`, rename one of them"
    )]
    OperatorNameClash {
        /// Identifier of the operator being registered.
        operator: String,
        /// Identifier of the operator already registered.
        registered: String,
        /// Condition field name both operators map to.
        field_name: String,
    },

    /// A condition type override which is not a leaf type.
    #[error(
        "On property `{property}` the annotation `{annotation}` expects a, possibly wrapped, leaf \
         type, but instead got: `{type_name}`"
    )]
    NotLeafType {
        /// Fully qualified property name.
        property: String,
        /// Annotation declaring the type.
        annotation: String,
        /// Resolved named type.
        type_name: String,
    },

    /// The assembled dynamic schema was rejected by `async-graphql`.
    #[error("invalid GraphQL schema: {0}")]
    Schema(String),
}
