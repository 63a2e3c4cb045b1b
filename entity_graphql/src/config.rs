// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::Deserialize;

/// Configuration object holding the naming conventions used when deriving GraphQL types from
/// entities.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Suffix of the scalar type used to pass entity identifiers as input, `Post` becomes
    /// `PostID`. Defaults to `ID`.
    pub entity_id_suffix: String,

    /// Suffix of the input object built from the setters of an entity, `Post` becomes
    /// `PostInput`. Defaults to `Input`.
    pub input_suffix: String,

    /// Suffix of the condition input object built from the mapped fields of an entity, `Post`
    /// becomes `PostFilterGroupCondition`. Defaults to `FilterGroupCondition`.
    pub condition_suffix: String,

    /// Suffix every operator identifier carries. It is stripped to derive the operator field name,
    /// `EqualOperatorType` becomes `equal`. Defaults to `OperatorType`.
    pub operator_suffix: String,

    /// Replaces the operator suffix in the names of operator input types, followed by the leaf
    /// type compared, `EqualOperatorType` comparing `String` becomes `EqualOperatorString`.
    /// Defaults to `Operator`.
    pub operator_type_suffix: String,

    /// Separator between the namespace segments of a class name. Only the last segment is used
    /// for GraphQL type names. Defaults to `::`.
    pub namespace_separator: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            entity_id_suffix: "ID".into(),
            input_suffix: "Input".into(),
            condition_suffix: "FilterGroupCondition".into(),
            operator_suffix: "OperatorType".into(),
            operator_type_suffix: "Operator".into(),
            namespace_separator: "::".into(),
        }
    }
}

impl Configuration {
    /// Returns the last namespace segment of a class name.
    pub fn short_name<'a>(&self, class_name: &'a str) -> &'a str {
        class_name
            .rsplit(self.namespace_separator.as_str())
            .next()
            .unwrap_or(class_name)
    }
}
