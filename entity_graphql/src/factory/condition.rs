// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;
use std::sync::Arc;

use async_graphql::dynamic::TypeRef;
use async_graphql::indexmap::IndexMap;
use log::debug;
use once_cell::sync::OnceCell;

use crate::annotation::Filter;
use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::factory::FactoryContext;
use crate::fields::ArgumentConfiguration;
use crate::metadata::{class_hierarchy, find_property, FieldMapping};
use crate::types::{
    list_of, named_type, non_null, BuiltinOperator, OperatorRegistry, OperatorType,
};
use crate::utils::ucfirst;

const CONDITIONS_FIELD: &str = "conditions";

/// Leaf type compared by each operator of a field, in the order the operators are exposed.
type OperatorMap = IndexMap<String, TypeRef>;

/// Custom operators declared with `Filter` annotations, by field name.
type CustomOperators = IndexMap<String, Vec<(String, Filter)>>;

/// One operator of a condition field.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionOperator {
    /// Name of the field, for example `equal`.
    pub field_name: String,

    /// Operator type instantiated for the leaf type of the condition field.
    pub operator: OperatorType,
}

/// Conditions on one field of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionField {
    /// Name of the entity field.
    pub name: String,

    /// Name of the input type holding the operators, for example `PostFilterGroupConditionTitle`.
    pub type_name: String,

    /// Operators in the order they are exposed.
    pub operators: Vec<ConditionOperator>,
}

/// Input type to specify conditions on the fields of an entity.
///
/// Its fields are derived on first access only, once the types of all entities are known.
pub struct ConditionType {
    name: String,
    class_name: String,
    factory: FilterGroupConditionTypeFactory,
    fields: OnceCell<Vec<ConditionField>>,
}

impl ConditionType {
    /// Description of the condition type.
    pub const DESCRIPTION: &'static str = "Type to specify conditions on fields";

    /// Description of the input type of each condition field.
    pub const FIELD_DESCRIPTION: &'static str = "Type to specify a condition on a specific field";

    /// Name of the condition type, for example `PostFilterGroupCondition`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class name of the entity the conditions apply to.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Returns the condition fields, deriving them on first call.
    pub fn fields(&self) -> ConfigurationResult<&[ConditionField]> {
        self.fields
            .get_or_try_init(|| self.factory.fields(&self.class_name, &self.name))
            .map(Vec::as_slice)
    }
}

impl fmt::Debug for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionType")
            .field("name", &self.name)
            .field("class_name", &self.class_name)
            .field("fields", &self.fields.get())
            .finish()
    }
}

/// Creates input types to specify conditions on the fields of an entity.
///
/// Every mapped field and association gets its own input type, with one field per operator
/// applicable to it: scalar fields can be compared in all sorts of ways, associations holding a
/// single entity can additionally be checked for presence, while collections can only be checked
/// for the entities they contain. Custom operators are declared on the entity class with `Filter`
/// annotations and appended to the built-in ones.
#[derive(Debug, Clone)]
pub struct FilterGroupConditionTypeFactory {
    context: FactoryContext,
    operators: Arc<OperatorRegistry>,
}

impl FilterGroupConditionTypeFactory {
    /// Returns a factory instantiating operators from the given registry.
    pub fn new(context: FactoryContext, operators: Arc<OperatorRegistry>) -> Self {
        Self { context, operators }
    }

    /// Operators known to the factory.
    pub fn operators(&self) -> &OperatorRegistry {
        &self.operators
    }

    /// Creates the condition type of an entity, named `type_name`.
    pub fn create(&self, class_name: &str, type_name: &str) -> ConditionType {
        ConditionType {
            name: type_name.to_string(),
            class_name: class_name.to_string(),
            factory: self.clone(),
            fields: OnceCell::new(),
        }
    }

    /// Returns the configuration of the `conditions` field, accepting a list of conditions on an
    /// entity.
    pub fn conditions_field(&self, class_name: &str) -> ArgumentConfiguration {
        let type_name = self.context.types().condition_type_name(class_name);

        ArgumentConfiguration::new(
            CONDITIONS_FIELD,
            list_of(non_null(TypeRef::named(type_name))),
        )
        .description("Conditions to be applied on fields")
    }

    fn fields(&self, class_name: &str, type_name: &str) -> ConfigurationResult<Vec<ConditionField>> {
        let metadata = self
            .context
            .provider()
            .class_metadata(class_name)
            .ok_or_else(|| ConfigurationError::UnknownEntity(class_name.to_string()))?;

        let mut custom_operators = self.custom_operators(class_name)?;
        let mut fields = Vec::new();

        for mapping in &metadata.field_mappings {
            let field_name = &mapping.field_name;
            let declaring_class = self.declaring_class(class_name, field_name)?;

            if self
                .context
                .reader()
                .is_property_excluded(&declaring_class, field_name)?
            {
                debug!("Skip conditions on excluded property `{declaring_class}::${field_name}`");
                continue;
            }

            let leaf = self.leaf_type(&declaring_class, mapping)?;
            let operators = self.operator_map(
                field_name,
                &leaf,
                &BuiltinOperator::SCALAR,
                &mut custom_operators,
            )?;
            fields.push(self.condition_field(class_name, type_name, field_name, &operators)?);
        }

        for mapping in &metadata.association_mappings {
            let builtin: &[BuiltinOperator] = if mapping.kind.is_collection_valued() {
                &BuiltinOperator::COLLECTION_ASSOCIATION
            } else {
                &BuiltinOperator::SINGLE_ASSOCIATION
            };

            let leaf = TypeRef::named(TypeRef::ID);
            let operators =
                self.operator_map(&mapping.field_name, &leaf, builtin, &mut custom_operators)?;
            fields.push(self.condition_field(
                class_name,
                type_name,
                &mapping.field_name,
                &operators,
            )?);
        }

        // Fields only known from custom operators
        let remaining: Vec<String> = custom_operators.keys().cloned().collect();
        for field_name in remaining {
            let leaf = TypeRef::named(TypeRef::ID);
            let operators =
                self.operator_map(&field_name, &leaf, &[], &mut custom_operators)?;
            fields.push(self.condition_field(class_name, type_name, &field_name, &operators)?);
        }

        Ok(fields)
    }

    /// Name of the class declaring a mapped property, the entity itself if none does.
    fn declaring_class(&self, class_name: &str, field_name: &str) -> ConfigurationResult<String> {
        let declaring_class = find_property(self.context.provider(), class_name, field_name)?
            .map(|(class, _)| class.name.clone())
            .unwrap_or_else(|| class_name.to_string());

        Ok(declaring_class)
    }

    /// Leaf type of a mapped field: `ID` for the identity, the type declared with the
    /// `FilterGroupCondition` annotation, or the type of the ORM mapping.
    fn leaf_type(&self, declaring_class: &str, mapping: &FieldMapping) -> ConfigurationResult<TypeRef> {
        if mapping.id {
            return Ok(TypeRef::named(TypeRef::ID));
        }

        let types = self.context.types();
        let annotation = self
            .context
            .reader()
            .filter_group_condition_annotation(declaring_class, &mapping.field_name)?;

        if let Some(annotation) = annotation {
            let declared =
                types.resolve_declaration(declaring_class, annotation.type_name.as_deref(), false)?;

            if let Some(type_ref) = declared {
                return self.check_leaf(
                    type_ref,
                    declaring_class,
                    &mapping.field_name,
                    "FilterGroupCondition",
                );
            }
        }

        types.get(declaring_class, &mapping.type_name, false)
    }

    /// Unwraps a type to its named type, which must be a scalar or an enum.
    fn check_leaf(
        &self,
        type_ref: TypeRef,
        class_name: &str,
        field_name: &str,
        annotation: &str,
    ) -> ConfigurationResult<TypeRef> {
        let type_name = named_type(&type_ref);

        match self.context.types().kind(&type_ref) {
            Some(kind) if kind.is_leaf() => Ok(TypeRef::named(type_name.to_string())),
            _ => Err(ConfigurationError::NotLeafType {
                property: format!("`{class_name}::${field_name}`"),
                annotation: annotation.to_string(),
                type_name: type_name.to_string(),
            }),
        }
    }

    /// Reads the `Filter` annotations of the class and its ancestors, the ones of the most distant
    /// ancestor first.
    fn custom_operators(&self, class_name: &str) -> ConfigurationResult<CustomOperators> {
        let mut custom_operators = CustomOperators::new();
        let hierarchy = class_hierarchy(self.context.provider(), class_name)?;

        for class in hierarchy.into_iter().rev() {
            for filters in self.context.reader().filters_annotations(&class.name)? {
                for filter in filters.filters {
                    if !self.operators.contains(&filter.operator) {
                        return Err(ConfigurationError::InvalidOperator {
                            class: class.name.clone(),
                            operator: filter.operator,
                        });
                    }

                    custom_operators
                        .entry(filter.field.clone())
                        .or_default()
                        .push((class.name.clone(), filter));
                }
            }
        }

        Ok(custom_operators)
    }

    /// Builds the operators of a field: the built-in ones comparing with `leaf`, followed by the
    /// custom operators declared for the field. A custom operator replaces a built-in one with
    /// the same identifier, keeping its position.
    fn operator_map(
        &self,
        field_name: &str,
        leaf: &TypeRef,
        builtin: &[BuiltinOperator],
        custom_operators: &mut CustomOperators,
    ) -> ConfigurationResult<OperatorMap> {
        let mut operators: OperatorMap = builtin
            .iter()
            .map(|operator| (operator.as_str().to_string(), leaf.clone()))
            .collect();

        if let Some(filters) = custom_operators.shift_remove(field_name) {
            for (class_name, filter) in filters {
                let type_ref = self.context.types().get(&class_name, &filter.type_name, false)?;
                let leaf = self.check_leaf(type_ref, &class_name, field_name, "Filter")?;
                operators.insert(filter.operator, leaf);
            }
        }

        Ok(operators)
    }

    fn condition_field(
        &self,
        class_name: &str,
        type_name: &str,
        field_name: &str,
        operators: &OperatorMap,
    ) -> ConfigurationResult<ConditionField> {
        let operators = operators
            .iter()
            .map(|(identifier, leaf)| {
                let operator = self.operators.instantiate(identifier, leaf).ok_or_else(|| {
                    ConfigurationError::InvalidOperator {
                        class: class_name.to_string(),
                        operator: identifier.clone(),
                    }
                })?;

                Ok(ConditionOperator {
                    field_name: self.operators.field_name(identifier),
                    operator,
                })
            })
            .collect::<ConfigurationResult<Vec<_>>>()?;

        Ok(ConditionField {
            name: field_name.to_string(),
            type_name: format!("{}{}", type_name, ucfirst(field_name)),
            operators,
        })
    }
}
