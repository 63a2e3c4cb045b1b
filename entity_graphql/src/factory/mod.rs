// SPDX-License-Identifier: AGPL-3.0-or-later

//! Factories deriving GraphQL configuration from entity metadata.
use std::fmt;
use std::sync::Arc;

use async_graphql::dynamic::TypeRef;
use async_graphql::Value;
use log::debug;
use regex::Regex;

use crate::annotation::{AnnotationOverride, AnnotationReader};
use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::metadata::{
    class_methods, property_default_value, ClassMetadata, MetadataProvider, ParameterDescriptor,
    ReflectedMethod, TypeHint,
};
use crate::types::{is_non_null, list_of, named_type, non_null, strip_non_null, TypeRegistry};

mod condition;
mod input_fields;
mod output_fields;

pub use condition::{
    ConditionField, ConditionOperator, ConditionType, FilterGroupConditionTypeFactory,
};
pub use input_fields::InputFieldsConfigurationFactory;
pub use output_fields::OutputFieldsConfigurationFactory;

/// Return type hints holding several entities, their element type is read from the association
/// mapping.
const COLLECTION_TYPE_HINTS: [&str; 2] = ["array", "Collection"];

/// Read-only collaborators shared by all factories.
#[derive(Clone)]
pub struct FactoryContext {
    provider: Arc<dyn MetadataProvider>,
    reader: Arc<dyn AnnotationReader>,
    types: Arc<TypeRegistry>,
}

impl FactoryContext {
    /// Returns a context sharing the given metadata provider, annotation reader and type registry.
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        reader: Arc<dyn AnnotationReader>,
        types: Arc<TypeRegistry>,
    ) -> Self {
        Self {
            provider,
            reader,
            types,
        }
    }

    /// Metadata of the mapped entities.
    pub fn provider(&self) -> &dyn MetadataProvider {
        self.provider.as_ref()
    }

    /// Annotations declared on the entity classes.
    pub fn reader(&self) -> &dyn AnnotationReader {
        self.reader.as_ref()
    }

    /// GraphQL types known to the factories.
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }
}

impl fmt::Debug for FactoryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryContext")
            .field("types", &self.types)
            .finish_non_exhaustive()
    }
}

/// The entity a factory is currently creating configuration for.
///
/// Built once per `create` call, it holds the mapping metadata and the identity field of the
/// entity so nothing about a previous entity survives between calls.
pub struct EntityScope<'a> {
    context: &'a FactoryContext,
    metadata: &'a ClassMetadata,
    identity_field: Option<&'a str>,
}

impl fmt::Debug for EntityScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityScope")
            .field("class_name", &self.metadata.name)
            .field("identity_field", &self.identity_field)
            .finish()
    }
}

impl<'a> EntityScope<'a> {
    /// Prepares the build of one entity, failing if it is not mapped.
    pub fn new(context: &'a FactoryContext, class_name: &str) -> ConfigurationResult<Self> {
        let metadata = context
            .provider()
            .class_metadata(class_name)
            .ok_or_else(|| ConfigurationError::UnknownEntity(class_name.to_string()))?;

        Ok(Self {
            context,
            metadata,
            identity_field: metadata.identity_field(),
        })
    }

    /// Context the scope was created from.
    pub fn context(&self) -> &'a FactoryContext {
        self.context
    }

    /// Class name of the entity being built.
    pub fn class_name(&self) -> &'a str {
        &self.metadata.name
    }

    /// Mapping metadata of the entity being built.
    pub fn metadata(&self) -> &'a ClassMetadata {
        self.metadata
    }

    /// GraphQL types known to the factories.
    pub fn types(&self) -> &'a TypeRegistry {
        self.context.types()
    }

    /// Annotations declared on the entity classes.
    pub fn reader(&self) -> &'a dyn AnnotationReader {
        self.context.reader()
    }

    /// Returns `true` if the field is the identity of the entity.
    pub fn is_identity_field(&self, field_name: &str) -> bool {
        self.identity_field == Some(field_name)
    }

    /// Resolves a declaration read from an annotation or docblock of a method. `self` refers to
    /// the class declaring the method.
    pub fn type_from_declaration(
        &self,
        method: &ReflectedMethod<'_>,
        declaration: Option<&str>,
        is_entity_id: bool,
    ) -> ConfigurationResult<Option<TypeRef>> {
        self.types()
            .resolve_declaration(method.declaring_class, declaration, is_entity_id)
    }

    /// Converts a type hint. `self` refers to the entity.
    pub fn type_from_hint(&self, hint: &TypeHint, is_entity_id: bool) -> ConfigurationResult<TypeRef> {
        self.types()
            .resolve_hint(self.class_name(), hint, is_entity_id)
    }

    /// Converts the return type hint of a method, looking up the entities held by collections in
    /// the association mapped on `field_name`.
    pub fn type_from_return_type_hint(
        &self,
        method: &ReflectedMethod<'_>,
        field_name: &str,
    ) -> ConfigurationResult<Option<TypeRef>> {
        let hint = match &method.method.return_type {
            Some(hint) => hint,
            None => return Ok(None),
        };

        if !self.is_collection_hint(hint) {
            return self.type_from_hint(hint, false).map(Some);
        }

        let target_entity = self.metadata.target_entity(field_name).ok_or_else(|| {
            ConfigurationError::UnknownCollectionEntity {
                method: method.full_name(),
                type_name: hint.name.clone(),
            }
        })?;

        let element = self.types().get(self.class_name(), target_entity, false)?;
        let mut type_ref = list_of(non_null(element));
        if !hint.nullable {
            type_ref = non_null(type_ref);
        }

        Ok(Some(type_ref))
    }

    fn is_collection_hint(&self, hint: &TypeHint) -> bool {
        let short_name = self.types().config().short_name(&hint.name);
        COLLECTION_TYPE_HINTS.contains(&short_name)
    }

    /// Returns the default value of the property backing a field, if any.
    pub fn property_default_value(&self, field_name: &str) -> ConfigurationResult<Option<Value>> {
        property_default_value(self.context.provider(), self.class_name(), field_name)
    }

    /// Checks the resolved type of a parameter can be used as input and returns it.
    pub fn input_type(
        &self,
        parameter: &ParameterDescriptor,
        method: &ReflectedMethod<'_>,
        overrides: &AnnotationOverride,
        annotation: &str,
    ) -> ConfigurationResult<TypeRef> {
        let type_ref = overrides.type_ref().cloned().ok_or_else(|| {
            ConfigurationError::MissingParameterType {
                parameter: parameter.name.clone(),
                method: method.full_name(),
                annotation: annotation.to_string(),
            }
        })?;

        match self.types().kind(&type_ref) {
            Some(kind) if kind.is_input() => Ok(type_ref),
            _ => Err(ConfigurationError::NotInputType {
                parameter: parameter.name.clone(),
                method: method.full_name(),
                type_name: named_type(&type_ref).to_string(),
                annotation: annotation.to_string(),
            }),
        }
    }
}

/// Creates the configuration of all fields of an entity, one per accessor method.
///
/// Implementations pick the methods they are interested in with a name pattern and turn each of
/// them into a configuration record.
pub trait FieldsConfigurationFactory {
    /// Configuration record created per method.
    type Configuration;

    fn context(&self) -> &FactoryContext;

    /// Pattern the names of the considered methods must match.
    fn method_pattern(&self) -> &Regex;

    /// Returns the configuration of a single method, `None` to skip it.
    fn method_to_configuration(
        &self,
        scope: &EntityScope<'_>,
        method: ReflectedMethod<'_>,
    ) -> ConfigurationResult<Option<Self::Configuration>>;

    /// Creates the configuration of all fields of an entity.
    ///
    /// Public instance methods of the class and its ancestors are considered, unless excluded with
    /// the `Exclude` annotation.
    fn create(&self, class_name: &str) -> ConfigurationResult<Vec<Self::Configuration>> {
        let context = self.context();
        let scope = EntityScope::new(context, class_name)?;

        let mut configurations = Vec::new();
        for method in class_methods(context.provider(), class_name)? {
            if !method.method.is_public_instance_method() {
                continue;
            }

            if !self.method_pattern().is_match(method.name()) {
                continue;
            }

            if context
                .reader()
                .is_method_excluded(method.declaring_class, method.name())?
            {
                debug!("Skip excluded method {}", method.full_name());
                continue;
            }

            match self.method_to_configuration(&scope, method)? {
                Some(configuration) => configurations.push(configuration),
                None => debug!("Skip method {}", method.full_name()),
            }
        }

        Ok(configurations)
    }
}

/// Fails when a parameter is declared as `array`, its element type can not be known.
pub(crate) fn throw_if_array(
    parameter: &ParameterDescriptor,
    method: &ReflectedMethod<'_>,
    type_name: Option<&str>,
) -> ConfigurationResult<()> {
    if type_name == Some("array") {
        return Err(ConfigurationError::ArrayParameter {
            parameter: parameter.name.clone(),
            method: method.full_name(),
        });
    }

    Ok(())
}

/// Inputs with a default value can not be non-null.
pub(crate) fn nullable_if_has_default(overrides: &mut AnnotationOverride) {
    if !overrides.has_default_value() {
        return;
    }

    let type_ref = match overrides.type_ref() {
        Some(type_ref) if is_non_null(type_ref) => strip_non_null(type_ref.clone()),
        _ => return,
    };
    overrides.set_type_ref(Some(type_ref));
}
