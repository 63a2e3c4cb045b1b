// SPDX-License-Identifier: AGPL-3.0-or-later

//! Turns field configurations into dynamic GraphQL types and registers them on a schema.
//!
//! Every entity contributes its object type, the scalar used to pass its identifier, its input
//! type built from setters and its condition types. Output fields are resolved by calling the
//! configured getter on the parent object, falling back to the default field resolver.
use std::collections::HashMap;
use std::iter::once;
use std::sync::Arc;

use async_graphql::dynamic::{
    Field, FieldFuture, FieldValue, InputObject, InputValue, Object, ResolverContext, Scalar,
    Schema, SchemaBuilder, TypeRef,
};
use async_graphql::indexmap::IndexMap;
use async_graphql::Value;
use log::{debug, info};

use crate::annotation::AnnotationReader;
use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::factory::{
    ConditionType, FactoryContext, FieldsConfigurationFactory, FilterGroupConditionTypeFactory,
    InputFieldsConfigurationFactory, OutputFieldsConfigurationFactory,
};
use crate::fields::{ArgumentConfiguration, InputFieldConfiguration, OutputFieldConfiguration};
use crate::metadata::{instance_descriptor, ClassDescriptor, MetadataProvider};
use crate::resolver::{
    invoke, resolve, ArgumentValue, Arguments, EntityId, Resolvable, Resolved, Source,
};
use crate::types::{named_type, OperatorRegistry, OperatorType, TypeRegistry};

/// Builds the GraphQL types of mapped entities.
#[derive(Debug)]
pub struct EntityGraphQL {
    types: Arc<TypeRegistry>,
    input_fields: InputFieldsConfigurationFactory,
    output_fields: OutputFieldsConfigurationFactory,
    conditions: FilterGroupConditionTypeFactory,
}

impl EntityGraphQL {
    /// Returns a builder for the given entities. All of them must already be registered in the
    /// type registry, together with any custom scalar or alias their fields use.
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        reader: Arc<dyn AnnotationReader>,
        types: TypeRegistry,
        operators: OperatorRegistry,
    ) -> Self {
        let types = Arc::new(types);
        let context = FactoryContext::new(provider, reader, types.clone());

        Self {
            types,
            input_fields: InputFieldsConfigurationFactory::new(context.clone()),
            output_fields: OutputFieldsConfigurationFactory::new(context.clone()),
            conditions: FilterGroupConditionTypeFactory::new(context, Arc::new(operators)),
        }
    }

    /// GraphQL types known to the builder.
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Factory of the input fields of entities.
    pub fn input_fields(&self) -> &InputFieldsConfigurationFactory {
        &self.input_fields
    }

    /// Factory of the output fields of entities.
    pub fn output_fields(&self) -> &OutputFieldsConfigurationFactory {
        &self.output_fields
    }

    /// Factory of the condition types of entities.
    pub fn conditions(&self) -> &FilterGroupConditionTypeFactory {
        &self.conditions
    }

    /// Returns the description of an instance of an entity, inherited members included. Objects
    /// returned to the schema as [`Resolvable`] are expected to describe themselves with it.
    pub fn instance_descriptor(&self, class_name: &str) -> ConfigurationResult<ClassDescriptor> {
        if !self.types.is_entity(class_name) {
            return Err(ConfigurationError::UnknownEntity(class_name.to_string()));
        }

        instance_descriptor(self.output_fields.context().provider(), class_name)
    }

    /// Registers the custom scalars known to the type registry, like `DateTime`.
    pub fn register_scalars(&self, mut builder: SchemaBuilder) -> SchemaBuilder {
        for name in self.types.custom_scalars() {
            builder = builder.register(Scalar::new(name));
        }

        builder
    }

    /// Registers all types of one entity.
    pub fn register_entity(
        &self,
        builder: SchemaBuilder,
        class_name: &str,
    ) -> ConfigurationResult<SchemaBuilder> {
        self.register_entities(builder, &[class_name])
    }

    /// Registers all types of several entities. Operator types shared between them are only
    /// registered once.
    pub fn register_entities(
        &self,
        mut builder: SchemaBuilder,
        class_names: &[&str],
    ) -> ConfigurationResult<SchemaBuilder> {
        let mut input_objects: IndexMap<String, InputObject> = IndexMap::new();

        for class_name in class_names {
            if !self.types.is_entity(class_name) {
                return Err(ConfigurationError::UnknownEntity(class_name.to_string()));
            }

            let object_name = self.types.entity_type_name(class_name);
            let outputs = self.output_fields.create(class_name)?;
            builder = builder
                .register(build_object(&object_name, &outputs, &self.types))
                .register(build_entity_id_scalar(&self.types, class_name));

            let input_name = self.types.input_type_name(class_name);
            let inputs = self.input_fields.create(class_name)?;
            if inputs.is_empty() {
                debug!("Skip input type {input_name} without any field");
            } else {
                builder = builder.register(build_input_object(&input_name, &inputs));
            }

            let condition_name = self.types.condition_type_name(class_name);
            let condition = self.conditions.create(class_name, &condition_name);
            for input_object in condition.into_input_objects()? {
                input_objects
                    .entry(input_object.type_name().to_string())
                    .or_insert(input_object);
            }

            info!("Registered GraphQL types of entity {class_name}");
        }

        for (_, input_object) in input_objects {
            builder = builder.register(input_object);
        }

        Ok(builder)
    }

    /// Validates and builds the schema.
    pub fn finish(&self, builder: SchemaBuilder) -> ConfigurationResult<Schema> {
        builder
            .finish()
            .map_err(|err| ConfigurationError::Schema(err.to_string()))
    }
}

/// Builds an object type from output field configurations.
pub fn build_object(
    type_name: &str,
    fields: &[OutputFieldConfiguration],
    types: &TypeRegistry,
) -> Object {
    fields.iter().fold(Object::new(type_name), |object, configuration| {
        object.field(build_field(configuration, types))
    })
}

fn build_field(configuration: &OutputFieldConfiguration, types: &TypeRegistry) -> Field {
    let field_name = configuration.name.clone();
    let method = configuration.method.clone();

    // Arguments accepting entity identifiers, with the class of the identified entity
    let entity_args: Arc<HashMap<String, String>> = Arc::new(
        configuration
            .args
            .values()
            .filter_map(|argument| {
                types
                    .entity_of_id_type(named_type(&argument.type_ref))
                    .map(|class_name| (argument.name.clone(), class_name.to_string()))
            })
            .collect(),
    );

    let mut field = Field::new(
        &configuration.name,
        configuration.type_ref.clone(),
        move |ctx| {
            let field_name = field_name.clone();
            let method = method.clone();
            let entity_args = entity_args.clone();

            FieldFuture::new(async move {
                let args = arguments(&ctx, &entity_args);
                let resolved = resolve_field(&ctx, &method, &field_name, &args);
                Ok(Some(into_field_value(resolved)))
            })
        },
    );

    if let Some(description) = &configuration.description {
        field = field.description(description);
    }

    configuration
        .args
        .values()
        .fold(field, |field, argument| field.argument(build_argument(argument)))
}

/// Calls the getter on objects, records are resolved by field name.
fn resolve_field(
    ctx: &ResolverContext<'_>,
    method: &str,
    field_name: &str,
    args: &Arguments,
) -> Resolved {
    if let Some(object) = ctx.parent_value.downcast_ref::<Arc<dyn Resolvable>>() {
        return invoke(object.as_ref(), method, args)
            .unwrap_or_else(|| resolve(Source::Object(object.as_ref()), field_name, args));
    }

    match ctx.parent_value.as_value() {
        Some(Value::Object(record)) => resolve(Source::Record(record), field_name, args),
        _ => Resolved::null(),
    }
}

fn arguments(ctx: &ResolverContext<'_>, entity_args: &HashMap<String, String>) -> Arguments {
    ctx.args
        .iter()
        .map(|(name, value)| {
            let value = value.as_value().clone();
            let argument = match entity_args.get(name.as_str()) {
                Some(class_name) => ArgumentValue::EntityId(EntityId::new(class_name, value)),
                None => ArgumentValue::Value(value),
            };

            (name.to_string(), argument)
        })
        .collect()
}

/// Converts a resolved value into what the schema executor expects.
pub fn into_field_value(resolved: Resolved) -> FieldValue<'static> {
    match resolved {
        Resolved::Value(Value::Null) => FieldValue::NULL,
        Resolved::Value(value) => FieldValue::value(value),
        Resolved::Object(object) => FieldValue::owned_any(object),
        Resolved::List(items) => FieldValue::list(items.into_iter().map(into_field_value)),
    }
}

/// Builds an argument or input field.
pub fn build_argument(configuration: &ArgumentConfiguration) -> InputValue {
    input_value(
        &configuration.name,
        &configuration.type_ref,
        configuration.description.as_deref(),
        configuration.default_value.as_ref(),
    )
}

fn input_value(
    name: &str,
    type_ref: &TypeRef,
    description: Option<&str>,
    default_value: Option<&Value>,
) -> InputValue {
    let mut input_value = InputValue::new(name, type_ref.clone());

    if let Some(description) = description {
        input_value = input_value.description(description);
    }

    if let Some(default_value) = default_value {
        input_value = input_value.default_value(default_value.clone());
    }

    input_value
}

/// Builds an input object type from input field configurations.
pub fn build_input_object(type_name: &str, fields: &[InputFieldConfiguration]) -> InputObject {
    fields
        .iter()
        .fold(InputObject::new(type_name), |input_object, configuration| {
            input_object.field(input_value(
                &configuration.name,
                &configuration.type_ref,
                configuration.description.as_deref(),
                configuration.default_value.as_ref(),
            ))
        })
}

/// Builds the scalar accepting identifiers of an entity.
pub fn build_entity_id_scalar(types: &TypeRegistry, class_name: &str) -> Scalar {
    Scalar::new(types.entity_id_type_name(class_name)).description(format!(
        "Identifier of an existing `{}` entity",
        types.entity_type_name(class_name)
    ))
}

fn build_operator_type(operator: &OperatorType) -> InputObject {
    let mut input_object = InputObject::new(&operator.name);
    if let Some(description) = &operator.description {
        input_object = input_object.description(description);
    }

    operator
        .fields
        .iter()
        .fold(input_object, |input_object, field| {
            input_object.field(build_argument(field))
        })
}

impl ConditionType {
    /// Returns the condition type, one input type per field and the operator types they use.
    pub fn into_input_objects(self) -> ConfigurationResult<Vec<InputObject>> {
        let fields = self.fields()?;

        let mut condition = InputObject::new(self.name()).description(Self::DESCRIPTION);
        let mut field_types = Vec::new();
        let mut operator_types: IndexMap<String, InputObject> = IndexMap::new();

        for field in fields {
            condition = condition.field(InputValue::new(
                &field.name,
                TypeRef::named(&field.type_name),
            ));

            let mut field_type =
                InputObject::new(&field.type_name).description(Self::FIELD_DESCRIPTION);
            for operator in &field.operators {
                field_type = field_type.field(InputValue::new(
                    &operator.field_name,
                    TypeRef::named(&operator.operator.name),
                ));

                operator_types
                    .entry(operator.operator.name.clone())
                    .or_insert_with(|| build_operator_type(&operator.operator));
            }

            field_types.push(field_type);
        }

        Ok(once(condition)
            .chain(field_types)
            .chain(operator_types.into_iter().map(|(_, input_object)| input_object))
            .collect())
    }
}
