// SPDX-License-Identifier: AGPL-3.0-or-later

use async_graphql::dynamic::TypeRef;
use async_graphql::indexmap::IndexMap;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::annotation::{Argument, Field};
use crate::docblock::DocBlock;
use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::factory::{
    nullable_if_has_default, throw_if_array, EntityScope, FactoryContext,
    FieldsConfigurationFactory,
};
use crate::fields::{ArgumentConfiguration, OutputFieldConfiguration};
use crate::metadata::{ParameterDescriptor, ReflectedMethod};
use crate::types::non_null;
use crate::utils::lcfirst;

static GETTER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^(get|is|has)[A-Z]").expect("valid regex"));

/// Docblock return types too vague to derive a GraphQL type from.
const AMBIGUOUS_RETURN_TYPES: [&str; 2] = ["Collection", "array"];

const ANNOTATION: &str = "Argument";

/// Creates the configuration of all output fields of an entity, one per getter.
///
/// Only the `get` prefix is stripped from field names: `getTitle` becomes `title`, but `isValid`
/// and `hasMoney` keep their name.
#[derive(Debug, Clone)]
pub struct OutputFieldsConfigurationFactory {
    context: FactoryContext,
}

impl OutputFieldsConfigurationFactory {
    /// Returns a factory reading entities through the given context.
    pub fn new(context: FactoryContext) -> Self {
        Self { context }
    }

    /// Merges the method parameters with the `Argument` annotations of the same name.
    fn complete_arguments(
        &self,
        scope: &EntityScope<'_>,
        method: &ReflectedMethod<'_>,
        annotated: Vec<Argument>,
        doc_block: &DocBlock,
    ) -> ConfigurationResult<IndexMap<String, ArgumentConfiguration>> {
        let mut annotated: IndexMap<String, Argument> = annotated
            .into_iter()
            .map(|argument| {
                let name = argument.overrides.name().unwrap_or_default().to_string();
                (name, argument)
            })
            .collect();

        let mut args = IndexMap::new();
        for parameter in &method.method.parameters {
            let argument = annotated.shift_remove(&parameter.name).unwrap_or_default();
            let configuration =
                self.complete_argument(scope, method, parameter, argument, doc_block)?;

            args.insert(parameter.name.clone(), configuration);
        }

        if !annotated.is_empty() {
            let arguments: Vec<&str> = annotated.keys().map(String::as_str).collect();
            return Err(ConfigurationError::ExtraArguments {
                method: method.full_name(),
                arguments: arguments.join(", "),
            });
        }

        Ok(args)
    }

    fn complete_argument(
        &self,
        scope: &EntityScope<'_>,
        method: &ReflectedMethod<'_>,
        parameter: &ParameterDescriptor,
        mut argument: Argument,
        doc_block: &DocBlock,
    ) -> ConfigurationResult<ArgumentConfiguration> {
        let overrides = &mut argument.overrides;

        if overrides.name().is_none() {
            overrides.set_name(Some(parameter.name.clone()));
        }

        if overrides.description().is_none() {
            overrides.set_description(doc_block.parameter_description(&parameter.name));
        }

        if !overrides.has_default_value() {
            if let Some(default_value) = &parameter.default_value {
                overrides.set_default_value(default_value.clone());
            }
        }

        if overrides.type_ref().is_none() {
            let type_declaration = doc_block.parameter_type(&parameter.name);
            throw_if_array(parameter, method, type_declaration.as_deref())?;
            overrides.set_type_ref(scope.type_from_declaration(
                method,
                type_declaration.as_deref(),
                true,
            )?);
        }

        if overrides.type_ref().is_none() {
            if let Some(hint) = &parameter.type_hint {
                throw_if_array(parameter, method, Some(&hint.name))?;
                overrides.set_type_ref(Some(scope.type_from_hint(hint, true)?));
            }
        }

        nullable_if_has_default(overrides);

        let type_ref = scope.input_type(parameter, method, overrides, ANNOTATION)?;
        Ok(ArgumentConfiguration {
            name: overrides.name().unwrap_or(&parameter.name).to_string(),
            type_ref,
            description: overrides.description().map(str::to_string),
            default_value: overrides.default_value().cloned(),
        })
    }

    /// Type precedence: identity, annotation, docblock and finally the return type hint.
    fn field_type(
        &self,
        scope: &EntityScope<'_>,
        method: &ReflectedMethod<'_>,
        field_name: &str,
        annotated: Option<TypeRef>,
        doc_block: &DocBlock,
    ) -> ConfigurationResult<TypeRef> {
        if scope.is_identity_field(field_name) {
            return Ok(non_null(TypeRef::named(TypeRef::ID)));
        }

        if let Some(type_ref) = annotated {
            return Ok(type_ref);
        }

        let return_type = doc_block
            .return_type()
            .filter(|declaration| !AMBIGUOUS_RETURN_TYPES.contains(&declaration.as_str()));
        if let Some(type_ref) = scope.type_from_declaration(method, return_type.as_deref(), false)? {
            return Ok(type_ref);
        }

        if let Some(type_ref) = scope.type_from_return_type_hint(method, field_name)? {
            return Ok(type_ref);
        }

        Err(ConfigurationError::MissingReturnType {
            method: method.full_name(),
        })
    }
}

impl FieldsConfigurationFactory for OutputFieldsConfigurationFactory {
    type Configuration = OutputFieldConfiguration;

    fn context(&self) -> &FactoryContext {
        &self.context
    }

    fn method_pattern(&self) -> &Regex {
        &GETTER_PATTERN
    }

    fn method_to_configuration(
        &self,
        scope: &EntityScope<'_>,
        method: ReflectedMethod<'_>,
    ) -> ConfigurationResult<Option<OutputFieldConfiguration>> {
        let mut field: Field = scope
            .reader()
            .field_annotation(method.declaring_class, method.name())?
            .unwrap_or_default();

        // Type declarations of the annotation and its arguments become actual types first
        let resolved_type = field.overrides.type_ref().cloned();
        let annotated_type = match &resolved_type {
            Some(type_ref) => Some(type_ref.clone()),
            None => {
                scope.type_from_declaration(&method, field.overrides.type_declaration(), false)?
            }
        };
        for argument in field.args.iter_mut() {
            if argument.overrides.type_ref().is_none() {
                let type_ref = scope.type_from_declaration(
                    &method,
                    argument.overrides.type_declaration(),
                    false,
                )?;
                argument.overrides.set_type_ref(type_ref);
            }
        }

        let method_name = method.name();
        let field_name = lcfirst(method_name.strip_prefix("get").unwrap_or(method_name));
        let doc_block = DocBlock::new(method.method);

        let args = self.complete_arguments(scope, &method, field.args, &doc_block)?;
        // The identity field is `ID!` even when the annotation holds a resolved type
        let type_ref = match resolved_type {
            Some(type_ref) if !scope.is_identity_field(&field_name) => type_ref,
            _ => self.field_type(scope, &method, &field_name, annotated_type, &doc_block)?,
        };

        let configuration = OutputFieldConfiguration {
            name: field
                .overrides
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| field_name.clone()),
            type_ref,
            description: field
                .overrides
                .description()
                .map(str::to_string)
                .or_else(|| doc_block.method_description()),
            method: field.method.unwrap_or_else(|| method_name.to_string()),
            args,
        };

        debug!(
            "Output field `{}` of type `{}` from {}",
            configuration.name,
            configuration.type_ref,
            method.full_name()
        );

        Ok(Some(configuration))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_graphql::dynamic::TypeRef;
    use async_graphql::indexmap::IndexMap;
    use async_graphql::Value;
    use rstest::rstest;

    use crate::annotation::{Argument, Field, StaticAnnotationReader};
    use crate::errors::ConfigurationError;
    use crate::factory::{FactoryContext, FieldsConfigurationFactory};
    use crate::fields::{ArgumentConfiguration, OutputFieldConfiguration};
    use crate::metadata::{
        ClassDescriptor, ClassMetadata, FieldMapping, MethodDescriptor, ParameterDescriptor,
        StaticMetadataProvider,
    };
    use crate::test_helpers::{blog_context, blog_types, POST, USER};

    use super::OutputFieldsConfigurationFactory;

    fn field<'a>(
        fields: &'a [OutputFieldConfiguration],
        name: &str,
    ) -> &'a OutputFieldConfiguration {
        fields
            .iter()
            .find(|field| field.name == name)
            .unwrap_or_else(|| panic!("no output field `{}`", name))
    }

    /// Factory for a single entity `shop::Customer` with the given getters and annotations.
    fn customer_factory(
        methods: Vec<MethodDescriptor>,
        reader: StaticAnnotationReader,
    ) -> OutputFieldsConfigurationFactory {
        let class = methods
            .into_iter()
            .fold(ClassDescriptor::new("shop::Customer"), ClassDescriptor::method);
        let metadata =
            ClassMetadata::new("shop::Customer").field(FieldMapping::new("id", "integer").identity());
        let provider = StaticMetadataProvider::new().with_entity(metadata, class);

        let mut types = blog_types();
        types.register_entity("shop::Customer");

        OutputFieldsConfigurationFactory::new(FactoryContext::new(
            Arc::new(provider),
            Arc::new(reader),
            Arc::new(types),
        ))
    }

    #[test]
    fn plain_getter() {
        let factory = customer_factory(
            vec![MethodDescriptor::new("getName").returns("string")],
            StaticAnnotationReader::new(),
        );

        assert_eq!(
            factory.create("shop::Customer").unwrap(),
            vec![OutputFieldConfiguration {
                name: "name".into(),
                type_ref: TypeRef::named_nn(TypeRef::STRING),
                description: None,
                method: "getName".into(),
                args: IndexMap::new(),
            }]
        );
    }

    #[rstest]
    #[case("getName", "name")]
    #[case("getURL", "uRL")]
    #[case("isValid", "isValid")]
    #[case("hasMoney", "hasMoney")]
    fn field_names(#[case] method: &str, #[case] expected: &str) {
        let factory = customer_factory(
            vec![MethodDescriptor::new(method).returns("bool")],
            StaticAnnotationReader::new(),
        );

        let fields = factory.create("shop::Customer").unwrap();
        assert_eq!(fields[0].name, expected);
        assert_eq!(fields[0].method, method);
    }

    #[rstest]
    #[case("getter")]
    #[case("getname")]
    #[case("issue")]
    #[case("hash")]
    #[case("name")]
    fn non_getters(#[case] method: &str) {
        let factory = customer_factory(
            vec![MethodDescriptor::new(method).returns("string")],
            StaticAnnotationReader::new(),
        );

        assert!(factory.create("shop::Customer").unwrap().is_empty());
    }

    #[test]
    fn identity_is_always_id() {
        let factory = customer_factory(
            vec![MethodDescriptor::new("getId").returns("?string")],
            StaticAnnotationReader::new().method(
                "shop::Customer",
                "getId",
                Field::new().with(|overrides| overrides.with_type("int")),
            ),
        );

        let fields = factory.create("shop::Customer").unwrap();
        assert_eq!(fields[0].type_ref, TypeRef::named_nn(TypeRef::ID));
    }

    #[test]
    fn blog_post_outputs() {
        let factory = OutputFieldsConfigurationFactory::new(blog_context());
        let fields = factory.create(POST).unwrap();

        let names: Vec<&str> = fields.iter().map(|field| field.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "title",
                "content",
                "isPublished",
                "user",
                "tags",
                "words",
                "id",
                "creationDate"
            ]
        );

        let title = field(&fields, "title");
        assert_eq!(title.type_ref, TypeRef::named_nn(TypeRef::STRING));
        assert_eq!(title.description.as_deref(), Some("The title of the post"));

        assert_eq!(
            field(&fields, "isPublished").type_ref,
            TypeRef::named_nn(TypeRef::BOOLEAN)
        );
        assert_eq!(field(&fields, "user").type_ref, TypeRef::named_nn("User"));
        assert_eq!(
            field(&fields, "tags").type_ref,
            TypeRef::named_nn_list_nn("Tag")
        );
        assert_eq!(field(&fields, "id").type_ref, TypeRef::named_nn(TypeRef::ID));
        assert_eq!(
            field(&fields, "creationDate").type_ref,
            TypeRef::named_nn("DateTime")
        );

        let words = field(&fields, "words");
        assert_eq!(words.type_ref, TypeRef::named_nn_list_nn(TypeRef::STRING));
        assert_eq!(
            words.args.values().cloned().collect::<Vec<_>>(),
            vec![
                ArgumentConfiguration::new("search", TypeRef::named(TypeRef::STRING))
                    .description("Only return words containing this text")
                    .default_value(Value::Null),
                ArgumentConfiguration::new("limit", TypeRef::named(TypeRef::INT))
                    .default_value(10),
            ]
        );
    }

    #[test]
    fn collection_getter_of_user() {
        let factory = OutputFieldsConfigurationFactory::new(blog_context());
        let fields = factory.create(USER).unwrap();

        assert_eq!(
            field(&fields, "posts").type_ref,
            TypeRef::named_nn_list_nn("Post")
        );
        assert_eq!(
            field(&fields, "email").type_ref,
            TypeRef::named(TypeRef::STRING)
        );
        // Excluded with annotation
        assert!(fields.iter().all(|field| field.name != "password"));
    }

    #[test]
    fn arguments_merge_with_annotations() {
        let factory = customer_factory(
            vec![MethodDescriptor::new("getOrders")
                .param(ParameterDescriptor::new("status"))
                .param(ParameterDescriptor::new("since").hint("string"))
                .returns("int")],
            StaticAnnotationReader::new().method(
                "shop::Customer",
                "getOrders",
                Field::new()
                    .with(|overrides| {
                        overrides
                            .with_name("orderCount")
                            .with_description("Number of orders")
                    })
                    .with_argument(Argument::new("status").with(|overrides| {
                        overrides.with_type("?string").with_description("Order status")
                    })),
            ),
        );

        let fields = factory.create("shop::Customer").unwrap();
        let orders = &fields[0];
        assert_eq!(orders.name, "orderCount");
        assert_eq!(orders.method, "getOrders");
        assert_eq!(orders.description.as_deref(), Some("Number of orders"));
        assert_eq!(orders.type_ref, TypeRef::named_nn(TypeRef::INT));

        let names: Vec<&str> = orders.args.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["status", "since"]);
        assert_eq!(
            orders.args["status"],
            ArgumentConfiguration::new("status", TypeRef::named(TypeRef::STRING))
                .description("Order status")
        );
        assert_eq!(
            orders.args["since"].type_ref,
            TypeRef::named_nn(TypeRef::STRING)
        );
    }

    #[test]
    fn only_name_overridden() {
        let factory = customer_factory(
            vec![MethodDescriptor::new("getNickname")
                .returns("?string")
                .doc("/** Get the nickname */")],
            StaticAnnotationReader::new().method(
                "shop::Customer",
                "getNickname",
                Field::new().with(|overrides| overrides.with_name("alias")),
            ),
        );

        let fields = factory.create("shop::Customer").unwrap();
        assert_eq!(fields[0].name, "alias");
        assert_eq!(fields[0].type_ref, TypeRef::named(TypeRef::STRING));
        assert_eq!(fields[0].description.as_deref(), Some("The nickname"));
        assert_eq!(fields[0].method, "getNickname");
    }

    #[test]
    fn resolved_type_is_kept() {
        let factory = customer_factory(
            vec![MethodDescriptor::new("getScore").returns("?string")],
            StaticAnnotationReader::new().method(
                "shop::Customer",
                "getScore",
                Field::new().with(|overrides| overrides.with_type_ref(TypeRef::named(TypeRef::INT))),
            ),
        );

        let fields = factory.create("shop::Customer").unwrap();
        assert_eq!(fields[0].type_ref, TypeRef::named(TypeRef::INT));
    }

    #[test]
    fn resolved_type_on_identity_is_id() {
        let factory = customer_factory(
            vec![MethodDescriptor::new("getId").returns("int")],
            StaticAnnotationReader::new().method(
                "shop::Customer",
                "getId",
                Field::new().with(|overrides| overrides.with_type_ref(TypeRef::named(TypeRef::INT))),
            ),
        );

        let fields = factory.create("shop::Customer").unwrap();
        assert_eq!(fields[0].name, "id");
        assert_eq!(fields[0].type_ref, TypeRef::named_nn(TypeRef::ID));
    }

    #[test]
    fn docblock_return_types() {
        let factory = customer_factory(
            vec![
                MethodDescriptor::new("getFriends")
                    .returns("string")
                    .doc("/** @return Customer[] */"),
                MethodDescriptor::new("getRating")
                    .returns("?float")
                    .doc("/** @return array */"),
            ],
            StaticAnnotationReader::new(),
        );

        let fields = factory.create("shop::Customer").unwrap();
        assert_eq!(fields[0].type_ref, TypeRef::named_nn_list_nn("Customer"));
        assert_eq!(fields[1].type_ref, TypeRef::named(TypeRef::FLOAT));
    }

    #[test]
    fn fatal_getters() {
        let factory = customer_factory(
            vec![MethodDescriptor::new("getNote")],
            StaticAnnotationReader::new(),
        );
        assert_eq!(
            factory.create("shop::Customer"),
            Err(ConfigurationError::MissingReturnType {
                method: "`shop::Customer::getNote()`".into(),
            })
        );

        let factory = customer_factory(
            vec![MethodDescriptor::new("getOrders").returns("Collection")],
            StaticAnnotationReader::new(),
        );
        assert_eq!(
            factory.create("shop::Customer"),
            Err(ConfigurationError::UnknownCollectionEntity {
                method: "`shop::Customer::getOrders()`".into(),
                type_name: "Collection".into(),
            })
        );

        let factory = customer_factory(
            vec![MethodDescriptor::new("getOrders")
                .param(ParameterDescriptor::new("filters").hint("array"))
                .returns("int")],
            StaticAnnotationReader::new(),
        );
        assert!(matches!(
            factory.create("shop::Customer"),
            Err(ConfigurationError::ArrayParameter { .. })
        ));

        let factory = customer_factory(
            vec![MethodDescriptor::new("getOrders")
                .param(ParameterDescriptor::new("status").hint("string"))
                .returns("int")],
            StaticAnnotationReader::new().method(
                "shop::Customer",
                "getOrders",
                Field::new()
                    .with_argument(Argument::new("state"))
                    .with_argument(Argument::new("limit")),
            ),
        );
        assert_eq!(
            factory.create("shop::Customer"),
            Err(ConfigurationError::ExtraArguments {
                method: "`shop::Customer::getOrders()`".into(),
                arguments: "state, limit".into(),
            })
        );

        let factory = customer_factory(
            vec![MethodDescriptor::new("getOrders")
                .param(ParameterDescriptor::new("owner").hint("self"))
                .returns("int")],
            StaticAnnotationReader::new().method(
                "shop::Customer",
                "getOrders",
                Field::new().with_argument(
                    Argument::new("owner").with(|overrides| overrides.with_type("Customer")),
                ),
            ),
        );
        assert_eq!(
            factory.create("shop::Customer"),
            Err(ConfigurationError::NotInputType {
                parameter: "owner".into(),
                method: "`shop::Customer::getOrders()`".into(),
                type_name: "Customer".into(),
                annotation: "Argument".into(),
            })
        );
    }
}
