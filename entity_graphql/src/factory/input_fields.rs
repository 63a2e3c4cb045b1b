// SPDX-License-Identifier: AGPL-3.0-or-later

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::annotation::Input;
use crate::docblock::DocBlock;
use crate::errors::ConfigurationResult;
use crate::factory::{
    nullable_if_has_default, throw_if_array, EntityScope, FactoryContext,
    FieldsConfigurationFactory,
};
use crate::fields::InputFieldConfiguration;
use crate::metadata::{ParameterDescriptor, ReflectedMethod};
use crate::utils::lcfirst;

static SETTER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new("^set[A-Z]").expect("valid regex"));

const ANNOTATION: &str = "Input";

/// Creates the configuration of all input fields of an entity, one per setter.
///
/// Setters taking anything else than exactly one parameter are silently ignored.
#[derive(Debug, Clone)]
pub struct InputFieldsConfigurationFactory {
    context: FactoryContext,
}

impl InputFieldsConfigurationFactory {
    /// Returns a factory reading entities through the given context.
    pub fn new(context: FactoryContext) -> Self {
        Self { context }
    }

    /// Completes the type with what the docblock and the parameter declare.
    fn complete_type(
        &self,
        scope: &EntityScope<'_>,
        input: &mut Input,
        method: &ReflectedMethod<'_>,
        parameter: &ParameterDescriptor,
        doc_block: &DocBlock,
    ) -> ConfigurationResult<()> {
        if input.overrides.type_ref().is_none() {
            let type_declaration = doc_block.parameter_type(&parameter.name);
            throw_if_array(parameter, method, type_declaration.as_deref())?;

            let type_ref =
                scope.type_from_declaration(method, type_declaration.as_deref(), true)?;
            input.overrides.set_type_ref(type_ref);
        }

        if input.overrides.type_ref().is_none() {
            if let Some(hint) = &parameter.type_hint {
                throw_if_array(parameter, method, Some(&hint.name))?;
                input
                    .overrides
                    .set_type_ref(Some(scope.type_from_hint(hint, true)?));
            }
        }

        nullable_if_has_default(&mut input.overrides);

        Ok(())
    }

    /// The default value declared on the parameter wins over the default of the property.
    fn complete_default_value(
        &self,
        scope: &EntityScope<'_>,
        input: &mut Input,
        parameter: &ParameterDescriptor,
        field_name: &str,
    ) -> ConfigurationResult<()> {
        if input.overrides.has_default_value() {
            return Ok(());
        }

        if let Some(default_value) = &parameter.default_value {
            input.overrides.set_default_value(default_value.clone());
            return Ok(());
        }

        if let Some(default_value) = scope.property_default_value(field_name)? {
            input.overrides.set_default_value(default_value);
        }

        Ok(())
    }
}

impl FieldsConfigurationFactory for InputFieldsConfigurationFactory {
    type Configuration = InputFieldConfiguration;

    fn context(&self) -> &FactoryContext {
        &self.context
    }

    fn method_pattern(&self) -> &Regex {
        &SETTER_PATTERN
    }

    fn method_to_configuration(
        &self,
        scope: &EntityScope<'_>,
        method: ReflectedMethod<'_>,
    ) -> ConfigurationResult<Option<InputFieldConfiguration>> {
        let parameter = match method.method.parameters.as_slice() {
            [parameter] => parameter,
            _ => return Ok(None),
        };

        let mut input = scope
            .reader()
            .input_annotation(method.declaring_class, method.name())?
            .unwrap_or_default();

        let method_name = method.name();
        let field_name = lcfirst(method_name.strip_prefix("set").unwrap_or(method_name));
        if input.overrides.name().is_none() {
            input.overrides.set_name(Some(field_name.clone()));
        }

        let doc_block = DocBlock::new(method.method);
        if input.overrides.description().is_none() {
            input
                .overrides
                .set_description(doc_block.method_description());
        }

        self.complete_default_value(scope, &mut input, parameter, &field_name)?;

        // A type resolved ahead of time is kept as is
        if input.overrides.type_ref().is_none() {
            let type_ref = scope.type_from_declaration(
                &method,
                input.overrides.type_declaration(),
                false,
            )?;
            input.overrides.set_type_ref(type_ref);

            self.complete_type(scope, &mut input, &method, parameter, &doc_block)?;
        }

        let type_ref = scope.input_type(parameter, &method, &input.overrides, ANNOTATION)?;
        let configuration = InputFieldConfiguration {
            name: input.overrides.name().unwrap_or(&field_name).to_string(),
            type_ref,
            description: input.overrides.description().map(str::to_string),
            default_value: input.overrides.default_value().cloned(),
            method: input
                .method
                .clone()
                .unwrap_or_else(|| method.name().to_string()),
            updatable: input.is_updatable(),
        };

        debug!(
            "Input field `{}` of type `{}` from {}",
            configuration.name,
            configuration.type_ref,
            method.full_name()
        );

        Ok(Some(configuration))
    }
}
