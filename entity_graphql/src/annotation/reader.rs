// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashMap;

use crate::annotation::{Annotation, Field, FilterGroupCondition, Filters, Input};
use crate::errors::ConfigurationResult;

/// Capability to read the annotations declared on a class, its methods and its properties.
///
/// Lookups fail when the reader can not be determined for a class, a class without annotations
/// simply returns an empty list.
pub trait AnnotationReader: Send + Sync {
    fn class_annotations(&self, class_name: &str) -> ConfigurationResult<Vec<Annotation>>;

    fn method_annotations(
        &self,
        class_name: &str,
        method_name: &str,
    ) -> ConfigurationResult<Vec<Annotation>>;

    fn property_annotations(
        &self,
        class_name: &str,
        property_name: &str,
    ) -> ConfigurationResult<Vec<Annotation>>;

    /// Returns the `Field` annotation of a method.
    fn field_annotation(
        &self,
        class_name: &str,
        method_name: &str,
    ) -> ConfigurationResult<Option<Field>> {
        let field = self
            .method_annotations(class_name, method_name)?
            .into_iter()
            .find_map(|annotation| match annotation {
                Annotation::Field(field) => Some(field),
                _ => None,
            });

        Ok(field)
    }

    /// Returns the `Input` annotation of a method.
    fn input_annotation(
        &self,
        class_name: &str,
        method_name: &str,
    ) -> ConfigurationResult<Option<Input>> {
        let input = self
            .method_annotations(class_name, method_name)?
            .into_iter()
            .find_map(|annotation| match annotation {
                Annotation::Input(input) => Some(input),
                _ => None,
            });

        Ok(input)
    }

    fn is_method_excluded(&self, class_name: &str, method_name: &str) -> ConfigurationResult<bool> {
        let annotations = self.method_annotations(class_name, method_name)?;
        Ok(annotations.iter().any(Annotation::is_exclude))
    }

    fn is_property_excluded(
        &self,
        class_name: &str,
        property_name: &str,
    ) -> ConfigurationResult<bool> {
        let annotations = self.property_annotations(class_name, property_name)?;
        Ok(annotations.iter().any(Annotation::is_exclude))
    }

    /// Returns the `FilterGroupCondition` annotation of a property.
    fn filter_group_condition_annotation(
        &self,
        class_name: &str,
        property_name: &str,
    ) -> ConfigurationResult<Option<FilterGroupCondition>> {
        let condition = self
            .property_annotations(class_name, property_name)?
            .into_iter()
            .find_map(|annotation| match annotation {
                Annotation::FilterGroupCondition(condition) => Some(condition),
                _ => None,
            });

        Ok(condition)
    }

    /// Returns all `Filters` annotations declared on a class, without its ancestors.
    fn filters_annotations(&self, class_name: &str) -> ConfigurationResult<Vec<Filters>> {
        let filters = self
            .class_annotations(class_name)?
            .into_iter()
            .filter_map(|annotation| match annotation {
                Annotation::Filters(filters) => Some(filters),
                _ => None,
            })
            .collect();

        Ok(filters)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Target {
    Class(String),
    Method(String, String),
    Property(String, String),
}

/// Annotation reader holding all declarations in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticAnnotationReader {
    annotations: HashMap<Target, Vec<Annotation>>,
}

impl StaticAnnotationReader {
    /// Returns a reader without any annotation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an annotation on a class.
    pub fn class(mut self, class_name: &str, annotation: impl Into<Annotation>) -> Self {
        self.push(Target::Class(class_name.to_string()), annotation.into());
        self
    }

    /// Declares an annotation on a method.
    pub fn method(
        mut self,
        class_name: &str,
        method_name: &str,
        annotation: impl Into<Annotation>,
    ) -> Self {
        let target = Target::Method(class_name.to_string(), method_name.to_string());
        self.push(target, annotation.into());
        self
    }

    /// Declares an annotation on a property.
    pub fn property(
        mut self,
        class_name: &str,
        property_name: &str,
        annotation: impl Into<Annotation>,
    ) -> Self {
        let target = Target::Property(class_name.to_string(), property_name.to_string());
        self.push(target, annotation.into());
        self
    }

    fn push(&mut self, target: Target, annotation: Annotation) {
        self.annotations.entry(target).or_default().push(annotation);
    }

    fn get(&self, target: &Target) -> Vec<Annotation> {
        self.annotations.get(target).cloned().unwrap_or_default()
    }
}

impl AnnotationReader for StaticAnnotationReader {
    fn class_annotations(&self, class_name: &str) -> ConfigurationResult<Vec<Annotation>> {
        Ok(self.get(&Target::Class(class_name.to_string())))
    }

    fn method_annotations(
        &self,
        class_name: &str,
        method_name: &str,
    ) -> ConfigurationResult<Vec<Annotation>> {
        Ok(self.get(&Target::Method(
            class_name.to_string(),
            method_name.to_string(),
        )))
    }

    fn property_annotations(
        &self,
        class_name: &str,
        property_name: &str,
    ) -> ConfigurationResult<Vec<Annotation>> {
        Ok(self.get(&Target::Property(
            class_name.to_string(),
            property_name.to_string(),
        )))
    }
}
