// SPDX-License-Identifier: AGPL-3.0-or-later

//! Metadata about mapped entities: ORM mappings and the reflected description of their classes.
mod class;
mod mapping;
mod provider;

pub use class::{
    ClassDescriptor, MethodDescriptor, ParameterDescriptor, PropertyDescriptor, TypeHint,
    Visibility,
};
pub use mapping::{AssociationKind, AssociationMapping, ClassMetadata, FieldMapping};
pub use provider::{
    class_hierarchy, class_methods, find_property, instance_descriptor, property_default_value,
    MetadataProvider, ReflectedMethod, StaticMetadataProvider,
};
