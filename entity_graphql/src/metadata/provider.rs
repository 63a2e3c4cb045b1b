// SPDX-License-Identifier: AGPL-3.0-or-later

use async_graphql::Value;
use serde::Deserialize;

use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::metadata::{ClassDescriptor, ClassMetadata, MethodDescriptor, PropertyDescriptor};

/// Read-only access to the metadata the ORM holds about mapped entities.
///
/// Implementations are expected to be safe for concurrent reads, schema builds for different
/// entities may run in parallel.
pub trait MetadataProvider: Send + Sync {
    /// Returns the mapping metadata of an entity.
    fn class_metadata(&self, class_name: &str) -> Option<&ClassMetadata>;

    /// Returns the description of a class, entity or not.
    fn class_descriptor(&self, class_name: &str) -> Option<&ClassDescriptor>;
}

/// Metadata provider holding all descriptions in memory.
///
/// Bindings can emit it as JSON and deserialize it here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StaticMetadataProvider {
    entities: Vec<ClassMetadata>,
    classes: Vec<ClassDescriptor>,
}

impl StaticMetadataProvider {
    /// Returns an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mapped entity together with the description of its class.
    pub fn with_entity(mut self, metadata: ClassMetadata, class: ClassDescriptor) -> Self {
        self.entities.push(metadata);
        self.classes.push(class);
        self
    }

    /// Adds a class which is not an entity itself, like an abstract base class.
    pub fn with_class(mut self, class: ClassDescriptor) -> Self {
        self.classes.push(class);
        self
    }

    /// Returns all mapped entities.
    pub fn entities(&self) -> &[ClassMetadata] {
        &self.entities
    }
}

impl MetadataProvider for StaticMetadataProvider {
    fn class_metadata(&self, class_name: &str) -> Option<&ClassMetadata> {
        self.entities
            .iter()
            .find(|metadata| metadata.name == class_name)
    }

    fn class_descriptor(&self, class_name: &str) -> Option<&ClassDescriptor> {
        self.classes.iter().find(|class| class.name == class_name)
    }
}

/// A method together with the class declaring it.
#[derive(Debug, Clone, Copy)]
pub struct ReflectedMethod<'a> {
    /// Fully qualified name of the declaring class.
    pub declaring_class: &'a str,

    /// The method itself.
    pub method: &'a MethodDescriptor,
}

impl<'a> ReflectedMethod<'a> {
    /// Name of the method.
    pub fn name(&self) -> &'a str {
        &self.method.name
    }

    /// Fully qualified method name used in error messages, for example
    /// `` `blog::model::Post::getTitle()` ``.
    pub fn full_name(&self) -> String {
        format!("`{}::{}()`", self.declaring_class, self.method.name)
    }
}

/// Returns the class and all its known ancestors, starting with the class itself.
pub fn class_hierarchy<'a>(
    provider: &'a dyn MetadataProvider,
    class_name: &str,
) -> ConfigurationResult<Vec<&'a ClassDescriptor>> {
    let mut hierarchy = Vec::new();
    let mut current = Some(
        provider
            .class_descriptor(class_name)
            .ok_or_else(|| ConfigurationError::UnknownEntity(class_name.to_string()))?,
    );

    while let Some(class) = current {
        hierarchy.push(class);

        current = class
            .parent
            .as_deref()
            // Guard against a class listing itself as its own ancestor
            .filter(|parent| hierarchy.iter().all(|known| known.name != *parent))
            .and_then(|parent| provider.class_descriptor(parent));
    }

    Ok(hierarchy)
}

/// Returns all methods an instance of the class exposes, including inherited ones.
///
/// Methods of the class itself come first in declaration order, followed by the methods of each
/// ancestor. A method overridden further down the hierarchy is only listed once, with the
/// overriding declaration.
pub fn class_methods<'a>(
    provider: &'a dyn MetadataProvider,
    class_name: &str,
) -> ConfigurationResult<Vec<ReflectedMethod<'a>>> {
    let mut methods: Vec<ReflectedMethod> = Vec::new();

    for class in class_hierarchy(provider, class_name)? {
        for method in &class.methods {
            if methods.iter().any(|known| known.method.name == method.name) {
                continue;
            }

            methods.push(ReflectedMethod {
                declaring_class: &class.name,
                method,
            });
        }
    }

    Ok(methods)
}

/// Returns the description of an instance of the class: the members it declares followed by the
/// ones it inherits, in the order of [`class_methods`]. Overridden members keep the declaration
/// closest to the class.
///
/// This is what a [`Resolvable`](crate::resolver::Resolvable) object is expected to describe.
pub fn instance_descriptor(
    provider: &dyn MetadataProvider,
    class_name: &str,
) -> ConfigurationResult<ClassDescriptor> {
    let hierarchy = class_hierarchy(provider, class_name)?;

    let mut instance = ClassDescriptor::new(class_name);
    instance.parent = hierarchy.first().and_then(|class| class.parent.clone());

    for class in hierarchy {
        for method in &class.methods {
            if instance.find_method(&method.name).is_none() {
                instance.methods.push(method.clone());
            }
        }

        for property in &class.properties {
            if instance.find_property(&property.name).is_none() {
                instance.properties.push(property.clone());
            }
        }
    }

    Ok(instance)
}

/// Finds a property declared by the class or by the nearest ancestor declaring it.
pub fn find_property<'a>(
    provider: &'a dyn MetadataProvider,
    class_name: &str,
    property_name: &str,
) -> ConfigurationResult<Option<(&'a ClassDescriptor, &'a PropertyDescriptor)>> {
    let property = class_hierarchy(provider, class_name)?
        .into_iter()
        .find_map(|class| {
            class
                .find_property(property_name)
                .map(|property| (class, property))
        });

    Ok(property)
}

/// Returns the default value of a property, looking it up on the class declaring it.
///
/// A `null` default counts as no default.
pub fn property_default_value(
    provider: &dyn MetadataProvider,
    class_name: &str,
    property_name: &str,
) -> ConfigurationResult<Option<Value>> {
    let default_value = find_property(provider, class_name, property_name)?
        .and_then(|(_, property)| property.default_value.clone())
        .filter(|value| value != &Value::Null);

    Ok(default_value)
}
