// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashMap;

use async_graphql::dynamic::TypeRef;
use async_graphql::indexmap::IndexMap;

use crate::config::Configuration;
use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::metadata::TypeHint;
use crate::types::{list_of, named_type, non_null, TypeDeclaration};

const BUILTIN_SCALARS: [&str; 5] = [
    TypeRef::INT,
    TypeRef::FLOAT,
    TypeRef::STRING,
    TypeRef::BOOLEAN,
    TypeRef::ID,
];

/// What a named GraphQL type is, which decides where it may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Leaf type, usable as input and output.
    Scalar,
    /// Leaf type restricted to a set of values.
    Enum,
    /// Output only.
    Object,
    /// Input only.
    InputObject,
}

impl TypeKind {
    /// Scalars, enums and input objects can be used as arguments and input fields.
    pub fn is_input(&self) -> bool {
        matches!(self, TypeKind::Scalar | TypeKind::Enum | TypeKind::InputObject)
    }

    /// Scalars and enums can be compared by operators.
    pub fn is_leaf(&self) -> bool {
        matches!(self, TypeKind::Scalar | TypeKind::Enum)
    }
}

/// Known GraphQL types and how type declarations map onto them.
///
/// Declarations are resolved in this order: mapped entity classes (by fully qualified name, or
/// relative to the namespace of the class declaring them), aliases such as `int` or `datetime`,
/// and finally GraphQL type names.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    config: Configuration,
    kinds: IndexMap<String, TypeKind>,
    aliases: HashMap<String, String>,
    entities: IndexMap<String, String>,
}

impl TypeRegistry {
    /// Returns a registry knowing the built-in scalars and the common ORM type names.
    pub fn new(config: Configuration) -> Self {
        let mut registry = Self {
            config,
            kinds: IndexMap::new(),
            aliases: HashMap::new(),
            entities: IndexMap::new(),
        };

        for scalar in BUILTIN_SCALARS.iter() {
            registry.kinds.insert(scalar.to_string(), TypeKind::Scalar);
        }

        let aliases = [
            ("int", TypeRef::INT),
            ("integer", TypeRef::INT),
            ("smallint", TypeRef::INT),
            ("bigint", TypeRef::INT),
            ("float", TypeRef::FLOAT),
            ("decimal", TypeRef::FLOAT),
            ("string", TypeRef::STRING),
            ("text", TypeRef::STRING),
            ("bool", TypeRef::BOOLEAN),
            ("boolean", TypeRef::BOOLEAN),
        ];
        for (alias, name) in aliases.iter() {
            registry.aliases.insert(alias.to_string(), name.to_string());
        }

        registry
    }

    /// Naming conventions of the derived types.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Registers a custom scalar, for example `DateTime`.
    pub fn register_scalar(&mut self, name: &str) -> &mut Self {
        self.register(name, TypeKind::Scalar)
    }

    /// Registers an enum type.
    pub fn register_enum(&mut self, name: &str) -> &mut Self {
        self.register(name, TypeKind::Enum)
    }

    /// Registers an object type, which can not be used as input.
    pub fn register_object(&mut self, name: &str) -> &mut Self {
        self.register(name, TypeKind::Object)
    }

    /// Registers an input object type.
    pub fn register_input_object(&mut self, name: &str) -> &mut Self {
        self.register(name, TypeKind::InputObject)
    }

    /// Makes a declaration name, like the ORM type `datetime`, resolve to a registered type.
    pub fn alias(&mut self, declaration: &str, name: &str) -> &mut Self {
        self.aliases
            .insert(declaration.to_string(), name.to_string());
        self
    }

    /// Registers the object, ID, input and condition types of a mapped entity.
    pub fn register_entity(&mut self, class_name: &str) -> &mut Self {
        let short_name = self.config.short_name(class_name).to_string();
        self.entities.insert(class_name.to_string(), short_name);

        let object = self.entity_type_name(class_name);
        let id = self.entity_id_type_name(class_name);
        let input = self.input_type_name(class_name);
        let condition = self.condition_type_name(class_name);

        self.register(&object, TypeKind::Object)
            .register(&id, TypeKind::Scalar)
            .register(&input, TypeKind::InputObject)
            .register(&condition, TypeKind::InputObject)
    }

    fn register(&mut self, name: &str, kind: TypeKind) -> &mut Self {
        self.kinds.insert(name.to_string(), kind);
        self
    }

    /// Returns `true` if the class was registered as entity.
    pub fn is_entity(&self, class_name: &str) -> bool {
        self.entities.contains_key(class_name)
    }

    /// Name of the object type of an entity, `blog::model::Post` becomes `Post`.
    pub fn entity_type_name(&self, class_name: &str) -> String {
        self.config.short_name(class_name).to_string()
    }

    /// Name of the scalar type accepting identifiers of an entity, for example `PostID`.
    pub fn entity_id_type_name(&self, class_name: &str) -> String {
        format!(
            "{}{}",
            self.config.short_name(class_name),
            self.config.entity_id_suffix
        )
    }

    /// Name of the input object type of an entity, for example `PostInput`.
    pub fn input_type_name(&self, class_name: &str) -> String {
        format!(
            "{}{}",
            self.config.short_name(class_name),
            self.config.input_suffix
        )
    }

    /// Name of the condition input type of an entity, for example `PostFilterGroupCondition`.
    pub fn condition_type_name(&self, class_name: &str) -> String {
        format!(
            "{}{}",
            self.config.short_name(class_name),
            self.config.condition_suffix
        )
    }

    /// Returns the class name of the entity identified by the given ID type.
    pub fn entity_of_id_type(&self, type_name: &str) -> Option<&str> {
        self.entities
            .keys()
            .find(|class_name| self.entity_id_type_name(class_name) == type_name)
            .map(String::as_str)
    }

    /// Returns the registered scalars which are neither built-in nor entity ID types.
    pub fn custom_scalars(&self) -> Vec<&str> {
        self.kinds
            .iter()
            .filter(|(name, kind)| {
                **kind == TypeKind::Scalar
                    && !BUILTIN_SCALARS.contains(&name.as_str())
                    && self.entity_of_id_type(name).is_none()
            })
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Returns the kind of the innermost named type.
    pub fn kind(&self, type_ref: &TypeRef) -> Option<TypeKind> {
        self.kinds.get(named_type(type_ref)).copied()
    }

    /// Resolves a bare type name to a named type.
    ///
    /// Entities resolve to their object type, or to their ID type when `is_entity_id` is set
    /// since entities are passed as identifiers in input positions.
    pub fn get(
        &self,
        self_class: &str,
        name: &str,
        is_entity_id: bool,
    ) -> ConfigurationResult<TypeRef> {
        if let Some(class_name) = self.find_entity(self_class, name) {
            let type_name = if is_entity_id {
                self.entity_id_type_name(class_name)
            } else {
                self.entity_type_name(class_name)
            };

            return Ok(TypeRef::named(type_name));
        }

        if let Some(alias) = self.aliases.get(name) {
            return Ok(TypeRef::named(alias.clone()));
        }

        if self.kinds.contains_key(name) {
            return Ok(TypeRef::named(name.to_string()));
        }

        Err(ConfigurationError::UnknownType(name.to_string()))
    }

    /// Resolves a declaration from an annotation or docblock. Blank declarations resolve to
    /// `None`.
    ///
    /// `self` refers to `self_class`. Unless the declaration is nullable the type is wrapped as
    /// non-null, list elements are always non-null.
    pub fn resolve_declaration(
        &self,
        self_class: &str,
        declaration: Option<&str>,
        is_entity_id: bool,
    ) -> ConfigurationResult<Option<TypeRef>> {
        let declaration = match declaration.and_then(TypeDeclaration::parse) {
            Some(declaration) => declaration,
            None => return Ok(None),
        };

        let name = self.self_name(self_class, &declaration.name);
        let mut type_ref = self.get(self_class, name, is_entity_id)?;

        if declaration.list {
            type_ref = list_of(non_null(type_ref));
        }

        if !declaration.nullable {
            type_ref = non_null(type_ref);
        }

        Ok(Some(type_ref))
    }

    /// Resolves a reflected type hint, wrapped as non-null unless the hint is nullable.
    pub fn resolve_hint(
        &self,
        self_class: &str,
        hint: &TypeHint,
        is_entity_id: bool,
    ) -> ConfigurationResult<TypeRef> {
        let name = self.self_name(self_class, &hint.name);
        let type_ref = self.get(self_class, name, is_entity_id)?;

        if hint.nullable {
            Ok(type_ref)
        } else {
            Ok(non_null(type_ref))
        }
    }

    fn self_name<'a>(&self, self_class: &'a str, name: &'a str) -> &'a str {
        if name == "self" {
            self_class
        } else {
            name
        }
    }

    /// Finds a mapped entity by fully qualified name, or by name relative to the namespace of
    /// `context_class`.
    fn find_entity(&self, context_class: &str, name: &str) -> Option<&str> {
        if let Some((class_name, _)) = self.entities.get_key_value(name) {
            return Some(class_name);
        }

        let separator = self.config.namespace_separator.as_str();
        let (namespace, _) = context_class.rsplit_once(separator)?;
        let relative = format!("{namespace}{separator}{name}");

        self.entities
            .get_key_value(&relative)
            .map(|(class_name, _)| class_name.as_str())
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new(Configuration::default())
    }
}

#[cfg(test)]
mod tests {
    use async_graphql::dynamic::TypeRef;
    use rstest::rstest;

    use crate::config::Configuration;
    use crate::errors::ConfigurationError;
    use crate::metadata::TypeHint;

    use super::{TypeKind, TypeRegistry};

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new(Configuration::default());
        registry
            .register_entity("blog::model::Post")
            .register_entity("blog::model::User")
            .register_scalar("DateTime")
            .alias("datetime", "DateTime")
            .register_enum("PostStatus");
        registry
    }

    #[test]
    fn entity_types() {
        let registry = registry();

        assert_eq!(
            registry.kind(&TypeRef::named("Post")),
            Some(TypeKind::Object)
        );
        assert_eq!(
            registry.kind(&TypeRef::named_nn("PostID")),
            Some(TypeKind::Scalar)
        );
        assert_eq!(
            registry.kind(&TypeRef::named_nn_list_nn("PostInput")),
            Some(TypeKind::InputObject)
        );
        assert_eq!(
            registry.condition_type_name("blog::model::Post"),
            "PostFilterGroupCondition"
        );
        assert!(registry.is_entity("blog::model::User"));
        assert!(!registry.is_entity("User"));
        assert_eq!(registry.entity_of_id_type("UserID"), Some("blog::model::User"));
        assert_eq!(registry.entity_of_id_type("User"), None);
        assert_eq!(registry.custom_scalars(), vec!["DateTime"]);
    }

    #[rstest]
    #[case("int", false, TypeRef::named_nn(TypeRef::INT))]
    #[case("?string", false, TypeRef::named(TypeRef::STRING))]
    #[case("null|datetime", false, TypeRef::named("DateTime"))]
    #[case("PostStatus", false, TypeRef::named_nn("PostStatus"))]
    #[case("User", false, TypeRef::named_nn("User"))]
    #[case("User", true, TypeRef::named_nn("UserID"))]
    #[case("blog::model::User[]", false, TypeRef::named_nn_list_nn("User"))]
    #[case("?Post[]", true, TypeRef::named_nn_list("PostID"))]
    #[case("self", false, TypeRef::named_nn("Post"))]
    fn resolve_declarations(
        #[case] declaration: &str,
        #[case] is_entity_id: bool,
        #[case] expected: TypeRef,
    ) {
        let registry = registry();

        assert_eq!(
            registry
                .resolve_declaration("blog::model::Post", Some(declaration), is_entity_id)
                .unwrap(),
            Some(expected)
        );
    }

    #[test]
    fn blank_and_unknown_declarations() {
        let registry = registry();

        assert_eq!(
            registry
                .resolve_declaration("blog::model::Post", None, false)
                .unwrap(),
            None
        );
        assert_eq!(
            registry.resolve_declaration("blog::model::Post", Some("array"), false),
            Err(ConfigurationError::UnknownType("array".into()))
        );
        assert!(registry
            .resolve_declaration("shop::Order", Some("Customer"), false)
            .is_err());
    }

    #[test]
    fn resolve_type_hints() {
        let registry = registry();

        assert_eq!(
            registry
                .resolve_hint("blog::model::Post", &TypeHint::new("?self"), false)
                .unwrap(),
            TypeRef::named("Post")
        );
        assert_eq!(
            registry
                .resolve_hint("blog::model::Post", &TypeHint::new("bool"), false)
                .unwrap(),
            TypeRef::named_nn(TypeRef::BOOLEAN)
        );
        assert_eq!(
            registry
                .resolve_hint(
                    "blog::model::Post",
                    &TypeHint::new("blog::model::User"),
                    true
                )
                .unwrap(),
            TypeRef::named_nn("UserID")
        );
    }
}
