// SPDX-License-Identifier: AGPL-3.0-or-later

//! Blog model shared by the tests: posts written by users and tagged with tags.
use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dynamic::TypeRef;
use async_graphql::{value, Value};
use once_cell::sync::Lazy;

use crate::annotation::{Exclude, Filter, Filters, Input, StaticAnnotationReader};
use crate::config::Configuration;
use crate::factory::{FactoryContext, FilterGroupConditionTypeFactory};
use crate::fields::ArgumentConfiguration;
use crate::metadata::{
    instance_descriptor, AssociationKind, AssociationMapping, ClassDescriptor, ClassMetadata,
    FieldMapping, MethodDescriptor, ParameterDescriptor, PropertyDescriptor,
    StaticMetadataProvider, Visibility,
};
use crate::resolver::{Resolvable, Resolved};
use crate::schema::EntityGraphQL;
use crate::types::{non_null, strip_non_null, Operator, OperatorRegistry, TypeRegistry};

pub const ABSTRACT_MODEL: &str = "blog::model::AbstractModel";
pub const POST: &str = "blog::model::Post";
pub const USER: &str = "blog::model::User";
pub const TAG: &str = "blog::model::Tag";

/// Operator matching integers by remainder.
pub struct ModuloOperatorType;

impl Operator for ModuloOperatorType {
    fn identifier(&self) -> &str {
        "blog::filter::ModuloOperatorType"
    }

    fn fields(&self, leaf: &TypeRef) -> Vec<ArgumentConfiguration> {
        vec![
            ArgumentConfiguration::new("value", non_null(strip_non_null(leaf.clone()))),
            ArgumentConfiguration::new("not", TypeRef::named(TypeRef::BOOLEAN))
                .default_value(false),
        ]
    }
}

/// Operator searching a term in several columns.
pub struct SearchOperatorType;

impl Operator for SearchOperatorType {
    fn identifier(&self) -> &str {
        "blog::filter::SearchOperatorType"
    }

    fn description(&self) -> Option<String> {
        Some("Search for a term in the name and the email".into())
    }

    fn fields(&self, leaf: &TypeRef) -> Vec<ArgumentConfiguration> {
        vec![ArgumentConfiguration::new(
            "term",
            non_null(strip_non_null(leaf.clone())),
        )]
    }
}

fn abstract_model() -> ClassDescriptor {
    ClassDescriptor::new(ABSTRACT_MODEL)
        .method(MethodDescriptor::new("getId").returns("int"))
        .method(MethodDescriptor::new("getCreationDate").returns("DateTime"))
        .method(
            MethodDescriptor::new("setCreationDate")
                .param(ParameterDescriptor::new("creationDate").hint("DateTime")),
        )
        .property(PropertyDescriptor::new("id").visibility(Visibility::Private))
        .property(PropertyDescriptor::new("creationDate").visibility(Visibility::Private))
}

fn post() -> (ClassMetadata, ClassDescriptor) {
    let metadata = ClassMetadata::new(POST)
        .field(FieldMapping::new("id", "integer").identity())
        .field(FieldMapping::new("title", "string"))
        .field(FieldMapping::new("content", "text"))
        .field(FieldMapping::new("published", "boolean"))
        .field(FieldMapping::new("creationDate", "datetime"))
        .association(AssociationMapping::new(
            "user",
            USER,
            AssociationKind::ManyToOne,
        ))
        .association(AssociationMapping::new(
            "tags",
            TAG,
            AssociationKind::ManyToMany,
        ));

    let class = ClassDescriptor::new(POST)
        .extends(ABSTRACT_MODEL)
        .method(
            MethodDescriptor::new("getTitle")
                .returns("string")
                .doc("/** Get the title of the post */"),
        )
        .method(
            MethodDescriptor::new("setTitle")
                .param(ParameterDescriptor::new("title").hint("string"))
                .doc("/** Set the title of the post */"),
        )
        .method(MethodDescriptor::new("getContent").returns("string"))
        .method(
            MethodDescriptor::new("setContent")
                .param(ParameterDescriptor::new("content").hint("string")),
        )
        .method(MethodDescriptor::new("isPublished").returns("bool"))
        .method(
            MethodDescriptor::new("setPublished").param(
                ParameterDescriptor::new("published")
                    .hint("bool")
                    .default_value(false),
            ),
        )
        .method(MethodDescriptor::new("getUser").returns("User"))
        .method(MethodDescriptor::new("setUser").param(ParameterDescriptor::new("user").hint("User")))
        .method(MethodDescriptor::new("getTags").returns("Collection"))
        .method(
            MethodDescriptor::new("setTags")
                .param(ParameterDescriptor::new("tags").hint("array"))
                .doc("/**\n * @param Tag[] $tags\n */"),
        )
        .method(
            MethodDescriptor::new("getWords")
                .param(
                    ParameterDescriptor::new("search")
                        .hint("?string")
                        .default_value(Value::Null),
                )
                .param(ParameterDescriptor::new("limit").hint("int").default_value(10))
                .returns("array")
                .doc(
                    "/**\n\
                     * Words of the content\n\
                     *\n\
                     * @param ?string $search Only return words containing this text\n\
                     * @return string[]\n\
                     */",
                ),
        )
        .method(MethodDescriptor::new("getSecret").returns("string"))
        .method(MethodDescriptor::new("getRepository").as_static().returns("string"))
        .property(
            PropertyDescriptor::new("title")
                .visibility(Visibility::Private)
                .default_value(""),
        )
        .property(PropertyDescriptor::new("content").visibility(Visibility::Private))
        .property(
            PropertyDescriptor::new("published")
                .visibility(Visibility::Private)
                .default_value(false),
        )
        .property(PropertyDescriptor::new("user").visibility(Visibility::Private))
        .property(PropertyDescriptor::new("tags").visibility(Visibility::Private));

    (metadata, class)
}

fn user() -> (ClassMetadata, ClassDescriptor) {
    let metadata = ClassMetadata::new(USER)
        .field(FieldMapping::new("id", "integer").identity())
        .field(FieldMapping::new("name", "string"))
        .field(FieldMapping::new("email", "string"))
        .field(FieldMapping::new("password", "string"))
        .field(FieldMapping::new("creationDate", "datetime"))
        .association(AssociationMapping::new(
            "posts",
            POST,
            AssociationKind::OneToMany,
        ));

    let class = ClassDescriptor::new(USER)
        .extends(ABSTRACT_MODEL)
        .method(MethodDescriptor::new("getName").returns("string"))
        .method(MethodDescriptor::new("setName").param(ParameterDescriptor::new("name").hint("string")))
        .method(MethodDescriptor::new("getEmail").returns("?string"))
        .method(
            MethodDescriptor::new("setEmail").param(ParameterDescriptor::new("email").hint("?string")),
        )
        .method(MethodDescriptor::new("getPassword").returns("string"))
        .method(
            MethodDescriptor::new("setPassword")
                .param(ParameterDescriptor::new("password").hint("string")),
        )
        .method(MethodDescriptor::new("getPosts").returns("Collection"))
        .property(PropertyDescriptor::new("name").visibility(Visibility::Private))
        .property(PropertyDescriptor::new("email").visibility(Visibility::Private))
        .property(PropertyDescriptor::new("password").visibility(Visibility::Private))
        .property(PropertyDescriptor::new("posts").visibility(Visibility::Private));

    (metadata, class)
}

fn tag() -> (ClassMetadata, ClassDescriptor) {
    let metadata = ClassMetadata::new(TAG)
        .field(FieldMapping::new("id", "integer").identity())
        .field(FieldMapping::new("name", "string"))
        .field(FieldMapping::new("creationDate", "datetime"))
        .association(AssociationMapping::new(
            "posts",
            POST,
            AssociationKind::ManyToMany,
        ));

    let class = ClassDescriptor::new(TAG)
        .extends(ABSTRACT_MODEL)
        .method(MethodDescriptor::new("getName").returns("string"))
        .method(MethodDescriptor::new("setName").param(ParameterDescriptor::new("name").hint("string")))
        .method(MethodDescriptor::new("getPosts").returns("Collection"))
        .property(PropertyDescriptor::new("name").visibility(Visibility::Private))
        .property(PropertyDescriptor::new("posts").visibility(Visibility::Private));

    (metadata, class)
}

pub fn blog_provider() -> StaticMetadataProvider {
    let (post_metadata, post_class) = post();
    let (user_metadata, user_class) = user();
    let (tag_metadata, tag_class) = tag();

    StaticMetadataProvider::new()
        .with_class(abstract_model())
        .with_entity(post_metadata, post_class)
        .with_entity(user_metadata, user_class)
        .with_entity(tag_metadata, tag_class)
}

pub fn blog_reader() -> StaticAnnotationReader {
    StaticAnnotationReader::new()
        .method(POST, "setContent", Input::new().with_updatable(false))
        .method(POST, "getSecret", Exclude)
        .method(USER, "getPassword", Exclude)
        .method(USER, "setPassword", Exclude)
        .property(USER, "password", Exclude)
        .class(
            USER,
            Filters::new(vec![
                Filter::new("id", "blog::filter::ModuloOperatorType", "int"),
                Filter::new("custom", "blog::filter::SearchOperatorType", "string"),
            ]),
        )
}

pub fn blog_types() -> TypeRegistry {
    let mut types = TypeRegistry::new(Configuration::default());
    types
        .register_scalar("DateTime")
        .alias("datetime", "DateTime")
        .register_entity(POST)
        .register_entity(USER)
        .register_entity(TAG);
    types
}

pub fn blog_operators() -> OperatorRegistry {
    let mut operators = OperatorRegistry::new(Configuration::default());
    operators
        .register(ModuloOperatorType)
        .unwrap()
        .register(SearchOperatorType)
        .unwrap();
    operators
}

pub fn blog_context() -> FactoryContext {
    FactoryContext::new(
        Arc::new(blog_provider()),
        Arc::new(blog_reader()),
        Arc::new(blog_types()),
    )
}

pub fn blog_condition_factory() -> FilterGroupConditionTypeFactory {
    FilterGroupConditionTypeFactory::new(blog_context(), Arc::new(blog_operators()))
}

pub fn blog_graphql() -> EntityGraphQL {
    EntityGraphQL::new(
        Arc::new(blog_provider()),
        Arc::new(blog_reader()),
        blog_types(),
        blog_operators(),
    )
}

type Method = Box<dyn Fn(&[Value]) -> Resolved + Send + Sync>;

/// Instance of a blog entity answering its getters with fixed values.
pub struct BlogEntity {
    descriptor: ClassDescriptor,
    methods: HashMap<String, Method>,
}

impl BlogEntity {
    pub fn new(class_name: &str) -> Self {
        Self {
            descriptor: instance_descriptor(&blog_provider(), class_name)
                .expect("known blog class"),
            methods: HashMap::new(),
        }
    }

    /// Makes a getter return a fixed value.
    pub fn returns(self, method: &str, resolved: impl Into<Resolved>) -> Self {
        let resolved = resolved.into();
        self.computes(method, move |_| resolved.clone())
    }

    /// Makes a method compute its result from its arguments.
    pub fn computes(
        mut self,
        method: &str,
        body: impl Fn(&[Value]) -> Resolved + Send + Sync + 'static,
    ) -> Self {
        self.methods.insert(method.to_string(), Box::new(body));
        self
    }
}

impl Resolvable for BlogEntity {
    fn descriptor(&self) -> &ClassDescriptor {
        &self.descriptor
    }

    fn call(&self, method: &str, args: Vec<Value>) -> Resolved {
        match self.methods.get(method) {
            Some(body) => body(&args),
            None => Resolved::null(),
        }
    }

    fn property(&self, _name: &str) -> Option<Resolved> {
        None
    }
}

/// A post about rust, written by alice and tagged with "rust".
pub fn rust_post() -> Resolved {
    let user = BlogEntity::new(USER)
        .returns("getId", value!("7"))
        .returns("getName", value!("alice"))
        .returns("getEmail", Value::Null);
    let tag = BlogEntity::new(TAG)
        .returns("getId", value!("3"))
        .returns("getName", value!("rust"));

    let post = BlogEntity::new(POST)
        .returns("getId", value!("1"))
        .returns("getTitle", value!("Hello"))
        .returns("isPublished", value!(true))
        .returns("getUser", Resolved::object(user))
        .returns("getTags", Resolved::List(vec![Resolved::object(tag)]))
        .computes("getWords", |args| {
            let search = match args.first() {
                Some(Value::String(search)) => Some(search.clone()),
                _ => None,
            };
            let limit = match args.get(1) {
                Some(Value::Number(limit)) => limit.as_u64().unwrap_or_default() as usize,
                _ => usize::MAX,
            };

            let words = "rust is rusty but trusted"
                .split(' ')
                .filter(|word| match &search {
                    Some(search) => word.contains(search.as_str()),
                    None => true,
                })
                .take(limit)
                .map(|word| Resolved::from(Value::from(word)))
                .collect();

            Resolved::List(words)
        });

    Resolved::object(post)
}

static IGNORED_GETTER: Lazy<ClassDescriptor> = Lazy::new(|| {
    ClassDescriptor::new("blog::model::special::IgnoredGetter")
        .property(PropertyDescriptor::new("privateProperty").visibility(Visibility::Private))
        .property(PropertyDescriptor::new("protectedProperty").visibility(Visibility::Protected))
        .property(PropertyDescriptor::new("publicProperty"))
        .method(
            MethodDescriptor::new("getPrivate")
                .visibility(Visibility::Private)
                .returns("string"),
        )
        .method(
            MethodDescriptor::new("getProtected")
                .visibility(Visibility::Protected)
                .returns("string"),
        )
        .method(MethodDescriptor::new("getPublic").returns("string"))
        .method(
            MethodDescriptor::new("getPublicWithArgs")
                .param(ParameterDescriptor::new("arg1").hint("string"))
                .param(ParameterDescriptor::new("arg2").hint("int"))
                .param(
                    ParameterDescriptor::new("arg3")
                        .hint("array")
                        .default_value(value!(["foo"])),
                )
                .returns("array"),
        )
        .method(MethodDescriptor::new("isValid").returns("bool"))
        .method(MethodDescriptor::new("hasMoney").returns("bool"))
        .method(
            MethodDescriptor::new("getStaticGetter")
                .as_static()
                .returns("string"),
        )
});

/// Object whose private and protected members must never be resolved.
pub struct IgnoredGetter;

impl Resolvable for IgnoredGetter {
    fn descriptor(&self) -> &ClassDescriptor {
        &IGNORED_GETTER
    }

    fn call(&self, method: &str, args: Vec<Value>) -> Resolved {
        match method {
            "getPrivate" => value!("private").into(),
            "getProtected" => value!("protected").into(),
            "getPublic" => value!("getPublic").into(),
            "getPublicWithArgs" => Value::List(args).into(),
            "isValid" | "hasMoney" => value!(true).into(),
            "getStaticGetter" => value!("static").into(),
            _ => Resolved::null(),
        }
    }

    fn property(&self, name: &str) -> Option<Resolved> {
        match name {
            "privateProperty" => Some(value!("privateProperty").into()),
            "protectedProperty" => Some(value!("protectedProperty").into()),
            "publicProperty" => Some(value!("publicProperty").into()),
            _ => None,
        }
    }
}

static DEFAULT_VALUE: Lazy<ClassDescriptor> = Lazy::new(|| {
    ClassDescriptor::new("blog::model::special::DefaultValue")
        .method(
            MethodDescriptor::new("getNameWithDefaultValueOnArgument")
                .param(
                    ParameterDescriptor::new("name")
                        .hint("string")
                        .default_value("john"),
                )
                .returns("string"),
        )
        .method(
            MethodDescriptor::new("getNameWithoutDefaultValue")
                .param(ParameterDescriptor::new("name").hint("string"))
                .returns("string"),
        )
});

/// Object with getters taking arguments, with and without default value.
pub struct DefaultValue;

impl Resolvable for DefaultValue {
    fn descriptor(&self) -> &ClassDescriptor {
        &DEFAULT_VALUE
    }

    fn call(&self, _method: &str, args: Vec<Value>) -> Resolved {
        args.into_iter()
            .next()
            .map(Resolved::Value)
            .unwrap_or_else(Resolved::null)
    }

    fn property(&self, _name: &str) -> Option<Resolved> {
        None
    }
}
