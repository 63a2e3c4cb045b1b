// SPDX-License-Identifier: AGPL-3.0-or-later

//! Reflected view of an entity class.
//!
//! The ORM binding describes every class it maps (and their ancestors) with the methods,
//! parameters and properties they declare, including type hints, docblocks and default values.
//! This is the information the field factories and the default field resolver inspect.
use std::fmt::Display;

use async_graphql::Value;
use serde::Deserialize;

/// Visibility of a method or property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Accessible from everywhere.
    Public,

    /// Accessible from the class and its descendants only.
    Protected,

    /// Accessible from the declaring class only.
    Private,
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Public
    }
}

/// A declared parameter or return type, for example `?int` or `Post`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct TypeHint {
    /// Type name without nullability marker.
    pub name: String,

    /// `true` when `null` is accepted as well.
    pub nullable: bool,
}

impl TypeHint {
    /// Parses a type hint, a leading `?` marks it as nullable.
    pub fn new(hint: &str) -> Self {
        match hint.strip_prefix('?') {
            Some(name) => Self {
                name: name.to_string(),
                nullable: true,
            },
            None => Self {
                name: hint.to_string(),
                nullable: false,
            },
        }
    }
}

impl From<String> for TypeHint {
    fn from(hint: String) -> Self {
        Self::new(&hint)
    }
}

impl From<&str> for TypeHint {
    fn from(hint: &str) -> Self {
        Self::new(hint)
    }
}

impl Display for TypeHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.nullable {
            write!(f, "?")?;
        }
        write!(f, "{}", self.name)
    }
}

/// A parameter of a method.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParameterDescriptor {
    /// Name of the parameter as declared.
    pub name: String,

    /// Type hint, if any.
    #[serde(default, rename = "type")]
    pub type_hint: Option<TypeHint>,

    /// Declared default value. `Some(Value::Null)` is an explicit `null` default.
    #[serde(default)]
    pub default_value: Option<Value>,
}

impl ParameterDescriptor {
    /// Returns a parameter without type hint or default value.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_hint: None,
            default_value: None,
        }
    }

    /// Sets the type hint.
    pub fn hint(mut self, hint: &str) -> Self {
        self.type_hint = Some(TypeHint::new(hint));
        self
    }

    /// Sets the declared default value.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// A method declared on a class.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MethodDescriptor {
    /// Method name.
    pub name: String,

    /// Methods other than public can not be resolved.
    #[serde(default)]
    pub visibility: Visibility,

    /// Abstract methods are never called.
    #[serde(default)]
    pub is_abstract: bool,

    /// Static methods are not accessors.
    #[serde(default)]
    pub is_static: bool,

    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,

    /// Return type hint, if any.
    #[serde(default)]
    pub return_type: Option<TypeHint>,

    /// Raw doc comment, including the `/**` and `*/` delimiters if the binding keeps them.
    #[serde(default)]
    pub doc_comment: Option<String>,
}

impl MethodDescriptor {
    /// Returns a public instance method without parameters.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            visibility: Visibility::Public,
            is_abstract: false,
            is_static: false,
            parameters: Vec::new(),
            return_type: None,
            doc_comment: None,
        }
    }

    /// Sets the return type hint.
    pub fn returns(mut self, hint: &str) -> Self {
        self.return_type = Some(TypeHint::new(hint));
        self
    }

    /// Appends a parameter.
    pub fn param(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the doc comment.
    pub fn doc(mut self, doc_comment: &str) -> Self {
        self.doc_comment = Some(doc_comment.to_string());
        self
    }

    /// Sets the visibility.
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Marks the method as static.
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Marks the method as abstract.
    pub fn as_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Returns `true` if the method can be called on an instance from the outside.
    pub fn is_public_instance_method(&self) -> bool {
        self.visibility == Visibility::Public && !self.is_static && !self.is_abstract
    }
}

/// A property declared on a class.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PropertyDescriptor {
    /// Name of the property, without `$`.
    pub name: String,

    /// Only public properties are read by the default field resolver.
    #[serde(default)]
    pub visibility: Visibility,

    /// Default value the property is initialised with.
    #[serde(default)]
    pub default_value: Option<Value>,
}

impl PropertyDescriptor {
    /// Returns a public property without default value.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            visibility: Visibility::Public,
            default_value: None,
        }
    }

    /// Sets the visibility.
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Sets the default value of the property.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// Everything a class declares itself, without what it inherits.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassDescriptor {
    /// Fully qualified class name, for example `blog::model::Post`.
    pub name: String,

    /// Fully qualified name of the parent class.
    #[serde(default)]
    pub parent: Option<String>,

    /// Methods in declaration order.
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,

    /// Properties in declaration order.
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
}

impl ClassDescriptor {
    /// Returns a class without parent nor members.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            methods: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Sets the parent class.
    pub fn extends(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    /// Declares a method.
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// Declares a property.
    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Finds a method declared by this class.
    pub fn find_method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|method| method.name == name)
    }

    /// Finds a property declared by this class.
    pub fn find_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|property| property.name == name)
    }
}
