// SPDX-License-Identifier: AGPL-3.0-or-later

//! Declarative overrides attached to entity classes, methods and properties.
mod base;
mod driver_chain;
mod field;
mod filter;
mod input;
mod reader;

pub use base::AnnotationOverride;
pub use driver_chain::{DriverChainReader, MappingDriver, MappingDriverChain};
pub use field::{Argument, Field};
pub use filter::{Exclude, Filter, FilterGroupCondition, Filters};
pub use input::Input;
pub use reader::{AnnotationReader, StaticAnnotationReader};

/// Any annotation the factories understand.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// Overrides of an output field, on getters.
    Field(Field),

    /// Overrides of an input field, on setters.
    Input(Input),

    /// Exclusion of a method or property.
    Exclude(Exclude),

    /// Custom operators, on classes.
    Filters(Filters),

    /// Condition leaf type, on properties.
    FilterGroupCondition(FilterGroupCondition),
}

impl Annotation {
    /// Returns `true` for the `Exclude` annotation.
    pub fn is_exclude(&self) -> bool {
        matches!(self, Annotation::Exclude(_))
    }
}

impl From<Field> for Annotation {
    fn from(field: Field) -> Self {
        Self::Field(field)
    }
}

impl From<Input> for Annotation {
    fn from(input: Input) -> Self {
        Self::Input(input)
    }
}

impl From<Exclude> for Annotation {
    fn from(exclude: Exclude) -> Self {
        Self::Exclude(exclude)
    }
}

impl From<Filters> for Annotation {
    fn from(filters: Filters) -> Self {
        Self::Filters(filters)
    }
}

impl From<FilterGroupCondition> for Annotation {
    fn from(condition: FilterGroupCondition) -> Self {
        Self::FilterGroupCondition(condition)
    }
}
