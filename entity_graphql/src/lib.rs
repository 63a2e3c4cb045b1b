// SPDX-License-Identifier: AGPL-3.0-or-later

//! # entity_graphql
//!
//! Derives GraphQL schema fragments from the metadata an ORM holds about its entities.
//!
//! Setters become input fields, getters become output fields and mapped properties become
//! filterable conditions. Each of them can be refined with annotations declared on the entity
//! classes, read through an [`AnnotationReader`]. The resulting configurations are turned into
//! dynamic `async-graphql` types by [`EntityGraphQL`], output fields are resolved with the
//! default field resolver of the [`resolver`] module.
#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

pub mod annotation;
mod config;
mod docblock;
mod errors;
pub mod factory;
mod fields;
pub mod metadata;
pub mod resolver;
mod schema;
pub mod types;
mod utils;

#[cfg(test)]
mod test_helpers;

pub use crate::annotation::AnnotationReader;
pub use crate::config::Configuration;
pub use crate::docblock::DocBlock;
pub use crate::errors::{ConfigurationError, ConfigurationResult};
pub use crate::fields::{ArgumentConfiguration, InputFieldConfiguration, OutputFieldConfiguration};
pub use crate::metadata::MetadataProvider;
pub use crate::schema::{
    build_argument, build_entity_id_scalar, build_input_object, build_object, into_field_value,
    EntityGraphQL,
};
pub use crate::types::{OperatorRegistry, TypeRegistry};
