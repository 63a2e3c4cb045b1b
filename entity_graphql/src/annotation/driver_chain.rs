// SPDX-License-Identifier: AGPL-3.0-or-later

//! Annotation lookups for ORMs configured with a chain of mapping drivers.
//!
//! Each namespace of entities can be mapped by its own driver, only some of which read their
//! mapping from annotations. The adapter here routes every lookup to the annotation reader
//! responsible for the class in question.
use std::fmt;
use std::sync::Arc;

use crate::annotation::{Annotation, AnnotationReader};
use crate::errors::{ConfigurationError, ConfigurationResult};

/// A driver the ORM reads mapping metadata with.
#[derive(Clone)]
pub enum MappingDriver {
    /// Mapping declared through annotations, readable with the given reader.
    Annotation(Arc<dyn AnnotationReader>),

    /// Mapping declared some other way, for example in separate XML or YAML files.
    Other(String),
}

impl fmt::Debug for MappingDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingDriver::Annotation(_) => write!(f, "MappingDriver::Annotation"),
            MappingDriver::Other(kind) => write!(f, "MappingDriver::Other({kind})"),
        }
    }
}

/// Drivers indexed by the namespace of the entities they map, plus an optional fallback.
#[derive(Debug, Clone, Default)]
pub struct MappingDriverChain {
    drivers: Vec<(String, MappingDriver)>,
    default_driver: Option<MappingDriver>,
}

impl MappingDriverChain {
    /// Returns a chain without any driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a driver for all classes in the given namespace.
    pub fn add_driver(mut self, namespace: &str, driver: MappingDriver) -> Self {
        self.drivers.push((namespace.to_string(), driver));
        self
    }

    /// Sets the driver used when no namespace matches.
    pub fn default_driver(mut self, driver: MappingDriver) -> Self {
        self.default_driver = Some(driver);
        self
    }
}

/// Annotation reader routing every lookup to the reader of the driver responsible for a class.
///
/// The first annotation driver whose namespace prefixes the class name (case-insensitive) wins,
/// then the default driver if it reads annotations.
#[derive(Debug, Clone)]
pub struct DriverChainReader {
    chain: MappingDriverChain,
}

impl DriverChainReader {
    /// Returns a reader routing lookups through the given chain.
    pub fn new(chain: MappingDriverChain) -> Self {
        Self { chain }
    }

    fn find_reader(&self, class_name: &str) -> ConfigurationResult<&dyn AnnotationReader> {
        let lowercase_class_name = class_name.to_lowercase();

        for (namespace, driver) in &self.chain.drivers {
            if !lowercase_class_name.starts_with(&namespace.to_lowercase()) {
                continue;
            }

            if let MappingDriver::Annotation(reader) = driver {
                return Ok(reader.as_ref());
            }
        }

        match &self.chain.default_driver {
            Some(MappingDriver::Annotation(reader)) => Ok(reader.as_ref()),
            _ => Err(ConfigurationError::MissingAnnotationDriver(
                class_name.to_string(),
            )),
        }
    }
}

impl AnnotationReader for DriverChainReader {
    fn class_annotations(&self, class_name: &str) -> ConfigurationResult<Vec<Annotation>> {
        self.find_reader(class_name)?.class_annotations(class_name)
    }

    fn method_annotations(
        &self,
        class_name: &str,
        method_name: &str,
    ) -> ConfigurationResult<Vec<Annotation>> {
        self.find_reader(class_name)?
            .method_annotations(class_name, method_name)
    }

    fn property_annotations(
        &self,
        class_name: &str,
        property_name: &str,
    ) -> ConfigurationResult<Vec<Annotation>> {
        self.find_reader(class_name)?
            .property_annotations(class_name, property_name)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::annotation::{AnnotationReader, Exclude, StaticAnnotationReader};
    use crate::errors::ConfigurationError;

    use super::{DriverChainReader, MappingDriver, MappingDriverChain};

    fn excluding(class_name: &str, method_name: &str) -> MappingDriver {
        MappingDriver::Annotation(Arc::new(
            StaticAnnotationReader::new().method(class_name, method_name, Exclude),
        ))
    }

    #[test]
    fn routes_by_namespace() {
        let reader = DriverChainReader::new(
            MappingDriverChain::new()
                .add_driver("shop::", MappingDriver::Other("xml".into()))
                .add_driver("Blog::Model", excluding("blog::model::Post", "getTitle"))
                .add_driver("shop::", excluding("shop::Order", "getTotal")),
        );

        // Namespace prefixes are compared case-insensitive
        assert!(reader
            .is_method_excluded("blog::model::Post", "getTitle")
            .unwrap());

        // Non-annotation drivers are skipped
        assert!(reader.is_method_excluded("shop::Order", "getTotal").unwrap());

        assert_eq!(
            reader.method_annotations("forum::Thread", "getTitle"),
            Err(ConfigurationError::MissingAnnotationDriver(
                "forum::Thread".into()
            ))
        );
    }

    #[test]
    fn falls_back_to_default_driver() {
        let reader = DriverChainReader::new(
            MappingDriverChain::new()
                .add_driver("blog::", MappingDriver::Other("yaml".into()))
                .default_driver(excluding("forum::Thread", "getAuthor")),
        );

        assert!(reader
            .is_method_excluded("forum::Thread", "getAuthor")
            .unwrap());
        assert!(!reader.is_method_excluded("blog::Post", "getAuthor").unwrap());

        let reader = DriverChainReader::new(
            MappingDriverChain::new().default_driver(MappingDriver::Other("xml".into())),
        );
        assert!(reader.class_annotations("blog::Post").is_err());
    }
}
