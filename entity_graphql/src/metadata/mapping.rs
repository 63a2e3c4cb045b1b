// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::Deserialize;

/// Mapping of a scalar entity property onto a database column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldMapping {
    /// Name of the mapped property.
    pub field_name: String,

    /// ORM type name, for example `string`, `integer` or `datetime`.
    #[serde(rename = "type")]
    pub type_name: String,

    /// `true` if this property is the identity of the entity.
    #[serde(default)]
    pub id: bool,
}

impl FieldMapping {
    /// Returns a mapping of a property onto an ORM type.
    pub fn new(field_name: &str, type_name: &str) -> Self {
        Self {
            field_name: field_name.to_string(),
            type_name: type_name.to_string(),
            id: false,
        }
    }

    /// Marks the mapping as identity.
    pub fn identity(mut self) -> Self {
        self.id = true;
        self
    }
}

/// Cardinality of an association between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    /// Single entity on both sides.
    OneToOne,
    /// Single entity, shared by many owners.
    ManyToOne,
    /// Collection of entities, each owned once.
    OneToMany,
    /// Collection of entities, shared by many owners.
    ManyToMany,
}

impl AssociationKind {
    /// Returns `true` if the owning side holds many entities.
    pub fn is_collection_valued(&self) -> bool {
        matches!(self, AssociationKind::OneToMany | AssociationKind::ManyToMany)
    }
}

/// Mapping of an entity property onto another entity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssociationMapping {
    /// Name of the property holding the association.
    pub field_name: String,

    /// Fully qualified class name of the associated entity.
    pub target_entity: String,

    /// Cardinality of the association.
    pub kind: AssociationKind,
}

impl AssociationMapping {
    /// Returns a mapping of a property onto another entity.
    pub fn new(field_name: &str, target_entity: &str, kind: AssociationKind) -> Self {
        Self {
            field_name: field_name.to_string(),
            target_entity: target_entity.to_string(),
            kind,
        }
    }
}

/// ORM mapping metadata of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassMetadata {
    /// Fully qualified class name of the entity.
    pub name: String,

    /// Mapped scalar properties in declaration order.
    #[serde(default)]
    pub field_mappings: Vec<FieldMapping>,

    /// Mapped associations in declaration order.
    #[serde(default)]
    pub association_mappings: Vec<AssociationMapping>,
}

impl ClassMetadata {
    /// Returns metadata without any mapping.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            field_mappings: Vec::new(),
            association_mappings: Vec::new(),
        }
    }

    /// Adds a field mapping.
    pub fn field(mut self, mapping: FieldMapping) -> Self {
        self.field_mappings.push(mapping);
        self
    }

    /// Adds an association mapping.
    pub fn association(mut self, mapping: AssociationMapping) -> Self {
        self.association_mappings.push(mapping);
        self
    }

    /// Returns the name of the property mapped as identity, if any.
    pub fn identity_field(&self) -> Option<&str> {
        self.field_mappings
            .iter()
            .find(|mapping| mapping.id)
            .map(|mapping| mapping.field_name.as_str())
    }

    /// Returns the association mapped on the given property.
    pub fn association_mapping(&self, field_name: &str) -> Option<&AssociationMapping> {
        self.association_mappings
            .iter()
            .find(|mapping| mapping.field_name == field_name)
    }

    /// Returns the class name of the entity associated on the given property.
    pub fn target_entity(&self, field_name: &str) -> Option<&str> {
        self.association_mapping(field_name)
            .map(|mapping| mapping.target_entity.as_str())
    }

    /// Returns `true` if the property holds a collection of entities.
    pub fn is_collection_valued_association(&self, field_name: &str) -> bool {
        self.association_mapping(field_name)
            .map(|mapping| mapping.kind.is_collection_valued())
            .unwrap_or(false)
    }
}
