//! Catalog trait and in-memory registry
//!
//! The engine only reads the catalog; registration happens at wiring
//! time. Subtype edges are kept as direct-child sets so callers can walk
//! hierarchies of any depth iteratively.

use std::collections::{BTreeSet, HashMap};

use super::errors::{SchemaError, SchemaResult};
use super::types::Table;

/// Read-only catalog surface consumed by the engine
pub trait TypeCatalog {
    /// Returns the table for a type name, if registered
    fn table(&self, type_name: &str) -> Option<&Table>;

    /// Returns the direct subtypes of a type, sorted by name.
    ///
    /// Unregistered types have no subtypes.
    fn subtypes(&self, type_name: &str) -> Vec<String>;
}

/// In-memory type catalog
#[derive(Debug, Default)]
pub struct InMemoryTypeCatalog {
    tables: HashMap<String, Table>,
    /// Direct subtype edges, supertype name -> child names
    subtype_edges: HashMap<String, BTreeSet<String>>,
}

impl InMemoryTypeCatalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a root type (no supertype).
    pub fn register(&mut self, table: Table) -> SchemaResult<()> {
        self.register_with_supertype(table, None)
    }

    /// Registers a type as a subtype of an existing type.
    pub fn register_subtype(
        &mut self,
        table: Table,
        supertype: impl Into<String>,
    ) -> SchemaResult<()> {
        self.register_with_supertype(table, Some(supertype.into()))
    }

    fn register_with_supertype(
        &mut self,
        table: Table,
        supertype: Option<String>,
    ) -> SchemaResult<()> {
        if self.tables.contains_key(&table.type_name) {
            return Err(SchemaError::already_registered(&table.type_name));
        }

        if let Some(supertype) = supertype {
            if !self.tables.contains_key(&supertype) {
                return Err(SchemaError::type_not_found(supertype));
            }
            self.subtype_edges
                .entry(supertype)
                .or_default()
                .insert(table.type_name.clone());
        }

        self.tables.insert(table.type_name.clone(), table);
        Ok(())
    }

    /// Returns the number of registered types
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if no types are registered
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TypeCatalog for InMemoryTypeCatalog {
    fn table(&self, type_name: &str) -> Option<&Table> {
        self.tables.get(type_name)
    }

    fn subtypes(&self, type_name: &str) -> Vec<String> {
        self.subtype_edges
            .get(type_name)
            .map(|children| children.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{ColumnDef, PropertyKind};

    fn table(name: &str) -> Table {
        Table::new(name, vec![ColumnDef::new("title", PropertyKind::String)])
    }

    #[test]
    fn test_register_and_lookup() {
        let mut catalog = InMemoryTypeCatalog::new();
        catalog.register(table("Document")).unwrap();

        assert!(catalog.table("Document").is_some());
        assert!(catalog.table("Ghost").is_none());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut catalog = InMemoryTypeCatalog::new();
        catalog.register(table("Document")).unwrap();

        let result = catalog.register(table("Document"));
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().code().code(),
            "QRY_TYPE_ALREADY_REGISTERED"
        );
    }

    #[test]
    fn test_subtype_requires_registered_supertype() {
        let mut catalog = InMemoryTypeCatalog::new();

        let result = catalog.register_subtype(table("Image"), "Document");
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code().code(), "QRY_TYPE_NOT_FOUND");
    }

    #[test]
    fn test_subtypes_sorted() {
        let mut catalog = InMemoryTypeCatalog::new();
        catalog.register(table("Document")).unwrap();
        catalog.register_subtype(table("Video"), "Document").unwrap();
        catalog.register_subtype(table("Image"), "Document").unwrap();

        assert_eq!(catalog.subtypes("Document"), vec!["Image", "Video"]);
        assert!(catalog.subtypes("Image").is_empty());
        assert!(catalog.subtypes("Unregistered").is_empty());
    }
}
