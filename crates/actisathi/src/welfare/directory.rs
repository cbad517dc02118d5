use std::sync::Arc;

use super::catalog::{CatalogError, SchemeCatalog};

/// Read seam returning the catalog snapshot that requests evaluate against.
pub trait SchemeDirectory: Send + Sync {
    fn snapshot(&self) -> Result<Arc<SchemeCatalog>, CatalogError>;
}

/// Directory over a catalog loaded once at startup.
#[derive(Debug, Clone)]
pub struct StaticSchemeDirectory {
    catalog: Arc<SchemeCatalog>,
}

impl StaticSchemeDirectory {
    pub fn new(catalog: SchemeCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    pub fn standard() -> Self {
        Self::new(SchemeCatalog::standard())
    }
}

impl SchemeDirectory for StaticSchemeDirectory {
    fn snapshot(&self) -> Result<Arc<SchemeCatalog>, CatalogError> {
        Ok(Arc::clone(&self.catalog))
    }
}
