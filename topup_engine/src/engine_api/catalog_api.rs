use std::sync::Arc;

use crate::{catalog::Catalog, db_types::Product};

/// Read-only access to the product catalog and promotion table.
#[derive(Debug, Clone)]
pub struct CatalogApi {
    catalog: Arc<Catalog>,
}

impl CatalogApi {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn product_by_slug(&self, slug: &str) -> Option<&Product> {
        self.catalog.product_by_slug(slug)
    }
}
