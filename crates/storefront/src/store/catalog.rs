//! Catalog store: products and categories loaded once at startup.
//!
//! # Data files
//!
//! The catalog is read from two JSON documents in the data directory:
//!
//! ```text
//! coffee.json      {"products":   [Product, ...]}
//! categories.json  {"categories": [Category, ...]}
//! ```
//!
//! Every document is validated as a whole. A single bad record fails the load,
//! so the server never serves a partially loaded catalog.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use roastery_core::{CategoryId, Pagination, ProductId};
use serde::Deserialize;
use thiserror::Error;

use crate::models::{Category, Product};

/// File name of the product document.
pub const PRODUCTS_FILE: &str = "coffee.json";

/// File name of the category document.
pub const CATEGORIES_FILE: &str = "categories.json";

/// Errors that abort catalog loading.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {document} document: {source}")]
    Parse {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    #[error("duplicate category id: {0}")]
    DuplicateCategory(CategoryId),

    #[error("product {product} references unknown category {category}")]
    UnknownCategory {
        product: ProductId,
        category: CategoryId,
    },
}

/// Errors returned by catalog queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Invalid category. Must be one of: {}", .valid.join(", "))]
    InvalidCategory { requested: String, valid: Vec<String> },
}

#[derive(Deserialize)]
struct ProductsDocument {
    products: Vec<Product>,
}

#[derive(Deserialize)]
struct CategoriesDocument {
    categories: Vec<Category>,
}

/// One page of a product listing.
#[derive(Debug)]
pub struct ProductPage<'a> {
    /// Products on the requested page.
    pub products: Vec<&'a Product>,
    /// Number of products matching the filter, across all pages.
    pub total: usize,
}

/// Immutable product and category catalog.
///
/// Products and categories keep their load order. The catalog is never
/// mutated after construction, so it can be shared across threads without
/// locking.
#[derive(Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<Category>,
    by_id: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Load the catalog from `coffee.json` and `categories.json` in `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogLoadError` if either file is unreadable or fails
    /// validation.
    pub fn load(data_dir: &Path) -> Result<Self, CatalogLoadError> {
        let products = read_file(&data_dir.join(PRODUCTS_FILE))?;
        let categories = read_file(&data_dir.join(CATEGORIES_FILE))?;
        let catalog = Self::from_json(&products, &categories)?;

        tracing::info!(
            products = catalog.products.len(),
            categories = catalog.categories.len(),
            data_dir = %data_dir.display(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse and validate the two catalog documents.
    ///
    /// # Errors
    ///
    /// Returns `CatalogLoadError::Parse` for malformed JSON or records, and a
    /// validation error for duplicate ids or dangling category references.
    pub fn from_json(products: &str, categories: &str) -> Result<Self, CatalogLoadError> {
        let products: ProductsDocument =
            serde_json::from_str(products).map_err(|source| CatalogLoadError::Parse {
                document: "products",
                source,
            })?;
        let categories: CategoriesDocument =
            serde_json::from_str(categories).map_err(|source| CatalogLoadError::Parse {
                document: "categories",
                source,
            })?;

        Self::new(products.products, categories.categories)
    }

    /// Build a catalog from already parsed records.
    ///
    /// # Errors
    ///
    /// Returns an error for duplicate product or category ids, or for a product
    /// whose category does not exist.
    pub fn new(
        products: Vec<Product>,
        categories: Vec<Category>,
    ) -> Result<Self, CatalogLoadError> {
        let mut category_ids = HashSet::with_capacity(categories.len());
        for category in &categories {
            if !category_ids.insert(&category.id) {
                return Err(CatalogLoadError::DuplicateCategory(category.id.clone()));
            }
        }

        let mut by_id = HashMap::with_capacity(products.len());
        for (index, product) in products.iter().enumerate() {
            if !category_ids.contains(&product.category) {
                return Err(CatalogLoadError::UnknownCategory {
                    product: product.id.clone(),
                    category: product.category.clone(),
                });
            }
            if by_id.insert(product.id.clone(), index).is_some() {
                return Err(CatalogLoadError::DuplicateProduct(product.id.clone()));
            }
        }

        Ok(Self {
            products,
            categories,
            by_id,
        })
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find_product(&self, id: &str) -> Option<&Product> {
        self.by_id
            .get(id)
            .and_then(|&index| self.products.get(index))
    }

    /// All categories, in load order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Whether a category with this id exists.
    #[must_use]
    pub fn has_category(&self, id: &str) -> bool {
        self.categories.iter().any(|c| c.id.as_str() == id)
    }

    /// Products in one category, in load order.
    pub fn products_in_category<'a, 'c>(
        &'a self,
        category: &'c str,
    ) -> impl Iterator<Item = &'a Product> + use<'a, 'c> {
        self.products
            .iter()
            .filter(move |p| p.category.as_str() == category)
    }

    /// List one page of products, optionally filtered by category.
    ///
    /// Pages past the end are empty, not an error.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidCategory` if `category` is not a known
    /// category id.
    pub fn list_products(
        &self,
        category: Option<&str>,
        pagination: Pagination,
    ) -> Result<ProductPage<'_>, CatalogError> {
        let filtered: Vec<&Product> = match category {
            Some(category) => {
                if !self.has_category(category) {
                    return Err(CatalogError::InvalidCategory {
                        requested: category.to_owned(),
                        valid: self
                            .categories
                            .iter()
                            .map(|c| c.id.to_string())
                            .collect(),
                    });
                }
                self.products_in_category(category).collect()
            }
            None => self.products.iter().collect(),
        };

        let total = filtered.len();
        let products = filtered
            .get(pagination.window(total))
            .map(<[&Product]>::to_vec)
            .unwrap_or_default();

        Ok(ProductPage { products, total })
    }
}

fn read_file(path: &Path) -> Result<String, CatalogLoadError> {
    std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
