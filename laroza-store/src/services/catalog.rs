//! Catalog service - product management and stock adjustments
//!
//! Every mutation is a whole-collection read-modify-save followed by a
//! broadcast, the same pattern every service here follows. Stock changes
//! co-broadcast `inventory` and `products`: the two tags are redundant by
//! convention and subscribers interested in stock should register for both.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{PLACEHOLDER_IMAGE, Category, Product, ProductCreate, ProductUpdate};
use shared::sync::{ChangeAction, Collection};
use shared::util;

use crate::sync::TabContext;

/// Product catalog operations for one tab
#[derive(Debug)]
pub struct CatalogService<'a> {
    tab: &'a TabContext,
}

impl<'a> CatalogService<'a> {
    pub fn new(tab: &'a TabContext) -> Self {
        Self { tab }
    }

    // ========== Reads ==========

    pub fn list(&self) -> AppResult<Vec<Product>> {
        self.tab.products()
    }

    pub fn get(&self, id: &str) -> AppResult<Product> {
        self.tab
            .products()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
            })
    }

    pub fn by_category(&self, category: Category) -> AppResult<Vec<Product>> {
        Ok(self
            .tab
            .products()?
            .into_iter()
            .filter(|p| p.category == category)
            .collect())
    }

    /// Case-insensitive search over name and description
    pub fn search(&self, query: &str) -> AppResult<Vec<Product>> {
        let needle = query.to_lowercase();
        Ok(self
            .tab
            .products()?
            .into_iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
            })
            .collect())
    }

    pub fn low_stock(&self) -> AppResult<Vec<Product>> {
        Ok(self
            .tab
            .products()?
            .into_iter()
            .filter(Product::is_low_stock)
            .collect())
    }

    /// Total units on hand across the catalog
    pub fn total_stock(&self) -> AppResult<u32> {
        Ok(self.tab.products()?.iter().map(|p| p.stock).sum())
    }

    // ========== Mutations ==========

    pub fn create(&self, draft: ProductCreate) -> AppResult<Product> {
        if draft.name.trim().is_empty() {
            return Err(AppError::validation("Product name is required"));
        }
        if draft.price < 0.0 {
            return Err(AppError::validation("Price must not be negative")
                .with_detail("price", draft.price));
        }

        let product = Product {
            id: format!("p{}", util::snowflake_id()),
            name: draft.name,
            category: draft.category,
            price: draft.price,
            stock: draft.stock,
            image: draft
                .image
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            description: draft.description,
            low_stock_threshold: draft.low_stock_threshold,
        };

        let mut products = self.tab.products()?;
        products.push(product.clone());
        self.tab.save_products(&products)?;
        self.tab
            .broadcast_change(Collection::Products, ChangeAction::Create);

        tracing::info!(product = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    pub fn update(&self, id: &str, update: ProductUpdate) -> AppResult<Product> {
        if let Some(price) = update.price
            && price < 0.0
        {
            return Err(AppError::validation("Price must not be negative").with_detail("price", price));
        }

        let mut products = self.tab.products()?;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
            })?;

        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("Product name is required"));
            }
            product.name = name;
        }
        if let Some(category) = update.category {
            product.category = category;
        }
        if let Some(price) = update.price {
            product.price = price;
        }
        if let Some(stock) = update.stock {
            product.stock = stock;
        }
        if let Some(image) = update.image {
            product.image = image;
        }
        if let Some(description) = update.description {
            product.description = description;
        }
        if let Some(threshold) = update.low_stock_threshold {
            product.low_stock_threshold = threshold;
        }
        let updated = product.clone();

        self.tab.save_products(&products)?;
        self.tab
            .broadcast_change(Collection::Products, ChangeAction::Update);
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> AppResult<()> {
        let mut products = self.tab.products()?;
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(AppError::with_message(
                ErrorCode::ProductNotFound,
                format!("Product {id} not found"),
            ));
        }

        self.tab.save_products(&products)?;
        self.tab
            .broadcast_change(Collection::Products, ChangeAction::Delete);

        tracing::info!(product = %id, "Product deleted");
        Ok(())
    }

    /// Adjust on-hand stock by `delta`, clamping at zero.
    ///
    /// Co-broadcasts `inventory` then `products`: two events for one save.
    pub fn adjust_stock(&self, id: &str, delta: i64) -> AppResult<Product> {
        let mut products = self.tab.products()?;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::ProductNotFound, format!("Product {id} not found"))
            })?;

        product.stock = (product.stock as i64 + delta).max(0) as u32;
        let updated = product.clone();

        self.tab.save_products(&products)?;
        self.tab
            .broadcast_change(Collection::Inventory, ChangeAction::Update);
        self.tab
            .broadcast_change(Collection::Products, ChangeAction::Update);

        tracing::debug!(product = %id, delta, stock = updated.stock, "Stock adjusted");
        Ok(updated)
    }
}
