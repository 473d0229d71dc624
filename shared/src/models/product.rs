//! Product Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel image reference assigned when a product is created without one
pub const PLACEHOLDER_IMAGE: &str = "product-placeholder";

/// Product category enum (fixed set of 5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Ceiling,
    Wall,
    Decorative,
    #[serde(rename = "LED Bulbs")]
    LedBulbs,
    Fixtures,
}

impl Category {
    /// All categories, in display order
    pub const ALL: [Category; 5] = [
        Category::Ceiling,
        Category::Wall,
        Category::Decorative,
        Category::LedBulbs,
        Category::Fixtures,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Ceiling => write!(f, "Ceiling"),
            Category::Wall => write!(f, "Wall"),
            Category::Decorative => write!(f, "Decorative"),
            Category::LedBulbs => write!(f, "LED Bulbs"),
            Category::Fixtures => write!(f, "Fixtures"),
        }
    }
}

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub price: f64,
    /// Units on hand, never negative
    pub stock: u32,
    /// Image reference: URL, data URI, or [`PLACEHOLDER_IMAGE`]
    pub image: String,
    pub description: String,
    pub low_stock_threshold: u32,
}

impl Product {
    /// A product is low stock when on-hand units are at or below its threshold
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock == 0
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub category: Category,
    pub price: f64,
    pub stock: u32,
    pub image: Option<String>,
    pub description: String,
    pub low_stock_threshold: u32,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub price: Option<f64>,
    pub stock: Option<u32>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub low_stock_threshold: Option<u32>,
}
