//! Initial catalog data
//!
//! Written once per store, only for collections whose key is absent.
//! Seeding is initialization, not a mutation, so no sync events are
//! broadcast for it.

use shared::models::{
    Category, Order, OrderItem, OrderStatus, Product, Promotion, Review,
};
use shared::sync::Collection;
use uuid::Uuid;

use super::{DurableStore, StoreResult};

/// Seed every absent collection with its initial data
pub fn seed_if_empty(store: &DurableStore, origin: Uuid) -> StoreResult<()> {
    if !store.contains_key("products")? {
        store.replace_collection(Collection::Products, &initial_products(), origin)?;
    }
    if !store.contains_key("orders")? {
        store.replace_collection(Collection::Orders, &initial_orders(), origin)?;
    }
    if !store.contains_key("promotions")? {
        store.replace_collection(Collection::Promotions, &initial_promotions(), origin)?;
    }
    if !store.contains_key("reviews")? {
        store.replace_collection(Collection::Reviews, &initial_reviews(), origin)?;
    }
    tracing::debug!("Store seed check complete");
    Ok(())
}

fn product(
    id: &str,
    name: &str,
    category: Category,
    price: f64,
    stock: u32,
    image: &str,
    description: &str,
    low_stock_threshold: u32,
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        category,
        price,
        stock,
        image: image.to_string(),
        description: description.to_string(),
        low_stock_threshold,
    }
}

/// The starting lighting catalog
pub fn initial_products() -> Vec<Product> {
    vec![
        product(
            "p1",
            "Modern LED Ceiling Light",
            Category::Ceiling,
            2499.0,
            45,
            "ceiling-modern",
            "Energy-efficient LED ceiling light with modern design",
            10,
        ),
        product(
            "p2",
            "Crystal Chandelier",
            Category::Ceiling,
            8999.0,
            8,
            "chandelier",
            "Elegant crystal chandelier for luxurious spaces",
            5,
        ),
        product(
            "p3",
            "Wall Sconce Light",
            Category::Wall,
            1299.0,
            32,
            "wall-sconce",
            "Contemporary wall sconce with adjustable brightness",
            15,
        ),
        product(
            "p4",
            "Outdoor Wall Lantern",
            Category::Wall,
            1899.0,
            18,
            "outdoor-lantern",
            "Weather-resistant outdoor wall lantern",
            10,
        ),
        product(
            "p5",
            "Pendant Decorative Light",
            Category::Decorative,
            3499.0,
            4,
            "pendant-decorative",
            "Artistic pendant light for statement decor",
            8,
        ),
        product(
            "p6",
            "Table Lamp Decorative",
            Category::Decorative,
            1599.0,
            25,
            "table-lamp",
            "Stylish table lamp with decorative base",
            12,
        ),
        product(
            "p7",
            "LED Bulb 9W Warm White",
            Category::LedBulbs,
            199.0,
            150,
            "led-bulb-warm",
            "9W LED bulb with warm white light",
            50,
        ),
        product(
            "p8",
            "LED Bulb 12W Cool White",
            Category::LedBulbs,
            249.0,
            120,
            "led-bulb-cool",
            "12W LED bulb with cool white light",
            50,
        ),
        product(
            "p9",
            "RGB Smart LED Bulb",
            Category::LedBulbs,
            799.0,
            6,
            "smart-bulb",
            "WiFi-enabled RGB smart LED bulb",
            20,
        ),
        product(
            "p10",
            "Track Light Fixture",
            Category::Fixtures,
            3299.0,
            15,
            "track-light",
            "Adjustable track light fixture system",
            8,
        ),
        product(
            "p11",
            "Recessed Light Fixture",
            Category::Fixtures,
            899.0,
            42,
            "recessed-fixture",
            "Flush mount recessed light fixture",
            20,
        ),
        product(
            "p12",
            "Industrial Fixture Set",
            Category::Fixtures,
            4599.0,
            3,
            "industrial-fixture",
            "Complete industrial-style fixture set",
            5,
        ),
    ]
}

fn item(product_id: &str, product_name: &str, quantity: u32, price: f64) -> OrderItem {
    OrderItem {
        product_id: product_id.to_string(),
        product_name: product_name.to_string(),
        quantity,
        price,
    }
}

pub fn initial_orders() -> Vec<Order> {
    vec![
        Order {
            id: "o1".to_string(),
            customer_name: "Juan Santos".to_string(),
            items: vec![
                item("p1", "Modern LED Ceiling Light", 2, 2499.0),
                item("p7", "LED Bulb 9W Warm White", 10, 199.0),
            ],
            total: 6988.0,
            status: OrderStatus::Pending,
            date: "2026-01-22".to_string(),
            promo_code: None,
            discount: None,
        },
        Order {
            id: "o2".to_string(),
            customer_name: "Maria Cruz".to_string(),
            items: vec![item("p2", "Crystal Chandelier", 1, 8999.0)],
            total: 8999.0,
            status: OrderStatus::Processing,
            date: "2026-01-21".to_string(),
            promo_code: None,
            discount: None,
        },
        Order {
            id: "o3".to_string(),
            customer_name: "Roberto Diaz".to_string(),
            items: vec![
                item("p3", "Wall Sconce Light", 4, 1299.0),
                item("p6", "Table Lamp Decorative", 2, 1599.0),
            ],
            total: 8394.0,
            status: OrderStatus::Completed,
            date: "2026-01-20".to_string(),
            promo_code: None,
            discount: None,
        },
        Order {
            id: "o4".to_string(),
            customer_name: "Ana Garcia".to_string(),
            items: vec![
                item("p10", "Track Light Fixture", 1, 3299.0),
                item("p8", "LED Bulb 12W Cool White", 8, 249.0),
            ],
            total: 5291.0,
            status: OrderStatus::Completed,
            date: "2026-01-19".to_string(),
            promo_code: None,
            discount: None,
        },
    ]
}

pub fn initial_promotions() -> Vec<Promotion> {
    vec![
        Promotion {
            id: "pr1".to_string(),
            code: "NEWYEAR2026".to_string(),
            discount: 15.0,
            valid_from: "2026-01-01".to_string(),
            valid_to: "2026-01-31".to_string(),
            active: true,
            max_uses: Some(50),
            current_uses: Some(3),
        },
        Promotion {
            id: "pr2".to_string(),
            code: "WELCOME10".to_string(),
            discount: 10.0,
            valid_from: "2026-01-01".to_string(),
            valid_to: "2026-12-31".to_string(),
            active: true,
            max_uses: Some(100),
            current_uses: Some(12),
        },
    ]
}

pub fn initial_reviews() -> Vec<Review> {
    vec![
        Review {
            id: "r1".to_string(),
            product_id: "p3".to_string(),
            order_id: "o3".to_string(),
            customer_name: "Roberto Diaz".to_string(),
            rating: 5,
            comment: "Excellent products and fast delivery! Very satisfied with my purchase."
                .to_string(),
            date: "2026-01-21".to_string(),
        },
        Review {
            id: "r2".to_string(),
            product_id: "p10".to_string(),
            order_id: "o4".to_string(),
            customer_name: "Ana Garcia".to_string(),
            rating: 4,
            comment: "Good quality lights. The track fixture works perfectly in my studio."
                .to_string(),
            date: "2026-01-20".to_string(),
        },
    ]
}
