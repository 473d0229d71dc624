//! Shopping cart
//!
//! Pure in-memory checkout arithmetic: quantities clamp to the stock known
//! at add time, totals are computed from the cart's own product snapshots.
//! The cart persists nothing and broadcasts nothing; it only becomes
//! durable state when an order is placed from it.

use shared::models::Product;

/// One cart line, holding a snapshot of the product as it was when added
#[derive(Debug, Clone)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

/// A promo code that passed validation, ready to apply at checkout
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedPromo {
    pub code: String,
    /// Discount percentage (0-100)
    pub discount: f64,
}

/// In-memory shopping cart
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Add one unit of `product`, clamped to its available stock.
    /// Out-of-stock products are not added.
    pub fn add(&mut self, product: Product) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            if item.quantity < item.product.stock {
                item.quantity += 1;
            }
        } else if product.stock > 0 {
            self.items.push(CartItem {
                product,
                quantity: 1,
            });
        }
    }

    /// Set a line's quantity. Zero removes the line; anything else clamps
    /// to `[1, stock]`.
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            item.quantity = quantity.clamp(1, item.product.stock.max(1));
        }
    }

    pub fn remove(&mut self, product_id: &str) {
        self.items.retain(|item| item.product.id != product_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of unit price × quantity, before discount
    pub fn subtotal(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.product.price * item.quantity as f64)
            .sum()
    }

    /// Peso amount removed by the promo
    pub fn discount_amount(&self, promo: Option<&AppliedPromo>) -> f64 {
        match promo {
            Some(promo) => self.subtotal() * promo.discount / 100.0,
            None => 0.0,
        }
    }

    /// Amount due after the promo
    pub fn total(&self, promo: Option<&AppliedPromo>) -> f64 {
        self.subtotal() - self.discount_amount(promo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Category;

    fn product(id: &str, price: f64, stock: u32) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            category: Category::Fixtures,
            price,
            stock,
            image: "product-placeholder".to_string(),
            description: String::new(),
            low_stock_threshold: 5,
        }
    }

    #[test]
    fn add_clamps_to_stock() {
        let mut cart = Cart::new();
        let p = product("p1", 100.0, 2);
        cart.add(p.clone());
        cart.add(p.clone());
        cart.add(p);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn out_of_stock_is_not_added() {
        let mut cart = Cart::new();
        cart.add(product("p1", 100.0, 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn zero_quantity_removes_line() {
        let mut cart = Cart::new();
        cart.add(product("p1", 100.0, 10));
        cart.set_quantity("p1", 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn quantity_clamps_high_and_low() {
        let mut cart = Cart::new();
        cart.add(product("p1", 100.0, 3));
        cart.set_quantity("p1", 99);
        assert_eq!(cart.items()[0].quantity, 3);
        cart.set_quantity("p1", 1);
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn totals_with_promo() {
        let mut cart = Cart::new();
        cart.add(product("p1", 1000.0, 10));
        cart.set_quantity("p1", 2);

        assert_eq!(cart.subtotal(), 2000.0);

        let promo = AppliedPromo {
            code: "WELCOME10".to_string(),
            discount: 10.0,
        };
        assert_eq!(cart.discount_amount(Some(&promo)), 200.0);
        assert_eq!(cart.total(Some(&promo)), 1800.0);
        assert_eq!(cart.total(None), 2000.0);
    }
}
