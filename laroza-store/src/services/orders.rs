//! Order service - checkout and order administration
//!
//! Placing an order performs three separate whole-collection saves (stock
//! decrement, order insert, promo usage) with no transaction spanning them.
//! A crash or concurrent overwrite between saves can leave stock decremented
//! without a matching order, or an order without its promo counted. That is
//! the defined behavior of the store, not a bug: callers get approximate
//! atomicity only because the saves happen back to back in one call.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Order, OrderItem, OrderStatus};
use shared::sync::{ChangeAction, Collection};
use shared::util;

use super::cart::{AppliedPromo, Cart};
use super::promotions::PromotionService;
use crate::sync::TabContext;

/// Order operations for one tab
#[derive(Debug)]
pub struct OrderService<'a> {
    tab: &'a TabContext,
}

impl<'a> OrderService<'a> {
    pub fn new(tab: &'a TabContext) -> Self {
        Self { tab }
    }

    // ========== Reads ==========

    pub fn list(&self) -> AppResult<Vec<Order>> {
        self.tab.orders()
    }

    pub fn get(&self, id: &str) -> AppResult<Order> {
        self.tab
            .orders()?
            .into_iter()
            .find(|o| o.id == id)
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
            })
    }

    pub fn by_status(&self, status: OrderStatus) -> AppResult<Vec<Order>> {
        Ok(self
            .tab
            .orders()?
            .into_iter()
            .filter(|o| o.status == status)
            .collect())
    }

    pub fn for_customer(&self, customer_name: &str) -> AppResult<Vec<Order>> {
        Ok(self
            .tab
            .orders()?
            .into_iter()
            .filter(|o| o.customer_name == customer_name)
            .collect())
    }

    // ========== Checkout ==========

    /// Place an order from the cart.
    ///
    /// Validates stock against a fresh read of the catalog, then:
    /// 1. saves decremented stocks, broadcasting `inventory` + `products`
    /// 2. prepends and saves the order, broadcasting `orders` create
    /// 3. counts the promo use, broadcasting `promotions` update
    pub fn place_order(
        &self,
        customer_name: &str,
        cart: &Cart,
        promo: Option<&AppliedPromo>,
    ) -> AppResult<Order> {
        if cart.is_empty() {
            return Err(AppError::new(ErrorCode::EmptyOrder));
        }

        // Validate against current stock, not the cart's snapshots;
        // another tab may have sold the same units since they were added
        let mut products = self.tab.products()?;
        for line in cart.items() {
            let available = products
                .iter()
                .find(|p| p.id == line.product.id)
                .map(|p| p.stock)
                .unwrap_or(0);
            if available < line.quantity {
                return Err(AppError::insufficient_stock(line.product.name.clone()));
            }
        }

        let order = Order {
            id: format!("o{}", util::now_millis()),
            customer_name: customer_name.to_string(),
            items: cart
                .items()
                .iter()
                .map(|line| OrderItem {
                    product_id: line.product.id.clone(),
                    product_name: line.product.name.clone(),
                    quantity: line.quantity,
                    price: line.product.price,
                })
                .collect(),
            total: cart.total(promo),
            status: OrderStatus::Pending,
            date: util::today_string(),
            promo_code: promo.map(|p| p.code.clone()),
            discount: promo.map(|p| p.discount),
        };

        // 1. Stock decrement
        for product in products.iter_mut() {
            if let Some(line) = cart.items().iter().find(|l| l.product.id == product.id) {
                product.stock -= line.quantity;
            }
        }
        self.tab.save_products(&products)?;
        self.tab
            .broadcast_change(Collection::Inventory, ChangeAction::Update);
        self.tab
            .broadcast_change(Collection::Products, ChangeAction::Update);

        // 2. Order insert (newest first)
        let mut orders = self.tab.orders()?;
        orders.insert(0, order.clone());
        self.tab.save_orders(&orders)?;
        self.tab
            .broadcast_change(Collection::Orders, ChangeAction::Create);

        // 3. Promo usage
        if let Some(promo) = promo {
            PromotionService::new(self.tab).record_use(&promo.code)?;
        }

        tracing::info!(order = %order.id, customer = %order.customer_name,
            total = order.total, "Order placed");
        Ok(order)
    }

    // ========== Administration ==========

    /// Move an order through its state machine
    pub fn update_status(&self, id: &str, next: OrderStatus) -> AppResult<Order> {
        let mut orders = self.tab.orders()?;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
            })?;

        if !order.status.can_transition_to(next) {
            return Err(AppError::with_message(
                ErrorCode::InvalidStatusTransition,
                format!("Cannot move order from {} to {}", order.status, next),
            )
            .with_detail("from", order.status.to_string())
            .with_detail("to", next.to_string()));
        }

        order.status = next;
        let updated = order.clone();

        self.tab.save_orders(&orders)?;
        self.tab
            .broadcast_change(Collection::Orders, ChangeAction::Update);

        tracing::info!(order = %id, status = %next, "Order status updated");
        Ok(updated)
    }
}
