//! Dashboard service - admin overview numbers
//!
//! Pure reads over the collections; nothing here mutates or broadcasts.

use shared::error::AppResult;
use shared::models::{Order, OrderStatus, Product};

use crate::sync::TabContext;

/// Number of orders shown in the recent list
const RECENT_ORDERS: usize = 5;

/// Snapshot of the numbers the admin landing screen shows
#[derive(Debug, Clone)]
pub struct DashboardOverview {
    pub total_products: usize,
    /// Units on hand across the catalog
    pub total_stock: u32,
    pub pending_orders: usize,
    /// Revenue counts completed orders only
    pub total_revenue: f64,
    pub low_stock_products: Vec<Product>,
    /// Newest orders first
    pub recent_orders: Vec<Order>,
}

/// Overview reads for one tab
#[derive(Debug)]
pub struct DashboardService<'a> {
    tab: &'a TabContext,
}

impl<'a> DashboardService<'a> {
    pub fn new(tab: &'a TabContext) -> Self {
        Self { tab }
    }

    pub fn overview(&self) -> AppResult<DashboardOverview> {
        let products = self.tab.products()?;
        let orders = self.tab.orders()?;

        let total_stock = products.iter().map(|p| p.stock).sum();
        let low_stock_products = products
            .iter()
            .filter(|p| p.is_low_stock())
            .cloned()
            .collect();
        let pending_orders = orders
            .iter()
            .filter(|o| o.status == OrderStatus::Pending)
            .count();
        let total_revenue = orders
            .iter()
            .filter(|o| o.status == OrderStatus::Completed)
            .map(|o| o.total)
            .sum();
        let recent_orders = orders.iter().take(RECENT_ORDERS).cloned().collect();

        Ok(DashboardOverview {
            total_products: products.len(),
            total_stock,
            pending_orders,
            total_revenue,
            low_stock_products,
            recent_orders,
        })
    }
}
