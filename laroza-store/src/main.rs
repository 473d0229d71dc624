//! Demo: one admin tab and one customer tab sharing a store,
//! converging through change broadcasts.

use laroza_store::services::{
    Cart, CatalogService, DashboardService, OrderService, PromotionService, ReviewService,
    SessionService,
};
use laroza_store::sync::AutoRefresh;
use laroza_store::{Collection, Config, StoreState, init_logger_with_file};
use shared::models::OrderStatus;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 加载配置并初始化日志
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::info!("Laroza store engine starting...");

    // 2. 初始化存储源状态
    let state = StoreState::initialize(&config)?;

    // 3. 两个 tab：后台管理 + 顾客商城
    let admin_tab = state.open_tab();
    let shop_tab = state.open_tab();

    // 管理端声明关心的集合；任何 tab 的变更都会触发刷新
    let admin_store = state.store().clone();
    let _binding = AutoRefresh::bind(
        &admin_tab,
        &[Collection::Inventory, Collection::Products, Collection::Orders],
        move || {
            let products: Vec<shared::models::Product> = admin_store
                .read_collection(Collection::Products)
                .unwrap_or_default();
            let low: Vec<&str> = products
                .iter()
                .filter(|p| p.is_low_stock())
                .map(|p| p.name.as_str())
                .collect();
            tracing::info!(low_stock = ?low, "Admin view refreshed");
        },
    );

    // 4. 顾客登录并下单
    let session = SessionService::new(&shop_tab);
    let user = session.login("customer", "customer123")?;
    tracing::info!(username = %user.username, "Shopping as {}", user.role);

    let catalog = CatalogService::new(&shop_tab);
    let mut cart = Cart::new();
    cart.add(catalog.get("p1")?);
    cart.set_quantity("p1", 2);
    cart.add(catalog.get("p9")?);

    let promo = match PromotionService::new(&shop_tab).validate_code("welcome10") {
        Ok(promo) => {
            tracing::info!(code = %promo.code, discount = promo.discount, "Promo applied");
            Some(promo)
        }
        Err(e) => {
            tracing::info!(reason = %e, "Promo not applied");
            None
        }
    };

    let order = OrderService::new(&shop_tab).place_order(&user.username, &cart, promo.as_ref())?;
    tracing::info!(order = %order.id, total = order.total, "Order placed from shop tab");

    // 给跨 tab pump 一点时间送达
    tokio::time::sleep(Duration::from_millis(100)).await;

    // 5. 管理端处理订单
    let orders = OrderService::new(&admin_tab);
    orders.update_status(&order.id, OrderStatus::Processing)?;
    orders.update_status(&order.id, OrderStatus::Completed)?;

    let overview = DashboardService::new(&admin_tab).overview()?;
    tracing::info!(
        products = overview.total_products,
        stock = overview.total_stock,
        pending = overview.pending_orders,
        revenue = overview.total_revenue,
        "Dashboard overview"
    );

    // 6. 顾客评价已完成的订单
    let review = ReviewService::new(&shop_tab).add_review(
        &order.id,
        "p1",
        5,
        "Bright, easy to install, looks great.",
    )?;
    tracing::info!(review = %review.id, "Review submitted");

    session.logout()?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    shop_tab.close();
    admin_tab.close();
    tracing::info!("Demo complete");
    Ok(())
}
