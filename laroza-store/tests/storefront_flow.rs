//! End-to-end storefront flows: checkout, promotions, reviews, sessions,
//! and the admin dashboard, all against a seeded store.

use laroza_store::services::{
    Cart, CatalogService, DashboardService, OrderService, PromotionService, ReviewService,
    SessionService,
};
use laroza_store::{ChangeAction, Collection, Config, ErrorCode, StoreState, SyncEvent};
use shared::models::{OrderStatus, PromotionCreate, SignUp};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn seeded_state() -> StoreState {
    StoreState::initialize(&Config::in_memory()).unwrap()
}

fn jan(day: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
}

async fn wait_until(cond: impl Fn() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}

// ==================== Checkout ====================

#[tokio::test]
async fn place_order_decrements_stock_and_counts_promo_use() {
    let state = seeded_state();
    let shop = state.open_tab();
    let admin = state.open_tab();

    // Another tab records every event the checkout produces
    let events = Arc::new(Mutex::new(Vec::<SyncEvent>::new()));
    let e = Arc::clone(&events);
    let _sub = admin.subscribe(move |event| {
        e.lock().unwrap().push(*event);
    });

    let catalog = CatalogService::new(&shop);
    let mut cart = Cart::new();
    cart.add(catalog.get("p1").unwrap());
    cart.set_quantity("p1", 2);
    cart.add(catalog.get("p7").unwrap());
    cart.set_quantity("p7", 10);

    let promo = PromotionService::new(&shop)
        .validate_code_on("newyear2026", jan(15))
        .unwrap();
    assert_eq!(promo.code, "NEWYEAR2026");
    assert_eq!(promo.discount, 15.0);

    let order = OrderService::new(&shop)
        .place_order("customer", &cart, Some(&promo))
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.promo_code.as_deref(), Some("NEWYEAR2026"));
    let expected_total = 6988.0 - 6988.0 * 15.0 / 100.0;
    assert!((order.total - expected_total).abs() < 1e-9);

    // Stock decremented on a fresh read
    assert_eq!(catalog.get("p1").unwrap().stock, 43);
    assert_eq!(catalog.get("p7").unwrap().stock, 140);

    // Order prepended
    let orders = OrderService::new(&shop).list().unwrap();
    assert_eq!(orders[0].id, order.id);
    assert_eq!(orders.len(), 5);

    // Promo use counted (seed had 3)
    let promos = PromotionService::new(&shop).list().unwrap();
    let newyear = promos.iter().find(|p| p.code == "NEWYEAR2026").unwrap();
    assert_eq!(newyear.current_uses, Some(4));

    // The full broadcast sequence reached the other tab
    assert!(wait_until(|| events.lock().unwrap().len() >= 4).await);
    let events = events.lock().unwrap().clone();
    let tags: Vec<(Collection, ChangeAction)> =
        events.iter().map(|e| (e.collection, e.action)).collect();
    assert!(tags.contains(&(Collection::Inventory, ChangeAction::Update)));
    assert!(tags.contains(&(Collection::Products, ChangeAction::Update)));
    assert!(tags.contains(&(Collection::Orders, ChangeAction::Create)));
    assert!(tags.contains(&(Collection::Promotions, ChangeAction::Update)));
}

#[tokio::test]
async fn stale_cart_is_rejected_when_stock_ran_out() {
    let state = seeded_state();
    let tab_a = state.open_tab();
    let tab_b = state.open_tab();

    // Industrial Fixture Set has 3 in stock. B fills a cart with all 3.
    let mut cart_b = Cart::new();
    cart_b.add(CatalogService::new(&tab_b).get("p12").unwrap());
    cart_b.set_quantity("p12", 3);

    // A buys 2 of them first
    let mut cart_a = Cart::new();
    cart_a.add(CatalogService::new(&tab_a).get("p12").unwrap());
    cart_a.set_quantity("p12", 2);
    OrderService::new(&tab_a)
        .place_order("Juan Santos", &cart_a, None)
        .unwrap();

    // B's checkout re-validates against current stock and refuses
    let err = OrderService::new(&tab_b)
        .place_order("Maria Cruz", &cart_b, None)
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientStock);
    assert!(err.message.contains("Industrial Fixture Set"));

    // Nothing was written by the failed checkout
    assert_eq!(CatalogService::new(&tab_b).get("p12").unwrap().stock, 1);
    assert_eq!(OrderService::new(&tab_b).list().unwrap().len(), 5);
}

#[tokio::test]
async fn empty_cart_cannot_check_out() {
    let state = seeded_state();
    let tab = state.open_tab();
    let err = OrderService::new(&tab)
        .place_order("customer", &Cart::new(), None)
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::EmptyOrder);
}

// ==================== Order state machine ====================

#[tokio::test]
async fn order_status_follows_the_state_machine() {
    let state = seeded_state();
    let tab = state.open_tab();
    let orders = OrderService::new(&tab);

    // pending cannot jump straight to completed
    let err = orders.update_status("o1", OrderStatus::Completed).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidStatusTransition);

    let o1 = orders.update_status("o1", OrderStatus::Processing).unwrap();
    assert_eq!(o1.status, OrderStatus::Processing);
    let o1 = orders.update_status("o1", OrderStatus::Completed).unwrap();
    assert_eq!(o1.status, OrderStatus::Completed);

    // terminal states reject everything
    let err = orders.update_status("o1", OrderStatus::Cancelled).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidStatusTransition);

    // cancel from processing is allowed
    let o2 = orders.update_status("o2", OrderStatus::Cancelled).unwrap();
    assert_eq!(o2.status, OrderStatus::Cancelled);

    let err = orders.update_status("missing", OrderStatus::Processing).unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);
}

// ==================== Promotions ====================

#[tokio::test]
async fn promo_codes_store_uppercase_and_reject_duplicates() {
    let state = seeded_state();
    let tab = state.open_tab();
    let promos = PromotionService::new(&tab);

    let created = promos
        .create(PromotionCreate {
            code: "summer25".to_string(),
            discount: 25.0,
            valid_from: "2026-06-01".to_string(),
            valid_to: "2026-08-31".to_string(),
            active: true,
            max_uses: None,
        })
        .unwrap();
    assert_eq!(created.code, "SUMMER25");
    assert_eq!(created.current_uses, Some(0));

    let err = promos
        .create(PromotionCreate {
            code: "Summer25".to_string(),
            discount: 10.0,
            valid_from: "2026-06-01".to_string(),
            valid_to: "2026-08-31".to_string(),
            active: true,
            max_uses: None,
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicatePromoCode);

    let err = promos
        .create(PromotionCreate {
            code: "TOOBIG".to_string(),
            discount: 150.0,
            valid_from: "2026-06-01".to_string(),
            valid_to: "2026-08-31".to_string(),
            active: true,
            max_uses: None,
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);
}

#[tokio::test]
async fn promo_validation_distinguishes_refusal_reasons() {
    let state = seeded_state();
    let tab = state.open_tab();
    let promos = PromotionService::new(&tab);

    // Unknown
    let err = promos.validate_code_on("NOPE", jan(15)).unwrap_err();
    assert_eq!(err.code, ErrorCode::PromoNotFound);

    // Out of window (NEWYEAR2026 runs through January only)
    let err = promos
        .validate_code_on("NEWYEAR2026", chrono::NaiveDate::from_ymd_opt(2026, 2, 1).unwrap())
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PromoExpired);

    // Deactivated
    let listed = promos.list().unwrap();
    let newyear_id = listed.iter().find(|p| p.code == "NEWYEAR2026").unwrap().id.clone();
    promos
        .update(
            &newyear_id,
            shared::models::PromotionUpdate {
                active: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    let err = promos.validate_code_on("NEWYEAR2026", jan(15)).unwrap_err();
    assert_eq!(err.code, ErrorCode::PromoInactive);

    // Exhausted
    let capped = promos
        .create(PromotionCreate {
            code: "ONCE".to_string(),
            discount: 5.0,
            valid_from: "2026-01-01".to_string(),
            valid_to: "2026-12-31".to_string(),
            active: true,
            max_uses: Some(1),
        })
        .unwrap();
    promos.record_use(&capped.code).unwrap();
    let err = promos.validate_code_on("once", jan(15)).unwrap_err();
    assert_eq!(err.code, ErrorCode::PromoExhausted);
}

// ==================== Reviews ====================

#[tokio::test]
async fn reviews_are_gated_on_completed_unreviewed_orders() {
    let state = seeded_state();
    let tab = state.open_tab();
    let reviews = ReviewService::new(&tab);

    // Fresh order, driven to completed
    let mut cart = Cart::new();
    cart.add(CatalogService::new(&tab).get("p3").unwrap());
    let order = OrderService::new(&tab)
        .place_order("customer", &cart, None)
        .unwrap();

    // Pending orders cannot be reviewed
    let err = reviews.add_review(&order.id, "p3", 4, "early").unwrap_err();
    assert_eq!(err.code, ErrorCode::ReviewNotAllowed);

    let orders = OrderService::new(&tab);
    orders.update_status(&order.id, OrderStatus::Processing).unwrap();
    orders.update_status(&order.id, OrderStatus::Completed).unwrap();

    // Rating bounds
    for bad in [0u8, 6] {
        let err = reviews.add_review(&order.id, "p3", bad, "x").unwrap_err();
        assert_eq!(err.code, ErrorCode::RatingOutOfRange);
    }

    let review = reviews
        .add_review(&order.id, "p3", 3, "Decent sconce")
        .unwrap();
    assert_eq!(review.customer_name, "customer");
    assert!(reviews.has_review(&order.id).unwrap());

    // One review per order
    let err = reviews.add_review(&order.id, "p3", 5, "again").unwrap_err();
    assert_eq!(err.code, ErrorCode::AlreadyReviewed);

    // Seeded r1 (5 stars) plus ours (3 stars) average to 4
    assert_eq!(reviews.average_rating("p3").unwrap(), Some(4.0));
    assert_eq!(reviews.average_rating("p11").unwrap(), None);
}

#[tokio::test]
async fn admin_can_moderate_reviews() {
    let state = seeded_state();
    let tab = state.open_tab();
    let reviews = ReviewService::new(&tab);

    reviews.delete_review("r1").unwrap();
    assert!(reviews.for_product("p3").unwrap().is_empty());

    let err = reviews.delete_review("r1").unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

// ==================== Sessions ====================

#[tokio::test]
async fn login_registration_and_logout() {
    let state = seeded_state();
    let tab = state.open_tab();
    let session = SessionService::new(&tab);

    // Static logins
    let admin = session.login("admin", "admin123").unwrap();
    assert_eq!(admin.role, shared::models::Role::Admin);
    let customer = session.login("customer", "customer123").unwrap();
    assert_eq!(customer.role, shared::models::Role::Customer);

    // Uniform failure message for wrong password and unknown user
    let e1 = session.login("admin", "wrong").unwrap_err();
    let e2 = session.login("ghost", "whatever").unwrap_err();
    assert_eq!(e1.code, ErrorCode::InvalidCredentials);
    assert_eq!(e1.message, e2.message);

    // Registration rules
    let err = session
        .register(SignUp {
            username: "lucia".to_string(),
            password: "short".to_string(),
            name: None,
            email: None,
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::WeakPassword);

    let err = session
        .register(SignUp {
            username: "Admin".to_string(),
            password: "longenough".to_string(),
            name: None,
            email: None,
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::UsernameTaken);

    session
        .register(SignUp {
            username: "lucia".to_string(),
            password: "lucia-pass".to_string(),
            name: Some("Lucia Reyes".to_string()),
            email: None,
        })
        .unwrap();

    let err = session
        .register(SignUp {
            username: "LUCIA".to_string(),
            password: "another-pass".to_string(),
            name: None,
            email: None,
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::UsernameTaken);

    // Registered account can log in; identity persists until logout
    let lucia = session.login("lucia", "lucia-pass").unwrap();
    assert_eq!(lucia.role, shared::models::Role::Customer);
    assert_eq!(session.current_user().unwrap(), Some(lucia));

    session.logout().unwrap();
    assert_eq!(session.current_user().unwrap(), None);
}

// ==================== Dashboard ====================

#[tokio::test]
async fn dashboard_overview_matches_seed() {
    let state = seeded_state();
    let tab = state.open_tab();

    let overview = DashboardService::new(&tab).overview().unwrap();
    assert_eq!(overview.total_products, 12);
    assert_eq!(overview.pending_orders, 1);
    // Completed seed orders: o3 (8394) + o4 (5291)
    assert_eq!(overview.total_revenue, 13685.0);
    // At or below threshold in the seed: p5, p9, p12
    let low: Vec<&str> = overview
        .low_stock_products
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(low, vec!["p5", "p9", "p12"]);
    assert_eq!(overview.recent_orders.len(), 4);
}
