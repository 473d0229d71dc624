//! Two tabs over one store: convergence through re-reads, and the
//! last-writer-wins consequences of whole-collection saves.

use laroza_store::services::CatalogService;
use laroza_store::sync::AutoRefresh;
use laroza_store::{ChangeAction, Collection, Config, StoreState};
use shared::models::Product;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn seeded_state() -> StoreState {
    StoreState::initialize(&Config::in_memory()).unwrap()
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

#[tokio::test]
async fn stock_decrement_converges_without_merging() {
    let state = seeded_state();
    let tab_a = state.open_tab();
    let tab_b = state.open_tab();

    // Tab B reads and caches the catalog before A's change
    let cached: Vec<Product> = tab_b.products().unwrap();
    let stale_stock = cached.iter().find(|p| p.id == "p1").unwrap().stock;
    assert_eq!(stale_stock, 45);

    // B re-reads whenever a stock event arrives
    let observed = Arc::new(Mutex::new(Vec::<Product>::new()));
    let store_b = state.store().clone();
    let obs = Arc::clone(&observed);
    let _binding = AutoRefresh::bind(&tab_b, &[Collection::Inventory], move || {
        let fresh: Vec<Product> = store_b.read_collection(Collection::Products).unwrap();
        *obs.lock().unwrap() = fresh;
    });

    // Tab A: read, decrement p1 by 2, save the whole array, broadcast
    let mut products = tab_a.products().unwrap();
    let p1 = products.iter_mut().find(|p| p.id == "p1").unwrap();
    p1.stock -= 2;
    tab_a.save_products(&products).unwrap();
    tab_a.broadcast_change(Collection::Inventory, ChangeAction::Update);

    // B observes the decrement without merging anything itself
    assert!(
        wait_until(|| {
            observed
                .lock()
                .unwrap()
                .iter()
                .any(|p| p.id == "p1" && p.stock == 43)
        })
        .await,
        "tab B never observed the decremented stock"
    );
}

#[tokio::test]
async fn last_writer_wins_discards_concurrent_changes() {
    let state = seeded_state();
    let tab_a = state.open_tab();
    let tab_b = state.open_tab();

    // Both tabs read the same snapshot
    let mut a_view = tab_a.products().unwrap();
    let mut b_view = tab_b.products().unwrap();

    // Non-overlapping modifications: A renames p1, B reprices p2
    a_view.iter_mut().find(|p| p.id == "p1").unwrap().name = "Renamed by A".to_string();
    b_view.iter_mut().find(|p| p.id == "p2").unwrap().price = 1.0;

    // A saves first, B saves last; B's array replaces A's entirely
    tab_a.save_products(&a_view).unwrap();
    tab_b.save_products(&b_view).unwrap();

    let persisted = tab_a.products().unwrap();
    let p1 = persisted.iter().find(|p| p.id == "p1").unwrap();
    let p2 = persisted.iter().find(|p| p.id == "p2").unwrap();

    // B never saw A's rename, so it is gone; B's reprice survives
    assert_eq!(p1.name, "Modern LED Ceiling Light");
    assert_eq!(p2.price, 1.0);
    assert_eq!(persisted, b_view);
}

#[tokio::test]
async fn admin_restock_reaches_customer_tab() {
    let state = seeded_state();
    let admin_tab = state.open_tab();
    let customer_tab = state.open_tab();

    let observed = Arc::new(Mutex::new(None::<u32>));
    let store = state.store().clone();
    let obs = Arc::clone(&observed);
    let _binding = AutoRefresh::bind(
        &customer_tab,
        &[Collection::Inventory, Collection::Products],
        move || {
            let products: Vec<Product> = store.read_collection(Collection::Products).unwrap();
            *obs.lock().unwrap() = products.iter().find(|p| p.id == "p12").map(|p| p.stock);
        },
    );

    // Industrial Fixture Set starts at 3; admin restocks 10
    CatalogService::new(&admin_tab).adjust_stock("p12", 10).unwrap();

    assert!(
        wait_until(|| *observed.lock().unwrap() == Some(13)).await,
        "customer tab never saw the restock"
    );
}

#[tokio::test]
async fn independent_states_do_not_leak_events() {
    // Two StoreStates simulate two unrelated origins; tabs on one must
    // never hear broadcasts from the other
    let state_x = seeded_state();
    let state_y = seeded_state();

    let tab_x = state_x.open_tab();
    let tab_y = state_y.open_tab();

    let hits = Arc::new(Mutex::new(0u32));
    let h = Arc::clone(&hits);
    let _sub = tab_y.subscribe(move |_| {
        *h.lock().unwrap() += 1;
    });

    tab_x.broadcast_change(Collection::Orders, ChangeAction::Create);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(*hits.lock().unwrap(), 0);
}
