//! Services - the operations the UI surfaces call
//!
//! Every mutation follows one pattern: read the whole collection, change it
//! in memory, save the whole collection back, broadcast the change. The
//! services are thin per-tab views; construct them on demand from a
//! [`TabContext`](crate::sync::TabContext) reference.

pub mod cart;
pub mod catalog;
pub mod dashboard;
pub mod orders;
pub mod promotions;
pub mod reviews;
pub mod session;

pub use cart::{AppliedPromo, Cart, CartItem};
pub use catalog::CatalogService;
pub use dashboard::{DashboardOverview, DashboardService};
pub use orders::OrderService;
pub use promotions::PromotionService;
pub use reviews::ReviewService;
pub use session::SessionService;
