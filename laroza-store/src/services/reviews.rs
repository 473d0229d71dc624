//! Review service
//!
//! A review is tied to a completed order. "One review per order" is
//! enforced here, not by the store: concurrent tabs can still race two
//! reviews in, which last-writer-wins resolves like any other save.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{OrderStatus, Review};
use shared::sync::{ChangeAction, Collection};
use shared::util;

use crate::sync::TabContext;

/// Review operations for one tab
#[derive(Debug)]
pub struct ReviewService<'a> {
    tab: &'a TabContext,
}

impl<'a> ReviewService<'a> {
    pub fn new(tab: &'a TabContext) -> Self {
        Self { tab }
    }

    // ========== Reads ==========

    pub fn list(&self) -> AppResult<Vec<Review>> {
        self.tab.reviews()
    }

    pub fn for_product(&self, product_id: &str) -> AppResult<Vec<Review>> {
        Ok(self
            .tab
            .reviews()?
            .into_iter()
            .filter(|r| r.product_id == product_id)
            .collect())
    }

    /// Mean star rating, `None` when the product has no reviews
    pub fn average_rating(&self, product_id: &str) -> AppResult<Option<f64>> {
        let reviews = self.for_product(product_id)?;
        if reviews.is_empty() {
            return Ok(None);
        }
        let sum: u32 = reviews.iter().map(|r| r.rating as u32).sum();
        Ok(Some(sum as f64 / reviews.len() as f64))
    }

    pub fn has_review(&self, order_id: &str) -> AppResult<bool> {
        Ok(self.tab.reviews()?.iter().any(|r| r.order_id == order_id))
    }

    // ========== Mutations ==========

    /// Add a review for a line of a completed, not-yet-reviewed order
    pub fn add_review(
        &self,
        order_id: &str,
        product_id: &str,
        rating: u8,
        comment: impl Into<String>,
    ) -> AppResult<Review> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::new(ErrorCode::RatingOutOfRange).with_detail("rating", rating));
        }

        let order = self
            .tab
            .orders()?
            .into_iter()
            .find(|o| o.id == order_id)
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order {order_id} not found"))
            })?;

        if order.status != OrderStatus::Completed {
            return Err(AppError::new(ErrorCode::ReviewNotAllowed));
        }
        if self.has_review(order_id)? {
            return Err(AppError::new(ErrorCode::AlreadyReviewed));
        }

        let review = Review {
            id: format!("r{}", util::snowflake_id()),
            product_id: product_id.to_string(),
            order_id: order_id.to_string(),
            customer_name: order.customer_name,
            rating,
            comment: comment.into(),
            date: util::today_string(),
        };

        let mut reviews = self.tab.reviews()?;
        reviews.push(review.clone());
        self.tab.save_reviews(&reviews)?;
        self.tab
            .broadcast_change(Collection::Reviews, ChangeAction::Create);

        tracing::info!(review = %review.id, order = %order_id, rating, "Review added");
        Ok(review)
    }

    /// Remove a review (admin moderation)
    pub fn delete_review(&self, id: &str) -> AppResult<()> {
        let mut reviews = self.tab.reviews()?;
        let before = reviews.len();
        reviews.retain(|r| r.id != id);
        if reviews.len() == before {
            return Err(AppError::not_found(format!("Review {id}")));
        }

        self.tab.save_reviews(&reviews)?;
        self.tab
            .broadcast_change(Collection::Reviews, ChangeAction::Delete);
        Ok(())
    }
}
