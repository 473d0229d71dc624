//! Promotion service - promo code management and validation

use chrono::NaiveDate;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Promotion, PromotionCreate, PromotionUpdate};
use shared::sync::{ChangeAction, Collection};
use shared::util;

use super::cart::AppliedPromo;
use crate::sync::TabContext;

/// Promotion operations for one tab
#[derive(Debug)]
pub struct PromotionService<'a> {
    tab: &'a TabContext,
}

impl<'a> PromotionService<'a> {
    pub fn new(tab: &'a TabContext) -> Self {
        Self { tab }
    }

    // ========== Reads ==========

    pub fn list(&self) -> AppResult<Vec<Promotion>> {
        self.tab.promotions()
    }

    /// Check a code for use at checkout today
    pub fn validate_code(&self, code: &str) -> AppResult<AppliedPromo> {
        let today = util::parse_date(&util::today_string())
            .map_err(|e| AppError::internal(format!("Invalid system date: {e}")))?;
        self.validate_code_on(code, today)
    }

    /// Check a code against an explicit date.
    ///
    /// Error codes distinguish why a code was refused; the unknown /
    /// inactive / expired cases share the same customer-facing message.
    pub fn validate_code_on(&self, code: &str, today: NaiveDate) -> AppResult<AppliedPromo> {
        let promotions = self.tab.promotions()?;
        let promo = promotions
            .iter()
            .find(|p| p.matches_code(code))
            .ok_or_else(|| AppError::new(ErrorCode::PromoNotFound))?;

        if !promo.active {
            return Err(AppError::new(ErrorCode::PromoInactive));
        }
        if !promo.is_within_window(today) {
            return Err(AppError::new(ErrorCode::PromoExpired));
        }
        if promo.is_exhausted() {
            return Err(AppError::new(ErrorCode::PromoExhausted));
        }

        Ok(AppliedPromo {
            code: promo.code.clone(),
            discount: promo.discount,
        })
    }

    // ========== Mutations ==========

    pub fn create(&self, draft: PromotionCreate) -> AppResult<Promotion> {
        let code = draft.code.trim().to_uppercase();
        if code.is_empty() {
            return Err(AppError::validation("Promo code is required"));
        }
        validate_discount(draft.discount)?;
        validate_window(&draft.valid_from, &draft.valid_to)?;

        let mut promotions = self.tab.promotions()?;
        if promotions.iter().any(|p| p.matches_code(&code)) {
            return Err(AppError::new(ErrorCode::DuplicatePromoCode).with_detail("code", code));
        }

        let promotion = Promotion {
            id: format!("pr{}", util::snowflake_id()),
            code,
            discount: draft.discount,
            valid_from: draft.valid_from,
            valid_to: draft.valid_to,
            active: draft.active,
            max_uses: draft.max_uses,
            current_uses: Some(0),
        };

        promotions.push(promotion.clone());
        self.tab.save_promotions(&promotions)?;
        self.tab
            .broadcast_change(Collection::Promotions, ChangeAction::Create);

        tracing::info!(promo = %promotion.code, discount = promotion.discount, "Promotion created");
        Ok(promotion)
    }

    pub fn update(&self, id: &str, update: PromotionUpdate) -> AppResult<Promotion> {
        if let Some(discount) = update.discount {
            validate_discount(discount)?;
        }

        let mut promotions = self.tab.promotions()?;

        // Uppercase the incoming code and refuse clashes with other promos
        let new_code = match &update.code {
            Some(code) => {
                let code = code.trim().to_uppercase();
                if code.is_empty() {
                    return Err(AppError::validation("Promo code is required"));
                }
                if promotions.iter().any(|p| p.id != id && p.matches_code(&code)) {
                    return Err(
                        AppError::new(ErrorCode::DuplicatePromoCode).with_detail("code", code)
                    );
                }
                Some(code)
            }
            None => None,
        };

        let promo = promotions
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found(format!("Promotion {id}")))?;

        if let Some(code) = new_code {
            promo.code = code;
        }
        if let Some(discount) = update.discount {
            promo.discount = discount;
        }
        if let Some(valid_from) = update.valid_from {
            promo.valid_from = valid_from;
        }
        if let Some(valid_to) = update.valid_to {
            promo.valid_to = valid_to;
        }
        if let Some(active) = update.active {
            promo.active = active;
        }
        if let Some(max_uses) = update.max_uses {
            promo.max_uses = max_uses;
        }
        validate_window(&promo.valid_from, &promo.valid_to)?;
        let updated = promo.clone();

        self.tab.save_promotions(&promotions)?;
        self.tab
            .broadcast_change(Collection::Promotions, ChangeAction::Update);
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> AppResult<()> {
        let mut promotions = self.tab.promotions()?;
        let before = promotions.len();
        promotions.retain(|p| p.id != id);
        if promotions.len() == before {
            return Err(AppError::not_found(format!("Promotion {id}")));
        }

        self.tab.save_promotions(&promotions)?;
        self.tab
            .broadcast_change(Collection::Promotions, ChangeAction::Delete);
        Ok(())
    }

    /// Count one use of a code (called after checkout applies it)
    pub fn record_use(&self, code: &str) -> AppResult<()> {
        let mut promotions = self.tab.promotions()?;
        match promotions.iter_mut().find(|p| p.matches_code(code)) {
            Some(promo) => {
                promo.current_uses = Some(promo.current_uses.unwrap_or(0) + 1);
                self.tab.save_promotions(&promotions)?;
                self.tab
                    .broadcast_change(Collection::Promotions, ChangeAction::Update);
            }
            None => {
                tracing::warn!(code, "Promo use recorded for unknown code, ignoring");
            }
        }
        Ok(())
    }
}

fn validate_discount(discount: f64) -> AppResult<()> {
    if !(0.0..=100.0).contains(&discount) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "Discount must be between 0 and 100",
        )
        .with_detail("discount", discount));
    }
    Ok(())
}

fn validate_window(valid_from: &str, valid_to: &str) -> AppResult<()> {
    let from = util::parse_date(valid_from)
        .map_err(|_| AppError::validation(format!("Invalid date: {valid_from}")))?;
    let to = util::parse_date(valid_to)
        .map_err(|_| AppError::validation(format!("Invalid date: {valid_to}")))?;
    if from > to {
        return Err(AppError::validation("validFrom must not be after validTo"));
    }
    Ok(())
}
