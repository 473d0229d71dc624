//! Promotion Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Promotion entity
///
/// Codes are matched case-insensitively and stored uppercase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: String,
    pub code: String,
    /// Discount percentage (0-100)
    pub discount: f64,
    /// First valid calendar date, inclusive (YYYY-MM-DD)
    pub valid_from: String,
    /// Last valid calendar date, inclusive (YYYY-MM-DD)
    pub valid_to: String,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_uses: Option<u32>,
}

impl Promotion {
    /// Whether `today` falls within the inclusive validity window.
    ///
    /// An unparseable window is treated as closed.
    pub fn is_within_window(&self, today: NaiveDate) -> bool {
        match (
            crate::util::parse_date(&self.valid_from),
            crate::util::parse_date(&self.valid_to),
        ) {
            (Ok(from), Ok(to)) => from <= today && today <= to,
            _ => false,
        }
    }

    /// Whether the usage cap has been reached (unlimited when no cap)
    pub fn is_exhausted(&self) -> bool {
        match self.max_uses {
            Some(max) => self.current_uses.unwrap_or(0) >= max,
            None => false,
        }
    }

    /// Active, inside the window, and not exhausted
    pub fn is_currently_valid(&self, today: NaiveDate) -> bool {
        self.active && self.is_within_window(today) && !self.is_exhausted()
    }

    /// Case-insensitive code comparison
    pub fn matches_code(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code)
    }
}

/// Create promotion payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionCreate {
    pub code: String,
    pub discount: f64,
    pub valid_from: String,
    pub valid_to: String,
    pub active: bool,
    pub max_uses: Option<u32>,
}

/// Update promotion payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionUpdate {
    pub code: Option<String>,
    pub discount: Option<f64>,
    pub valid_from: Option<String>,
    pub valid_to: Option<String>,
    pub active: Option<bool>,
    pub max_uses: Option<Option<u32>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn promo() -> Promotion {
        Promotion {
            id: "pr1".to_string(),
            code: "NEWYEAR2026".to_string(),
            discount: 15.0,
            valid_from: "2026-01-01".to_string(),
            valid_to: "2026-01-31".to_string(),
            active: true,
            max_uses: Some(50),
            current_uses: Some(3),
        }
    }

    fn date(s: &str) -> NaiveDate {
        crate::util::parse_date(s).unwrap()
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let p = promo();
        assert!(p.is_within_window(date("2026-01-01")));
        assert!(p.is_within_window(date("2026-01-31")));
        assert!(!p.is_within_window(date("2025-12-31")));
        assert!(!p.is_within_window(date("2026-02-01")));
    }

    #[test]
    fn inactive_promo_is_never_valid() {
        let mut p = promo();
        p.active = false;
        assert!(!p.is_currently_valid(date("2026-01-15")));
    }

    #[test]
    fn exhausted_when_uses_reach_cap() {
        let mut p = promo();
        p.current_uses = Some(50);
        assert!(p.is_exhausted());
        assert!(!p.is_currently_valid(date("2026-01-15")));

        p.max_uses = None;
        assert!(!p.is_exhausted());
    }

    #[test]
    fn code_match_ignores_case() {
        let p = promo();
        assert!(p.matches_code("newyear2026"));
        assert!(p.matches_code("NewYear2026"));
        assert!(!p.matches_code("WELCOME10"));
    }

    #[test]
    fn malformed_window_treated_as_closed() {
        let mut p = promo();
        p.valid_from = "not-a-date".to_string();
        assert!(!p.is_within_window(date("2026-01-15")));
    }
}
