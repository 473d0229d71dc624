//! Unified error codes for the storefront engine
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 5xxx: Promotion errors
//! - 6xxx: Product errors
//! - 7xxx: Review errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Username already taken or reserved
    UsernameTaken = 1003,
    /// Password does not meet the minimum length
    WeakPassword = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order status transition not allowed
    InvalidStatusTransition = 4002,
    /// Order has no line items
    EmptyOrder = 4003,

    // ==================== 5xxx: Promotion ====================
    /// Promo code not found
    PromoNotFound = 5001,
    /// Promotion is deactivated
    PromoInactive = 5002,
    /// Promotion outside its validity window
    PromoExpired = 5003,
    /// Promotion has reached its usage limit
    PromoExhausted = 5004,
    /// A promotion with this code already exists
    DuplicatePromoCode = 5005,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Requested quantity exceeds available stock
    InsufficientStock = 6002,

    // ==================== 7xxx: Review ====================
    /// Order is not eligible for a review
    ReviewNotAllowed = 7001,
    /// Order already has a review
    AlreadyReviewed = 7002,
    /// Rating outside the 1-5 range
    RatingOutOfRange = 7003,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Durable store error
    StorageError = 9002,
    /// Serialization error
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get the default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::ValueOutOfRange => "Value out of range",
            Self::NotAuthenticated => "Not authenticated",
            Self::InvalidCredentials => "Invalid username or password",
            Self::UsernameTaken => "Username is already taken",
            Self::WeakPassword => "Password must be at least 6 characters",
            Self::PermissionDenied => "Permission denied",
            Self::AdminRequired => "Admin role required",
            Self::OrderNotFound => "Order not found",
            Self::InvalidStatusTransition => "Order status transition not allowed",
            Self::EmptyOrder => "Order has no items",
            Self::PromoNotFound => "Invalid or expired promo code",
            Self::PromoInactive => "Invalid or expired promo code",
            Self::PromoExpired => "Invalid or expired promo code",
            Self::PromoExhausted => "This promo code has reached its usage limit",
            Self::DuplicatePromoCode => "A promotion with this code already exists",
            Self::ProductNotFound => "Product not found",
            Self::InsufficientStock => "Insufficient stock",
            Self::ReviewNotAllowed => "Only completed orders can be reviewed",
            Self::AlreadyReviewed => "This order already has a review",
            Self::RatingOutOfRange => "Rating must be between 1 and 5",
            Self::InternalError => "Internal error",
            Self::StorageError => "Durable store error",
            Self::SerializationError => "Serialization error",
        }
    }

    /// Numeric value of the code
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.as_u16())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Error returned when a u16 does not map to a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            8 => Self::ValueOutOfRange,
            1001 => Self::NotAuthenticated,
            1002 => Self::InvalidCredentials,
            1003 => Self::UsernameTaken,
            1004 => Self::WeakPassword,
            2001 => Self::PermissionDenied,
            2003 => Self::AdminRequired,
            4001 => Self::OrderNotFound,
            4002 => Self::InvalidStatusTransition,
            4003 => Self::EmptyOrder,
            5001 => Self::PromoNotFound,
            5002 => Self::PromoInactive,
            5003 => Self::PromoExpired,
            5004 => Self::PromoExhausted,
            5005 => Self::DuplicatePromoCode,
            6001 => Self::ProductNotFound,
            6002 => Self::InsufficientStock,
            7001 => Self::ReviewNotAllowed,
            7002 => Self::AlreadyReviewed,
            7003 => Self::RatingOutOfRange,
            9001 => Self::InternalError,
            9002 => Self::StorageError,
            9003 => Self::SerializationError,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}
