use serde_json::{json, Value};
use thiserror::Error;

/// Crate-level error type.
/// Amount, NAI and post-row variants are contract violations: callers should
/// surface them as hard failures rather than retry.
#[derive(Debug, Error)]
pub enum CondenserError {
    #[error("invalid input amount {0}")]
    UnsupportedAmount(String),

    #[error("invalid amount value: {0}")]
    InvalidAmount(String),

    #[error("unknown NAI {nai}; expected {expected}")]
    UnknownNai { nai: String, expected: String },

    #[error("amount unit mismatch: expected {expected}, found {found}")]
    UnitMismatch { expected: String, found: String },

    #[error("corrupt cache row for post {post_id}: {reason}")]
    CorruptPost { post_id: i32, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl CondenserError {
    /// Stable machine-readable code for the API layer.
    pub fn code(&self) -> &'static str {
        match self {
            CondenserError::UnsupportedAmount(_) => "UNSUPPORTED_AMOUNT",
            CondenserError::InvalidAmount(_) => "INVALID_AMOUNT",
            CondenserError::UnknownNai { .. } => "UNKNOWN_NAI",
            CondenserError::UnitMismatch { .. } => "UNIT_MISMATCH",
            CondenserError::CorruptPost { .. } => "CORRUPT_POST",
            CondenserError::Database(_) => "DATABASE_ERROR",
            CondenserError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Renders the `{"error": {"code", "message"}}` body legacy clients receive.
    /// Infrastructure failures are logged in full and reported generically.
    pub fn to_error_body(&self) -> Value {
        let message = match self {
            CondenserError::Database(e) => {
                tracing::error!("Database error: {e}");
                "A database error occurred".to_string()
            }
            CondenserError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        json!({
            "error": {
                "code": self.code(),
                "message": message
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_violation_body_carries_message() {
        let err = CondenserError::UnknownNai {
            nai: "@@000000099".to_string(),
            expected: "(any)".to_string(),
        };
        let body = err.to_error_body();
        assert_eq!(body["error"]["code"], "UNKNOWN_NAI");
        assert_eq!(
            body["error"]["message"],
            "unknown NAI @@000000099; expected (any)"
        );
    }

    #[test]
    fn test_internal_error_is_reported_generically() {
        let err = CondenserError::Internal(anyhow::anyhow!("pool exhausted"));
        let body = err.to_error_body();
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"]["message"], "An internal error occurred");
    }
}
