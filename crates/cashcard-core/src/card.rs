//! The CashCard record and its request payload

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A stored cash card
///
/// `id` is assigned by the store and `owner` by the server from the
/// authenticated principal. Only `amount` is ever mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashCard {
    /// Store-assigned identifier, unique across all owners
    pub id: i64,

    /// Monetary amount
    pub amount: f64,

    /// Principal that owns this card
    pub owner: String,
}

impl CashCard {
    /// Create a card with an already-assigned id
    pub fn new(id: i64, amount: f64, owner: impl Into<String>) -> Self {
        Self {
            id,
            amount,
            owner: owner.into(),
        }
    }

    /// Check whether `principal` owns this card
    pub fn is_owned_by(&self, principal: &str) -> bool {
        self.owner == principal
    }
}

/// Body accepted by create and update
///
/// Clients may echo back a full card, so `id` and `owner` are accepted but
/// never used: the server assigns both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashCardRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub amount: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl CashCardRequest {
    /// Request carrying only an amount
    pub fn new(amount: f64) -> Self {
        Self {
            id: None,
            amount,
            owner: None,
        }
    }

    /// Validated amount from the request
    pub fn amount(&self) -> Result<f64> {
        validate_amount(self.amount)
    }
}

/// Reject amounts that cannot be stored or compared
///
/// Zero and negative amounts are accepted.
pub fn validate_amount(amount: f64) -> Result<f64> {
    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(CoreError::InvalidAmount(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_serializes_with_exact_field_names() {
        let card = CashCard::new(99, 123.45, "sarah1");
        let json = serde_json::to_value(&card).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "id": 99, "amount": 123.45, "owner": "sarah1" })
        );
    }

    #[test]
    fn test_request_ignores_missing_id_and_owner() {
        let request: CashCardRequest = serde_json::from_str(r#"{"amount": 100.0}"#).unwrap();

        assert_eq!(request.id, None);
        assert_eq!(request.owner, None);
        assert_eq!(request.amount().unwrap(), 100.0);
    }

    #[test]
    fn test_request_accepts_null_id_and_owner() {
        let request: CashCardRequest =
            serde_json::from_str(r#"{"id": null, "amount": 19.99, "owner": null}"#).unwrap();

        assert_eq!(request.amount, 19.99);
    }

    #[test]
    fn test_request_requires_amount() {
        let result = serde_json::from_str::<CashCardRequest>(r#"{"owner": "sarah1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_and_zero_amounts_allowed() {
        assert_eq!(validate_amount(0.0).unwrap(), 0.0);
        assert_eq!(validate_amount(-12.5).unwrap(), -12.5);
    }

    #[test]
    fn test_non_finite_amount_rejected() {
        assert!(validate_amount(f64::NAN).is_err());
        assert!(validate_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn test_ownership_is_exact() {
        let card = CashCard::new(7, 1.0, "kumar2");

        assert!(card.is_owned_by("kumar2"));
        assert!(!card.is_owned_by("KUMAR2"));
        assert!(!card.is_owned_by("sarah1"));
    }
}
