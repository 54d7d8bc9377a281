//! Request and response schemas for the backend endpoints.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Server-assigned friend identifier.
pub type FriendId = i64;

/// A friend record as owned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Friend {
    /// Unique identifier.
    pub id: FriendId,
    /// Display name.
    pub name: String,
    /// Optional email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Optional phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

// =============================================================================
// Bills
// =============================================================================

/// One participant's share in a new bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantShare {
    /// Friend who owes the amount.
    pub friend_id: FriendId,
    /// Amount owed by the friend.
    pub amount_owed: f64,
}

/// Body of `POST /create_bill`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBillRequest {
    /// Short description of the bill.
    pub description: String,
    /// Free-form notes about the visit.
    pub visit_details: String,
    /// Visit date as entered (`YYYY-MM-DD`).
    pub visit_date: String,
    /// Pre-tax total. Serialized as `null` when the field did not parse.
    pub total_amount: Option<f64>,
    /// Tax amount, `0` when the field did not parse.
    pub tax_amount: f64,
    /// Discount amount, `0` when the field did not parse.
    pub discount_amount: f64,
    /// Participants in row order.
    pub participants: Vec<ParticipantShare>,
}

// =============================================================================
// Friends
// =============================================================================

/// Body of `POST /add_friend`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddFriendRequest {
    /// Display name.
    pub name: String,
    /// Email, sent as entered.
    pub email: String,
    /// Phone, sent as entered.
    pub phone: String,
}

// =============================================================================
// Responses
// =============================================================================

/// Response body shared by all mutating endpoints.
///
/// Error responses from the server carry only `error`, so `success`
/// defaults to `false`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ActionResponse {
    /// Whether the server committed the change.
    #[serde(default)]
    pub success: bool,
    /// Server-provided failure text.
    #[serde(default)]
    pub error: Option<String>,
    /// Id of a newly created bill.
    #[serde(default)]
    pub bill_id: Option<i64>,
    /// Echo of a newly created friend.
    #[serde(default)]
    pub friend: Option<Friend>,
}

impl ActionResponse {
    /// Turn a `success: false` body into [`Error::Rejected`].
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(Error::Rejected(
                self.error.unwrap_or_else(|| "Unknown error".to_string()),
            ))
        }
    }
}
