//! Backend API: typed schemas, the HTTP client, and the [`Backend`] seam.
//!
//! Controllers only see [`Backend`], so the HTTP [`Client`] can be swapped
//! for an in-memory double in tests.

mod client;
pub mod types;

use async_trait::async_trait;

pub use client::{BillsApi, Client, DEFAULT_FRIENDS_PATH, FriendsApi, ReportsApi};
pub use types::{
    ActionResponse, AddFriendRequest, CreateBillRequest, Friend, FriendId, ParticipantShare,
};

use crate::error::Result;

/// Request/response calls the forms and the directory depend on.
///
/// Mutating calls resolve to `Ok` only when the server reported
/// `success: true`; a `success: false` body surfaces as
/// [`Error::Rejected`](crate::error::Error::Rejected).
#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /create_bill`.
    async fn create_bill(&self, request: &CreateBillRequest) -> Result<ActionResponse>;

    /// `POST /add_friend`.
    async fn add_friend(&self, request: &AddFriendRequest) -> Result<ActionResponse>;

    /// `DELETE /delete_friend/{id}`.
    async fn delete_friend(&self, id: FriendId) -> Result<ActionResponse>;

    /// Fetch the current friend list.
    async fn list_friends(&self) -> Result<Vec<Friend>>;

    /// Fetch a CSV report: overall when `friend` is `None`.
    async fn download_report(&self, friend: Option<FriendId>) -> Result<String>;
}
