//! HTTP client for the bill-sharing backend.

use async_trait::async_trait;
use url::Url;

use super::Backend;
use super::types::{ActionResponse, AddFriendRequest, CreateBillRequest, Friend, FriendId};
use crate::error::{Error, Result};

/// Default path of the JSON friend listing.
pub const DEFAULT_FRIENDS_PATH: &str = "/api/friends";

/// HTTP client for the backend API.
///
/// # Example
///
/// ```rust,no_run
/// use billshare_client::api::Client;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new("http://localhost:5000")?;
/// let friends = client.friends().list().await?;
/// for friend in friends {
///     println!("{} ({})", friend.name, friend.id);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    friends_path: String,
}

impl Client {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the server (e.g., "http://localhost:5000")
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a new client with a custom reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self {
            base_url,
            http,
            friends_path: DEFAULT_FRIENDS_PATH.to_string(),
        })
    }

    /// Override the path of the friend listing endpoint.
    #[must_use]
    pub fn with_friends_path(mut self, path: impl Into<String>) -> Self {
        self.friends_path = path.into();
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the Bills API.
    pub fn bills(&self) -> BillsApi<'_> {
        BillsApi { client: self }
    }

    /// Access the Friends API.
    pub fn friends(&self) -> FriendsApi<'_> {
        FriendsApi { client: self }
    }

    /// Access the CSV report downloads.
    pub fn reports(&self) -> ReportsApi<'_> {
        ReportsApi { client: self }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> Url {
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Decode a `{success, error}` body regardless of status code.
    ///
    /// The server reports failures as JSON with a 4xx status, so the body
    /// is read first and the status only matters when it is not JSON.
    async fn handle_action(response: reqwest::Response) -> Result<ActionResponse> {
        let status = response.status();
        let body = response.text().await?;
        match serde_json::from_str::<ActionResponse>(&body) {
            Ok(action) => action.into_result(),
            Err(_) if !status.is_success() => Err(Error::Api {
                status: status.as_u16(),
                message: body,
            }),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Bills API
// =============================================================================

/// Bills API client.
#[derive(Debug)]
pub struct BillsApi<'a> {
    client: &'a Client,
}

impl BillsApi<'_> {
    /// Create a bill with its participants.
    pub async fn create(&self, req: &CreateBillRequest) -> Result<ActionResponse> {
        let response = self
            .client
            .http
            .post(self.client.url("/create_bill"))
            .json(req)
            .send()
            .await?;
        Client::handle_action(response).await
    }
}

// =============================================================================
// Friends API
// =============================================================================

/// Friends API client.
#[derive(Debug)]
pub struct FriendsApi<'a> {
    client: &'a Client,
}

impl FriendsApi<'_> {
    /// List all friends of the current user.
    pub async fn list(&self) -> Result<Vec<Friend>> {
        let response = self
            .client
            .http
            .get(self.client.url(&self.client.friends_path))
            .send()
            .await?;
        Client::handle_response(response).await
    }

    /// Add a friend.
    pub async fn add(&self, req: &AddFriendRequest) -> Result<ActionResponse> {
        let response = self
            .client
            .http
            .post(self.client.url("/add_friend"))
            .json(req)
            .send()
            .await?;
        Client::handle_action(response).await
    }

    /// Delete a friend and their bill participations.
    pub async fn delete(&self, id: FriendId) -> Result<ActionResponse> {
        let response = self
            .client
            .http
            .delete(self.client.url(&format!("/delete_friend/{id}")))
            .send()
            .await?;
        Client::handle_action(response).await
    }
}

// =============================================================================
// Reports API
// =============================================================================

/// CSV report downloads.
#[derive(Debug)]
pub struct ReportsApi<'a> {
    client: &'a Client,
}

impl ReportsApi<'_> {
    /// Download the overall bills report, or one friend's report.
    pub async fn csv(&self, friend: Option<FriendId>) -> Result<String> {
        let path = match friend {
            Some(id) => format!("/download_friend_csv/{id}"),
            None => "/download_csv".to_string(),
        };
        let response = self.client.http.get(self.client.url(&path)).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(Error::Api {
                status: status.as_u16(),
                message: body,
            })
        }
    }
}

#[async_trait]
impl Backend for Client {
    async fn create_bill(&self, request: &CreateBillRequest) -> Result<ActionResponse> {
        self.bills().create(request).await
    }

    async fn add_friend(&self, request: &AddFriendRequest) -> Result<ActionResponse> {
        self.friends().add(request).await
    }

    async fn delete_friend(&self, id: FriendId) -> Result<ActionResponse> {
        self.friends().delete(id).await
    }

    async fn list_friends(&self) -> Result<Vec<Friend>> {
        self.friends().list().await
    }

    async fn download_report(&self, friend: Option<FriendId>) -> Result<String> {
        self.reports().csv(friend).await
    }
}
