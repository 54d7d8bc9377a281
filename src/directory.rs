//! Friend directory: the cached friend list and its server-side actions.
//!
//! The cache is read-only from the client's point of view. Mutations go
//! to the server and the cache is only updated by [`FriendDirectory::refresh`].

use std::path::Path;

use crate::api::{Backend, Friend, FriendId};
use crate::error::Result;
use crate::forms::Outcome;
use crate::notify::Notifier;
use crate::view::escape_html;

/// Confirmation asked before deleting a friend.
pub const DELETE_CONFIRMATION: &str =
    "Are you sure you want to delete this friend? This will remove them from all bills.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FriendDirectory {
    friends: Vec<Friend>,
}

impl FriendDirectory {
    pub fn new(friends: Vec<Friend>) -> Self {
        Self { friends }
    }

    /// Seed the cache from the host page's injected friend collection.
    ///
    /// A missing or blank payload gives an empty directory.
    pub fn from_page_data(json: Option<&str>) -> Result<Self> {
        match json.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(json) => Ok(Self::new(serde_json::from_str(json)?)),
        }
    }

    pub fn friends(&self) -> &[Friend] {
        &self.friends
    }

    pub fn get(&self, id: FriendId) -> Option<&Friend> {
        self.friends.iter().find(|friend| friend.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.friends.is_empty()
    }

    pub fn len(&self) -> usize {
        self.friends.len()
    }

    /// Replace the cached list.
    pub fn replace(&mut self, friends: Vec<Friend>) {
        self.friends = friends;
    }

    /// Refetch the list from the server.
    ///
    /// On failure the stale cache is kept and `false` is returned.
    pub async fn refresh(&mut self, backend: &dyn Backend) -> bool {
        match backend.list_friends().await {
            Ok(friends) => {
                tracing::debug!(
                    name: "directory.refreshed",
                    count = friends.len(),
                    "Friend directory refreshed"
                );
                self.replace(friends);
                true
            }
            Err(e) => {
                tracing::warn!(
                    name: "directory.refresh.failed",
                    error = %e,
                    "Error loading friends"
                );
                false
            }
        }
    }

    /// Delete a friend after explicit confirmation.
    ///
    /// The cache is not touched; callers refetch on
    /// [`Outcome::Committed`].
    pub async fn delete_friend(
        &self,
        id: FriendId,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> Outcome {
        if !notifier.confirm(DELETE_CONFIRMATION) {
            return Outcome::Cancelled;
        }

        match backend.delete_friend(id).await {
            Ok(response) => {
                tracing::info!(name: "friend.delete.committed", friend_id = id, "Friend deleted");
                notifier.alert("Friend deleted successfully!");
                Outcome::Committed(response)
            }
            Err(e) => {
                tracing::warn!(
                    name: "friend.delete.failed",
                    friend_id = id,
                    error = %e,
                    "Deleting friend failed"
                );
                notifier.alert(&format!("Error deleting friend: {}", e.user_message()));
                Outcome::Failed
            }
        }
    }

    /// Download a CSV report (overall, or for one friend) to `path`.
    pub async fn download_report(
        &self,
        friend: Option<FriendId>,
        path: &Path,
        backend: &dyn Backend,
        notifier: &dyn Notifier,
    ) -> bool {
        let result = async {
            let csv = backend.download_report(friend).await?;
            tokio::fs::write(path, csv).await?;
            Ok::<_, crate::error::Error>(())
        }
        .await;

        match result {
            Ok(()) => {
                tracing::info!(
                    name: "report.saved",
                    path = %path.display(),
                    friend_id = ?friend,
                    "Report saved"
                );
                true
            }
            Err(e) => {
                notifier.alert(&format!("Error downloading report: {}", e.user_message()));
                false
            }
        }
    }

    /// HTML for the friend list with a delete control per friend.
    pub fn render(&self) -> String {
        let mut items = String::new();
        for friend in &self.friends {
            let contact = [friend.email.as_deref(), friend.phone.as_deref()]
                .into_iter()
                .flatten()
                .filter(|s| !s.is_empty())
                .map(escape_html)
                .collect::<Vec<_>>()
                .join(" · ");
            items.push_str(&format!(
                r#"<li class="flex justify-between items-center p-3 border-b" data-friend-id="{id}"><div><div class="font-semibold">{name}</div><div class="text-sm text-gray-500">{contact}</div></div><button type="button" data-action="delete-friend" data-friend-id="{id}" class="text-red-500 hover:text-red-700">Delete</button></li>"#,
                id = friend.id,
                name = escape_html(&friend.name),
            ));
        }
        format!(r#"<ul id="friends-list" class="divide-y">{items}</ul>"#)
    }
}
