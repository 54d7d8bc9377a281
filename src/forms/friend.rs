//! Add-friend modal.

use super::Outcome;
use crate::api::{AddFriendRequest, Backend};
use crate::notify::Notifier;
use crate::view::{escape_html, modal_classes};

/// Add-friend form view-model.
///
/// Fields are sent as entered; format checks are left to the input
/// controls.
#[derive(Debug, Clone, Default)]
pub struct FriendForm {
    open: bool,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl FriendForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Clear all fields and show the modal.
    pub fn open(&mut self) {
        self.name.clear();
        self.email.clear();
        self.phone.clear();
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn request(&self) -> AddFriendRequest {
        AddFriendRequest {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }

    /// Submit the form; closes on success, stays open on failure.
    pub async fn submit(&mut self, backend: &dyn Backend, notifier: &dyn Notifier) -> Outcome {
        if !self.open {
            return Outcome::Ignored;
        }

        match backend.add_friend(&self.request()).await {
            Ok(response) => {
                tracing::info!(
                    name: "friend.add.committed",
                    friend_id = ?response.friend.as_ref().map(|f| f.id),
                    "Friend added"
                );
                self.close();
                notifier.alert("Friend added successfully!");
                Outcome::Committed(response)
            }
            Err(e) => {
                tracing::warn!(name: "friend.add.failed", error = %e, "Adding friend failed");
                notifier.alert(&format!("Error adding friend: {}", e.user_message()));
                Outcome::Failed
            }
        }
    }

    /// HTML for the modal.
    pub fn render(&self) -> String {
        format!(
            r#"<div id="friend-modal" class="{modal}">
<div class="bg-white rounded-lg p-6 w-full max-w-md">
<h2 class="text-xl font-bold mb-4">Add Friend</h2>
<form id="friend-form" class="space-y-4">
    <input id="friend-name" type="text" class="w-full border rounded px-3 py-2" placeholder="Name" value="{name}" required>
    <input id="friend-email" type="email" class="w-full border rounded px-3 py-2" placeholder="Email" value="{email}">
    <input id="friend-phone" type="tel" class="w-full border rounded px-3 py-2" placeholder="Phone" value="{phone}">
    <div class="flex justify-end space-x-2">
        <button type="button" data-action="close-friend-modal" class="px-4 py-2 border rounded">Cancel</button>
        <button type="submit" class="px-4 py-2 bg-blue-500 text-white rounded">Add Friend</button>
    </div>
</form>
</div>
</div>"#,
            modal = modal_classes(self.open),
            name = escape_html(&self.name),
            email = escape_html(&self.email),
            phone = escape_html(&self.phone),
        )
    }
}
