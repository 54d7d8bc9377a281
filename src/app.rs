//! Workspace: composes the controllers around one backend and notifier.
//!
//! Successful mutations trigger [`Workspace::refresh`], which refetches
//! the friend directory and re-binds the open bill form to it. This
//! replaces a full page reload.

use std::path::Path;
use std::sync::Arc;

use crate::api::{Backend, FriendId};
use crate::directory::FriendDirectory;
use crate::forms::{BillForm, FriendForm, Outcome};
use crate::messenger::{Entry, Messenger};
use crate::notify::Notifier;
use crate::realtime::ServerEvent;

/// Application state for one page.
pub struct Workspace {
    backend: Arc<dyn Backend>,
    notifier: Arc<dyn Notifier>,
    directory: FriendDirectory,
    messenger: Messenger,
    bill_form: BillForm,
    friend_form: FriendForm,
    revision: u64,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("directory", &self.directory)
            .field("messenger", &self.messenger)
            .field("bill_form", &self.bill_form)
            .field("friend_form", &self.friend_form)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Workspace {
    pub fn new(
        backend: Arc<dyn Backend>,
        notifier: Arc<dyn Notifier>,
        messenger: Messenger,
        directory: FriendDirectory,
    ) -> Self {
        Self {
            backend,
            notifier,
            directory,
            messenger,
            bill_form: BillForm::new(),
            friend_form: FriendForm::new(),
            revision: 0,
        }
    }

    pub fn directory(&self) -> &FriendDirectory {
        &self.directory
    }

    pub fn messenger(&self) -> &Messenger {
        &self.messenger
    }

    pub fn messenger_mut(&mut self) -> &mut Messenger {
        &mut self.messenger
    }

    pub fn bill_form(&self) -> &BillForm {
        &self.bill_form
    }

    pub fn bill_form_mut(&mut self) -> &mut BillForm {
        &mut self.bill_form
    }

    pub fn friend_form(&self) -> &FriendForm {
        &self.friend_form
    }

    pub fn friend_form_mut(&mut self) -> &mut FriendForm {
        &mut self.friend_form
    }

    /// Number of refetches since the workspace was created.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Chat
    // ─────────────────────────────────────────────────────────────────────────

    /// Send the messenger's input. Transport failures are alerted.
    pub fn send_message(&mut self) -> bool {
        match self.messenger.send_message() {
            Ok(sent) => sent,
            Err(e) => {
                self.notifier
                    .alert(&format!("Error sending message: {}", e.user_message()));
                false
            }
        }
    }

    pub fn handle_server_event(&mut self, event: ServerEvent) -> &Entry {
        self.messenger.apply(event)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Bill form
    // ─────────────────────────────────────────────────────────────────────────

    pub fn open_bill_form(&mut self) {
        self.bill_form.open(&self.directory);
    }

    pub fn close_bill_form(&mut self) {
        self.bill_form.close();
    }

    pub fn add_participant(&mut self) -> u32 {
        self.bill_form.add_participant(&self.directory)
    }

    pub async fn submit_bill(&mut self) -> Outcome {
        let outcome = self
            .bill_form
            .submit(self.backend.as_ref(), self.notifier.as_ref())
            .await;
        self.after(outcome).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Friend form and directory
    // ─────────────────────────────────────────────────────────────────────────

    pub fn open_friend_form(&mut self) {
        self.friend_form.open();
    }

    pub fn close_friend_form(&mut self) {
        self.friend_form.close();
    }

    pub async fn submit_friend(&mut self) -> Outcome {
        let outcome = self
            .friend_form
            .submit(self.backend.as_ref(), self.notifier.as_ref())
            .await;
        self.after(outcome).await
    }

    pub async fn delete_friend(&mut self, id: FriendId) -> Outcome {
        let outcome = self
            .directory
            .delete_friend(id, self.backend.as_ref(), self.notifier.as_ref())
            .await;
        self.after(outcome).await
    }

    pub async fn download_report(&self, friend: Option<FriendId>, path: &Path) -> bool {
        self.directory
            .download_report(friend, path, self.backend.as_ref(), self.notifier.as_ref())
            .await
    }

    /// Refetch server state and re-bind dependent views.
    pub async fn refresh(&mut self) {
        self.directory.refresh(self.backend.as_ref()).await;
        self.bill_form.refresh_friend_options(&self.directory);
        self.revision += 1;
        tracing::debug!(
            name: "workspace.refreshed",
            revision = self.revision,
            "Workspace refreshed"
        );
    }

    async fn after(&mut self, outcome: Outcome) -> Outcome {
        if outcome.is_committed() {
            self.refresh().await;
        }
        outcome
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    /// Full page HTML.
    pub fn render(&self) -> String {
        html_shell(
            "Chat",
            &format!(
                r#"<div class="flex h-full gap-4">
<aside class="w-72 bg-white rounded-lg shadow">
    <div class="flex justify-between items-center p-3 border-b">
        <h3 class="font-semibold">Friends</h3>
        <button type="button" data-action="open-friend-modal" class="text-blue-500">Add</button>
    </div>
    {friends}
    <button type="button" data-action="open-bill-modal" class="m-3 px-4 py-2 bg-blue-500 text-white rounded">New Bill</button>
</aside>
<section class="flex-1 flex flex-col bg-white rounded-lg shadow">
    {chat}
</section>
</div>
{bill_modal}
{friend_modal}"#,
                friends = self.directory.render(),
                chat = self.messenger.render(),
                bill_modal = self.bill_form.render(),
                friend_modal = self.friend_form.render(),
            ),
        )
    }
}

/// Generate the HTML shell for the application.
fn html_shell(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} - Bill Share</title>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body class="min-h-screen bg-gray-100">
    <main id="app" class="container mx-auto px-4 py-6 h-screen">
        {content}
    </main>
</body>
</html>"#
    )
}
