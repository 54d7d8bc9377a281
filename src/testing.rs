//! In-memory doubles for controller tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{ActionResponse, AddFriendRequest, Backend, CreateBillRequest, Friend, FriendId};
use crate::error::{Error, Result};
use crate::notify::Notifier;
use crate::realtime::{ClientEvent, EventSink};

/// A call observed by [`FakeBackend`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    CreateBill(CreateBillRequest),
    AddFriend(AddFriendRequest),
    DeleteFriend(FriendId),
    ListFriends,
    Report(Option<FriendId>),
}

/// How [`FakeBackend`] answers mutating calls.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Success(ActionResponse),
    Rejected(String),
    Transport(String),
}

#[derive(Debug)]
pub(crate) struct FakeBackend {
    pub calls: Mutex<Vec<Call>>,
    pub reply: Mutex<Reply>,
    pub friends: Mutex<Vec<Friend>>,
    pub list_fails: Mutex<bool>,
}

impl FakeBackend {
    pub fn succeeding() -> Self {
        Self::with_reply(Reply::Success(ActionResponse {
            success: true,
            ..ActionResponse::default()
        }))
    }

    pub fn with_reply(reply: Reply) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Mutex::new(reply),
            friends: Mutex::new(Vec::new()),
            list_fails: Mutex::new(false),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn answer(&self) -> Result<ActionResponse> {
        match self.reply.lock().unwrap().clone() {
            Reply::Success(body) => Ok(body),
            Reply::Rejected(message) => Err(Error::Rejected(message)),
            Reply::Transport(message) => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                message,
            ))),
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn create_bill(&self, request: &CreateBillRequest) -> Result<ActionResponse> {
        self.record(Call::CreateBill(request.clone()));
        self.answer()
    }

    async fn add_friend(&self, request: &AddFriendRequest) -> Result<ActionResponse> {
        self.record(Call::AddFriend(request.clone()));
        self.answer()
    }

    async fn delete_friend(&self, id: FriendId) -> Result<ActionResponse> {
        self.record(Call::DeleteFriend(id));
        self.answer()
    }

    async fn list_friends(&self) -> Result<Vec<Friend>> {
        self.record(Call::ListFriends);
        if *self.list_fails.lock().unwrap() {
            return Err(Error::Api {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(self.friends.lock().unwrap().clone())
    }

    async fn download_report(&self, friend: Option<FriendId>) -> Result<String> {
        self.record(Call::Report(friend));
        self.answer()
            .map(|_| "Description,Visit Date\nDinner,2024-05-01\n".to_string())
    }
}

/// Notifier that records prompts and answers confirmations with a fixed value.
#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    pub alerts: Mutex<Vec<String>>,
    pub confirms: Mutex<Vec<String>>,
    pub accept: bool,
}

impl RecordingNotifier {
    pub fn accepting() -> Self {
        Self {
            accept: true,
            ..Self::default()
        }
    }

    pub fn declining() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        self.confirms.lock().unwrap().push(message.to_string());
        self.accept
    }
}

/// Sink that keeps every emitted event.
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub events: Mutex<Vec<ClientEvent>>,
}

impl EventSink for RecordingSink {
    fn emit(&self, event: ClientEvent) -> Result<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

impl EventSink for std::sync::Arc<RecordingSink> {
    fn emit(&self, event: ClientEvent) -> Result<()> {
        self.as_ref().emit(event)
    }
}

pub(crate) fn friend(id: FriendId, name: &str) -> Friend {
    Friend {
        id,
        name: name.to_string(),
        email: None,
        phone: None,
    }
}
