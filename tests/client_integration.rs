//! HTTP client and workspace tests against an in-process mock backend.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use billshare_client::api::{
    AddFriendRequest, Backend, Client, CreateBillRequest, Friend, ParticipantShare,
};
use billshare_client::error::{Error, Result};
use billshare_client::forms::Outcome;
use billshare_client::messenger::Messenger;
use billshare_client::notify::Notifier;
use billshare_client::realtime::{ClientEvent, EventSink};
use billshare_client::{Workspace, directory::FriendDirectory};

// =============================================================================
// Mock backend
// =============================================================================

#[derive(Clone, Default)]
struct MockState {
    friends: Arc<Mutex<Vec<Friend>>>,
    bills: Arc<Mutex<Vec<Value>>>,
    next_id: Arc<Mutex<i64>>,
}

async fn create_bill(
    State(state): State<MockState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if body["description"].as_str().unwrap_or_default().is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Description is required"})));
    }
    let mut bills = state.bills.lock().unwrap();
    bills.push(body);
    (StatusCode::OK, Json(json!({"success": true, "bill_id": bills.len()})))
}

async fn add_friend(
    State(state): State<MockState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let name = body["name"].as_str().unwrap_or_default().to_string();
    if name.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Name is required"})));
    }
    let id = {
        let mut next = state.next_id.lock().unwrap();
        *next += 1;
        *next
    };
    let friend = Friend {
        id,
        name,
        email: body["email"].as_str().map(str::to_string),
        phone: body["phone"].as_str().map(str::to_string),
    };
    state.friends.lock().unwrap().push(friend.clone());
    (StatusCode::OK, Json(json!({"success": true, "friend": friend})))
}

async fn delete_friend(
    State(state): State<MockState>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    let mut friends = state.friends.lock().unwrap();
    let before = friends.len();
    friends.retain(|friend| friend.id != id);
    if friends.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "Friend not found"})));
    }
    (StatusCode::OK, Json(json!({"success": true})))
}

async fn list_friends(State(state): State<MockState>) -> Json<Vec<Friend>> {
    Json(state.friends.lock().unwrap().clone())
}

async fn download_csv() -> String {
    "Description,Visit Date,Total Amount\nLunch,2024-05-01,50.00\n".to_string()
}

async fn download_friend_csv(Path(id): Path<i64>) -> (StatusCode, String) {
    if id == 404 {
        return (StatusCode::NOT_FOUND, "Not Found".to_string());
    }
    (StatusCode::OK, format!("Friend,{id}\nLunch,25.00\n"))
}

fn mock_app(state: MockState) -> Router {
    Router::new()
        .route("/create_bill", post(create_bill))
        .route("/add_friend", post(add_friend))
        .route("/delete_friend/{id}", delete(delete_friend))
        .route("/api/friends", get(list_friends))
        .route("/download_csv", get(download_csv))
        .route("/download_friend_csv/{id}", get(download_friend_csv))
        .with_state(state)
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn spawn_mock() -> (Client, MockState) {
    let state = MockState::default();
    *state.friends.lock().unwrap() = vec![Friend {
        id: 1,
        name: "Ana".to_string(),
        email: Some("ana@example.com".to_string()),
        phone: None,
    }];
    *state.next_id.lock().unwrap() = 1;
    let base_url = spawn(mock_app(state.clone())).await;
    (Client::new(base_url).unwrap(), state)
}

fn lunch(description: &str) -> CreateBillRequest {
    CreateBillRequest {
        description: description.to_string(),
        visit_details: String::new(),
        visit_date: "2024-05-01".to_string(),
        total_amount: Some(50.0),
        tax_amount: 0.0,
        discount_amount: 0.0,
        participants: vec![ParticipantShare {
            friend_id: 1,
            amount_owed: 50.0,
        }],
    }
}

// =============================================================================
// Client
// =============================================================================

#[tokio::test]
async fn test_create_bill() {
    let (client, state) = spawn_mock().await;

    let response = client.bills().create(&lunch("Lunch")).await.unwrap();
    assert!(response.success);
    assert_eq!(response.bill_id, Some(1));

    let bills = state.bills.lock().unwrap();
    assert_eq!(bills[0]["participants"], json!([{"friend_id": 1, "amount_owed": 50.0}]));
}

#[tokio::test]
async fn test_create_bill_error_body() {
    let (client, state) = spawn_mock().await;

    let err = client.bills().create(&lunch("")).await.unwrap_err();
    assert!(matches!(&err, Error::Rejected(msg) if msg == "Description is required"));
    assert_eq!(err.user_message(), "Description is required");
    assert!(state.bills.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unparsable_total_is_null_on_the_wire() {
    let (client, state) = spawn_mock().await;

    let mut request = lunch("Dinner");
    request.total_amount = None;
    client.bills().create(&request).await.unwrap();

    assert_eq!(state.bills.lock().unwrap()[0]["total_amount"], Value::Null);
}

#[tokio::test]
async fn test_add_list_and_delete_friend() {
    let (client, _state) = spawn_mock().await;

    let response = client
        .friends()
        .add(&AddFriendRequest {
            name: "Bo".to_string(),
            email: String::new(),
            phone: "555-0100".to_string(),
        })
        .await
        .unwrap();
    let added = response.friend.unwrap();
    assert_eq!(added.name, "Bo");

    let friends = client.list_friends().await.unwrap();
    assert_eq!(friends.len(), 2);

    client.friends().delete(added.id).await.unwrap();
    let err = client.friends().delete(added.id).await.unwrap_err();
    assert_eq!(err.user_message(), "Friend not found");
    assert_eq!(client.list_friends().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_download_reports() {
    let (client, _state) = spawn_mock().await;

    let all = client.reports().csv(None).await.unwrap();
    assert!(all.starts_with("Description,Visit Date"));

    let one = client.reports().csv(Some(3)).await.unwrap();
    assert!(one.starts_with("Friend,3"));

    let missing = client.reports().csv(Some(404)).await.unwrap_err();
    assert!(matches!(missing, Error::Api { status: 404, .. }));
}

#[tokio::test]
async fn test_non_json_failure_becomes_api_error() {
    let app = Router::new().route(
        "/create_bill",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let client = Client::new(spawn(app).await).unwrap();

    let err = client.bills().create(&lunch("Lunch")).await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "upstream down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_custom_friends_path() {
    let state = MockState::default();
    let app = Router::new()
        .route("/friends.json", get(list_friends))
        .with_state(state.clone());
    *state.friends.lock().unwrap() = vec![Friend {
        id: 9,
        name: "Cy".to_string(),
        email: None,
        phone: None,
    }];
    let client = Client::new(spawn(app).await).unwrap().with_friends_path("/friends.json");

    let friends = client.list_friends().await.unwrap();
    assert_eq!(friends[0].id, 9);
}

// =============================================================================
// Workspace end to end
// =============================================================================

#[derive(Default)]
struct TestNotifier {
    alerts: Mutex<Vec<String>>,
    decline: bool,
}

impl Notifier for TestNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn confirm(&self, _message: &str) -> bool {
        !self.decline
    }
}

struct DiscardSink;

impl EventSink for DiscardSink {
    fn emit(&self, _event: ClientEvent) -> Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_workspace_friend_bill_and_delete_flow() {
    let (client, state) = spawn_mock().await;
    let notifier = Arc::new(TestNotifier::default());
    let directory = FriendDirectory::new(client.list_friends().await.unwrap());
    let mut ws = Workspace::new(
        Arc::new(client),
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        Messenger::new(Box::new(DiscardSink), 1),
        directory,
    );

    // Add a friend; the refetch makes it selectable.
    ws.open_friend_form();
    ws.friend_form_mut().name = "Bo".to_string();
    assert!(ws.submit_friend().await.is_committed());
    assert_eq!(ws.directory().len(), 2);
    let bo = ws.directory().friends()[1].id;

    // Split a bill with the new friend.
    ws.open_bill_form();
    {
        let form = ws.bill_form_mut();
        form.set_description("Pizza");
        form.set_visit_date("2024-05-02");
        form.set_total("100");
        form.set_tax("8");
        form.set_discount("10");
        assert_eq!(form.final_amount_display(), "$98.00");
        let row = form.row_mut(1).unwrap();
        row.friend = bo.to_string();
        row.amount = "49".to_string();
    }
    assert!(ws.bill_form().render().contains(">Bo</option>"));
    assert!(ws.submit_bill().await.is_committed());
    assert!(!ws.bill_form().is_open());
    {
        let bills = state.bills.lock().unwrap();
        assert_eq!(bills[0]["total_amount"], json!(100.0));
        assert_eq!(bills[0]["participants"][0]["friend_id"], json!(bo));
    }

    // Delete the friend.
    assert!(ws.delete_friend(bo).await.is_committed());
    assert_eq!(ws.directory().len(), 1);

    assert_eq!(
        *notifier.alerts.lock().unwrap(),
        vec![
            "Friend added successfully!".to_string(),
            "Bill created successfully!".to_string(),
            "Friend deleted successfully!".to_string(),
        ]
    );
    assert_eq!(ws.revision(), 3);
}

#[tokio::test]
async fn test_workspace_server_rejection_keeps_form_open() {
    let (client, state) = spawn_mock().await;
    let notifier = Arc::new(TestNotifier::default());
    let mut ws = Workspace::new(
        Arc::new(client),
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        Messenger::new(Box::new(DiscardSink), 1),
        FriendDirectory::new(state.friends.lock().unwrap().clone()),
    );

    ws.open_bill_form();
    {
        let row = ws.bill_form_mut().row_mut(1).unwrap();
        row.friend = "1".to_string();
        row.amount = "20".to_string();
    }

    assert_eq!(ws.submit_bill().await, Outcome::Failed);
    assert!(ws.bill_form().is_open());
    assert_eq!(
        *notifier.alerts.lock().unwrap(),
        vec!["Error creating bill: Description is required".to_string()]
    );
    assert_eq!(ws.revision(), 0);
}
