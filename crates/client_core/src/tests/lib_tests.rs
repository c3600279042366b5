use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use shared::domain::{TeamRef, UserId};
use tokio::net::TcpListener;

use super::*;

#[derive(Clone)]
struct StubState {
    roster: Arc<Mutex<Vec<User>>>,
    reject_updates_with: Arc<Mutex<Option<String>>>,
}

fn demo_roster() -> Vec<User> {
    vec![
        User {
            id: UserId(1),
            name: "Priya".into(),
            team_associations: vec![TeamRef {
                id: Some(TeamId(10)),
                name: "Rustaceans".into(),
                idea: "Realtime judging".into(),
                suggestions: "Scope the demo".into(),
                tracks: "Systems".into(),
                is_selected: false,
            }],
        },
        User {
            id: UserId(2),
            name: "Mateo".into(),
            team_associations: vec![TeamRef {
                id: Some(TeamId(10)),
                name: "Rustaceans".into(),
                idea: "Realtime judging".into(),
                suggestions: "Scope the demo".into(),
                tracks: "Systems".into(),
                is_selected: false,
            }],
        },
    ]
}

async fn list_teams(State(state): State<StubState>) -> Json<Vec<User>> {
    let roster = state.roster.lock().expect("roster lock");
    Json(roster.clone())
}

async fn update_team(
    State(state): State<StubState>,
    Json(request): Json<UpdateSelectionRequest>,
) -> Json<UpdateSelectionResponse> {
    if let Some(message) = state.reject_updates_with.lock().expect("reject lock").clone() {
        return Json(UpdateSelectionResponse::failed(message));
    }
    let mut roster = state.roster.lock().expect("roster lock");
    for user in roster.iter_mut() {
        for team_ref in &mut user.team_associations {
            if team_ref.id == Some(request.id) {
                team_ref.is_selected = request.is_selected;
            }
        }
    }
    Json(UpdateSelectionResponse::ok())
}

async fn spawn_roster_server(initial: Vec<User>) -> (String, StubState) {
    let state = StubState {
        roster: Arc::new(Mutex::new(initial)),
        reject_updates_with: Arc::new(Mutex::new(None)),
    };
    let app = Router::new()
        .route("/api/teams", get(list_teams))
        .route("/api/teams", put(update_team))
        .with_state(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), state)
}

#[tokio::test]
async fn fetch_roster_deserializes_wire_payload() {
    let (server_url, _state) = spawn_roster_server(demo_roster()).await;
    let client = DashboardClient::new(&server_url).expect("client");

    let roster = client.fetch_roster().await.expect("fetch roster");

    assert_eq!(roster.len(), 2);
    assert_eq!(roster[0].name, "Priya");
    assert_eq!(roster[0].team_associations[0].id, Some(TeamId(10)));
}

#[tokio::test]
async fn selection_update_is_visible_on_next_fetch() {
    let (server_url, _state) = spawn_roster_server(demo_roster()).await;
    let client = DashboardClient::new(&server_url).expect("client");

    client
        .set_selection(TeamId(10), true)
        .await
        .expect("set selection");
    let roster = client.fetch_roster().await.expect("fetch roster");
    let teams = derive_teams(&roster);

    assert!(selection_of(&teams, TeamId(10)).expect("team present"));
}

#[tokio::test]
async fn error_field_in_ok_response_is_a_server_error() {
    let (server_url, state) = spawn_roster_server(demo_roster()).await;
    *state.reject_updates_with.lock().expect("reject lock") =
        Some("team not found".to_string());
    let client = DashboardClient::new(&server_url).expect("client");

    let err = client
        .set_selection(TeamId(10), true)
        .await
        .expect_err("update must fail");

    match err {
        DashboardError::Server(message) => assert!(message.contains("team not found")),
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn rejected_update_leaves_roster_unchanged() {
    let (server_url, state) = spawn_roster_server(demo_roster()).await;
    *state.reject_updates_with.lock().expect("reject lock") =
        Some("team not found".to_string());
    let client = DashboardClient::new(&server_url).expect("client");

    let _ = client.set_selection(TeamId(10), true).await;
    let roster = client.fetch_roster().await.expect("fetch roster");
    let teams = derive_teams(&roster);

    assert!(!selection_of(&teams, TeamId(10)).expect("team present"));
}

#[tokio::test]
async fn unreachable_server_classifies_as_network_error() {
    // Bind then drop the listener so the port is closed when dialed.
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    let client = DashboardClient::new(&format!("http://{addr}")).expect("client");

    let err = client.fetch_roster().await.expect_err("fetch must fail");

    assert!(matches!(err, DashboardError::Network(_)));
}

#[test]
fn malformed_server_url_is_rejected_up_front() {
    let err = DashboardClient::new("not a url").expect_err("must reject");
    assert!(matches!(err, DashboardError::Network(_)));
}
