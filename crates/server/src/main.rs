use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use shared::{
    domain::{TeamRef, User},
    error::{ApiError, ErrorCode},
    protocol::{UpdateSelectionRequest, UpdateSelectionResponse},
};
use storage::Storage;
use tracing::{error, info};

mod config;

use config::{load_settings, prepare_database_url};

#[derive(Clone)]
struct AppState {
    storage: Storage,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    if settings.seed_demo_data && storage.user_count().await? == 0 {
        info!("seeding demo roster into empty database");
        seed_demo_data(&storage).await?;
    }

    let state = AppState { storage };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/teams", get(http_list_teams))
        .route("/api/teams", put(http_update_selection))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_teams(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<User>>, (StatusCode, Json<ApiError>)> {
    let mut roster = state.storage.list_roster().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new(ErrorCode::Internal, e.to_string())),
        )
    })?;

    // Users with no memberships still carry one association on the wire,
    // with a null team id, so every record has the same shape.
    for user in &mut roster {
        if user.team_associations.is_empty() {
            user.team_associations.push(TeamRef::placeholder());
        }
    }

    Ok(Json(roster))
}

async fn http_update_selection(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateSelectionRequest>,
) -> Result<Json<UpdateSelectionResponse>, (StatusCode, Json<ApiError>)> {
    let updated = state
        .storage
        .set_team_selected(req.id, req.is_selected)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new(ErrorCode::Internal, e.to_string())),
            )
        })?;

    // An unknown id is a domain-level rejection, reported in the body
    // rather than through the status code.
    if !updated {
        return Ok(Json(UpdateSelectionResponse::failed(format!(
            "team {} not found",
            req.id.0
        ))));
    }

    info!(team_id = req.id.0, is_selected = req.is_selected, "selection updated");
    Ok(Json(UpdateSelectionResponse::ok()))
}

async fn seed_demo_data(storage: &Storage) -> anyhow::Result<()> {
    let rustaceans = storage
        .create_team(
            "Rustaceans",
            "Realtime judging dashboard",
            "Scope the demo to one track",
            "Systems",
        )
        .await?;
    let brewers = storage
        .create_team(
            "Byte Brewers",
            "Campus coffee logistics",
            "Talk to the catering team",
            "Logistics",
        )
        .await?;

    let priya = storage.create_user("Priya").await?;
    let mateo = storage.create_user("Mateo").await?;
    let noor = storage.create_user("Noor").await?;
    let lena = storage.create_user("Lena").await?;

    storage.add_membership(priya, rustaceans).await?;
    storage.add_membership(mateo, rustaceans).await?;
    storage.add_membership(noor, brewers).await?;
    // Lena has no team yet; the roster endpoint reports her with a null
    // team association.
    let _ = lena;

    Ok(())
}
