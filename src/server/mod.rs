pub mod api;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Router,
};
use clap::Args;
use clap_verbosity_flag::Verbosity;
use sea_orm::Database;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_log::AsTrace;

use crate::db;
use crate::error::MentorlinkError;
use crate::settings::Settings;

#[derive(Debug, Args)]
pub struct ServerArgs {
    /// Verbosity
    #[command(flatten)]
    verbose: Verbosity,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// IP address and port to bind to
    #[arg(short, long)]
    bind: Option<String>,

    /// Path to the sqlite database file
    #[arg(short, long)]
    database: Option<String>,

    /// API authentication token
    #[arg(short, long)]
    auth: Option<String>,
}

async fn authenticate(
    State(state): State<api::ApiState>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok());

    match auth_header {
        Some(auth_header) if auth_header == state.auth => Ok(next.run(req).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

pub fn routes() -> Router<api::ApiState> {
    Router::new()
        .route("/api/v1/users", post(api::post_user).get(api::get_users))
        .route("/api/v1/users/{id}", get(api::get_user))
        .route("/api/v1/users/{id}/role", put(api::put_user_role))
        .route(
            "/api/v1/profiles",
            post(api::post_profile).put(api::put_profile),
        )
        .route("/api/v1/profiles/me", get(api::get_my_profile))
        .route("/api/v1/profiles/{user_id}", get(api::get_profile))
        .route("/api/v1/mentors", get(api::get_mentors))
        .route("/api/v1/availability", post(api::post_availability))
        .route(
            "/api/v1/availability/{id}",
            get(api::get_availability)
                .put(api::put_availability)
                .delete(api::delete_availability),
        )
        .route("/api/v1/requests", post(api::post_request))
        .route("/api/v1/requests/sent", get(api::get_sent_requests))
        .route("/api/v1/requests/received", get(api::get_received_requests))
        .route("/api/v1/requests/accepted", get(api::get_accepted_matches))
        .route("/api/v1/requests/{id}", put(api::put_request))
        .route("/api/v1/sessions", post(api::post_session))
        .route("/api/v1/sessions/mentor", get(api::get_mentor_sessions))
        .route("/api/v1/sessions/mentee", get(api::get_mentee_sessions))
        .route("/api/v1/sessions/{id}/status", put(api::put_session_status))
        .route(
            "/api/v1/sessions/{id}/feedback",
            put(api::put_session_feedback).get(api::get_session_feedback),
        )
        .route("/api/v1/admin/matches", get(api::get_all_matches))
        .route("/api/v1/admin/sessions", get(api::get_all_sessions))
        .route("/api/v1/admin/stats", get(api::get_stats))
        .route("/api/v1/admin/assign", post(api::post_assign_mentor))
}

pub async fn init_server(server: ServerArgs) -> Result<(), MentorlinkError> {
    tracing_subscriber::fmt()
        .with_max_level(server.verbose.log_level_filter().as_trace())
        .init();

    let mut settings = Settings::load(server.config.as_deref())?;
    if let Some(bind) = server.bind {
        settings.bind = bind;
    }
    if let Some(database) = server.database {
        settings.database = database;
    }
    if let Some(auth) = server.auth {
        settings.auth = auth;
    }

    let uri = format!("sqlite://{}?mode=rwc", settings.database);
    let db = Database::connect(&uri).await?;
    db::migration::migrate(&db).await?;

    let state = api::ApiState {
        db,
        auth: settings.auth,
    };

    let app = routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .with_state(state);

    let addr: SocketAddr = settings.bind.parse()?;
    tracing::info!("listening on {addr}");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
