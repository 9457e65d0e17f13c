#[cfg(test)]
use crate::db;
#[cfg(test)]
use crate::server::{self, api::ApiState};
#[cfg(test)]
use axum_test::TestServer;
#[cfg(test)]
use chrono::{Duration, Utc};
#[cfg(test)]
use sea_orm::Database;
#[cfg(test)]
use sea_orm_migration::MigratorTrait;
#[cfg(test)]
use serde_json::{json, Value};

#[cfg(test)]
pub async fn get_test_server() -> TestServer {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db::migration::Migrator::refresh(&db).await.unwrap();

    let state = ApiState {
        db,
        auth: "test".into(),
    };

    let app = server::routes().with_state(state);
    TestServer::new(app).unwrap()
}

#[cfg(test)]
pub async fn register_user(server: &TestServer, email: &str, role: &str) -> String {
    let user: Value = server
        .post("/api/v1/users")
        .json(&json!({ "email": email, "role": role }))
        .await
        .json();
    user["id"].as_str().unwrap().to_owned()
}

/// Mentee sends a request, mentor accepts it. Returns the request id.
#[cfg(test)]
pub async fn make_accepted_match(
    server: &TestServer,
    mentor_id: &str,
    mentee_id: &str,
) -> String {
    let request: Value = server
        .post(&format!("/api/v1/requests?user_id={mentee_id}"))
        .json(&json!({ "mentor_id": mentor_id }))
        .await
        .json();
    let request_id = request["id"].as_str().unwrap().to_owned();

    server
        .put(&format!("/api/v1/requests/{request_id}?user_id={mentor_id}"))
        .json(&json!({ "status": "accepted" }))
        .await
        .assert_status_success();

    request_id
}

/// Schedules a session for tomorrow against an accepted request.
#[cfg(test)]
pub async fn schedule_session(server: &TestServer, mentee_id: &str, request_id: &str) -> String {
    let session: Value = server
        .post(&format!("/api/v1/sessions?user_id={mentee_id}"))
        .json(&json!({
            "request_id": request_id,
            "scheduled_at": (Utc::now() + Duration::days(1)).to_rfc3339(),
        }))
        .await
        .json();
    session["id"].as_str().unwrap().to_owned()
}

#[cfg(test)]
pub async fn complete_session(server: &TestServer, admin_id: &str, session_id: &str) {
    server
        .put(&format!(
            "/api/v1/sessions/{session_id}/status?user_id={admin_id}"
        ))
        .json(&json!({ "status": "completed" }))
        .await
        .assert_status_success();
}
