use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::data::{
    DashboardStats, ProfileData, ProfileUpdate, RequestDecision, Role, SessionOutcome,
};
use crate::db::{self, entities::user};
use crate::error::MentorlinkError;

#[derive(Clone)]
pub struct ApiState {
    pub db: DatabaseConnection,
    pub auth: String,
}

/// Caller identity, as handed over by the authenticating front layer.
#[derive(Deserialize)]
pub struct QueryActor {
    user_id: String,
}

#[derive(Deserialize)]
pub struct RegisterUser {
    email: String,
    role: Role,
}

#[derive(Deserialize)]
pub struct UpdateUserRole {
    role: Role,
}

#[derive(Deserialize)]
pub struct MentorFilter {
    /// Comma-separated skill list
    skills: Option<String>,
    industry: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateAvailability {
    day_of_week: i32,
    start_time: String,
    end_time: String,
}

#[derive(Deserialize)]
pub struct UpdateAvailability {
    start_time: Option<String>,
    end_time: Option<String>,
    is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateRequest {
    mentor_id: String,
    message: Option<String>,
}

#[derive(Deserialize)]
pub struct DecideRequest {
    status: RequestDecision,
}

#[derive(Deserialize)]
pub struct CreateSession {
    request_id: String,
    scheduled_at: DateTime<Utc>,
    meeting_link: Option<String>,
}

#[derive(Deserialize)]
pub struct AdvanceSession {
    status: SessionOutcome,
}

#[derive(Deserialize)]
pub struct SubmitFeedback {
    rating: Option<i32>,
    comment: Option<String>,
}

#[derive(Deserialize)]
pub struct AssignMentor {
    mentor_id: String,
    mentee_id: String,
}

async fn acting_user(
    user_id: &str,
    db: &DatabaseConnection,
) -> Result<user::Model, MentorlinkError> {
    let user = db::user::resolve(user_id, db).await?;
    if !user.is_active {
        return Err(MentorlinkError::Forbidden("account is deactivated"));
    }
    Ok(user)
}

fn require_mentee(user: &user::Model) -> Result<(), MentorlinkError> {
    match user.role {
        Role::Mentee => Ok(()),
        Role::Mentor | Role::Admin => Err(MentorlinkError::Forbidden("mentee role required")),
    }
}

fn require_mentor(user: &user::Model) -> Result<(), MentorlinkError> {
    match user.role {
        Role::Mentor => Ok(()),
        Role::Mentee | Role::Admin => Err(MentorlinkError::Forbidden("mentor role required")),
    }
}

fn require_admin(user: &user::Model) -> Result<(), MentorlinkError> {
    match user.role {
        Role::Admin => Ok(()),
        Role::Mentor | Role::Mentee => Err(MentorlinkError::Forbidden("admin role required")),
    }
}

/*
Users
*/

pub async fn post_user(
    State(state): State<ApiState>,
    Json(body): Json<RegisterUser>,
) -> Result<impl IntoResponse, MentorlinkError> {
    if body.email.trim().is_empty() {
        return Err(MentorlinkError::Validation(
            "email must not be empty".to_owned(),
        ));
    }
    let user = db::user::create(body.email.trim(), body.role, &state.db).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    Path(id): Path<String>,
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let user = db::user::resolve(&id, &state.db).await?;
    Ok(Json(user))
}

pub async fn get_users(
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    require_admin(&caller)?;
    let users = db::user::list(&state.db).await?;
    Ok(Json(users))
}

pub async fn put_user_role(
    Path(id): Path<String>,
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
    Json(body): Json<UpdateUserRole>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    require_admin(&caller)?;
    let user = db::user::update_role(&id, body.role, &state.db).await?;
    Ok(Json(user))
}

/*
Profiles
*/

pub async fn post_profile(
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
    Json(body): Json<ProfileData>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    let profile = db::profile::create(&caller.id, body, &state.db).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn get_my_profile(
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    let profile = db::profile::get_by_user_id(&caller.id, &state.db).await?;
    Ok(Json(profile))
}

pub async fn get_profile(
    Path(user_id): Path<String>,
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let profile = db::profile::get_by_user_id(&user_id, &state.db).await?;
    Ok(Json(profile))
}

pub async fn put_profile(
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
    Json(body): Json<ProfileUpdate>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    let profile = db::profile::update(&caller.id, body, &state.db).await?;
    Ok(Json(profile))
}

pub async fn get_mentors(
    Query(filter): Query<MentorFilter>,
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let skills: Vec<String> = filter
        .skills
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect();
    let mentors = db::profile::list_mentors(&skills, filter.industry.as_deref(), &state.db).await?;
    Ok(Json(mentors))
}

/*
Availability
*/

pub async fn post_availability(
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
    Json(body): Json<CreateAvailability>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    require_mentor(&caller)?;
    let slot = db::availability::create(
        &caller.id,
        body.day_of_week,
        &body.start_time,
        &body.end_time,
        &state.db,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

pub async fn get_availability(
    Path(mentor_id): Path<String>,
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let slots = db::availability::list_by_mentor(&mentor_id, &state.db).await?;
    Ok(Json(slots))
}

pub async fn put_availability(
    Path(id): Path<String>,
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
    Json(body): Json<UpdateAvailability>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    require_mentor(&caller)?;
    let slot = db::availability::update(
        &id,
        &caller.id,
        body.start_time,
        body.end_time,
        body.is_active,
        &state.db,
    )
    .await?;
    Ok(Json(slot))
}

pub async fn delete_availability(
    Path(id): Path<String>,
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    require_mentor(&caller)?;
    db::availability::delete(&id, &caller.id, &state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}

/*
Mentorship requests
*/

pub async fn post_request(
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
    Json(body): Json<CreateRequest>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    require_mentee(&caller)?;
    let request = db::request::create(&caller.id, &body.mentor_id, body.message, &state.db).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn get_sent_requests(
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    require_mentee(&caller)?;
    let requests = db::request::list_sent(&caller.id, &state.db).await?;
    Ok(Json(requests))
}

pub async fn get_received_requests(
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    require_mentor(&caller)?;
    let requests = db::request::list_received(&caller.id, &state.db).await?;
    Ok(Json(requests))
}

pub async fn get_accepted_matches(
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    let requests = db::request::list_accepted(&caller.id, caller.role, &state.db).await?;
    Ok(Json(requests))
}

pub async fn put_request(
    Path(id): Path<String>,
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
    Json(body): Json<DecideRequest>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    require_mentor(&caller)?;
    let request = db::request::decide(&id, &caller.id, body.status, &state.db).await?;
    Ok(Json(request))
}

/*
Sessions
*/

pub async fn post_session(
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
    Json(body): Json<CreateSession>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    require_mentee(&caller)?;
    let session = db::session::create(
        &caller.id,
        &body.request_id,
        body.scheduled_at,
        body.meeting_link,
        &state.db,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn get_mentor_sessions(
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    require_mentor(&caller)?;
    let sessions = db::session::list_for_mentor(&caller.id, &state.db).await?;
    Ok(Json(sessions))
}

pub async fn get_mentee_sessions(
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    require_mentee(&caller)?;
    let sessions = db::session::list_for_mentee(&caller.id, &state.db).await?;
    Ok(Json(sessions))
}

pub async fn put_session_status(
    Path(id): Path<String>,
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
    Json(body): Json<AdvanceSession>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    require_admin(&caller)?;
    let session = db::session::advance(&id, body.status, &state.db).await?;
    Ok(Json(session))
}

/*
Feedback
*/

pub async fn put_session_feedback(
    Path(id): Path<String>,
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
    Json(body): Json<SubmitFeedback>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    let feedback = db::feedback::submit(
        &id,
        &caller.id,
        caller.role,
        body.rating,
        body.comment,
        &state.db,
    )
    .await?;
    Ok(Json(feedback))
}

pub async fn get_session_feedback(
    Path(id): Path<String>,
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    let feedback = db::feedback::get_for_session(&id, &caller.id, &state.db).await?;
    Ok(Json(feedback))
}

/*
Admin
*/

pub async fn get_all_matches(
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    require_admin(&caller)?;
    let matches = db::request::list_accepted_all(&state.db).await?;
    Ok(Json(matches))
}

pub async fn get_all_sessions(
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    require_admin(&caller)?;
    let sessions = db::session::list_all(&state.db).await?;
    Ok(Json(sessions))
}

pub async fn get_stats(
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    require_admin(&caller)?;
    let stats = DashboardStats {
        total_users: db::user::count(&state.db).await?,
        total_mentors: db::user::count_by_role(Role::Mentor, &state.db).await?,
        total_mentees: db::user::count_by_role(Role::Mentee, &state.db).await?,
        total_matches: db::request::count_accepted(&state.db).await?,
        total_sessions: db::session::count(&state.db).await?,
        completed_sessions: db::session::count_completed(&state.db).await?,
    };
    Ok(Json(stats))
}

pub async fn post_assign_mentor(
    Query(actor): Query<QueryActor>,
    State(state): State<ApiState>,
    Json(body): Json<AssignMentor>,
) -> Result<impl IntoResponse, MentorlinkError> {
    let caller = acting_user(&actor.user_id, &state.db).await?;
    require_admin(&caller)?;
    let request = db::request::assign(&body.mentee_id, &body.mentor_id, &state.db).await?;
    Ok((StatusCode::CREATED, Json(request)))
}




#[cfg(test)]
mod test_request {
    use crate::utils::{get_test_server, make_accepted_match, register_user};
    use axum::http::StatusCode;
    use chrono::{NaiveDateTime, Utc};
    use serde_json::{json, Value};

    #[tokio::test]
    async fn it_should_create_a_pending_request() {
        let server = get_test_server().await;
        let mentor = register_user(&server, "grace@example.com", "mentor").await;
        let mentee = register_user(&server, "ada@example.com", "mentee").await;

        let response = server
            .post(&format!("/api/v1/requests?user_id={mentee}"))
            .json(&json!({ "mentor_id": mentor, "message": "please mentor me" }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let request: Value = response.json();
        assert_eq!(request["status"], "pending");
        assert_eq!(request["mentor_id"], mentor.as_str());
        assert_eq!(request["mentee_id"], mentee.as_str());
    }

    #[tokio::test]
    async fn it_should_reject_non_mentor_targets() {
        let server = get_test_server().await;
        let other = register_user(&server, "bob@example.com", "mentee").await;
        let mentee = register_user(&server, "ada@example.com", "mentee").await;

        server
            .post(&format!("/api/v1/requests?user_id={mentee}"))
            .json(&json!({ "mentor_id": other }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn it_should_forbid_mentors_creating_requests() {
        let server = get_test_server().await;
        let grace = register_user(&server, "grace@example.com", "mentor").await;
        let ruth = register_user(&server, "ruth@example.com", "mentor").await;

        server
            .post(&format!("/api/v1/requests?user_id={grace}"))
            .json(&json!({ "mentor_id": ruth }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn it_should_reject_a_duplicate_pending_request() {
        let server = get_test_server().await;
        let mentor = register_user(&server, "grace@example.com", "mentor").await;
        let mentee = register_user(&server, "ada@example.com", "mentee").await;

        server
            .post(&format!("/api/v1/requests?user_id={mentee}"))
            .json(&json!({ "mentor_id": mentor }))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post(&format!("/api/v1/requests?user_id={mentee}"))
            .json(&json!({ "mentor_id": mentor }))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn it_should_allow_a_new_request_after_rejection() {
        let server = get_test_server().await;
        let mentor = register_user(&server, "grace@example.com", "mentor").await;
        let mentee = register_user(&server, "ada@example.com", "mentee").await;

        let request: Value = server
            .post(&format!("/api/v1/requests?user_id={mentee}"))
            .json(&json!({ "mentor_id": mentor }))
            .await
            .json();
        let request_id = request["id"].as_str().unwrap();

        server
            .put(&format!("/api/v1/requests/{request_id}?user_id={mentor}"))
            .json(&json!({ "status": "rejected" }))
            .await
            .assert_status_success();

        server
            .post(&format!("/api/v1/requests?user_id={mentee}"))
            .json(&json!({ "mentor_id": mentor }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn it_should_forbid_deciding_someone_elses_request() {
        let server = get_test_server().await;
        let grace = register_user(&server, "grace@example.com", "mentor").await;
        let ruth = register_user(&server, "ruth@example.com", "mentor").await;
        let mentee = register_user(&server, "ada@example.com", "mentee").await;

        let request: Value = server
            .post(&format!("/api/v1/requests?user_id={mentee}"))
            .json(&json!({ "mentor_id": grace }))
            .await
            .json();
        let request_id = request["id"].as_str().unwrap();

        server
            .put(&format!("/api/v1/requests/{request_id}?user_id={ruth}"))
            .json(&json!({ "status": "accepted" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn it_should_decide_a_request_only_once() {
        let server = get_test_server().await;
        let mentor = register_user(&server, "grace@example.com", "mentor").await;
        let mentee = register_user(&server, "ada@example.com", "mentee").await;

        let request_id = make_accepted_match(&server, &mentor, &mentee).await;

        server
            .put(&format!("/api/v1/requests/{request_id}?user_id={mentor}"))
            .json(&json!({ "status": "rejected" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn it_should_keep_updated_at_in_utc_after_a_decision() {
        let server = get_test_server().await;
        let mentor = register_user(&server, "grace@example.com", "mentor").await;
        let mentee = register_user(&server, "ada@example.com", "mentee").await;
        let request_id = make_accepted_match(&server, &mentor, &mentee).await;

        let sent: Vec<Value> = server
            .get(&format!("/api/v1/requests/sent?user_id={mentee}"))
            .await
            .json();
        assert_eq!(sent[0]["id"], request_id.as_str());

        let updated_at = sent[0]["updated_at"].as_str().unwrap();
        let parsed = NaiveDateTime::parse_from_str(updated_at, "%Y-%m-%d %H:%M:%S").unwrap();
        let skew = Utc::now().naive_utc() - parsed;
        assert!(skew.num_minutes().abs() < 5, "updated_at skewed: {updated_at}");
    }

    #[tokio::test]
    async fn it_should_list_accepted_matches_for_both_sides() {
        let server = get_test_server().await;
        let mentor = register_user(&server, "grace@example.com", "mentor").await;
        let mentee = register_user(&server, "ada@example.com", "mentee").await;

        let request_id = make_accepted_match(&server, &mentor, &mentee).await;

        let mine: Vec<Value> = server
            .get(&format!("/api/v1/requests/accepted?user_id={mentee}"))
            .await
            .json();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0]["id"], request_id.as_str());

        let theirs: Vec<Value> = server
            .get(&format!("/api/v1/requests/accepted?user_id={mentor}"))
            .await
            .json();
        assert_eq!(theirs.len(), 1);
    }
}

#[cfg(test)]
mod test_session {
    use crate::utils::{
        complete_session, get_test_server, make_accepted_match, register_user, schedule_session,
    };
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};

    #[tokio::test]
    async fn it_should_schedule_a_session() {
        let server = get_test_server().await;
        let mentor = register_user(&server, "grace@example.com", "mentor").await;
        let mentee = register_user(&server, "ada@example.com", "mentee").await;
        let request_id = make_accepted_match(&server, &mentor, &mentee).await;

        let response = server
            .post(&format!("/api/v1/sessions?user_id={mentee}"))
            .json(&json!({
                "request_id": request_id,
                "scheduled_at": (Utc::now() + Duration::days(1)).to_rfc3339(),
                "meeting_link": "https://meet.example.com/abc",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let session: Value = response.json();
        assert_eq!(session["status"], "scheduled");
        assert_eq!(session["mentor_id"], mentor.as_str());
        assert_eq!(session["mentee_id"], mentee.as_str());
        assert_eq!(session["request_id"], request_id.as_str());
    }

    #[tokio::test]
    async fn it_should_reject_unaccepted_requests() {
        let server = get_test_server().await;
        let mentor = register_user(&server, "grace@example.com", "mentor").await;
        let mentee = register_user(&server, "ada@example.com", "mentee").await;

        let request: Value = server
            .post(&format!("/api/v1/requests?user_id={mentee}"))
            .json(&json!({ "mentor_id": mentor }))
            .await
            .json();
        let request_id = request["id"].as_str().unwrap();

        server
            .post(&format!("/api/v1/sessions?user_id={mentee}"))
            .json(&json!({
                "request_id": request_id,
                "scheduled_at": (Utc::now() + Duration::days(1)).to_rfc3339(),
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn it_should_reject_a_second_session_for_one_request() {
        let server = get_test_server().await;
        let mentor = register_user(&server, "grace@example.com", "mentor").await;
        let mentee = register_user(&server, "ada@example.com", "mentee").await;
        let request_id = make_accepted_match(&server, &mentor, &mentee).await;

        schedule_session(&server, &mentee, &request_id).await;

        server
            .post(&format!("/api/v1/sessions?user_id={mentee}"))
            .json(&json!({
                "request_id": request_id,
                "scheduled_at": (Utc::now() + Duration::days(2)).to_rfc3339(),
            }))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn it_should_reject_past_schedules() {
        let server = get_test_server().await;
        let mentor = register_user(&server, "grace@example.com", "mentor").await;
        let mentee = register_user(&server, "ada@example.com", "mentee").await;
        let request_id = make_accepted_match(&server, &mentor, &mentee).await;

        server
            .post(&format!("/api/v1/sessions?user_id={mentee}"))
            .json(&json!({
                "request_id": request_id,
                "scheduled_at": (Utc::now() - Duration::hours(1)).to_rfc3339(),
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        // the current instant is already in the past by the time it is checked
        server
            .post(&format!("/api/v1/sessions?user_id={mentee}"))
            .json(&json!({
                "request_id": request_id,
                "scheduled_at": Utc::now().to_rfc3339(),
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn it_should_advance_once_and_never_reverse() {
        let server = get_test_server().await;
        let admin = register_user(&server, "admin@example.com", "admin").await;
        let mentor = register_user(&server, "grace@example.com", "mentor").await;
        let mentee = register_user(&server, "ada@example.com", "mentee").await;
        let request_id = make_accepted_match(&server, &mentor, &mentee).await;
        let session_id = schedule_session(&server, &mentee, &request_id).await;

        complete_session(&server, &admin, &session_id).await;

        server
            .put(&format!(
                "/api/v1/sessions/{session_id}/status?user_id={admin}"
            ))
            .json(&json!({ "status": "cancelled" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn it_should_forbid_non_admins_advancing_status() {
        let server = get_test_server().await;
        let mentor = register_user(&server, "grace@example.com", "mentor").await;
        let mentee = register_user(&server, "ada@example.com", "mentee").await;
        let request_id = make_accepted_match(&server, &mentor, &mentee).await;
        let session_id = schedule_session(&server, &mentee, &request_id).await;

        server
            .put(&format!(
                "/api/v1/sessions/{session_id}/status?user_id={mentor}"
            ))
            .json(&json!({ "status": "completed" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn it_should_list_sessions_for_both_sides() {
        let server = get_test_server().await;
        let mentor = register_user(&server, "grace@example.com", "mentor").await;
        let mentee = register_user(&server, "ada@example.com", "mentee").await;
        let request_id = make_accepted_match(&server, &mentor, &mentee).await;
        let session_id = schedule_session(&server, &mentee, &request_id).await;

        let mentor_sessions: Vec<Value> = server
            .get(&format!("/api/v1/sessions/mentor?user_id={mentor}"))
            .await
            .json();
        assert_eq!(mentor_sessions.len(), 1);
        assert_eq!(mentor_sessions[0]["id"], session_id.as_str());

        let mentee_sessions: Vec<Value> = server
            .get(&format!("/api/v1/sessions/mentee?user_id={mentee}"))
            .await
            .json();
        assert_eq!(mentee_sessions.len(), 1);
    }
}

#[cfg(test)]
mod test_feedback {
    use crate::utils::{
        complete_session, get_test_server, make_accepted_match, register_user, schedule_session,
    };
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use axum_test::TestServer;

    async fn completed_session(server: &TestServer) -> (String, String, String) {
        let admin = register_user(server, "admin@example.com", "admin").await;
        let mentor = register_user(server, "grace@example.com", "mentor").await;
        let mentee = register_user(server, "ada@example.com", "mentee").await;
        let request_id = make_accepted_match(server, &mentor, &mentee).await;
        let session_id = schedule_session(server, &mentee, &request_id).await;
        complete_session(server, &admin, &session_id).await;
        (session_id, mentor, mentee)
    }

    #[tokio::test]
    async fn it_should_reject_feedback_before_completion() {
        let server = get_test_server().await;
        let mentor = register_user(&server, "grace@example.com", "mentor").await;
        let mentee = register_user(&server, "ada@example.com", "mentee").await;
        let request_id = make_accepted_match(&server, &mentor, &mentee).await;
        let session_id = schedule_session(&server, &mentee, &request_id).await;

        server
            .put(&format!(
                "/api/v1/sessions/{session_id}/feedback?user_id={mentee}"
            ))
            .json(&json!({ "rating": 5, "comment": "great" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn it_should_merge_both_sides_without_clobbering() {
        let server = get_test_server().await;
        let (session_id, mentor, mentee) = completed_session(&server).await;

        server
            .put(&format!(
                "/api/v1/sessions/{session_id}/feedback?user_id={mentee}"
            ))
            .json(&json!({ "rating": 5, "comment": "great" }))
            .await
            .assert_status_success();

        let feedback: Value = server
            .put(&format!(
                "/api/v1/sessions/{session_id}/feedback?user_id={mentor}"
            ))
            .json(&json!({ "comment": "thanks" }))
            .await
            .json();

        assert_eq!(feedback["mentee"]["rating"], 5);
        assert_eq!(feedback["mentee"]["comment"], "great");
        assert_eq!(feedback["mentor"]["comment"], "thanks");
    }

    #[tokio::test]
    async fn it_should_merge_when_the_mentor_submits_first() {
        let server = get_test_server().await;
        let (session_id, mentor, mentee) = completed_session(&server).await;

        server
            .put(&format!(
                "/api/v1/sessions/{session_id}/feedback?user_id={mentor}"
            ))
            .json(&json!({ "comment": "thanks" }))
            .await
            .assert_status_success();

        let feedback: Value = server
            .put(&format!(
                "/api/v1/sessions/{session_id}/feedback?user_id={mentee}"
            ))
            .json(&json!({ "rating": 4, "comment": "solid" }))
            .await
            .json();

        assert_eq!(feedback["mentor"]["comment"], "thanks");
        assert_eq!(feedback["mentee"]["rating"], 4);
        assert_eq!(feedback["mentee"]["comment"], "solid");
    }

    #[tokio::test]
    async fn it_should_overwrite_only_the_submitters_fields() {
        let server = get_test_server().await;
        let (session_id, _mentor, mentee) = completed_session(&server).await;

        server
            .put(&format!(
                "/api/v1/sessions/{session_id}/feedback?user_id={mentee}"
            ))
            .json(&json!({ "rating": 5, "comment": "great" }))
            .await
            .assert_status_success();

        let feedback: Value = server
            .put(&format!(
                "/api/v1/sessions/{session_id}/feedback?user_id={mentee}"
            ))
            .json(&json!({ "rating": 3, "comment": "fine" }))
            .await
            .json();

        assert_eq!(feedback["mentee"]["rating"], 3);
        assert_eq!(feedback["mentee"]["comment"], "fine");
        assert_eq!(feedback["mentor"], Value::Null);
    }

    #[tokio::test]
    async fn it_should_require_a_mentee_rating() {
        let server = get_test_server().await;
        let (session_id, _mentor, mentee) = completed_session(&server).await;

        server
            .put(&format!(
                "/api/v1/sessions/{session_id}/feedback?user_id={mentee}"
            ))
            .json(&json!({ "comment": "no rating" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn it_should_forbid_outsiders() {
        let server = get_test_server().await;
        let (session_id, _mentor, _mentee) = completed_session(&server).await;
        let outsider = register_user(&server, "bob@example.com", "mentee").await;

        server
            .put(&format!(
                "/api/v1/sessions/{session_id}/feedback?user_id={outsider}"
            ))
            .json(&json!({ "rating": 1, "comment": "was not there" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn it_should_read_back_the_merged_record() {
        let server = get_test_server().await;
        let (session_id, mentor, mentee) = completed_session(&server).await;

        server
            .get(&format!(
                "/api/v1/sessions/{session_id}/feedback?user_id={mentor}"
            ))
            .await
            .assert_status_not_found();

        server
            .put(&format!(
                "/api/v1/sessions/{session_id}/feedback?user_id={mentee}"
            ))
            .json(&json!({ "rating": 4 }))
            .await
            .assert_status_success();

        let feedback: Value = server
            .get(&format!(
                "/api/v1/sessions/{session_id}/feedback?user_id={mentor}"
            ))
            .await
            .json();
        assert_eq!(feedback["mentee"]["rating"], 4);
        assert_eq!(feedback["mentor"], Value::Null);
    }
}

#[cfg(test)]
mod test_admin {
    use crate::utils::{
        complete_session, get_test_server, make_accepted_match, register_user, schedule_session,
    };
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};

    #[tokio::test]
    async fn it_should_report_dashboard_stats() {
        let server = get_test_server().await;
        let admin = register_user(&server, "admin@example.com", "admin").await;
        let mentor = register_user(&server, "grace@example.com", "mentor").await;
        let mentee = register_user(&server, "ada@example.com", "mentee").await;
        register_user(&server, "bob@example.com", "mentee").await;

        let request_id = make_accepted_match(&server, &mentor, &mentee).await;
        let session_id = schedule_session(&server, &mentee, &request_id).await;
        complete_session(&server, &admin, &session_id).await;

        let stats: Value = server
            .get(&format!("/api/v1/admin/stats?user_id={admin}"))
            .await
            .json();
        assert_eq!(stats["total_users"], 4);
        assert_eq!(stats["total_mentors"], 1);
        assert_eq!(stats["total_mentees"], 2);
        assert_eq!(stats["total_matches"], 1);
        assert_eq!(stats["total_sessions"], 1);
        assert_eq!(stats["completed_sessions"], 1);
    }

    #[tokio::test]
    async fn it_should_forbid_non_admins() {
        let server = get_test_server().await;
        let mentor = register_user(&server, "grace@example.com", "mentor").await;

        server
            .get(&format!("/api/v1/admin/stats?user_id={mentor}"))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn it_should_assign_a_mentor_directly() {
        let server = get_test_server().await;
        let admin = register_user(&server, "admin@example.com", "admin").await;
        let mentor = register_user(&server, "grace@example.com", "mentor").await;
        let mentee = register_user(&server, "ada@example.com", "mentee").await;

        let response = server
            .post(&format!("/api/v1/admin/assign?user_id={admin}"))
            .json(&json!({ "mentor_id": mentor, "mentee_id": mentee }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let request: Value = response.json();
        assert_eq!(request["status"], "accepted");
        assert_eq!(request["message"], "Assigned by admin");

        // the forced pairing is bookable like any accepted request
        let request_id = request["id"].as_str().unwrap();
        server
            .post(&format!("/api/v1/sessions?user_id={mentee}"))
            .json(&json!({
                "request_id": request_id,
                "scheduled_at": (Utc::now() + Duration::days(1)).to_rfc3339(),
            }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn it_should_reject_assigning_a_non_mentor() {
        let server = get_test_server().await;
        let admin = register_user(&server, "admin@example.com", "admin").await;
        let ada = register_user(&server, "ada@example.com", "mentee").await;
        let bob = register_user(&server, "bob@example.com", "mentee").await;

        server
            .post(&format!("/api/v1/admin/assign?user_id={admin}"))
            .json(&json!({ "mentor_id": ada, "mentee_id": bob }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn it_should_list_all_matches_and_sessions() {
        let server = get_test_server().await;
        let admin = register_user(&server, "admin@example.com", "admin").await;
        let mentor = register_user(&server, "grace@example.com", "mentor").await;
        let mentee = register_user(&server, "ada@example.com", "mentee").await;
        let request_id = make_accepted_match(&server, &mentor, &mentee).await;
        schedule_session(&server, &mentee, &request_id).await;

        let matches: Vec<Value> = server
            .get(&format!("/api/v1/admin/matches?user_id={admin}"))
            .await
            .json();
        assert_eq!(matches.len(), 1);

        let sessions: Vec<Value> = server
            .get(&format!("/api/v1/admin/sessions?user_id={admin}"))
            .await
            .json();
        assert_eq!(sessions.len(), 1);
    }
}
