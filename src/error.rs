use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::Error as SerdeError;
use std::{io, net};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MentorlinkError {
    #[error("Not found: `{0}`")]
    NotFound(&'static str),
    #[error("Forbidden: `{0}`")]
    Forbidden(&'static str),
    #[error("User is not a mentor")]
    InvalidTarget,
    #[error("A pending request already exists for this mentor")]
    DuplicatePending,
    #[error("A session already exists for this request")]
    DuplicateSession,
    #[error("Invalid or non-accepted request")]
    InvalidOrUnacceptedRequest,
    #[error("Invalid status transition: `{0}`")]
    InvalidTransition(&'static str),
    #[error("Feedback can only be submitted for completed sessions")]
    SessionNotCompleted,
    #[error("Session must be scheduled in the future")]
    PastSchedule,
    #[error("Invalid input: `{0}`")]
    Validation(String),
    #[error("Conflict: `{0}`")]
    Conflict(&'static str),
    #[error("Database error: `{0}`")]
    Db(#[from] DbErr),
    #[error("Serialization/deserialization error: `{0}`")]
    Serde(#[from] SerdeError),
    #[error("I/O error: `{0}`")]
    Io(#[from] io::Error),
    #[error("Configuration error: `{0}`")]
    Figment(#[from] figment::Error),
    #[error("Bind address error: `{0}`")]
    AddrParse(#[from] net::AddrParseError),
}

pub type Result<T> = std::result::Result<T, MentorlinkError>;

impl IntoResponse for MentorlinkError {
    fn into_response(self) -> Response {
        let status = match &self {
            MentorlinkError::NotFound(_) => StatusCode::NOT_FOUND,
            MentorlinkError::Forbidden(_) => StatusCode::FORBIDDEN,
            MentorlinkError::InvalidTarget
            | MentorlinkError::InvalidOrUnacceptedRequest
            | MentorlinkError::InvalidTransition(_)
            | MentorlinkError::SessionNotCompleted
            | MentorlinkError::PastSchedule
            | MentorlinkError::Validation(_) => StatusCode::BAD_REQUEST,
            MentorlinkError::DuplicatePending
            | MentorlinkError::DuplicateSession
            | MentorlinkError::Conflict(_) => StatusCode::CONFLICT,
            MentorlinkError::Db(_)
            | MentorlinkError::Serde(_)
            | MentorlinkError::Io(_)
            | MentorlinkError::Figment(_)
            | MentorlinkError::AddrParse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("{self}");
        }
        (status, self.to_string()).into_response()
    }
}
