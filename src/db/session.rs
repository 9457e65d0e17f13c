// Mentorlink
// Copyright (C) 2025 Mentorlink contributors

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! The session ledger: one session per accepted request, scheduled strictly
//! in the future, advanced once to a terminal state. Sessions are never
//! deleted.

use chrono::{DateTime, Utc};
use sea_orm::*;
use uuid;

use super::entities::{prelude::*, *};
use crate::data::{Role, SessionOutcome, SessionStatus};
use crate::error::{MentorlinkError, Result};

pub async fn create(
    mentee_id: &str,
    request_id: &str,
    scheduled_at: DateTime<Utc>,
    meeting_link: Option<String>,
    db: &DatabaseConnection,
) -> Result<session::Model> {
    let accepted = super::request::list_accepted(mentee_id, Role::Mentee, db).await?;
    let request = accepted
        .into_iter()
        .find(|r| r.id == request_id)
        .ok_or(MentorlinkError::InvalidOrUnacceptedRequest)?;

    let existing = Session::find()
        .filter(session::Column::RequestId.eq(request_id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(MentorlinkError::DuplicateSession);
    }

    if scheduled_at <= Utc::now() {
        return Err(MentorlinkError::PastSchedule);
    }

    let model = session::ActiveModel {
        id: ActiveValue::Set(uuid::Uuid::new_v4().to_string()),
        mentor_id: ActiveValue::Set(request.mentor_id),
        mentee_id: ActiveValue::Set(request.mentee_id),
        request_id: ActiveValue::Set(request_id.to_owned()),
        scheduled_at: ActiveValue::Set(scheduled_at.to_rfc3339()),
        status: ActiveValue::Set(SessionStatus::Scheduled),
        meeting_link: ActiveValue::Set(meeting_link),
        ..Default::default()
    };

    // The unique index on request_id closes the race between the check above
    // and this insert.
    match model.insert(db).await {
        Ok(entry) => Ok(entry),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(MentorlinkError::DuplicateSession)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn get_by_id(id: &str, db: &DatabaseConnection) -> Result<session::Model> {
    Session::find_by_id(id)
        .one(db)
        .await?
        .ok_or(MentorlinkError::NotFound("session"))
}

/// Administrative transition to a terminal state. Terminal states never
/// reverse.
pub async fn advance(
    id: &str,
    outcome: SessionOutcome,
    db: &DatabaseConnection,
) -> Result<session::Model> {
    let entry = get_by_id(id, db).await?;
    match entry.status {
        SessionStatus::Scheduled => {}
        SessionStatus::Completed | SessionStatus::Cancelled => {
            return Err(MentorlinkError::InvalidTransition(
                "session is already in a terminal state",
            ))
        }
    }

    let mut entry: session::ActiveModel = entry.into();
    entry.status = ActiveValue::Set(outcome.into());
    let entry = entry.update(db).await?;
    Ok(entry)
}

pub async fn list_for_mentor(
    mentor_id: &str,
    db: &DatabaseConnection,
) -> Result<Vec<session::Model>> {
    let entries = Session::find()
        .filter(session::Column::MentorId.eq(mentor_id))
        .order_by(session::Column::ScheduledAt, Order::Desc)
        .all(db)
        .await?;
    Ok(entries)
}

pub async fn list_for_mentee(
    mentee_id: &str,
    db: &DatabaseConnection,
) -> Result<Vec<session::Model>> {
    let entries = Session::find()
        .filter(session::Column::MenteeId.eq(mentee_id))
        .order_by(session::Column::ScheduledAt, Order::Desc)
        .all(db)
        .await?;
    Ok(entries)
}

pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<session::Model>> {
    let entries = Session::find()
        .order_by(session::Column::ScheduledAt, Order::Desc)
        .all(db)
        .await?;
    Ok(entries)
}

pub async fn count(db: &DatabaseConnection) -> Result<u64> {
    let count = Session::find().count(db).await?;
    Ok(count)
}

pub async fn count_completed(db: &DatabaseConnection) -> Result<u64> {
    let count = Session::find()
        .filter(session::Column::Status.eq(SessionStatus::Completed))
        .count(db)
        .await?;
    Ok(count)
}
