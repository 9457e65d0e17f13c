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

//! The request ledger: creation and the one-shot pending -> accepted/rejected
//! transition of mentorship requests. Requests are never deleted.

use sea_orm::*;
use uuid;

use super::entities::{prelude::*, *};
use crate::data::{RequestDecision, RequestStatus, Role};
use crate::error::{MentorlinkError, Result};

pub async fn create(
    mentee_id: &str,
    mentor_id: &str,
    message: Option<String>,
    db: &DatabaseConnection,
) -> Result<mentorship_request::Model> {
    let mentor = super::user::resolve(mentor_id, db).await?;
    match mentor.role {
        Role::Mentor => {}
        Role::Mentee | Role::Admin => return Err(MentorlinkError::InvalidTarget),
    }

    let existing = MentorshipRequest::find()
        .filter(mentorship_request::Column::MentorId.eq(mentor_id))
        .filter(mentorship_request::Column::MenteeId.eq(mentee_id))
        .filter(mentorship_request::Column::Status.eq(RequestStatus::Pending))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(MentorlinkError::DuplicatePending);
    }

    let model = mentorship_request::ActiveModel {
        id: ActiveValue::Set(uuid::Uuid::new_v4().to_string()),
        mentor_id: ActiveValue::Set(mentor_id.to_owned()),
        mentee_id: ActiveValue::Set(mentee_id.to_owned()),
        status: ActiveValue::Set(RequestStatus::Pending),
        message: ActiveValue::Set(message),
        ..Default::default()
    };

    // The partial unique index on pending pairs closes the race between the
    // check above and this insert.
    match model.insert(db).await {
        Ok(entry) => Ok(entry),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(MentorlinkError::DuplicatePending)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn decide(
    request_id: &str,
    acting_mentor_id: &str,
    decision: RequestDecision,
    db: &DatabaseConnection,
) -> Result<mentorship_request::Model> {
    let entry = MentorshipRequest::find_by_id(request_id)
        .one(db)
        .await?
        .ok_or(MentorlinkError::NotFound("request"))?;

    if entry.mentor_id != acting_mentor_id {
        return Err(MentorlinkError::Forbidden(
            "you can only decide your own requests",
        ));
    }
    match entry.status {
        RequestStatus::Pending => {}
        RequestStatus::Accepted | RequestStatus::Rejected => {
            return Err(MentorlinkError::InvalidTransition(
                "only pending requests can be decided",
            ))
        }
    }

    let mut entry: mentorship_request::ActiveModel = entry.into();
    entry.status = ActiveValue::Set(decision.into());
    let entry = entry.update(db).await?;
    Ok(entry)
}

pub async fn list_sent(
    mentee_id: &str,
    db: &DatabaseConnection,
) -> Result<Vec<mentorship_request::Model>> {
    let entries = MentorshipRequest::find()
        .filter(mentorship_request::Column::MenteeId.eq(mentee_id))
        .order_by(mentorship_request::Column::CreatedAt, Order::Desc)
        .all(db)
        .await?;
    Ok(entries)
}

pub async fn list_received(
    mentor_id: &str,
    db: &DatabaseConnection,
) -> Result<Vec<mentorship_request::Model>> {
    let entries = MentorshipRequest::find()
        .filter(mentorship_request::Column::MentorId.eq(mentor_id))
        .order_by(mentorship_request::Column::CreatedAt, Order::Desc)
        .all(db)
        .await?;
    Ok(entries)
}

/// Accepted matches for the caller, most recently decided first. The session
/// ledger validates booking eligibility against this set.
pub async fn list_accepted(
    user_id: &str,
    role: Role,
    db: &DatabaseConnection,
) -> Result<Vec<mentorship_request::Model>> {
    let side = match role {
        Role::Mentor => mentorship_request::Column::MentorId.eq(user_id),
        Role::Mentee => mentorship_request::Column::MenteeId.eq(user_id),
        Role::Admin => {
            return Err(MentorlinkError::Forbidden(
                "admins are not a party to mentorship matches",
            ))
        }
    };

    let entries = MentorshipRequest::find()
        .filter(side)
        .filter(mentorship_request::Column::Status.eq(RequestStatus::Accepted))
        .order_by(mentorship_request::Column::UpdatedAt, Order::Desc)
        .all(db)
        .await?;
    Ok(entries)
}

pub async fn list_accepted_all(
    db: &DatabaseConnection,
) -> Result<Vec<mentorship_request::Model>> {
    let entries = MentorshipRequest::find()
        .filter(mentorship_request::Column::Status.eq(RequestStatus::Accepted))
        .order_by(mentorship_request::Column::UpdatedAt, Order::Desc)
        .all(db)
        .await?;
    Ok(entries)
}

pub async fn count_accepted(db: &DatabaseConnection) -> Result<u64> {
    let count = MentorshipRequest::find()
        .filter(mentorship_request::Column::Status.eq(RequestStatus::Accepted))
        .count(db)
        .await?;
    Ok(count)
}

/// Admin forced pairing: inserts an already-accepted request.
pub async fn assign(
    mentee_id: &str,
    mentor_id: &str,
    db: &DatabaseConnection,
) -> Result<mentorship_request::Model> {
    let mentor = super::user::resolve(mentor_id, db).await?;
    match mentor.role {
        Role::Mentor => {}
        Role::Mentee | Role::Admin => return Err(MentorlinkError::InvalidTarget),
    }
    super::user::resolve(mentee_id, db).await?;

    let model = mentorship_request::ActiveModel {
        id: ActiveValue::Set(uuid::Uuid::new_v4().to_string()),
        mentor_id: ActiveValue::Set(mentor_id.to_owned()),
        mentee_id: ActiveValue::Set(mentee_id.to_owned()),
        status: ActiveValue::Set(RequestStatus::Accepted),
        message: ActiveValue::Set(Some("Assigned by admin".to_owned())),
        ..Default::default()
    };
    let entry = model.insert(db).await?;
    Ok(entry)
}
