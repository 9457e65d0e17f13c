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

//! The feedback record: one row per completed session, holding two
//! role-owned contributions. A submission only ever touches the fields of
//! the submitting side.

use sea_orm::*;
use uuid;

use super::entities::{prelude::*, *};
use crate::data::{FeedbackView, MenteeFeedback, MentorFeedback, Role, SessionStatus};
use crate::error::{MentorlinkError, Result};

/// Which side of the session is writing.
enum Side {
    Mentee,
    Mentor,
}

fn view(entry: feedback::Model) -> FeedbackView {
    FeedbackView {
        mentee: entry.rating.map(|rating| MenteeFeedback {
            rating,
            comment: entry.mentee_comment.clone(),
        }),
        mentor: entry
            .mentor_comment
            .clone()
            .map(|comment| MentorFeedback { comment }),
        id: entry.id,
        session_id: entry.session_id,
        created_at: entry.created_at,
    }
}

pub async fn submit(
    session_id: &str,
    acting_user_id: &str,
    acting_role: Role,
    rating: Option<i32>,
    comment: Option<String>,
    db: &DatabaseConnection,
) -> Result<FeedbackView> {
    let session = super::session::get_by_id(session_id, db).await?;

    let side = match acting_role {
        Role::Mentee => {
            if session.mentee_id != acting_user_id {
                return Err(MentorlinkError::Forbidden(
                    "you are not a party to this session",
                ));
            }
            Side::Mentee
        }
        Role::Mentor => {
            if session.mentor_id != acting_user_id {
                return Err(MentorlinkError::Forbidden(
                    "you are not a party to this session",
                ));
            }
            Side::Mentor
        }
        Role::Admin => {
            return Err(MentorlinkError::Forbidden(
                "you are not a party to this session",
            ))
        }
    };

    match session.status {
        SessionStatus::Completed => {}
        SessionStatus::Scheduled | SessionStatus::Cancelled => {
            return Err(MentorlinkError::SessionNotCompleted)
        }
    }

    let rating = match side {
        Side::Mentee => match rating {
            Some(rating) if (1..=5).contains(&rating) => Some(rating),
            Some(_) => {
                return Err(MentorlinkError::Validation(
                    "rating must be between 1 and 5".to_owned(),
                ))
            }
            None => {
                return Err(MentorlinkError::Validation(
                    "mentee feedback requires a rating".to_owned(),
                ))
            }
        },
        Side::Mentor => None,
    };

    let (mentee_comment, mentor_comment) = match side {
        Side::Mentee => (comment.clone(), None),
        Side::Mentor => (None, comment.clone()),
    };
    let model = feedback::ActiveModel {
        id: ActiveValue::Set(uuid::Uuid::new_v4().to_string()),
        session_id: ActiveValue::Set(session_id.to_owned()),
        rating: ActiveValue::Set(rating),
        mentee_comment: ActiveValue::Set(mentee_comment),
        mentor_comment: ActiveValue::Set(mentor_comment),
        ..Default::default()
    };

    // The unique index on session_id arbitrates first submission. On a
    // violation a row already exists (a resubmission, or the other side got
    // there first) and this submission folds into it, touching only the
    // acting side's columns.
    let entry = match model.insert(db).await {
        Ok(entry) => entry,
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            let txn = db.begin().await?;
            let existing = Feedback::find()
                .filter(feedback::Column::SessionId.eq(session_id))
                .one(&txn)
                .await?
                .ok_or(MentorlinkError::NotFound("feedback"))?;
            let mut existing: feedback::ActiveModel = existing.into();
            match side {
                Side::Mentee => {
                    existing.rating = ActiveValue::Set(rating);
                    existing.mentee_comment = ActiveValue::Set(comment);
                }
                Side::Mentor => {
                    existing.mentor_comment = ActiveValue::Set(comment);
                }
            }
            let entry = existing.update(&txn).await?;
            txn.commit().await?;
            entry
        }
        Err(e) => return Err(e.into()),
    };

    Ok(view(entry))
}

/// Party-gated read of the merged feedback record.
pub async fn get_for_session(
    session_id: &str,
    acting_user_id: &str,
    db: &DatabaseConnection,
) -> Result<FeedbackView> {
    let session = super::session::get_by_id(session_id, db).await?;
    if session.mentee_id != acting_user_id && session.mentor_id != acting_user_id {
        return Err(MentorlinkError::Forbidden(
            "you are not a party to this session",
        ));
    }

    let entry = Feedback::find()
        .filter(feedback::Column::SessionId.eq(session_id))
        .one(db)
        .await?
        .ok_or(MentorlinkError::NotFound("feedback"))?;
    Ok(view(entry))
}
