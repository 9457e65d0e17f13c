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

use sea_orm::*;
use uuid;

use super::entities::{prelude::*, *};
use crate::error::{MentorlinkError, Result};

fn check_time_range(start_time: &str, end_time: &str) -> Result<()> {
    if start_time >= end_time {
        return Err(MentorlinkError::Validation(
            "start time must be before end time".to_owned(),
        ));
    }
    Ok(())
}

pub async fn create(
    mentor_id: &str,
    day_of_week: i32,
    start_time: &str,
    end_time: &str,
    db: &DatabaseConnection,
) -> Result<availability::Model> {
    if !(0..=6).contains(&day_of_week) {
        return Err(MentorlinkError::Validation(
            "day_of_week must be between 0 and 6".to_owned(),
        ));
    }
    check_time_range(start_time, end_time)?;

    let existing = Availability::find()
        .filter(availability::Column::MentorId.eq(mentor_id))
        .filter(availability::Column::DayOfWeek.eq(day_of_week))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(MentorlinkError::Conflict(
            "availability already exists for this day",
        ));
    }

    let model = availability::ActiveModel {
        id: ActiveValue::Set(uuid::Uuid::new_v4().to_string()),
        mentor_id: ActiveValue::Set(mentor_id.to_owned()),
        day_of_week: ActiveValue::Set(day_of_week),
        start_time: ActiveValue::Set(start_time.to_owned()),
        end_time: ActiveValue::Set(end_time.to_owned()),
        is_active: ActiveValue::Set(true),
        ..Default::default()
    };

    match model.insert(db).await {
        Ok(entry) => Ok(entry),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(MentorlinkError::Conflict(
                "availability already exists for this day",
            ))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn list_by_mentor(
    mentor_id: &str,
    db: &DatabaseConnection,
) -> Result<Vec<availability::Model>> {
    let entries = Availability::find()
        .filter(availability::Column::MentorId.eq(mentor_id))
        .order_by(availability::Column::DayOfWeek, Order::Asc)
        .order_by(availability::Column::StartTime, Order::Asc)
        .all(db)
        .await?;
    Ok(entries)
}

async fn get_owned(
    id: &str,
    mentor_id: &str,
    db: &DatabaseConnection,
) -> Result<availability::Model> {
    Availability::find_by_id(id)
        .filter(availability::Column::MentorId.eq(mentor_id))
        .one(db)
        .await?
        .ok_or(MentorlinkError::NotFound("availability"))
}

pub async fn update(
    id: &str,
    mentor_id: &str,
    start_time: Option<String>,
    end_time: Option<String>,
    is_active: Option<bool>,
    db: &DatabaseConnection,
) -> Result<availability::Model> {
    let entry = get_owned(id, mentor_id, db).await?;

    let start = start_time.clone().unwrap_or_else(|| entry.start_time.clone());
    let end = end_time.clone().unwrap_or_else(|| entry.end_time.clone());
    check_time_range(&start, &end)?;

    let mut entry: availability::ActiveModel = entry.into();
    if let Some(start_time) = start_time {
        entry.start_time = ActiveValue::Set(start_time);
    }
    if let Some(end_time) = end_time {
        entry.end_time = ActiveValue::Set(end_time);
    }
    if let Some(is_active) = is_active {
        entry.is_active = ActiveValue::Set(is_active);
    }
    let entry = entry.update(db).await?;
    Ok(entry)
}

pub async fn delete(id: &str, mentor_id: &str, db: &DatabaseConnection) -> Result<()> {
    get_owned(id, mentor_id, db).await?;
    Availability::delete_by_id(id).exec(db).await?;
    Ok(())
}
