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

//! The identity directory: resolves a user id to its role and active flag.

use sea_orm::*;
use uuid;

use super::entities::{prelude::*, *};
use crate::data::Role;
use crate::error::{MentorlinkError, Result};

pub async fn create(email: &str, role: Role, db: &DatabaseConnection) -> Result<user::Model> {
    let model = user::ActiveModel {
        id: ActiveValue::Set(uuid::Uuid::new_v4().to_string()),
        email: ActiveValue::Set(email.to_owned()),
        role: ActiveValue::Set(role),
        is_active: ActiveValue::Set(true),
        ..Default::default()
    };

    match model.insert(db).await {
        Ok(entry) => Ok(entry),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(MentorlinkError::Conflict("email is already registered"))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn get_by_id(id: &str, db: &DatabaseConnection) -> Result<Option<user::Model>> {
    let entry = User::find_by_id(id).one(db).await?;
    Ok(entry)
}

/// Like [`get_by_id`], but an unknown id is an error.
pub async fn resolve(id: &str, db: &DatabaseConnection) -> Result<user::Model> {
    get_by_id(id, db)
        .await?
        .ok_or(MentorlinkError::NotFound("user"))
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    let entries = User::find()
        .order_by(user::Column::CreatedAt, Order::Desc)
        .all(db)
        .await?;
    Ok(entries)
}

pub async fn update_role(id: &str, role: Role, db: &DatabaseConnection) -> Result<user::Model> {
    let entry = resolve(id, db).await?;
    let mut entry: user::ActiveModel = entry.into();
    entry.role = ActiveValue::Set(role);
    let entry = entry.update(db).await?;
    Ok(entry)
}

pub async fn count(db: &DatabaseConnection) -> Result<u64> {
    let count = User::find().count(db).await?;
    Ok(count)
}

pub async fn count_by_role(role: Role, db: &DatabaseConnection) -> Result<u64> {
    let count = User::find()
        .filter(user::Column::Role.eq(role))
        .count(db)
        .await?;
    Ok(count)
}
