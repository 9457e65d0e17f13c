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
use crate::data::{ProfileData, ProfileUpdate, ProfileView, Role};
use crate::error::{MentorlinkError, Result};

fn view(entry: profile::Model) -> Result<ProfileView> {
    Ok(ProfileView {
        id: entry.id,
        user_id: entry.user_id,
        name: entry.name,
        bio: entry.bio,
        skills: serde_json::from_str(&entry.skills)?,
        goals: serde_json::from_str(&entry.goals)?,
        industry: entry.industry,
        created_at: entry.created_at,
        updated_at: entry.updated_at,
    })
}

pub async fn create(
    user_id: &str,
    data: ProfileData,
    db: &DatabaseConnection,
) -> Result<ProfileView> {
    let existing = Profile::find()
        .filter(profile::Column::UserId.eq(user_id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(MentorlinkError::Conflict(
            "profile already exists for this user",
        ));
    }

    let model = profile::ActiveModel {
        id: ActiveValue::Set(uuid::Uuid::new_v4().to_string()),
        user_id: ActiveValue::Set(user_id.to_owned()),
        name: ActiveValue::Set(data.name),
        bio: ActiveValue::Set(data.bio),
        skills: ActiveValue::Set(serde_json::to_string(&data.skills)?),
        goals: ActiveValue::Set(serde_json::to_string(&data.goals)?),
        industry: ActiveValue::Set(data.industry),
        ..Default::default()
    };

    match model.insert(db).await {
        Ok(entry) => view(entry),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(MentorlinkError::Conflict(
                "profile already exists for this user",
            ))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn get_by_user_id(user_id: &str, db: &DatabaseConnection) -> Result<ProfileView> {
    let entry = Profile::find()
        .filter(profile::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(MentorlinkError::NotFound("profile"))?;
    view(entry)
}

pub async fn update(
    user_id: &str,
    update: ProfileUpdate,
    db: &DatabaseConnection,
) -> Result<ProfileView> {
    let entry = Profile::find()
        .filter(profile::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(MentorlinkError::NotFound("profile"))?;

    let mut entry: profile::ActiveModel = entry.into();
    if let Some(name) = update.name {
        entry.name = ActiveValue::Set(name);
    }
    if let Some(bio) = update.bio {
        entry.bio = ActiveValue::Set(Some(bio));
    }
    if let Some(skills) = update.skills {
        entry.skills = ActiveValue::Set(serde_json::to_string(&skills)?);
    }
    if let Some(goals) = update.goals {
        entry.goals = ActiveValue::Set(serde_json::to_string(&goals)?);
    }
    if let Some(industry) = update.industry {
        entry.industry = ActiveValue::Set(Some(industry));
    }
    let entry = entry.update(db).await?;
    view(entry)
}

/// Mentor discovery: profiles of mentor-role users, optionally narrowed to
/// those sharing at least one requested skill and/or an exact industry.
pub async fn list_mentors(
    skills: &[String],
    industry: Option<&str>,
    db: &DatabaseConnection,
) -> Result<Vec<ProfileView>> {
    let mentor_ids: Vec<String> = User::find()
        .filter(user::Column::Role.eq(Role::Mentor))
        .all(db)
        .await?
        .into_iter()
        .map(|u| u.id)
        .collect();

    let entries = Profile::find()
        .filter(profile::Column::UserId.is_in(mentor_ids))
        .order_by(profile::Column::CreatedAt, Order::Desc)
        .all(db)
        .await?;

    let mut views = Vec::with_capacity(entries.len());
    for entry in entries {
        let v = view(entry)?;
        if !skills.is_empty() && !skills.iter().any(|s| v.skills.contains(s)) {
            continue;
        }
        if let Some(industry) = industry {
            if v.industry.as_deref() != Some(industry) {
                continue;
            }
        }
        views.push(v);
    }
    Ok(views)
}
