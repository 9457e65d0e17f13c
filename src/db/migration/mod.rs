use sea_orm::DatabaseConnection;
pub use sea_orm_migration::prelude::*;

use crate::error::MentorlinkError;

mod m20250801_000001_create_user;
mod m20250801_000002_create_profile;
mod m20250801_000003_create_availability;
mod m20250801_000004_create_mentorship_request;
mod m20250801_000005_create_session;
mod m20250801_000006_create_feedback;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_user::Migration),
            Box::new(m20250801_000002_create_profile::Migration),
            Box::new(m20250801_000003_create_availability::Migration),
            Box::new(m20250801_000004_create_mentorship_request::Migration),
            Box::new(m20250801_000005_create_session::Migration),
            Box::new(m20250801_000006_create_feedback::Migration),
        ]
    }
}

pub async fn migrate(db: &DatabaseConnection) -> Result<(), MentorlinkError> {
    Migrator::up(db, None).await?;
    Ok(())
}
