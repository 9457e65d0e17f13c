use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Availability::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Availability::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Availability::MentorId).string().not_null())
                    .col(
                        ColumnDef::new(Availability::DayOfWeek)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Availability::StartTime).string().not_null())
                    .col(ColumnDef::new(Availability::EndTime).string().not_null())
                    .col(
                        ColumnDef::new(Availability::IsActive)
                            .boolean()
                            .default(true)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Availability::CreatedAt)
                            .date_time()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Availability::UpdatedAt)
                            .date_time()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One slot per mentor per weekday.
        manager
            .create_index(
                Index::create()
                    .name("idx_availability_mentor_day")
                    .table(Availability::Table)
                    .col(Availability::MentorId)
                    .col(Availability::DayOfWeek)
                    .unique()
                    .to_owned(),
            )
            .await?;

        let db = manager.get_connection();

        db.execute_unprepared(
            "CREATE TRIGGER availability_updated_at
            AFTER UPDATE ON availability
            FOR EACH ROW
            BEGIN
                UPDATE availability
                SET updated_at = (datetime('now'))
                WHERE id = NEW.id;
            END;",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Availability::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Availability {
    Table,
    Id,
    MentorId,
    DayOfWeek,
    StartTime,
    EndTime,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
