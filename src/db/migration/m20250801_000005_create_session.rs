use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Session::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Session::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Session::MentorId).string().not_null())
                    .col(ColumnDef::new(Session::MenteeId).string().not_null())
                    .col(ColumnDef::new(Session::RequestId).string().not_null())
                    .col(ColumnDef::new(Session::ScheduledAt).string().not_null())
                    .col(ColumnDef::new(Session::Status).string().not_null())
                    .col(ColumnDef::new(Session::MeetingLink).string())
                    .col(
                        ColumnDef::new(Session::CreatedAt)
                            .date_time()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Session::UpdatedAt)
                            .date_time()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Exactly one session per request.
        manager
            .create_index(
                Index::create()
                    .name("idx_session_request_id")
                    .table(Session::Table)
                    .col(Session::RequestId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        let db = manager.get_connection();

        db.execute_unprepared(
            "CREATE TRIGGER session_updated_at
            AFTER UPDATE ON session
            FOR EACH ROW
            BEGIN
                UPDATE session
                SET updated_at = (datetime('now'))
                WHERE id = NEW.id;
            END;",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Session::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Session {
    Table,
    Id,
    MentorId,
    MenteeId,
    RequestId,
    ScheduledAt,
    Status,
    MeetingLink,
    CreatedAt,
    UpdatedAt,
}
