use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MentorshipRequest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MentorshipRequest::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MentorshipRequest::MentorId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MentorshipRequest::MenteeId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MentorshipRequest::Status)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MentorshipRequest::Message).text())
                    .col(
                        ColumnDef::new(MentorshipRequest::CreatedAt)
                            .date_time()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MentorshipRequest::UpdatedAt)
                            .date_time()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        let db = manager.get_connection();

        // At most one pending request per (mentor, mentee) pair. Partial
        // indexes are not expressible through IndexCreateStatement.
        db.execute_unprepared(
            "CREATE UNIQUE INDEX idx_request_pending_pair
            ON mentorship_request (mentor_id, mentee_id)
            WHERE status = 'pending';",
        )
        .await?;

        db.execute_unprepared(
            "CREATE TRIGGER mentorship_request_updated_at
            AFTER UPDATE ON mentorship_request
            FOR EACH ROW
            BEGIN
                UPDATE mentorship_request
                SET updated_at = (datetime('now'))
                WHERE id = NEW.id;
            END;",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MentorshipRequest::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MentorshipRequest {
    Table,
    Id,
    MentorId,
    MenteeId,
    Status,
    Message,
    CreatedAt,
    UpdatedAt,
}
