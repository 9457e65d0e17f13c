use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Feedback::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Feedback::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Feedback::SessionId).string().not_null())
                    .col(ColumnDef::new(Feedback::Rating).integer())
                    .col(ColumnDef::new(Feedback::MenteeComment).text())
                    .col(ColumnDef::new(Feedback::MentorComment).text())
                    .col(
                        ColumnDef::new(Feedback::CreatedAt)
                            .date_time()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One feedback row per session, both contributions merged into it.
        manager
            .create_index(
                Index::create()
                    .name("idx_feedback_session_id")
                    .table(Feedback::Table)
                    .col(Feedback::SessionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Feedback::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Feedback {
    Table,
    Id,
    SessionId,
    Rating,
    MenteeComment,
    MentorComment,
    CreatedAt,
}
