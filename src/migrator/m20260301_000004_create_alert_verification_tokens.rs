use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AlertVerificationTokens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AlertVerificationTokens::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AlertVerificationTokens::AlertId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AlertVerificationTokens::Token)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(AlertVerificationTokens::Used)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AlertVerificationTokens::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AlertVerificationTokens::UsedAt).date_time())
                    // Lookup only: tokens outlive soft-deleted alerts.
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alert_verification_tokens_alert")
                            .from(
                                AlertVerificationTokens::Table,
                                AlertVerificationTokens::AlertId,
                            )
                            .to(Alerts::Table, Alerts::Id)
                            .on_delete(ForeignKeyAction::NoAction)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_alert_verification_tokens_alert_id")
                    .table(AlertVerificationTokens::Table)
                    .col(AlertVerificationTokens::AlertId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(AlertVerificationTokens::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum AlertVerificationTokens {
    Table,
    Id,
    AlertId,
    Token,
    Used,
    CreatedAt,
    UsedAt,
}

#[derive(DeriveIden)]
enum Alerts {
    Table,
    Id,
}
