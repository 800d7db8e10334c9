use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PlayedDays::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlayedDays::DateKey)
                            .string_len(10)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PlayedDays::PlayedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlayedDays::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PlayedDays {
    Table,
    DateKey, // YYYY-MM-DD, local time
    PlayedAt,
}
