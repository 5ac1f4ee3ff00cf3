//! Create weekly winner table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WeeklyWinner::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WeeklyWinner::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WeeklyWinner::RestaurantId).integer().not_null())
                    .col(ColumnDef::new(WeeklyWinner::WeekStartDate).date().not_null())
                    .col(ColumnDef::new(WeeklyWinner::WeekEndDate).date().not_null())
                    .col(
                        ColumnDef::new(WeeklyWinner::VoteCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(WeeklyWinner::IsDraw)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_weekly_winner_restaurant")
                            .from(WeeklyWinner::Table, WeeklyWinner::RestaurantId)
                            .to(Restaurant::Table, Restaurant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one winner per week
        manager
            .create_index(
                Index::create()
                    .name("idx_weekly_winner_week_start_date")
                    .table(WeeklyWinner::Table)
                    .col(WeeklyWinner::WeekStartDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_weekly_winner_week_start_date_restaurant_id")
                    .table(WeeklyWinner::Table)
                    .col(WeeklyWinner::WeekStartDate)
                    .col(WeeklyWinner::RestaurantId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WeeklyWinner::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WeeklyWinner {
    Table,
    Id,
    RestaurantId,
    WeekStartDate,
    WeekEndDate,
    VoteCount,
    IsDraw,
}

#[derive(DeriveIden)]
enum Restaurant {
    Table,
    Id,
}
