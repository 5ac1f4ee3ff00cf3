//! Weekly winner entity: the resolved winner of one Monday-to-Sunday week.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "weekly_winner")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub restaurant_id: i32,

    /// Monday of the week. Unique.
    #[sea_orm(unique)]
    pub week_start_date: Date,

    /// Sunday of the week.
    pub week_end_date: Date,

    /// Votes the restaurant had when the week was resolved.
    pub vote_count: i32,

    /// Set when the week ended in a tie that was resolved by hand.
    pub is_draw: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::restaurant::Entity",
        from = "Column::RestaurantId",
        to = "super::restaurant::Column::Id",
        on_delete = "Cascade"
    )]
    Restaurant,
}

impl Related<super::restaurant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
