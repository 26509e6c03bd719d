//! User filter entity (mutes and blocks of profiles or instances).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What kind of record a filter points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum FilterableType {
    #[sea_orm(string_value = "profile")]
    Profile,
    #[sea_orm(string_value = "instance")]
    Instance,
}

/// Filter behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    #[sea_orm(string_value = "mute")]
    Mute,
    #[sea_orm(string_value = "block")]
    Block,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_filter")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    /// Account that owns the filter
    pub user_id: i64,

    /// Profile id or instance id depending on `filterable_type`
    pub filterable_id: i64,

    pub filterable_type: FilterableType,

    pub filter_type: FilterType,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
