//! Moderation log entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mod_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    /// Administrator who performed the action
    pub user_id: i64,

    #[sea_orm(nullable)]
    pub user_username: Option<String>,

    #[sea_orm(nullable)]
    pub object_uid: Option<i64>,

    #[sea_orm(nullable)]
    pub object_id: Option<i64>,

    #[sea_orm(nullable)]
    pub object_type: Option<String>,

    /// e.g. `admin.user.delete`
    pub action: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,

    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub metadata: Option<Json>,

    #[sea_orm(default_value = "admin")]
    pub access_level: String,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTimeWithTimeZone>,
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
