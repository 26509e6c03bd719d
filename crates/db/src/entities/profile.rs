//! Profile entity (local or remote `ActivityPub` actor).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    /// Owning account (NULL = remote profile)
    #[sea_orm(nullable, unique)]
    pub user_id: Option<i64>,

    /// Local part for local profiles, `user@domain` for remote ones
    pub username: String,

    #[sea_orm(nullable)]
    pub name: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,

    /// NULL = local profile
    #[sea_orm(nullable)]
    pub domain: Option<String>,

    #[sea_orm(default_value = false)]
    pub is_private: bool,

    // Denormalized counters
    #[sea_orm(default_value = 0)]
    pub following_count: i32,

    #[sea_orm(default_value = 0)]
    pub followers_count: i32,

    #[sea_orm(default_value = 0)]
    pub status_count: i32,

    /// Canonical actor URI of a remote profile
    #[sea_orm(nullable)]
    pub remote_url: Option<String>,

    #[sea_orm(nullable)]
    pub inbox_url: Option<String>,

    #[sea_orm(nullable)]
    pub outbox_url: Option<String>,

    #[sea_orm(nullable)]
    pub shared_inbox: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub public_key: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    #[serde(skip_serializing)]
    pub private_key: Option<String>,

    #[sea_orm(nullable)]
    pub avatar_url: Option<String>,

    #[sea_orm(nullable)]
    pub last_fetched_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,

    /// Soft delete marker
    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Whether this profile lives on this server.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        self.domain.is_none()
    }
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

    #[sea_orm(has_many = "super::status::Entity")]
    Status,

    #[sea_orm(has_many = "super::media::Entity")]
    Media,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Status.def()
    }
}

impl Related<super::media::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Media.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
