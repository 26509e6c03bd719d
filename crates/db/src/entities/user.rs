//! User entity (local accounts).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    /// Always stored lowercased
    #[sea_orm(unique)]
    pub username: String,

    /// Display name
    #[sea_orm(nullable)]
    pub name: Option<String>,

    /// Always stored lowercased
    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 hash
    #[serde(skip_serializing)]
    pub password: String,

    /// Bearer token
    #[sea_orm(unique, nullable)]
    #[serde(skip_serializing)]
    pub token: Option<String>,

    #[sea_orm(default_value = false)]
    pub is_admin: bool,

    /// Whether the follower count is shown on the profile
    #[sea_orm(default_value = true)]
    pub show_profile_follower_count: bool,

    /// Whether the following count is shown on the profile
    #[sea_orm(default_value = true)]
    pub show_profile_following_count: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::profile::Entity")]
    Profile,

    #[sea_orm(has_many = "super::user_filter::Entity")]
    UserFilter,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::user_filter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserFilter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
