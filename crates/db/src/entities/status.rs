//! Status entity (the post that media and tags hang off).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Visibility of a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Scope {
    #[sea_orm(string_value = "public")]
    #[default]
    Public,
    #[sea_orm(string_value = "unlisted")]
    Unlisted,
    #[sea_orm(string_value = "private")]
    Private,
    #[sea_orm(string_value = "direct")]
    Direct,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "status")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    pub profile_id: i64,

    #[sea_orm(column_type = "Text", nullable)]
    pub caption: Option<String>,

    pub scope: Scope,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::ProfileId",
        to = "super::profile::Column::Id",
        on_delete = "Cascade"
    )]
    Profile,

    #[sea_orm(has_many = "super::media::Entity")]
    Media,

    #[sea_orm(has_many = "super::media_tag::Entity")]
    MediaTag,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::media::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Media.def()
    }
}

impl Related<super::media_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MediaTag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
