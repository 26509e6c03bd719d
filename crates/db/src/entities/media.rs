//! Media entity (an uploaded or federated attachment).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "media")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    /// Owning status (NULL until attached)
    #[sea_orm(nullable)]
    pub status_id: Option<i64>,

    pub profile_id: i64,

    /// Storage key in local storage
    #[sea_orm(nullable)]
    pub media_path: Option<String>,

    /// Source URL of federated media
    #[sea_orm(nullable)]
    pub remote_url: Option<String>,

    #[sea_orm(default_value = false)]
    pub remote_media: bool,

    /// Public URL once pushed to cloud storage
    #[sea_orm(nullable)]
    pub cdn_url: Option<String>,

    #[sea_orm(nullable)]
    pub thumbnail_path: Option<String>,

    #[sea_orm(nullable)]
    pub thumbnail_url: Option<String>,

    #[sea_orm(nullable)]
    pub optimized_url: Option<String>,

    /// Alt text
    #[sea_orm(column_type = "Text", nullable)]
    pub caption: Option<String>,

    #[sea_orm(nullable)]
    pub license: Option<String>,

    #[sea_orm(default_value = false)]
    pub is_nsfw: bool,

    /// `landscape`, `portrait` or `square`
    #[sea_orm(nullable)]
    pub orientation: Option<String>,

    #[sea_orm(nullable)]
    pub filter_name: Option<String>,

    #[sea_orm(nullable)]
    pub filter_class: Option<String>,

    #[sea_orm(nullable)]
    pub mime: Option<String>,

    /// Size in bytes
    #[sea_orm(nullable)]
    pub size: Option<i64>,

    #[sea_orm(nullable)]
    pub width: Option<i32>,

    #[sea_orm(nullable)]
    pub height: Option<i32>,

    #[sea_orm(nullable)]
    pub blurhash: Option<String>,

    /// Representation version (filters only exist in v1)
    #[sea_orm(default_value = 1)]
    pub version: i32,

    /// Position within the status
    #[sea_orm(default_value = 0)]
    pub order: i32,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
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

    #[sea_orm(
        belongs_to = "super::status::Entity",
        from = "Column::StatusId",
        to = "super::status::Column::Id",
        on_delete = "SetNull"
    )]
    Status,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Status.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
