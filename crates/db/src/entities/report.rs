//! Report entity (a profile reporting another profile or its content).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    /// Reporter
    pub profile_id: i64,

    /// Subject of the report
    pub reported_profile_id: i64,

    pub object_id: i64,

    pub object_type: String,

    /// e.g. `spam`, `sensitive`
    pub report_type: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,

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
    Reporter,

    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::ReportedProfileId",
        to = "super::profile::Column::Id",
        on_delete = "Cascade"
    )]
    Reported,
}

impl ActiveModelBehavior for ActiveModel {}
