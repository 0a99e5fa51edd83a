use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};

/// A production stoppage window. `line` is free text here (shift reports name
/// lines loosely); structured line downtime lives on general_fault_lines.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "production_stops")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub line: String,
    pub started_at: DateTimeUtc,
    pub ended_at: DateTimeUtc,
    pub duration_min: i32,
    pub reason: Option<String>,
    pub general_fault_id: Option<i32>,
    pub created_by: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::general_fault::Entity",
        from = "Column::GeneralFaultId",
        to = "super::general_fault::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    GeneralFault,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::general_fault::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GeneralFault.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
