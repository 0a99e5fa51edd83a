use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};

/// Site-wide fault event, independent of any single motor. Line downtime and
/// file attachments hang off this row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "general_faults")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub description: String,
    pub location: Option<String>,
    pub production_impact: bool,
    pub occurred_at: DateTimeUtc,
    pub reported_by: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReportedBy",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::general_fault_line::Entity")]
    Lines,
    #[sea_orm(has_many = "super::fault_file::Entity")]
    Files,
    #[sea_orm(has_many = "super::stock_usage::Entity")]
    StockUsages,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::general_fault_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lines.def()
    }
}

impl Related<super::fault_file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Files.def()
    }
}

impl Related<super::stock_usage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockUsages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
