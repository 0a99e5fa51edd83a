use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "production_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::general_fault_line::Entity")]
    FaultLines,
}

impl Related<super::general_fault_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FaultLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
