use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fault_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fault_record::Entity")]
    FaultRecords,
}

impl Related<super::fault_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FaultRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
