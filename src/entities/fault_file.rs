use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fault_files")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub general_fault_id: i32,
    pub url: String,
    pub file_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::general_fault::Entity",
        from = "Column::GeneralFaultId",
        to = "super::general_fault::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    GeneralFault,
}

impl Related<super::general_fault::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GeneralFault.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
