use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};

/// Join row: which production line a general fault hit, and for how long.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "general_fault_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub general_fault_id: i32,
    pub line_id: i32,
    pub downtime_min: i32,
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
    #[sea_orm(
        belongs_to = "super::production_line::Entity",
        from = "Column::LineId",
        to = "super::production_line::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Line,
}

impl Related<super::general_fault::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GeneralFault.def()
    }
}

impl Related<super::production_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Line.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
