use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};

/// Consumption ledger entry. Deleting a usage restores its amount to the
/// stock row; both sides happen in one transaction.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_usages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub stock_id: i32,
    pub amount: i32,
    pub used_at: DateTimeUtc,
    pub general_fault_id: Option<i32>,
    pub fault_record_id: Option<i32>,
    pub user_id: Option<i32>,
    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stock::Entity",
        from = "Column::StockId",
        to = "super::stock::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Stock,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::general_fault::Entity",
        from = "Column::GeneralFaultId",
        to = "super::general_fault::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    GeneralFault,
    #[sea_orm(
        belongs_to = "super::fault_record::Entity",
        from = "Column::FaultRecordId",
        to = "super::fault_record::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    FaultRecord,
}

impl Related<super::stock::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stock.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::general_fault::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GeneralFault.def()
    }
}

impl Related<super::fault_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FaultRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
