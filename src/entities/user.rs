use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 hash, never serialized into API responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fault_record::Entity")]
    FaultRecords,
    #[sea_orm(has_many = "super::general_fault::Entity")]
    GeneralFaults,
    #[sea_orm(has_many = "super::action_log::Entity")]
    ActionLogs,
}

impl Related<super::fault_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FaultRecords.def()
    }
}

impl Related<super::general_fault::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GeneralFaults.def()
    }
}

impl Related<super::action_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActionLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
