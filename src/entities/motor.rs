use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};

/// Registered electric motor. Serial numbers come from the nameplate and are
/// unique across the plant.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "motors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub serial: String,
    pub name: String,
    pub tag: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub power_kw: Option<f64>,
    pub voltage: Option<f64>,
    pub current: Option<f64>,
    pub phase: Option<i32>,
    pub manufacturer: Option<String>,
    pub model_no: Option<String>,
    pub year: Option<i32>,
    pub rpm: Option<i32>,
    pub protection: Option<String>,
    pub connection_type: Option<String>,
    pub last_service: Option<DateTimeUtc>,
    pub next_service: Option<DateTimeUtc>,
    pub is_active: bool,
    pub qr_code: Option<String>,
    pub image_url: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fault_record::Entity")]
    FaultRecords,
    #[sea_orm(has_many = "super::control_device::Entity")]
    ControlDevices,
}

impl Related<super::fault_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FaultRecords.def()
    }
}

impl Related<super::control_device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ControlDevices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
