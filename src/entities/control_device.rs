use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};

/// VFD / soft-starter unit. A device either drives one motor
/// (`active_motor_id`) or sits on the shelf as a spare (`is_spare`).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "control_devices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub device_type: String,
    pub serial: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub power_kw: f64,
    pub voltage: f64,
    pub status: Option<String>,
    pub is_spare: bool,
    pub active_motor_id: Option<i32>,
    pub spare_for_motors: Option<String>,
    pub location: Option<String>,
    pub protection: Option<String>,
    pub comm_protocol: Option<String>,
    pub control_type: Option<String>,
    pub firmware: Option<String>,
    pub ramp_up_time: Option<i32>,
    pub ramp_down_time: Option<i32>,
    pub bypass_contact: Option<String>,
    pub year: Option<i32>,
    pub last_service: Option<DateTimeUtc>,
    pub next_service: Option<DateTimeUtc>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub qr_code: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::motor::Entity",
        from = "Column::ActiveMotorId",
        to = "super::motor::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Motor,
}

impl Related<super::motor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Motor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
