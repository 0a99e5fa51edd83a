use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};

/// A logged malfunction event for a single motor.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fault_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub motor_id: i32,
    pub fault_type_id: i32,
    pub description: String,
    pub duration_min: Option<i32>,
    pub occurred_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::motor::Entity",
        from = "Column::MotorId",
        to = "super::motor::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Motor,
    #[sea_orm(
        belongs_to = "super::fault_type::Entity",
        from = "Column::FaultTypeId",
        to = "super::fault_type::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    FaultType,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::motor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Motor.def()
    }
}

impl Related<super::fault_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FaultType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
