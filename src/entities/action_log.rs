use sea_orm::prelude::*;
use serde::{Deserialize, Serialize};

/// Audit trail row for login/register/admin actions.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "action_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub action: String,
    pub description: Option<String>,
    pub general_fault_id: Option<i32>,
    pub created_at: DateTimeUtc,
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
        belongs_to = "super::general_fault::Entity",
        from = "Column::GeneralFaultId",
        to = "super::general_fault::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    GeneralFault,
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

impl ActiveModelBehavior for ActiveModel {}
