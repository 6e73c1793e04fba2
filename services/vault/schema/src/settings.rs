use sea_orm::entity::prelude::*;

/// Per-user sync settings. `password` is a client-side-derived unlock check
/// value, never a plaintext password. `session_settings` is a JSON document
/// owned by the service layer.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub public_key: Option<String>,
    pub password: Option<String>,
    pub device_id: Option<String>,
    pub timestamp: Option<i64>,
    pub session_settings: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
