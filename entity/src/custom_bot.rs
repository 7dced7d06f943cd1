use sea_orm::entity::prelude::*;

/// A subscriber-owned secondary bot run as a supervised child process.
///
/// `validation` is false once the stored token failed remote validation.
/// Runtime state (provisioning/running/offline) is not persisted; the process
/// supervisor reconstructs it from the process manager.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "custom_bot")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub username: String,
    pub token: String,
    pub validation: bool,
    pub activity_type: Option<String>,
    pub activity_name: Option<String>,
    pub tier_id: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
