use sea_orm::entity::prelude::*;

/// A support request raised by a guild member looking for a human assistant.
///
/// Status is never stored on this row; it is derived from the presence of the
/// related `assist_thread` and `assist_thread_status` rows plus wall-clock time.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "assist_request")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub guild_id: String,
    pub issue: String,
    pub locale: String,
    pub interaction_id: String,
    pub requested_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::assist_thread::Entity")]
    AssistThread,
    #[sea_orm(has_one = "super::assist_thread_status::Entity")]
    AssistThreadStatus,
}

impl Related<super::assist_thread::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssistThread.def()
    }
}

impl Related<super::assist_thread_status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssistThreadStatus.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
