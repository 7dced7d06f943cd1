use sea_orm::entity::prelude::*;

/// The Discord thread opened for an accepted support request.
///
/// A row exists iff an assistant accepted the request; it is written exactly
/// once and never updated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "assist_thread")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub request_id: Uuid,
    pub thread_id: String,
    pub assistant_id: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assist_request::Entity",
        from = "Column::RequestId",
        to = "super::assist_request::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    AssistRequest,
}

impl Related<super::assist_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssistRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
