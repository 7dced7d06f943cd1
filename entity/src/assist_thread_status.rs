use sea_orm::entity::prelude::*;

/// Terminal disposition of a support request.
///
/// A row exists iff the request was closed, cancelled, or expired. The
/// `requester_inactive` flag distinguishes "solved" from "requester went
/// silent" when a thread exists.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "assist_thread_status")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub request_id: Uuid,
    pub closed_at: DateTimeUtc,
    pub requester_inactive: bool,
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
