pub use sea_orm_migration::prelude::*;

mod m20260114_000001_create_assist_request_table;
mod m20260114_000002_create_assist_thread_table;
mod m20260114_000003_create_assist_thread_status_table;
mod m20260115_000004_create_custom_bot_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260114_000001_create_assist_request_table::Migration),
            Box::new(m20260114_000002_create_assist_thread_table::Migration),
            Box::new(m20260114_000003_create_assist_thread_status_table::Migration),
            Box::new(m20260115_000004_create_custom_bot_table::Migration),
        ]
    }
}
