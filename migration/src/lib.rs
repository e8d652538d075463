pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_project_table;
mod m20240101_000002_create_job_table;

/// Table names created by [`Migrator`], in creation order.
pub const TABLES: &[&str] = &["project", "job"];

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_project_table::Migration),
            Box::new(m20240101_000002_create_job_table::Migration),
        ]
    }
}
