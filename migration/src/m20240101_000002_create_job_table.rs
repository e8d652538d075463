use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table("job")
                    .if_not_exists()
                    .col(string("uuid").primary_key())
                    .col(string("name").not_null())
                    .col(string("project_uuid").not_null())
                    .col(string("pipeline_uuid").not_null())
                    .col(string_len("status", 16).not_null())
                    .col(timestamp_with_time_zone("created_time").default(Expr::current_timestamp()).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_project")
                            .from("job", "project_uuid")
                            .to("project", "uuid")
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_project_uuid")
                    .table("job")
                    .col("project_uuid")
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table("job").to_owned())
            .await
    }
}
