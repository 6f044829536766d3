use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdminUsers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AdminUsers::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(AdminUsers::Username)
                            .string_len(80)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AdminUsers::PasswordHash).string_len(255).not_null())
                    .col(flag(AdminUsers::CanManageProducts))
                    .col(flag(AdminUsers::CanManageOrders))
                    .col(flag(AdminUsers::CanManageReviews))
                    .col(flag(AdminUsers::CanManageAdmins))
                    .col(
                        ColumnDef::new(AdminUsers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AdminUsers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdminActivities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminActivities::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdminActivities::AdminId).uuid().not_null())
                    .col(ColumnDef::new(AdminActivities::Action).text().not_null())
                    .col(
                        ColumnDef::new(AdminActivities::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_admin_activities_admin")
                            .from(AdminActivities::Table, AdminActivities::AdminId)
                            .to(AdminUsers::Table, AdminUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_admin_activities_timestamp")
                    .table(AdminActivities::Table)
                    .col(AdminActivities::Timestamp)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminActivities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AdminUsers::Table).to_owned())
            .await
    }
}

fn flag(column: AdminUsers) -> ColumnDef {
    ColumnDef::new(column)
        .boolean()
        .not_null()
        .default(false)
        .to_owned()
}

#[derive(DeriveIden)]
enum AdminUsers {
    Table,
    Id,
    Username,
    PasswordHash,
    CanManageProducts,
    CanManageOrders,
    CanManageReviews,
    CanManageAdmins,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AdminActivities {
    Table,
    Id,
    AdminId,
    Action,
    Timestamp,
}
