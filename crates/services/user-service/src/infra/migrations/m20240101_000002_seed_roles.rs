//! Migration: Seed the static Roles reference data.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_user_tables::Roles;
use domain::SEEDED_ROLES;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert
            .into_table(Roles::Table)
            .columns([Roles::Id, Roles::Role]);
        for (id, name) in SEEDED_ROLES {
            insert.values_panic([(*id).into(), (*name).into()]);
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let ids: Vec<i32> = SEEDED_ROLES.iter().map(|(id, _)| *id).collect();
        let delete = Query::delete()
            .from_table(Roles::Table)
            .and_where(Expr::col(Roles::Id).is_in(ids))
            .to_owned();

        manager.exec_stmt(delete).await
    }
}
