use sea_orm_migration::prelude::*;

use super::{
  m20260312_000001_create_users::Users,
  m20260312_000002_create_operators::Operators,
  m20260312_000003_create_sales::Sales,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .alter_table(
        Table::alter()
          .table(Users::Table)
          .add_column(
            ColumnDef::new(UsersExt::CommissionPercentage)
              .double()
              .not_null()
              .default(0),
          )
          .add_column(
            ColumnDef::new(UsersExt::CommissionThreshold)
              .double()
              .not_null()
              .default(0),
          )
          .to_owned(),
      )
      .await?;

    manager
      .alter_table(
        Table::alter()
          .table(Operators::Table)
          .add_column(
            ColumnDef::new(OperatorsExt::CommissionVisibleToBo)
              .boolean()
              .not_null()
              .default(false),
          )
          .to_owned(),
      )
      .await?;

    manager
      .alter_table(
        Table::alter()
          .table(Sales::Table)
          .add_column(
            ColumnDef::new(SalesExt::IsBackoffice)
              .boolean()
              .not_null()
              .default(false),
          )
          .add_column(
            ColumnDef::new(SalesExt::CommissionBackoffice)
              .double()
              .not_null()
              .default(0),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .alter_table(
        Table::alter()
          .table(Sales::Table)
          .drop_column(SalesExt::IsBackoffice)
          .drop_column(SalesExt::CommissionBackoffice)
          .to_owned(),
      )
      .await?;

    manager
      .alter_table(
        Table::alter()
          .table(Operators::Table)
          .drop_column(OperatorsExt::CommissionVisibleToBo)
          .to_owned(),
      )
      .await?;

    manager
      .alter_table(
        Table::alter()
          .table(Users::Table)
          .drop_column(UsersExt::CommissionPercentage)
          .drop_column(UsersExt::CommissionThreshold)
          .to_owned(),
      )
      .await
  }
}

#[derive(DeriveIden)]
pub enum UsersExt {
  CommissionPercentage,
  CommissionThreshold,
}

#[derive(DeriveIden)]
pub enum OperatorsExt {
  CommissionVisibleToBo,
}

#[derive(DeriveIden)]
pub enum SalesExt {
  IsBackoffice,
  CommissionBackoffice,
}
