use sea_orm_migration::prelude::*;

use super::{
  m20260312_000003_create_sales::Sales,
  m20260319_000004_create_commission_settings::CommissionRules,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(PowerCommissionValues::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(PowerCommissionValues::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(
            ColumnDef::new(PowerCommissionValues::RuleId)
              .integer()
              .not_null(),
          )
          .col(
            ColumnDef::new(PowerCommissionValues::PowerValue)
              .string()
              .not_null(),
          )
          .col(
            ColumnDef::new(PowerCommissionValues::SellerValue)
              .double()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(PowerCommissionValues::PartnerValue)
              .double()
              .not_null()
              .default(0),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_power_commission_values_rule")
              .from(PowerCommissionValues::Table, PowerCommissionValues::RuleId)
              .to(CommissionRules::Table, CommissionRules::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_power_commission_values_rule")
          .table(PowerCommissionValues::Table)
          .col(PowerCommissionValues::RuleId)
          .to_owned(),
      )
      .await?;

    manager
      .alter_table(
        Table::alter()
          .table(Sales::Table)
          .add_column(ColumnDef::new(SalesExt::Potencia).string().null())
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .alter_table(
        Table::alter()
          .table(Sales::Table)
          .drop_column(SalesExt::Potencia)
          .to_owned(),
      )
      .await?;

    manager
      .drop_table(
        Table::drop().table(PowerCommissionValues::Table).to_owned(),
      )
      .await
  }
}

#[derive(DeriveIden)]
pub enum PowerCommissionValues {
  Table,
  Id,
  RuleId,
  PowerValue,
  SellerValue,
  PartnerValue,
}

#[derive(DeriveIden)]
pub enum SalesExt {
  Potencia,
}
