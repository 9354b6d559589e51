use sea_orm_migration::prelude::*;

use super::{
  m20260312_000001_create_users::Users,
  m20260312_000002_create_operators::{ClientCategories, Operators, Partners},
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Sales::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Sales::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Sales::Reference).string().not_null())
          .col(ColumnDef::new(Sales::OperatorId).integer().not_null())
          .col(ColumnDef::new(Sales::PartnerId).integer().null())
          .col(ColumnDef::new(Sales::SellerId).big_integer().not_null())
          .col(ColumnDef::new(Sales::SaleType).string().not_null())
          .col(ColumnDef::new(Sales::ClientNif).string().null())
          .col(ColumnDef::new(Sales::LoyaltyMonths).integer().null())
          .col(
            ColumnDef::new(Sales::ClientType)
              .string()
              .not_null()
              .default("residencial"),
          )
          .col(ColumnDef::new(Sales::PortfolioStatus).string().null())
          .col(ColumnDef::new(Sales::ClientCategoryId).integer().null())
          .col(ColumnDef::new(Sales::Quantity).integer().null())
          .col(
            ColumnDef::new(Sales::MonthlyValue)
              .double()
              .not_null()
              .default(0),
          )
          .col(ColumnDef::new(Sales::PreviousMonthlyValue).double().null())
          .col(ColumnDef::new(Sales::NewMonthlyValue).double().null())
          .col(
            ColumnDef::new(Sales::ContractValue)
              .double()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(Sales::CommissionSeller)
              .double()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(Sales::CommissionPartner)
              .double()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(Sales::Status)
              .string()
              .not_null()
              .default("pendente"),
          )
          .col(ColumnDef::new(Sales::CreatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_sales_operator")
              .from(Sales::Table, Sales::OperatorId)
              .to(Operators::Table, Operators::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_sales_partner")
              .from(Sales::Table, Sales::PartnerId)
              .to(Partners::Table, Partners::Id)
              .on_delete(ForeignKeyAction::SetNull),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_sales_seller")
              .from(Sales::Table, Sales::SellerId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_sales_client_category")
              .from(Sales::Table, Sales::ClientCategoryId)
              .to(ClientCategories::Table, ClientCategories::Id)
              .on_delete(ForeignKeyAction::SetNull),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_sales_operator")
          .table(Sales::Table)
          .col(Sales::OperatorId)
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_sales_seller")
          .table(Sales::Table)
          .col(Sales::SellerId)
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_sales_created_at")
          .table(Sales::Table)
          .col(Sales::CreatedAt)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Sales::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Sales {
  Table,
  Id,
  Reference,
  OperatorId,
  PartnerId,
  SellerId,
  SaleType,
  ClientNif,
  LoyaltyMonths,
  ClientType,
  PortfolioStatus,
  ClientCategoryId,
  Quantity,
  MonthlyValue,
  PreviousMonthlyValue,
  NewMonthlyValue,
  ContractValue,
  CommissionSeller,
  CommissionPartner,
  Status,
  CreatedAt,
}
