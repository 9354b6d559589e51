use sea_orm_migration::prelude::*;

use super::m20260312_000002_create_operators::{Operators, Partners};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(CommissionSettings::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(CommissionSettings::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(
            ColumnDef::new(CommissionSettings::OperatorId)
              .integer()
              .not_null(),
          )
          .col(ColumnDef::new(CommissionSettings::PartnerId).integer().null())
          .col(
            ColumnDef::new(CommissionSettings::CommissionType)
              .string()
              .not_null()
              .default("automatic"),
          )
          .col(
            ColumnDef::new(CommissionSettings::NifDifferentiation)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(
            ColumnDef::new(CommissionSettings::CreatedAt)
              .date_time()
              .not_null(),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_commission_settings_operator")
              .from(CommissionSettings::Table, CommissionSettings::OperatorId)
              .to(Operators::Table, Operators::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_commission_settings_partner")
              .from(CommissionSettings::Table, CommissionSettings::PartnerId)
              .to(Partners::Table, Partners::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_commission_settings_operator")
          .table(CommissionSettings::Table)
          .col(CommissionSettings::OperatorId)
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(CommissionRules::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(CommissionRules::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(
            ColumnDef::new(CommissionRules::SettingId).integer().not_null(),
          )
          .col(ColumnDef::new(CommissionRules::SaleType).string().not_null())
          .col(
            ColumnDef::new(CommissionRules::NifType)
              .string()
              .not_null()
              .default("all"),
          )
          .col(
            ColumnDef::new(CommissionRules::DependsOnLoyalty)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(ColumnDef::new(CommissionRules::LoyaltyMonths).integer().null())
          .col(
            ColumnDef::new(CommissionRules::ClientTypeFilter)
              .string()
              .not_null()
              .default("all"),
          )
          .col(
            ColumnDef::new(CommissionRules::PortfolioFilter)
              .string()
              .not_null()
              .default("all"),
          )
          .col(
            ColumnDef::new(CommissionRules::ClientCategoryId).integer().null(),
          )
          .col(
            ColumnDef::new(CommissionRules::CalculationMethod)
              .string()
              .not_null()
              .default("monthly_multiple"),
          )
          .col(
            ColumnDef::new(CommissionRules::AppliesToSeller)
              .boolean()
              .not_null()
              .default(true),
          )
          .col(
            ColumnDef::new(CommissionRules::AppliesToPartner)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(
            ColumnDef::new(CommissionRules::SellerFixedValue)
              .double()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(CommissionRules::PartnerFixedValue)
              .double()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(CommissionRules::SellerMonthlyMultiplier)
              .double()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(CommissionRules::PartnerMonthlyMultiplier)
              .double()
              .not_null()
              .default(0),
          )
          .col(ColumnDef::new(CommissionRules::CreatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_commission_rules_setting")
              .from(CommissionRules::Table, CommissionRules::SettingId)
              .to(CommissionSettings::Table, CommissionSettings::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_commission_rules_setting")
          .table(CommissionRules::Table)
          .col(CommissionRules::SettingId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(CommissionRules::Table).to_owned())
      .await?;

    manager
      .drop_table(Table::drop().table(CommissionSettings::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum CommissionSettings {
  Table,
  Id,
  OperatorId,
  PartnerId,
  CommissionType,
  NifDifferentiation,
  CreatedAt,
}

#[derive(DeriveIden)]
pub enum CommissionRules {
  Table,
  Id,
  SettingId,
  SaleType,
  NifType,
  DependsOnLoyalty,
  LoyaltyMonths,
  ClientTypeFilter,
  PortfolioFilter,
  ClientCategoryId,
  CalculationMethod,
  AppliesToSeller,
  AppliesToPartner,
  SellerFixedValue,
  PartnerFixedValue,
  SellerMonthlyMultiplier,
  PartnerMonthlyMultiplier,
  CreatedAt,
}
