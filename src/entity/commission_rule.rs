use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{commission_setting, power_commission_value, sale::SaleType};

/// Coarse NIF taxonomy: leading digit 5 marks collective entities,
/// 1/2/3 individual taxpayers. Not a validity check.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum NifType {
  #[sea_orm(string_value = "all")]
  #[default]
  All,
  #[sea_orm(string_value = "5xx")]
  Coletivo,
  #[sea_orm(string_value = "123xxx")]
  Singular,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ClientTypeFilter {
  #[sea_orm(string_value = "all")]
  #[default]
  All,
  #[sea_orm(string_value = "residencial")]
  Residencial,
  #[sea_orm(string_value = "empresarial")]
  Empresarial,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum PortfolioFilter {
  #[sea_orm(string_value = "all")]
  #[default]
  All,
  #[sea_orm(string_value = "novo")]
  Novo,
  #[sea_orm(string_value = "cliente_carteira")]
  ClienteCarteira,
  #[sea_orm(string_value = "fora_carteira")]
  ForaCarteira,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum CalculationMethod {
  #[sea_orm(string_value = "fixed_per_quantity")]
  FixedPerQuantity,
  #[sea_orm(string_value = "monthly_multiple")]
  #[default]
  MonthlyMultiple,
}

/// Exactly one calculation method governs the base value; the fixed or
/// multiplier fields of the unused method are ignored.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "commission_rules")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub setting_id: i32,
  pub sale_type: SaleType,
  pub nif_type: NifType,
  pub depends_on_loyalty: bool,
  pub loyalty_months: Option<i32>,
  pub client_type_filter: ClientTypeFilter,
  pub portfolio_filter: PortfolioFilter,
  pub client_category_id: Option<i32>,
  pub calculation_method: CalculationMethod,
  pub applies_to_seller: bool,
  pub applies_to_partner: bool,
  pub seller_fixed_value: f64,
  pub partner_fixed_value: f64,
  pub seller_monthly_multiplier: f64,
  pub partner_monthly_multiplier: f64,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "commission_setting::Entity",
    from = "Column::SettingId",
    to = "commission_setting::Column::Id"
  )]
  Setting,
  #[sea_orm(has_many = "power_commission_value::Entity")]
  PowerCommissionValues,
}

impl Related<commission_setting::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Setting.def()
  }
}

impl Related<power_commission_value::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::PowerCommissionValues.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
