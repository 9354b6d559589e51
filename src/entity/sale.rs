use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{client_category, operator, partner, user};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum SaleType {
  #[sea_orm(string_value = "ni")]
  #[default]
  Ni,
  #[sea_orm(string_value = "mc")]
  Mc,
  #[sea_orm(string_value = "refid")]
  Refid,
  #[sea_orm(string_value = "refid_acrescimo")]
  RefidAcrescimo,
  #[sea_orm(string_value = "refid_decrescimo")]
  RefidDecrescimo,
  #[sea_orm(string_value = "up_sell")]
  UpSell,
  #[sea_orm(string_value = "cross_sell")]
  CrossSell,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ClientType {
  #[sea_orm(string_value = "residencial")]
  #[default]
  Residencial,
  #[sea_orm(string_value = "empresarial")]
  Empresarial,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum PortfolioStatus {
  #[sea_orm(string_value = "novo")]
  #[default]
  Novo,
  #[sea_orm(string_value = "cliente_carteira")]
  ClienteCarteira,
  #[sea_orm(string_value = "fora_carteira")]
  ForaCarteira,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum SaleStatus {
  #[sea_orm(string_value = "pendente")]
  #[default]
  Pendente,
  #[sea_orm(string_value = "ativo")]
  Ativo,
  #[sea_orm(string_value = "cancelado")]
  Cancelado,
}

/// Commission fields are written only by the calculator or by an
/// explicit admin/backoffice override.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub reference: String,
  pub operator_id: i32,
  pub partner_id: Option<i32>,
  pub seller_id: i64,
  pub sale_type: SaleType,
  pub client_nif: Option<String>,
  pub loyalty_months: Option<i32>,
  pub client_type: ClientType,
  pub portfolio_status: Option<PortfolioStatus>,
  pub client_category_id: Option<i32>,
  pub quantity: Option<i32>,
  pub monthly_value: f64,
  pub previous_monthly_value: Option<f64>,
  pub new_monthly_value: Option<f64>,
  pub potencia: Option<String>,
  pub contract_value: f64,
  pub commission_seller: f64,
  pub commission_partner: f64,
  pub commission_backoffice: f64,
  pub is_backoffice: bool,
  pub status: SaleStatus,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "operator::Entity",
    from = "Column::OperatorId",
    to = "operator::Column::Id"
  )]
  Operator,
  #[sea_orm(
    belongs_to = "partner::Entity",
    from = "Column::PartnerId",
    to = "partner::Column::Id"
  )]
  Partner,
  #[sea_orm(
    belongs_to = "user::Entity",
    from = "Column::SellerId",
    to = "user::Column::Id"
  )]
  Seller,
  #[sea_orm(
    belongs_to = "client_category::Entity",
    from = "Column::ClientCategoryId",
    to = "client_category::Column::Id"
  )]
  ClientCategory,
}

impl Related<operator::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Operator.def()
  }
}

impl Related<partner::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Partner.def()
  }
}

impl Related<user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Seller.def()
  }
}

impl Related<client_category::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::ClientCategory.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
