use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{commission_rule, operator, partner};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum CommissionType {
  #[sea_orm(string_value = "manual")]
  Manual,
  #[sea_orm(string_value = "automatic")]
  #[default]
  Automatic,
  #[sea_orm(string_value = "per_power")]
  PerPower,
}

/// A row with `partner_id = NULL` is the operator-wide default; a row
/// scoped to a partner overrides it for that partner only.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "commission_settings")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub operator_id: i32,
  pub partner_id: Option<i32>,
  pub commission_type: CommissionType,
  pub nif_differentiation: bool,
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
  #[sea_orm(has_many = "commission_rule::Entity")]
  CommissionRules,
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

impl Related<commission_rule::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::CommissionRules.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
