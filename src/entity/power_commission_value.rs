use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::commission_rule;

/// Discrete power tier of a `per_power` rule. The rating is kept as the
/// verbatim string (e.g. "3.45", "6.9") so lookups are exact-equality,
/// never float comparison.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "power_commission_values")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub rule_id: i32,
  pub power_value: String,
  pub seller_value: f64,
  pub partner_value: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "commission_rule::Entity",
    from = "Column::RuleId",
    to = "commission_rule::Column::Id"
  )]
  Rule,
}

impl Related<commission_rule::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Rule.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
