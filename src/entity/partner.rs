use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{commission_setting, sale};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "partners")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "commission_setting::Entity")]
  CommissionSettings,
  #[sea_orm(has_many = "sale::Entity")]
  Sales,
}

impl Related<commission_setting::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::CommissionSettings.def()
  }
}

impl Related<sale::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Sales.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
