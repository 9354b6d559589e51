use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sale;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum UserRole {
  #[sea_orm(string_value = "admin")]
  Admin,
  #[sea_orm(string_value = "backoffice")]
  Backoffice,
  #[sea_orm(string_value = "seller")]
  #[default]
  Seller,
}

/// Ids come from the external identity provider; rows are created on
/// first sight of a user, never auto-generated.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: i64,
  pub name: String,
  pub role: UserRole,
  pub commission_percentage: f64,
  pub commission_threshold: f64,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "sale::Entity")]
  Sales,
}

impl Related<sale::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Sales.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
