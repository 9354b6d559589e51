use serde::Deserialize;

use crate::{
  entity::{
    CalculationMethod, ClientTypeFilter, CommissionType, NifType,
    PortfolioFilter, commission_rule, commission_setting, operator, partner,
    power_commission_value, sale::SaleType,
  },
  prelude::*,
};

#[derive(Debug, Clone, Deserialize)]
pub struct SettingDraft {
  pub operator_id: i32,
  #[serde(default)]
  pub partner_id: Option<i32>,
  #[serde(default)]
  pub commission_type: CommissionType,
  #[serde(default)]
  pub nif_differentiation: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleDraft {
  pub sale_type: SaleType,
  #[serde(default)]
  pub nif_type: NifType,
  #[serde(default)]
  pub depends_on_loyalty: bool,
  #[serde(default)]
  pub loyalty_months: Option<i32>,
  #[serde(default)]
  pub client_type_filter: ClientTypeFilter,
  #[serde(default)]
  pub portfolio_filter: PortfolioFilter,
  #[serde(default)]
  pub client_category_id: Option<i32>,
  #[serde(default)]
  pub calculation_method: CalculationMethod,
  #[serde(default = "default_true")]
  pub applies_to_seller: bool,
  #[serde(default)]
  pub applies_to_partner: bool,
  #[serde(default)]
  pub seller_fixed_value: f64,
  #[serde(default)]
  pub partner_fixed_value: f64,
  #[serde(default)]
  pub seller_monthly_multiplier: f64,
  #[serde(default)]
  pub partner_monthly_multiplier: f64,
}

fn default_true() -> bool {
  true
}

#[derive(Debug, Clone, Deserialize)]
pub struct PowerValueDraft {
  pub power_value: String,
  #[serde(default)]
  pub seller_value: f64,
  #[serde(default)]
  pub partner_value: f64,
}

pub struct Settings<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Settings<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn create(
    &self,
    draft: SettingDraft,
  ) -> Result<commission_setting::Model> {
    operator::Entity::find_by_id(draft.operator_id)
      .one(self.db)
      .await?
      .ok_or(Error::OperatorNotFound)?;

    if let Some(partner_id) = draft.partner_id {
      partner::Entity::find_by_id(partner_id)
        .one(self.db)
        .await?
        .ok_or(Error::PartnerNotFound)?;
    }

    let now = Utc::now().naive_utc();
    Ok(
      commission_setting::ActiveModel {
        id: NotSet,
        operator_id: Set(draft.operator_id),
        partner_id: Set(draft.partner_id),
        commission_type: Set(draft.commission_type),
        nif_differentiation: Set(draft.nif_differentiation),
        created_at: Set(now),
      }
      .insert(self.db)
      .await?,
    )
  }

  pub async fn update(
    &self,
    id: i32,
    commission_type: CommissionType,
    nif_differentiation: bool,
  ) -> Result<commission_setting::Model> {
    let setting = commission_setting::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::SettingNotFound)?;

    Ok(
      commission_setting::ActiveModel {
        commission_type: Set(commission_type),
        nif_differentiation: Set(nif_differentiation),
        ..setting.into()
      }
      .update(self.db)
      .await?,
    )
  }

  /// Deleting a setting removes its rules and their power tiers.
  pub async fn delete(&self, id: i32) -> Result<()> {
    let txn = self.db.begin().await?;

    let setting = commission_setting::Entity::find_by_id(id)
      .one(&txn)
      .await?
      .ok_or(Error::SettingNotFound)?;

    let rule_ids: Vec<i32> = commission_rule::Entity::find()
      .filter(commission_rule::Column::SettingId.eq(setting.id))
      .all(&txn)
      .await?
      .iter()
      .map(|rule| rule.id)
      .collect();

    if !rule_ids.is_empty() {
      power_commission_value::Entity::delete_many()
        .filter(power_commission_value::Column::RuleId.is_in(rule_ids))
        .exec(&txn)
        .await?;

      commission_rule::Entity::delete_many()
        .filter(commission_rule::Column::SettingId.eq(setting.id))
        .exec(&txn)
        .await?;
    }

    commission_setting::Entity::delete_by_id(setting.id).exec(&txn).await?;

    txn.commit().await?;
    Ok(())
  }

  pub async fn for_operator(
    &self,
    operator_id: i32,
  ) -> Result<Vec<(commission_setting::Model, Vec<commission_rule::Model>)>>
  {
    Ok(
      commission_setting::Entity::find()
        .filter(commission_setting::Column::OperatorId.eq(operator_id))
        .order_by_asc(commission_setting::Column::Id)
        .find_with_related(commission_rule::Entity)
        .all(self.db)
        .await?,
    )
  }

  pub async fn add_rule(
    &self,
    setting_id: i32,
    draft: RuleDraft,
  ) -> Result<commission_rule::Model> {
    commission_setting::Entity::find_by_id(setting_id)
      .one(self.db)
      .await?
      .ok_or(Error::SettingNotFound)?;

    let now = Utc::now().naive_utc();
    Ok(
      commission_rule::ActiveModel {
        id: NotSet,
        setting_id: Set(setting_id),
        sale_type: Set(draft.sale_type),
        nif_type: Set(draft.nif_type),
        depends_on_loyalty: Set(draft.depends_on_loyalty),
        loyalty_months: Set(draft.loyalty_months),
        client_type_filter: Set(draft.client_type_filter),
        portfolio_filter: Set(draft.portfolio_filter),
        client_category_id: Set(draft.client_category_id),
        calculation_method: Set(draft.calculation_method),
        applies_to_seller: Set(draft.applies_to_seller),
        applies_to_partner: Set(draft.applies_to_partner),
        seller_fixed_value: Set(draft.seller_fixed_value),
        partner_fixed_value: Set(draft.partner_fixed_value),
        seller_monthly_multiplier: Set(draft.seller_monthly_multiplier),
        partner_monthly_multiplier: Set(draft.partner_monthly_multiplier),
        created_at: Set(now),
      }
      .insert(self.db)
      .await?,
    )
  }

  pub async fn update_rule(
    &self,
    rule_id: i32,
    draft: RuleDraft,
  ) -> Result<commission_rule::Model> {
    let rule = commission_rule::Entity::find_by_id(rule_id)
      .one(self.db)
      .await?
      .ok_or(Error::RuleNotFound)?;

    Ok(
      commission_rule::ActiveModel {
        sale_type: Set(draft.sale_type),
        nif_type: Set(draft.nif_type),
        depends_on_loyalty: Set(draft.depends_on_loyalty),
        loyalty_months: Set(draft.loyalty_months),
        client_type_filter: Set(draft.client_type_filter),
        portfolio_filter: Set(draft.portfolio_filter),
        client_category_id: Set(draft.client_category_id),
        calculation_method: Set(draft.calculation_method),
        applies_to_seller: Set(draft.applies_to_seller),
        applies_to_partner: Set(draft.applies_to_partner),
        seller_fixed_value: Set(draft.seller_fixed_value),
        partner_fixed_value: Set(draft.partner_fixed_value),
        seller_monthly_multiplier: Set(draft.seller_monthly_multiplier),
        partner_monthly_multiplier: Set(draft.partner_monthly_multiplier),
        ..rule.into()
      }
      .update(self.db)
      .await?,
    )
  }

  pub async fn delete_rule(&self, rule_id: i32) -> Result<()> {
    let txn = self.db.begin().await?;

    let rule = commission_rule::Entity::find_by_id(rule_id)
      .one(&txn)
      .await?
      .ok_or(Error::RuleNotFound)?;

    power_commission_value::Entity::delete_many()
      .filter(power_commission_value::Column::RuleId.eq(rule.id))
      .exec(&txn)
      .await?;

    commission_rule::Entity::delete_by_id(rule.id).exec(&txn).await?;

    txn.commit().await?;
    Ok(())
  }

  /// Bulk replace of a rule's power tiers: delete the previous set,
  /// insert the new one, atomically.
  pub async fn replace_power_values(
    &self,
    rule_id: i32,
    values: Vec<PowerValueDraft>,
  ) -> Result<Vec<power_commission_value::Model>> {
    let txn = self.db.begin().await?;

    commission_rule::Entity::find_by_id(rule_id)
      .one(&txn)
      .await?
      .ok_or(Error::RuleNotFound)?;

    power_commission_value::Entity::delete_many()
      .filter(power_commission_value::Column::RuleId.eq(rule_id))
      .exec(&txn)
      .await?;

    let mut inserted = Vec::with_capacity(values.len());
    for value in values {
      inserted.push(
        power_commission_value::ActiveModel {
          id: NotSet,
          rule_id: Set(rule_id),
          power_value: Set(value.power_value),
          seller_value: Set(value.seller_value),
          partner_value: Set(value.partner_value),
        }
        .insert(&txn)
        .await?,
      );
    }

    txn.commit().await?;
    Ok(inserted)
  }
}
