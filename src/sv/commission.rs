use crate::{
  entity::{
    CalculationMethod, CommissionType, sale,
    sale::SaleType,
    user::{self, UserRole},
  },
  prelude::*,
  sv::resolver::{Resolution, Resolver, SaleContext},
  utils::round2,
};

/// Monetary inputs of a sale, independent of rule resolution.
#[derive(Debug, Clone, Default)]
pub struct SaleInputs {
  pub sale_type: SaleType,
  pub quantity: Option<i32>,
  pub monthly_value: f64,
  pub previous_monthly_value: Option<f64>,
  pub new_monthly_value: Option<f64>,
  pub potencia: Option<String>,
}

impl SaleInputs {
  pub fn from_sale(sale: &sale::Model) -> Self {
    Self {
      sale_type: sale.sale_type.clone(),
      quantity: sale.quantity,
      monthly_value: sale.monthly_value,
      previous_monthly_value: sale.previous_monthly_value,
      new_monthly_value: sale.new_monthly_value,
      potencia: sale.potencia.clone(),
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Amounts {
  pub seller: f64,
  pub partner: f64,
}

/// Compute seller and partner commissions for a resolution, both
/// rounded to 2 decimal places.
///
/// Never fails: manual mode, missing rules, missing power tiers and
/// absent inputs all degrade to zero, so a misconfigured rule cannot
/// break the sale save path.
pub fn calculate(resolution: &Resolution, inputs: &SaleInputs) -> Amounts {
  let Resolution::Rule(resolved) = resolution else {
    return Amounts::default();
  };

  if resolved.setting.commission_type == CommissionType::PerPower {
    let Some(potencia) = inputs.potencia.as_deref() else {
      return Amounts::default();
    };
    let Some(tier) =
      resolved.tiers.iter().find(|tier| tier.power_value == potencia)
    else {
      return Amounts::default();
    };
    // Tier amounts are stored verbatim, no further scaling.
    return Amounts {
      seller: round2(tier.seller_value),
      partner: round2(tier.partner_value),
    };
  }

  let rule = &resolved.rule;
  let base = match rule.calculation_method {
    CalculationMethod::FixedPerQuantity => {
      f64::from(inputs.quantity.unwrap_or(1))
    }
    CalculationMethod::MonthlyMultiple => match inputs.sale_type {
      // Up-sell and cross-sell pay on the monthly uplift only.
      SaleType::UpSell | SaleType::CrossSell => {
        let previous = inputs.previous_monthly_value.unwrap_or(0.0);
        let new = inputs.new_monthly_value.unwrap_or(0.0);
        (new - previous).max(0.0)
      }
      _ => inputs.monthly_value,
    },
  };

  let (seller_unit, partner_unit) = match rule.calculation_method {
    CalculationMethod::FixedPerQuantity => {
      (rule.seller_fixed_value, rule.partner_fixed_value)
    }
    CalculationMethod::MonthlyMultiple => {
      (rule.seller_monthly_multiplier, rule.partner_monthly_multiplier)
    }
  };

  Amounts {
    seller: round2(if rule.applies_to_seller {
      seller_unit * base
    } else {
      0.0
    }),
    partner: round2(if rule.applies_to_partner {
      partner_unit * base
    } else {
      0.0
    }),
  }
}

pub struct Commission<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Commission<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Resolve and persist commissions for a sale. Returns `None` when
  /// the active setting is manual: stored amounts are left untouched
  /// for manual entry.
  pub async fn apply_to_sale(&self, sale_id: i32) -> Result<Option<Amounts>> {
    let sale = sale::Entity::find_by_id(sale_id)
      .one(self.db)
      .await?
      .ok_or(Error::SaleNotFound)?;

    let ctx = SaleContext::from_sale(&sale);
    let resolution = Resolver::new(self.db).resolve(&ctx).await?;

    if let Resolution::Manual(setting) = &resolution {
      debug!(sale = sale.id, setting = setting.id, "manual commission mode");
      return Ok(None);
    }

    let amounts = calculate(&resolution, &SaleInputs::from_sale(&sale));

    sale::ActiveModel {
      commission_seller: Set(amounts.seller),
      commission_partner: Set(amounts.partner),
      ..sale.into()
    }
    .update(self.db)
    .await?;

    Ok(Some(amounts))
  }

  /// Explicit override of the stored amounts, reserved to admin and
  /// backoffice users.
  pub async fn override_amounts(
    &self,
    actor: &user::Model,
    sale_id: i32,
    seller: f64,
    partner: f64,
  ) -> Result<sale::Model> {
    if actor.role != UserRole::Admin && actor.role != UserRole::Backoffice {
      return Err(Error::OverrideNotAllowed);
    }

    let sale = sale::Entity::find_by_id(sale_id)
      .one(self.db)
      .await?
      .ok_or(Error::SaleNotFound)?;

    info!(sale = sale.id, actor = actor.id, "commission override");

    Ok(
      sale::ActiveModel {
        commission_seller: Set(round2(seller)),
        commission_partner: Set(round2(partner)),
        ..sale.into()
      }
      .update(self.db)
      .await?,
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    entity::{
      ClientTypeFilter, NifType, PortfolioFilter, commission_rule,
      commission_setting, operator, power_commission_value,
      sale::{ClientType, SaleStatus},
    },
    sv::{resolver::ResolvedRule, test_utils::test_db},
  };

  fn setting(commission_type: CommissionType) -> commission_setting::Model {
    commission_setting::Model {
      id: 1,
      operator_id: 1,
      partner_id: None,
      commission_type,
      nif_differentiation: false,
      created_at: DateTime::default(),
    }
  }

  fn rule(
    method: CalculationMethod,
    sale_type: SaleType,
  ) -> commission_rule::Model {
    commission_rule::Model {
      id: 1,
      setting_id: 1,
      sale_type,
      nif_type: NifType::All,
      depends_on_loyalty: false,
      loyalty_months: None,
      client_type_filter: ClientTypeFilter::All,
      portfolio_filter: PortfolioFilter::All,
      client_category_id: None,
      calculation_method: method,
      applies_to_seller: true,
      applies_to_partner: true,
      seller_fixed_value: 10.0,
      partner_fixed_value: 4.0,
      seller_monthly_multiplier: 1.5,
      partner_monthly_multiplier: 0.5,
      created_at: DateTime::default(),
    }
  }

  fn resolved(
    commission_type: CommissionType,
    method: CalculationMethod,
    sale_type: SaleType,
  ) -> Resolution {
    Resolution::Rule(ResolvedRule {
      setting: setting(commission_type),
      rule: rule(method, sale_type),
      tiers: Vec::new(),
    })
  }

  fn inputs(sale_type: SaleType) -> SaleInputs {
    SaleInputs { sale_type, ..SaleInputs::default() }
  }

  #[test]
  fn test_no_rule_yields_zero() {
    let amounts = calculate(&Resolution::None, &inputs(SaleType::Ni));
    assert_eq!(amounts, Amounts::default());
  }

  #[test]
  fn test_manual_mode_yields_zero() {
    let manual = Resolution::Manual(setting(CommissionType::Manual));
    let amounts = calculate(&manual, &inputs(SaleType::Ni));
    assert_eq!(amounts, Amounts::default());
  }

  #[test]
  fn test_fixed_per_quantity() {
    let resolution = resolved(
      CommissionType::Automatic,
      CalculationMethod::FixedPerQuantity,
      SaleType::Ni,
    );

    let mut sale_inputs = inputs(SaleType::Ni);
    sale_inputs.quantity = Some(3);

    let amounts = calculate(&resolution, &sale_inputs);
    assert_eq!(amounts.seller, 30.0);
    assert_eq!(amounts.partner, 12.0);
  }

  #[test]
  fn test_quantity_defaults_to_one() {
    let resolution = resolved(
      CommissionType::Automatic,
      CalculationMethod::FixedPerQuantity,
      SaleType::Ni,
    );

    let amounts = calculate(&resolution, &inputs(SaleType::Ni));
    assert_eq!(amounts.seller, 10.0);
  }

  #[test]
  fn test_monthly_multiple() {
    let resolution = resolved(
      CommissionType::Automatic,
      CalculationMethod::MonthlyMultiple,
      SaleType::Ni,
    );

    let mut sale_inputs = inputs(SaleType::Ni);
    sale_inputs.monthly_value = 100.0;

    let amounts = calculate(&resolution, &sale_inputs);
    assert_eq!(amounts.seller, 150.0);
    assert_eq!(amounts.partner, 50.0);
  }

  #[test]
  fn test_upsell_pays_on_uplift_only() {
    let resolution = resolved(
      CommissionType::Automatic,
      CalculationMethod::MonthlyMultiple,
      SaleType::UpSell,
    );

    let mut sale_inputs = inputs(SaleType::UpSell);
    sale_inputs.monthly_value = 100.0;
    sale_inputs.previous_monthly_value = Some(40.0);
    sale_inputs.new_monthly_value = Some(60.0);

    let amounts = calculate(&resolution, &sale_inputs);
    assert_eq!(amounts.seller, 30.0);
    assert_eq!(amounts.partner, 10.0);
  }

  #[test]
  fn test_upsell_uplift_floors_at_zero() {
    let resolution = resolved(
      CommissionType::Automatic,
      CalculationMethod::MonthlyMultiple,
      SaleType::UpSell,
    );

    let mut sale_inputs = inputs(SaleType::UpSell);
    sale_inputs.previous_monthly_value = Some(50.0);
    sale_inputs.new_monthly_value = Some(30.0);

    let amounts = calculate(&resolution, &sale_inputs);
    assert_eq!(amounts, Amounts::default());
  }

  #[test]
  fn test_applies_flags_gate_each_side() {
    let mut resolution = resolved(
      CommissionType::Automatic,
      CalculationMethod::MonthlyMultiple,
      SaleType::Ni,
    );
    if let Resolution::Rule(resolved) = &mut resolution {
      resolved.rule.applies_to_partner = false;
    }

    let mut sale_inputs = inputs(SaleType::Ni);
    sale_inputs.monthly_value = 100.0;

    let amounts = calculate(&resolution, &sale_inputs);
    assert_eq!(amounts.seller, 150.0);
    assert_eq!(amounts.partner, 0.0);
  }

  #[test]
  fn test_per_power_without_potencia_yields_zero() {
    let resolution = resolved(
      CommissionType::PerPower,
      CalculationMethod::MonthlyMultiple,
      SaleType::Ni,
    );

    let amounts = calculate(&resolution, &inputs(SaleType::Ni));
    assert_eq!(amounts, Amounts::default());
  }

  #[test]
  fn test_per_power_exact_tier_match() {
    let mut resolution = resolved(
      CommissionType::PerPower,
      CalculationMethod::MonthlyMultiple,
      SaleType::Ni,
    );
    if let Resolution::Rule(resolved) = &mut resolution {
      resolved.tiers = vec![
        power_commission_value::Model {
          id: 1,
          rule_id: 1,
          power_value: "3.45".into(),
          seller_value: 25.0,
          partner_value: 10.0,
        },
        power_commission_value::Model {
          id: 2,
          rule_id: 1,
          power_value: "6.9".into(),
          seller_value: 40.0,
          partner_value: 15.0,
        },
      ];
    }

    let mut sale_inputs = inputs(SaleType::Ni);
    sale_inputs.potencia = Some("6.9".into());
    let amounts = calculate(&resolution, &sale_inputs);
    assert_eq!(amounts.seller, 40.0);
    assert_eq!(amounts.partner, 15.0);

    // No tier for the rating: zero, not an error.
    sale_inputs.potencia = Some("10.35".into());
    let amounts = calculate(&resolution, &sale_inputs);
    assert_eq!(amounts, Amounts::default());
  }

  async fn seed_sale_fixture(
    db: &DatabaseConnection,
    nif_differentiation: bool,
    commission_type: CommissionType,
  ) -> (operator::Model, commission_setting::Model) {
    let operator = operator::ActiveModel {
      id: NotSet,
      name: Set("Endesa".into()),
      commission_visible_to_bo: Set(false),
    }
    .insert(db)
    .await
    .unwrap();

    user::ActiveModel {
      id: Set(1),
      name: Set("Joana".into()),
      role: Set(UserRole::Seller),
      commission_percentage: Set(0.0),
      commission_threshold: Set(0.0),
      created_at: Set(Utc::now().naive_utc()),
    }
    .insert(db)
    .await
    .unwrap();

    let setting = commission_setting::ActiveModel {
      id: NotSet,
      operator_id: Set(operator.id),
      partner_id: Set(None),
      commission_type: Set(commission_type),
      nif_differentiation: Set(nif_differentiation),
      created_at: Set(Utc::now().naive_utc()),
    }
    .insert(db)
    .await
    .unwrap();

    (operator, setting)
  }

  fn rule_model(
    setting_id: i32,
    nif_type: NifType,
    multiplier: f64,
  ) -> commission_rule::ActiveModel {
    commission_rule::ActiveModel {
      id: NotSet,
      setting_id: Set(setting_id),
      sale_type: Set(SaleType::Ni),
      nif_type: Set(nif_type),
      depends_on_loyalty: Set(false),
      loyalty_months: Set(None),
      client_type_filter: Set(ClientTypeFilter::All),
      portfolio_filter: Set(PortfolioFilter::All),
      client_category_id: Set(None),
      calculation_method: Set(CalculationMethod::MonthlyMultiple),
      applies_to_seller: Set(true),
      applies_to_partner: Set(false),
      seller_fixed_value: Set(0.0),
      partner_fixed_value: Set(0.0),
      seller_monthly_multiplier: Set(multiplier),
      partner_monthly_multiplier: Set(0.0),
      created_at: Set(Utc::now().naive_utc()),
    }
  }

  fn sale_model(
    operator_id: i32,
    client_nif: &str,
    potencia: Option<&str>,
  ) -> sale::ActiveModel {
    sale::ActiveModel {
      id: NotSet,
      reference: Set("ref".into()),
      operator_id: Set(operator_id),
      partner_id: Set(None),
      seller_id: Set(1),
      sale_type: Set(SaleType::Ni),
      client_nif: Set(Some(client_nif.into())),
      loyalty_months: Set(None),
      client_type: Set(ClientType::Residencial),
      portfolio_status: Set(None),
      client_category_id: Set(None),
      quantity: Set(None),
      monthly_value: Set(100.0),
      previous_monthly_value: Set(None),
      new_monthly_value: Set(None),
      potencia: Set(potencia.map(Into::into)),
      contract_value: Set(0.0),
      commission_seller: Set(0.0),
      commission_partner: Set(0.0),
      commission_backoffice: Set(0.0),
      is_backoffice: Set(false),
      status: Set(SaleStatus::Pendente),
      created_at: Set(Utc::now().naive_utc()),
    }
  }

  #[tokio::test]
  async fn test_nif_differentiation_end_to_end() {
    let db = test_db::setup().await;
    let (operator, setting) =
      seed_sale_fixture(&db, true, CommissionType::Automatic).await;

    // Collective-NIF rule pays full, the catch-all pays half.
    rule_model(setting.id, NifType::Coletivo, 1.0)
      .insert(&db)
      .await
      .unwrap();
    rule_model(setting.id, NifType::All, 0.5).insert(&db).await.unwrap();

    let sale =
      sale_model(operator.id, "512345678", None).insert(&db).await.unwrap();

    let amounts = Commission::new(&db)
      .apply_to_sale(sale.id)
      .await
      .unwrap()
      .expect("automatic mode computes");
    assert_eq!(amounts.seller, 100.0);

    let stored =
      sale::Entity::find_by_id(sale.id).one(&db).await.unwrap().unwrap();
    assert_eq!(stored.commission_seller, 100.0);
  }

  #[tokio::test]
  async fn test_per_power_end_to_end() {
    let db = test_db::setup().await;
    let (operator, setting) =
      seed_sale_fixture(&db, false, CommissionType::PerPower).await;

    let rule =
      rule_model(setting.id, NifType::All, 0.0).insert(&db).await.unwrap();
    power_commission_value::ActiveModel {
      id: NotSet,
      rule_id: Set(rule.id),
      power_value: Set("6.9".into()),
      seller_value: Set(40.0),
      partner_value: Set(15.0),
    }
    .insert(&db)
    .await
    .unwrap();

    let sale = sale_model(operator.id, "", Some("6.9"))
      .insert(&db)
      .await
      .unwrap();

    let amounts = Commission::new(&db)
      .apply_to_sale(sale.id)
      .await
      .unwrap()
      .expect("per-power mode computes");
    assert_eq!(amounts.seller, 40.0);
    assert_eq!(amounts.partner, 15.0);
  }

  #[tokio::test]
  async fn test_override_requires_privileged_role() {
    let db = test_db::setup().await;
    let (operator, _setting) =
      seed_sale_fixture(&db, false, CommissionType::Manual).await;

    let sale =
      sale_model(operator.id, "", None).insert(&db).await.unwrap();

    let now = Utc::now().naive_utc();
    let seller = user::Model {
      id: 1,
      name: "Joana".into(),
      role: UserRole::Seller,
      commission_percentage: 0.0,
      commission_threshold: 0.0,
      created_at: now,
    };
    let admin = user::Model { id: 2, role: UserRole::Admin, ..seller.clone() };

    let sv = Commission::new(&db);
    let result = sv.override_amounts(&seller, sale.id, 10.0, 5.0).await;
    assert!(matches!(result, Err(Error::OverrideNotAllowed)));

    let updated =
      sv.override_amounts(&admin, sale.id, 10.0, 5.0).await.unwrap();
    assert_eq!(updated.commission_seller, 10.0);
    assert_eq!(updated.commission_partner, 5.0);
  }

  #[test]
  fn test_rounding_to_two_decimals() {
    let mut resolution = resolved(
      CommissionType::Automatic,
      CalculationMethod::MonthlyMultiple,
      SaleType::Ni,
    );
    if let Resolution::Rule(resolved) = &mut resolution {
      resolved.rule.seller_monthly_multiplier = 0.333;
      resolved.rule.applies_to_partner = false;
    }

    let mut sale_inputs = inputs(SaleType::Ni);
    sale_inputs.monthly_value = 10.0;

    let amounts = calculate(&resolution, &sale_inputs);
    assert_eq!(amounts.seller, 3.33);
  }
}
