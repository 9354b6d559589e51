use crate::{
  entity::{
    ClientTypeFilter, CommissionType, NifType, PortfolioFilter,
    commission_rule, commission_setting, power_commission_value,
    sale::{self, ClientType, PortfolioStatus, SaleType},
  },
  prelude::*,
};

/// The sale attributes that drive rule resolution.
#[derive(Debug, Clone)]
pub struct SaleContext {
  pub operator_id: i32,
  pub partner_id: Option<i32>,
  pub sale_type: SaleType,
  pub client_nif: Option<String>,
  pub loyalty_months: Option<i32>,
  pub client_type: ClientType,
  pub portfolio_status: Option<PortfolioStatus>,
  pub client_category_id: Option<i32>,
}

impl SaleContext {
  pub fn from_sale(sale: &sale::Model) -> Self {
    Self {
      operator_id: sale.operator_id,
      partner_id: sale.partner_id,
      sale_type: sale.sale_type.clone(),
      client_nif: sale.client_nif.clone(),
      loyalty_months: sale.loyalty_months,
      client_type: sale.client_type.clone(),
      portfolio_status: sale.portfolio_status.clone(),
      client_category_id: sale.client_category_id,
    }
  }
}

/// Coarse NIF taxonomy over the first character only: `5` marks
/// collective entities, `1`/`2`/`3` individual taxpayers; anything
/// else, the empty string included, stays unclassified.
pub fn classify_nif(nif: &str) -> NifType {
  match nif.chars().next() {
    Some('5') => NifType::Coletivo,
    Some('1' | '2' | '3') => NifType::Singular,
    _ => NifType::All,
  }
}

/// A matched rule with its owning setting and, under `per_power`, the
/// power tiers, assembled as one owned aggregate.
#[derive(Debug, Clone)]
pub struct ResolvedRule {
  pub setting: commission_setting::Model,
  pub rule: commission_rule::Model,
  pub tiers: Vec<power_commission_value::Model>,
}

#[derive(Debug, Clone)]
pub enum Resolution {
  /// The active setting requires manual entry; nothing is computed.
  Manual(commission_setting::Model),
  Rule(ResolvedRule),
  /// No applicable configuration; commission is zero/undefined.
  None,
}

type Stage = fn(&commission_rule::Model, &SaleContext, &NifType) -> bool;

/// Ordered filter stages; a rule matches when every stage holds.
const STAGES: [Stage; 5] = [
  stage_sale_type,
  stage_nif,
  stage_loyalty,
  stage_client_type,
  stage_portfolio,
];

fn stage_sale_type(
  rule: &commission_rule::Model,
  ctx: &SaleContext,
  _nif: &NifType,
) -> bool {
  rule.sale_type == ctx.sale_type
}

fn stage_nif(
  rule: &commission_rule::Model,
  _ctx: &SaleContext,
  nif: &NifType,
) -> bool {
  rule.nif_type == NifType::All || rule.nif_type == *nif
}

/// Loyalty-dependent rules require an exact term match; independent
/// rules must not carry a term at all.
fn stage_loyalty(
  rule: &commission_rule::Model,
  ctx: &SaleContext,
  _nif: &NifType,
) -> bool {
  if rule.depends_on_loyalty {
    rule.loyalty_months == ctx.loyalty_months
  } else {
    rule.loyalty_months.is_none()
  }
}

fn stage_client_type(
  rule: &commission_rule::Model,
  ctx: &SaleContext,
  _nif: &NifType,
) -> bool {
  match rule.client_type_filter {
    ClientTypeFilter::All => true,
    ClientTypeFilter::Residencial => {
      ctx.client_type == ClientType::Residencial
    }
    ClientTypeFilter::Empresarial => {
      ctx.client_type == ClientType::Empresarial
    }
  }
}

/// Portfolio-filtered rules only ever match business clients.
fn stage_portfolio(
  rule: &commission_rule::Model,
  ctx: &SaleContext,
  _nif: &NifType,
) -> bool {
  let wanted = match rule.portfolio_filter {
    PortfolioFilter::All => return true,
    PortfolioFilter::Novo => PortfolioStatus::Novo,
    PortfolioFilter::ClienteCarteira => PortfolioStatus::ClienteCarteira,
    PortfolioFilter::ForaCarteira => PortfolioStatus::ForaCarteira,
  };

  ctx.client_type == ClientType::Empresarial
    && ctx.portfolio_status.as_ref() == Some(&wanted)
}

pub fn rule_matches(
  rule: &commission_rule::Model,
  ctx: &SaleContext,
  nif: &NifType,
) -> bool {
  STAGES.iter().all(|stage| stage(rule, ctx, nif))
}

/// Two-tier resolution: narrow rules win when every dimension matches;
/// the catch-all rule for the sale type is the safety net when none do.
///
/// `rules` must already be in stable store order; among equally
/// specific survivors the first one wins, there is no further
/// tie-break.
pub fn select_rule<'r>(
  rules: &'r [commission_rule::Model],
  ctx: &SaleContext,
  nif: &NifType,
) -> Option<&'r commission_rule::Model> {
  let filtered: Vec<&commission_rule::Model> =
    rules.iter().filter(|rule| rule_matches(rule, ctx, nif)).collect();

  if !filtered.is_empty() {
    if let Some(category) = ctx.client_category_id {
      let exact: Vec<&commission_rule::Model> = filtered
        .iter()
        .copied()
        .filter(|rule| rule.client_category_id == Some(category))
        .collect();
      if !exact.is_empty() {
        return most_specific(&exact);
      }

      let no_category: Vec<&commission_rule::Model> = filtered
        .iter()
        .copied()
        .filter(|rule| rule.client_category_id.is_none())
        .collect();
      if !no_category.is_empty() {
        return most_specific(&no_category);
      }
    }
    return most_specific(&filtered);
  }

  rules.iter().find(|rule| is_generic_fallback(rule, &ctx.sale_type))
}

/// Dimensions a rule constrains beyond the catch-all shape. A specific
/// rule must never lose to a generic one that merely sorts earlier.
fn specificity(rule: &commission_rule::Model) -> u32 {
  let mut score = 0;
  if rule.nif_type != NifType::All {
    score += 1;
  }
  if rule.depends_on_loyalty {
    score += 1;
  }
  if rule.client_type_filter != ClientTypeFilter::All {
    score += 1;
  }
  if rule.portfolio_filter != PortfolioFilter::All {
    score += 1;
  }
  if rule.client_category_id.is_some() {
    score += 1;
  }
  score
}

fn most_specific<'r>(
  candidates: &[&'r commission_rule::Model],
) -> Option<&'r commission_rule::Model> {
  let mut best = *candidates.first()?;
  for &rule in &candidates[1..] {
    if specificity(rule) > specificity(best) {
      best = rule;
    }
  }
  Some(best)
}

/// The maximally generic rule for a sale type. The `nif_type == all`
/// requirement is kept from the original resolution even though the
/// upstream classification may already have forced `all`.
fn is_generic_fallback(
  rule: &commission_rule::Model,
  sale_type: &SaleType,
) -> bool {
  rule.sale_type == *sale_type
    && rule.nif_type == NifType::All
    && !rule.depends_on_loyalty
    && rule.client_category_id.is_none()
    && rule.client_type_filter == ClientTypeFilter::All
    && rule.portfolio_filter == PortfolioFilter::All
}

pub struct Resolver<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Resolver<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Resolve the commission rule applicable to a sale context.
  ///
  /// Missing configuration is never an error: no setting, no rules or
  /// no match all resolve to `Resolution::None`.
  pub async fn resolve(&self, ctx: &SaleContext) -> Result<Resolution> {
    let Some(setting) = self.active_setting(ctx).await? else {
      return Ok(Resolution::None);
    };

    if setting.commission_type == CommissionType::Manual {
      return Ok(Resolution::Manual(setting));
    }

    let rules = commission_rule::Entity::find()
      .filter(commission_rule::Column::SettingId.eq(setting.id))
      .order_by_asc(commission_rule::Column::Id)
      .all(self.db)
      .await?;

    if rules.is_empty() {
      return Ok(Resolution::None);
    }

    let nif = if setting.nif_differentiation {
      classify_nif(ctx.client_nif.as_deref().unwrap_or(""))
    } else {
      NifType::All
    };

    let Some(rule) = select_rule(&rules, ctx, &nif).cloned() else {
      return Ok(Resolution::None);
    };

    let tiers = if setting.commission_type == CommissionType::PerPower {
      power_commission_value::Entity::find()
        .filter(power_commission_value::Column::RuleId.eq(rule.id))
        .order_by_asc(power_commission_value::Column::Id)
        .all(self.db)
        .await?
    } else {
      Vec::new()
    };

    Ok(Resolution::Rule(ResolvedRule { setting, rule, tiers }))
  }

  /// A partner-scoped setting wins over the operator-wide default.
  async fn active_setting(
    &self,
    ctx: &SaleContext,
  ) -> Result<Option<commission_setting::Model>> {
    let mut scope =
      Condition::any().add(commission_setting::Column::PartnerId.is_null());
    if let Some(partner_id) = ctx.partner_id {
      scope = scope.add(commission_setting::Column::PartnerId.eq(partner_id));
    }

    let settings = commission_setting::Entity::find()
      .filter(commission_setting::Column::OperatorId.eq(ctx.operator_id))
      .filter(scope)
      .order_by_asc(commission_setting::Column::Id)
      .all(self.db)
      .await?;

    let scoped = ctx.partner_id.and_then(|partner_id| {
      settings.iter().find(|s| s.partner_id == Some(partner_id))
    });

    Ok(
      scoped
        .or_else(|| settings.iter().find(|s| s.partner_id.is_none()))
        .cloned(),
    )
  }
}
