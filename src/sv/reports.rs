use serde::Serialize;

use crate::{
  entity::{
    operator, sale,
    sale::SaleStatus,
    user::{self, UserRole},
  },
  prelude::*,
  utils::{month_bounds, round2},
};

/// Partner commission visibility: admins always, backoffice only when
/// the operator exposes it, sellers never.
pub fn partner_commission_visible(role: &UserRole, visible_to_bo: bool) -> bool {
  match role {
    UserRole::Admin => true,
    UserRole::Backoffice => visible_to_bo,
    UserRole::Seller => false,
  }
}

/// All-or-nothing threshold gate: below the threshold the commission
/// is zero, at or above it the full percentage applies.
pub fn backoffice_commission(
  visible_partner_total: f64,
  percentage: f64,
  threshold: f64,
) -> f64 {
  if visible_partner_total < threshold {
    return 0.0;
  }
  round2(visible_partner_total * percentage / 100.0)
}

/// Year-over-year change; activity growing out of nothing reads as a
/// flat +100%.
pub fn percent_change(current: f64, previous: f64) -> f64 {
  if previous == 0.0 {
    return if current > 0.0 { 100.0 } else { 0.0 };
  }
  (current - previous) / previous * 100.0
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
  pub year: i32,
  pub month: u32,
  pub sales_count: usize,
  pub contract_total: f64,
  pub seller_total: f64,
  /// `None` when the viewer may not see partner commissions at all.
  pub partner_total: Option<f64>,
  pub backoffice_commission: f64,
  /// Commission over `ativo` sales only, a KPI distinct from the
  /// all-status month totals.
  pub active_seller_total: f64,
  pub seller_change: f64,
  pub contract_change: f64,
  pub sales_change: f64,
}

pub struct Reports<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Reports<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Month dashboard for a viewer, aggregating the persisted
  /// commission fields under the viewer's visibility rules. The
  /// resolver and calculator are never re-invoked here.
  pub async fn dashboard(
    &self,
    viewer_id: i64,
    year: i32,
    month: u32,
  ) -> Result<Dashboard> {
    let viewer = user::Entity::find_by_id(viewer_id)
      .one(self.db)
      .await?
      .ok_or(Error::UserNotFound)?;

    let (from, to) = month_bounds(year, month)
      .ok_or_else(|| Error::InvalidArgs(format!("invalid month {month}")))?;
    let (prev_from, prev_to) = month_bounds(year - 1, month)
      .ok_or_else(|| Error::InvalidArgs(format!("invalid month {month}")))?;

    let visibility: HashMap<i32, bool> = operator::Entity::find()
      .all(self.db)
      .await?
      .into_iter()
      .map(|op| (op.id, op.commission_visible_to_bo))
      .collect();

    let sales = self.month_sales(&viewer, from, to).await?;
    let previous = self.month_sales(&viewer, prev_from, prev_to).await?;

    let seller_total =
      round2(sales.iter().map(|s| s.commission_seller).sum::<f64>());
    let contract_total =
      round2(sales.iter().map(|s| s.contract_value).sum::<f64>());
    let active_seller_total = round2(
      sales
        .iter()
        .filter(|s| s.status == SaleStatus::Ativo)
        .map(|s| s.commission_seller)
        .sum::<f64>(),
    );

    let visible_partner_total = round2(
      sales
        .iter()
        .filter(|s| {
          partner_commission_visible(
            &viewer.role,
            visibility.get(&s.operator_id).copied().unwrap_or(false),
          )
        })
        .map(|s| s.commission_partner)
        .sum::<f64>(),
    );

    let partner_total = match viewer.role {
      UserRole::Seller => None,
      _ => Some(visible_partner_total),
    };

    let backoffice_total = match viewer.role {
      UserRole::Backoffice => backoffice_commission(
        visible_partner_total,
        viewer.commission_percentage,
        viewer.commission_threshold,
      ),
      UserRole::Admin => {
        round2(sales.iter().map(|s| s.commission_backoffice).sum::<f64>())
      }
      UserRole::Seller => 0.0,
    };

    let prev_seller_total =
      round2(previous.iter().map(|s| s.commission_seller).sum::<f64>());
    let prev_contract_total =
      round2(previous.iter().map(|s| s.contract_value).sum::<f64>());

    Ok(Dashboard {
      year,
      month,
      sales_count: sales.len(),
      contract_total,
      seller_total,
      partner_total,
      backoffice_commission: backoffice_total,
      active_seller_total,
      seller_change: percent_change(seller_total, prev_seller_total),
      contract_change: percent_change(contract_total, prev_contract_total),
      sales_change: percent_change(sales.len() as f64, previous.len() as f64),
    })
  }

  /// Sellers only ever aggregate their own sales.
  async fn month_sales(
    &self,
    viewer: &user::Model,
    from: DateTime,
    to: DateTime,
  ) -> Result<Vec<sale::Model>> {
    let mut query = sale::Entity::find()
      .filter(sale::Column::CreatedAt.gte(from))
      .filter(sale::Column::CreatedAt.lt(to));

    if viewer.role == UserRole::Seller {
      query = query.filter(sale::Column::SellerId.eq(viewer.id));
    }

    Ok(query.all(self.db).await?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    entity::sale::{ClientType, SaleType},
    sv::test_utils::test_db,
  };

  #[test]
  fn test_partner_commission_visible() {
    assert!(partner_commission_visible(&UserRole::Admin, false));
    assert!(partner_commission_visible(&UserRole::Admin, true));
    assert!(partner_commission_visible(&UserRole::Backoffice, true));
    assert!(!partner_commission_visible(&UserRole::Backoffice, false));
    assert!(!partner_commission_visible(&UserRole::Seller, true));
  }

  #[test]
  fn test_backoffice_commission_threshold_gate() {
    // Below the threshold the whole commission is suppressed.
    assert_eq!(backoffice_commission(1000.0, 5.0, 1500.0), 0.0);
    assert_eq!(backoffice_commission(1000.0, 5.0, 500.0), 50.0);
    // At the threshold the gate opens.
    assert_eq!(backoffice_commission(1500.0, 5.0, 1500.0), 75.0);
  }

  #[test]
  fn test_percent_change() {
    assert_eq!(percent_change(0.0, 0.0), 0.0);
    assert_eq!(percent_change(100.0, 0.0), 100.0);
    assert_eq!(percent_change(50.0, 100.0), -50.0);
    assert_eq!(percent_change(150.0, 100.0), 50.0);
  }

  async fn seed_user(
    db: &DatabaseConnection,
    id: i64,
    role: UserRole,
    percentage: f64,
    threshold: f64,
  ) -> user::Model {
    user::ActiveModel {
      id: Set(id),
      name: Set(format!("user-{id}")),
      role: Set(role),
      commission_percentage: Set(percentage),
      commission_threshold: Set(threshold),
      created_at: Set(Utc::now().naive_utc()),
    }
    .insert(db)
    .await
    .unwrap()
  }

  async fn seed_operator(
    db: &DatabaseConnection,
    visible_to_bo: bool,
  ) -> operator::Model {
    operator::ActiveModel {
      id: NotSet,
      name: Set("Iberdrola".into()),
      commission_visible_to_bo: Set(visible_to_bo),
    }
    .insert(db)
    .await
    .unwrap()
  }

  async fn seed_sale(
    db: &DatabaseConnection,
    operator_id: i32,
    seller_id: i64,
    commission_seller: f64,
    commission_partner: f64,
    status: SaleStatus,
  ) {
    sale::ActiveModel {
      id: NotSet,
      reference: Set("ref".into()),
      operator_id: Set(operator_id),
      partner_id: Set(None),
      seller_id: Set(seller_id),
      sale_type: Set(SaleType::Ni),
      client_nif: Set(None),
      loyalty_months: Set(None),
      client_type: Set(ClientType::Residencial),
      portfolio_status: Set(None),
      client_category_id: Set(None),
      quantity: Set(None),
      monthly_value: Set(100.0),
      previous_monthly_value: Set(None),
      new_monthly_value: Set(None),
      potencia: Set(None),
      contract_value: Set(1200.0),
      commission_seller: Set(commission_seller),
      commission_partner: Set(commission_partner),
      commission_backoffice: Set(0.0),
      is_backoffice: Set(false),
      status: Set(status),
      created_at: Set(Utc::now().naive_utc()),
    }
    .insert(db)
    .await
    .unwrap();
  }

  #[tokio::test]
  async fn test_seller_dashboard_hides_partner_totals() {
    let db = test_db::setup().await;
    let operator = seed_operator(&db, true).await;
    let seller = seed_user(&db, 1, UserRole::Seller, 0.0, 0.0).await;
    let other = seed_user(&db, 2, UserRole::Seller, 0.0, 0.0).await;

    seed_sale(&db, operator.id, seller.id, 50.0, 20.0, SaleStatus::Ativo)
      .await;
    seed_sale(&db, operator.id, other.id, 70.0, 30.0, SaleStatus::Pendente)
      .await;

    let now = Utc::now().naive_utc();
    let dashboard = Reports::new(&db)
      .dashboard(seller.id, now.year(), now.month())
      .await
      .unwrap();

    // Only the seller's own sale is aggregated, partner totals hidden.
    assert_eq!(dashboard.sales_count, 1);
    assert_eq!(dashboard.seller_total, 50.0);
    assert_eq!(dashboard.partner_total, None);
    assert_eq!(dashboard.backoffice_commission, 0.0);
    assert_eq!(dashboard.active_seller_total, 50.0);
    // No activity a year ago: flat +100% signal.
    assert_eq!(dashboard.seller_change, 100.0);
  }

  #[tokio::test]
  async fn test_backoffice_dashboard_respects_operator_flag() {
    let db = test_db::setup().await;
    let hidden = seed_operator(&db, false).await;
    let visible = seed_operator(&db, true).await;
    let bo = seed_user(&db, 1, UserRole::Backoffice, 10.0, 0.0).await;
    let seller = seed_user(&db, 2, UserRole::Seller, 0.0, 0.0).await;

    seed_sale(&db, hidden.id, seller.id, 0.0, 500.0, SaleStatus::Ativo).await;
    seed_sale(&db, visible.id, seller.id, 0.0, 200.0, SaleStatus::Ativo)
      .await;

    let now = Utc::now().naive_utc();
    let dashboard = Reports::new(&db)
      .dashboard(bo.id, now.year(), now.month())
      .await
      .unwrap();

    // Only the visible operator's partner commission counts.
    assert_eq!(dashboard.partner_total, Some(200.0));
    assert_eq!(dashboard.backoffice_commission, 20.0);
  }

  #[tokio::test]
  async fn test_backoffice_commission_gated_by_threshold() {
    let db = test_db::setup().await;
    let operator = seed_operator(&db, true).await;
    let bo = seed_user(&db, 1, UserRole::Backoffice, 5.0, 1500.0).await;
    let seller = seed_user(&db, 2, UserRole::Seller, 0.0, 0.0).await;

    seed_sale(&db, operator.id, seller.id, 0.0, 1000.0, SaleStatus::Ativo)
      .await;

    let now = Utc::now().naive_utc();
    let dashboard = Reports::new(&db)
      .dashboard(bo.id, now.year(), now.month())
      .await
      .unwrap();

    assert_eq!(dashboard.partner_total, Some(1000.0));
    assert_eq!(dashboard.backoffice_commission, 0.0);
  }

  #[tokio::test]
  async fn test_active_only_kpi_excludes_pending() {
    let db = test_db::setup().await;
    let operator = seed_operator(&db, false).await;
    let admin = seed_user(&db, 1, UserRole::Admin, 0.0, 0.0).await;
    let seller = seed_user(&db, 2, UserRole::Seller, 0.0, 0.0).await;

    seed_sale(&db, operator.id, seller.id, 50.0, 0.0, SaleStatus::Ativo)
      .await;
    seed_sale(&db, operator.id, seller.id, 70.0, 0.0, SaleStatus::Pendente)
      .await;

    let now = Utc::now().naive_utc();
    let dashboard = Reports::new(&db)
      .dashboard(admin.id, now.year(), now.month())
      .await
      .unwrap();

    assert_eq!(dashboard.seller_total, 120.0);
    assert_eq!(dashboard.active_seller_total, 50.0);
  }
}
