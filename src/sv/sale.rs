use serde::Deserialize;
use uuid::Uuid;

use crate::{
  entity::{
    operator, sale,
    sale::{ClientType, PortfolioStatus, SaleStatus, SaleType},
    user,
  },
  prelude::*,
  sv,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleDraft {
  pub operator_id: i32,
  #[serde(default)]
  pub partner_id: Option<i32>,
  pub seller_id: i64,
  pub sale_type: SaleType,
  #[serde(default)]
  pub client_nif: Option<String>,
  #[serde(default)]
  pub loyalty_months: Option<i32>,
  #[serde(default)]
  pub client_type: ClientType,
  #[serde(default)]
  pub portfolio_status: Option<PortfolioStatus>,
  #[serde(default)]
  pub client_category_id: Option<i32>,
  #[serde(default)]
  pub quantity: Option<i32>,
  #[serde(default)]
  pub monthly_value: f64,
  #[serde(default)]
  pub previous_monthly_value: Option<f64>,
  #[serde(default)]
  pub new_monthly_value: Option<f64>,
  #[serde(default)]
  pub potencia: Option<String>,
  #[serde(default)]
  pub contract_value: f64,
  #[serde(default)]
  pub is_backoffice: bool,
}

pub struct Sales<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Sales<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Create a sale and run the commission engine on it, the form-save
  /// path. Manual-mode settings leave the amounts at zero for manual
  /// entry afterwards.
  pub async fn create(&self, draft: SaleDraft) -> Result<sale::Model> {
    operator::Entity::find_by_id(draft.operator_id)
      .one(self.db)
      .await?
      .ok_or(Error::OperatorNotFound)?;

    user::Entity::find_by_id(draft.seller_id)
      .one(self.db)
      .await?
      .ok_or(Error::UserNotFound)?;

    let now = Utc::now().naive_utc();
    let sale = sale::ActiveModel {
      id: NotSet,
      reference: Set(Uuid::new_v4().to_string()),
      operator_id: Set(draft.operator_id),
      partner_id: Set(draft.partner_id),
      seller_id: Set(draft.seller_id),
      sale_type: Set(draft.sale_type),
      client_nif: Set(draft.client_nif),
      loyalty_months: Set(draft.loyalty_months),
      client_type: Set(draft.client_type),
      portfolio_status: Set(draft.portfolio_status),
      client_category_id: Set(draft.client_category_id),
      quantity: Set(draft.quantity),
      monthly_value: Set(draft.monthly_value),
      previous_monthly_value: Set(draft.previous_monthly_value),
      new_monthly_value: Set(draft.new_monthly_value),
      potencia: Set(draft.potencia),
      contract_value: Set(draft.contract_value),
      commission_seller: Set(0.0),
      commission_partner: Set(0.0),
      commission_backoffice: Set(0.0),
      is_backoffice: Set(draft.is_backoffice),
      status: Set(SaleStatus::Pendente),
      created_at: Set(now),
    }
    .insert(self.db)
    .await?;

    sv::Commission::new(self.db).apply_to_sale(sale.id).await?;

    sale::Entity::find_by_id(sale.id)
      .one(self.db)
      .await?
      .ok_or(Error::SaleNotFound)
  }

  pub async fn by_id(&self, id: i32) -> Result<Option<sale::Model>> {
    Ok(sale::Entity::find_by_id(id).one(self.db).await?)
  }

  pub async fn for_seller(&self, seller_id: i64) -> Result<Vec<sale::Model>> {
    Ok(
      sale::Entity::find()
        .filter(sale::Column::SellerId.eq(seller_id))
        .order_by_desc(sale::Column::CreatedAt)
        .all(self.db)
        .await?,
    )
  }

  pub async fn set_status(
    &self,
    id: i32,
    status: SaleStatus,
  ) -> Result<sale::Model> {
    let sale = sale::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::SaleNotFound)?;

    Ok(
      sale::ActiveModel { status: Set(status), ..sale.into() }
        .update(self.db)
        .await?,
    )
  }
}
