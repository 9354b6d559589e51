use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::{
  entity::{
    CommissionType, commission_rule, commission_setting,
    power_commission_value, sale,
  },
  prelude::*,
  state::AppState,
  sv,
  sv::{
    commission::Amounts,
    reports::Dashboard,
    sale::SaleDraft,
    settings::{PowerValueDraft, RuleDraft, SettingDraft},
  },
};

#[derive(Serialize)]
pub struct Status {
  success: bool,
  msg: Option<String>,
}

type Reject = (StatusCode, Json<Status>);

fn reject(err: Error) -> Reject {
  let status = match &err {
    Error::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    Error::UserNotFound
    | Error::OperatorNotFound
    | Error::PartnerNotFound
    | Error::SaleNotFound
    | Error::SettingNotFound
    | Error::RuleNotFound => StatusCode::NOT_FOUND,
    Error::OverrideNotAllowed => StatusCode::FORBIDDEN,
    Error::InvalidArgs(_) => StatusCode::UNPROCESSABLE_ENTITY,
  };

  if status == StatusCode::INTERNAL_SERVER_ERROR {
    error!("request failed: {err}");
  }

  (status, Json(Status { success: false, msg: Some(err.to_string()) }))
}

pub async fn health() -> Json<json::Value> {
  Json(json::json!({ "status": "ok" }))
}

pub async fn create_sale(
  State(app): State<Arc<AppState>>,
  Json(draft): Json<SaleDraft>,
) -> Result<(StatusCode, Json<sale::Model>), Reject> {
  let sale = sv::Sales::new(&app.db).create(draft).await.map_err(reject)?;
  Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn list_seller_sales(
  State(app): State<Arc<AppState>>,
  Path(seller_id): Path<i64>,
) -> Result<Json<Vec<sale::Model>>, Reject> {
  let sales =
    sv::Sales::new(&app.db).for_seller(seller_id).await.map_err(reject)?;
  Ok(Json(sales))
}

pub async fn recalculate_sale(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i32>,
) -> Result<Json<json::Value>, Reject> {
  let amounts =
    sv::Commission::new(&app.db).apply_to_sale(id).await.map_err(reject)?;

  Ok(Json(match amounts {
    Some(Amounts { seller, partner }) => json::json!({
      "manual": false,
      "commission_seller": seller,
      "commission_partner": partner,
    }),
    None => json::json!({ "manual": true }),
  }))
}

#[derive(Deserialize)]
pub struct OverrideReq {
  pub user_id: i64,
  pub commission_seller: f64,
  pub commission_partner: f64,
}

pub async fn override_commission(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i32>,
  Json(req): Json<OverrideReq>,
) -> Result<Json<sale::Model>, Reject> {
  let actor = sv::Users::new(&app.db)
    .by_id(req.user_id)
    .await
    .map_err(reject)?
    .ok_or_else(|| reject(Error::UserNotFound))?;

  let sale = sv::Commission::new(&app.db)
    .override_amounts(&actor, id, req.commission_seller, req.commission_partner)
    .await
    .map_err(reject)?;

  Ok(Json(sale))
}

#[derive(Serialize)]
pub struct SettingWithRules {
  #[serde(flatten)]
  pub setting: commission_setting::Model,
  pub rules: Vec<commission_rule::Model>,
}

pub async fn operator_settings(
  State(app): State<Arc<AppState>>,
  Path(operator_id): Path<i32>,
) -> Result<Json<Vec<SettingWithRules>>, Reject> {
  let settings = sv::Settings::new(&app.db)
    .for_operator(operator_id)
    .await
    .map_err(reject)?;

  Ok(Json(
    settings
      .into_iter()
      .map(|(setting, rules)| SettingWithRules { setting, rules })
      .collect(),
  ))
}

pub async fn create_setting(
  State(app): State<Arc<AppState>>,
  Json(draft): Json<SettingDraft>,
) -> Result<(StatusCode, Json<commission_setting::Model>), Reject> {
  let setting =
    sv::Settings::new(&app.db).create(draft).await.map_err(reject)?;
  Ok((StatusCode::CREATED, Json(setting)))
}

#[derive(Deserialize)]
pub struct SettingUpdateReq {
  pub commission_type: CommissionType,
  #[serde(default)]
  pub nif_differentiation: bool,
}

pub async fn update_setting(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i32>,
  Json(req): Json<SettingUpdateReq>,
) -> Result<Json<commission_setting::Model>, Reject> {
  let setting = sv::Settings::new(&app.db)
    .update(id, req.commission_type, req.nif_differentiation)
    .await
    .map_err(reject)?;
  Ok(Json(setting))
}

pub async fn delete_setting(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i32>,
) -> Result<Json<Status>, Reject> {
  sv::Settings::new(&app.db).delete(id).await.map_err(reject)?;
  Ok(Json(Status { success: true, msg: None }))
}

pub async fn create_rule(
  State(app): State<Arc<AppState>>,
  Path(setting_id): Path<i32>,
  Json(draft): Json<RuleDraft>,
) -> Result<(StatusCode, Json<commission_rule::Model>), Reject> {
  let rule = sv::Settings::new(&app.db)
    .add_rule(setting_id, draft)
    .await
    .map_err(reject)?;
  Ok((StatusCode::CREATED, Json(rule)))
}

pub async fn update_rule(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i32>,
  Json(draft): Json<RuleDraft>,
) -> Result<Json<commission_rule::Model>, Reject> {
  let rule =
    sv::Settings::new(&app.db).update_rule(id, draft).await.map_err(reject)?;
  Ok(Json(rule))
}

pub async fn delete_rule(
  State(app): State<Arc<AppState>>,
  Path(id): Path<i32>,
) -> Result<Json<Status>, Reject> {
  sv::Settings::new(&app.db).delete_rule(id).await.map_err(reject)?;
  Ok(Json(Status { success: true, msg: None }))
}

pub async fn replace_power_values(
  State(app): State<Arc<AppState>>,
  Path(rule_id): Path<i32>,
  Json(values): Json<Vec<PowerValueDraft>>,
) -> Result<Json<Vec<power_commission_value::Model>>, Reject> {
  let tiers = sv::Settings::new(&app.db)
    .replace_power_values(rule_id, values)
    .await
    .map_err(reject)?;
  Ok(Json(tiers))
}

#[derive(Deserialize)]
pub struct DashboardQuery {
  pub user_id: i64,
  pub year: Option<i32>,
  pub month: Option<u32>,
}

pub async fn dashboard(
  State(app): State<Arc<AppState>>,
  Query(query): Query<DashboardQuery>,
) -> Result<Json<Dashboard>, Reject> {
  let now = Utc::now().naive_utc();
  let year = query.year.unwrap_or_else(|| now.year());
  let month = query.month.unwrap_or_else(|| now.month());

  let dashboard = sv::Reports::new(&app.db)
    .dashboard(query.user_id, year, month)
    .await
    .map_err(reject)?;

  Ok(Json(dashboard))
}
