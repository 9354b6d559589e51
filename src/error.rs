use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Missing commission configuration is NOT an error: the resolver and
/// calculator degrade to a manual/zero result. Only store failures and
/// bad administrative input surface here.
#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Db(#[from] sea_orm::DbErr),
  #[error("user not found")]
  UserNotFound,
  #[error("operator not found")]
  OperatorNotFound,
  #[error("partner not found")]
  PartnerNotFound,
  #[error("sale not found")]
  SaleNotFound,
  #[error("commission setting not found")]
  SettingNotFound,
  #[error("commission rule not found")]
  RuleNotFound,
  #[error("commission override requires an admin or backoffice user")]
  OverrideNotAllowed,
  #[error("invalid arguments: {0}")]
  InvalidArgs(String),
}
