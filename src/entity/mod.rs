pub mod client_category;
pub mod commission_rule;
pub mod commission_setting;
pub mod operator;
pub mod partner;
pub mod power_commission_value;
pub mod sale;
pub mod user;

pub use commission_rule::{
  CalculationMethod, ClientTypeFilter, NifType, PortfolioFilter,
};
pub use commission_setting::CommissionType;
#[allow(unused_imports)]
pub use sale::{ClientType, PortfolioStatus, SaleStatus, SaleType};
#[allow(unused_imports)]
pub use user::UserRole;
