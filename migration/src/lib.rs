pub use sea_orm_migration::prelude::*;

mod m20260312_000001_create_users;
mod m20260312_000002_create_operators;
mod m20260312_000003_create_sales;
mod m20260319_000004_create_commission_settings;
mod m20260405_000005_add_backoffice_terms;
mod m20260518_000006_add_power_commissions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20260312_000001_create_users::Migration),
      Box::new(m20260312_000002_create_operators::Migration),
      Box::new(m20260312_000003_create_sales::Migration),
      Box::new(m20260319_000004_create_commission_settings::Migration),
      Box::new(m20260405_000005_add_backoffice_terms::Migration),
      Box::new(m20260518_000006_add_power_commissions::Migration),
    ]
  }
}
