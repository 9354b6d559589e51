use crate::{
  entity::{user, user::UserRole},
  prelude::*,
};

pub struct Users<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Users<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Users are keyed by the external identity provider's id; rows are
  /// created on first sight, as sellers.
  pub async fn get_or_create(&self, id: i64, name: &str) -> Result<user::Model> {
    if let Some(user) = user::Entity::find_by_id(id).one(self.db).await? {
      return Ok(user);
    }

    let now = Utc::now().naive_utc();
    let user = user::ActiveModel {
      id: Set(id),
      name: Set(name.to_string()),
      role: Set(UserRole::Seller),
      commission_percentage: Set(0.0),
      commission_threshold: Set(0.0),
      created_at: Set(now),
    };

    Ok(user.insert(self.db).await?)
  }

  pub async fn by_id(&self, id: i64) -> Result<Option<user::Model>> {
    Ok(user::Entity::find_by_id(id).one(self.db).await?)
  }

  pub async fn set_role(&self, id: i64, role: UserRole) -> Result<()> {
    let user = user::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::UserNotFound)?;

    user::ActiveModel { role: Set(role), ..user.into() }
      .update(self.db)
      .await?;

    Ok(())
  }

  /// Backoffice commission terms; the percentage is a 0-100 share of
  /// the visible partner commissions.
  pub async fn set_commission_terms(
    &self,
    id: i64,
    percentage: f64,
    threshold: f64,
  ) -> Result<()> {
    if !(0.0..=100.0).contains(&percentage) {
      return Err(Error::InvalidArgs(
        "percentage must be within 0-100".into(),
      ));
    }
    if threshold < 0.0 {
      return Err(Error::InvalidArgs("threshold must not be negative".into()));
    }

    let user = user::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::UserNotFound)?;

    user::ActiveModel {
      commission_percentage: Set(percentage),
      commission_threshold: Set(threshold),
      ..user.into()
    }
    .update(self.db)
    .await?;

    Ok(())
  }

  pub async fn all(&self) -> Result<Vec<user::Model>> {
    Ok(
      user::Entity::find()
        .order_by_asc(user::Column::CreatedAt)
        .all(self.db)
        .await?,
    )
  }
}
