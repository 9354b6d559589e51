pub use std::{collections::HashMap, sync::Arc, time::Duration};

pub use chrono::{Datelike, NaiveDate, NaiveDateTime as DateTime, Utc};
pub use sea_orm::{
  ActiveModelTrait, ColumnTrait, Condition, Database, DatabaseConnection,
  EntityTrait, NotSet, QueryFilter, QueryOrder, Set, TransactionTrait,
};
pub use tracing::{debug, error, info, warn};

pub use crate::error::{Error, Result};
