use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Operators::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Operators::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Operators::Name).string().not_null())
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(Partners::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Partners::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Partners::Name).string().not_null())
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(ClientCategories::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(ClientCategories::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(ClientCategories::Name).string().not_null())
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(ClientCategories::Table).to_owned())
      .await?;

    manager
      .drop_table(Table::drop().table(Partners::Table).to_owned())
      .await?;

    manager.drop_table(Table::drop().table(Operators::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Operators {
  Table,
  Id,
  Name,
}

#[derive(DeriveIden)]
pub enum Partners {
  Table,
  Id,
  Name,
}

#[derive(DeriveIden)]
pub enum ClientCategories {
  Table,
  Id,
  Name,
}
