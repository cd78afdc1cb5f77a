use sea_orm_migration::prelude::*;

use crate::PAYMENT_METHODS;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240101_000001_create_retail_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::Name).text().not_null())
                    .col(ColumnDef::new(Products::Price).decimal_len(12, 2).not_null())
                    .col(
                        ColumnDef::new(Products::Stock)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sellers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sellers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sellers::Name).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sales::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sales::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sales::SellerId).integer().not_null())
                    .col(ColumnDef::new(Sales::ProductId).integer().not_null())
                    .col(ColumnDef::new(Sales::Quantity).integer().not_null())
                    .col(ColumnDef::new(Sales::Total).decimal_len(12, 2).not_null())
                    .col(
                        ColumnDef::new(Sales::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sales_seller_id")
                            .from(Sales::Table, Sales::SellerId)
                            .to(Sellers::Table, Sellers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sales_product_id")
                            .from(Sales::Table, Sales::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Returns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Returns::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Returns::SaleId).integer().not_null())
                    .col(ColumnDef::new(Returns::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(Returns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_returns_sale_id")
                            .from(Returns::Table, Returns::SaleId)
                            .to(Sales::Table, Sales::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::SellerId).integer().not_null())
                    .col(ColumnDef::new(Payments::Amount).decimal_len(12, 2).not_null())
                    .col(
                        ColumnDef::new(Payments::Method)
                            .string_len(16)
                            .not_null()
                            .check(Expr::col(Payments::Method).is_in(PAYMENT_METHODS)),
                    )
                    .col(
                        ColumnDef::new(Payments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_seller_id")
                            .from(Payments::Table, Payments::SellerId)
                            .to(Sellers::Table, Sellers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Lookup indexes on every reference column
        for (name, table, column) in [
            ("idx_sales_seller_id", Sales::Table, Sales::SellerId),
            ("idx_sales_product_id", Sales::Table, Sales::ProductId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_returns_sale_id")
                    .table(Returns::Table)
                    .col(Returns::SaleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payments_seller_id")
                    .table(Payments::Table)
                    .col(Payments::SellerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Returns::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sales::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sellers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Products {
    Table,
    Id,
    Name,
    Price,
    Stock,
}

#[derive(DeriveIden)]
pub enum Sellers {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub enum Sales {
    Table,
    Id,
    SellerId,
    ProductId,
    Quantity,
    Total,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Returns {
    Table,
    Id,
    SaleId,
    Quantity,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Payments {
    Table,
    Id,
    SellerId,
    Amount,
    Method,
    CreatedAt,
}
