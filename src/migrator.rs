use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_products_and_tiers::Migration),
            Box::new(m20240101_000002_create_orders_table::Migration),
            Box::new(m20240101_000003_create_sales_tables::Migration),
            Box::new(m20240101_000004_create_deliveries_tables::Migration),
            Box::new(m20240101_000005_create_transfers_tables::Migration),
            Box::new(m20240101_000006_create_grid_tables::Migration),
            Box::new(m20240101_000007_create_expenses_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_products_and_tiers {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_products_and_tiers"
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
                        .col(ColumnDef::new(Products::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::CashierId).uuid().null())
                        .col(ColumnDef::new(Products::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Products::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SackPrices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SackPrices::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SackPrices::ProductId).uuid().not_null())
                        .col(ColumnDef::new(SackPrices::Price).decimal().not_null())
                        .col(
                            ColumnDef::new(SackPrices::Stock)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(SackPrices::Kind).string().not_null())
                        .col(ColumnDef::new(SackPrices::ProfitMargin).decimal().null())
                        .col(ColumnDef::new(SackPrices::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(SackPrices::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_sack_prices_product")
                                .from(SackPrices::Table, SackPrices::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // One sack tier per (product, size)
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sack_prices_product_kind")
                        .table(SackPrices::Table)
                        .col(SackPrices::ProductId)
                        .col(SackPrices::Kind)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SpecialPrices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SpecialPrices::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SpecialPrices::SackPriceId)
                                .uuid()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(SpecialPrices::Price).decimal().not_null())
                        .col(
                            ColumnDef::new(SpecialPrices::MinimumQuantity)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SpecialPrices::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_special_prices_sack_price")
                                .from(SpecialPrices::Table, SpecialPrices::SackPriceId)
                                .to(SackPrices::Table, SackPrices::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PerUnitPrices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PerUnitPrices::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PerUnitPrices::ProductId)
                                .uuid()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(PerUnitPrices::Price).decimal().not_null())
                        .col(
                            ColumnDef::new(PerUnitPrices::Stock)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(PerUnitPrices::ProfitMargin).decimal().null())
                        .col(
                            ColumnDef::new(PerUnitPrices::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PerUnitPrices::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_per_unit_prices_product")
                                .from(PerUnitPrices::Table, PerUnitPrices::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PerUnitPrices::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SpecialPrices::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SackPrices::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Products {
        Table,
        Id,
        Name,
        CashierId,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum SackPrices {
        Table,
        Id,
        ProductId,
        Price,
        Stock,
        Kind,
        ProfitMargin,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum SpecialPrices {
        Table,
        Id,
        SackPriceId,
        Price,
        MinimumQuantity,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum PerUnitPrices {
        Table,
        Id,
        ProductId,
        Price,
        Stock,
        ProfitMargin,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_orders_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Orders::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Orders::CashierId).uuid().not_null())
                        .col(ColumnDef::new(Orders::Status).string().not_null())
                        .col(
                            ColumnDef::new(Orders::Total)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Orders::SaleId).uuid().null())
                        .col(ColumnDef::new(Orders::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Orders::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_status")
                        .table(Orders::Table)
                        .col(Orders::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Orders {
        Table,
        Id,
        CashierId,
        Status,
        Total,
        SaleId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_sales_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_sales_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Sales::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Sales::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Sales::CashierId).uuid().not_null())
                        .col(ColumnDef::new(Sales::PaymentMethod).string().not_null())
                        .col(ColumnDef::new(Sales::TotalAmount).decimal().not_null())
                        .col(ColumnDef::new(Sales::OrderId).uuid().null())
                        .col(
                            ColumnDef::new(Sales::Voided)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Sales::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Sales::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sales_cashier_created_at")
                        .table(Sales::Table)
                        .col(Sales::CashierId)
                        .col(Sales::CreatedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SaleItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SaleItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SaleItems::SaleId).uuid().not_null())
                        .col(ColumnDef::new(SaleItems::ProductId).uuid().not_null())
                        .col(ColumnDef::new(SaleItems::SackPriceId).uuid().null())
                        .col(ColumnDef::new(SaleItems::PerUnitPriceId).uuid().null())
                        .col(ColumnDef::new(SaleItems::Quantity).decimal().not_null())
                        .col(ColumnDef::new(SaleItems::UnitPrice).decimal().null())
                        .col(ColumnDef::new(SaleItems::DiscountedPrice).decimal().null())
                        .col(
                            ColumnDef::new(SaleItems::IsSpecialPrice)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(SaleItems::IsDiscounted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(SaleItems::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_sale_items_sale")
                                .from(SaleItems::Table, SaleItems::SaleId)
                                .to(Sales::Table, Sales::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sale_items_sale_id")
                        .table(SaleItems::Table)
                        .col(SaleItems::SaleId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SaleItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Sales::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Sales {
        Table,
        Id,
        CashierId,
        PaymentMethod,
        TotalAmount,
        OrderId,
        Voided,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum SaleItems {
        Table,
        Id,
        SaleId,
        ProductId,
        SackPriceId,
        PerUnitPriceId,
        Quantity,
        UnitPrice,
        DiscountedPrice,
        IsSpecialPrice,
        IsDiscounted,
        CreatedAt,
    }
}

mod m20240101_000004_create_deliveries_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_deliveries_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Deliveries::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Deliveries::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Deliveries::CashierId).uuid().not_null())
                        .col(ColumnDef::new(Deliveries::DriverName).string().not_null())
                        .col(
                            ColumnDef::new(Deliveries::DeliveryTimeStart)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Deliveries::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Deliveries::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(DeliveryItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeliveryItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DeliveryItems::DeliveryId).uuid().not_null())
                        .col(ColumnDef::new(DeliveryItems::ProductId).uuid().not_null())
                        .col(ColumnDef::new(DeliveryItems::SackPriceId).uuid().null())
                        .col(ColumnDef::new(DeliveryItems::PerUnitPriceId).uuid().null())
                        .col(ColumnDef::new(DeliveryItems::Quantity).decimal().not_null())
                        .col(
                            ColumnDef::new(DeliveryItems::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_delivery_items_delivery")
                                .from(DeliveryItems::Table, DeliveryItems::DeliveryId)
                                .to(Deliveries::Table, Deliveries::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_delivery_items_delivery_id")
                        .table(DeliveryItems::Table)
                        .col(DeliveryItems::DeliveryId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DeliveryItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Deliveries::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Deliveries {
        Table,
        Id,
        CashierId,
        DriverName,
        DeliveryTimeStart,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum DeliveryItems {
        Table,
        Id,
        DeliveryId,
        ProductId,
        SackPriceId,
        PerUnitPriceId,
        Quantity,
        CreatedAt,
    }
}

mod m20240101_000005_create_transfers_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_transfers_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Transfers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Transfers::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Transfers::CashierId).uuid().not_null())
                        .col(ColumnDef::new(Transfers::ProductId).uuid().not_null())
                        .col(ColumnDef::new(Transfers::SackPriceId).uuid().null())
                        .col(ColumnDef::new(Transfers::PerUnitPriceId).uuid().null())
                        .col(ColumnDef::new(Transfers::Quantity).decimal().not_null())
                        .col(ColumnDef::new(Transfers::Name).string().not_null())
                        .col(ColumnDef::new(Transfers::Kind).string().not_null())
                        .col(ColumnDef::new(Transfers::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_transfers_cashier_created_at")
                        .table(Transfers::Table)
                        .col(Transfers::CashierId)
                        .col(Transfers::CreatedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(KahonItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(KahonItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(KahonItems::CashierId).uuid().not_null())
                        .col(ColumnDef::new(KahonItems::Name).string().not_null())
                        .col(ColumnDef::new(KahonItems::Quantity).integer().not_null())
                        .col(ColumnDef::new(KahonItems::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(KahonItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Transfers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Transfers {
        Table,
        Id,
        CashierId,
        ProductId,
        SackPriceId,
        PerUnitPriceId,
        Quantity,
        Name,
        Kind,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum KahonItems {
        Table,
        Id,
        CashierId,
        Name,
        Quantity,
        CreatedAt,
    }
}

mod m20240101_000006_create_grid_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_grid_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Sheets::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Sheets::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Sheets::OwnerId).uuid().not_null())
                        .col(ColumnDef::new(Sheets::Kind).string().not_null())
                        .col(ColumnDef::new(Sheets::Name).string().not_null())
                        .col(ColumnDef::new(Sheets::Columns).integer().not_null())
                        .col(ColumnDef::new(Sheets::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            // One sheet per (owner, ledger kind)
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sheets_owner_kind")
                        .table(Sheets::Table)
                        .col(Sheets::OwnerId)
                        .col(Sheets::Kind)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(GridRows::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(GridRows::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(GridRows::SheetId).uuid().not_null())
                        .col(ColumnDef::new(GridRows::RowIndex).integer().not_null())
                        .col(
                            ColumnDef::new(GridRows::IsItemRow)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(GridRows::ItemId).uuid().null())
                        .col(ColumnDef::new(GridRows::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_grid_rows_sheet")
                                .from(GridRows::Table, GridRows::SheetId)
                                .to(Sheets::Table, Sheets::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_grid_rows_sheet_id")
                        .table(GridRows::Table)
                        .col(GridRows::SheetId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(GridCells::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(GridCells::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(GridCells::RowId).uuid().not_null())
                        .col(ColumnDef::new(GridCells::ColumnIndex).integer().not_null())
                        .col(ColumnDef::new(GridCells::Value).string().not_null())
                        .col(ColumnDef::new(GridCells::Formula).string().null())
                        .col(
                            ColumnDef::new(GridCells::IsCalculated)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(GridCells::Color).string().null())
                        .col(ColumnDef::new(GridCells::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(GridCells::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_grid_cells_row")
                                .from(GridCells::Table, GridCells::RowId)
                                .to(GridRows::Table, GridRows::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // One cell per (row, column)
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_grid_cells_row_column")
                        .table(GridCells::Table)
                        .col(GridCells::RowId)
                        .col(GridCells::ColumnIndex)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(GridCells::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(GridRows::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Sheets::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Sheets {
        Table,
        Id,
        OwnerId,
        Kind,
        Name,
        Columns,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum GridRows {
        Table,
        Id,
        SheetId,
        RowIndex,
        IsItemRow,
        ItemId,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum GridCells {
        Table,
        Id,
        RowId,
        ColumnIndex,
        Value,
        Formula,
        IsCalculated,
        Color,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000007_create_expenses_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_expenses_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Expenses::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Expenses::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Expenses::CashierId).uuid().not_null())
                        .col(ColumnDef::new(Expenses::Name).string().not_null())
                        .col(ColumnDef::new(Expenses::Amount).decimal().not_null())
                        .col(ColumnDef::new(Expenses::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_expenses_cashier_created_at")
                        .table(Expenses::Table)
                        .col(Expenses::CashierId)
                        .col(Expenses::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Expenses::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Expenses {
        Table,
        Id,
        CashierId,
        Name,
        Amount,
        CreatedAt,
    }
}
