use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InventoryLedger::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryLedger::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryLedger::TransactionType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryLedger::QuantityKg)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InventoryLedger::Balance).double().not_null())
                    .col(ColumnDef::new(InventoryLedger::Reference).string().null())
                    .col(
                        ColumnDef::new(InventoryLedger::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_ledger_created_at")
                    .table(InventoryLedger::Table)
                    .col(InventoryLedger::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Alerts are raised by database triggers/jobs; this service only resolves them
        manager
            .create_table(
                Table::create()
                    .table(InventoryAlerts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryAlerts::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryAlerts::AlertLevel)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryAlerts::AlertType)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryAlerts::AlertMessage)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InventoryAlerts::MaterialMasterRef)
                            .uuid()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(InventoryAlerts::Resolved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(InventoryAlerts::ResolvedBy).string().null())
                    .col(
                        ColumnDef::new(InventoryAlerts::ResolvedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(InventoryAlerts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_alerts_material_master")
                            .from(InventoryAlerts::Table, InventoryAlerts::MaterialMasterRef)
                            .to(MaterialMaster::Table, MaterialMaster::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_alerts_resolved")
                    .table(InventoryAlerts::Table)
                    .col(InventoryAlerts::Resolved)
                    .col(InventoryAlerts::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InventoryAlerts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InventoryLedger::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum InventoryLedger {
    Table,
    Id,
    TransactionType,
    QuantityKg,
    Balance,
    Reference,
    CreatedAt,
}

#[derive(DeriveIden)]
enum InventoryAlerts {
    Table,
    Id,
    AlertLevel,
    AlertType,
    AlertMessage,
    MaterialMasterRef,
    Resolved,
    ResolvedBy,
    ResolvedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum MaterialMaster {
    Table,
    Id,
}
