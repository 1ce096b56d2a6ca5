use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reference data for every wire/strip item code
        manager
            .create_table(
                Table::create()
                    .table(MaterialMaster::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MaterialMaster::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaterialMaster::ItemCode)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(MaterialMaster::ItemName).string().not_null())
                    .col(
                        ColumnDef::new(MaterialMaster::MaterialType)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaterialMaster::Unit)
                            .string_len(16)
                            .not_null()
                            .default("kg"),
                    )
                    .col(ColumnDef::new(MaterialMaster::ReorderLevelKg).double().null())
                    .col(
                        ColumnDef::new(MaterialMaster::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Flattening section output (production side of the balance)
        manager
            .create_table(
                Table::create()
                    .table(FlatteningSection::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FlatteningSection::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FlatteningSection::ItemCode)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FlatteningSection::ItemName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FlatteningSection::ProductionQuantity)
                            .string_len(64)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(FlatteningSection::Unit)
                            .string_len(16)
                            .not_null()
                            .default("kg"),
                    )
                    .col(
                        ColumnDef::new(FlatteningSection::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_flatteningsection_item_code")
                    .table(FlatteningSection::Table)
                    .col(FlatteningSection::ItemCode)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Spiral section intake (consumption side of the balance)
        manager
            .create_table(
                Table::create()
                    .table(SpiralSection::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SpiralSection::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SpiralSection::ItemCode)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(SpiralSection::ItemName).string().not_null())
                    .col(ColumnDef::new(SpiralSection::Weight).string_len(64).null())
                    .col(
                        ColumnDef::new(SpiralSection::Unit)
                            .string_len(16)
                            .not_null()
                            .default("kg"),
                    )
                    .col(
                        ColumnDef::new(SpiralSection::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_spiralsection_item_code")
                    .table(SpiralSection::Table)
                    .col(SpiralSection::ItemCode)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SpiralSection::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FlatteningSection::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MaterialMaster::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MaterialMaster {
    Table,
    Id,
    ItemCode,
    ItemName,
    MaterialType,
    Unit,
    ReorderLevelKg,
    CreatedAt,
}

#[derive(DeriveIden)]
enum FlatteningSection {
    #[sea_orm(iden = "flatteningsection")]
    Table,
    Id,
    ItemCode,
    ItemName,
    ProductionQuantity,
    Unit,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SpiralSection {
    #[sea_orm(iden = "spiralsection")]
    Table,
    Id,
    ItemCode,
    ItemName,
    Weight,
    Unit,
    CreatedAt,
}
