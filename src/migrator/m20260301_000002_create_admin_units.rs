use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Regions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Regions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Regions::RegionUid).string_len(20).not_null())
                    .col(ColumnDef::new(Regions::Region).string_len(50).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Districts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Districts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Districts::DistrictUid).string_len(20).not_null())
                    .col(ColumnDef::new(Districts::District).string_len(50).not_null())
                    .col(ColumnDef::new(Districts::RegionId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_districts_region")
                            .from(Districts::Table, Districts::RegionId)
                            .to(Regions::Table, Regions::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subcounties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subcounties::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Subcounties::SubcountyUid)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Subcounties::Subcounty).string_len(50).not_null())
                    .col(ColumnDef::new(Subcounties::DistrictId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subcounties_district")
                            .from(Subcounties::Table, Subcounties::DistrictId)
                            .to(Districts::Table, Districts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_districts_region_id")
                    .table(Districts::Table)
                    .col(Districts::RegionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subcounties_district_id")
                    .table(Subcounties::Table)
                    .col(Subcounties::DistrictId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subcounties::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Districts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Regions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Regions {
    Table,
    Id,
    RegionUid,
    Region,
}

#[derive(DeriveIden)]
enum Districts {
    Table,
    Id,
    DistrictUid,
    District,
    RegionId,
}

#[derive(DeriveIden)]
enum Subcounties {
    Table,
    Id,
    SubcountyUid,
    Subcounty,
    DistrictId,
}
