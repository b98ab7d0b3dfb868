use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Descriptive columns share one shape: non-null, empty by default.
fn string_col(col: Alerts, len: u32) -> ColumnDef {
    ColumnDef::new(col)
        .string_len(len)
        .not_null()
        .default("")
        .to_owned()
}

fn text_col(col: Alerts) -> ColumnDef {
    ColumnDef::new(col).text().not_null().default("").to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alerts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alerts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Alerts::Status)
                            .string_len(50)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(ColumnDef::new(Alerts::Date).date().not_null())
                    .col(ColumnDef::new(Alerts::Time).time().not_null())
                    .col(string_col(Alerts::CallTaker, 255))
                    .col(string_col(Alerts::CifNo, 255))
                    .col(string_col(Alerts::PersonReporting, 255))
                    .col(string_col(Alerts::Village, 255))
                    .col(string_col(Alerts::SubCounty, 255))
                    .col(string_col(Alerts::ContactNumber, 255))
                    .col(string_col(Alerts::SourceOfAlert, 255))
                    .col(string_col(Alerts::AlertCaseName, 255))
                    .col(
                        ColumnDef::new(Alerts::AlertCaseAge)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(string_col(Alerts::AlertCaseSex, 50))
                    .col(
                        ColumnDef::new(Alerts::AlertCasePregnantDuration)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(string_col(Alerts::AlertCaseVillage, 255))
                    .col(string_col(Alerts::AlertCaseParish, 255))
                    .col(string_col(Alerts::AlertCaseSubCounty, 255))
                    .col(string_col(Alerts::AlertCaseDistrict, 255))
                    .col(string_col(Alerts::AlertCaseNationality, 255))
                    .col(string_col(Alerts::PointOfContactName, 255))
                    .col(string_col(Alerts::PointOfContactRelationship, 255))
                    .col(string_col(Alerts::PointOfContactPhone, 255))
                    .col(text_col(Alerts::History))
                    .col(string_col(Alerts::HealthFacilityVisit, 255))
                    .col(string_col(Alerts::TraditionalHealerVisit, 255))
                    .col(text_col(Alerts::Symptoms))
                    .col(text_col(Alerts::Actions))
                    .col(text_col(Alerts::CaseVerificationDesk))
                    .col(text_col(Alerts::FieldVerification))
                    .col(text_col(Alerts::FieldVerificationDecision))
                    .col(text_col(Alerts::Feedback))
                    .col(string_col(Alerts::LabResult, 10))
                    .col(ColumnDef::new(Alerts::LabResultDate).date())
                    .col(
                        ColumnDef::new(Alerts::IsHighlighted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(string_col(Alerts::AssignedTo, 20))
                    .col(string_col(Alerts::AlertReportedBefore, 5))
                    .col(
                        ColumnDef::new(Alerts::AlertFrom)
                            .string_len(20)
                            .not_null()
                            .default("Open Alerts"),
                    )
                    .col(string_col(Alerts::Comments, 255))
                    .col(text_col(Alerts::Response))
                    .col(text_col(Alerts::Narrative))
                    .col(string_col(Alerts::FacilityType, 255))
                    .col(string_col(Alerts::Facility, 255))
                    .col(string_col(Alerts::Region, 255))
                    .col(
                        ColumnDef::new(Alerts::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Alerts::VerifiedBy).text())
                    .col(ColumnDef::new(Alerts::VerificationDate).date())
                    .col(ColumnDef::new(Alerts::VerificationTime).time())
                    .col(ColumnDef::new(Alerts::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Alerts::UpdatedAt).date_time().not_null())
                    .col(ColumnDef::new(Alerts::DeletedAt).date_time())
                    .to_owned(),
            )
            .await?;

        // Listing sorts by date; named queries and counts scan is_verified + created_at.
        manager
            .create_index(
                Index::create()
                    .name("idx_alerts_date")
                    .table(Alerts::Table)
                    .col(Alerts::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_alerts_verified_created")
                    .table(Alerts::Table)
                    .col(Alerts::IsVerified)
                    .col(Alerts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_alerts_deleted_at")
                    .table(Alerts::Table)
                    .col(Alerts::DeletedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alerts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Alerts {
    Table,
    Id,
    Status,
    Date,
    Time,
    CallTaker,
    CifNo,
    PersonReporting,
    Village,
    SubCounty,
    ContactNumber,
    SourceOfAlert,
    AlertCaseName,
    AlertCaseAge,
    AlertCaseSex,
    AlertCasePregnantDuration,
    AlertCaseVillage,
    AlertCaseParish,
    AlertCaseSubCounty,
    AlertCaseDistrict,
    AlertCaseNationality,
    PointOfContactName,
    PointOfContactRelationship,
    PointOfContactPhone,
    History,
    HealthFacilityVisit,
    TraditionalHealerVisit,
    Symptoms,
    Actions,
    CaseVerificationDesk,
    FieldVerification,
    FieldVerificationDecision,
    Feedback,
    LabResult,
    LabResultDate,
    IsHighlighted,
    AssignedTo,
    AlertReportedBefore,
    AlertFrom,
    Comments,
    Response,
    Narrative,
    FacilityType,
    Facility,
    Region,
    IsVerified,
    VerifiedBy,
    VerificationDate,
    VerificationTime,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
