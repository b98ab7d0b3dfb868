use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One reported case, tracked from intake through field verification.
///
/// Descriptive fields are non-null with empty defaults; only the verification
/// metadata, `lab_result_date` and the soft-delete marker are nullable.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "alerts")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub status: String,
    pub date: Date,
    pub time: Time,
    pub call_taker: String,
    pub cif_no: String,
    pub person_reporting: String,
    pub village: String,
    pub sub_county: String,
    pub contact_number: String,
    pub source_of_alert: String,
    pub alert_case_name: String,
    pub alert_case_age: i32,
    pub alert_case_sex: String,
    pub alert_case_pregnant_duration: i32,
    pub alert_case_village: String,
    pub alert_case_parish: String,
    pub alert_case_sub_county: String,
    pub alert_case_district: String,
    pub alert_case_nationality: String,
    pub point_of_contact_name: String,
    pub point_of_contact_relationship: String,
    pub point_of_contact_phone: String,
    #[sea_orm(column_type = "Text")]
    pub history: String,
    pub health_facility_visit: String,
    pub traditional_healer_visit: String,
    #[sea_orm(column_type = "Text")]
    pub symptoms: String,
    #[sea_orm(column_type = "Text")]
    pub actions: String,
    #[sea_orm(column_type = "Text")]
    pub case_verification_desk: String,
    #[sea_orm(column_type = "Text")]
    pub field_verification: String,
    #[sea_orm(column_type = "Text")]
    pub field_verification_decision: String,
    #[sea_orm(column_type = "Text")]
    pub feedback: String,
    pub lab_result: String,
    pub lab_result_date: Option<Date>,
    pub is_highlighted: bool,
    pub assigned_to: String,
    pub alert_reported_before: String,
    pub alert_from: String,
    pub comments: String,
    #[sea_orm(column_type = "Text")]
    pub response: String,
    #[sea_orm(column_type = "Text")]
    pub narrative: String,
    pub facility_type: String,
    pub facility: String,
    pub region: String,
    pub is_verified: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub verified_by: Option<String>,
    pub verification_date: Option<Date>,
    pub verification_time: Option<Time>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    #[serde(skip)]
    pub deleted_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::verification_token::Entity")]
    VerificationToken,
}

impl Related<super::verification_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VerificationToken.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
