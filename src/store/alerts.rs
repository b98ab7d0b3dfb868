use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Select, Set,
};
use serde::Deserialize;

use crate::entities::alert;
use crate::error::AppError;
use crate::query::{
    recent_count_condition, AlertFilter, AlertPage, NamedQuery, PageRequest, Pagination,
};

pub const DEFAULT_STATUS: &str = "Pending";
pub const DEFAULT_ALERT_FROM: &str = "Open Alerts";

// Overwrite each listed field of the active model when the input carries it.
macro_rules! set_present {
    ($active:ident, $input:ident { $($field:ident),* $(,)? }) => {
        $(
            if let Some(value) = $input.$field {
                $active.$field = Set(value);
            }
        )*
    };
}

/// Case-detail fields a field verifier may correct. Shared by create, update
/// and the verification payload; absent fields leave the stored value alone.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseDetails {
    pub call_taker: Option<String>,
    pub cif_no: Option<String>,
    pub person_reporting: Option<String>,
    pub village: Option<String>,
    pub sub_county: Option<String>,
    pub contact_number: Option<String>,
    pub source_of_alert: Option<String>,
    pub alert_case_name: Option<String>,
    pub alert_case_age: Option<i32>,
    pub alert_case_sex: Option<String>,
    pub alert_case_pregnant_duration: Option<i32>,
    pub alert_case_village: Option<String>,
    pub alert_case_parish: Option<String>,
    pub alert_case_sub_county: Option<String>,
    pub alert_case_district: Option<String>,
    pub alert_case_nationality: Option<String>,
    pub point_of_contact_name: Option<String>,
    pub point_of_contact_relationship: Option<String>,
    pub point_of_contact_phone: Option<String>,
    pub history: Option<String>,
    pub health_facility_visit: Option<String>,
    pub traditional_healer_visit: Option<String>,
    pub symptoms: Option<String>,
    pub actions: Option<String>,
    pub feedback: Option<String>,
}

impl CaseDetails {
    /// `cif_no` is stored upper-cased so lookups by case number are stable.
    pub fn apply_to(self, active: &mut alert::ActiveModel) {
        let mut input = self;
        input.cif_no = input.cif_no.map(|c| c.to_uppercase());

        set_present!(active, input {
            call_taker,
            cif_no,
            person_reporting,
            village,
            sub_county,
            contact_number,
            source_of_alert,
            alert_case_name,
            alert_case_age,
            alert_case_sex,
            alert_case_pregnant_duration,
            alert_case_village,
            alert_case_parish,
            alert_case_sub_county,
            alert_case_district,
            alert_case_nationality,
            point_of_contact_name,
            point_of_contact_relationship,
            point_of_contact_phone,
            history,
            health_facility_visit,
            traditional_healer_visit,
            symptoms,
            actions,
            feedback,
        });
    }
}

/// Body of alert create and update requests. Verification metadata is not
/// part of it: only the verification workflow sets those columns.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertInput {
    pub status: Option<String>,
    pub date: Option<chrono::NaiveDate>,
    pub time: Option<chrono::NaiveTime>,
    pub case_verification_desk: Option<String>,
    pub field_verification: Option<String>,
    pub field_verification_decision: Option<String>,
    pub lab_result: Option<String>,
    pub lab_result_date: Option<chrono::NaiveDate>,
    pub is_highlighted: Option<bool>,
    pub assigned_to: Option<String>,
    pub alert_reported_before: Option<String>,
    pub alert_from: Option<String>,
    pub comments: Option<String>,
    pub response: Option<String>,
    pub narrative: Option<String>,
    pub facility_type: Option<String>,
    pub facility: Option<String>,
    pub region: Option<String>,
    #[serde(flatten)]
    pub details: CaseDetails,
}

impl AlertInput {
    fn apply_to(self, active: &mut alert::ActiveModel) {
        let input = self;

        set_present!(active, input {
            status,
            date,
            time,
            case_verification_desk,
            field_verification,
            field_verification_decision,
            lab_result,
            is_highlighted,
            assigned_to,
            alert_reported_before,
            alert_from,
            comments,
            response,
            narrative,
            facility_type,
            facility,
            region,
        });
        if let Some(d) = input.lab_result_date {
            active.lab_result_date = Set(Some(d));
        }

        input.details.apply_to(active);
    }
}

pub(crate) fn blank_alert(now: NaiveDateTime) -> alert::ActiveModel {
    alert::ActiveModel {
        status: Set(DEFAULT_STATUS.to_string()),
        date: Set(now.date()),
        time: Set(now.time()),
        call_taker: Set(String::new()),
        cif_no: Set(String::new()),
        person_reporting: Set(String::new()),
        village: Set(String::new()),
        sub_county: Set(String::new()),
        contact_number: Set(String::new()),
        source_of_alert: Set(String::new()),
        alert_case_name: Set(String::new()),
        alert_case_age: Set(0),
        alert_case_sex: Set(String::new()),
        alert_case_pregnant_duration: Set(0),
        alert_case_village: Set(String::new()),
        alert_case_parish: Set(String::new()),
        alert_case_sub_county: Set(String::new()),
        alert_case_district: Set(String::new()),
        alert_case_nationality: Set(String::new()),
        point_of_contact_name: Set(String::new()),
        point_of_contact_relationship: Set(String::new()),
        point_of_contact_phone: Set(String::new()),
        history: Set(String::new()),
        health_facility_visit: Set(String::new()),
        traditional_healer_visit: Set(String::new()),
        symptoms: Set(String::new()),
        actions: Set(String::new()),
        case_verification_desk: Set(String::new()),
        field_verification: Set(String::new()),
        field_verification_decision: Set(String::new()),
        feedback: Set(String::new()),
        lab_result: Set(String::new()),
        lab_result_date: Set(None),
        is_highlighted: Set(false),
        assigned_to: Set(String::new()),
        alert_reported_before: Set(String::new()),
        alert_from: Set(DEFAULT_ALERT_FROM.to_string()),
        comments: Set(String::new()),
        response: Set(String::new()),
        narrative: Set(String::new()),
        facility_type: Set(String::new()),
        facility: Set(String::new()),
        region: Set(String::new()),
        is_verified: Set(false),
        verified_by: Set(None),
        verification_date: Set(None),
        verification_time: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Persistent alert collection. Soft-deleted rows stay in the table but are
/// invisible to every read here.
#[derive(Clone)]
pub struct AlertStore {
    db: DatabaseConnection,
}

impl AlertStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    fn live() -> Select<alert::Entity> {
        alert::Entity::find().filter(alert::Column::DeletedAt.is_null())
    }

    /// Point lookup usable inside a transaction.
    pub async fn find_live<C: ConnectionTrait>(conn: &C, id: i32) -> Result<alert::Model, AppError> {
        Self::live()
            .filter(alert::Column::Id.eq(id))
            .one(conn)
            .await?
            .ok_or(AppError::NotFound("Alert"))
    }

    pub async fn get(&self, id: i32) -> Result<alert::Model, AppError> {
        Self::find_live(&self.db, id).await
    }

    pub async fn create(&self, input: AlertInput, now: NaiveDateTime) -> Result<alert::Model, AppError> {
        if is_blank(&input.details.person_reporting) {
            return Err(AppError::invalid_argument("Person reporting is required"));
        }
        if is_blank(&input.details.alert_case_name) {
            return Err(AppError::invalid_argument("Alert case name is required"));
        }

        // Blank labels count as unset so the defaults apply.
        let mut input = input;
        if is_blank(&input.status) {
            input.status = None;
        }
        if is_blank(&input.alert_from) {
            input.alert_from = None;
        }

        let mut active = blank_alert(now);
        input.apply_to(&mut active);

        Ok(active.insert(&self.db).await?)
    }

    pub async fn update(
        &self,
        id: i32,
        input: AlertInput,
        now: NaiveDateTime,
    ) -> Result<alert::Model, AppError> {
        let current = self.get(id).await?;
        let mut active: alert::ActiveModel = current.into();
        input.apply_to(&mut active);
        active.updated_at = Set(now);

        Ok(active.update(&self.db).await?)
    }

    /// Returns the tombstoned row.
    pub async fn soft_delete(&self, id: i32, now: NaiveDateTime) -> Result<alert::Model, AppError> {
        let current = self.get(id).await?;
        let mut active: alert::ActiveModel = current.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        Ok(active.update(&self.db).await?)
    }

    pub async fn list(&self, filter: &AlertFilter, page: PageRequest) -> Result<AlertPage, AppError> {
        let select = Self::live()
            .filter(filter.condition())
            .order_by_desc(alert::Column::Date)
            .order_by_desc(alert::Column::Id);

        self.paginate(select, page).await
    }

    pub async fn query_named(
        &self,
        query: NamedQuery,
        now: NaiveDateTime,
        page: PageRequest,
    ) -> Result<AlertPage, AppError> {
        let select = Self::live()
            .filter(query.condition(now))
            .order_by_desc(alert::Column::CreatedAt)
            .order_by_desc(alert::Column::Id);

        self.paginate(select, page).await
    }

    /// Alerts with the given verification flag created in the last hour.
    pub async fn count_recent(&self, is_verified: bool, now: NaiveDateTime) -> Result<u64, AppError> {
        self.count(recent_count_condition(is_verified, now)).await
    }

    pub async fn count(&self, condition: Condition) -> Result<u64, AppError> {
        Ok(Self::live().filter(condition).count(&self.db).await?)
    }

    async fn paginate(
        &self,
        select: Select<alert::Entity>,
        page: PageRequest,
    ) -> Result<AlertPage, AppError> {
        let paginator = select.paginate(&self.db, page.limit);
        let total = paginator.num_items().await?;
        let alerts = if page.offset() >= total {
            Vec::new()
        } else {
            paginator.fetch_page(page.page - 1).await?
        };

        Ok(AlertPage {
            alerts,
            pagination: Pagination::new(page, total),
        })
    }
}
